/// Quotes a runtime-chosen identifier (database or table name) for use in
/// DDL. Identifiers cannot be bound as statement parameters, so embedded
/// quotes are doubled and the whole name is wrapped.
pub fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

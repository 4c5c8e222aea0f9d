pub mod prompt;
pub mod sql;

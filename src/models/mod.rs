pub mod employer;
pub mod extract;
pub mod opening;

use std::fmt::Display;

/// Report-friendly rendering of a nullable column.
pub(crate) fn display_or_dash<T: Display>(value: &Option<T>) -> String {
    match value {
        Some(v) => v.to_string(),
        None => "-".to_string(),
    }
}

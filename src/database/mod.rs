pub mod connection;

/// Table names shared by the loader and the reports.
pub const EMPLOYERS_TABLE: &str = "employers";
pub const OPENINGS_TABLE: &str = "openings";

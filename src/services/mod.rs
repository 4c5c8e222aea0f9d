pub mod hh_service;
pub mod loader_service;
pub mod report_service;

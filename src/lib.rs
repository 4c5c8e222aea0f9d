pub mod config;
pub mod database;
pub mod error;
pub mod models;
pub mod pipeline;
pub mod services;
pub mod utils;

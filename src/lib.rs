pub mod cache;
pub mod config;
pub mod engine;
pub mod error;
pub mod fetch;
pub mod models;
pub mod notify;
pub mod parser;

pub use error::{Error, Result};

pub mod api;
pub mod config;
pub mod db;
pub mod directory;
pub mod entities;
pub mod error;
pub mod evaluator;
pub mod logging;
pub mod models;
pub mod registration;
pub mod report;
pub mod store;

pub use error::{AppError, Rejection, Result};

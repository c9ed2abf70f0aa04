pub mod api;
pub mod cli;
pub mod config;
pub mod db;
pub mod error;
pub mod model;
pub mod models;
pub mod render;
pub mod utils;

pub use error::{HrError, Result};

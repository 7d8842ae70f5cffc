pub mod actions;
pub mod api;
pub mod cli;
pub mod components;
pub mod config;
pub mod error;
pub mod logging;
pub mod models;
pub mod notifications;
pub mod pages;
pub mod query;
pub mod router;
pub mod utils;
pub mod views;

pub use error::{Error, Result};

// src/lib.rs

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod http;
pub mod notify;
pub mod tasks;

pub use error::Error;
pub use http::{ApiClient, BearerClient};

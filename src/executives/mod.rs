//! Executives API integration module.
//!
//! Provides the client, record types, and error classification for the
//! executives endpoint.

pub mod client;
pub mod error;
pub mod models;

pub use client::ExecutivesClient;
pub use error::FetchError;
pub use models::Executive;

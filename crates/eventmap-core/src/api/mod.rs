//! REST API client module for the eventmap backend.
//!
//! This module provides the `ApiClient` for authenticating against
//! `POST /login` and fetching the event list.
//!
//! The login endpoint returns a JWT bearer token that is attached to
//! subsequent requests.

pub mod client;
pub mod error;

pub use client::{ApiClient, DEFAULT_API_BASE_URL};
pub use error::ApiError;

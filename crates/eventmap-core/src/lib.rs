//! Eventmap core library.
//!
//! Provides the pieces shared by every eventmap front end:
//! - `api`: REST client for the login and events endpoints
//! - `auth`: bearer token inspection, the shared authentication context and
//!   the login/restore/logout session flow
//! - `cache`: persistent key-value store and the network-first accessor
//! - `config`: on-disk application configuration
//! - `models`: user and event types
//! - `utils`: formatting and input validation helpers

pub mod api;
pub mod auth;
pub mod cache;
pub mod config;
pub mod models;
pub mod utils;

pub use api::{ApiClient, ApiError};
pub use auth::{AuthContext, LoginError, RestoredSession, SessionManager};
pub use cache::{CacheError, CacheManager, FileStore, KeyValueStore, MemoryStore};
pub use config::Config;
pub use models::{Event, LatLng, LoginResponse, User, UserName};

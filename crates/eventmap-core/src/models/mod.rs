//! Data models for the eventmap API.
//!
//! - `user`: the authenticated user and the login response envelope
//! - `event`: events shown on the map

pub mod event;
pub mod user;

pub use event::{Event, LatLng};
pub use user::{LoginResponse, User, UserName};

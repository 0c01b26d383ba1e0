//! Authentication module for managing the user session.
//!
//! This module provides:
//! - `token`: bearer token claim decoding and expiry checks (fail-closed)
//! - `AuthContext`: the shared current-user container
//! - `SessionManager`: login, startup restore and logout over the cache
//!
//! The session is the cached `"userInfo"` record plus the cached
//! `"accessToken"`; both must be present and the token unexpired to resume.

pub mod context;
pub mod error;
pub mod session;
pub mod token;

pub use context::AuthContext;
pub use error::LoginError;
pub use session::{RestoredSession, SessionManager};
pub use token::{decode_claims, is_token_expired, is_token_expired_at, token_expires_at, TokenClaims, TokenError};

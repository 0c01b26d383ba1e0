//! Utility functions for formatting and input validation.

pub mod format;
pub mod validation;

// Re-export commonly used functions at module level
pub use format::{
    add_hours, format_ampm, format_bytes, format_phone, maps_url, truncate_string,
    update_date_with_new_time, Platform,
};
pub use validation::{password_is_valid, sanitize_email, validate_email, MIN_PASSWORD_LENGTH};

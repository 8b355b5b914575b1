//! Utility functions shared by the terminal views.
//!
//! - **Text processing**: Unicode-aware width calculation and truncation,
//!   and scrubbing of terminal control sequences from service text
//! - **URL validation**: checks an article link before it is opened
//!
//! # Examples
//!
//! ```
//! use factlens::util::{display_width, truncate_to_width, validate_url_for_open};
//!
//! assert_eq!(display_width("Hello"), 5);
//! assert_eq!(truncate_to_width("Long article title", 10), "Long ar...");
//! assert!(validate_url_for_open("file:///etc/passwd").is_err());
//! ```

mod text;
mod url_validator;

pub use text::{display_width, single_line, strip_control_chars, truncate_to_width};
pub use url_validator::{validate_url_for_open, UrlValidationError};

/// Longest search term accepted from the filter bar.
pub const MAX_SEARCH_TERM_LENGTH: usize = 256;

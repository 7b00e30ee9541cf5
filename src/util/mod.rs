//! Small helpers shared by the UI and the configuration layer.
//!
//! - **URL validation**: configured base URLs and links handed to the browser
//! - **Text processing**: width-aware truncation and sanitizing of
//!   server-supplied text before it reaches the terminal

mod text;
mod url_validator;

pub use text::{
    compact_count, display_width, relative_time, single_line, strip_control_chars, strip_html,
    truncate_to_width,
};
pub use url_validator::{validate_base_url, validate_url_for_open, UrlValidationError};

/// Longest search text accepted from the search box.
pub const MAX_SEARCH_QUERY_LENGTH: usize = 256;

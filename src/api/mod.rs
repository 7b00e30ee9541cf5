//! Client side of the platform's REST API.
//!
//! - [`endpoints`] - the listing resources and their query conventions
//! - [`client`] - HTTP requests and error mapping
//! - [`envelope`] - decoding of the paged response wrapper
//! - [`raw`] - wire types, tolerant of camelCase and PascalCase keys

mod client;
mod endpoints;
mod envelope;
mod raw;

pub use client::{ApiClient, FetchError, GENERIC_ERROR_MESSAGE};
pub use endpoints::{Resource, LOCATION_SEARCH_PATH};
pub use envelope::{decode_page, ApiError, PageEnvelope};
pub use raw::{Location, RawAttachment, RawFeedItem, RawId, RawStats, RawUser};

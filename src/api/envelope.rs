//! Decoding of the paged response envelope.
//!
//! The envelope is decoded in two steps: the outer shape into [`RawEnvelope`],
//! then each item separately. An item that fails to decode is skipped and
//! counted instead of failing the whole page.

use super::client::FetchError;
use super::raw::RawFeedItem;
use crate::pagination::{pages_for, PageInfo};
use crate::query::QueryState;
use serde::de::DeserializeOwned;
use serde::Deserialize;

/// Application-level error carried inside a response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ApiError {
    #[serde(alias = "Code")]
    pub code: Option<String>,
    #[serde(alias = "Message")]
    pub message: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawEnvelope {
    #[serde(default, alias = "Succeeded")]
    succeeded: Option<bool>,
    #[serde(default, alias = "Data", alias = "items", alias = "Items")]
    data: Option<Vec<serde_json::Value>>,
    #[serde(default, alias = "Page", alias = "pageNumber", alias = "PageNumber")]
    page: Option<u32>,
    #[serde(default, alias = "PageSize")]
    page_size: Option<u32>,
    #[serde(default, alias = "TotalCount")]
    total_count: Option<u64>,
    #[serde(default, alias = "TotalPages")]
    total_pages: Option<u32>,
    #[serde(default, alias = "Error")]
    error: Option<ApiError>,
}

/// One page of results with its paging metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct PageEnvelope<T> {
    pub succeeded: bool,
    pub items: Vec<T>,
    pub page: u32,
    pub page_size: u32,
    pub total_count: u64,
    pub total_pages: u32,
    pub error: Option<ApiError>,
    /// Items dropped because they could not be decoded.
    pub skipped: usize,
}

impl<T> PageEnvelope<T> {
    pub fn page_info(&self) -> PageInfo {
        PageInfo {
            page: self.page,
            page_size: self.page_size,
            total_count: self.total_count,
            total_pages: self.total_pages,
        }
    }

    /// Transform the items, keeping the metadata.
    pub fn map<U, F>(self, f: F) -> PageEnvelope<U>
    where
        F: FnMut(T) -> U,
    {
        PageEnvelope {
            succeeded: self.succeeded,
            items: self.items.into_iter().map(f).collect(),
            page: self.page,
            page_size: self.page_size,
            total_count: self.total_count,
            total_pages: self.total_pages,
            error: self.error,
            skipped: self.skipped,
        }
    }

    /// Turn `succeeded: false` into [`FetchError::Application`].
    pub fn into_checked(self) -> Result<Self, FetchError> {
        if self.succeeded {
            return Ok(self);
        }
        let error = self.error.unwrap_or_default();
        Err(FetchError::Application {
            code: error.code,
            message: error.message,
        })
    }
}

/// Decode a listing response body.
///
/// `requested` fills in paging fields the server left out.
pub fn decode_page(
    bytes: &[u8],
    requested: &QueryState,
) -> Result<PageEnvelope<RawFeedItem>, FetchError> {
    decode_envelope(bytes, requested)
}

pub(crate) fn decode_envelope<T: DeserializeOwned>(
    bytes: &[u8],
    requested: &QueryState,
) -> Result<PageEnvelope<T>, FetchError> {
    let raw: RawEnvelope =
        serde_json::from_slice(bytes).map_err(|e| FetchError::Decode(e.to_string()))?;

    // A 2xx body without a flag counts as success unless it carries an error.
    let succeeded = raw.succeeded.unwrap_or(raw.error.is_none());

    let values = raw.data.unwrap_or_default();
    let mut items = Vec::with_capacity(values.len());
    let mut skipped = 0;
    for value in values {
        match serde_json::from_value::<T>(value) {
            Ok(item) => items.push(item),
            Err(e) => {
                skipped += 1;
                tracing::debug!(error = %e, "Skipping undecodable item");
            }
        }
    }
    if skipped > 0 {
        tracing::warn!(skipped, "Items skipped while decoding page");
    }

    let page = raw.page.unwrap_or(requested.page_number()).max(1);
    let page_size = raw.page_size.unwrap_or(requested.page_size()).max(1);
    let total_count = raw.total_count.unwrap_or((items.len() + skipped) as u64);
    let total_pages = raw
        .total_pages
        .unwrap_or_else(|| pages_for(total_count, page_size));

    Ok(PageEnvelope {
        succeeded,
        items,
        page,
        page_size,
        total_count,
        total_pages,
        error: raw.error,
        skipped,
    })
}

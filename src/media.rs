//! Media reference resolution.
//!
//! The backend stores uploads as server-local paths containing a storage
//! marker (e.g. `wwwroot\uploads\posts\a.png`). The client turns those into
//! URLs on one of two media hosts, chosen by the folder the file lives in.

use serde::Deserialize;

/// Settings for [`MediaResolver`], read from the `[media]` config table.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct MediaConfig {
    /// Token marking a server-local storage path.
    pub marker: String,
    /// Folder whose contents are served from `primary_base`.
    pub primary_folder: String,
    pub primary_base: String,
    /// Host for everything outside `primary_folder`.
    pub secondary_base: String,
    /// Shown when an item has no image at all.
    pub default_image: String,
    /// Shown when an author has no profile image.
    pub default_avatar: String,
}

impl Default for MediaConfig {
    fn default() -> Self {
        Self {
            marker: "wwwroot/".to_string(),
            primary_folder: "uploads/".to_string(),
            primary_base: "/media/".to_string(),
            secondary_base: "/static/".to_string(),
            default_image: "/assets/images/post-placeholder.png".to_string(),
            default_avatar: "/assets/images/avatar-placeholder.png".to_string(),
        }
    }
}

impl MediaConfig {
    /// Check the invariants resolution relies on.
    ///
    /// Bases must be rooted or absolute, otherwise resolved URLs would be
    /// rewritten again on the next pass; they must not contain the marker
    /// for the same reason.
    pub fn validate(&self) -> Result<(), String> {
        if self.marker.trim().is_empty() {
            return Err("media.marker must not be empty".to_string());
        }
        for (key, base) in [
            ("media.primary_base", &self.primary_base),
            ("media.secondary_base", &self.secondary_base),
            ("media.default_image", &self.default_image),
            ("media.default_avatar", &self.default_avatar),
        ] {
            if !is_passthrough(base) && !base.starts_with('/') {
                return Err(format!("{key} must start with '/' or http(s)://"));
            }
            if base.replace('\\', "/").contains(&self.marker) {
                return Err(format!("{key} must not contain the storage marker"));
            }
        }
        Ok(())
    }
}

/// Resolves stored media references into displayable URLs.
#[derive(Debug, Clone)]
pub struct MediaResolver {
    config: MediaConfig,
}

impl Default for MediaResolver {
    fn default() -> Self {
        Self::new(MediaConfig::default())
    }
}

impl MediaResolver {
    pub fn new(config: MediaConfig) -> Self {
        Self { config }
    }

    pub fn default_image(&self) -> &str {
        &self.config.default_image
    }

    pub fn default_avatar(&self) -> &str {
        &self.config.default_avatar
    }

    /// Resolve one reference. Blank input yields `None`.
    ///
    /// - `http(s)://…` and `data:` URIs pass through unchanged
    /// - anything containing the storage marker is cut after the last marker
    ///   and routed by folder
    /// - rooted paths (`/…`) pass through
    /// - other relative paths are routed by folder
    ///
    /// Resolving an already resolved value returns it unchanged.
    pub fn resolve(&self, reference: &str) -> Option<String> {
        let reference = reference.trim();
        if reference.is_empty() {
            return None;
        }
        if is_passthrough(reference) {
            return Some(reference.to_string());
        }

        let normalized = reference.replace('\\', "/");
        let relative = match normalized.rfind(&self.config.marker) {
            Some(idx) => &normalized[idx + self.config.marker.len()..],
            None if normalized.starts_with('/') => return Some(normalized),
            None => normalized.as_str(),
        };
        let relative = relative.trim_start_matches('/');
        if relative.is_empty() {
            return None;
        }

        let base = if relative.starts_with(&self.config.primary_folder) {
            &self.config.primary_base
        } else {
            &self.config.secondary_base
        };
        Some(format!("{}/{}", base.trim_end_matches('/'), relative))
    }

    /// First reference that resolves, or the default item image.
    pub fn resolve_or_default<'a, I>(&self, candidates: I) -> String
    where
        I: IntoIterator<Item = &'a str>,
    {
        candidates
            .into_iter()
            .find_map(|c| self.resolve(c))
            .unwrap_or_else(|| self.config.default_image.clone())
    }
}

fn is_passthrough(reference: &str) -> bool {
    let lower = reference
        .get(..8)
        .unwrap_or(reference)
        .to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://") || lower.starts_with("data:")
}

//! Mapping of raw API items into the stable view model.
//!
//! Normalization never fails. Every field the UI reads has a value after
//! [`normalize`]: missing stats become zeros, the display image falls back to
//! the configured placeholder, and an item without a title shows the reposted
//! original's title or a fixed placeholder.

use crate::api::{RawAttachment, RawFeedItem, RawId, RawStats};
use crate::catalog;
use crate::media::MediaResolver;
use chrono::{DateTime, NaiveDateTime, Utc};

pub const UNTITLED: &str = "Untitled";
pub const UNKNOWN_AUTHOR: &str = "Community member";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Stats {
    pub views: u64,
    pub likes: u64,
    pub dislikes: u64,
    pub comments: u64,
    pub shares: u64,
}

impl Stats {
    fn from_raw(raw: Option<&RawStats>) -> Self {
        let Some(raw) = raw else {
            return Self::default();
        };
        let count = |v: Option<i64>| v.map_or(0, |n| n.max(0) as u64);
        Self {
            views: count(raw.views),
            likes: count(raw.likes),
            dislikes: count(raw.dislikes),
            comments: count(raw.comments),
            shares: count(raw.shares),
        }
    }

    fn to_raw(self) -> RawStats {
        let count = |v: u64| Some(i64::try_from(v).unwrap_or(i64::MAX));
        RawStats {
            views: count(self.views),
            likes: count(self.likes),
            dislikes: count(self.dislikes),
            comments: count(self.comments),
            shares: count(self.shares),
        }
    }
}

/// The original content of a repost. Has no origin of its own.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SharedPost {
    pub id: String,
    pub title: String,
    pub body_text: String,
    pub author_display_name: String,
    pub author_image_url: String,
    pub resolved_media_url: Option<String>,
    pub category_code: i32,
    pub created_at: Option<DateTime<Utc>>,
    pub stats: Stats,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Origin {
    Original,
    Repost(Box<SharedPost>),
}

/// A listing item ready for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedItem {
    pub id: String,
    pub title: String,
    pub body_text: String,
    pub author_display_name: String,
    pub author_image_url: String,
    /// The item's own media, if any.
    pub resolved_media_url: Option<String>,
    /// Always set: own media, the original's media, or the placeholder.
    pub display_image: String,
    pub category_code: i32,
    pub created_at: Option<DateTime<Utc>>,
    pub stats: Stats,
    pub is_saved: bool,
    pub origin: Origin,
}

impl FeedItem {
    pub fn is_repost(&self) -> bool {
        matches!(self.origin, Origin::Repost(_))
    }

    pub fn shared(&self) -> Option<&SharedPost> {
        match &self.origin {
            Origin::Original => None,
            Origin::Repost(shared) => Some(shared),
        }
    }

    /// Own title, else the original's, else [`UNTITLED`].
    pub fn display_title(&self) -> &str {
        if !self.title.trim().is_empty() {
            return &self.title;
        }
        match self.shared() {
            Some(shared) if !shared.title.trim().is_empty() => &shared.title,
            _ => UNTITLED,
        }
    }

    /// Own body, else the original's. May be empty.
    pub fn display_body(&self) -> &str {
        if !self.body_text.trim().is_empty() {
            return &self.body_text;
        }
        self.shared().map_or("", |shared| shared.body_text.as_str())
    }

    pub fn category(&self) -> &'static catalog::CategoryTheme {
        catalog::lookup(self.category_code)
    }

    /// Wire form that normalizes back to `self`.
    pub fn to_raw(&self) -> RawFeedItem {
        RawFeedItem {
            is_saved: Some(self.is_saved),
            parent_post: self.shared().map(|shared| Box::new(shared.to_raw())),
            ..core_to_raw(
                &self.id,
                &self.title,
                &self.body_text,
                &self.author_display_name,
                &self.author_image_url,
                self.resolved_media_url.as_deref(),
                self.category_code,
                self.created_at,
                self.stats,
            )
        }
    }
}

impl SharedPost {
    fn to_raw(&self) -> RawFeedItem {
        core_to_raw(
            &self.id,
            &self.title,
            &self.body_text,
            &self.author_display_name,
            &self.author_image_url,
            self.resolved_media_url.as_deref(),
            self.category_code,
            self.created_at,
            self.stats,
        )
    }
}

#[allow(clippy::too_many_arguments)]
fn core_to_raw(
    id: &str,
    title: &str,
    body_text: &str,
    author: &str,
    author_image: &str,
    media: Option<&str>,
    category_code: i32,
    created_at: Option<DateTime<Utc>>,
    stats: Stats,
) -> RawFeedItem {
    RawFeedItem {
        id: Some(RawId::Text(id.to_string())),
        title: Some(title.to_string()),
        content: Some(body_text.to_string()),
        author_name: Some(author.to_string()),
        author_image: Some(author_image.to_string()),
        image_url: media.map(str::to_string),
        category: Some(category_code),
        created_at: created_at.map(|dt| dt.to_rfc3339()),
        stats: Some(stats.to_raw()),
        ..RawFeedItem::default()
    }
}

/// Normalize one raw item.
pub fn normalize(raw: &RawFeedItem, media: &MediaResolver) -> FeedItem {
    let shared = raw
        .parent_post
        .as_deref()
        .map(|parent| normalize_shared(parent, media));

    let own = normalize_shared(raw, media);
    let display_image = own
        .resolved_media_url
        .clone()
        .or_else(|| shared.as_ref().and_then(|s| s.resolved_media_url.clone()))
        .unwrap_or_else(|| media.default_image().to_string());

    // UI-local flag wins over the backend's view of the same thing.
    let is_saved = raw.is_saved.or(raw.is_saved_by_user).unwrap_or(false);

    FeedItem {
        id: own.id,
        title: own.title,
        body_text: own.body_text,
        author_display_name: own.author_display_name,
        author_image_url: own.author_image_url,
        resolved_media_url: own.resolved_media_url,
        display_image,
        category_code: own.category_code,
        created_at: own.created_at,
        stats: own.stats,
        is_saved,
        origin: match shared {
            Some(shared) => Origin::Repost(Box::new(shared)),
            None => Origin::Original,
        },
    }
}

/// Normalize every item of a page, in order.
pub fn normalize_all(raw: &[RawFeedItem], media: &MediaResolver) -> Vec<FeedItem> {
    raw.iter().map(|item| normalize(item, media)).collect()
}

/// Fields shared by items and reposted originals. Ignores `parent_post`.
fn normalize_shared(raw: &RawFeedItem, media: &MediaResolver) -> SharedPost {
    let user = raw.user.as_ref();

    let author_display_name = non_blank(raw.author_name.as_deref())
        .or_else(|| non_blank(user.and_then(|u| u.display_name.as_deref())))
        .map(str::to_string)
        .or_else(|| {
            let first = user.and_then(|u| u.first_name.as_deref()).unwrap_or("");
            let last = user.and_then(|u| u.last_name.as_deref()).unwrap_or("");
            let full = format!("{} {}", first.trim(), last.trim());
            non_blank(Some(full.as_str())).map(|s| s.trim().to_string())
        })
        .unwrap_or_else(|| UNKNOWN_AUTHOR.to_string());

    let author_image_url = [
        raw.author_image.as_deref(),
        user.and_then(|u| u.profile_image.as_deref()),
    ]
    .into_iter()
    .flatten()
    .find_map(|r| media.resolve(r))
    .unwrap_or_else(|| media.default_avatar().to_string());

    let first_attachment = raw
        .attachments
        .as_deref()
        .and_then(|a| a.first())
        .and_then(|a: &RawAttachment| a.url.as_deref());
    let resolved_media_url = [first_attachment, raw.image_url.as_deref()]
        .into_iter()
        .flatten()
        .find_map(|r| media.resolve(r));

    SharedPost {
        id: raw.id.as_ref().map(RawId::to_string).unwrap_or_default(),
        title: raw.title.clone().unwrap_or_default(),
        body_text: raw.content.clone().unwrap_or_default(),
        author_display_name,
        author_image_url,
        resolved_media_url,
        category_code: raw.category.unwrap_or(catalog::GENERAL.code),
        created_at: raw.created_at.as_deref().and_then(parse_timestamp),
        stats: Stats::from_raw(raw.stats.as_ref()),
    }
}

fn non_blank(s: Option<&str>) -> Option<&str> {
    s.filter(|s| !s.trim().is_empty())
}

/// RFC 3339, or a naive ISO timestamp taken as UTC.
pub fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| naive.and_utc())
}

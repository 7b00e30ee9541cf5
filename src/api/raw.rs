//! Wire types for the platform API.
//!
//! The backend is inconsistent about casing, so every field accepts its
//! camelCase name and the PascalCase spelling via `alias`. Everything is
//! optional here; defaults are applied by [`crate::normalize`].

use crate::util::{single_line, strip_control_chars};
use serde::{Deserialize, Deserializer, Serialize};

/// Identifier that may arrive as a JSON number or a string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawId {
    Num(i64),
    Text(String),
}

impl std::fmt::Display for RawId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Num(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawStats {
    #[serde(alias = "Views")]
    pub views: Option<i64>,
    #[serde(alias = "Likes")]
    pub likes: Option<i64>,
    #[serde(alias = "Dislikes")]
    pub dislikes: Option<i64>,
    #[serde(alias = "Comments")]
    pub comments: Option<i64>,
    #[serde(alias = "Shares")]
    pub shares: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawAttachment {
    #[serde(alias = "Url", alias = "filePath", alias = "FilePath")]
    pub url: Option<String>,
}

/// Author block some endpoints nest instead of flat author fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawUser {
    #[serde(alias = "DisplayName")]
    pub display_name: Option<String>,
    #[serde(alias = "FirstName")]
    pub first_name: Option<String>,
    #[serde(alias = "LastName")]
    pub last_name: Option<String>,
    #[serde(alias = "ProfileImage")]
    pub profile_image: Option<String>,
}

/// A listing item exactly as the API sent it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawFeedItem {
    #[serde(alias = "Id", skip_serializing_if = "Option::is_none")]
    pub id: Option<RawId>,
    #[serde(alias = "Title", skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(alias = "Content", skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(alias = "AuthorName", skip_serializing_if = "Option::is_none")]
    pub author_name: Option<String>,
    #[serde(alias = "AuthorImage", skip_serializing_if = "Option::is_none")]
    pub author_image: Option<String>,
    #[serde(alias = "User", skip_serializing_if = "Option::is_none")]
    pub user: Option<RawUser>,
    #[serde(alias = "ImageUrl", skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(alias = "Attachments", skip_serializing_if = "Option::is_none")]
    pub attachments: Option<Vec<RawAttachment>>,
    #[serde(
        alias = "Category",
        alias = "categoryId",
        alias = "CategoryId",
        skip_serializing_if = "Option::is_none"
    )]
    pub category: Option<i32>,
    #[serde(alias = "CreatedAt", skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(alias = "Stats", skip_serializing_if = "Option::is_none")]
    pub stats: Option<RawStats>,
    /// Client-side saved flag carried on already-normalized data.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_saved: Option<bool>,
    #[serde(alias = "IsSavedByUser", skip_serializing_if = "Option::is_none")]
    pub is_saved_by_user: Option<bool>,
    #[serde(
        alias = "ParentPost",
        alias = "sharedPost",
        alias = "SharedPost",
        alias = "originalPost",
        alias = "OriginalPost",
        skip_serializing_if = "Option::is_none"
    )]
    pub parent_post: Option<Box<RawFeedItem>>,
}

/// An entry from the location typeahead.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    #[serde(alias = "Id")]
    pub id: i64,
    #[serde(default, alias = "Borough", deserialize_with = "null_as_empty")]
    pub borough: String,
    #[serde(default, alias = "Neighborhood", deserialize_with = "null_as_empty")]
    pub neighborhood: String,
    #[serde(default, alias = "ZipCode", deserialize_with = "null_as_empty")]
    pub zip_code: String,
}

impl Location {
    /// "Neighborhood, Borough 12345", skipping empty parts. Terminal
    /// control sequences and line breaks are stripped.
    pub fn label(&self) -> String {
        let mut label = String::new();
        for part in [&self.neighborhood, &self.borough] {
            if part.is_empty() {
                continue;
            }
            if !label.is_empty() {
                label.push_str(", ");
            }
            label.push_str(part);
        }
        if !self.zip_code.is_empty() {
            if !label.is_empty() {
                label.push(' ');
            }
            label.push_str(&self.zip_code);
        }
        let label = single_line(&strip_control_chars(&label));
        if label.is_empty() {
            return format!("Location {}", self.id);
        }
        label
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn location_label_drops_escape_sequences() {
        let location = Location {
            id: 9,
            borough: "\x1b]0;pwned\x07Bronx".into(),
            neighborhood: "Mott\nHaven\x1b[2J".into(),
            zip_code: "10454".into(),
        };
        let label = location.label();
        assert_eq!(label, "Mott Haven, Bronx 10454");
        assert!(!label.contains('\x1b'));

        let junk = Location {
            id: 4,
            borough: "\x1b[31m".into(),
            neighborhood: String::new(),
            zip_code: String::new(),
        };
        assert_eq!(junk.label(), "Location 4");
    }

    #[test]
    fn camel_and_pascal_decode_alike() {
        let camel: RawFeedItem = serde_json::from_value(json!({
            "id": 7,
            "title": "Block party",
            "imageUrl": "https://cdn.example.org/p.png",
            "stats": { "views": 3, "likes": 1 },
            "isSavedByUser": true
        }))
        .unwrap();
        let pascal: RawFeedItem = serde_json::from_value(json!({
            "Id": 7,
            "Title": "Block party",
            "ImageUrl": "https://cdn.example.org/p.png",
            "Stats": { "Views": 3, "Likes": 1 },
            "IsSavedByUser": true
        }))
        .unwrap();
        assert_eq!(camel, pascal);
    }

    #[test]
    fn nulls_and_missing_fields_are_none() {
        let raw: RawFeedItem = serde_json::from_value(json!({
            "id": "abc",
            "title": null,
            "attachments": null,
            "stats": null
        }))
        .unwrap();
        assert_eq!(raw.id, Some(RawId::Text("abc".into())));
        assert!(raw.title.is_none());
        assert!(raw.attachments.is_none());
        assert!(raw.stats.is_none());
        assert!(raw.parent_post.is_none());
    }

    #[test]
    fn shared_post_aliases() {
        for key in ["parentPost", "ParentPost", "sharedPost", "originalPost"] {
            let raw: RawFeedItem =
                serde_json::from_value(json!({ "id": 1, key: { "id": 2, "title": "orig" } }))
                    .unwrap();
            let parent = raw.parent_post.expect(key);
            assert_eq!(parent.title.as_deref(), Some("orig"));
        }
    }

    #[test]
    fn location_decodes_with_nulls() {
        let loc: Location = serde_json::from_value(json!({
            "Id": 3,
            "Borough": "Brooklyn",
            "Neighborhood": null,
            "ZipCode": "11215"
        }))
        .unwrap();
        assert_eq!(loc.neighborhood, "");
        assert_eq!(loc.label(), "Brooklyn 11215");
    }

    #[test]
    fn location_label_variants() {
        let loc = Location {
            id: 9,
            borough: "Queens".into(),
            neighborhood: "Astoria".into(),
            zip_code: "11102".into(),
        };
        assert_eq!(loc.label(), "Astoria, Queens 11102");

        let empty = Location {
            id: 9,
            borough: String::new(),
            neighborhood: String::new(),
            zip_code: String::new(),
        };
        assert_eq!(empty.label(), "Location 9");
    }
}

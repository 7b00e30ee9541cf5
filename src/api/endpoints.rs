use crate::catalog;

/// Path of the location typeahead endpoint.
pub const LOCATION_SEARCH_PATH: &str = "/api/locations/search";

/// A paginated listing exposed by the platform API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resource {
    Posts,
    Initiatives,
    Housing,
    Jobs,
    Events,
    Organizations,
}

impl Resource {
    pub const ALL: [Resource; 6] = [
        Resource::Posts,
        Resource::Initiatives,
        Resource::Housing,
        Resource::Jobs,
        Resource::Events,
        Resource::Organizations,
    ];

    pub fn path(self) -> &'static str {
        match self {
            Self::Posts => "/api/posts",
            Self::Initiatives => "/api/initiatives",
            Self::Housing => "/api/housing",
            Self::Jobs => "/api/jobs",
            Self::Events => "/api/events",
            Self::Organizations => "/api/organizations",
        }
    }

    /// Value the endpoint expects for "all categories".
    ///
    /// Only the posts endpoint wants one (`Category=0`); the dedicated
    /// listings reject an explicit zero and must have the key omitted.
    pub fn category_sentinel(self) -> Option<i32> {
        match self {
            Self::Posts => Some(0),
            _ => None,
        }
    }

    /// Category the listing is bound to when opened.
    pub fn default_category(self) -> Option<i32> {
        match self {
            Self::Posts => None,
            Self::Initiatives => Some(catalog::INITIATIVES),
            Self::Housing => Some(catalog::HOUSING),
            Self::Jobs => Some(catalog::JOBS),
            Self::Events => Some(catalog::EVENTS),
            Self::Organizations => Some(catalog::ORGANIZATIONS),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Posts => "posts",
            Self::Initiatives => "initiatives",
            Self::Housing => "housing",
            Self::Jobs => "jobs",
            Self::Events => "events",
            Self::Organizations => "organizations",
        }
    }

    /// Parse a resource name (case-insensitive).
    pub fn from_name(s: &str) -> Option<Self> {
        let s = s.to_ascii_lowercase();
        Self::ALL.into_iter().find(|r| r.name() == s)
    }
}

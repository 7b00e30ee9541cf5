//! Category registry: display metadata keyed by the platform's category codes.
//!
//! The table is a `static` literal. There is no way to add or change entries at
//! runtime; [`lookup`] falls back to [`GENERAL`] for codes the table does not
//! know, since the backend may introduce categories before the client does.

/// A navigation shortcut shown next to a category's listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavLink {
    pub label: &'static str,
    pub path: &'static str,
    pub icon: &'static str,
}

/// Display metadata for one category code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CategoryTheme {
    pub code: i32,
    pub label: &'static str,
    /// Hex color, `#rgb` or `#rrggbb`.
    pub accent_color: &'static str,
    pub icon: &'static str,
    pub route_path: &'static str,
    pub links: &'static [NavLink],
}

/// Theme returned for unknown codes.
pub const GENERAL: CategoryTheme = CategoryTheme {
    code: 0,
    label: "General",
    accent_color: "#333",
    icon: "tag",
    route_path: "/feed",
    links: &[],
};

pub const COMMUNITY: i32 = 1;
pub const INITIATIVES: i32 = 2;
pub const EVENTS: i32 = 3;
pub const HOUSING: i32 = 4;
pub const JOBS: i32 = 5;
pub const ORGANIZATIONS: i32 = 6;

static CATEGORIES: [CategoryTheme; 6] = [
    CategoryTheme {
        code: COMMUNITY,
        label: "Community",
        accent_color: "#1e88e5",
        icon: "people",
        route_path: "/feed/community",
        links: &[
            NavLink {
                label: "New post",
                path: "/posts/new",
                icon: "edit",
            },
            NavLink {
                label: "Tags",
                path: "/tags",
                icon: "tag",
            },
        ],
    },
    CategoryTheme {
        code: INITIATIVES,
        label: "Initiatives",
        accent_color: "#43a047",
        icon: "flag",
        route_path: "/initiatives",
        links: &[
            NavLink {
                label: "Start an initiative",
                path: "/initiatives/new",
                icon: "add",
            },
            NavLink {
                label: "My initiatives",
                path: "/initiatives/mine",
                icon: "person",
            },
        ],
    },
    CategoryTheme {
        code: EVENTS,
        label: "Events",
        accent_color: "#8e24aa",
        icon: "calendar",
        route_path: "/events",
        links: &[
            NavLink {
                label: "This week",
                path: "/events/week",
                icon: "calendar",
            },
            NavLink {
                label: "Host an event",
                path: "/events/new",
                icon: "add",
            },
        ],
    },
    CategoryTheme {
        code: HOUSING,
        label: "Housing",
        accent_color: "#f4511e",
        icon: "home",
        route_path: "/housing",
        links: &[
            NavLink {
                label: "List a unit",
                path: "/housing/new",
                icon: "add",
            },
            NavLink {
                label: "Saved listings",
                path: "/housing/saved",
                icon: "bookmark",
            },
            NavLink {
                label: "Tenant resources",
                path: "/housing/resources",
                icon: "info",
            },
        ],
    },
    CategoryTheme {
        code: JOBS,
        label: "Jobs",
        accent_color: "#fdd835",
        icon: "work",
        route_path: "/jobs",
        links: &[
            NavLink {
                label: "Post a job",
                path: "/jobs/new",
                icon: "add",
            },
            NavLink {
                label: "Applications",
                path: "/jobs/applications",
                icon: "inbox",
            },
        ],
    },
    CategoryTheme {
        code: ORGANIZATIONS,
        label: "Organizations",
        accent_color: "#00897b",
        icon: "business",
        route_path: "/organizations",
        links: &[
            NavLink {
                label: "Directory",
                path: "/organizations/directory",
                icon: "list",
            },
            NavLink {
                label: "Register an organization",
                path: "/organizations/new",
                icon: "add",
            },
        ],
    },
];

/// Look up the theme for `code`, falling back to [`GENERAL`].
pub fn lookup(code: i32) -> &'static CategoryTheme {
    CATEGORIES
        .iter()
        .find(|t| t.code == code)
        .unwrap_or(&GENERAL)
}

/// Like [`lookup`] for an optional code; `None` maps to [`GENERAL`].
pub fn lookup_opt(code: Option<i32>) -> &'static CategoryTheme {
    code.map(lookup).unwrap_or(&GENERAL)
}

/// All registered categories in display order.
pub fn all() -> &'static [CategoryTheme] {
    &CATEGORIES
}

/// Position of `code` in [`all`], if registered.
pub fn position(code: i32) -> Option<usize> {
    CATEGORIES.iter().position(|t| t.code == code)
}

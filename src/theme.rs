//! Theme system for the TUI.
//!
//! Semantic color roles map to ratatui `Style` values. `ThemeVariant`
//! selects the Dark or Light palette and `StyleMap` resolves role names to
//! styles. Category accents come from the registry as hex strings and are
//! converted with [`accent_color`].

use ratatui::style::{Color, Modifier, Style};
use std::collections::HashMap;

// ============================================================================
// Theme Variant
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThemeVariant {
    Dark,
    Light,
}

impl ThemeVariant {
    /// Parse a variant name (case-insensitive).
    pub fn from_str_name(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "dark" => Some(Self::Dark),
            "light" => Some(Self::Light),
            _ => None,
        }
    }

    pub fn palette(self) -> ColorPalette {
        match self {
            Self::Dark => ColorPalette::dark(),
            Self::Light => ColorPalette::light(),
        }
    }

    /// Dark → Light → Dark.
    pub fn next(self) -> Self {
        match self {
            Self::Dark => Self::Light,
            Self::Light => Self::Dark,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Dark => "Dark",
            Self::Light => "Light",
        }
    }
}

// ============================================================================
// Color Palette
// ============================================================================

/// Every semantic UI role and its `Style`.
#[derive(Debug, Clone)]
pub struct ColorPalette {
    // -- Item list --
    pub item_title: Style,
    pub item_selected: Style,
    pub item_meta: Style,
    pub item_body: Style,
    pub item_stats: Style,
    pub item_repost: Style,
    pub item_saved: Style,

    // -- Category sidebar --
    pub category_normal: Style,
    pub category_active: Style,
    pub nav_link: Style,

    // -- Pagination --
    pub page_current: Style,
    pub page_other: Style,
    pub page_summary: Style,

    // -- Feedback --
    pub loading: Style,
    pub error_inline: Style,
    pub empty_state: Style,

    // -- Chrome --
    pub status_bar: Style,
    pub search_prompt: Style,
    pub panel_border: Style,
    pub panel_border_focused: Style,
    pub overlay_border: Style,
    pub overlay_selected: Style,
}

impl ColorPalette {
    fn dark() -> Self {
        Self {
            item_title: Style::default().add_modifier(Modifier::BOLD),
            item_selected: Style::default().bg(Color::DarkGray).fg(Color::White),
            item_meta: Style::default().fg(Color::Gray),
            item_body: Style::default(),
            item_stats: Style::default().fg(Color::DarkGray),
            item_repost: Style::default().fg(Color::Cyan),
            item_saved: Style::default().fg(Color::Yellow),

            category_normal: Style::default(),
            category_active: Style::default().add_modifier(Modifier::BOLD | Modifier::REVERSED),
            nav_link: Style::default().fg(Color::Gray),

            page_current: Style::default()
                .fg(Color::Black)
                .bg(Color::White)
                .add_modifier(Modifier::BOLD),
            page_other: Style::default().fg(Color::Gray),
            page_summary: Style::default().fg(Color::DarkGray),

            loading: Style::default().fg(Color::Yellow),
            error_inline: Style::default().fg(Color::Red),
            empty_state: Style::default().fg(Color::DarkGray),

            status_bar: Style::default().bg(Color::DarkGray).fg(Color::White),
            search_prompt: Style::default().fg(Color::Yellow),
            panel_border: Style::default(),
            panel_border_focused: Style::default().fg(Color::Cyan),
            overlay_border: Style::default().fg(Color::Yellow),
            overlay_selected: Style::default()
                .bg(Color::DarkGray)
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        }
    }

    fn light() -> Self {
        Self {
            item_title: Style::default()
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),
            item_selected: Style::default().bg(Color::Blue).fg(Color::White),
            item_meta: Style::default().fg(Color::DarkGray),
            item_body: Style::default().fg(Color::Black),
            item_stats: Style::default().fg(Color::DarkGray),
            item_repost: Style::default().fg(Color::Blue),
            item_saved: Style::default().fg(Color::Magenta),

            category_normal: Style::default().fg(Color::Black),
            category_active: Style::default().add_modifier(Modifier::BOLD | Modifier::REVERSED),
            nav_link: Style::default().fg(Color::DarkGray),

            page_current: Style::default()
                .fg(Color::White)
                .bg(Color::Blue)
                .add_modifier(Modifier::BOLD),
            page_other: Style::default().fg(Color::DarkGray),
            page_summary: Style::default().fg(Color::DarkGray),

            loading: Style::default().fg(Color::Magenta),
            error_inline: Style::default().fg(Color::Red),
            empty_state: Style::default().fg(Color::DarkGray),

            status_bar: Style::default().bg(Color::White).fg(Color::Black),
            search_prompt: Style::default().fg(Color::Blue),
            panel_border: Style::default().fg(Color::DarkGray),
            panel_border_focused: Style::default().fg(Color::Blue),
            overlay_border: Style::default().fg(Color::Magenta),
            overlay_selected: Style::default()
                .bg(Color::Blue)
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        }
    }
}

// ============================================================================
// Style Map
// ============================================================================

/// String-keyed style lookup used by the renderers.
#[derive(Debug, Clone)]
pub struct StyleMap {
    map: HashMap<&'static str, Style>,
}

const ROLE_COUNT: usize = 22;

/// All semantic role names, in declaration order.
const ROLE_NAMES: [&str; ROLE_COUNT] = [
    "item_title",
    "item_selected",
    "item_meta",
    "item_body",
    "item_stats",
    "item_repost",
    "item_saved",
    "category_normal",
    "category_active",
    "nav_link",
    "page_current",
    "page_other",
    "page_summary",
    "loading",
    "error_inline",
    "empty_state",
    "status_bar",
    "search_prompt",
    "panel_border",
    "panel_border_focused",
    "overlay_border",
    "overlay_selected",
];

impl StyleMap {
    pub fn from_palette(p: &ColorPalette) -> Self {
        let styles: [Style; ROLE_COUNT] = [
            p.item_title,
            p.item_selected,
            p.item_meta,
            p.item_body,
            p.item_stats,
            p.item_repost,
            p.item_saved,
            p.category_normal,
            p.category_active,
            p.nav_link,
            p.page_current,
            p.page_other,
            p.page_summary,
            p.loading,
            p.error_inline,
            p.empty_state,
            p.status_bar,
            p.search_prompt,
            p.panel_border,
            p.panel_border_focused,
            p.overlay_border,
            p.overlay_selected,
        ];

        let map = ROLE_NAMES.into_iter().zip(styles).collect();
        Self { map }
    }

    /// Style for `role`, or `Style::default()` for unknown roles.
    pub fn resolve(&self, role: &str) -> Style {
        self.map.get(role).copied().unwrap_or_default()
    }
}

// ============================================================================
// Category accents
// ============================================================================

/// Parse `#rgb` or `#rrggbb` into an RGB color.
pub fn parse_hex_color(hex: &str) -> Option<Color> {
    let digits = hex.trim().strip_prefix('#')?;
    if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let channel = |s: &str| u8::from_str_radix(s, 16).ok();
    match digits.len() {
        3 => {
            let mut rgb = [0u8; 3];
            for (slot, c) in rgb.iter_mut().zip(digits.chars()) {
                let v = c.to_digit(16)? as u8;
                *slot = v * 16 + v;
            }
            Some(Color::Rgb(rgb[0], rgb[1], rgb[2]))
        }
        6 => Some(Color::Rgb(
            channel(&digits[0..2])?,
            channel(&digits[2..4])?,
            channel(&digits[4..6])?,
        )),
        _ => None,
    }
}

/// Terminal color for a registry accent. Malformed values render gray.
pub fn accent_color(hex: &str) -> Color {
    parse_hex_color(hex).unwrap_or(Color::Gray)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog;

    #[test]
    fn dark_selection_is_gray_on_white() {
        let palette = ThemeVariant::Dark.palette();
        assert_eq!(
            palette.item_selected,
            Style::default().bg(Color::DarkGray).fg(Color::White)
        );
    }

    #[test]
    fn light_palette_differs_from_dark() {
        let dark = ThemeVariant::Dark.palette();
        let light = ThemeVariant::Light.palette();
        assert_ne!(dark.item_selected, light.item_selected);
        assert_ne!(dark.page_current, light.page_current);
    }

    #[test]
    fn variant_from_str_name() {
        assert_eq!(ThemeVariant::from_str_name("Light"), Some(ThemeVariant::Light));
        assert_eq!(ThemeVariant::from_str_name("DARK"), Some(ThemeVariant::Dark));
        assert_eq!(ThemeVariant::from_str_name("neon"), None);
        assert_eq!(ThemeVariant::Dark.next().next(), ThemeVariant::Dark);
    }

    #[test]
    fn style_map_has_every_role() {
        let palette = ThemeVariant::Dark.palette();
        let sm = StyleMap::from_palette(&palette);
        assert_eq!(sm.map.len(), ROLE_NAMES.len());
        assert_eq!(sm.resolve("page_current"), palette.page_current);
        assert_eq!(sm.resolve("error_inline"), palette.error_inline);
        assert_eq!(sm.resolve("nonexistent_role"), Style::default());
    }

    #[test]
    fn hex_colors_parse() {
        assert_eq!(parse_hex_color("#f4511e"), Some(Color::Rgb(0xf4, 0x51, 0x1e)));
        assert_eq!(parse_hex_color("#333"), Some(Color::Rgb(0x33, 0x33, 0x33)));
        assert_eq!(parse_hex_color("#FDD835"), Some(Color::Rgb(0xfd, 0xd8, 0x35)));
        assert_eq!(parse_hex_color("f4511e"), None);
        assert_eq!(parse_hex_color("#12345"), None);
        assert_eq!(parse_hex_color("#ggg"), None);
        assert_eq!(parse_hex_color("#é1"), None);
    }

    #[test]
    fn every_registered_accent_parses() {
        for theme in catalog::all() {
            assert!(
                parse_hex_color(theme.accent_color).is_some(),
                "bad accent for {}",
                theme.label
            );
        }
        assert!(parse_hex_color(catalog::GENERAL.accent_color).is_some());
    }

    #[test]
    fn malformed_accent_falls_back() {
        assert_eq!(accent_color("teal"), Color::Gray);
    }
}

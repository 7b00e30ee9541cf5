use std::borrow::Cow;

use chrono::{DateTime, Utc};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

const ELLIPSIS: &str = "…";
const ELLIPSIS_WIDTH: usize = 1;

/// Terminal columns occupied by `s`.
///
/// ```
/// use civicfeed::util::display_width;
///
/// assert_eq!(display_width("Block party"), 11);
/// assert_eq!(display_width("公园"), 4);
/// ```
pub fn display_width(s: &str) -> usize {
    UnicodeWidthStr::width(s)
}

/// Fit `s` into `max_width` columns, ending with `…` when cut.
///
/// Borrowed when the input already fits. Wide characters are never split.
///
/// ```
/// use civicfeed::util::truncate_to_width;
///
/// assert_eq!(truncate_to_width("Community garden", 20), "Community garden");
/// assert_eq!(truncate_to_width("Community garden", 10), "Community…");
/// assert_eq!(truncate_to_width("Community garden", 0), "");
/// ```
pub fn truncate_to_width(s: &str, max_width: usize) -> Cow<'_, str> {
    if display_width(s) <= max_width {
        return Cow::Borrowed(s);
    }
    if max_width == 0 {
        return Cow::Borrowed("");
    }

    let budget = max_width - ELLIPSIS_WIDTH;
    let mut used = 0;
    let mut end = 0;
    for (idx, c) in s.char_indices() {
        let w = UnicodeWidthChar::width(c).unwrap_or(0);
        if used + w > budget {
            break;
        }
        used += w;
        end = idx + c.len_utf8();
    }
    Cow::Owned(format!("{}{}", s[..end].trim_end(), ELLIPSIS))
}

/// Remove terminal control characters and escape sequences from
/// server-supplied text.
///
/// CSI (`ESC [ … final`) and OSC (`ESC ] … BEL` or `ESC ] … ESC \`)
/// sequences are dropped whole. Tab, newline and carriage return survive.
pub fn strip_control_chars(s: &str) -> Cow<'_, str> {
    if !s.chars().any(is_stripped) {
        return Cow::Borrowed(s);
    }

    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\x1b' => match chars.peek() {
                Some('[') => {
                    chars.next();
                    // parameters and intermediates, then one final byte
                    for c in chars.by_ref() {
                        if ('\x40'..='\x7e').contains(&c) {
                            break;
                        }
                    }
                }
                Some(']') => {
                    chars.next();
                    while let Some(c) = chars.next() {
                        if c == '\x07' {
                            break;
                        }
                        if c == '\x1b' && chars.peek() == Some(&'\\') {
                            chars.next();
                            break;
                        }
                    }
                }
                _ => {}
            },
            c if is_stripped(c) => {}
            c => out.push(c),
        }
    }
    Cow::Owned(out)
}

fn is_stripped(c: char) -> bool {
    (c.is_control() && !matches!(c, '\t' | '\n' | '\r')) || c == '\x1b'
}

/// Drop HTML tags and decode the handful of entities rich-text bodies use.
///
/// Block-level closing tags and `<br>` become line breaks.
pub fn strip_html(s: &str) -> Cow<'_, str> {
    if !s.contains('<') && !s.contains('&') {
        return Cow::Borrowed(s);
    }

    let mut out = String::with_capacity(s.len());
    let mut rest = s;
    while let Some(open) = rest.find('<') {
        out.push_str(&rest[..open]);
        let Some(close) = rest[open..].find('>') else {
            out.push_str(&rest[open..]);
            rest = "";
            break;
        };
        let tag = rest[open + 1..open + close]
            .trim_start_matches('/')
            .split(|c: char| c.is_whitespace() || c == '/')
            .next()
            .unwrap_or("")
            .to_ascii_lowercase();
        if matches!(tag.as_str(), "br" | "p" | "div" | "li" | "h1" | "h2" | "h3") {
            out.push('\n');
        }
        rest = &rest[open + close + 1..];
    }
    out.push_str(rest);

    for (entity, text) in [
        ("&nbsp;", " "),
        ("&lt;", "<"),
        ("&gt;", ">"),
        ("&quot;", "\""),
        ("&#39;", "'"),
        ("&amp;", "&"),
    ] {
        if out.contains(entity) {
            out = out.replace(entity, text);
        }
    }
    Cow::Owned(out)
}

/// Collapse all whitespace runs, newlines included, into single spaces.
pub fn single_line(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Short age like `5m`, `3h`, `2d`, falling back to a date after a month.
pub fn relative_time(at: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let secs = (now - at).num_seconds();
    match secs {
        s if s < 60 => "just now".to_string(),
        s if s < 3_600 => format!("{}m", s / 60),
        s if s < 86_400 => format!("{}h", s / 3_600),
        s if s < 30 * 86_400 => format!("{}d", s / 86_400),
        _ => at.format("%Y-%m-%d").to_string(),
    }
}

/// `999`, `1.2k`, `3.4M`.
pub fn compact_count(n: u64) -> String {
    match n {
        0..=999 => n.to_string(),
        1_000..=999_999 => format!("{:.1}k", n as f64 / 1_000.0).replace(".0k", "k"),
        _ => format!("{:.1}M", n as f64 / 1_000_000.0).replace(".0M", "M"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn truncation_keeps_short_text_borrowed() {
        assert!(matches!(truncate_to_width("Jobs", 10), Cow::Borrowed("Jobs")));
        assert_eq!(truncate_to_width("Jobs", 4), "Jobs");
    }

    #[test]
    fn truncation_appends_ellipsis() {
        assert_eq!(truncate_to_width("Affordable housing lottery", 12), "Affordable…");
        assert_eq!(truncate_to_width("Housing", 1), "…");
    }

    #[test]
    fn truncation_does_not_split_wide_chars() {
        // each CJK char is two columns
        assert_eq!(truncate_to_width("社区花园开放", 6), "社区…");
        assert!(display_width(&truncate_to_width("社区花园开放", 6)) <= 6);
    }

    #[test]
    fn strip_keeps_clean_text_borrowed() {
        let input = "Meeting at 7pm\n\tRoom 4";
        assert!(matches!(strip_control_chars(input), Cow::Borrowed(_)));
    }

    #[test]
    fn strip_removes_escape_sequences() {
        assert_eq!(strip_control_chars("\x1b[1;31mAlert\x1b[0m"), "Alert");
        assert_eq!(strip_control_chars("\x1b]0;title\x07ok"), "ok");
        assert_eq!(strip_control_chars("\x1b]8;;http://x\x1b\\link"), "link");
        assert_eq!(strip_control_chars("a\x00b\x7fc\x1bd"), "abcd");
    }

    #[test]
    fn strip_preserves_unicode() {
        assert_eq!(strip_control_chars("Café \x1b[2Jnoticias"), "Café noticias");
    }

    #[test]
    fn html_is_flattened() {
        assert_eq!(
            strip_html("<p>Join us&nbsp;<b>Saturday</b></p><p>Bring gloves &amp; bags</p>"),
            "\nJoin us Saturday\n\nBring gloves & bags\n"
        );
        assert_eq!(strip_html("line<br/>break"), "line\nbreak");
        assert!(matches!(strip_html("plain"), Cow::Borrowed(_)));
        assert_eq!(strip_html("a < b"), "a < b");
    }

    #[test]
    fn single_line_collapses_whitespace() {
        assert_eq!(single_line("  one\n\ntwo\tthree "), "one two three");
    }

    #[test]
    fn relative_time_buckets() {
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
        let ago = |secs| now - chrono::Duration::seconds(secs);
        assert_eq!(relative_time(ago(10), now), "just now");
        assert_eq!(relative_time(ago(5 * 60), now), "5m");
        assert_eq!(relative_time(ago(3 * 3600), now), "3h");
        assert_eq!(relative_time(ago(2 * 86_400), now), "2d");
        assert_eq!(relative_time(ago(90 * 86_400), now), "2024-03-03");
        // clock skew
        assert_eq!(relative_time(now + chrono::Duration::minutes(5), now), "just now");
    }

    #[test]
    fn compact_counts() {
        assert_eq!(compact_count(0), "0");
        assert_eq!(compact_count(999), "999");
        assert_eq!(compact_count(1_000), "1k");
        assert_eq!(compact_count(1_240), "1.2k");
        assert_eq!(compact_count(3_400_000), "3.4M");
    }
}

//! Escaping and the raw-HTML safety filter

/// Glyph shown in place of spaces when whitespace is visualized
pub const VISIBLE_SPACE: &str = "\u{2423}";

const NBSP: char = '\u{a0}';

/// Escape text content: `&`, `<`, `>`, and NUL (as U+FFFD).
pub fn escape_text(text: &str) -> String {
    escape(text, false, false)
}

/// Escape an attribute value: text escaping plus `"`.
pub fn escape_attr(text: &str) -> String {
    escape(text, true, false)
}

/// Escape literal (code) content, optionally showing spaces and NBSPs as [`VISIBLE_SPACE`].
pub fn escape_literal(text: &str, visible_space: bool) -> String {
    escape(text, false, visible_space)
}

/// Neutralize `--` so text cannot terminate an HTML comment early.
pub fn escape_comment(text: &str) -> String {
    text.replace("--", "-&#45;")
}

fn escape(text: &str, quotes: bool, visible_space: bool) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' if quotes => out.push_str("&quot;"),
            '\0' => out.push('\u{fffd}'),
            ' ' | NBSP if visible_space => out.push_str(VISIBLE_SPACE),
            _ => out.push(ch),
        }
    }
    out
}

const UNSAFE_MARKERS: [&str; 4] = ["<script", "</script", "<iframe", "</iframe"];

/// Whether raw HTML may be emitted verbatim. Checks are ASCII case-insensitive.
pub fn is_safe(html: &str) -> bool {
    let lowered = html.to_ascii_lowercase();
    !UNSAFE_MARKERS.iter().any(|marker| lowered.contains(marker))
}

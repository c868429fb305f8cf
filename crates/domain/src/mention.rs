//! Mention token scanning.
//!
//! A mention is `@` followed by one or more ASCII letters, digits, `_` or `-`.
//! Scanning never fails: text without mentions yields empty results.

use serde::{Deserialize, Serialize};

/// Marker that opens a mention token.
pub const MENTION_MARKER: char = '@';

/// Returns whether `value` may appear inside a mention name.
#[must_use]
pub fn is_mention_char(value: char) -> bool {
    value.is_ascii_alphanumeric() || value == '_' || value == '-'
}

/// Returns the distinct mentioned names in first-occurrence order.
///
/// Names are case-sensitive: `@Bob` and `@bob` are different mentions.
#[must_use]
pub fn extract_all(text: &str) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();

    for (_, name) in scan(text) {
        if !names.iter().any(|known| known == name) {
            names.push(name.to_owned());
        }
    }

    names
}

/// Splits text into plain and mention segments for display.
#[must_use]
pub fn render_highlighted(text: &str) -> HighlightedText {
    let mut segments = Vec::new();
    let mut cursor = 0;

    for (start, name) in scan(text) {
        if start > cursor {
            segments.push(MentionSegment::Text(text[cursor..start].to_owned()));
        }
        segments.push(MentionSegment::Mention(name.to_owned()));
        cursor = start + MENTION_MARKER.len_utf8() + name.len();
    }

    if cursor < text.len() {
        segments.push(MentionSegment::Text(text[cursor..].to_owned()));
    }

    HighlightedText { segments }
}

/// Yields `(marker_offset, name)` for every mention in `text`.
fn scan(text: &str) -> impl Iterator<Item = (usize, &str)> {
    let mut offset = 0;

    std::iter::from_fn(move || {
        while let Some(relative) = text[offset..].find(MENTION_MARKER) {
            let start = offset + relative;
            let name_start = start + MENTION_MARKER.len_utf8();
            let name_len = text[name_start..]
                .find(|value: char| !is_mention_char(value))
                .unwrap_or(text.len() - name_start);

            if name_len == 0 {
                offset = name_start;
                continue;
            }

            offset = name_start + name_len;
            return Some((start, &text[name_start..offset]));
        }

        offset = text.len();
        None
    })
}

/// One piece of highlighted text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum MentionSegment {
    /// Text outside any mention.
    Text(String),
    /// A mention; holds the name without the marker.
    Mention(String),
}

/// Display form of a message body with its mentions marked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighlightedText {
    segments: Vec<MentionSegment>,
}

impl HighlightedText {
    /// Returns the segments in text order.
    #[must_use]
    pub fn segments(&self) -> &[MentionSegment] {
        &self.segments
    }

    /// Returns the mention names in text order, duplicates included.
    pub fn mentions(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().filter_map(|segment| match segment {
            MentionSegment::Mention(name) => Some(name.as_str()),
            MentionSegment::Text(_) => None,
        })
    }

    /// Reassembles the original text.
    #[must_use]
    pub fn to_plain_text(&self) -> String {
        let mut value = String::new();
        for segment in &self.segments {
            match segment {
                MentionSegment::Text(text) => value.push_str(text),
                MentionSegment::Mention(name) => {
                    value.push(MENTION_MARKER);
                    value.push_str(name);
                }
            }
        }
        value
    }

    /// Renders HTML where each mention is a `span.mention` carrying `data-username`.
    #[must_use]
    pub fn to_html(&self) -> String {
        let mut html = String::new();
        for segment in &self.segments {
            match segment {
                MentionSegment::Text(text) => html.push_str(&escape_html(text)),
                MentionSegment::Mention(name) => {
                    html.push_str(&format!(
                        "<span class=\"mention\" data-username=\"{name}\">@{name}</span>"
                    ));
                }
            }
        }
        html
    }
}

fn escape_html(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for character in value.chars() {
        match character {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}

/// Mention token currently being typed in front of the cursor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveMention {
    /// Byte offset of the `@` marker.
    pub start: usize,
    /// Byte offset of the cursor; the token spans `start..end`.
    pub end: usize,
    /// Partial name typed after the marker, possibly empty.
    pub query: String,
}

/// Finds the mention token under composition at `cursor`.
///
/// Scans backward from the cursor to the nearest whitespace or the start of
/// the text. The scanned word must contain exactly one `@`; the query is what
/// follows it. A cursor past the end or inside a character is clamped.
#[must_use]
pub fn active_token(text: &str, cursor: usize) -> Option<ActiveMention> {
    let cursor = floor_char_boundary(text, cursor);
    let before_cursor = &text[..cursor];
    let word_start = before_cursor
        .char_indices()
        .rev()
        .find(|(_, value)| value.is_whitespace())
        .map(|(index, value)| index + value.len_utf8())
        .unwrap_or(0);
    let word = &before_cursor[word_start..];

    if word.matches(MENTION_MARKER).count() != 1 {
        return None;
    }

    let marker = word.find(MENTION_MARKER)?;
    let start = word_start + marker;

    Some(ActiveMention {
        start,
        end: cursor,
        query: text[start + MENTION_MARKER.len_utf8()..cursor].to_owned(),
    })
}

/// Clamps `offset` to the text length and down to a character boundary.
#[must_use]
pub fn floor_char_boundary(text: &str, offset: usize) -> usize {
    let mut offset = offset.min(text.len());
    while !text.is_char_boundary(offset) {
        offset -= 1;
    }
    offset
}

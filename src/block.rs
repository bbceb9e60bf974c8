//! Block recognition: forwarded headers, dividers and attribution lines

use crate::patterns::{
    AttributionPattern, DIVIDER_REGEX, FIELD_LABEL_REGEX, HEADER_END_REGEX, HEADER_START_REGEX,
    attribution_patterns,
};
use chrono::{DateTime, Utc};
use html_escape::encode_text;
use regex::Captures;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// A structure that can be found inside a span of message text
pub trait Block {
    /// Find the first occurrence of this block in `text`.
    ///
    /// On success the receiver holds the extracted data and the returned
    /// [`Split`] partitions `text` around the match. On failure the receiver
    /// is left as it was.
    #[allow(clippy::wrong_self_convention)]
    fn from_text<'t>(&mut self, text: &'t str) -> Option<Split<'t>>;

    /// Render the extracted data as HTML
    fn to_html(&self) -> String;
}

/// `text` partitioned around one recognized block
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Split<'t> {
    pub before: &'t str,
    pub matched: &'t str,
    pub after: &'t str,
}

impl<'t> Split<'t> {
    /// Split `text` into `[..start]`, `[start..end]` and `[end..]`
    #[must_use]
    pub fn around(text: &'t str, start: usize, end: usize) -> Self {
        let (before, rest) = text.split_at(start);
        let (matched, after) = rest.split_at(end - start);
        Self {
            before,
            matched,
            after,
        }
    }
}

/// One `Label: value` line of a forwarded header
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Field {
    pub name: String,
    pub value: String,
}

impl Field {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Header of a forwarded or quoted message, fields in order of appearance
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageHeaderBlock {
    pub fields: Vec<Field>,
}

impl MessageHeaderBlock {
    /// Value of the first field labelled `name`
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|field| field.name == name)
            .map(|field| field.value.as_str())
    }
}

#[derive(Debug, Clone, Copy)]
struct FieldPosition {
    label_start: usize,
    label_end: usize,
    value_start: usize,
}

impl FieldPosition {
    fn from_captures(captures: &Captures<'_>) -> Option<Self> {
        let label = captures.name("label")?;
        let value = captures.name("value")?;
        Some(Self {
            label_start: label.start(),
            label_end: label.end(),
            value_start: value.start(),
        })
    }
}

/// Drop the one line break that terminates a field's last line
fn strip_line_break(value: &str) -> &str {
    value
        .strip_suffix('\n')
        .map_or(value, |line| line.strip_suffix('\r').unwrap_or(line))
}

impl MessageHeaderBlock {
    /// Build the header whose first field is the one `start` captured
    pub(crate) fn from_start<'t>(text: &'t str, start: &Captures<'t>) -> Option<(Self, Split<'t>)> {
        let header_start = start.get(0)?.start();
        let first = FieldPosition::from_captures(start)?;

        let (region_end, after_start) = HEADER_END_REGEX
            .find_at(text, first.label_end)
            .map_or((text.len(), text.len()), |blank| (blank.start(), blank.end()));
        let region = &text[..region_end];

        let mut positions = vec![first];
        let mut cursor = first.label_end;
        while let Some(captures) = FIELD_LABEL_REGEX.captures_at(region, cursor) {
            let position = FieldPosition::from_captures(&captures)?;
            cursor = position.label_end;
            positions.push(position);
        }

        let fields = positions
            .iter()
            .enumerate()
            .map(|(i, position)| {
                let value_end = positions
                    .get(i + 1)
                    .map_or(region_end, |next| next.label_start);
                let value = text
                    .get(position.value_start..value_end)
                    .unwrap_or_default();
                Field::new(
                    &text[position.label_start..position.label_end],
                    strip_line_break(value),
                )
            })
            .collect();

        Some((
            Self { fields },
            Split::around(text, header_start, after_start),
        ))
    }
}

impl Block for MessageHeaderBlock {
    fn from_text<'t>(&mut self, text: &'t str) -> Option<Split<'t>> {
        let start = HEADER_START_REGEX.captures(text)?;
        let (header, split) = Self::from_start(text, &start)?;
        *self = header;
        Some(split)
    }

    fn to_html(&self) -> String {
        let mut html = String::from("<dl class=\"message-header\">");
        for field in &self.fields {
            html.push_str("<dt>");
            html.push_str(&encode_text(&field.name));
            html.push_str("</dt><dd>");
            html.push_str(&encode_text(&field.value));
            html.push_str("</dd>");
        }
        html.push_str("</dl>");
        html
    }
}

/// A horizontal rule made of dashes or underscores
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DividerBlock;

impl Block for DividerBlock {
    fn from_text<'t>(&mut self, text: &'t str) -> Option<Split<'t>> {
        let line = DIVIDER_REGEX.find(text)?;
        Some(Split::around(text, line.start(), line.end()))
    }

    fn to_html(&self) -> String {
        "<hr>".to_string()
    }
}

/// Line introducing a quoted reply, e.g. `On Tue, 3 Jan 2006, Alice wrote:`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributionBlock {
    pub name: String,
    pub time: Option<DateTime<Utc>>,
    pub has_time: bool,
}

impl AttributionBlock {
    /// Build the attribution `pattern` captured, or `None` when its
    /// timestamp does not parse.
    pub(crate) fn from_captures<'t>(
        text: &'t str,
        pattern: &AttributionPattern,
        captures: &Captures<'t>,
    ) -> Option<(Self, Split<'t>)> {
        let whole = captures.get(0)?;
        let name = pattern.name(captures);

        let time = match (pattern.time(captures), pattern.format().date_layout()) {
            (Some(span), Some(layout)) => match layout.parse(span.as_str()) {
                Ok(time) => Some(time),
                Err(e) => {
                    debug!("Skipping {} attribution: {e}", pattern.format());
                    return None;
                }
            },
            _ => None,
        };

        let block = Self {
            name: name.as_str().to_string(),
            time,
            has_time: pattern.format().has_time(),
        };
        Some((block, Split::around(text, whole.start(), whole.end())))
    }
}

impl Block for AttributionBlock {
    fn from_text<'t>(&mut self, text: &'t str) -> Option<Split<'t>> {
        for pattern in attribution_patterns() {
            let Some(captures) = pattern.regex().captures(text) else {
                continue;
            };
            if let Some((block, split)) = Self::from_captures(text, pattern, &captures) {
                *self = block;
                return Some(split);
            }
        }

        None
    }

    fn to_html(&self) -> String {
        let author = format!(
            "<span class=\"author\">{}</span>",
            encode_text(&self.name)
        );
        let Some(time) = self.time else {
            return format!("<p class=\"attribution\">{author} wrote:</p>");
        };
        let display = if self.has_time {
            time.format("%a, %-d %b %Y %H:%M:%S UTC")
        } else {
            time.format("%a, %-d %b %Y")
        };
        format!(
            "<p class=\"attribution\">On <time datetime=\"{}\">{display}</time>, {author} wrote:</p>",
            time.to_rfc3339()
        )
    }
}

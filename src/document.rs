//! Splitting a whole message body into text and recognized blocks

use crate::block::{AttributionBlock, Block, DividerBlock, MessageHeaderBlock, Split};
use crate::patterns::{
    AttributionPattern, DIVIDER_AT_START, DIVIDER_REGEX, HEADER_START_AT_START,
    HEADER_START_REGEX, attribution_patterns,
};
use html_escape::encode_text;
use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};
use tracing::trace;

/// One piece of a message body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Segment {
    /// Text that holds no recognized block
    Text { text: String },
    Header {
        block: MessageHeaderBlock,
        source: String,
    },
    Attribution {
        block: AttributionBlock,
        source: String,
    },
    Divider { source: String },
}

impl Segment {
    /// The slice of the body this segment was built from
    #[must_use]
    pub fn source(&self) -> &str {
        match self {
            Self::Text { text } => text,
            Self::Header { source, .. }
            | Self::Attribution { source, .. }
            | Self::Divider { source } => source,
        }
    }

    #[must_use]
    pub fn to_html(&self) -> String {
        match self {
            Self::Text { text } => format!("<pre>{}</pre>", encode_text(text)),
            Self::Header { block, .. } => block.to_html(),
            Self::Attribution { block, .. } => block.to_html(),
            Self::Divider { .. } => DividerBlock.to_html(),
        }
    }
}

/// A message body as an ordered sequence of segments
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    segments: Vec<Segment>,
}

impl Document {
    /// Segment `text`, trying headers, then attributions, then dividers.
    #[must_use]
    pub fn parse(text: &str) -> Self {
        let segments = split_into(text);
        trace!("Segmented body into {} segments", segments.len());
        Self { segments }
    }

    #[must_use]
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Attribution blocks in order of appearance
    pub fn attributions(&self) -> impl Iterator<Item = &AttributionBlock> {
        self.segments.iter().filter_map(|segment| match segment {
            Segment::Attribution { block, .. } => Some(block),
            _ => None,
        })
    }

    /// Forwarded header blocks in order of appearance
    pub fn headers(&self) -> impl Iterator<Item = &MessageHeaderBlock> {
        self.segments.iter().filter_map(|segment| match segment {
            Segment::Header { block, .. } => Some(block),
            _ => None,
        })
    }

    /// The original text, rebuilt from the segments
    #[must_use]
    pub fn source(&self) -> String {
        self.segments.iter().map(Segment::source).collect()
    }

    #[must_use]
    pub fn to_html(&self) -> String {
        self.segments.iter().map(Segment::to_html).collect()
    }
}

/// Block searches over the successive suffixes of one span.
///
/// Once a search has run on the suffix starting at offset `a`, a later
/// suffix starting at `b > a` can only gain a match at its own first byte,
/// where `^` and `\A` start to hold. Every other candidate is unchanged, so
/// each search only rescans after the walker has moved past its last match.
#[derive(Debug)]
struct SuffixSearch {
    regex: &'static Regex,
    at_start: &'static Regex,
    found: Option<Found>,
}

#[derive(Debug, Clone, Copy)]
enum Found {
    /// No match anywhere in the suffix starting here
    Nothing { from: usize },
    /// Leftmost match starts here
    At(usize),
}

impl SuffixSearch {
    const fn new(regex: &'static Regex, at_start: &'static Regex) -> Self {
        Self {
            regex,
            at_start,
            found: None,
        }
    }

    /// Leftmost match in `rest`, the suffix of the span starting at `offset`
    fn captures<'t>(&mut self, rest: &'t str, offset: usize) -> Option<Captures<'t>> {
        match self.found {
            Some(Found::Nothing { from }) if from <= offset => {
                return self.at_start.captures(rest);
            }
            Some(Found::At(start)) if start > offset => {
                return self
                    .at_start
                    .captures(rest)
                    .or_else(|| self.regex.captures_at(rest, start - offset));
            }
            _ => {}
        }

        let captures = self.regex.captures(rest);
        self.found = Some(
            captures
                .as_ref()
                .and_then(|found| found.get(0))
                .map_or(Found::Nothing { from: offset }, |found| {
                    Found::At(offset + found.start())
                }),
        );
        captures
    }
}

/// Every block kind, in the order the walker tries them
#[derive(Debug)]
struct Scanner {
    header: SuffixSearch,
    attributions: Vec<(&'static AttributionPattern, SuffixSearch)>,
    divider: SuffixSearch,
}

impl Scanner {
    fn new() -> Self {
        Self {
            header: SuffixSearch::new(&HEADER_START_REGEX, &HEADER_START_AT_START),
            attributions: attribution_patterns()
                .iter()
                .map(|pattern| {
                    let search = SuffixSearch::new(pattern.regex(), pattern.regex_at_start());
                    (pattern, search)
                })
                .collect(),
            divider: SuffixSearch::new(&DIVIDER_REGEX, &DIVIDER_AT_START),
        }
    }

    /// First block in `rest`, the suffix of the span starting at `offset`
    fn find_block<'t>(&mut self, rest: &'t str, offset: usize) -> Option<(Segment, Split<'t>)> {
        if let Some(start) = self.header.captures(rest, offset)
            && let Some((block, split)) = MessageHeaderBlock::from_start(rest, &start)
        {
            let source = split.matched.to_string();
            return Some((Segment::Header { block, source }, split));
        }

        for (pattern, search) in &mut self.attributions {
            if let Some(captures) = search.captures(rest, offset)
                && let Some((block, split)) = AttributionBlock::from_captures(rest, *pattern, &captures)
            {
                let source = split.matched.to_string();
                return Some((Segment::Attribution { block, source }, split));
            }
        }

        let line = self.divider.captures(rest, offset)?.get(0)?;
        let split = Split::around(rest, line.start(), line.end());
        let source = split.matched.to_string();
        Some((Segment::Divider { source }, split))
    }
}

/// A span being segmented. `pending` is its latest block, emitted once the
/// text in front of that block has been segmented.
struct Frame<'t> {
    span: &'t str,
    offset: usize,
    scanner: Scanner,
    pending: Option<Segment>,
}

impl<'t> Frame<'t> {
    fn new(span: &'t str) -> Self {
        Self {
            span,
            offset: 0,
            scanner: Scanner::new(),
            pending: None,
        }
    }
}

/// Walk forward through `text`. The text before each block gets a frame of
/// its own; it cannot hold a match of the search that just hit, so frames
/// nest at most once per search.
fn split_into(text: &str) -> Vec<Segment> {
    let mut segments = Vec::new();
    let mut stack = vec![Frame::new(text)];

    while let Some(frame) = stack.last_mut() {
        if let Some(block) = frame.pending.take() {
            segments.push(block);
        }

        let span = frame.span;
        let rest = &span[frame.offset..];
        if rest.is_empty() {
            stack.pop();
            continue;
        }

        let Some((block, split)) = frame.scanner.find_block(rest, frame.offset) else {
            segments.push(Segment::Text {
                text: rest.to_string(),
            });
            stack.pop();
            continue;
        };

        frame.offset = span.len() - split.after.len();
        frame.pending = Some(block);
        if !split.before.is_empty() {
            stack.push(Frame::new(split.before));
        }
    }

    segments
}

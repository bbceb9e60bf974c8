//! Pattern tables for quote-block recognition.
//!
//! All tables are compiled once, on first use, and shared read-only
//! afterwards. The attribution table is ordered: earlier entries win.

use crate::error::{ParseError, Result};
use crate::format::Format;
use regex::{Captures, Match, Regex};
use std::sync::LazyLock;

// Whitespace is the ASCII set only: tab, newline, form feed, carriage return, space
const SPACE: &str = r"[\t\n\x0C\r ]";
const NON_SPACE: &str = r"[^\t\n\x0C\r ]";
const NAME: &str = r"(?:[^<>,\t\n\x0C\r ]|[^<>,\t\n\x0C\r ][^<>,]*[^<>,\t\n\x0C\r ])";
const EMAIL: &str = r"[^<>@\t\n\x0C\r ]+@[^<>@\t\n\x0C\r ]+";
const GROUP_EMAIL: &str = r"[^\t\n\x0C\r @]+@(?:yahoogroups\.com|y?\.{3})";
const SHORT_MONTH: &str = "(?:Jan|Feb|Mar|Apr|May|Jun|Jul|Aug|Sep|Oct|Nov|Dec)";
const SHORT_WEEKDAY: &str = "(?:Mon|Tue|Wed|Thu|Fri|Sat|Sun)";
const TIME: &str = "[0-9]{2}:[0-9]{2}:[0-9]{2}";
const NUMERIC_TIMEZONE: &str = "[-+][0-9]{4}";
const ABBREVIATION_TIMEZONE: &str = r"\([A-Z]{2,}\)";
const HSPACE: &str = r"[\t ]*";
const FIELD_LABELS: &str = "From|Reply-To|To|Subject|Date|Sent|Message";

/// Name of the capture group holding an attribution timestamp
const TIME_SLOT: &str = "time";

static LONG_DATE: LazyLock<String> =
    LazyLock::new(|| format!("{SHORT_WEEKDAY}, [0-9]{{1,2}} {SHORT_MONTH} [0-9]{{4}}"));

static BANNER: LazyLock<String> =
    LazyLock::new(|| format!("{HSPACE}-+ ?Original Message ?-+{HSPACE}"));

pub(crate) static DIVIDER_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(&format!("(?m)^{HSPACE}[-_]{{2,}}{HSPACE}$")).unwrap());

pub(crate) static DIVIDER_AT_START: LazyLock<Regex> =
    LazyLock::new(|| pinned_to_start(DIVIDER_REGEX.as_str()).unwrap());

pub(crate) static FIELD_LABEL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"(?m)^{HSPACE}(?P<label>{FIELD_LABELS}): +(?P<value>{NON_SPACE})"
    ))
    .unwrap()
});

pub(crate) static HEADER_START_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    let banner = &*BANNER;
    Regex::new(&format!(
        r"(?:^{banner}\n|^{HSPACE}\n?|\n{HSPACE}(?:{banner})?\n){HSPACE}(?P<label>{FIELD_LABELS}): +(?P<value>{NON_SPACE})"
    ))
    .unwrap()
});

pub(crate) static HEADER_START_AT_START: LazyLock<Regex> =
    LazyLock::new(|| pinned_to_start(HEADER_START_REGEX.as_str()).unwrap());

pub(crate) static HEADER_END_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(&format!(r"(?m)^{HSPACE}\n")).unwrap());

static ATTRIBUTION_PATTERNS: LazyLock<Vec<AttributionPattern>> = LazyLock::new(|| {
    build_attribution_patterns()
        .unwrap_or_else(|e| panic!("attribution pattern table is inconsistent: {e}"))
});

/// Compile `source` so that it only matches at the very start of the haystack
fn pinned_to_start(source: &str) -> std::result::Result<Regex, regex::Error> {
    Regex::new(&format!(r"\A(?:{source})"))
}

/// The ways an attribution names its author, in extraction priority order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserShape {
    /// `"Alice Smith" <alice@example.com>`
    QuotedNameWithEmail,
    /// `Alice Smith <alice@example.com>`
    NameWithEmail,
    /// `<alice@example.com>`
    Email,
    /// `Alice`
    BareName,
}

impl UserShape {
    pub const ALL: &'static [Self] = &[
        Self::QuotedNameWithEmail,
        Self::NameWithEmail,
        Self::Email,
        Self::BareName,
    ];

    pub const WITH_EMAIL: &'static [Self] =
        &[Self::QuotedNameWithEmail, Self::NameWithEmail, Self::Email];

    #[must_use]
    pub const fn slot(self) -> &'static str {
        match self {
            Self::QuotedNameWithEmail => "quoted",
            Self::NameWithEmail => "named",
            Self::Email => "email",
            Self::BareName => "bare",
        }
    }

    fn pattern(self) -> String {
        let slot = self.slot();
        match self {
            Self::QuotedNameWithEmail => format!(r#""(?P<{slot}>{NAME})"{SPACE}+<{EMAIL}>"#),
            Self::NameWithEmail => format!(r"(?P<{slot}>{NAME}){SPACE}+<{EMAIL}>"),
            Self::Email => format!("<(?P<{slot}>{EMAIL})>"),
            Self::BareName => format!("(?P<{slot}>{NAME})"),
        }
    }
}

/// Alternation over `shapes`, tried left to right by the regex engine
fn user_pattern(shapes: &[UserShape]) -> String {
    let alternatives: Vec<String> = shapes.iter().map(|shape| shape.pattern()).collect();
    format!("(?:{})", alternatives.join("|"))
}

/// One entry of the attribution table
#[derive(Debug)]
pub struct AttributionPattern {
    format: Format,
    regex: Regex,
    at_start: Regex,
    name_slots: &'static [UserShape],
}

impl AttributionPattern {
    /// Compile `source` and check that every slot the entry relies on exists.
    pub fn new(format: Format, source: &str, name_slots: &'static [UserShape]) -> Result<Self> {
        let invalid = |source| ParseError::InvalidPattern {
            format: format.to_string(),
            source,
        };
        let regex = Regex::new(source).map_err(invalid)?;
        let at_start = pinned_to_start(source).map_err(invalid)?;

        let defines = |slot: &str| regex.capture_names().flatten().any(|name| name == slot);

        if name_slots.is_empty() {
            return Err(ParseError::MissingCaptureSlot {
                format: format.to_string(),
                slot: "name",
            });
        }
        if let Some(shape) = name_slots.iter().find(|shape| !defines(shape.slot())) {
            return Err(ParseError::MissingCaptureSlot {
                format: format.to_string(),
                slot: shape.slot(),
            });
        }
        if format.date_layout().is_some() && !defines(TIME_SLOT) {
            return Err(ParseError::MissingCaptureSlot {
                format: format.to_string(),
                slot: TIME_SLOT,
            });
        }

        Ok(Self {
            format,
            regex,
            at_start,
            name_slots,
        })
    }

    #[must_use]
    pub const fn format(&self) -> Format {
        self.format
    }

    #[must_use]
    pub const fn regex(&self) -> &Regex {
        &self.regex
    }

    /// Same pattern, only matching at offset 0 of the haystack
    pub(crate) const fn regex_at_start(&self) -> &Regex {
        &self.at_start
    }

    /// Author span: the first name slot with a non-empty match.
    ///
    /// # Panics
    ///
    /// If every slot is empty, which means the entry is wired wrong.
    #[must_use]
    pub fn name<'t>(&self, captures: &Captures<'t>) -> Match<'t> {
        self.name_slots
            .iter()
            .find_map(|shape| captures.name(shape.slot()).filter(|m| !m.is_empty()))
            .unwrap_or_else(|| {
                panic!(
                    "{}",
                    ParseError::MissingCaptureSlot {
                        format: self.format.to_string(),
                        slot: "name",
                    }
                )
            })
    }

    /// Timestamp span, for formats that carry a date.
    ///
    /// # Panics
    ///
    /// If the format has a date layout but the time slot is empty.
    #[must_use]
    pub fn time<'t>(&self, captures: &Captures<'t>) -> Option<Match<'t>> {
        self.format.date_layout()?;
        let span = captures
            .name(TIME_SLOT)
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| {
                panic!(
                    "{}",
                    ParseError::MissingCaptureSlot {
                        format: self.format.to_string(),
                        slot: TIME_SLOT,
                    }
                )
            });
        Some(span)
    }
}

/// The attribution table in matching priority order
#[must_use]
pub fn attribution_patterns() -> &'static [AttributionPattern] {
    &ATTRIBUTION_PATTERNS
}

/// Build and validate the attribution table.
///
/// Most temporally specific first, then name-only lines by decreasing
/// structure. The last entry is not anchored to end of line.
pub fn build_attribution_patterns() -> Result<Vec<AttributionPattern>> {
    let long_date = &*LONG_DATE;
    let short_date = format!("{SHORT_WEEKDAY}, [0-9]{{2}}/[0-9]{{2}}/[0-9]{{2}}");
    let numeric = format!("{long_date} {TIME} {NUMERIC_TIMEZONE}");
    let abbreviation = format!("{numeric} {ABBREVIATION_TIMEZONE}");
    let user = user_pattern(UserShape::ALL);
    let user_with_email = user_pattern(UserShape::WITH_EMAIL);

    let on_date = |date: &str| {
        format!(r"(?m)^{HSPACE}On{SPACE}+(?P<{TIME_SLOT}>{date}),{SPACE}+{user}{SPACE}+wrote:{HSPACE}$")
    };

    let table = [
        (Format::NameDateAbbreviationTimezone, on_date(&abbreviation), UserShape::ALL),
        (Format::NameDateNumericTimezone, on_date(&numeric), UserShape::ALL),
        (Format::NameLongDate, on_date(long_date), UserShape::ALL),
        (
            Format::NameShortDate,
            format!(
                r"(?m)^{HSPACE}-{{2,3}}{SPACE}+On{SPACE}+(?P<{TIME_SLOT}>{short_date}),{SPACE}+{user}{SPACE}+wrote:{HSPACE}$"
            ),
            UserShape::ALL,
        ),
        (
            Format::Name,
            format!(r"(?m)^{HSPACE}-{{2,3}}{SPACE}+In{SPACE}+{GROUP_EMAIL},{SPACE}+{user}{SPACE}+wrote:{HSPACE}$"),
            UserShape::ALL,
        ),
        (
            Format::Name,
            format!(r"(?m)^{HSPACE}-{{2,3}}{SPACE}+{user}{SPACE}+wrote:{HSPACE}$"),
            UserShape::ALL,
        ),
        (
            Format::Name,
            format!(r"(?m)^{HSPACE}{user_with_email}{HSPACE}wrote:{SPACE}+"),
            UserShape::WITH_EMAIL,
        ),
    ];

    table
        .into_iter()
        .map(|(format, source, slots)| AttributionPattern::new(format, &source, slots))
        .collect()
}

//! Attribution formats and the date layouts they carry

use crate::error::{ParseError, Result};
use chrono::{DateTime, NaiveDate, Timelike, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Shape of an attribution line, from name-only to full timestamp with zone
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Format {
    /// `--- Alice wrote:`
    Name,
    /// `On Tue, 3 Jan 2006, Alice wrote:`
    NameLongDate,
    /// `--- On Tue, 01/03/06, Alice wrote:`
    NameShortDate,
    /// `On Tue, 3 Jan 2006 10:00:00 -0700, Alice wrote:`
    NameDateNumericTimezone,
    /// `On Tue, 3 Jan 2006 10:00:00 -0700 (MST), Alice wrote:`
    NameDateAbbreviationTimezone,
}

impl Format {
    pub const ALL: [Self; 5] = [
        Self::Name,
        Self::NameLongDate,
        Self::NameShortDate,
        Self::NameDateNumericTimezone,
        Self::NameDateAbbreviationTimezone,
    ];

    /// Whether lines of this format carry a time of day
    #[must_use]
    pub const fn has_time(self) -> bool {
        match self {
            Self::NameDateNumericTimezone | Self::NameDateAbbreviationTimezone => true,
            Self::Name | Self::NameLongDate | Self::NameShortDate => false,
        }
    }

    /// Layout used to parse the embedded date, if the format has one
    #[must_use]
    pub const fn date_layout(self) -> Option<DateLayout> {
        match self {
            Self::Name => None,
            Self::NameLongDate => Some(DateLayout::LongDate),
            Self::NameShortDate => Some(DateLayout::ShortDate),
            Self::NameDateNumericTimezone => Some(DateLayout::NumericTimezone),
            Self::NameDateAbbreviationTimezone => Some(DateLayout::AbbreviationTimezone),
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Name => "Name",
            Self::NameLongDate => "NameLongDate",
            Self::NameShortDate => "NameShortDate",
            Self::NameDateNumericTimezone => "NameDateNumericTimezone",
            Self::NameDateAbbreviationTimezone => "NameDateAbbreviationTimezone",
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Format {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|format| format.as_str() == s)
            .ok_or_else(|| ParseError::InvalidFormat(s.to_string()))
    }
}

/// Date layouts found in attribution lines.
///
/// Every layout starts with a short weekday and a comma (`Tue, `). The
/// weekday is only checked for shape by the attribution pattern, never
/// against the calendar, so `Mon, 3 Jan 2006` parses as 2006-01-03.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateLayout {
    /// `Mon, 2 Jan 2006`
    LongDate,
    /// `Mon, 01/02/06`
    ShortDate,
    /// `Mon, 2 Jan 2006 15:04:05 -0700`
    NumericTimezone,
    /// `Mon, 2 Jan 2006 15:04:05 -0700 (MST)`
    AbbreviationTimezone,
}

impl DateLayout {
    /// chrono format string for the part after the weekday
    const fn chrono_format(self) -> &'static str {
        match self {
            Self::LongDate => "%d %b %Y",
            Self::ShortDate => "%m/%d/%Y",
            Self::NumericTimezone | Self::AbbreviationTimezone => "%d %b %Y %H:%M:%S %z",
        }
    }

    /// Parse `text` and normalize it to UTC.
    ///
    /// Date-only layouts resolve to midnight UTC. The trailing zone
    /// abbreviation is checked for shape but the numeric offset decides the
    /// instant. Two-digit years 69-99 are 1969-1999, 00-68 are 2000-2068.
    pub fn parse(self, text: &str) -> Result<DateTime<Utc>> {
        let invalid = |reason: &str| ParseError::InvalidDate(format!("{text}: {reason}"));

        let (_weekday, date) = text
            .split_once(", ")
            .ok_or_else(|| invalid("missing weekday"))?;

        match self {
            Self::LongDate => parse_midnight(date, self.chrono_format()).map_err(|e| invalid(&e)),
            Self::ShortDate => {
                let (month_day, year) = date
                    .rsplit_once('/')
                    .ok_or_else(|| invalid("missing year"))?;
                let year = expand_year(year).ok_or_else(|| invalid("year is not two digits"))?;
                parse_midnight(&format!("{month_day}/{year}"), self.chrono_format())
                    .map_err(|e| invalid(&e))
            }
            Self::NumericTimezone => {
                parse_with_offset(date, self.chrono_format()).map_err(|e| invalid(&e))
            }
            Self::AbbreviationTimezone => {
                let (zoned, abbreviation) = date
                    .rsplit_once(' ')
                    .ok_or_else(|| invalid("missing zone abbreviation"))?;
                let name = abbreviation
                    .strip_prefix('(')
                    .and_then(|name| name.strip_suffix(')'))
                    .ok_or_else(|| invalid("malformed zone abbreviation"))?;
                if !is_zone_abbreviation(name) {
                    return Err(invalid("unknown zone abbreviation"));
                }
                parse_with_offset(zoned, self.chrono_format()).map_err(|e| invalid(&e))
            }
        }
    }
}

fn parse_midnight(text: &str, format: &str) -> std::result::Result<DateTime<Utc>, String> {
    NaiveDate::parse_from_str(text, format)
        .map_err(|e| e.to_string())?
        .and_hms_opt(0, 0, 0)
        .map(|midnight| midnight.and_utc())
        .ok_or_else(|| "no midnight".to_string())
}

fn parse_with_offset(text: &str, format: &str) -> std::result::Result<DateTime<Utc>, String> {
    let local = DateTime::parse_from_str(text, format).map_err(|e| e.to_string())?;
    // chrono reads second 60 as a leap second
    if local.nanosecond() >= 1_000_000_000 {
        return Err("second out of range".to_string());
    }
    Ok(local.with_timezone(&Utc))
}

/// `yy` as a full year, or `None` unless it is exactly two digits
fn expand_year(yy: &str) -> Option<i32> {
    if yy.len() != 2 || !yy.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let yy: i32 = yy.parse().ok()?;
    Some(if yy >= 69 { 1900 + yy } else { 2000 + yy })
}

/// Zone names allowed inside the parentheses: any three capitals, four or
/// five capitals ending in `T`, and a few irregular names. `GMT` takes no
/// suffix.
fn is_zone_abbreviation(name: &str) -> bool {
    if matches!(name, "ChST" | "MeST" | "WITA") {
        return true;
    }
    if !name.bytes().all(|b| b.is_ascii_uppercase()) {
        return false;
    }
    if name.starts_with("GMT") {
        return name == "GMT";
    }
    match name.len() {
        3 => true,
        4 | 5 => name.ends_with('T'),
        _ => false,
    }
}

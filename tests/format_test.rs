use chrono::{TimeZone, Utc};
use mail_quote::*;

// --- Format ---

#[test]
fn test_format_has_time() {
    assert!(Format::NameDateNumericTimezone.has_time());
    assert!(Format::NameDateAbbreviationTimezone.has_time());
    assert!(!Format::Name.has_time());
    assert!(!Format::NameLongDate.has_time());
    assert!(!Format::NameShortDate.has_time());
}

#[test]
fn test_format_date_layout() {
    assert_eq!(Format::Name.date_layout(), None);
    assert_eq!(Format::NameLongDate.date_layout(), Some(DateLayout::LongDate));
    assert_eq!(Format::NameShortDate.date_layout(), Some(DateLayout::ShortDate));
    assert_eq!(
        Format::NameDateNumericTimezone.date_layout(),
        Some(DateLayout::NumericTimezone)
    );
    assert_eq!(
        Format::NameDateAbbreviationTimezone.date_layout(),
        Some(DateLayout::AbbreviationTimezone)
    );
}

#[test]
fn test_format_from_str() {
    for format in Format::ALL {
        assert_eq!(format.to_string().parse::<Format>().unwrap(), format);
    }
}

#[test]
fn test_format_from_str_rejects_unknown() {
    let err = "NameWithShoeSize".parse::<Format>().unwrap_err();
    assert!(matches!(err, ParseError::InvalidFormat(ref name) if name == "NameWithShoeSize"));
}

// --- DateLayout ---

#[test]
fn test_long_date_single_digit_day() {
    let time = DateLayout::LongDate.parse("Tue, 3 Jan 2006").unwrap();
    assert_eq!(time, Utc.with_ymd_and_hms(2006, 1, 3, 0, 0, 0).unwrap());
}

#[test]
fn test_long_date_two_digit_day() {
    let time = DateLayout::LongDate.parse("Sat, 25 Dec 2004").unwrap();
    assert_eq!(time, Utc.with_ymd_and_hms(2004, 12, 25, 0, 0, 0).unwrap());
}

#[test]
fn test_short_date() {
    let time = DateLayout::ShortDate.parse("Wed, 07/04/07").unwrap();
    assert_eq!(time, Utc.with_ymd_and_hms(2007, 7, 4, 0, 0, 0).unwrap());
}

#[test]
fn test_short_date_two_digit_year_pivot() {
    let late = DateLayout::ShortDate.parse("Mon, 01/01/69").unwrap();
    assert_eq!(late, Utc.with_ymd_and_hms(1969, 1, 1, 0, 0, 0).unwrap());

    let early = DateLayout::ShortDate.parse("Mon, 01/01/68").unwrap();
    assert_eq!(early, Utc.with_ymd_and_hms(2068, 1, 1, 0, 0, 0).unwrap());

    let zero = DateLayout::ShortDate.parse("Mon, 12/31/00").unwrap();
    assert_eq!(zero, Utc.with_ymd_and_hms(2000, 12, 31, 0, 0, 0).unwrap());
}

#[test]
fn test_short_date_year_must_be_two_digits() {
    assert!(DateLayout::ShortDate.parse("Mon, 01/01/2006").is_err());
    assert!(DateLayout::ShortDate.parse("Mon, 01/01/6").is_err());
}

#[test]
fn test_numeric_timezone_advances_west_offsets() {
    let time = DateLayout::NumericTimezone
        .parse("Tue, 3 Jan 2006 22:30:15 -0700")
        .unwrap();
    assert_eq!(time, Utc.with_ymd_and_hms(2006, 1, 4, 5, 30, 15).unwrap());
}

#[test]
fn test_abbreviation_timezone_uses_offset() {
    let time = DateLayout::AbbreviationTimezone
        .parse("Tue, 3 Jan 2006 10:00:00 +0900 (JST)")
        .unwrap();
    assert_eq!(time, Utc.with_ymd_and_hms(2006, 1, 3, 1, 0, 0).unwrap());
}

#[test]
fn test_impossible_dates_are_rejected() {
    assert!(DateLayout::LongDate.parse("Tue, 32 Jan 2006").is_err());
    assert!(DateLayout::ShortDate.parse("Tue, 13/01/06").is_err());
    assert!(DateLayout::NumericTimezone
        .parse("Tue, 30 Feb 2006 10:00:00 -0700")
        .is_err());
    assert!(DateLayout::AbbreviationTimezone
        .parse("Tue, 3 Jan 2006 25:00:00 -0700 (MST)")
        .is_err());
}

#[test]
fn test_missing_weekday_is_rejected() {
    let err = DateLayout::LongDate.parse("3 Jan 2006").unwrap_err();
    assert!(matches!(err, ParseError::InvalidDate(_)));
}

#[test]
fn test_abbreviation_layout_requires_abbreviation() {
    assert!(DateLayout::AbbreviationTimezone
        .parse("Tue, 3 Jan 2006 10:00:00 -0700")
        .is_err());
}

#[test]
fn test_abbreviation_timezone_accepted_names() {
    for zone in ["MST", "UTC", "GMT", "CEST", "ACWST", "WITA", "ChST"] {
        let text = format!("Tue, 3 Jan 2006 10:00:00 -0700 ({zone})");
        assert!(
            DateLayout::AbbreviationTimezone.parse(&text).is_ok(),
            "{zone} should be accepted"
        );
    }
}

#[test]
fn test_abbreviation_timezone_rejected_names() {
    for zone in ["UT", "ABCD", "ABCDE", "ABCDEFG", "GMTT", "mst", "M1T"] {
        let text = format!("Tue, 3 Jan 2006 10:00:00 -0700 ({zone})");
        let err = DateLayout::AbbreviationTimezone.parse(&text).unwrap_err();
        assert!(matches!(err, ParseError::InvalidDate(_)), "{zone}");
    }
}

#[test]
fn test_second_sixty_is_rejected() {
    assert!(DateLayout::NumericTimezone
        .parse("Tue, 3 Jan 2006 23:59:60 -0700")
        .is_err());
    assert!(DateLayout::AbbreviationTimezone
        .parse("Tue, 3 Jan 2006 23:59:60 -0700 (MST)")
        .is_err());
    assert!(DateLayout::NumericTimezone
        .parse("Tue, 3 Jan 2006 23:59:59 -0700")
        .is_ok());
}

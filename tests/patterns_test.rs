use mail_quote::patterns::{
    AttributionPattern, UserShape, attribution_patterns, build_attribution_patterns,
};
use mail_quote::*;

#[test]
fn test_table_builds_and_is_ordered() {
    let formats: Vec<Format> = build_attribution_patterns()
        .unwrap()
        .iter()
        .map(AttributionPattern::format)
        .collect();

    assert_eq!(
        formats,
        vec![
            Format::NameDateAbbreviationTimezone,
            Format::NameDateNumericTimezone,
            Format::NameLongDate,
            Format::NameShortDate,
            Format::Name,
            Format::Name,
            Format::Name,
        ]
    );
}

#[test]
fn test_shared_table_matches_fresh_build() {
    assert_eq!(
        attribution_patterns().len(),
        build_attribution_patterns().unwrap().len()
    );
}

#[test]
fn test_pattern_with_bad_regex_is_rejected() {
    let err = AttributionPattern::new(Format::Name, "(?P<bare>", UserShape::ALL).unwrap_err();
    assert!(matches!(err, ParseError::InvalidPattern { .. }));
}

#[test]
fn test_pattern_without_name_slot_is_rejected() {
    let err = AttributionPattern::new(Format::Name, "(?P<bare>\\w+) wrote:", UserShape::WITH_EMAIL)
        .unwrap_err();
    assert!(matches!(
        err,
        ParseError::MissingCaptureSlot { slot: "quoted", .. }
    ));
}

#[test]
fn test_pattern_with_no_name_slots_is_rejected() {
    let err = AttributionPattern::new(Format::Name, "(?P<bare>\\w+) wrote:", &[]).unwrap_err();
    assert!(matches!(err, ParseError::MissingCaptureSlot { slot: "name", .. }));
}

#[test]
fn test_dated_pattern_without_time_slot_is_rejected() {
    let err = AttributionPattern::new(
        Format::NameLongDate,
        "(?P<bare>\\w+) wrote:",
        &[UserShape::BareName],
    )
    .unwrap_err();
    assert!(matches!(err, ParseError::MissingCaptureSlot { slot: "time", .. }));
}

#[test]
fn test_first_non_empty_slot_wins() {
    let pattern = AttributionPattern::new(
        Format::Name,
        "(?:<(?P<email>[^>]*)>|(?P<bare>\\w+)) wrote:",
        &[UserShape::Email, UserShape::BareName],
    )
    .unwrap();
    let captures = pattern.regex().captures("alice wrote:").unwrap();
    assert_eq!(pattern.name(&captures).as_str(), "alice");
    assert!(pattern.time(&captures).is_none());
}

#[test]
#[should_panic(expected = "Missing capture slot `name`")]
fn test_match_with_every_slot_empty_panics() {
    let pattern =
        AttributionPattern::new(Format::Name, "(?P<bare>x?)wrote:", &[UserShape::BareName])
            .unwrap();
    let captures = pattern.regex().captures("wrote:").unwrap();
    let _ = pattern.name(&captures);
}

#[test]
fn test_user_shapes_priority() {
    assert_eq!(
        UserShape::ALL,
        &[
            UserShape::QuotedNameWithEmail,
            UserShape::NameWithEmail,
            UserShape::Email,
            UserShape::BareName,
        ]
    );
    assert!(!UserShape::WITH_EMAIL.contains(&UserShape::BareName));
}

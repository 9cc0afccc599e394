// SPDX-FileCopyrightText: 2025 Joost van der Laan <joost@fashionunited.com>
//
// SPDX-License-Identifier: AGPL-3.0-only

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer};

use crate::error::ParseError;

const SECONDS_PER_WEEK: f64 = 604_800.0;
const SECONDS_PER_DAY: f64 = 86_400.0;
const SECONDS_PER_HOUR: f64 = 3_600.0;
const SECONDS_PER_MINUTE: f64 = 60.0;

/// Parse an ISO-8601 duration such as `PT7M30S` or `P1DT2H` into seconds.
///
/// Week, day, hour, minute and second designators are supported, each at most
/// once and in that order. Only the last component may carry a fraction.
/// Years and months have no fixed length and are rejected.
pub fn parse_iso8601_duration(text: &str) -> Result<f64, ParseError> {
    let rest = text
        .trim()
        .strip_prefix('P')
        .ok_or(ParseError::MissingPeriod)?;

    if rest.is_empty() {
        return Err(ParseError::NoComponents);
    }

    let (date_part, time_part) = match rest.split_once('T') {
        Some((_, "")) => return Err(ParseError::EmptyTime),
        Some((date, time)) => (date, Some(time)),
        None => (rest, None),
    };

    // (rank, seconds per unit); ranks must strictly increase across the whole duration
    let mut units = Vec::new();
    for component in duration_components(date_part)? {
        let unit = match component.designator {
            'W' => (0, SECONDS_PER_WEEK),
            'D' => (1, SECONDS_PER_DAY),
            'Y' | 'M' => return Err(ParseError::CalendarDesignator(component.designator)),
            other => return Err(ParseError::UnexpectedDesignator(other)),
        };
        units.push((component, unit));
    }
    if let Some(time) = time_part {
        for component in duration_components(time)? {
            let unit = match component.designator {
                'H' => (2, SECONDS_PER_HOUR),
                'M' => (3, SECONDS_PER_MINUTE),
                'S' => (4, 1.0),
                other => return Err(ParseError::UnexpectedDesignator(other)),
            };
            units.push((component, unit));
        }
    }

    let mut seconds = 0.0;
    let mut previous_rank = None;
    for (i, (component, (rank, unit))) in units.iter().enumerate() {
        if previous_rank.is_some_and(|previous| *rank <= previous) {
            return Err(ParseError::DesignatorOrder(component.designator));
        }
        if component.fractional && i + 1 < units.len() {
            return Err(ParseError::FractionNotLast);
        }
        previous_rank = Some(*rank);
        seconds += component.value * unit;
    }

    Ok(seconds)
}

struct DurationComponent {
    value: f64,
    fractional: bool,
    designator: char,
}

/// Split `7M30S` into its `7M` and `30S` components
fn duration_components(part: &str) -> Result<Vec<DurationComponent>, ParseError> {
    let mut components = Vec::new();
    let mut number = String::new();

    for c in part.chars() {
        match c {
            '0'..='9' | '.' => number.push(c),
            designator => {
                if number.is_empty() {
                    return Err(ParseError::MissingValue(designator));
                }
                let value: f64 = number
                    .parse()
                    .map_err(|_| ParseError::InvalidNumber(number.clone()))?;
                components.push(DurationComponent {
                    value,
                    fractional: number.contains('.'),
                    designator,
                });
                number.clear();
            }
        }
    }

    if !number.is_empty() {
        return Err(ParseError::MissingDesignator(number));
    }

    Ok(components)
}

/// Parse a serialized tag list such as `['news', "late night"]`.
///
/// An empty cell means the video has no tags.
pub fn parse_tag_list(text: &str) -> Result<Vec<String>, ParseError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Ok(Vec::new());
    }

    let inner = trimmed
        .strip_prefix('[')
        .and_then(|s| s.strip_suffix(']'))
        .ok_or(ParseError::NotAList)?;

    let mut tags = Vec::new();
    let mut chars = inner.chars().peekable();

    loop {
        while chars.next_if(|c| c.is_whitespace()).is_some() {}

        let quote = match chars.next() {
            None => break,
            Some(q @ ('\'' | '"')) => q,
            Some(c) => return Err(ParseError::UnexpectedChar(c)),
        };

        let mut tag = String::new();
        loop {
            match chars.next() {
                None => return Err(ParseError::UnterminatedString),
                Some('\\') => match chars.next() {
                    Some('n') => tag.push('\n'),
                    Some('t') => tag.push('\t'),
                    Some(escaped) => tag.push(escaped),
                    None => return Err(ParseError::DanglingEscape),
                },
                Some(c) if c == quote => break,
                Some(c) => tag.push(c),
            }
        }
        tags.push(tag);

        while chars.next_if(|c| c.is_whitespace()).is_some() {}
        match chars.next() {
            None => break,
            Some(',') => continue,
            Some(c) => return Err(ParseError::UnexpectedChar(c)),
        }
    }

    Ok(tags)
}

/// Parse the `published_at` column. Offsets are normalised to UTC and naive
/// timestamps are taken to be UTC already.
pub fn parse_published_at(raw: &str) -> Option<DateTime<Utc>> {
    let s = raw.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }

    for fmt in ["%Y-%m-%d %H:%M:%S%:z", "%Y-%m-%d %H:%M:%S%.f%:z"] {
        if let Ok(dt) = DateTime::parse_from_str(s, fmt) {
            return Some(dt.with_timezone(&Utc));
        }
    }

    for fmt in [
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%dT%H:%M:%S%.f",
    ] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(naive.and_utc());
        }
    }

    None
}

/// Parse an integral cell, accepting the `123.0` form dataframe exports produce
fn parse_integral(raw: &str) -> Option<i64> {
    let trimmed = raw.trim();
    if let Ok(value) = trimmed.parse::<i64>() {
        return Some(value);
    }
    match trimmed.parse::<f64>() {
        Ok(value) if value.is_finite() && value.fract() == 0.0 && value.abs() < 9.0e15 => {
            Some(value as i64)
        }
        _ => None,
    }
}

pub fn parse_count(raw: &str) -> Result<u64, ParseError> {
    parse_integral(raw)
        .and_then(|value| u64::try_from(value).ok())
        .ok_or_else(|| ParseError::InvalidCount(raw.to_string()))
}

pub fn deserialize_count<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_count(&raw).map_err(serde::de::Error::custom)
}

pub fn deserialize_category_id<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_integral(&raw).ok_or_else(|| serde::de::Error::custom(format!("invalid category id {:?}", raw)))
}

/// Shorten a label for chart axes, respecting char boundaries
pub fn truncate_label(label: &str, max_chars: usize) -> String {
    if label.chars().count() <= max_chars {
        return label.to_string();
    }
    let kept: String = label.chars().take(max_chars.saturating_sub(3)).collect();
    format!("{}...", kept.trim_end())
}

/// Compact human formatting for axis ticks (1.2M, 35K)
pub fn format_compact(value: f64) -> String {
    let abs = value.abs();
    if abs >= 1_000_000_000.0 {
        format!("{:.1}B", value / 1_000_000_000.0)
    } else if abs >= 1_000_000.0 {
        format!("{:.1}M", value / 1_000_000.0)
    } else if abs >= 1_000.0 {
        format!("{:.0}K", value / 1_000.0)
    } else {
        format!("{:.0}", value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use chrono::Timelike;

    #[test]
    fn test_parse_iso8601_duration() {
        assert_relative_eq!(parse_iso8601_duration("PT7M30S").unwrap(), 450.0);
        assert_relative_eq!(parse_iso8601_duration("PT1H").unwrap(), 3600.0);
        assert_relative_eq!(parse_iso8601_duration("P1DT2H").unwrap(), 93_600.0);
        assert_relative_eq!(parse_iso8601_duration("P1W").unwrap(), 604_800.0);
        assert_relative_eq!(parse_iso8601_duration("P0D").unwrap(), 0.0);
        assert_relative_eq!(parse_iso8601_duration("PT59S").unwrap(), 59.0);
        assert_relative_eq!(parse_iso8601_duration("PT1.5S").unwrap(), 1.5);
        assert_relative_eq!(parse_iso8601_duration(" PT2M ").unwrap(), 120.0);
        assert_relative_eq!(parse_iso8601_duration("P1DT1.5H").unwrap(), 91_800.0);
        assert_relative_eq!(parse_iso8601_duration("PT7M30.5S").unwrap(), 450.5);
    }

    #[test]
    fn test_parse_iso8601_duration_rejects_malformed() {
        assert!(parse_iso8601_duration("").is_err());
        assert!(parse_iso8601_duration("7M30S").is_err());
        assert!(parse_iso8601_duration("P").is_err());
        assert!(parse_iso8601_duration("PT").is_err());
        assert!(parse_iso8601_duration("PTM").is_err());
        assert!(parse_iso8601_duration("PT5").is_err());
        assert!(parse_iso8601_duration("P1M").is_err());
        assert!(parse_iso8601_duration("P1Y").is_err());
        assert!(parse_iso8601_duration("PT1X").is_err());
        assert!(parse_iso8601_duration("not a duration").is_err());
        assert!(parse_iso8601_duration("PT1,5S").is_err());
    }

    #[test]
    fn test_parse_iso8601_duration_enforces_designator_order() {
        assert_eq!(
            parse_iso8601_duration("PT30S7M"),
            Err(ParseError::DesignatorOrder('M'))
        );
        assert_eq!(
            parse_iso8601_duration("PT1M1M"),
            Err(ParseError::DesignatorOrder('M'))
        );
        assert_eq!(
            parse_iso8601_duration("P2D1W"),
            Err(ParseError::DesignatorOrder('W'))
        );
        assert_eq!(
            parse_iso8601_duration("PT1.5M30S"),
            Err(ParseError::FractionNotLast)
        );
        assert_eq!(
            parse_iso8601_duration("P1.5DT2H"),
            Err(ParseError::FractionNotLast)
        );
    }

    #[test]
    fn test_parse_tag_list() {
        assert_eq!(parse_tag_list("").unwrap(), Vec::<String>::new());
        assert_eq!(parse_tag_list("[]").unwrap(), Vec::<String>::new());
        assert_eq!(
            parse_tag_list("['news', 'late night']").unwrap(),
            vec!["news".to_string(), "late night".to_string()]
        );
        assert_eq!(
            parse_tag_list(r#"["it's here", 'say \"hi\"',]"#).unwrap(),
            vec!["it's here".to_string(), "say \"hi\"".to_string()]
        );
        assert_eq!(
            parse_tag_list(r"['don\'t']").unwrap(),
            vec!["don't".to_string()]
        );
        // Duplicates are kept; tag_count counts list entries
        assert_eq!(parse_tag_list("['a', 'a']").unwrap().len(), 2);
    }

    #[test]
    fn test_parse_tag_list_rejects_malformed() {
        assert!(parse_tag_list("news, sports").is_err());
        assert!(parse_tag_list("['unterminated]").is_err());
        assert!(parse_tag_list("[news]").is_err());
        assert!(parse_tag_list("['a' 'b']").is_err());
        assert!(parse_tag_list("[,]").is_err());
        assert_eq!(
            parse_tag_list("['a' 'b']"),
            Err(ParseError::UnexpectedChar('\''))
        );
    }

    #[test]
    fn test_parse_published_at() {
        let dt = parse_published_at("2024-06-10T14:00:06Z").unwrap();
        assert_eq!(dt.hour(), 14);

        let dt = parse_published_at("2024-06-10 23:59:59+00:00").unwrap();
        assert_eq!(dt.hour(), 23);

        let dt = parse_published_at("2024-06-10T01:30:00+02:00").unwrap();
        assert_eq!(dt.hour(), 23);

        let dt = parse_published_at("2024-06-10 08:15:00").unwrap();
        assert_eq!(dt.hour(), 8);

        assert!(parse_published_at("yesterday").is_none());
    }

    #[test]
    fn test_parse_count() {
        assert_eq!(parse_count("123"), Ok(123));
        assert_eq!(parse_count("123.0"), Ok(123));
        assert_eq!(parse_count(" 0 "), Ok(0));
        assert!(parse_count("-1").is_err());
        assert!(parse_count("1.5").is_err());
        assert!(parse_count("").is_err());
        assert!(parse_count("NaN").is_err());
        assert_eq!(
            parse_count("-1"),
            Err(ParseError::InvalidCount("-1".to_string()))
        );
    }

    #[test]
    fn test_truncate_label() {
        assert_eq!(truncate_label("short", 30), "short");
        assert_eq!(truncate_label("abcdefghij", 8), "abcde...");
        // Multi-byte titles must not split a char
        let title = "🔥🔥🔥🔥🔥🔥🔥🔥🔥🔥";
        assert_eq!(truncate_label(title, 5), "🔥🔥...");
    }

    #[test]
    fn test_format_compact() {
        assert_eq!(format_compact(950.0), "950");
        assert_eq!(format_compact(35_000.0), "35K");
        assert_eq!(format_compact(1_240_000.0), "1.2M");
        assert_eq!(format_compact(3_000_000_000.0), "3.0B");
    }
}

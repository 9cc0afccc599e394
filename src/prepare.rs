// SPDX-FileCopyrightText: 2025 Joost van der Laan <joost@fashionunited.com>
//
// SPDX-License-Identifier: AGPL-3.0-only

use chrono::Timelike;
use csv::Reader;
use std::io;
use std::path::Path;
use tracing::{debug, info, warn};

use crate::error::DataError;
use crate::models::{
    CategoryMap, DurationRange, RawVideoRecord, TrendTable, VideoRecord, NO_DESCRIPTION,
};
use crate::utils::{parse_iso8601_duration, parse_published_at, parse_tag_list};

/// Read the trending videos CSV from disk
pub fn load_trending_videos(path: &Path) -> Result<Vec<RawVideoRecord>, DataError> {
    let reader = Reader::from_path(path).map_err(|source| DataError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    let records = read_records(reader)?;
    info!(path = %path.display(), rows = records.len(), "Loaded trending videos");
    Ok(records)
}

fn read_records<R: io::Read>(mut reader: Reader<R>) -> Result<Vec<RawVideoRecord>, DataError> {
    reader
        .deserialize()
        .enumerate()
        .map(|(i, result)| result.map_err(|source| DataError::Row { row: i + 1, source }))
        .collect()
}

/// Enrich every raw record with its derived fields.
///
/// Rows are numbered from 1 in error messages. Pure: the same input always
/// yields the same table.
pub fn prepare(raw: &[RawVideoRecord], categories: &CategoryMap) -> Result<TrendTable, DataError> {
    let records = raw
        .iter()
        .enumerate()
        .map(|(i, record)| enrich(i + 1, record, categories))
        .collect::<Result<Vec<_>, _>>()?;

    let unmapped = records.iter().filter(|r| r.category_name.is_none()).count();
    if unmapped > 0 {
        warn!(unmapped, "Records with a category id missing from the category map");
    }
    let unbucketed = records.iter().filter(|r| r.duration_range.is_none()).count();
    debug!(unbucketed, "Records outside every duration range");

    Ok(TrendTable {
        records,
        categories: categories.clone(),
    })
}

fn enrich(row: usize, raw: &RawVideoRecord, categories: &CategoryMap) -> Result<VideoRecord, DataError> {
    let published_at =
        parse_published_at(&raw.published_at).ok_or_else(|| DataError::PublishedAt {
            row,
            value: raw.published_at.clone(),
        })?;

    let duration_seconds =
        parse_iso8601_duration(&raw.duration).map_err(|source| DataError::Duration {
            row,
            value: raw.duration.clone(),
            source,
        })?;

    let tags_text = raw.tags.as_deref().unwrap_or_default();
    let tags = parse_tag_list(tags_text).map_err(|source| DataError::Tags {
        row,
        value: tags_text.to_string(),
        source,
    })?;

    let description = raw
        .description
        .clone()
        .unwrap_or_else(|| NO_DESCRIPTION.to_string());

    Ok(VideoRecord {
        title: raw.title.clone(),
        description,
        publish_hour: published_at.hour(),
        published_at,
        tag_count: tags.len(),
        tags,
        duration: raw.duration.clone(),
        view_count: raw.view_count,
        like_count: raw.like_count,
        comment_count: raw.comment_count,
        category_id: raw.category_id,
        duration_range: DurationRange::from_seconds(duration_seconds),
        duration_seconds,
        total_engagement: u128::from(raw.view_count)
            + u128::from(raw.like_count)
            + u128::from(raw.comment_count),
        category_name: categories.get(raw.category_id).map(str::to_string),
    })
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::io::Write;
    use tempfile::NamedTempFile;

    use crate::error::ParseError;

    const HEADER: &str =
        "video_id,title,description,published_at,tags,duration,view_count,like_count,comment_count,category_id";

    pub(crate) fn sample_categories() -> CategoryMap {
        [
            (10, "Music"),
            (17, "Sports"),
            (20, "Gaming"),
            (23, "Comedy"),
            (24, "Entertainment"),
        ]
        .into_iter()
        .collect()
    }

    fn parse_csv(body: &str) -> Result<Vec<RawVideoRecord>, DataError> {
        let data = format!("{}\n{}", HEADER, body);
        read_records(Reader::from_reader(data.as_bytes()))
    }

    #[test]
    fn test_prepare_derives_fields() -> anyhow::Result<()> {
        let raw = parse_csv(
            "abc,First,Some text,2024-06-10T14:00:06Z,\"['a', 'b', 'c']\",PT7M30S,1000,100,10,24",
        )?;
        let table = prepare(&raw, &sample_categories())?;
        let record = &table.records[0];

        assert_eq!(record.title, "First");
        assert_eq!(record.description, "Some text");
        assert_eq!(record.publish_hour, 14);
        assert_relative_eq!(record.duration_seconds, 450.0);
        assert_eq!(record.duration_range, Some(DurationRange::From5To10Min));
        assert_eq!(record.total_engagement, 1110);
        assert_eq!(record.tags, vec!["a", "b", "c"]);
        assert_eq!(record.tag_count, 3);
        assert_eq!(record.category_name.as_deref(), Some("Entertainment"));
        Ok(())
    }

    #[test]
    fn test_missing_description_and_tags() -> anyhow::Result<()> {
        let raw = parse_csv("abc,Quiet,,2024-06-10 09:00:00+00:00,,PT30S,5,0,0,10")?;
        let table = prepare(&raw, &sample_categories())?;
        let record = &table.records[0];

        assert_eq!(record.description, NO_DESCRIPTION);
        assert!(record.tags.is_empty());
        assert_eq!(record.tag_count, 0);
        assert_eq!(record.publish_hour, 9);
        Ok(())
    }

    #[test]
    fn test_unmapped_category_is_not_an_error() -> anyhow::Result<()> {
        let raw = parse_csv("abc,Odd,x,2024-06-10T00:00:00Z,[],PT1M,1,1,1,999")?;
        let table = prepare(&raw, &sample_categories())?;
        assert_eq!(table.records[0].category_name, None);
        Ok(())
    }

    #[test]
    fn test_zero_and_long_durations_have_no_bucket() -> anyhow::Result<()> {
        let raw = parse_csv(
            "a,Zero,x,2024-06-10T00:00:00Z,[],P0D,1,1,1,10\n\
             b,Long,x,2024-06-10T00:00:00Z,[],PT3H,1,1,1,10\n\
             c,Edge,x,2024-06-10T00:00:00Z,[],PT2H,1,1,1,10",
        )?;
        let table = prepare(&raw, &sample_categories())?;
        assert_eq!(table.records[0].duration_range, None);
        assert_eq!(table.records[1].duration_range, None);
        assert_eq!(table.records[2].duration_range, Some(DurationRange::From60To120Min));
        Ok(())
    }

    #[test]
    fn test_bad_duration_is_fatal() {
        let raw = parse_csv(
            "a,Ok,x,2024-06-10T00:00:00Z,[],PT1M,1,1,1,10\n\
             b,Bad,x,2024-06-10T00:00:00Z,[],seven minutes,1,1,1,10",
        )
        .unwrap();
        let err = prepare(&raw, &sample_categories()).unwrap_err();
        match err {
            DataError::Duration { row, value, .. } => {
                assert_eq!(row, 2);
                assert_eq!(value, "seven minutes");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_malformed_tags_are_fatal() {
        let raw = parse_csv("a,Bad,x,2024-06-10T00:00:00Z,\"['open\",PT1M,1,1,1,10").unwrap();
        let err = prepare(&raw, &sample_categories()).unwrap_err();
        assert!(matches!(
            err,
            DataError::Tags {
                row: 1,
                source: ParseError::NotAList,
                ..
            }
        ));
    }

    #[test]
    fn test_bad_timestamp_is_fatal() {
        let raw = parse_csv("a,Bad,x,someday,[],PT1M,1,1,1,10").unwrap();
        let err = prepare(&raw, &sample_categories()).unwrap_err();
        assert!(matches!(err, DataError::PublishedAt { row: 1, .. }));
    }

    #[test]
    fn test_negative_count_fails_to_load() {
        let err = parse_csv("a,Bad,x,2024-06-10T00:00:00Z,[],PT1M,-4,1,1,10").unwrap_err();
        assert!(matches!(err, DataError::Row { row: 1, .. }));
    }

    #[test]
    fn test_float_formatted_counts_load() -> anyhow::Result<()> {
        let raw = parse_csv("a,Float,x,2024-06-10T00:00:00Z,[],PT1M,10.0,2.0,1.0,24.0")?;
        assert_eq!(raw[0].view_count, 10);
        assert_eq!(raw[0].category_id, 24);
        Ok(())
    }

    #[test]
    fn test_prepare_is_deterministic() -> anyhow::Result<()> {
        let raw = parse_csv(
            "a,One,x,2024-06-10T03:00:00Z,\"['x']\",PT4M,10,2,1,10\n\
             b,Two,,2024-06-11T22:10:00Z,,PT25M,20,4,2,99",
        )?;
        let first = prepare(&raw, &sample_categories())?;
        let second = prepare(&raw, &sample_categories())?;
        assert_eq!(first, second);
        Ok(())
    }

    #[test]
    fn test_engagement_is_exact_sum() -> anyhow::Result<()> {
        let raw = parse_csv(
            "a,Big,x,2024-06-10T03:00:00Z,[],PT4M,9007199254740993,1,1,10",
        )?;
        let table = prepare(&raw, &sample_categories())?;
        assert_eq!(table.records[0].total_engagement, 9_007_199_254_740_995);
        Ok(())
    }

    #[test]
    fn test_engagement_at_largest_counts() -> anyhow::Result<()> {
        let max = i64::MAX;
        let raw = parse_csv(&format!(
            "a,Huge,x,2024-06-10T03:00:00Z,[],PT4M,{max},{max},{max},10"
        ))?;
        let table = prepare(&raw, &sample_categories())?;
        assert_eq!(
            table.records[0].total_engagement,
            3 * u128::from(i64::MAX.unsigned_abs())
        );
        Ok(())
    }

    #[test]
    fn test_load_trending_videos_from_file() -> anyhow::Result<()> {
        let mut file = NamedTempFile::new()?;
        writeln!(file, "{}", HEADER)?;
        writeln!(file, "a,One,x,2024-06-10T03:00:00Z,[],PT4M,10,2,1,10")?;
        writeln!(file, "b,Two,y,2024-06-10T04:00:00Z,[],PT5M,20,3,2,17")?;

        let raw = load_trending_videos(file.path())?;
        assert_eq!(raw.len(), 2);
        assert_eq!(raw[1].title, "Two");
        Ok(())
    }

    #[test]
    fn test_missing_file_is_fatal() {
        let err = load_trending_videos(Path::new("does/not/exist.csv")).unwrap_err();
        assert!(matches!(err, DataError::Open { .. }));
    }
}

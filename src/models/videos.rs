// SPDX-FileCopyrightText: 2025 Joost van der Laan <joost@fashionunited.com>
//
// SPDX-License-Identifier: AGPL-3.0-only

use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::fmt;

use crate::utils::{deserialize_category_id, deserialize_count};

/// Placeholder used when a video has no description
pub const NO_DESCRIPTION: &str = "No description";

/// One row of the trending videos CSV, as read from disk.
/// Columns not listed here are ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct RawVideoRecord {
    pub title: String,
    pub description: Option<String>,
    pub published_at: String,
    pub tags: Option<String>,
    pub duration: String,
    #[serde(deserialize_with = "deserialize_count")]
    pub view_count: u64,
    #[serde(deserialize_with = "deserialize_count")]
    pub like_count: u64,
    #[serde(deserialize_with = "deserialize_count")]
    pub comment_count: u64,
    #[serde(deserialize_with = "deserialize_category_id")]
    pub category_id: i64,
}

/// A trending video with every derived field filled in
#[derive(Debug, Clone, PartialEq)]
pub struct VideoRecord {
    pub title: String,
    pub description: String,
    pub published_at: DateTime<Utc>,
    pub tags: Vec<String>,
    pub duration: String,
    pub view_count: u64,
    pub like_count: u64,
    pub comment_count: u64,
    pub category_id: i64,
    // Derived
    pub publish_hour: u32,
    pub duration_seconds: f64,
    pub duration_range: Option<DurationRange>,
    /// Sum of the three counters, wide enough that it cannot overflow
    pub total_engagement: u128,
    pub tag_count: usize,
    pub category_name: Option<String>,
}

impl VideoRecord {
    pub fn metric(&self, metric: Metric) -> u64 {
        match metric {
            Metric::ViewCount => self.view_count,
            Metric::LikeCount => self.like_count,
            Metric::CommentCount => self.comment_count,
        }
    }
}

/// The three engagement counters carried by every record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Metric {
    ViewCount,
    LikeCount,
    CommentCount,
}

impl Metric {
    pub const ALL: [Metric; 3] = [Metric::ViewCount, Metric::LikeCount, Metric::CommentCount];

    pub fn column(self) -> &'static str {
        match self {
            Metric::ViewCount => "view_count",
            Metric::LikeCount => "like_count",
            Metric::CommentCount => "comment_count",
        }
    }
}

/// Video length buckets, in display order.
///
/// Intervals are closed on the right: (0, 300], (300, 600], (600, 1200],
/// (1200, 3600], (3600, 7200]. Anything else has no bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DurationRange {
    UpTo5Min,
    From5To10Min,
    From10To20Min,
    From20To60Min,
    From60To120Min,
}

impl DurationRange {
    pub const ALL: [DurationRange; 5] = [
        DurationRange::UpTo5Min,
        DurationRange::From5To10Min,
        DurationRange::From10To20Min,
        DurationRange::From20To60Min,
        DurationRange::From60To120Min,
    ];

    /// Bucket edges in seconds; bucket `i` covers `(EDGES[i], EDGES[i + 1]]`
    pub const EDGES: [f64; 6] = [0.0, 300.0, 600.0, 1200.0, 3600.0, 7200.0];

    pub fn from_seconds(seconds: f64) -> Option<DurationRange> {
        Self::ALL
            .iter()
            .zip(Self::EDGES.windows(2))
            .find(|(_, edge)| seconds > edge[0] && seconds <= edge[1])
            .map(|(range, _)| *range)
    }

    pub fn label(self) -> &'static str {
        match self {
            DurationRange::UpTo5Min => "0-5 min",
            DurationRange::From5To10Min => "5-10 min",
            DurationRange::From10To20Min => "10-20 min",
            DurationRange::From20To60Min => "20-60 min",
            DurationRange::From60To120Min => "60-120 min",
        }
    }
}

impl fmt::Display for DurationRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

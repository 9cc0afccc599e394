// SPDX-FileCopyrightText: 2025 Joost van der Laan <joost@fashionunited.com>
//
// SPDX-License-Identifier: AGPL-3.0-only

//! The fixed set of charts offered in the menu.
//!
//! Every entry binds a label to a declarative [`Recipe`]; `charts::build_chart`
//! interprets the recipe and `viz::render_chart` draws the result.

use plotters::style::RGBColor;

use crate::error::ChartError;
use crate::models::{Metric, VideoRecord};
use crate::viz::{Palette, COLOR_BLUE, COLOR_GREEN, COLOR_ORANGE, COLOR_PURPLE, COLOR_RED, COLOR_TEAL};

/// Number of rows in a leaderboard chart
pub const TOP_N: usize = 10;

/// Column a bar chart groups records by
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupKey {
    Category,
    DurationRange,
    PublishHour,
}

/// Numeric field plotted against view count
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScatterField {
    DurationSeconds,
    PublishHour,
    TagCount,
}

impl ScatterField {
    pub fn value(self, record: &VideoRecord) -> f64 {
        match self {
            ScatterField::DurationSeconds => record.duration_seconds,
            ScatterField::PublishHour => f64::from(record.publish_hour),
            ScatterField::TagCount => record.tag_count as f64,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Recipe {
    /// Histogram of one counter with a density curve on top
    Distribution { metric: Metric, color: RGBColor },
    /// Pairwise correlation of the three counters
    Correlation { palette: Palette },
    /// Number of records per group
    Count { key: GroupKey, palette: Palette },
    /// Mean of one counter per group
    Aggregate {
        key: GroupKey,
        metric: Metric,
        palette: Palette,
    },
    /// One field against view count
    Scatter { x: ScatterField, color: RGBColor },
    /// Largest records of one category by a counter
    TopN {
        category: &'static str,
        metric: Metric,
        palette: Palette,
    },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChartSpec {
    pub label: &'static str,
    pub title: &'static str,
    pub x_label: &'static str,
    pub y_label: &'static str,
    pub recipe: Recipe,
}

impl ChartSpec {
    pub fn slug(&self) -> String {
        slugify(self.label)
    }
}

const fn spec(
    label: &'static str,
    title: &'static str,
    x_label: &'static str,
    y_label: &'static str,
    recipe: Recipe,
) -> ChartSpec {
    ChartSpec {
        label,
        title,
        x_label,
        y_label,
        recipe,
    }
}

const fn top_views(label: &'static str, category: &'static str, palette: Palette) -> ChartSpec {
    spec(
        label,
        label,
        "View Count",
        "Video Title",
        Recipe::TopN {
            category,
            metric: Metric::ViewCount,
            palette,
        },
    )
}

const fn top_likes(label: &'static str, category: &'static str, palette: Palette) -> ChartSpec {
    spec(
        label,
        label,
        "Like Count",
        "Video Title",
        Recipe::TopN {
            category,
            metric: Metric::LikeCount,
            palette,
        },
    )
}

/// Menu order matters: it is the order shown to the user
pub static CATALOG: [ChartSpec; 25] = [
    spec(
        "View Count Distribution",
        "Views Distribution of youtube trending videos",
        "View Count",
        "Frequency",
        Recipe::Distribution {
            metric: Metric::ViewCount,
            color: COLOR_BLUE,
        },
    ),
    spec(
        "Like Count Distribution",
        "Likes Distribution of youtube trending videos",
        "Like Count",
        "Frequency",
        Recipe::Distribution {
            metric: Metric::LikeCount,
            color: COLOR_GREEN,
        },
    ),
    spec(
        "Comment Count Distribution",
        "Comments Distribution of youtube trending videos",
        "Comment Count",
        "Frequency",
        Recipe::Distribution {
            metric: Metric::CommentCount,
            color: COLOR_RED,
        },
    ),
    spec(
        "Correlation Matrix",
        "Correlation of likes,comments and views of youtube trending videos",
        "",
        "",
        Recipe::Correlation {
            palette: Palette::Icefire,
        },
    ),
    spec(
        "Number of Trending Videos by Category",
        "Number of youtube Trending Videos by Category",
        "Number of Videos",
        "Category",
        Recipe::Count {
            key: GroupKey::Category,
            palette: Palette::Bright,
        },
    ),
    spec(
        "Average views by category",
        "Number of views for trending videos by category",
        "Average View Count",
        "Category",
        Recipe::Aggregate {
            key: GroupKey::Category,
            metric: Metric::ViewCount,
            palette: Palette::Magma,
        },
    ),
    spec(
        "Average likes by category",
        "Number of likes for trending videos by category",
        "Average like Count",
        "Category",
        Recipe::Aggregate {
            key: GroupKey::Category,
            metric: Metric::LikeCount,
            palette: Palette::Mako,
        },
    ),
    spec(
        "Average comments by category",
        "Number of comments for trending videos by category",
        "Average comment Count",
        "Category",
        Recipe::Aggregate {
            key: GroupKey::Category,
            metric: Metric::CommentCount,
            palette: Palette::Cividis,
        },
    ),
    spec(
        "Average views by Duration",
        "Number of views for trending videos by duration",
        "Average View Count",
        "Duration Range",
        Recipe::Aggregate {
            key: GroupKey::DurationRange,
            metric: Metric::ViewCount,
            palette: Palette::Viridis,
        },
    ),
    spec(
        "Average likes by Duration",
        "Number of likes for trending videos by duration",
        "Average like Count",
        "Duration Range",
        Recipe::Aggregate {
            key: GroupKey::DurationRange,
            metric: Metric::LikeCount,
            palette: Palette::Inferno,
        },
    ),
    spec(
        "Average comments by Duration",
        "Number of comments for trending videos by duration",
        "Average comment Count",
        "Duration Range",
        Recipe::Aggregate {
            key: GroupKey::DurationRange,
            metric: Metric::CommentCount,
            palette: Palette::Icefire,
        },
    ),
    spec(
        "Distribution of videos by publish hour",
        "Distribution of trending videos by publish hour",
        "Publish Hour",
        "Number of Videos",
        Recipe::Count {
            key: GroupKey::PublishHour,
            palette: Palette::Solid(COLOR_BLUE),
        },
    ),
    spec(
        "Video Length vs View Count",
        "Video Length vs Number of views of the trending videos",
        "Video Length (seconds)",
        "View Count",
        Recipe::Scatter {
            x: ScatterField::DurationSeconds,
            color: COLOR_PURPLE,
        },
    ),
    spec(
        "Publish Hour vs View Count",
        "Publish Hour vs Number of views of the trending videos",
        "Publish Hour",
        "View Count",
        Recipe::Scatter {
            x: ScatterField::PublishHour,
            color: COLOR_TEAL,
        },
    ),
    spec(
        "Number of Tags vs View Count",
        "Number of Tags vs number of views of the trending videos",
        "Number of Tags",
        "View Count",
        Recipe::Scatter {
            x: ScatterField::TagCount,
            color: COLOR_ORANGE,
        },
    ),
    top_views("Top 10 Entertainment Videos by View Count", "Entertainment", Palette::Purples),
    top_views("Top 10 Comedy Videos by View Count", "Comedy", Palette::Greens),
    top_views("Top 10 Gaming Videos by View Count", "Gaming", Palette::Blues),
    top_views("Top 10 Sports Videos by View Count", "Sports", Palette::Reds),
    top_views("Top 10 Music Videos by View Count", "Music", Palette::Oranges),
    top_likes("Top 10 Entertainment Videos by Like Count", "Entertainment", Palette::Purples),
    top_likes("Top 10 Comedy Videos by Like Count", "Comedy", Palette::Greens),
    top_likes("Top 10 Gaming Videos by Like Count", "Gaming", Palette::Blues),
    top_likes("Top 10 Sports Videos by Like Count", "Sports", Palette::Reds),
    top_likes("Top 10 Music Videos by Like Count", "Music", Palette::Oranges),
];

/// `"Top 10 Music Videos by Like Count"` -> `"top-10-music-videos-by-like-count"`
pub fn slugify(label: &str) -> String {
    let mut slug = String::with_capacity(label.len());
    for c in label.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
        } else if !slug.is_empty() && !slug.ends_with('-') {
            slug.push('-');
        }
    }
    slug.trim_end_matches('-').to_string()
}

/// Resolve a chart by exact label, slug, or case-insensitive label
pub fn find_chart(name: &str) -> Result<&'static ChartSpec, ChartError> {
    let wanted = name.trim();
    CATALOG
        .iter()
        .find(|spec| spec.label == wanted)
        .or_else(|| {
            let slug = slugify(wanted);
            CATALOG
                .iter()
                .find(|spec| spec.slug() == slug || spec.label.eq_ignore_ascii_case(wanted))
        })
        .ok_or_else(|| ChartError::UnknownChart(name.to_string()))
}

pub fn labels() -> Vec<String> {
    CATALOG.iter().map(|spec| spec.label.to_string()).collect()
}

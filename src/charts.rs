// SPDX-FileCopyrightText: 2025 Joost van der Laan <joost@fashionunited.com>
//
// SPDX-License-Identifier: AGPL-3.0-only

use plotters::style::RGBColor;
use std::collections::{BTreeMap, HashMap};
use tracing::debug;

use crate::catalog::{ChartSpec, GroupKey, Recipe, TOP_N};
use crate::error::ChartError;
use crate::models::{DurationRange, Metric, TrendTable, VideoRecord};
use crate::stats::{self, Histogram};
use crate::viz::Palette;

pub const HISTOGRAM_BINS: usize = 30;
pub const DENSITY_POINTS: usize = 200;

/// One bar of a bar chart. `value` is `None` for a group with no records.
#[derive(Debug, Clone, PartialEq)]
pub struct Bar {
    pub label: String,
    pub value: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    Horizontal,
    Vertical,
}

/// Plot-ready data for a single chart
#[derive(Debug, Clone, PartialEq)]
pub enum ChartData {
    Distribution {
        histogram: Histogram,
        /// Density curve scaled to histogram counts
        density: Option<Vec<(f64, f64)>>,
        color: RGBColor,
    },
    Correlation {
        labels: [&'static str; 3],
        matrix: [[f64; 3]; 3],
        palette: Palette,
    },
    Bars {
        bars: Vec<Bar>,
        orientation: Orientation,
        palette: Palette,
    },
    Scatter {
        points: Vec<(f64, f64)>,
        color: RGBColor,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Chart {
    pub spec: &'static ChartSpec,
    pub data: ChartData,
}

/// Evaluate a chart recipe against the prepared table
pub fn build_chart(spec: &'static ChartSpec, table: &TrendTable) -> Result<Chart, ChartError> {
    let records = &table.records;

    let data = match spec.recipe {
        Recipe::Distribution { metric, color } => {
            let values: Vec<f64> = records.iter().map(|r| r.metric(metric) as f64).collect();
            let histogram = stats::histogram(&values, HISTOGRAM_BINS);
            let scale = values.len() as f64 * histogram.bin_width();
            let density = stats::gaussian_kde(&values, DENSITY_POINTS)
                .map(|curve| curve.into_iter().map(|(x, d)| (x, d * scale)).collect());
            ChartData::Distribution {
                histogram,
                density,
                color,
            }
        }
        Recipe::Correlation { palette } => ChartData::Correlation {
            labels: Metric::ALL.map(Metric::column),
            matrix: correlation_matrix(records),
            palette,
        },
        Recipe::Count { key, palette } => ChartData::Bars {
            bars: group_counts(records, key),
            orientation: orientation(key),
            palette,
        },
        Recipe::Aggregate {
            key,
            metric,
            palette,
        } => ChartData::Bars {
            bars: group_means(records, key, metric),
            orientation: orientation(key),
            palette,
        },
        Recipe::Scatter { x, color } => ChartData::Scatter {
            points: records
                .iter()
                .map(|r| (x.value(r), r.view_count as f64))
                .collect(),
            color,
        },
        Recipe::TopN {
            category,
            metric,
            palette,
        } => {
            if !table.categories.contains_name(category) {
                return Err(ChartError::UnknownCategory(category.to_string()));
            }
            let bars = top_n(records, category, metric, TOP_N)
                .into_iter()
                .map(|r| Bar {
                    label: r.title.clone(),
                    value: Some(r.metric(metric) as f64),
                })
                .collect();
            ChartData::Bars {
                bars,
                orientation: Orientation::Horizontal,
                palette,
            }
        }
    };

    debug!(chart = spec.label, "Built chart data");
    Ok(Chart { spec, data })
}

fn orientation(key: GroupKey) -> Orientation {
    match key {
        GroupKey::PublishHour => Orientation::Vertical,
        GroupKey::Category | GroupKey::DurationRange => Orientation::Horizontal,
    }
}

/// Records split by `key`. Categories come in order of first appearance and
/// skip unmapped records, duration ranges always list all five buckets,
/// publish hours list only hours that occur, ascending.
fn groups<'a>(records: &'a [VideoRecord], key: GroupKey) -> Vec<(String, Vec<&'a VideoRecord>)> {
    match key {
        GroupKey::Category => {
            let mut index: HashMap<&str, usize> = HashMap::new();
            let mut groups: Vec<(String, Vec<&VideoRecord>)> = Vec::new();
            for record in records {
                if let Some(name) = record.category_name.as_deref() {
                    let slot = *index.entry(name).or_insert_with(|| {
                        groups.push((name.to_string(), Vec::new()));
                        groups.len() - 1
                    });
                    groups[slot].1.push(record);
                }
            }
            groups
        }
        GroupKey::DurationRange => DurationRange::ALL
            .iter()
            .map(|range| {
                let members = records
                    .iter()
                    .filter(|r| r.duration_range == Some(*range))
                    .collect();
                (range.label().to_string(), members)
            })
            .collect(),
        GroupKey::PublishHour => {
            let mut groups: BTreeMap<u32, Vec<&VideoRecord>> = BTreeMap::new();
            for record in records {
                groups.entry(record.publish_hour).or_default().push(record);
            }
            groups
                .into_iter()
                .map(|(hour, members)| (hour.to_string(), members))
                .collect()
        }
    }
}

fn metric_mean(records: &[&VideoRecord], metric: Metric) -> Option<f64> {
    let values: Vec<f64> = records.iter().map(|r| r.metric(metric) as f64).collect();
    stats::mean(&values)
}

/// Number of records per group. Categories are ranked by frequency, ties
/// keep first appearance.
pub fn group_counts(records: &[VideoRecord], key: GroupKey) -> Vec<Bar> {
    let mut bars: Vec<Bar> = groups(records, key)
        .into_iter()
        .map(|(label, members)| Bar {
            label,
            value: Some(members.len() as f64),
        })
        .collect();

    if key == GroupKey::Category {
        bars.sort_by(|a, b| bar_value(b).total_cmp(&bar_value(a)));
    }
    bars
}

/// Mean of `metric` per group. Categories are ranked by their mean view
/// count whatever metric is plotted.
pub fn group_means(records: &[VideoRecord], key: GroupKey, metric: Metric) -> Vec<Bar> {
    let mut ranked: Vec<(f64, Bar)> = groups(records, key)
        .into_iter()
        .map(|(label, members)| {
            let rank = metric_mean(&members, Metric::ViewCount).unwrap_or(f64::NEG_INFINITY);
            let value = metric_mean(&members, metric);
            (rank, Bar { label, value })
        })
        .collect();

    if key == GroupKey::Category {
        ranked.sort_by(|a, b| b.0.total_cmp(&a.0));
    }
    ranked.into_iter().map(|(_, bar)| bar).collect()
}

fn bar_value(bar: &Bar) -> f64 {
    bar.value.unwrap_or(f64::NEG_INFINITY)
}

/// The `n` records of `category` with the largest `metric`, ties kept in
/// input order
pub fn top_n<'a>(
    records: &'a [VideoRecord],
    category: &str,
    metric: Metric,
    n: usize,
) -> Vec<&'a VideoRecord> {
    let mut matching: Vec<&VideoRecord> = records
        .iter()
        .filter(|r| r.category_name.as_deref() == Some(category))
        .collect();
    matching.sort_by(|a, b| b.metric(metric).cmp(&a.metric(metric)));
    matching.truncate(n);
    matching
}

/// Pearson correlation between every pair of counters, in `Metric::ALL` order
pub fn correlation_matrix(records: &[VideoRecord]) -> [[f64; 3]; 3] {
    let columns: Vec<Vec<f64>> = Metric::ALL
        .iter()
        .map(|m| records.iter().map(|r| r.metric(*m) as f64).collect())
        .collect();

    let mut matrix = [[f64::NAN; 3]; 3];
    for (i, row) in matrix.iter_mut().enumerate() {
        for (j, cell) in row.iter_mut().enumerate() {
            *cell = stats::pearson(&columns[i], &columns[j]);
        }
    }
    matrix
}

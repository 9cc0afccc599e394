// SPDX-FileCopyrightText: 2025 Joost van der Laan <joost@fashionunited.com>
//
// SPDX-License-Identifier: AGPL-3.0-only

//! Error types for data preparation and chart dispatch

use std::path::PathBuf;
use thiserror::Error;

/// Fatal errors raised while loading and enriching the dataset
#[derive(Error, Debug)]
pub enum DataError {
    #[error("failed to open dataset {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("row {row}: {source}")]
    Row {
        row: usize,
        #[source]
        source: csv::Error,
    },

    #[error("row {row}: invalid duration {value:?}")]
    Duration {
        row: usize,
        value: String,
        #[source]
        source: ParseError,
    },

    #[error("row {row}: malformed tags {value:?}")]
    Tags {
        row: usize,
        value: String,
        #[source]
        source: ParseError,
    },

    #[error("row {row}: invalid published_at {value:?}")]
    PublishedAt { row: usize, value: String },
}

/// Why a single cell failed to parse
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    #[error("missing leading 'P'")]
    MissingPeriod,

    #[error("no duration components")]
    NoComponents,

    #[error("empty time section after 'T'")]
    EmptyTime,

    #[error("designator '{0}' without a value")]
    MissingValue(char),

    #[error("value {0:?} without a designator")]
    MissingDesignator(String),

    #[error("invalid number {0:?}")]
    InvalidNumber(String),

    #[error("calendar designator '{0}' has no fixed length")]
    CalendarDesignator(char),

    #[error("unexpected designator '{0}'")]
    UnexpectedDesignator(char),

    #[error("designator '{0}' is repeated or out of order")]
    DesignatorOrder(char),

    #[error("only the last component may be fractional")]
    FractionNotLast,

    #[error("expected a bracketed list")]
    NotAList,

    #[error("unexpected character {0:?}")]
    UnexpectedChar(char),

    #[error("unterminated string")]
    UnterminatedString,

    #[error("dangling escape")]
    DanglingEscape,

    #[error("invalid count {0:?}")]
    InvalidCount(String),
}

/// Errors raised while resolving and building a chart
#[derive(Error, Debug, PartialEq)]
pub enum ChartError {
    #[error("unknown chart {0:?}; run with --list to see the available charts")]
    UnknownChart(String),

    #[error("category {0:?} is not present in the category map")]
    UnknownCategory(String),
}

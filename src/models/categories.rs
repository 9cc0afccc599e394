// SPDX-FileCopyrightText: 2025 Joost van der Laan <joost@fashionunited.com>
//
// SPDX-License-Identifier: AGPL-3.0-only

use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::BTreeMap;

/// Response body of the YouTube `videoCategories.list` endpoint
#[derive(Debug, Deserialize)]
pub struct CategoryListResponse {
    #[serde(default)]
    pub items: Vec<CategoryItem>,
}

#[derive(Debug, Deserialize)]
pub struct CategoryItem {
    pub id: String,
    pub snippet: CategorySnippet,
}

#[derive(Debug, Deserialize)]
pub struct CategorySnippet {
    pub title: String,
}

/// Category id to display name, fetched once per run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CategoryMap {
    names: BTreeMap<i64, String>,
}

impl CategoryMap {
    pub fn from_response(response: CategoryListResponse) -> Result<Self> {
        let mut names = BTreeMap::new();
        for item in response.items {
            let id: i64 = item
                .id
                .trim()
                .parse()
                .with_context(|| format!("Invalid category id {:?}", item.id))?;
            names.insert(id, item.snippet.title);
        }
        Ok(Self { names })
    }

    pub fn get(&self, id: i64) -> Option<&str> {
        self.names.get(&id).map(String::as_str)
    }

    pub fn contains_name(&self, name: &str) -> bool {
        self.names.values().any(|n| n == name)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl<S: Into<String>> FromIterator<(i64, S)> for CategoryMap {
    fn from_iter<I: IntoIterator<Item = (i64, S)>>(iter: I) -> Self {
        Self {
            names: iter.into_iter().map(|(id, name)| (id, name.into())).collect(),
        }
    }
}

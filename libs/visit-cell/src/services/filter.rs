use serde::{Deserialize, Serialize};

use crate::models::{FilterKey, Filterable};

pub const WILDCARD: &str = "all";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterSelect {
    pub key: FilterKey,
    pub value: String,
}

/// Search text plus select filters, as a list screen holds them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisitFilter {
    pub search: String,
    pub selects: Vec<FilterSelect>,
}

impl VisitFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = search.into();
        self
    }

    /// Adds a select filter. `None`, empty and `"all"` are wildcards and are dropped.
    pub fn with_select(mut self, key: FilterKey, value: Option<impl Into<String>>) -> Self {
        if let Some(value) = value {
            let value = value.into();
            if !is_wildcard(&value) {
                self.selects.push(FilterSelect { key, value });
            }
        }
        self
    }

    pub fn is_empty(&self) -> bool {
        self.search.trim().is_empty() && self.selects.iter().all(|s| is_wildcard(&s.value))
    }

    pub fn matches<T: Filterable>(&self, record: &T) -> bool {
        self.matches_search(record) && self.matches_selects(record)
    }

    fn matches_search<T: Filterable>(&self, record: &T) -> bool {
        let needle = self.search.trim().to_lowercase();
        if needle.is_empty() {
            return true;
        }
        record
            .search_fields()
            .iter()
            .any(|field| field.to_lowercase().contains(&needle))
    }

    fn matches_selects<T: Filterable>(&self, record: &T) -> bool {
        self.selects.iter().all(|select| {
            if is_wildcard(&select.value) {
                return true;
            }
            record
                .facet(select.key)
                .is_some_and(|value| value.eq_ignore_ascii_case(select.value.trim()))
        })
    }

    /// Matching records in their original order.
    pub fn apply<T: Filterable + Clone>(&self, records: &[T]) -> Vec<T> {
        records.iter().filter(|r| self.matches(*r)).cloned().collect()
    }

    /// `(matching, rest)`, both in original order.
    pub fn partition<T: Filterable + Clone>(&self, records: &[T]) -> (Vec<T>, Vec<T>) {
        records.iter().cloned().partition(|r| self.matches(r))
    }
}

pub fn is_wildcard(value: &str) -> bool {
    let value = value.trim();
    value.is_empty() || value.eq_ignore_ascii_case(WILDCARD)
}

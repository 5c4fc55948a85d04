//! Shared search query models and the compiler that turns them into one engine expression.
//!
//! Output shape, with every part after `base` optional:
//!
//! ```text
//! <free text | *:*> <filter fragment> <filter fragment> AND ((f:"a" OR f:"b") AND (g:"c"))
//! ```
//!
//! Filters are joined by spaces (implicit AND in the engine); facets are an
//! exact-match OR group per field, the groups joined by `AND`.

use serde::{Deserialize, Serialize};

use crate::{
    applied_filters::AppliedFilterSet,
    facet_selection::FacetSelection,
    query_escape::escape_phrase,
    search_const::MATCH_ALL_QUERY,
};


#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct SearchQuery {
    pub query_string: String,
    pub filters: AppliedFilterSet,
    pub facet_filters: FacetSelection,
}

impl SearchQuery {
    pub fn compile(&self) -> CompiledQuery {
        compile_query(&self.query_string, &self.filters, &self.facet_filters)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CompiledQuery {
    pub text: String,
}

impl CompiledQuery {
    pub fn match_all() -> Self {
        Self { text: MATCH_ALL_QUERY.to_string() }
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }
}

impl Default for CompiledQuery {
    fn default() -> Self {
        Self::match_all()
    }
}

/// One page of one compiled query; also the result cache key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SearchRequest {
    pub query_text: String,
    pub page: u64,
    pub page_size: u64,
}

impl SearchRequest {
    pub fn new(query: &CompiledQuery, page: u64, page_size: u64) -> Self {
        Self { query_text: query.text.clone(), page, page_size }
    }

    /// Zero-based offset of the first requested row, saturating for absurd pages.
    pub fn start(&self) -> u64 {
        self.page.saturating_sub(1).saturating_mul(self.page_size)
    }
}

impl std::fmt::Display for CompiledQuery {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.text)
    }
}

/// `(f:"a" OR f:"b") AND (g:"c")`, or `None` when nothing is selected.
pub fn compile_facet_group(facets: &FacetSelection) -> Option<String> {
    let groups = facets
        .iter()
        .filter(|(_, values)| !values.is_empty())
        .map(|(field, values)| {
            let clauses = values.iter().map(|value| format!("{field}:\"{}\"", escape_phrase(value))).collect::<Vec<_>>();
            format!("({})", clauses.join(" OR "))
        })
        .collect::<Vec<_>>();
    if groups.is_empty() {
        return None;
    }
    Some(groups.join(" AND "))
}

pub fn compile_query(free_text: &str, filters: &AppliedFilterSet, facets: &FacetSelection) -> CompiledQuery {
    let free_text = free_text.trim();
    let mut text = if free_text.is_empty() { MATCH_ALL_QUERY.to_string() } else { free_text.to_string() };

    let fragments = filters.query_fragments();
    if !fragments.is_empty() {
        text.push(' ');
        text.push_str(&fragments.join(" "));
    }

    if let Some(facet_group) = compile_facet_group(facets) {
        text.push_str(" AND (");
        text.push_str(&facet_group);
        text.push(')');
    }

    CompiledQuery { text }
}

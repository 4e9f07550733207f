//! Build-time field declarations and per-query options.

use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Number of hits returned when the caller does not ask for a count.
pub const DEFAULT_NUM_RESULTS: usize = 5;

/// Field weight applied when a text field has no explicit boost.
pub const DEFAULT_BOOST: f32 = 1.0;

/// Keyword constraints: field name to the accepted values for that field.
pub type KeywordFilters = BTreeMap<String, Vec<String>>;

/// Per text field scoring weights.
pub type Boosts = BTreeMap<String, f32>;

/// Field declarations fixed for the lifetime of an index.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IndexConfig {
    /// Fields tokenized and scored.
    pub text_fields: Vec<String>,
    /// Fields matched exactly by keyword filters.
    pub keyword_fields: Vec<String>,
    /// Compare keyword values ignoring case.
    #[serde(default)]
    pub keyword_case_insensitive: bool,
}

impl IndexConfig {
    pub fn new<T, K>(text_fields: T, keyword_fields: K) -> Self
    where
        T: IntoIterator,
        T::Item: Into<String>,
        K: IntoIterator,
        K::Item: Into<String>,
    {
        Self {
            text_fields: text_fields.into_iter().map(Into::into).collect(),
            keyword_fields: keyword_fields
                .into_iter()
                .map(Into::into)
                .collect(),
            keyword_case_insensitive: false,
        }
    }

    /// Layout used for documents produced by [`crate::source`]: `title`
    /// and `content` are searchable, `filename` is filterable.
    pub fn markdown() -> Self {
        Self::new(["title", "content"], ["filename"])
    }

    pub fn case_insensitive_keywords(mut self, yes: bool) -> Self {
        self.keyword_case_insensitive = yes;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.text_fields.is_empty() {
            return Err(Error::InvalidArgument(
                "at least one text field must be declared".into(),
            ));
        }

        let mut seen = HashSet::new();
        for field in self.text_fields.iter().chain(&self.keyword_fields) {
            if field.is_empty() {
                return Err(Error::InvalidArgument(
                    "field names must not be empty".into(),
                ));
            }
            if !seen.insert(field.as_str()) {
                let kind = if self.keyword_fields.contains(field)
                    && self.text_fields.contains(field)
                {
                    "declared as both text and keyword field"
                } else {
                    "declared more than once"
                };
                return Err(Error::InvalidArgument(format!(
                    "field '{field}' {kind}"
                )));
            }
        }

        Ok(())
    }
}

/// A single query against a built index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchParams {
    pub query: String,
    #[serde(default)]
    pub filters: KeywordFilters,
    #[serde(default)]
    pub boosts: Boosts,
    #[serde(default = "default_num_results")]
    pub num_results: usize,
}

fn default_num_results() -> usize {
    DEFAULT_NUM_RESULTS
}

impl SearchParams {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            filters: KeywordFilters::new(),
            boosts: Boosts::new(),
            num_results: DEFAULT_NUM_RESULTS,
        }
    }

    /// Accept documents whose `field` equals `value`. Repeated calls for
    /// the same field add alternatives.
    pub fn filter(
        mut self,
        field: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        self.filters.entry(field.into()).or_default().push(value.into());
        self
    }

    pub fn boost(mut self, field: impl Into<String>, weight: f32) -> Self {
        self.boosts.insert(field.into(), weight);
        self
    }

    pub fn num_results(mut self, n: usize) -> Self {
        self.num_results = n;
        self
    }

    pub fn boost_for(&self, field: &str) -> f32 {
        self.boosts.get(field).copied().unwrap_or(DEFAULT_BOOST)
    }

    pub fn validate(&self) -> Result<()> {
        if self.num_results == 0 {
            return Err(Error::InvalidArgument(
                "num_results must be positive".into(),
            ));
        }
        for (field, weight) in &self.boosts {
            if !weight.is_finite() || *weight < 0.0 {
                return Err(Error::InvalidArgument(format!(
                    "boost for '{field}' must be finite and non-negative, \
                     got {weight}"
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn markdown_layout() {
        let config = IndexConfig::markdown();
        assert_eq!(config.text_fields, vec!["title", "content"]);
        assert_eq!(config.keyword_fields, vec!["filename"]);
        assert!(!config.keyword_case_insensitive);
        config.validate().unwrap();
    }

    #[test]
    fn overlapping_fields_are_rejected() {
        let config = IndexConfig::new(["content", "filename"], ["filename"]);
        let err = config.validate().unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));
        assert!(err.to_string().contains("both text and keyword"));
    }

    #[test]
    fn duplicate_fields_are_rejected() {
        let config =
            IndexConfig::new(["content", "content"], Vec::<String>::new());
        assert!(config.validate().is_err());
    }

    #[test]
    fn no_text_fields_is_rejected() {
        let config = IndexConfig::new(Vec::<String>::new(), ["filename"]);
        assert!(matches!(config.validate(), Err(Error::InvalidArgument(_))));
    }

    #[test]
    fn empty_field_name_is_rejected() {
        let config = IndexConfig::new(["content"], [""]);
        assert!(config.validate().is_err());
    }

    #[test]
    fn search_params_defaults() {
        let params = SearchParams::new("fastmcp");
        assert_eq!(params.num_results, DEFAULT_NUM_RESULTS);
        assert!(params.filters.is_empty());
        assert_eq!(params.boost_for("content"), DEFAULT_BOOST);
        params.validate().unwrap();
    }

    #[test]
    fn repeated_filters_accumulate() {
        let params = SearchParams::new("q")
            .filter("filename", "a.md")
            .filter("filename", "b.md");
        assert_eq!(params.filters["filename"], vec!["a.md", "b.md"]);
    }

    #[test]
    fn zero_results_is_invalid() {
        let params = SearchParams::new("q").num_results(0);
        assert!(matches!(params.validate(), Err(Error::InvalidArgument(_))));
    }

    #[test]
    fn negative_or_nan_boost_is_invalid() {
        assert!(
            SearchParams::new("q").boost("title", -1.0).validate().is_err()
        );
        assert!(
            SearchParams::new("q")
                .boost("title", f32::NAN)
                .validate()
                .is_err()
        );
        SearchParams::new("q").boost("title", 0.0).validate().unwrap();
    }

    #[test]
    fn search_params_from_json_uses_defaults() {
        let params: SearchParams =
            serde_json::from_str(r#"{"query":"hello"}"#).unwrap();
        assert_eq!(params.num_results, DEFAULT_NUM_RESULTS);
        assert!(params.boosts.is_empty());
    }
}

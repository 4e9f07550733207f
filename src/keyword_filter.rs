//! Exact-match filtering on keyword fields.

use std::collections::{BTreeSet, HashMap};

use tracing::debug;

use crate::{config::KeywordFilters, doc_id::DocId, document::Document};

/// Per keyword field, exact value to the set of documents holding it.
#[derive(Debug, Default)]
pub struct KeywordFilter {
    fields: HashMap<String, HashMap<String, BTreeSet<DocId>>>,
    case_insensitive: bool,
}

impl KeywordFilter {
    pub fn new<'a>(
        fields: impl IntoIterator<Item = &'a str>,
        case_insensitive: bool,
    ) -> Self {
        Self {
            fields: fields
                .into_iter()
                .map(|f| (f.to_string(), HashMap::new()))
                .collect(),
            case_insensitive,
        }
    }

    /// Record the keyword values of `document`. Absent fields are skipped.
    pub fn add_document(&mut self, id: DocId, document: &Document) {
        let case_insensitive = self.case_insensitive;
        for (field, values) in &mut self.fields {
            if let Some(value) = document.get(field) {
                values
                    .entry(normalize(value, case_insensitive))
                    .or_default()
                    .insert(id);
            }
        }
    }

    /// Documents whose `field` equals `value` exactly.
    ///
    /// Unknown fields and unseen values both yield an empty set.
    pub fn documents_with(&self, field: &str, value: &str) -> BTreeSet<DocId> {
        self.fields
            .get(field)
            .and_then(|values| {
                values.get(&normalize(value, self.case_insensitive))
            })
            .cloned()
            .unwrap_or_default()
    }

    /// Documents satisfying every constraint in `filters`.
    ///
    /// Values listed for one field are alternatives; separate fields must
    /// all match. Returns `None` when `filters` is empty, meaning no
    /// restriction at all.
    pub fn matching(
        &self,
        filters: &KeywordFilters,
    ) -> Option<BTreeSet<DocId>> {
        let mut allowed: Option<BTreeSet<DocId>> = None;

        for (field, accepted) in filters {
            if !self.fields.contains_key(field) {
                debug!(field = %field, "filter on undeclared keyword field");
            }

            let mut field_matches = BTreeSet::new();
            for value in accepted {
                field_matches.extend(self.documents_with(field, value));
            }

            allowed = Some(match allowed {
                Some(prev) => {
                    prev.intersection(&field_matches).copied().collect()
                }
                None => field_matches,
            });

            if allowed.as_ref().is_some_and(BTreeSet::is_empty) {
                break;
            }
        }

        allowed
    }

    /// Number of distinct values recorded for `field`.
    pub fn num_values(&self, field: &str) -> usize {
        self.fields.get(field).map_or(0, HashMap::len)
    }
}

fn normalize(value: &str, case_insensitive: bool) -> String {
    if case_insensitive {
        value.to_lowercase()
    } else {
        value.to_string()
    }
}

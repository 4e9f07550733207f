//! Smoothed TF-IDF relevance scoring.
//!
//! For a query term `t` in a text field with `N` documents, of which `df`
//! contain `t`:
//!
//! ```text
//! idf(t)      = ln((N + 1) / (df + 1)) + 1
//! score(d)    = sum over fields f of
//!                 weight(f) * sum over t of idf_f(t) * tf_f(t, d)
//! ```
//!
//! The smoothing keeps `idf` strictly positive, so any matching term adds
//! to the score, and `idf` never grows when `df` grows.

use std::collections::BTreeMap;

use crate::{doc_id::DocId, inverted_index::InvertedIndex};

/// Inverse document frequency with add-one smoothing.
pub fn idf(total_documents: usize, document_frequency: usize) -> f32 {
    let n = total_documents as f64;
    let df = document_frequency as f64;
    (((n + 1.0) / (df + 1.0)).ln() + 1.0) as f32
}

struct WeightedTerm<'q> {
    term: &'q str,
    /// Query-side multiplicity times idf.
    weight: f32,
}

struct WeightedField<'a, 'q> {
    index: &'a InvertedIndex,
    boost: f32,
    terms: Vec<WeightedTerm<'q>>,
}

/// Scores documents for one tokenized query.
///
/// Term weights are resolved once up front; [`score`](Self::score) only
/// looks up term frequencies.
pub struct Scorer<'a, 'q> {
    fields: Vec<WeightedField<'a, 'q>>,
}

impl<'a, 'q> Scorer<'a, 'q> {
    /// `fields` pairs each text field's index with its boost. Iteration
    /// order fixes the summation order, so callers must pass fields in a
    /// stable order for scores to be reproducible.
    pub fn new(
        fields: impl IntoIterator<Item = (&'a InvertedIndex, f32)>,
        query_terms: &'q [String],
    ) -> Self {
        let mut counts: BTreeMap<&'q str, u32> = BTreeMap::new();
        for term in query_terms {
            *counts.entry(term.as_str()).or_insert(0) += 1;
        }

        let fields = fields
            .into_iter()
            .map(|(index, boost)| {
                let terms = counts
                    .iter()
                    .filter(|(term, _)| index.document_frequency(term) > 0)
                    .map(|(&term, &count)| WeightedTerm {
                        term,
                        weight: count as f32
                            * idf(
                                index.total_documents(),
                                index.document_frequency(term),
                            ),
                    })
                    .collect();
                WeightedField { index, boost, terms }
            })
            .collect();

        Self { fields }
    }

    /// Relevance of `id`; 0.0 when no query term occurs in any field.
    pub fn score(&self, id: DocId) -> f32 {
        self.fields
            .iter()
            .map(|field| {
                let sum: f32 = field
                    .terms
                    .iter()
                    .map(|t| {
                        let tf = field.index.term_frequency(t.term, id);
                        t.weight * tf as f32
                    })
                    .sum();
                field.boost * sum
            })
            .sum()
    }
}

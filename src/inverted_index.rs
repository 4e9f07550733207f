//! Per-field inverted index.
//!
//! Maps each term of one text field to the documents containing it, with
//! the raw term frequency for every (term, document) pair. Document
//! frequencies fall out of the posting sizes, so the field statistics need
//! no separate bookkeeping.

use std::collections::HashMap;

use crate::{doc_id::DocId, tokenizer::tokenize};

/// Term postings: document id to term frequency (always >= 1).
pub type Postings = HashMap<DocId, u32>;

#[derive(Debug, Default)]
pub struct InvertedIndex {
    postings: HashMap<String, Postings>,
    total_documents: usize,
    empty: Postings,
}

impl InvertedIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Index one document's value for this field.
    ///
    /// Every document counts toward [`total_documents`](Self::total_documents),
    /// including documents where the field is missing (`text == ""`).
    pub fn add_document(&mut self, id: DocId, text: &str) {
        self.total_documents += 1;

        for term in tokenize(text) {
            *self.postings.entry(term).or_default().entry(id).or_insert(0) +=
                1;
        }
    }

    /// Documents containing `term`; empty when the term was never seen.
    pub fn postings(&self, term: &str) -> &Postings {
        self.postings.get(term).unwrap_or(&self.empty)
    }

    pub fn term_frequency(&self, term: &str, id: DocId) -> u32 {
        self.postings
            .get(term)
            .and_then(|p| p.get(&id))
            .copied()
            .unwrap_or(0)
    }

    pub fn document_frequency(&self, term: &str) -> usize {
        self.postings.get(term).map_or(0, HashMap::len)
    }

    pub fn total_documents(&self) -> usize {
        self.total_documents
    }

    /// Number of distinct terms in this field.
    pub fn num_terms(&self) -> usize {
        self.postings.len()
    }
}

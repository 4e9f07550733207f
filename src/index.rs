//! The built search index and its query engine.
//!
//! An [`Index`] is built once from a batch of documents and is read-only
//! afterwards, so a shared `&Index` can serve concurrent searches without
//! locking. Updating the corpus means building a new index.

use std::collections::BTreeSet;

use serde::Serialize;
use tracing::{debug, info};

use crate::{
    config::{IndexConfig, SearchParams},
    doc_id::DocId,
    document::{Document, DocumentStore},
    error::Result,
    inverted_index::InvertedIndex,
    keyword_filter::KeywordFilter,
    scorer::Scorer,
    tokenizer::tokenize,
};

/// In-memory index over a fixed document batch.
#[derive(Debug)]
pub struct Index {
    config: IndexConfig,
    store: DocumentStore,
    /// One inverted index per text field, in declaration order.
    text: Vec<(String, InvertedIndex)>,
    keywords: KeywordFilter,
}

/// A ranked match. Borrows the stored document from the index.
#[derive(Debug, Clone, Serialize)]
pub struct SearchHit<'a> {
    pub id: DocId,
    pub score: f32,
    pub document: &'a Document,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IndexStats {
    pub documents: usize,
    pub text_fields: Vec<FieldStats>,
    pub keyword_fields: Vec<FieldStats>,
}

/// `distinct` counts terms for a text field, values for a keyword field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldStats {
    pub name: String,
    pub distinct: usize,
}

impl Index {
    /// Build an index from `documents` using the field layout in `config`.
    ///
    /// Documents receive ids 0, 1, 2, ... in iteration order. A document
    /// missing a declared field is indexed as if the field were empty. An
    /// empty batch is accepted and produces an index that matches nothing.
    pub fn build(
        documents: impl IntoIterator<Item = Document>,
        config: IndexConfig,
    ) -> Result<Self> {
        config.validate()?;

        let mut store = DocumentStore::new();
        let mut text: Vec<(String, InvertedIndex)> = config
            .text_fields
            .iter()
            .map(|name| (name.clone(), InvertedIndex::new()))
            .collect();
        let mut keywords = KeywordFilter::new(
            config.keyword_fields.iter().map(String::as_str),
            config.keyword_case_insensitive,
        );

        for document in documents {
            let id = store.add(document)?;
            let document = store.get(id)?;
            for (name, field) in &mut text {
                field.add_document(id, document.get(name).unwrap_or(""));
            }
            keywords.add_document(id, document);
        }

        for (name, field) in &text {
            debug!(
                field = %name,
                terms = field.num_terms(),
                "indexed text field"
            );
        }
        info!(
            documents = store.len(),
            text_fields = text.len(),
            keyword_fields = config.keyword_fields.len(),
            "built search index"
        );

        Ok(Self {
            config,
            store,
            text,
            keywords,
        })
    }

    /// Rank documents for `params`, best first.
    ///
    /// Only documents matching at least one query term are returned, so a
    /// query without terms yields no hits even when keyword filters are
    /// set. Equal scores are ordered by ascending [`DocId`].
    pub fn search(&self, params: &SearchParams) -> Result<Vec<SearchHit<'_>>> {
        params.validate()?;

        let terms = tokenize(&params.query);
        if terms.is_empty() {
            debug!(query = %params.query, "query has no terms");
            return Ok(Vec::new());
        }

        let mut candidates: BTreeSet<DocId> = BTreeSet::new();
        for (_, field) in &self.text {
            for term in &terms {
                candidates.extend(field.postings(term).keys().copied());
            }
        }

        if let Some(allowed) = self.keywords.matching(&params.filters) {
            candidates.retain(|id| allowed.contains(id));
        }
        debug!(
            terms = terms.len(),
            candidates = candidates.len(),
            "collected candidates"
        );

        let scorer = Scorer::new(
            self.text
                .iter()
                .map(|(name, field)| (field, params.boost_for(name))),
            &terms,
        );

        let mut ranked: Vec<(DocId, f32)> = candidates
            .into_iter()
            .map(|id| (id, scorer.score(id)))
            .filter(|&(_, score)| score > 0.0)
            .collect();
        ranked.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        ranked.truncate(params.num_results);

        ranked
            .into_iter()
            .map(|(id, score)| {
                Ok(SearchHit {
                    id,
                    score,
                    document: self.store.get(id)?,
                })
            })
            .collect()
    }

    pub fn get(&self, id: DocId) -> Result<&Document> {
        self.store.get(id)
    }

    pub fn documents(&self) -> impl Iterator<Item = (DocId, &Document)> {
        self.store.iter()
    }

    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    pub fn config(&self) -> &IndexConfig {
        &self.config
    }

    /// Text field index by name, if `name` was declared as a text field.
    pub fn text_field(&self, name: &str) -> Option<&InvertedIndex> {
        self.text
            .iter()
            .find(|(field, _)| field == name)
            .map(|(_, index)| index)
    }

    pub fn stats(&self) -> IndexStats {
        IndexStats {
            documents: self.store.len(),
            text_fields: self
                .text
                .iter()
                .map(|(name, field)| FieldStats {
                    name: name.clone(),
                    distinct: field.num_terms(),
                })
                .collect(),
            keyword_fields: self
                .config
                .keyword_fields
                .iter()
                .map(|name| FieldStats {
                    name: name.clone(),
                    distinct: self.keywords.num_values(name),
                })
                .collect(),
        }
    }
}

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{
    doc_id::DocId,
    error::{Error, Result},
};

/// A document as supplied by a source: field name to string value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Document {
    fields: BTreeMap<String, String>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style field setter.
    pub fn with(
        mut self,
        name: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        self.insert(name, value);
        self
    }

    pub fn insert(
        &mut self,
        name: impl Into<String>,
        value: impl Into<String>,
    ) {
        self.fields.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K, V> FromIterator<(K, V)> for Document
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            fields: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// Owns the original documents, addressed by [`DocId`].
#[derive(Debug, Default)]
pub struct DocumentStore {
    documents: Vec<Document>,
}

impl DocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a document and return its identifier.
    ///
    /// Fails once every [`DocId`] has been handed out.
    pub fn add(&mut self, document: Document) -> Result<DocId> {
        let id = id_for_position(self.documents.len())?;
        self.documents.push(document);
        Ok(id)
    }

    pub fn get(&self, id: DocId) -> Result<&Document> {
        self.documents.get(id.index()).ok_or_else(|| Error::NotFound {
            kind: "document",
            name: id.to_string(),
        })
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (DocId, &Document)> {
        self.documents
            .iter()
            .enumerate()
            .filter_map(|(i, doc)| Some((id_for_position(i).ok()?, doc)))
    }
}

fn id_for_position(position: usize) -> Result<DocId> {
    u32::try_from(position).map(DocId::new).map_err(|_| {
        Error::InvalidArgument(format!(
            "too many documents: id space is exhausted at {position}"
        ))
    })
}

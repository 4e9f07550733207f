use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// A document identifier assigned sequentially at build time.
///
/// Identifiers start at 0 and follow insertion order, so comparing two
/// ids also compares the order in which their documents were supplied.
/// An index holds at most `u32::MAX + 1` documents.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
)]
#[serde(transparent)]
pub struct DocId(u32);

impl DocId {
    pub fn new(value: u32) -> Self {
        Self(value)
    }

    pub fn get(self) -> u32 {
        self.0
    }

    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}

impl std::fmt::Display for DocId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Parses both the bare number (`3`) and the display form (`#3`).
impl FromStr for DocId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s.strip_prefix('#').unwrap_or(s);
        digits.parse::<u32>().map(Self).map_err(|_| {
            Error::InvalidArgument(format!("not a document id: {s:?}"))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_has_hash_prefix() {
        assert_eq!(DocId::new(7).to_string(), "#7");
    }

    #[test]
    fn ordering_follows_insertion() {
        assert!(DocId::new(0) < DocId::new(1));
    }

    #[test]
    fn parses_bare_and_prefixed() {
        assert_eq!("12".parse::<DocId>().unwrap(), DocId::new(12));
        assert_eq!("#12".parse::<DocId>().unwrap(), DocId::new(12));
    }

    #[test]
    fn rejects_garbage() {
        let err = "abc".parse::<DocId>().unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));
    }

    #[test]
    fn serializes_as_number() {
        let json = serde_json::to_string(&DocId::new(3)).unwrap();
        assert_eq!(json, "3");
    }
}

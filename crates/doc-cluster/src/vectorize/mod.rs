//! Vectorizer: corpus text → feature occurrence counts.
//!
//! Produces the vecrep records the clusterer loads. Tokens are stemmed
//! before they are looked up, so the feature dictionary lists stems.

pub mod corpus;
pub mod features;
pub mod tokenize;

pub use corpus::{parse_collection, Collection};
pub use features::FeatureDictionary;
pub use tokenize::{load_stopwords, tokenize};

use crate::error::{ClusterError, Result};
use crate::vecrep::VecrepRecord;
use std::collections::{BTreeMap, HashSet};
use tracing::info;

/// Turns documents into feature occurrence counts.
#[derive(Debug, Clone)]
pub struct Vectorizer {
    stopwords: HashSet<String>,
    features: FeatureDictionary,
}

impl Vectorizer {
    pub fn new(stopwords: HashSet<String>, features: FeatureDictionary) -> Self {
        Self {
            stopwords,
            features,
        }
    }

    /// Feature dimension of the produced vectors.
    pub fn dimension(&self) -> usize {
        self.features.dimension()
    }

    /// Feature occurrence counts of one text.
    pub fn count_features(&self, text: &str) -> BTreeMap<u32, u32> {
        let mut counts = BTreeMap::new();
        for token in tokenize(text, &self.stopwords) {
            if let Some(feature) = self.features.get(&token) {
                *counts.entry(feature).or_insert(0) += 1;
            }
        }
        counts
    }

    /// One record per page id `0..=max_id`.
    ///
    /// A page id missing from the collection is an error: document ids must
    /// be dense.
    pub fn vectorize(&self, collection: &Collection) -> Result<Vec<VecrepRecord>> {
        let Some(max_id) = collection.max_id() else {
            return Err(ClusterError::EmptyInput);
        };

        let mut records = Vec::with_capacity(collection.len());
        let mut featureless = 0usize;
        for id in 0..=max_id {
            let text = collection
                .documents
                .get(&id)
                .ok_or(ClusterError::DocumentGap { missing: id })?;
            let counts = self.count_features(text);
            if counts.is_empty() {
                featureless += 1;
            }
            records.push(VecrepRecord { id, counts });
        }

        info!(
            documents = records.len(),
            dimension = self.dimension(),
            featureless,
            "vectorized collection"
        );
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn vectorizer() -> Vectorizer {
        let stopwords = ["the", "a"].iter().map(|w| w.to_string()).collect();
        Vectorizer::new(stopwords, FeatureDictionary::from_terms(&["cat", "dog", "the"]))
    }

    #[test]
    fn test_count_features() {
        let counts = vectorizer().count_features("The cat chased a dog; the CAT won.");
        assert_eq!(counts.get(&0), Some(&2));
        assert_eq!(counts.get(&1), Some(&1));
        // stop-words never count even when listed as features
        assert_eq!(counts.get(&2), None);
    }

    #[test]
    fn test_vectorize_collection() {
        let corpus = "<id>0</id>\n<title>Cats</title>\n<text>cat cat</text>\n\
                      <id>1</id>\n<title>Dogs</title>\n<text>dog</text>\n";
        let collection = parse_collection(Cursor::new(corpus)).unwrap();
        let records = vectorizer().vectorize(&collection).unwrap();
        assert_eq!(records.len(), 2);
        // titles count too, and "Cats" stems to "cat"
        assert_eq!(records[0].counts.get(&0), Some(&3));
        assert_eq!(records[1].sum_of_squares(), 4);
    }

    #[test]
    fn test_gap_is_reported() {
        let corpus = "<id>0</id>\n<title>a</title>\n<text>cat</text>\n\
                      <id>2</id>\n<title>b</title>\n<text>dog</text>\n";
        let collection = parse_collection(Cursor::new(corpus)).unwrap();
        let err = vectorizer().vectorize(&collection).unwrap_err();
        assert!(matches!(err, ClusterError::DocumentGap { missing: 1 }));
    }

    #[test]
    fn test_empty_collection() {
        let err = vectorizer().vectorize(&Collection::default()).unwrap_err();
        assert!(matches!(err, ClusterError::EmptyInput));
    }
}

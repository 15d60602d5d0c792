//! Feature dictionary: term → feature index.

use crate::error::Result;
use std::collections::HashMap;
use std::io::BufRead;

/// Terms selected as features. A term's index is the line it was read from.
#[derive(Debug, Clone, Default)]
pub struct FeatureDictionary {
    index: HashMap<String, u32>,
    dimension: usize,
}

impl FeatureDictionary {
    /// Read one feature per line. Blank lines still consume an index.
    pub fn from_reader<R: BufRead>(reader: R) -> Result<Self> {
        let mut index = HashMap::new();
        let mut dimension = 0;
        for (line_no, line) in (0u32..).zip(reader.lines()) {
            let line = line?;
            let term = line.trim();
            if !term.is_empty() {
                index.insert(term.to_string(), line_no);
            }
            dimension += 1;
        }
        Ok(Self { index, dimension })
    }

    /// Build from terms in index order.
    pub fn from_terms<S: AsRef<str>>(terms: &[S]) -> Self {
        let index = (0u32..)
            .zip(terms)
            .map(|(i, t)| (AsRef::<str>::as_ref(t).to_string(), i))
            .collect();
        Self {
            index,
            dimension: terms.len(),
        }
    }

    pub fn get(&self, term: &str) -> Option<u32> {
        self.index.get(term).copied()
    }

    /// Feature dimension `F`.
    pub fn dimension(&self) -> usize {
        self.dimension
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_index_is_line_number() {
        let dict = FeatureDictionary::from_reader(Cursor::new("appl\nbanana\n\ncherri\n")).unwrap();
        assert_eq!(dict.dimension(), 4);
        assert_eq!(dict.get("appl"), Some(0));
        assert_eq!(dict.get("cherri"), Some(3));
        assert_eq!(dict.get(""), None);
        assert_eq!(dict.get("durian"), None);
    }

    #[test]
    fn test_from_terms() {
        let dict = FeatureDictionary::from_terms(&["x", "y"]);
        assert_eq!(dict.dimension(), 2);
        assert_eq!(dict.get("y"), Some(1));
    }
}

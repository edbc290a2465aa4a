use crate::text;
use ahash::AHashMap;
use rayon::prelude::*;
use std::collections::BTreeMap;

/// One sparse row of the term-weight matrix, entries sorted by column.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SparseRow {
    entries: Vec<(u32, f32)>,
}

impl SparseRow {
    #[inline]
    #[must_use]
    pub fn entries(&self) -> &[(u32, f32)] {
        &self.entries
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Dot product of two sorted sparse rows
    pub fn dot(&self, other: &SparseRow) -> f32 {
        let (mut i, mut j) = (0, 0);
        let mut sum = 0.0f32;
        while i < self.entries.len() && j < other.entries.len() {
            let (ca, wa) = self.entries[i];
            let (cb, wb) = other.entries[j];
            match ca.cmp(&cb) {
                std::cmp::Ordering::Less => i += 1,
                std::cmp::Ordering::Greater => j += 1,
                std::cmp::Ordering::Equal => {
                    sum += wa * wb;
                    i += 1;
                    j += 1;
                }
            }
        }
        sum
    }
}

/// TF-IDF weights, one sparse row per document
#[derive(Debug, Clone, Default)]
pub struct TermWeightMatrix {
    rows: Vec<SparseRow>,
    n_terms: usize,
}

impl TermWeightMatrix {
    #[inline]
    #[must_use]
    pub fn n_rows(&self) -> usize {
        self.rows.len()
    }

    #[inline]
    #[must_use]
    pub fn n_terms(&self) -> usize {
        self.n_terms
    }

    /// # Panics
    ///
    /// Panics if `i` is not below [`n_rows`](Self::n_rows).
    #[inline]
    #[must_use]
    pub fn row(&self, i: usize) -> &SparseRow {
        &self.rows[i]
    }

    pub fn rows(&self) -> &[SparseRow] {
        &self.rows
    }
}

/// Fits a vocabulary and smoothed inverse document frequencies over a corpus.
///
/// Weights are raw term counts times `ln((1 + n) / (1 + df)) + 1`, and every
/// row is scaled to unit L2 norm. The vocabulary is ordered lexicographically,
/// so the same ordered corpus always yields the same matrix.
#[derive(Debug, Clone, Default)]
pub struct TfIdfVectorizer {
    vocabulary: AHashMap<String, u32>,
    idf: Vec<f32>,
}

impl TfIdfVectorizer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    #[must_use]
    pub fn vocabulary_size(&self) -> usize {
        self.vocabulary.len()
    }

    pub fn fit_transform<S: AsRef<str> + Sync>(&mut self, documents: &[S]) -> TermWeightMatrix {
        let tokenized: Vec<Vec<String>> = documents
            .par_iter()
            .map(|doc| text::terms(doc.as_ref()))
            .collect();

        let mut doc_freq: BTreeMap<&str, u32> = BTreeMap::new();
        for tokens in &tokenized {
            let mut seen: Vec<&str> = tokens.iter().map(String::as_str).collect();
            seen.sort_unstable();
            seen.dedup();
            for term in seen {
                *doc_freq.entry(term).or_insert(0) += 1;
            }
        }

        let n_docs = documents.len() as f64;
        self.vocabulary = AHashMap::with_capacity(doc_freq.len());
        self.idf = Vec::with_capacity(doc_freq.len());
        for (idx, (term, df)) in doc_freq.into_iter().enumerate() {
            self.vocabulary.insert(term.to_string(), idx as u32);
            self.idf
                .push((((1.0 + n_docs) / (1.0 + f64::from(df))).ln() + 1.0) as f32);
        }

        let rows = tokenized
            .par_iter()
            .map(|tokens| self.weigh(tokens))
            .collect();

        TermWeightMatrix {
            rows,
            n_terms: self.vocabulary.len(),
        }
    }

    fn weigh(&self, tokens: &[String]) -> SparseRow {
        let mut counts: AHashMap<u32, u32> = AHashMap::new();
        for token in tokens {
            if let Some(&col) = self.vocabulary.get(token) {
                *counts.entry(col).or_insert(0) += 1;
            }
        }

        let mut entries: Vec<(u32, f32)> = counts
            .into_iter()
            .map(|(col, tf)| (col, tf as f32 * self.idf[col as usize]))
            .collect();
        entries.sort_unstable_by_key(|&(col, _)| col);

        let norm = entries.iter().map(|&(_, w)| w * w).sum::<f32>().sqrt();
        if norm > 0.0 {
            for (_, w) in &mut entries {
                *w /= norm;
            }
        }

        SparseRow { entries }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rows_are_unit_norm() {
        let docs = ["red shoes sport", "blue shoes sport", "red jacket winter"];
        let mut vectorizer = TfIdfVectorizer::new();
        let matrix = vectorizer.fit_transform(&docs);

        assert_eq!(matrix.n_rows(), 3);
        assert_eq!(matrix.n_terms(), 6);
        for row in matrix.rows() {
            assert!((row.dot(row) - 1.0).abs() < 1e-5);
        }
    }

    #[test]
    fn test_rare_terms_weigh_more() {
        let docs = ["shoes blue", "shoes red", "shoes green"];
        let mut vectorizer = TfIdfVectorizer::new();
        let matrix = vectorizer.fit_transform(&docs);

        // columns are lexicographic: blue, green, red, shoes
        let row = matrix.row(0).entries();
        assert_eq!(row.len(), 2);
        assert_eq!(row[0].0, 0);
        assert_eq!(row[1].0, 3);
        assert!(row[0].1 > row[1].1);
    }

    #[test]
    fn test_stop_word_only_document_is_zero() {
        let docs = ["the and of", "leather belt"];
        let mut vectorizer = TfIdfVectorizer::new();
        let matrix = vectorizer.fit_transform(&docs);

        assert!(matrix.row(0).is_empty());
        assert_eq!(matrix.row(0).dot(matrix.row(1)), 0.0);
    }

    #[test]
    fn test_deterministic() {
        let docs = ["wool scarf winter", "silk scarf summer", "wool socks"];
        let a = TfIdfVectorizer::new().fit_transform(&docs);
        let b = TfIdfVectorizer::new().fit_transform(&docs);
        assert_eq!(a.rows(), b.rows());
    }

    #[test]
    #[should_panic]
    fn test_row_out_of_range() {
        let weights = TfIdfVectorizer::new().fit_transform(&["cotton shirt"]);
        let _ = weights.row(1);
    }
}

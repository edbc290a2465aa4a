use crate::vectorizer::TermWeightMatrix;
use rayon::prelude::*;

/// Dense pairwise similarity over the rows of a [`TermWeightMatrix`].
///
/// `get(i, j)` is the dot product of rows `i` and `j`. Each unordered pair is
/// computed once and mirrored, so the matrix is exactly symmetric. Memory is
/// `n * n` floats.
#[derive(Debug, Clone, Default)]
pub struct SimilarityMatrix {
    n: usize,
    data: Vec<f32>,
}

impl SimilarityMatrix {
    pub fn from_weights(weights: &TermWeightMatrix) -> Self {
        let n = weights.n_rows();

        // column -> [(row, weight)], rows ascending
        let mut postings: Vec<Vec<(u32, f32)>> = vec![Vec::new(); weights.n_terms()];
        for (row, sparse) in weights.rows().iter().enumerate() {
            for &(col, w) in sparse.entries() {
                postings[col as usize].push((row as u32, w));
            }
        }

        // upper[i][j - i] = sim(i, j) for j >= i
        let upper: Vec<Vec<f32>> = (0..n)
            .into_par_iter()
            .map(|i| {
                let mut acc = vec![0.0f32; n - i];
                for &(col, wi) in weights.row(i).entries() {
                    let list = &postings[col as usize];
                    let start = list.partition_point(|&(row, _)| (row as usize) < i);
                    for &(j, wj) in &list[start..] {
                        acc[j as usize - i] += wi * wj;
                    }
                }
                acc
            })
            .collect();

        let mut data = vec![0.0f32; n * n];
        for (i, row) in upper.into_iter().enumerate() {
            for (offset, score) in row.into_iter().enumerate() {
                let j = i + offset;
                data[i * n + j] = score;
                data[j * n + i] = score;
            }
        }

        // proportional rows normalize to vectors an ulp apart, so a mirrored
        // cell can exceed the diagonal; the diagonal stays the row maximum
        for i in 0..n {
            let row = &data[i * n..(i + 1) * n];
            let max = row.iter().copied().fold(0.0f32, f32::max);
            data[i * n + i] = max;
        }

        Self { n, data }
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.n
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.n == 0
    }

    /// # Panics
    ///
    /// Panics if `i` or `j` is not below [`len`](Self::len).
    #[inline]
    pub fn get(&self, i: usize, j: usize) -> f32 {
        assert!(j < self.n, "column {j} out of range for {} rows", self.n);
        self.data[i * self.n + j]
    }

    /// # Panics
    ///
    /// Panics if `i` is not below [`len`](Self::len).
    #[inline]
    pub fn row(&self, i: usize) -> &[f32] {
        &self.data[i * self.n..(i + 1) * self.n]
    }
}

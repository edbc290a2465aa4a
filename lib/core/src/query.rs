// Ranking over a published model snapshot
use crate::{Error, ModelSnapshot, Result};
use ahash::AHashSet;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Whether items from the user's history may come back in history
/// recommendations when they are not also listed as excluded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HistoryPolicy {
    #[default]
    ExcludeLiked,
    IncludeLiked,
}

/// Descending score, ascending row on ties
#[inline]
fn by_score(a: &(usize, f32), b: &(usize, f32)) -> Ordering {
    b.1.total_cmp(&a.1).then_with(|| a.0.cmp(&b.0))
}

impl ModelSnapshot {
    /// Rows shadowed by a later record with the same id never surface.
    #[inline]
    fn is_canonical(&self, row: usize) -> bool {
        self.index()
            .reverse(row)
            .and_then(|id| self.index().lookup(id))
            == Some(row)
    }

    /// Top `k` rows most similar to `row`, excluding `row` itself.
    pub fn similar_rows(&self, row: usize, k: usize) -> Vec<usize> {
        if k == 0 {
            return Vec::new();
        }

        let mut scored: Vec<(usize, f32)> = self
            .similarity()
            .row(row)
            .iter()
            .copied()
            .enumerate()
            .filter(|&(j, _)| j != row && self.is_canonical(j))
            .collect();
        scored.sort_by(by_score);
        scored.truncate(k);
        scored.into_iter().map(|(j, _)| j).collect()
    }

    /// Top `k` rows by summed similarity to every row in `liked`.
    pub fn history_rows(
        &self,
        liked: &[usize],
        exclude: &AHashSet<&str>,
        k: usize,
        policy: HistoryPolicy,
    ) -> Vec<usize> {
        if liked.is_empty() || k == 0 {
            return Vec::new();
        }

        let mut totals = vec![0.0f32; self.len()];
        for &row in liked {
            for (total, score) in totals.iter_mut().zip(self.similarity().row(row)) {
                *total += *score;
            }
        }

        let mut scored: Vec<(usize, f32)> = totals
            .into_iter()
            .enumerate()
            .filter(|&(j, _)| self.is_canonical(j))
            .collect();
        scored.sort_by(by_score);

        scored
            .into_iter()
            .map(|(j, _)| j)
            .filter(|&j| {
                let id = self.index().reverse(j).unwrap_or_default();
                if exclude.contains(id) {
                    return false;
                }
                policy == HistoryPolicy::IncludeLiked || !liked.contains(&j)
            })
            .take(k)
            .collect()
    }

    /// Ids of the `k` items most similar to `id`.
    pub fn recommend_similar(&self, id: &str, k: usize) -> Result<Vec<String>> {
        let row = self
            .index()
            .lookup(id)
            .ok_or_else(|| Error::ItemNotFound(id.to_string()))?;
        Ok(self.ids_for(self.similar_rows(row, k)))
    }

    /// Ids of the `k` items closest to the combined history. Unknown liked ids
    /// are skipped; when none resolve the result is empty.
    pub fn recommend_for_history<L, E>(
        &self,
        liked: &[L],
        exclude: &[E],
        k: usize,
        policy: HistoryPolicy,
    ) -> Vec<String>
    where
        L: AsRef<str>,
        E: AsRef<str>,
    {
        let mut rows: Vec<usize> = liked
            .iter()
            .filter_map(|id| self.index().lookup(id.as_ref()))
            .collect();
        rows.sort_unstable();
        rows.dedup();

        let exclude: AHashSet<&str> = exclude.iter().map(|id| id.as_ref()).collect();
        self.ids_for(self.history_rows(&rows, &exclude, k, policy))
    }

    fn ids_for(&self, rows: Vec<usize>) -> Vec<String> {
        rows.into_iter()
            .filter_map(|row| self.index().reverse(row).map(str::to_string))
            .collect()
    }
}

use std::collections::{HashMap, HashSet};

use super::items::Itemset;

/// Apriori candidate generation (join + prune).
///
/// Joins every unordered pair of frequent (k-1)-itemsets whose union has
/// exactly `k` elements, then discards any candidate with a (k-1)-subset
/// missing from `prev_level` (anti-monotonicity: such a candidate cannot be
/// frequent and must never reach support counting). Set semantics
/// deduplicate joins that produce the same union.
///
/// The pairwise join is O(|prev_level|^2) per level, which is fine for item
/// catalogs up to a few thousand distinct items.
pub fn generate_candidates(prev_level: &HashMap<Itemset, f64>, k: usize) -> HashSet<Itemset> {
    debug_assert!(k >= 2);

    let prev: Vec<&Itemset> = prev_level.keys().collect();
    let mut candidates = HashSet::new();

    for i in 0..prev.len() {
        for j in (i + 1)..prev.len() {
            let union = prev[i].union(prev[j]);
            if union.len() != k {
                continue;
            }
            if has_infrequent_subset(&union, prev_level) {
                continue;
            }
            candidates.insert(union);
        }
    }

    candidates
}

/// True when any (k-1)-subset of `candidate` is absent from the previous
/// frequent level.
fn has_infrequent_subset(candidate: &Itemset, prev_level: &HashMap<Itemset, f64>) -> bool {
    candidate
        .drop_one_subsets()
        .any(|subset| !prev_level.contains_key(&subset))
}

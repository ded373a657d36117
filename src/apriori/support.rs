use super::items::Itemset;
use super::transactions::TransactionStore;

/// Number of transactions containing every item of `itemset`.
///
/// Linear scan with a sorted-slice subset test: O(N * |itemset|). This is
/// the dominant cost path of a mining run; an inverted index over postings
/// lists would be a behavior-preserving optimization for very large
/// catalogs.
pub fn support_count(store: &TransactionStore, itemset: &Itemset) -> usize {
    store.iter().filter(|tx| itemset.is_subset_of(tx)).count()
}

/// Fraction of transactions containing `itemset`. Zero for an empty store.
pub fn support(store: &TransactionStore, itemset: &Itemset) -> f64 {
    if store.is_empty() {
        return 0.0;
    }
    support_count(store, itemset) as f64 / store.len() as f64
}

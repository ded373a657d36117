use super::items::{ItemId, Itemset};

/// Invokes `callback` once per k-combination of `items`, in lexicographic
/// index order. `items` must already be in canonical (sorted) order, so
/// each emitted combination is itself canonical.
pub fn for_each_combination<F>(items: &[ItemId], k: usize, callback: &mut F)
where
    F: FnMut(&[ItemId]),
{
    if k == 0 || k > items.len() {
        return;
    }
    let mut current = Vec::with_capacity(k);
    combine_recursive(items, k, 0, &mut current, callback);
}

fn combine_recursive<F>(
    items: &[ItemId],
    k: usize,
    start: usize,
    current: &mut Vec<ItemId>,
    callback: &mut F,
) where
    F: FnMut(&[ItemId]),
{
    if current.len() == k {
        callback(current);
        return;
    }

    for i in start..items.len() {
        current.push(items[i]);
        combine_recursive(items, k, i + 1, current, callback);
        current.pop();
    }
}

/// All non-empty proper subsets of `itemset`, sizes 1..len-1. These are the
/// antecedent candidates when deriving rules from a frequent itemset.
pub fn proper_subsets(itemset: &Itemset) -> Vec<Itemset> {
    let items = itemset.as_slice();
    let mut subsets = Vec::new();
    for k in 1..items.len() {
        for_each_combination(items, k, &mut |combination| {
            subsets.push(Itemset::from_sorted(combination));
        });
    }
    subsets
}

use std::collections::HashMap;
use std::fmt;

/// Dense item identifier assigned by the catalog in first-seen order.
pub type ItemId = usize;

/// Interns item labels to dense ids and resolves them back.
///
/// Labels are normalized (trimmed, lowercased) before interning, so
/// `" Milk "` and `"milk"` are the same item.
#[derive(Debug, Clone, Default)]
pub struct ItemCatalog {
    labels: Vec<String>,
    index: HashMap<String, ItemId>,
}

impl ItemCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Normalizes a raw label. Returns `None` when nothing remains after
    /// trimming.
    pub fn normalize(raw: &str) -> Option<String> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return None;
        }
        Some(trimmed.to_lowercase())
    }

    /// Interns an already-normalized label, returning its id.
    pub fn intern(&mut self, label: String) -> ItemId {
        if let Some(&id) = self.index.get(&label) {
            return id;
        }
        let id = self.labels.len();
        self.index.insert(label.clone(), id);
        self.labels.push(label);
        id
    }

    /// Looks up the id of a normalized label, if it was ever interned.
    pub fn id_of(&self, label: &str) -> Option<ItemId> {
        self.index.get(label).copied()
    }

    pub fn label(&self, id: ItemId) -> Option<&str> {
        self.labels.get(id).map(String::as_str)
    }

    /// Number of distinct items seen.
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Resolves an itemset to its labels, in the itemset's canonical order.
    pub fn labels_of<'a>(&'a self, itemset: &Itemset) -> Vec<&'a str> {
        itemset
            .iter()
            .map(|id| self.label(id).unwrap_or(""))
            .collect()
    }

    /// Label-lexicographic comparison of two itemsets. Used as the
    /// documented tie-break for rule ranking so ordering does not depend
    /// on interning order.
    pub fn compare_by_labels(&self, a: &Itemset, b: &Itemset) -> std::cmp::Ordering {
        let mut la: Vec<&str> = self.labels_of(a);
        let mut lb: Vec<&str> = self.labels_of(b);
        la.sort_unstable();
        lb.sort_unstable();
        la.cmp(&lb)
    }
}

/// An immutable set of distinct items in canonical (sorted) form.
///
/// Equality and hashing follow the canonical order, so two itemsets built
/// from the same elements in any insertion order compare equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Itemset(Box<[ItemId]>);

impl Itemset {
    /// Builds an itemset from ids in any order; duplicates collapse.
    pub fn new(mut ids: Vec<ItemId>) -> Self {
        ids.sort_unstable();
        ids.dedup();
        Self(ids.into_boxed_slice())
    }

    pub fn singleton(id: ItemId) -> Self {
        Self(Box::new([id]))
    }

    /// Builds directly from a slice already sorted and deduplicated.
    pub(crate) fn from_sorted(ids: &[ItemId]) -> Self {
        debug_assert!(ids.windows(2).all(|w| w[0] < w[1]));
        Self(ids.to_vec().into_boxed_slice())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = ItemId> + '_ {
        self.0.iter().copied()
    }

    pub fn as_slice(&self) -> &[ItemId] {
        &self.0
    }

    pub fn contains(&self, id: ItemId) -> bool {
        self.0.binary_search(&id).is_ok()
    }

    /// Set union, preserving canonical form.
    pub fn union(&self, other: &Itemset) -> Itemset {
        let mut merged = Vec::with_capacity(self.len() + other.len());
        let (a, b) = (&self.0, &other.0);
        let (mut i, mut j) = (0, 0);
        while i < a.len() && j < b.len() {
            match a[i].cmp(&b[j]) {
                std::cmp::Ordering::Less => {
                    merged.push(a[i]);
                    i += 1;
                }
                std::cmp::Ordering::Greater => {
                    merged.push(b[j]);
                    j += 1;
                }
                std::cmp::Ordering::Equal => {
                    merged.push(a[i]);
                    i += 1;
                    j += 1;
                }
            }
        }
        merged.extend_from_slice(&a[i..]);
        merged.extend_from_slice(&b[j..]);
        Itemset(merged.into_boxed_slice())
    }

    /// Elements of `self` not in `other`.
    pub fn difference(&self, other: &Itemset) -> Itemset {
        let ids: Vec<ItemId> = self.iter().filter(|&id| !other.contains(id)).collect();
        Itemset(ids.into_boxed_slice())
    }

    /// Subset test against another sorted id sequence.
    pub fn is_subset_of(&self, other: &[ItemId]) -> bool {
        let mut j = 0;
        for &id in self.0.iter() {
            while j < other.len() && other[j] < id {
                j += 1;
            }
            if j == other.len() || other[j] != id {
                return false;
            }
            j += 1;
        }
        true
    }

    pub fn is_disjoint(&self, other: &Itemset) -> bool {
        !self.iter().any(|id| other.contains(id))
    }

    /// All subsets obtained by dropping exactly one element. Empty for
    /// singletons.
    pub fn drop_one_subsets(&self) -> impl Iterator<Item = Itemset> + '_ {
        (0..self.0.len()).filter(|_| self.0.len() > 1).map(move |skip| {
            let ids: Vec<ItemId> = self
                .0
                .iter()
                .enumerate()
                .filter(|&(i, _)| i != skip)
                .map(|(_, &id)| id)
                .collect();
            Itemset(ids.into_boxed_slice())
        })
    }
}

impl fmt::Display for Itemset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, id) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", id)?;
        }
        write!(f, "}}")
    }
}

use super::items::{ItemCatalog, ItemId};

/// Construction-time contract violations. Malformed input fails here, not
/// inside support arithmetic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// A label in the given transaction was empty after normalization.
    EmptyItemLabel { transaction: usize },
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreError::EmptyItemLabel { transaction } => {
                write!(f, "empty item label in transaction {}", transaction)
            }
        }
    }
}

impl std::error::Error for StoreError {}

/// Immutable transaction database: the substrate every other component
/// queries. Each transaction is a sorted, deduplicated id sequence; the
/// store owns the catalog that maps ids back to labels.
///
/// An empty store is valid and mines to an empty result.
#[derive(Debug, Clone, Default)]
pub struct TransactionStore {
    transactions: Vec<Vec<ItemId>>,
    catalog: ItemCatalog,
}

impl TransactionStore {
    /// Builds a store from label transactions. Labels are trimmed and
    /// lowercased; duplicates within a transaction collapse.
    pub fn from_labels<I, T, S>(input: I) -> Result<Self, StoreError>
    where
        I: IntoIterator<Item = T>,
        T: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut catalog = ItemCatalog::new();
        let mut transactions = Vec::new();

        for (tx_idx, raw_tx) in input.into_iter().enumerate() {
            let mut ids: Vec<ItemId> = Vec::new();
            for raw in raw_tx {
                let label = ItemCatalog::normalize(raw.as_ref())
                    .ok_or(StoreError::EmptyItemLabel { transaction: tx_idx })?;
                ids.push(catalog.intern(label));
            }
            ids.sort_unstable();
            ids.dedup();
            transactions.push(ids);
        }

        Ok(Self { transactions, catalog })
    }

    /// Number of transactions; the support denominator.
    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }

    /// Number of distinct items across the store.
    pub fn item_count(&self) -> usize {
        self.catalog.len()
    }

    pub fn catalog(&self) -> &ItemCatalog {
        &self.catalog
    }

    /// Iterates transactions as sorted id slices.
    pub fn iter(&self) -> impl Iterator<Item = &[ItemId]> {
        self.transactions.iter().map(Vec::as_slice)
    }

    pub fn transaction(&self, idx: usize) -> Option<&[ItemId]> {
        self.transactions.get(idx).map(Vec::as_slice)
    }
}

pub mod candidates;
pub mod combinations;
pub mod control;
pub mod items;
pub mod mining;
pub mod results;
pub mod rules;
pub mod support;
pub mod transactions;

pub use candidates::generate_candidates;
pub use control::{CancelToken, MineOptions, MiningObserver};
pub use items::{ItemCatalog, ItemId, Itemset};
pub use mining::{Apriori, ConfigError, MiningError};
pub use results::{
    FrequentItemsets, ItemsetRecord, MiningSummary, RankMetric, ResultSet, RuleRecord, RuleStats,
};
pub use rules::{AssociationRule, Metric};
pub use support::{support, support_count};
pub use transactions::{StoreError, TransactionStore};

#[cfg(test)]
mod tests;

pub mod apriori;

pub use apriori::{
    generate_candidates, support, support_count, Apriori, AssociationRule, CancelToken,
    ConfigError, FrequentItemsets, ItemCatalog, ItemId, Itemset, ItemsetRecord, Metric,
    MineOptions, MiningError, MiningObserver, MiningSummary, RankMetric, ResultSet, RuleRecord,
    RuleStats, StoreError, TransactionStore,
};

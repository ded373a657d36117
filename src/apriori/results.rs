use std::collections::{BTreeMap, HashMap};

use serde::Serialize;

use super::items::{ItemCatalog, Itemset};
use super::rules::{AssociationRule, Metric};
use super::transactions::TransactionStore;

/// Frequent itemsets grouped by size. Levels with no members are never
/// stored, and every itemset at level k has all its (k-1)-subsets at level
/// k-1 (downward closure).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrequentItemsets {
    levels: BTreeMap<usize, HashMap<Itemset, f64>>,
}

impl FrequentItemsets {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a level; empty levels are discarded.
    pub(crate) fn insert_level(&mut self, k: usize, level: HashMap<Itemset, f64>) {
        if !level.is_empty() {
            self.levels.insert(k, level);
        }
    }

    /// Itemsets of the given size, if any were frequent.
    pub fn level(&self, k: usize) -> Option<&HashMap<Itemset, f64>> {
        self.levels.get(&k)
    }

    /// Iterates `(size, itemsets)` in ascending size order.
    pub fn levels(&self) -> impl Iterator<Item = (usize, &HashMap<Itemset, f64>)> {
        self.levels.iter().map(|(&k, level)| (k, level))
    }

    /// Largest frequent itemset size, or zero when nothing is frequent.
    pub fn max_size(&self) -> usize {
        self.levels.keys().next_back().copied().unwrap_or(0)
    }

    pub fn support_of(&self, itemset: &Itemset) -> Option<f64> {
        self.levels.get(&itemset.len())?.get(itemset).copied()
    }

    /// Total itemsets across all levels.
    pub fn total(&self) -> usize {
        self.levels.values().map(HashMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }
}

/// Secondary ranking key for [`ResultSet::top_rules`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RankMetric {
    Support,
    Confidence,
    Lift,
    Conviction,
}

impl RankMetric {
    fn key(self, rule: &AssociationRule) -> Metric {
        match self {
            RankMetric::Support => Metric::Finite(rule.support),
            RankMetric::Confidence => Metric::Finite(rule.confidence),
            RankMetric::Lift => rule.lift,
            RankMetric::Conviction => rule.conviction,
        }
    }
}

/// Coverage statistics for a mined rule set against its store.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RuleStats {
    /// Fraction of transactions matched by at least one rule antecedent.
    pub coverage: f64,
    /// Mean of antecedent length + consequent length across rules.
    pub avg_rule_length: f64,
    pub covered_transactions: usize,
    pub total_transactions: usize,
}

/// Flat, serializable view of one frequent itemset, for export
/// collaborators.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ItemsetRecord {
    pub items: Vec<String>,
    pub size: usize,
    pub support: f64,
}

/// Flat, serializable view of one rule. Unbounded metrics serialize to
/// null.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RuleRecord {
    pub antecedent: Vec<String>,
    pub consequent: Vec<String>,
    pub support: f64,
    pub confidence: f64,
    pub lift: Metric,
    pub conviction: Metric,
}

/// Run summary in the shape export collaborators persist alongside the
/// tables.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MiningSummary {
    pub total_frequent_itemsets: usize,
    pub itemsets_by_size: BTreeMap<usize, usize>,
    pub total_rules: usize,
    pub min_support: f64,
    pub min_confidence: f64,
}

/// Immutable output of one mining invocation: the frequent-itemset table,
/// the ranked rules, and a snapshot of the item catalog for resolving ids
/// back to labels. Read access only; presentation and export live outside
/// the core.
#[derive(Debug, Clone)]
pub struct ResultSet {
    itemsets: FrequentItemsets,
    rules: Vec<AssociationRule>,
    catalog: ItemCatalog,
    min_support: f64,
    min_confidence: f64,
}

impl ResultSet {
    pub(crate) fn new(
        itemsets: FrequentItemsets,
        rules: Vec<AssociationRule>,
        catalog: ItemCatalog,
        min_support: f64,
        min_confidence: f64,
    ) -> Self {
        Self {
            itemsets,
            rules,
            catalog,
            min_support,
            min_confidence,
        }
    }

    pub fn frequent_itemsets(&self) -> &FrequentItemsets {
        &self.itemsets
    }

    /// Rules ranked by confidence descending, ties broken by
    /// label-lexicographic antecedent then consequent.
    pub fn rules(&self) -> &[AssociationRule] {
        &self.rules
    }

    pub fn catalog(&self) -> &ItemCatalog {
        &self.catalog
    }

    pub fn labels(&self, itemset: &Itemset) -> Vec<&str> {
        self.catalog.labels_of(itemset)
    }

    pub fn is_empty(&self) -> bool {
        self.itemsets.is_empty()
    }

    /// The top `n` rules under the given metric. Ties keep their overall
    /// confidence ranking.
    pub fn top_rules(&self, n: usize, metric: RankMetric) -> Vec<&AssociationRule> {
        let mut ranked: Vec<&AssociationRule> = self.rules.iter().collect();
        ranked.sort_by(|a, b| {
            metric
                .key(b)
                .partial_cmp(&metric.key(a))
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        ranked.truncate(n);
        ranked
    }

    /// Coverage and length statistics for this rule set against the store
    /// it was mined from.
    pub fn rule_stats(&self, store: &TransactionStore) -> RuleStats {
        let total_transactions = store.len();
        if self.rules.is_empty() || total_transactions == 0 {
            return RuleStats {
                coverage: 0.0,
                avg_rule_length: 0.0,
                covered_transactions: 0,
                total_transactions,
            };
        }

        let covered_transactions = store
            .iter()
            .filter(|tx| self.rules.iter().any(|rule| rule.antecedent.is_subset_of(tx)))
            .count();
        let total_length: usize = self.rules.iter().map(AssociationRule::len).sum();

        RuleStats {
            coverage: covered_transactions as f64 / total_transactions as f64,
            avg_rule_length: total_length as f64 / self.rules.len() as f64,
            covered_transactions,
            total_transactions,
        }
    }

    /// Frequent itemsets flattened to label records, ordered by size then
    /// labels.
    pub fn itemset_records(&self) -> Vec<ItemsetRecord> {
        let mut records: Vec<ItemsetRecord> = self
            .itemsets
            .levels()
            .flat_map(|(k, level)| {
                level.iter().map(move |(itemset, &support)| ItemsetRecord {
                    items: self
                        .labels(itemset)
                        .into_iter()
                        .map(str::to_owned)
                        .collect(),
                    size: k,
                    support,
                })
            })
            .collect();
        records.sort_by(|a, b| a.size.cmp(&b.size).then_with(|| a.items.cmp(&b.items)));
        records
    }

    /// Rules flattened to label records, in ranked order.
    pub fn rule_records(&self) -> Vec<RuleRecord> {
        self.rules
            .iter()
            .map(|rule| RuleRecord {
                antecedent: self
                    .labels(&rule.antecedent)
                    .into_iter()
                    .map(str::to_owned)
                    .collect(),
                consequent: self
                    .labels(&rule.consequent)
                    .into_iter()
                    .map(str::to_owned)
                    .collect(),
                support: rule.support,
                confidence: rule.confidence,
                lift: rule.lift,
                conviction: rule.conviction,
            })
            .collect()
    }

    pub fn summary(&self) -> MiningSummary {
        MiningSummary {
            total_frequent_itemsets: self.itemsets.total(),
            itemsets_by_size: self
                .itemsets
                .levels()
                .map(|(k, level)| (k, level.len()))
                .collect(),
            total_rules: self.rules.len(),
            min_support: self.min_support,
            min_confidence: self.min_confidence,
        }
    }
}

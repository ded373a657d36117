use rayon::prelude::*;
use serde::Serialize;
use tracing::debug;

use super::combinations::proper_subsets;
use super::items::Itemset;
use super::results::FrequentItemsets;
use super::support::support_count;
use super::transactions::TransactionStore;

/// A rule metric that may be infinite by definition (conviction at
/// confidence 1, lift over a zero-support consequent). Kept as a tagged
/// value so consumers never see a raw float infinity.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Metric {
    Finite(f64),
    Unbounded,
}

impl Metric {
    pub fn value(&self) -> Option<f64> {
        match *self {
            Metric::Finite(v) => Some(v),
            Metric::Unbounded => None,
        }
    }

    pub fn is_unbounded(&self) -> bool {
        matches!(self, Metric::Unbounded)
    }
}

impl PartialOrd for Metric {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        use std::cmp::Ordering;
        Some(match (self, other) {
            (Metric::Unbounded, Metric::Unbounded) => Ordering::Equal,
            (Metric::Unbounded, Metric::Finite(_)) => Ordering::Greater,
            (Metric::Finite(_), Metric::Unbounded) => Ordering::Less,
            (Metric::Finite(a), Metric::Finite(b)) => a.total_cmp(b),
        })
    }
}

/// One mined rule `antecedent => consequent`, with its metrics.
///
/// Invariants: antecedent and consequent are disjoint and non-empty, and
/// their union is a mined frequent itemset whose support is `support`.
#[derive(Debug, Clone, PartialEq)]
pub struct AssociationRule {
    pub antecedent: Itemset,
    pub consequent: Itemset,
    pub support: f64,
    pub confidence: f64,
    pub lift: Metric,
    pub conviction: Metric,
}

impl AssociationRule {
    /// Total number of items across both sides.
    pub fn len(&self) -> usize {
        self.antecedent.len() + self.consequent.len()
    }
}

/// Derives every rule meeting `min_confidence` from the frequent itemsets
/// of size >= 2, ranked by confidence descending.
///
/// Tie-break: antecedent, then consequent, by label-lexicographic order, so
/// the ranking is reproducible and independent of interning order.
/// Derivation across itemsets is parallel; each itemset only reads the
/// immutable store, and the final sort makes the output order
/// deterministic.
pub fn generate_rules(
    table: &FrequentItemsets,
    store: &TransactionStore,
    min_confidence: f64,
) -> Vec<AssociationRule> {
    let sources: Vec<(&Itemset, f64)> = table
        .levels()
        .filter(|&(k, _)| k >= 2)
        .flat_map(|(_, level)| level.iter().map(|(itemset, &support)| (itemset, support)))
        .collect();

    let mut rules: Vec<AssociationRule> = sources
        .par_iter()
        .flat_map_iter(|&(itemset, support)| rules_for_itemset(itemset, support, store, min_confidence))
        .collect();

    let catalog = store.catalog();
    rules.sort_by(|a, b| {
        b.confidence
            .total_cmp(&a.confidence)
            .then_with(|| catalog.compare_by_labels(&a.antecedent, &b.antecedent))
            .then_with(|| catalog.compare_by_labels(&a.consequent, &b.consequent))
    });

    debug!(rules = rules.len(), min_confidence, "derived association rules");
    rules
}

/// Rules from a single frequent itemset: one candidate per non-empty proper
/// subset taken as antecedent. Up to 2^k - 2 rules can survive.
fn rules_for_itemset(
    itemset: &Itemset,
    support: f64,
    store: &TransactionStore,
    min_confidence: f64,
) -> Vec<AssociationRule> {
    let n = store.len() as f64;
    // Supports in the table are count/N fractions, so this recovers the
    // exact transaction count and keeps confidence exact at 1.0.
    let itemset_count = (support * n).round() as usize;

    let mut rules = Vec::new();
    for antecedent in proper_subsets(itemset) {
        let consequent = itemset.difference(&antecedent);

        let antecedent_count = support_count(store, &antecedent);
        if antecedent_count == 0 {
            // Undefined confidence; no rule.
            continue;
        }

        let confidence = itemset_count as f64 / antecedent_count as f64;
        if confidence < min_confidence {
            continue;
        }

        let consequent_support = support_count(store, &consequent) as f64 / n;
        let lift = if consequent_support > 0.0 {
            Metric::Finite(confidence / consequent_support)
        } else {
            Metric::Unbounded
        };
        let conviction = if confidence < 1.0 {
            Metric::Finite((1.0 - consequent_support) / (1.0 - confidence))
        } else {
            Metric::Unbounded
        };

        rules.push(AssociationRule {
            antecedent,
            consequent,
            support,
            confidence,
            lift,
            conviction,
        });
    }
    rules
}

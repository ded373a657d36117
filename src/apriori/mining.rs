use std::collections::HashMap;

use rayon::prelude::*;
use tracing::debug;

use super::candidates::generate_candidates;
use super::control::MineOptions;
use super::items::Itemset;
use super::results::{FrequentItemsets, ResultSet};
use super::rules::generate_rules;
use super::support::support;
use super::transactions::TransactionStore;

/// Threshold validation failures, reported at construction.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// min_support must lie in (0, 1].
    MinSupportOutOfRange(f64),
    /// min_confidence must lie in [0, 1].
    MinConfidenceOutOfRange(f64),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::MinSupportOutOfRange(v) => {
                write!(f, "min_support {} outside (0, 1]", v)
            }
            ConfigError::MinConfidenceOutOfRange(v) => {
                write!(f, "min_confidence {} outside [0, 1]", v)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MiningError {
    /// The run's cancel token tripped at a level barrier.
    Cancelled,
}

impl std::fmt::Display for MiningError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MiningError::Cancelled => write!(f, "mining run cancelled"),
        }
    }
}

impl std::error::Error for MiningError {}

/// Level-wise Apriori miner. Holds only the validated thresholds; every
/// call to [`mine`](Apriori::mine) is independent and returns a frozen
/// [`ResultSet`], so one miner can serve any number of runs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Apriori {
    min_support: f64,
    min_confidence: f64,
}

impl Apriori {
    pub fn new(min_support: f64, min_confidence: f64) -> Result<Self, ConfigError> {
        if !(min_support > 0.0 && min_support <= 1.0) {
            return Err(ConfigError::MinSupportOutOfRange(min_support));
        }
        if !(min_confidence >= 0.0 && min_confidence <= 1.0) {
            return Err(ConfigError::MinConfidenceOutOfRange(min_confidence));
        }
        Ok(Self {
            min_support,
            min_confidence,
        })
    }

    pub fn min_support(&self) -> f64 {
        self.min_support
    }

    pub fn min_confidence(&self) -> f64 {
        self.min_confidence
    }

    /// Mines frequent itemsets and derives rules in one pass.
    pub fn mine(&self, store: &TransactionStore) -> Result<ResultSet, MiningError> {
        self.mine_with(store, &MineOptions::new())
    }

    /// As [`mine`](Apriori::mine), with a cancel token and/or observer.
    ///
    /// Level k+1 cannot start until level k is complete, so cancellation is
    /// checked at each level barrier. Support counting within a level fans
    /// out across candidates; each one only reads the immutable store, so
    /// the frequent set per level is deterministic regardless of
    /// scheduling.
    pub fn mine_with(
        &self,
        store: &TransactionStore,
        opts: &MineOptions<'_>,
    ) -> Result<ResultSet, MiningError> {
        let mut table = FrequentItemsets::new();

        if opts.cancelled() {
            return Err(MiningError::Cancelled);
        }

        let level1 = self.frequent_one_itemsets(store);
        debug!(
            items = store.item_count(),
            frequent = level1.len(),
            "level 1 counted"
        );
        opts.notify_level(1, store.item_count(), level1.len());
        table.insert_level(1, level1);

        let mut k = 2;
        while let Some(prev) = table.level(k - 1) {
            if opts.cancelled() {
                return Err(MiningError::Cancelled);
            }

            let candidates = generate_candidates(prev, k);
            if candidates.is_empty() {
                break;
            }

            let candidate_count = candidates.len();
            let frequent: HashMap<Itemset, f64> = candidates
                .into_par_iter()
                .filter_map(|candidate| {
                    let s = support(store, &candidate);
                    (s >= self.min_support).then_some((candidate, s))
                })
                .collect();

            debug!(
                level = k,
                candidates = candidate_count,
                frequent = frequent.len(),
                "level filtered"
            );
            opts.notify_level(k, candidate_count, frequent.len());

            if frequent.is_empty() {
                break;
            }
            table.insert_level(k, frequent);
            k += 1;
        }

        if opts.cancelled() {
            return Err(MiningError::Cancelled);
        }

        let rules = generate_rules(&table, store, self.min_confidence);
        opts.notify_rules(rules.len());

        Ok(ResultSet::new(
            table,
            rules,
            store.catalog().clone(),
            self.min_support,
            self.min_confidence,
        ))
    }

    /// Level 1: one pass over the store counting every distinct item.
    fn frequent_one_itemsets(&self, store: &TransactionStore) -> HashMap<Itemset, f64> {
        let n = store.len();
        if n == 0 {
            return HashMap::new();
        }

        let mut counts = vec![0usize; store.item_count()];
        for tx in store.iter() {
            for &id in tx {
                counts[id] += 1;
            }
        }

        counts
            .into_iter()
            .enumerate()
            .filter_map(|(id, count)| {
                let s = count as f64 / n as f64;
                (s >= self.min_support).then(|| (Itemset::singleton(id), s))
            })
            .collect()
    }
}

use super::*;
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

fn sample_store() -> TransactionStore {
    TransactionStore::from_labels(vec![
        vec!["milk", "bread"],
        vec!["milk", "eggs"],
        vec!["bread", "butter"],
        vec!["milk", "bread", "butter"],
        vec!["bread", "eggs"],
    ])
    .unwrap()
}

fn set(store: &TransactionStore, labels: &[&str]) -> Itemset {
    Itemset::new(
        labels
            .iter()
            .map(|l| store.catalog().id_of(l).unwrap())
            .collect(),
    )
}

#[test]
fn test_itemset_canonical_form() {
    let a = Itemset::new(vec![7, 2, 5, 2]);
    assert_eq!(a.as_slice(), &[2, 5, 7]); // sorted, deduplicated

    let b = Itemset::new(vec![5, 7, 2]);
    assert_eq!(a, b); // insertion order is irrelevant

    let mut seen = std::collections::HashSet::new();
    seen.insert(a);
    assert!(seen.contains(&b));
}

#[test]
fn test_itemset_union_difference_subset() {
    let a = Itemset::new(vec![1, 3]);
    let b = Itemset::new(vec![3, 5]);

    assert_eq!(a.union(&b).as_slice(), &[1, 3, 5]);
    assert_eq!(a.difference(&b).as_slice(), &[1]);
    assert!(a.is_subset_of(&[0, 1, 2, 3]));
    assert!(!a.is_subset_of(&[1, 2]));
    assert!(a.is_disjoint(&Itemset::new(vec![2, 4])));
    assert!(!a.is_disjoint(&b));
}

#[test]
fn test_drop_one_subsets() {
    let itemset = Itemset::new(vec![1, 2, 3]);
    let subsets: Vec<Itemset> = itemset.drop_one_subsets().collect();

    assert_eq!(subsets.len(), 3);
    assert!(subsets.contains(&Itemset::new(vec![2, 3])));
    assert!(subsets.contains(&Itemset::new(vec![1, 3])));
    assert!(subsets.contains(&Itemset::new(vec![1, 2])));

    // Singletons have no non-empty strict subsets to check.
    assert_eq!(Itemset::singleton(9).drop_one_subsets().count(), 0);
}

#[test]
fn test_combination_generation() {
    let items = [5, 7, 9];
    let mut pairs = Vec::new();
    combinations::for_each_combination(&items, 2, &mut |c| pairs.push(c.to_vec()));

    assert_eq!(pairs, vec![vec![5, 7], vec![5, 9], vec![7, 9]]);

    // Proper subsets of a 3-set: three singletons + three pairs.
    let subsets = combinations::proper_subsets(&Itemset::new(vec![5, 7, 9]));
    assert_eq!(subsets.len(), 6);
}

#[test]
fn test_catalog_normalization() {
    let store =
        TransactionStore::from_labels(vec![vec![" Milk ", "BREAD"], vec!["milk"]]).unwrap();

    assert_eq!(store.item_count(), 2);
    let milk = store.catalog().id_of("milk").unwrap();
    assert_eq!(store.catalog().label(milk), Some("milk"));
    assert_eq!(store.transaction(1), Some(&[milk][..]));
}

#[test]
fn test_store_rejects_empty_label() {
    let err = TransactionStore::from_labels(vec![vec!["milk"], vec!["  "]]).unwrap_err();
    assert_eq!(err, StoreError::EmptyItemLabel { transaction: 1 });
}

#[test]
fn test_store_collapses_duplicates() {
    let store = TransactionStore::from_labels(vec![vec!["a", "b", "a", "b"]]).unwrap();
    assert_eq!(store.transaction(0).unwrap().len(), 2);
}

#[test]
fn test_support_counting() {
    let store = sample_store();

    assert!(approx(support(&store, &set(&store, &["bread"])), 0.8));
    assert!(approx(support(&store, &set(&store, &["milk", "bread"])), 0.4));
    assert!(approx(support(&store, &set(&store, &["eggs", "butter"])), 0.0));

    let empty = TransactionStore::from_labels(Vec::<Vec<&str>>::new()).unwrap();
    assert!(approx(support(&empty, &Itemset::singleton(0)), 0.0));
}

#[test]
fn test_candidate_join() {
    let mut level1: HashMap<Itemset, f64> = HashMap::new();
    level1.insert(Itemset::singleton(0), 0.6);
    level1.insert(Itemset::singleton(1), 0.8);
    level1.insert(Itemset::singleton(2), 0.4);

    let candidates = generate_candidates(&level1, 2);
    assert_eq!(candidates.len(), 3);
    assert!(candidates.contains(&Itemset::new(vec![0, 1])));
    assert!(candidates.contains(&Itemset::new(vec![0, 2])));
    assert!(candidates.contains(&Itemset::new(vec![1, 2])));
}

#[test]
fn test_candidate_prune() {
    // {0,1} and {1,2} join to {0,1,2}, but {0,2} is not frequent, so the
    // candidate must be pruned before support counting.
    let mut level2: HashMap<Itemset, f64> = HashMap::new();
    level2.insert(Itemset::new(vec![0, 1]), 0.4);
    level2.insert(Itemset::new(vec![1, 2]), 0.4);

    let candidates = generate_candidates(&level2, 3);
    assert!(candidates.is_empty());
}

#[test]
fn test_end_to_end_sample() {
    let store = sample_store();
    let result = Apriori::new(0.4, 0.5).unwrap().mine(&store).unwrap();
    let table = result.frequent_itemsets();

    // Level 1: milk=0.6, bread=0.8, eggs=0.4, butter=0.4.
    let level1 = table.level(1).unwrap();
    assert_eq!(level1.len(), 4);
    assert!(approx(table.support_of(&set(&store, &["milk"])).unwrap(), 0.6));
    assert!(approx(table.support_of(&set(&store, &["bread"])).unwrap(), 0.8));
    assert!(approx(table.support_of(&set(&store, &["eggs"])).unwrap(), 0.4));
    assert!(approx(table.support_of(&set(&store, &["butter"])).unwrap(), 0.4));

    // Level 2: only {milk,bread} and {bread,butter} survive.
    let level2 = table.level(2).unwrap();
    assert_eq!(level2.len(), 2);
    assert!(approx(
        table.support_of(&set(&store, &["milk", "bread"])).unwrap(),
        0.4
    ));
    assert!(approx(
        table.support_of(&set(&store, &["bread", "butter"])).unwrap(),
        0.4
    ));

    // Level 3 empty: {milk,bread,butter} is pruned because {milk,butter}
    // is not frequent.
    assert!(table.level(3).is_none());
    assert_eq!(table.max_size(), 2);

    let rules = result.rules();
    assert_eq!(rules.len(), 4);

    // Ranked by confidence desc; the 0.5 tie breaks on consequent labels
    // (butter before milk).
    let summary: Vec<(Vec<&str>, Vec<&str>)> = rules
        .iter()
        .map(|r| (result.labels(&r.antecedent), result.labels(&r.consequent)))
        .collect();
    assert_eq!(
        summary,
        vec![
            (vec!["butter"], vec!["bread"]),
            (vec!["milk"], vec!["bread"]),
            (vec!["bread"], vec!["butter"]),
            (vec!["bread"], vec!["milk"]),
        ]
    );

    let butter_bread = &rules[0];
    assert!(approx(butter_bread.confidence, 1.0));
    assert!(approx(butter_bread.lift.value().unwrap(), 1.25));
    assert_eq!(butter_bread.conviction, Metric::Unbounded);

    let milk_bread = &rules[1];
    assert!(approx(milk_bread.confidence, 2.0 / 3.0));
    assert!(approx(milk_bread.lift.value().unwrap(), (2.0 / 3.0) / 0.8));
    assert!(approx(milk_bread.conviction.value().unwrap(), 0.6));

    let bread_butter = &rules[2];
    assert!(approx(bread_butter.confidence, 0.5));
    assert!(approx(bread_butter.lift.value().unwrap(), 1.25));
    assert!(approx(bread_butter.conviction.value().unwrap(), 1.2));

    let bread_milk = &rules[3];
    assert!(approx(bread_milk.confidence, 0.5));
    assert!(approx(bread_milk.lift.value().unwrap(), 0.5 / 0.6));
    assert!(approx(bread_milk.conviction.value().unwrap(), 0.8));
}

#[test]
fn test_empty_store_mines_empty() {
    let store = TransactionStore::from_labels(Vec::<Vec<&str>>::new()).unwrap();
    let result = Apriori::new(0.4, 0.5).unwrap().mine(&store).unwrap();

    assert!(result.is_empty());
    assert!(result.rules().is_empty());
}

#[test]
fn test_nothing_frequent_is_a_condition_not_a_fault() {
    let store = sample_store();
    let result = Apriori::new(0.95, 0.5).unwrap().mine(&store).unwrap();

    assert!(result.is_empty());
    assert!(result.rules().is_empty());
}

#[test]
fn test_single_item_transactions() {
    let store =
        TransactionStore::from_labels(vec![vec!["milk"], vec!["bread"], vec!["milk"]]).unwrap();
    let result = Apriori::new(0.3, 0.5).unwrap().mine(&store).unwrap();
    let table = result.frequent_itemsets();

    assert_eq!(table.max_size(), 1);
    assert!(!table.level(1).unwrap().is_empty());
    assert!(result.rules().is_empty()); // no itemsets of size >= 2
}

#[test]
fn test_config_validation() {
    assert_eq!(
        Apriori::new(0.0, 0.5).unwrap_err(),
        ConfigError::MinSupportOutOfRange(0.0)
    );
    assert_eq!(
        Apriori::new(1.5, 0.5).unwrap_err(),
        ConfigError::MinSupportOutOfRange(1.5)
    );
    assert_eq!(
        Apriori::new(0.4, -0.1).unwrap_err(),
        ConfigError::MinConfidenceOutOfRange(-0.1)
    );
    assert!(Apriori::new(f64::NAN, 0.5).is_err());
    assert!(Apriori::new(1.0, 1.0).is_ok());
}

#[test]
fn test_cancellation() {
    let store = sample_store();
    let miner = Apriori::new(0.4, 0.5).unwrap();

    let token = CancelToken::new();
    token.cancel();
    let err = miner
        .mine_with(&store, &MineOptions::new().with_cancel_token(&token))
        .unwrap_err();
    assert_eq!(err, MiningError::Cancelled);

    // An already-expired deadline behaves the same.
    let expired = CancelToken::with_deadline(Duration::ZERO);
    assert!(expired.is_cancelled());
    assert!(miner
        .mine_with(&store, &MineOptions::new().with_cancel_token(&expired))
        .is_err());
}

#[derive(Default)]
struct Recorder {
    levels: Mutex<Vec<(usize, usize, usize)>>,
    rules: Mutex<Option<usize>>,
}

impl MiningObserver for Recorder {
    fn on_level(&self, k: usize, candidates: usize, frequent: usize) {
        self.levels.lock().unwrap().push((k, candidates, frequent));
    }

    fn on_rules(&self, count: usize) {
        *self.rules.lock().unwrap() = Some(count);
    }
}

#[test]
fn test_observer_callbacks() {
    let store = sample_store();
    let recorder = Recorder::default();

    Apriori::new(0.4, 0.5)
        .unwrap()
        .mine_with(&store, &MineOptions::new().with_observer(&recorder))
        .unwrap();

    let levels = recorder.levels.lock().unwrap();
    assert_eq!(levels[0], (1, 4, 4)); // 4 distinct items, all frequent
    assert_eq!(levels[1], (2, 6, 2)); // 6 pair candidates, 2 survive
    assert_eq!(*recorder.rules.lock().unwrap(), Some(4));
}

#[test]
fn test_idempotent_runs() {
    let store = sample_store();
    let miner = Apriori::new(0.4, 0.5).unwrap();

    let first = miner.mine(&store).unwrap();
    let second = miner.mine(&store).unwrap();

    assert_eq!(first.frequent_itemsets(), second.frequent_itemsets());
    assert_eq!(first.rules(), second.rules());
}

#[test]
fn test_downward_closure() {
    let store = sample_store();
    let result = Apriori::new(0.2, 0.5).unwrap().mine(&store).unwrap();
    let table = result.frequent_itemsets();

    for (k, level) in table.levels() {
        if k < 2 {
            continue;
        }
        for itemset in level.keys() {
            for subset in itemset.drop_one_subsets() {
                assert!(
                    table.level(k - 1).unwrap().contains_key(&subset),
                    "missing subset {} of {}",
                    subset,
                    itemset
                );
            }
        }
    }
}

#[test]
fn test_top_rules_by_lift() {
    let store = sample_store();
    let result = Apriori::new(0.4, 0.5).unwrap().mine(&store).unwrap();

    let top = result.top_rules(2, RankMetric::Lift);
    assert_eq!(top.len(), 2);
    assert!(approx(top[0].lift.value().unwrap(), 1.25));
    assert!(approx(top[1].lift.value().unwrap(), 1.25));

    // Unbounded conviction ranks above every finite value.
    let by_conviction = result.top_rules(1, RankMetric::Conviction);
    assert_eq!(by_conviction[0].conviction, Metric::Unbounded);
}

#[test]
fn test_rule_stats() {
    let store = sample_store();
    let result = Apriori::new(0.4, 0.5).unwrap().mine(&store).unwrap();

    let stats = result.rule_stats(&store);
    // Every transaction contains milk, bread, or butter.
    assert!(approx(stats.coverage, 1.0));
    assert_eq!(stats.covered_transactions, 5);
    assert_eq!(stats.total_transactions, 5);
    assert!(approx(stats.avg_rule_length, 2.0));

    let empty = TransactionStore::from_labels(Vec::<Vec<&str>>::new()).unwrap();
    let empty_result = Apriori::new(0.4, 0.5).unwrap().mine(&empty).unwrap();
    let empty_stats = empty_result.rule_stats(&empty);
    assert!(approx(empty_stats.coverage, 0.0));
}

#[test]
fn test_export_records() {
    let store = sample_store();
    let result = Apriori::new(0.4, 0.5).unwrap().mine(&store).unwrap();

    let itemsets = result.itemset_records();
    assert_eq!(itemsets.len(), 6);
    assert_eq!(itemsets[0].size, 1);
    assert_eq!(itemsets[5].size, 2);

    let rules = result.rule_records();
    assert_eq!(rules.len(), 4);
    assert_eq!(rules[0].antecedent, vec!["butter"]);

    // Unbounded metrics serialize as null, never a float infinity.
    let json = serde_json::to_value(&rules[0]).unwrap();
    assert!(json["conviction"].is_null());
    assert!(json["lift"].is_number());

    let summary = serde_json::to_value(result.summary()).unwrap();
    assert_eq!(summary["total_frequent_itemsets"], 6);
    assert_eq!(summary["total_rules"], 4);
    assert_eq!(summary["itemsets_by_size"]["1"], 4);
    assert_eq!(summary["itemsets_by_size"]["2"], 2);
}

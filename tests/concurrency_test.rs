//! Immutable indexes shared across threads.

use std::sync::Arc;
use std::thread;

use libstrmatch::prelude::*;

#[test]
fn test_finalized_automaton_concurrent_search() {
    let mut automaton = AhoCorasick::from_keywords(["he", "she", "his", "hers"]);
    automaton.finalize();
    assert_eq!(automaton.sync_strategy(), SyncStrategy::Persistent);
    let automaton = Arc::new(automaton);

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let automaton = Arc::clone(&automaton);
            thread::spawn(move || {
                let text = format!("{}ushers", "x".repeat(i));
                let found = automaton.find_all(&text).unwrap();
                found["hers"] == vec![i + 2] && found["she"] == vec![i + 1]
            })
        })
        .collect();

    for handle in handles {
        assert!(handle.join().unwrap());
    }
}

#[test]
fn test_suffix_tree_concurrent_queries() {
    let tree = Arc::new(SuffixTree::from_text("mississippi").unwrap());

    let handles: Vec<_> = ["ss", "i", "ppi", "sis"]
        .into_iter()
        .map(|pattern| {
            let tree = Arc::clone(&tree);
            thread::spawn(move || tree.find_all(pattern).unwrap())
        })
        .collect();

    let results: Vec<Vec<usize>> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    assert_eq!(results[0], vec![2, 5]);
    assert_eq!(results[1], vec![1, 4, 7, 10]);
    assert_eq!(results[2], vec![8]);
    assert_eq!(results[3], vec![3]);
}

#[test]
fn test_shared_bk_tree_writer_and_readers() {
    let shared = SharedDictionary::new(BkTree::build(["alpha"]));

    let writer = {
        let shared = shared.clone();
        thread::spawn(move || {
            for (rank, word) in ["beta", "gamma", "delta", "epsilon"].iter().enumerate() {
                shared.write(|tree| tree.insert(word, rank + 2));
            }
        })
    };
    let readers: Vec<_> = (0..4)
        .map(|_| {
            let shared = shared.clone();
            thread::spawn(move || shared.read(|tree| tree.query("alpha", 0, 1).map(|c| c.len())))
        })
        .collect();

    writer.join().unwrap();
    for reader in readers {
        assert_eq!(reader.join().unwrap(), Ok(1));
    }
    assert_eq!(shared.len(), 5);
    assert!(shared.contains("delta"));
}

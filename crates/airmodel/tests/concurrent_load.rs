mod fixtures;

use std::sync::{Arc, Barrier};
use std::time::Duration;

use airmodel::FetchParams;
use airmodel::prelude::*;
use fixtures::{User, sample_users};

#[test]
fn concurrent_enumeration_issues_a_single_fetch() {
    let store = StubStore::with_records(sample_users()).latency(Duration::from_millis(20));
    let relation = User::filter(conditions! { "active" => true });
    let barrier = Barrier::new(8);

    let results: Vec<Arc<Vec<User>>> = std::thread::scope(|s| {
        let handles: Vec<_> = (0..8)
            .map(|_| {
                s.spawn(|| {
                    barrier.wait();
                    relation.load(&store).unwrap()
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    assert_eq!(store.call_count(), 1);
    for records in &results {
        assert!(Arc::ptr_eq(records, &results[0]));
    }
}

#[test]
fn distinct_chains_built_concurrently_do_not_interfere() {
    let base = User::filter(conditions! { "role" => "admin" });
    let before = base.compile().unwrap();

    let compiled: Vec<FetchParams> = std::thread::scope(|s| {
        let handles: Vec<_> = (0..4_u64)
            .map(|i| {
                let base = &base;
                s.spawn(move || base.limit(i + 1).compile().unwrap())
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    for (i, params) in (1_u64..).zip(&compiled) {
        assert_eq!(params.max_records, Some(i));
        assert_eq!(params.filter.as_deref(), Some("{Role} = 'admin'"));
    }
    assert_eq!(base.compile().unwrap(), before);
}

#[test]
fn shared_store_behind_arc() {
    let store: Arc<dyn Store> = Arc::new(StubStore::with_records(sample_users()));
    let relation = User::all();
    assert_eq!(relation.count(&store).unwrap(), 4);
    assert_eq!(relation.count(store.as_ref()).unwrap(), 4);
}

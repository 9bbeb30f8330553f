//! Property-based tests for concurrent access through [`SharedIndex`].
//!
//! **Property: Concurrent Inserts Preserve All Entries**
//! **Property: Concurrent Queries See Completed Inserts**

use std::collections::HashSet;
use std::thread;

use lshdb::lsh::{CandidateIndex, LshConfig, MultiLayerLshIndex, SharedIndex};
use proptest::prelude::*;

fn arb_vector(dims: usize) -> impl Strategy<Value = Vec<f32>> {
    proptest::collection::vec(-1.0f32..1.0f32, dims)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(20))]

    /// For any set of vectors inserted from several threads, every table of
    /// every layer ends up holding every index exactly once.
    #[test]
    fn prop_concurrent_inserts_preserve_all_entries(
        vectors in proptest::collection::vec(arb_vector(12), 8..64),
        seed in any::<u64>(),
    ) {
        let config = LshConfig::new(2, 3, 12).with_seed(seed);
        let shared = SharedIndex::new(MultiLayerLshIndex::new(&config).unwrap());

        let indexed: Vec<(usize, Vec<f32>)> = vectors.iter().cloned().enumerate().collect();
        let num_threads = 4;
        let chunk_size = (indexed.len() + num_threads - 1) / num_threads;

        thread::scope(|s| {
            let handles: Vec<_> = indexed
                .chunks(chunk_size)
                .map(|chunk| {
                    let shared = shared.clone();
                    s.spawn(move || {
                        for (i, v) in chunk {
                            shared.insert(v, *i).expect("insert should succeed");
                        }
                    })
                })
                .collect();

            for handle in handles {
                handle.join().expect("thread should not panic");
            }
        });

        prop_assert_eq!(shared.len(), vectors.len());

        let index = shared.into_inner().expect("no other handles remain");
        let expected: Vec<usize> = (0..vectors.len()).collect();
        for layer in index.layers() {
            for table in layer.tables() {
                let mut all = table.bucket(true).to_vec();
                all.extend_from_slice(table.bucket(false));
                all.sort_unstable();
                prop_assert_eq!(&all, &expected);
            }
        }
        for (i, v) in vectors.iter().enumerate() {
            prop_assert!(index.query(v).unwrap().contains(&i));
        }
    }
}

#[test]
fn test_readers_run_alongside_writer() {
    let config = LshConfig::new(2, 2, 4).with_seed(77);
    let shared = SharedIndex::new(MultiLayerLshIndex::new(&config).unwrap());
    let target = [0.5, -0.5, 0.25, 1.0];
    shared.insert(&target, 0).unwrap();

    thread::scope(|s| {
        let writer = {
            let shared = shared.clone();
            s.spawn(move || {
                for i in 1..200 {
                    let v: Vec<f32> = (0..4).map(|j| ((i * 4 + j) as f32).sin()).collect();
                    shared.insert(&v, i).unwrap();
                }
            })
        };

        let readers: Vec<_> = (0..3)
            .map(|_| {
                let shared = shared.clone();
                s.spawn(move || {
                    for _ in 0..200 {
                        let hits: HashSet<usize> = shared.query(&target).unwrap();
                        assert!(hits.contains(&0));
                    }
                })
            })
            .collect();

        writer.join().unwrap();
        for reader in readers {
            reader.join().unwrap();
        }
    });

    assert_eq!(shared.len(), 200);
    assert_eq!(shared.dimensions(), 4);
}

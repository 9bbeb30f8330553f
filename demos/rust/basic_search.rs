//! Basic Search Demo
//!
//! This demo shows the vector store end to end:
//! - Building a seeded multi-layer LSH store
//! - Inserting labelled vectors
//! - Querying for candidates
//! - Saving to disk and loading back
//!
//! Run with: cargo run --example basic_search

use lshdb::{LshConfig, Result, VectorStore};
use std::path::Path;

fn main() -> Result<()> {
    println!("=== lshdb Basic Search Demo ===\n");

    let store_path = "demo_basic.lshs";
    if Path::new(store_path).exists() {
        std::fs::remove_file(store_path)?;
    }

    // 1. Create the store
    let config = LshConfig::new(2, 3, 3).with_seed(42);
    println!(
        "1. Creating store: {} layers x {} tables, {} dimensions",
        config.num_layers, config.num_tables, config.dimensions
    );
    let mut store = VectorStore::new(config)?;

    // 2. Insert vectors
    println!("\n2. Inserting vectors...");
    let points: [(&str, [f32; 3]); 6] = [
        ("north", [0.0, 1.0, 0.1]),
        ("north-east", [0.7, 0.7, 0.1]),
        ("east", [1.0, 0.0, 0.1]),
        ("south", [0.0, -1.0, 0.1]),
        ("west", [-1.0, 0.0, 0.1]),
        ("up", [0.0, 0.0, 1.0]),
    ];
    for (id, vector) in &points {
        let index = store.insert(id, vector)?;
        println!("   ✓ {:<10} -> index {}", id, index);
    }

    // 3. Query
    println!("\n3. Querying near 'north-east'...");
    for hit in store.search(&[0.6, 0.8, 0.1], 10)? {
        println!("   candidate {} ({})", hit.index, hit.id);
    }

    // 4. Dimension mismatch
    println!("\n4. Inserting a 2-d vector into a 3-d store...");
    match store.insert("bad", &[1.0, 2.0]) {
        Err(e) => println!("   ✓ rejected: {}", e),
        Ok(_) => println!("   ✗ unexpectedly accepted"),
    }
    println!("   store still holds {} vectors", store.len());

    // 5. Persistence
    println!("\n5. Saving and reloading...");
    store.save(store_path)?;
    let restored = VectorStore::load(store_path)?;
    println!("   ✓ restored {} vectors", restored.len());
    let hits = restored.query(&[0.7, 0.7, 0.1], 10)?;
    println!("   ✓ 'north-east' still finds itself: {}", hits.contains(&1));

    std::fs::remove_file(store_path)?;
    println!("\n=== Demo Complete ===");
    Ok(())
}

//! lshdb Command-Line Interface
//!
//! A CLI tool for creating, filling and querying lshdb vector stores.
//!
//! # Commands
//!
//! - `create` - Create an empty store file
//! - `insert` - Add a vector with an identifier
//! - `get` - Show the latest vector stored under an identifier
//! - `query` - List candidate vectors for a query
//! - `info` - Display store configuration and size
//!
//! Set `RUST_LOG=lshdb=debug` to see library events.

use clap::{Parser, Subcommand};
use lshdb::{LshConfig, VectorMetadata, VectorStore};
use std::path::Path;
use tracing_subscriber::EnvFilter;

/// lshdb CLI - Command-line interface for LSH vector stores
#[derive(Parser, Debug)]
#[command(name = "lshdb")]
#[command(author, version, about = "LSH vector store CLI", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Create an empty store
    Create {
        /// Path to store file
        path: String,
        /// Number of independently seeded layers
        #[arg(short, long, default_value = "2")]
        layers: usize,
        /// Number of hash tables per layer
        #[arg(short, long, default_value = "3")]
        tables: usize,
        /// Vector dimensions
        #[arg(short, long)]
        dimensions: usize,
        /// Seed for reproducible hyperplanes
        #[arg(short, long)]
        seed: Option<u64>,
        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },
    /// Insert a vector
    Insert {
        /// Path to store file
        path: String,
        /// Identifier to store with the vector
        #[arg(short, long)]
        id: String,
        /// Vector as comma-separated floats
        #[arg(short, long, allow_hyphen_values = true)]
        vector: String,
        /// Free-form description stored with the vector
        #[arg(long, default_value = "")]
        description: String,
    },
    /// Show the latest vector stored under an identifier
    Get {
        /// Path to store file
        path: String,
        /// Identifier to look up
        id: String,
    },
    /// Query candidates for a vector
    Query {
        /// Path to store file
        path: String,
        /// Query vector as comma-separated floats
        #[arg(short, long, allow_hyphen_values = true)]
        vector: String,
        /// Maximum number of results
        #[arg(short, long, default_value = "10")]
        k: usize,
    },
    /// Show store info
    Info {
        /// Path to store file
        path: String,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    tracing::debug!(command = ?cli.command, "parsed command");

    let result = match cli.command {
        Commands::Create {
            path,
            layers,
            tables,
            dimensions,
            seed,
            force,
        } => cmd_create(&path, layers, tables, dimensions, seed, force),
        Commands::Insert {
            path,
            id,
            vector,
            description,
        } => cmd_insert(&path, &id, &vector, &description),
        Commands::Get { path, id } => cmd_get(&path, &id),
        Commands::Query { path, vector, k } => cmd_query(&path, &vector, k),
        Commands::Info { path } => cmd_info(&path),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Create an empty store
fn cmd_create(
    path: &str,
    layers: usize,
    tables: usize,
    dimensions: usize,
    seed: Option<u64>,
    force: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    if Path::new(path).exists() && !force {
        return Err(format!("Store already exists: {} (use --force to overwrite)", path).into());
    }

    let mut config = LshConfig::new(layers, tables, dimensions);
    config.seed = seed;
    let store = VectorStore::new(config)?;
    store.save(path)?;

    println!(
        "Created {} ({} layers x {} tables, {} dimensions)",
        path, layers, tables, dimensions
    );
    Ok(())
}

/// Insert one vector
fn cmd_insert(
    path: &str,
    id: &str,
    vector: &str,
    description: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut store = open_store(path)?;
    let vector = parse_vector(vector)?;

    let index = store.insert_with_metadata(id, &vector, VectorMetadata::new(description))?;
    store.save(path)?;

    println!("Inserted {} at index {}", id, index);
    Ok(())
}

/// Print the latest vector stored under `id`
fn cmd_get(path: &str, id: &str) -> Result<(), Box<dyn std::error::Error>> {
    let store = open_store(path)?;
    let index = store
        .index_of(id)
        .ok_or_else(|| format!("Identifier not found: {}", id))?;

    let values: Vec<String> = store
        .get(index)
        .unwrap_or_default()
        .iter()
        .map(|x| x.to_string())
        .collect();
    println!("Index: {}", index);
    println!("Vector: {}", values.join(","));
    if let Some(meta) = store.metadata(index) {
        if !meta.description.is_empty() {
            println!("Description: {}", meta.description);
        }
        println!("Timestamp: {}", meta.timestamp);
    }
    Ok(())
}

/// Print candidates as `index<TAB>id`
fn cmd_query(path: &str, vector: &str, k: usize) -> Result<(), Box<dyn std::error::Error>> {
    let store = open_store(path)?;
    let vector = parse_vector(vector)?;

    let hits = store.search(&vector, k)?;
    if hits.is_empty() {
        println!("No candidates found");
        return Ok(());
    }
    for hit in hits {
        println!("{}\t{}", hit.index, hit.id);
    }
    Ok(())
}

/// Display store information
fn cmd_info(path: &str) -> Result<(), Box<dyn std::error::Error>> {
    let store = open_store(path)?;
    let config = store.config();
    let file_size = std::fs::metadata(path)?.len();

    println!("Store: {}", path);
    println!(
        "File size: {} bytes ({:.2} KB)",
        file_size,
        file_size as f64 / 1024.0
    );
    println!("Dimensions: {}", config.dimensions);
    println!("Layers: {}", config.num_layers);
    println!("Tables per layer: {}", config.num_tables);
    match config.seed {
        Some(seed) => println!("Seed: {}", seed),
        None => println!("Seed: (entropy)"),
    }
    println!("Vectors: {}", store.len());

    let buckets: usize = store
        .index()
        .layers()
        .iter()
        .flat_map(|layer| layer.tables())
        .map(|table| table.bucket_count())
        .sum();
    println!("Populated buckets: {}", buckets);

    Ok(())
}

fn open_store(path: &str) -> Result<VectorStore, Box<dyn std::error::Error>> {
    if !Path::new(path).exists() {
        return Err(format!("Store not found: {}", path).into());
    }
    Ok(VectorStore::load(path)?)
}

/// Parse comma-separated floats
fn parse_vector(s: &str) -> Result<Vec<f32>, Box<dyn std::error::Error>> {
    let values: Result<Vec<f32>, _> = s
        .split(',')
        .map(|part| part.trim().parse::<f32>())
        .collect();
    values.map_err(|e| format!("Invalid vector '{}': {}", s, e).into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_parse_vector() {
        assert_eq!(parse_vector("1.0, -2.5,3").unwrap(), vec![1.0, -2.5, 3.0]);
        assert!(parse_vector("1.0,abc").is_err());
        assert!(parse_vector("").is_err());
    }

    #[test]
    fn test_commands_against_one_store() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("cli.lshs");
        let path = path.to_str().unwrap();

        cmd_create(path, 2, 3, 3, Some(42), false).unwrap();
        assert!(cmd_create(path, 2, 3, 3, Some(42), false).is_err());

        cmd_insert(path, "north", "0.0,1.0,0.1", "").unwrap();
        cmd_insert(path, "east", "1.0, 0.0, 0.1", "points east").unwrap();
        assert!(cmd_insert(path, "flat", "1.0,0.0", "").is_err());

        cmd_query(path, "0.0,1.0,0.1", 5).unwrap();
        assert!(cmd_query(path, "0.0,1.0", 5).is_err());
        cmd_get(path, "east").unwrap();
        assert!(cmd_get(path, "west").is_err());
        cmd_info(path).unwrap();

        let store = VectorStore::load(path).unwrap();
        assert_eq!(store.len(), 2);
        assert_eq!(store.config().seed, Some(42));
        assert_eq!(store.index_of("east"), Some(1));
        assert_eq!(store.metadata(1).unwrap().description, "points east");
        assert!(store.query(&[0.0, 1.0, 0.1], 5).unwrap().contains(&0));

        cmd_create(path, 1, 1, 2, None, true).unwrap();
        assert!(VectorStore::load(path).unwrap().is_empty());
    }

    #[test]
    fn test_missing_store_is_reported() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("absent.lshs");
        let path = path.to_str().unwrap();

        assert!(cmd_info(path).is_err());
        assert!(cmd_insert(path, "x", "1.0", "").is_err());
    }

    #[test]
    fn test_cli_definition_is_valid() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}

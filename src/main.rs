//! itembin - A tool for inspecting and editing Abyss Engine items.bin files
//!
//! Usage:
//!   itembin list <items.bin>                 - List all records
//!   itembin show <items.bin> <index>         - Show one record's fields
//!   itembin info <items.bin>                 - Show container information
//!   itembin set <items.bin> <index> <key> <value> [-o out] - Edit one field

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

use itembin::ItemsFile;

#[derive(Parser)]
#[command(name = "itembin")]
#[command(version = "0.1.0")]
#[command(about = "Inspect and edit Abyss Engine items.bin files", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List records in the container
    List {
        /// Path to the items.bin file
        file: PathBuf,
    },
    /// Show all fields of one record
    Show {
        /// Path to the items.bin file
        file: PathBuf,
        /// Record index (zero-based)
        index: usize,
    },
    /// Show container information
    Info {
        /// Path to the items.bin file
        file: PathBuf,
    },
    /// Set a field of one record and re-encode the container
    Set {
        /// Path to the items.bin file
        file: PathBuf,
        /// Record index (zero-based)
        index: usize,
        /// Field key to update (must already exist on the record)
        key: u32,
        /// New field value
        value: u32,
        /// Output file (defaults to rewriting the input file)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::List { file } => list_records(&file),
        Commands::Show { file, index } => show_record(&file, index),
        Commands::Info { file } => show_info(&file),
        Commands::Set {
            file,
            index,
            key,
            value,
            output,
        } => set_field(&file, index, key, value, output.as_deref()),
    }
}

fn open_items(path: &Path) -> Result<ItemsFile> {
    ItemsFile::open(path).with_context(|| format!("Failed to open {}", path.display()))
}

fn list_records(path: &Path) -> Result<()> {
    let items = open_items(path)?;

    println!("{:>6} {:>8} {:>8} {:>10} {:>10}", "index", "id", "fields", "preamble", "offset");
    for (index, record) in items.records().iter().enumerate() {
        let id = record
            .id()
            .map(|v| v.to_string())
            .unwrap_or_else(|| "-".to_string());
        println!(
            "{:>6} {:>8} {:>8} {:>10} {:>10}",
            index,
            id,
            record.field_count(),
            record.preamble.len(),
            record.offset
        );
    }

    println!();
    println!("Total: {} records", items.len());

    Ok(())
}

fn show_record(path: &Path, index: usize) -> Result<()> {
    let items = open_items(path)?;

    let record = items
        .get(index)
        .with_context(|| format!("No record at index {}", index))?;

    println!("Record {} (offset {}):", index, record.offset);
    println!("  preamble: {} bytes{}", record.preamble.len(),
        if record.is_blueprint() { " (blueprint)" } else { "" });
    for &(key, value) in record.fields() {
        println!("  {:>4} : {}", key, value);
    }

    Ok(())
}

fn show_info(path: &Path) -> Result<()> {
    let items = open_items(path)?;

    let blueprints = items.records().iter().filter(|r| r.is_blueprint()).count();
    let total_bytes: usize = items.records().iter().map(|r| r.encoded_len()).sum();

    println!("Container Information:");
    println!("  File: {}", path.display());
    println!("  Records: {}", items.len());
    println!("  Blueprint records: {}", blueprints);
    println!("  Plain records: {}", items.len() - blueprints);
    println!("  Encoded size: {} bytes", total_bytes);

    Ok(())
}

fn set_field(
    path: &Path,
    index: usize,
    key: u32,
    value: u32,
    output: Option<&Path>,
) -> Result<()> {
    let mut items = open_items(path)?;

    let record = items
        .get_mut(index)
        .with_context(|| format!("No record at index {}", index))?;

    let previous = record
        .set(key, value)
        .with_context(|| format!("Cannot edit record {}", index))?;

    let out_path = output.unwrap_or(path);
    items
        .save(out_path)
        .with_context(|| format!("Failed to write {}", out_path.display()))?;

    println!(
        "Set key {} of record {} from {} to {}",
        key, index, previous, value
    );
    println!("Wrote: {}", out_path.display());

    Ok(())
}

//! hufftrie CLI
//!
//! CLI tool for compiling host lists into HTR1 snapshots and querying
//! them.

use std::fs;
use std::path::Path;

use clap::{Parser, Subcommand};

use ht_core::{HostMatcher, Snapshot};

mod snapshot;

use snapshot::{compile_snapshot_bytes, write_snapshot};

#[derive(Parser)]
#[command(name = "ht-cli")]
#[command(about = "hufftrie host-list compiler and tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compile a host list into an HTR1 snapshot
    Compile {
        /// Input host list file (one host per line, # comments)
        #[arg(short, long)]
        input: String,

        /// Output snapshot file
        #[arg(short, long, default_value = "snapshot.htr")]
        output: String,

        /// Entries also match subdomains of the stored host
        #[arg(short, long)]
        match_subdomains: bool,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Query a snapshot for a host
    Query {
        /// Snapshot file to query
        #[arg(short, long)]
        snapshot: String,

        /// Host to look up
        host: String,
    },

    /// Dump snapshot info
    Info {
        /// Snapshot file to inspect
        #[arg(short, long)]
        input: String,
    },
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Compile {
            input,
            output,
            match_subdomains,
            verbose,
        } => cmd_compile(&input, &output, match_subdomains, verbose),
        Commands::Query { snapshot, host } => cmd_query(&snapshot, &host),
        Commands::Info { input } => cmd_info(&input),
    };

    match result {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(2);
        }
    }
}

fn cmd_compile(
    input: &str,
    output: &str,
    match_subdomains: bool,
    verbose: bool,
) -> Result<i32, String> {
    let (bytes, stats) = compile_snapshot_bytes(input, match_subdomains, verbose)?;
    write_snapshot(Path::new(output), &bytes)?;

    println!(
        "Compiled {} hosts ({} deduped, {} shadowed) -> {} ({} bytes) in {:.1}ms",
        stats.hosts_after,
        stats.hosts_deduped,
        stats.hosts_shadowed,
        output,
        stats.snapshot_bytes,
        stats.total_ms
    );
    Ok(0)
}

fn cmd_query(snapshot_path: &str, host: &str) -> Result<i32, String> {
    let data = fs::read(snapshot_path)
        .map_err(|e| format!("Failed to read '{}': {}", snapshot_path, e))?;

    let snapshot = Snapshot::load(&data)
        .map_err(|e| format!("Failed to load '{}': {}", snapshot_path, e))?;

    let matcher = HostMatcher::new(&snapshot)
        .map_err(|e| format!("Snapshot trie is unusable: {}", e))?;

    let found = matcher
        .contains(host)
        .map_err(|e| format!("Lookup failed: {}", e))?;

    if found {
        println!("match");
        Ok(0)
    } else {
        println!("no match");
        Ok(1)
    }
}

fn cmd_info(input: &str) -> Result<i32, String> {
    let data = fs::read(input).map_err(|e| format!("Failed to read '{}': {}", input, e))?;

    let snapshot = Snapshot::load(&data)
        .map_err(|e| format!("Failed to load '{}': {}", input, e))?;

    println!("Snapshot: {}", input);
    println!("  version:          {}", snapshot.version);
    println!("  file size:        {} bytes", data.len());
    println!("  entries:          {}", snapshot.entry_count);
    println!("  match subdomains: {}", snapshot.match_subdomains());
    println!("  huffman table:    {} bytes", snapshot.huffman().len());
    println!(
        "  trie:             {} bytes ({} bits, root at bit {})",
        snapshot.trie().len(),
        snapshot.trie_bits(),
        snapshot.root_position()
    );
    Ok(0)
}

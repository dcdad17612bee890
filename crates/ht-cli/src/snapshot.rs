use std::fs;
use std::path::Path;
use std::time::Instant;

use ht_compiler::{build_snapshot, optimize_hosts, parse_host_list};
use ht_core::Snapshot;

#[derive(Debug, Clone)]
pub struct CompileStats {
    pub hosts_before: usize,
    pub hosts_after: usize,
    pub hosts_deduped: usize,
    pub hosts_shadowed: usize,
    pub snapshot_bytes: usize,
    pub total_ms: f64,
}

pub fn compile_snapshot_bytes(
    input: &str,
    match_subdomains: bool,
    verbose: bool,
) -> Result<(Vec<u8>, CompileStats), String> {
    let start = Instant::now();

    let content = fs::read_to_string(input)
        .map_err(|e| format!("Failed to read '{}': {}", input, e))?;

    let mut hosts = parse_host_list(&content)
        .map_err(|e| format!("Failed to parse '{}': {}", input, e))?;

    if verbose {
        println!(
            "  {} - {} lines, {} hosts",
            Path::new(input).file_name().unwrap_or_default().to_string_lossy(),
            content.lines().count(),
            hosts.len()
        );
    }

    let optimize_stats = optimize_hosts(&mut hosts, match_subdomains);

    let snapshot_bytes = build_snapshot(&hosts, match_subdomains)
        .map_err(|e| format!("Failed to build snapshot: {}", e))?;

    Snapshot::load(&snapshot_bytes)
        .map_err(|e| format!("Generated snapshot failed validation: {}", e))?;

    let total_time = start.elapsed();

    let stats = CompileStats {
        hosts_before: optimize_stats.before,
        hosts_after: optimize_stats.after,
        hosts_deduped: optimize_stats.deduped,
        hosts_shadowed: optimize_stats.shadowed,
        snapshot_bytes: snapshot_bytes.len(),
        total_ms: total_time.as_secs_f64() * 1000.0,
    };

    Ok((snapshot_bytes, stats))
}

pub fn write_snapshot(path: &Path, bytes: &[u8]) -> Result<(), String> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .map_err(|e| format!("Failed to create '{}': {}", parent.display(), e))?;
    }
    fs::write(path, bytes)
        .map_err(|e| format!("Failed to write '{}': {}", path.display(), e))?;
    Ok(())
}

//! Batch comparison command

use crate::BatchArgs;
#[allow(unused_imports)]
use tracing::{debug, info, trace, warn};
use anyhow::{Result, bail};
use rayon::prelude::*;
use shotdiff_ops::{Outcome, SnapshotComparison, Tolerance};
use std::path::{Path, PathBuf};

pub fn run(args: BatchArgs, verbose: u8) -> Result<()> {
    trace!(pattern = %args.pattern, "batch::run");
    let tolerance = args.tolerance.to_tolerance()?;

    // Find matching candidates
    let files: Vec<PathBuf> = glob::glob(&args.pattern)?
        .filter_map(|r| r.ok())
        .filter(|p| p.is_file())
        .collect();

    if files.is_empty() {
        bail!("No files match pattern: {}", args.pattern);
    }

    info!(files = files.len(), pattern = %args.pattern, "Starting batch comparison");

    if verbose > 0 {
        println!("Found {} files matching '{}'", files.len(), args.pattern);
    }

    let summary = compare_all(&files, &tolerance, verbose);
    println!(
        "Compared: {} equal, {} different, {} without baseline, {} failed",
        summary.equal, summary.different, summary.missing, summary.failed
    );

    if summary.failed > 0 {
        bail!("{} files failed", summary.failed);
    }
    if summary.different > 0 && !args.no_fail {
        bail!("FAIL: {} files differ from baseline", summary.different);
    }
    Ok(())
}

/// Per-outcome file counts of a batch.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Summary {
    pub equal: usize,
    pub different: usize,
    pub missing: usize,
    pub failed: usize,
}

/// Compares every candidate in parallel, one session per file.
pub fn compare_all(files: &[PathBuf], tolerance: &Tolerance, verbose: u8) -> Summary {
    let results: Vec<(&PathBuf, Result<Outcome>)> = files
        .par_iter()
        .map(|candidate| (candidate, compare_file(candidate, tolerance)))
        .collect();

    let mut summary = Summary::default();
    for (candidate, result) in results {
        match result {
            Ok(Outcome::Equal) => summary.equal += 1,
            Ok(Outcome::NoBaseline) => {
                summary.missing += 1;
                if verbose > 0 {
                    println!("{}: no baseline", candidate.display());
                }
            }
            Ok(Outcome::Different(bbox)) => {
                summary.different += 1;
                println!("{}: different in {}", candidate.display(), bbox);
            }
            Err(e) => {
                summary.failed += 1;
                warn!(candidate = %candidate.display(), error = %e, "comparison failed");
                eprintln!("Error: {}: {:#}", candidate.display(), e);
            }
        }
    }

    info!(
        equal = summary.equal,
        different = summary.different,
        missing = summary.missing,
        failed = summary.failed,
        "Batch comparison complete"
    );
    summary
}

fn compare_file(candidate: &Path, tolerance: &Tolerance) -> Result<Outcome> {
    let mut cmp = SnapshotComparison::for_candidate(candidate, tolerance.clone());
    let outcome = cmp.compare()?;
    debug!(candidate = %candidate.display(), outcome = ?outcome, "compared");
    Ok(outcome)
}

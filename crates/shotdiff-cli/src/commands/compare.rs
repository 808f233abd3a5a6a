//! Single snapshot comparison

use crate::CompareArgs;
use anyhow::{Context, Result, bail};
use shotdiff_ops::{Outcome, SnapshotComparison};
#[allow(unused_imports)]
use tracing::{debug, info, trace};

pub fn run(args: CompareArgs, verbose: u8) -> Result<()> {
    trace!(candidate = %args.candidate.display(), "compare::run");
    let tolerance = args.tolerance.to_tolerance()?;
    let paths = super::snapshot_paths(&args.candidate, args.baseline.as_ref());
    let mut cmp = SnapshotComparison::new(paths, tolerance);

    let outcome = cmp
        .compare()
        .with_context(|| format!("Failed to compare: {}", args.candidate.display()))?;
    let metrics = cmp.metrics()?;

    match outcome {
        Outcome::NoBaseline => {
            println!("{}: no baseline at {}", args.candidate.display(), cmp.paths().baseline.display());
        }
        Outcome::Equal => {
            println!("{}: equal", args.candidate.display());
        }
        Outcome::Different(bbox) => {
            println!("{}: different in {}", args.candidate.display(), bbox);
            println!("  annotated: {}", cmp.paths().annotated_old.display());
            println!("  annotated: {}", cmp.paths().annotated_new.display());
        }
    }
    if verbose > 0 {
        println!("  {}", super::format_metrics(&metrics));
    }

    if let Outcome::Different(bbox) = outcome {
        if !args.no_fail {
            bail!("FAIL: {} differs from baseline in {}", args.candidate.display(), bbox);
        }
    }
    Ok(())
}

//! The `root` subcommand: print the current audit Merkle root.

use std::path::Path;

use anyhow::Result;
use clap::Args;

use crate::state::StateFile;
use crate::EXIT_OK;

/// Arguments for `root`.
#[derive(Args, Debug)]
pub struct RootArgs {
    /// Also print the leaf count.
    #[arg(long)]
    verbose: bool,
}

/// Recompute and print the audit root from the persisted leaf sequence.
pub fn run_root(args: &RootArgs, state_path: &Path) -> Result<u8> {
    let state = StateFile::load(state_path)?;
    let root = state.audit_root();

    if args.verbose {
        println!("leaves: {}", state.audit_leaves.len());
    }
    if root.is_empty() {
        println!("(empty audit tree)");
    } else {
        println!("{root}");
    }
    Ok(EXIT_OK)
}

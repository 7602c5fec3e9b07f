//! The `enforce` subcommand: run the full decision pipeline for one
//! attempted movement and persist the resulting proof.

use std::path::Path;

use anyhow::Result;
use clap::Args;

use jib_core::{ArtifactId, DomainId, EnforcementError};

use crate::state::StateFile;
use crate::{EXIT_BAD_INPUT, EXIT_DENIED, EXIT_OK};

/// Arguments for `enforce`.
#[derive(Args, Debug)]
pub struct EnforceArgs {
    /// The artifact attempting to move.
    artifact: String,
    /// Source execution domain.
    #[arg(long)]
    source: String,
    /// Target execution domain.
    #[arg(long)]
    target: String,
}

/// Run the pipeline and report the decision.
pub fn run_enforce(args: &EnforceArgs, state_path: &Path) -> Result<u8> {
    let (Ok(artifact_id), Ok(source_id), Ok(target_id)) = (
        ArtifactId::new(args.artifact.clone()),
        DomainId::new(args.source.clone()),
        DomainId::new(args.target.clone()),
    ) else {
        eprintln!("invalid artifact or domain id");
        return Ok(EXIT_BAD_INPUT);
    };

    let mut state = StateFile::load(state_path)?;
    let enforcer = state.build_enforcer()?;

    match enforcer.enforce_with_all_checks(&artifact_id, &source_id, &target_id) {
        Ok(proof) => {
            let allowed = proof.allowed;
            state.audit_leaves.push(proof.hash());
            state.proofs.push(proof.clone());
            state.save(state_path)?;

            println!("{}", serde_json::to_string_pretty(&proof)?);
            if allowed {
                Ok(EXIT_OK)
            } else {
                eprintln!("denied: {}", proof.reason);
                Ok(EXIT_DENIED)
            }
        }
        Err(err) => {
            eprintln!("{err}");
            if let Some(hint) = err.recovery_hint() {
                eprintln!("hint: {hint}");
            }
            match &err {
                // Every pipeline refusal is a denial; the state file is
                // untouched because pre-proof failures record nothing.
                EnforcementError::InvalidJurisdictionBinding { .. }
                | EnforcementError::JurisdictionalViolation { .. }
                | EnforcementError::BindingIntegrityViolation { .. }
                | EnforcementError::TemporalConstraintViolation { .. }
                | EnforcementError::ConsensusFailure { .. }
                | EnforcementError::InvariantViolation { .. }
                | EnforcementError::AmbiguousJurisdiction { .. } => Ok(EXIT_DENIED),
                EnforcementError::BoundaryVerificationError { .. } => {
                    Err(anyhow::anyhow!(err.to_string()))
                }
            }
        }
    }
}

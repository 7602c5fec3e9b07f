//! The `bind` subcommand: sign an artifact/jurisdiction binding and
//! append it to the audit leaf sequence.

use std::path::Path;

use anyhow::Result;
use clap::Args;
use ed25519_dalek::SigningKey;
use rand_core::OsRng;

use jib_core::{ArtifactId, EnforcementError, JurisdictionId};

use crate::state::StateFile;
use crate::{EXIT_BAD_INPUT, EXIT_DENIED, EXIT_OK};

/// Arguments for `bind`.
#[derive(Args, Debug)]
pub struct BindArgs {
    /// The artifact to bind.
    artifact: String,
    /// The jurisdiction to bind it to.
    #[arg(long)]
    jurisdiction: String,
    /// Content hash of the artifact.
    #[arg(long)]
    artifact_hash: String,
    /// Ed25519 private key seed as 64 hex characters; generated (and
    /// printed) when omitted.
    #[arg(long)]
    key: Option<String>,
}

fn parse_seed(hex_seed: &str) -> Option<SigningKey> {
    let bytes = hex::decode(hex_seed).ok()?;
    let seed: [u8; 32] = bytes.try_into().ok()?;
    Some(SigningKey::from_bytes(&seed))
}

/// Bind an artifact and persist the signed binding.
pub fn run_bind(args: &BindArgs, state_path: &Path) -> Result<u8> {
    let (Ok(artifact_id), Ok(jurisdiction_id)) = (
        ArtifactId::new(args.artifact.clone()),
        JurisdictionId::new(args.jurisdiction.clone()),
    ) else {
        eprintln!("invalid artifact or jurisdiction id");
        return Ok(EXIT_BAD_INPUT);
    };

    let signing_key = match &args.key {
        Some(hex_seed) => {
            let Some(key) = parse_seed(hex_seed) else {
                eprintln!("invalid key seed: expected 64 hex characters");
                return Ok(EXIT_BAD_INPUT);
            };
            key
        }
        None => {
            let key = SigningKey::generate(&mut OsRng);
            println!("generated key seed: {}", hex::encode(key.to_bytes()));
            key
        }
    };

    let mut state = StateFile::load(state_path)?;
    let enforcer = state.build_enforcer()?;

    match enforcer.bind_artifact(
        &artifact_id,
        &jurisdiction_id,
        &signing_key,
        args.artifact_hash.clone(),
    ) {
        Ok(binding) => {
            state.audit_leaves.push(binding.hash().map_err(|e| anyhow::anyhow!(e.to_string()))?);
            state.bindings.push(binding.clone());
            state.save(state_path)?;
            println!("bound {artifact_id} to {jurisdiction_id} (binding {})", binding.id);
            println!("public key: {}", hex::encode(binding.public_key));
            Ok(EXIT_OK)
        }
        Err(err @ EnforcementError::InvalidJurisdictionBinding { .. }) => {
            eprintln!("{err}");
            Ok(EXIT_DENIED)
        }
        Err(err) => Err(anyhow::anyhow!(err.to_string())),
    }
}

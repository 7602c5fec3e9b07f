//! Registration subcommands: jurisdictions, execution domains, and
//! boundary rules (plain or time-bounded).

use std::path::Path;

use anyhow::Result;
use clap::{Args, Subcommand};

use jib_core::{Boundary, DomainId, ExecutionDomain, Jurisdiction, JurisdictionId, JurisdictionType};
use jib_temporal::TemporalBoundary;

use crate::state::StateFile;
use crate::{EXIT_BAD_INPUT, EXIT_OK};

/// Arguments for the `register` subcommand family.
#[derive(Args, Debug)]
pub struct RegisterArgs {
    #[command(subcommand)]
    command: RegisterCommands,
}

#[derive(Subcommand, Debug)]
enum RegisterCommands {
    /// Register a jurisdiction.
    Jurisdiction {
        /// Jurisdiction identifier (e.g. "us-ca").
        id: String,
        /// Human-readable name.
        #[arg(long)]
        name: String,
        /// Kind of authority: sovereign, legal, or regulatory.
        #[arg(long, default_value = "legal")]
        kind: String,
        /// Optional enclosing jurisdiction.
        #[arg(long)]
        parent: Option<String>,
    },
    /// Register an execution domain inside a jurisdiction.
    Domain {
        /// Domain identifier (e.g. "prod-west").
        id: String,
        /// Human-readable name.
        #[arg(long)]
        name: String,
        /// The jurisdiction the domain resides in.
        #[arg(long)]
        jurisdiction: String,
    },
    /// Register a boundary rule for a jurisdiction pair.
    Boundary {
        /// Rule identifier.
        id: String,
        /// Source jurisdiction.
        #[arg(long)]
        source: String,
        /// Target jurisdiction.
        #[arg(long)]
        target: String,
        /// Permit flow along this pair.
        #[arg(long)]
        allow: bool,
        /// Rationale recorded in every proof this rule decides.
        #[arg(long)]
        reason: String,
        /// Validity window start (Unix seconds) — makes the rule temporal.
        #[arg(long)]
        valid_from: Option<i64>,
        /// Validity window end (Unix seconds, inclusive).
        #[arg(long)]
        valid_until: Option<i64>,
        /// Renewal policy ("auto" renews on expiry).
        #[arg(long)]
        renewal: Option<String>,
    },
}

fn parse_kind(kind: &str) -> Option<JurisdictionType> {
    match kind {
        "sovereign" => Some(JurisdictionType::Sovereign),
        "legal" => Some(JurisdictionType::Legal),
        "regulatory" => Some(JurisdictionType::Regulatory),
        _ => None,
    }
}

/// Apply a registration to the state file.
pub fn run_register(args: &RegisterArgs, state_path: &Path) -> Result<u8> {
    let mut state = StateFile::load(state_path)?;

    match &args.command {
        RegisterCommands::Jurisdiction {
            id,
            name,
            kind,
            parent,
        } => {
            let Ok(jurisdiction_id) = JurisdictionId::new(id.clone()) else {
                eprintln!("invalid jurisdiction id: {id}");
                return Ok(EXIT_BAD_INPUT);
            };
            let Some(kind) = parse_kind(kind) else {
                eprintln!("invalid jurisdiction kind: {kind}");
                return Ok(EXIT_BAD_INPUT);
            };
            let mut jurisdiction = Jurisdiction::new(jurisdiction_id.clone(), name, kind);
            if let Some(parent) = parent {
                let Ok(parent_id) = JurisdictionId::new(parent.clone()) else {
                    eprintln!("invalid parent jurisdiction id: {parent}");
                    return Ok(EXIT_BAD_INPUT);
                };
                jurisdiction = jurisdiction.with_parent(parent_id);
            }
            state.jurisdictions.retain(|j| j.id != jurisdiction_id);
            state.jurisdictions.push(jurisdiction);
            println!("registered jurisdiction {jurisdiction_id}");
        }
        RegisterCommands::Domain {
            id,
            name,
            jurisdiction,
        } => {
            let (Ok(domain_id), Ok(jurisdiction_id)) = (
                DomainId::new(id.clone()),
                JurisdictionId::new(jurisdiction.clone()),
            ) else {
                eprintln!("invalid domain or jurisdiction id");
                return Ok(EXIT_BAD_INPUT);
            };
            state.domains.retain(|d| d.id != domain_id);
            state
                .domains
                .push(ExecutionDomain::new(domain_id.clone(), name, jurisdiction_id));
            println!("registered domain {domain_id}");
        }
        RegisterCommands::Boundary {
            id,
            source,
            target,
            allow,
            reason,
            valid_from,
            valid_until,
            renewal,
        } => {
            let (Ok(source_id), Ok(target_id)) = (
                JurisdictionId::new(source.clone()),
                JurisdictionId::new(target.clone()),
            ) else {
                eprintln!("invalid source or target jurisdiction id");
                return Ok(EXIT_BAD_INPUT);
            };

            if valid_from.is_some() || valid_until.is_some() || renewal.is_some() {
                state.temporal_boundaries.retain(|b| b.id != *id);
                state.temporal_boundaries.push(TemporalBoundary {
                    id: id.clone(),
                    source_jurisdiction_id: source_id.clone(),
                    target_jurisdiction_id: target_id.clone(),
                    allowed: *allow,
                    reason: reason.clone(),
                    valid_from: *valid_from,
                    valid_until: *valid_until,
                    renewal_policy: renewal.clone(),
                });
                println!("registered temporal boundary {id} ({source_id}:{target_id})");
            }

            state.boundaries.retain(|b| b.id != *id);
            state.boundaries.push(Boundary::new(
                id.clone(),
                source_id.clone(),
                target_id.clone(),
                *allow,
                reason.clone(),
            ));
            println!("registered boundary {id} ({source_id}:{target_id})");
        }
    }

    state.save(state_path)?;
    Ok(EXIT_OK)
}

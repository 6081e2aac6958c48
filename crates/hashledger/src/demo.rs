//! Tamper-detection walkthrough.
//!
//! Builds a chain of sample transactions, then plays an attacker twice:
//! once editing a payload in place, once editing it and recomputing the
//! stored digest. Each step's verification outcome is recorded in a
//! [`DemoReport`].

use serde::Serialize;

use hashledger_core::tamper::TamperExt;
use hashledger_core::{Block, Chain, ChainConfig, DigestAlgorithm, Keypair};

use crate::error::{LedgerError, Result};

const PARTIES: [&str; 5] = ["Alice", "Bob", "Carol", "Diana", "Erin"];

/// Settings for one demo run.
#[derive(Debug, Clone)]
pub struct DemoConfig {
    /// Number of records appended after genesis.
    pub records: usize,
    pub algorithm: DigestAlgorithm,
    /// Block the attacker rewrites.
    pub tamper_index: u64,
    pub strict_timestamps: bool,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            records: 3,
            algorithm: DigestAlgorithm::Blake3,
            tamper_index: 1,
            strict_timestamps: false,
        }
    }
}

/// Printable view of a block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BlockView {
    pub index: u64,
    pub timestamp: i64,
    pub payload: String,
    pub previous_digest: String,
    pub digest: String,
}

impl From<&Block> for BlockView {
    fn from(block: &Block) -> Self {
        Self {
            index: block.index(),
            timestamp: block.timestamp(),
            payload: String::from_utf8_lossy(block.payload()).into_owned(),
            previous_digest: block.previous_digest().to_hex(),
            digest: block.digest().to_hex(),
        }
    }
}

/// Outcome of verification after one step of the walkthrough.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StepOutcome {
    pub valid: bool,
    /// The first failure reported, if any.
    pub failure: Option<String>,
    /// Block index the failure was detected at.
    pub failed_at: Option<u64>,
}

impl StepOutcome {
    fn of(chain: &Chain) -> Self {
        match chain.verify() {
            Ok(()) => Self {
                valid: true,
                failure: None,
                failed_at: None,
            },
            Err(e) => Self {
                valid: false,
                failed_at: e.index(),
                failure: Some(e.to_string()),
            },
        }
    }
}

/// Everything the walkthrough observed.
#[derive(Debug, Clone, Serialize)]
pub struct DemoReport {
    pub algorithm: DigestAlgorithm,
    pub tampered_index: u64,
    pub initial_chain: Vec<BlockView>,
    pub initial: StepOutcome,
    /// Payload rewritten, stored digest left alone.
    pub after_edit: StepOutcome,
    /// Payload rewritten and stored digest recomputed.
    pub after_forgery: StepOutcome,
    pub forged_chain: Vec<BlockView>,
    /// Whether a checkpoint signed before the attack still verifies.
    pub checkpoint_holds: bool,
}

/// Sample payload for record `n`, counted from 1. Zero is treated as 1.
fn sample_transaction(n: usize) -> String {
    let n = n.max(1);
    let from = PARTIES[(n - 1) % PARTIES.len()];
    let to = PARTIES[n % PARTIES.len()];
    let amount = (n * 7) % 50 + 1;
    format!("Transaction {n}: {from} pays {amount} to {to}")
}

/// Run the walkthrough.
pub fn run(config: &DemoConfig) -> Result<DemoReport> {
    let mut chain = Chain::with_config(ChainConfig {
        algorithm: config.algorithm,
        strict_timestamps: config.strict_timestamps,
        ..ChainConfig::default()
    });

    for n in 1..=config.records {
        chain.append(sample_transaction(n))?;
    }

    if config.tamper_index >= chain.len() as u64 {
        return Err(LedgerError::InvalidOperation(format!(
            "cannot tamper with block {}: chain has {} blocks",
            config.tamper_index,
            chain.len()
        )));
    }

    let initial_chain = chain.iter().map(BlockView::from).collect();
    let initial = StepOutcome::of(&chain);
    tracing::info!(len = chain.len(), valid = initial.valid, "built chain");

    let checkpoint = chain.seal(&Keypair::generate())?;

    let index = config.tamper_index;
    let original = chain
        .get(index)
        .cloned()
        .ok_or_else(|| LedgerError::InvalidOperation(format!("no block {index}")))?;
    let forged = format!("{} (forged)", String::from_utf8_lossy(original.payload()));

    if let Some(mut t) = chain.tamper(index) {
        t.set_payload(forged.clone());
    }
    let after_edit = StepOutcome::of(&chain);
    tracing::info!(index, valid = after_edit.valid, "rewrote payload");

    if let Some(mut t) = chain.tamper(index) {
        t.set_payload(original.payload().clone())
            .set_digest(*original.digest());
    }

    if let Some(mut t) = chain.tamper(index) {
        t.set_payload(forged).reseal();
    }
    let after_forgery = StepOutcome::of(&chain);
    tracing::info!(index, valid = after_forgery.valid, "rewrote payload and digest");

    let checkpoint_holds = checkpoint.verify(&chain).is_ok();

    Ok(DemoReport {
        algorithm: config.algorithm,
        tampered_index: index,
        initial_chain,
        initial,
        after_edit,
        after_forgery,
        forged_chain: chain.iter().map(BlockView::from).collect(),
        checkpoint_holds,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_transactions() {
        assert_eq!(sample_transaction(1), "Transaction 1: Alice pays 8 to Bob");
        assert_eq!(sample_transaction(5), "Transaction 5: Erin pays 36 to Alice");
    }

    #[test]
    fn test_sample_transaction_zero() {
        assert_eq!(sample_transaction(0), sample_transaction(1));
    }

    #[test]
    fn test_default_run() {
        let report = run(&DemoConfig::default()).unwrap();

        assert_eq!(report.initial_chain.len(), 4);
        assert!(report.initial.valid);

        assert!(!report.after_edit.valid);
        assert_eq!(report.after_edit.failed_at, Some(1));

        assert!(!report.after_forgery.valid);
        assert_eq!(report.after_forgery.failed_at, Some(2));

        assert!(!report.checkpoint_holds);
        assert!(report.forged_chain[1].payload.ends_with("(forged)"));
        assert_eq!(report.forged_chain[2], report.initial_chain[2]);
    }

    #[test]
    fn test_tail_forgery_needs_checkpoint() {
        let report = run(&DemoConfig {
            tamper_index: 3,
            ..DemoConfig::default()
        })
        .unwrap();

        assert!(!report.after_edit.valid);
        assert!(report.after_forgery.valid);
        assert!(!report.checkpoint_holds);
    }

    #[test]
    fn test_tamper_index_out_of_range() {
        let result = run(&DemoConfig {
            records: 2,
            tamper_index: 3,
            ..DemoConfig::default()
        });
        assert!(matches!(result, Err(LedgerError::InvalidOperation(_))));
    }
}

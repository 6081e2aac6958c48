//! JSON import and export of whole chains.
//!
//! Import never trusts its input: the blocks are re-verified under the
//! caller's [`ChainConfig`] and refused if any digest or link fails. Nothing
//! in the document can relax that policy.

use bytes::Bytes;
use serde::{Deserialize, Serialize};

use hashledger_core::{Block, Chain, ChainConfig, DigestAlgorithm};

use crate::error::{LedgerError, Result};

/// Serialized form of a chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportedChain {
    pub algorithm: DigestAlgorithm,
    pub blocks: Vec<Block>,
}

impl ExportedChain {
    pub fn from_chain(chain: &Chain) -> Self {
        Self {
            algorithm: chain.algorithm(),
            blocks: chain.blocks().to_vec(),
        }
    }

    /// Verify the blocks under `policy` and rebuild the chain.
    ///
    /// The genesis payload is taken from the first block; every other
    /// setting comes from `policy`.
    pub fn into_chain(self, policy: &ChainConfig) -> Result<Chain> {
        if self.algorithm != policy.algorithm {
            return Err(LedgerError::InvalidOperation(format!(
                "exported chain uses {}, expected {}",
                self.algorithm, policy.algorithm
            )));
        }

        let genesis_payload: Bytes = self
            .blocks
            .first()
            .map(|b| b.payload().clone())
            .ok_or_else(|| LedgerError::InvalidOperation("exported chain has no blocks".into()))?;

        let config = ChainConfig {
            genesis_payload,
            ..policy.clone()
        };
        Ok(Chain::from_blocks(self.blocks, config)?)
    }
}

/// Export a chain as pretty-printed JSON.
pub fn export_json(chain: &Chain) -> Result<String> {
    Ok(serde_json::to_string_pretty(&ExportedChain::from_chain(chain))?)
}

/// Import a chain from JSON, verifying every block under `policy`.
pub fn import_json(json: &str, policy: &ChainConfig) -> Result<Chain> {
    let exported: ExportedChain = serde_json::from_str(json)?;
    let len = exported.blocks.len();
    let chain = exported.into_chain(policy)?;
    tracing::info!(len, algorithm = %chain.algorithm(), "imported chain");
    Ok(chain)
}

#[cfg(test)]
mod tests {
    use super::*;
    use hashledger_core::tamper::TamperExt;
    use hashledger_core::ValidationError;

    #[test]
    fn test_export_import_roundtrip() {
        let mut chain = Chain::new();
        chain.append("A").unwrap();
        chain.append("B").unwrap();

        let json = export_json(&chain).unwrap();
        let imported = import_json(&json, &ChainConfig::default()).unwrap();

        assert_eq!(imported.blocks(), chain.blocks());
        assert_eq!(imported.config(), chain.config());
        assert!(imported.validate());
    }

    #[test]
    fn test_import_rejects_edited_payload() {
        let mut chain = Chain::new();
        chain.append("pay 10").unwrap();

        let mut exported = ExportedChain::from_chain(&chain);
        let mut value = serde_json::to_value(&exported.blocks[1]).unwrap();
        value["payload"] = serde_json::json!(b"pay 1000".to_vec());
        exported.blocks[1] = serde_json::from_value(value).unwrap();

        let json = serde_json::to_string(&exported).unwrap();
        assert!(matches!(
            import_json(&json, &ChainConfig::default()),
            Err(LedgerError::Validation(ValidationError::DigestMismatch { index: 1, .. }))
        ));
    }

    #[test]
    fn test_document_cannot_disable_genesis_check() {
        let mut chain = Chain::new();
        chain.append("A").unwrap();
        chain.tamper(0).unwrap().set_payload("Forged Genesis");

        let mut value = serde_json::to_value(ExportedChain::from_chain(&chain)).unwrap();
        value["verify_genesis"] = serde_json::json!(false);
        value["strict_timestamps"] = serde_json::json!(false);
        let json = serde_json::to_string(&value).unwrap();

        assert!(matches!(
            import_json(&json, &ChainConfig::default()),
            Err(LedgerError::Validation(ValidationError::DigestMismatch { index: 0, .. }))
        ));
    }

    #[test]
    fn test_import_applies_caller_timestamp_policy() {
        let mut chain = Chain::new();
        chain.append("A").unwrap();
        chain.append("B").unwrap();
        let earlier = chain.get(1).unwrap().timestamp() - 1;
        chain.tamper(2).unwrap().set_timestamp(earlier).reseal();

        let json = export_json(&chain).unwrap();
        assert!(import_json(&json, &ChainConfig::default()).is_ok());

        let strict = ChainConfig {
            strict_timestamps: true,
            ..ChainConfig::default()
        };
        assert!(matches!(
            import_json(&json, &strict),
            Err(LedgerError::Validation(ValidationError::TimestampRegression { index: 2, .. }))
        ));
    }

    #[test]
    fn test_import_rejects_algorithm_mismatch() {
        let json = export_json(&Chain::new()).unwrap();
        let sha = ChainConfig {
            algorithm: DigestAlgorithm::Sha256,
            ..ChainConfig::default()
        };
        assert!(matches!(
            import_json(&json, &sha),
            Err(LedgerError::InvalidOperation(_))
        ));
    }

    #[test]
    fn test_import_rejects_empty() {
        let json = r#"{"algorithm":"blake3","blocks":[]}"#;
        assert!(matches!(
            import_json(json, &ChainConfig::default()),
            Err(LedgerError::InvalidOperation(_))
        ));
    }

    #[test]
    fn test_import_rejects_bad_json() {
        assert!(matches!(
            import_json("{", &ChainConfig::default()),
            Err(LedgerError::Json(_))
        ));
    }
}

//! End-to-end tamper detection through the public API.

use hashledger::core::ValidationError;
use hashledger::{export_json, import_json, Chain, SharedChain};
use hashledger_testkit::{ChainFixture, TamperExt};

#[test]
fn test_abc_scenario() {
    let mut fixture = ChainFixture::golden();
    let chain = &mut fixture.chain;
    assert_eq!(chain.len(), 4);
    assert!(chain.validate());

    let original = chain.get(1).unwrap().clone();

    chain.tamper(1).unwrap().set_payload("A-tampered");
    assert!(!chain.validate());

    chain
        .tamper(1)
        .unwrap()
        .set_payload(original.payload().clone())
        .set_digest(*original.digest());
    assert!(chain.validate());

    chain.tamper(1).unwrap().set_payload("A-tampered").reseal();
    assert!(!chain.validate());
    assert!(matches!(
        chain.verify(),
        Err(ValidationError::BrokenLink { index: 2, .. })
    ));
}

#[test]
fn test_cascading_rewrite_is_the_only_undetected_forgery() {
    let mut fixture = ChainFixture::with_records(5);
    let chain = &mut fixture.chain;
    let checkpoint = chain.seal(&fixture.keypair).unwrap();

    // Rewrite block 2 and relink every block after it.
    chain.tamper(2).unwrap().set_payload("rewritten").reseal();
    for i in 3..chain.len() as u64 {
        let prev = *chain.get(i - 1).unwrap().digest();
        chain.tamper(i).unwrap().set_previous_digest(prev).reseal();
    }

    assert!(chain.validate());
    assert!(checkpoint.verify(chain).is_err());
}

#[test]
fn test_tampered_chain_does_not_survive_export() {
    let mut fixture = ChainFixture::with_records(3);
    fixture.chain.tamper(2).unwrap().set_payload("edited");

    let json = export_json(&fixture.chain).unwrap();
    assert!(import_json(&json, fixture.chain.config()).is_err());
}

#[test]
fn test_shared_chain_round_trip() {
    let shared = SharedChain::new(Chain::new());
    shared.append("A").unwrap();
    shared.append_value(&["B", "C"]).unwrap();

    let snapshot = shared.snapshot();
    assert_eq!(snapshot.len(), 3);
    assert!(snapshot.validate());
    let decoded: Vec<String> = snapshot.get(2).unwrap().payload_as().unwrap();
    assert_eq!(decoded, vec!["B", "C"]);
}

#[cfg(feature = "demo")]
#[test]
fn test_demo_with_sha256() {
    use hashledger::demo::{self, DemoConfig};
    use hashledger::DigestAlgorithm;

    let report = demo::run(&DemoConfig {
        records: 5,
        algorithm: DigestAlgorithm::Sha256,
        tamper_index: 2,
        strict_timestamps: true,
    })
    .unwrap();

    assert!(report.initial.valid);
    assert_eq!(report.after_edit.failed_at, Some(2));
    assert_eq!(report.after_forgery.failed_at, Some(3));
    assert!(report
        .initial_chain
        .iter()
        .all(|b| b.digest.len() == 64));

    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["algorithm"], "sha256");
    assert_eq!(json["after_forgery"]["valid"], false);
}

mod prop {
    use super::*;
    use hashledger_testkit::{chain_from_params, ChainParams};
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn exported_chains_reimport_valid(params in any::<ChainParams>()) {
            let chain = chain_from_params(&params);
            let restored = import_json(&export_json(&chain).unwrap(), chain.config()).unwrap();
            prop_assert_eq!(restored.blocks(), chain.blocks());
        }

        #[test]
        fn import_rejects_edited_payloads(
            params in any::<ChainParams>(),
            pick in any::<proptest::sample::Index>(),
        ) {
            let mut chain = chain_from_params(&params);
            let index = pick.index(chain.len()) as u64;
            let edited = [chain.get(index).unwrap().payload().as_ref(), &b"!"[..]].concat();
            chain.tamper(index).unwrap().set_payload(edited);

            prop_assert!(import_json(&export_json(&chain).unwrap(), chain.config()).is_err());
        }
    }
}

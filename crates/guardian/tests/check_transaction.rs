//! Screening verdicts and audit entries for single transactions.

mod common;

use std::sync::Arc;

use common::*;
use guardian::{screen_transaction, Guardian, GuardianConfig};
use sender_recovery::{HomesteadSigner, Signer};
use shared_types::{Transaction, TxSignature, U256};

fn guardian_with<S: AsRef<str>>(
    dir: &tempfile::TempDir,
    listed: &[S],
) -> (Guardian, Arc<RecordingLogger>) {
    let path = filter_file(dir.path(), "bloom_filter.gob", listed);
    let logger = Arc::new(RecordingLogger::default());
    let guardian = Guardian::with_logger(
        GuardianConfig::new().with_filter_file_path(path),
        logger.clone(),
    )
    .unwrap();
    (guardian, logger)
}

#[test]
fn test_not_filtered() {
    let dir = tempfile::tempdir().unwrap();
    let (guardian, logger) = guardian_with(&dir, &[LISTED, ALSO_LISTED]);

    let tx = Account::random().transfer_to(CLEAN);

    assert!(!guardian.check_transaction(&signer(), &tx));
    assert!(logger.entries().is_empty());
}

#[test]
fn test_recipient_filtered() {
    let dir = tempfile::tempdir().unwrap();
    let (guardian, logger) = guardian_with(&dir, &[LISTED, ALSO_LISTED]);

    let sender = Account::random();
    let tx = sender.transfer_to(LISTED);

    assert!(guardian.check_transaction(&signer(), &tx));

    let entries = logger.entries();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].filtered_address, LISTED);
    assert_eq!(entries[0].counterpart_address, sender.hex());
    assert_eq!(entries[0].tx_hash, tx.hash_hex());
}

#[test]
fn test_sender_filtered() {
    let dir = tempfile::tempdir().unwrap();
    let sender = Account::random();
    let (guardian, logger) = guardian_with(&dir, &[LISTED.to_string(), sender.hex()]);

    let tx = sender.transfer_to(CLEAN);

    assert!(guardian.check_transaction(&signer(), &tx));

    let entries = logger.entries();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].filtered_address, sender.hex());
    assert_eq!(entries[0].counterpart_address, sender.hex());
}

#[test]
fn test_sender_hit_short_circuits_recipient() {
    let dir = tempfile::tempdir().unwrap();
    let sender = Account::random();
    let (guardian, logger) = guardian_with(&dir, &[LISTED.to_string(), sender.hex()]);

    // Both parties are listed; only the sender is reported
    let tx = sender.transfer_to(LISTED);

    assert!(guardian.check_transaction(&signer(), &tx));

    let entries = logger.entries();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].filtered_address, sender.hex());
}

#[test]
fn test_lookup_is_case_insensitive() {
    let dir = tempfile::tempdir().unwrap();
    let shouted = LISTED.to_uppercase().replacen("0X", "0x", 1);
    let (guardian, _logger) = guardian_with(&dir, &[shouted]);

    let tx = Account::random().transfer_to(&LISTED.to_lowercase());

    assert!(guardian.check_transaction(&signer(), &tx));
    assert!(guardian.check_address(LISTED).unwrap());
    assert!(guardian.check_address(&LISTED.to_lowercase()).unwrap());
    assert!(!guardian.check_address(CLEAN).unwrap());
}

#[test]
fn test_check_address_rejects_malformed_input() {
    let dir = tempfile::tempdir().unwrap();
    let (guardian, _logger) = guardian_with(&dir, &[LISTED]);

    assert!(guardian.check_address("0xnothex").is_err());
}

#[test]
fn test_unsigned_transaction_fails_open() {
    let dir = tempfile::tempdir().unwrap();
    let (guardian, logger) = guardian_with(&dir, &[LISTED]);

    // Recipient is listed, but without a sender no determination is made
    let tx = Transaction::new(
        0,
        address(LISTED),
        U256::zero(),
        21_000,
        U256::from(1u64),
        vec![],
    );

    assert!(!guardian.check_transaction(&signer(), &tx));
    assert!(logger.entries().is_empty());
}

#[test]
fn test_garbage_signature_fails_open() {
    let dir = tempfile::tempdir().unwrap();
    let (guardian, logger) = guardian_with(&dir, &[LISTED]);

    let tx = Account::random()
        .transfer_to(LISTED)
        .with_signature(TxSignature {
            v: CHAIN_ID * 2 + 35,
            r: U256::MAX,
            s: U256::zero(),
        });

    assert!(!guardian.check_transaction(&signer(), &tx));
    assert!(logger.entries().is_empty());
}

#[test]
fn test_wrong_chain_fails_open() {
    let dir = tempfile::tempdir().unwrap();
    let (guardian, _logger) = guardian_with(&dir, &[LISTED]);

    let tx = Account::random().transfer_to(LISTED);
    let other_chain = sender_recovery::Eip155Signer::new(1);

    assert!(other_chain.sender(&tx).is_err());
    assert!(!guardian.check_transaction(&other_chain, &tx));
}

#[test]
fn test_homestead_transaction_screened() {
    let dir = tempfile::tempdir().unwrap();
    let (guardian, logger) = guardian_with(&dir, &[LISTED]);

    let sender = Account::random();
    let tx = Transaction::new(
        3,
        address(LISTED),
        U256::from(5u64),
        21_000,
        U256::from(1u64),
        vec![],
    );
    let tx = sender_recovery::sign_transaction(tx, &HomesteadSigner, &sender.key).unwrap();

    // The EIP-155 signer accepts unprotected transactions
    assert!(guardian.check_transaction(&signer(), &tx));
    assert_eq!(logger.entries()[0].counterpart_address, sender.hex());
}

#[test]
fn test_contract_creation_checks_sender_only() {
    let dir = tempfile::tempdir().unwrap();
    let (guardian, logger) = guardian_with(&dir, &[LISTED]);

    let sender = Account::random();
    let tx = Transaction::new_contract_creation(
        0,
        U256::zero(),
        100_000,
        U256::from(1u64),
        vec![0x60, 0x80],
    );
    let tx = sender_recovery::sign_transaction(tx, &signer(), &sender.key).unwrap();

    assert!(!guardian.check_transaction(&signer(), &tx));
    assert!(logger.entries().is_empty());
}

#[test]
fn test_logger_failure_does_not_change_verdict() {
    let dir = tempfile::tempdir().unwrap();
    let path = filter_file(dir.path(), "bloom_filter.gob", &[LISTED]);
    let guardian = Guardian::with_logger(
        GuardianConfig::new().with_filter_file_path(path),
        Arc::new(BrokenLogger),
    )
    .unwrap();

    let tx = Account::random().transfer_to(LISTED);
    assert!(guardian.check_transaction(&signer(), &tx));
}

const SCENARIO_ADDRESS: &str = "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266";

#[test]
fn test_recipient_scenario_with_single_entry_snapshot() {
    let dir = tempfile::tempdir().unwrap();
    let (guardian, logger) = guardian_with(&dir, &[SCENARIO_ADDRESS]);

    let listed_recipient = Account::random().transfer_to(SCENARIO_ADDRESS);
    assert!(guardian.check_transaction(&signer(), &listed_recipient));

    let clean = Account::random().transfer_to(CLEAN);
    assert!(!guardian.check_transaction(&signer(), &clean));

    let entries = logger.entries();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].filtered_address, SCENARIO_ADDRESS);
}

#[test]
fn test_sender_lookup_error_fails_open() {
    let sender = Account::random();
    let store = FailingLookupStore::new(&sender.hex(), &[LISTED]);
    let logger = RecordingLogger::default();

    let tx = sender.transfer_to(CLEAN);

    assert!(!screen_transaction(&store, &logger, &signer(), &tx));
    assert!(logger.entries().is_empty());
}

#[test]
fn test_sender_lookup_error_still_checks_recipient() {
    let sender = Account::random();
    let store = FailingLookupStore::new(&sender.hex(), &[LISTED]);
    let logger = RecordingLogger::default();

    let tx = sender.transfer_to(LISTED);

    assert!(screen_transaction(&store, &logger, &signer(), &tx));

    let entries = logger.entries();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].filtered_address, LISTED);
    assert_eq!(entries[0].counterpart_address, sender.hex());
}

#[test]
fn test_recipient_lookup_error_fails_open() {
    let sender = Account::random();
    let store = FailingLookupStore::new(LISTED, &[LISTED]);
    let logger = RecordingLogger::default();

    let tx = sender.transfer_to(LISTED);

    assert!(!screen_transaction(&store, &logger, &signer(), &tx));
    assert!(logger.entries().is_empty());
}

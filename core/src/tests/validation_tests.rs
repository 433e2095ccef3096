use super::*;
use crate::common::{block_log, chain_id, keys, message, signed};
use mundis_model::hash::hash;
use mundis_model::signature::Signer;

fn parameters() -> ChainParameters {
    ChainParameters {
        max_transaction_lifetime: 600,
        ..ChainParameters::default()
    }
}

#[test]
fn valid_transaction_yields_signers() {
    let log = block_log(1_000);
    let keys = keys();
    let (parameters, chain_id) = (parameters(), chain_id());
    let validator = TransactionValidator::new(&parameters, &chain_id, &log);

    let mut trx = signed(vec![message("eos", "transfer")], &log, &keys[0]);
    trx.sign(&keys[1], &chain_id);

    let signers = validator.validate(&trx).unwrap();
    let expected: BTreeSet<_> = [keys[0].pubkey(), keys[1].pubkey()].into_iter().collect();
    assert_eq!(signers, expected);
}

#[test]
fn reference_must_match_history() {
    let log = block_log(1_000);
    let (parameters, chain_id) = (parameters(), chain_id());
    let validator = TransactionValidator::new(&parameters, &chain_id, &log);

    let mut trx = signed(vec![message("eos", "transfer")], &log, &keys()[0]);
    assert_eq!(
        validator.check_reference_block(&trx.transaction).unwrap(),
        log.head().unwrap()
    );

    // Right block number, wrong prefix.
    trx.transaction.ref_block_prefix ^= 1;
    assert_eq!(
        validator.validate(&trx).unwrap_err(),
        TransactionError::StaleOrInvalidReference {
            ref_block_num: 1_000,
            ref_block_prefix: trx.transaction.ref_block_prefix,
        }
    );

    // A block that does not exist yet.
    let mut ahead = trx.transaction.clone();
    ahead.ref_block_num = 1_001;
    assert!(matches!(
        validator.check_reference_block(&ahead),
        Err(TransactionError::StaleOrInvalidReference { ref_block_num: 1_001, .. })
    ));
}

#[test]
fn expiration_bounds() {
    let log = block_log(10);
    let now = log.head_block_time();
    let (parameters, chain_id) = (parameters(), chain_id());
    let validator = TransactionValidator::new(&parameters, &chain_id, &log);
    let mut t = signed(vec![message("eos", "transfer")], &log, &keys()[0]).transaction;

    t.set_expiration(now);
    assert!(validator.check_expiration(&t).is_ok());
    t.set_expiration(now + 600);
    assert!(validator.check_expiration(&t).is_ok());

    t.set_expiration(now - 1);
    assert_eq!(
        validator.check_expiration(&t).unwrap_err(),
        TransactionError::ExpiredTransaction {
            expiration: now - 1,
            now
        }
    );

    t.set_expiration(now + 601);
    assert_eq!(
        validator.check_expiration(&t).unwrap_err(),
        TransactionError::ExpirationTooFar {
            expiration: now + 601,
            now,
            max_lifetime: 600
        }
    );
}

#[test]
fn expiration_follows_given_block_time() {
    let log = block_log(10);
    let head_time = log.head_block_time();
    let (parameters, chain_id) = (parameters(), chain_id());
    let mut t = signed(vec![message("eos", "transfer")], &log, &keys()[0]).transaction;
    t.set_expiration(head_time + 2);

    let at_head = TransactionValidator::new(&parameters, &chain_id, &log);
    assert!(at_head.check_expiration(&t).is_ok());

    let next_block = TransactionValidator::new(&parameters, &chain_id, &log).at_time(head_time + 3);
    assert_eq!(
        next_block.check_expiration(&t).unwrap_err(),
        TransactionError::ExpiredTransaction {
            expiration: head_time + 2,
            now: head_time + 3
        }
    );
}

#[test]
fn bad_signatures_are_rejected() {
    let log = block_log(10);
    let keys = keys();
    let (parameters, chain_id) = (parameters(), chain_id());
    let validator = TransactionValidator::new(&parameters, &chain_id, &log);

    // Signed for another chain.
    let mut trx = signed(vec![message("eos", "transfer")], &log, &keys[0]);
    trx.signatures.clear();
    trx.sign(&keys[2], &hash(b"another-chain"));
    assert_eq!(
        validator.validate(&trx).unwrap_err(),
        TransactionError::InvalidSignature {
            signer: keys[2].pubkey()
        }
    );

    // Content changed after signing.
    let mut trx = signed(vec![message("eos", "transfer")], &log, &keys[0]);
    trx.transaction.push_message(message("eos", "issue"));
    assert!(matches!(
        validator.validate(&trx),
        Err(TransactionError::InvalidSignature { .. })
    ));
}

#[test]
fn empty_transaction_is_malformed() {
    let log = block_log(10);
    let (parameters, chain_id) = (parameters(), chain_id());
    let validator = TransactionValidator::new(&parameters, &chain_id, &log);

    let trx = signed(vec![], &log, &keys()[0]);
    let err = validator.validate(&trx).unwrap_err();
    assert!(matches!(err, TransactionError::Malformed(_)));
    assert!(err.is_validation_error());
}

#[test]
fn batch_results_keep_input_order() {
    let log = block_log(100);
    let keys = keys();
    let (parameters, chain_id) = (parameters(), chain_id());
    let validator = TransactionValidator::new(&parameters, &chain_id, &log);

    let transactions: Vec<_> = (0..32)
        .map(|i| {
            let mut trx = signed(vec![message("eos", "transfer")], &log, &keys[i % 4]);
            if i % 3 == 0 {
                trx.transaction.expiration = 0;
            }
            trx
        })
        .collect();

    let results = validator.validate_batch(&transactions);
    assert_eq!(results.len(), transactions.len());
    for (i, result) in results.iter().enumerate() {
        match result {
            Ok(signers) => {
                assert_ne!(i % 3, 0);
                assert!(signers.contains(&keys[i % 4].pubkey()));
            }
            Err(e) => {
                assert_eq!(i % 3, 0);
                assert!(matches!(e, TransactionError::ExpiredTransaction { .. }));
            }
        }
    }
}

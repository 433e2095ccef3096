// Copyright(C) Mundis.
use {
    crate::{
        base_types::{ChainId, TransactionId},
        codec,
        error::{ModelError, ModelResult},
        hash::{hashv, Hash},
        pubkey::Pubkey,
        sanitize::{Sanitize, SanitizeError},
        signature::{unique_signers, Signature, Signer},
        transaction::Transaction,
    },
    log::trace,
    serde::{Deserialize, Serialize},
    std::collections::BTreeSet,
};

/// A transaction plus the signatures backing the authorizations its messages claim.
///
/// Ed25519 signatures cannot be turned back into a key, so every entry names its signer;
/// "recovering" signer keys means checking each entry against the signing digest.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct SignedTransaction {
    pub transaction: Transaction,
    pub signatures: Vec<(Pubkey, Signature)>,
}

impl SignedTransaction {
    pub fn new(transaction: Transaction) -> Self {
        Self {
            transaction,
            signatures: vec![],
        }
    }

    /// Stable identity of the transaction; unaffected by collecting more signatures.
    pub fn id(&self) -> TransactionId {
        self.transaction.digest()
    }

    /// The digest signers sign: the content digest bound to one chain.
    pub fn sig_digest(&self, chain_id: &ChainId) -> Hash {
        hashv(&[chain_id.as_ref(), self.transaction.digest().as_ref()])
    }

    /// Signs for `chain_id` and appends the signature.
    pub fn sign<S: Signer + ?Sized>(&mut self, signer: &S, chain_id: &ChainId) -> &Signature {
        let signature = self.signature(signer, chain_id);
        self.signatures.push((signer.pubkey(), signature));
        &self.signatures[self.signatures.len() - 1].1
    }

    /// Computes the signature `signer` would add without touching `self`.
    pub fn signature<S: Signer + ?Sized>(&self, signer: &S, chain_id: &ChainId) -> Signature {
        signer.sign_message(self.sig_digest(chain_id).as_ref())
    }

    /// Signs once per distinct signer, in the order given.
    pub fn sign_all(&mut self, signers: Vec<&dyn Signer>, chain_id: &ChainId) {
        for signer in unique_signers(signers) {
            self.sign(signer, chain_id);
        }
    }

    /// The keys whose signatures verify against `sig_digest(chain_id)`.
    ///
    /// Fails on the first entry that does not verify, since a transaction carrying a bad
    /// signature is rejected as a whole. Several entries are checked as one batch first and
    /// only walked one by one to name the failing signer.
    pub fn get_signature_keys(&self, chain_id: &ChainId) -> ModelResult<BTreeSet<Pubkey>> {
        let digest = self.sig_digest(chain_id);
        if self.signatures.len() > 1 && Signature::verify_batch(&digest, &self.signatures).is_ok() {
            return Ok(self.signatures.iter().map(|(signer, _)| *signer).collect());
        }
        let mut keys = BTreeSet::new();
        for (signer, signature) in &self.signatures {
            if !signature.verify(signer.as_ref(), digest.as_ref()) {
                trace!("signature by {signer} fails against {digest}");
                return Err(ModelError::InvalidSignature { signer: *signer });
            }
            keys.insert(*signer);
        }
        Ok(keys)
    }

    /// Removes all messages and signatures. Binding fields are kept.
    pub fn clear(&mut self) {
        self.transaction.clear();
        self.signatures.clear();
    }

    pub fn merkle_digest(&self) -> Hash {
        codec::digest(self)
    }
}

impl From<Transaction> for SignedTransaction {
    fn from(transaction: Transaction) -> Self {
        Self::new(transaction)
    }
}

impl Sanitize for SignedTransaction {
    fn sanitize(&self) -> Result<(), SanitizeError> {
        self.transaction.sanitize()
    }
}

#[cfg(test)]
mod tests {
    use {
        super::*,
        crate::{hash::hash, keypair::Keypair, message::Message},
        rand::{rngs::StdRng, SeedableRng},
    };

    fn keys() -> Vec<Keypair> {
        let mut rng = StdRng::from_seed([0; 32]);
        (0..4).map(|_| Keypair::generate(&mut rng)).collect()
    }

    fn trx() -> SignedTransaction {
        let message = Message::new(
            "exchange".parse().unwrap(),
            "buy".parse().unwrap(),
            vec![],
            vec![1, 2, 3],
        );
        let mut t = Transaction::new(vec![message]);
        t.ref_block_num = 10;
        t.ref_block_prefix = 20;
        t.expiration = 30;
        SignedTransaction::new(t)
    }

    #[test]
    fn signer_set_ignores_signing_order() {
        let chain = hash(b"chain");
        let keys = keys();

        let mut forward = trx();
        forward.sign(&keys[0], &chain);
        forward.sign(&keys[1], &chain);

        let mut backward = trx();
        backward.sign(&keys[1], &chain);
        backward.sign(&keys[0], &chain);

        let expected: BTreeSet<_> = [keys[0].pubkey(), keys[1].pubkey()].into_iter().collect();
        assert_eq!(forward.get_signature_keys(&chain).unwrap(), expected);
        assert_eq!(backward.get_signature_keys(&chain).unwrap(), expected);
    }

    #[test]
    fn duplicate_signatures_collapse() {
        let chain = hash(b"chain");
        let keys = keys();
        let mut t = trx();
        t.sign(&keys[2], &chain);
        t.sign(&keys[2], &chain);
        assert_eq!(t.signatures.len(), 2);
        assert_eq!(t.get_signature_keys(&chain).unwrap().len(), 1);
    }

    #[test]
    fn detached_signature_matches_appended() {
        let chain = hash(b"chain");
        let keys = keys();
        let mut t = trx();

        let detached = t.signature(&keys[0], &chain);
        assert!(t.signatures.is_empty());
        let appended = *t.sign(&keys[0], &chain);
        assert_eq!(detached, appended);
        assert_eq!(t.signatures, vec![(keys[0].pubkey(), appended)]);
    }

    #[test]
    fn sig_digest_is_chain_bound() {
        let t = trx();
        assert_ne!(t.sig_digest(&hash(b"one")), t.sig_digest(&hash(b"two")));

        let keys = keys();
        let mut signed = trx();
        signed.sign(&keys[0], &hash(b"one"));
        assert!(matches!(
            signed.get_signature_keys(&hash(b"two")),
            Err(ModelError::InvalidSignature { signer }) if signer == keys[0].pubkey()
        ));
    }

    #[test]
    fn bad_entry_among_many_names_its_signer() {
        let chain = hash(b"chain");
        let keys = keys();
        let mut t = trx();
        t.sign(&keys[0], &chain);
        t.sign(&keys[1], &chain);
        t.sign(&keys[2], &hash(b"other"));
        t.sign(&keys[3], &chain);

        assert!(matches!(
            t.get_signature_keys(&chain),
            Err(ModelError::InvalidSignature { signer }) if signer == keys[2].pubkey()
        ));

        t.signatures.remove(2);
        let expected: BTreeSet<_> = [0, 1, 3].iter().map(|&i| keys[i].pubkey()).collect();
        assert_eq!(t.get_signature_keys(&chain).unwrap(), expected);
    }

    #[test]
    fn forged_signer_is_rejected() {
        let chain = hash(b"chain");
        let keys = keys();
        let mut t = trx();
        let signature = t.signature(&keys[0], &chain);
        t.signatures.push((keys[1].pubkey(), signature));
        assert!(t.get_signature_keys(&chain).is_err());
    }

    #[test]
    fn digest_and_id_ignore_signatures() {
        let chain = hash(b"chain");
        let keys = keys();
        let unsigned = trx();
        let mut signed = trx();
        signed.sign(&keys[0], &chain);

        assert_eq!(unsigned.transaction.digest(), signed.transaction.digest());
        assert_eq!(unsigned.id(), signed.id());
        assert_ne!(unsigned.merkle_digest(), signed.merkle_digest());
        assert_eq!(signed.merkle_digest(), signed.clone().merkle_digest());
    }

    #[test]
    fn sign_all_skips_repeated_signers() {
        let chain = hash(b"chain");
        let keys = keys();
        let mut t = trx();
        let signers: Vec<&dyn Signer> = vec![&keys[0], &keys[1], &keys[0]];
        t.sign_all(signers, &chain);
        assert_eq!(t.signatures.len(), 2);
        assert_eq!(t.get_signature_keys(&chain).unwrap().len(), 2);
    }

    #[test]
    fn clear_keeps_binding() {
        let chain = hash(b"chain");
        let mut t = trx();
        t.sign(&keys()[0], &chain);
        t.clear();
        t.clear();
        assert!(t.transaction.messages.is_empty());
        assert!(t.signatures.is_empty());
        assert_eq!(t.transaction.ref_block_num, 10);
        assert_eq!(t.transaction.ref_block_prefix, 20);
        assert_eq!(t.transaction.expiration, 30);
    }

    #[test]
    fn round_trip() {
        let chain = hash(b"chain");
        let mut t = trx();
        t.sign(&keys()[3], &chain);
        let bytes = codec::encode(&t).unwrap();
        let decoded: SignedTransaction = codec::decode_sanitized(&bytes).unwrap();
        assert_eq!(decoded, t);
        assert_eq!(decoded.get_signature_keys(&chain).unwrap().len(), 1);
    }
}

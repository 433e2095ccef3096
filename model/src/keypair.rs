// Copyright(C) Mundis.
use {
    crate::{
        pubkey::Pubkey,
        signature::{Signature, Signer, SignerError},
    },
    ed25519_dalek::Signer as DalekSigner,
    rand::{CryptoRng, RngCore},
};

/// A plain, vanilla Ed25519 key pair
pub struct Keypair(ed25519_dalek::Keypair);

impl Keypair {
    /// Constructs a new, random `Keypair` using a caller-proveded RNG
    pub fn generate<R>(csprng: &mut R) -> Self
    where
        R: CryptoRng + RngCore,
    {
        Self(ed25519_dalek::Keypair::generate(csprng))
    }
}

impl Clone for Keypair {
    fn clone(&self) -> Self {
        // Both halves are already validated; rebuild the pair without re-parsing.
        let secret = ed25519_dalek::SecretKey::from_bytes(self.0.secret.as_bytes())
            .expect("a keypair's own secret is always 32 valid bytes");
        Self(ed25519_dalek::Keypair {
            secret,
            public: self.0.public,
        })
    }
}

impl Signer for Keypair {
    fn pubkey(&self) -> Pubkey {
        Pubkey::new_from_array(self.0.public.to_bytes())
    }

    fn try_pubkey(&self) -> Result<Pubkey, SignerError> {
        Ok(self.pubkey())
    }

    fn sign_message(&self, message: &[u8]) -> Signature {
        Signature::new_from_array(self.0.sign(message).to_bytes())
    }

    fn try_sign_message(&self, message: &[u8]) -> Result<Signature, SignerError> {
        Ok(self.sign_message(message))
    }
}

impl<T> PartialEq<T> for Keypair
where
    T: Signer,
{
    fn eq(&self, other: &T) -> bool {
        self.pubkey() == other.pubkey()
    }
}

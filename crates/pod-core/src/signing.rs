//! # Root Signing
//!
//! Binds a content root to an EdDSA-Poseidon signature. Signing is
//! deterministic and returns the derived public key alongside the signature.
//!
//! Verification over decoded values returns a plain `bool`. The text entry
//! point [`verify_root_text`] fails with a type error for malformed
//! encodings (bad hex/Base64, wrong byte length, a key that is not a curve
//! point) and only then answers `true`/`false`.

use num_bigint::BigUint;
use pod_crypto::{PrivateKey, PublicKey, Signature};

use crate::error::PodError;

/// Sign a content root. Fails with a type error when `root >= p`.
pub fn sign_root(
    root: &BigUint,
    private_key: &PrivateKey,
) -> Result<(Signature, PublicKey), PodError> {
    let signature = private_key
        .sign(root)
        .map_err(|e| PodError::Type(format!("cannot sign root: {e}")))?;
    Ok((signature, private_key.public_key()))
}

/// Verify a signature over a content root.
pub fn verify_root(root: &BigUint, signature: &Signature, public_key: &PublicKey) -> bool {
    let valid = pod_crypto::verify(root, signature, public_key);
    if !valid {
        tracing::debug!(signer = %public_key, "root signature rejected");
    }
    valid
}

/// Verify a root against hex or Base64 encoded signature and key text.
pub fn verify_root_text(
    root: &BigUint,
    signature: &str,
    public_key: &str,
) -> Result<bool, PodError> {
    let signature = Signature::from_text(signature)?;
    let public_key = PublicKey::from_text(public_key)?;
    Ok(verify_root(root, &signature, &public_key))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use pod_crypto::field::field_modulus;

    #[test]
    fn test_sign_then_verify() {
        let sk = PrivateKey::generate();
        let root = BigUint::from(0xdead_beefu64);
        let (sig, pk) = sign_root(&root, &sk).unwrap();
        assert_eq!(pk, sk.public_key());
        assert!(verify_root(&root, &sig, &pk));
        assert!(!verify_root(&(root + 1u32), &sig, &pk));
    }

    #[test]
    fn test_sign_rejects_non_field_root() {
        let err = sign_root(field_modulus(), &PrivateKey::generate()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Type);
    }

    #[test]
    fn test_text_verification_accepts_hex_and_base64() {
        let sk = PrivateKey::from_bytes([9; 32]);
        let root = BigUint::from(77u32);
        let (sig, pk) = sign_root(&root, &sk).unwrap();

        let sig_hex = hex::encode(sig.as_bytes());
        assert!(verify_root_text(&root, &sig.to_base64(), &pk.to_base64()).unwrap());
        assert!(verify_root_text(&root, &sig_hex, &pk.to_base64()).unwrap());
        assert!(!verify_root_text(&BigUint::from(78u32), &sig_hex, &pk.to_base64()).unwrap());
    }

    #[test]
    fn test_text_verification_rejects_malformed_encodings() {
        let sk = PrivateKey::from_bytes([9; 32]);
        let root = BigUint::from(77u32);
        let (sig, pk) = sign_root(&root, &sk).unwrap();

        for (s, k) in [
            ("!!!".to_string(), pk.to_base64()),
            (sig.to_base64(), "short".to_string()),
            (sig.to_base64()[..40].to_string(), pk.to_base64()),
        ] {
            let err = verify_root_text(&root, &s, &k).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::Type, "{s} / {k}");
        }
    }
}

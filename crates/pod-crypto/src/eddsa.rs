//! # EdDSA-Poseidon Signing and Verification
//!
//! Signs a single BN254 field element (a POD content root) with the
//! circomlib EdDSA construction over Baby Jubjub, using Poseidon for the
//! challenge hash. Signatures made here can be checked in-circuit by
//! circomlib's `EdDSAPoseidonVerifier`.
//!
//! ## Security Invariant
//!
//! - The signed message is a field element, never raw bytes. Roots at or
//!   above the modulus are rejected before signing.
//! - Private keys are never serialized or logged. `PrivateKey` does not
//!   implement `Serialize`, and its `Debug` output is redacted.
//! - [`verify`] never panics and never errors: any structurally valid
//!   signature/key pair yields `true` or `false`. Malformed text is rejected
//!   earlier, when the key or signature is decoded.
//!
//! ## Key Derivation
//!
//! `h = BLAKE-512(private_key)`, as in circomlib. The low half is pruned into the secret
//! scalar `s`; the public key is `Base8 · (s >> 3)`. The high half seeds the
//! deterministic nonce.
//!
//! ## Serde
//!
//! Public keys and signatures serialize as unpadded Base64 strings and
//! deserialize from hex or Base64.

use blake_hash::{Blake512, Digest};
use num_bigint::BigUint;
use rand::RngCore;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::babyjub::{subgroup_order, Point};
use crate::encoding::{decode_fixed, encode_base64};
use crate::error::CryptoError;
use crate::field::{fr_from_biguint, fr_to_biguint};
use crate::poseidon::poseidon5;

/// A 32-byte EdDSA-Poseidon private key.
///
/// Does not implement `Serialize`. Use [`PrivateKey::to_base64`] to write a
/// key file explicitly.
#[derive(Clone, PartialEq, Eq)]
pub struct PrivateKey([u8; 32]);

/// A packed Baby Jubjub public key (32 bytes).
///
/// The decoded point is kept alongside the packed form, so a `PublicKey`
/// always denotes a point on the curve.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct PublicKey {
    packed: [u8; 32],
    point: Point,
}

/// An EdDSA-Poseidon signature: `pack(R8) ‖ LE32(S)`.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Signature([u8; 64]);

// ---------------------------------------------------------------------------
// PrivateKey impls
// ---------------------------------------------------------------------------

impl PrivateKey {
    /// Generate a new random private key from the OS RNG.
    pub fn generate() -> Self {
        let mut bytes = [0u8; 32];
        rand::rngs::OsRng.fill_bytes(&mut bytes);
        Self(bytes)
    }

    /// Wrap raw key bytes.
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Parse a private key from hex or Base64 text.
    pub fn from_text(text: &str) -> Result<Self, CryptoError> {
        decode_fixed(text.trim(), "private key").map(Self)
    }

    /// Render the key as unpadded Base64.
    pub fn to_base64(&self) -> String {
        encode_base64(&self.0)
    }

    /// Derive the public key.
    pub fn public_key(&self) -> PublicKey {
        let (_, _, point) = self.expand();
        PublicKey::from_point(point)
    }

    /// Sign a field element.
    ///
    /// Deterministic: the same key and message always produce the same
    /// signature.
    pub fn sign(&self, message: &BigUint) -> Result<Signature, CryptoError> {
        let message_fr = fr_from_biguint(message)?;
        let (nonce_seed, s, a) = self.expand();
        let order = subgroup_order();

        let mut hasher = Blake512::new();
        hasher.update(nonce_seed);
        hasher.update(le32(message));
        let r_hash = hasher.finalize();
        let r = BigUint::from_bytes_le(&r_hash) % order;
        let r8 = Point::base8().mul_scalar(&r);

        let hm = poseidon5([r8.x(), r8.y(), a.x(), a.y(), message_fr]);
        let s_sig = (r + fr_to_biguint(hm) * s) % order;

        let mut out = [0u8; 64];
        out[..32].copy_from_slice(&r8.pack());
        out[32..].copy_from_slice(&le32(&s_sig));
        Ok(Signature(out))
    }

    // (nonce seed, secret scalar, public point)
    fn expand(&self) -> ([u8; 32], BigUint, Point) {
        let h = Blake512::digest(&self.0);
        let mut pruned = [0u8; 32];
        pruned.copy_from_slice(&h[..32]);
        pruned[0] &= 0xF8;
        pruned[31] &= 0x7F;
        pruned[31] |= 0x40;
        let s = BigUint::from_bytes_le(&pruned);
        let point = Point::base8().mul_scalar(&(&s >> 3u32));

        let mut seed = [0u8; 32];
        seed.copy_from_slice(&h[32..]);
        (seed, s, point)
    }
}

impl std::fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "PrivateKey(<private>)")
    }
}

// ---------------------------------------------------------------------------
// PublicKey impls
// ---------------------------------------------------------------------------

impl PublicKey {
    fn from_point(point: Point) -> Self {
        Self {
            packed: point.pack(),
            point,
        }
    }

    /// Decode packed key bytes, rejecting anything that is not a curve point.
    pub fn from_bytes(packed: [u8; 32]) -> Result<Self, CryptoError> {
        let point = Point::unpack(&packed)?;
        Ok(Self { packed, point })
    }

    /// Parse a public key from hex (64 chars) or Base64 (43 chars) text.
    pub fn from_text(text: &str) -> Result<Self, CryptoError> {
        Self::from_bytes(decode_fixed(text, "public key")?)
    }

    /// The packed 32-byte form.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.packed
    }

    /// The decoded curve point.
    pub fn point(&self) -> Point {
        self.point
    }

    /// Canonical text form: unpadded Base64.
    pub fn to_base64(&self) -> String {
        encode_base64(&self.packed)
    }
}

impl Serialize for PublicKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_base64())
    }
}

impl<'de> Deserialize<'de> for PublicKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        Self::from_text(&text).map_err(serde::de::Error::custom)
    }
}

impl std::fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "PublicKey({})", self.to_base64())
    }
}

impl std::fmt::Display for PublicKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_base64())
    }
}

// ---------------------------------------------------------------------------
// Signature impls
// ---------------------------------------------------------------------------

impl Signature {
    /// Wrap raw signature bytes. No curve checks happen until [`verify`].
    pub fn from_bytes(bytes: [u8; 64]) -> Self {
        Self(bytes)
    }

    /// Parse a signature from hex (128 chars) or Base64 (86 chars) text.
    pub fn from_text(text: &str) -> Result<Self, CryptoError> {
        decode_fixed(text, "signature").map(Self)
    }

    /// The raw 64 bytes.
    pub fn as_bytes(&self) -> &[u8; 64] {
        &self.0
    }

    /// Canonical text form: unpadded Base64.
    pub fn to_base64(&self) -> String {
        encode_base64(&self.0)
    }
}

impl Serialize for Signature {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_base64())
    }
}

impl<'de> Deserialize<'de> for Signature {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        Self::from_text(&text).map_err(serde::de::Error::custom)
    }
}

impl std::fmt::Debug for Signature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Signature({}...)", &self.to_base64()[..8])
    }
}

impl std::fmt::Display for Signature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_base64())
    }
}

// ---------------------------------------------------------------------------
// Verification
// ---------------------------------------------------------------------------

/// Verify a signature over a field element.
///
/// Returns `false` for a message outside the field, an `R8` that is not a
/// curve point, or `S` not reduced modulo the subgroup order.
pub fn verify(message: &BigUint, signature: &Signature, public_key: &PublicKey) -> bool {
    let Ok(message_fr) = fr_from_biguint(message) else {
        return false;
    };

    let mut r8_bytes = [0u8; 32];
    r8_bytes.copy_from_slice(&signature.0[..32]);
    let Ok(r8) = Point::unpack(&r8_bytes) else {
        return false;
    };

    let s = BigUint::from_bytes_le(&signature.0[32..]);
    if &s >= subgroup_order() {
        return false;
    }

    let a = public_key.point();
    let hm = poseidon5([r8.x(), r8.y(), a.x(), a.y(), message_fr]);

    let lhs = Point::base8().mul_scalar(&s);
    let rhs = r8.add(&a.mul_scalar(&(fr_to_biguint(hm) * 8u32)));
    lhs == rhs
}

fn le32(value: &BigUint) -> [u8; 32] {
    let bytes = value.to_bytes_le();
    let mut out = [0u8; 32];
    out[..bytes.len()].copy_from_slice(&bytes);
    out
}

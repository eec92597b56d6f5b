//! # Signed PODs
//!
//! A [`Pod`] is a [`PodContent`] plus a signature over its content id and
//! the signer's public key. A `Pod` does not re-check Merkle proofs; entry
//! proofs are a separate selective-disclosure concern.
//!
//! ## Wire Form
//!
//! ```json
//! { "entries": { ... }, "signature": "<b64>", "signerPublicKey": "<b64>" }
//! ```

use num_bigint::BigUint;
use pod_crypto::{PrivateKey, PublicKey, Signature};
use serde::Deserialize;
use serde_json::Value;

use crate::content::PodContent;
use crate::error::PodError;
use crate::serialize::{entries_from_json, entries_to_json};
use crate::signing::{sign_root, verify_root};

/// Signed POD content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pod {
    content: PodContent,
    signature: Signature,
    signer_public_key: PublicKey,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct PodJson {
    entries: Value,
    signature: String,
    signer_public_key: String,
}

impl Pod {
    /// Sign `content` with `private_key`.
    pub fn sign(content: PodContent, private_key: &PrivateKey) -> Result<Self, PodError> {
        let (signature, signer_public_key) = sign_root(&content.content_id(), private_key)?;
        tracing::debug!(
            signer = %signer_public_key,
            entries = content.size(),
            "signed POD"
        );
        Ok(Self {
            content,
            signature,
            signer_public_key,
        })
    }

    /// Assemble a POD from parts without checking the signature.
    pub fn load(content: PodContent, signature: Signature, signer_public_key: PublicKey) -> Self {
        Self {
            content,
            signature,
            signer_public_key,
        }
    }

    /// Recompute the content id and check the signature against it.
    pub fn verify_signature(&self) -> bool {
        verify_root(&self.content.content_id(), &self.signature, &self.signer_public_key)
    }

    pub fn content(&self) -> &PodContent {
        &self.content
    }

    pub fn content_id(&self) -> BigUint {
        self.content.content_id()
    }

    pub fn signature(&self) -> &Signature {
        &self.signature
    }

    pub fn signer_public_key(&self) -> &PublicKey {
        &self.signer_public_key
    }

    /// Compact JSON wire form.
    pub fn serialize(&self) -> String {
        self.to_json().to_string()
    }

    /// The wire form as a JSON value.
    pub fn to_json(&self) -> Value {
        serde_json::json!({
            "entries": entries_to_json(self.content.iter()),
            "signature": self.signature.to_base64(),
            "signerPublicKey": self.signer_public_key.to_base64(),
        })
    }

    /// Parse the wire form. Does not verify the signature.
    pub fn deserialize(json: &str) -> Result<Self, PodError> {
        let wire: PodJson = serde_json::from_str(json)
            .map_err(|e| PodError::Type(format!("invalid POD JSON: {e}")))?;
        let content = PodContent::from_entries(entries_from_json(&wire.entries)?)?;
        let signature = Signature::from_text(&wire.signature)?;
        let signer_public_key = PublicKey::from_text(&wire.signer_public_key)?;
        Ok(Self::load(content, signature, signer_public_key))
    }
}

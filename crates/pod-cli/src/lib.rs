//! # pod-cli: Command-Line Tool for PODs
//!
//! Provides the `pod` command-line interface over `pod-core`.
//!
//! ## Subcommands
//!
//! - `pod keygen`: Generate an EdDSA-Poseidon key pair.
//! - `pod sign`: Validate an entries file and sign it into a POD.
//! - `pod verify`: Check a POD's signature against its recomputed root.
//! - `pod prove`: Emit an entry proof or full circuit signals.
//! - `pod verify-proof`: Check a proof or circuit signals file.
//! - `pod inspect`: Summarize a POD or entries file.
//!
//! ```bash
//! pod keygen --output keys --prefix issuer
//! pod sign --entries ticket.json --key keys/issuer.key --out ticket.pod.json
//! pod prove ticket.pod.json --name seat --signals
//! ```
//!
//! Every handler returns the process exit code: `0` on success, `1` when a
//! verification fails. Errors (unreadable files, malformed input) propagate
//! as `anyhow::Error`.

pub mod config;
pub mod proof;
pub mod signing;

use std::path::Path;

use anyhow::{Context, Result};
use pod_core::{Pod, PodContent};
use serde_json::Value;

/// A file that is either a signed POD or a bare entries object.
#[derive(Debug)]
pub enum PodDocument {
    /// `{ "entries", "signature", "signerPublicKey" }`
    Signed(Pod),
    /// `{ "<name>": { "type", "value" }, ... }`
    Entries(PodContent),
}

impl PodDocument {
    /// The content, whichever form the file had.
    pub fn content(&self) -> &PodContent {
        match self {
            Self::Signed(pod) => pod.content(),
            Self::Entries(content) => content,
        }
    }
}

/// Read and parse a JSON file.
pub fn read_json(path: &Path) -> Result<(String, Value)> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let value = serde_json::from_str(&text)
        .with_context(|| format!("failed to parse JSON: {}", path.display()))?;
    Ok((text, value))
}

/// Load a POD or entries file, telling them apart by a string `signature`
/// field at the top level.
pub fn load_document(path: &Path) -> Result<PodDocument> {
    let (text, value) = read_json(path)?;
    let is_signed = value.get("signature").is_some_and(Value::is_string);
    if is_signed {
        let pod = Pod::deserialize(&text)
            .with_context(|| format!("invalid POD: {}", path.display()))?;
        Ok(PodDocument::Signed(pod))
    } else {
        let content = PodContent::deserialize(&text)
            .with_context(|| format!("invalid POD entries: {}", path.display()))?;
        Ok(PodDocument::Entries(content))
    }
}

/// Write `text` to `out`, or print it when no path is given.
pub fn write_output(out: Option<&Path>, text: &str) -> Result<()> {
    match out {
        Some(path) => std::fs::write(path, format!("{text}\n"))
            .with_context(|| format!("failed to write {}", path.display())),
        None => {
            println!("{text}");
            Ok(())
        }
    }
}

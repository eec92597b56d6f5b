//! Entry proof subcommands: `prove`, `verify-proof` and `inspect`.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use num_bigint::BigUint;
use serde_json::Value;

use pod_core::{hash_name, EntryCircuitSignals, MerkleProof, PodContent};

use crate::{load_document, read_json, write_output, PodDocument};

/// Arguments for `pod prove`.
#[derive(Args, Debug)]
pub struct ProveArgs {
    /// POD or entries file.
    #[arg(value_name = "FILE")]
    pub file: PathBuf,
    /// Entry to prove.
    #[arg(long)]
    pub name: String,
    /// Emit full circuit signals instead of the bare Merkle proof.
    #[arg(long)]
    pub signals: bool,
    /// Where to write the JSON (default: stdout).
    #[arg(long, value_name = "FILE")]
    pub out: Option<PathBuf>,
}

/// Arguments for `pod verify-proof`.
#[derive(Args, Debug)]
pub struct VerifyProofArgs {
    /// Merkle proof or circuit signals file.
    #[arg(value_name = "FILE")]
    pub file: PathBuf,
    /// Also require the proven leaf to be this entry name.
    #[arg(long)]
    pub name: Option<String>,
}

/// Arguments for `pod inspect`.
#[derive(Args, Debug)]
pub struct InspectArgs {
    /// POD or entries file.
    #[arg(value_name = "FILE")]
    pub file: PathBuf,
}

/// Execute `pod prove`.
pub fn run_prove(args: &ProveArgs) -> Result<u8> {
    let doc = load_document(&args.file)?;
    let json = prove_entry(doc.content(), &args.name, args.signals)?;
    write_output(args.out.as_deref(), &json)?;
    Ok(0)
}

/// Execute `pod verify-proof`.
pub fn run_verify_proof(args: &VerifyProofArgs) -> Result<u8> {
    let (ok, leaf) = check_proof_file(&args.file)?;
    if !ok {
        println!("FAIL: proof does not verify");
        return Ok(1);
    }
    if let Some(name) = &args.name {
        if leaf != hash_name(name) {
            println!("FAIL: proof is not for entry {name:?}");
            return Ok(1);
        }
    }
    println!("OK: proof is valid");
    Ok(0)
}

/// Execute `pod inspect`.
pub fn run_inspect(args: &InspectArgs) -> Result<u8> {
    let doc = load_document(&args.file)?;
    print!("{}", describe(&doc));
    Ok(0)
}

fn prove_entry(content: &PodContent, name: &str, signals: bool) -> Result<String> {
    let value = if signals {
        let signals = content
            .generate_entry_circuit_signals(name)
            .with_context(|| format!("cannot build signals for {name:?}"))?;
        serde_json::to_value(signals)?
    } else {
        let proof = content
            .generate_entry_proof(name)
            .with_context(|| format!("cannot prove {name:?}"))?;
        serde_json::to_value(proof)?
    };
    tracing::debug!(entry = name, signals, "generated entry proof");
    Ok(serde_json::to_string_pretty(&value)?)
}

/// Returns whether the file verifies, and the proven leaf.
///
/// Signals files are recognized by a top-level `proof` object.
fn check_proof_file(path: &Path) -> Result<(bool, BigUint)> {
    let (_, value) = read_json(path)?;
    if value.get("proof").is_some_and(Value::is_object) {
        let signals: EntryCircuitSignals = serde_json::from_value(value)
            .with_context(|| format!("invalid circuit signals: {}", path.display()))?;
        Ok((signals.is_consistent(), signals.name_hash))
    } else {
        let proof: MerkleProof = serde_json::from_value(value)
            .with_context(|| format!("invalid Merkle proof: {}", path.display()))?;
        Ok((PodContent::verify_entry_proof(&proof), proof.leaf))
    }
}

fn describe(doc: &PodDocument) -> String {
    let content = doc.content();
    let mut out = String::new();
    out.push_str(&format!("Content ID: {}\n", content.content_id()));
    out.push_str(&format!("Entries:    {}\n", content.size()));
    out.push_str(&format!("Depth:      {}\n", content.merkle_tree_depth()));
    if let PodDocument::Signed(pod) = doc {
        out.push_str(&format!("Signer:     {}\n", pod.signer_public_key()));
        let status = if pod.verify_signature() {
            "valid"
        } else {
            "INVALID"
        };
        out.push_str(&format!("Signature:  {status}\n"));
    }
    for (name, value) in content.iter() {
        out.push_str(&format!("  {name} ({}) = {value}\n", value.value_type()));
    }
    out
}

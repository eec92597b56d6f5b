//! # Signing Subcommands
//!
//! `keygen`, `sign` and `verify`: EdDSA-Poseidon key generation, signing an
//! entries file into a POD, and checking a POD's signature.
//!
//! ## Security Invariant
//!
//! Private keys are read from a file or `POD_PRIVATE_KEY` and never echoed.
//! Only the public key is printed.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::Args;

use pod_core::{Pod, PodContent, PrivateKey};

use crate::config::CliConfig;
use crate::{load_document, write_output, PodDocument};

/// Arguments for `pod keygen`.
#[derive(Args, Debug)]
pub struct KeygenArgs {
    /// Output directory for the key files (default: `POD_OUTPUT_DIR` or ".").
    #[arg(long, short)]
    pub output: Option<PathBuf>,
    /// Prefix for the key filenames.
    #[arg(long, default_value = "pod")]
    pub prefix: String,
}

/// Arguments for `pod sign`.
#[derive(Args, Debug)]
pub struct SignArgs {
    /// JSON entries file to sign.
    #[arg(long, value_name = "FILE")]
    pub entries: PathBuf,
    /// Private key file (hex or Base64). Falls back to `POD_PRIVATE_KEY`.
    #[arg(long, value_name = "FILE")]
    pub key: Option<PathBuf>,
    /// Where to write the POD JSON (default: stdout).
    #[arg(long, value_name = "FILE")]
    pub out: Option<PathBuf>,
}

/// Arguments for `pod verify`.
#[derive(Args, Debug)]
pub struct VerifyArgs {
    /// Signed POD file.
    #[arg(value_name = "FILE")]
    pub file: PathBuf,
}

/// Execute `pod keygen`.
pub fn run_keygen(args: &KeygenArgs, config: &CliConfig) -> Result<u8> {
    let output = args
        .output
        .clone()
        .or_else(|| config.output_dir.clone())
        .unwrap_or_else(|| PathBuf::from("."));
    cmd_keygen(&output, &args.prefix)
}

/// Execute `pod sign`.
pub fn run_sign(args: &SignArgs, config: &CliConfig) -> Result<u8> {
    let key = match &args.key {
        Some(path) => read_private_key(path)?,
        None => match config.private_key()? {
            Some(key) => key,
            None => bail!("no signing key: pass --key FILE or set POD_PRIVATE_KEY"),
        },
    };
    cmd_sign(&args.entries, &key, args.out.as_deref())
}

/// Execute `pod verify`.
pub fn run_verify(args: &VerifyArgs) -> Result<u8> {
    cmd_verify(&args.file)
}

/// Generate a key pair and write `<prefix>.key` / `<prefix>.pub`.
fn cmd_keygen(output_dir: &Path, prefix: &str) -> Result<u8> {
    std::fs::create_dir_all(output_dir).with_context(|| {
        format!(
            "failed to create output directory: {}",
            output_dir.display()
        )
    })?;

    let sk = PrivateKey::generate();
    let pk = sk.public_key();

    let sk_path = output_dir.join(format!("{prefix}.key"));
    let pk_path = output_dir.join(format!("{prefix}.pub"));

    std::fs::write(&sk_path, sk.to_base64())
        .with_context(|| format!("failed to write private key: {}", sk_path.display()))?;
    std::fs::write(&pk_path, pk.to_base64())
        .with_context(|| format!("failed to write public key: {}", pk_path.display()))?;

    tracing::info!(public_key = %pk, "generated key pair");
    println!("OK: generated EdDSA-Poseidon key pair");
    println!("  Private key: {}", sk_path.display());
    println!("  Public key:  {}", pk_path.display());
    println!("  Public key (base64): {pk}");

    Ok(0)
}

/// Build content from an entries file and sign it.
fn cmd_sign(entries_path: &Path, key: &PrivateKey, out: Option<&Path>) -> Result<u8> {
    let text = std::fs::read_to_string(entries_path)
        .with_context(|| format!("failed to read entries: {}", entries_path.display()))?;
    let content = PodContent::deserialize(&text)
        .with_context(|| format!("invalid POD entries: {}", entries_path.display()))?;

    let pod = Pod::sign(content, key).context("failed to sign POD")?;
    tracing::info!(content_id = %pod.content_id(), "signed POD");

    let json = serde_json::to_string_pretty(&pod.to_json()).context("failed to render POD")?;
    write_output(out, &json)?;
    Ok(0)
}

/// Verify a signed POD file.
fn cmd_verify(path: &Path) -> Result<u8> {
    let pod = match load_document(path)? {
        PodDocument::Signed(pod) => pod,
        PodDocument::Entries(_) => bail!("{} is unsigned POD entries", path.display()),
    };

    if pod.verify_signature() {
        println!("OK: signature is valid");
        println!("  Content ID: {}", pod.content_id());
        println!("  Signer:     {}", pod.signer_public_key());
        Ok(0)
    } else {
        println!("FAIL: signature does not match content");
        Ok(1)
    }
}

fn read_private_key(path: &Path) -> Result<PrivateKey> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read private key: {}", path.display()))?;
    PrivateKey::from_text(text.trim())
        .with_context(|| format!("invalid private key: {}", path.display()))
}

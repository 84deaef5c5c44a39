//! Engine binary content-hash manifest
//!
//! A running web client compares these digests against what the server
//! currently serves to decide whether its cached engine binaries are stale.

use crate::{PackError, PackResult};
use sha2::{Digest, Sha256};
use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::Path;

/// Fixed list of binary artifacts covered by the manifest (engine core and
/// editor runtime). Absent artifacts are skipped, never an error.
pub const ENGINE_ARTIFACTS: [&str; 2] = ["spx.wasm", "engine.editor.wasm"];

/// Runtime bootstrap script the manifest fragment is appended to
pub const BOOTSTRAP_SCRIPT: &str = "spxgame.js";

/// SHA-256 digest of a file, hex-encoded.
pub fn compute_file_hash(path: &Path) -> PackResult<String> {
    let mut file = File::open(path).map_err(|e| PackError::io(path, e))?;
    let mut hasher = Sha256::new();
    io::copy(&mut file, &mut hasher).map_err(|e| PackError::io(path, e))?;
    let digest = hasher.finalize();
    Ok(digest.iter().map(|b| format!("{b:02x}")).collect())
}

/// Compute digests for the fixed artifact list and append the manifest
/// fragment to the bootstrap script in `web_dir`.
///
/// The fragment is a JS object literal mapping filename to hex digest.
/// Artifacts missing on disk produce no entry; a partial manifest is valid.
pub fn save_engine_hash(web_dir: &Path) -> PackResult<()> {
    let mut lines = String::new();
    for artifact in ENGINE_ARTIFACTS {
        let path = web_dir.join(artifact);
        match compute_file_hash(&path) {
            Ok(hash) => {
                lines.push_str(&format!("\"{artifact}\":\"{hash}\",\n"));
            }
            Err(_) => {
                eprintln!("skipping hash for absent artifact {artifact}");
            }
        }
    }

    let fragment = format!(
        "\nfunction GetEngineHashes() {{\n\treturn {{\n{lines}\t}}\n}}\n"
    );

    let script_path = web_dir.join(BOOTSTRAP_SCRIPT);
    let mut script = OpenOptions::new()
        .append(true)
        .open(&script_path)
        .map_err(|e| PackError::io(&script_path, e))?;
    script
        .write_all(fragment.as_bytes())
        .map_err(|e| PackError::io(&script_path, e))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compute_file_hash_known_vector() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("data.bin");
        std::fs::write(&path, b"abc").unwrap();
        // SHA-256("abc")
        assert_eq!(
            compute_file_hash(&path).unwrap(),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn test_compute_file_hash_missing_file() {
        let tmp = tempfile::tempdir().unwrap();
        assert!(compute_file_hash(&tmp.path().join("absent")).is_err());
    }

    #[test]
    fn test_save_engine_hash_partial_manifest() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::write(tmp.path().join("spx.wasm"), b"wasm bytes").unwrap();
        std::fs::write(tmp.path().join(BOOTSTRAP_SCRIPT), "// boot\n").unwrap();

        save_engine_hash(tmp.path()).unwrap();

        let script = std::fs::read_to_string(tmp.path().join(BOOTSTRAP_SCRIPT)).unwrap();
        assert!(script.starts_with("// boot\n"));
        assert!(script.contains("function GetEngineHashes()"));
        assert_eq!(script.matches("\"spx.wasm\"").count(), 1);
        // absent editor runtime produces no entry and no error
        assert!(!script.contains("engine.editor.wasm"));
    }

    #[test]
    fn test_save_engine_hash_requires_bootstrap_script() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::write(tmp.path().join("spx.wasm"), b"wasm bytes").unwrap();
        assert!(save_engine_hash(tmp.path()).is_err());
    }
}

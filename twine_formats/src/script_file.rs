//! Loading life scripts from disk.
//!
//! Scripts are stored either as the raw bytes extracted from a scene, or as
//! hex text for hand-authored fixtures. Hex text may be split across lines,
//! separated by whitespace, and carry `#` comments.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

/// Read a script, decoding it from hex text when `hex` is set.
pub fn read_script_file(path: &Path, hex: bool) -> Result<Vec<u8>> {
    if hex {
        let text = fs::read_to_string(path)
            .with_context(|| format!("reading hex script {}", path.display()))?;
        decode_hex_script(&text).with_context(|| format!("decoding hex script {}", path.display()))
    } else {
        fs::read(path).with_context(|| format!("reading script {}", path.display()))
    }
}

pub fn decode_hex_script(text: &str) -> Result<Vec<u8>> {
    let digits: String = text
        .lines()
        .map(|line| line.split('#').next().unwrap_or(""))
        .flat_map(|line| line.chars().filter(|ch| !ch.is_whitespace()))
        .collect();
    hex::decode(&digits).context("script is not valid hex")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_scripts_ignore_layout_and_comments() {
        let text = "0c 10 00 00 # IF LIFE_POINT == 0\n  0800\n25 01\n00\n";
        let bytes = decode_hex_script(text).expect("decoded");
        assert_eq!(bytes, vec![0x0C, 0x10, 0x00, 0x00, 0x08, 0x00, 0x25, 0x01, 0x00]);
    }

    #[test]
    fn odd_digit_counts_are_rejected() {
        assert!(decode_hex_script("0c1").is_err());
    }

    #[test]
    fn reads_raw_and_hex_files() {
        let dir = tempfile::tempdir().expect("tempdir");
        let raw = dir.path().join("actor.life");
        fs::write(&raw, [0x01, 0x07, 0x00]).expect("write raw");
        assert_eq!(read_script_file(&raw, false).expect("raw"), vec![1, 7, 0]);

        let hex = dir.path().join("actor.hex");
        fs::write(&hex, "01 07\n00\n").expect("write hex");
        assert_eq!(read_script_file(&hex, true).expect("hex"), vec![1, 7, 0]);
    }
}

//! Subcommand implementations

pub mod authorize;
pub mod recover;
pub mod sign;

use anyhow::{Context, Result};
use std::path::Path;
use ward_authorization::AuthorizerConfig;
use ward_core::WardConfig;

/// Resolve configuration: defaults, optional file, environment
pub fn load_config(path: Option<&Path>) -> Result<AuthorizerConfig> {
    AuthorizerConfig::load(path).context("loading authorizer config")
}

/// Argument text, or the contents of a file when prefixed with `@`
pub fn read_text_arg(value: &str) -> Result<String> {
    match value.strip_prefix('@') {
        Some(path) => {
            std::fs::read_to_string(path).with_context(|| format!("reading {path}"))
        }
        None => Ok(value.to_string()),
    }
}

/// Hex signature argument, with or without `0x`
pub fn decode_hex_arg(value: &str) -> Result<Vec<u8>> {
    let text = read_text_arg(value)?;
    ward_signature::decode_hex(&text).context("decoding signature")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn at_prefix_reads_file() {
        let file = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(file.path(), "hello").unwrap();
        let arg = format!("@{}", file.path().display());
        assert_eq!(read_text_arg(&arg).unwrap(), "hello");
        assert_eq!(read_text_arg("inline").unwrap(), "inline");
    }

    #[test]
    fn hex_arg_accepts_prefix() {
        assert_eq!(decode_hex_arg("0x0aff").unwrap(), vec![0x0a, 0xff]);
        assert_eq!(decode_hex_arg("0aff").unwrap(), vec![0x0a, 0xff]);
        assert!(decode_hex_arg("zz").is_err());
        assert_eq!(decode_hex_arg(" 0x0aff\n").unwrap(), vec![0x0a, 0xff]);
    }
}

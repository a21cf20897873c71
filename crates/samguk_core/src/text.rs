//! Fixed-width EUC-KR strings as stored in save records.

use encoding_rs::EUC_KR;

use crate::error::{Result, SaveError};

/// Decodes up to the first NUL byte. Undecodable sequences become U+FFFD.
pub fn decode_fixed(bytes: &[u8]) -> String {
    let end = bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len());
    let (cow, _) = EUC_KR.decode_without_bom_handling(&bytes[..end]);
    cow.into_owned()
}

/// Encodes `text` into exactly `width` bytes, NUL padded.
pub fn encode_fixed(text: &str, width: usize) -> Result<Vec<u8>> {
    let (cow, _, had_errors) = EUC_KR.encode(text);
    if had_errors {
        return Err(SaveError::Text(format!(
            "{text:?} cannot be represented in EUC-KR"
        )));
    }
    if cow.len() > width {
        return Err(SaveError::Text(format!(
            "{text:?} needs {} bytes, field holds {width}",
            cow.len()
        )));
    }
    let mut out = vec![0u8; width];
    out[..cow.len()].copy_from_slice(&cow);
    Ok(out)
}

/// Re-encodes `text` into `slot`, keeping the slot's existing bytes when the
/// decoded text is unchanged. Names written by the game may carry bytes after
/// the terminator; this keeps those intact for untouched names.
pub fn store_fixed(slot: &mut [u8], text: &str) -> Result<()> {
    if decode_fixed(slot) == text {
        return Ok(());
    }
    let encoded = encode_fixed(text, slot.len())?;
    slot.copy_from_slice(&encoded);
    Ok(())
}

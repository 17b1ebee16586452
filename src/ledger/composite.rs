//! Composite key encoding
//!
//! Layout: `U+0000 objectType U+0000 (attr U+0000)*`
//!
//! The separator is never allowed inside a part, which keeps the encoding
//! unambiguous and order preserving for prefix scans. `U+10FFFF` is also
//! reserved since it terminates partial-key range scans.

use super::errors::{LedgerError, LedgerResult};

/// Leading byte and separator of every composite key
pub const COMPOSITE_KEY_NAMESPACE: char = '\u{0}';

/// Upper bound appended to a partial key to form a range end
pub const MAX_UNICODE_RUNE: char = '\u{10FFFF}';

fn validate_part(part: &str) -> LedgerResult<()> {
    if part.contains(COMPOSITE_KEY_NAMESPACE) || part.contains(MAX_UNICODE_RUNE) {
        return Err(LedgerError::InvalidCompositeKeyPart(part.to_string()));
    }
    Ok(())
}

/// Build a composite key from an object type and ordered attributes.
pub fn create_composite_key(object_type: &str, attributes: &[&str]) -> LedgerResult<String> {
    validate_part(object_type)?;

    let mut key = String::with_capacity(
        2 + object_type.len() + attributes.iter().map(|a| a.len() + 1).sum::<usize>(),
    );
    key.push(COMPOSITE_KEY_NAMESPACE);
    key.push_str(object_type);
    key.push(COMPOSITE_KEY_NAMESPACE);

    for attr in attributes {
        validate_part(attr)?;
        key.push_str(attr);
        key.push(COMPOSITE_KEY_NAMESPACE);
    }

    Ok(key)
}

/// Split a composite key back into its object type and attributes.
pub fn split_composite_key(key: &str) -> LedgerResult<(String, Vec<String>)> {
    let body = key
        .strip_prefix(COMPOSITE_KEY_NAMESPACE)
        .and_then(|rest| rest.strip_suffix(COMPOSITE_KEY_NAMESPACE))
        .ok_or_else(|| LedgerError::NotCompositeKey(key.to_string()))?;

    let mut parts = body.split(COMPOSITE_KEY_NAMESPACE).map(str::to_string);
    let object_type = parts.next().unwrap_or_default();
    Ok((object_type, parts.collect()))
}

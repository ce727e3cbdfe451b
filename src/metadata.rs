//! Opaque per-frame metadata dictionary. The core recognizes exactly one
//! key (`CRC_OK`, on ingress); everything else passes through untouched
//! on delivery to the application port, per `spec.md` §4.1/§6.

use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq)]
pub enum MetaValue {
    Bool(bool),
    Int(i64),
    Str(String),
    Bytes(Vec<u8>),
}

pub type Metadata = HashMap<String, MetaValue>;

pub const CRC_OK_KEY: &str = "CRC_OK";

/// Reads `CRC_OK` from metadata, defaulting to `true` when absent or of
/// the wrong type, matching the original block's `meta_dict.get('CRC_OK', True)`.
pub fn crc_ok(meta: &Metadata) -> bool {
    match meta.get(CRC_OK_KEY) {
        Some(MetaValue::Bool(b)) => *b,
        _ => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crc_ok_defaults_true_when_absent() {
        let meta = Metadata::new();
        assert!(crc_ok(&meta));
    }

    #[test]
    fn crc_ok_honors_false() {
        let mut meta = Metadata::new();
        meta.insert(CRC_OK_KEY.to_string(), MetaValue::Bool(false));
        assert!(!crc_ok(&meta));
    }
}

//! On-disk entry format.
//!
//! Each entry file holds one JSON object:
//! `{"version": 1, "url": "...", "entry": <value>}`. The URL is informational;
//! it shows which URL last wrote a key when two URLs collide.
//!
//! Entries are checked to read back the same before they are written. JSON
//! cannot tell `Some(None)` from `None` for an `Option<Option<T>>`, so such
//! entries read back as `None`.

use std::path::Path;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::Error;

/// Current envelope version.
pub const FORMAT_VERSION: u32 = 1;

#[derive(Serialize)]
struct EnvelopeRef<'a, V> {
    version: u32,
    url: &'a str,
    entry: &'a V,
}

#[derive(Deserialize)]
struct Header {
    version: u32,
}

#[derive(Deserialize)]
struct Envelope<V> {
    entry: V,
}

/// Serialize an entry for `url` into envelope bytes.
///
/// Fails with `Encode` if the bytes would not decode to the same value, such
/// as a non-finite float written out as `null`.
pub fn encode<V: Serialize + DeserializeOwned>(url: &str, entry: &V) -> Result<Vec<u8>, Error> {
    let envelope = EnvelopeRef { version: FORMAT_VERSION, url, entry };
    let bytes = serde_json::to_vec(&envelope).map_err(Error::Encode)?;

    let decoded: Envelope<V> = serde_json::from_slice(&bytes).map_err(Error::Encode)?;
    let expected = serde_json::to_value(entry).map_err(Error::Encode)?;
    let actual = serde_json::to_value(&decoded.entry).map_err(Error::Encode)?;
    if expected != actual {
        return Err(Error::Encode(<serde_json::Error as serde::ser::Error>::custom(
            "entry does not read back unchanged",
        )));
    }

    Ok(bytes)
}

/// Decode envelope bytes read from `path`.
///
/// The version is checked before the entry is decoded, so a file from a newer
/// writer reports `UnsupportedVersion` rather than a shape mismatch.
pub fn decode<V: DeserializeOwned>(path: &Path, bytes: &[u8]) -> Result<V, Error> {
    let header: Header =
        serde_json::from_slice(bytes).map_err(|source| Error::Corrupt { path: path.to_path_buf(), source })?;

    if header.version != FORMAT_VERSION {
        return Err(Error::UnsupportedVersion { path: path.to_path_buf(), version: header.version });
    }

    let envelope: Envelope<V> =
        serde_json::from_slice(bytes).map_err(|source| Error::Corrupt { path: path.to_path_buf(), source })?;
    Ok(envelope.entry)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    #[test]
    fn test_encode_layout() {
        let bytes = encode("http://nowhere.com/", &42u32).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(value["version"], FORMAT_VERSION);
        assert_eq!(value["url"], "http://nowhere.com/");
        assert_eq!(value["entry"], 42);
    }

    #[test]
    fn test_decode_entry() {
        let mut entry = BTreeMap::new();
        entry.insert("etag".to_string(), "abc".to_string());

        let bytes = encode("http://nowhere.com/", &entry).unwrap();
        let decoded: BTreeMap<String, String> = decode(Path::new("feed_x"), &bytes).unwrap();
        assert_eq!(decoded, entry);
    }

    #[test]
    fn test_encode_rejects_non_finite_floats() {
        assert!(matches!(encode("http://nowhere.com/", &f64::INFINITY), Err(Error::Encode(_))));
        assert!(matches!(encode("http://nowhere.com/", &vec![1.0, f64::NAN]), Err(Error::Encode(_))));
    }

    #[test]
    fn test_floats_decode_exactly() {
        for value in [1.0715660391465826e-75, 0.1 + 0.2, f64::MIN_POSITIVE, 5e-324, f64::MAX, -0.0] {
            let bytes = encode("http://nowhere.com/", &value).unwrap();
            let decoded: f64 = decode(Path::new("feed_x"), &bytes).unwrap();
            assert_eq!(decoded.to_bits(), value.to_bits());
        }
    }

    #[test]
    fn test_decode_garbage_is_corrupt() {
        let result: Result<u32, Error> = decode(Path::new("feed_x"), b"\xac\xed\x00\x05");
        assert!(matches!(result, Err(Error::Corrupt { .. })));
    }

    #[test]
    fn test_decode_truncated_is_corrupt() {
        let bytes = encode("http://nowhere.com/", &"payload".to_string()).unwrap();
        let result: Result<String, Error> = decode(Path::new("feed_x"), &bytes[..bytes.len() - 3]);
        assert!(matches!(result, Err(Error::Corrupt { .. })));
    }

    #[test]
    fn test_decode_wrong_shape_is_corrupt() {
        let bytes = encode("http://nowhere.com/", &"not a number".to_string()).unwrap();
        let result: Result<u64, Error> = decode(Path::new("feed_x"), &bytes);
        assert!(matches!(result, Err(Error::Corrupt { .. })));
    }

    #[test]
    fn test_decode_unknown_version() {
        let bytes = br#"{"version": 7, "url": "x", "entry": {"new": "layout"}}"#;
        let result: Result<u64, Error> = decode(Path::new("feed_x"), bytes);
        assert!(matches!(result, Err(Error::UnsupportedVersion { version: 7, .. })));
    }
}

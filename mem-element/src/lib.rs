//! In-memory data element.
//!
//! [`MemoryElement`] holds its byte payload directly in process memory
//! and resolves byte-string URI formats:
//!
//! - `base64://<data>`
//! - `data:<mimetype>;base64,<data>`
//! - Empty string (no data)
//!
//! `<data>` accepts the standard and URL-safe base64 alphabets
//! interchangeably within a single payload. The content type is either
//! declared by the `data:` form, or inferred lazily (and at most once)
//! from the payload when a sniffing capability is compiled in.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use lazy_static::lazy_static;
use once_cell::sync::OnceCell;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use data_element::{DataElement, FromUri, MimeSniffer};
use data_error::{DatumError, Result};

/// Base64 alphabet including the URL-safe character replacements.
const B64_PATTERN: &str = "[a-zA-Z0-9+/_-]*={0,2}";

lazy_static! {
    static ref DATA_B64_RE: Regex =
        Regex::new(&format!("^base64://(?P<b64>{B64_PATTERN})$")).unwrap();
    static ref DATA_URI_RE: Regex = Regex::new(&format!(
        r"^data:(?P<ct>[\w/]+);base64,(?P<b64>{B64_PATTERN})$"
    ))
    .unwrap();
}

/// Process sniffing capability, resolved once at build time.
fn default_sniffer() -> Option<&'static dyn MimeSniffer> {
    #[cfg(feature = "sniff")]
    {
        Some(dev_sniff::detector())
    }
    #[cfg(not(feature = "sniff"))]
    {
        None
    }
}

/// Decode accepting the standard and URL-safe alphabets
/// interchangeably: `-`/`_` map to the same 6-bit values as `+`/`/`.
fn decode_mixed_alphabet(b64: &str) -> Result<Vec<u8>> {
    let normalized: String = b64
        .chars()
        .map(|c| match c {
            '-' => '+',
            '_' => '/',
            c => c,
        })
        .collect();
    Ok(STANDARD.decode(normalized)?)
}

/// In-memory representation of data stored in a byte buffer.
///
/// The payload is set once at construction and never mutated. The only
/// mutable state is the write-once content-type cache, which is safe
/// under concurrent readers.
#[derive(Debug, Clone)]
pub struct MemoryElement {
    bytes: Vec<u8>,
    content_type: OnceCell<Option<String>>,
}

/// Reconstruction config for a [`MemoryElement`], as produced by
/// [`DataElement::get_config`].
///
/// JSON cannot carry raw bytes, so the payload travels base64-encoded
/// with the standard alphabet.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemoryElementConfig {
    pub bytes: Option<String>,
    pub content_type: Option<String>,
}

impl MemoryElement {
    /// Identifier used when registering this type for URI resolution.
    pub const KIND: &'static str = "memory";

    /// Create a new element from a byte buffer and optional content
    /// type.
    ///
    /// If no content type is given, one will be inferred from the byte
    /// content on first request, provided a sniffing capability is
    /// available.
    pub fn new(bytes: Vec<u8>, content_type: Option<String>) -> Self {
        log::debug!("Creating memory element from {} bytes", bytes.len());

        let cell = OnceCell::new();
        if let Some(ct) = content_type {
            let _ = cell.set(Some(ct));
        }
        Self {
            bytes,
            content_type: cell,
        }
    }

    /// Create a new element from a base64 payload string and optional
    /// content type, skipping URI grammar matching.
    ///
    /// The payload may mix the standard and URL-safe alphabets. An
    /// absent payload string is an argument error; a payload that fails
    /// to decode propagates as a decode error.
    pub fn from_base64(
        b64: Option<&str>,
        content_type: Option<&str>,
    ) -> Result<Self> {
        let b64 = b64.ok_or_else(|| {
            DatumError::Argument(
                "base64 payload string should not be None".to_string(),
            )
        })?;
        let bytes = decode_mixed_alphabet(b64)?;
        Ok(Self::new(bytes, content_type.map(str::to_string)))
    }

    /// Reconstruct an element from a config previously produced by
    /// [`DataElement::get_config`].
    pub fn from_config(config: &Value) -> Result<Self> {
        let config: MemoryElementConfig =
            serde_json::from_value(config.clone())?;
        Self::from_base64(
            config.bytes.as_deref(),
            config.content_type.as_deref(),
        )
    }

    /// Resolve the content type using an explicit sniffing capability.
    ///
    /// A cached value, including a cached indeterminate result, is
    /// returned without recomputation; with a capability present,
    /// inference runs at most once per element. With no capability the
    /// cache is left unwritten and each call re-checks.
    pub fn content_type_with(
        &self,
        sniffer: Option<&dyn MimeSniffer>,
    ) -> Option<String> {
        if let Some(resolved) = self.content_type.get() {
            return resolved.clone();
        }
        let sniffer = sniffer?;
        self.content_type
            .get_or_init(|| sniffer.sniff(&self.bytes))
            .clone()
    }
}

impl DataElement for MemoryElement {
    fn kind(&self) -> &'static str {
        Self::KIND
    }

    fn is_usable() -> bool {
        // No external dependencies
        true
    }

    fn get_bytes(&self) -> Result<Vec<u8>> {
        Ok(self.bytes.clone())
    }

    fn content_type(&self) -> Option<String> {
        self.content_type_with(default_sniffer())
    }

    fn get_config(&self) -> Value {
        json!({
            "bytes": STANDARD.encode(&self.bytes),
            "content_type": self.content_type.get().cloned().flatten(),
        })
    }
}

impl FromUri for MemoryElement {
    /// Construct a new instance based on the given URI.
    ///
    /// The recognized forms are disjoint, but they are still consulted
    /// in a fixed order: empty string, then `base64://`, then `data:`.
    fn from_uri(uri: &str) -> Result<Self> {
        if uri.is_empty() {
            return Ok(Self::new(Vec::new(), None));
        }

        if let Some(caps) = DATA_B64_RE.captures(uri) {
            return Self::from_base64(Some(&caps["b64"]), None);
        }

        if let Some(caps) = DATA_URI_RE.captures(uri) {
            return Self::from_base64(Some(&caps["b64"]), Some(&caps["ct"]));
        }

        Err(DatumError::invalid_uri(
            uri,
            "did not match a recognized byte-format URI",
        ))
    }
}

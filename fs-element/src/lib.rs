//! File-backed data element.
//!
//! [`FileElement`] references a payload residing on the local
//! filesystem. The element records the file's location only; it does
//! not own the file and never writes to it.
//!
//! Recognized URI forms:
//!
//! - `file://<absolute path>`
//! - A plain path to an existing regular file
//!
//! Plain paths must name an existing regular file; an arbitrary
//! string must not look like a file URI during multi-type dispatch.

use std::fs;
use std::path::{Path, PathBuf};

use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use data_element::{DataElement, FromUri, MimeSniffer};
use data_error::{DatumError, Result};

const FILE_URI_PREFIX: &str = "file://";

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

/// Data element referencing a file on the local filesystem.
#[derive(Debug, Clone)]
pub struct FileElement {
    path: PathBuf,
    content_type: OnceCell<Option<String>>,
}

/// Reconstruction config for a [`FileElement`], as produced by
/// [`DataElement::get_config`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileElementConfig {
    pub filepath: PathBuf,
}

impl FileElement {
    /// Identifier used when registering this type for URI resolution.
    pub const KIND: &'static str = "file";

    /// Create a new element referencing `path`.
    ///
    /// The path is not validated here; byte access surfaces I/O errors
    /// if the file is missing or unreadable.
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        log::debug!(
            "Creating file element for {}",
            path.as_ref().display()
        );

        Self {
            path: path.as_ref().to_path_buf(),
            content_type: OnceCell::new(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reconstruct an element from a config previously produced by
    /// [`DataElement::get_config`].
    pub fn from_config(config: &Value) -> Result<Self> {
        let config: FileElementConfig =
            serde_json::from_value(config.clone())?;
        Ok(Self::new(config.filepath))
    }

    /// Resolve the content type using an explicit sniffing capability.
    ///
    /// The file's bytes are read once to feed the sniffer; the result,
    /// including an indeterminate one, is cached permanently. An
    /// unreadable file leaves the cache unwritten and resolves to
    /// `None`.
    pub fn content_type_with(
        &self,
        sniffer: Option<&dyn MimeSniffer>,
    ) -> Option<String> {
        if let Some(resolved) = self.content_type.get() {
            return resolved.clone();
        }
        let sniffer = sniffer?;
        let bytes = fs::read(&self.path).ok()?;
        self.content_type
            .get_or_init(|| sniffer.sniff(&bytes))
            .clone()
    }
}

impl DataElement for FileElement {
    fn kind(&self) -> &'static str {
        Self::KIND
    }

    fn is_usable() -> bool {
        // Local filesystem access is always available
        true
    }

    fn get_bytes(&self) -> Result<Vec<u8>> {
        Ok(fs::read(&self.path)?)
    }

    fn content_type(&self) -> Option<String> {
        self.content_type_with(default_sniffer())
    }

    fn get_config(&self) -> Value {
        json!({
            "filepath": &self.path,
        })
    }
}

impl FromUri for FileElement {
    fn from_uri(uri: &str) -> Result<Self> {
        if let Some(path) = uri.strip_prefix(FILE_URI_PREFIX) {
            let path = Path::new(path);
            if !path.is_absolute() {
                return Err(DatumError::invalid_uri(
                    uri,
                    "file:// URIs must carry an absolute path",
                ));
            }
            return Ok(Self::new(path));
        }

        let path = Path::new(uri);
        if path.is_file() {
            return Ok(Self::new(path));
        }

        Err(DatumError::invalid_uri(
            uri,
            "not a path to an existing file",
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use data_element::resolve_uri;
    use std::fs::File;
    use std::io::Write;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tempdir::TempDir;

    struct CountingSniffer {
        calls: AtomicUsize,
        answer: Option<&'static str>,
    }

    impl CountingSniffer {
        fn new(answer: Option<&'static str>) -> Self {
            Self {
                calls: AtomicUsize::new(0),
                answer,
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl MimeSniffer for CountingSniffer {
        fn sniff(&self, _bytes: &[u8]) -> Option<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.answer.map(str::to_string)
        }
    }

    fn write_payload(dir: &TempDir, name: &str, bytes: &[u8]) -> PathBuf {
        let path = dir.path().join(name);
        let mut file =
            File::create(&path).expect("Failed to create test file");
        file.write_all(bytes)
            .expect("Failed to write test file");
        path
    }

    #[test]
    fn bytes_round_trip() {
        let dir = TempDir::new("fs_element_test").unwrap();
        let path = write_payload(&dir, "payload.bin", b"hello");

        let element = FileElement::new(&path);
        assert_eq!(element.get_bytes().unwrap(), b"hello");
        assert_eq!(element.kind(), "file");
    }

    #[test]
    fn plain_path_uri_resolves() {
        let dir = TempDir::new("fs_element_test").unwrap();
        let path = write_payload(&dir, "payload.bin", b"hello");

        let element = resolve_uri::<FileElement>(path.to_str())
            .expect("Failed to resolve plain path");
        assert_eq!(element.get_bytes().unwrap(), b"hello");
    }

    #[test]
    fn file_uri_requires_absolute_path() {
        let dir = TempDir::new("fs_element_test").unwrap();
        let path = write_payload(&dir, "payload.bin", b"hello");

        let uri = format!("file://{}", path.display());
        let element = resolve_uri::<FileElement>(Some(&uri))
            .expect("Failed to resolve file:// URI");
        assert_eq!(element.get_bytes().unwrap(), b"hello");

        let err = resolve_uri::<FileElement>(Some("file://relative/path"))
            .expect_err("Relative file:// URI should be rejected");
        assert!(matches!(err, DatumError::InvalidUri { .. }));
    }

    #[test]
    fn missing_file_is_rejected() {
        let err = resolve_uri::<FileElement>(Some("no/such/file"))
            .expect_err("Missing file should not resolve");
        assert!(matches!(err, DatumError::InvalidUri { .. }));
    }

    #[test]
    fn vanished_file_surfaces_io_error() {
        let dir = TempDir::new("fs_element_test").unwrap();
        let path = write_payload(&dir, "payload.bin", b"hello");

        let element = FileElement::new(&path);
        std::fs::remove_file(&path).unwrap();

        let err = element
            .get_bytes()
            .expect_err("Reading a vanished file should fail");
        assert!(matches!(err, DatumError::Io(_)));
    }

    #[test]
    fn sniffer_invoked_at_most_once() {
        let dir = TempDir::new("fs_element_test").unwrap();
        let path = write_payload(&dir, "payload.bin", b"payload");

        let element = FileElement::new(&path);
        let sniffer = CountingSniffer::new(Some("application/x-test"));

        for _ in 0..3 {
            assert_eq!(
                element.content_type_with(Some(&sniffer)),
                Some("application/x-test".to_string())
            );
        }
        assert_eq!(sniffer.calls(), 1);
    }

    #[test]
    fn unreadable_file_stays_unresolved() {
        let element = FileElement::new("no/such/file");
        let sniffer = CountingSniffer::new(Some("application/x-test"));

        assert_eq!(element.content_type_with(Some(&sniffer)), None);
        assert_eq!(sniffer.calls(), 0);
    }

    #[test]
    fn config_round_trip() {
        let dir = TempDir::new("fs_element_test").unwrap();
        let path = write_payload(&dir, "payload.bin", b"hello");

        let element = FileElement::new(&path);
        let config = element.get_config();

        let restored = FileElement::from_config(&config)
            .expect("Failed to reconstruct from config");
        assert_eq!(restored.path(), element.path());
        assert_eq!(restored.get_bytes().unwrap(), b"hello");
    }
}

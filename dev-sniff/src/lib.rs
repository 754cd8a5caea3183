//! Reference [`MimeSniffer`] implementation.
//!
//! Uses the [`infer`] crate to detect content MIME types from magic
//! bytes. Detection needs no system dependency, so the capability is
//! available wherever this crate is compiled in.

use data_element::MimeSniffer;

/// Magic-byte content sniffer backed by [`infer`].
#[derive(Debug, Default)]
pub struct InferSniffer;

impl MimeSniffer for InferSniffer {
    fn sniff(&self, bytes: &[u8]) -> Option<String> {
        infer::get(bytes).map(|kind| kind.mime_type().to_string())
    }
}

static DETECTOR: InferSniffer = InferSniffer;

/// Process-wide detector instance, resolved once.
pub fn detector() -> &'static dyn MimeSniffer {
    &DETECTOR
}

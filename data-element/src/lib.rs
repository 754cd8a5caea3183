//! # Data Element
//!
//! `data-element` is a crate for referencing opaque binary payloads that
//! may originate from different backing stores. It defines the contract
//! every backing-store-specific element implements ([`DataElement`]), the
//! URI construction protocol ([`FromUri`]), the content-sniffing
//! capability interface ([`MimeSniffer`]) and an ordered dispatcher that
//! resolves a URI without knowing the backing-store type in advance
//! ([`ElementRegistry`]).
//!
//! An element denotes a fixed, immutable payload plus an optionally-known
//! content type, independent of where the bytes physically reside.

use std::fmt::Debug;

use data_error::{DatumError, Result};
use serde_json::Value;

/// This trait defines the minimal capability set of a data element, so
/// generic consumers can treat all backing stores uniformly.
///
/// Implementors own (or reference) a fixed byte payload; the payload
/// never changes over the lifetime of the element, even though its
/// interpretation (the content type) may be resolved lazily.
pub trait DataElement: Debug {
    /// Short identifier of this element's backing-store type.
    fn kind(&self) -> &'static str;

    /// Whether this type's required external dependencies are available
    /// in the current environment.
    ///
    /// Queried before an element type is offered for URI resolution.
    fn is_usable() -> bool
    where
        Self: Sized;

    /// The full byte payload.
    ///
    /// Deterministic and idempotent: repeated calls on the same
    /// instance yield identical byte sequences.
    fn get_bytes(&self) -> Result<Vec<u8>>;

    /// Standard type/subtype string for this element, or `None` if the
    /// content type is unknown.
    ///
    /// May have the side effect of triggering a one-time content-type
    /// inference; never re-infers after the first resolution.
    fn content_type(&self) -> Option<String>;

    /// Mapping of primitive values sufficient to reconstruct an
    /// equivalent instance through the type's normal constructor.
    fn get_config(&self) -> Value;
}

/// Construction of an element from a URI string.
///
/// Each concrete type recognizes its own URI forms, consulted in a
/// fixed order, and rejects anything else with
/// [`DatumError::InvalidUri`]. No partial matching and no fallback
/// heuristics: malformed or unrecognized input is always rejected,
/// never silently coerced.
pub trait FromUri: DataElement + Sized {
    /// Construct a new instance based on the given URI.
    fn from_uri(uri: &str) -> Result<Self>;
}

/// Resolve an optional URI string into an element of type `E`.
///
/// An absent URI is rejected before any grammar matching.
pub fn resolve_uri<E: FromUri>(uri: Option<&str>) -> Result<E> {
    match uri {
        Some(uri) => E::from_uri(uri),
        None => Err(DatumError::invalid_uri("None", "None value given")),
    }
}

/// Content-sniffing capability: derive a MIME type from raw byte
/// content rather than an explicit declaration.
///
/// Implementations must be pure with respect to the payload: same
/// bytes, same answer, and no mutation.
pub trait MimeSniffer: Send + Sync {
    /// Detected MIME type of `bytes`, or `None` if indeterminate.
    fn sniff(&self, bytes: &[u8]) -> Option<String>;
}

type UriResolver = fn(&str) -> Result<Box<dyn DataElement>>;

/// Ordered collection of element constructors tried against a URI.
///
/// Registered types are consulted in registration order; the first one
/// that recognizes the URI wins. The order is part of the resolution
/// contract and must stay deterministic.
#[derive(Default)]
pub struct ElementRegistry {
    entries: Vec<(&'static str, UriResolver)>,
}

impl ElementRegistry {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Offer `E` under `kind`, unless it is unusable in this
    /// environment.
    pub fn register<E>(&mut self, kind: &'static str)
    where
        E: FromUri + 'static,
    {
        if !E::is_usable() {
            log::warn!("element type `{kind}` is not usable, skipping");
            return;
        }
        let resolver: UriResolver = |uri| {
            E::from_uri(uri).map(|e| Box::new(e) as Box<dyn DataElement>)
        };
        self.entries.push((kind, resolver));
    }

    /// Kinds offered in this environment, in resolution order.
    pub fn kinds(&self) -> Vec<&'static str> {
        self.entries.iter().map(|(kind, _)| *kind).collect()
    }

    /// Resolve `uri` against the registered types in order.
    ///
    /// A type that rejects the URI as unrecognized passes it on to the
    /// next one; any other failure (e.g. a payload that matched the
    /// surface grammar but failed to decode) propagates immediately.
    pub fn resolve(&self, uri: Option<&str>) -> Result<Box<dyn DataElement>> {
        let uri = match uri {
            Some(uri) => uri,
            None => {
                return Err(DatumError::invalid_uri(
                    "None",
                    "None value given",
                ))
            }
        };
        for (kind, resolver) in &self.entries {
            match resolver(uri) {
                Ok(element) => {
                    log::debug!("URI resolved by `{kind}` element");
                    return Ok(element);
                }
                Err(DatumError::InvalidUri { .. }) => continue,
                Err(err) => return Err(err),
            }
        }
        Err(DatumError::invalid_uri(
            uri,
            "no registered element type matched the URI",
        ))
    }
}

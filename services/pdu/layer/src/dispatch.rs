//! Type-code dispatch to the decoder of the next layer.
//!
//! The dispatcher is a registry from numeric type codes to decode routines.
//! Header nodes never name their inner layer types; they hand their type
//! field and the remaining bytes to [`DecodeContext::resolve`]. Codes without
//! a registration yield a [`RawPdu`] holding the bytes verbatim, so unknown
//! upper layers survive a decode/serialize round trip untouched.

use crate::pdu::{Decode, Pdu};
use crate::raw::RawPdu;
use crate::{component_debug, component_trace, component_warn};
use pdu_wire::WireResult;
use std::collections::HashMap;
use std::fmt;

/// Default limit on decoded nesting depth
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// Decode routine stored in the registry
pub type DecodeFn = dyn Fn(&[u8], DecodeContext<'_>) -> WireResult<Box<dyn Pdu>> + Send + Sync;

/// Registry of decode routines keyed by type code
pub struct Dispatcher {
    decoders: HashMap<u16, Box<DecodeFn>>,
    max_depth: usize,
}

/// What a header node needs to decode the layer it encapsulates
#[derive(Clone, Copy)]
pub struct DecodeContext<'d> {
    dispatcher: &'d Dispatcher,
    depth: usize,
}

impl Dispatcher {
    /// Create an empty registry
    pub fn new() -> Self {
        Self {
            decoders: HashMap::new(),
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    /// Set the nesting limit, builder style
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.set_max_depth(max_depth);
        self
    }

    /// Register `T` for `code`, builder style
    pub fn with<T: Decode>(mut self, code: u16) -> Self {
        self.register::<T>(code);
        self
    }

    /// Nesting limit.
    ///
    /// Layers at this depth or deeper are kept as raw payload instead of
    /// being decoded further. The outermost layer is depth 0 and is always
    /// decoded, so the limit is never below 1.
    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Change the nesting limit; 0 is raised to 1
    pub fn set_max_depth(&mut self, max_depth: usize) {
        if max_depth == 0 {
            component_warn!("dispatch", "max_depth 0 would skip the outermost layer, using 1");
        }
        self.max_depth = max_depth.max(1);
    }

    /// Decode layers carrying `code` as `T`.
    ///
    /// Returns `true` if an earlier registration for `code` was replaced.
    pub fn register<T: Decode>(&mut self, code: u16) -> bool {
        self.register_fn(code, |data, cx| {
            T::decode(data, cx).map(|pdu| Box::new(pdu) as Box<dyn Pdu>)
        })
    }

    /// Decode layers carrying `code` with an arbitrary routine.
    ///
    /// Returns `true` if an earlier registration for `code` was replaced.
    pub fn register_fn<F>(&mut self, code: u16, decode: F) -> bool
    where
        F: Fn(&[u8], DecodeContext<'_>) -> WireResult<Box<dyn Pdu>> + Send + Sync + 'static,
    {
        let replaced = self.decoders.insert(code, Box::new(decode)).is_some();
        if replaced {
            component_debug!("dispatch", code, "replaced decoder registration");
        }
        replaced
    }

    /// Remove the registration for `code`
    pub fn unregister(&mut self, code: u16) -> bool {
        self.decoders.remove(&code).is_some()
    }

    /// Whether `code` has a registration
    pub fn is_registered(&self, code: u16) -> bool {
        self.decoders.contains_key(&code)
    }

    /// Number of registered codes
    pub fn len(&self) -> usize {
        self.decoders.len()
    }

    /// Whether no code is registered
    pub fn is_empty(&self) -> bool {
        self.decoders.is_empty()
    }

    /// Registered codes in ascending order
    pub fn codes(&self) -> Vec<u16> {
        let mut codes: Vec<u16> = self.decoders.keys().copied().collect();
        codes.sort_unstable();
        codes
    }

    /// Build the layer identified by `code` from `data`.
    ///
    /// Unregistered codes produce a [`RawPdu`] holding `data`; that is not an
    /// error. Decode failures of a registered layer abort the whole decode.
    pub fn resolve(&self, code: u16, data: &[u8]) -> WireResult<Box<dyn Pdu>> {
        self.resolve_at(code, data, 0)
    }

    /// Decode a whole chain whose outermost layer is `T`
    pub fn resolve_root<T: Decode>(&self, data: &[u8]) -> WireResult<T> {
        T::decode(
            data,
            DecodeContext {
                dispatcher: self,
                depth: 0,
            },
        )
    }

    fn resolve_at(&self, code: u16, data: &[u8], depth: usize) -> WireResult<Box<dyn Pdu>> {
        if depth >= self.max_depth {
            component_debug!(
                "dispatch",
                code,
                depth,
                len = data.len(),
                "nesting limit reached, keeping raw payload"
            );
            return Ok(Box::new(RawPdu::from(data)));
        }

        match self.decoders.get(&code) {
            Some(decode) => {
                component_trace!("dispatch", code, depth, len = data.len(), "decoding layer");
                decode(
                    data,
                    DecodeContext {
                        dispatcher: self,
                        depth,
                    },
                )
            }
            None => {
                component_trace!(
                    "dispatch",
                    code,
                    len = data.len(),
                    "unregistered type code, keeping raw payload"
                );
                Ok(Box::new(RawPdu::from(data)))
            }
        }
    }
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dispatcher")
            .field("codes", &self.codes())
            .field("max_depth", &self.max_depth)
            .finish()
    }
}

impl<'d> DecodeContext<'d> {
    /// Build the layer encapsulated by the current one
    pub fn resolve(&self, code: u16, data: &[u8]) -> WireResult<Box<dyn Pdu>> {
        self.dispatcher.resolve_at(code, data, self.depth + 1)
    }

    /// Registry backing this decode
    pub fn dispatcher(&self) -> &'d Dispatcher {
        self.dispatcher
    }

    /// Number of layers above the one being decoded
    pub fn depth(&self) -> usize {
        self.depth
    }
}

impl fmt::Debug for DecodeContext<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DecodeContext")
            .field("depth", &self.depth)
            .finish()
    }
}

//! The header node contract shared by every protocol layer.
//!
//! A chain is a root node owning at most one inner node, which owns at most
//! one inner node, and so on down to a node without an inner PDU or to a raw
//! payload leaf. Generic code (serialization, lookup, cloning, comparison)
//! works over `dyn Pdu` and never needs to know the concrete layer types.

use crate::dispatch::DecodeContext;
use pdu_wire::WireResult;
use serde::{Deserialize, Serialize};
use std::any::Any;
use std::fmt;

/// Tag identifying the concrete kind of a layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PduType {
    /// Unclassified trailing bytes
    Raw,
    /// Point-to-point protocol header
    Ppp,
    /// Layer kinds defined outside this crate
    UserDefined(u16),
}

impl fmt::Display for PduType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PduType::Raw => write!(f, "raw"),
            PduType::Ppp => write!(f, "ppp"),
            PduType::UserDefined(id) => write!(f, "user-defined({})", id),
        }
    }
}

/// A single layer of a PDU chain
pub trait Pdu: fmt::Debug + Send + Sync + Any {
    /// Kind of this layer
    fn pdu_type(&self) -> PduType;

    /// Bytes this layer's own header occupies on the wire.
    ///
    /// Constant for a given layer value and independent of its inner PDU.
    fn header_size(&self) -> u32;

    /// Write exactly `header_size()` bytes to the front of `buf`.
    ///
    /// Fails with `BufferTooSmall` when `buf` is shorter than the header.
    /// The inner PDU is not written; the chain serializer handles that.
    fn write_header(&self, buf: &mut [u8]) -> WireResult<()>;

    /// The next layer, if any
    fn inner(&self) -> Option<&dyn Pdu>;

    /// Mutable access to the next layer, if any
    fn inner_mut(&mut self) -> Option<&mut Box<dyn Pdu>>;

    /// Replace the next layer, dropping the previous one.
    ///
    /// Leaf layers cannot encapsulate anything and hand `Some(layer)` back
    /// as `Err(layer)`; clearing with `None` always succeeds.
    fn set_inner(&mut self, inner: Option<Box<dyn Pdu>>) -> Result<(), Box<dyn Pdu>>;

    /// Detach and return the next layer
    fn take_inner(&mut self) -> Option<Box<dyn Pdu>>;

    /// Deep copy of this layer and everything it encapsulates
    fn clone_pdu(&self) -> Box<dyn Pdu>;

    /// Upcast for typed lookup
    fn as_any(&self) -> &dyn Any;

    /// Mutable upcast for typed lookup
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

/// Layers that can be built from the front of a byte buffer
pub trait Decode: Pdu + Sized {
    /// Decode this layer from `data` and, through `cx`, everything after it.
    ///
    /// The length of `data` is the declared total size; implementations must
    /// not look past it. A buffer shorter than the fixed header fails with
    /// `MalformedPacket` and no partial layer is returned.
    fn decode(data: &[u8], cx: DecodeContext<'_>) -> WireResult<Self>;
}

impl Clone for Box<dyn Pdu> {
    fn clone(&self) -> Self {
        self.clone_pdu()
    }
}

/// Structural equality: same kinds, same header bytes, equal inner chains.
impl<'a> PartialEq for dyn Pdu + 'a {
    fn eq(&self, other: &Self) -> bool {
        if self.pdu_type() != other.pdu_type() || self.header_size() != other.header_size() {
            return false;
        }

        match (header_bytes(self), header_bytes(other)) {
            (Ok(ours), Ok(theirs)) if ours == theirs => {}
            _ => return false,
        }

        match (self.inner(), other.inner()) {
            (Some(ours), Some(theirs)) => ours == theirs,
            (None, None) => true,
            _ => false,
        }
    }
}

/// The bytes a layer's header serializes to
pub fn header_bytes(pdu: &dyn Pdu) -> WireResult<Vec<u8>> {
    let mut buf = vec![0u8; pdu.header_size() as usize];
    pdu.write_header(&mut buf)?;
    Ok(buf)
}

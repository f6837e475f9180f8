//! Whole-chain operations: sizing, serialization, traversal and lookup.
//!
//! Serialization walks the chain root to leaf. Each layer writes its own
//! header at the current offset and the rest of the buffer belongs to the
//! layers it encapsulates; the raw leaf, if any, writes its payload last.

use crate::component_debug;
use crate::pdu::Pdu;
use bytes::{Bytes, BytesMut};
use pdu_wire::{WireError, WireResult};

/// Iterator over the layers of a chain, outermost first
#[derive(Debug, Clone)]
pub struct Layers<'a> {
    next: Option<&'a dyn Pdu>,
}

impl<'a> Iterator for Layers<'a> {
    type Item = &'a dyn Pdu;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = current.inner();
        Some(current)
    }
}

/// Layers of the chain rooted at `root`, outermost first
pub fn layers(root: &dyn Pdu) -> Layers<'_> {
    Layers { next: Some(root) }
}

/// Number of layers in the chain
pub fn depth(root: &dyn Pdu) -> usize {
    layers(root).count()
}

/// The deepest layer of the chain
pub fn innermost(root: &dyn Pdu) -> &dyn Pdu {
    let mut current = root;
    while let Some(inner) = current.inner() {
        current = inner;
    }
    current
}

/// Bytes the whole chain occupies on the wire.
///
/// Fails with `BufferTooSmall` if the sum does not fit in a `u32`.
pub fn total_size(root: &dyn Pdu) -> WireResult<u32> {
    let mut total = 0u32;
    let mut wide = 0usize;
    for layer in layers(root) {
        wide = wide.saturating_add(layer.header_size() as usize);
        total = total
            .checked_add(layer.header_size())
            .ok_or(WireError::BufferTooSmall {
                needed: wide,
                available: u32::MAX as usize,
            })?;
    }
    Ok(total)
}

/// Serialize the chain into the front of `buf`.
///
/// Returns the number of bytes written, which is always `total_size(root)`.
/// Fails with `BufferTooSmall` before writing anything if `buf` cannot hold
/// the whole chain or the chain size overflows.
///
/// # Panics
///
/// Panics if a layer reports a `header_size()` that disagrees with what the
/// chain was sized for; that is a broken `Pdu` implementation, not bad input.
pub fn serialize_into(root: &dyn Pdu, buf: &mut [u8]) -> WireResult<usize> {
    let total = total_size(root)? as usize;
    if buf.len() < total {
        return Err(WireError::BufferTooSmall {
            needed: total,
            available: buf.len(),
        });
    }

    let mut offset = 0usize;
    for layer in layers(root) {
        let size = layer.header_size() as usize;
        if offset + size > total {
            break;
        }
        layer.write_header(&mut buf[offset..total])?;
        offset += size;
    }

    assert_eq!(
        offset, total,
        "chain wrote {} bytes but was sized for {}",
        offset, total
    );
    component_debug!("chain", total, layers = depth(root), "serialized chain");
    Ok(total)
}

/// Serialize the chain into a freshly allocated buffer of exactly its size
pub fn serialize(root: &dyn Pdu) -> WireResult<Bytes> {
    let mut buf = BytesMut::zeroed(total_size(root)? as usize);
    serialize_into(root, &mut buf)?;
    Ok(buf.freeze())
}

/// First layer of concrete type `T`, searching outermost first
pub fn find<T: Pdu>(root: &dyn Pdu) -> Option<&T> {
    layers(root).find_map(|layer| layer.as_any().downcast_ref::<T>())
}

/// Mutable access to the first layer of concrete type `T`
pub fn find_mut<T: Pdu>(root: &mut dyn Pdu) -> Option<&mut T> {
    if root.as_any().is::<T>() {
        return root.as_any_mut().downcast_mut::<T>();
    }
    match root.inner_mut() {
        Some(inner) => find_mut::<T>(&mut **inner),
        None => None,
    }
}

/// Append `layer` below the innermost layer of the chain.
///
/// A raw payload leaf cannot encapsulate anything, so if the chain ends in
/// one the layer is handed back unchanged.
pub fn push_innermost(root: &mut dyn Pdu, layer: Box<dyn Pdu>) -> Result<(), Box<dyn Pdu>> {
    if let Some(inner) = root.inner_mut() {
        return push_innermost(&mut **inner, layer);
    }
    root.set_inner(Some(layer))
}

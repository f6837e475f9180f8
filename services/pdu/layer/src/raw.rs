//! Raw payload leaf.
//!
//! Terminal layer for bytes no registered decoder claims. The payload is kept
//! verbatim and re-emitted unchanged.

use crate::component_trace;
use crate::dispatch::{DecodeContext, Dispatcher};
use crate::pdu::{Decode, Pdu, PduType};
use pdu_wire::{OutputStream, WireError, WireResult};
use std::any::Any;

/// Opaque trailing bytes
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawPdu {
    payload: Vec<u8>,
}

impl RawPdu {
    /// Wrap `payload`
    pub fn new(payload: Vec<u8>) -> Self {
        Self { payload }
    }

    /// Stored bytes
    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    /// Mutable access to the stored bytes
    pub fn payload_mut(&mut self) -> &mut Vec<u8> {
        &mut self.payload
    }

    /// Number of stored bytes
    pub fn payload_size(&self) -> usize {
        self.payload.len()
    }

    /// Take the stored bytes
    pub fn into_payload(self) -> Vec<u8> {
        self.payload
    }

    /// Reinterpret the stored bytes as a chain whose outermost layer is `T`
    pub fn decode_as<T: Decode>(&self, dispatcher: &Dispatcher) -> WireResult<T> {
        dispatcher.resolve_root::<T>(&self.payload)
    }
}

impl From<&[u8]> for RawPdu {
    fn from(data: &[u8]) -> Self {
        Self::new(data.to_vec())
    }
}

impl From<Vec<u8>> for RawPdu {
    fn from(payload: Vec<u8>) -> Self {
        Self::new(payload)
    }
}

impl Pdu for RawPdu {
    fn pdu_type(&self) -> PduType {
        PduType::Raw
    }

    /// Payload length, saturating at `u32::MAX`
    fn header_size(&self) -> u32 {
        u32::try_from(self.payload.len()).unwrap_or(u32::MAX)
    }

    fn write_header(&self, buf: &mut [u8]) -> WireResult<()> {
        if u32::try_from(self.payload.len()).is_err() {
            return Err(WireError::BufferTooSmall {
                needed: self.payload.len(),
                available: u32::MAX as usize,
            });
        }
        OutputStream::new(buf).write_fixed(&self.payload)
    }

    fn inner(&self) -> Option<&dyn Pdu> {
        None
    }

    fn inner_mut(&mut self) -> Option<&mut Box<dyn Pdu>> {
        None
    }

    fn set_inner(&mut self, inner: Option<Box<dyn Pdu>>) -> Result<(), Box<dyn Pdu>> {
        match inner {
            Some(pdu) => {
                component_trace!(
                    "raw",
                    kind = %pdu.pdu_type(),
                    "raw payload cannot encapsulate a layer, handing it back"
                );
                Err(pdu)
            }
            None => Ok(()),
        }
    }

    fn take_inner(&mut self) -> Option<Box<dyn Pdu>> {
        None
    }

    fn clone_pdu(&self) -> Box<dyn Pdu> {
        Box::new(self.clone())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

impl Decode for RawPdu {
    fn decode(data: &[u8], _cx: DecodeContext<'_>) -> WireResult<Self> {
        Ok(Self::from(data))
    }
}

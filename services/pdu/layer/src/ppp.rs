//! Point-to-point protocol header.
//!
//! The header is a single 16-bit protocol field naming the encapsulated
//! layer. The field is kept in wire order and converted on every access.
//!
//! ```text
//! +-----------------+---------------------------+
//! | u16 protocol    | inner PDU (0..N bytes)    |
//! +-----------------+---------------------------+
//! ```

use crate::dispatch::{DecodeContext, Dispatcher};
use crate::pdu::{Decode, Pdu, PduType};
use pdu_wire::{be_to_host, host_to_be, InputStream, OutputStream, WireError, WireResult};
use std::any::Any;

/// Well-known PPP protocol numbers (RFC 1661 and assigned numbers).
///
/// None of these is registered with a dispatcher by default.
pub mod protocols {
    /// Internet Protocol version 4
    pub const IPV4: u16 = 0x0021;
    /// Internet Protocol version 6
    pub const IPV6: u16 = 0x0057;
    /// IP Control Protocol
    pub const IPCP: u16 = 0x8021;
    /// Link Control Protocol
    pub const LCP: u16 = 0xC021;
    /// Password Authentication Protocol
    pub const PAP: u16 = 0xC023;
    /// Challenge Handshake Authentication Protocol
    pub const CHAP: u16 = 0xC223;
}

/// Size of the PPP header on the wire
pub const PPP_HEADER_SIZE: usize = 2;

/// Header fields exactly as they appear on the wire
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct PppHeader {
    /// Big-endian
    protocol: u16,
}

impl PppHeader {
    fn from_wire(bytes: [u8; PPP_HEADER_SIZE]) -> Self {
        Self {
            protocol: u16::from_ne_bytes(bytes),
        }
    }

    fn to_wire(self) -> [u8; PPP_HEADER_SIZE] {
        self.protocol.to_ne_bytes()
    }
}

/// PPP layer
#[derive(Debug, Clone, Default)]
pub struct Ppp {
    header: PppHeader,
    inner: Option<Box<dyn Pdu>>,
}

impl Ppp {
    /// Create a header with protocol 0 and no inner PDU
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a header carrying `protocol`
    pub fn with_protocol(protocol: u16) -> Self {
        let mut ppp = Self::new();
        ppp.set_protocol(protocol);
        ppp
    }

    /// Attach `inner` as the encapsulated layer, builder style
    pub fn with_inner(mut self, inner: Box<dyn Pdu>) -> Self {
        self.inner = Some(inner);
        self
    }

    /// Decode a chain rooted at a PPP header
    pub fn from_bytes(data: &[u8], dispatcher: &Dispatcher) -> WireResult<Self> {
        dispatcher.resolve_root::<Self>(data)
    }

    /// Protocol field in host order
    pub fn protocol(&self) -> u16 {
        be_to_host(self.header.protocol)
    }

    /// Set the protocol field; the inner PDU is left alone
    pub fn set_protocol(&mut self, protocol: u16) {
        self.header.protocol = host_to_be(protocol);
    }
}

impl Pdu for Ppp {
    fn pdu_type(&self) -> PduType {
        PduType::Ppp
    }

    fn header_size(&self) -> u32 {
        PPP_HEADER_SIZE as u32
    }

    fn write_header(&self, buf: &mut [u8]) -> WireResult<()> {
        let mut stream = OutputStream::new(buf);
        stream.write_fixed(&self.header.to_wire())
    }

    fn inner(&self) -> Option<&dyn Pdu> {
        self.inner.as_deref()
    }

    fn inner_mut(&mut self) -> Option<&mut Box<dyn Pdu>> {
        self.inner.as_mut()
    }

    fn set_inner(&mut self, inner: Option<Box<dyn Pdu>>) -> Result<(), Box<dyn Pdu>> {
        self.inner = inner;
        Ok(())
    }

    fn take_inner(&mut self) -> Option<Box<dyn Pdu>> {
        self.inner.take()
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

impl Decode for Ppp {
    fn decode(data: &[u8], cx: DecodeContext<'_>) -> WireResult<Self> {
        let mut stream = InputStream::new(data);
        stream.require_header(PPP_HEADER_SIZE)?;
        let header = stream
            .read_array::<PPP_HEADER_SIZE>()
            .map(PppHeader::from_wire)
            .map_err(WireError::at_node_boundary)?;

        let mut ppp = Self {
            header,
            inner: None,
        };
        if stream.has_remaining() {
            ppp.inner = Some(cx.resolve(ppp.protocol(), stream.pointer())?);
        }
        Ok(ppp)
    }
}

//! Byte-level plumbing for layered protocol data units.
//!
//! This crate provides the leaf pieces every header node is built on:
//! bounds-checked sequential readers and writers over caller-supplied
//! buffers, host/wire byte order conversion, and the closed set of errors
//! that decoding and serializing a PDU chain can produce.
//!
//! ## Wire Order
//!
//! Multi-byte integers travel big-endian. Header nodes store them in wire
//! order and convert at every accessor:
//!
//! ```text
//! host 0x0800  --host_to_be-->  stored [0x08, 0x00]  --be_to_host-->  host 0x0800
//! ```
//!
//! ## Example
//!
//! ```
//! use pdu_wire::{InputStream, OutputStream};
//!
//! let mut buf = [0u8; 4];
//! let mut out = OutputStream::new(&mut buf);
//! out.write_u16_be(0x0800).unwrap();
//! out.write_fixed(&[0xAA, 0xBB]).unwrap();
//!
//! let mut input = InputStream::new(&buf);
//! assert_eq!(input.read_u16_be().unwrap(), 0x0800);
//! assert_eq!(input.pointer(), &[0xAA, 0xBB]);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod endian;
pub mod error;
pub mod stream;

// Re-export main types
pub use endian::{be_to_host, host_to_be, host_to_le, le_to_host, EndianInt};
pub use error::{WireError, WireResult};
pub use stream::{InputStream, OutputStream};

//! Layered protocol data units: header nodes, type dispatch and chain serialization.
//!
//! A packet is modelled as a chain of layers. Each layer decodes its fixed
//! header from the front of a buffer, reads a type code out of it, and asks a
//! [`Dispatcher`] to build the next layer from the remaining bytes. Unknown
//! type codes end the chain in a [`RawPdu`] that keeps the bytes verbatim.
//! Serializing walks the chain root to leaf and reproduces the buffer.
//!
//! ## Features
//!
//! - **Pluggable Dispatch**: new layer kinds are added by registering a type
//!   code, never by editing existing layers
//! - **Lossless Decode**: no trailing byte is dropped; unknown layers are raw
//! - **Owned Chains**: every layer exclusively owns the one below it; clones
//!   are deep
//! - **Bounded Recursion**: nesting beyond the configured depth is kept raw
//!
//! ## Example
//!
//! ```
//! use pdu_layer::{chain, Dispatcher, Pdu, Ppp, RawPdu};
//!
//! let dispatcher = Dispatcher::new();
//! let ppp = Ppp::from_bytes(&[0x08, 0x00, 0xAA, 0xBB], &dispatcher).unwrap();
//! assert_eq!(ppp.protocol(), 0x0800);
//!
//! let leaf = chain::find::<RawPdu>(&ppp).unwrap();
//! assert_eq!(leaf.payload(), &[0xAA, 0xBB]);
//!
//! let bytes = chain::serialize(&ppp).unwrap();
//! assert_eq!(&bytes[..], &[0x08, 0x00, 0xAA, 0xBB]);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod chain;
pub mod config;
pub mod dispatch;
pub mod logging;
pub mod pdu;
pub mod ppp;
pub mod raw;

// Re-export main types
pub use config::{parse_code, ConfigError, StackConfig};
pub use dispatch::{DecodeContext, DecodeFn, Dispatcher, DEFAULT_MAX_DEPTH};
pub use pdu::{header_bytes, Decode, Pdu, PduType};
pub use ppp::{protocols, Ppp, PPP_HEADER_SIZE};
pub use raw::RawPdu;

pub use pdu_wire::{WireError, WireResult};

//! Basic usage example for the layered PDU stack.

use pdu_layer::{chain, protocols, Dispatcher, Pdu, Ppp, RawPdu};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    pdu_layer::logging::init("pdu_layer=debug");
    println!("=== Layered PDU Example ===\n");

    // 1. Build a chain by hand
    println!("1. Building a PPP header carrying a raw payload...");
    let mut ppp = Ppp::new();
    ppp.set_protocol(protocols::IPV4);
    chain::push_innermost(&mut ppp, Box::new(RawPdu::new(b"hello".to_vec())))
        .map_err(|_| "raw payload cannot be nested")?;

    let bytes = chain::serialize(&ppp)?;
    println!("   Encoded {} bytes: {:02X?}", bytes.len(), &bytes[..]);

    // 2. Decode with an empty registry
    println!("\n2. Decoding with no registered protocols...");
    let dispatcher = Dispatcher::new();
    let decoded = Ppp::from_bytes(&bytes, &dispatcher)?;
    println!("   Protocol: {:#06X}", decoded.protocol());
    for layer in chain::layers(&decoded) {
        println!("   Layer {} ({} header bytes)", layer.pdu_type(), layer.header_size());
    }

    // 3. Register a nested PPP and decode a deeper chain
    println!("\n3. Decoding PPP-in-PPP after registering 0xC0DE...");
    let dispatcher = Dispatcher::new().with::<Ppp>(0xC0DE);
    let nested = Ppp::from_bytes(&[0xC0, 0xDE, 0x00, 0x57, 0xFE, 0xED], &dispatcher)?;
    println!("   Layers: {}", chain::depth(&nested));
    if let Some(raw) = chain::find::<RawPdu>(&nested) {
        println!("   Trailing payload: {:02X?}", raw.payload());
    }

    println!("\n=== Example completed successfully! ===");
    Ok(())
}

use pdu_layer::{chain, Dispatcher, Pdu, Ppp, RawPdu, WireError};
use proptest::prelude::*;

const NESTED: u16 = 0xC0DE;

fn dispatcher() -> Dispatcher {
    Dispatcher::new().with::<Ppp>(NESTED)
}

/// Chain of PPP headers linked through `NESTED`, the last one carrying
/// `last_protocol`, followed by an optional raw payload.
fn build_chain(nested: usize, last_protocol: u16, payload: &[u8]) -> Ppp {
    let mut root = Ppp::with_protocol(if nested == 0 { last_protocol } else { NESTED });
    for i in 0..nested {
        let protocol = if i + 1 == nested { last_protocol } else { NESTED };
        chain::push_innermost(&mut root, Box::new(Ppp::with_protocol(protocol))).unwrap();
    }
    if !payload.is_empty() {
        chain::push_innermost(&mut root, Box::new(RawPdu::new(payload.to_vec()))).unwrap();
    }
    root
}

fn unregistered_protocol() -> impl Strategy<Value = u16> {
    any::<u16>().prop_filter("must not be the nested code", |p| *p != NESTED)
}

proptest! {
    #[test]
    fn prop_chain_roundtrip(
        nested in 0usize..8,
        last_protocol in unregistered_protocol(),
        payload in prop::collection::vec(any::<u8>(), 0..32),
    ) {
        let original: Box<dyn Pdu> = Box::new(build_chain(nested, last_protocol, &payload));
        let bytes = chain::serialize(original.as_ref()).unwrap();
        prop_assert_eq!(bytes.len(), 2 * (nested + 1) + payload.len());

        let decoded: Box<dyn Pdu> = Box::new(dispatcher().resolve_root::<Ppp>(&bytes).unwrap());
        prop_assert_eq!(&decoded, &original);
        prop_assert_eq!(chain::serialize(decoded.as_ref()).unwrap(), bytes);
    }

    #[test]
    fn prop_unknown_payload_preserved(
        protocol in unregistered_protocol(),
        payload in prop::collection::vec(any::<u8>(), 1..64),
    ) {
        let mut input = protocol.to_be_bytes().to_vec();
        input.extend_from_slice(&payload);

        let ppp = Ppp::from_bytes(&input, &dispatcher()).unwrap();
        prop_assert_eq!(ppp.protocol(), protocol);
        let leaf = chain::find::<RawPdu>(&ppp).unwrap();
        prop_assert_eq!(leaf.payload(), payload.as_slice());
        prop_assert_eq!(&chain::serialize(&ppp).unwrap()[..], input.as_slice());
    }

    #[test]
    fn prop_header_size_independent_of_value(protocol in any::<u16>()) {
        let ppp = Ppp::with_protocol(protocol);
        prop_assert_eq!(ppp.header_size(), 2);

        let mut buf = [0u8; 2];
        prop_assert_eq!(chain::serialize_into(&ppp, &mut buf).unwrap(), 2);
        prop_assert_eq!(buf, protocol.to_be_bytes());
    }

    #[test]
    fn prop_short_buffer_is_malformed(data in prop::collection::vec(any::<u8>(), 0..2)) {
        let err = Ppp::from_bytes(&data, &dispatcher()).unwrap_err();
        prop_assert_eq!(err, WireError::MalformedPacket { needed: 2, available: data.len() });
    }

    #[test]
    fn prop_arbitrary_input_never_loses_bytes(data in prop::collection::vec(any::<u8>(), 2..64)) {
        let ppp = Ppp::from_bytes(&data, &dispatcher()).unwrap();
        prop_assert_eq!(chain::total_size(&ppp).unwrap() as usize, data.len());
        prop_assert_eq!(&chain::serialize(&ppp).unwrap()[..], data.as_slice());
    }
}

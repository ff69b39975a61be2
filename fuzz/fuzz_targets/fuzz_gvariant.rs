#![no_main]
use gvariant_codec::{parse, serialize};
use libfuzzer_sys::fuzz_target;

// The first byte picks how much of the input is the signature; the rest is
// the payload. Decode must be total, and whatever it produces must
// re-encode to a stable wire image.
fuzz_target!(|data: &[u8]| {
    let (sig_len, rest) = match data.split_first() {
        Some((&sig_len, rest)) => (usize::from(sig_len), rest),
        None => return,
    };
    let (signature, payload) = rest.split_at(sig_len.min(rest.len()));
    let signature = match std::str::from_utf8(signature) {
        Ok(signature) => signature,
        Err(_) => return,
    };
    let value = match parse(signature, payload) {
        Ok(value) => value,
        Err(_) => return,
    };
    let bytes = serialize(signature, &value).expect("decoded value must serialize");
    let again = parse(signature, &bytes).expect("signature already parsed once");
    let stable = serialize(signature, &again).expect("decoded value must serialize");
    assert_eq!(stable, bytes);
});

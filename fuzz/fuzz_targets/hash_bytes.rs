#![no_main]
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(sig) = fuzzstep::hash_bytes(data) {
        let rendered = sig.to_string();
        assert_eq!(fuzzstep::compare(&rendered, &rendered).ok(), Some(0));
    }
});

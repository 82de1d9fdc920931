#![no_main]
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let mid = data.len() / 2;
    let a = String::from_utf8_lossy(&data[..mid]);
    let b = String::from_utf8_lossy(&data[mid..]);
    if let (Ok(d1), Ok(d2)) = (fuzzstep::compare(&a, &b), fuzzstep::compare(&b, &a)) {
        assert_eq!(d1, d2);
    }
});

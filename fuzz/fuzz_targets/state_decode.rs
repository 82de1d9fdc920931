#![no_main]
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    // anything the decoder accepts must be safe to step and re-encode
    if let Ok(mut engine) = fuzzstep::CtphEngine::from_json(text) {
        engine.step(data.first().copied().unwrap_or(0));
        let again = engine.to_json().expect("encode");
        fuzzstep::CtphEngine::from_json(&again).expect("stepped state decodes");
    }
});

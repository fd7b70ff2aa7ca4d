#![no_main]
use alphaess::envelope::ResponseEnvelope;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Arbitrary bodies must parse or fail cleanly, never panic
    if let Ok(envelope) = ResponseEnvelope::parse("/fuzz", data) {
        let _ = envelope.clone().interpret_get();
        let _ = envelope.interpret_post();
    }
});

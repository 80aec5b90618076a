#![no_main]
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Treat the input as a raw scanned payload
    if let Ok(payload) = std::str::from_utf8(data) {
        let outcome = voltaic::payment::classify_payload(payload);
        // Accepted outcomes must always carry invoice data
        if outcome.ok {
            assert!(outcome.data.is_some());
        } else {
            assert!(outcome.message.is_some());
        }

        // Manual-entry parsing must agree with its validity check
        assert_eq!(
            voltaic::format::is_valid_amount(payload),
            voltaic::format::parse_amount(payload).is_some()
        );
        if let Some(amount) = voltaic::format::parse_amount(payload) {
            let _ = voltaic::format::format_rupiah(amount);
        }
    }
});

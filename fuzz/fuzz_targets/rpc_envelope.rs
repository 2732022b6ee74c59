#![no_main]

//! Fuzz target for JSON-RPC reply decoding.

use kbase_report_requests::rpc::decode_reply;
use kbase_report_requests::{CreateExtendedReport, Status};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(s) = std::str::from_utf8(data) else {
        return;
    };

    let _ = decode_reply::<CreateExtendedReport>(s);
    let _ = decode_reply::<Status>(s);
});

#![no_main]

//! Fuzz target for record decoding.
//!
//! Arbitrary bytes go through every record decoder; decoding must never
//! panic, and anything that decodes must re-encode to a payload that decodes
//! to the same record.

use kbase_report_types::extended::{CreateExtendedReportParams, CreateParams, SimpleReport};
use kbase_report_types::legacy;
use kbase_report_types::{Record, wire};
use libfuzzer_sys::fuzz_target;

fn check<T: Record>(s: &str) {
    if let Ok(record) = wire::from_str::<T>(s) {
        let text = wire::to_string(&record);
        let again = wire::from_str::<T>(&text).expect("re-encoded record must decode");
        assert_eq!(again, record);
    }
}

fuzz_target!(|data: &[u8]| {
    let Ok(s) = std::str::from_utf8(data) else {
        return;
    };

    check::<SimpleReport>(s);
    check::<CreateParams>(s);
    check::<CreateExtendedReportParams>(s);
    check::<legacy::Report>(s);
    check::<legacy::CreateParams>(s);
    check::<legacy::CreateReportParams>(s);
});

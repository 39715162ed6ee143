#![no_main]
use empreport::{parse_str, ParserConfig, ReportPrinter};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        if let Ok(doc) = parse_str(s, ParserConfig::default()) {
            let _ = ReportPrinter::new(std::io::sink()).print(&doc);
        }
    }
});

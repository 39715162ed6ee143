#![no_main]
use empreport::Parser;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(mut doc) = Parser::new(data).parse() {
        doc.normalize();
        let _ = doc.elements_by_tag_name("*");
    }
});

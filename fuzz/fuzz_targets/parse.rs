#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    jeq_fuzz::fuzz_parse(data);
});

#![no_main]

use libfuzzer_sys::fuzz_target;
use countagent::descriptor::{display_name, Descriptor};

fuzz_target!(|data: &[u8]| {
    if let Some(parsed) = Descriptor::parse(data) {
        let mut out = vec![0u8; parsed.display_len()];
        parsed.write_display(&mut out);
    }
    let _ = display_name(data);
});

#![no_main]

use cbor_item::{Config, load};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let config = Config::default().with_max_alloc(1 << 20);
    if let Ok((item, _)) = load(data, &config) {
        _ = format!("{item}");
    }
});

#![no_main]

use cbor_item::{Config, load, serialize, serialize_alloc, serialized_size};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Only shortest-form arguments have a single encoding
    let config = Config::default().with_max_alloc(1 << 20).with_strict(true);
    let Ok((item, len)) = load(data, &config) else {
        return;
    };

    let encoded = serialize_alloc(&item).expect("Failed to encode decoded item");
    assert_eq!(encoded, &data[..len]);
    assert_eq!(serialized_size(&item), Ok(len));

    let mut buffer = vec![0u8; len];
    assert_eq!(serialize(&item, &mut buffer), len);
    if len > 0 {
        assert_eq!(serialize(&item, &mut buffer[..len - 1]), 0);
    }

    let (again, _) = load(&encoded, &config).expect("Failed to decode encoded item");
    assert_eq!(again, item);
});

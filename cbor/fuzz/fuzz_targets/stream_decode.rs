#![no_main]

use cbor_item::stream::{self, Callbacks, Status};
use libfuzzer_sys::fuzz_target;

struct Ignore;

impl Callbacks for Ignore {}

fuzz_target!(|data: &[u8]| {
    // Walk the whole input token by token, with no structure checks
    let mut offset = 0;
    while offset < data.len() {
        let r = stream::decode(&data[offset..], &mut Ignore);
        match r.status {
            Status::Finished => {
                assert!(r.read > 0);
                offset += r.read;
            }
            Status::NotEnoughData => {
                assert!(r.required > 0);
                break;
            }
            Status::Error(_) => break,
        }
    }
});

use super::*;
use alloc::string::ToString;
use hex_literal::hex;

// RFC 8949, Appendix A:
// https://www.rfc-editor.org/rfc/rfc8949.html#section-appendix.a
const RFC_VECTORS: &[&[u8]] = &[
    &hex!("00"),
    &hex!("01"),
    &hex!("0a"),
    &hex!("17"),
    &hex!("1818"),
    &hex!("1819"),
    &hex!("1864"),
    &hex!("1903e8"),
    &hex!("1a000f4240"),
    &hex!("1b000000e8d4a51000"),
    &hex!("1bffffffffffffffff"),
    &hex!("c249010000000000000000"),
    &hex!("3bffffffffffffffff"),
    &hex!("c349010000000000000000"),
    &hex!("20"),
    &hex!("29"),
    &hex!("3863"),
    &hex!("3903e7"),
    &hex!("f90000"),
    &hex!("f98000"),
    &hex!("f93c00"),
    &hex!("fb3ff199999999999a"),
    &hex!("f93e00"),
    &hex!("f97bff"),
    &hex!("fa47c35000"),
    &hex!("fa7f7fffff"),
    &hex!("fb7e37e43c8800759c"),
    &hex!("f90001"),
    &hex!("f90400"),
    &hex!("f9c400"),
    &hex!("fbc010666666666666"),
    &hex!("f97c00"),
    &hex!("f97e00"),
    &hex!("f9fc00"),
    &hex!("fa7f800000"),
    &hex!("fa7fc00000"),
    &hex!("faff800000"),
    &hex!("fb7ff0000000000000"),
    &hex!("fb7ff8000000000000"),
    &hex!("fbfff0000000000000"),
    &hex!("f4"),
    &hex!("f5"),
    &hex!("f6"),
    &hex!("f7"),
    &hex!("f0"),
    &hex!("f8ff"),
    &hex!("c074323031332d30332d32315432303a30343a30305a"),
    &hex!("c11a514b67b0"),
    &hex!("c1fb41d452d9ec200000"),
    &hex!("d74401020304"),
    &hex!("d818456449455446"),
    &hex!("d82076687474703a2f2f7777772e6578616d706c652e636f6d"),
    &hex!("40"),
    &hex!("4401020304"),
    &hex!("60"),
    &hex!("6161"),
    &hex!("6449455446"),
    &hex!("62225c"),
    &hex!("62c3bc"),
    &hex!("63e6b0b4"),
    &hex!("64f0908591"),
    &hex!("80"),
    &hex!("83010203"),
    &hex!("8301820203820405"),
    &hex!("98190102030405060708090a0b0c0d0e0f101112131415161718181819"),
    &hex!("a0"),
    &hex!("a201020304"),
    &hex!("a26161016162820203"),
    &hex!("826161a161626163"),
    &hex!("a56161614161626142616361436164614461656145"),
    &hex!("5f42010243030405ff"),
    &hex!("7f657374726561646d696e67ff"),
    &hex!("9fff"),
    &hex!("9f018202039f0405ffff"),
    &hex!("9f01820203820405ff"),
    &hex!("83018202039f0405ff"),
    &hex!("83019f0203ff820405"),
    &hex!("9f0102030405060708090a0b0c0d0e0f101112131415161718181819ff"),
    &hex!("bf61610161629f0203ffff"),
    &hex!("826161bf61626163ff"),
    &hex!("bf6346756ef563416d7421ff"),
];

fn load_all(data: &[u8]) -> Result<Item, Error> {
    load(data, &Config::default()).map(|(item, len)| {
        assert_eq!(len, data.len());
        item
    })
}

#[test]
fn rfc_round_trip() {
    for data in RFC_VECTORS {
        let item = load_all(data).unwrap();
        assert_eq!(serialize_alloc(&item).unwrap(), *data, "{item}");
        assert_eq!(serialized_size(&item).unwrap(), data.len());
    }
}

#[test]
fn rfc_values() {
    assert_eq!(load_all(&hex!("1903e8")).unwrap(), Item::uint16(1000));
    assert_eq!(load_all(&hex!("1818")).unwrap(), Item::uint(24));
    assert_eq!(
        load_all(&hex!("1bffffffffffffffff")).unwrap().as_u64(),
        Some(u64::MAX)
    );
    assert_eq!(
        load_all(&hex!("3bffffffffffffffff")).unwrap().as_i128(),
        Some(-18446744073709551616)
    );
    assert_eq!(load_all(&hex!("3903e7")).unwrap().as_i64(), Some(-1000));
    assert_eq!(load_all(&hex!("f97bff")).unwrap().as_f64(), Some(65504.0));
    assert_eq!(load_all(&hex!("fa47c35000")).unwrap(), Item::single(100000.0));
    assert_eq!(load_all(&hex!("f90001")).unwrap(), Item::half(5.960464477539063e-8));
    assert!(load_all(&hex!("fb7ff8000000000000")).unwrap().as_f64().unwrap().is_nan());
    assert_eq!(load_all(&hex!("f4")).unwrap().as_bool(), Some(false));
    assert!(load_all(&hex!("f6")).unwrap().is_null());
    assert!(load_all(&hex!("f7")).unwrap().is_undefined());
    assert_eq!(load_all(&hex!("64f0908591")).unwrap().as_str(), Some("\u{10151}"));
    assert_eq!(
        load_all(&hex!("4401020304")).unwrap().as_bytes(),
        Some(&[1u8, 2, 3, 4][..])
    );
    assert_eq!(
        load_all(&hex!("d818456449455446")).unwrap(),
        Item::tag(24, Item::bytes(hex!("6449455446")))
    );

    let a = load_all(&hex!("98190102030405060708090a0b0c0d0e0f101112131415161718181819")).unwrap();
    assert_eq!(a.len(), Some(25));
    assert_eq!(a.get(24).and_then(Item::as_u64), Some(25));
}

#[test]
fn rfc_diagnostic() {
    let diag = |data: &[u8]| load_all(data).unwrap().to_string();

    assert_eq!(diag(&hex!("3bffffffffffffffff")), "-18446744073709551616");
    assert_eq!(diag(&hex!("fb3ff199999999999a")), "1.1");
    assert_eq!(diag(&hex!("f93e00")), "1.5");
    assert_eq!(diag(&hex!("f97c00")), "Infinity");
    assert_eq!(diag(&hex!("f97e00")), "NaN");
    assert_eq!(diag(&hex!("f9fc00")), "-Infinity");
    assert_eq!(diag(&hex!("f7")), "undefined");
    assert_eq!(diag(&hex!("f0")), "simple(16)");
    assert_eq!(diag(&hex!("f8ff")), "simple(255)");
    assert_eq!(diag(&hex!("c11a514b67b0")), "1(1363896240)");
    assert_eq!(diag(&hex!("d74401020304")), "23(h'01020304')");
    assert_eq!(diag(&hex!("a201020304")), "{1: 2, 3: 4}");
    assert_eq!(diag(&hex!("826161a161626163")), r#"["a", {"b": "c"}]"#);
    assert_eq!(diag(&hex!("5f42010243030405ff")), "(_ h'0102', h'030405')");
    assert_eq!(
        diag(&hex!("7f657374726561646d696e67ff")),
        r#"(_ "strea", "ming")"#
    );
    assert_eq!(diag(&hex!("9fff")), "[_ ]");
    assert_eq!(diag(&hex!("83019f0203ff820405")), "[1, [_ 2, 3], [4, 5]]");
    assert_eq!(
        diag(&hex!("bf61610161629f0203ffff")),
        r#"{_ "a": 1, "b": [_ 2, 3]}"#
    );
}

#[test]
fn empty_map() {
    let item = load_all(&hex!("a0")).unwrap();
    let map = item.as_map().unwrap();
    assert!(map.is_definite());
    assert_eq!(map.size(), Some(0));
    assert!(map.is_empty());
}

#[test]
fn definite_map() {
    let item = load_all(&hex!("a201020304")).unwrap();
    let map = item.as_map().unwrap();
    assert!(map.is_definite());
    assert_eq!(map.len(), 2);
    assert_eq!(map.as_slice()[0], Pair { key: Item::uint(1), value: Item::uint(2) });
    assert_eq!(map.as_slice()[1], Pair { key: Item::uint(3), value: Item::uint(4) });
}

#[test]
fn indefinite_map() {
    let data = hex!("bf01020304ff");
    let item = load_all(&data).unwrap();
    let map = item.as_map().unwrap();
    assert!(!map.is_definite());
    assert_eq!(map.len(), 2);
    assert_eq!(map.find(&Item::uint(3)), Some(&Item::uint(4)));

    assert_eq!(serialize_alloc(&item).unwrap(), data);
    let mut buffer = [0u8; 6];
    assert_eq!(serialize(&item, &mut buffer), 6);
    assert_eq!(buffer, data);
}

#[test]
fn chunked_key() {
    let item = load_all(&hex!("a17f61616162ffa0")).unwrap();
    let map = item.as_map().unwrap();
    assert_eq!(map.len(), 1);

    let pair = &map.as_slice()[0];
    assert!(!pair.key.is_definite());
    assert_eq!(pair.key.chunks().map(<[Item]>::len), Some(2));
    assert_eq!(pair.key.flatten().unwrap(), Item::text("ab"));
    assert_eq!(pair.value, Item::map(Some(0)));
}

#[test]
fn trailing_bytes() {
    assert_eq!(
        load(&hex!("01 02 03"), &Config::default()),
        Ok((Item::uint(1), 1))
    );
    assert_eq!(
        load(&hex!("8102 ff"), &Config::default()),
        Ok((Item::array_from([Item::uint(2)]), 2))
    );
}

#[test]
fn every_prefix_needs_more() {
    for data in RFC_VECTORS {
        for n in 0..data.len() {
            match load(&data[..n], &Config::default()) {
                Err(Error::NotEnoughData { required }) => {
                    assert!(required > 0);
                    assert!(n + required <= data.len(), "{data:02x?} at {n}");
                }
                r => panic!("{data:02x?} truncated at {n} gave {r:?}"),
            }
        }
    }
}

#[test]
fn requested_bytes_suffice() {
    // Feed the decoder exactly what it asks for, and no more
    for data in RFC_VECTORS {
        let mut n = 0;
        let item = loop {
            match load(&data[..n], &Config::default()) {
                Ok((item, len)) => {
                    assert_eq!(len, data.len());
                    break item;
                }
                Err(Error::NotEnoughData { required }) => n += required,
                Err(e) => panic!("{data:02x?} at {n} gave {e}"),
            }
        };
        assert_eq!(serialize_alloc(&item).unwrap(), *data);
    }
}

fn malformed(data: &[u8]) -> Option<Malformed> {
    match load(data, &Config::default()) {
        Err(Error::Malformed(reason)) => Some(reason),
        _ => None,
    }
}

#[test]
fn unbalanced_break() {
    assert_eq!(malformed(&hex!("ff")), Some(Malformed::UnexpectedBreak));
    assert_eq!(malformed(&hex!("8101ff")), None);
    assert_eq!(malformed(&hex!("8201ff")), Some(Malformed::UnexpectedBreak));
    assert_eq!(malformed(&hex!("a1ff")), Some(Malformed::UnexpectedBreak));
    assert_eq!(malformed(&hex!("9fc1ff")), Some(Malformed::TagWithoutValue));
}

#[test]
fn partial_map() {
    assert_eq!(malformed(&hex!("bf01ff")), Some(Malformed::PartialMap));
    assert_eq!(malformed(&hex!("bf010203ff")), Some(Malformed::PartialMap));
    assert_eq!(malformed(&hex!("bf0102ff")), None);
}

#[test]
fn bad_chunks() {
    assert_eq!(malformed(&hex!("5f6161ff")), Some(Malformed::ChunkKind));
    assert_eq!(malformed(&hex!("7f4161ff")), Some(Malformed::ChunkKind));
    assert_eq!(malformed(&hex!("5f01ff")), Some(Malformed::ChunkKind));
    assert_eq!(malformed(&hex!("5f80ff")), Some(Malformed::ChunkKind));
    assert_eq!(malformed(&hex!("5fc14101ff")), Some(Malformed::ChunkKind));
    assert_eq!(malformed(&hex!("5f5fffff")), Some(Malformed::NestedChunk));
    assert_eq!(malformed(&hex!("7f7fffff")), Some(Malformed::NestedChunk));
    assert_eq!(malformed(&hex!("7f61ffff")), Some(Malformed::InvalidUtf8));

    // Empty chunks are fine
    let item = load_all(&hex!("5f40ff")).unwrap();
    assert_eq!(item.flatten().unwrap(), Item::bytes(Vec::new()));
}

#[test]
fn bad_headers() {
    assert_eq!(malformed(&hex!("1c")), Some(Malformed::ReservedMinor(28)));
    assert_eq!(malformed(&hex!("8201fe")), Some(Malformed::ReservedMinor(30)));
    assert_eq!(malformed(&hex!("1f")), Some(Malformed::InvalidIndefinite(0)));
    assert_eq!(malformed(&hex!("df")), Some(Malformed::InvalidIndefinite(6)));
    assert_eq!(malformed(&hex!("f818")), Some(Malformed::InvalidSimpleValue(24)));
}

#[test]
fn huge_counts() {
    // The declared size is not trusted for allocation
    assert_eq!(
        load(&hex!("9bffffffffffffffff01"), &Config::default()),
        Err(Error::NotEnoughData { required: 1 })
    );
    assert_eq!(
        load(&hex!("bb00000000ffffffff0102"), &Config::default()),
        Err(Error::NotEnoughData { required: 1 })
    );
    assert_eq!(
        load(&hex!("5b00000000ffffffff"), &Config::default()),
        Err(Error::NotEnoughData { required: 0xffffffff })
    );
}

#[test]
fn depth_limit() {
    let config = Config::default().with_max_depth(2);
    assert!(load(&hex!("818101"), &config).is_ok());
    assert!(load(&hex!("8180"), &config).is_ok());
    assert!(load(&hex!("c1c101"), &config).is_ok());
    assert_eq!(
        load(&hex!("81818101"), &config),
        Err(Error::DepthExceeded(2))
    );
    assert_eq!(load(&hex!("818180"), &config), Err(Error::DepthExceeded(2)));
    assert_eq!(load(&hex!("c1c1c101"), &config), Err(Error::DepthExceeded(2)));
    // Indefinite length strings count too
    assert_eq!(load(&hex!("9f9f5f"), &config), Err(Error::DepthExceeded(2)));

    // Scalars need no depth at all
    let config = Config::default().with_max_depth(0);
    assert!(load(&hex!("01"), &config).is_ok());
    assert_eq!(load(&hex!("80"), &config), Err(Error::DepthExceeded(0)));
}

#[test]
fn deep_nesting() {
    const DEPTH: usize = 100_000;

    let mut data = vec![0x81u8; DEPTH];
    data.push(0x01);

    assert_eq!(
        load(&data, &Config::default()),
        Err(Error::DepthExceeded(DEFAULT_MAX_DEPTH))
    );

    // Building, comparing, encoding and dropping a deep tree must not recurse
    let config = Config::default().with_max_depth(DEPTH);
    let (item, len) = load(&data, &config).unwrap();
    assert_eq!(len, data.len());
    assert_eq!(serialize_alloc(&item).unwrap(), data);

    let copy = item.deep_copy();
    assert_eq!(copy, item);
    assert!(!copy.ptr_eq(&item));
    drop(item);
    drop(copy);
}

#[test]
fn strict_mode() {
    let strict = Config::default().with_strict(true);

    let data = hex!("1a00000005");
    let item = load_all(&data).unwrap();
    assert_eq!(item, Item::uint32(5));
    assert_eq!(serialize_alloc(&item).unwrap(), data);
    assert_eq!(
        load(&data, &strict),
        Err(Error::Malformed(Malformed::NonCanonical))
    );

    // Long string lengths, too
    assert_eq!(
        load(&hex!("5800"), &strict),
        Err(Error::Malformed(Malformed::NonCanonical))
    );
    assert_eq!(load_all(&hex!("f814")).unwrap(), Item::bool(false));
    assert_eq!(
        load(&hex!("f814"), &strict),
        Err(Error::Malformed(Malformed::InvalidSimpleValue(20)))
    );

    // Unassigned one-byte simple values, as in the "f0" vector
    assert_eq!(load_all(&hex!("f3")).unwrap(), Item::simple(19).unwrap());
    assert_eq!(
        load(&hex!("f3"), &strict),
        Err(Error::Malformed(Malformed::InvalidSimpleValue(19)))
    );
    assert_eq!(
        load(&hex!("81e0"), &strict),
        Err(Error::Malformed(Malformed::InvalidSimpleValue(0)))
    );

    for data in RFC_VECTORS.iter().filter(|data| data[..] != hex!("f0")) {
        assert!(load(data, &strict).is_ok(), "{data:02x?}");
    }
}

#[test]
fn allocation_budget() {
    let data = hex!("826449455446a0");
    assert!(load(&data, &Config::default().with_max_alloc(4096)).is_ok());

    for limit in [0, 4, 64, 100] {
        match load(&data, &Config::default().with_max_alloc(limit)) {
            Ok(_) | Err(Error::MemoryExhausted) => {}
            r => panic!("budget {limit} gave {r:?}"),
        }
    }
    assert_eq!(
        load(&data, &Config::default().with_max_alloc(0)),
        Err(Error::MemoryExhausted)
    );
}

#[test]
fn accounted_allocations() {
    struct Count(usize, usize);

    impl Allocator for Count {
        fn allocate(&mut self, bytes: usize) -> Result<(), Error> {
            self.0 += 1;
            self.1 += bytes;
            Ok(())
        }
    }

    let data = hex!("a26161016162820203");
    let mut count = Count(0, 0);
    load_with(&data, &Config::default(), &mut count).unwrap();
    assert!(count.0 > 0);

    // A budget of exactly the accounted bytes suffices, one less does not
    assert!(load(&data, &Config::default().with_max_alloc(count.1)).is_ok());
    assert_eq!(
        load(&data, &Config::default().with_max_alloc(count.1 - 1)),
        Err(Error::MemoryExhausted)
    );
}

#[test]
fn loaded_items_are_unique() {
    let (mut item, _) = load(&hex!("8101"), &Config::default()).unwrap();
    assert_eq!(item.refcount(), 1);
    item.push(Item::uint(2)).unwrap_err();
    item.set(0, Item::uint(3)).unwrap();
    assert_eq!(serialize_alloc(&item).unwrap(), hex!("8103"));
}

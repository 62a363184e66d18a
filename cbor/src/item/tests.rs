use super::*;

fn nested(depth: usize) -> Item {
    let mut item = Item::uint(0);
    for _ in 0..depth {
        let mut outer = Item::array(Some(1));
        outer.push(item).unwrap();
        item = outer;
    }
    item
}

#[test]
fn deep_drop() {
    // Would overflow the stack if dropping recursed
    drop(nested(1_000_000));

    let mut item = Item::uint(0);
    for i in 0..100_000u64 {
        item = Item::tag(i, item);
    }
    drop(item);
}

#[test]
fn deep_equality() {
    let a = nested(100_000);
    let b = nested(100_000);
    assert_eq!(a, b);
    assert_ne!(a, nested(99_999));
}

#[test]
fn deep_copy() {
    let leaf = Item::text("leaf");
    let mut map = Item::map(None);
    map.add_pair(Item::uint(1), leaf.share()).unwrap();
    let tree = Item::array_from([map, leaf.share()]);

    let copy = tree.deep_copy();
    assert_eq!(copy, tree);
    assert!(!copy.ptr_eq(&tree));
    assert_eq!(leaf.refcount(), 3);

    // The copy is uniquely owned throughout, so it can be mutated
    let mut copy = copy;
    copy.set(1, Item::null()).unwrap();
    assert_ne!(copy, tree);
    assert_eq!(tree.get(1), Some(&leaf));

    let deep = nested(100_000);
    assert_eq!(deep.deep_copy(), deep);
}

#[test]
fn deep_copy_keeps_declared_sizes() {
    let mut array = Item::array(Some(3));
    array.push(Item::uint(1)).unwrap();
    let mut map = Item::map(Some(2));
    map.add_pair(Item::uint(1), Item::null()).unwrap();
    let tree = Item::array_from([array, map]);

    let mut copy = tree.deep_copy();
    assert_eq!(copy.as_array().unwrap().size(), Some(2));

    let mut array = copy.get(0).unwrap().deep_copy();
    assert_eq!(array.as_array().unwrap().size(), Some(3));
    array.push(Item::uint(2)).unwrap();
    array.push(Item::uint(3)).unwrap();
    assert_eq!(array.push(Item::uint(4)), Err(Error::ContainerFull));

    let mut map = copy.get(1).unwrap().deep_copy();
    assert_eq!(map.as_map().unwrap().size(), Some(2));
    map.add_pair(Item::uint(2), Item::null()).unwrap();

    copy.set(0, array).unwrap();
    copy.set(1, map).unwrap();
    assert_eq!(
        serialize_alloc(&copy).unwrap(),
        [0x82, 0x83, 0x01, 0x02, 0x03, 0xa2, 0x01, 0xf6, 0x02, 0xf6]
    );
}

#[test]
fn refcounts() {
    let a = Item::uint(7);
    assert_eq!(a.refcount(), 1);
    assert!(!a.is_shared());

    let b = a.share();
    assert_eq!(a.refcount(), 2);
    assert!(a.ptr_eq(&b));
    assert!(b.is_shared());

    drop(b);
    assert_eq!(a.refcount(), 1);

    let arr = Item::array_from([a.share()]);
    assert_eq!(a.refcount(), 2);
    drop(arr);
    assert_eq!(a.refcount(), 1);
}

#[test]
fn shared_trees_are_read_only() {
    let mut a = Item::array(None);
    let b = a.share();
    assert_eq!(a.push(Item::uint(1)), Err(Error::Shared));
    assert_eq!(b.len(), Some(0));
    drop(b);
    assert_eq!(a.push(Item::uint(1)), Ok(()));
}

#[test]
fn structural_equality() {
    // Widths, definite flags and chunking all matter
    assert_ne!(Item::uint8(1), Item::uint16(1));
    assert_ne!(Item::array(None), Item::array(Some(0)));
    assert_ne!(Item::uint(1), Item::negint(1));
    assert_ne!(Item::text("a"), Item::bytes(*b"a"));

    let mut chunked = Item::indefinite_text();
    chunked.add_chunk(Item::text("ab")).unwrap();
    assert_ne!(chunked, Item::text("ab"));
    assert_eq!(chunked.flatten().unwrap(), Item::text("ab"));

    let mut a = Item::map(Some(1));
    a.add_pair(Item::text("k"), Item::bool(true)).unwrap();
    let mut b = Item::map(Some(1));
    b.add_pair(Item::text("k"), Item::bool(true)).unwrap();
    assert_eq!(a, b);
}

#[test]
fn kinds() {
    assert_eq!(Item::int(-1).kind(), Kind::NegInt);
    assert_eq!(Item::tag(0, Item::null()).kind().major(), 6);
    assert_eq!(Item::single(1.0).kind(), Kind::FloatCtrl);
    assert!(Item::tag(0, Item::array(None)).is_definite());
    assert!(!Item::indefinite_bytes().is_definite());
}

#[test]
fn thread_safe() {
    fn check<T: Send + Sync>() {}
    check::<Item>();
}

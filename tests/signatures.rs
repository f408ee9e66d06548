pub trait Store {
    fn get<'a>(&'a self, key: &'a str) -> Option<&'a str>;
    fn put(&mut self, key: String, value: Vec<u8>) -> bool;
}

pub trait Sink {
    fn write(&self, byte: u8);
    fn write_all(&self, bytes: &[u8]) -> usize;
}

decoy::double! {
    /// Stands in for every trait at once.
    #[derive(Debug)]
    pub struct MockEverything;

    impl Store for MockEverything {
        fn get<'a>(&'a self, key: &'a str) -> Option<&'a str>;
        fn put(&mut self, key: String, mut value: Vec<u8>) -> bool;
    }

    impl Sink for MockEverything {
        fn write(&self, byte: u8);
        #[decoy(suffix = "slice")]
        fn write_all(&self, bytes: &[u8]) -> usize;
    }

    impl MockEverything {
        #[allow(clippy::too_many_arguments)]
        pub fn wide(&self, a: u8, b: u16, c: u32, d: u64, e: i8, f: i16, g: i32, h: i64, i: bool, j: char) -> u8;
        pub fn pattern(&self, (x, y): (i32, i32), _: bool) -> i32;
    }
}

#[test]
fn lifetimes_in_the_return_type() {
    let mock = MockEverything::new();
    mock.get.set_result(Some("cached"));

    assert_eq!(mock.get("key"), Some("cached"));
    assert_eq!(mock.get.param::<1>(), "key");
    assert_eq!(mock.get.prototype(), "Option<&'a str> get(&'a str)");
}

#[test]
fn hooks_may_return_borrowed_statics() {
    let mock = MockEverything::new();
    mock.get
        .set_hook(|key: &str| -> Option<&'static str> { (key == "a").then_some("found") });

    assert_eq!(mock.get("a"), Some("found"));
    assert_eq!(mock.get("b"), None);
}

#[test]
fn owned_arguments_and_mut_patterns() {
    let mut mock = MockEverything::new();
    mock.put.set_result(true);

    assert!(mock.put("k".to_string(), vec![1]));
    assert_eq!(mock.put.params(), Some(("k".to_string(), vec![1])));
}

#[test]
fn suffixes_name_the_binding() {
    let mock = MockEverything::new();
    mock.write_all_slice.set_hook(|bytes: &[u8]| bytes.len());

    assert_eq!(mock.write_all(b"four"), 4);
    assert_eq!(mock.write_all_slice.param::<1>(), b"four".to_vec());
    assert!(!mock.write.called());
}

#[test]
fn ten_arguments() {
    let mock = MockEverything::new();
    mock.wide.set_result(0);

    mock.wide(1, 2, 3, 4, 5, 6, 7, 8, true, 'j');

    assert_eq!(mock.wide.param::<1>(), 1);
    assert_eq!(mock.wide.param::<4>(), 4);
    assert_eq!(mock.wide.param::<10>(), 'j');
}

#[test]
fn argument_patterns() {
    let mock = MockEverything::new();
    mock.pattern
        .set_hook(|(x, y): (i32, i32), flip: bool| if flip { y - x } else { x - y });

    assert_eq!(mock.pattern((5, 3), false), 2);
    assert_eq!(mock.pattern((5, 3), true), -2);
    assert_eq!(mock.pattern.param::<1>(), (5, 3));
    assert_eq!(mock.pattern.prototype(), "i32 pattern((i32, i32), bool)");
}

#[test]
fn doubles_keep_their_attributes() {
    let mock = MockEverything::default();
    assert!(format!("{mock:?}").starts_with("MockEverything"));
}

pub trait Shape {
    type Unit;

    fn scaled(&self, factor: u32) -> Self;
    fn overlaps(&self, other: &Self) -> bool;
    fn area(&self) -> Self::Unit;
}

decoy::double! {
    #[derive(Clone)]
    pub struct MockShape;

    impl Shape for MockShape {
        type Unit = u32;

        fn scaled(&self, factor: u32) -> Self;
        fn overlaps(&self, other: &Self) -> bool;
        fn area(&self) -> Self::Unit;
    }
}

#[test]
fn self_stands_for_the_double() {
    let shape = MockShape::new();
    let bigger = MockShape::new();
    bigger.area.set_result(4);
    shape.scaled.set_result(bigger);
    shape.overlaps.set_hook(|other: &MockShape| other.area() > 2);

    let scaled = shape.scaled(2);

    assert_eq!(scaled.area(), 4);
    assert!(shape.overlaps(&scaled));
    assert_eq!(shape.scaled.param::<1>(), 2);
    assert_eq!(shape.overlaps.param::<1>().area.result(), 4);
    assert_eq!(shape.overlaps.prototype(), "bool overlaps(&Self)");
    assert_eq!(shape.area.prototype(), "Self::Unit area()");
}

#[test]
fn returned_doubles_are_copies() {
    let shape = MockShape::new();
    shape.scaled.set_result(MockShape::new());

    let first = shape.scaled(1);
    first.area.set_result(1);
    let second = shape.scaled(1);

    assert!(!second.area.has_result());
    assert_eq!(shape.scaled.count(), 2);
}

mod inventory {
    #[derive(Clone, Debug, Default, PartialEq)]
    struct Sku(u32);

    trait Stock {
        fn reserve(&self, sku: Sku, amount: u32) -> bool;
    }

    decoy::double! {
        pub struct MockStock;

        impl Stock for MockStock {
            fn reserve(&self, sku: Sku, amount: u32) -> bool;
        }
    }

    #[test]
    fn public_doubles_over_private_types() {
        let stock = MockStock::new();
        stock.reserve.set_result(true);

        assert!(stock.reserve(Sku(7), 3));
        assert_eq!(stock.reserve.param::<1>(), Sku(7));
        assert_eq!(stock.reserve.prototype(), "bool reserve(Sku, u32)");
    }
}

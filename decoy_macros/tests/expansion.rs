use std::collections::HashMap;

pub trait Repository {
    fn load(&self, ids: &[u32]) -> HashMap<u32, String>;
    fn rename<'a>(&self, from: &'a str, to: &'a str) -> Result<(), String>
    where
        'a: 'static;
}

decoy::double! {
    struct MockRepository;

    impl Repository for MockRepository {
        fn load(&self, ids: &[u32]) -> HashMap<u32, String>;
        fn rename<'a>(&self, from: &'a str, to: &'a str) -> Result<(), String>
        where
            'a: 'static;
    }
}

decoy::function! {
    pub unsafe fn release(handle: u64) -> bool;
    pub extern "C" fn callback(code: i32) -> i32;
    fn first_word(text: &str) -> &str;
}

mod ffi {
    decoy::proxy! {
        pub unsafe extern "C" fn checksum(data: *const u8, len: usize) -> u32;
    }
}

#[test]
fn prototypes_are_rendered_from_the_declaration() {
    let repository = MockRepository::new();

    assert_eq!(
        repository.load.prototype(),
        "HashMap<u32, String> load(&[u32])"
    );
    assert_eq!(
        repository.rename.prototype(),
        "Result<(), String> rename(&'a str, &'a str) where 'a: 'static"
    );
    assert_eq!(RELEASE.prototype(), "bool release(u64)");
    assert_eq!(
        ffi::CHECKSUM_PROXY.prototype(),
        "u32 checksum(*const u8, usize)"
    );
}

#[test]
fn slices_are_captured_as_vectors() {
    let repository = MockRepository::new();
    repository.load.set_result(HashMap::new());

    repository.load(&[4, 2]);

    assert_eq!(repository.load.param::<1>(), vec![4, 2]);
}

#[test]
fn unsafe_functions() {
    let _isolated = RELEASE.isolate();
    RELEASE.set_hook(|handle: u64| handle % 2 == 0);

    assert!(unsafe { release(4) });
    assert!(!unsafe { release(5) });
    assert_eq!(RELEASE.params(), Some((5,)));
}

#[test]
fn foreign_abi() {
    let _isolated = CALLBACK.isolate();
    CALLBACK.set_result(-1);

    let pointer: extern "C" fn(i32) -> i32 = callback;

    assert_eq!(pointer(3), -1);
    assert_eq!(CALLBACK.param::<1>(), 3);
}

#[test]
fn returned_borrows_are_static() {
    let _isolated = FIRST_WORD.isolate();
    FIRST_WORD.set_result("hello");

    let text = String::from("goodbye world");

    assert_eq!(first_word(&text), "hello");
    assert_eq!(FIRST_WORD.param::<1>(), "goodbye world");
}

#[test]
fn proxies_to_foreign_functions() {
    unsafe extern "C" fn sum(data: *const u8, len: usize) -> u32 {
        std::slice::from_raw_parts(data, len)
            .iter()
            .map(|&b| u32::from(b))
            .sum()
    }

    let _connection = ffi::CHECKSUM_PROXY.connect(sum);
    let data = [1u8, 2, 3];

    assert_eq!(unsafe { ffi::checksum(data.as_ptr(), data.len()) }, 6);
}

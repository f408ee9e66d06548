extern crate proc_macro;

mod double;
mod free;
mod prototype;
mod signature;

use proc_macro::TokenStream;

/// Declares a test double: a struct with one `decoy::Binding` field per
/// mocked method, and the impl blocks whose methods report to them.
///
/// ```
/// trait Clock {
///     fn now(&self) -> u64;
/// }
///
/// decoy::double! {
///     struct MockClock;
///
///     impl Clock for MockClock {
///         fn now(&self) -> u64;
///     }
/// }
///
/// let clock = MockClock::new();
/// clock.now.set_result(3);
/// assert_eq!(clock.now(), 3);
/// ```
///
/// Methods are declared without bodies. Two methods that would share a
/// binding name are told apart with `#[decoy(suffix = "...")]`, which
/// names the binding `<method>_<suffix>`.
///
/// `Self` in arguments and results stands for the double. Returning it
/// or taking it by reference needs the double to be `Clone`:
///
/// ```
/// trait Shape {
///     fn scaled(&self, factor: u32) -> Self;
/// }
///
/// decoy::double! {
///     #[derive(Clone)]
///     struct MockShape;
///
///     impl Shape for MockShape {
///         fn scaled(&self, factor: u32) -> Self;
///     }
/// }
///
/// let shape = MockShape::new();
/// shape.scaled.set_result(MockShape::new());
/// assert!(!shape.scaled(2).scaled.called());
/// ```
///
/// # Rejected declarations
///
/// Every method needs a receiver:
///
/// ```compile_fail
/// decoy::double! {
///     struct MockClock;
///
///     impl MockClock {
///         fn now() -> u64;
///     }
/// }
/// ```
///
/// Methods have no body:
///
/// ```compile_fail
/// decoy::double! {
///     struct MockClock;
///
///     impl MockClock {
///         fn now(&self) -> u64 { 0 }
///     }
/// }
/// ```
///
/// Binding names must be unique within a double:
///
/// ```compile_fail
/// trait Fast { fn now(&self) -> u64; }
/// trait Slow { fn now(&self) -> u64; }
///
/// decoy::double! {
///     struct MockClock;
///
///     impl Fast for MockClock {
///         fn now(&self) -> u64;
///     }
///     impl Slow for MockClock {
///         fn now(&self) -> u64;
///     }
/// }
/// ```
///
/// Impl blocks must be for the declared double:
///
/// ```compile_fail
/// decoy::double! {
///     struct MockClock;
///
///     impl MockTimer {
///         fn now(&self) -> u64;
///     }
/// }
/// ```
///
/// Async and const methods cannot be mocked:
///
/// ```compile_fail
/// decoy::double! {
///     struct MockClock;
///
///     impl MockClock {
///         async fn now(&self) -> u64;
///     }
/// }
/// ```
///
/// ```compile_fail
/// decoy::double! {
///     struct MockClock;
///
///     impl MockClock {
///         const fn now(&self) -> u64;
///     }
/// }
/// ```
///
/// Neither can type generics nor `impl Trait`:
///
/// ```compile_fail
/// decoy::double! {
///     struct MockStore;
///
///     impl MockStore {
///         fn put<T: ToString>(&self, value: T);
///     }
/// }
/// ```
///
/// ```compile_fail
/// decoy::double! {
///     struct MockStore;
///
///     impl MockStore {
///         fn put(&self, value: impl ToString);
///     }
/// }
/// ```
///
/// ```compile_fail
/// decoy::double! {
///     struct MockStore;
///
///     impl MockStore {
///         fn keys(&self) -> impl Iterator<Item = u32>;
///     }
/// }
/// ```
///
/// Declarations must match the trait they implement:
///
/// ```compile_fail
/// trait Clock {
///     fn now(&self) -> u64;
/// }
///
/// decoy::double! {
///     struct MockClock;
///
///     impl Clock for MockClock {
///         fn now(&self) -> u32;
///     }
/// }
/// ```
#[proc_macro]
pub fn double(input: TokenStream) -> TokenStream {
    let double = syn::parse_macro_input!(input as double::Double);
    match double.expand() {
        Ok(expanded) => expanded.into(),
        Err(e) => e.write_errors().into(),
    }
}

/// Declares free functions backed by process-wide `static` bindings
/// named after the function in upper case.
///
/// ```
/// decoy::function! {
///     fn parse(input: &str) -> Option<u32>;
/// }
///
/// let _isolated = PARSE.isolate();
/// PARSE.set_result(Some(7));
///
/// assert_eq!(std::thread::spawn(|| parse("seven")).join().unwrap(), Some(7));
/// assert_eq!(PARSE.param::<1>(), "seven");
/// ```
///
/// Hooks may be called from any thread, so they must be `Send + Sync`,
/// and so must the arguments and results.
///
/// # Rejected declarations
///
/// Free functions take no receiver:
///
/// ```compile_fail
/// decoy::function! {
///     fn now(&self) -> u64;
/// }
/// ```
///
/// Binding names must be unique:
///
/// ```compile_fail
/// decoy::function! {
///     fn parse(input: &str) -> u32;
///     fn parse(input: String) -> u32;
/// }
/// ```
///
/// Variadic functions cannot be mocked:
///
/// ```compile_fail
/// decoy::function! {
///     unsafe extern "C" fn printf(format: *const u8, ...) -> i32;
/// }
/// ```
#[proc_macro]
pub fn function(input: TokenStream) -> TokenStream {
    let functions = syn::parse_macro_input!(input as free::Functions);
    match functions.expand_mocks() {
        Ok(expanded) => expanded.into(),
        Err(e) => e.write_errors().into(),
    }
}

/// Declares free functions that forward every call to the subject
/// connected to their `<NAME>_PROXY` static.
#[proc_macro]
pub fn proxy(input: TokenStream) -> TokenStream {
    let functions = syn::parse_macro_input!(input as free::Functions);
    match functions.expand_proxies() {
        Ok(expanded) => expanded.into(),
        Err(e) => e.write_errors().into(),
    }
}

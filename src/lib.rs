//! Test doubles built from bindings.
//!
//! Every mocked function gets a [`Binding`]: a small state object that
//! counts calls, keeps the arguments of the last call, and decides what
//! the function does, either by running a hook set by the test or by
//! returning a canned result. A mocked function that returns a value
//! and was given neither fails loudly instead of inventing one.
//!
//! Three macros generate the functions and their bindings:
//!
//! * [`double!`] declares a struct implementing traits, with one
//!   binding field per method. Every instance has its own bindings.
//! * [`function!`] declares free functions backed by process-wide
//!   `static` bindings.
//! * [`proxy!`] declares free functions that forward to a subject
//!   connected at runtime, for functions that many test modules need
//!   to stub.
//!
//! ```
//! pub trait UserNames {
//!     fn find_by_id(&self, id: i32) -> Option<String>;
//!     fn forget(&mut self, id: i32);
//! }
//!
//! fn greeting(names: &impl UserNames, id: i32) -> String {
//!     match names.find_by_id(id) {
//!         Some(name) => format!("hello {name}"),
//!         None => "who are you?".to_string(),
//!     }
//! }
//!
//! decoy::double! {
//!     pub struct MockUserNames;
//!
//!     impl UserNames for MockUserNames {
//!         fn find_by_id(&self, id: i32) -> Option<String>;
//!         fn forget(&mut self, id: i32);
//!     }
//! }
//!
//! let names = MockUserNames::new();
//! names
//!     .find_by_id
//!     .set_hook(|id: i32| (id == 1).then(|| "Donald".to_string()));
//!
//! assert_eq!(greeting(&names, 1), "hello Donald");
//! assert_eq!(greeting(&names, 2), "who are you?");
//! assert_eq!(names.find_by_id.count(), 2);
//! assert_eq!(names.find_by_id.param::<1>(), 2);
//! assert!(!names.forget.called());
//! ```
//!
//! Failures of a misused double (reading a result that was never set,
//! calling a proxy with nothing connected) go through [`verify`], which
//! panics by default and can be configured to abort.

mod binding;
mod error;
mod intercept;
mod params;
mod proxy;
mod signature;
mod slot;
mod verified;
pub mod verify;

pub use binding::{Binding, Isolated};
pub use error::Error;
pub use intercept::Intercept;
pub use params::{Param, Params};
pub use proxy::{Connection, Proxy};
pub use signature::{IntoHook, Signature, ValueOf};
pub use slot::{NoSlot, Output, ReturnSlot, Returns, Void};
pub use verified::Verified;

pub use decoy_macros::{double, function, proxy};

//! Module containing the non-owning erased reference binding

mod raw;
mod vtable;

pub use self::raw::{Mutability, RawBinding};

#![cfg_attr(not(doc), no_std)]
#![deny(
    missing_docs,
    clippy::alloc_instead_of_core,
    clippy::std_instead_of_alloc,
    clippy::std_instead_of_core,
    clippy::missing_safety_doc,
    clippy::undocumented_unsafe_blocks,
    clippy::multiple_unsafe_ops_per_block,
    clippy::as_ptr_cast_mut,
    clippy::ptr_as_ptr,
    rustdoc::invalid_rust_codeblocks,
    rustdoc::broken_intra_doc_links,
    missing_copy_implementations,
    unused_doc_comments
)]

//! Owning and borrowing type-erased containers with casts to declared base
//! types.
//!
//! ## Overview
//!
//! This crate provides two ways to handle values whose type is only known at
//! runtime:
//!
//! - [`AnyBox`] **owns** a deep copy of a value. It can be cloned (cloning
//!   copies the value), swapped, and cast back to the stored type. Values
//!   stored through the polymorphic constructors can additionally be cast to
//!   any *base type* they declare via the [`Upcast`] trait, so a composite
//!   value can be viewed through any of its embedded parts.
//! - [`AnyRef`] and [`AnyMut`] **borrow** an existing value without copying
//!   it. They mirror `&T` and `&mut T`: [`AnyRef`] is `Copy` and hands out
//!   shared access, [`AnyMut`] is move-only and hands out exclusive access,
//!   and an [`AnyMut`] can be demoted to an [`AnyRef`] but never promoted
//!   back.
//!
//! All casts are checked at runtime against the erased type's [`TypeId`];
//! failed casts report both the requested and the actual type name through
//! [`BadCast`] and [`BadRefCast`].
//!
//! ## Quick Example
//!
//! ```
//! use dynany::{AnyBox, impl_upcast};
//!
//! #[derive(Clone, Debug, PartialEq)]
//! struct Engine {
//!     horsepower: u32,
//! }
//!
//! #[derive(Clone, Debug, PartialEq)]
//! struct Car {
//!     engine: Engine,
//!     name: &'static str,
//! }
//!
//! impl_upcast!(Engine);
//! impl_upcast!(Car => engine: Engine);
//!
//! let container = AnyBox::new_polymorphic(Car {
//!     engine: Engine { horsepower: 90 },
//!     name: "2cv",
//! });
//!
//! // Cast to the exact type, or to any declared base.
//! assert_eq!(container.cast_ref::<Car>().unwrap().name, "2cv");
//! assert_eq!(container.cast_ref::<Engine>().unwrap().horsepower, 90);
//!
//! // Unrelated types are rejected at runtime.
//! assert!(container.cast_ref::<String>().is_err());
//! ```
//!
//! ## No-std Support
//!
//! The crate is `no_std` and only requires [`alloc`] for the owning
//! container; the reference containers never allocate.
//!
//! [`TypeId`]: core::any::TypeId

extern crate alloc;

mod any_box;
mod any_ref;
mod error;
mod macros;

pub use dynany_internals::upcast::Upcast;

pub use crate::{
    any_box::{AnyBox, Void},
    any_ref::{AnyMut, AnyRef},
    error::{BadCast, BadRefCast},
};

#![no_std]
#![forbid(
    missing_docs,
    clippy::alloc_instead_of_core,
    clippy::std_instead_of_alloc,
    clippy::std_instead_of_core,
    clippy::missing_safety_doc,
    clippy::missing_docs_in_private_items,
    clippy::undocumented_unsafe_blocks,
    clippy::multiple_unsafe_ops_per_block,
    rustdoc::invalid_rust_codeblocks,
    rustdoc::broken_intra_doc_links,
    missing_copy_implementations,
    unused_doc_comments
)]
#![allow(rustdoc::private_intra_doc_links)]
//! Internal implementation crate for [`dynany`].
//!
//! # Overview
//!
//! This crate contains the low-level, type-erased storage cells and unsafe
//! operations that power the [`dynany`] containers. It provides the foundation
//! for zero-cost type erasure through vtable-based dispatch.
//!
//! **This crate is an implementation detail.** No semantic versioning
//! guarantees are provided. Users should depend on the [`dynany`] crate, not
//! this one.
//!
//! # Architecture
//!
//! The crate is organized around two independent erased-storage kinds:
//!
//! - **[`cell`]**: Owning type-erased storage
//!   - [`RawCell`]: Owned cell with [`Box`]-based allocation
//!   - [`RawCellRef`]/[`RawCellMut`]: Borrowed references (shared/exclusive)
//!   - [`CellData`]: `#[repr(C)]` wrapper enabling field access on erased
//!     types
//!   - [`CellVtable`]: Function pointers for type-erased dispatch
//!
//! - **[`binding`]**: Non-owning type-erased reference capture
//!   - [`RawBinding`]: Bounded-size inline wrapper holding a pointer to the
//!     referent, its type identity, and a [`Mutability`] tag. No allocation.
//!
//! - **[`upcast`]**: The [`Upcast`] trait, through which a concrete type
//!   declares the base types it can be viewed as. Cells created through the
//!   polymorphic constructors consult it at cast time.
//!
//! # Safety Strategy
//!
//! Type erasure requires careful handling to maintain Rust's type safety
//! guarantees. When we erase a type like `CellData<MyValue>` to
//! `CellData<Erased>`, we must ensure that the vtable function pointers still
//! match the actual concrete type stored in memory.
//!
//! This crate maintains safety through:
//!
//! - **Module-based encapsulation**: Safety-critical types keep fields
//!   module-private, making invariants locally verifiable within a single file
//! - **`#[repr(C)]` layout**: Enables safe field projection on type-erased
//!   pointers without constructing invalid references
//! - **Documented vtable contracts**: Each vtable method specifies exactly
//!   when it can be safely called
//!
//! See the individual module documentation ([`cell`], [`binding`]) for
//! detailed explanations of how these patterns are applied.
//!
//! [`dynany`]: https://docs.rs/dynany/latest/dynany/
//! [`CellData`]: cell::data::CellData
//! [`CellVtable`]: cell::vtable::CellVtable
//! [`Upcast`]: upcast::Upcast
//! [`Box`]: alloc::boxed::Box

extern crate alloc;

mod binding;
mod cell;
pub mod upcast;
mod util;

pub use binding::{Mutability, RawBinding};
pub use cell::{RawCell, RawCellMut, RawCellRef};

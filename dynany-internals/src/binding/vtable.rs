//! Vtable for type-erased binding operations.
//!
//! A binding never owns, clones, or drops its referent, so its vtable only
//! carries the type identity of the captured type. It is still expressed as a
//! `&'static` vtable rather than inline [`TypeId`] fields to keep the binding
//! wrapper pointer-sized per slot and to mirror the cell machinery.
//!
//! This module encapsulates the fields of [`BindingVtable`] so they cannot be
//! accessed directly, guaranteeing that a vtable always describes the type it
//! was instantiated with.

use core::any::TypeId;

/// Vtable describing the type captured by a
/// [`RawBinding`](crate::binding::raw::RawBinding).
pub(crate) struct BindingVtable {
    /// Gets the [`TypeId`] of the captured type.
    type_id: fn() -> TypeId,
    /// Gets the [`core::any::type_name`] of the captured type.
    type_name: fn() -> &'static str,
}

impl BindingVtable {
    /// Creates a new [`BindingVtable`] for the captured type `T`.
    pub(super) const fn new<T: 'static>() -> &'static Self {
        const {
            &Self {
                type_id: TypeId::of::<T>,
                type_name: core::any::type_name::<T>,
            }
        }
    }

    /// Gets the [`TypeId`] of the captured type.
    #[inline]
    pub(super) fn type_id(&self) -> TypeId {
        (self.type_id)()
    }

    /// Gets the [`core::any::type_name`] of the captured type.
    #[inline]
    pub(super) fn type_name(&self) -> &'static str {
        (self.type_name)()
    }
}

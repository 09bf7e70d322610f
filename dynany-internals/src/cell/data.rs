//! This module encapsulates the fields of the [`CellData`]. Since this is the
//! only place they are visible, this means that the type of the [`CellVtable`]
//! is guaranteed to always be in sync with the type of the actual stored
//! value. This follows from the fact that they are in sync when created and
//! that the API offers no way to change the [`CellVtable`] or value type after
//! creation.

use crate::cell::{
    raw::{RawCellMut, RawCellRef},
    vtable::CellVtable,
};

/// Type-erased cell data structure with vtable-based dispatch.
///
/// This struct uses `#[repr(C)]` to enable safe field access in type-erased
/// contexts, allowing access to the vtable field even when the concrete value
/// type `V` is unknown.
#[repr(C)]
pub(super) struct CellData<V: 'static> {
    /// The vtable of this cell
    vtable: &'static CellVtable,
    /// The actual stored value
    value: V,
}

impl<V: 'static> CellData<V> {
    /// Creates a new direct [`CellData`] holding the given value.
    ///
    /// The vtable is created here, paired with `V`, so it cannot get out of
    /// sync with the stored value.
    #[inline]
    pub(super) fn new_direct(value: V) -> Self
    where
        V: Clone,
    {
        Self {
            vtable: CellVtable::new_direct::<V>(),
            value,
        }
    }

    /// Creates a new polymorphic [`CellData`] holding the given value.
    #[inline]
    pub(super) fn new_polymorphic(value: V) -> Self
    where
        V: Clone + crate::upcast::Upcast,
    {
        Self {
            vtable: CellVtable::new_polymorphic::<V>(),
            value,
        }
    }
}

impl<'a> RawCellRef<'a> {
    /// Returns a reference to the [`CellVtable`] of the [`CellData`]
    /// instance.
    #[inline]
    pub(super) fn vtable(self) -> &'static CellVtable {
        let ptr = self.as_ptr();
        // SAFETY: We don't know the actual inner value type, but we do know
        // that it points to an instance of `CellData<V>` for some specific
        // `V`. Since `CellData<V>` is `#[repr(C)]`, that means that it's safe
        // to create pointers to the fields before the actual value.
        //
        // We need to take care to avoid creating an actual reference to the
        // `CellData` itself though, as that would still be undefined behavior
        // since we don't have the right type.
        let vtable_ptr: *const &'static CellVtable = unsafe { &raw const (*ptr).vtable };

        // SAFETY: Dereferencing the pointer and getting out the `&'static
        // CellVtable` is valid for the same reasons
        unsafe { *vtable_ptr }
    }

    /// Accesses the inner value of the [`CellData`] instance as a reference
    /// to the specified type.
    ///
    /// # Safety
    ///
    /// The caller must ensure that the type `V` matches the actual value type
    /// stored in the [`CellData`].
    #[inline]
    pub unsafe fn value_downcast_unchecked<V: 'static>(self) -> &'a V {
        // SAFETY: The inner function requires that `V` matches the type
        // stored, but that is guaranteed by our caller.
        let this = unsafe { self.cast_inner::<V>() };
        &this.value
    }
}

impl<'a> RawCellMut<'a> {
    /// Accesses the inner value of the [`CellData`] instance as a mutable
    /// reference to the specified type.
    ///
    /// # Safety
    ///
    /// The caller must ensure that the type `V` matches the actual value type
    /// stored in the [`CellData`].
    #[inline]
    pub unsafe fn value_downcast_mut_unchecked<V: 'static>(self) -> &'a mut V {
        // SAFETY: The inner function requires that `V` matches the type
        // stored, but that is guaranteed by our caller.
        let this = unsafe { self.cast_inner_mut::<V>() };
        &mut this.value
    }
}

//! Vtable for type-erased cell operations.
//!
//! This module contains the [`CellVtable`] which enables operating on a
//! stored value when its concrete type `V` has been erased. The vtable stores
//! function pointers that dispatch to the correct typed implementations.
//!
//! This module encapsulates the fields of [`CellVtable`] so they cannot be
//! accessed directly. This visibility restriction guarantees the safety
//! invariant: **the vtable's type parameter must match the actual value type
//! stored in the [`CellData`]**.
//!
//! # Safety Invariant
//!
//! This invariant is maintained because vtables are created as `&'static`
//! references via [`CellVtable::new_direct`] or
//! [`CellVtable::new_polymorphic`], which pair the function pointers with a
//! specific type `V` at compile time.

use alloc::boxed::Box;
use core::{
    any::{Any, TypeId},
    ptr::NonNull,
};

use crate::{
    cell::{
        data::CellData,
        raw::{RawCell, RawCellMut, RawCellRef},
    },
    upcast::Upcast,
    util::Erased,
};

/// Vtable for type-erased cell operations.
///
/// Contains function pointers for performing operations on a stored value
/// without knowing its concrete type at compile time.
///
/// # Safety Invariant
///
/// The fields `drop`, `clone_cell`, `upcast_ref`, and `upcast_mut` are
/// guaranteed to point to the functions defined below instantiated with the
/// value type `V` that was used to create this [`CellVtable`], and all four
/// agree on whether the cell is direct or polymorphic.
pub(crate) struct CellVtable {
    /// Gets the [`TypeId`] of the value type that was used to create this
    /// [`CellVtable`].
    type_id: fn() -> TypeId,
    /// Gets the [`core::any::type_name`] of the value type that was used to
    /// create this [`CellVtable`].
    type_name: fn() -> &'static str,
    /// Drops the [`Box<CellData<V>>`] instance pointed to by this pointer.
    drop: unsafe fn(NonNull<CellData<Erased>>),
    /// Allocates an independent copy of the cell holding a clone of the
    /// stored value.
    clone_cell: unsafe fn(RawCellRef<'_>) -> RawCell,
    /// Projects a shared reference onto the view of the stored value
    /// identified by the given [`TypeId`], or returns `None` if the stored
    /// value cannot be viewed as that type.
    upcast_ref: for<'a> unsafe fn(RawCellRef<'a>, TypeId) -> Option<&'a (dyn Any + 'static)>,
    /// Projects a mutable reference onto the view of the stored value
    /// identified by the given [`TypeId`].
    upcast_mut: for<'a> unsafe fn(RawCellMut<'a>, TypeId) -> Option<&'a mut (dyn Any + 'static)>,
}

impl CellVtable {
    /// Creates a new [`CellVtable`] for a direct cell holding a value of type
    /// `V`.
    ///
    /// Direct cells answer cast requests by exact [`TypeId`] comparison only.
    /// This is the representation for types with no declared base
    /// relationships, where an identity check is both sufficient and cheap.
    pub(super) const fn new_direct<V: Clone + 'static>() -> &'static Self {
        const {
            &Self {
                type_id: TypeId::of::<V>,
                type_name: core::any::type_name::<V>,
                drop: drop::<V>,
                clone_cell: clone_direct::<V>,
                upcast_ref: upcast_ref_direct::<V>,
                upcast_mut: upcast_mut_direct::<V>,
            }
        }
    }

    /// Creates a new [`CellVtable`] for a polymorphic cell holding a value of
    /// type `V`.
    ///
    /// Polymorphic cells answer cast requests by exact [`TypeId`] comparison
    /// first, then by consulting the value's [`Upcast`] implementation, so
    /// any transitively declared base type of `V` can be recovered.
    pub(super) const fn new_polymorphic<V: Clone + Upcast>() -> &'static Self {
        const {
            &Self {
                type_id: TypeId::of::<V>,
                type_name: core::any::type_name::<V>,
                drop: drop::<V>,
                clone_cell: clone_polymorphic::<V>,
                upcast_ref: upcast_ref_polymorphic::<V>,
                upcast_mut: upcast_mut_polymorphic::<V>,
            }
        }
    }

    /// Gets the [`TypeId`] of the value type that was used to create this
    /// [`CellVtable`].
    #[inline]
    pub(super) fn type_id(&self) -> TypeId {
        (self.type_id)()
    }

    /// Gets the [`core::any::type_name`] of the value type that was used to
    /// create this [`CellVtable`].
    #[inline]
    pub(super) fn type_name(&self) -> &'static str {
        (self.type_name)()
    }

    /// Drops the `Box<CellData<V>>` instance pointed to by this pointer.
    ///
    /// # Safety
    ///
    /// The caller must ensure:
    ///
    /// 1. The pointer comes from [`Box<CellData<V>>`] via [`Box::into_raw`]
    /// 2. This [`CellVtable`] must be a vtable for the value type stored in
    ///    the [`CellData`].
    /// 3. This method drops the [`Box<CellData<V>>`], so the caller must
    ///    ensure that the pointer has not previously been dropped, that it is
    ///    able to transfer ownership of the pointer, and that it will not use
    ///    the pointer after calling this method.
    #[inline]
    pub(super) unsafe fn drop(&self, ptr: NonNull<CellData<Erased>>) {
        // SAFETY: We know that `self.drop` points to the function `drop::<V>`
        // below. That function's safety requirements are upheld:
        // 1. Guaranteed by the caller
        // 2. Guaranteed by the caller
        // 3. Guaranteed by the caller
        unsafe {
            (self.drop)(ptr);
        }
    }

    /// Allocates an independent copy of the cell using the [`Clone`]
    /// implementation of the stored value.
    ///
    /// The returned cell uses the same vtable as the original, so it is of
    /// the same kind (direct or polymorphic) and holds the same value type.
    ///
    /// # Safety
    ///
    /// The caller must ensure:
    ///
    /// 1. This [`CellVtable`] must be a vtable for the value type stored in
    ///    the [`RawCellRef`].
    #[inline]
    pub(super) unsafe fn clone_cell(&self, ptr: RawCellRef<'_>) -> RawCell {
        // SAFETY: We know that the `self.clone_cell` field points to the
        // function `clone_direct::<V>` or `clone_polymorphic::<V>` below.
        // Those functions' safety requirements are upheld:
        // 1. Guaranteed by the caller
        unsafe { (self.clone_cell)(ptr) }
    }

    /// Projects a shared reference onto the view of the stored value
    /// identified by `target`.
    ///
    /// # Safety
    ///
    /// The caller must ensure:
    ///
    /// 1. This [`CellVtable`] must be a vtable for the value type stored in
    ///    the [`RawCellRef`].
    #[inline]
    pub(super) unsafe fn upcast_ref<'a>(
        &self,
        ptr: RawCellRef<'a>,
        target: TypeId,
    ) -> Option<&'a (dyn Any + 'static)> {
        // SAFETY: We know that the `self.upcast_ref` field points to the
        // function `upcast_ref_direct::<V>` or `upcast_ref_polymorphic::<V>`
        // below. Those functions' safety requirements are upheld:
        // 1. Guaranteed by the caller
        unsafe { (self.upcast_ref)(ptr, target) }
    }

    /// Projects a mutable reference onto the view of the stored value
    /// identified by `target`.
    ///
    /// # Safety
    ///
    /// The caller must ensure:
    ///
    /// 1. This [`CellVtable`] must be a vtable for the value type stored in
    ///    the [`RawCellMut`].
    #[inline]
    pub(super) unsafe fn upcast_mut<'a>(
        &self,
        ptr: RawCellMut<'a>,
        target: TypeId,
    ) -> Option<&'a mut (dyn Any + 'static)> {
        // SAFETY: We know that the `self.upcast_mut` field points to the
        // function `upcast_mut_direct::<V>` or `upcast_mut_polymorphic::<V>`
        // below. Those functions' safety requirements are upheld:
        // 1. Guaranteed by the caller
        unsafe { (self.upcast_mut)(ptr, target) }
    }
}

/// Drops the [`Box<CellData<V>>`] instance pointed to by this pointer.
///
/// # Safety
///
/// The caller must ensure:
///
/// 1. The pointer comes from [`Box<CellData<V>>`] via [`Box::into_raw`]
/// 2. The value type `V` matches the actual value type stored in the
///    [`CellData`]
/// 3. This method drops the [`Box<CellData<V>>`], so the caller must ensure
///    that the pointer has not previously been dropped, that it is able to
///    transfer ownership of the pointer, and that it will not use the pointer
///    after calling this method.
unsafe fn drop<V: 'static>(ptr: NonNull<CellData<Erased>>) {
    let ptr: NonNull<CellData<V>> = ptr.cast();
    let ptr = ptr.as_ptr();
    // SAFETY: Our pointer has the correct type as guaranteed by the caller,
    // and it came from a call to `Box::into_raw` as also guaranteed by our
    // caller.
    let boxed = unsafe { Box::from_raw(ptr) };
    core::mem::drop(boxed);
}

/// Clones a direct cell by cloning the stored value into a fresh allocation.
///
/// # Safety
///
/// The caller must ensure:
///
/// 1. The type `V` matches the actual value type stored in the [`CellData`]
unsafe fn clone_direct<V: Clone + 'static>(ptr: RawCellRef<'_>) -> RawCell {
    // SAFETY:
    // 1. Guaranteed by the caller
    let value: &V = unsafe { ptr.value_downcast_unchecked::<V>() };
    RawCell::new_direct(value.clone())
}

/// Clones a polymorphic cell by cloning the stored value into a fresh
/// allocation.
///
/// # Safety
///
/// The caller must ensure:
///
/// 1. The type `V` matches the actual value type stored in the [`CellData`]
unsafe fn clone_polymorphic<V: Clone + Upcast>(ptr: RawCellRef<'_>) -> RawCell {
    // SAFETY:
    // 1. Guaranteed by the caller
    let value: &V = unsafe { ptr.value_downcast_unchecked::<V>() };
    RawCell::new_polymorphic(value.clone())
}

/// Answers a shared cast request on a direct cell by exact [`TypeId`]
/// comparison.
///
/// # Safety
///
/// The caller must ensure:
///
/// 1. The type `V` matches the actual value type stored in the [`CellData`]
unsafe fn upcast_ref_direct<V: 'static>(
    ptr: RawCellRef<'_>,
    target: TypeId,
) -> Option<&(dyn Any + 'static)> {
    if target != TypeId::of::<V>() {
        return None;
    }
    // SAFETY:
    // 1. Guaranteed by the caller
    let value: &V = unsafe { ptr.value_downcast_unchecked::<V>() };
    Some(value)
}

/// Answers a mutable cast request on a direct cell by exact [`TypeId`]
/// comparison.
///
/// # Safety
///
/// The caller must ensure:
///
/// 1. The type `V` matches the actual value type stored in the [`CellData`]
unsafe fn upcast_mut_direct<V: 'static>(
    ptr: RawCellMut<'_>,
    target: TypeId,
) -> Option<&mut (dyn Any + 'static)> {
    if target != TypeId::of::<V>() {
        return None;
    }
    // SAFETY:
    // 1. Guaranteed by the caller
    let value: &mut V = unsafe { ptr.value_downcast_mut_unchecked::<V>() };
    Some(value)
}

/// Answers a shared cast request on a polymorphic cell: exact [`TypeId`]
/// comparison first, then a walk of the value's declared base graph.
///
/// # Safety
///
/// The caller must ensure:
///
/// 1. The type `V` matches the actual value type stored in the [`CellData`]
unsafe fn upcast_ref_polymorphic<V: Upcast>(
    ptr: RawCellRef<'_>,
    target: TypeId,
) -> Option<&(dyn Any + 'static)> {
    // SAFETY:
    // 1. Guaranteed by the caller
    let value: &V = unsafe { ptr.value_downcast_unchecked::<V>() };
    if target == TypeId::of::<V>() {
        return Some(value);
    }
    value.upcast(target)
}

/// Answers a mutable cast request on a polymorphic cell: exact [`TypeId`]
/// comparison first, then a walk of the value's declared base graph.
///
/// # Safety
///
/// The caller must ensure:
///
/// 1. The type `V` matches the actual value type stored in the [`CellData`]
unsafe fn upcast_mut_polymorphic<V: Upcast>(
    ptr: RawCellMut<'_>,
    target: TypeId,
) -> Option<&mut (dyn Any + 'static)> {
    // SAFETY:
    // 1. Guaranteed by the caller
    let value: &mut V = unsafe { ptr.value_downcast_mut_unchecked::<V>() };
    if target == TypeId::of::<V>() {
        return Some(value);
    }
    value.upcast_mut(target)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_vtable_eq() {
        // Vtables are static promoted constants, so identical instantiations
        // must be the exact same instance.
        let vtable1 = CellVtable::new_direct::<i32>();
        let vtable2 = CellVtable::new_direct::<i32>();
        assert!(core::ptr::eq(vtable1, vtable2));
    }

    #[test]
    fn test_cell_vtable_type_id() {
        let vtable = CellVtable::new_direct::<i32>();
        assert_eq!(vtable.type_id(), TypeId::of::<i32>());
        assert_eq!(vtable.type_name(), core::any::type_name::<i32>());
    }

    #[test]
    fn test_direct_and_polymorphic_vtables_differ() {
        #[derive(Clone)]
        struct Lone;
        impl Upcast for Lone {
            fn upcast(&self, target: TypeId) -> Option<&dyn Any> {
                (target == TypeId::of::<Lone>()).then_some(self as &dyn Any)
            }

            fn upcast_mut(&mut self, target: TypeId) -> Option<&mut dyn Any> {
                (target == TypeId::of::<Lone>()).then_some(self as &mut dyn Any)
            }
        }

        let direct = CellVtable::new_direct::<Lone>();
        let polymorphic = CellVtable::new_polymorphic::<Lone>();
        assert!(!core::ptr::eq(direct, polymorphic));
        assert_eq!(direct.type_id(), polymorphic.type_id());
    }
}

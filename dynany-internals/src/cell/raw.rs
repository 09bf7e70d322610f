//! Type-erased cell pointer types.
//!
//! This module encapsulates the `ptr` field of [`RawCell`], [`RawCellRef`]
//! and [`RawCellMut`], ensuring it is only visible within this module. This
//! visibility restriction guarantees the safety invariant: **the pointer
//! always comes from `Box<CellData<V>>`**.
//!
//! # Safety Invariant
//!
//! Since the `ptr` field can only be set via [`RawCell::new_direct`] or
//! [`RawCell::new_polymorphic`] (which create it from `Box::into_raw`), and
//! cannot be modified afterward (no `pub` or `pub(crate)` fields), the pointer
//! provenance remains valid throughout the value's lifetime.
//!
//! The [`RawCell::drop`] implementation relies on this invariant to safely
//! reconstruct the `Box` and deallocate the memory.
//!
//! # Type Erasure
//!
//! The concrete type parameter `V` is erased by casting to
//! `CellData<Erased>`. The vtable stored within the `CellData` provides the
//! runtime type information needed to safely downcast, clone, and upcast the
//! stored value.

use alloc::boxed::Box;
use core::{
    any::{Any, TypeId},
    ptr::NonNull,
};

use crate::{cell::data::CellData, upcast::Upcast, util::Erased};

/// A pointer to a [`CellData`] that is guaranteed to point to an initialized
/// instance of a [`CellData<V>`] for some specific `V`, though we do not know
/// which actual `V` it is.
///
/// However, the pointer is allowed to transition into a non-initialized state
/// inside the [`RawCell::drop`] method.
///
/// The pointer is guaranteed to have been created using [`Box::into_raw`].
///
/// We cannot use a [`Box<CellData<V>>`] directly, because that does not allow
/// us to type-erase the `V`.
#[repr(transparent)]
pub struct RawCell {
    /// Pointer to the inner cell data
    ///
    /// # Safety
    ///
    /// The following safety invariants are guaranteed to be upheld as long as
    /// this struct exists:
    ///
    /// 1. The pointer must have been created from a `Box<CellData<V>>` for
    ///    some `V` using `Box::into_raw`.
    /// 2. The pointer will point to the same `CellData<V>` for the entire
    ///    lifetime of this object.
    /// 3. The pointee is properly initialized for the entire lifetime of this
    ///    object, except during the execution of the `Drop` implementation.
    /// 4. This object has exclusive ownership of the pointee.
    ptr: NonNull<CellData<Erased>>,
}

impl RawCell {
    /// Creates a new direct [`RawCell`] embedding the given value.
    ///
    /// Direct cells answer cast requests by exact [`TypeId`] comparison only.
    #[inline]
    pub fn new_direct<V>(value: V) -> Self
    where
        V: Clone + 'static,
    {
        Self::from_data(Box::new(CellData::new_direct(value)))
    }

    /// Creates a new polymorphic [`RawCell`] embedding the given value.
    ///
    /// Polymorphic cells additionally answer cast requests for any base type
    /// declared by the value's [`Upcast`] implementation.
    #[inline]
    pub fn new_polymorphic<V>(value: V) -> Self
    where
        V: Clone + Upcast,
    {
        Self::from_data(Box::new(CellData::new_polymorphic(value)))
    }

    /// Erases the value type of a freshly allocated [`CellData`] box.
    #[inline]
    fn from_data<V: 'static>(data: Box<CellData<V>>) -> Self {
        let ptr: *mut CellData<V> = Box::into_raw(data);
        let ptr: *mut CellData<Erased> = ptr.cast::<CellData<Erased>>();

        // SAFETY: `Box::into_raw` returns a non-null pointer
        let ptr: NonNull<CellData<Erased>> = unsafe { NonNull::new_unchecked(ptr) };

        Self { ptr }
    }

    /// Returns a shared reference to the [`CellData`] instance.
    #[inline]
    pub fn as_ref(&self) -> RawCellRef<'_> {
        RawCellRef {
            ptr: self.ptr,
            _marker: core::marker::PhantomData,
        }
    }

    /// Returns an exclusive reference to the [`CellData`] instance.
    #[inline]
    pub fn as_mut(&mut self) -> RawCellMut<'_> {
        RawCellMut {
            ptr: self.ptr,
            _marker: core::marker::PhantomData,
        }
    }
}

impl core::ops::Drop for RawCell {
    #[inline]
    fn drop(&mut self) {
        let vtable = self.as_ref().vtable();

        // SAFETY:
        // 1. The pointer comes from `Box::into_raw` (guaranteed by the
        //    constructors of `RawCell`)
        // 2. The vtable returned by `self.as_ref().vtable()` is guaranteed to
        //    match the data in the `CellData`.
        // 3. The pointer is initialized and has not been previously freed as
        //    guaranteed by the invariants on this type. We are correctly
        //    transferring ownership here and the pointer is not used
        //    afterwards, as we are in the drop function.
        unsafe {
            vtable.drop(self.ptr);
        }
    }
}

/// A lifetime-bound pointer to a [`CellData`] that is guaranteed to point to
/// an initialized instance of a [`CellData<V>`] for some specific `V`, though
/// we do not know which actual `V` it is.
///
/// We cannot use a [`&'a CellData<V>`] directly, because that would require
/// us to know the actual type of the stored value, which we do not.
///
/// [`&'a CellData<V>`]: CellData
#[derive(Clone, Copy)]
#[repr(transparent)]
pub struct RawCellRef<'a> {
    /// Pointer to the inner cell data
    ///
    /// # Safety
    ///
    /// The following safety invariants are guaranteed to be upheld as long as
    /// this struct exists:
    ///
    /// 1. The pointer must have been created from a `Box<CellData<V>>` for
    ///    some `V` using `Box::into_raw`.
    /// 2. The pointer will point to the same `CellData<V>` for the entire
    ///    lifetime of this object.
    ptr: NonNull<CellData<Erased>>,

    /// Marker to tell the compiler that we should behave the same as a
    /// `&'a CellData<Erased>`
    _marker: core::marker::PhantomData<&'a CellData<Erased>>,
}

impl<'a> RawCellRef<'a> {
    /// Casts the [`RawCellRef`] to a [`CellData<V>`] reference.
    ///
    /// # Safety
    ///
    /// The caller must ensure:
    ///
    /// 1. The type `V` matches the actual value type stored in the
    ///    [`CellData`].
    #[inline]
    pub(super) unsafe fn cast_inner<V>(self) -> &'a CellData<V> {
        // Debug assertion to catch type mismatches in case of bugs
        debug_assert_eq!(self.vtable().type_id(), TypeId::of::<V>());

        let this = self.ptr.cast::<CellData<V>>();
        // SAFETY: Converting the NonNull pointer to a reference is sound
        // because:
        // - The pointer is non-null, properly aligned, and dereferenceable
        //   (guaranteed by RawCellRef's type invariants)
        // - The pointee is properly initialized (RawCellRef's doc comment
        //   guarantees it points to an initialized CellData<V> for some V)
        // - The type `V` matches the actual value type (guaranteed by caller)
        // - Shared access is allowed
        // - The reference lifetime 'a is valid (tied to RawCellRef<'a>'s
        //   lifetime)
        unsafe { this.as_ref() }
    }

    /// Returns a raw pointer to the [`CellData`] instance.
    #[inline]
    pub(super) fn as_ptr(self) -> *const CellData<Erased> {
        self.ptr.as_ptr()
    }

    /// Returns the [`TypeId`] of the stored value.
    #[inline]
    pub fn value_type_id(self) -> TypeId {
        self.vtable().type_id()
    }

    /// Returns the [`core::any::type_name`] of the stored value.
    #[inline]
    pub fn value_type_name(self) -> &'static str {
        self.vtable().type_name()
    }

    /// Projects the stored value onto the view identified by `target`.
    ///
    /// Returns `Some` when `target` is the exact stored type, or — for
    /// polymorphic cells — any base type declared by the stored value's
    /// [`Upcast`] implementation. Returns `None` for every other `target`.
    #[inline]
    pub fn upcast(self, target: TypeId) -> Option<&'a (dyn Any + 'static)> {
        let vtable = self.vtable();
        // SAFETY:
        // 1. The vtable returned by `self.vtable()` is guaranteed to match
        //    the data in the `CellData`.
        unsafe { vtable.upcast_ref(self, target) }
    }

    /// Allocates an independent copy of the cell holding a clone of the
    /// stored value.
    #[inline]
    pub fn clone_cell(self) -> RawCell {
        let vtable = self.vtable();
        // SAFETY:
        // 1. The vtable returned by `self.vtable()` is guaranteed to match
        //    the data in the `CellData`.
        unsafe { vtable.clone_cell(self) }
    }
}

/// A lifetime-bound exclusive pointer to a [`CellData`], behaving like a
/// `&'a mut CellData<V>` for some unknown `V`.
///
/// Like a `&'a mut T`, it is possible to reborrow this reference to a shorter
/// lifetime; the borrow checker ensures the original longer lifetime is not
/// used while the shorter one exists.
#[repr(transparent)]
pub struct RawCellMut<'a> {
    /// Pointer to the inner cell data
    ///
    /// # Safety
    ///
    /// The following safety invariants are guaranteed to be upheld as long as
    /// this struct exists:
    ///
    /// 1. The pointer must have been created from a `Box<CellData<V>>` for
    ///    some `V` using `Box::into_raw`.
    /// 2. The pointer will point to the same `CellData<V>` for the entire
    ///    lifetime of this object.
    /// 3. The pointee is not accessed through any other pointer for the
    ///    lifetime `'a`.
    ptr: NonNull<CellData<Erased>>,

    /// Marker to tell the compiler that we should behave the same as a
    /// `&'a mut CellData<Erased>`
    _marker: core::marker::PhantomData<&'a mut CellData<Erased>>,
}

impl<'a> RawCellMut<'a> {
    /// Casts the [`RawCellMut`] to a mutable [`CellData<V>`] reference.
    ///
    /// # Safety
    ///
    /// The caller must ensure:
    ///
    /// 1. The type `V` matches the actual value type stored in the
    ///    [`CellData`].
    #[inline]
    pub(super) unsafe fn cast_inner_mut<V>(self) -> &'a mut CellData<V> {
        // Debug assertion to catch type mismatches in case of bugs
        debug_assert_eq!(self.as_ref().vtable().type_id(), TypeId::of::<V>());

        let mut this = self.ptr.cast::<CellData<V>>();
        // SAFETY: Converting the NonNull pointer to a mutable reference is
        // sound because:
        // - The pointer is non-null, properly aligned, and dereferenceable
        //   (guaranteed by RawCellMut's type invariants)
        // - The pointee is properly initialized
        // - The type `V` matches the actual value type (guaranteed by caller)
        // - Exclusive access for 'a is guaranteed by RawCellMut's type
        //   invariants
        unsafe { this.as_mut() }
    }

    /// Reborrows this exclusive reference as a shared [`RawCellRef`].
    #[inline]
    pub fn as_ref(&self) -> RawCellRef<'_> {
        RawCellRef {
            ptr: self.ptr,
            _marker: core::marker::PhantomData,
        }
    }

    /// Projects the stored value onto the mutable view identified by
    /// `target`.
    ///
    /// Consumes the exclusive reference; callers that need to keep using the
    /// [`RawCellMut`] afterwards should reborrow first.
    #[inline]
    pub fn upcast_mut(self, target: TypeId) -> Option<&'a mut (dyn Any + 'static)> {
        let vtable = self.as_ref().vtable();
        // SAFETY:
        // 1. The vtable returned by `self.as_ref().vtable()` is guaranteed to
        //    match the data in the `CellData`.
        unsafe { vtable.upcast_mut(self, target) }
    }
}

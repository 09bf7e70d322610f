//! Type-erased reference bindings.
//!
//! A [`RawBinding`] is the non-owning counterpart of
//! [`RawCell`](crate::cell::RawCell): instead of copying a value into managed
//! storage, it captures a pointer to a value that lives elsewhere, together
//! with the captured type's identity and a [`Mutability`] tag recording how
//! the capture was made. The whole wrapper is a small inline structure — no
//! allocation happens when creating, copying, or dropping a binding.
//!
//! # Safety Invariant
//!
//! The `ptr` field can only be set via [`RawBinding::bind_ref`] or
//! [`RawBinding::bind_mut`], which derive it from a live reference of the
//! type described by the vtable. The borrow checker ties the binding to the
//! referent's lifetime through the `'a` parameter, so the pointer is valid
//! and points to an initialized value of the vtable's type for the entire
//! lifetime of the binding. The tag is [`Mutability::Mutable`] iff the
//! capture was made from a `&mut` reference.
//!
//! What the raw layer does *not* track is aliasing: a `RawBinding` is `Copy`,
//! so two copies of a mutable capture can exist at once. The mutable accessor
//! is therefore `unsafe`; the safe wrapper types in the `dynany` crate
//! restrict their surface so that exclusivity is enforced by the borrow
//! checker.

use core::{any::TypeId, marker::PhantomData, ptr::NonNull};

use crate::{binding::vtable::BindingVtable, util::Erased};

/// How the referent of a [`RawBinding`] was captured.
///
/// A mutable capture is strictly stronger than a const one: every operation
/// permitted on a const capture is also permitted on a mutable capture, while
/// mutable access additionally requires the tag to be [`Mutable`].
///
/// [`Mutable`]: Mutability::Mutable
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub enum Mutability {
    /// The referent was captured from a shared (`&T`) reference.
    Const,
    /// The referent was captured from an exclusive (`&mut T`) reference.
    Mutable,
}

/// A bounded-size, non-owning capture of a reference to a value of some
/// erased type `T`.
///
/// The binding consists of a pointer to the referent, a vtable carrying the
/// captured type's identity, and a [`Mutability`] tag. Copying a binding
/// copies the wrapper only; the referent is never duplicated, and dropping a
/// binding never touches it.
#[derive(Clone, Copy)]
pub struct RawBinding<'a> {
    /// Pointer to the referent
    ///
    /// # Safety
    ///
    /// The following safety invariants are guaranteed to be upheld as long as
    /// this struct exists:
    ///
    /// 1. The pointer was derived from a live `&'a T` or `&'a mut T` where
    ///    `T` is the type described by `vtable`.
    /// 2. The referent stays valid and initialized for the whole lifetime
    ///    `'a`.
    /// 3. If `mutability` is [`Mutability::Mutable`], the pointer was derived
    ///    from a `&'a mut T`.
    ptr: NonNull<Erased>,
    /// Vtable carrying the captured type's identity
    vtable: &'static BindingVtable,
    /// How the referent was captured
    mutability: Mutability,
    /// Marker tying the binding to the referent's lifetime
    _marker: PhantomData<&'a Erased>,
}

impl<'a> RawBinding<'a> {
    /// Captures a shared reference, producing a binding tagged
    /// [`Mutability::Const`].
    #[inline]
    pub fn bind_ref<T: 'static>(value: &'a T) -> Self {
        Self {
            ptr: NonNull::from(value).cast::<Erased>(),
            vtable: BindingVtable::new::<T>(),
            mutability: Mutability::Const,
            _marker: PhantomData,
        }
    }

    /// Captures an exclusive reference, producing a binding tagged
    /// [`Mutability::Mutable`].
    ///
    /// The original `&'a mut T` is consumed by the borrow; whether the
    /// resulting binding may be used for mutable access is governed by the
    /// safety contract of [`downcast_mut_unchecked`].
    ///
    /// [`downcast_mut_unchecked`]: RawBinding::downcast_mut_unchecked
    #[inline]
    pub fn bind_mut<T: 'static>(value: &'a mut T) -> Self {
        Self {
            ptr: NonNull::from(value).cast::<Erased>(),
            vtable: BindingVtable::new::<T>(),
            mutability: Mutability::Mutable,
            _marker: PhantomData,
        }
    }

    /// Returns the [`TypeId`] of the captured type.
    #[inline]
    pub fn binding_type_id(self) -> TypeId {
        self.vtable.type_id()
    }

    /// Returns the [`core::any::type_name`] of the captured type.
    #[inline]
    pub fn binding_type_name(self) -> &'static str {
        self.vtable.type_name()
    }

    /// Returns how the referent was captured.
    #[inline]
    pub fn mutability(self) -> Mutability {
        self.mutability
    }

    /// Accesses the referent as a shared reference to the specified type.
    ///
    /// # Safety
    ///
    /// The caller must ensure:
    ///
    /// 1. The type `T` matches the captured type (can be verified by calling
    ///    [`binding_type_id`] first).
    /// 2. No exclusive reference to the referent derived from this binding or
    ///    a copy of it is live while the returned reference exists.
    ///
    /// [`binding_type_id`]: RawBinding::binding_type_id
    #[inline]
    pub unsafe fn downcast_unchecked<T: 'static>(self) -> &'a T {
        // Debug assertion to catch type mismatches in case of bugs
        debug_assert_eq!(self.binding_type_id(), TypeId::of::<T>());

        let ptr = self.ptr.cast::<T>();
        // SAFETY: The pointer is non-null, aligned, and points to a live,
        // initialized `T` for the lifetime 'a (type match guaranteed by the
        // caller, validity by the type invariants). Absence of conflicting
        // exclusive references is guaranteed by the caller.
        unsafe { ptr.as_ref() }
    }

    /// Accesses the referent as an exclusive reference to the specified type.
    ///
    /// # Safety
    ///
    /// The caller must ensure:
    ///
    /// 1. The type `T` matches the captured type.
    /// 2. The binding is tagged [`Mutability::Mutable`].
    /// 3. No other reference to the referent derived from this binding or a
    ///    copy of it is live while the returned reference exists.
    #[inline]
    pub unsafe fn downcast_mut_unchecked<T: 'static>(self) -> &'a mut T {
        // Debug assertions to catch misuse in case of bugs
        debug_assert_eq!(self.binding_type_id(), TypeId::of::<T>());
        debug_assert_eq!(self.mutability, Mutability::Mutable);

        let mut ptr = self.ptr.cast::<T>();
        // SAFETY: The pointer is non-null, aligned, and points to a live,
        // initialized `T` for the lifetime 'a. It was derived from a
        // `&'a mut T` (invariant 3 of the `ptr` field, via the Mutable tag
        // guaranteed by the caller), and the caller guarantees exclusivity.
        unsafe { ptr.as_mut() }
    }
}

//! The exclusive type-erased reference container.

use core::{any::TypeId, fmt};

use dynany_internals::RawBinding;

use crate::{any_ref::AnyRef, error::BadRefCast};

/// A non-owning, type-erased exclusive reference.
///
/// An `AnyMut` captures an existing `&mut` reference together with the
/// referent's type identity. Like the `&mut T` it was created from, it is
/// move-only: exclusive access to the referent flows through exactly one
/// `AnyMut` at a time, which is what makes the mutable accessors safe.
///
/// Shared access is available through [`get`](AnyMut::get) or by demoting to
/// an [`AnyRef`] with [`as_ref`](AnyMut::as_ref) (temporarily) or
/// [`into_ref`](AnyMut::into_ref) (permanently).
///
/// # Examples
///
/// ```
/// use dynany::AnyMut;
///
/// let mut number = 10i32;
/// let mut reference = AnyMut::new(&mut number);
///
/// *reference.get_mut::<i32>().unwrap() += 1;
/// assert_eq!(number, 11);
/// ```
pub struct AnyMut<'a> {
    /// The captured binding
    ///
    /// # Safety
    ///
    /// The following safety invariants are guaranteed to be upheld as long as
    /// this struct exists:
    ///
    /// 1. The binding is tagged [`Mutability::Mutable`] and was captured from
    ///    a live `&'a mut T` of the type it describes.
    /// 2. This `AnyMut` is the only access path to the referent for the
    ///    lifetime `'a`, apart from references borrowed from it through
    ///    `&self`/`&mut self` methods.
    ///
    /// [`Mutability::Mutable`]: dynany_internals::Mutability::Mutable
    raw: RawBinding<'a>,
}

impl<'a> AnyMut<'a> {
    /// Captures an exclusive reference.
    pub fn new<T: 'static>(value: &'a mut T) -> Self {
        Self {
            raw: RawBinding::bind_mut(value),
        }
    }

    /// Returns the [`TypeId`] of the captured type.
    pub fn type_id(&self) -> TypeId {
        self.raw.binding_type_id()
    }

    /// Returns the [`core::any::type_name`] of the captured type.
    pub fn type_name(&self) -> &'static str {
        self.raw.binding_type_name()
    }

    /// Returns a shared reference to the referent as type `T`, or `None` when
    /// `T` is not the captured type.
    ///
    /// The returned reference borrows this `AnyMut`, so no mutable access is
    /// possible while it is alive.
    pub fn get<T: 'static>(&self) -> Option<&T> {
        if self.raw.binding_type_id() == TypeId::of::<T>() {
            // SAFETY:
            // 1. The type was just checked.
            // 2. The returned reference is reborrowed to the `&self` lifetime,
            //    and invariant 2 of the `raw` field guarantees every exclusive
            //    reference to the referent is derived through `&mut self`,
            //    which cannot coexist with the `&self` borrow.
            Some(unsafe { self.raw.downcast_unchecked() })
        } else {
            None
        }
    }

    /// Returns an exclusive reference to the referent as type `T`, or `None`
    /// when `T` is not the captured type.
    pub fn get_mut<T: 'static>(&mut self) -> Option<&mut T> {
        if self.raw.binding_type_id() == TypeId::of::<T>() {
            // SAFETY:
            // 1. The type was just checked.
            // 2. The binding is tagged mutable by invariant 1 of the `raw`
            //    field.
            // 3. The returned reference is reborrowed to the `&mut self`
            //    lifetime, and invariant 2 of the `raw` field guarantees no
            //    other reference to the referent can coexist with that
            //    borrow.
            Some(unsafe { self.raw.downcast_mut_unchecked() })
        } else {
            None
        }
    }

    /// Returns a shared reference to the referent as type `T`.
    ///
    /// This is the [`Result`]-returning form of [`get`](AnyMut::get); the
    /// error records both the requested and the captured type name.
    pub fn cast<T: 'static>(&self) -> Result<&T, BadRefCast> {
        self.get().ok_or_else(|| {
            BadRefCast::new(core::any::type_name::<T>(), self.raw.binding_type_name())
        })
    }

    /// Returns an exclusive reference to the referent as type `T`.
    ///
    /// This is the [`Result`]-returning form of [`get_mut`](AnyMut::get_mut).
    pub fn cast_mut<T: 'static>(&mut self) -> Result<&mut T, BadRefCast> {
        let error = BadRefCast::new(core::any::type_name::<T>(), self.raw.binding_type_name());
        self.get_mut().ok_or(error)
    }

    /// Consumes the container, returning an exclusive reference to the
    /// referent for the full captured lifetime.
    pub fn into_mut<T: 'static>(self) -> Result<&'a mut T, BadRefCast> {
        if self.raw.binding_type_id() == TypeId::of::<T>() {
            // SAFETY:
            // 1. The type was just checked.
            // 2. The binding is tagged mutable by invariant 1 of the `raw`
            //    field.
            // 3. Consuming `self` transfers the exclusive access guaranteed
            //    by invariant 2 of the `raw` field to the returned reference.
            Ok(unsafe { self.raw.downcast_mut_unchecked() })
        } else {
            Err(BadRefCast::new(
                core::any::type_name::<T>(),
                self.raw.binding_type_name(),
            ))
        }
    }

    /// Temporarily demotes this container to a shared [`AnyRef`].
    ///
    /// The `AnyRef` (and every copy made of it) borrows this `AnyMut`, so no
    /// mutable access is possible until all of them are gone.
    pub fn as_ref(&self) -> AnyRef<'_> {
        // SAFETY:
        // 1. The returned `AnyRef` borrows `self`, and invariant 2 of the
        //    `raw` field guarantees every exclusive reference to the referent
        //    is derived through `&mut self`, which cannot coexist with that
        //    borrow.
        unsafe { AnyRef::from_raw(self.raw) }
    }

    /// Consumes the container, demoting it to a shared [`AnyRef`] for the
    /// full captured lifetime.
    ///
    /// The demotion is permanent: exclusive access to the referent is given
    /// up, and only shared access remains for the rest of the lifetime. The
    /// resulting `AnyRef` still reports [`is_mut`](AnyRef::is_mut) as `true`
    /// to record how the capture was originally made.
    pub fn into_ref(self) -> AnyRef<'a> {
        // SAFETY:
        // 1. Consuming `self` gives up the exclusive access guaranteed by
        //    invariant 2 of the `raw` field, so only shared access to the
        //    referent remains for the rest of the lifetime.
        unsafe { AnyRef::from_raw(self.raw) }
    }

    /// Replaces the capture with a different exclusive reference.
    ///
    /// The new referent may be of a different type. The previously captured
    /// reference is released.
    pub fn rebind<T: 'static>(&mut self, value: &'a mut T) {
        self.raw = RawBinding::bind_mut(value);
    }
}

impl fmt::Debug for AnyMut<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnyMut")
            .field("type", &self.type_name())
            .finish_non_exhaustive()
    }
}

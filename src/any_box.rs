//! The owning type-erased container.

use core::{any::TypeId, fmt, mem};

use dynany_internals::RawCell;

use crate::{Upcast, error::BadCast};

/// The type reported by [`AnyBox::type_id`] when the container is empty.
///
/// `Void` is uninhabited: no value of it can ever exist, so it cannot collide
/// with a type actually stored in a container.
///
/// # Examples
///
/// ```
/// use core::any::TypeId;
///
/// use dynany::{AnyBox, Void};
///
/// let container = AnyBox::empty();
/// assert_eq!(container.type_id(), TypeId::of::<Void>());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Void {}

/// An owning container for a single value of any clonable type.
///
/// The container takes a copy of the value on construction and owns it until
/// it is dropped, cleared, or overwritten. Cloning the container deep-copies
/// the stored value, so two containers never share storage.
///
/// Values stored through [`new`] or [`set`] can only be cast back to their
/// exact type. Values stored through [`new_polymorphic`] or
/// [`set_polymorphic`] can additionally be cast to any base type declared by
/// their [`Upcast`] implementation, which is usually generated with
/// [`impl_upcast!`](crate::impl_upcast).
///
/// # Examples
///
/// ```
/// use dynany::AnyBox;
///
/// let container = AnyBox::new(String::from("test message"));
/// assert_eq!(container.cast_ref::<String>().unwrap(), "test message");
/// assert!(container.downcast_ref::<i32>().is_none());
/// ```
///
/// [`new`]: AnyBox::new
/// [`set`]: AnyBox::set
/// [`new_polymorphic`]: AnyBox::new_polymorphic
/// [`set_polymorphic`]: AnyBox::set_polymorphic
pub struct AnyBox {
    /// The storage cell, or `None` when the container is empty
    raw: Option<RawCell>,
}

impl AnyBox {
    /// Creates an empty container.
    ///
    /// An empty container reports [`Void`] as its type and fails every cast.
    #[must_use]
    pub fn empty() -> Self {
        Self { raw: None }
    }

    /// Creates a container holding a copy of the given value.
    ///
    /// The value can only be cast back to its exact type. Use
    /// [`new_polymorphic`](AnyBox::new_polymorphic) to also allow casts to
    /// declared base types.
    #[must_use]
    pub fn new<V>(value: V) -> Self
    where
        V: Clone + 'static,
    {
        Self {
            raw: Some(RawCell::new_direct(value)),
        }
    }

    /// Creates a container holding a copy of the given value, which can be
    /// cast to any base type declared by its [`Upcast`] implementation.
    ///
    /// # Examples
    ///
    /// ```
    /// use dynany::{AnyBox, impl_upcast};
    ///
    /// #[derive(Clone)]
    /// struct Base {
    ///     tag: u32,
    /// }
    ///
    /// #[derive(Clone)]
    /// struct Derived {
    ///     base: Base,
    /// }
    ///
    /// impl_upcast!(Base);
    /// impl_upcast!(Derived => base: Base);
    ///
    /// let container = AnyBox::new_polymorphic(Derived {
    ///     base: Base { tag: 7 },
    /// });
    /// assert_eq!(container.cast_ref::<Base>().unwrap().tag, 7);
    /// ```
    #[must_use]
    pub fn new_polymorphic<V>(value: V) -> Self
    where
        V: Clone + Upcast,
    {
        Self {
            raw: Some(RawCell::new_polymorphic(value)),
        }
    }

    /// Returns `true` when the container holds no value.
    pub fn is_empty(&self) -> bool {
        self.raw.is_none()
    }

    /// Returns the [`TypeId`] of the stored value, or of [`Void`] when the
    /// container is empty.
    pub fn type_id(&self) -> TypeId {
        match &self.raw {
            Some(cell) => cell.as_ref().value_type_id(),
            None => TypeId::of::<Void>(),
        }
    }

    /// Returns the [`core::any::type_name`] of the stored value, or of
    /// [`Void`] when the container is empty.
    pub fn type_name(&self) -> &'static str {
        match &self.raw {
            Some(cell) => cell.as_ref().value_type_name(),
            None => core::any::type_name::<Void>(),
        }
    }

    /// Returns a shared reference to the stored value as type `T`, or `None`
    /// when the cast fails.
    ///
    /// The cast succeeds when `T` is the exact stored type, or — for values
    /// stored through the polymorphic constructors — a base type declared by
    /// the value's [`Upcast`] implementation.
    pub fn downcast_ref<T: 'static>(&self) -> Option<&T> {
        let cell = self.raw.as_ref()?;
        cell.as_ref().upcast(TypeId::of::<T>())?.downcast_ref::<T>()
    }

    /// Returns an exclusive reference to the stored value as type `T`, or
    /// `None` when the cast fails.
    ///
    /// Mutations made through a base-type view are visible through every
    /// other view of the value, since all views alias the same storage.
    pub fn downcast_mut<T: 'static>(&mut self) -> Option<&mut T> {
        let cell = self.raw.as_mut()?;
        cell.as_mut()
            .upcast_mut(TypeId::of::<T>())?
            .downcast_mut::<T>()
    }

    /// Returns a shared reference to the stored value as type `T`.
    ///
    /// This is the [`Result`]-returning form of
    /// [`downcast_ref`](AnyBox::downcast_ref); the error records both the
    /// requested and the stored type name.
    pub fn cast_ref<T: 'static>(&self) -> Result<&T, BadCast> {
        self.downcast_ref()
            .ok_or_else(|| BadCast::new(core::any::type_name::<T>(), self.type_name()))
    }

    /// Returns an exclusive reference to the stored value as type `T`.
    ///
    /// This is the [`Result`]-returning form of
    /// [`downcast_mut`](AnyBox::downcast_mut).
    pub fn cast_mut<T: 'static>(&mut self) -> Result<&mut T, BadCast> {
        // The error is built up front to appease the borrow checker: the
        // success path borrows `self` mutably for the full return lifetime.
        let error = BadCast::new(core::any::type_name::<T>(), self.type_name());
        self.downcast_mut().ok_or(error)
    }

    /// Returns a copy of the stored value as type `T`.
    pub fn cast<T>(&self) -> Result<T, BadCast>
    where
        T: Clone + 'static,
    {
        Ok(self.cast_ref::<T>()?.clone())
    }

    /// Returns a shared reference to the stored value without checking its
    /// type.
    ///
    /// # Safety
    ///
    /// The caller must ensure the container holds a value whose exact stored
    /// type is `T`. Base types declared through [`Upcast`] are *not*
    /// acceptable here; use [`downcast_ref`](AnyBox::downcast_ref) for those.
    pub unsafe fn downcast_ref_unchecked<T: 'static>(&self) -> &T {
        // SAFETY: The caller guarantees the container holds a value, so `raw`
        // is `Some`.
        let cell = unsafe { self.raw.as_ref().unwrap_unchecked() };
        // SAFETY: The caller guarantees the stored type is exactly `T`.
        unsafe { cell.as_ref().value_downcast_unchecked() }
    }

    /// Returns an exclusive reference to the stored value without checking
    /// its type.
    ///
    /// # Safety
    ///
    /// The caller must ensure the container holds a value whose exact stored
    /// type is `T`. Base types declared through [`Upcast`] are *not*
    /// acceptable here; use [`downcast_mut`](AnyBox::downcast_mut) for those.
    pub unsafe fn downcast_mut_unchecked<T: 'static>(&mut self) -> &mut T {
        // SAFETY: The caller guarantees the container holds a value, so `raw`
        // is `Some`.
        let cell = unsafe { self.raw.as_mut().unwrap_unchecked() };
        // SAFETY: The caller guarantees the stored type is exactly `T`.
        unsafe { cell.as_mut().value_downcast_mut_unchecked() }
    }

    /// Replaces the contents with a copy of the given value.
    ///
    /// The previous value, if any, is dropped.
    pub fn set<V>(&mut self, value: V)
    where
        V: Clone + 'static,
    {
        self.raw = Some(RawCell::new_direct(value));
    }

    /// Replaces the contents with a copy of the given value, which can be
    /// cast to any base type declared by its [`Upcast`] implementation.
    pub fn set_polymorphic<V>(&mut self, value: V)
    where
        V: Clone + Upcast,
    {
        self.raw = Some(RawCell::new_polymorphic(value));
    }

    /// Drops the stored value, leaving the container empty.
    pub fn clear(&mut self) {
        self.raw = None;
    }

    /// Exchanges the contents of two containers.
    ///
    /// Only the storage handles move, so the stored values keep their heap
    /// addresses: references obtained from one container before the swap
    /// would still point at the value now reachable through the other.
    pub fn swap(&mut self, other: &mut AnyBox) {
        mem::swap(&mut self.raw, &mut other.raw);
    }
}

impl Default for AnyBox {
    fn default() -> Self {
        Self::empty()
    }
}

impl Clone for AnyBox {
    /// Deep-copies the container: the clone holds an independent copy of the
    /// stored value in its own storage.
    fn clone(&self) -> Self {
        Self {
            raw: self.raw.as_ref().map(|cell| cell.as_ref().clone_cell()),
        }
    }
}

impl fmt::Debug for AnyBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnyBox")
            .field("type", &self.type_name())
            .finish_non_exhaustive()
    }
}

//! The shared type-erased reference container.

use core::{any::TypeId, fmt};

use dynany_internals::{Mutability, RawBinding};

use crate::{any_box::Void, error::BadRefCast};

/// A non-owning, type-erased shared reference.
///
/// An `AnyRef` captures an existing reference together with the referent's
/// type identity, or holds nothing at all. It never copies, owns, or drops
/// the referent, and it is `Copy`: every copy aliases the same referent.
///
/// The referent can be recovered with [`get`](AnyRef::get) or
/// [`cast`](AnyRef::cast), which succeed only for the exact captured type.
///
/// # Examples
///
/// ```
/// use dynany::AnyRef;
///
/// let number = 10i32;
/// let reference = AnyRef::new(&number);
///
/// assert_eq!(reference.get::<i32>(), Some(&10));
/// assert!(reference.get::<u32>().is_none());
/// ```
#[derive(Clone, Copy)]
pub struct AnyRef<'a> {
    /// The captured binding, or `None` when the container is empty
    ///
    /// # Safety
    ///
    /// The following safety invariants are guaranteed to be upheld as long as
    /// this struct exists:
    ///
    /// 1. If a binding is held, shared access to its referent is permitted
    ///    for the whole lifetime of this `AnyRef`: no exclusive reference
    ///    derived from the same capture can be live at the same time.
    raw: Option<RawBinding<'a>>,
}

impl<'a> AnyRef<'a> {
    /// Creates an empty container.
    ///
    /// An empty container reports [`Void`] as its type and fails every cast.
    #[must_use]
    pub fn empty() -> Self {
        Self { raw: None }
    }

    /// Captures a shared reference.
    pub fn new<T: 'static>(value: &'a T) -> Self {
        Self {
            raw: Some(RawBinding::bind_ref(value)),
        }
    }

    /// Wraps a raw binding.
    ///
    /// # Safety
    ///
    /// The caller must ensure:
    ///
    /// 1. Shared access to the binding's referent is permitted for the whole
    ///    lifetime of the returned `AnyRef`: no exclusive reference derived
    ///    from the same capture can be live at the same time.
    pub(crate) unsafe fn from_raw(raw: RawBinding<'a>) -> Self {
        Self { raw: Some(raw) }
    }

    /// Returns `true` when the container captures no reference.
    pub fn is_empty(self) -> bool {
        self.raw.is_none()
    }

    /// Returns the [`TypeId`] of the captured type, or of [`Void`] when the
    /// container is empty.
    pub fn type_id(self) -> TypeId {
        match self.raw {
            Some(raw) => raw.binding_type_id(),
            None => TypeId::of::<Void>(),
        }
    }

    /// Returns the [`core::any::type_name`] of the captured type, or of
    /// [`Void`] when the container is empty.
    pub fn type_name(self) -> &'static str {
        match self.raw {
            Some(raw) => raw.binding_type_name(),
            None => core::any::type_name::<Void>(),
        }
    }

    /// Returns `true` when the capture was originally made from an exclusive
    /// reference, i.e. this `AnyRef` was demoted from an
    /// [`AnyMut`](crate::AnyMut).
    ///
    /// The demotion is permanent either way: an `AnyRef` only ever hands out
    /// shared access.
    pub fn is_mut(self) -> bool {
        matches!(
            self.raw.map(RawBinding::mutability),
            Some(Mutability::Mutable)
        )
    }

    /// Returns a shared reference to the referent as type `T`, or `None` when
    /// `T` is not the captured type or the container is empty.
    ///
    /// The returned reference lives for the full captured lifetime and aliases
    /// the original referent.
    pub fn get<T: 'static>(self) -> Option<&'a T> {
        let raw = self.raw?;
        if raw.binding_type_id() == TypeId::of::<T>() {
            // SAFETY:
            // 1. The type was just checked.
            // 2. Shared access is permitted by invariant 1 of the `raw`
            //    field.
            Some(unsafe { raw.downcast_unchecked() })
        } else {
            None
        }
    }

    /// Returns a shared reference to the referent as type `T`.
    ///
    /// This is the [`Result`]-returning form of [`get`](AnyRef::get); the
    /// error records both the requested and the captured type name.
    pub fn cast<T: 'static>(self) -> Result<&'a T, BadRefCast> {
        self.get()
            .ok_or_else(|| BadRefCast::new(core::any::type_name::<T>(), self.type_name()))
    }

    /// Replaces the capture with a different shared reference.
    ///
    /// The new referent may be of a different type. Existing copies of this
    /// `AnyRef` are unaffected.
    pub fn rebind<T: 'static>(&mut self, value: &'a T) {
        self.raw = Some(RawBinding::bind_ref(value));
    }
}

impl Default for AnyRef<'_> {
    fn default() -> Self {
        Self::empty()
    }
}

impl fmt::Debug for AnyRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnyRef")
            .field("type", &self.type_name())
            .field("is_mut", &self.is_mut())
            .finish_non_exhaustive()
    }
}

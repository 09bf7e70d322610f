//! The trait through which a concrete type declares its compatible base
//! types.
//!
//! C++-style type erasure recovers base classes of a stored value by walking
//! the concrete type's inheritance graph at runtime. Rust has no inheritance,
//! so this crate models the relationship explicitly: a "derived" type embeds
//! its base values as fields and implements [`Upcast`] to project a reference
//! onto whichever embedded base a caller asks for, keyed by [`TypeId`].

use core::any::{Any, TypeId};

/// Declares the set of types a value can be viewed as.
///
/// A cell created through the polymorphic constructors consults this trait
/// when a cast requests a type other than the exact stored type. The
/// implementation must behave like a runtime walk of the type's declared
/// base graph:
///
/// - If `target` is `TypeId::of::<Self>()`, return a view of `self`.
/// - Otherwise, delegate to each declared base in declaration order and
///   return the first successful projection. This makes diamond shapes
///   (the same base reachable through two paths) resolve deterministically:
///   the first declared path wins.
/// - If no declared base matches, return `None`.
///
/// Implementations are expected to be generated by the `impl_upcast!` macro
/// in the `dynany` crate, which guarantees the contract above. Hand-written
/// implementations must uphold it themselves; in particular, both methods
/// must project onto the *same* set of types, and the returned reference
/// must point into `self` (the cast machinery relies on the projection
/// borrowing from the stored value, not from temporaries — the signatures
/// enforce this).
///
/// # Examples
///
/// ```
/// use core::any::{Any, TypeId};
///
/// use dynany_internals::upcast::Upcast;
///
/// struct Base {
///     a: i32,
/// }
///
/// impl Upcast for Base {
///     fn upcast(&self, target: TypeId) -> Option<&dyn Any> {
///         (target == TypeId::of::<Base>()).then_some(self as &dyn Any)
///     }
///
///     fn upcast_mut(&mut self, target: TypeId) -> Option<&mut dyn Any> {
///         (target == TypeId::of::<Base>()).then_some(self as &mut dyn Any)
///     }
/// }
///
/// struct Derived {
///     base: Base,
///     b: i32,
/// }
///
/// impl Upcast for Derived {
///     fn upcast(&self, target: TypeId) -> Option<&dyn Any> {
///         if target == TypeId::of::<Derived>() {
///             return Some(self);
///         }
///         self.base.upcast(target)
///     }
///
///     fn upcast_mut(&mut self, target: TypeId) -> Option<&mut dyn Any> {
///         if target == TypeId::of::<Derived>() {
///             return Some(self);
///         }
///         self.base.upcast_mut(target)
///     }
/// }
///
/// let derived = Derived {
///     base: Base { a: 1 },
///     b: 2,
/// };
/// let base: &Base = derived
///     .upcast(TypeId::of::<Base>())
///     .and_then(|any| any.downcast_ref())
///     .unwrap();
/// assert_eq!(base.a, 1);
/// ```
pub trait Upcast: 'static {
    /// Projects a shared reference onto the view of `self` identified by
    /// `target`, which may be `Self` itself or any transitively declared
    /// base.
    fn upcast(&self, target: TypeId) -> Option<&dyn Any>;

    /// Projects a mutable reference onto the view of `self` identified by
    /// `target`.
    ///
    /// Must succeed for exactly the same `target` values as
    /// [`upcast`](Upcast::upcast).
    fn upcast_mut(&mut self, target: TypeId) -> Option<&mut dyn Any>;
}

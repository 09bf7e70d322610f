//! Macro for declaring the base types of a value.

/// Declares the base types a value can be cast to when stored in a
/// polymorphic container.
///
/// The first form, `impl_upcast!(Ty)`, declares a type with no bases: it only
/// answers cast requests for `Ty` itself. The second form,
/// `impl_upcast!(Ty => field: Base, ...)`, additionally declares one base per
/// listed struct field. Cast requests are delegated to each base in
/// declaration order, so when the same type is reachable through several
/// fields, the first listed field wins.
///
/// Every listed base must itself implement [`Upcast`] (typically through this
/// macro), which makes the relation transitive: the bases of a base are
/// reachable as well.
///
/// [`Upcast`]: crate::Upcast
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
///     extra: &'static str,
/// }
///
/// impl_upcast!(Base);
/// impl_upcast!(Derived => base: Base);
///
/// let holder = AnyBox::new_polymorphic(Derived {
///     base: Base { tag: 7 },
///     extra: "payload",
/// });
/// assert_eq!(holder.downcast_ref::<Derived>().unwrap().extra, "payload");
/// assert_eq!(holder.downcast_ref::<Base>().unwrap().tag, 7);
/// ```
#[macro_export]
macro_rules! impl_upcast {
    ($ty:ty) => {
        impl $crate::Upcast for $ty {
            fn upcast(
                &self,
                target: ::core::any::TypeId,
            ) -> ::core::option::Option<&dyn ::core::any::Any> {
                if target == ::core::any::TypeId::of::<$ty>() {
                    return ::core::option::Option::Some(self);
                }
                ::core::option::Option::None
            }

            fn upcast_mut(
                &mut self,
                target: ::core::any::TypeId,
            ) -> ::core::option::Option<&mut dyn ::core::any::Any> {
                if target == ::core::any::TypeId::of::<$ty>() {
                    return ::core::option::Option::Some(self);
                }
                ::core::option::Option::None
            }
        }
    };
    ($ty:ty => $($field:ident: $base:ty),+ $(,)?) => {
        impl $crate::Upcast for $ty {
            fn upcast(
                &self,
                target: ::core::any::TypeId,
            ) -> ::core::option::Option<&dyn ::core::any::Any> {
                if target == ::core::any::TypeId::of::<$ty>() {
                    return ::core::option::Option::Some(self);
                }
                $(
                    if let ::core::option::Option::Some(value) =
                        <$base as $crate::Upcast>::upcast(&self.$field, target)
                    {
                        return ::core::option::Option::Some(value);
                    }
                )+
                ::core::option::Option::None
            }

            fn upcast_mut(
                &mut self,
                target: ::core::any::TypeId,
            ) -> ::core::option::Option<&mut dyn ::core::any::Any> {
                if target == ::core::any::TypeId::of::<$ty>() {
                    return ::core::option::Option::Some(self);
                }
                $(
                    if let ::core::option::Option::Some(value) =
                        <$base as $crate::Upcast>::upcast_mut(&mut self.$field, target)
                    {
                        return ::core::option::Option::Some(value);
                    }
                )+
                ::core::option::Option::None
            }
        }
    };
}

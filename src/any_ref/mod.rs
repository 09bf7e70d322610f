//! Non-owning type-erased reference containers.
//!
//! [`AnyRef`] and [`AnyMut`] capture an existing reference instead of copying
//! the value the way [`AnyBox`](crate::AnyBox) does. The split mirrors `&T`
//! versus `&mut T`: [`AnyRef`] is `Copy` and only hands out shared access,
//! while [`AnyMut`] is move-only and can hand out exclusive access. An
//! [`AnyMut`] can always be demoted to an [`AnyRef`], never the other way
//! around, and only [`AnyRef`] has an empty state.

mod mut_;
mod ref_;

pub use self::{mut_::AnyMut, ref_::AnyRef};

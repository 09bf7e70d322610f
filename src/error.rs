//! Errors returned by failed casts.
//!
//! Both error types are plain value types carrying only `&'static str` type
//! names, so they are `Copy` and can be formatted and compared without
//! allocation.

use core::fmt;

/// Error returned when casting the value held by an [`AnyBox`] fails.
///
/// A cast fails when the container is empty, or when the requested type is
/// neither the stored type nor one of its declared base types.
///
/// [`AnyBox`]: crate::AnyBox
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BadCast {
    /// Name of the type the cast requested
    requested: &'static str,
    /// Name of the type the container holds
    stored: &'static str,
}

impl BadCast {
    pub(crate) fn new(requested: &'static str, stored: &'static str) -> Self {
        Self { requested, stored }
    }

    /// Returns the name of the type the cast requested.
    pub fn requested_type(&self) -> &'static str {
        self.requested
    }

    /// Returns the name of the type the container holds.
    ///
    /// When the container was empty, this is the name of
    /// [`Void`](crate::Void).
    pub fn stored_type(&self) -> &'static str {
        self.stored
    }
}

impl fmt::Display for BadCast {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "invalid cast to `{}`: container holds a value of type `{}`",
            self.requested, self.stored
        )
    }
}

impl core::error::Error for BadCast {}

/// Error returned when casting the referent of an [`AnyRef`] or [`AnyMut`]
/// fails.
///
/// [`AnyRef`]: crate::AnyRef
/// [`AnyMut`]: crate::AnyMut
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BadRefCast {
    /// Name of the type the cast requested
    requested: &'static str,
    /// Name of the captured type
    captured: &'static str,
}

impl BadRefCast {
    pub(crate) fn new(requested: &'static str, captured: &'static str) -> Self {
        Self {
            requested,
            captured,
        }
    }

    /// Returns the name of the type the cast requested.
    pub fn requested_type(&self) -> &'static str {
        self.requested
    }

    /// Returns the name of the captured type.
    pub fn captured_type(&self) -> &'static str {
        self.captured
    }
}

impl fmt::Display for BadRefCast {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "invalid cast to `{}`: reference captures a value of type `{}`",
            self.requested, self.captured
        )
    }
}

impl core::error::Error for BadRefCast {}

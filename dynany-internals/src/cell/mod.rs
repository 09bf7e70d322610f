//! Module containing the owning erased-cell data structure

mod data;
mod raw;
mod vtable;

pub use self::raw::{RawCell, RawCellMut, RawCellRef};

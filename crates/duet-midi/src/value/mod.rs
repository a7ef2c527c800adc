//! Protocol-agnostic values.
//!
//! A value stores exactly one concrete domain and can be read in any other domain of
//! its family. Reading never mutates; a Fixed-stored value keeps its exact integer.
//!
//! | Family | Domains | Used by |
//! |---|---|---|
//! | [`Value7Bit16Bit`] | unit interval, 7-bit, 16-bit | note velocity |
//! | [`Value7Bit32Bit`] | unit interval, 7-bit, 32-bit | CC value, pressure |
//! | [`Value14Bit32Bit`] | unit interval, bipolar, 14-bit, 32-bit | pitch bend |
//!
//! Cross-domain equality compares in the narrower Fixed width present on either
//! side, converting a real-valued side to that width. It never pushes a Fixed side
//! through a real number. Because of that the relation is not transitive across
//! widths, and `Hash` feeds no value data to the hasher: events hash by their
//! other fields, and values alone all share one bucket.

mod validated;
mod value14_32;
mod value7_16;
mod value7_32;

pub use validated::Validated;
pub use value14_32::Value14Bit32Bit;
pub use value7_16::Value7Bit16Bit;
pub use value7_32::Value7Bit32Bit;

use crate::scale::Width;

/// The stored domain of a value.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Domain {
    /// Real, `0.0..=1.0`.
    UnitInterval,
    /// Real, `-1.0..=1.0`, `0.0` = center.
    BipolarUnitInterval,
    /// Unsigned integer, `0..=2^w - 1`.
    Fixed(Width),
}

/// Behaviour shared by every value family.
pub trait DomainValue: Copy {
    /// Domain the value is stored in.
    fn domain(&self) -> Domain;

    /// Same value with real-valued domains clamped to their legal range.
    ///
    /// Fixed domains are returned unchanged; their types already restrict range.
    fn clamped(self) -> Self;
}

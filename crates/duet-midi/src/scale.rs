//! Scaling between the unit interval, the bipolar unit interval and fixed-width
//! integer fields (7, 14, 16 and 32 bits).
//!
//! Two independent conversion paths exist and they are not required to agree:
//!
//! - **Via real**: fixed -> `f64` -> fixed, with round-half-away-from-zero. Lossless
//!   for every integer when source and destination have the same width.
//! - **Direct**: fixed -> fixed without a real intermediate. Widening uses the
//!   min-center-max bit replication of the MIDI 2.0 translation rules (min, center
//!   and max are preserved), narrowing truncates to the top bits. Narrowing a widened
//!   value always returns the original.

use midi2::prelude::*;

/// Bit width of a fixed-width MIDI field.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Width {
    Bits7,
    Bits14,
    Bits16,
    Bits32,
}

impl Width {
    #[inline]
    pub const fn bits(self) -> u32 {
        match self {
            Width::Bits7 => 7,
            Width::Bits14 => 14,
            Width::Bits16 => 16,
            Width::Bits32 => 32,
        }
    }

    /// Largest representable value, `2^bits - 1`.
    #[inline]
    pub const fn max(self) -> u32 {
        ((1u64 << self.bits()) - 1) as u32
    }

    /// Bipolar center, `2^(bits - 1)`.
    #[inline]
    pub const fn center(self) -> u32 {
        1 << (self.bits() - 1)
    }
}

#[inline]
fn clamp_unit(interval: f64) -> f64 {
    if interval.is_nan() {
        0.0
    } else {
        interval.clamp(0.0, 1.0)
    }
}

#[inline]
fn clamp_bipolar(interval: f64) -> f64 {
    if interval.is_nan() {
        0.0
    } else {
        interval.clamp(-1.0, 1.0)
    }
}

// ==================== Via real ====================

/// `value / (2^w - 1)`, clamped to `0.0..=1.0`.
#[inline]
pub fn unit_interval_from_fixed(value: u32, width: Width) -> f64 {
    (value as f64 / width.max() as f64).clamp(0.0, 1.0)
}

/// `round(interval * (2^w - 1))`, clamped to `0..=2^w - 1`. NaN maps to 0.
#[inline]
pub fn fixed_from_unit_interval(interval: f64, width: Width) -> u32 {
    let max = width.max() as f64;
    (clamp_unit(interval) * max).round().clamp(0.0, max) as u32
}

/// Bipolar reading of a fixed value split at `2^(w - 1)`.
///
/// The lower half maps onto `-1.0..0.0` with step `1 / center`, the upper half onto
/// `0.0..=1.0` with step `1 / (max - center)`. Center is exactly `0.0`, zero is
/// exactly `-1.0` and max is exactly `1.0`.
#[inline]
pub fn bipolar_from_fixed(value: u32, width: Width) -> f64 {
    let value = value.min(width.max());
    let center = width.center();
    match value.cmp(&center) {
        std::cmp::Ordering::Equal => 0.0,
        std::cmp::Ordering::Less => -((center - value) as f64 / center as f64),
        std::cmp::Ordering::Greater => (value - center) as f64 / (width.max() - center) as f64,
    }
}

/// Inverse of [`bipolar_from_fixed`]. Input is clamped to `-1.0..=1.0`, NaN maps to
/// center.
#[inline]
pub fn fixed_from_bipolar(interval: f64, width: Width) -> u32 {
    let interval = clamp_bipolar(interval);
    let center = width.center() as f64;
    let span = if interval < 0.0 {
        center
    } else {
        (width.max() - width.center()) as f64
    };
    (center + (interval * span).round()).clamp(0.0, width.max() as f64) as u32
}

#[inline]
pub fn unit_interval_from_bipolar(interval: f64) -> f64 {
    (clamp_bipolar(interval) + 1.0) / 2.0
}

#[inline]
pub fn bipolar_from_unit_interval(interval: f64) -> f64 {
    clamp_unit(interval) * 2.0 - 1.0
}

// ==================== Direct ====================

/// Widen `value` from `from` to `to` bits with min-center-max bit replication.
///
/// Values at or below the source center are shifted only; values above it have
/// their non-sign bits repeated into the added low bits so that max maps to max.
pub fn upscale(value: u32, from: Width, to: Width) -> u32 {
    debug_assert!(from.bits() <= to.bits());
    let value = value.min(from.max()) as u64;
    let scale_bits = to.bits() - from.bits();
    let mut shifted = value << scale_bits;
    if value <= from.center() as u64 {
        return shifted as u32;
    }

    let repeat_bits = from.bits() - 1;
    let mut repeat = value & ((1u64 << repeat_bits) - 1);
    if scale_bits > repeat_bits {
        repeat <<= scale_bits - repeat_bits;
    } else {
        repeat >>= repeat_bits - scale_bits;
    }
    while repeat != 0 {
        shifted |= repeat;
        repeat >>= repeat_bits;
    }
    shifted as u32
}

/// Narrow `value` from `from` to `to` bits by keeping the top `to` bits.
#[inline]
pub fn downscale(value: u32, from: Width, to: Width) -> u32 {
    debug_assert!(from.bits() >= to.bits());
    value.min(from.max()) >> (from.bits() - to.bits())
}

// ==================== Typed helpers ====================

#[inline]
pub(crate) fn u7_bits(value: u7) -> u32 {
    u8::from(value) as u32
}

#[inline]
pub(crate) fn u14_bits(value: u14) -> u32 {
    u16::from(value) as u32
}

#[inline]
pub fn unit_interval_from_7bit(value: u7) -> f64 {
    unit_interval_from_fixed(u7_bits(value), Width::Bits7)
}

#[inline]
pub fn unit_interval_from_14bit(value: u14) -> f64 {
    unit_interval_from_fixed(u14_bits(value), Width::Bits14)
}

#[inline]
pub fn unit_interval_from_16bit(value: u16) -> f64 {
    unit_interval_from_fixed(value as u32, Width::Bits16)
}

#[inline]
pub fn unit_interval_from_32bit(value: u32) -> f64 {
    unit_interval_from_fixed(value, Width::Bits32)
}

#[inline]
pub fn scaled_7bit(interval: f64) -> u7 {
    u7::new(fixed_from_unit_interval(interval, Width::Bits7) as u8)
}

#[inline]
pub fn scaled_14bit(interval: f64) -> u14 {
    u14::new(fixed_from_unit_interval(interval, Width::Bits14) as u16)
}

#[inline]
pub fn scaled_16bit(interval: f64) -> u16 {
    fixed_from_unit_interval(interval, Width::Bits16) as u16
}

#[inline]
pub fn scaled_32bit(interval: f64) -> u32 {
    fixed_from_unit_interval(interval, Width::Bits32)
}

#[inline]
pub fn bipolar_from_14bit(value: u14) -> f64 {
    bipolar_from_fixed(u14_bits(value), Width::Bits14)
}

#[inline]
pub fn bipolar_from_32bit(value: u32) -> f64 {
    bipolar_from_fixed(value, Width::Bits32)
}

#[inline]
pub fn scaled_14bit_from_bipolar(interval: f64) -> u14 {
    u14::new(fixed_from_bipolar(interval, Width::Bits14) as u16)
}

#[inline]
pub fn scaled_32bit_from_bipolar(interval: f64) -> u32 {
    fixed_from_bipolar(interval, Width::Bits32)
}

#[inline]
pub fn upscale_7_to_16(value: u7) -> u16 {
    upscale(u7_bits(value), Width::Bits7, Width::Bits16) as u16
}

#[inline]
pub fn upscale_7_to_32(value: u7) -> u32 {
    upscale(u7_bits(value), Width::Bits7, Width::Bits32)
}

#[inline]
pub fn upscale_14_to_32(value: u14) -> u32 {
    upscale(u14_bits(value), Width::Bits14, Width::Bits32)
}

#[inline]
pub fn downscale_16_to_7(value: u16) -> u7 {
    u7::new(downscale(value as u32, Width::Bits16, Width::Bits7) as u8)
}

#[inline]
pub fn downscale_32_to_7(value: u32) -> u7 {
    u7::new(downscale(value, Width::Bits32, Width::Bits7) as u8)
}

#[inline]
pub fn downscale_32_to_14(value: u32) -> u14 {
    u14::new(downscale(value, Width::Bits32, Width::Bits14) as u16)
}

use std::hash::{Hash, Hasher};

use midi2::prelude::*;

use super::{Domain, DomainValue};
use crate::scale::{self, Width};

/// 7-bit (MIDI 1.0) / 32-bit (MIDI 2.0) value, e.g. controller values and pressure.
#[derive(Clone, Copy, Debug)]
pub enum Value7Bit32Bit {
    /// Unit interval, scaled to the protocol in use.
    UnitInterval(f64),
    /// MIDI 1.0 value (0x00..=0x7F).
    Midi1(u7),
    /// MIDI 2.0 value (0x00000000..=0xFFFFFFFF).
    Midi2(u32),
}

impl Value7Bit32Bit {
    #[inline]
    pub fn unit_interval(self) -> f64 {
        match self {
            Self::UnitInterval(interval) => interval.clamp(0.0, 1.0),
            Self::Midi1(v) => scale::unit_interval_from_7bit(v),
            Self::Midi2(v) => scale::unit_interval_from_32bit(v),
        }
    }

    #[inline]
    pub fn midi1(self) -> u7 {
        match self {
            Self::UnitInterval(interval) => scale::scaled_7bit(interval),
            Self::Midi1(v) => v,
            Self::Midi2(v) => scale::downscale_32_to_7(v),
        }
    }

    #[inline]
    pub fn midi2(self) -> u32 {
        match self {
            Self::UnitInterval(interval) => scale::scaled_32bit(interval),
            Self::Midi1(v) => scale::upscale_7_to_32(v),
            Self::Midi2(v) => v,
        }
    }
}

impl DomainValue for Value7Bit32Bit {
    fn domain(&self) -> Domain {
        match self {
            Self::UnitInterval(_) => Domain::UnitInterval,
            Self::Midi1(_) => Domain::Fixed(Width::Bits7),
            Self::Midi2(_) => Domain::Fixed(Width::Bits32),
        }
    }

    fn clamped(self) -> Self {
        match self {
            Self::UnitInterval(interval) if interval.is_nan() => Self::UnitInterval(0.0),
            Self::UnitInterval(interval) => Self::UnitInterval(interval.clamp(0.0, 1.0)),
            fixed => fixed,
        }
    }
}

impl PartialEq for Value7Bit32Bit {
    fn eq(&self, other: &Self) -> bool {
        use Value7Bit32Bit::*;

        match (*self, *other) {
            (UnitInterval(a), UnitInterval(b)) => a == b,
            (Midi1(a), Midi1(b)) => a == b,
            (Midi2(a), Midi2(b)) => a == b,
            (UnitInterval(_), Midi1(b)) => self.midi1() == b,
            (Midi1(a), UnitInterval(_)) => a == other.midi1(),
            (UnitInterval(_), Midi2(b)) => self.midi2() == b,
            (Midi2(a), UnitInterval(_)) => a == other.midi2(),
            (Midi1(a), Midi2(_)) => a == other.midi1(),
            (Midi2(_), Midi1(b)) => self.midi1() == b,
        }
    }
}

impl Eq for Value7Bit32Bit {}

/// Feeds no value data to the hasher.
///
/// Equality spans domains and widths and is not transitive, so no projection of
/// the stored value is guaranteed to agree with it. Hashed containers stay correct
/// but fall back to equality checks among values that differ only here.
impl Hash for Value7Bit32Bit {
    fn hash<H: Hasher>(&self, _state: &mut H) {}
}

impl Default for Value7Bit32Bit {
    fn default() -> Self {
        Self::Midi1(u7::new(0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_midi1_upscale_reaches_full_range() {
        assert_eq!(Value7Bit32Bit::Midi1(u7::new(0)).midi2(), 0);
        assert_eq!(Value7Bit32Bit::Midi1(u7::new(64)).midi2(), 0x8000_0000);
        assert_eq!(Value7Bit32Bit::Midi1(u7::new(127)).midi2(), u32::MAX);
    }

    #[test]
    fn test_midi2_reads_back_exactly() {
        for v in [0u32, 1, 0x8000_0000, 0xDEAD_BEEF, u32::MAX] {
            assert_eq!(Value7Bit32Bit::Midi2(v).midi2(), v);
        }
    }

    #[test]
    fn test_cross_domain_equality() {
        assert_eq!(
            Value7Bit32Bit::Midi1(u7::new(127)),
            Value7Bit32Bit::UnitInterval(1.0)
        );
        assert_eq!(Value7Bit32Bit::Midi2(u32::MAX), Value7Bit32Bit::UnitInterval(1.0));
        assert_eq!(
            Value7Bit32Bit::Midi1(u7::new(11)),
            Value7Bit32Bit::Midi2(11 << 25)
        );
        assert_ne!(Value7Bit32Bit::UnitInterval(0.0), Value7Bit32Bit::Midi2(1));
    }

    #[test]
    fn test_cross_domain_equal_values_hash_alike() {
        use std::collections::HashSet;

        let real = Value7Bit32Bit::UnitInterval(0.3);
        let pairs = [
            (Value7Bit32Bit::Midi1(u7::new(11)), Value7Bit32Bit::Midi2(11 << 25)),
            (Value7Bit32Bit::Midi1(u7::new(11)), Value7Bit32Bit::Midi2((11 << 25) | 0xFF)),
            (real, Value7Bit32Bit::Midi1(real.midi1())),
            (real, Value7Bit32Bit::Midi2(real.midi2())),
        ];
        for (a, b) in pairs {
            assert_eq!(a, b);
            let set: HashSet<_> = [a, b].into_iter().collect();
            assert_eq!(set.len(), 1, "{a:?} and {b:?}");
        }
    }

    #[test]
    fn test_clamped() {
        assert_eq!(
            Value7Bit32Bit::UnitInterval(1.5).clamped(),
            Value7Bit32Bit::UnitInterval(1.0)
        );
        assert_eq!(
            Value7Bit32Bit::UnitInterval(f64::NAN).clamped(),
            Value7Bit32Bit::UnitInterval(0.0)
        );
    }
}

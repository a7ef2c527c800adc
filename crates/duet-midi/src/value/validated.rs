use super::DomainValue;

/// A value whose real-valued domains are always within range.
///
/// Construction and assignment both clamp, so events carrying a `Validated` never
/// hold a unit interval outside `0.0..=1.0` (or `-1.0..=1.0` when bipolar). NaN
/// becomes the domain's zero (unit) or center (bipolar).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub struct Validated<V: DomainValue> {
    value: V,
}

impl<V: DomainValue> Validated<V> {
    #[inline]
    pub fn new(value: V) -> Self {
        Self {
            value: value.clamped(),
        }
    }

    #[inline]
    pub fn get(&self) -> V {
        self.value
    }

    /// Replace the wrapped value, clamping it first.
    #[inline]
    pub fn set(&mut self, value: V) {
        self.value = value.clamped();
    }

    #[inline]
    pub fn into_inner(self) -> V {
        self.value
    }
}

impl<V: DomainValue> From<V> for Validated<V> {
    fn from(value: V) -> Self {
        Self::new(value)
    }
}

impl<V: DomainValue> std::ops::Deref for Validated<V> {
    type Target = V;

    fn deref(&self) -> &V {
        &self.value
    }
}

//! Lane bookkeeping for batched voice processing.
//!
//! A batch of `L` voices is stored as plain `[f32; L]` arrays and processed
//! with per-lane loops, which the compiler vectorizes for the common widths.
//! [`LaneMask`] plays the role of a SIMD movemask: one bit per lane, used to
//! record which lanes crossed a threshold and which lanes carry a real voice.

/// Default number of lanes per oscillator batch.
pub const DEFAULT_LANES: usize = 4;

/// Largest lane width a [`LaneMask`] can address.
pub const MAX_LANES: usize = 32;

/// One bit per lane.
///
/// # Example
///
/// ```rust
/// use polyvco_core::LaneMask;
///
/// let active = LaneMask::first(3);
/// let mut crossed = LaneMask::NONE;
/// crossed.insert(1);
/// crossed.insert(3);
///
/// let lanes: Vec<usize> = crossed.intersection(active).iter().collect();
/// assert_eq!(lanes, [1]);
/// assert_eq!(active.count(), 3);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct LaneMask(u32);

impl LaneMask {
    /// No lanes set.
    pub const NONE: Self = Self(0);

    /// Mask with the lowest `n` lanes set (saturates at [`MAX_LANES`]).
    #[inline]
    pub const fn first(n: usize) -> Self {
        if n >= MAX_LANES {
            Self(u32::MAX)
        } else {
            Self((1u32 << n) - 1)
        }
    }

    /// Mask with a single lane set. Lanes at or beyond [`MAX_LANES`] give an empty mask.
    #[inline]
    pub const fn lane(lane: usize) -> Self {
        if lane >= MAX_LANES {
            Self::NONE
        } else {
            Self(1 << lane)
        }
    }

    /// Sets `lane`.
    #[inline]
    pub fn insert(&mut self, lane: usize) {
        *self = self.union(Self::lane(lane));
    }

    /// Lanes set in both masks.
    #[inline]
    pub const fn intersection(self, other: Self) -> Self {
        Self(self.0 & other.0)
    }

    /// Lanes set in either mask.
    #[inline]
    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    /// Returns `true` if no lane is set.
    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Number of lanes set.
    #[inline]
    pub const fn count(self) -> usize {
        self.0.count_ones() as usize
    }

    /// Iterates over set lane indices in ascending order.
    pub fn iter(self) -> impl Iterator<Item = usize> {
        let mut bits = self.0;
        core::iter::from_fn(move || {
            if bits == 0 {
                return None;
            }
            let lane = bits.trailing_zeros() as usize;
            bits &= bits - 1;
            Some(lane)
        })
    }
}

/// A vector holding `value` in `lane` and zero everywhere else.
///
/// This is the lane-array form of masking a splatted value with a one-hot
/// movemask, used to route a per-lane jump into a shared corrector.
#[inline]
pub fn one_hot<const L: usize>(lane: usize, value: f32) -> [f32; L] {
    let mut out = [0.0; L];
    if let Some(slot) = out.get_mut(lane) {
        *slot = value;
    }
    out
}

//! Parameter introspection for host-facing controls.
//!
//! Hosts discover a module's knobs through the [`ParameterInfo`] trait: each
//! parameter is described by a [`ParamDescriptor`] carrying its display name,
//! range, default, unit and a stable [`ParamId`]. Setting a value always
//! clamps into the descriptor's range; the audio path never sees an
//! out-of-range control.
//!
//! # Example
//!
//! ```rust
//! use polyvco_core::{ParamDescriptor, ParamId, ParamUnit, ParameterInfo};
//!
//! struct Tune {
//!     semitones: f32,
//! }
//!
//! impl ParameterInfo for Tune {
//!     fn param_count(&self) -> usize { 1 }
//!
//!     fn param_info(&self, index: usize) -> Option<ParamDescriptor> {
//!         match index {
//!             0 => Some(ParamDescriptor::new("Tune", "Tune", ParamUnit::Semitones, -12.0, 12.0, 0.0)
//!                 .with_id(ParamId(10), "tune")),
//!             _ => None,
//!         }
//!     }
//!
//!     fn get_param(&self, index: usize) -> f32 {
//!         if index == 0 { self.semitones } else { 0.0 }
//!     }
//!
//!     fn set_param(&mut self, index: usize, value: f32) {
//!         if let Some(desc) = self.param_info(index) {
//!             self.semitones = desc.clamp(value);
//!         }
//!     }
//! }
//!
//! let mut tune = Tune { semitones: 0.0 };
//! tune.set_param(0, 40.0);
//! assert_eq!(tune.get_param(0), 12.0);
//! assert_eq!(tune.find_param_by_name("tune"), Some(0));
//! ```

/// Stable parameter identifier that survives reordering.
///
/// Once assigned, a `ParamId` must never change for a given parameter; presets
/// and host automation refer to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ParamId(pub u32);

/// Unit type for parameter display and formatting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParamUnit {
    /// Pitch offset in semitones.
    Semitones,
    /// Dimensionless depth or ratio.
    Ratio,
}

impl ParamUnit {
    /// Returns the unit suffix string for display.
    ///
    /// ```rust
    /// use polyvco_core::ParamUnit;
    ///
    /// assert_eq!(ParamUnit::Semitones.suffix(), " st");
    /// assert_eq!(ParamUnit::Ratio.suffix(), "");
    /// ```
    pub const fn suffix(&self) -> &'static str {
        match self {
            ParamUnit::Semitones => " st",
            ParamUnit::Ratio => "",
        }
    }
}

/// Describes a single parameter's metadata for display and validation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParamDescriptor {
    /// Full parameter name for display (e.g., "Pulse width").
    pub name: &'static str,
    /// Short name for narrow displays, max 8 characters.
    pub short_name: &'static str,
    /// Unit for formatting.
    pub unit: ParamUnit,
    /// Minimum allowed value.
    pub min: f32,
    /// Maximum allowed value.
    pub max: f32,
    /// Value on construction and reset.
    pub default: f32,
    /// Stable numeric ID. Default: `ParamId(0)` (unassigned).
    pub id: ParamId,
    /// Stable string ID used as the preset key. Default: `""`.
    pub string_id: &'static str,
}

impl ParamDescriptor {
    /// Creates a descriptor with an unassigned ID.
    pub const fn new(
        name: &'static str,
        short_name: &'static str,
        unit: ParamUnit,
        min: f32,
        max: f32,
        default: f32,
    ) -> Self {
        Self {
            name,
            short_name,
            unit,
            min,
            max,
            default,
            id: ParamId(0),
            string_id: "",
        }
    }

    /// Sets the stable parameter ID and string ID.
    pub const fn with_id(mut self, id: ParamId, string_id: &'static str) -> Self {
        self.id = id;
        self.string_id = string_id;
        self
    }

    /// Clamps a value to this parameter's valid range. NaN maps to the default.
    ///
    /// ```rust
    /// use polyvco_core::{ParamDescriptor, ParamUnit};
    ///
    /// let desc = ParamDescriptor::new("Fine", "Fine", ParamUnit::Semitones, -1.0, 1.0, 0.0);
    /// assert_eq!(desc.clamp(0.5), 0.5);
    /// assert_eq!(desc.clamp(-3.0), -1.0);
    /// assert_eq!(desc.clamp(f32::NAN), 0.0);
    /// ```
    #[inline]
    pub fn clamp(&self, value: f32) -> f32 {
        if value.is_nan() {
            self.default
        } else if value < self.min {
            self.min
        } else if value > self.max {
            self.max
        } else {
            value
        }
    }

    /// Returns `true` if `value` lies inside `[min, max]`.
    #[inline]
    pub fn contains(&self, value: f32) -> bool {
        value >= self.min && value <= self.max
    }

    /// Converts a plain value to the normalized range `[0, 1]`.
    #[inline]
    pub fn normalize(&self, value: f32) -> f32 {
        let range = self.max - self.min;
        if range == 0.0 {
            return 0.0;
        }
        (self.clamp(value) - self.min) / range
    }

    /// Converts a normalized value back to the plain range.
    #[inline]
    pub fn denormalize(&self, normalized: f32) -> f32 {
        self.min + normalized.clamp(0.0, 1.0) * (self.max - self.min)
    }
}

/// Trait for modules that expose introspectable parameters.
///
/// Parameters are addressed by zero-based index, stable for the lifetime of
/// the instance.
pub trait ParameterInfo {
    /// Number of parameters; valid indices are `0..param_count()`.
    fn param_count(&self) -> usize;

    /// Descriptor for the parameter at `index`, or `None` when out of range.
    fn param_info(&self, index: usize) -> Option<ParamDescriptor>;

    /// Current value of the parameter at `index` (0.0 when out of range).
    fn get_param(&self, index: usize) -> f32;

    /// Sets the parameter at `index`, clamped to its range. Out-of-range
    /// indices are ignored.
    fn set_param(&mut self, index: usize, value: f32);

    /// Finds a parameter index by name, short name or string ID (case-insensitive).
    fn find_param_by_name(&self, name: &str) -> Option<usize> {
        (0..self.param_count()).find(|&i| {
            self.param_info(i).is_some_and(|d| {
                d.name.eq_ignore_ascii_case(name)
                    || d.short_name.eq_ignore_ascii_case(name)
                    || d.string_id.eq_ignore_ascii_case(name)
            })
        })
    }

    /// Finds a parameter index by its stable [`ParamId`].
    fn param_index_by_id(&self, id: ParamId) -> Option<usize> {
        (0..self.param_count()).find(|&i| self.param_info(i).is_some_and(|d| d.id == id))
    }
}

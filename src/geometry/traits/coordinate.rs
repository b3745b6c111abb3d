//! Coordinate scalar traits for spatial computations.
//!
//! This module provides the scalar abstraction used throughout the crate:
//! the [`CoordinateScalar`] trait alias consolidating the requirements a
//! floating-point type must satisfy to be used as a point coordinate, and
//! the supporting [`FiniteCheck`] trait for validating coordinate values
//! (no NaN or infinity).
//!
//! Both `f32` and `f64` are supported out of the box; other floating-point
//! types can opt in by implementing the supporting traits.

use num_traits::Float;
use serde::{Serialize, de::DeserializeOwned};
use std::fmt::{Debug, Display};

// =============================================================================
// SUPPORTING TRAITS
// =============================================================================

/// Helper trait for checking finiteness of coordinates.
///
/// This trait provides a unified interface for checking whether a numeric
/// value is finite (not NaN or infinite). It is used to validate coordinate
/// and configuration values before they enter geometric computations.
///
/// # Examples
///
/// ```
/// use point_isolation::geometry::traits::coordinate::FiniteCheck;
///
/// assert!(3.14f64.is_finite_generic());
/// assert!(!f64::NAN.is_finite_generic());
/// assert!(!f64::INFINITY.is_finite_generic());
/// ```
pub trait FiniteCheck {
    /// Returns true if the value is finite (not NaN or infinite).
    fn is_finite_generic(&self) -> bool;
}

// Unified macro for implementing FiniteCheck for floating-point types
macro_rules! impl_finite_check {
    (float: $($t:ty),*) => {
        $(
            impl FiniteCheck for $t {
                #[inline(always)]
                fn is_finite_generic(&self) -> bool {
                    self.is_finite()
                }
            }
        )*
    };
}

impl_finite_check!(float: f32, f64);

// =============================================================================
// COORDINATE SCALAR
// =============================================================================

/// Trait alias for the scalar type requirements of point coordinates.
///
/// This alias captures all the trait bounds required for a scalar type `T`
/// to be used as a coordinate: floating-point arithmetic ([`Float`]),
/// finiteness validation ([`FiniteCheck`]), display formatting (coordinate
/// values appear in error messages), and serde support (coordinate ranges
/// are part of the serializable configuration).
///
/// # Examples
///
/// ```
/// use point_isolation::geometry::traits::coordinate::CoordinateScalar;
///
/// fn midpoint<T: CoordinateScalar>(a: T, b: T) -> T {
///     (a + b) / (T::one() + T::one())
/// }
///
/// assert_eq!(midpoint(1.0f64, 3.0f64), 2.0);
/// ```
pub trait CoordinateScalar:
    Float + FiniteCheck + Default + Debug + Display + Serialize + DeserializeOwned + 'static
{
}

impl CoordinateScalar for f32 {}

impl CoordinateScalar for f64 {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finite_check_accepts_finite_values() {
        assert!(0.0f64.is_finite_generic());
        assert!(f64::MAX.is_finite_generic());
        assert!(f64::MIN.is_finite_generic());
        assert!((-42.5f32).is_finite_generic());
    }

    #[test]
    fn finite_check_rejects_non_finite_values() {
        assert!(!f64::NAN.is_finite_generic());
        assert!(!f64::INFINITY.is_finite_generic());
        assert!(!f64::NEG_INFINITY.is_finite_generic());
        assert!(!f32::NAN.is_finite_generic());
    }
}

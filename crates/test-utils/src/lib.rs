//! Test support for the lotes-web crates.
//!
//! - [`fixtures`]: subdivision documents carrying interest points in each
//!   encoding the overlay tolerates, plus the shared coordinates they use.
//! - [`generators`]: synthetic interest points and waypoints in bulk.
//! - `assert_approx_eq!` / `assert_coords_approx_eq!` for float comparisons.
//!
//! ```ignore
//! use test_utils::{assert_coords_approx_eq, coords, subdivision};
//!
//! let doc = subdivision::end_to_end();
//! ```

pub mod fixtures;
pub mod generators;

pub use fixtures::*;
pub use generators::*;

/// Assert two numbers differ by at most `epsilon`.
///
/// NaN on either side always fails.
///
/// ```ignore
/// assert_approx_eq!(-25.70001, -25.70, 1e-4);
/// ```
#[macro_export]
macro_rules! assert_approx_eq {
    ($left:expr, $right:expr, $epsilon:expr $(,)?) => {{
        let (left, right, epsilon) = ($left as f64, $right as f64, $epsilon as f64);
        let diff = (left - right).abs();
        if !(diff <= epsilon) {
            panic!(
                "assertion failed: {} ≈ {}\n  left: {:?}\n right: {:?}\n  diff: {:?} (epsilon {:?})",
                stringify!($left),
                stringify!($right),
                left,
                right,
                diff,
                epsilon
            );
        }
    }};
}

/// Assert two `(lat, lng)` pairs match component-wise within `epsilon`.
///
/// ```ignore
/// assert_coords_approx_eq!((v.lat, v.lng), (coords::ORIGIN.0, coords::ORIGIN.1), 1e-12);
/// ```
#[macro_export]
macro_rules! assert_coords_approx_eq {
    (($lat1:expr, $lng1:expr), ($lat2:expr, $lng2:expr), $epsilon:expr $(,)?) => {{
        $crate::assert_approx_eq!($lat1, $lat2, $epsilon);
        $crate::assert_approx_eq!($lng1, $lng2, $epsilon);
    }};
}

#[cfg(test)]
mod tests {
    #[test]
    fn test_within_epsilon() {
        assert_approx_eq!(-25.70001, -25.70, 1e-4);
        assert_approx_eq!(0.0, 0.0, 0.0);
    }

    #[test]
    #[should_panic(expected = "assertion failed")]
    fn test_outside_epsilon() {
        assert_approx_eq!(-56.2, -56.24, 1e-3);
    }

    #[test]
    #[should_panic(expected = "assertion failed")]
    fn test_nan_never_matches() {
        assert_approx_eq!(f64::NAN, f64::NAN, 1.0);
    }

    #[test]
    fn test_coordinate_pairs() {
        assert_coords_approx_eq!((-25.70001, -56.24001), (-25.70, -56.24), 1e-3);
    }
}

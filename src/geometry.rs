//! Planar helpers for the approach-local frame.
//!
//! The local frame has `x` pointing right of the reference heading and `y`
//! pointing along it, so a bearing of 0 degrees is straight ahead.

use nalgebra::Vector2;
use num_traits::Float;

/// A distance (in meters) and bearing (in degrees) from a reference point.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Polar {
    pub distance_m: f64,
    pub bearing_deg: f64,
}

impl Polar {
    pub fn new(distance_m: f64, bearing_deg: f64) -> Self {
        Self {
            distance_m,
            bearing_deg,
        }
    }
}

/// Convert a local offset to a distance and bearing in (-180, 180].
pub fn cart_to_polar(offset: Vector2<f64>) -> Polar {
    let distance_m = offset.x.hypot(offset.y);
    let bearing_deg = offset.x.atan2(offset.y).to_degrees();
    Polar::new(distance_m, bearing_deg)
}

/// Convert a distance and bearing back to a local offset.
pub fn polar_to_cart(polar: Polar) -> Vector2<f64> {
    let bearing = polar.bearing_deg.to_radians();
    Vector2::new(
        polar.distance_m * bearing.sin(),
        polar.distance_m * bearing.cos(),
    )
}

/// Wrap an angle in degrees to [0, 360).
pub fn wrap_360(deg: f64) -> f64 {
    let mut wrapped = deg % 360.0;
    if wrapped < 0.0 {
        wrapped += 360.0;
    }
    // Tiny negative inputs round up to exactly 360
    if wrapped >= 360.0 {
        0.0
    } else {
        wrapped
    }
}

/// Wrap an angle in degrees to [-180, 180).
pub fn wrap_180(deg: f64) -> f64 {
    wrap_360(deg + 180.0) - 180.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rstest::rstest;

    #[test]
    fn polar_bearing_is_measured_from_forward_axis() {
        let ahead = cart_to_polar(Vector2::new(0.0, 10.0));
        assert_relative_eq!(ahead.distance_m, 10.0);
        assert_relative_eq!(ahead.bearing_deg, 0.0);

        let right = cart_to_polar(Vector2::new(5.0, 0.0));
        assert_relative_eq!(right.bearing_deg, 90.0);

        let behind_left = cart_to_polar(Vector2::new(-75.0, -200.0));
        assert_relative_eq!(behind_left.distance_m, 213.600_093_633, epsilon = 1e-6);
        assert_relative_eq!(behind_left.bearing_deg, -159.443_954_780, epsilon = 1e-6);
    }

    #[test]
    fn origin_has_zero_bearing() {
        let origin = cart_to_polar(Vector2::zeros());
        assert_eq!(origin, Polar::new(0.0, 0.0));
    }

    #[test]
    fn polar_to_cart_points_along_bearing() {
        let v = polar_to_cart(Polar::new(100.0, 270.0));
        assert_relative_eq!(v.x, -100.0, epsilon = 1e-9);
        assert_relative_eq!(v.y, 0.0, epsilon = 1e-9);
    }

    quickcheck::quickcheck! {
        // integer centimeters keep quickcheck away from awkward f64 values
        fn polar_roundtrip(x_cm: i32, y_cm: i32) -> () {
            let offset = Vector2::new(f64::from(x_cm) / 100.0, f64::from(y_cm) / 100.0);
            let back = polar_to_cart(cart_to_polar(offset));
            assert_relative_eq!(back.x, offset.x, epsilon = 1e-6, max_relative = 1e-9);
            assert_relative_eq!(back.y, offset.y, epsilon = 1e-6, max_relative = 1e-9);
        }
    }

    #[rstest]
    #[case(0.0, 0.0)]
    #[case(360.0, 0.0)]
    #[case(-69.5, 290.5)]
    #[case(725.0, 5.0)]
    #[case(-1e-15, 0.0)]
    fn wraps_to_full_circle(#[case] input: f64, #[case] expected: f64) {
        assert_relative_eq!(wrap_360(input), expected, epsilon = 1e-9);
    }

    #[rstest]
    #[case(0.0, 0.0)]
    #[case(190.0, -170.0)]
    #[case(-190.0, 170.0)]
    #[case(180.0, -180.0)]
    #[case(350.0, -10.0)]
    fn wraps_to_half_circle(#[case] input: f64, #[case] expected: f64) {
        assert_relative_eq!(wrap_180(input), expected, epsilon = 1e-9);
    }
}

//! WGS84 geodesic solutions.
//!
//! [`direct`] projects a point along an azimuth and [`inverse`] finds the
//! course and distance between two points, both using Vincenty's iterative
//! formulae on the WGS84 ellipsoid.

use crate::geometry::{wrap_180, wrap_360};
use num_traits::Float;

/// WGS84 semi-major axis (in meters).
pub const SEMI_MAJOR_AXIS: f64 = 6_378_137.0;

/// WGS84 flattening.
pub const FLATTENING: f64 = 1.0 / 298.257_223_563;

/// WGS84 semi-minor axis (in meters).
pub const SEMI_MINOR_AXIS: f64 = SEMI_MAJOR_AXIS * (1.0 - FLATTENING);

const MAX_ITERATIONS: usize = 200;
const TOLERANCE: f64 = 1e-12;

/// A geodetic position in degrees.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct LatLon {
    pub latitude_deg: f64,
    pub longitude_deg: f64,
}

impl LatLon {
    pub fn new(latitude_deg: f64, longitude_deg: f64) -> Self {
        Self {
            latitude_deg,
            longitude_deg,
        }
    }
}

/// The solution to the direct problem.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Direct {
    /// The projected position.
    pub position: LatLon,

    /// Azimuth (in degrees) from the projected position back to the start.
    pub back_azimuth_deg: f64,
}

/// The solution to the inverse problem.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Inverse {
    /// Initial course (in degrees) from the first point to the second.
    pub course_deg: f64,

    /// Course (in degrees) from the second point back to the first.
    pub reverse_course_deg: f64,

    /// Distance along the ellipsoid (in meters).
    pub distance_m: f64,
}

/// Terms shared by the direct and inverse series expansions.
struct Series {
    a: f64,
    b: f64,
}

impl Series {
    fn new(cos_sq_alpha: f64) -> Self {
        let u_sq = cos_sq_alpha * (SEMI_MAJOR_AXIS.powi(2) - SEMI_MINOR_AXIS.powi(2))
            / SEMI_MINOR_AXIS.powi(2);
        let a = 1.0 + u_sq / 16384.0 * (4096.0 + u_sq * (-768.0 + u_sq * (320.0 - 175.0 * u_sq)));
        let b = u_sq / 1024.0 * (256.0 + u_sq * (-128.0 + u_sq * (74.0 - 47.0 * u_sq)));
        Self { a, b }
    }

    fn delta_sigma(&self, sin_sigma: f64, cos_sigma: f64, cos_2sigma_m: f64) -> f64 {
        let b = self.b;
        let cos_sq_2sigma_m = cos_2sigma_m * cos_2sigma_m;
        b * sin_sigma
            * (cos_2sigma_m
                + b / 4.0
                    * (cos_sigma * (-1.0 + 2.0 * cos_sq_2sigma_m)
                        - b / 6.0
                            * cos_2sigma_m
                            * (-3.0 + 4.0 * sin_sigma * sin_sigma)
                            * (-3.0 + 4.0 * cos_sq_2sigma_m)))
    }
}

fn lambda_correction(cos_sq_alpha: f64) -> f64 {
    FLATTENING / 16.0 * cos_sq_alpha * (4.0 + FLATTENING * (4.0 - 3.0 * cos_sq_alpha))
}

fn reduced_latitude(latitude_deg: f64) -> f64 {
    ((1.0 - FLATTENING) * latitude_deg.to_radians().tan()).atan()
}

/// Project `distance_m` meters from `from` along `azimuth_deg`.
pub fn direct(from: LatLon, azimuth_deg: f64, distance_m: f64) -> Direct {
    let alpha1 = azimuth_deg.to_radians();
    let (sin_alpha1, cos_alpha1) = alpha1.sin_cos();

    let u1 = reduced_latitude(from.latitude_deg);
    let (sin_u1, cos_u1) = u1.sin_cos();

    let sigma1 = u1.tan().atan2(cos_alpha1);
    let sin_alpha = cos_u1 * sin_alpha1;
    let cos_sq_alpha = 1.0 - sin_alpha * sin_alpha;
    let series = Series::new(cos_sq_alpha);

    let sigma0 = distance_m / (SEMI_MINOR_AXIS * series.a);
    let mut sigma = sigma0;
    let mut cos_2sigma_m;
    let mut iterations = 0;
    loop {
        cos_2sigma_m = (2.0 * sigma1 + sigma).cos();
        let (sin_sigma, cos_sigma) = sigma.sin_cos();

        let previous = sigma;
        sigma = sigma0 + series.delta_sigma(sin_sigma, cos_sigma, cos_2sigma_m);

        iterations += 1;
        if (sigma - previous).abs() < TOLERANCE || iterations == MAX_ITERATIONS {
            break;
        }
    }
    let (sin_sigma, cos_sigma) = sigma.sin_cos();

    let tmp = sin_u1 * sin_sigma - cos_u1 * cos_sigma * cos_alpha1;
    let latitude = (sin_u1 * cos_sigma + cos_u1 * sin_sigma * cos_alpha1)
        .atan2((1.0 - FLATTENING) * (sin_alpha * sin_alpha + tmp * tmp).sqrt());
    let lambda = (sin_sigma * sin_alpha1).atan2(cos_u1 * cos_sigma - sin_u1 * sin_sigma * cos_alpha1);

    let c = lambda_correction(cos_sq_alpha);
    let l = lambda
        - (1.0 - c)
            * FLATTENING
            * sin_alpha
            * (sigma
                + c * sin_sigma
                    * (cos_2sigma_m + c * cos_sigma * (-1.0 + 2.0 * cos_2sigma_m * cos_2sigma_m)));

    let alpha2 = sin_alpha.atan2(-tmp);

    Direct {
        position: LatLon::new(
            latitude.to_degrees(),
            wrap_180(from.longitude_deg + l.to_degrees()),
        ),
        back_azimuth_deg: wrap_360(alpha2.to_degrees() + 180.0),
    }
}

/// Solve for the course and distance from `from` to `to`.
///
/// Coincident points report a zero course and distance. Nearly antipodal
/// points may not converge, in which case the last iterate is used.
pub fn inverse(from: LatLon, to: LatLon) -> Inverse {
    let l = (to.longitude_deg - from.longitude_deg).to_radians();
    let (sin_u1, cos_u1) = reduced_latitude(from.latitude_deg).sin_cos();
    let (sin_u2, cos_u2) = reduced_latitude(to.latitude_deg).sin_cos();

    let mut lambda = l;
    let mut iterations = 0;
    let (mut sin_lambda, mut cos_lambda);
    let (mut sin_sigma, mut cos_sigma, mut sigma);
    let (mut cos_sq_alpha, mut cos_2sigma_m);
    loop {
        (sin_lambda, cos_lambda) = lambda.sin_cos();

        let cross = cos_u1 * sin_u2 - sin_u1 * cos_u2 * cos_lambda;
        sin_sigma = ((cos_u2 * sin_lambda).powi(2) + cross * cross).sqrt();
        if sin_sigma == 0.0 {
            return Inverse {
                course_deg: 0.0,
                reverse_course_deg: 0.0,
                distance_m: 0.0,
            };
        }

        cos_sigma = sin_u1 * sin_u2 + cos_u1 * cos_u2 * cos_lambda;
        sigma = sin_sigma.atan2(cos_sigma);

        let sin_alpha = cos_u1 * cos_u2 * sin_lambda / sin_sigma;
        cos_sq_alpha = 1.0 - sin_alpha * sin_alpha;

        // Equatorial lines have no meaningful sigma_m
        cos_2sigma_m = if cos_sq_alpha != 0.0 {
            cos_sigma - 2.0 * sin_u1 * sin_u2 / cos_sq_alpha
        } else {
            0.0
        };

        let c = lambda_correction(cos_sq_alpha);
        let previous = lambda;
        lambda = l
            + (1.0 - c)
                * FLATTENING
                * sin_alpha
                * (sigma
                    + c * sin_sigma
                        * (cos_2sigma_m
                            + c * cos_sigma * (-1.0 + 2.0 * cos_2sigma_m * cos_2sigma_m)));

        iterations += 1;
        if (lambda - previous).abs() < TOLERANCE || iterations == MAX_ITERATIONS {
            break;
        }
    }

    let series = Series::new(cos_sq_alpha);
    let distance_m = SEMI_MINOR_AXIS
        * series.a
        * (sigma - series.delta_sigma(sin_sigma, cos_sigma, cos_2sigma_m));

    let alpha1 = (cos_u2 * sin_lambda).atan2(cos_u1 * sin_u2 - sin_u1 * cos_u2 * cos_lambda);
    let alpha2 = (cos_u1 * sin_lambda).atan2(-sin_u1 * cos_u2 + cos_u1 * sin_u2 * cos_lambda);

    Inverse {
        course_deg: wrap_360(alpha1.to_degrees()),
        reverse_course_deg: wrap_360(alpha2.to_degrees() + 180.0),
        distance_m,
    }
}

//! Analytic line of sight test, against the Earth center.
use crate::{error::Error, prelude::Vector3};

use nalgebra::MatrixXx3;

/// Closest approach ratio above which the segment is considered clear.
const LOS_THRESHOLD: f64 = 0.99;

/// Returns true when `a` and `b` see each other.
///
/// The segment [a, b] is parametrized by its closest approach to the
/// origin `rat = (O - a).(b - a) / |b - a|²`: the Earth does not block
/// the segment when that approach lies behind `a` or almost at `b`.
/// Coincident points always see each other.
pub fn line_of_sight(a: &Vector3<f64>, b: &Vector3<f64>) -> bool {
    let ab = b - a;
    let norm2 = ab.norm_squared();

    if norm2 == 0.0 {
        return true;
    }

    let rat = (-a).dot(&ab) / norm2;
    rat > LOS_THRESHOLD || rat < 0.0
}

/// [line_of_sight] applied row by row. Both tables must have the same number of rows.
pub fn line_of_sight_batch(a: &MatrixXx3<f64>, b: &MatrixXx3<f64>) -> Result<Vec<bool>, Error> {
    if a.nrows() != b.nrows() {
        return Err(Error::ShapeMismatch {
            expected: a.nrows(),
            got: b.nrows(),
        });
    }

    Ok(a.row_iter()
        .zip(b.row_iter())
        .map(|(ra, rb)| line_of_sight(&ra.transpose(), &rb.transpose()))
        .collect())
}

//! Planar geometry over landmarks.

use cmas_core::Landmark;

/// Unsigned angle at vertex `b` between rays `b→a` and `b→c`, in degrees.
///
/// Uses `atan2(|cross|, dot)`, so the result is always in `[0, 180]` and
/// stays accurate near 0° and 180° where an `acos` of the cosine would not.
pub fn angle(a: &Landmark, b: &Landmark, c: &Landmark) -> f64 {
    let (abx, aby) = (a.x - b.x, a.y - b.y);
    let (cbx, cby) = (c.x - b.x, c.y - b.y);

    let dot = abx * cbx + aby * cby;
    let cross = abx * cby - aby * cbx;

    cross.abs().atan2(dot).to_degrees()
}

/// Planar distance between two landmarks.
pub fn euclidean(p: &Landmark, q: &Landmark) -> f64 {
    (q.x - p.x).hypot(q.y - p.y)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lm(x: f64, y: f64) -> Landmark {
        Landmark::new(x, y)
    }

    #[test]
    fn straight_arm_is_180() {
        let angle = angle(&lm(0.0, 0.0), &lm(0.5, 0.0), &lm(1.0, 0.0));
        assert!((angle - 180.0).abs() < 1e-9);
    }

    #[test]
    fn right_angle_is_90_either_way_round() {
        let a = angle(&lm(0.0, 0.0), &lm(0.5, 0.0), &lm(0.5, 0.5));
        let b = angle(&lm(0.5, 0.5), &lm(0.5, 0.0), &lm(0.0, 0.0));
        assert!((a - 90.0).abs() < 1e-9);
        assert!((b - 90.0).abs() < 1e-9);
    }

    #[test]
    fn folded_arm_is_near_zero() {
        let angle = angle(&lm(1.0, 0.0), &lm(0.0, 0.0), &lm(1.0, 1e-6));
        assert!(angle < 1e-3);
    }

    #[test]
    fn degenerate_ray_is_zero() {
        assert_eq!(angle(&lm(0.3, 0.3), &lm(0.3, 0.3), &lm(0.9, 0.1)), 0.0);
    }

    #[test]
    fn euclidean_is_planar() {
        let mut p = lm(0.0, 0.0);
        p.z = Some(5.0);
        assert!((euclidean(&p, &lm(0.3, 0.4)) - 0.5).abs() < 1e-12);
    }
}

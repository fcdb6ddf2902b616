use crate::*;

/// Euclidean distance between two points.
pub fn distance(a: &Vec3, b: &Vec3) -> Meters {
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| (x - y) * (x - y))
        .sum::<f64>()
        .sqrt()
}

/// Whether the segment `a → b` passes through the sphere at `center`.
///
/// Projects the center onto the segment, clamps the projection to the
/// segment's extent, and compares the remaining gap with the radius.
pub fn intersects(a: &Vec3, b: &Vec3, center: &Vec3, radius: Meters) -> bool {
    let ab = [b[0] - a[0], b[1] - a[1], b[2] - a[2]];
    let ac = [center[0] - a[0], center[1] - a[1], center[2] - a[2]];
    let len2 = ab.iter().map(|x| x * x).sum::<f64>();
    let t = if len2 > 0.0 {
        (ab.iter().zip(ac.iter()).map(|(x, y)| x * y).sum::<f64>() / len2).clamp(0.0, 1.0)
    } else {
        0.0
    };
    let closest = [a[0] + t * ab[0], a[1] + t * ab[1], a[2] + t * ab[2]];
    distance(&closest, center) <= radius
}

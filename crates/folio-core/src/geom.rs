#![forbid(unsafe_code)]

//! Geometry primitives shared by the layout engines.
//!
//! Screen space: x grows to the right, y grows downwards. Angles are in degrees, measured
//! clockwise from the positive x axis (so `-90` points up).

pub type Unit = euclid::UnknownUnit;

pub type Point = euclid::Point2D<f64, Unit>;
pub type Vector = euclid::Vector2D<f64, Unit>;
pub type Size = euclid::Size2D<f64, Unit>;
pub type Rect = euclid::Rect<f64, Unit>;
pub type Box2D = euclid::Box2D<f64, Unit>;

pub fn point(x: f64, y: f64) -> Point {
    euclid::point2(x, y)
}

pub fn vector(x: f64, y: f64) -> Vector {
    euclid::vec2(x, y)
}

/// Axis-aligned box from its min corner and size.
pub fn rect(x: f64, y: f64, width: f64, height: f64) -> Box2D {
    Box2D::new(point(x, y), point(x + width, y + height))
}

/// Axis-aligned box of the given size centered on `center`.
pub fn centered_rect(center: Point, width: f64, height: f64) -> Box2D {
    rect(center.x - width / 2.0, center.y - height / 2.0, width, height)
}

pub fn polar_point(origin: Point, radius: f64, angle_deg: f64) -> Point {
    let a = angle_deg.to_radians();
    point(origin.x + radius * a.cos(), origin.y + radius * a.sin())
}

/// `f64::clamp` that tolerates `lo > hi` (the lower bound wins) and never panics.
pub fn clamp(v: f64, lo: f64, hi: f64) -> f64 {
    if hi < lo {
        return lo;
    }
    v.max(lo).min(hi)
}

/// Open-interval overlap: touching intervals do not overlap.
pub fn intervals_overlap(a_start: f64, a_end: f64, b_start: f64, b_end: f64) -> bool {
    a_start < b_end && b_start < a_end
}

/// True when `a` and `b` are closer than `gap` on both axes (with `gap = 0` this is plain
/// interior overlap; touching edges do not count).
pub fn boxes_overlap(a: &Box2D, b: &Box2D, gap: f64) -> bool {
    intervals_overlap(a.min.x - gap, a.max.x + gap, b.min.x, b.max.x)
        && intervals_overlap(a.min.y - gap, a.max.y + gap, b.min.y, b.max.y)
}

/// Area of the intersection of `a` grown by `gap` on every side with `b`.
pub fn inflated_overlap_area(a: &Box2D, b: &Box2D, gap: f64) -> f64 {
    let a = a.inflate(gap, gap);
    let w = a.max.x.min(b.max.x) - a.min.x.max(b.min.x);
    let h = a.max.y.min(b.max.y) - a.min.y.max(b.min.y);
    if w <= 0.0 || h <= 0.0 { 0.0 } else { w * h }
}

/// Distance from `p` to the closest point of `b` (0 when `p` is inside).
pub fn box_distance(b: &Box2D, p: Point) -> f64 {
    let dx = (b.min.x - p.x).max(0.0).max(p.x - b.max.x);
    let dy = (b.min.y - p.y).max(0.0).max(p.y - b.max.y);
    dx.hypot(dy)
}

/// How far `b` reaches into the disk of `radius` around `center` (0 when disjoint).
pub fn disk_penetration(b: &Box2D, center: Point, radius: f64) -> f64 {
    (radius - box_distance(b, center)).max(0.0)
}

/// How far `b` sticks out of `bounds`, summed over all four sides.
pub fn containment_excess(b: &Box2D, bounds: &Box2D) -> f64 {
    (bounds.min.x - b.min.x).max(0.0)
        + (b.max.x - bounds.max.x).max(0.0)
        + (bounds.min.y - b.min.y).max(0.0)
        + (b.max.y - bounds.max.y).max(0.0)
}

pub fn union_all(boxes: impl IntoIterator<Item = Box2D>) -> Option<Box2D> {
    boxes.into_iter().reduce(|a, b| a.union(&b))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn polar_point_follows_screen_orientation() {
        let o = point(100.0, 100.0);
        let up = polar_point(o, 10.0, -90.0);
        assert!((up.x - 100.0).abs() < 1e-9);
        assert!((up.y - 90.0).abs() < 1e-9);
        let down = polar_point(o, 10.0, 90.0);
        assert!((down.y - 110.0).abs() < 1e-9);
        let right = polar_point(o, 10.0, 0.0);
        assert!((right.x - 110.0).abs() < 1e-9);
    }

    #[test]
    fn clamp_prefers_lower_bound_when_inverted() {
        assert_eq!(clamp(5.0, 0.0, 10.0), 5.0);
        assert_eq!(clamp(-1.0, 0.0, 10.0), 0.0);
        assert_eq!(clamp(11.0, 0.0, 10.0), 10.0);
        assert_eq!(clamp(3.0, 8.0, 2.0), 8.0);
    }

    #[test]
    fn touching_intervals_do_not_overlap() {
        assert!(!intervals_overlap(0.0, 10.0, 10.0, 20.0));
        assert!(intervals_overlap(0.0, 10.0, 9.5, 20.0));
    }

    #[test]
    fn boxes_overlap_honors_gap() {
        let a = rect(0.0, 0.0, 10.0, 10.0);
        let b = rect(15.0, 0.0, 10.0, 10.0);
        assert!(!boxes_overlap(&a, &b, 0.0));
        assert!(!boxes_overlap(&a, &b, 5.0));
        assert!(boxes_overlap(&a, &b, 6.0));
        assert!(boxes_overlap(&b, &a, 6.0));

        let below = rect(0.0, 14.0, 10.0, 10.0);
        assert!(!boxes_overlap(&a, &below, 4.0));
        assert!(boxes_overlap(&a, &below, 4.5));
        assert!(boxes_overlap(&below, &a, 4.5));
    }

    #[test]
    fn disk_penetration_is_zero_outside_radius() {
        let b = rect(20.0, -5.0, 10.0, 10.0);
        assert_eq!(disk_penetration(&b, point(0.0, 0.0), 15.0), 0.0);
        assert!((disk_penetration(&b, point(0.0, 0.0), 25.0) - 5.0).abs() < 1e-9);
    }

    #[test]
    fn containment_excess_sums_all_sides() {
        let bounds = rect(0.0, 0.0, 100.0, 100.0);
        assert_eq!(containment_excess(&rect(10.0, 10.0, 10.0, 10.0), &bounds), 0.0);
        assert_eq!(containment_excess(&rect(-5.0, 95.0, 10.0, 10.0), &bounds), 10.0);
    }
}

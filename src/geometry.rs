//! Geometric primitives of the sweep: sites, output vertices, circles through three sites and
//! the parabolas of the beach line.
//!
//! The sweep line moves towards increasing y. Each processed site `p` lies above it, and its
//! parabola is the set of points equidistant from `p` and the sweep line.

use std::cmp::Ordering;

/// Relative tolerance used when comparing a predicted event against the sweep line.
pub const EPSILON: f64 = 1e-9;

/// An input site of the diagram. It is ordered in lexicographic order, first by y, then by x,
/// which is the order in which the sweep line reaches the sites.
#[derive(PartialEq, Eq, Clone, Copy, Hash, Default)]
pub struct Site {
    pub x: i32,
    pub y: i32,
}
impl Site {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}
impl From<(i32, i32)> for Site {
    fn from((x, y): (i32, i32)) -> Self {
        Self { x, y }
    }
}
impl std::fmt::Debug for Site {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Site").field(&self.x).field(&self.y).finish()
    }
}
impl PartialOrd for Site {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
impl Ord for Site {
    fn cmp(&self, other: &Self) -> Ordering {
        self.y.cmp(&other.y).then(self.x.cmp(&other.x))
    }
}

/// A vertex of the diagram, rounded to the integer grid.
#[derive(PartialEq, Eq, PartialOrd, Ord, Clone, Copy, Hash, Default)]
pub struct Vertex {
    pub x: i32,
    pub y: i32,
}
impl Vertex {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Round a point to the nearest vertex, with halves rounded away from zero.
    ///
    /// Coordinates beyond the range of `i32` saturate to `i32::MIN` or `i32::MAX`.
    pub fn round(x: f64, y: f64) -> Self {
        Self {
            x: x.round() as i32,
            y: y.round() as i32,
        }
    }
}
impl std::fmt::Debug for Vertex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Vertex").field(&self.x).field(&self.y).finish()
    }
}

/// An axis-aligned rectangle, with inclusive bounds.
///
/// The sweep itself never clips against it. It is carried along so that consumers of the
/// vertices can clip the diagram later.
#[derive(PartialEq, Eq, Clone, Copy, Debug, Default)]
pub struct Rect {
    pub min_x: i32,
    pub min_y: i32,
    pub max_x: i32,
    pub max_y: i32,
}
impl Rect {
    pub const fn new(min_x: i32, min_y: i32, max_x: i32, max_y: i32) -> Self {
        Self {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }

    /// The smallest rectangle containing all the sites. Empty input gives the zero rectangle.
    pub fn enclosing(sites: &[Site]) -> Self {
        let Some(first) = sites.first() else {
            return Self::default();
        };

        sites.iter().fold(
            Self::new(first.x, first.y, first.x, first.y),
            |r, s| Self {
                min_x: r.min_x.min(s.x),
                min_y: r.min_y.min(s.y),
                max_x: r.max_x.max(s.x),
                max_y: r.max_y.max(s.y),
            },
        )
    }

    pub fn contains(&self, v: Vertex) -> bool {
        (self.min_x..=self.max_x).contains(&v.x) && (self.min_y..=self.max_y).contains(&v.y)
    }
}

/// A circle through three sites.
#[derive(PartialEq, Clone, Copy, Debug)]
pub struct Circle {
    pub x: f64,
    pub y: f64,
    pub radius: f64,
}
impl Circle {
    /// The circle through `a`, `b` and `c`, or `None` if they are collinear (including when two
    /// of them coincide).
    pub fn through(a: Site, b: Site, c: Site) -> Option<Self> {
        let (x, y) = circumcenter(a, b, c)?;
        Some(Self {
            x,
            y,
            radius: dist((x, y), b),
        })
    }

    /// The y of the lowest point of the circle, where the sweep line leaves it.
    pub fn bottom(&self) -> f64 {
        self.y + self.radius
    }

    pub fn center(&self) -> Vertex {
        Vertex::round(self.x, self.y)
    }

    /// Check if [`Circle::center`] is exact up to rounding, that is, the center does not
    /// saturate.
    pub fn center_fits(&self) -> bool {
        let range = i32::MIN as f64..=i32::MAX as f64;
        range.contains(&self.x.round()) && range.contains(&self.y.round())
    }

    /// Check if both circles have the same center, up to `tolerance`.
    pub fn same_center(&self, other: &Circle, tolerance: f64) -> bool {
        (self.x - other.x).abs() <= tolerance && (self.y - other.y).abs() <= tolerance
    }
}

/// Twice the signed area of the triangle `abc`, computed exactly.
///
/// With y growing towards the sweep direction, it is positive when the breakpoints between
/// the consecutive arcs of `a`, `b` and `c` (in this left-to-right order) move towards each
/// other.
///
/// The differences of two `i32` need 33 bits, so their products are taken in `i128`.
pub fn turn(a: Site, b: Site, c: Site) -> i128 {
    let (abx, aby) = (b.x as i128 - a.x as i128, b.y as i128 - a.y as i128);
    let (bcx, bcy) = (c.x as i128 - b.x as i128, c.y as i128 - b.y as i128);
    abx * bcy - aby * bcx
}

/// Predict the circle event of three consecutive arcs, with sites `a`, `b` and `c` from left
/// to right, while the sweep line is at `sweep`.
///
/// Returns the circle and the sweep coordinate at which the middle arc disappears, or `None`
/// if the arcs never converge: collinear sites, repeated sites, breakpoints moving apart, or a
/// circle already passed by the sweep line.
pub fn circle_event(a: Site, b: Site, c: Site, sweep: f64) -> Option<(Circle, f64)> {
    if turn(a, b, c) <= 0 {
        return None;
    }

    let circle = Circle::through(a, b, c)?;
    let key = circle.bottom();
    if !key.is_finite() || key < sweep - tolerance(sweep) {
        return None;
    }

    // An event within rounding distance of the sweep line is happening right now.
    Some((circle, key.max(sweep)))
}

/// The tolerance for comparisons against the sweep coordinate.
pub fn tolerance(sweep: f64) -> f64 {
    EPSILON * (1.0 + sweep.abs())
}

/// The y of the parabola of `site` at `x`, or `None` if the site is on the sweep line (the
/// parabola degenerates to a vertical ray).
pub fn parabola_y(site: Site, x: f64, sweep: f64) -> Option<f64> {
    let (px, py) = (site.x as f64, site.y as f64);
    if py == sweep {
        return None;
    }

    let dx = x - px;
    Some((dx * dx + py * py - sweep * sweep) / (2.0 * (py - sweep)))
}

/// The x of the breakpoint between the arc of `left` and the arc of `right` to its right.
pub fn breakpoint_x(left: Site, right: Site, sweep: f64) -> f64 {
    let (px, py) = (left.x as f64, left.y as f64);
    let (qx, qy) = (right.x as f64, right.y as f64);

    match (py == sweep, qy == sweep) {
        (true, true) => return (px + qx) / 2.0,
        // a site on the sweep line is still a vertical ray
        (true, false) => return px,
        (false, true) => return qx,
        (false, false) => {}
    }

    if py == qy {
        return (px + qx) / 2.0;
    }

    // Solve y_left(x) = y_right(x), a quadratic a*x^2 + b*x + c = 0.
    let dp = 2.0 * (py - sweep);
    let dq = 2.0 * (qy - sweep);

    let a = 1.0 / dp - 1.0 / dq;
    let b = -2.0 * (px / dp - qx / dq);
    let c = (px * px + py * py - sweep * sweep) / dp - (qx * qx + qy * qy - sweep * sweep) / dq;

    let s = (b * b - 4.0 * a * c).max(0.0).sqrt();
    let x1 = (-b - s) / (2.0 * a);
    let x2 = (-b + s) / (2.0 * a);

    // The parabola of the site nearer to the sweep line is the narrower one, and is on top
    // between the two roots.
    if py > qy {
        x1.max(x2)
    } else {
        x1.min(x2)
    }
}

/// Finds the circumcenter of the triangle formed by the points `a`, `b`, and `c`.
fn circumcenter(a: Site, b: Site, c: Site) -> Option<(f64, f64)> {
    let (ax, ay) = (a.x as f64, a.y as f64);
    let (bx, by) = (b.x as f64, b.y as f64);
    let (cx, cy) = (c.x as f64, c.y as f64);

    let d = 2.0 * (ax * (by - cy) + bx * (cy - ay) + cx * (ay - by));
    if d == 0.0 {
        return None;
    }

    let ux = (ax * ax + ay * ay) * (by - cy)
        + (bx * bx + by * by) * (cy - ay)
        + (cx * cx + cy * cy) * (ay - by);
    let uy = (ax * ax + ay * ay) * (cx - bx)
        + (bx * bx + by * by) * (ax - cx)
        + (cx * cx + cy * cy) * (bx - ax);

    Some((ux / d, uy / d))
}

pub(crate) fn dist(p: (f64, f64), s: Site) -> f64 {
    let dx = p.0 - s.x as f64;
    let dy = p.1 - s.y as f64;
    (dx * dx + dy * dy).sqrt()
}

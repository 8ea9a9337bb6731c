//! Universes of discourse and the membership function shapes sampled over them.
//!
//! A [`Universe`] is a strictly increasing, fixed-length discretization of a
//! closed interval. Membership functions are evaluated pointwise and always
//! land in `[0, 1]`; zero-width ramps behave as steps so that shoulders such
//! as `trapezoid(0, 0, 10, 15)` never divide by zero.

// used to print out readable forms of a shape
use std::fmt;

use crate::error::{AtmoError, Result};

// grid points closer than this to the upper bound count as lying on it
const GRID_EPSILON: f64 = 1e-9;
// upper bound on the samples of a grid universe
const MAX_POINTS: f64 = 1_000_000.0;

// ------------- Universe -------------
#[derive(Debug, Clone, PartialEq)]
pub struct Universe {
    points: Vec<f64>,
}

impl Universe {
    /// Evenly spaced points `min, min + step, ...` up to and including `max`
    /// when `max` lies on the grid.
    pub fn new(min: f64, max: f64, step: f64) -> Result<Self> {
        if !(min.is_finite() && max.is_finite() && step.is_finite()) {
            return Err(AtmoError::InvalidUniverse {
                message: format!("non-finite bounds [{min}, {max}] step {step}"),
            });
        }
        if step <= 0.0 {
            return Err(AtmoError::InvalidUniverse {
                message: format!("step must be positive, got {step}"),
            });
        }
        if max <= min {
            return Err(AtmoError::InvalidUniverse {
                message: format!("empty interval [{min}, {max}]"),
            });
        }
        let count = ((max - min) / step + GRID_EPSILON).floor() + 1.0;
        if !count.is_finite() || count > MAX_POINTS {
            return Err(AtmoError::InvalidUniverse {
                message: format!("step {step} over [{min}, {max}] yields too many points"),
            });
        }
        if count < 2.0 {
            return Err(AtmoError::InvalidUniverse {
                message: format!("step {step} is wider than [{min}, {max}]"),
            });
        }
        let count = count as usize;
        let points = (0..count).map(|i| min + i as f64 * step).collect();
        Ok(Self { points })
    }
    /// Custom spacing. The points must be finite and strictly increasing.
    pub fn from_points(points: Vec<f64>) -> Result<Self> {
        if points.len() < 2 {
            return Err(AtmoError::InvalidUniverse {
                message: format!("need at least two points, got {}", points.len()),
            });
        }
        if points.iter().any(|p| !p.is_finite()) {
            return Err(AtmoError::InvalidUniverse {
                message: "non-finite point".into(),
            });
        }
        if points.windows(2).any(|w| w[1] <= w[0]) {
            return Err(AtmoError::InvalidUniverse {
                message: "points are not strictly increasing".into(),
            });
        }
        Ok(Self { points })
    }
    pub fn points(&self) -> &[f64] {
        &self.points
    }
    pub fn len(&self) -> usize {
        self.points.len()
    }
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
    pub fn min(&self) -> f64 {
        self.points[0]
    }
    pub fn max(&self) -> f64 {
        self.points[self.points.len() - 1]
    }
    /// Linear interpolation of `samples` (one per universe point) at `x`.
    /// Outside the universe the nearest end sample is returned, so extreme
    /// readings saturate instead of failing.
    pub fn interpolate(&self, samples: &[f64], x: f64) -> f64 {
        let points = &self.points;
        if x <= points[0] {
            return samples[0];
        }
        let last = points.len() - 1;
        if x >= points[last] {
            return samples[last];
        }
        // first index whose point is greater than x; 1..=last by the guards above
        let upper = points.partition_point(|p| *p <= x);
        let lower = upper - 1;
        let (x0, x1) = (points[lower], points[upper]);
        let (y0, y1) = (samples[lower], samples[upper]);
        y0 + (y1 - y0) * (x - x0) / (x1 - x0)
    }
}

// ------------- Shapes -------------
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Shape {
    /// 0 below `a`, ramp up to `b`, plateau to `c`, ramp down to `d`, 0 above.
    Trapezoid { a: f64, b: f64, c: f64, d: f64 },
    /// 0 at `a` and `c`, 1 at `b`.
    Triangle { a: f64, b: f64, c: f64 },
}

impl Shape {
    pub fn trapezoid(a: f64, b: f64, c: f64, d: f64) -> Result<Self> {
        check_breakpoints(&[a, b, c, d])?;
        Ok(Shape::Trapezoid { a, b, c, d })
    }
    pub fn triangle(a: f64, b: f64, c: f64) -> Result<Self> {
        check_breakpoints(&[a, b, c])?;
        Ok(Shape::Triangle { a, b, c })
    }
    /// Degree of membership of a single crisp value.
    pub fn degree(&self, x: f64) -> f64 {
        match *self {
            Shape::Trapezoid { a, b, c, d } => trapezoid_degree(x, a, b, c, d),
            Shape::Triangle { a, b, c } => trapezoid_degree(x, a, b, b, c),
        }
    }
    /// One degree per universe point.
    pub fn sample(&self, universe: &Universe) -> Vec<f64> {
        universe.points().iter().map(|x| self.degree(*x)).collect()
    }
    pub fn breakpoints(&self) -> Vec<f64> {
        match *self {
            Shape::Trapezoid { a, b, c, d } => vec![a, b, c, d],
            Shape::Triangle { a, b, c } => vec![a, b, c],
        }
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Shape::Trapezoid { a, b, c, d } => write!(f, "trapezoid({a}, {b}, {c}, {d})"),
            Shape::Triangle { a, b, c } => write!(f, "triangle({a}, {b}, {c})"),
        }
    }
}

fn check_breakpoints(points: &[f64]) -> Result<()> {
    if points.iter().any(|p| !p.is_finite()) {
        return Err(AtmoError::InvalidBreakpoints {
            term: String::new(),
            message: format!("non-finite breakpoint in {points:?}"),
        });
    }
    if points.windows(2).any(|w| w[0] > w[1]) {
        return Err(AtmoError::InvalidBreakpoints {
            term: String::new(),
            message: format!("breakpoints must be non-decreasing, got {points:?}"),
        });
    }
    Ok(())
}

// Ramps of zero width are never entered: with a == b the x < b branch is
// empty above a, and with c == d the final branch is only reached at x == d
// when c < d.
fn trapezoid_degree(x: f64, a: f64, b: f64, c: f64, d: f64) -> f64 {
    if x < a || x > d {
        0.0
    } else if x < b {
        (x - a) / (b - a)
    } else if x <= c {
        1.0
    } else {
        (d - x) / (d - c)
    }
}

/// Samples a trapezoid over `universe`.
pub fn trapezoid(universe: &Universe, a: f64, b: f64, c: f64, d: f64) -> Result<Vec<f64>> {
    Ok(Shape::trapezoid(a, b, c, d)?.sample(universe))
}

/// Samples a triangle over `universe`.
pub fn triangle(universe: &Universe, a: f64, b: f64, c: f64) -> Result<Vec<f64>> {
    Ok(Shape::triangle(a, b, c)?.sample(universe))
}

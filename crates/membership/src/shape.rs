//! Parametric Membership Shapes

use std::fmt;
use std::str::FromStr;

use crate::error::MembershipError;
use crate::universe::Universe;

/// Membership function family, named as in configuration documents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShapeKind {
    /// `trimf`: (a, b, c)
    Triangular,
    /// `trapmf`: (a, b, c, d)
    Trapezoidal,
    /// `gaussmf`: (mean, sigma)
    Gaussian,
    /// `gbellmf`: (width, slope, center)
    Bell,
    /// `sigmf`: (slope, center)
    Sigmoid,
    /// `zmf`: (a, b)
    ZShape,
    /// `smf`: (a, b)
    SShape,
    /// `pimf`: (a, b, c, d)
    PiShape,
}

impl ShapeKind {
    /// Every supported family
    pub const ALL: [ShapeKind; 8] = [
        ShapeKind::Triangular,
        ShapeKind::Trapezoidal,
        ShapeKind::Gaussian,
        ShapeKind::Bell,
        ShapeKind::Sigmoid,
        ShapeKind::ZShape,
        ShapeKind::SShape,
        ShapeKind::PiShape,
    ];

    /// Get string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            ShapeKind::Triangular => "trimf",
            ShapeKind::Trapezoidal => "trapmf",
            ShapeKind::Gaussian => "gaussmf",
            ShapeKind::Bell => "gbellmf",
            ShapeKind::Sigmoid => "sigmf",
            ShapeKind::ZShape => "zmf",
            ShapeKind::SShape => "smf",
            ShapeKind::PiShape => "pimf",
        }
    }

    /// Number of parameters the family takes
    pub fn arity(&self) -> usize {
        match self {
            ShapeKind::Triangular | ShapeKind::Bell => 3,
            ShapeKind::Trapezoidal | ShapeKind::PiShape => 4,
            ShapeKind::Gaussian | ShapeKind::Sigmoid | ShapeKind::ZShape | ShapeKind::SShape => 2,
        }
    }

    /// Whether the parameters are breakpoints that must be non-decreasing
    pub fn is_ordered(&self) -> bool {
        matches!(
            self,
            ShapeKind::Triangular | ShapeKind::Trapezoidal | ShapeKind::PiShape
        )
    }
}

impl FromStr for ShapeKind {
    type Err = MembershipError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ShapeKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| MembershipError::UnknownShape(s.to_string()))
    }
}

impl fmt::Display for ShapeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A membership function with its parameters bound
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Shape {
    Triangular { a: f64, b: f64, c: f64 },
    Trapezoidal { a: f64, b: f64, c: f64, d: f64 },
    Gaussian { mean: f64, sigma: f64 },
    Bell { width: f64, slope: f64, center: f64 },
    Sigmoid { slope: f64, center: f64 },
    ZShape { a: f64, b: f64 },
    SShape { a: f64, b: f64 },
    PiShape { a: f64, b: f64, c: f64, d: f64 },
}

impl Shape {
    /// Bind parameters in document order, validating arity and values.
    ///
    /// Breakpoint families must already be sorted; see [`Shape::sorted`].
    pub fn new(kind: ShapeKind, params: &[f64]) -> Result<Self, MembershipError> {
        let name = kind.as_str();

        if params.len() != kind.arity() {
            return Err(MembershipError::WrongArity {
                kind: name,
                expected: kind.arity(),
                actual: params.len(),
            });
        }

        let invalid = |reason: &str| MembershipError::InvalidParameter {
            kind: name,
            reason: reason.to_string(),
        };

        if params.iter().any(|p| !p.is_finite()) {
            return Err(invalid("parameters must be finite"));
        }

        if kind.is_ordered() && params.windows(2).any(|w| w[0] > w[1]) {
            return Err(invalid("breakpoints must be non-decreasing"));
        }

        let shape = match kind {
            ShapeKind::Triangular => Shape::Triangular {
                a: params[0],
                b: params[1],
                c: params[2],
            },
            ShapeKind::Trapezoidal => Shape::Trapezoidal {
                a: params[0],
                b: params[1],
                c: params[2],
                d: params[3],
            },
            ShapeKind::Gaussian => {
                if params[1] <= 0.0 {
                    return Err(invalid("sigma must be greater than zero"));
                }
                Shape::Gaussian {
                    mean: params[0],
                    sigma: params[1],
                }
            }
            ShapeKind::Bell => {
                if params[0] == 0.0 {
                    return Err(invalid("width must be non-zero"));
                }
                Shape::Bell {
                    width: params[0],
                    slope: params[1],
                    center: params[2],
                }
            }
            ShapeKind::Sigmoid => Shape::Sigmoid {
                slope: params[0],
                center: params[1],
            },
            ShapeKind::ZShape | ShapeKind::SShape => {
                if params[0] > params[1] {
                    return Err(invalid("a must not exceed b"));
                }
                if kind == ShapeKind::ZShape {
                    Shape::ZShape {
                        a: params[0],
                        b: params[1],
                    }
                } else {
                    Shape::SShape {
                        a: params[0],
                        b: params[1],
                    }
                }
            }
            ShapeKind::PiShape => Shape::PiShape {
                a: params[0],
                b: params[1],
                c: params[2],
                d: params[3],
            },
        };

        Ok(shape)
    }

    /// Like [`Shape::new`], but sorts breakpoint families first
    pub fn sorted(kind: ShapeKind, params: &[f64]) -> Result<Self, MembershipError> {
        if kind.is_ordered() {
            let mut params = params.to_vec();
            params.sort_by(f64::total_cmp);
            Self::new(kind, &params)
        } else {
            Self::new(kind, params)
        }
    }

    /// Family of this shape
    pub fn kind(&self) -> ShapeKind {
        match self {
            Shape::Triangular { .. } => ShapeKind::Triangular,
            Shape::Trapezoidal { .. } => ShapeKind::Trapezoidal,
            Shape::Gaussian { .. } => ShapeKind::Gaussian,
            Shape::Bell { .. } => ShapeKind::Bell,
            Shape::Sigmoid { .. } => ShapeKind::Sigmoid,
            Shape::ZShape { .. } => ShapeKind::ZShape,
            Shape::SShape { .. } => ShapeKind::SShape,
            Shape::PiShape { .. } => ShapeKind::PiShape,
        }
    }

    /// Parameters in document order
    pub fn params(&self) -> Vec<f64> {
        match *self {
            Shape::Triangular { a, b, c } => vec![a, b, c],
            Shape::Trapezoidal { a, b, c, d } | Shape::PiShape { a, b, c, d } => vec![a, b, c, d],
            Shape::Gaussian { mean, sigma } => vec![mean, sigma],
            Shape::Bell {
                width,
                slope,
                center,
            } => vec![width, slope, center],
            Shape::Sigmoid { slope, center } => vec![slope, center],
            Shape::ZShape { a, b } | Shape::SShape { a, b } => vec![a, b],
        }
    }

    /// Membership degree of a crisp value, in `[0, 1]`
    pub fn evaluate(&self, x: f64) -> f64 {
        let degree = match *self {
            Shape::Triangular { a, b, c } => {
                if x == b {
                    1.0
                } else if x > a && x < b {
                    (x - a) / (b - a)
                } else if x > b && x < c {
                    (c - x) / (c - b)
                } else {
                    0.0
                }
            }
            Shape::Trapezoidal { a, b, c, d } => {
                if x >= b && x <= c {
                    1.0
                } else if x > a && x < b {
                    (x - a) / (b - a)
                } else if x > c && x < d {
                    (d - x) / (d - c)
                } else {
                    0.0
                }
            }
            Shape::Gaussian { mean, sigma } => {
                (-(x - mean).powi(2) / (2.0 * sigma * sigma)).exp()
            }
            Shape::Bell {
                width,
                slope,
                center,
            } => 1.0 / (1.0 + ((x - center) / width).abs().powf(2.0 * slope)),
            Shape::Sigmoid { slope, center } => 1.0 / (1.0 + (-slope * (x - center)).exp()),
            Shape::SShape { a, b } => s_curve(a, b, x),
            Shape::ZShape { a, b } => 1.0 - s_curve(a, b, x),
            Shape::PiShape { a, b, c, d } => s_curve(a, b, x).min(1.0 - s_curve(c, d, x)),
        };

        degree.clamp(0.0, 1.0)
    }

    /// Sample the shape at every grid point
    pub fn sample(&self, universe: &Universe) -> Vec<f64> {
        universe.points().iter().map(|&x| self.evaluate(x)).collect()
    }
}

/// Quadratic spline rising from 0 at `a` to 1 at `b`; a hard step when `a == b`
fn s_curve(a: f64, b: f64, x: f64) -> f64 {
    if x < a {
        return 0.0;
    }
    if x >= b {
        return 1.0;
    }

    let span = b - a;
    if x <= (a + b) / 2.0 {
        2.0 * ((x - a) / span).powi(2)
    } else {
        1.0 - 2.0 * ((x - b) / span).powi(2)
    }
}

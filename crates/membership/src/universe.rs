//! Discretized Universe of Discourse

use crate::error::MembershipError;

/// Upper bound on grid size, keeps a malformed step from allocating gigabytes
const MAX_POINTS: usize = 1_000_000;

/// Relative slack when counting grid steps, so that `[0, 1, 0.01]` yields 101 points
const STEP_SLACK: f64 = 1e-9;

/// Evenly spaced sample grid over a closed interval
#[derive(Debug, Clone, PartialEq)]
pub struct Universe {
    lo: f64,
    hi: f64,
    step: f64,
    points: Vec<f64>,
}

impl Universe {
    /// Range used when a variable does not declare one
    pub const UNIT_RANGE: (f64, f64, f64) = (0.0, 1.0, 0.01);

    /// Build a grid of `floor((hi - lo) / step) + 1` points starting at `lo`
    pub fn new(lo: f64, hi: f64, step: f64) -> Result<Self, MembershipError> {
        let invalid = MembershipError::InvalidUniverse { lo, hi, step };

        if !(lo.is_finite() && hi.is_finite() && step.is_finite()) || lo >= hi || step <= 0.0 {
            return Err(invalid);
        }

        let span = (hi - lo) / step;
        let count = (span * (1.0 + STEP_SLACK)).floor() as usize + 1;
        if !(2..=MAX_POINTS).contains(&count) {
            return Err(invalid);
        }

        let points = (0..count)
            .map(|i| (lo + i as f64 * step).min(hi))
            .collect();

        Ok(Self {
            lo,
            hi,
            step,
            points,
        })
    }

    /// The default `[0, 1]` grid with a 0.01 step
    pub fn unit() -> Self {
        let (lo, hi, step) = Self::UNIT_RANGE;
        Self {
            lo,
            hi,
            step,
            points: (0..=100).map(|i| (lo + i as f64 * step).min(hi)).collect(),
        }
    }

    /// Lower bound
    pub fn lo(&self) -> f64 {
        self.lo
    }

    /// Upper bound
    pub fn hi(&self) -> f64 {
        self.hi
    }

    /// Declared step
    pub fn step(&self) -> f64 {
        self.step
    }

    /// Grid samples in ascending order
    pub fn points(&self) -> &[f64] {
        &self.points
    }

    /// Number of grid samples
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Always false for a constructed universe
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Clamp a crisp value into `[lo, hi]`
    pub fn clamp(&self, x: f64) -> f64 {
        x.clamp(self.lo, self.hi)
    }

    /// Relative position of `x` within the bounds, in `[0, 1]`
    pub fn fraction(&self, x: f64) -> f64 {
        ((self.clamp(x) - self.lo) / (self.hi - self.lo)).clamp(0.0, 1.0)
    }

    /// Linearly interpolate a sampled curve at `x`.
    ///
    /// `curve` must hold one value per grid point. Values outside the grid
    /// take the curve's boundary sample.
    pub fn interpolate(&self, curve: &[f64], x: f64) -> f64 {
        debug_assert_eq!(curve.len(), self.points.len());

        let n = self.points.len().min(curve.len());
        if n == 0 {
            return 0.0;
        }
        if x <= self.points[0] {
            return curve[0];
        }
        if x >= self.points[n - 1] {
            return curve[n - 1];
        }

        let mut i = (((x - self.lo) / self.step).floor() as usize).min(n - 2);
        // Floating-point drift can put the estimate one cell off
        while i > 0 && self.points[i] > x {
            i -= 1;
        }
        while i + 2 < n && self.points[i + 1] < x {
            i += 1;
        }

        let (x0, x1) = (self.points[i], self.points[i + 1]);
        let t = if x1 > x0 { (x - x0) / (x1 - x0) } else { 0.0 };
        curve[i] + t * (curve[i + 1] - curve[i])
    }
}

impl Default for Universe {
    fn default() -> Self {
        Self::unit()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unit_grid_length() {
        let universe = Universe::new(0.0, 1.0, 0.01).unwrap();
        assert_eq!(universe.len(), 101);
        assert_eq!(universe, Universe::unit());
    }

    #[test]
    fn test_ranged_grid_length() {
        assert_eq!(Universe::new(0.0, 10.0, 0.1).unwrap().len(), 101);
        assert_eq!(Universe::new(0.0, 100.0, 1.0).unwrap().len(), 101);
        // Step that does not divide the span stops short of hi
        let universe = Universe::new(0.0, 1.0, 0.3).unwrap();
        assert_eq!(universe.len(), 4);
        assert!((universe.points()[3] - 0.9).abs() < 1e-12);
    }

    #[test]
    fn test_invalid_universe() {
        assert!(Universe::new(1.0, 0.0, 0.1).is_err());
        assert!(Universe::new(0.0, 0.0, 0.1).is_err());
        assert!(Universe::new(0.0, 1.0, 0.0).is_err());
        assert!(Universe::new(0.0, 1.0, -0.1).is_err());
        assert!(Universe::new(0.0, 1.0, 2.0).is_err());
        assert!(Universe::new(f64::NAN, 1.0, 0.1).is_err());
        assert!(Universe::new(0.0, 1e12, 1e-3).is_err());
    }

    #[test]
    fn test_interpolation_between_samples() {
        let universe = Universe::new(0.0, 1.0, 0.5).unwrap();
        let curve = [0.0, 1.0, 0.0];
        assert!((universe.interpolate(&curve, 0.25) - 0.5).abs() < 1e-12);
        assert!((universe.interpolate(&curve, 0.5) - 1.0).abs() < 1e-12);
        assert!((universe.interpolate(&curve, 0.9) - 0.2).abs() < 1e-12);
    }

    #[test]
    fn test_interpolation_clamps_outside() {
        let universe = Universe::new(0.0, 1.0, 0.5).unwrap();
        let curve = [0.3, 1.0, 0.7];
        assert_eq!(universe.interpolate(&curve, -4.0), 0.3);
        assert_eq!(universe.interpolate(&curve, 9.0), 0.7);
    }

    #[test]
    fn test_fraction() {
        let universe = Universe::new(0.0, 100.0, 1.0).unwrap();
        assert!((universe.fraction(25.0) - 0.25).abs() < 1e-12);
        assert_eq!(universe.fraction(-3.0), 0.0);
        assert_eq!(universe.fraction(300.0), 1.0);
    }
}

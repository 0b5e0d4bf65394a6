/// Per-dimension value intervals observed so far.
///
/// Starts empty (`lower = +inf`, `upper = -inf` per dimension) and only ever
/// expands; shrinking would require access to the window's full contents,
/// which boundary tracking deliberately does not have.
#[derive(Debug, Clone, PartialEq)]
pub struct Boundaries {
    lower: Vec<f64>,
    upper: Vec<f64>,
}

impl Boundaries {
    pub fn new(dimensionality: usize) -> Boundaries {
        Boundaries {
            lower: vec![f64::INFINITY; dimensionality],
            upper: vec![f64::NEG_INFINITY; dimensionality],
        }
    }

    pub fn dimensionality(&self) -> usize {
        self.lower.len()
    }

    pub fn lower_at(&self, dim: usize) -> Option<f64> {
        self.lower.get(dim).copied()
    }

    pub fn upper_at(&self, dim: usize) -> Option<f64> {
        self.upper.get(dim).copied()
    }

    /// True once every dimension has seen at least one value.
    pub fn is_defined(&self) -> bool {
        self.lower
            .iter()
            .zip(&self.upper)
            .all(|(lo, hi)| lo <= hi)
    }

    /// Widens the intervals to contain `values`. Returns whether any bound
    /// actually moved.
    pub fn expand(&mut self, values: &[f64]) -> bool {
        let mut changed = false;
        for (dim, v) in values.iter().enumerate().take(self.lower.len()) {
            if *v < self.lower[dim] {
                self.lower[dim] = *v;
                changed = true;
            }
            if *v > self.upper[dim] {
                self.upper[dim] = *v;
                changed = true;
            }
        }
        changed
    }
}

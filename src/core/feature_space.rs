use std::sync::Arc;

/// Immutable descriptor of the feature space a stream's observations live in.
///
/// Every observation produced by a source carries a shared reference to the
/// same `FeatureSpace`; the dimensionality of an observation's value vector
/// always equals [`dimensionality`](FeatureSpace::dimensionality).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureSpace {
    pub name: String,
    pub features: Vec<String>,
}

impl FeatureSpace {
    pub fn new(name: String, features: Vec<String>) -> FeatureSpace {
        FeatureSpace { name, features }
    }

    /// Builds a space with `dim` generically named features (`f0`, `f1`, ...).
    pub fn with_dimensionality(name: &str, dim: usize) -> Arc<FeatureSpace> {
        let features = (0..dim).map(|i| format!("f{i}")).collect();
        Arc::new(FeatureSpace::new(name.to_string(), features))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn dimensionality(&self) -> usize {
        self.features.len()
    }

    pub fn feature_at_index(&self, index: usize) -> Option<&str> {
        self.features.get(index).map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generic_feature_names() {
        let space = FeatureSpace::with_dimensionality("drift", 3);
        assert_eq!(space.name(), "drift");
        assert_eq!(space.dimensionality(), 3);
        assert_eq!(space.feature_at_index(0), Some("f0"));
        assert_eq!(space.feature_at_index(2), Some("f2"));
        assert_eq!(space.feature_at_index(3), None);
    }
}

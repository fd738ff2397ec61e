#[cfg(feature = "serialize")]
use serde::{Deserialize, Serialize};

/// Tunables for a [`crate::TriangleGraph`].
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub struct MeshConfig {
    /// How far clearance points sit from the obstacle corner they belong to.
    pub clearance: f64,
    /// Snap every incoming coordinate to a 1e-6 grid before using it.
    pub snap: bool,
    /// Check every mesh invariant after each dynamic update. Expensive.
    pub validate_after_update: bool,
}

impl Default for MeshConfig {
    fn default() -> Self {
        Self {
            clearance: 20.0,
            snap: false,
            validate_after_update: false,
        }
    }
}

//! Error taxonomy
//!
//! Invalid parameters are reported as errors with the previous state left
//! untouched, so callers that want the silent behavior can just drop them.

/// Errors from terrain and simulation operations.
#[derive(Debug, thiserror::Error)]
pub enum SimError {
    #[error("grid size {0} outside [2, 255]")]
    InvalidGridSize(usize),
    #[error("sphere count must be positive, got {0}")]
    InvalidSphereCount(usize),
    #[error("cube width must be positive, got {0}")]
    InvalidCubeWidth(f32),
    #[error("no mesh generated yet")]
    MeshNotGenerated,
    #[error("invalid surface style: {0}")]
    InvalidSurface(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl SimError {
    /// True for errors that mean "ignore the request, keep prior state"
    pub fn is_invalid_parameter(&self) -> bool {
        matches!(
            self,
            SimError::InvalidGridSize(_) | SimError::InvalidSphereCount(_) | SimError::InvalidCubeWidth(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_size_message_names_bounds() {
        let msg = SimError::InvalidGridSize(300).to_string();
        assert!(msg.contains("300"));
        assert!(msg.contains("[2, 255]"));
    }

    #[test]
    fn test_invalid_parameter_classification() {
        assert!(SimError::InvalidGridSize(1).is_invalid_parameter());
        assert!(SimError::InvalidSphereCount(0).is_invalid_parameter());
        assert!(!SimError::MeshNotGenerated.is_invalid_parameter());
    }
}

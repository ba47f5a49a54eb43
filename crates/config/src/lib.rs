//! Shared configuration for Tessera
//!
//! This crate provides the single source of truth for the knobs of the mesh
//! topology kernel. Every `Mesh` carries one and hands it on to its copies.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Default file the sub-mesh copy dumps its input faces to on failure
pub const DEFAULT_CLONE_DUMP_PATH: &str = "clonesub.err";

/// Default maximum distance between endpoints treated as coincident
pub const DEFAULT_SEAM_TOLERANCE: f64 = 1e-9;

/// Kernel configuration carried by every mesh
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KernelConfig {
    /// Diagnostic artifact written when a sub-mesh copy fails (`None` disables it)
    pub clone_dump_path: Option<PathBuf>,
    /// Maximum endpoint distance accepted when attaching along a seam
    pub seam_tolerance: f64,
    /// Run the full invariant validator after every successful mutation
    pub validate_mutations: bool,
}

impl Default for KernelConfig {
    fn default() -> Self {
        Self {
            clone_dump_path: Some(PathBuf::from(DEFAULT_CLONE_DUMP_PATH)),
            seam_tolerance: DEFAULT_SEAM_TOLERANCE,
            validate_mutations: false,
        }
    }
}

impl KernelConfig {
    /// Config that validates every mutation, for tests and debugging sessions
    pub fn strict() -> Self {
        Self {
            validate_mutations: true,
            ..Self::default()
        }
    }

    /// Replace the diagnostic dump location
    pub fn with_clone_dump_path(mut self, path: Option<PathBuf>) -> Self {
        self.clone_dump_path = path;
        self
    }

    /// Replace the seam tolerance (negative values are clamped to zero)
    pub fn with_seam_tolerance(mut self, tolerance: f64) -> Self {
        self.seam_tolerance = tolerance.max(0.0);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = KernelConfig::default();
        assert_eq!(
            config.clone_dump_path,
            Some(PathBuf::from(DEFAULT_CLONE_DUMP_PATH))
        );
        assert_eq!(config.seam_tolerance, DEFAULT_SEAM_TOLERANCE);
        assert!(!config.validate_mutations);
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let config: KernelConfig =
            serde_json::from_str(r#"{ "validate_mutations": true }"#).unwrap();
        assert!(config.validate_mutations);
        assert_eq!(config.seam_tolerance, DEFAULT_SEAM_TOLERANCE);
        assert!(config.clone_dump_path.is_some());
    }

    #[test]
    fn test_disable_dump_and_clamp_tolerance() {
        let config = KernelConfig::strict()
            .with_clone_dump_path(None)
            .with_seam_tolerance(-1.0);
        assert!(config.validate_mutations);
        assert!(config.clone_dump_path.is_none());
        assert_eq!(config.seam_tolerance, 0.0);
    }
}

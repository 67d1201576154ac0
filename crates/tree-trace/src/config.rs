use serde::{Deserialize, Serialize};

use crate::error::TreeError;
use crate::types::Variant;

/// Knobs for trace emission.
///
/// ```
/// use tree_trace::{TraceConfig, Variant};
///
/// let config = TraceConfig::from_json(r#"{ "snapshots": false }"#).unwrap();
/// assert!(!config.snapshots);
/// assert!(config.summary);
/// assert_eq!(config.variant, Variant::Avl);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TraceConfig {
    /// Attach a full tree snapshot to rotation and re-shape actions.
    pub snapshots: bool,
    /// Append an end-of-sequence action with a summary message.
    pub summary: bool,
    /// Engine picked by the command-line runner.
    pub variant: Variant,
}

impl Default for TraceConfig {
    fn default() -> Self {
        Self {
            snapshots: true,
            summary: true,
            variant: Variant::default(),
        }
    }
}

impl TraceConfig {
    pub fn from_json(src: &str) -> Result<Self, TreeError> {
        serde_json::from_str(src).map_err(|e| TreeError::InvalidConfig(e.to_string()))
    }
}

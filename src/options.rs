//! Build options.
//!
//! Options are installed per thread with [`crate::context::configure`] and
//! read by the construction and serialization passes of that thread.

use serde::{Deserialize, Serialize};

use crate::validate::{PrefabError, Result};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PrefabOptions {
    /// Reject an orphaned Elif/Else as soon as it is appended, in addition
    /// to the check performed during serialization.
    pub eager_branch_check: bool,
    /// Wire type wrapping a multi-child Define body.
    pub define_wrapper: String,
}

impl Default for PrefabOptions {
    fn default() -> Self {
        PrefabOptions {
            eager_branch_check: false,
            define_wrapper: "Column".to_string(),
        }
    }
}

impl PrefabOptions {
    pub fn from_json(json: &str) -> Result<Self> {
        let options: PrefabOptions =
            serde_json::from_str(json).map_err(|e| PrefabError::InvalidOptions(e.to_string()))?;
        if options.define_wrapper.trim().is_empty() {
            return Err(PrefabError::InvalidOptions(
                "defineWrapper must name a component type".to_string(),
            ));
        }
        Ok(options)
    }
}

use serde::{Deserialize, Serialize};

/// Optional annotations carried by a network and stored in its file.
/// All fields are Option<> so files without metadata deserialize cleanly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct NetworkMetadata {
    pub description: Option<String>,
    /// Input/output equalization settings, kept opaque so whatever
    /// normalizer produced them can read them back.
    pub equalization: Option<serde_json::Value>,
}

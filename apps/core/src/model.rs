use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// A named, launchable filesystem target. Programs and documents share this
/// shape; indexers rebuild whole lists rather than editing entries in place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resource {
    pub name: String,
    pub path: String,
}

impl Resource {
    pub fn new(name: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
        }
    }
}

/// One fully-built generation of an index. Readers keep whatever reference
/// they observed; a rebuild installs a new `Arc` and never touches contents.
pub type Snapshot = Arc<Vec<Resource>>;

pub fn empty_snapshot() -> Snapshot {
    Arc::new(Vec::new())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    Program,
    Document,
}

impl ResourceKind {
    pub fn label(self) -> &'static str {
        match self {
            Self::Program => "program",
            Self::Document => "document",
        }
    }
}

/// The single active query-interpretation context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    ProgramSearch,
    DocumentSearch,
    InternetSearch,
    AskAi,
    ChooseWindow,
}

impl Default for Mode {
    fn default() -> Self {
        Self::ProgramSearch
    }
}

impl Mode {
    pub fn placeholder(self, documents_ready: bool) -> &'static str {
        match self {
            Self::ProgramSearch => "Program search...",
            Self::DocumentSearch => {
                if documents_ready {
                    "Document search..."
                } else {
                    "Document search [still caching]..."
                }
            }
            Self::InternetSearch => "Internet search...",
            Self::AskAi => "Quick AI...",
            Self::ChooseWindow => "Choose window...",
        }
    }
}

/// What the router hands back for one keystroke-time resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryReply {
    Text(String),
    Resources(ResourceKind, Vec<Resource>),
}

#[cfg(test)]
mod tests {
    use super::Mode;

    #[test]
    fn document_placeholder_reflects_caching_state() {
        assert_eq!(
            Mode::DocumentSearch.placeholder(false),
            "Document search [still caching]..."
        );
        assert_eq!(Mode::DocumentSearch.placeholder(true), "Document search...");
    }
}

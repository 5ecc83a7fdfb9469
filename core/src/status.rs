//! Load status

use serde::Serialize;

/// Where a session is in its lifecycle.
///
/// `Uninitialized → Loading → Ready → Running`, or `Failed` if a resource
/// could not be fetched or registered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Default)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum LoadStatus {
    /// Waiting for the runtime's readiness signal
    #[default]
    Uninitialized,
    /// Fetching resources; `loaded` of `total` are registered
    Loading { loaded: usize, total: usize },
    /// Every resource is registered
    Ready,
    /// The entry point has been invoked
    Running,
    /// Loading stopped at `resource`
    Failed { resource: String, reason: String },
}

impl LoadStatus {
    /// Short lowercase name of the state
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Uninitialized => "uninitialized",
            Self::Loading { .. } => "loading",
            Self::Ready => "ready",
            Self::Running => "running",
            Self::Failed { .. } => "failed",
        }
    }

    /// True once every resource is registered
    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready | Self::Running)
    }

    /// True if loading stopped early
    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }
}

impl std::fmt::Display for LoadStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Loading { loaded, total } => write!(f, "loading ({}/{})", loaded, total),
            Self::Failed { resource, reason } => write!(f, "failed at {}: {}", resource, reason),
            other => f.write_str(other.as_str()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_uninitialized() {
        assert_eq!(LoadStatus::default(), LoadStatus::Uninitialized);
        assert!(!LoadStatus::default().is_ready());
    }

    #[test]
    fn display_includes_progress_and_failure() {
        assert_eq!(
            LoadStatus::Loading { loaded: 1, total: 2 }.to_string(),
            "loading (1/2)"
        );
        assert_eq!(
            LoadStatus::Failed {
                resource: "tetris.gb".to_string(),
                reason: "HTTP 404".to_string(),
            }
            .to_string(),
            "failed at tetris.gb: HTTP 404"
        );
        assert_eq!(LoadStatus::Running.to_string(), "running");
    }

    #[test]
    fn serializes_as_tagged_json() {
        let json = serde_json::to_value(LoadStatus::Loading { loaded: 1, total: 2 }).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"state": "loading", "loaded": 1, "total": 2})
        );

        let json = serde_json::to_value(LoadStatus::Ready).unwrap();
        assert_eq!(json, serde_json::json!({"state": "ready"}));
    }
}

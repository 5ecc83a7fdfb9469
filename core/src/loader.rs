//! Asset loader
//!
//! Fetches the manifest's resources one at a time and registers each at
//! the runtime filesystem root.

use thiserror::Error;

use gbhost_shared::{ROOT_DIR, ResourceManifest};

use crate::fetch::{FetchError, Fetcher};
use crate::runtime::{RuntimeError, RuntimeHandle};
use crate::status::LoadStatus;

/// Error type for asset loading
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoadError {
    /// `initialize` was called more than once
    #[error("loader already initialized")]
    AlreadyInitialized,
    /// A resource could not be fetched
    #[error("failed to fetch {resource}: {source}")]
    Fetch {
        resource: String,
        #[source]
        source: FetchError,
    },
    /// A fetched resource could not be registered with the runtime
    #[error("failed to register {resource}: {source}")]
    Register {
        resource: String,
        #[source]
        source: RuntimeError,
    },
}

impl LoadError {
    /// Resource the error is about, if any
    pub fn resource(&self) -> Option<&str> {
        match self {
            Self::AlreadyInitialized => None,
            Self::Fetch { resource, .. } | Self::Register { resource, .. } => Some(resource),
        }
    }
}

/// Sequential resource loader.
pub struct AssetLoader<F> {
    manifest: ResourceManifest,
    fetcher: F,
    status: LoadStatus,
}

impl<F: Fetcher> AssetLoader<F> {
    /// Create a loader for `manifest`
    pub fn new(manifest: ResourceManifest, fetcher: F) -> Self {
        Self {
            manifest,
            fetcher,
            status: LoadStatus::Uninitialized,
        }
    }

    /// Fetch and register every resource, in manifest order.
    ///
    /// Resource N+1 is not requested until resource N is fetched and
    /// registered. The first failure stops the sequence: earlier resources
    /// stay registered, later ones are never requested. There is no retry.
    pub async fn initialize<R: RuntimeHandle>(&mut self, runtime: &mut R) -> Result<(), LoadError> {
        if self.status != LoadStatus::Uninitialized {
            return Err(LoadError::AlreadyInitialized);
        }

        let total = self.manifest.len();
        self.status = LoadStatus::Loading { loaded: 0, total };

        for (index, name) in self.manifest.names().iter().enumerate() {
            let payload = match self.fetcher.fetch(name).await {
                Ok(payload) => payload,
                Err(source) => {
                    let err = LoadError::Fetch {
                        resource: name.clone(),
                        source,
                    };
                    self.status = failed(name, &err);
                    return Err(err);
                }
            };
            tracing::info!("{} {}", name, payload.len());

            if let Err(source) =
                runtime.create_data_file(ROOT_DIR, name, payload.as_bytes(), true, true)
            {
                let err = LoadError::Register {
                    resource: name.clone(),
                    source,
                };
                self.status = failed(name, &err);
                return Err(err);
            }

            self.status = LoadStatus::Loading {
                loaded: index + 1,
                total,
            };
        }

        self.status = LoadStatus::Ready;
        Ok(())
    }

    /// Record that the entry point was invoked. A failed load stays failed.
    pub fn mark_running(&mut self) {
        if !self.status.is_failed() {
            self.status = LoadStatus::Running;
        }
    }

    /// Current status
    pub fn status(&self) -> &LoadStatus {
        &self.status
    }

    /// Resources this loader fetches
    pub fn manifest(&self) -> &ResourceManifest {
        &self.manifest
    }

    /// Get the fetcher
    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }
}

fn failed(resource: &str, err: &LoadError) -> LoadStatus {
    let reason = match err {
        LoadError::Fetch { source, .. } => source.to_string(),
        LoadError::Register { source, .. } => source.to_string(),
        LoadError::AlreadyInitialized => err.to_string(),
    };
    tracing::error!("Loading stopped at {}: {}", resource, reason);
    LoadStatus::Failed {
        resource: resource.to_string(),
        reason,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{Event, EventLog, RecordingRuntime, ScriptedFetcher};

    fn manifest(names: &[&str]) -> ResourceManifest {
        ResourceManifest::new(names.iter().copied()).unwrap()
    }

    #[tokio::test]
    async fn fetches_and_registers_in_strict_order() {
        let log = EventLog::default();
        let fetcher = ScriptedFetcher::new(log.clone())
            .with("a.gb", &[1])
            .with("b.gb", &[2, 2])
            .with("c.gb", &[3, 3, 3]);
        let mut runtime = RecordingRuntime::new(log.clone());
        let mut loader = AssetLoader::new(manifest(&["a.gb", "b.gb", "c.gb"]), fetcher);

        loader.initialize(&mut runtime).await.unwrap();

        assert_eq!(
            log.events(),
            vec![
                Event::Fetch("a.gb".into()),
                Event::Create("a.gb".into()),
                Event::Fetch("b.gb".into()),
                Event::Create("b.gb".into()),
                Event::Fetch("c.gb".into()),
                Event::Create("c.gb".into()),
            ]
        );
        assert_eq!(loader.status(), &LoadStatus::Ready);
    }

    #[tokio::test]
    async fn registers_at_root_with_read_write() {
        let log = EventLog::default();
        let fetcher = ScriptedFetcher::new(log.clone()).with("bootRom.gb", &[0x31, 0xFE]);
        let mut runtime = RecordingRuntime::new(log);
        let mut loader = AssetLoader::new(manifest(&["bootRom.gb"]), fetcher);

        loader.initialize(&mut runtime).await.unwrap();

        let file = &runtime.files[0];
        assert_eq!(file.parent, "/");
        assert_eq!(file.name, "bootRom.gb");
        assert_eq!(file.data, vec![0x31, 0xFE]);
        assert!(file.can_read && file.can_write);
    }

    #[tokio::test]
    async fn failed_fetch_stops_remaining_resources() {
        let log = EventLog::default();
        let fetcher = ScriptedFetcher::new(log.clone())
            .with("a.gb", &[1])
            .failing("b.gb", FetchError::Network("connection reset".into()))
            .with("c.gb", &[3]);
        let mut runtime = RecordingRuntime::new(log.clone());
        let mut loader = AssetLoader::new(manifest(&["a.gb", "b.gb", "c.gb"]), fetcher);

        let err = loader.initialize(&mut runtime).await.unwrap_err();

        assert_eq!(err.resource(), Some("b.gb"));
        assert!(matches!(err, LoadError::Fetch { .. }));
        assert_eq!(runtime.file_names(), vec!["a.gb"]);
        assert!(!log.events().contains(&Event::Fetch("c.gb".into())));
        assert_eq!(
            loader.status(),
            &LoadStatus::Failed {
                resource: "b.gb".into(),
                reason: "network error: connection reset".into(),
            }
        );
    }

    #[tokio::test]
    async fn first_fetch_failure_registers_nothing() {
        let log = EventLog::default();
        let fetcher = ScriptedFetcher::new(log.clone()).with("tetris.gb", &[1]);
        let mut runtime = RecordingRuntime::new(log);
        let mut loader = AssetLoader::new(ResourceManifest::default(), fetcher);

        let err = loader.initialize(&mut runtime).await.unwrap_err();

        assert_eq!(err.resource(), Some("bootRom.gb"));
        assert!(runtime.files.is_empty());
    }

    #[tokio::test]
    async fn registration_failure_stops_sequence() {
        let log = EventLog::default();
        let fetcher = ScriptedFetcher::new(log.clone())
            .with("a.gb", &[1])
            .with("b.gb", &[2]);
        let mut runtime = RecordingRuntime::new(log.clone());
        runtime.reject = Some("a.gb".to_string());
        let mut loader = AssetLoader::new(manifest(&["a.gb", "b.gb"]), fetcher);

        let err = loader.initialize(&mut runtime).await.unwrap_err();

        assert!(matches!(err, LoadError::Register { ref resource, .. } if resource == "a.gb"));
        assert_eq!(log.events(), vec![Event::Fetch("a.gb".into())]);
        assert!(loader.status().is_failed());
    }

    #[tokio::test]
    async fn second_initialize_is_rejected() {
        let log = EventLog::default();
        let fetcher = ScriptedFetcher::new(log.clone()).with("a.gb", &[1]);
        let mut runtime = RecordingRuntime::new(log.clone());
        let mut loader = AssetLoader::new(manifest(&["a.gb"]), fetcher);

        loader.initialize(&mut runtime).await.unwrap();
        assert_eq!(
            loader.initialize(&mut runtime).await,
            Err(LoadError::AlreadyInitialized)
        );
        assert_eq!(runtime.files.len(), 1);
        assert_eq!(loader.status(), &LoadStatus::Ready);
    }

    #[test]
    fn mark_running_keeps_failure() {
        let mut loader = AssetLoader::new(
            ResourceManifest::default(),
            ScriptedFetcher::new(EventLog::default()),
        );
        loader.mark_running();
        assert_eq!(loader.status(), &LoadStatus::Running);

        loader.status = LoadStatus::Failed {
            resource: "tetris.gb".into(),
            reason: "HTTP 404".into(),
        };
        loader.mark_running();
        assert!(loader.status().is_failed());
    }
}

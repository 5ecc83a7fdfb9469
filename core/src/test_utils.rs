//! Shared test utilities: scripted fetchers and a recording runtime

use std::future::Future;
use std::sync::{Arc, Mutex};

use hashbrown::HashMap;

use crate::fetch::{FetchError, Fetcher};
use crate::payload::Payload;
use crate::runtime::{OutputSink, RuntimeError, RuntimeHandle};

/// Something a fake observed, in the order it happened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Fetch(String),
    Create(String),
    CallMain(Vec<String>),
}

/// Event log shared between fakes so cross-component ordering is visible.
#[derive(Debug, Clone, Default)]
pub struct EventLog(Arc<Mutex<Vec<Event>>>);

impl EventLog {
    pub fn push(&self, event: Event) {
        self.0.lock().unwrap().push(event);
    }

    pub fn events(&self) -> Vec<Event> {
        self.0.lock().unwrap().clone()
    }
}

// ============================================================================
// Scripted Fetcher
// ============================================================================

/// Fetcher answering from a fixed table. Unknown names are HTTP 404.
pub struct ScriptedFetcher {
    responses: HashMap<String, Result<Vec<u8>, FetchError>>,
    log: EventLog,
}

impl ScriptedFetcher {
    pub fn new(log: EventLog) -> Self {
        Self {
            responses: HashMap::new(),
            log,
        }
    }

    pub fn with(mut self, name: &str, bytes: &[u8]) -> Self {
        self.responses.insert(name.to_string(), Ok(bytes.to_vec()));
        self
    }

    pub fn failing(mut self, name: &str, err: FetchError) -> Self {
        self.responses.insert(name.to_string(), Err(err));
        self
    }
}

impl Fetcher for ScriptedFetcher {
    async fn fetch(&self, name: &str) -> Result<Payload, FetchError> {
        self.log.push(Event::Fetch(name.to_string()));
        // Suspend like a real request would.
        tokio::task::yield_now().await;

        match self.responses.get(name) {
            Some(Ok(bytes)) => Ok(Payload::new(bytes.clone())),
            Some(Err(err)) => Err(err.clone()),
            None => Err(FetchError::Status {
                url: name.to_string(),
                status: 404,
            }),
        }
    }
}

// ============================================================================
// Recording Runtime
// ============================================================================

/// A file registration as the runtime saw it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedFile {
    pub parent: String,
    pub name: String,
    pub data: Vec<u8>,
    pub can_read: bool,
    pub can_write: bool,
}

/// Runtime that records every call and prints scripted lines from `main`.
pub struct RecordingRuntime {
    pub files: Vec<CreatedFile>,
    pub calls: Vec<Vec<String>>,
    pub main_output: Vec<String>,
    pub reject: Option<String>,
    output: Option<Arc<dyn OutputSink>>,
    log: EventLog,
}

impl RecordingRuntime {
    pub fn new(log: EventLog) -> Self {
        Self {
            files: Vec::new(),
            calls: Vec::new(),
            main_output: Vec::new(),
            reject: None,
            output: None,
            log,
        }
    }

    pub fn file_names(&self) -> Vec<&str> {
        self.files.iter().map(|f| f.name.as_str()).collect()
    }
}

impl RuntimeHandle for RecordingRuntime {
    fn ready(&self) -> impl Future<Output = ()> {
        std::future::ready(())
    }

    fn create_data_file(
        &mut self,
        parent: &str,
        name: &str,
        data: &[u8],
        can_read: bool,
        can_write: bool,
    ) -> Result<(), RuntimeError> {
        if self.reject.as_deref() == Some(name) {
            return Err(crate::vfs::FsError::AlreadyExists(format!("/{}", name)).into());
        }
        self.log.push(Event::Create(name.to_string()));
        self.files.push(CreatedFile {
            parent: parent.to_string(),
            name: name.to_string(),
            data: data.to_vec(),
            can_read,
            can_write,
        });
        Ok(())
    }

    fn call_main(&mut self, args: &[String]) -> Result<i32, RuntimeError> {
        self.log.push(Event::CallMain(args.to_vec()));
        self.calls.push(args.to_vec());
        if let Some(out) = &self.output {
            for line in &self.main_output {
                out.print(line);
            }
        }
        Ok(0)
    }

    fn attach_output(&mut self, sink: Arc<dyn OutputSink>) {
        self.output = Some(sink);
    }
}

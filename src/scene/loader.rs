//! Async model loading.
//!
//! Requests are served strictly in arrival order, one at a time, on a
//! background tokio runtime. Results come back over a channel that the main
//! thread drains between frames, so a new model only ever becomes visible to
//! the inspector at a frame boundary.

use std::collections::VecDeque;
use std::path::{Path, PathBuf};

use tokio::runtime::Runtime;
use tokio::sync::mpsc;

use crate::core::{Error, Result};

use super::description::SceneDescription;
use super::graph::SceneGraph;

/// Key that resolves to the built-in demo assembly instead of a file.
pub const DEMO_KEY: &str = "demo";

/// Request to load a model
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadRequest {
    pub key: String,
}

/// Result of a model load operation
#[derive(Debug)]
pub enum LoadResult {
    /// Model parsed and instantiated
    Loaded { key: String, graph: SceneGraph },
    /// File missing or malformed
    Failed { key: String, reason: String },
}

impl LoadResult {
    /// Key of the request this result answers
    pub fn key(&self) -> &str {
        match self {
            LoadResult::Loaded { key, .. } | LoadResult::Failed { key, .. } => key,
        }
    }
}

/// Sequential background model loader
pub struct ModelLoader {
    /// Channel for sending load requests to the worker task
    request_tx: mpsc::UnboundedSender<LoadRequest>,
    /// Channel for receiving load results
    result_rx: mpsc::UnboundedReceiver<LoadResult>,
    /// Keys requested but not yet answered, oldest first
    pending: VecDeque<String>,
    /// Dedicated runtime that owns the worker
    _runtime: Runtime,
}

impl ModelLoader {
    /// Create a loader that resolves keys to `<base_dir>/<key>.json`.
    pub fn new(base_dir: impl Into<PathBuf>) -> Result<Self> {
        let base_dir = base_dir.into();
        let (request_tx, mut request_rx) = mpsc::unbounded_channel::<LoadRequest>();
        let (result_tx, result_rx) = mpsc::unbounded_channel::<LoadResult>();

        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(1)
            .thread_name("vitrine-loader")
            .enable_all()
            .build()
            .map_err(|e| Error::Runtime(format!("failed to start loader runtime: {}", e)))?;

        runtime.spawn(async move {
            Self::worker_loop(base_dir, &mut request_rx, result_tx).await;
        });

        Ok(Self {
            request_tx,
            result_rx,
            pending: VecDeque::new(),
            _runtime: runtime,
        })
    }

    /// Serve requests one after another until the request channel closes.
    async fn worker_loop(
        base_dir: PathBuf,
        request_rx: &mut mpsc::UnboundedReceiver<LoadRequest>,
        result_tx: mpsc::UnboundedSender<LoadResult>,
    ) {
        while let Some(request) = request_rx.recv().await {
            let result = Self::load_task(&base_dir, request.key).await;
            if result_tx.send(result).is_err() {
                break;
            }
        }
        log::debug!("Model loader worker stopped");
    }

    /// Load and instantiate a single model
    async fn load_task(base_dir: &Path, key: String) -> LoadResult {
        match Self::read_description(base_dir, &key).await {
            Ok(description) => LoadResult::Loaded {
                graph: description.build(),
                key,
            },
            Err(e) => LoadResult::Failed {
                reason: e.to_string(),
                key,
            },
        }
    }

    async fn read_description(base_dir: &Path, key: &str) -> Result<SceneDescription> {
        if key == DEMO_KEY {
            return SceneDescription::demo();
        }
        let path = Self::resolve(base_dir, key);
        let text = tokio::fs::read_to_string(&path).await?;
        SceneDescription::from_json_str(&text)
    }

    /// Path a key resolves to
    pub fn resolve(base_dir: &Path, key: &str) -> PathBuf {
        if key.ends_with(".json") {
            base_dir.join(key)
        } else {
            base_dir.join(format!("{}.json", key))
        }
    }

    /// Queue a model load. Requests already queued are served first.
    pub fn request(&mut self, key: impl Into<String>) -> Result<()> {
        let key = key.into();
        self.request_tx
            .send(LoadRequest { key: key.clone() })
            .map_err(|_| Error::Runtime("model loader worker stopped".into()))?;
        self.pending.push_back(key);
        Ok(())
    }

    /// Poll for completed load results (non-blocking)
    ///
    /// Returns all currently available results in request order.
    pub fn poll_results(&mut self) -> Vec<LoadResult> {
        let mut results = Vec::new();
        while let Ok(result) = self.result_rx.try_recv() {
            if let Some(pos) = self.pending.iter().position(|k| k == result.key()) {
                self.pending.remove(pos);
            }
            results.push(result);
        }
        results
    }

    /// Get the number of unanswered requests
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }
}

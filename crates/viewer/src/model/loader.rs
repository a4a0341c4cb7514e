use std::path::PathBuf;

use tokio::runtime::Handle;
use tokio::sync::oneshot;
use tracing::{error, info};

use super::{LoadedModel, ModelLoadError};

/// Background model load. The UI polls it once per frame.
pub struct ModelLoadTask {
    path: PathBuf,
    rx: Option<oneshot::Receiver<Result<LoadedModel, ModelLoadError>>>,
}

impl ModelLoadTask {
    /// Start loading `path` on a blocking worker of `handle`'s runtime.
    pub fn spawn(handle: &Handle, path: PathBuf) -> Self {
        let (tx, rx) = oneshot::channel();
        let worker_path = path.clone();
        info!("Loading model from {}", path.display());

        handle.spawn_blocking(move || {
            let result = super::load(&worker_path);
            if let Err(e) = &result {
                error!("Model load failed: {e}");
            }
            // Receiver dropped means the viewer moved on to another model
            let _ = tx.send(result);
        });

        Self { path, rx: Some(rx) }
    }

    pub fn is_pending(&self) -> bool {
        self.rx.is_some()
    }

    /// Returns the load result exactly once; `None` while still running or after it was taken.
    pub fn poll(&mut self) -> Option<Result<LoadedModel, ModelLoadError>> {
        let rx = self.rx.as_mut()?;
        match rx.try_recv() {
            Ok(result) => {
                self.rx = None;
                Some(result)
            }
            Err(oneshot::error::TryRecvError::Empty) => None,
            Err(oneshot::error::TryRecvError::Closed) => {
                self.rx = None;
                Some(Err(ModelLoadError::Parse {
                    name: self.path.display().to_string(),
                    message: "loader worker stopped".to_string(),
                }))
            }
        }
    }
}

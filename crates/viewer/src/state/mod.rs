pub mod settings;
pub mod viewer;

use std::path::PathBuf;

use tokio::runtime::Handle;
use tracing::warn;

pub use settings::AppSettings;
pub use viewer::{ModelStatus, ViewerSession};

use crate::annotation::LabelFontError;
use crate::model::loader::ModelLoadTask;
use crate::viewport::picking::Aabb;

/// Panel visibility flags
pub struct PanelVisibility {
    pub side_panel: bool,
}

impl Default for PanelVisibility {
    fn default() -> Self {
        Self { side_panel: true }
    }
}

/// Combined application state
pub struct AppState {
    pub viewer: ViewerSession,
    pub panels: PanelVisibility,
    pub settings: AppSettings,
    /// Show settings window
    pub show_settings_window: bool,
    /// Text of the inline editor for the annotation being edited
    pub edit_text: String,
    loading: Option<ModelLoadTask>,
}

impl AppState {
    pub fn new(settings: AppSettings) -> Result<Self, LabelFontError> {
        let mut viewer = ViewerSession::new()?;
        viewer.apply_settings(&settings.annotations);
        Ok(Self {
            viewer,
            panels: PanelVisibility::default(),
            settings,
            show_settings_window: false,
            edit_text: String::new(),
            loading: None,
        })
    }

    /// Tear down the current session and start loading `path` in the background.
    pub fn open_model(&mut self, handle: &Handle, path: PathBuf) {
        self.edit_text.clear();
        self.viewer.begin_loading(path.clone());
        self.loading = Some(ModelLoadTask::spawn(handle, path));
    }

    pub fn is_loading(&self) -> bool {
        self.loading.as_ref().is_some_and(|t| t.is_pending())
    }

    /// Mount a finished load. Returns the new model's bounds for camera framing.
    pub fn poll_model_load(&mut self) -> Option<Aabb> {
        let result = self.loading.as_mut()?.poll()?;
        self.loading = None;
        match result {
            Ok(model) => {
                let model = self.viewer.mount(model);
                Some(model.bounds)
            }
            Err(e) => {
                warn!("Model not mounted: {e}");
                self.viewer.load_failed(&e);
                None
            }
        }
    }
}

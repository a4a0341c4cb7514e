mod app;
mod ui;
mod viewport;

// Re-export library modules so that `crate::state`, `crate::annotation`, etc.
// resolve to the lib crate types everywhere in the binary.
pub use anatomy_viewer_lib::annotation;
pub use anatomy_viewer_lib::i18n;
pub use anatomy_viewer_lib::model;
pub use anatomy_viewer_lib::state;

use std::path::PathBuf;

use app::AnatomyApp;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "anatomy_viewer=info,anatomy_viewer_lib=info".into()),
        )
        .init();

    let initial_model = parse_model_arg(std::env::args().skip(1));

    // Model loading runs on the runtime's blocking pool; the UI thread only polls
    let runtime = match tokio::runtime::Builder::new_multi_thread()
        .worker_threads(1)
        .thread_name("model-loader")
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            tracing::error!("Failed to start loader runtime: {e}");
            return;
        }
    };

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Anatomy Viewer")
            .with_inner_size([1280.0, 820.0])
            .with_min_inner_size([720.0, 480.0]),
        ..Default::default()
    };

    if let Err(e) = eframe::run_native(
        "anatomy-viewer",
        native_options,
        Box::new(move |cc| Ok(Box::new(AnatomyApp::new(cc, runtime, initial_model)?))),
    ) {
        tracing::error!("Failed to start application: {e}");
    }
}

/// `--model <path>` selects the OBJ file to open at startup.
fn parse_model_arg(mut args: impl Iterator<Item = String>) -> Option<PathBuf> {
    while let Some(arg) = args.next() {
        if arg == "--model" {
            let path = args.next();
            if path.is_none() {
                tracing::warn!("--model expects a path; starting with the demo specimen");
            }
            return path.map(PathBuf::from);
        }
    }
    None
}

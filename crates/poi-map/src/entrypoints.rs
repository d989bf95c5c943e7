//! Native entry point: logging, build metadata and the eframe window

use shadow_rs::shadow;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::prelude::*;

shadow!(build);

/// Used when `RUST_LOG` is not set
const DEFAULT_LOG_FILTER: &str = "info,wgpu_hal=warn,eframe=warn";

/// Install the fmt subscriber; `RUST_LOG` overrides the default filter
pub fn setup_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_filter(filter))
        .init();
}

pub fn log_version_info() {
    tracing::info!("{}", short_version_info());
    tracing::info!(
        "Build date: {} ({})",
        build::BUILD_TIME_2822,
        build::BUILD_RUST_CHANNEL
    );
}

pub fn short_version_info() -> String {
    format!(
        "{} {} ({}@{}{})",
        build::PROJECT_NAME,
        build::PKG_VERSION,
        build::BRANCH,
        build::SHORT_COMMIT,
        if build::GIT_CLEAN { "" } else { "+dirty" }
    )
}

/// Entry point for desktop platforms
pub async fn native_main(
    app_name: &str,
    app_creator: impl FnOnce(&eframe::CreationContext<'_>) -> Box<dyn eframe::App>,
) {
    setup_logging();
    log_version_info();

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 800.0])
            .with_title(app_name),
        ..Default::default()
    };

    if let Err(e) = eframe::run_native(
        app_name,
        native_options,
        Box::new(move |cc| Ok(app_creator(cc))),
    ) {
        tracing::error!("Failed to run {app_name}: {e}");
    }
}

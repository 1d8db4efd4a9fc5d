mod app;
mod catalog;
mod imaging;
mod infra;
mod ui;

use std::path::Path;
use std::process::ExitCode;

use log::{error, warn};

use app::{FormController, Notice};
use catalog::SqliteRecordStore;
use imaging::FsImageResolver;
use infra::config::{AppConfig, CONFIG_FILE};

fn main() -> ExitCode {
    infra::logging::init_logging();

    let (config, config_notice) = load_config(Path::new(CONFIG_FILE));
    if let Some(notice) = config_notice {
        ui::show_notice(&notice);
    }

    let controller = match build_controller(&config) {
        Ok(controller) => controller,
        Err(error) => {
            let message = format!("failed to open student database: {error}");
            eprintln!("{message}");
            ui::show_notice(&Notice::error(message));
            return ExitCode::from(1);
        }
    };

    match ui::launch_window(&config, controller) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            error!("{error}");
            eprintln!("{error}");
            ExitCode::from(1)
        }
    }
}

/// Falls back to defaults on a bad config file and returns the warning to show.
fn load_config(path: &Path) -> (AppConfig, Option<Notice>) {
    match AppConfig::load(path) {
        Ok(config) => (config, None),
        Err(error) => {
            warn!("{error}; using default settings");
            let notice = Notice::warning(format!("{error}\n\nDefault settings will be used."));
            (AppConfig::default(), Some(notice))
        }
    }
}

fn build_controller(config: &AppConfig) -> Result<FormController, catalog::StoreError> {
    let store = SqliteRecordStore::open(&config.database_path)?;
    let resolver = FsImageResolver::new(config.thumbnail_size, config.full_view_size);

    let mut controller = FormController::new(Box::new(store), Box::new(resolver));
    controller.bootstrap()?;
    Ok(controller)
}

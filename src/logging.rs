use std::fs::{self, File};
use std::path::Path;

use color_eyre::eyre::{Result, eyre};
use tracing_subscriber::EnvFilter;

/// Install a JSON-lines subscriber writing to `output_path`.
///
/// The terminal belongs to the view, so logs only ever go to a file. The
/// filter comes from `RUST_LOG` when set, else from `default_directive`.
pub fn init_file_logging(output_path: &Path, default_directive: &str) -> Result<()> {
    ensure_parent_dir(output_path)?;
    let file = File::options()
        .create(true)
        .append(true)
        .open(output_path)?;
    let make_writer = move || {
        file.try_clone()
            .expect("failed to clone log output file")
    };

    let subscriber = tracing_subscriber::fmt()
        .with_ansi(false)
        .json()
        .with_env_filter(env_filter(default_directive))
        .with_writer(make_writer)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| eyre!("failed to set tracing subscriber: {e}"))?;
    Ok(())
}

fn env_filter(default_directive: &str) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_directive))
        .unwrap_or_else(|_| EnvFilter::new("info"))
}

fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)?;
    }
    Ok(())
}

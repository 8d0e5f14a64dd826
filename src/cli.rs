// Pieces shared by the command-line converters.
use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::Args;
use log::{error, warn};

use crate::{
    common::Palette,
    mode0::DecodeSettings,
    persist,
    state::{self, ProjectDirs},
};

pub fn init_logging() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp(None)
        .init();
}

#[derive(Args, Debug)]
pub struct ProjectArgs {
    /// Project root holding raw/, png/, Content/ and assets/ (defaults to the configured
    /// project directory, then the current directory)
    #[arg(long)]
    pub project_dir: Option<PathBuf>,
}

impl ProjectArgs {
    pub fn dirs(&self) -> Result<ProjectDirs> {
        if let Some(dir) = &self.project_dir {
            return Ok(ProjectDirs::new(dir.clone()));
        }
        let config = state::load_config(&state::get_config_path()?)?;
        state::resolve_project_dir(None, &config)
    }
}

#[derive(Args, Debug)]
pub struct PaletteArgs {
    /// JSON palette file to use instead of the CPC hardware colors
    #[arg(long)]
    pub palette: Option<PathBuf>,
}

impl PaletteArgs {
    pub fn palette(&self) -> Result<Palette> {
        match &self.palette {
            Some(path) => persist::load_palette(path),
            None => Ok(Palette::cpc_mode0()),
        }
    }

    pub fn decode_settings(&self) -> Result<DecodeSettings> {
        Ok(DecodeSettings {
            palette: self.palette()?,
            ..Default::default()
        })
    }
}

/// Per-run tally for batch converters; one failed file never stops the batch.
#[derive(Default, Debug)]
pub struct BatchSummary {
    pub processed: usize,
    pub skipped: usize,
    pub failed: usize,
}

impl BatchSummary {
    /// Returns false if `path` is missing, after reporting it as skipped.
    pub fn check_exists(&mut self, path: &Path) -> bool {
        if path.exists() {
            return true;
        }
        warn!("SKIPPED: {} (not found)", path.display());
        self.skipped += 1;
        false
    }

    pub fn record<T>(&mut self, path: &Path, result: Result<T>) -> Option<T> {
        match result {
            Ok(value) => {
                self.processed += 1;
                Some(value)
            }
            Err(e) => {
                error!("Error processing {}: {:#}", path.display(), e);
                self.failed += 1;
                None
            }
        }
    }

    pub fn report(&self, what: &str) {
        println!(
            "Done! Processed {} {}, skipped {}, failed {}.",
            self.processed, what, self.skipped, self.failed
        );
    }
}

pub fn banner(title: &str) {
    println!("{}", "=".repeat(60));
    println!("{}", title);
    println!("{}", "=".repeat(60));
}

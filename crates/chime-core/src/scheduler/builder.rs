//! Builder for creating and configuring Scheduler instances.

use std::path::{Path, PathBuf};

use jiff::tz::TimeZone;
use log::debug;
use tokio::task;

use super::Scheduler;
use crate::{
    error::{ChimeError, Result},
    store::SqliteStore,
};

/// Builder for creating and configuring Scheduler instances.
#[derive(Debug, Clone)]
pub struct SchedulerBuilder {
    database_path: Option<PathBuf>,
    time_zone: Option<TimeZone>,
}

impl SchedulerBuilder {
    pub fn new() -> Self {
        Self {
            database_path: None,
            time_zone: None,
        }
    }

    /// Sets a custom database file path.
    ///
    /// If not specified, uses XDG Base Directory specification:
    /// `$XDG_DATA_HOME/chime/chime.db` or `~/.local/share/chime/chime.db`
    pub fn with_database_path<P: AsRef<Path>>(mut self, path: Option<P>) -> Self {
        if let Some(path) = path {
            self.database_path = Some(path.as_ref().to_path_buf());
        }
        self
    }

    /// Sets the zone fixed-time steps are evaluated in. Defaults to the
    /// system zone.
    pub fn with_time_zone(mut self, time_zone: TimeZone) -> Self {
        self.time_zone = Some(time_zone);
        self
    }

    /// Builds the configured scheduler, creating the database if needed.
    ///
    /// # Errors
    ///
    /// Returns `ChimeError::FileSystem` if the database directory cannot be
    /// created, or `ChimeError::Database` if schema initialization fails.
    pub async fn build(self) -> Result<Scheduler> {
        let db_path = match self.database_path {
            Some(path) => path,
            None => Self::default_database_path()?,
        };

        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| ChimeError::FileSystem {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        let db_path_clone = db_path.clone();
        task::spawn_blocking(move || SqliteStore::open(&db_path_clone).map(drop))
            .await
            .map_err(|e| ChimeError::Configuration {
                message: format!("Task join error: {e}"),
            })??;

        let time_zone = self.time_zone.unwrap_or_else(TimeZone::system);
        debug!(
            "Scheduler ready at {} in zone {}",
            db_path.display(),
            time_zone.iana_name().unwrap_or("system")
        );
        Ok(Scheduler::new(db_path, time_zone))
    }

    fn default_database_path() -> Result<PathBuf> {
        xdg::BaseDirectories::with_prefix("chime")
            .place_data_file("chime.db")
            .map_err(|e| ChimeError::XdgDirectory(e.to_string()))
    }
}

impl Default for SchedulerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

//! AsyncDirStorage-based SessionRepository implementation

use crate::dto::create_session_migrator;
use crate::paths::PrepPaths;
use async_trait::async_trait;
use prep_core::{
    config::PrepConfig,
    error::{PrepError, Result},
    session::{Session, SessionRepository, sort_by_creation},
};
use std::path::{Path, PathBuf};
use tokio::fs;
use version_migrate::{
    AppPaths, AsyncDirStorage, DirStorageStrategy, FilenameEncoding, FormatStrategy, PathStrategy,
};

const ENTITY_NAME: &str = "session";

/// AsyncDirStorage-based session repository.
///
/// Directory structure (the `data/prep` segment comes from `AppPaths`
/// with a `CustomBase` strategy):
/// ```text
/// base_dir/
/// └── data/prep/sessions/
///     ├── <session-uuid-1>.toml
///     └── <session-uuid-2>.toml
/// ```
///
/// Ids are used as file names verbatim, so only ASCII alphanumerics, `-` and
/// `_` can name a stored session. Any other id is reported as absent.
///
/// Each record is written to a temporary file and renamed into place by
/// `AsyncDirStorage`, so a reader sees either the old or the new record.
pub struct AsyncDirSessionRepository {
    storage: AsyncDirStorage,
    base_dir: PathBuf,
}

/// Whether a storage error means "the record does not exist".
pub(crate) fn is_not_found(error: &impl std::fmt::Display) -> bool {
    let error_str = error.to_string();
    error_str.contains("No such file or directory")
        || error_str.contains("not found")
        || error_str.contains("cannot find")
}

/// Whether `id` can be used as a record file name.
fn is_storable_id(id: &str) -> bool {
    !id.is_empty()
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

impl AsyncDirSessionRepository {
    /// Creates a repository under the configured data directory, falling back
    /// to the platform data directory when `config.data_dir` is unset.
    ///
    /// # Errors
    ///
    /// Returns `Config` if no data directory can be determined, or `Storage`
    /// if the directory structure cannot be created.
    pub async fn default_location(config: &PrepConfig) -> Result<Self> {
        let base_dir = match &config.data_dir {
            Some(dir) => dir.clone(),
            None => PrepPaths::data_dir()?,
        };
        Self::new(base_dir).await
    }

    /// Creates a new AsyncDirSessionRepository rooted at `base_dir`.
    pub async fn new(base_dir: impl AsRef<Path>) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();

        fs::create_dir_all(&base_dir).await.map_err(|e| {
            PrepError::storage(format!("Failed to create base directory: {}", e))
        })?;

        let paths = AppPaths::new("prep").data_strategy(PathStrategy::CustomBase(base_dir.clone()));
        let migrator = create_session_migrator();

        // Setup storage strategy: TOML format, Direct filename encoding
        let strategy = DirStorageStrategy::default()
            .with_format(FormatStrategy::Toml)
            .with_filename_encoding(FilenameEncoding::Direct);

        let storage = AsyncDirStorage::new(paths, "sessions", migrator, strategy)
            .await
            .map_err(|e| PrepError::storage(format!("Failed to create AsyncDirStorage: {}", e)))?;

        tracing::debug!("Session storage at {}", storage.base_path().display());

        Ok(Self { storage, base_dir })
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Directory holding the session records.
    pub fn sessions_dir(&self) -> &Path {
        self.storage.base_path()
    }
}

#[async_trait]
impl SessionRepository for AsyncDirSessionRepository {
    async fn find_by_id(&self, session_id: &str) -> Result<Option<Session>> {
        if !is_storable_id(session_id) {
            tracing::debug!("Session id {:?} cannot name a record", session_id);
            return Ok(None);
        }
        match self.storage.load::<Session>(ENTITY_NAME, session_id).await {
            Ok(session) => Ok(Some(session)),
            Err(e) => {
                if is_not_found(&e) {
                    Ok(None)
                } else {
                    Err(PrepError::storage(format!(
                        "Failed to load session {}: {}",
                        session_id, e
                    )))
                }
            }
        }
    }

    async fn save(&self, session: &Session) -> Result<()> {
        self.storage
            .save(ENTITY_NAME, &session.id, session)
            .await
            .map_err(|e| PrepError::storage(format!("Failed to save session: {}", e)))
    }

    async fn delete(&self, session_id: &str) -> Result<()> {
        if !is_storable_id(session_id) {
            return Ok(());
        }
        match self.storage.delete(session_id).await {
            Ok(()) => Ok(()),
            Err(e) if is_not_found(&e) => Ok(()),
            Err(e) => Err(PrepError::storage(format!(
                "Failed to delete session: {}",
                e
            ))),
        }
    }

    async fn list_all(&self) -> Result<Vec<Session>> {
        let all_sessions = self
            .storage
            .load_all::<Session>(ENTITY_NAME)
            .await
            .map_err(|e| PrepError::storage(format!("Failed to load all sessions: {}", e)))?;

        let mut sessions: Vec<Session> = all_sessions.into_iter().map(|(_, s)| s).collect();
        sort_by_creation(&mut sessions);

        Ok(sessions)
    }
}

// config.rs — Workspace configuration.
//
// WorkspaceConfig determines where the CLI keeps local state and which
// remote endpoint (if any) mirrors it. Without a notewell.toml the
// defaults place everything under a `.notewell/` directory in the
// workspace root and run without a remote — the engine then settles into
// local-only mode on its own.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::Deserialize;

use nw_cache::JsonSnapshotStore;
use nw_remote::{DisabledRemote, HttpRemoteStore, RemoteStore};
use nw_sync::{EngineConfig, SyncEngine, SystemClock};

/// Remote endpoint settings from the `[remote]` table.
#[derive(Debug, Clone, Deserialize)]
pub struct RemoteConfig {
    pub base_url: String,
    #[serde(default)]
    pub token: Option<String>,
}

/// Resolved workspace configuration.
#[derive(Debug, Clone)]
pub struct WorkspaceConfig {
    /// Directory holding the goal snapshot cache.
    pub data_dir: PathBuf,
    /// Default page scope for goal commands.
    pub page_id: Option<String>,
    /// Remote goal store, when configured.
    pub remote: Option<RemoteConfig>,
}

/// The raw shape of notewell.toml; everything is optional.
#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    data_dir: Option<PathBuf>,
    page_id: Option<String>,
    remote: Option<RemoteConfig>,
}

impl WorkspaceConfig {
    /// Defaults for a workspace with no config file.
    pub fn for_dir(root: impl AsRef<Path>) -> Self {
        Self {
            data_dir: root.as_ref().join(".notewell"),
            page_id: None,
            remote: None,
        }
    }

    /// Load `notewell.toml` from the workspace root, falling back to
    /// defaults when absent. Relative paths resolve against the root.
    pub fn load(root: impl AsRef<Path>) -> anyhow::Result<Self> {
        let root = root.as_ref();
        let path = root.join("notewell.toml");
        if !path.exists() {
            return Ok(Self::for_dir(root));
        }

        let raw = fs::read_to_string(&path)?;
        let file: ConfigFile = toml::from_str(&raw)?;

        let data_dir = match file.data_dir {
            Some(dir) if dir.is_absolute() => dir,
            Some(dir) => root.join(dir),
            None => root.join(".notewell"),
        };

        Ok(Self {
            data_dir,
            page_id: file.page_id,
            remote: file.remote,
        })
    }

    /// Build a sync engine from this configuration.
    pub fn build_engine(&self) -> anyhow::Result<SyncEngine> {
        let cache = Arc::new(JsonSnapshotStore::new(&self.data_dir)?);
        let remote: Arc<dyn RemoteStore> = match &self.remote {
            Some(remote) => Arc::new(HttpRemoteStore::new(
                remote.base_url.clone(),
                remote.token.clone(),
            )),
            None => Arc::new(DisabledRemote),
        };
        Ok(SyncEngine::new(
            cache,
            remote,
            Arc::new(SystemClock),
            EngineConfig::default(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn defaults_when_no_config_file() {
        let dir = TempDir::new().unwrap();
        let config = WorkspaceConfig::load(dir.path()).unwrap();
        assert_eq!(config.data_dir, dir.path().join(".notewell"));
        assert!(config.page_id.is_none());
        assert!(config.remote.is_none());
    }

    #[test]
    fn loads_remote_and_page_from_toml() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("notewell.toml"),
            r#"
page_id = "P1"
data_dir = "state"

[remote]
base_url = "https://api.notewell.dev/v1"
token = "secret"
"#,
        )
        .unwrap();

        let config = WorkspaceConfig::load(dir.path()).unwrap();
        assert_eq!(config.data_dir, dir.path().join("state"));
        assert_eq!(config.page_id.as_deref(), Some("P1"));
        let remote = config.remote.unwrap();
        assert_eq!(remote.base_url, "https://api.notewell.dev/v1");
        assert_eq!(remote.token.as_deref(), Some("secret"));
    }

    #[test]
    fn build_engine_without_remote_works() {
        let dir = TempDir::new().unwrap();
        let config = WorkspaceConfig::load(dir.path()).unwrap();
        let engine = config.build_engine().unwrap();
        assert!(engine
            .list_goals(&nw_sync::GoalFilter::default())
            .is_empty());
    }
}

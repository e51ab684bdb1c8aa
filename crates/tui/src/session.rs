use std::{fs, path::Path};

use api_types::{contract::Contract, series::Series};
use serde::{Deserialize, Serialize};

const DEFAULT_STATE_PATH: &str = "config/minter_state.json";

/// Which screen is showing. Each variant carries the record it needs, so a
/// screen that requires a selection cannot be reached without one.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "view", rename_all = "snake_case")]
pub enum View {
    #[default]
    Login,
    Contracts,
    Contract {
        contract: Contract,
    },
    CreateContract,
    CreateSeries {
        contract: Contract,
    },
    Mint {
        contract: Contract,
        series: Series,
    },
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
struct SessionState {
    view: View,
    api_token: Option<String>,
    busy: bool,
}

/// Session state that survives restarts: the current view (with its
/// selections), the auth token, and the request-in-flight flag.
///
/// Every mutation replaces exactly the named field and mirrors the whole
/// state to a JSON file. A file that is missing or fails to deserialize is
/// treated as absent and the session starts from defaults. No versioning.
#[derive(Debug)]
pub struct SessionStore {
    state: SessionState,
    path: String,
}

impl SessionStore {
    pub fn load(path: &str) -> Self {
        let state = match fs::read_to_string(path) {
            Ok(content) => match serde_json::from_str::<SessionState>(&content) {
                Ok(state) => state,
                Err(err) => {
                    tracing::warn!("session file unreadable, starting fresh: {err}");
                    SessionState::default()
                }
            },
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => SessionState::default(),
            Err(err) => {
                tracing::warn!("failed to read session file, starting fresh: {err}");
                SessionState::default()
            }
        };

        let mut store = Self {
            state,
            path: path.to_string(),
        };
        // A kill mid-request leaves busy stranded on disk; every process
        // start recovers it.
        store.state.busy = false;
        store
    }

    pub fn view(&self) -> &View {
        &self.state.view
    }

    pub fn token(&self) -> Option<&str> {
        self.state.api_token.as_deref()
    }

    pub fn busy(&self) -> bool {
        self.state.busy
    }

    /// The selected contract, if the current view carries one.
    pub fn contract(&self) -> Option<&Contract> {
        match &self.state.view {
            View::Contract { contract }
            | View::CreateSeries { contract }
            | View::Mint { contract, .. } => Some(contract),
            _ => None,
        }
    }

    /// The selected series, if the current view carries one.
    pub fn series(&self) -> Option<&Series> {
        match &self.state.view {
            View::Mint { series, .. } => Some(series),
            _ => None,
        }
    }

    pub fn set_view(&mut self, view: View) {
        self.state.view = view;
        self.persist();
    }

    /// Stores the chosen contract and moves to its series screen.
    pub fn select_contract(&mut self, contract: Contract) {
        self.set_view(View::Contract { contract });
    }

    /// Stores the chosen series and moves to the mint screen.
    pub fn select_series(&mut self, contract: Contract, series: Series) {
        self.set_view(View::Mint { contract, series });
    }

    pub fn set_token(&mut self, token: String) {
        self.state.api_token = Some(token);
        self.persist();
    }

    pub fn lock(&mut self) {
        self.state.busy = true;
        self.persist();
    }

    pub fn unlock(&mut self) {
        self.state.busy = false;
        self.persist();
    }

    /// Mirrors the state to disk. A write failure only costs persistence
    /// across restarts, so it is logged instead of unwinding the UI.
    fn persist(&self) {
        if let Err(err) = self.write_state() {
            tracing::warn!("failed to persist session state: {err}");
        }
    }

    fn write_state(&self) -> std::io::Result<()> {
        if let Some(parent) = Path::new(&self.path).parent() {
            fs::create_dir_all(parent)?;
        }
        let payload = serde_json::to_string_pretty(&self.state)?;
        fs::write(&self.path, payload)
    }
}

pub fn default_state_path() -> &'static str {
    DEFAULT_STATE_PATH
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_at(dir: &tempfile::TempDir) -> (SessionStore, String) {
        let path = dir
            .path()
            .join("state.json")
            .to_string_lossy()
            .into_owned();
        (SessionStore::load(&path), path)
    }

    fn sample_contract() -> Contract {
        Contract {
            id: 4,
            name: "Gallery".to_string(),
            address: "KT1abc".to_string(),
        }
    }

    #[test]
    fn starts_from_defaults_when_file_missing() {
        let dir = tempfile::tempdir().unwrap();
        let (store, _) = store_at(&dir);
        assert_eq!(store.view(), &View::Login);
        assert_eq!(store.token(), None);
        assert!(!store.busy());
    }

    #[test]
    fn mutations_round_trip_through_disk() {
        let dir = tempfile::tempdir().unwrap();
        let (mut store, path) = store_at(&dir);

        store.set_token("abc".to_string());
        store.select_contract(sample_contract());

        let on_disk: SessionState =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(on_disk, store.state);

        let reloaded = SessionStore::load(&path);
        assert_eq!(reloaded.view(), store.view());
        assert_eq!(reloaded.token(), Some("abc"));
    }

    #[test]
    fn selecting_a_contract_moves_to_its_view() {
        let dir = tempfile::tempdir().unwrap();
        let (mut store, _) = store_at(&dir);

        let contract = sample_contract();
        store.select_contract(contract.clone());

        assert_eq!(store.view(), &View::Contract {
            contract: contract.clone()
        });
        assert_eq!(store.contract(), Some(&contract));
    }

    #[test]
    fn selecting_a_series_moves_to_mint() {
        let dir = tempfile::tempdir().unwrap();
        let (mut store, _) = store_at(&dir);

        let contract = sample_contract();
        let series = Series {
            id: 9,
            name: "Spring".to_string(),
            contract: Some(contract.id),
        };
        store.select_series(contract, series.clone());

        assert_eq!(store.series(), Some(&series));
    }

    #[test]
    fn busy_flag_is_cleared_on_load() {
        let dir = tempfile::tempdir().unwrap();
        let (mut store, path) = store_at(&dir);

        store.lock();
        assert!(store.busy());

        let reloaded = SessionStore::load(&path);
        assert!(!reloaded.busy());
    }

    #[test]
    fn corrupt_file_resets_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir
            .path()
            .join("state.json")
            .to_string_lossy()
            .into_owned();
        fs::write(&path, "{not json").unwrap();

        let store = SessionStore::load(&path);
        assert_eq!(store.view(), &View::Login);
        assert_eq!(store.token(), None);
    }
}

use std::fs;
use std::io::Write;
use std::path::PathBuf;

use anyhow::Result;
use serde::{Serialize, de::DeserializeOwned};

use crate::session::store::Persistence;
use crate::store::schema::{ProfileData, SessionData};

const SESSION_FILE: &str = "session.json";
const PROFILE_FILE: &str = "profile.json";

/// File-backed persistence under the user data directory.
pub struct JsonStore {
    base_dir: PathBuf,
}

impl JsonStore {
    pub fn new() -> Result<Self> {
        let base_dir = dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("clozer");
        fs::create_dir_all(&base_dir)?;
        Ok(Self { base_dir })
    }

    pub fn with_base_dir(base_dir: PathBuf) -> Result<Self> {
        fs::create_dir_all(&base_dir)?;
        Ok(Self { base_dir })
    }

    fn file_path(&self, name: &str) -> PathBuf {
        self.base_dir.join(name)
    }

    /// Missing, unreadable or unparsable files all load as `None`.
    fn load<T: DeserializeOwned>(&self, name: &str) -> Option<T> {
        let content = fs::read_to_string(self.file_path(name)).ok()?;
        match serde_json::from_str(&content) {
            Ok(data) => Some(data),
            Err(e) => {
                tracing::warn!(file = name, error = %e, "discarding unparsable store file");
                None
            }
        }
    }

    fn save<T: Serialize>(&self, name: &str, data: &T) -> Result<()> {
        let path = self.file_path(name);
        let tmp_path = path.with_extension("tmp");

        let json = serde_json::to_string_pretty(data)?;
        let mut file = fs::File::create(&tmp_path)?;
        file.write_all(json.as_bytes())?;
        file.sync_all()?;

        fs::rename(&tmp_path, &path)?;
        Ok(())
    }
}

impl Persistence for JsonStore {
    fn load_session(&self) -> Option<SessionData> {
        self.load::<SessionData>(SESSION_FILE)
            .filter(|data| !data.needs_reset())
    }

    fn save_session(&self, data: &SessionData) -> Result<()> {
        self.save(SESSION_FILE, data)
    }

    fn clear_session(&self) -> Result<()> {
        let path = self.file_path(SESSION_FILE);
        if path.exists() {
            fs::remove_file(path)?;
        }
        Ok(())
    }

    fn load_profile(&self) -> Option<ProfileData> {
        self.load::<ProfileData>(PROFILE_FILE)
            .filter(|data| !data.needs_reset())
    }

    fn save_profile(&self, data: &ProfileData) -> Result<()> {
        self.save(PROFILE_FILE, data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::state::UserAnswer;
    use chrono::Utc;
    use tempfile::TempDir;

    fn make_test_store() -> (TempDir, JsonStore) {
        let dir = TempDir::new().unwrap();
        let store = JsonStore::with_base_dir(dir.path().to_path_buf()).unwrap();
        (dir, store)
    }

    #[test]
    fn test_empty_store_loads_nothing() {
        let (_dir, store) = make_test_store();
        assert!(store.load_session().is_none());
        assert!(store.load_profile().is_none());
    }

    #[test]
    fn test_session_round_trip() {
        let (_dir, store) = make_test_store();
        let data = SessionData {
            current_question_index: 1,
            answers: vec![UserAnswer {
                question_id: "q1".to_string(),
                selected_answers: vec![Some("x".to_string()), None],
                is_correct: false,
                answered_at: Utc::now(),
            }],
            ..SessionData::default()
        };
        store.save_session(&data).unwrap();
        assert_eq!(store.load_session(), Some(data));
    }

    #[test]
    fn test_save_leaves_no_tmp_file() {
        let (dir, store) = make_test_store();
        store.save_profile(&ProfileData::new("Ada")).unwrap();
        let tmp_files: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.path().extension().and_then(|x| x.to_str()) == Some("tmp"))
            .collect();
        assert!(tmp_files.is_empty(), "no residual .tmp files");
        assert_eq!(store.load_profile().unwrap().user_name, "Ada");
    }

    #[test]
    fn test_corrupt_file_loads_as_none() {
        let (_dir, store) = make_test_store();
        fs::write(store.file_path(SESSION_FILE), "{not json").unwrap();
        assert!(store.load_session().is_none());
    }

    #[test]
    fn test_stale_schema_loads_as_none() {
        let (_dir, store) = make_test_store();
        fs::write(
            store.file_path(PROFILE_FILE),
            r#"{"schema_version": 0, "user_name": "old"}"#,
        )
        .unwrap();
        assert!(store.load_profile().is_none());
    }

    #[test]
    fn test_clear_session_keeps_profile() {
        let (_dir, store) = make_test_store();
        store.save_session(&SessionData::default()).unwrap();
        store.save_profile(&ProfileData::new("Ada")).unwrap();
        store.clear_session().unwrap();
        assert!(store.load_session().is_none());
        assert!(store.load_profile().is_some());
        // Clearing twice is fine.
        store.clear_session().unwrap();
    }
}

use std::fs;
use std::io::Write;
use std::path::PathBuf;

use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::backend::Session;

/// Bump when the cached session layout changes; older caches are discarded
/// and the user signs in again.
const SCHEMA_VERSION: u32 = 1;

const SESSION_FILE: &str = "session.json";

#[derive(Serialize, Deserialize)]
struct CachedSession {
    schema_version: u32,
    cached_at: DateTime<Utc>,
    session: Session,
}

/// Persists the auth session across runs so the app can skip the sign-in
/// screen. Tokens are stored as-is; expiry is the backend's call, a stale
/// token simply fails the first request and drops back to the auth screen.
pub struct SessionCache {
    base_dir: PathBuf,
}

impl SessionCache {
    pub fn new() -> Result<Self> {
        let base_dir = dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("flashbear");
        fs::create_dir_all(&base_dir)?;
        Ok(Self { base_dir })
    }

    pub fn with_base_dir(base_dir: PathBuf) -> Result<Self> {
        fs::create_dir_all(&base_dir)?;
        Ok(Self { base_dir })
    }

    fn file_path(&self) -> PathBuf {
        self.base_dir.join(SESSION_FILE)
    }

    /// None when there is no cache, the file can't be parsed, or it was
    /// written by a different schema version.
    pub fn load(&self) -> Option<Session> {
        let content = fs::read_to_string(self.file_path()).ok()?;
        let cached: CachedSession = serde_json::from_str(&content).ok()?;
        if cached.schema_version != SCHEMA_VERSION {
            return None;
        }
        Some(cached.session)
    }

    pub fn save(&self, session: &Session) -> Result<()> {
        let path = self.file_path();
        let tmp_path = path.with_extension("tmp");

        let cached = CachedSession {
            schema_version: SCHEMA_VERSION,
            cached_at: Utc::now(),
            session: session.clone(),
        };
        let json = serde_json::to_string_pretty(&cached)?;
        let mut file = fs::File::create(&tmp_path)?;
        file.write_all(json.as_bytes())?;
        file.sync_all()?;

        fs::rename(&tmp_path, &path)?;
        Ok(())
    }

    pub fn clear(&self) -> Result<()> {
        let path = self.file_path();
        if path.exists() {
            fs::remove_file(&path)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::User;
    use tempfile::TempDir;

    fn make_test_cache() -> (TempDir, SessionCache) {
        let dir = TempDir::new().unwrap();
        let cache = SessionCache::with_base_dir(dir.path().to_path_buf()).unwrap();
        (dir, cache)
    }

    fn make_session() -> Session {
        Session {
            access_token: "access".to_string(),
            refresh_token: "refresh".to_string(),
            user: User {
                id: "u-1".to_string(),
                email: "a@example.com".to_string(),
            },
        }
    }

    #[test]
    fn test_round_trip() {
        let (_dir, cache) = make_test_cache();
        cache.save(&make_session()).unwrap();

        let loaded = cache.load().unwrap();
        assert_eq!(loaded.access_token, "access");
        assert_eq!(loaded.user.email, "a@example.com");
    }

    #[test]
    fn test_missing_file_loads_none() {
        let (_dir, cache) = make_test_cache();
        assert!(cache.load().is_none());
    }

    #[test]
    fn test_corrupt_file_loads_none() {
        let (_dir, cache) = make_test_cache();
        fs::write(cache.file_path(), "not json").unwrap();
        assert!(cache.load().is_none());
    }

    #[test]
    fn test_schema_mismatch_discards_cache() {
        let (_dir, cache) = make_test_cache();
        cache.save(&make_session()).unwrap();

        let content = fs::read_to_string(cache.file_path()).unwrap();
        let bumped = content.replace("\"schema_version\": 1", "\"schema_version\": 99");
        fs::write(cache.file_path(), bumped).unwrap();

        assert!(cache.load().is_none());
    }

    #[test]
    fn test_clear_removes_file() {
        let (_dir, cache) = make_test_cache();
        cache.save(&make_session()).unwrap();
        cache.clear().unwrap();
        assert!(cache.load().is_none());
        // Clearing twice is fine.
        cache.clear().unwrap();
    }

    #[test]
    fn test_save_leaves_no_tmp_file() {
        let (_dir, cache) = make_test_cache();
        cache.save(&make_session()).unwrap();
        assert!(!cache.file_path().with_extension("tmp").exists());
    }
}

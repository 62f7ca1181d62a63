// Timestamped JSON backups of the whole league.
//
// Backups use the same JSON layout as the file backend and are restored
// through `LeagueStore::restore_from_snapshot`.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use tracing::info;

use super::json::{read_league_file, write_league_file};
use super::StoreError;
use crate::league::state::LeagueState;

const BACKUP_PREFIX: &str = "league_";
const BACKUP_EXT: &str = ".json";

/// File name for a backup taken at `now`.
///
/// Format: `league_YYYYMMDD_HHMMSS_mmm.json`. Names sort chronologically.
pub fn backup_file_name(now: DateTime<Utc>) -> String {
    format!("{BACKUP_PREFIX}{}{BACKUP_EXT}", now.format("%Y%m%d_%H%M%S_%3f"))
}

/// Write `state` to a new backup file in `dir` and return its path.
pub fn export(state: &LeagueState, dir: &Path) -> Result<PathBuf, StoreError> {
    let path = dir.join(backup_file_name(Utc::now()));
    write_league_file(&path, state)?;
    info!("Wrote league backup to {}", path.display());
    Ok(path)
}

/// Read a backup file.
pub fn read(path: &Path) -> Result<LeagueState, StoreError> {
    read_league_file(path)
}

/// The newest backup in `dir`, if any. A missing directory has no backups.
pub fn latest(dir: &Path) -> Result<Option<PathBuf>, StoreError> {
    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => {
            return Err(StoreError::Io {
                path: dir.to_path_buf(),
                source: e,
            })
        }
    };

    let mut newest: Option<PathBuf> = None;
    for entry in entries {
        let entry = entry.map_err(|e| StoreError::Io {
            path: dir.to_path_buf(),
            source: e,
        })?;
        let path = entry.path();
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        if !(name.starts_with(BACKUP_PREFIX) && name.ends_with(BACKUP_EXT)) {
            continue;
        }
        let is_newer = match newest.as_ref().and_then(|p| p.file_name()).and_then(|n| n.to_str()) {
            Some(current) => name > current,
            None => true,
        };
        if is_newer {
            newest = Some(path);
        }
    }
    Ok(newest)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::fs;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir =
            std::env::temp_dir().join(format!("matchday_backup_{name}_{}", std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        dir
    }

    #[test]
    fn file_name_format() {
        let ts = Utc.with_ymd_and_hms(2026, 3, 7, 14, 30, 22).unwrap();
        assert_eq!(backup_file_name(ts), "league_20260307_143022_000.json");
    }

    #[test]
    fn export_creates_dir_and_reads_back() {
        let dir = scratch_dir("export");
        let state = LeagueState::with_default_roster(3, "Club");

        let path = export(&state, &dir).unwrap();

        assert!(path.starts_with(&dir));
        assert_eq!(read(&path).unwrap(), state);
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn latest_picks_newest_name_and_ignores_other_files() {
        let dir = scratch_dir("latest");
        fs::create_dir_all(&dir).unwrap();
        let state = LeagueState::with_default_roster(2, "T");
        for name in [
            "league_20250101_000000_000.json",
            "league_20260101_000000_000.json",
            "league_20251231_235959_999.json",
        ] {
            write_league_file(&dir.join(name), &state).unwrap();
        }
        fs::write(dir.join("zzz_notes.txt"), "x").unwrap();

        let newest = latest(&dir).unwrap().unwrap();
        assert_eq!(
            newest.file_name().unwrap().to_str().unwrap(),
            "league_20260101_000000_000.json"
        );
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn latest_in_missing_dir_is_none() {
        let dir = scratch_dir("nowhere");
        assert!(latest(&dir).unwrap().is_none());
    }
}

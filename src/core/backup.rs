//! Manual backup and restore of the database file.
//!
//! Restore never happens automatically: it snapshots the current database
//! first (in case the chosen backup turns out to be bad), overwrites the
//! live file, and takes effect on the next open.

use crate::db::migrate::backups_dir;
use crate::errors::{AppError, AppResult};
use crate::ui::messages::success;
use chrono::Local;
use std::fs;
use std::path::{Path, PathBuf};
use zip::ZipWriter;
use zip::write::FileOptions;

pub struct BackupLogic;

impl BackupLogic {
    /// Copy the database into `dest_file` (or a timestamped file in the
    /// backups directory when no destination is given), optionally
    /// compressing the copy into a zip archive.
    pub fn backup(
        db_path: &Path,
        dest_file: Option<&Path>,
        compress: bool,
    ) -> AppResult<PathBuf> {
        if !db_path.exists() {
            return Err(AppError::Backup(format!(
                "database not found: {}",
                db_path.display()
            )));
        }

        let dest = match dest_file {
            Some(p) => p.to_path_buf(),
            None => {
                let dir = backups_dir(db_path);
                fs::create_dir_all(&dir)?;
                dir.join(format!(
                    "timekeep_backup_{}.db",
                    Local::now().format("%Y%m%d_%H%M%S")
                ))
            }
        };
        if let Some(parent) = dest.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }

        fs::copy(db_path, &dest)?;

        let final_path = if compress {
            let zipped = compress_backup(&dest)?;
            if zipped != dest {
                let _ = fs::remove_file(&dest);
            }
            zipped
        } else {
            dest
        };

        success(format!("Backup created: {}", final_path.display()));
        Ok(final_path)
    }

    /// Overwrite the database with `backup_file`. The previous database
    /// is snapshotted into the backups directory first; the restored file
    /// is picked up on the next open.
    pub fn restore(db_path: &Path, backup_file: &Path) -> AppResult<PathBuf> {
        if !backup_file.exists() {
            return Err(AppError::Restore(format!(
                "backup file not found: {}",
                backup_file.display()
            )));
        }

        let dir = backups_dir(db_path);
        fs::create_dir_all(&dir)?;
        let snapshot = dir.join(format!(
            "timekeep_pre_restore_{}.db",
            Local::now().format("%Y%m%d_%H%M%S")
        ));

        if db_path.exists() {
            fs::copy(db_path, &snapshot)?;
        }

        match fs::copy(backup_file, db_path) {
            Ok(_) => {
                success(format!(
                    "Database restored from {} (previous file kept at {})",
                    backup_file.display(),
                    snapshot.display()
                ));
                Ok(snapshot)
            }
            Err(e) => {
                // Put the old database back before reporting failure.
                if snapshot.exists() {
                    let _ = fs::copy(&snapshot, db_path);
                }
                Err(AppError::Restore(e.to_string()))
            }
        }
    }
}

/// Compress a backup copy into a .zip beside it.
fn compress_backup(path: &Path) -> AppResult<PathBuf> {
    let zip_path = path.with_extension("zip");
    let file = fs::File::create(&zip_path)?;
    let mut zip = ZipWriter::new(file);

    let options: FileOptions<'_, ()> =
        FileOptions::default().compression_method(zip::CompressionMethod::Deflated);

    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| "database.sqlite".to_string());
    zip.start_file(name, options).map_err(std::io::Error::other)?;

    let mut src = fs::File::open(path)?;
    std::io::copy(&mut src, &mut zip)?;
    zip.finish().map_err(std::io::Error::other)?;

    Ok(zip_path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;

    fn scratch(name: &str) -> PathBuf {
        let mut p = env::temp_dir();
        p.push(format!("timekeep_backup_mod_{name}"));
        let _ = fs::remove_dir_all(&p);
        fs::create_dir_all(&p).unwrap();
        p
    }

    #[test]
    fn backup_then_restore_roundtrip() {
        let dir = scratch("roundtrip");
        let db = dir.join("db.sqlite");
        fs::write(&db, b"original contents").unwrap();

        let copy = BackupLogic::backup(&db, None, false).unwrap();
        assert!(copy.exists());

        fs::write(&db, b"changed contents").unwrap();
        BackupLogic::restore(&db, &copy).unwrap();
        assert_eq!(fs::read(&db).unwrap(), b"original contents");

        // The pre-restore snapshot preserved the changed state.
        let snapshots: Vec<_> = fs::read_dir(backups_dir(&db))
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name().to_string_lossy().contains("pre_restore"))
            .collect();
        assert_eq!(snapshots.len(), 1);
        assert_eq!(fs::read(snapshots[0].path()).unwrap(), b"changed contents");

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn restore_missing_backup_fails() {
        let dir = scratch("missing");
        let db = dir.join("db.sqlite");
        fs::write(&db, b"data").unwrap();

        let err = BackupLogic::restore(&db, &dir.join("nope.db"));
        assert!(matches!(err, Err(AppError::Restore(_))));
        assert_eq!(fs::read(&db).unwrap(), b"data");

        let _ = fs::remove_dir_all(&dir);
    }
}

use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PersistError {
    #[error("failed to create temporary file in {}: {source}", dir.display())]
    TempFile {
        dir: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Mode for an output file that did not exist before; the process umask
/// still applies, as it would for `File::create`.
#[cfg(unix)]
const NEW_FILE_MODE: u32 = 0o666;

/// Follow a symlinked destination so the link itself survives the rename.
fn resolve_destination(path: &Path) -> PathBuf {
    if path.is_symlink()
        && let Ok(target) = std::fs::canonicalize(path)
    {
        return target;
    }
    path.to_path_buf()
}

/// Write `text` to `path` as UTF-8, replacing any existing file.
///
/// The content is staged in a temporary file next to the destination and
/// renamed into place, so the destination is either the previous file or
/// the complete new text. An existing file keeps its permissions; a new
/// one gets the same mode `File::create` would give it.
pub fn write_output(path: &Path, text: &str) -> Result<(), PersistError> {
    let dest = resolve_destination(path);
    let dir = match dest.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    };
    let existing = std::fs::metadata(&dest).ok().map(|m| m.permissions());

    let mut builder = tempfile::Builder::new();
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        builder.permissions(std::fs::Permissions::from_mode(NEW_FILE_MODE));
    }
    let mut tmp: NamedTempFile = builder
        .tempfile_in(&dir)
        .map_err(|source| PersistError::TempFile {
            dir: dir.clone(),
            source,
        })?;

    let write_err = |source: std::io::Error| PersistError::Write {
        path: path.to_path_buf(),
        source,
    };

    // The creation mode is filtered by the umask; restore the old mode exactly.
    #[cfg(unix)]
    {
        if let Some(perms) = existing {
            tmp.as_file().set_permissions(perms).map_err(write_err)?;
        }
    }
    #[cfg(not(unix))]
    let _ = existing;

    tmp.write_all(text.as_bytes()).map_err(write_err)?;
    tmp.flush().map_err(write_err)?;
    tmp.persist(&dest).map_err(|e| write_err(e.error))?;

    tracing::debug!(path = %dest.display(), bytes = text.len(), "output written");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_creates_file() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("out.txt");
        write_output(&out, "\n--- PAGE 1 ---\nhello").unwrap();
        assert_eq!(
            std::fs::read_to_string(&out).unwrap(),
            "\n--- PAGE 1 ---\nhello"
        );
    }

    #[test]
    fn test_write_overwrites_existing_content() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("out.txt");
        std::fs::write(&out, "a much longer previous run that must disappear").unwrap();
        write_output(&out, "short").unwrap();
        assert_eq!(std::fs::read_to_string(&out).unwrap(), "short");
    }

    #[test]
    fn test_write_leaves_no_temp_files_behind() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("out.txt");
        write_output(&out, "one").unwrap();
        write_output(&out, "two").unwrap();
        let entries: Vec<_> = std::fs::read_dir(dir.path()).unwrap().collect();
        assert_eq!(entries.len(), 1);
    }

    #[test]
    fn test_write_non_ascii_is_utf8() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("out.txt");
        write_output(&out, "Grüße \u{FFFD} 日本").unwrap();
        let bytes = std::fs::read(&out).unwrap();
        assert_eq!(String::from_utf8(bytes).unwrap(), "Grüße \u{FFFD} 日本");
    }

    #[cfg(unix)]
    fn mode_of(path: &Path) -> u32 {
        use std::os::unix::fs::PermissionsExt;
        std::fs::metadata(path).unwrap().permissions().mode() & 0o777
    }

    #[cfg(unix)]
    fn current_umask(dir: &Path) -> u32 {
        // A file created the ordinary way shows what the umask strips.
        let reference = dir.join("umask_reference");
        std::fs::File::create(&reference).unwrap();
        let mode = mode_of(&reference);
        std::fs::remove_file(&reference).unwrap();
        0o666 & !mode
    }

    #[cfg(unix)]
    #[test]
    fn test_new_file_gets_create_mode() {
        let dir = tempfile::tempdir().unwrap();
        let umask = current_umask(dir.path());
        let out = dir.path().join("out.txt");
        write_output(&out, "text").unwrap();
        assert_eq!(mode_of(&out), 0o666 & !umask);
    }

    #[cfg(unix)]
    #[test]
    fn test_overwrite_keeps_existing_mode() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("out.txt");
        std::fs::write(&out, "old").unwrap();
        std::fs::set_permissions(&out, std::fs::Permissions::from_mode(0o644)).unwrap();
        write_output(&out, "new").unwrap();
        assert_eq!(mode_of(&out), 0o644);

        std::fs::set_permissions(&out, std::fs::Permissions::from_mode(0o640)).unwrap();
        write_output(&out, "newer").unwrap();
        assert_eq!(mode_of(&out), 0o640);
        assert_eq!(std::fs::read_to_string(&out).unwrap(), "newer");
    }

    #[cfg(unix)]
    #[test]
    fn test_symlinked_destination_stays_a_link() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("real.txt");
        let link = dir.path().join("link.txt");
        std::fs::write(&target, "old").unwrap();
        std::os::unix::fs::symlink(&target, &link).unwrap();

        write_output(&link, "through the link").unwrap();

        assert!(link.is_symlink());
        assert_eq!(
            std::fs::read_to_string(&target).unwrap(),
            "through the link"
        );
    }

    #[test]
    fn test_write_into_missing_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("no_such_dir").join("out.txt");
        let err = write_output(&out, "text").unwrap_err();
        assert!(matches!(err, PersistError::TempFile { .. }));
        assert!(!out.exists());
    }
}

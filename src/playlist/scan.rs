use std::path::{Path, PathBuf};

/// File extensions picked up by a folder scan (compared lowercase)
pub const AUDIO_EXTENSIONS: &[&str] = &["mp3", "wav", "ogg", "flac", "m4a", "aac"];

pub fn is_audio_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| AUDIO_EXTENSIONS.contains(&e.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}

/// Recursively collect audio files under `dir`, sorted by path.
///
/// Only a failure to read `dir` itself is an error. Unreadable entries below
/// it are logged and skipped.
pub fn scan_folder(dir: &Path) -> std::io::Result<Vec<PathBuf>> {
    let mut found = Vec::new();
    let mut pending = vec![dir.to_path_buf()];

    while let Some(current) = pending.pop() {
        let entries = match std::fs::read_dir(&current) {
            Ok(entries) => entries,
            Err(err) if current != dir => {
                log::warn!("Skipping {}: {}", current.display(), err);
                continue;
            }
            Err(err) => return Err(err),
        };

        for entry in entries {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    log::warn!("Skipping entry in {}: {}", current.display(), err);
                    continue;
                }
            };
            let path = entry.path();
            match entry.file_type() {
                Ok(kind) if kind.is_dir() => pending.push(path),
                Ok(_) if is_audio_file(&path) => found.push(path),
                Ok(_) => {}
                Err(err) => log::warn!("Skipping {}: {}", path.display(), err),
            }
        }
    }

    found.sort();
    Ok(found)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recognizes_extensions_case_insensitively() {
        assert!(is_audio_file(Path::new("a/b/song.MP3")));
        assert!(is_audio_file(Path::new("track.flac")));
        assert!(is_audio_file(Path::new("x.Aac")));
        assert!(!is_audio_file(Path::new("cover.jpg")));
        assert!(!is_audio_file(Path::new("README")));
    }

    #[test]
    fn scans_nested_folders_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("disc2");
        std::fs::create_dir(&nested).unwrap();
        std::fs::write(dir.path().join("b.mp3"), b"").unwrap();
        std::fs::write(dir.path().join("a.ogg"), b"").unwrap();
        std::fs::write(dir.path().join("notes.txt"), b"").unwrap();
        std::fs::write(nested.join("c.WAV"), b"").unwrap();

        let found = scan_folder(dir.path()).unwrap();
        assert_eq!(
            found,
            vec![
                dir.path().join("a.ogg"),
                dir.path().join("b.mp3"),
                nested.join("c.WAV"),
            ]
        );
    }

    #[cfg(unix)]
    #[test]
    fn unreadable_subfolder_is_skipped() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let locked = dir.path().join("locked");
        std::fs::create_dir(&locked).unwrap();
        std::fs::write(locked.join("hidden.mp3"), b"").unwrap();
        std::fs::write(dir.path().join("open.flac"), b"").unwrap();
        std::fs::set_permissions(&locked, std::fs::Permissions::from_mode(0o000)).unwrap();

        let result = scan_folder(dir.path());
        std::fs::set_permissions(&locked, std::fs::Permissions::from_mode(0o755)).unwrap();

        // root ignores the mode bits, so the locked file may still show up
        let found = result.unwrap();
        assert!(found.contains(&dir.path().join("open.flac")));
    }

    #[test]
    fn missing_folder_is_an_error() {
        assert!(scan_folder(Path::new("/no/such/music/dir")).is_err());
    }
}

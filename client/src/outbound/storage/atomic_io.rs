//! Atomic file writes for persisted client state.
//!
//! Values are written to a hidden temporary file in the state directory and
//! renamed over the target, so a crash never leaves a half-written value.

use std::io::{self, Write};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use camino::{Utf8Component, Utf8Path};
use cap_std::fs::{Dir, OpenOptions};

use crate::domain::ports::KeyValueStoreError;

static TEMP_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Write `contents` to `path` inside `dir` via a temp file and rename.
///
/// `path` must be a single file name. The temp file is created next to the
/// target and renamed onto it; a rename is only atomic within one directory,
/// and a nested path would need intermediate directories the store never
/// creates.
///
/// # Errors
///
/// Returns [`KeyValueStoreError::InvalidKey`] when `path` is not a single
/// file name and [`KeyValueStoreError::Write`] when any step fails.
pub(crate) fn write_atomic(dir: &Dir, path: &Utf8Path, contents: &str) -> Result<(), KeyValueStoreError> {
    let mut components = path.components();
    let (Some(Utf8Component::Normal(file_name)), None) = (components.next(), components.next())
    else {
        return Err(KeyValueStoreError::invalid_key(path.as_str()));
    };
    let counter = TEMP_COUNTER.fetch_add(1, Ordering::Relaxed);
    let suffix = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |elapsed| elapsed.as_nanos());
    let tmp_name = format!(
        ".{file_name}.tmp.{}.{suffix}.{counter}",
        std::process::id()
    );

    write_to_temp_file(dir, &tmp_name, file_name, contents)?;
    rename_temp_to_target(dir, &tmp_name, file_name)?;
    sync_directory(dir);

    Ok(())
}

fn write_to_temp_file(
    dir: &Dir,
    tmp_name: &str,
    key: &str,
    contents: &str,
) -> Result<(), KeyValueStoreError> {
    let mut options = OpenOptions::new();
    options.write(true).create_new(true);
    let mut file = dir
        .open_with(tmp_name, &options)
        .map_err(|err| KeyValueStoreError::write(key, err.to_string()))?;

    if let Err(err) = file.write_all(contents.as_bytes()).and_then(|()| file.sync_all()) {
        drop(file);
        drop(dir.remove_file(tmp_name));
        return Err(KeyValueStoreError::write(key, err.to_string()));
    }

    Ok(())
}

fn rename_temp_to_target(dir: &Dir, tmp_name: &str, key: &str) -> Result<(), KeyValueStoreError> {
    if let Err(err) = rename_impl(dir, tmp_name, key) {
        drop(dir.remove_file(tmp_name));
        return Err(KeyValueStoreError::write(key, err.to_string()));
    }
    Ok(())
}

#[cfg(windows)]
fn rename_impl(dir: &Dir, tmp_name: &str, target_name: &str) -> io::Result<()> {
    // Windows rename fails if the target exists.
    match dir.remove_file(target_name) {
        Ok(()) => {}
        Err(err) if err.kind() == io::ErrorKind::NotFound => {}
        Err(err) => return Err(err),
    }
    dir.rename(tmp_name, dir, target_name)
}

#[cfg(not(windows))]
fn rename_impl(dir: &Dir, tmp_name: &str, target_name: &str) -> io::Result<()> {
    dir.rename(tmp_name, dir, target_name)
}

fn sync_directory(dir: &Dir) {
    // Best effort; a failed directory sync does not undo the rename.
    drop(dir.open(".").and_then(|handle| handle.sync_all()));
}

#[cfg(test)]
mod tests {
    use cap_std::ambient_authority;
    use tempfile::TempDir;

    use super::*;

    fn temp_dir() -> (TempDir, Dir) {
        let temp = TempDir::new().expect("temp dir");
        let dir = Dir::open_ambient_dir(temp.path(), ambient_authority()).expect("open temp dir");
        (temp, dir)
    }

    #[test]
    fn replaces_existing_contents_without_leftovers() {
        let (_temp, dir) = temp_dir();
        let path = Utf8Path::new("currentUser");

        write_atomic(&dir, path, "first").expect("first write");
        write_atomic(&dir, path, "second").expect("second write");

        assert_eq!(dir.read_to_string(path).expect("read back"), "second");
        let names: Vec<String> = dir
            .entries()
            .expect("list dir")
            .filter_map(Result::ok)
            .filter_map(|entry| entry.file_name().into_string().ok())
            .collect();
        assert_eq!(names, vec!["currentUser".to_owned()]);
    }

    #[test]
    fn rejects_nested_paths() {
        let (_temp, dir) = temp_dir();
        let error = write_atomic(&dir, Utf8Path::new("nested/key"), "x").expect_err("nested");
        assert!(matches!(error, KeyValueStoreError::InvalidKey { .. }));
    }
}

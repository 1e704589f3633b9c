//! Archive assembly
//!
//! Packs a finished export tree into a single zip file. The source folder's
//! own name becomes the one top-level entry, so extracting the archive
//! recreates the tree under that name. Output is deterministic: entries are
//! sorted by path and carry a fixed timestamp and fixed permissions.

use crate::domain::errors::FolioError;
use crate::domain::result::Result;
use std::fs::{self, File};
use std::io::{self, BufWriter};
use std::path::Path;
use tempfile::NamedTempFile;
use walkdir::WalkDir;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

const DIRECTORY_MODE: u32 = 0o755;
const FILE_MODE: u32 = 0o644;

/// Mode of the archive file itself; temporary files start out owner-only
#[cfg(unix)]
const ARCHIVE_MODE: u32 = 0o644;

/// Archive `source` into `destination`
///
/// The archive is written to a temporary file in the destination's folder
/// and renamed over `destination` only once complete, so an existing file is
/// replaced atomically and a failed run never leaves a partial archive
/// behind. Missing parent folders of `destination` are created.
///
/// # Errors
///
/// Returns [`FolioError::Filesystem`] if the destination folder cannot be
/// created and [`FolioError::Archive`] for any failure reading the tree or
/// writing the archive.
pub fn archive_directory(source: &Path, destination: &Path) -> Result<()> {
    if !source.is_dir() {
        return Err(FolioError::Archive(format!(
            "{} is not a directory",
            source.display()
        )));
    }

    let parent = match destination.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent).map_err(|e| {
        FolioError::Filesystem(format!(
            "Failed to create destination folder {}: {}",
            parent.display(),
            e
        ))
    })?;

    let staging = NamedTempFile::new_in(parent).map_err(|e| {
        FolioError::Archive(format!(
            "Failed to create temporary archive in {}: {}",
            parent.display(),
            e
        ))
    })?;

    let entries = write_entries(source, staging.as_file())?;
    set_archive_permissions(staging.path())?;

    staging.persist(destination).map_err(|e| {
        FolioError::Archive(format!(
            "Failed to move archive to {}: {}",
            destination.display(),
            e.error
        ))
    })?;

    tracing::info!(
        source = %source.display(),
        destination = %destination.display(),
        entries,
        "Archive written"
    );
    Ok(())
}

#[cfg(unix)]
fn set_archive_permissions(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;

    fs::set_permissions(path, fs::Permissions::from_mode(ARCHIVE_MODE)).map_err(|e| {
        FolioError::Archive(format!(
            "Failed to set permissions on {}: {}",
            path.display(),
            e
        ))
    })
}

#[cfg(not(unix))]
fn set_archive_permissions(_path: &Path) -> Result<()> {
    Ok(())
}

fn write_entries(source: &Path, file: &File) -> Result<usize> {
    let base = source.parent().unwrap_or(source);
    let mut zip = ZipWriter::new(BufWriter::new(file));
    let options = SimpleFileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .last_modified_time(zip::DateTime::default());
    let mut count = 0;

    for entry in WalkDir::new(source).sort_by_file_name() {
        let entry = entry.map_err(|e| FolioError::Archive(format!("Failed to read tree: {e}")))?;
        let name = entry_name(base, entry.path())?;

        if entry.file_type().is_dir() {
            zip.add_directory(name, options.unix_permissions(DIRECTORY_MODE))
                .map_err(archive_error)?;
        } else if entry.file_type().is_file() {
            zip.start_file(name, options.unix_permissions(FILE_MODE))
                .map_err(archive_error)?;
            let mut input = File::open(entry.path()).map_err(|e| {
                FolioError::Archive(format!("Failed to open {}: {}", entry.path().display(), e))
            })?;
            io::copy(&mut input, &mut zip).map_err(|e| {
                FolioError::Archive(format!("Failed to add {}: {}", entry.path().display(), e))
            })?;
        } else {
            tracing::debug!(path = %entry.path().display(), "Skipping non-regular file");
            continue;
        }
        count += 1;
    }

    let mut writer = zip.finish().map_err(archive_error)?;
    io::Write::flush(&mut writer).map_err(|e| FolioError::Archive(e.to_string()))?;
    Ok(count)
}

/// Archive entry name: `/`-separated path relative to `base`
fn entry_name(base: &Path, path: &Path) -> Result<String> {
    let relative = path.strip_prefix(base).map_err(|_| {
        FolioError::Archive(format!("{} is outside the archive root", path.display()))
    })?;

    let mut parts = Vec::new();
    for component in relative.components() {
        let part = component.as_os_str().to_str().ok_or_else(|| {
            FolioError::Archive(format!("Non UTF-8 file name: {}", path.display()))
        })?;
        parts.push(part);
    }
    Ok(parts.join("/"))
}

fn archive_error(e: zip::result::ZipError) -> FolioError {
    FolioError::Archive(e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;
    use tempfile::TempDir;
    use zip::ZipArchive;

    fn sample_tree(root: &Path) -> std::path::PathBuf {
        let export = root.join("Backup");
        fs::create_dir_all(export.join("Cooking")).unwrap();
        fs::write(export.join("Groceries.html"), b"milk").unwrap();
        fs::write(export.join("Cooking").join("RecipeCake.html"), b"cake").unwrap();
        export
    }

    fn entry_names(path: &Path) -> Vec<String> {
        let archive = ZipArchive::new(File::open(path).unwrap()).unwrap();
        archive.file_names().map(str::to_string).collect()
    }

    #[test]
    fn test_structure_mirrors_tree() {
        let temp = TempDir::new().unwrap();
        let source = sample_tree(temp.path());
        let destination = temp.path().join("out").join("Backup.zip");

        archive_directory(&source, &destination).unwrap();

        let mut names = entry_names(&destination);
        names.sort();
        assert_eq!(
            names,
            vec![
                "Backup/",
                "Backup/Cooking/",
                "Backup/Cooking/RecipeCake.html",
                "Backup/Groceries.html",
            ]
        );

        let mut archive = ZipArchive::new(File::open(&destination).unwrap()).unwrap();
        let mut contents = String::new();
        archive
            .by_name("Backup/Cooking/RecipeCake.html")
            .unwrap()
            .read_to_string(&mut contents)
            .unwrap();
        assert_eq!(contents, "cake");
    }

    #[test]
    fn test_deterministic_output() {
        let temp = TempDir::new().unwrap();
        let source = sample_tree(temp.path());
        let first = temp.path().join("a.zip");
        let second = temp.path().join("b.zip");

        archive_directory(&source, &first).unwrap();
        archive_directory(&source, &second).unwrap();

        assert_eq!(fs::read(&first).unwrap(), fs::read(&second).unwrap());
    }

    #[test]
    fn test_replaces_existing_destination() {
        let temp = TempDir::new().unwrap();
        let source = sample_tree(temp.path());
        let destination = temp.path().join("Backup.zip");
        fs::write(&destination, b"stale").unwrap();

        archive_directory(&source, &destination).unwrap();

        assert!(ZipArchive::new(File::open(&destination).unwrap()).is_ok());
    }

    #[cfg(unix)]
    #[test]
    fn test_archive_is_world_readable() {
        use std::os::unix::fs::PermissionsExt;

        let temp = TempDir::new().unwrap();
        let source = sample_tree(temp.path());
        let destination = temp.path().join("Backup.zip");

        archive_directory(&source, &destination).unwrap();

        let mode = fs::metadata(&destination).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o644);
    }

    #[test]
    fn test_missing_source_leaves_destination_alone() {
        let temp = TempDir::new().unwrap();
        let destination = temp.path().join("Backup.zip");
        fs::write(&destination, b"previous").unwrap();

        let err = archive_directory(&temp.path().join("missing"), &destination).unwrap_err();

        assert!(matches!(err, FolioError::Archive(_)));
        assert_eq!(fs::read(&destination).unwrap(), b"previous");
    }

    #[test]
    fn test_empty_root_only() {
        let temp = TempDir::new().unwrap();
        let source = temp.path().join("Empty");
        fs::create_dir(&source).unwrap();
        let destination = temp.path().join("Empty.zip");

        archive_directory(&source, &destination).unwrap();

        assert_eq!(entry_names(&destination), vec!["Empty/"]);
    }
}

use std::fs::{self, File};
use std::io;
use std::path::Path;

use flate2::read::GzDecoder;
use tracing::{debug, info};
use zip::ZipArchive;

use crate::domain::DomainError;

/// Unpack an archive into `dest`, dispatching on the file-name suffix.
///
/// `.tar.gz` and `.zip` are supported; any other suffix is skipped without
/// error so the orchestrator can call this uniformly over mixed manifests.
/// Missing destination directories are created as entries are written.
pub fn extract_archive(archive: &Path, dest: &Path) -> Result<(), DomainError> {
    let name = archive
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or_default();

    if name.ends_with(".tar.gz") {
        info!(archive = ?archive, "Extracting tar.gz archive");
        let file = File::open(archive)?;
        let mut tar = tar::Archive::new(GzDecoder::new(file));
        tar.unpack(dest)?;
    } else if name.ends_with(".zip") {
        info!(archive = ?archive, "Extracting zip archive");
        extract_zip(archive, dest, None)?;
    } else {
        debug!(archive = ?archive, "Unsupported archive suffix, skipping");
    }

    Ok(())
}

/// Extract only the zip entries whose internal path starts with one of the
/// given prefixes, preserving internal paths under `dest`.
///
/// Lets a small subset be pulled out of a much larger archive without
/// materializing the rest.
pub fn extract_prefixes(
    archive: &Path,
    prefixes: &[&str],
    dest: &Path,
) -> Result<(), DomainError> {
    info!(archive = ?archive, prefixes = ?prefixes, "Extracting selected entries");
    extract_zip(archive, dest, Some(prefixes))
}

fn extract_zip(archive: &Path, dest: &Path, prefixes: Option<&[&str]>) -> Result<(), DomainError> {
    let mut zip = ZipArchive::new(File::open(archive)?)?;

    for index in 0..zip.len() {
        let mut entry = zip.by_index(index)?;

        if let Some(prefixes) = prefixes {
            let name = entry.name();
            if !prefixes.iter().any(|prefix| name.starts_with(prefix)) {
                continue;
            }
        }

        // Entries with hostile paths (absolute, or escaping the root) are
        // skipped rather than written.
        let Some(relative) = entry.enclosed_name() else {
            debug!(entry = %entry.name(), "Skipping entry with unsafe path");
            continue;
        };
        let out_path = dest.join(relative);

        if entry.is_dir() {
            fs::create_dir_all(&out_path)?;
            continue;
        }

        if let Some(parent) = out_path.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut out = File::create(&out_path)?;
        io::copy(&mut entry, &mut out)?;
    }

    Ok(())
}

use std::fs;
use std::path::Path;

use crate::domain::DomainError;

/// One line of a single-download manifest: `url checksum`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadEntry {
    pub url: String,
    pub md5: String,
}

/// One line of the multi-part manifest: `part_name output_name checksum`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartEntry {
    pub part: String,
    pub output: String,
    pub md5: String,
}

/// All parts that assemble into one combined archive, in manifest order.
///
/// Every line of a group carries the combined archive's checksum; the value
/// from the last line wins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartGroup {
    pub output: String,
    pub md5: String,
    pub parts: Vec<String>,
}

/// Parse a whitespace-delimited `url checksum` list.
///
/// Blank lines are tolerated; anything else with the wrong field count is a
/// manifest error.
pub fn parse_download_list(text: &str) -> Result<Vec<DownloadEntry>, DomainError> {
    let mut entries = Vec::new();
    for (number, line) in text.lines().enumerate() {
        let fields: Vec<&str> = line.split_whitespace().collect();
        match fields.as_slice() {
            [] => continue,
            [url, md5] => entries.push(DownloadEntry {
                url: url.to_string(),
                md5: md5.to_string(),
            }),
            _ => {
                return Err(DomainError::Manifest(format!(
                    "line {}: expected `url checksum`, got {} fields",
                    number + 1,
                    fields.len()
                )))
            }
        }
    }
    Ok(entries)
}

/// Parse a whitespace-delimited `part output checksum` list.
pub fn parse_part_list(text: &str) -> Result<Vec<PartEntry>, DomainError> {
    let mut entries = Vec::new();
    for (number, line) in text.lines().enumerate() {
        let fields: Vec<&str> = line.split_whitespace().collect();
        match fields.as_slice() {
            [] => continue,
            [part, output, md5] => entries.push(PartEntry {
                part: part.to_string(),
                output: output.to_string(),
                md5: md5.to_string(),
            }),
            _ => {
                return Err(DomainError::Manifest(format!(
                    "line {}: expected `part output checksum`, got {} fields",
                    number + 1,
                    fields.len()
                )))
            }
        }
    }
    Ok(entries)
}

/// Read and parse a single-download manifest file.
pub fn read_download_list(path: &Path) -> Result<Vec<DownloadEntry>, DomainError> {
    let text = fs::read_to_string(path)
        .map_err(|e| DomainError::Manifest(format!("{}: {}", path.display(), e)))?;
    parse_download_list(&text)
}

/// Read and parse a multi-part manifest file.
pub fn read_part_list(path: &Path) -> Result<Vec<PartEntry>, DomainError> {
    let text = fs::read_to_string(path)
        .map_err(|e| DomainError::Manifest(format!("{}: {}", path.display(), e)))?;
    parse_part_list(&text)
}

/// Group part entries by output name, preserving first-seen group order and
/// the manifest order of parts within each group.
pub fn group_parts(entries: &[PartEntry]) -> Vec<PartGroup> {
    let mut groups: Vec<PartGroup> = Vec::new();
    for entry in entries {
        match groups.iter_mut().find(|g| g.output == entry.output) {
            Some(group) => {
                group.parts.push(entry.part.clone());
                group.md5 = entry.md5.clone();
            }
            None => groups.push(PartGroup {
                output: entry.output.clone(),
                md5: entry.md5.clone(),
                parts: vec![entry.part.clone()],
            }),
        }
    }
    groups
}

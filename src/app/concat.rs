use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::app::checksum;
use crate::domain::{DomainError, PartGroup};

/// Join the parts of each group into `<save_path>/concat/<output>`.
///
/// This is a byte-level concatenation, not archive-aware: the byte order of
/// the output is exactly the manifest order of the parts. Part files are
/// expected under `save_path`. Returns the combined paths in group order.
///
/// A checksum mismatch on a combined file is reported loudly but does not
/// fail the stage, matching the download stage's policy.
pub fn concatenate_all(save_path: &Path, groups: &[PartGroup]) -> Result<Vec<PathBuf>, DomainError> {
    let concat_dir = save_path.join("concat");
    fs::create_dir_all(&concat_dir)?;

    let mut outputs = Vec::with_capacity(groups.len());
    for group in groups {
        let out_path = concat_dir.join(&group.output);
        info!(output = %group.output, parts = group.parts.len(), "Concatenating");

        let mut out = File::create(&out_path)?;
        for part in &group.parts {
            let mut input = File::open(save_path.join(part))?;
            io::copy(&mut input, &mut out)?;
        }
        drop(out);

        let actual = checksum::md5_hex(&out_path)?;
        if actual.eq_ignore_ascii_case(&group.md5) {
            info!(file = %group.output, "Checksum successful");
        } else {
            warn!(file = %group.output, expected = %group.md5, actual = %actual, "Checksum failed");
        }

        outputs.push(out_path);
    }
    Ok(outputs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::manifest::{group_parts, parse_part_list};
    use std::fs;

    #[test]
    fn test_concatenation_preserves_order() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.part1"), b"hello ").unwrap();
        fs::write(dir.path().join("a.part2"), b"world").unwrap();

        let entries = parse_part_list("a.part1 out.bin x\na.part2 out.bin x\n").unwrap();
        let groups = group_parts(&entries);

        let outputs = concatenate_all(dir.path(), &groups).unwrap();
        assert_eq!(outputs.len(), 1);
        assert_eq!(outputs[0], dir.path().join("concat").join("out.bin"));
        assert_eq!(fs::read(&outputs[0]).unwrap(), b"hello world");
    }

    #[test]
    fn test_combined_digest_matches_direct_concatenation() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.part1"), b"first half|").unwrap();
        fs::write(dir.path().join("a.part2"), b"second half").unwrap();

        // Reference file written in one piece.
        let reference = dir.path().join("reference.bin");
        fs::write(&reference, b"first half|second half").unwrap();
        let expected = checksum::md5_hex(&reference).unwrap();

        let entries = parse_part_list("a.part1 out.bin m1\na.part2 out.bin m2\n").unwrap();
        let groups = group_parts(&entries);
        let outputs = concatenate_all(dir.path(), &groups).unwrap();

        assert_eq!(checksum::md5_hex(&outputs[0]).unwrap(), expected);
    }

    #[test]
    fn test_checksum_mismatch_is_not_fatal() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.part1"), b"data").unwrap();

        let entries = parse_part_list("a.part1 out.bin ffffffff\n").unwrap();
        let groups = group_parts(&entries);

        assert!(concatenate_all(dir.path(), &groups).is_ok());
    }

    #[test]
    fn test_missing_part_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let entries = parse_part_list("missing.part out.bin x\n").unwrap();
        let groups = group_parts(&entries);

        assert!(concatenate_all(dir.path(), &groups).is_err());
    }
}

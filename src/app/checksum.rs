use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use md5::{Digest, Md5};

use crate::domain::DomainError;

/// Compute the MD5 digest of a file as a lowercase hex string.
///
/// The file is streamed through the hasher in fixed-size chunks so
/// multi-gigabyte archives never load into memory.
pub fn md5_hex(path: &Path) -> Result<String, DomainError> {
    let file = File::open(path)?;
    let mut reader = BufReader::new(file);
    let mut hasher = Md5::new();

    let mut buffer = [0u8; 8192];
    loop {
        let bytes_read = reader.read(&mut buffer)?;
        if bytes_read == 0 {
            break;
        }
        hasher.update(&buffer[..bytes_read]);
    }

    Ok(format!("{:x}", hasher.finalize()))
}

/// Compare a file's digest against an expected hex checksum.
///
/// A mismatch is an ordinary `false`; whether that is fatal is the
/// caller's policy.
pub fn verify(path: &Path, expected: &str) -> Result<bool, DomainError> {
    Ok(md5_hex(path)?.eq_ignore_ascii_case(expected))
}

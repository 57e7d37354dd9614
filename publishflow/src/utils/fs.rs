//! Filesystem helpers consumed by steps.

use md5::Md5;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

/// Read size used when streaming a file through a hasher.
pub const CHUNK_SIZE: usize = 8192;

/// Digest algorithms available to [`checksum_file`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChecksumAlgorithm {
    /// MD5, the historical default of published representations.
    #[default]
    Md5,
    /// SHA-256.
    Sha256,
}

/// Makes sure `path` exists as a directory, creating parents as needed.
pub fn ensure_dir(path: impl AsRef<Path>) -> std::io::Result<PathBuf> {
    let path = path.as_ref();
    std::fs::create_dir_all(path)?;
    Ok(path.to_path_buf())
}

/// Computes the hex digest of a file, streaming it in [`CHUNK_SIZE`] chunks.
pub fn checksum_file(
    path: impl AsRef<Path>,
    algorithm: ChecksumAlgorithm,
) -> std::io::Result<String> {
    let file = File::open(path)?;
    match algorithm {
        ChecksumAlgorithm::Md5 => digest_reader::<Md5>(file),
        ChecksumAlgorithm::Sha256 => digest_reader::<Sha256>(file),
    }
}

/// Computes the MD5 hex digest of a file.
pub fn md5sum(path: impl AsRef<Path>) -> std::io::Result<String> {
    checksum_file(path, ChecksumAlgorithm::Md5)
}

fn digest_reader<D: Digest>(mut reader: impl Read) -> std::io::Result<String> {
    let mut hasher = D::new();
    let mut buf = [0u8; CHUNK_SIZE];
    loop {
        let n = reader.read(&mut buf)?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
    }
    Ok(hex::encode(hasher.finalize()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write(dir: &Path, name: &str, bytes: &[u8]) -> PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, bytes).unwrap();
        path
    }

    #[test]
    fn test_ensure_dir_creates_parents() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("publish/v001/exr");

        let returned = ensure_dir(&target).unwrap();
        assert_eq!(returned, target);
        assert!(target.is_dir());

        // Idempotent on an existing directory.
        assert!(ensure_dir(&target).is_ok());
    }

    #[test]
    fn test_md5_known_digest() {
        let dir = tempfile::tempdir().unwrap();
        let empty = write(dir.path(), "empty.bin", b"");
        assert_eq!(md5sum(&empty).unwrap(), "d41d8cd98f00b204e9800998ecf8427e");
    }

    #[test]
    fn test_sha256_known_digest() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(dir.path(), "abc.txt", b"abc");
        assert_eq!(
            checksum_file(&path, ChecksumAlgorithm::Sha256).unwrap(),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn test_checksum_depends_only_on_content() {
        let dir = tempfile::tempdir().unwrap();
        let content: Vec<u8> = (0..CHUNK_SIZE * 3 + 17).map(|i| (i % 251) as u8).collect();
        let a = write(dir.path(), "a.exr", &content);
        let b = write(dir.path(), "copy_with_other_name.bin", &content);

        let mut altered = content.clone();
        altered[CHUNK_SIZE + 1] ^= 0x01;
        let c = write(dir.path(), "c.exr", &altered);

        for algorithm in [ChecksumAlgorithm::Md5, ChecksumAlgorithm::Sha256] {
            let da = checksum_file(&a, algorithm).unwrap();
            assert_eq!(da, checksum_file(&b, algorithm).unwrap());
            assert_ne!(da, checksum_file(&c, algorithm).unwrap());
        }
    }

    #[test]
    fn test_checksum_missing_file() {
        assert!(md5sum("/no/such/file.exr").is_err());
    }
}

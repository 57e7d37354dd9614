//! Utilities consumed by steps: checksums and output directories.

mod fs;

pub use fs::{checksum_file, ensure_dir, md5sum, ChecksumAlgorithm, CHUNK_SIZE};

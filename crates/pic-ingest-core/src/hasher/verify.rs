use super::checksum::checksum_reader;
use crate::config::ChecksumAlgorithm;
use crate::error::JobError;
use crate::platform::Filesystem;
use std::io::ErrorKind;
use std::path::Path;
use tracing::trace;

/// Compares a copied file against its source by checksum.
pub struct Verifier<'a> {
    fs: &'a dyn Filesystem,
    algorithm: ChecksumAlgorithm,
    block_size: usize,
}

impl<'a> Verifier<'a> {
    pub fn new(fs: &'a dyn Filesystem, algorithm: ChecksumAlgorithm, block_size: usize) -> Self {
        Self {
            fs,
            algorithm,
            block_size,
        }
    }

    /// A file that has vanished is [`JobError::MissingAtVerify`], never a mismatch.
    pub fn checksum(&self, path: &Path) -> Result<u32, JobError> {
        let reader = self.fs.open_read(path).map_err(|error| match error.kind() {
            ErrorKind::NotFound => JobError::MissingAtVerify {
                path: path.to_path_buf(),
            },
            _ => JobError::Checksum {
                path: path.to_path_buf(),
                error,
            },
        })?;
        let sum = checksum_reader(reader, self.algorithm, self.block_size).map_err(|error| {
            JobError::Checksum {
                path: path.to_path_buf(),
                error,
            }
        })?;
        trace!("{:?} {:08x} {}", self.algorithm, sum, path.display());
        Ok(sum)
    }

    pub fn files_match(&self, a: &Path, b: &Path) -> Result<bool, JobError> {
        Ok(self.checksum(a)? == self.checksum(b)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_BLOCK_SIZE;
    use crate::platform::LocalFs;
    use std::fs;
    use tempfile::tempdir;

    fn verifier() -> Verifier<'static> {
        Verifier::new(&LocalFs, ChecksumAlgorithm::Adler32, DEFAULT_BLOCK_SIZE)
    }

    #[test]
    fn test_identical_files_match() {
        let tmp = tempdir().unwrap();
        let a = tmp.path().join("a.CR2");
        let b = tmp.path().join("b.CR2");
        let content: Vec<u8> = (0..200_000u32).map(|i| (i * 31 % 256) as u8).collect();
        fs::write(&a, &content).unwrap();
        fs::write(&b, &content).unwrap();

        assert!(verifier().files_match(&a, &b).unwrap());
    }

    #[test]
    fn test_one_flipped_byte_mismatches() {
        let tmp = tempdir().unwrap();
        let a = tmp.path().join("a.JPG");
        let b = tmp.path().join("b.JPG");
        let content = vec![0x5Au8; 100_000];
        let mut corrupted = content.clone();
        corrupted[99_999] = 0x5B;
        fs::write(&a, &content).unwrap();
        fs::write(&b, &corrupted).unwrap();

        assert!(!verifier().files_match(&a, &b).unwrap());
    }

    #[test]
    fn test_zero_byte_files() {
        let tmp = tempdir().unwrap();
        let empty_a = tmp.path().join("empty_a.JPG");
        let empty_b = tmp.path().join("empty_b.JPG");
        let full = tmp.path().join("full.JPG");
        fs::write(&empty_a, b"").unwrap();
        fs::write(&empty_b, b"").unwrap();
        fs::write(&full, b"x").unwrap();

        let v = verifier();
        assert!(v.checksum(&empty_a).is_ok());
        assert!(v.files_match(&empty_a, &empty_b).unwrap());
        assert!(!v.files_match(&empty_a, &full).unwrap());
    }

    #[test]
    fn test_missing_file_is_error_not_mismatch() {
        let tmp = tempdir().unwrap();
        let present = tmp.path().join("present.JPG");
        fs::write(&present, b"data").unwrap();
        let missing = tmp.path().join("missing.JPG");

        let result = verifier().files_match(&present, &missing);
        assert!(matches!(result, Err(JobError::MissingAtVerify { path }) if path == missing));
    }
}

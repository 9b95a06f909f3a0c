use crate::config::ChecksumAlgorithm;
use std::hash::Hasher as _;
use std::io::{self, ErrorKind, Read};
use twox_hash::XxHash32;

/// Streaming 32-bit checksum state.
enum RollingChecksum {
    Adler32(adler2::Adler32),
    XxHash32(XxHash32),
}

impl RollingChecksum {
    fn new(algorithm: ChecksumAlgorithm) -> Self {
        match algorithm {
            ChecksumAlgorithm::Adler32 => Self::Adler32(adler2::Adler32::new()),
            ChecksumAlgorithm::Xxhash32 => Self::XxHash32(XxHash32::with_seed(0)),
        }
    }

    fn update(&mut self, block: &[u8]) {
        match self {
            Self::Adler32(state) => state.write_slice(block),
            Self::XxHash32(state) => state.write(block),
        }
    }

    fn finish(&self) -> u32 {
        match self {
            Self::Adler32(state) => state.checksum(),
            // XxHash32 reports through the u64 Hasher interface; the upper half is zero.
            Self::XxHash32(state) => state.finish() as u32,
        }
    }
}

/// Checksum everything `reader` yields, `block_size` bytes at a time.
/// Memory use is bounded by the block size, not the input length.
pub fn checksum_reader<R: Read>(
    mut reader: R,
    algorithm: ChecksumAlgorithm,
    block_size: usize,
) -> io::Result<u32> {
    let mut state = RollingChecksum::new(algorithm);
    let mut buffer = vec![0u8; block_size.max(1)];

    loop {
        let bytes_read = match reader.read(&mut buffer) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        };
        state.update(&buffer[..bytes_read]);
    }

    Ok(state.finish())
}

pub fn checksum_bytes(data: &[u8], algorithm: ChecksumAlgorithm) -> u32 {
    let mut state = RollingChecksum::new(algorithm);
    state.update(data);
    state.finish()
}

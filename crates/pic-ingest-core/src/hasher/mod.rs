pub mod checksum;
pub mod verify;

pub use checksum::{checksum_bytes, checksum_reader};
pub use verify::Verifier;

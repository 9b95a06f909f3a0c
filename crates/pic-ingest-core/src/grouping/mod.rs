//! Clustering of discovered files into capture groups.
//!
//! Files sharing a directory and a base name (e.g. `IMG_0001.CR2` and
//! `IMG_0001.JPG`) form one group and are archived under one timestamp.

pub mod key;
pub mod timestamp;

pub use key::{GroupKey, SourceFile};
pub use timestamp::{resolve_timestamps, GroupTimestamp, TimestampMap};

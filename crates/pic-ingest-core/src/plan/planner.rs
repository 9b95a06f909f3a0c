use crate::error::Error;
use crate::grouping::{key::KEY_DELIMITER, SourceFile, TimestampMap};
use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Archive location of `file`:
/// `<archive_root>/<YYYY>/<MM>/<DD>/<stem>_<HH>-<MM>-<SS>.<ext>`.
///
/// Pure with respect to its inputs. A file whose group is missing from
/// `timestamps` was never resolved and yields [`Error::Unplanned`].
pub fn destination_for(
    archive_root: &Path,
    file: &Path,
    timestamps: &TimestampMap,
) -> Result<PathBuf, Error> {
    let source = SourceFile::new(file);
    let timestamp = timestamps
        .get(&source.key())
        .ok_or_else(|| Error::Unplanned {
            path: file.to_path_buf(),
        })?;

    let mut file_name = OsString::from(&source.stem);
    file_name.push(KEY_DELIMITER.to_string());
    file_name.push(timestamp.time_component());
    if let Some(extension) = &source.extension {
        file_name.push(".");
        file_name.push(extension);
    }

    Ok(archive_root.join(timestamp.date_path()).join(file_name))
}

use super::planner::destination_for;
use crate::error::Error;
use crate::grouping::TimestampMap;
use std::path::{Path, PathBuf};
use tracing::info;

/// One planned file operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Job {
    pub source: PathBuf,
    pub destination: PathBuf,
}

/// Output of the planning phases: every job in discovery order.
#[derive(Debug, Clone, Default)]
pub struct Plan {
    pub jobs: Vec<Job>,
    pub groups: usize,
}

/// One job per input file, in input order. Nothing is filtered out.
pub fn compile_jobs(
    archive_root: &Path,
    files: &[PathBuf],
    timestamps: &TimestampMap,
) -> Result<Vec<Job>, Error> {
    let jobs = files
        .iter()
        .map(|file| {
            Ok(Job {
                source: file.clone(),
                destination: destination_for(archive_root, file, timestamps)?,
            })
        })
        .collect::<Result<Vec<_>, Error>>()?;

    info!("Created job list with {} entries", jobs.len());
    Ok(jobs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TimestampPolicy;
    use crate::grouping::resolve_timestamps;
    use crate::platform::LocalFs;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_one_job_per_file_in_discovery_order() {
        let tmp = tempdir().unwrap();
        let files: Vec<PathBuf> = ["IMG_0002.JPG", "IMG_0001.CR2", "IMG_0001.JPG"]
            .iter()
            .map(|name| {
                let path = tmp.path().join(name);
                fs::write(&path, name.as_bytes()).unwrap();
                path
            })
            .collect();

        let timestamps =
            resolve_timestamps(&LocalFs, &files, TimestampPolicy::FirstSeen).unwrap();
        assert_eq!(timestamps.len(), 2);

        let jobs = compile_jobs(Path::new("/srv/pics"), &files, &timestamps).unwrap();
        assert_eq!(jobs.len(), 3);
        let sources: Vec<_> = jobs.iter().map(|j| j.source.clone()).collect();
        assert_eq!(sources, files);

        let raw_dest = &jobs[1].destination;
        let jpg_dest = &jobs[2].destination;
        assert_eq!(raw_dest.parent(), jpg_dest.parent());
        assert_eq!(raw_dest.file_stem(), jpg_dest.file_stem());
        assert_eq!(raw_dest.extension().unwrap(), "CR2");
        assert_eq!(jpg_dest.extension().unwrap(), "JPG");
    }

    #[test]
    fn test_empty_input_compiles_empty_plan() {
        let jobs = compile_jobs(Path::new("/srv/pics"), &[], &TimestampMap::default()).unwrap();
        assert!(jobs.is_empty());
    }

    #[test]
    fn test_file_missing_from_map_aborts_compilation() {
        let files = vec![PathBuf::from("/card/IMG_0001.JPG")];
        let result = compile_jobs(Path::new("/srv/pics"), &files, &TimestampMap::default());
        assert!(matches!(result, Err(Error::Unplanned { .. })));
    }
}

use crate::state::JobState;
use crate::url::target_file_name;
use crate::UrlError;
use std::path::{Path, PathBuf};

/// One media URL travelling through a download batch
///
/// Jobs live only as long as their batch; nothing about them is persisted.
#[derive(Debug, Clone)]
pub struct DownloadJob {
    /// The URL to download
    pub source_url: String,

    /// Blob name the body is stored under (`<target dir>/<last path segment>`)
    pub target: PathBuf,

    state: JobState,
}

impl DownloadJob {
    /// Creates a pending job, deriving the target from the URL
    pub fn new(source_url: impl Into<String>, target_dir: &Path) -> Result<Self, UrlError> {
        let source_url = source_url.into();
        let file_name = target_file_name(&source_url)?;
        Ok(Self {
            target: target_dir.join(file_name),
            source_url,
            state: JobState::Pending,
        })
    }

    pub fn state(&self) -> JobState {
        self.state
    }

    /// Moves the job to `next`
    ///
    /// Illegal transitions are ignored and logged; the job keeps its state.
    pub fn transition(&mut self, next: JobState) -> bool {
        if self.state.can_transition_to(next) {
            self.state = next;
            true
        } else {
            tracing::warn!(
                "Ignoring invalid job transition {} -> {} for {}",
                self.state,
                next,
                self.source_url
            );
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_job_derives_target() {
        let job = DownloadJob::new("https://m.example.com/x/y/clip.mp4", Path::new("videos")).unwrap();
        assert_eq!(job.target, Path::new("videos/clip.mp4"));
        assert_eq!(job.state(), JobState::Pending);
    }

    #[test]
    fn test_new_job_rejects_malformed_url() {
        assert!(DownloadJob::new("::nope::", Path::new("pics")).is_err());
    }

    #[test]
    fn test_transition_rules() {
        let mut job = DownloadJob::new("https://m.example.com/a.jpg", Path::new("pics")).unwrap();
        assert!(!job.transition(JobState::Done));
        assert_eq!(job.state(), JobState::Pending);

        assert!(job.transition(JobState::InFlight));
        assert!(job.transition(JobState::Done));
        assert!(!job.transition(JobState::Failed));
        assert_eq!(job.state(), JobState::Done);
    }
}

//! In-memory job registry.
//!
//! Each job has exactly one writer, the background task that runs it; any
//! number of callers may poll its status concurrently.

use super::state::{JobId, JobState, JobStats, JobStatus};
use crate::core::config::MailsiftConfig;
use crate::core::orchestrator::{DocumentSource, Orchestrator, ScanObserver, ScanProgress};
use crate::types::ScanReport;
use crate::{MailsiftError, Result};
use dashmap::DashMap;
use parking_lot::RwLock;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Notify;
use uuid::Uuid;

struct JobEntry {
    status: RwLock<JobStatus>,
    output: RwLock<Option<Arc<ScanReport>>>,
    finished_at: RwLock<Option<Instant>>,
    done: Notify,
}

impl JobEntry {
    fn new(status: JobStatus) -> Self {
        Self {
            status: RwLock::new(status),
            output: RwLock::new(None),
            finished_at: RwLock::new(None),
            done: Notify::new(),
        }
    }

    fn state(&self) -> JobState {
        self.status.read().state
    }

    fn advance(&self, next: JobState, message: impl Into<String>) {
        let mut status = self.status.write();
        if !status.state.can_advance_to(next) {
            tracing::error!(job_id = %status.id, from = %status.state, to = %next, "Rejected job state transition");
            return;
        }
        status.state = next;
        status.message = message.into();
    }

    fn finish(&self, result: Result<ScanReport>) {
        match result {
            Ok(report) => {
                let message = format!(
                    "Completed: {} addresses ({} valid)",
                    report.total_emails, report.valid_emails
                );
                *self.output.write() = Some(Arc::new(report));
                self.advance(JobState::Completed, message);
            }
            Err(err) => {
                self.status.write().error = Some(err.to_string());
                self.advance(JobState::Failed, "Failed");
            }
        }
        *self.finished_at.write() = Some(Instant::now());
        self.done.notify_waiters();
    }
}

/// Routes scan progress into one job's status.
struct JobProgress(Arc<JobEntry>);

impl ScanObserver for JobProgress {
    fn progress(&self, update: ScanProgress) {
        let mut status = self.0.status.write();
        // Stage messages carry no page counts; keep the last known ones.
        if update.total_pages > 0 {
            status.current_page = update.current_page;
            status.total_pages = update.total_pages;
        }
        status.message = update.message;
    }
}

/// Jobs keyed by id.
///
/// Cloning is cheap and shares the same jobs.
#[derive(Clone, Default)]
pub struct JobRegistry {
    jobs: Arc<DashMap<JobId, Arc<JobEntry>>>,
}

impl JobRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a scan of `documents` with `config` in the background.
    ///
    /// Must be called from within a Tokio runtime.
    ///
    /// # Errors
    ///
    /// Fails before any job is created when `config` is invalid or no PDF
    /// backend is available.
    pub fn submit(&self, documents: Vec<DocumentSource>, config: &MailsiftConfig) -> Result<JobId> {
        let orchestrator = Orchestrator::new(config)?;
        self.submit_with(documents, Arc::new(orchestrator))
    }

    /// Start a scan with a prepared orchestrator.
    pub fn submit_with(&self, documents: Vec<DocumentSource>, orchestrator: Arc<Orchestrator>) -> Result<JobId> {
        let runtime = tokio::runtime::Handle::try_current().map_err(|e| {
            MailsiftError::Other(format!("JobRegistry::submit requires a Tokio runtime: {}", e))
        })?;

        let id = Uuid::new_v4();
        let names = documents.iter().map(DocumentSource::name).collect();
        let entry = Arc::new(JobEntry::new(JobStatus::new(id, names)));
        self.jobs.insert(id, Arc::clone(&entry));

        entry.advance(JobState::Queued, "Queued");
        tracing::info!(job_id = %id, documents = documents.len(), "Job queued");

        runtime.spawn(async move {
            entry.advance(JobState::Processing, "Starting");
            let observer: Arc<dyn ScanObserver> = Arc::new(JobProgress(Arc::clone(&entry)));
            // A panic inside the scan must still leave the job terminal.
            let scan = tokio::spawn(async move { orchestrator.scan(&documents, observer).await });
            let result = match scan.await {
                Ok(result) => result,
                Err(err) => Err(MailsiftError::from(err)),
            };

            match &result {
                Ok(report) => tracing::info!(
                    job_id = %id,
                    emails = report.total_emails,
                    elapsed_secs = report.processing_time_secs,
                    "Job completed"
                ),
                Err(err) => tracing::error!(job_id = %id, error = %err, "Job failed"),
            }
            entry.finish(result);
        });

        Ok(id)
    }

    fn entry(&self, id: &JobId) -> Result<Arc<JobEntry>> {
        self.jobs
            .get(id)
            .map(|entry| Arc::clone(entry.value()))
            .ok_or_else(|| MailsiftError::JobNotFound(id.to_string()))
    }

    pub fn status(&self, id: &JobId) -> Result<JobStatus> {
        Ok(self.entry(id)?.status.read().clone())
    }

    /// The report of a completed job; `None` while running or after failure.
    pub fn output(&self, id: &JobId) -> Result<Option<Arc<ScanReport>>> {
        Ok(self.entry(id)?.output.read().clone())
    }

    /// Wait until the job reaches a terminal state.
    pub async fn wait(&self, id: &JobId) -> Result<JobStatus> {
        let entry = self.entry(id)?;
        loop {
            // Register before checking so a notification in between is not lost.
            let notified = entry.done.notified();
            if entry.state().is_terminal() {
                return Ok(entry.status.read().clone());
            }
            notified.await;
        }
    }

    /// Remove a terminal job.
    ///
    /// # Errors
    ///
    /// `JobNotFound` for unknown ids, `JobNotTerminal` for jobs still running.
    pub fn remove(&self, id: &JobId) -> Result<JobStatus> {
        let state = self.entry(id)?.state();
        if !state.is_terminal() {
            return Err(MailsiftError::JobNotTerminal {
                job_id: id.to_string(),
                state: state.to_string(),
            });
        }

        self.jobs
            .remove(id)
            .map(|(_, entry)| entry.status.read().clone())
            .ok_or_else(|| MailsiftError::JobNotFound(id.to_string()))
    }

    /// Drop terminal jobs that finished at least `age` ago. Returns how many
    /// were removed.
    pub fn evict_older_than(&self, age: Duration) -> usize {
        let before = self.jobs.len();
        self.jobs.retain(|_, entry| match *entry.finished_at.read() {
            Some(finished) => finished.elapsed() < age,
            None => true,
        });
        let evicted = before.saturating_sub(self.jobs.len());
        if evicted > 0 {
            tracing::debug!(evicted, "Evicted finished jobs");
        }
        evicted
    }

    pub fn stats(&self) -> JobStats {
        self.jobs.iter().fold(JobStats::default(), |mut stats, entry| {
            stats.total += 1;
            match entry.state() {
                JobState::Completed => stats.completed += 1,
                JobState::Failed => stats.failed += 1,
                _ => stats.pending += 1,
            }
            stats
        })
    }

    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }
}

impl std::fmt::Debug for JobRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JobRegistry").field("jobs", &self.jobs.len()).finish()
    }
}

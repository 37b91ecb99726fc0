//! Background scan jobs.
//!
//! ```rust,no_run
//! use mailsift::{DocumentSource, JobRegistry, MailsiftConfig};
//!
//! # async fn example() -> mailsift::Result<()> {
//! let registry = JobRegistry::new();
//! let id = registry.submit(vec![DocumentSource::Path("team.pdf".into())], &MailsiftConfig::default())?;
//! let status = registry.wait(&id).await?;
//! println!("{}: {}", status.state, status.message);
//! # Ok(())
//! # }
//! ```

pub mod registry;
pub mod state;

pub use registry::JobRegistry;
pub use state::{JobId, JobState, JobStats, JobStatus};

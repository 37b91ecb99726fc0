//! Job registry tests: lifecycle, polling, and eviction.

use async_trait::async_trait;
use mailsift::core::config::ValidationConfig;
use mailsift::extraction::{ExtractionPipeline, PageText, TextLayer, TextLayerStrategy};
use mailsift::validation::{MxLookup, MxResolver};
use mailsift::{DocumentSource, JobRegistry, JobState, MailsiftConfig, MailsiftError, Orchestrator, Result, Scorer};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

const PDF: &[u8] = b"%PDF-1.4\n";

/// Serves three pages, pausing on each until released.
struct GatedLayer {
    open: Arc<AtomicBool>,
}

impl TextLayer for GatedLayer {
    fn name(&self) -> &'static str {
        "gated"
    }

    fn read_pages(&self, _document: &[u8], visit: &mut dyn FnMut(PageText)) -> Result<()> {
        for number in 1..=3 {
            while !self.open.load(Ordering::SeqCst) {
                std::thread::sleep(Duration::from_millis(5));
            }
            visit(PageText {
                number,
                total: 3,
                text: Ok(format!("Page {} contact: team{}@acme.io", number, number)),
            });
        }
        Ok(())
    }
}

fn gated_orchestrator(open: Arc<AtomicBool>) -> Arc<Orchestrator> {
    let pipeline = ExtractionPipeline::new(1000).with_strategy(TextLayerStrategy::primary(Arc::new(GatedLayer { open })));
    Arc::new(Orchestrator::with_components(
        pipeline,
        Scorer::new(&ValidationConfig::default()),
    ))
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_job_moves_through_lifecycle() {
    let open = Arc::new(AtomicBool::new(false));
    let registry = JobRegistry::new();
    let id = registry
        .submit_with(
            vec![DocumentSource::bytes("team.pdf", PDF.to_vec())],
            gated_orchestrator(Arc::clone(&open)),
        )
        .unwrap();

    let running = registry.status(&id).unwrap();
    assert!(!running.state.is_terminal());
    assert!(matches!(
        registry.remove(&id),
        Err(MailsiftError::JobNotTerminal { .. })
    ));
    assert!(registry.output(&id).unwrap().is_none());

    open.store(true, Ordering::SeqCst);
    let done = registry.wait(&id).await.unwrap();

    assert_eq!(done.state, JobState::Completed);
    assert_eq!((done.current_page, done.total_pages), (3, 3));
    assert!(done.message.starts_with("Completed: 3 addresses"));

    let report = registry.output(&id).unwrap().unwrap();
    assert_eq!(report.total_emails, 3);
}

#[tokio::test]
async fn test_parallel_jobs_are_independent() {
    let registry = JobRegistry::new();
    let open = Arc::new(AtomicBool::new(true));

    let ok = registry
        .submit_with(
            vec![DocumentSource::bytes("team.pdf", PDF.to_vec())],
            gated_orchestrator(Arc::clone(&open)),
        )
        .unwrap();
    let bad = registry
        .submit_with(
            vec![DocumentSource::bytes("team.docx", b"PK\x03\x04".to_vec())],
            gated_orchestrator(open),
        )
        .unwrap();
    assert_ne!(ok, bad);

    assert_eq!(registry.wait(&ok).await.unwrap().state, JobState::Completed);
    let failed = registry.wait(&bad).await.unwrap();
    assert_eq!(failed.state, JobState::Failed);
    assert!(failed.error.is_some());

    let stats = registry.stats();
    assert_eq!((stats.total, stats.completed, stats.failed, stats.pending), (2, 1, 1, 0));
}

#[tokio::test]
async fn test_finished_jobs_are_evictable() {
    let registry = JobRegistry::new();
    let id = registry
        .submit_with(
            vec![DocumentSource::bytes("team.pdf", PDF.to_vec())],
            gated_orchestrator(Arc::new(AtomicBool::new(true))),
        )
        .unwrap();
    registry.wait(&id).await.unwrap();

    assert_eq!(registry.evict_older_than(Duration::from_secs(60)), 0);
    assert_eq!(registry.evict_older_than(Duration::ZERO), 1);
    assert!(registry.is_empty());
    assert!(matches!(registry.status(&id), Err(MailsiftError::JobNotFound(_))));
}

#[tokio::test]
async fn test_submit_with_config_missing_file_fails_job() {
    let registry = JobRegistry::new();
    let mut config = MailsiftConfig::default();
    config.ocr.enabled = false;

    match registry.submit(vec![DocumentSource::Path("/nonexistent/team.pdf".into())], &config) {
        Ok(id) => {
            let status = registry.wait(&id).await.unwrap();
            assert_eq!(status.state, JobState::Failed);
            assert_eq!(status.documents, vec!["team.pdf"]);
        }
        // Builds without a PDF backend refuse the job up front.
        Err(err) => assert!(matches!(err, MailsiftError::MissingDependency(_))),
    }
}

#[tokio::test]
async fn test_unknown_job_id() {
    let registry = JobRegistry::new();
    let id = uuid::Uuid::new_v4();
    assert!(matches!(registry.status(&id), Err(MailsiftError::JobNotFound(_))));
    assert!(matches!(registry.wait(&id).await, Err(MailsiftError::JobNotFound(_))));
}

struct PanickingResolver;

#[async_trait]
impl MxResolver for PanickingResolver {
    async fn lookup(&self, domain: &str) -> MxLookup {
        panic!("resolver blew up on {domain}");
    }
}

#[tokio::test]
async fn test_panicking_scorer_fails_job() {
    let open = Arc::new(AtomicBool::new(true));
    let pipeline = ExtractionPipeline::new(1000).with_strategy(TextLayerStrategy::primary(Arc::new(GatedLayer { open })));
    let config = ValidationConfig {
        enable_dns_lookup: true,
        ..Default::default()
    };
    let orchestrator = Arc::new(Orchestrator::with_components(
        pipeline,
        Scorer::with_resolver(&config, Arc::new(PanickingResolver)),
    ));

    let registry = JobRegistry::new();
    let id = registry
        .submit_with(vec![DocumentSource::bytes("team.pdf", PDF.to_vec())], orchestrator)
        .unwrap();

    let done = tokio::time::timeout(Duration::from_secs(10), registry.wait(&id))
        .await
        .expect("job must reach a terminal state")
        .unwrap();

    assert_eq!(done.state, JobState::Failed);
    assert!(done.error.unwrap().contains("Background task failed"));
    assert!(registry.output(&id).unwrap().is_none());
    assert!(registry.remove(&id).is_ok());
}

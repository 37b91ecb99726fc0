//! PDF integration tests.
//!
//! Documents are generated with lopdf so the tests need no fixture files. The
//! Pdfium layer may or may not be loadable on the test machine; every
//! assertion here holds either way because lopdf reads the same text.

#![cfg(feature = "pdf")]

use lopdf::{Document, Object, Stream, dictionary};
use mailsift::extraction::{NoProgress, TextLayer};
use mailsift::pdf::{StreamTextLayer, probe};
use mailsift::{MailsiftConfig, scan_bytes, scan_file, scan_files};
use std::sync::Mutex;
use tempfile::TempDir;

fn escape(text: &str) -> String {
    text.replace('\\', "\\\\").replace('(', "\\(").replace(')', "\\)")
}

/// One Helvetica page per entry; `title` goes into the info dictionary.
fn build_pdf(pages: &[&str], title: Option<&str>) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    });

    let kids: Vec<Object> = pages
        .iter()
        .map(|text| {
            let content = format!("BT /F1 11 Tf 56 720 Td ({}) Tj ET", escape(text));
            let content_id = doc.add_object(Stream::new(dictionary! {}, content.into_bytes()));
            doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
                "Contents" => content_id,
                "Resources" => dictionary! { "Font" => dictionary! { "F1" => font_id } },
            })
            .into()
        })
        .collect();

    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! { "Type" => "Pages", "Kids" => kids, "Count" => count }),
    );
    let catalog_id = doc.add_object(dictionary! { "Type" => "Catalog", "Pages" => pages_id });
    doc.trailer.set("Root", catalog_id);

    if let Some(title) = title {
        let info_id = doc.add_object(dictionary! { "Title" => Object::string_literal(title) });
        doc.trailer.set("Info", info_id);
    }

    let mut buf = Vec::new();
    doc.save_to(&mut buf).unwrap();
    buf
}

fn text_only_config() -> MailsiftConfig {
    let mut config = MailsiftConfig::default();
    config.ocr.enabled = false;
    config
}

#[test]
fn test_stream_layer_reads_every_page() {
    let bytes = build_pdf(
        &["Press office: press@harbor-labs.com", "Careers (jobs) at Harbor Labs"],
        None,
    );

    let mut pages = Vec::new();
    StreamTextLayer::new()
        .read_pages(&bytes, &mut |page| pages.push((page.number, page.total, page.text.unwrap())))
        .unwrap();

    assert_eq!(pages.len(), 2);
    assert_eq!((pages[0].0, pages[0].1), (1, 2));
    assert!(pages[0].2.contains("press@harbor-labs.com"));
    assert!(pages[1].2.contains("Careers (jobs) at Harbor Labs"));
}

#[test]
fn test_probe_reports_structure() {
    let bytes = build_pdf(&["one", "two", "three"], Some("Partner Directory"));
    let info = probe(&bytes).unwrap();

    assert_eq!(info.page_count, 3);
    assert!(!info.encrypted);
    assert!(!info.has_images);
    assert_eq!(info.title.as_deref(), Some("Partner Directory"));
    assert_eq!(info.author, None);
}

#[tokio::test]
async fn test_scan_bytes_end_to_end() {
    let bytes = build_pdf(
        &[
            "Partnerships: Jane Roe - jane.roe@harbor-labs.com",
            "Press: press [at] harbor-labs [dot] com, or again jane.roe@harbor-labs.com",
        ],
        None,
    );

    let report = scan_bytes("directory.pdf", bytes, &text_only_config()).await.unwrap();

    assert_eq!(report.files_processed, vec!["directory.pdf"]);
    let jane = report
        .records
        .iter()
        .find(|r| r.address == "jane.roe@harbor-labs.com")
        .expect("address from the text layer");
    assert_eq!(jane.occurrences, 2);
    assert_eq!(jane.name_hint.as_deref(), Some("Jane Roe"));
    assert_eq!(jane.company_hint.as_deref(), Some("Harbor Labs"));
    assert!(jane.is_valid);

    assert!(report.records.iter().any(|r| r.address == "press@harbor-labs.com"));
}

#[tokio::test]
async fn test_scan_files_merges_and_skips() {
    let temp_dir = TempDir::new().unwrap();
    let first = temp_dir.path().join("first.pdf");
    let second = temp_dir.path().join("second.pdf");
    let notes = temp_dir.path().join("notes.txt");
    std::fs::write(&first, build_pdf(&["Write to ops@harbor-labs.com"], None)).unwrap();
    std::fs::write(&second, build_pdf(&["Escalations: ops@harbor-labs.com"], None)).unwrap();
    std::fs::write(&notes, "ops@harbor-labs.com").unwrap();

    let report = scan_files(&[&first, &notes, &second], &text_only_config()).await.unwrap();

    assert_eq!(report.files_processed, vec!["first.pdf", "second.pdf"]);
    assert_eq!(report.files_failed.len(), 1);
    assert_eq!(report.files_failed[0].name, "notes.txt");
    assert_eq!(report.total_emails, 1);
    assert_eq!(report.duplicates[0].count, 2);
}

#[tokio::test]
async fn test_scan_file_rejects_missing_and_foreign_files() {
    let temp_dir = TempDir::new().unwrap();
    assert!(scan_file(temp_dir.path().join("absent.pdf"), &text_only_config()).await.is_err());

    let notes = temp_dir.path().join("notes.txt");
    std::fs::write(&notes, "ops@harbor-labs.com").unwrap();
    let err = scan_file(&notes, &text_only_config()).await.unwrap_err();
    assert!(err.is_input_error());
}

#[tokio::test]
async fn test_corrupt_pdf_yields_empty_report() {
    let report = scan_bytes("broken.pdf", b"%PDF-1.7\nthis is not a pdf body".to_vec(), &text_only_config())
        .await
        .unwrap();

    assert_eq!(report.total_emails, 0);
    assert_eq!(report.files_processed, vec!["broken.pdf"]);
}

#[test]
fn test_pipeline_progress_counts_pages() {
    let bytes = build_pdf(&["a@harbor-labs.com", "b@harbor-labs.com", "c@harbor-labs.com"], None);
    let pipeline = mailsift::ExtractionPipeline::from_config(&text_only_config()).unwrap();
    let seen = Mutex::new(Vec::new());

    let result = pipeline
        .extract(&bytes, &|current: usize, total: usize| seen.lock().unwrap().push((current, total)))
        .unwrap();

    assert!(result.text.contains("c@harbor-labs.com"));
    let seen = seen.into_inner().unwrap();
    assert!(seen.ends_with(&[(1, 3), (2, 3), (3, 3)]));

    let quiet = pipeline.extract(&bytes, &NoProgress).unwrap();
    assert_eq!(quiet.text, result.text);
}

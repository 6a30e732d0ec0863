//! Integration tests for batch runs.

use std::fs;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream};

use paperfront::batch::{load_timeout_queue, DEFAULT_TIMEOUT_MARKER};
use paperfront::{BatchOptions, BatchOutcome, BatchRunner, BatchSummary, FrontMatterRecord, JsonFormat};

/// A one-page Courier PDF with one text line per `(size, x, y, text)`.
fn write_pdf(path: &Path, lines: &[(i64, i64, i64, &str)]) {
    let mut operations = Vec::new();
    for (size, x, y, text) in lines {
        operations.push(Operation::new("BT", vec![]));
        operations.push(Operation::new("Tf", vec!["F1".into(), (*size).into()]));
        operations.push(Operation::new("Td", vec![(*x).into(), (*y).into()]));
        operations.push(Operation::new("Tj", vec![Object::string_literal(*text)]));
        operations.push(Operation::new("ET", vec![]));
    }

    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Courier",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            "F1" => font_id,
        },
    });
    let content = Content { operations };
    let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
    let page_id = doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "Contents" => content_id,
        "Resources" => resources_id,
    });
    let pages = dictionary! {
        "Type" => "Pages",
        "Kids" => vec![page_id.into()],
        "Count" => 1,
        "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
    };
    doc.objects.insert(pages_id, Object::Dictionary(pages));
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);
    doc.save(path).unwrap();
}

fn sample_paper(path: &Path) {
    write_pdf(
        path,
        &[
            (18, 72, 700, "Sparse Coding for Layout"),
            (10, 72, 640, "Jane Doe, John Smith"),
            (10, 72, 560, "Abstract"),
            (10, 72, 548, "We study layouts."),
        ],
    );
}

#[test]
fn test_pdf_extraction() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("paper.pdf");
    sample_paper(&path);

    let record = paperfront::extract_record(&path).unwrap();
    assert_eq!(record.filename, "paper.pdf");
    assert_eq!(record.title, "Sparse Coding for Layout");
    assert_eq!(record.authors, "Jane Doe, John Smith");
    assert_eq!(record.abstract_text, "We study layouts.");
}

#[test]
fn test_batch_run() {
    let dir = tempfile::tempdir().unwrap();
    let pdf_dir = dir.path().join("pdfs");
    let out_dir = dir.path().join("out");
    fs::create_dir_all(&pdf_dir).unwrap();
    sample_paper(&pdf_dir.join("paper.pdf"));
    fs::write(pdf_dir.join("broken.pdf"), b"this is not a pdf").unwrap();

    let error_log = dir.path().join("errors.log");
    fs::write(
        &error_log,
        "2024-05-01T09:00:00\tpaper.pdf\t90.01\tTIMEOUT>90s\n\
         2024-05-01T09:00:01\tdone.pdf\t1.20\tOK\n\
         2024-05-01T09:01:31\tmissing.pdf\t90.00\tTIMEOUT>90s\n\
         2024-05-01T09:03:01\tbroken.pdf\t90.00\tTIMEOUT>90s\n",
    )
    .unwrap();

    let queue = load_timeout_queue(&error_log, DEFAULT_TIMEOUT_MARKER).unwrap();
    assert_eq!(queue, vec!["paper.pdf", "missing.pdf", "broken.pdf"]);

    let options = BatchOptions::new(&pdf_dir, &out_dir)
        .with_timeout(Duration::from_secs(30))
        .with_parallelism(2)
        .with_json_format(JsonFormat::Compact);
    let runner = BatchRunner::new(options).unwrap();

    let done = AtomicUsize::new(0);
    let summary = runner.run(&queue, |_| {
        done.fetch_add(1, Ordering::SeqCst);
    });

    assert_eq!(done.load(Ordering::SeqCst), 3);
    assert_eq!(
        summary,
        BatchSummary {
            ok: 1,
            errors: 1,
            timeouts: 0,
            missing: 1
        }
    );

    let json = fs::read_to_string(out_dir.join("paper.json")).unwrap();
    let record: FrontMatterRecord = serde_json::from_str(&json).unwrap();
    assert_eq!(record.filename, "paper.pdf");
    assert_eq!(record.title, "Sparse Coding for Layout");
    assert!(!out_dir.join("broken.json").exists());
    assert!(!out_dir.join("missing.json").exists());

    let log = fs::read_to_string(&runner.options().stage_log).unwrap();
    let mut outcomes: Vec<(String, String)> = log
        .lines()
        .map(|line| {
            let fields: Vec<&str> = line.split('\t').collect();
            assert_eq!(fields.len(), 4);
            (fields[1].to_string(), fields[3].to_string())
        })
        .collect();
    outcomes.sort();
    assert_eq!(outcomes[0], ("broken.pdf".to_string(), "Unknown input format: expected a PDF or a JSON word dump".to_string()));
    assert_eq!(outcomes[1], ("missing.pdf".to_string(), "FILE_NOT_FOUND".to_string()));
    assert_eq!(outcomes[2], ("paper.pdf".to_string(), "OK".to_string()));
}

#[test]
fn test_single_document_report() {
    let dir = tempfile::tempdir().unwrap();
    sample_paper(&dir.path().join("paper.pdf"));

    let options = BatchOptions::new(dir.path(), dir.path().join("out"))
        .with_stage_log(dir.path().join("logs").join("stage.log"));
    let runner = BatchRunner::new(options).unwrap();

    let report = runner.process("paper.pdf");
    assert_eq!(report.outcome, BatchOutcome::Ok);
    assert_eq!(report.filename, "paper.pdf");
    assert!(dir.path().join("out").join("paper.json").is_file());
}

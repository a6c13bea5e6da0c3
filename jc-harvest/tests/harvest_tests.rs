//! End-to-end tests for the populate → build → tag pipeline

use std::fs;
use std::path::Path;

use jc_common::session::normalize_document;
use jc_harvest::{assemble, populate, tagger, SESSIONS_FILE};
use serde_json::{json, Value};
use tempfile::TempDir;

fn write_export(root: &Path, year: &str, month: &str, articles: Value) {
    let dir = root.join(year).join(month);
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join("ent_all_results.json"), articles.to_string()).unwrap();
}

/// Two monthly exports plus a curated table that references one of them
fn setup_root() -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();

    write_export(
        root,
        "2024",
        "11",
        json!([
            {
                "PMID": "111",
                "Title": "Tinnitus outcomes after stapes surgery",
                "Journal": "Otology & Neurotology",
                "Authors": "Lee A, Park B",
                "Abstract": "Retrospective review.",
                "DOI": "10.1000/oto.111",
                "Publication_Date": "2024-11-12"
            },
            {
                "PMID": 222,
                "Title": "Sinus surgery in children",
                "Journal": "Rhinology",
                "Authors": "Kim C",
                "Abstract": "",
                "DOI": "10.1000/rhino.222",
                "Publication_Date": "2024-11-20"
            }
        ]),
    );
    write_export(
        root,
        "2025",
        "03",
        json!([
            {
                "PMID": "333",
                "Title": "Clinic scheduling",
                "Journal": "Quality Report",
                "Authors": "Diaz D",
                "Publication_Date": "2025-03-01"
            }
        ]),
    );
    // Ignored: not a year folder
    write_export(root, "archive", "01", json!([{"PMID": "999", "Title": "Stray"}]));

    fs::write(
        root.join(SESSIONS_FILE),
        "date,presenter,pmid,title,journal,authors,doi,abstract,notes,pdf,highlight,summary_headline\n\
         2025-03-05,Dr. Lee,222,,,,,,Great discussion,,yes,March picks\n",
    )
    .unwrap();

    dir
}

#[test]
fn test_populate_merges_exports_and_curated_rows() {
    let dir = setup_root();
    let report = populate::populate(dir.path()).unwrap();
    assert_eq!(report.rows, 3);

    let mut reader = csv::Reader::from_path(dir.path().join(SESSIONS_FILE)).unwrap();
    let headers: Vec<String> = reader.headers().unwrap().iter().map(str::to_string).collect();
    assert_eq!(&headers[..3], ["date", "presenter", "pmid"]);
    assert_eq!(&headers[10..], ["highlight", "summary_headline"]);

    let rows: Vec<csv::StringRecord> = reader.records().map(Result::unwrap).collect();
    let pmids: Vec<&str> = rows.iter().map(|r| &r[2]).collect();
    assert_eq!(pmids, ["222", "333", "111"]);

    // Curated values win; exported fields fill the blanks
    assert_eq!(&rows[0][0], "2025-03-05");
    assert_eq!(&rows[0][1], "Dr. Lee");
    assert_eq!(&rows[0][3], "Sinus surgery in children");
    assert_eq!(&rows[0][8], "Great discussion");
    assert_eq!(&rows[0][10], "yes");
    assert_eq!(&rows[2][9], "https://pubmed.ncbi.nlm.nih.gov/111/");
}

#[test]
fn test_build_writes_document_the_site_can_read() {
    let dir = setup_root();
    populate::populate(dir.path()).unwrap();

    let out = dir.path().join("data").join("journal_club.json");
    let report = assemble::build(dir.path(), &out).unwrap();
    assert_eq!(report.sessions, 3);
    assert_eq!(report.summaries, 1);
    assert_eq!(report.skipped, 0);

    let document: Value = serde_json::from_str(&fs::read_to_string(&out).unwrap()).unwrap();
    assert_eq!(document["sessions"][0]["pmid"], "222");
    assert_eq!(document["sessions"][0]["highlight"], true);
    assert_eq!(document["monthly_summaries"][0]["month"], "2025-03");
    assert_eq!(document["monthly_summaries"][0]["headline"], "March picks");

    let normalized = normalize_document(&document);
    assert_eq!(normalized.sessions.len(), 3);
    assert!(normalized.dropped.is_empty());
    assert_eq!(normalized.summaries.len(), 1);
}

#[test]
fn test_build_skips_rows_missing_from_exports() {
    let dir = setup_root();
    fs::write(
        dir.path().join(SESSIONS_FILE),
        "date,presenter,pmid\n2025-01-10,Dr. Ng,404\n2024-11-12,Dr. Ng,111\n",
    )
    .unwrap();

    let out = dir.path().join("out.json");
    let report = assemble::build(dir.path(), &out).unwrap();
    assert_eq!(report.sessions, 1);
    assert_eq!(report.skipped, 1);
}

#[test]
fn test_tag_assigns_subjects_and_writes_summary() {
    let dir = setup_root();
    populate::populate(dir.path()).unwrap();
    let data = dir.path().join("data").join("journal_club.json");
    assemble::build(dir.path(), &data).unwrap();

    let summary_path = dir.path().join("data").join("subject_summary.json");
    let report = tagger::tag(&data, &summary_path).unwrap();
    assert_eq!(report.sessions, 3);
    assert_eq!(report.months, 2);

    let document: Value = serde_json::from_str(&fs::read_to_string(&data).unwrap()).unwrap();
    let subjects_of = |pmid: &str| -> Value {
        document["sessions"]
            .as_array()
            .unwrap()
            .iter()
            .find(|s| s["pmid"] == pmid)
            .map(|s| s["subjects"].clone())
            .unwrap()
    };
    assert_eq!(subjects_of("222"), json!(["Pediatrics", "Rhinology & Allergy"]));
    assert_eq!(subjects_of("333"), json!([tagger::FALLBACK_SUBJECT]));
    assert_eq!(document["monthly_summaries"][0]["headline"], "March picks");

    let summary: Value = serde_json::from_str(&fs::read_to_string(&summary_path).unwrap()).unwrap();
    assert_eq!(summary["2025-03"]["Pediatrics"], 1);
    assert_eq!(summary["2025-03"][tagger::FALLBACK_SUBJECT], 1);
    assert_eq!(summary["2024-11"]["Otology & Neurotology"], 1);
}

#[test]
fn test_tag_rejects_unexpected_document() {
    let dir = tempfile::tempdir().unwrap();
    let data = dir.path().join("data.json");
    fs::write(&data, r#"{"items": []}"#).unwrap();
    assert!(tagger::tag(&data, &dir.path().join("summary.json")).is_err());
}

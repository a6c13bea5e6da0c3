//! `tag`: keyword-based subject assignment
//!
//! Each subject is a case-insensitive regex alternation matched against a
//! session's title, journal, abstract and notes. Sessions matching nothing
//! get [`FALLBACK_SUBJECT`].

use regex::Regex;
use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::path::{Path, PathBuf};
use tracing::info;

use crate::error::{HarvestError, Result};
use crate::write_json;

pub const PEDIATRICS: &str = "Pediatrics";
pub const FALLBACK_SUBJECT: &str = "General ENT/Other";
/// Month key for sessions without a date
pub const UNKNOWN_MONTH: &str = "unknown";

const SUBJECT_KEYWORDS: &[(&str, &[&str])] = &[
    (
        "Rhinology & Allergy",
        &[
            "rhino", "sinus", "nasal", "nose", "septum", "polyp", "olfact", "smell", "sinonasal",
            "nasophary", "epistaxis",
        ],
    ),
    (
        "Otology & Neurotology",
        &[
            "cochlea", "ear", "otic", "tympan", "mastoid", "ossicul", "vestib", "tinnitus", "hearing",
            "ossicular", "otos", "eustachian",
        ],
    ),
    (
        "Audiology & Hearing Science",
        &["audiology", "audiogram", "speech perception", "listening", "hearing aid", "cochlear implant"],
    ),
    (
        "Laryngology & Voice",
        &["laryn", "vocal cord", "voice", "phonation", "glott", "dysphonia", "esophag"],
    ),
    ("Airway & Trachea", &["airway", "trache", "bronch", "intubat", "decann", "stent"]),
    ("Sleep Medicine", &["sleep", "apnea", "hypopnea", "cpap", r"osa\b"]),
    (
        "Head & Neck Oncology",
        &["carcinoma", "cancer", "tumou?r", "neoplasm", "sarcoma", "oncology", "malignan", "papilloma"],
    ),
    ("Endocrine (Thyroid/Parathyroid)", &["thyroid", "parathy", "endocrine"]),
    (
        "Salivary & Oral Cavity",
        &[
            "salivar", "parotid", "submandibular", "sublingual", "sialo", "oral cavity", "tongue", "palate",
            "tonsil",
        ],
    ),
    (
        "Facial Plastics & Reconstruction",
        &["facial", "reconstruct", "rhinoplast", "cleft", "aesthe", "cosmetic", "flap", "graft", "scar"],
    ),
    (
        "Skull Base & Cranial",
        &["skull base", "cranial", "intracran", "cerebrospinal", "csf", "pituitar", "meningioma"],
    ),
    ("Trauma", &["trauma", "fracture", "injur", "gunshot", "laceration"]),
    (
        "Infectious Disease",
        &["infect", "viral", "bacterial", "fungal", "abscess", "mycobacter", "sepsis"],
    ),
];

const PEDIATRIC_PATTERN: &str =
    r"(?i)\b(pediatric|child|children|infant|neonate|adolesc|toddler|newborn)\b";

/// Session fields the rules look at
const TAGGED_FIELDS: [&str; 4] = ["title", "journal", "abstract", "notes"];

#[derive(Debug)]
struct SubjectRule {
    name: &'static str,
    pattern: Regex,
}

/// Compiled subject rules
#[derive(Debug)]
pub struct SubjectRules {
    rules: Vec<SubjectRule>,
    pediatric: Regex,
}

impl SubjectRules {
    pub fn new() -> Result<Self> {
        let rules = SUBJECT_KEYWORDS
            .iter()
            .map(|&(name, keywords)| {
                Regex::new(&format!("(?i){}", keywords.join("|"))).map(|pattern| SubjectRule { name, pattern })
            })
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(Self {
            rules,
            pediatric: Regex::new(PEDIATRIC_PATTERN)?,
        })
    }

    /// Subjects for a text: sorted, deduplicated, never empty
    pub fn assign(&self, text: &str) -> Vec<String> {
        let mut subjects: BTreeSet<&str> = self
            .rules
            .iter()
            .filter(|rule| rule.pattern.is_match(text))
            .map(|rule| rule.name)
            .collect();

        if self.pediatric.is_match(text) {
            subjects.insert(PEDIATRICS);
        }
        if subjects.is_empty() {
            subjects.insert(FALLBACK_SUBJECT);
        }

        subjects.into_iter().map(str::to_string).collect()
    }

    /// Text of the tagged fields, blanks skipped, space-joined
    pub fn session_text(session: &serde_json::Map<String, Value>) -> String {
        TAGGED_FIELDS
            .iter()
            .filter_map(|field| session.get(*field).and_then(Value::as_str))
            .filter(|text| !text.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Subject counts for one month, most common first
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubjectCounts(pub Vec<(String, usize)>);

impl Serialize for SubjectCounts {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (subject, count) in &self.0 {
            map.serialize_entry(subject, count)?;
        }
        map.end()
    }
}

/// `YYYY-MM` (or `unknown`) → subject counts
pub type SubjectSummary = BTreeMap<String, SubjectCounts>;

#[derive(Debug, Clone)]
pub struct TagReport {
    pub sessions: usize,
    pub months: usize,
    pub summary_path: PathBuf,
}

/// Assign subjects to every session object of a data document in place.
///
/// Accepts `{"sessions": [...]}` or a bare array; every other key and every
/// non-object entry is left untouched.
pub fn tag_document(document: &mut Value, rules: &SubjectRules) -> std::result::Result<usize, String> {
    let sessions = match document {
        Value::Array(items) => items,
        Value::Object(fields) => match fields.get_mut("sessions") {
            Some(Value::Array(items)) => items,
            _ => return Err("expected a \"sessions\" array".to_string()),
        },
        _ => return Err("expected an object or an array".to_string()),
    };

    let mut tagged = 0;
    for session in sessions.iter_mut() {
        if let Value::Object(fields) = session {
            let subjects = rules.assign(&SubjectRules::session_text(fields));
            fields.insert("subjects".to_string(), Value::from(subjects));
            tagged += 1;
        }
    }
    Ok(tagged)
}

/// Count subjects per month over a tagged document
pub fn summarize(document: &Value) -> SubjectSummary {
    let sessions = match document {
        Value::Array(items) => items.as_slice(),
        Value::Object(fields) => fields
            .get("sessions")
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or_default(),
        _ => &[],
    };

    let mut by_month: BTreeMap<String, HashMap<String, usize>> = BTreeMap::new();
    for session in sessions {
        let date = session.get("date").and_then(Value::as_str).unwrap_or("");
        let month = if date.is_empty() {
            UNKNOWN_MONTH.to_string()
        } else {
            date.chars().take(7).collect()
        };
        let counts = by_month.entry(month).or_default();
        for subject in session
            .get("subjects")
            .and_then(Value::as_array)
            .into_iter()
            .flatten()
            .filter_map(Value::as_str)
        {
            *counts.entry(subject.to_string()).or_default() += 1;
        }
    }

    by_month
        .into_iter()
        .map(|(month, counts)| {
            let mut ordered: Vec<(String, usize)> = counts.into_iter().collect();
            ordered.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
            (month, SubjectCounts(ordered))
        })
        .collect()
}

/// Tag the data file in place and write the per-month subject summary
pub fn tag(data_path: &Path, summary_path: &Path) -> Result<TagReport> {
    let rules = SubjectRules::new()?;
    let text = std::fs::read_to_string(data_path)?;
    let mut document: Value = serde_json::from_str(&text)?;

    let sessions = tag_document(&mut document, &rules).map_err(|reason| HarvestError::InvalidDocument {
        path: data_path.to_path_buf(),
        reason,
    })?;
    write_json(data_path, &document)?;

    let summary = summarize(&document);
    write_json(summary_path, &summary)?;

    info!(
        "Tagged {} sessions in {}; summary for {} months in {}",
        sessions,
        data_path.display(),
        summary.len(),
        summary_path.display()
    );
    Ok(TagReport {
        sessions,
        months: summary.len(),
        summary_path: summary_path.to_path_buf(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_assign_sorted_and_deduplicated() {
        let rules = SubjectRules::new().unwrap();
        let subjects = rules.assign("Pediatric cochlear implant outcomes in children with sinus disease");
        assert_eq!(
            subjects,
            vec![
                "Audiology & Hearing Science",
                "Otology & Neurotology",
                "Pediatrics",
                "Rhinology & Allergy",
            ]
        );
    }

    #[test]
    fn test_fallback_subject() {
        let rules = SubjectRules::new().unwrap();
        assert_eq!(rules.assign("Quality improvement in clinic workflow"), vec![FALLBACK_SUBJECT]);
    }

    #[test]
    fn test_keyword_boundaries() {
        let rules = SubjectRules::new().unwrap();
        assert!(rules.assign("Untreated OSA in adults").contains(&"Sleep Medicine".to_string()));
        assert!(!rules.assign("Osaka conference").contains(&"Sleep Medicine".to_string()));
        assert!(!rules.assign("Childhood vaccination").contains(&PEDIATRICS.to_string()));
    }

    #[test]
    fn test_tag_document_preserves_other_keys() {
        let rules = SubjectRules::new().unwrap();
        let mut doc = json!({
            "sessions": [
                {"date": "2025-03-05", "title": "Thyroid nodules", "subjects": ["Old"]},
                "not an object"
            ],
            "monthly_summaries": [{"month": "2025-03", "headline": "Kept"}]
        });

        assert_eq!(tag_document(&mut doc, &rules), Ok(1));
        assert_eq!(doc["sessions"][0]["subjects"], json!(["Endocrine (Thyroid/Parathyroid)"]));
        assert_eq!(doc["sessions"][1], "not an object");
        assert_eq!(doc["monthly_summaries"][0]["headline"], "Kept");

        assert!(tag_document(&mut json!("text"), &rules).is_err());
    }

    #[test]
    fn test_tag_document_keeps_key_order() {
        let rules = SubjectRules::new().unwrap();
        let mut doc: Value = serde_json::from_str(
            r#"{"sessions":[{"title":"Sleep apnea","date":"2025-01-01","analysis":""}],"generated":"x"}"#,
        )
        .unwrap();

        tag_document(&mut doc, &rules).unwrap();
        assert_eq!(
            serde_json::to_string(&doc).unwrap(),
            r#"{"sessions":[{"title":"Sleep apnea","date":"2025-01-01","analysis":"","subjects":["Sleep Medicine"]}],"generated":"x"}"#
        );
    }

    #[test]
    fn test_summary_most_common_first() {
        let doc = json!([
            {"date": "2025-03-05", "subjects": ["Trauma", "Sleep Medicine"]},
            {"date": "2025-03-20", "subjects": ["Sleep Medicine"]},
            {"subjects": ["Trauma"]},
        ]);
        let summary = summarize(&doc);

        assert_eq!(
            summary["2025-03"],
            SubjectCounts(vec![("Sleep Medicine".into(), 2), ("Trauma".into(), 1)])
        );
        assert_eq!(summary[UNKNOWN_MONTH].0.len(), 1);

        let written = serde_json::to_string(&summary["2025-03"]).unwrap();
        assert_eq!(written, r#"{"Sleep Medicine":2,"Trauma":1}"#);
    }
}

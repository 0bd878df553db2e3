use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::DocId;

#[derive(Debug, Error)]
pub enum CorpusLoadError {
    #[error("failed to read corpus {}: {source}", .path.display())]
    Io { path: PathBuf, #[source] source: std::io::Error },
    #[error("malformed csv corpus: {0}")]
    Csv(#[from] csv::Error),
    #[error("malformed json corpus: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unsupported corpus format: {} (expected .csv, .json or .jsonl)", .0.display())]
    UnsupportedFormat(PathBuf),
    #[error("row {row} has an empty identifier")]
    MissingId { row: usize },
    #[error("duplicate identifier {id:?}")]
    DuplicateId { id: String },
}

/// One legal section. Every text field is present, empty when the source has no value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentRecord {
    #[serde(alias = "section_id")]
    pub id: String,
    #[serde(default, alias = "section_title")]
    pub title: String,
    #[serde(default, alias = "chapter_title")]
    pub group: String,
    #[serde(default, alias = "law_text")]
    pub body: String,
    #[serde(default)]
    pub main_text: String,
    #[serde(default, alias = "explanation")]
    pub explanatory_text: String,
    #[serde(default, alias = "illustration")]
    pub illustrative_text: String,
    #[serde(default, alias = "exception")]
    pub exception_text: String,
    #[serde(default, alias = "punishment_text")]
    pub sanction_text: String,
    #[serde(default)]
    pub proviso: String,
    #[serde(default)]
    pub keywords: String,
}

impl DocumentRecord {
    pub fn new(id: impl Into<String>, title: impl Into<String>, group: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            group: group.into(),
            body: body.into(),
            main_text: String::new(),
            explanatory_text: String::new(),
            illustrative_text: String::new(),
            exception_text: String::new(),
            sanction_text: String::new(),
            proviso: String::new(),
            keywords: String::new(),
        }
    }

    pub fn with_keywords(mut self, keywords: impl Into<String>) -> Self {
        self.keywords = keywords.into();
        self
    }

    /// Text fed to the weighting model: title, body and keywords.
    pub fn searchable_text(&self) -> String {
        format!("{} {} {}", self.title, self.body, self.keywords)
    }
}

/// Immutable, validated set of documents in source order.
#[derive(Debug, Default)]
pub struct CorpusStore {
    docs: Vec<DocumentRecord>,
    search_text: Vec<String>,
    by_id: HashMap<String, DocId>,
}

impl CorpusStore {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, CorpusLoadError> {
        let path = path.as_ref();
        let ext = path.extension().and_then(|s| s.to_str()).map(str::to_ascii_lowercase);
        let records = match ext.as_deref() {
            Some("csv") => read_csv(path)?,
            Some("jsonl") => read_jsonl(path)?,
            Some("json") => read_json(path)?,
            _ => return Err(CorpusLoadError::UnsupportedFormat(path.to_path_buf())),
        };
        let store = Self::from_records(records)?;
        tracing::info!(path = %path.display(), num_docs = store.len(), "loaded corpus");
        Ok(store)
    }

    pub fn from_records(records: Vec<DocumentRecord>) -> Result<Self, CorpusLoadError> {
        let mut by_id = HashMap::with_capacity(records.len());
        let mut docs = Vec::with_capacity(records.len());
        for (row, mut rec) in records.into_iter().enumerate() {
            rec.id = rec.id.trim().to_string();
            if rec.id.is_empty() {
                return Err(CorpusLoadError::MissingId { row });
            }
            if by_id.insert(rec.id.clone(), row as DocId).is_some() {
                return Err(CorpusLoadError::DuplicateId { id: rec.id });
            }
            docs.push(rec);
        }
        let search_text = docs.iter().map(DocumentRecord::searchable_text).collect();
        Ok(Self { docs, search_text, by_id })
    }

    pub fn get_by_id(&self, id: &str) -> Option<&DocumentRecord> {
        self.by_id.get(id).map(|&d| &self.docs[d as usize])
    }

    pub fn get(&self, doc: DocId) -> Option<&DocumentRecord> { self.docs.get(doc as usize) }

    pub fn all(&self) -> &[DocumentRecord] { &self.docs }

    pub fn search_texts(&self) -> &[String] { &self.search_text }

    pub fn len(&self) -> usize { self.docs.len() }

    pub fn is_empty(&self) -> bool { self.docs.is_empty() }
}

fn open(path: &Path) -> Result<File, CorpusLoadError> {
    File::open(path).map_err(|source| CorpusLoadError::Io { path: path.to_path_buf(), source })
}

fn read_csv(path: &Path) -> Result<Vec<DocumentRecord>, CorpusLoadError> {
    let mut reader = csv::ReaderBuilder::new().flexible(true).from_reader(open(path)?);
    let mut out = Vec::new();
    for rec in reader.deserialize() {
        out.push(rec?);
    }
    Ok(out)
}

fn read_jsonl(path: &Path) -> Result<Vec<DocumentRecord>, CorpusLoadError> {
    let reader = BufReader::new(open(path)?);
    let mut out = Vec::new();
    for line in reader.lines() {
        let line = line.map_err(|source| CorpusLoadError::Io { path: path.to_path_buf(), source })?;
        if line.trim().is_empty() { continue; }
        out.push(record_from_value(serde_json::from_str(&line)?)?);
    }
    Ok(out)
}

fn read_json(path: &Path) -> Result<Vec<DocumentRecord>, CorpusLoadError> {
    let json: serde_json::Value = serde_json::from_reader(BufReader::new(open(path)?))?;
    match json {
        serde_json::Value::Array(arr) => arr.into_iter().map(record_from_value).collect(),
        obj @ serde_json::Value::Object(_) => Ok(vec![record_from_value(obj)?]),
        other => Err(CorpusLoadError::Json(serde::de::Error::custom(format!(
            "expected an array or object at top level, found {other}"
        )))),
    }
}

/// Numbers and booleans become strings; nulls are dropped so fields fall back to "".
fn record_from_value(value: serde_json::Value) -> Result<DocumentRecord, CorpusLoadError> {
    use serde_json::Value;
    let value = match value {
        Value::Object(map) => Value::Object(
            map.into_iter()
                .filter_map(|(k, v)| match v {
                    Value::Null => None,
                    Value::String(s) => Some((k, Value::String(s))),
                    Value::Number(n) => Some((k, Value::String(n.to_string()))),
                    Value::Bool(b) => Some((k, Value::String(b.to_string()))),
                    other => Some((k, other)),
                })
                .collect(),
        ),
        other => other,
    };
    Ok(serde_json::from_value(value)?)
}

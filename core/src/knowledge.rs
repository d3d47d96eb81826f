//! Loading (trigger, response) records from disk.
//!
//! Accepts a `.json` file (an array of entries or a single entry), a `.jsonl`
//! file with one entry per line, or a directory containing any of those.

use crate::KnowledgeEntry;
use anyhow::{bail, Context, Result};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

#[derive(Debug, Clone, Default)]
pub struct KnowledgeBase {
    pub entries: Vec<KnowledgeEntry>,
    /// Files the entries were read from, in load order.
    pub sources: Vec<PathBuf>,
}

impl KnowledgeBase {
    pub fn new(entries: Vec<KnowledgeEntry>) -> Self { Self { entries, sources: Vec::new() } }
    pub fn len(&self) -> usize { self.entries.len() }
    pub fn is_empty(&self) -> bool { self.entries.is_empty() }
}

pub fn load_knowledge<P: AsRef<Path>>(path: P) -> Result<KnowledgeBase> {
    let path = path.as_ref();
    let files = collect_files(path)?;
    let mut kb = KnowledgeBase::default();
    for file in files {
        if file.extension().and_then(|s| s.to_str()) == Some("jsonl") {
            load_jsonl(&file, &mut kb.entries)?;
        } else {
            load_json(&file, &mut kb.entries)?;
        }
        kb.sources.push(file);
    }
    tracing::info!(path = %path.display(), entries = kb.entries.len(), files = kb.sources.len(), "knowledge base loaded");
    Ok(kb)
}

fn collect_files(path: &Path) -> Result<Vec<PathBuf>> {
    if path.is_file() {
        return Ok(vec![path.to_path_buf()]);
    }
    if !path.is_dir() {
        bail!("knowledge path {} does not exist", path.display());
    }
    let mut files = Vec::new();
    for entry in WalkDir::new(path).sort_by_file_name() {
        let entry = entry.with_context(|| format!("walking {}", path.display()))?;
        let p = entry.path();
        if !p.is_file() { continue; }
        if let Some(ext) = p.extension().and_then(|s| s.to_str()) {
            if matches!(ext, "json" | "jsonl") {
                files.push(p.to_path_buf());
            }
        }
    }
    Ok(files)
}

fn load_jsonl(file: &Path, out: &mut Vec<KnowledgeEntry>) -> Result<()> {
    let f = File::open(file).with_context(|| format!("opening {}", file.display()))?;
    let reader = BufReader::new(f);
    for (lineno, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() { continue; }
        let entry: KnowledgeEntry = serde_json::from_str(&line)
            .with_context(|| format!("{}:{}: invalid entry", file.display(), lineno + 1))?;
        out.push(entry);
    }
    Ok(())
}

fn load_json(file: &Path, out: &mut Vec<KnowledgeEntry>) -> Result<()> {
    let f = File::open(file).with_context(|| format!("opening {}", file.display()))?;
    let reader = BufReader::new(f);
    let json: serde_json::Value = serde_json::from_reader(reader)
        .with_context(|| format!("parsing {}", file.display()))?;
    match json {
        serde_json::Value::Array(arr) => {
            for v in arr {
                out.push(serde_json::from_value(v).with_context(|| format!("{}: invalid entry", file.display()))?);
            }
        }
        serde_json::Value::Object(_) => {
            out.push(serde_json::from_value(json).with_context(|| format!("{}: invalid entry", file.display()))?);
        }
        _ => bail!("{}: expected an entry or an array of entries", file.display()),
    }
    Ok(())
}

//! Harvests target nDCG figures from trec_eval-style report files.
//!
//! Reports are plain text, one record per line, whitespace-tokenized, with
//! the keyword at position 0 and the value at position 2:
//!
//! ```text
//! runid                 all   cip_run_1
//! ndcg                  all   0.4834
//! ```
//!
//! An `ndcg` record is attributed to the most recently seen `runid`. The
//! files are assumed well-formed; structural violations are fatal.

use log::debug;
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("failed to read report file: {0}")]
    Io(#[from] std::io::Error),
    #[error("'{keyword}' record is missing its value token: '{line}'")]
    MalformedRecord { keyword: String, line: String },
    #[error("'ndcg' record appears before any 'runid' record: '{line}'")]
    MissingRunId { line: String },
}

/// Scans one report's content for `runid` and `ndcg` records, inserting
/// run-id → score pairs into `targets`. Scores stay strings; parsing is
/// the caller's concern. Lines with fewer than 2 tokens are skipped.
pub fn scan_report(
    content: &str,
    targets: &mut HashMap<String, String>,
) -> Result<(), ReportError> {
    let mut current_run: Option<String> = None;

    for line in content.lines() {
        let tokens: Vec<&str> = line.split_whitespace().collect();
        if tokens.len() < 2 {
            continue;
        }
        match tokens[0] {
            "runid" => {
                current_run = Some(value_token(&tokens, line, "runid")?.to_string());
            }
            "ndcg" => {
                let score = value_token(&tokens, line, "ndcg")?;
                let run = current_run.clone().ok_or_else(|| ReportError::MissingRunId {
                    line: line.to_string(),
                })?;
                targets.insert(run, score.to_string());
            }
            _ => {}
        }
    }

    Ok(())
}

fn value_token<'a>(tokens: &[&'a str], line: &str, keyword: &str) -> Result<&'a str, ReportError> {
    tokens
        .get(2)
        .copied()
        .ok_or_else(|| ReportError::MalformedRecord {
            keyword: keyword.to_string(),
            line: line.to_string(),
        })
}

/// Harvests targets from every regular file directly under `dir`, in path
/// order so repeated run ids resolve deterministically.
pub fn harvest_targets(dir: &Path) -> Result<HashMap<String, String>, ReportError> {
    let mut paths: Vec<_> = fs::read_dir(dir)?
        .collect::<Result<Vec<_>, _>>()?
        .into_iter()
        .map(|entry| entry.path())
        .filter(|path| path.is_file())
        .collect();
    paths.sort();

    let mut targets = HashMap::new();
    for path in paths {
        debug!("Scanning report file '{}'", path.display());
        let content = fs::read_to_string(&path)?;
        scan_report(&content, &mut targets)?;
    }

    Ok(targets)
}

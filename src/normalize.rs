//! Conversion of Effective T3's semicolon output into a Galaxy tabular file

use std::borrow::Cow;
use std::fmt;
use std::fs::{self, File};
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};

pub const TABULAR_HEADER: &str = "#ID\tDescription\tScore\tEffective\n";

/// Column header line Effective T3 writes at the top of its output
const RAW_HEADER: &str = "Id; Description; Score;";

#[derive(Error, Debug)]
pub enum LineError {
    #[error("Expected at least three semi-colons in line:\n{0}\n")]
    TooFewSeparators(String),

    #[error("Problem parsing line:\n{0}\n")]
    Unsplittable(String),

    #[error("Problem parsing score {score:?} in line:\n{line}\n")]
    InvalidScore { score: String, line: String },
}

#[derive(Error, Debug)]
pub enum NormalizeError {
    #[error(transparent)]
    Line(#[from] LineError),

    #[error("Could not read Effective T3 output {}: {source}", .path.display())]
    Open { path: PathBuf, source: io::Error },

    #[error("Could not write {}: {source}", .path.display())]
    Create { path: PathBuf, source: io::Error },

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("All your sequences gave an error code")]
    AllSequencesErrored,
}

/// One prediction, fields already trimmed
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub id: String,
    pub description: String,
    /// Score exactly as the tool printed it
    pub score: String,
    pub effective: String,
    pub score_value: f64,
}

impl Record {
    pub fn is_effective(&self) -> bool {
        self.effective.eq_ignore_ascii_case("true")
    }

    /// Effective T3 reports a negative score when it could not score a sequence
    pub fn is_error_signal(&self) -> bool {
        self.score_value < 0.0
    }

    pub fn to_tabular(&self) -> String {
        format!(
            "{}\t{}\t{}\t{}\n",
            self.id, self.description, self.score, self.effective
        )
    }
}

/// Parse one raw output line, returning `None` for blank, comment and header lines
pub fn parse_line(line: &str) -> Result<Option<Record>, LineError> {
    let line = line.trim_end_matches(['\r', '\n']);

    if line.is_empty() || line.starts_with('#') || line.starts_with(RAW_HEADER) {
        return Ok(None);
    }

    if line.matches(';').count() < 3 {
        return Err(LineError::TooFewSeparators(line.to_string()));
    }

    // The FASTA id or description may itself contain semi-colons, so only the
    // last two separators are trusted
    let mut fields = line.rsplitn(3, ';');
    let (Some(effective), Some(score), Some(head)) = (fields.next(), fields.next(), fields.next())
    else {
        return Err(LineError::Unsplittable(line.to_string()));
    };

    let (id, description) =
        split_head(head).ok_or_else(|| LineError::Unsplittable(line.to_string()))?;

    let score = score.trim();
    let score_value = score.parse::<f64>().map_err(|_| LineError::InvalidScore {
        score: score.to_string(),
        line: line.to_string(),
    })?;

    Ok(Some(Record {
        id: id.trim().to_string(),
        description: description.trim().to_string(),
        score: score.to_string(),
        effective: effective.trim().to_string(),
        score_value,
    }))
}

/// Split `id; description`, or `id;` when the FASTA record had no description
fn split_head(head: &str) -> Option<(&str, &str)> {
    if !head.contains("; ") {
        if let Some(id) = head.strip_suffix(';') {
            return Some((id, ""));
        }
    }

    head.split_once("; ")
}

/// Counts gathered while normalizing
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Summary {
    pub count: usize,
    pub positive: usize,
    pub errors: usize,
}

impl Summary {
    fn record(&mut self, record: &Record) {
        self.count += 1;
        if record.is_effective() {
            self.positive += 1;
        }
        if record.is_error_signal() {
            self.errors += 1;
        }
    }

    /// Fails when there was output but every sequence came back with an error score
    pub fn check(&self) -> Result<(), NormalizeError> {
        if self.count > 0 && self.count == self.errors {
            return Err(NormalizeError::AllSequencesErrored);
        }
        Ok(())
    }
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.errors > 0 {
            write!(
                f,
                "{} sequences, {} positive, {} errors",
                self.count, self.positive, self.errors
            )
        } else {
            write!(f, "{}/{} sequences positive", self.positive, self.count)
        }
    }
}

/// Stream raw lines into tabular rows, header first.
///
/// Lines that are not valid UTF-8 (e.g. Latin-1 FASTA descriptions) are
/// decoded lossily rather than rejected.
pub fn normalize<R: BufRead, W: Write>(
    mut reader: R,
    mut writer: W,
) -> Result<Summary, NormalizeError> {
    writer.write_all(TABULAR_HEADER.as_bytes())?;

    let mut summary = Summary::default();
    let mut buf = Vec::new();
    let mut line_number = 0usize;
    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf)? == 0 {
            break;
        }
        line_number += 1;

        let line = String::from_utf8_lossy(&buf);
        if let Cow::Owned(_) = line {
            warn!(line = line_number, "replaced invalid UTF-8 in Effective T3 output");
        }

        let Some(record) = parse_line(&line)? else {
            continue;
        };

        if record.is_error_signal() {
            debug!(id = %record.id, score = %record.score, "sequence reported an error score");
        }

        writer.write_all(record.to_tabular().as_bytes())?;
        summary.record(&record);
    }

    writer.flush()?;
    Ok(summary)
}

/// Normalize the raw file into `output`, then remove the raw file.
///
/// The raw file is left behind if normalization fails.
pub fn normalize_file(raw: &Path, output: &Path) -> Result<Summary, NormalizeError> {
    let reader = File::open(raw).map_err(|source| NormalizeError::Open {
        path: raw.to_path_buf(),
        source,
    })?;
    let writer = File::create(output).map_err(|source| NormalizeError::Create {
        path: output.to_path_buf(),
        source,
    })?;

    let summary = normalize(BufReader::new(reader), BufWriter::new(writer))?;

    if let Err(e) = fs::remove_file(raw) {
        warn!(path = %raw.display(), error = %e, "could not remove raw output");
    }

    Ok(summary)
}

//! Invocation request parsing and validation

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use thiserror::Error;

const CUTOFF_PREFIX: &str = "cutoff=";

#[derive(Error, Debug)]
pub enum RequestError {
    #[error("Input FASTA file not found: {}", .0.display())]
    InputNotFound(PathBuf),

    #[error("Threshold should be selective, sensitive, or cutoff=..., not {0:?}")]
    InvalidThreshold(String),
}

/// Sensitivity setting passed through to Effective T3 via `-t`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Threshold {
    Selective,
    Sensitive,
    /// Explicit cutoff; holds the text after `cutoff=` verbatim
    Cutoff(String),
}

impl FromStr for Threshold {
    type Err = RequestError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "selective" => Ok(Self::Selective),
            "sensitive" => Ok(Self::Sensitive),
            _ => match s.strip_prefix(CUTOFF_PREFIX) {
                Some(value) => Ok(Self::Cutoff(value.to_string())),
                None => Err(RequestError::InvalidThreshold(s.to_string())),
            },
        }
    }
}

impl fmt::Display for Threshold {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Selective => f.write_str("selective"),
            Self::Sensitive => f.write_str("sensitive"),
            Self::Cutoff(value) => write!(f, "{CUTOFF_PREFIX}{value}"),
        }
    }
}

/// A validated request to run one prediction
#[derive(Debug, Clone)]
pub struct InvocationRequest {
    pub model: String,
    pub threshold: Threshold,
    pub input: PathBuf,
    pub output: PathBuf,
}

impl InvocationRequest {
    /// Validate raw positional arguments.
    ///
    /// The input file is checked before the threshold so a missing FASTA is
    /// reported first.
    pub fn new(
        model: String,
        threshold: &str,
        input: PathBuf,
        output: PathBuf,
    ) -> Result<Self, RequestError> {
        if !input.is_file() {
            return Err(RequestError::InputNotFound(input));
        }

        let threshold = threshold.parse()?;

        Ok(Self {
            model,
            threshold,
            input,
            output,
        })
    }

    /// Where Effective T3 writes its raw output, next to the final table
    pub fn temp_output(&self) -> PathBuf {
        let mut path = self.output.clone().into_os_string();
        path.push(".tmp");
        PathBuf::from(path)
    }
}

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::SegmentError;

/// Which numerical execution engine performs the matrix products.
///
/// - `Sequential` — plain nested loops on the calling thread.
/// - `Parallel`   — output rows computed concurrently on the rayon pool.
///
/// Both produce the same values; only the scheduling differs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Backend {
    #[default]
    Sequential,
    Parallel,
}

impl FromStr for Backend {
    type Err = SegmentError;

    fn from_str(s: &str) -> Result<Backend, SegmentError> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sequential" | "cpu" => Ok(Backend::Sequential),
            "parallel" | "rayon" => Ok(Backend::Parallel),
            other => Err(SegmentError::InvalidOptions(format!("unknown backend '{other}'"))),
        }
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Backend::Sequential => write!(f, "sequential"),
            Backend::Parallel => write!(f, "parallel"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_names_and_aliases() {
        assert_eq!("parallel".parse::<Backend>().unwrap(), Backend::Parallel);
        assert_eq!(" CPU ".parse::<Backend>().unwrap(), Backend::Sequential);
        assert!("gpu".parse::<Backend>().is_err());
    }
}

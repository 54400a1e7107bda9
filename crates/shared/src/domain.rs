use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Separator used when a vector is rendered back into its textual form.
pub const VECTOR_SEPARATOR: &str = ", ";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortAlgorithm {
    DirectInsertion,
    DirectSelection,
    Bubble,
    Shaker,
    Shell,
    Heap,
    #[default]
    Quick,
}

impl SortAlgorithm {
    pub const ALL: [SortAlgorithm; 7] = [
        SortAlgorithm::DirectInsertion,
        SortAlgorithm::DirectSelection,
        SortAlgorithm::Bubble,
        SortAlgorithm::Shaker,
        SortAlgorithm::Shell,
        SortAlgorithm::Heap,
        SortAlgorithm::Quick,
    ];

    /// Route segment the sorting service expects under `/api/sort/`.
    pub fn path_segment(self) -> &'static str {
        match self {
            SortAlgorithm::DirectInsertion => "insersao",
            SortAlgorithm::DirectSelection => "selecao",
            SortAlgorithm::Bubble => "bubble",
            SortAlgorithm::Shaker => "shaker",
            SortAlgorithm::Shell => "shell",
            SortAlgorithm::Heap => "heap",
            SortAlgorithm::Quick => "quick",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            SortAlgorithm::DirectInsertion => "direct-insertion",
            SortAlgorithm::DirectSelection => "direct-selection",
            SortAlgorithm::Bubble => "bubble",
            SortAlgorithm::Shaker => "shaker",
            SortAlgorithm::Shell => "shell",
            SortAlgorithm::Heap => "heap",
            SortAlgorithm::Quick => "quick",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            SortAlgorithm::DirectInsertion => "Direct Insertion",
            SortAlgorithm::DirectSelection => "Direct Selection",
            SortAlgorithm::Bubble => "Bubble Sort",
            SortAlgorithm::Shaker => "Shaker Sort",
            SortAlgorithm::Shell => "Shell Sort",
            SortAlgorithm::Heap => "Heap Sort",
            SortAlgorithm::Quick => "Quick Sort",
        }
    }
}

impl fmt::Display for SortAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown sort algorithm '{0}'")]
pub struct UnknownAlgorithm(pub String);

impl FromStr for SortAlgorithm {
    type Err = UnknownAlgorithm;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let needle = raw.trim();
        SortAlgorithm::ALL
            .into_iter()
            .find(|algorithm| {
                needle.eq_ignore_ascii_case(algorithm.name())
                    || needle.eq_ignore_ascii_case(algorithm.path_segment())
                    || needle.eq_ignore_ascii_case(algorithm.label())
            })
            .ok_or_else(|| UnknownAlgorithm(needle.to_string()))
    }
}

/// Parses the comma separated vector text. Tokens without a leading integer
/// are dropped; trailing characters after the digits are ignored.
pub fn parse_vector(text: &str) -> Vec<i64> {
    text.split(',').filter_map(parse_leading_integer).collect()
}

pub fn format_vector(values: &[i64]) -> String {
    values
        .iter()
        .map(i64::to_string)
        .collect::<Vec<_>>()
        .join(VECTOR_SEPARATOR)
}

fn parse_leading_integer(token: &str) -> Option<i64> {
    let token = token.trim();
    let unsigned = token
        .strip_prefix(|c: char| c == '-' || c == '+')
        .unwrap_or(token);
    let digits = unsigned
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(unsigned.len());
    if digits == 0 {
        return None;
    }
    let sign_len = token.len() - unsigned.len();
    token[..sign_len + digits].parse::<i64>().ok()
}

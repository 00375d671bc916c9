//! Output reconciliation policy.

use std::{collections::BTreeSet, fmt, str::FromStr};

/// How the variant output directory is cleaned before compiling.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ReconcilePolicy {
    /// Delete the whole tree and recreate it empty.
    #[default]
    FullWipe,

    /// Delete every direct child whose extension is not in the set.
    ///
    /// Extensions are stored lowercase without the leading dot.
    SelectivePreserve(BTreeSet<String>),
}

impl ReconcilePolicy {
    /// Builds a preserve policy from extensions like `json` or `.JSON`.
    pub fn preserve<I, S>(extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::SelectivePreserve(
            extensions
                .into_iter()
                .map(|e| e.as_ref().trim().trim_start_matches('.').to_ascii_lowercase())
                .filter(|e| !e.is_empty())
                .collect(),
        )
    }
}

impl FromStr for ReconcilePolicy {
    type Err = String;

    /// Accepts `full-wipe` or `preserve:ext[,ext...]`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("full-wipe") {
            return Ok(Self::FullWipe);
        }
        if let Some(list) = s.strip_prefix("preserve:") {
            let policy = Self::preserve(list.split(','));
            if let Self::SelectivePreserve(set) = &policy
                && set.is_empty()
            {
                return Err("preserve policy needs at least one extension".to_string());
            }
            return Ok(policy);
        }
        Err(format!(
            "invalid policy '{s}': expected 'full-wipe' or 'preserve:<ext>[,<ext>...]'"
        ))
    }
}

impl fmt::Display for ReconcilePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FullWipe => write!(f, "full-wipe"),
            Self::SelectivePreserve(set) => {
                let list: Vec<&str> = set.iter().map(String::as_str).collect();
                write!(f, "preserve:{}", list.join(","))
            }
        }
    }
}

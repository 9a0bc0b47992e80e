//! Three-tier size ordering
//!
//! Canonical sizes first (by position in the configured sequence), then other
//! non-numeric labels lexically, then all-digit labels by numeric value.

use crate::config::DEFAULT_CANONICAL_SIZES;
use std::collections::HashMap;

/// Sort key for one size label. Variant order is tier order.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum SizeRank<'a> {
    Canonical(usize),
    Lexical(&'a str),
    /// `magnitude` is the digit count without leading zeros, so equal-length
    /// `digits` compare numerically as strings; `raw` breaks "4" vs "04" ties.
    Numeric {
        magnitude: usize,
        digits: &'a str,
        raw: &'a str,
    },
}

/// Non-empty and every character an ASCII digit
pub fn is_numeric_token(value: &str) -> bool {
    !value.is_empty() && value.bytes().all(|b| b.is_ascii_digit())
}

#[derive(Debug, Clone)]
pub struct SizeOrder {
    positions: HashMap<String, usize>,
}

impl Default for SizeOrder {
    fn default() -> Self {
        Self::new(DEFAULT_CANONICAL_SIZES.iter().copied())
    }
}

impl SizeOrder {
    /// Build from a canonical sequence; repeated entries keep their first position
    pub fn new<I, S>(canonical: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut positions = HashMap::new();
        for (idx, size) in canonical.into_iter().enumerate() {
            positions.entry(size.into()).or_insert(idx);
        }
        Self { positions }
    }

    /// Case-sensitive: "one size" is not "One size"
    pub fn rank<'a>(&self, size: &'a str) -> SizeRank<'a> {
        if let Some(&pos) = self.positions.get(size) {
            return SizeRank::Canonical(pos);
        }
        if is_numeric_token(size) {
            let digits = size.trim_start_matches('0');
            return SizeRank::Numeric {
                magnitude: digits.len(),
                digits,
                raw: size,
            };
        }
        SizeRank::Lexical(size)
    }

    pub fn sort(&self, sizes: &mut [String]) {
        sizes.sort_by(|a, b| self.rank(a).cmp(&self.rank(b)));
    }

    pub fn sorted<I, S>(&self, sizes: I) -> Vec<String>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut out: Vec<String> = sizes.into_iter().map(Into::into).collect();
        self.sort(&mut out);
        out
    }
}

//! Fixed-point answers and learner input parsing
//!
//! Every correct answer is stored in hundredths so comparison never depends
//! on floating-point error. Learner input is parsed straight into the same
//! representation; digits past the hundredths place round half away from zero.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Why a raw answer was not graded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RejectReason {
    Empty,
    NotANumber,
}

/// How close a submitted answer must be to count as correct
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tolerance {
    Exact,
    /// Maximum absolute difference, in hundredths
    Within(u32),
}

/// A numeric answer in hundredths
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Answer {
    hundredths: i64,
}

impl Answer {
    pub const fn whole(value: i64) -> Self {
        Self { hundredths: value * 100 }
    }

    pub const fn from_hundredths(hundredths: i64) -> Self {
        Self { hundredths }
    }

    pub fn hundredths(self) -> i64 {
        self.hundredths
    }

    pub fn is_whole(self) -> bool {
        self.hundredths % 100 == 0
    }

    /// Whether `submitted` is accepted against this correct answer
    pub fn accepts(self, submitted: Answer, tolerance: Tolerance) -> bool {
        match tolerance {
            Tolerance::Exact => self == submitted,
            Tolerance::Within(max) => self.hundredths.abs_diff(submitted.hundredths) <= u64::from(max),
        }
    }

    /// Parse learner input such as `42`, `-3.5`, `$1,250.00` or `25%`
    pub fn parse(raw: &str) -> Result<Answer, RejectReason> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(RejectReason::Empty);
        }

        let (negative, rest) = match trimmed.as_bytes()[0] {
            b'-' => (true, &trimmed[1..]),
            b'+' => (false, &trimmed[1..]),
            _ => (false, trimmed),
        };
        let rest = rest.trim_start();
        let rest = rest.strip_prefix('$').unwrap_or(rest);
        let rest = rest.strip_suffix('%').unwrap_or(rest).trim_end();

        let (int_part, frac_part) = match rest.split_once('.') {
            Some((int_part, frac_part)) => (int_part, frac_part),
            None => (rest, ""),
        };
        if !rest.chars().any(|ch| ch.is_ascii_digit()) {
            return Err(RejectReason::NotANumber);
        }

        // Commas only as thousands separators: "1,250" but not "1,2" or ",5"
        if int_part.contains(',') {
            let mut groups = int_part.split(',');
            let lead = groups.next().unwrap_or_default();
            if lead.is_empty() || lead.len() > 3 || groups.any(|group| group.len() != 3) {
                return Err(RejectReason::NotANumber);
            }
        }

        let mut whole: i64 = 0;
        for ch in int_part.chars().filter(|&ch| ch != ',') {
            match ch {
                '0'..='9' => {
                    whole = whole
                        .checked_mul(10)
                        .and_then(|w| w.checked_add(i64::from(ch as u8 - b'0')))
                        .ok_or(RejectReason::NotANumber)?;
                }
                _ => return Err(RejectReason::NotANumber),
            }
        }

        let mut digits = frac_part.chars();
        let mut cents: i64 = 0;
        for _ in 0..2 {
            let digit = match digits.next() {
                Some(ch @ '0'..='9') => i64::from(ch as u8 - b'0'),
                Some(_) => return Err(RejectReason::NotANumber),
                None => 0,
            };
            cents = cents * 10 + digit;
        }
        let mut round_up = false;
        for (i, ch) in digits.enumerate() {
            match ch {
                '0'..='9' => {
                    if i == 0 {
                        round_up = ch >= '5';
                    }
                }
                _ => return Err(RejectReason::NotANumber),
            }
        }

        let magnitude = whole
            .checked_mul(100)
            .and_then(|h| h.checked_add(cents + i64::from(round_up)))
            .ok_or(RejectReason::NotANumber)?;

        Ok(Answer {
            hundredths: if negative { -magnitude } else { magnitude },
        })
    }
}

impl fmt::Display for Answer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.hundredths < 0 { "-" } else { "" };
        let abs = self.hundredths.unsigned_abs();
        let (whole, cents) = (abs / 100, abs % 100);
        match cents {
            0 => write!(f, "{}{}", sign, whole),
            c if c % 10 == 0 => write!(f, "{}{}.{}", sign, whole, c / 10),
            c => write!(f, "{}{}.{:02}", sign, whole, c),
        }
    }
}

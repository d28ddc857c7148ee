//! Challenge rating value object and fraction parsing
//!
//! Supports the rating strings found in bestiary data: "3", "1/4", "1 1/2".

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Error when parsing a challenge rating string
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChallengeRatingError {
    /// The rating string is empty
    #[error("Empty challenge rating")]
    Empty,
    /// The source marks the rating as unknown
    #[error("Challenge rating is marked unknown")]
    Unknown,
    /// Not a number, fraction, or mixed fraction
    #[error("Invalid challenge rating format: {0}")]
    InvalidFormat(String),
    /// Fraction with a zero denominator
    #[error("Zero denominator in challenge rating: {0}")]
    ZeroDenominator(String),
}

/// Parse a numeric or fractional rating string into a float.
///
/// Accepted forms:
/// - "3", "0.5" - plain numbers
/// - "1/4" - fraction
/// - "1 1/2" - whole part plus fraction; a negative whole part subtracts
///   the fraction ("-1 1/2" is -1.5)
pub fn parse_fraction(input: &str) -> Result<f64, ChallengeRatingError> {
    let input = input.trim();
    if input.is_empty() {
        return Err(ChallengeRatingError::Empty);
    }
    if input.eq_ignore_ascii_case("unknown") {
        return Err(ChallengeRatingError::Unknown);
    }

    if let Ok(value) = input.parse::<f64>() {
        if value.is_finite() {
            return Ok(value);
        }
        return Err(ChallengeRatingError::InvalidFormat(input.to_string()));
    }

    let invalid = || ChallengeRatingError::InvalidFormat(input.to_string());

    let (head, denom_str) = input.split_once('/').ok_or_else(invalid)?;
    let parts: Vec<&str> = head.split_whitespace().collect();
    let (whole, num_str) = match parts.as_slice() {
        [num] => (0.0, *num),
        [whole, num] => (whole.parse::<f64>().map_err(|_| invalid())?, *num),
        _ => return Err(invalid()),
    };

    let num: f64 = num_str.parse().map_err(|_| invalid())?;
    let denom: f64 = denom_str.trim().parse().map_err(|_| invalid())?;
    if denom == 0.0 {
        return Err(ChallengeRatingError::ZeroDenominator(input.to_string()));
    }

    let frac = num / denom;
    let value = if whole < 0.0 { whole - frac } else { whole + frac };
    if value.is_finite() {
        Ok(value)
    } else {
        Err(invalid())
    }
}

/// A creature's challenge rating, with the optional lair and coven ratings
/// some creatures carry alongside it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChallengeRating {
    monster: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    lair: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    coven: Option<f64>,
}

impl ChallengeRating {
    pub fn new(monster: f64) -> Self {
        Self {
            monster,
            lair: None,
            coven: None,
        }
    }

    /// Parse a bare rating string.
    pub fn parse(input: &str) -> Result<Self, ChallengeRatingError> {
        parse_fraction(input).map(Self::new)
    }

    pub fn with_lair(self, lair: f64) -> Self {
        Self {
            lair: Some(lair),
            ..self
        }
    }

    pub fn with_coven(self, coven: f64) -> Self {
        Self {
            coven: Some(coven),
            ..self
        }
    }

    pub fn monster(&self) -> f64 {
        self.monster
    }

    /// Rating when encountered in its lair, if different.
    pub fn lair(&self) -> Option<f64> {
        self.lair
    }

    pub fn coven(&self) -> Option<f64> {
        self.coven
    }
}

impl fmt::Display for ChallengeRating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.monster {
            v if v == 0.125 => write!(f, "1/8")?,
            v if v == 0.25 => write!(f, "1/4")?,
            v if v == 0.5 => write!(f, "1/2")?,
            v => write!(f, "{}", v)?,
        }
        if let Some(lair) = self.lair {
            write!(f, " ({} in lair)", lair)?;
        }
        Ok(())
    }
}

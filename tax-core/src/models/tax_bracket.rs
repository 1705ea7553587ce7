use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One band of a progressive rate schedule.
///
/// The lower limit is implied by the previous bracket's upper limit (or zero
/// for the first bracket).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxBracket {
    /// Inclusive upper bound, `None` for the top bracket.
    pub upper_limit: Option<Decimal>,
    pub rate: Decimal,
}

impl TaxBracket {
    pub fn bounded(
        upper_limit: Decimal,
        rate: Decimal,
    ) -> Self {
        Self {
            upper_limit: Some(upper_limit),
            rate,
        }
    }

    pub fn unbounded(rate: Decimal) -> Self {
        Self {
            upper_limit: None,
            rate,
        }
    }

    pub fn is_unbounded(&self) -> bool {
        self.upper_limit.is_none()
    }
}

/// Errors raised when a bracket table violates the schedule invariants.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BracketTableError {
    #[error("bracket table is empty")]
    Empty,

    #[error("bracket {index} has rate {rate}, expected a value in [0, 1)")]
    InvalidRate { index: usize, rate: Decimal },

    #[error("bracket {index} upper limit {upper} does not exceed the previous limit {previous}")]
    NotAscending {
        index: usize,
        upper: Decimal,
        previous: Decimal,
    },

    #[error("bracket {index} rate {rate} is lower than the previous rate {previous}")]
    DecreasingRate {
        index: usize,
        rate: Decimal,
        previous: Decimal,
    },

    #[error("bracket {index} is unbounded but is not the last bracket")]
    UnboundedNotLast { index: usize },

    #[error("the last bracket must have no upper limit")]
    MissingUnboundedBracket,
}

/// A validated, ascending progressive rate schedule.
///
/// Construction through [`TaxBracketTable::new`] (or deserialization) checks
/// that the brackets are contiguous from zero, strictly ascending, have
/// non-decreasing rates in `[0, 1)`, and end in exactly one unbounded bracket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<TaxBracket>", into = "Vec<TaxBracket>")]
pub struct TaxBracketTable {
    brackets: Vec<TaxBracket>,
}

impl TaxBracketTable {
    /// Validates `brackets` and wraps them in a table.
    ///
    /// # Errors
    ///
    /// Returns [`BracketTableError`] describing the first invariant violated.
    pub fn new(brackets: Vec<TaxBracket>) -> Result<Self, BracketTableError> {
        if brackets.is_empty() {
            return Err(BracketTableError::Empty);
        }

        let last_index = brackets.len() - 1;
        let mut previous_limit = Decimal::ZERO;
        let mut previous_rate = Decimal::ZERO;

        for (index, bracket) in brackets.iter().enumerate() {
            if bracket.rate < Decimal::ZERO || bracket.rate >= Decimal::ONE {
                return Err(BracketTableError::InvalidRate {
                    index,
                    rate: bracket.rate,
                });
            }
            if bracket.rate < previous_rate {
                return Err(BracketTableError::DecreasingRate {
                    index,
                    rate: bracket.rate,
                    previous: previous_rate,
                });
            }
            previous_rate = bracket.rate;

            match bracket.upper_limit {
                Some(upper) => {
                    if upper <= previous_limit {
                        return Err(BracketTableError::NotAscending {
                            index,
                            upper,
                            previous: previous_limit,
                        });
                    }
                    previous_limit = upper;
                }
                None if index != last_index => {
                    return Err(BracketTableError::UnboundedNotLast { index });
                }
                None => {}
            }
        }

        if !brackets[last_index].is_unbounded() {
            return Err(BracketTableError::MissingUnboundedBracket);
        }

        Ok(Self { brackets })
    }

    /// The 2024/2025 Thai personal income tax schedule.
    pub fn thai_2025() -> Self {
        let bracket = |upper: i64, rate_percent: i64| {
            TaxBracket::bounded(Decimal::from(upper), Decimal::new(rate_percent, 2))
        };

        Self {
            brackets: vec![
                bracket(150_000, 0),
                bracket(300_000, 5),
                bracket(500_000, 10),
                bracket(750_000, 15),
                bracket(1_000_000, 20),
                bracket(2_000_000, 25),
                bracket(5_000_000, 30),
                TaxBracket::unbounded(Decimal::new(35, 2)),
            ],
        }
    }

    pub fn brackets(&self) -> &[TaxBracket] {
        &self.brackets
    }

    pub fn len(&self) -> usize {
        self.brackets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.brackets.is_empty()
    }

    /// Iterates brackets in ascending order together with their implied
    /// lower limit.
    pub fn iter_with_lower_limits(&self) -> impl Iterator<Item = (Decimal, &TaxBracket)> {
        let mut lower = Decimal::ZERO;
        self.brackets.iter().map(move |bracket| {
            let current = lower;
            if let Some(upper) = bracket.upper_limit {
                lower = upper;
            }
            (current, bracket)
        })
    }
}

impl Default for TaxBracketTable {
    fn default() -> Self {
        Self::thai_2025()
    }
}

impl TryFrom<Vec<TaxBracket>> for TaxBracketTable {
    type Error = BracketTableError;

    fn try_from(brackets: Vec<TaxBracket>) -> Result<Self, Self::Error> {
        Self::new(brackets)
    }
}

impl From<TaxBracketTable> for Vec<TaxBracket> {
    fn from(table: TaxBracketTable) -> Self {
        table.brackets
    }
}

//! Rate tables supplied as configuration: progressive brackets, VAT and social rates.

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
/// One slice of a progressive schedule. `upper_bound == None` marks the open-ended top bracket.
pub struct TaxBracket {
    pub upper_bound: Option<Decimal>,
    pub rate: Decimal,
}

impl TaxBracket {
    pub fn bounded(upper_bound: Decimal, rate: Decimal) -> Self {
        Self {
            upper_bound: Some(upper_bound),
            rate,
        }
    }

    pub fn unbounded(rate: Decimal) -> Self {
        Self {
            upper_bound: None,
            rate,
        }
    }
}

/// Validated, ascending bracket schedule ending with exactly one unbounded bracket.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(try_from = "Vec<TaxBracket>", into = "Vec<TaxBracket>")]
pub struct BracketTable {
    brackets: Vec<TaxBracket>,
}

impl BracketTable {
    pub fn new(brackets: Vec<TaxBracket>) -> Result<Self, BracketTableError> {
        if brackets.is_empty() {
            return Err(BracketTableError::Empty);
        }
        let last_index = brackets.len() - 1;
        let mut previous: Option<Decimal> = None;
        for (index, bracket) in brackets.iter().enumerate() {
            if bracket.rate < Decimal::ZERO {
                return Err(BracketTableError::NegativeRate { index });
            }
            match bracket.upper_bound {
                None if index != last_index => {
                    return Err(BracketTableError::UnboundedNotLast { index });
                }
                None => {}
                Some(_) if index == last_index => {
                    return Err(BracketTableError::MissingUnbounded);
                }
                Some(bound) => {
                    if bound <= Decimal::ZERO {
                        return Err(BracketTableError::NonPositiveBound { index });
                    }
                    if previous.is_some_and(|prev| bound <= prev) {
                        return Err(BracketTableError::Unsorted { index });
                    }
                    previous = Some(bound);
                }
            }
        }
        Ok(Self { brackets })
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

    /// Iterates `(lower_bound, upper_bound, rate)` triples in ascending order.
    pub fn segments(&self) -> impl Iterator<Item = (Decimal, Option<Decimal>, Decimal)> + '_ {
        let mut lower = Decimal::ZERO;
        self.brackets.iter().map(move |bracket| {
            let segment = (lower, bracket.upper_bound, bracket.rate);
            if let Some(bound) = bracket.upper_bound {
                lower = bound;
            }
            segment
        })
    }
}

impl TryFrom<Vec<TaxBracket>> for BracketTable {
    type Error = BracketTableError;

    fn try_from(value: Vec<TaxBracket>) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<BracketTable> for Vec<TaxBracket> {
    fn from(value: BracketTable) -> Self {
        value.brackets
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Reasons a bracket schedule is rejected.
pub enum BracketTableError {
    Empty,
    NegativeRate { index: usize },
    NonPositiveBound { index: usize },
    Unsorted { index: usize },
    UnboundedNotLast { index: usize },
    MissingUnbounded,
}

impl fmt::Display for BracketTableError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BracketTableError::Empty => f.write_str("bracket table is empty"),
            BracketTableError::NegativeRate { index } => {
                write!(f, "bracket {index} has a negative rate")
            }
            BracketTableError::NonPositiveBound { index } => {
                write!(f, "bracket {index} has a non-positive upper bound")
            }
            BracketTableError::Unsorted { index } => {
                write!(f, "bracket {index} is not above the previous bound")
            }
            BracketTableError::UnboundedNotLast { index } => {
                write!(f, "bracket {index} is unbounded but not the last one")
            }
            BracketTableError::MissingUnbounded => {
                f.write_str("bracket table must end with an unbounded bracket")
            }
        }
    }
}

impl std::error::Error for BracketTableError {}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum VatRateClass {
    Normal,
    Reduced,
    SuperReduced,
    Exempt,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
/// VAT percentages per rate class.
pub struct VatRates {
    pub normal: Decimal,
    pub reduced: Decimal,
    pub super_reduced: Decimal,
    pub exempt: Decimal,
}

impl VatRates {
    pub fn rate_for(&self, class: VatRateClass) -> Decimal {
        match class {
            VatRateClass::Normal => self.normal,
            VatRateClass::Reduced => self.reduced,
            VatRateClass::SuperReduced => self.super_reduced,
            VatRateClass::Exempt => self.exempt,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (VatRateClass, Decimal)> {
        [
            (VatRateClass::Normal, self.normal),
            (VatRateClass::Reduced, self.reduced),
            (VatRateClass::SuperReduced, self.super_reduced),
            (VatRateClass::Exempt, self.exempt),
        ]
        .into_iter()
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
/// Employee and employer social contribution percentages.
pub struct SocialRates {
    pub employee: Decimal,
    pub employer: Decimal,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn sample() -> Vec<TaxBracket> {
        vec![
            TaxBracket::bounded(dec!(5000), dec!(0)),
            TaxBracket::bounded(dec!(20000), dec!(26)),
            TaxBracket::unbounded(dec!(28)),
        ]
    }

    #[test]
    fn accepts_sorted_table_with_open_top() {
        let table = BracketTable::new(sample()).unwrap();
        let segments: Vec<_> = table.segments().collect();
        assert_eq!(segments[0], (dec!(0), Some(dec!(5000)), dec!(0)));
        assert_eq!(segments[1], (dec!(5000), Some(dec!(20000)), dec!(26)));
        assert_eq!(segments[2], (dec!(20000), None, dec!(28)));
    }

    #[test]
    fn rejects_malformed_tables() {
        assert_eq!(BracketTable::new(vec![]), Err(BracketTableError::Empty));

        let mut unsorted = sample();
        unsorted.swap(0, 1);
        assert_eq!(
            BracketTable::new(unsorted),
            Err(BracketTableError::Unsorted { index: 1 })
        );

        let closed = vec![TaxBracket::bounded(dec!(1000), dec!(10))];
        assert_eq!(
            BracketTable::new(closed),
            Err(BracketTableError::MissingUnbounded)
        );

        let open_middle = vec![
            TaxBracket::unbounded(dec!(10)),
            TaxBracket::unbounded(dec!(20)),
        ];
        assert_eq!(
            BracketTable::new(open_middle),
            Err(BracketTableError::UnboundedNotLast { index: 0 })
        );

        let negative = vec![TaxBracket::unbounded(dec!(-1))];
        assert_eq!(
            BracketTable::new(negative),
            Err(BracketTableError::NegativeRate { index: 0 })
        );
    }

    #[test]
    fn deserialization_validates_table() {
        let ok: BracketTable =
            serde_json::from_str(r#"[{"upper_bound":"100","rate":"0"},{"upper_bound":null,"rate":"10"}]"#)
                .unwrap();
        assert_eq!(ok.len(), 2);

        let err = serde_json::from_str::<BracketTable>(r#"[{"upper_bound":"100","rate":"10"}]"#);
        assert!(err.is_err());
    }

    #[test]
    fn vat_rate_lookup_by_class() {
        let rates = VatRates {
            normal: dec!(19),
            reduced: dec!(9),
            super_reduced: dec!(5),
            exempt: dec!(0),
        };
        assert_eq!(rates.rate_for(VatRateClass::Reduced), dec!(9));
        assert_eq!(rates.iter().count(), 4);
    }
}

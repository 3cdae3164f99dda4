use crate::record::{RawRateRecord, SaleRate};
use std::{collections::HashSet, fmt};

/// Currency codes a batch should keep, upper-cased.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CurrencySet(HashSet<String>);

impl CurrencySet {
    pub fn new<I, S>(codes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self(
            codes
                .into_iter()
                .map(|code| code.as_ref().trim().to_ascii_uppercase())
                .filter(|code| !code.is_empty())
                .collect(),
        )
    }

    pub fn contains(&self, code: &str) -> bool {
        self.0.contains(code)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Rates of one API date, currencies in the order the API listed them.
#[derive(Clone, Debug, PartialEq)]
pub struct DayRates {
    pub date: String,
    pub rates: Vec<(String, SaleRate)>,
}

impl DayRates {
    pub fn get(&self, currency: &str) -> Option<&SaleRate> {
        self.rates
            .iter()
            .find_map(|(code, rate)| (code == currency).then_some(rate))
    }
}

/// Date-keyed projection of a batch. Keys keep insertion order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AggregatedRates(Vec<DayRates>);

impl AggregatedRates {
    pub fn get(&self, date: &str) -> Option<&DayRates> {
        self.0.iter().find(|day| day.date == date)
    }

    pub fn iter(&self) -> impl Iterator<Item = &DayRates> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    fn insert(&mut self, day: DayRates) {
        match self.0.iter_mut().find(|existing| existing.date == day.date) {
            Some(existing) => existing.rates = day.rates,
            None => self.0.push(day),
        }
    }
}

impl<'a> IntoIterator for &'a AggregatedRates {
    type Item = &'a DayRates;
    type IntoIter = std::slice::Iter<'a, DayRates>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl fmt::Display for AggregatedRates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for day in &self.0 {
            if !first {
                writeln!(f)?;
            }
            first = false;
            write!(f, "Rates on {}:", day.date)?;
            for (currency, rate) in &day.rates {
                write!(f, "\n{currency}: {rate}")?;
            }
        }
        Ok(())
    }
}

/// Keeps the `wanted` currencies of every present record, keyed by the
/// record's own date string. Absent records are skipped.
pub fn project<I>(records: I, wanted: &CurrencySet) -> AggregatedRates
where
    I: IntoIterator<Item = Option<RawRateRecord>>,
{
    let mut aggregated = AggregatedRates::default();
    for record in records.into_iter().flatten() {
        let rates = record
            .exchange_rate
            .into_iter()
            .filter_map(|entry| match (entry.currency, entry.sale_rate) {
                (Some(currency), Some(rate)) if wanted.contains(&currency) => {
                    Some((currency, rate))
                }
                (Some(currency), None) if wanted.contains(&currency) => {
                    tracing::debug!("{} has no sale rate for {currency}", record.date);
                    None
                }
                _ => None,
            })
            .collect();
        aggregated.insert(DayRates {
            date: record.date,
            rates,
        });
    }
    aggregated
}

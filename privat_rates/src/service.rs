use crate::{
    aggregate::{project, AggregatedRates, CurrencySet},
    client::RateSource,
    date::DateKey,
};
use chrono::NaiveDate;
use futures::future::join_all;
use std::sync::Arc;

/// Fans out one fetch per date, waits for all of them and projects the
/// configured currencies out of whatever succeeded.
#[derive(Debug)]
pub struct RateFetchService<S> {
    source: Arc<S>,
    currencies: CurrencySet,
}

impl<S> RateFetchService<S>
where
    S: RateSource + 'static,
{
    pub fn new(source: S, currencies: CurrencySet) -> Self {
        Self {
            source: Arc::new(source),
            currencies,
        }
    }

    pub fn currencies(&self) -> &CurrencySet {
        &self.currencies
    }

    /// Callers are responsible for keeping `days` within `1..=MAX_DAYS`.
    pub async fn fetch_last_days(&self, days: u32) -> AggregatedRates {
        self.fetch_last_days_from(DateKey::today().date(), days)
            .await
    }

    pub async fn fetch_last_days_from(&self, today: NaiveDate, days: u32) -> AggregatedRates {
        let handles = DateKey::last_days(today, days)
            .into_iter()
            .map(|date| {
                let source = Arc::clone(&self.source);
                tokio::spawn(async move { source.fetch_one(date).await })
            })
            .collect::<Vec<_>>();

        let records = join_all(handles)
            .await
            .into_iter()
            .map(|joined| {
                joined.unwrap_or_else(|e| {
                    tracing::error!("Rate fetch task failed: {e}");
                    None
                })
            })
            .collect::<Vec<_>>();

        tracing::info!(
            "Fetched {}/{days} days of rates",
            records.iter().filter(|record| record.is_some()).count()
        );
        project(records, &self.currencies)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::record::{RateEntry, RawRateRecord, SaleRate};
    use async_trait::async_trait;
    use std::{
        collections::HashSet,
        sync::{
            atomic::{AtomicUsize, Ordering},
            Mutex,
        },
        time::Duration,
    };
    use tokio::sync::Barrier;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 3).unwrap()
    }

    fn record_for(date: DateKey) -> RawRateRecord {
        RawRateRecord {
            date: date.to_string(),
            bank: None,
            base_currency: None,
            base_currency_lit: None,
            exchange_rate: ["USD", "EUR", "GBP"]
                .into_iter()
                .map(|code| RateEntry {
                    currency: Some(code.to_string()),
                    sale_rate: SaleRate::from_f64(40.0),
                    ..Default::default()
                })
                .collect(),
        }
    }

    /// Answers every date, but only once all expected fetches are in flight.
    struct Rendezvous {
        barrier: Barrier,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl RateSource for Rendezvous {
        async fn fetch_one(&self, date: DateKey) -> Option<RawRateRecord> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.barrier.wait().await;
            Some(record_for(date))
        }
    }

    /// Fails the listed dates.
    struct Flaky {
        failing: HashSet<String>,
        requested: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl RateSource for Flaky {
        async fn fetch_one(&self, date: DateKey) -> Option<RawRateRecord> {
            self.requested.lock().unwrap().push(date.to_string());
            if self.failing.contains(&date.to_string()) {
                None
            } else {
                Some(record_for(date))
            }
        }
    }

    struct Panicking;

    #[async_trait]
    impl RateSource for Panicking {
        async fn fetch_one(&self, date: DateKey) -> Option<RawRateRecord> {
            if date.to_string() == "02.06.2024" {
                panic!("boom");
            }
            Some(record_for(date))
        }
    }

    fn usd_eur() -> CurrencySet {
        CurrencySet::new(["USD", "EUR"])
    }

    #[tokio::test]
    async fn issues_every_fetch_concurrently() {
        for days in 1..=crate::MAX_DAYS {
            let service = RateFetchService::new(
                Rendezvous {
                    barrier: Barrier::new(days as usize),
                    calls: AtomicUsize::new(0),
                },
                usd_eur(),
            );
            let rates = tokio::time::timeout(
                Duration::from_secs(5),
                service.fetch_last_days_from(today(), days),
            )
            .await
            .expect("fetches were not issued concurrently");
            assert_eq!(days as usize, service.source.calls.load(Ordering::SeqCst));
            assert_eq!(days as usize, rates.len());
        }
    }

    #[tokio::test]
    async fn partial_failure_keeps_the_rest() {
        let service = RateFetchService::new(
            Flaky {
                failing: HashSet::from(["02.06.2024".to_string()]),
                requested: Mutex::default(),
            },
            usd_eur(),
        );
        let rates = service.fetch_last_days_from(today(), 3).await;

        let mut requested = service.source.requested.lock().unwrap().clone();
        requested.sort();
        assert_eq!(vec!["01.06.2024", "02.06.2024", "03.06.2024"], requested);

        let dates = rates.iter().map(|day| day.date.as_str()).collect::<Vec<_>>();
        assert_eq!(vec!["03.06.2024", "01.06.2024"], dates);
        for day in &rates {
            assert_eq!(None, day.get("GBP"));
            assert!(day.get("USD").is_some());
        }
    }

    #[tokio::test]
    async fn every_fetch_failing_is_empty() {
        let service = RateFetchService::new(
            Flaky {
                failing: ["03.06.2024", "02.06.2024"]
                    .into_iter()
                    .map(String::from)
                    .collect(),
                requested: Mutex::default(),
            },
            usd_eur(),
        );
        assert!(service.fetch_last_days_from(today(), 2).await.is_empty());
    }

    #[tokio::test]
    async fn panicking_fetch_counts_as_absent() {
        let service = RateFetchService::new(Panicking, usd_eur());
        let rates = service.fetch_last_days_from(today(), 3).await;
        assert_eq!(2, rates.len());
        assert!(rates.get("02.06.2024").is_none());
    }
}

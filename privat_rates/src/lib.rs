pub mod aggregate;
pub mod client;
pub mod date;
pub mod error;
pub mod record;
pub mod service;

pub use aggregate::{project, AggregatedRates, CurrencySet, DayRates};
pub use client::{RateClient, RateSource, DEFAULT_API_URL};
pub use date::DateKey;
pub use error::FetchError;
pub use record::{RateEntry, RawRateRecord, SaleRate};
pub use service::RateFetchService;

/// Upper bound for the number of days a single batch may cover.
pub const MAX_DAYS: u32 = 10;

use serde::Deserialize;

/// Sale rates are passed through exactly as the API reports them.
pub type SaleRate = serde_json::Number;

/// One archive response for a single date.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RawRateRecord {
    pub date: String,
    #[serde(default)]
    pub bank: Option<String>,
    #[serde(default)]
    pub base_currency: Option<u32>,
    #[serde(default)]
    pub base_currency_lit: Option<String>,
    pub exchange_rate: Vec<RateEntry>,
}

/// The archive omits `currency` and the commercial rates on some entries,
/// so nothing here is required.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RateEntry {
    #[serde(default)]
    pub base_currency: Option<String>,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default, rename = "saleRateNB")]
    pub sale_rate_nb: Option<serde_json::Number>,
    #[serde(default, rename = "purchaseRateNB")]
    pub purchase_rate_nb: Option<serde_json::Number>,
    #[serde(default)]
    pub sale_rate: Option<SaleRate>,
    #[serde(default)]
    pub purchase_rate: Option<serde_json::Number>,
}

impl RawRateRecord {
    pub fn from_slice(body: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(body)
    }
}

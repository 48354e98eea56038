//! Wire shapes for the bridge HTTP API.
//!
//! Response structs keep every field the harvester does not depend on
//! optional or defaulted, so shape drift in unrelated parts of a response
//! never fails a poll. The deposit `status` field is the one exception:
//! its absence is meaningful and handled explicitly by the poller.

use alloy::primitives::Address;
use serde::{Deserialize, Deserializer, Serialize};

/// Body of `POST /quote`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteRequest {
	pub user: String,
	pub origin_chain_id: u64,
	pub destination_chain_id: u64,
	pub origin_currency: String,
	pub destination_currency: String,
	pub recipient: String,
	pub trade_type: String,
	/// Wei, decimal string.
	pub amount: String,
	pub referrer: String,
	pub use_external_liquidity: bool,
	pub use_deposit_address: bool,
}

/// Response of `POST /quote`.
#[derive(Debug, Clone, Deserialize)]
pub struct QuoteResponse {
	#[serde(default)]
	pub steps: Vec<QuoteStep>,
}

/// One execution step of a quote.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteStep {
	#[serde(default)]
	pub request_id: Option<String>,
	#[serde(default)]
	pub items: Vec<StepItem>,
}

/// One transaction inside a step.
#[derive(Debug, Clone, Deserialize)]
pub struct StepItem {
	pub data: TxTemplate,
}

/// Transaction template the quote asks the caller to submit.
///
/// Fee caps and gas are advisory: when present they are used verbatim,
/// otherwise the caller prices the transaction locally.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TxTemplate {
	pub to: Address,
	/// 0x-prefixed calldata.
	pub data: String,
	/// Wei, decimal string.
	pub value: String,
	/// Chain the deposit must run on; checked against the quote's origin.
	#[serde(default)]
	pub chain_id: Option<u64>,
	/// Gas limit. The API serves this as a number or a decimal string.
	#[serde(default, deserialize_with = "numeric_or_text")]
	pub gas: Option<u64>,
	#[serde(default)]
	pub max_fee_per_gas: Option<String>,
	#[serde(default)]
	pub max_priority_fee_per_gas: Option<String>,
}

/// Response of `GET /intents/status`.
#[derive(Debug, Clone, Deserialize)]
pub struct DepositStatus {
	/// Absent on some malformed responses; see the poller for handling.
	#[serde(default)]
	pub status: Option<String>,
}

/// Response of `GET /requests/v2`.
#[derive(Debug, Clone, Deserialize)]
pub struct RequestsPage {
	#[serde(default)]
	pub requests: Vec<RequestEntry>,
}

/// One indexed transfer record.
#[derive(Debug, Clone, Deserialize)]
pub struct RequestEntry {
	#[serde(default)]
	pub data: Option<RequestData>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RequestData {
	#[serde(default)]
	pub metadata: Option<RequestMetadata>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestMetadata {
	#[serde(default)]
	pub currency_out: Option<CurrencyOut>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrencyOut {
	/// USD value of the bridged amount, served as a string or a number.
	#[serde(default, deserialize_with = "text_or_numeric")]
	pub amount_usd: Option<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrText {
	Number(u64),
	Text(String),
}

fn numeric_or_text<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
	D: Deserializer<'de>,
{
	match Option::<NumberOrText>::deserialize(deserializer)? {
		None => Ok(None),
		Some(NumberOrText::Number(n)) => Ok(Some(n)),
		Some(NumberOrText::Text(s)) => s.parse().map(Some).map_err(serde::de::Error::custom),
	}
}

#[derive(Deserialize)]
#[serde(untagged)]
enum TextOrNumber {
	Text(String),
	Number(f64),
}

fn text_or_numeric<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
	D: Deserializer<'de>,
{
	Ok(match Option::<TextOrNumber>::deserialize(deserializer)? {
		None => None,
		Some(TextOrNumber::Text(s)) => Some(s),
		Some(TextOrNumber::Number(n)) => Some(n.to_string()),
	})
}

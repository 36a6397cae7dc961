use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::errors::ValidationErrors;
use crate::domain::value_objects::price::Price;
use crate::domain::value_objects::quantity::Quantity;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Side {
    Buy,
    Sell,
}

impl Side {
    pub fn parse(value: &str) -> Result<Self, String> {
        match value {
            "BUY" => Ok(Side::Buy),
            "SELL" => Ok(Side::Sell),
            other => Err(format!("must be BUY or SELL, got '{}'", other)),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Side::Buy => "BUY",
            Side::Sell => "SELL",
        }
    }
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Price, quantity and direction of an execution, embedded in a Trade.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TradeDetails {
    pub buy_sell_indicator: Side,
    pub price: Price,
    pub quantity: Quantity,
}

/// A stored trade record. `id` is assigned by the store and never driven by
/// clients; `trade_id` is the externally visible identifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Trade {
    pub id: u64,
    pub trade_id: String,
    #[serde(default)]
    pub asset_class: Option<String>,
    #[serde(default)]
    pub counterparty: Option<String>,
    pub instrument_id: String,
    pub instrument_name: String,
    pub trade_date_time: NaiveDateTime,
    pub trade_details: TradeDetails,
    pub trader: String,
}

/// The validated contents of a trade, minus the store-assigned numeric id.
/// `trade_id` stays optional here: the store generates one when absent.
#[derive(Debug, Clone, PartialEq)]
pub struct TradeBody {
    pub trade_id: Option<String>,
    pub asset_class: Option<String>,
    pub counterparty: Option<String>,
    pub instrument_id: String,
    pub instrument_name: String,
    pub trade_date_time: NaiveDateTime,
    pub trade_details: TradeDetails,
    pub trader: String,
}

/// Raw inbound trade payload, before validation. Fields are loose so that
/// `validate` can report every violation at once instead of failing on the
/// first missing field.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TradeDraft {
    pub trade_id: Option<String>,
    pub asset_class: Option<String>,
    pub counterparty: Option<String>,
    pub instrument_id: Option<String>,
    pub instrument_name: Option<String>,
    pub trade_date_time: Option<String>,
    pub trade_details: Option<TradeDetailsDraft>,
    pub trader: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TradeDetailsDraft {
    pub buy_sell_indicator: Option<String>,
    pub price: Option<f64>,
    pub quantity: Option<i64>,
}

impl TradeDraft {
    /// Check every rule and return either the typed trade contents or the
    /// full list of field violations.
    pub fn validate(self) -> Result<TradeBody, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        let instrument_id = require_string(&mut errors, "instrumentId", self.instrument_id);
        let instrument_name = require_string(&mut errors, "instrumentName", self.instrument_name);
        let trader = require_string(&mut errors, "trader", self.trader);

        let trade_date_time = match self.trade_date_time {
            Some(raw) => match raw.parse::<NaiveDateTime>() {
                Ok(ts) => Some(ts),
                Err(_) => {
                    errors.push(
                        "tradeDateTime",
                        format!("'{}' is not a valid date-time", raw),
                    );
                    None
                }
            },
            None => {
                errors.push("tradeDateTime", "is required");
                None
            }
        };

        let trade_details = match self.trade_details {
            Some(details) => details.validate(&mut errors),
            None => {
                errors.push("tradeDetails", "is required");
                None
            }
        };

        match (
            instrument_id,
            instrument_name,
            trade_date_time,
            trade_details,
            trader,
        ) {
            (
                Some(instrument_id),
                Some(instrument_name),
                Some(trade_date_time),
                Some(trade_details),
                Some(trader),
            ) if errors.is_empty() => Ok(TradeBody {
                trade_id: self.trade_id,
                asset_class: self.asset_class,
                counterparty: self.counterparty,
                instrument_id,
                instrument_name,
                trade_date_time,
                trade_details,
                trader,
            }),
            _ => Err(errors),
        }
    }
}

impl TradeDetailsDraft {
    fn validate(self, errors: &mut ValidationErrors) -> Option<TradeDetails> {
        let side = match self.buy_sell_indicator {
            Some(raw) => match Side::parse(&raw) {
                Ok(side) => Some(side),
                Err(message) => {
                    errors.push("tradeDetails.buySellIndicator", message);
                    None
                }
            },
            None => {
                errors.push("tradeDetails.buySellIndicator", "is required");
                None
            }
        };

        let price = match self.price {
            Some(value) => match Price::new(value) {
                Ok(price) => Some(price),
                Err(message) => {
                    errors.push("tradeDetails.price", message);
                    None
                }
            },
            None => {
                errors.push("tradeDetails.price", "is required");
                None
            }
        };

        let quantity = match self.quantity {
            Some(value) => match Quantity::new(value) {
                Ok(quantity) => Some(quantity),
                Err(message) => {
                    errors.push("tradeDetails.quantity", message);
                    None
                }
            },
            None => {
                errors.push("tradeDetails.quantity", "is required");
                None
            }
        };

        match (side, price, quantity) {
            (Some(buy_sell_indicator), Some(price), Some(quantity)) => Some(TradeDetails {
                buy_sell_indicator,
                price,
                quantity,
            }),
            _ => None,
        }
    }
}

fn require_string(
    errors: &mut ValidationErrors,
    field: &str,
    value: Option<String>,
) -> Option<String> {
    match value {
        Some(s) if !s.trim().is_empty() => Some(s),
        Some(_) => {
            errors.push(field, "must not be empty");
            None
        }
        None => {
            errors.push(field, "is required");
            None
        }
    }
}

//! Filtering, sorting and pagination over a snapshot of trade records.
//!
//! Everything here is a pure function over `&[Trade]`: the store is never
//! touched and the input slice is never mutated. When a caller combines
//! stages, the order is filter, then sort, then paginate.

use chrono::NaiveDateTime;

use crate::domain::entities::trade::{Side, Trade};
use crate::domain::errors::QueryError;

/// Optional filter criteria, combined with AND semantics. Omitted criteria
/// impose no constraint.
#[derive(Debug, Clone, Default)]
pub struct FilterCriteria {
    /// Case-insensitive substring match over the whole record.
    pub keyword: Option<String>,
    /// Exact match on asset class; unclassified records never match.
    pub asset_class: Option<String>,
    /// Inclusive lower bound on the execution time.
    pub starting_date: Option<NaiveDateTime>,
    /// Inclusive upper bound on the execution time.
    pub ending_date: Option<NaiveDateTime>,
    /// Inclusive lower bound on the execution price.
    pub min_price: Option<f64>,
    /// Inclusive upper bound on the execution price.
    pub max_price: Option<f64>,
    /// Exact match on the BUY/SELL indicator.
    pub buy_sell_indicator: Option<Side>,
}

/// Keep the records satisfying every supplied criterion.
pub fn filter(records: &[Trade], criteria: &FilterCriteria) -> Vec<Trade> {
    let mut kept: Vec<Trade> = records.to_vec();

    if let Some(keyword) = &criteria.keyword {
        let needle = keyword.to_lowercase();
        kept.retain(|trade| keyword_corpus(trade).contains(&needle));
    }

    if let Some(asset_class) = &criteria.asset_class {
        if kept.is_empty() {
            return kept;
        }
        kept.retain(|trade| trade.asset_class.as_deref() == Some(asset_class.as_str()));
    }

    if let Some(starting_date) = criteria.starting_date {
        if kept.is_empty() {
            return kept;
        }
        kept.retain(|trade| trade.trade_date_time >= starting_date);
    }

    if let Some(ending_date) = criteria.ending_date {
        if kept.is_empty() {
            return kept;
        }
        kept.retain(|trade| trade.trade_date_time <= ending_date);
    }

    if let Some(min_price) = criteria.min_price {
        if kept.is_empty() {
            return kept;
        }
        kept.retain(|trade| trade.trade_details.price.value() >= min_price);
    }

    if let Some(max_price) = criteria.max_price {
        if kept.is_empty() {
            return kept;
        }
        kept.retain(|trade| trade.trade_details.price.value() <= max_price);
    }

    if let Some(side) = criteria.buy_sell_indicator {
        if kept.is_empty() {
            return kept;
        }
        kept.retain(|trade| trade.trade_details.buy_sell_indicator == side);
    }

    kept
}

/// The text a keyword is matched against: the record serialized to JSON,
/// lowercased, so every field participates in the search.
fn keyword_corpus(trade: &Trade) -> String {
    serde_json::to_string(trade)
        .map(|s| s.to_lowercase())
        .unwrap_or_default()
}

/// The record fields a caller may sort by, named as they appear on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    Id,
    TradeId,
    AssetClass,
    Counterparty,
    InstrumentId,
    InstrumentName,
    TradeDateTime,
    Trader,
    Price,
    Quantity,
    BuySellIndicator,
}

impl SortField {
    pub fn parse(name: &str) -> Result<Self, QueryError> {
        match name {
            "id" => Ok(SortField::Id),
            "tradeId" => Ok(SortField::TradeId),
            "assetClass" => Ok(SortField::AssetClass),
            "counterparty" => Ok(SortField::Counterparty),
            "instrumentId" => Ok(SortField::InstrumentId),
            "instrumentName" => Ok(SortField::InstrumentName),
            "tradeDateTime" => Ok(SortField::TradeDateTime),
            "trader" => Ok(SortField::Trader),
            "price" => Ok(SortField::Price),
            "quantity" => Ok(SortField::Quantity),
            "buySellIndicator" => Ok(SortField::BuySellIndicator),
            other => Err(QueryError::UnknownSortField(other.to_string())),
        }
    }
}

/// Stable ascending sort by the named field. Unknown field names are a
/// typed error, surfaced by the HTTP layer as a client error.
pub fn sort_by_field(records: &[Trade], field_name: &str) -> Result<Vec<Trade>, QueryError> {
    let field = SortField::parse(field_name)?;
    let mut sorted = records.to_vec();

    // Vec::sort_by is stable, so equal keys keep their relative order.
    match field {
        SortField::Id => sorted.sort_by(|a, b| a.id.cmp(&b.id)),
        SortField::TradeId => sorted.sort_by(|a, b| a.trade_id.cmp(&b.trade_id)),
        SortField::AssetClass => sorted.sort_by(|a, b| a.asset_class.cmp(&b.asset_class)),
        SortField::Counterparty => sorted.sort_by(|a, b| a.counterparty.cmp(&b.counterparty)),
        SortField::InstrumentId => sorted.sort_by(|a, b| a.instrument_id.cmp(&b.instrument_id)),
        SortField::InstrumentName => {
            sorted.sort_by(|a, b| a.instrument_name.cmp(&b.instrument_name))
        }
        SortField::TradeDateTime => {
            sorted.sort_by(|a, b| a.trade_date_time.cmp(&b.trade_date_time))
        }
        SortField::Trader => sorted.sort_by(|a, b| a.trader.cmp(&b.trader)),
        SortField::Price => sorted.sort_by(|a, b| {
            a.trade_details
                .price
                .value()
                .total_cmp(&b.trade_details.price.value())
        }),
        SortField::Quantity => sorted.sort_by(|a, b| {
            a.trade_details
                .quantity
                .value()
                .cmp(&b.trade_details.quantity.value())
        }),
        SortField::BuySellIndicator => sorted.sort_by(|a, b| {
            a.trade_details
                .buy_sell_indicator
                .as_str()
                .cmp(b.trade_details.buy_sell_indicator.as_str())
        }),
    }

    Ok(sorted)
}

/// Return the 1-based page `page_num` of `page_size` records. A window past
/// the end of the sequence is empty, not an error; zero parameters are
/// rejected.
pub fn paginate(
    records: &[Trade],
    page_num: u64,
    page_size: u64,
) -> Result<Vec<Trade>, QueryError> {
    if page_num == 0 || page_size == 0 {
        return Err(QueryError::InvalidPagination {
            page_num,
            page_size,
        });
    }

    let start = usize::try_from((page_num - 1).saturating_mul(page_size)).unwrap_or(usize::MAX);
    let size = usize::try_from(page_size).unwrap_or(usize::MAX);

    Ok(records.iter().skip(start).take(size).cloned().collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_objects::price::Price;
    use crate::domain::value_objects::quantity::Quantity;
    use crate::domain::entities::trade::TradeDetails;

    fn trade(id: u64, asset_class: Option<&str>, price: f64, side: Side, date: &str) -> Trade {
        Trade {
            id,
            trade_id: format!("trade-{}", id),
            asset_class: asset_class.map(|s| s.to_string()),
            counterparty: Some("Goldman Sachs".to_string()),
            instrument_id: "AAPL".to_string(),
            instrument_name: "Apple Inc.".to_string(),
            trade_date_time: date.parse().unwrap(),
            trade_details: TradeDetails {
                buy_sell_indicator: side,
                price: Price::new(price).unwrap(),
                quantity: Quantity::new(100).unwrap(),
            },
            trader: "John Doe".to_string(),
        }
    }

    fn sample_records() -> Vec<Trade> {
        vec![
            trade(1, Some("Equity"), 3200.0, Side::Buy, "2022-04-14T10:00:00"),
            trade(2, Some("Equity"), 155.0, Side::Buy, "2022-04-15T09:30:00"),
            trade(3, Some("FX"), 250.0, Side::Sell, "2022-04-15T14:45:00"),
            trade(4, None, 1.22, Side::Sell, "2022-04-16T13:15:00"),
            trade(5, Some("Equity"), 3200.0, Side::Buy, "2022-04-17T11:00:00"),
        ]
    }

    fn ids(records: &[Trade]) -> Vec<u64> {
        records.iter().map(|t| t.id).collect()
    }

    #[test]
    fn test_filter_no_criteria_keeps_everything() {
        let records = sample_records();
        let kept = filter(&records, &FilterCriteria::default());
        assert_eq!(ids(&kept), vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_filter_by_asset_class_exact() {
        let records = sample_records();
        let criteria = FilterCriteria {
            asset_class: Some("Equity".to_string()),
            ..Default::default()
        };
        assert_eq!(ids(&filter(&records, &criteria)), vec![1, 2, 5]);
    }

    #[test]
    fn test_filter_unclassified_never_matches_asset_class() {
        let records = sample_records();
        let criteria = FilterCriteria {
            asset_class: Some("Bond".to_string()),
            ..Default::default()
        };
        assert!(filter(&records, &criteria).is_empty());
    }

    #[test]
    fn test_filter_keyword_is_case_insensitive() {
        let records = sample_records();
        let criteria = FilterCriteria {
            keyword: Some("GOLDMAN".to_string()),
            ..Default::default()
        };
        assert_eq!(filter(&records, &criteria).len(), 5);

        let criteria = FilterCriteria {
            keyword: Some("fx".to_string()),
            ..Default::default()
        };
        assert_eq!(ids(&filter(&records, &criteria)), vec![3]);
    }

    #[test]
    fn test_filter_keyword_no_match() {
        let records = sample_records();
        let criteria = FilterCriteria {
            keyword: Some("no such keyword".to_string()),
            ..Default::default()
        };
        assert!(filter(&records, &criteria).is_empty());
    }

    #[test]
    fn test_filter_date_bounds_are_inclusive() {
        let records = sample_records();
        let criteria = FilterCriteria {
            starting_date: Some("2022-04-15T09:30:00".parse().unwrap()),
            ending_date: Some("2022-04-16T13:15:00".parse().unwrap()),
            ..Default::default()
        };
        assert_eq!(ids(&filter(&records, &criteria)), vec![2, 3, 4]);
    }

    #[test]
    fn test_filter_price_bounds_are_inclusive() {
        let records = sample_records();
        let criteria = FilterCriteria {
            min_price: Some(155.0),
            max_price: Some(3200.0),
            ..Default::default()
        };
        assert_eq!(ids(&filter(&records, &criteria)), vec![1, 2, 3, 5]);
    }

    #[test]
    fn test_filter_by_side() {
        let records = sample_records();
        let criteria = FilterCriteria {
            buy_sell_indicator: Some(Side::Sell),
            ..Default::default()
        };
        assert_eq!(ids(&filter(&records, &criteria)), vec![3, 4]);
    }

    #[test]
    fn test_filter_criteria_compose_conjunctively() {
        let records = sample_records();
        let criteria = FilterCriteria {
            asset_class: Some("Equity".to_string()),
            min_price: Some(1000.0),
            buy_sell_indicator: Some(Side::Buy),
            ..Default::default()
        };
        assert_eq!(ids(&filter(&records, &criteria)), vec![1, 5]);
    }

    #[test]
    fn test_filter_is_idempotent_and_never_grows() {
        let records = sample_records();
        let criteria = FilterCriteria {
            asset_class: Some("Equity".to_string()),
            max_price: Some(3200.0),
            ..Default::default()
        };
        let once = filter(&records, &criteria);
        let twice = filter(&once, &criteria);
        assert_eq!(once, twice);
        assert!(once.len() <= records.len());
    }

    #[test]
    fn test_sort_by_price_is_ascending_and_stable() {
        // Prices [3200, 155, 250, 1.22, 3200]: the two 3200 records must
        // keep their original relative order.
        let records = sample_records();
        let sorted = sort_by_field(&records, "price").unwrap();
        assert_eq!(ids(&sorted), vec![4, 2, 3, 1, 5]);
        let prices: Vec<f64> = sorted
            .iter()
            .map(|t| t.trade_details.price.value())
            .collect();
        assert_eq!(prices, vec![1.22, 155.0, 250.0, 3200.0, 3200.0]);
    }

    #[test]
    fn test_sort_by_trade_date_time() {
        let mut records = sample_records();
        records.reverse();
        let sorted = sort_by_field(&records, "tradeDateTime").unwrap();
        assert_eq!(ids(&sorted), vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_sort_by_id() {
        let mut records = sample_records();
        records.swap(0, 4);
        let sorted = sort_by_field(&records, "id").unwrap();
        assert_eq!(ids(&sorted), vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_sort_does_not_mutate_input() {
        let records = sample_records();
        let _ = sort_by_field(&records, "price").unwrap();
        assert_eq!(ids(&records), vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_sort_unknown_field_is_an_error() {
        let records = sample_records();
        let result = sort_by_field(&records, "notAField");
        assert_eq!(
            result.unwrap_err(),
            QueryError::UnknownSortField("notAField".to_string())
        );
    }

    #[test]
    fn test_paginate_windows() {
        let records = sample_records();

        assert_eq!(ids(&paginate(&records, 1, 2).unwrap()), vec![1, 2]);
        assert_eq!(ids(&paginate(&records, 2, 2).unwrap()), vec![3, 4]);
        assert_eq!(ids(&paginate(&records, 3, 2).unwrap()), vec![5]);
        assert!(paginate(&records, 4, 2).unwrap().is_empty());
    }

    #[test]
    fn test_paginate_far_past_the_end_is_empty_not_an_error() {
        let records = sample_records();
        assert!(paginate(&records, 1000, 1000).unwrap().is_empty());
    }

    #[test]
    fn test_paginate_rejects_zero_parameters() {
        let records = sample_records();
        assert!(matches!(
            paginate(&records, 0, 2),
            Err(QueryError::InvalidPagination { .. })
        ));
        assert!(matches!(
            paginate(&records, 1, 0),
            Err(QueryError::InvalidPagination { .. })
        ));
    }
}

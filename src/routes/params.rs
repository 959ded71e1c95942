use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::dto::analytics::SalesPeriod;
use crate::entity::cash_flows::FlowType;
use crate::error::{AppError, AppResult};

/// Hard ceiling for any listing limit, whatever the client asks for.
pub const MAX_LIST_LIMIT: u64 = 200;

#[derive(Debug, Deserialize, ToSchema)]
pub struct Pagination {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

impl Pagination {
    pub fn normalize(&self) -> (i64, i64, i64) {
        let page = self.page.unwrap_or(1).max(1);
        let per_page = self.per_page.unwrap_or(20).clamp(1, 100);
        let offset = (page - 1) * per_page;
        (page, per_page, offset)
    }
}

/// Parse an optional enum filter where a missing value, an empty string and
/// the `ALL` sentinel all mean "no filter".
pub fn parse_filter<T: FromStr>(raw: Option<&str>, field: &str) -> AppResult<Option<T>> {
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) if value.eq_ignore_ascii_case("ALL") => Ok(None),
        Some(value) => T::from_str(&value.to_ascii_uppercase())
            .map(Some)
            .map_err(|_| AppError::BadRequest(format!("invalid {field} filter: {value}"))),
    }
}

#[derive(Debug, Default, Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct RestaurantOrderQuery {
    /// Order status or `ALL`.
    pub status: Option<String>,
    /// Payment status or `ALL`.
    pub payment_status: Option<String>,
    pub limit: Option<u64>,
}

#[derive(Debug, Default, Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct StockMovementQuery {
    pub menu_item_id: Option<Uuid>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Default, Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct CashFlowQuery {
    #[serde(rename = "type")]
    pub flow_type: Option<FlowType>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

impl CashFlowQuery {
    pub fn pagination(&self) -> Pagination {
        Pagination {
            page: self.page,
            per_page: self.per_page,
        }
    }
}

#[derive(Debug, Default, Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct AnalyticsQuery {
    pub period: Option<SalesPeriod>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::orders::{OrderStatus, PaymentStatus};

    #[test]
    fn all_sentinel_disables_filter() {
        assert_eq!(parse_filter::<OrderStatus>(None, "status").unwrap(), None);
        assert_eq!(parse_filter::<OrderStatus>(Some("ALL"), "status").unwrap(), None);
        assert_eq!(parse_filter::<OrderStatus>(Some(""), "status").unwrap(), None);
    }

    #[test]
    fn filter_values_parse_case_insensitively() {
        assert_eq!(
            parse_filter::<OrderStatus>(Some("preparing"), "status").unwrap(),
            Some(OrderStatus::Preparing)
        );
        assert_eq!(
            parse_filter::<PaymentStatus>(Some("PAID"), "payment_status").unwrap(),
            Some(PaymentStatus::Paid)
        );
        assert!(parse_filter::<OrderStatus>(Some("EATEN"), "status").is_err());
    }

    #[test]
    fn pagination_defaults_and_bounds() {
        let p = Pagination { page: None, per_page: None };
        assert_eq!(p.normalize(), (1, 20, 0));
        let p = Pagination { page: Some(3), per_page: Some(500) };
        assert_eq!(p.normalize(), (3, 100, 200));
    }
}

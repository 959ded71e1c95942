use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::entity::cash_flows::FlowType;
use crate::models::CashFlowEntry;

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateCashFlowRequest {
    #[serde(rename = "type")]
    pub flow_type: FlowType,
    pub amount: Decimal,
    pub description: String,
    pub category: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CashFlowList {
    pub items: Vec<CashFlowEntry>,
}

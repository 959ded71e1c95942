//! Read-only reporting over paid orders, the cash-flow ledger and stock levels.
//!
//! Day and month boundaries are computed in UTC.

use chrono::{DateTime, Datelike, Days, Duration, Months, NaiveTime, Utc};
use rust_decimal::Decimal;
use sea_orm::sea_query::Expr;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder};
use sqlx::FromRow;
use uuid::Uuid;

use crate::{
    db::DbPool,
    dto::analytics::{
        CashFlowSummary, LowStockItem, RestaurantAnalytics, SalesPeriod, SalesPoint, TopMenuItem,
    },
    entity::{
        menu_items::{Column as MenuCol, Entity as MenuItems},
        restaurants::Entity as Restaurants,
    },
    error::{AppError, AppResult},
    response::{ApiResponse, Meta},
    routes::params::AnalyticsQuery,
    state::AppState,
};

const TOP_ITEMS: i64 = 5;
const TOP_ITEMS_WINDOW_DAYS: u64 = 30;

#[derive(FromRow)]
struct TopItemRow {
    id: Uuid,
    name: String,
    image: Option<String>,
    price: Decimal,
    quantity: i64,
    revenue: Decimal,
}

#[derive(FromRow)]
struct PaidOrderRow {
    created_at: DateTime<Utc>,
    total_amount: Decimal,
}

pub async fn restaurant_analytics(
    state: &AppState,
    restaurant_id: Uuid,
    query: AnalyticsQuery,
) -> AppResult<ApiResponse<RestaurantAnalytics>> {
    Restaurants::find_by_id(restaurant_id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound("Restaurant"))?;

    let period = query.period.unwrap_or_default();
    let now = Utc::now();
    let today = start_of_day(now);
    let month = start_of_month(now);
    let next_month = month + Months::new(1);

    let (today_revenue, today_orders) =
        paid_totals(&state.pool, restaurant_id, today, today + Duration::days(1)).await?;
    let (monthly_revenue, monthly_orders) =
        paid_totals(&state.pool, restaurant_id, month, next_month).await?;

    let top_since = today - Days::new(TOP_ITEMS_WINDOW_DAYS);
    let top_menu_items = top_items(&state.pool, restaurant_id, top_since).await?;

    let window = sales_window_start(period, now);
    let paid: Vec<PaidOrderRow> = sqlx::query_as(
        r#"
        SELECT created_at, total_amount
        FROM orders
        WHERE restaurant_id = $1 AND payment_status = 'PAID' AND created_at >= $2
        "#,
    )
    .bind(restaurant_id)
    .bind(window)
    .fetch_all(&state.pool)
    .await?;
    let sales = bucket_sales(
        paid.iter().map(|row| (row.created_at, row.total_amount)),
        period,
        now,
    );

    let cashflow = cashflow_summary(&state.pool, restaurant_id, month, next_month).await?;

    let low_stock_items = MenuItems::find()
        .filter(MenuCol::RestaurantId.eq(restaurant_id))
        .filter(MenuCol::IsAvailable.eq(true))
        .filter(Expr::col(MenuCol::StockQuantity).lte(Expr::col(MenuCol::MinStockAlert)))
        .order_by_asc(MenuCol::StockQuantity)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(|item| LowStockItem {
            id: item.id,
            name: item.name,
            stock_quantity: item.stock_quantity,
            min_stock_alert: item.min_stock_alert,
            unit: item.unit,
        })
        .collect();

    let data = RestaurantAnalytics {
        today_revenue,
        today_orders,
        monthly_revenue,
        monthly_orders,
        top_menu_items,
        sales,
        sales_period: period,
        interval_label: interval_label(period).to_string(),
        cashflow,
        low_stock_items,
    };
    Ok(ApiResponse::success("OK", data, Some(Meta::empty())))
}

async fn paid_totals(
    pool: &DbPool,
    restaurant_id: Uuid,
    from: DateTime<Utc>,
    until: DateTime<Utc>,
) -> AppResult<(Decimal, i64)> {
    let row: (Decimal, i64) = sqlx::query_as(
        r#"
        SELECT COALESCE(SUM(total_amount), 0), COUNT(*)
        FROM orders
        WHERE restaurant_id = $1 AND payment_status = 'PAID'
          AND created_at >= $2 AND created_at < $3
        "#,
    )
    .bind(restaurant_id)
    .bind(from)
    .bind(until)
    .fetch_one(pool)
    .await?;
    Ok(row)
}

async fn top_items(
    pool: &DbPool,
    restaurant_id: Uuid,
    since: DateTime<Utc>,
) -> AppResult<Vec<TopMenuItem>> {
    let rows = sqlx::query_as::<_, TopItemRow>(
        r#"
        SELECT mi.id, mi.name, mi.image, mi.price,
               SUM(oi.quantity)::BIGINT AS quantity,
               COALESCE(SUM(oi.price * oi.quantity), 0) AS revenue
        FROM order_items oi
        JOIN orders o ON o.id = oi.order_id
        JOIN menu_items mi ON mi.id = oi.menu_item_id
        WHERE o.restaurant_id = $1 AND o.payment_status = 'PAID' AND o.created_at >= $2
        GROUP BY mi.id, mi.name, mi.image, mi.price
        ORDER BY quantity DESC, mi.name ASC
        LIMIT $3
        "#,
    )
    .bind(restaurant_id)
    .bind(since)
    .bind(TOP_ITEMS)
    .fetch_all(pool)
    .await?;

    Ok(rows
        .into_iter()
        .map(|row| TopMenuItem {
            id: row.id,
            name: row.name,
            image: row.image,
            price: row.price,
            quantity: row.quantity,
            revenue: row.revenue,
        })
        .collect())
}

async fn cashflow_summary(
    pool: &DbPool,
    restaurant_id: Uuid,
    from: DateTime<Utc>,
    until: DateTime<Utc>,
) -> AppResult<CashFlowSummary> {
    let (income, expense): (Decimal, Decimal) = sqlx::query_as(
        r#"
        SELECT COALESCE(SUM(amount) FILTER (WHERE flow_type = 'INCOME'), 0),
               COALESCE(SUM(amount) FILTER (WHERE flow_type = 'EXPENSE'), 0)
        FROM cash_flows
        WHERE restaurant_id = $1 AND created_at >= $2 AND created_at < $3
        "#,
    )
    .bind(restaurant_id)
    .bind(from)
    .bind(until)
    .fetch_one(pool)
    .await?;

    Ok(CashFlowSummary {
        income,
        expense,
        net_income: income - expense,
    })
}

pub fn start_of_day(at: DateTime<Utc>) -> DateTime<Utc> {
    at.date_naive().and_time(NaiveTime::MIN).and_utc()
}

pub fn start_of_month(at: DateTime<Utc>) -> DateTime<Utc> {
    let date = at.date_naive();
    (date - Days::new(u64::from(date.day0())))
        .and_time(NaiveTime::MIN)
        .and_utc()
}

pub fn interval_label(period: SalesPeriod) -> &'static str {
    match period {
        SalesPeriod::Today => "Hourly",
        SalesPeriod::SevenDays | SalesPeriod::ThirtyDays => "Daily",
    }
}

fn bucket_layout(period: SalesPeriod) -> (usize, Duration) {
    match period {
        SalesPeriod::Today => (24, Duration::hours(1)),
        SalesPeriod::SevenDays => (7, Duration::days(1)),
        SalesPeriod::ThirtyDays => (30, Duration::days(1)),
    }
}

/// Start of the first bucket of the series ending with the current day.
pub fn sales_window_start(period: SalesPeriod, now: DateTime<Utc>) -> DateTime<Utc> {
    let (buckets, width) = bucket_layout(period);
    match period {
        SalesPeriod::Today => start_of_day(now),
        _ => start_of_day(now) - width * (buckets as i32 - 1),
    }
}

/// Spread paid orders over hourly (today) or daily buckets. Every bucket is
/// present, empty ones with zero revenue; orders outside the window are ignored.
pub fn bucket_sales<I>(orders: I, period: SalesPeriod, now: DateTime<Utc>) -> Vec<SalesPoint>
where
    I: IntoIterator<Item = (DateTime<Utc>, Decimal)>,
{
    let (buckets, width) = bucket_layout(period);
    let first = sales_window_start(period, now);

    let mut points: Vec<SalesPoint> = (0..buckets)
        .map(|i| {
            let start = first + width * i as i32;
            let label = match period {
                SalesPeriod::Today => start.format("%H:00").to_string(),
                _ => start.format("%Y-%m-%d").to_string(),
            };
            SalesPoint {
                label,
                start,
                revenue: Decimal::ZERO,
                orders: 0,
            }
        })
        .collect();

    for (created_at, total) in orders {
        if created_at < first {
            continue;
        }
        let index = ((created_at - first).num_seconds() / width.num_seconds()) as usize;
        if let Some(point) = points.get_mut(index) {
            point.revenue += total;
            point.orders += 1;
        }
    }

    points
}

use sea_orm::ActiveValue::NotSet;
use sea_orm::{ActiveModelTrait, ColumnTrait, DbErr, EntityTrait, QueryFilter, Set, SqlErr};
use uuid::Uuid;

use crate::{
    dto::tables::{CreateTableRequest, TableWithRestaurant},
    entity::{
        restaurant_tables::{
            ActiveModel as TableActive, Column as TableCol, Entity as RestaurantTables,
            Model as TableModel,
        },
        restaurants::Entity as Restaurants,
    },
    error::{AppError, AppResult},
    models::{Table, restaurant_from_entity, table_from_entity},
    response::{ApiResponse, Meta},
    state::AppState,
};

/// Customer ordering URL printed as the table's QR code.
pub fn ordering_url(frontend_url: &str, restaurant_id: Uuid, table_number: &str) -> String {
    format!(
        "{}/order/{}/{}",
        frontend_url.trim_end_matches('/'),
        restaurant_id,
        table_number
    )
}

pub async fn create_table(
    state: &AppState,
    payload: CreateTableRequest,
) -> AppResult<ApiResponse<Table>> {
    let table_number = payload.table_number.trim();
    if table_number.is_empty() {
        return Err(AppError::BadRequest("table_number is required".into()));
    }

    Restaurants::find_by_id(payload.restaurant_id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound("Restaurant"))?;

    if find_by_number(state, payload.restaurant_id, table_number)
        .await?
        .is_some()
    {
        return Err(duplicate_table(table_number));
    }

    let table = TableActive {
        id: Set(Uuid::new_v4()),
        restaurant_id: Set(payload.restaurant_id),
        table_number: Set(table_number.to_string()),
        qr_code: Set(ordering_url(
            &state.config.frontend_url,
            payload.restaurant_id,
            table_number,
        )),
        is_active: Set(true),
        created_at: NotSet,
    }
    .insert(&state.orm)
    .await
    .map_err(|err| unique_violation_as_conflict(err, table_number))?;

    tracing::info!(table_id = %table.id, table_number = %table.table_number, "table created");
    Ok(ApiResponse::success(
        "Table created",
        table_from_entity(table),
        Some(Meta::empty()),
    ))
}

pub async fn get_table(state: &AppState, id: Uuid) -> AppResult<ApiResponse<TableWithRestaurant>> {
    let table = RestaurantTables::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound("Table"))?;
    with_restaurant(state, table).await
}

/// Resolve a scanned QR code to its table; inactive tables do not take orders.
pub async fn scan_table(
    state: &AppState,
    restaurant_id: Uuid,
    table_number: &str,
) -> AppResult<ApiResponse<TableWithRestaurant>> {
    let table = find_by_number(state, restaurant_id, table_number)
        .await?
        .ok_or(AppError::NotFound("Table"))?;
    if !table.is_active {
        return Err(AppError::BadRequest("table is not active".into()));
    }
    with_restaurant(state, table).await
}

fn duplicate_table(table_number: &str) -> AppError {
    AppError::Conflict(format!("table {table_number} already exists"))
}

/// A concurrent create can pass the lookup and still lose on the unique index.
fn unique_violation_as_conflict(err: DbErr, table_number: &str) -> AppError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => duplicate_table(table_number),
        _ => err.into(),
    }
}

async fn find_by_number(
    state: &AppState,
    restaurant_id: Uuid,
    table_number: &str,
) -> AppResult<Option<TableModel>> {
    Ok(RestaurantTables::find()
        .filter(TableCol::RestaurantId.eq(restaurant_id))
        .filter(TableCol::TableNumber.eq(table_number))
        .one(&state.orm)
        .await?)
}

async fn with_restaurant(
    state: &AppState,
    table: TableModel,
) -> AppResult<ApiResponse<TableWithRestaurant>> {
    let restaurant = Restaurants::find_by_id(table.restaurant_id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound("Restaurant"))?;

    Ok(ApiResponse::success(
        "OK",
        TableWithRestaurant {
            table: table_from_entity(table),
            restaurant: restaurant_from_entity(restaurant),
        },
        Some(Meta::empty()),
    ))
}

use crate::{auth::CurrentUser, error::Error, AppState};
use axum::{
    extract::{Path, Query, State},
    Json,
};
use equiptrack_db::models;
use http::StatusCode;

#[derive(serde::Deserialize)]
pub struct ListQuery {
    #[serde(default)]
    pub skip: i64,
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub category: Option<String>,
}

fn default_limit() -> i64 {
    100
}

pub async fn create(
    CurrentUser(user): CurrentUser,
    State(app_state): State<AppState>,
    Json(new_product): Json<models::NewProduct>,
) -> Result<(StatusCode, Json<models::Product>), Error> {
    let created = app_state
        .store
        .create_product(&user.tenant_id, new_product)
        .await?;
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn list(
    CurrentUser(user): CurrentUser,
    State(app_state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<models::Product>>, Error> {
    let products = app_state
        .store
        .list_products(
            &user.tenant_id,
            query.skip,
            query.limit,
            query.category.as_deref(),
        )
        .await?;
    Ok(Json(products))
}

pub async fn low_stock(
    CurrentUser(user): CurrentUser,
    State(app_state): State<AppState>,
) -> Result<Json<Vec<models::Product>>, Error> {
    let products = app_state.store.low_stock_products(&user.tenant_id).await?;
    Ok(Json(products))
}

pub async fn get(
    CurrentUser(user): CurrentUser,
    State(app_state): State<AppState>,
    Path(product_id): Path<String>,
) -> Result<Json<models::Product>, Error> {
    app_state
        .store
        .get_product(&user.tenant_id, &product_id)
        .await?
        .map(Json)
        .ok_or(Error::NotFound("product"))
}

pub async fn update(
    CurrentUser(user): CurrentUser,
    State(app_state): State<AppState>,
    Path(product_id): Path<String>,
    Json(changes): Json<models::ProductChanges>,
) -> Result<Json<models::Product>, Error> {
    app_state
        .store
        .update_product(&user.tenant_id, &product_id, changes)
        .await?
        .map(Json)
        .ok_or(Error::NotFound("product"))
}

pub async fn delete(
    CurrentUser(user): CurrentUser,
    State(app_state): State<AppState>,
    Path(product_id): Path<String>,
) -> Result<Json<serde_json::Value>, Error> {
    if app_state
        .store
        .delete_product(&user.tenant_id, &product_id)
        .await?
    {
        Ok(Json(serde_json::json!({ "message": "product deleted" })))
    } else {
        Err(Error::NotFound("product"))
    }
}

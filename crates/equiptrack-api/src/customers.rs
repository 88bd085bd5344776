use crate::{auth::CurrentUser, error::Error, AppState};
use axum::{
    extract::{Path, Query, State},
    Json,
};
use equiptrack_db::models;
use http::StatusCode;

#[derive(serde::Deserialize)]
pub struct Pagination {
    #[serde(default)]
    pub skip: i64,
    #[serde(default = "default_limit")]
    pub limit: i64,
}

fn default_limit() -> i64 {
    100
}

pub async fn create(
    CurrentUser(user): CurrentUser,
    State(app_state): State<AppState>,
    Json(new_customer): Json<models::NewCustomer>,
) -> Result<(StatusCode, Json<models::Customer>), Error> {
    let created = app_state
        .store
        .create_customer(&user.tenant_id, new_customer)
        .await?;
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn list(
    CurrentUser(user): CurrentUser,
    State(app_state): State<AppState>,
    Query(page): Query<Pagination>,
) -> Result<Json<Vec<models::Customer>>, Error> {
    let customers = app_state
        .store
        .list_customers(&user.tenant_id, page.skip, page.limit)
        .await?;
    Ok(Json(customers))
}

pub async fn get(
    CurrentUser(user): CurrentUser,
    State(app_state): State<AppState>,
    Path(customer_id): Path<String>,
) -> Result<Json<models::Customer>, Error> {
    app_state
        .store
        .get_customer(&user.tenant_id, &customer_id)
        .await?
        .map(Json)
        .ok_or(Error::NotFound("customer"))
}

pub async fn update(
    CurrentUser(user): CurrentUser,
    State(app_state): State<AppState>,
    Path(customer_id): Path<String>,
    Json(changes): Json<models::CustomerChanges>,
) -> Result<Json<models::Customer>, Error> {
    app_state
        .store
        .update_customer(&user.tenant_id, &customer_id, changes)
        .await?
        .map(Json)
        .ok_or(Error::NotFound("customer"))
}

pub async fn delete(
    CurrentUser(user): CurrentUser,
    State(app_state): State<AppState>,
    Path(customer_id): Path<String>,
) -> Result<Json<serde_json::Value>, Error> {
    if app_state
        .store
        .delete_customer(&user.tenant_id, &customer_id)
        .await?
    {
        Ok(Json(serde_json::json!({ "message": "customer deleted" })))
    } else {
        Err(Error::NotFound("customer"))
    }
}

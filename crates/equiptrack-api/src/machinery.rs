use crate::{auth::CurrentUser, error::Error, AppState};
use axum::{
    extract::{Path, Query, State},
    Json,
};
use equiptrack_db::{models, MachineryFilter};
use http::StatusCode;

#[derive(serde::Deserialize)]
pub struct ListQuery {
    #[serde(default)]
    pub skip: i64,
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub machinery_type: Option<models::MachineryType>,
    #[serde(default)]
    pub status: Option<models::MachineryStatus>,
    #[serde(default)]
    pub needs_maintenance: Option<bool>,
}

fn default_limit() -> i64 {
    100
}

pub async fn create(
    CurrentUser(user): CurrentUser,
    State(app_state): State<AppState>,
    Json(new_machinery): Json<models::NewMachinery>,
) -> Result<(StatusCode, Json<models::Machinery>), Error> {
    let created = app_state
        .store
        .create_machinery(&user.tenant_id, new_machinery)
        .await?;
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn list(
    CurrentUser(user): CurrentUser,
    State(app_state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<models::Machinery>>, Error> {
    let filter = MachineryFilter {
        machinery_type: query.machinery_type,
        status: query.status,
        needs_maintenance: query.needs_maintenance,
    };
    let machinery = app_state
        .store
        .list_machinery(&user.tenant_id, query.skip, query.limit, filter)
        .await?;
    Ok(Json(machinery))
}

pub async fn stats(
    CurrentUser(user): CurrentUser,
    State(app_state): State<AppState>,
) -> Result<Json<models::MachineryStats>, Error> {
    let stats = app_state.store.machinery_stats(&user.tenant_id).await?;
    Ok(Json(stats))
}

pub async fn alerts(
    CurrentUser(user): CurrentUser,
    State(app_state): State<AppState>,
) -> Result<Json<Vec<models::MaintenanceAlert>>, Error> {
    let alerts = app_state.store.maintenance_alerts(&user.tenant_id).await?;
    Ok(Json(alerts))
}

pub async fn get(
    CurrentUser(user): CurrentUser,
    State(app_state): State<AppState>,
    Path(machinery_id): Path<String>,
) -> Result<Json<models::Machinery>, Error> {
    app_state
        .store
        .get_machinery(&user.tenant_id, &machinery_id)
        .await?
        .map(Json)
        .ok_or(Error::NotFound("machinery"))
}

pub async fn update(
    CurrentUser(user): CurrentUser,
    State(app_state): State<AppState>,
    Path(machinery_id): Path<String>,
    Json(changes): Json<models::MachineryChanges>,
) -> Result<Json<models::Machinery>, Error> {
    app_state
        .store
        .update_machinery(&user.tenant_id, &machinery_id, changes)
        .await?
        .map(Json)
        .ok_or(Error::NotFound("machinery"))
}

pub async fn update_horometer(
    CurrentUser(user): CurrentUser,
    State(app_state): State<AppState>,
    Path(machinery_id): Path<String>,
    Json(reading): Json<models::HorometerUpdate>,
) -> Result<Json<models::Machinery>, Error> {
    app_state
        .store
        .update_horometer(&user.tenant_id, &machinery_id, reading)
        .await?
        .map(Json)
        .ok_or(Error::NotFound("machinery"))
}

pub async fn delete(
    CurrentUser(user): CurrentUser,
    State(app_state): State<AppState>,
    Path(machinery_id): Path<String>,
) -> Result<Json<serde_json::Value>, Error> {
    if app_state
        .store
        .delete_machinery(&user.tenant_id, &machinery_id)
        .await?
    {
        Ok(Json(serde_json::json!({ "message": "machinery deleted" })))
    } else {
        Err(Error::NotFound("machinery"))
    }
}

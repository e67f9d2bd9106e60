use std::sync::Arc;

use axum::{
    extract::{
        rejection::{FormRejection, JsonRejection, QueryRejection},
        Query, State,
    },
    response::Html,
    Form, Json,
};
use serde::Deserialize;

use crate::errors::AppError;
use crate::integrations::hubspot::CallbackParams;
use crate::models::credentials::Credentials;
use crate::models::integration_item::IntegrationItem;
use crate::AppState;

// ── Request DTOs ─────────────────────────────────────────────

/// Form body identifying the host application's user.
#[derive(Deserialize)]
pub struct IdentityForm {
    pub user_id: String,
    pub org_id: String,
}

#[derive(Deserialize)]
pub struct LoadItemsRequest {
    pub credentials: Credentials,
}

// ── Handlers ─────────────────────────────────────────────────

/// POST /integrations/hubspot/authorize — returns the consent URL as a JSON string
pub async fn authorize_hubspot(
    State(state): State<Arc<AppState>>,
    form: Result<Form<IdentityForm>, FormRejection>,
) -> Result<Json<String>, AppError> {
    let Form(form) = form?;
    let url = state.hubspot.authorize(&form.user_id, &form.org_id).await?;
    Ok(Json(url))
}

/// GET /integrations/hubspot/oauth2callback — redirect target registered with HubSpot
pub async fn oauth2callback_hubspot(
    State(state): State<Arc<AppState>>,
    params: Result<Query<CallbackParams>, QueryRejection>,
) -> Result<Html<&'static str>, AppError> {
    let Query(params) = params?;
    state.hubspot.oauth2_callback(params).await
}

/// POST /integrations/hubspot/credentials — cached credentials for a user/org
pub async fn get_hubspot_credentials(
    State(state): State<Arc<AppState>>,
    form: Result<Form<IdentityForm>, FormRejection>,
) -> Result<Json<Credentials>, AppError> {
    let Form(form) = form?;
    let credentials = state
        .hubspot
        .get_credentials(&form.user_id, &form.org_id)
        .await?;
    Ok(Json(credentials))
}

/// POST /integrations/hubspot/load — contacts as integration items
pub async fn load_hubspot_items(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<LoadItemsRequest>, JsonRejection>,
) -> Result<Json<Vec<IntegrationItem>>, AppError> {
    let Json(payload) = payload?;
    let items = state.hubspot.get_items(&payload.credentials).await?;
    Ok(Json(items))
}

use axum::{
    extract::{multipart::Field, Multipart, Path, Query, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use bytes::Bytes;
use serde::Deserialize;
use service::errors::{FieldError, ServiceError};
use service::office::domain::{parse_is_active, PhotoUpload, IS_ACTIVE_REQUIRED};
use service::office::{OfficeDto, OfficeRequest, PictureUrl};
use tracing::{debug, info};
use uuid::Uuid;

use crate::errors::JsonApiError;
use crate::metrics::observe;
use crate::routes::AppState;

const PHOTO_FIELD: &str = "photo";
const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

#[derive(Debug, Default, Deserialize, utoipa::IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct StatusQuery {
    /// `true` or `false`; may also be sent as JSON body `{isActive}`.
    pub is_active: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StatusBody {
    is_active: Option<bool>,
}

async fn text(field: Field<'_>) -> Result<String, JsonApiError> {
    field.text().await.map_err(|e| JsonApiError::bad_request(e.body_text()))
}

/// Read the office form. Unknown parts are skipped; an empty file part
/// counts as no photo.
async fn read_office_form(mut multipart: Multipart) -> Result<OfficeRequest, JsonApiError> {
    let mut request = OfficeRequest::default();
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| JsonApiError::bad_request(e.body_text()))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "address" => request.address = text(field).await?,
            "registryPhoneNumber" => request.registry_phone_number = text(field).await?,
            "isActive" => request.is_active = Some(parse_is_active(&text(field).await?)?),
            PHOTO_FIELD => {
                let file_name = field.file_name().map(str::to_string);
                let content_type = field.content_type().unwrap_or(DEFAULT_CONTENT_TYPE).to_string();
                let content = field.bytes().await.map_err(|e| JsonApiError::bad_request(e.body_text()))?;
                if !content.is_empty() {
                    request.photo = Some(PhotoUpload::new(content, content_type, file_name));
                }
            }
            other => debug!(field = other, "ignoring unknown form field"),
        }
    }
    Ok(request)
}

/// Active flag from the query string, else from a JSON body.
fn status_flag(query: StatusQuery, body: &Bytes) -> Result<bool, JsonApiError> {
    if let Some(raw) = query.is_active {
        return Ok(parse_is_active(&raw)?);
    }
    let from_body = if body.iter().all(u8::is_ascii_whitespace) {
        None
    } else {
        serde_json::from_slice::<StatusBody>(body)
            .map_err(|e| JsonApiError::bad_request(format!("invalid status body: {e}")))?
            .is_active
    };
    from_body.ok_or_else(|| {
        ServiceError::Validation(vec![FieldError::new("isActive", IS_ACTIVE_REQUIRED)]).into()
    })
}

#[utoipa::path(
    get, path = "/api/offices", tag = "offices",
    responses((status = 200, description = "All offices", body = [crate::openapi::OfficeDtoDoc]))
)]
pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<OfficeDto>>, JsonApiError> {
    let offices = observe("list", state.offices.get_all_offices().await)?;
    Ok(Json(offices))
}

#[utoipa::path(
    get, path = "/api/offices/office/{id}", tag = "offices",
    params(("id" = Uuid, Path, description = "Office id")),
    responses(
        (status = 200, description = "Office", body = crate::openapi::OfficeDtoDoc),
        (status = 404, description = "Not Found", body = crate::openapi::ErrorBodyDoc)
    )
)]
pub async fn get(State(state): State<AppState>, Path(id): Path<Uuid>) -> Result<Json<OfficeDto>, JsonApiError> {
    let office = observe("get", state.offices.get_office_by_id(id).await)?;
    Ok(Json(office))
}

#[utoipa::path(
    get, path = "/api/offices/{id}/picture", tag = "offices",
    params(("id" = Uuid, Path, description = "Office id")),
    responses(
        (status = 200, description = "Photo URL", body = crate::openapi::PictureUrlDoc),
        (status = 404, description = "Office or photo not found", body = crate::openapi::ErrorBodyDoc)
    )
)]
pub async fn picture(State(state): State<AppState>, Path(id): Path<Uuid>) -> Result<Json<PictureUrl>, JsonApiError> {
    let url = observe("picture", state.offices.get_office_picture_url(id).await)?;
    Ok(Json(PictureUrl { url }))
}

#[utoipa::path(
    post, path = "/api/offices/office", tag = "offices",
    request_body(content = crate::openapi::OfficeFormDoc, content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Created", body = crate::openapi::OfficeDtoDoc),
        (status = 400, description = "Validation Error", body = crate::openapi::ErrorBodyDoc)
    )
)]
pub async fn create(State(state): State<AppState>, multipart: Multipart) -> Result<impl IntoResponse, JsonApiError> {
    let request = read_office_form(multipart).await?;
    let office = observe("create", state.offices.add_office(request).await)?;
    info!(office_id = %office.office_id, "office created");
    let location = format!("/api/offices/office/{}", office.office_id);
    Ok((StatusCode::CREATED, [(header::LOCATION, location)], Json(office)))
}

#[utoipa::path(
    put, path = "/api/offices/office/{id}", tag = "offices",
    params(("id" = Uuid, Path, description = "Office id")),
    request_body(content = crate::openapi::OfficeFormDoc, content_type = "multipart/form-data"),
    responses(
        (status = 204, description = "Updated"),
        (status = 400, description = "Validation Error", body = crate::openapi::ErrorBodyDoc),
        (status = 404, description = "Not Found", body = crate::openapi::ErrorBodyDoc)
    )
)]
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    multipart: Multipart,
) -> Result<StatusCode, JsonApiError> {
    let request = read_office_form(multipart).await?;
    observe("update", state.offices.update_office(id, request).await)?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    put, path = "/api/offices/office/{id}/status", tag = "offices",
    params(("id" = Uuid, Path, description = "Office id"), StatusQuery),
    request_body = crate::openapi::StatusBodyDoc,
    responses(
        (status = 204, description = "Status updated"),
        (status = 400, description = "Missing or invalid isActive", body = crate::openapi::ErrorBodyDoc),
        (status = 404, description = "Not Found", body = crate::openapi::ErrorBodyDoc)
    )
)]
pub async fn update_status(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(query): Query<StatusQuery>,
    body: Bytes,
) -> Result<StatusCode, JsonApiError> {
    let is_active = status_flag(query, &body)?;
    observe("update_status", state.offices.update_office_status(id, is_active).await)?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    delete, path = "/api/offices/office/{id}", tag = "offices",
    params(("id" = Uuid, Path, description = "Office id")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 404, description = "Not Found", body = crate::openapi::ErrorBodyDoc)
    )
)]
pub async fn delete(State(state): State<AppState>, Path(id): Path<Uuid>) -> Result<StatusCode, JsonApiError> {
    observe("delete", state.offices.delete_office(id).await)?;
    Ok(StatusCode::NO_CONTENT)
}

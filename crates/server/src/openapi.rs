use serde::Serialize;
use utoipa::OpenApi;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(ToSchema)]
pub struct HealthResponse { pub status: String }

#[derive(ToSchema, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OfficeDtoDoc {
    pub office_id: Uuid,
    pub address: String,
    pub registry_phone_number: String,
    pub photo_id: Option<String>,
    pub is_active: bool,
}

#[derive(ToSchema)]
pub struct PictureUrlDoc { pub url: String }

/// `multipart/form-data` body of create and update.
#[derive(ToSchema, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OfficeFormDoc {
    #[schema(example = "Main St 1")]
    pub address: String,
    #[schema(example = "+1 555-123-4567")]
    pub registry_phone_number: String,
    pub is_active: bool,
    #[schema(value_type = Option<String>, format = Binary)]
    pub photo: Option<Vec<u8>>,
}

#[derive(ToSchema, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusBodyDoc { pub is_active: bool }

#[derive(ToSchema, Serialize)]
pub struct FieldErrorDoc { pub field: String, pub message: String }

#[derive(ToSchema, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorBodyDoc {
    pub status_code: u16,
    pub message: String,
    pub errors: Option<Vec<FieldErrorDoc>>,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health,
        crate::offices::list,
        crate::offices::get,
        crate::offices::picture,
        crate::offices::create,
        crate::offices::update,
        crate::offices::update_status,
        crate::offices::delete,
    ),
    components(
        schemas(
            HealthResponse,
            OfficeDtoDoc,
            PictureUrlDoc,
            OfficeFormDoc,
            StatusBodyDoc,
            FieldErrorDoc,
            ErrorBodyDoc,
        )
    ),
    tags(
        (name = "health"),
        (name = "offices")
    )
)]
pub struct ApiDoc;

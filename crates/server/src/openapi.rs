use utoipa::OpenApi;
use utoipa::ToSchema;

#[derive(ToSchema)]
pub struct HealthResponse { pub status: String }

#[derive(ToSchema)]
pub struct ErrorBody { pub error: String }

#[derive(ToSchema)]
pub struct DocumentDoc {
    #[schema(value_type = Vec<Object>)]
    pub users: Vec<serde_json::Value>,
    #[schema(value_type = Vec<Object>)]
    pub parts: Vec<serde_json::Value>,
}

/// A user carries `birthdate`, a part carries `userId`; other fields are free-form.
#[allow(non_snake_case)]
#[derive(ToSchema)]
pub struct RecordDoc {
    #[schema(value_type = Object)]
    pub id: serde_json::Value,
    pub birthdate: Option<String>,
    #[schema(value_type = Option<Object>)]
    pub userId: Option<serde_json::Value>,
}

#[derive(ToSchema)]
pub struct MutationResponseDoc {
    pub message: String,
    pub data: DocumentDoc,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health,
        crate::routes::data::get_data,
        crate::routes::data::post_data,
        crate::routes::data::put_data,
    ),
    components(
        schemas(
            HealthResponse,
            ErrorBody,
            DocumentDoc,
            RecordDoc,
            MutationResponseDoc,
        )
    ),
    tags(
        (name = "health"),
        (name = "data")
    )
)]
pub struct ApiDoc;

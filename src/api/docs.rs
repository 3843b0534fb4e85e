//! OpenAPI document for the JSON endpoints.

use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use super::handlers;
use crate::error::ErrorResponse;

/// Path of the generated OpenAPI document.
pub const OPENAPI_PATH: &str = "/api-docs/openapi.json";

#[derive(OpenApi)]
#[openapi(
    paths(handlers::root, handlers::health, handlers::hello, handlers::highlight),
    components(schemas(
        handlers::RootResponse,
        handlers::HealthResponse,
        handlers::HelloResponse,
        handlers::Highlight,
        handlers::HighlightReceipt,
        ErrorResponse
    )),
    info(title = "starter-api", description = "Placeholder JSON API for the static site")
)]
pub struct ApiDoc;

/// Swagger UI mounted at `/docs`.
pub fn swagger_ui() -> SwaggerUi {
    SwaggerUi::new("/docs").url(OPENAPI_PATH, ApiDoc::openapi())
}

//! OpenAPI documentation configuration

use utoipa::OpenApi;

/// Combined OpenAPI documentation for Storage API
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Storage API",
        version = "0.1.0",
        description = "Product inventory API: list, statistics and CRUD over a PostgreSQL store",
        license(name = "MIT")
    ),
    servers(
        (url = "http://localhost:8080", description = "Local development server")
    ),
    nest(
        (path = "/api/products", api = domain_products::ApiDoc)
    )
)]
pub struct ApiDoc;

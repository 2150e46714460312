use utoipa::OpenApi;
use utoipauto::utoipauto;

#[utoipauto]
#[derive(OpenApi)]
#[openapi(
    tags(
        (name = "Biolink Payments REST API", description = "Marketplace payment API endpoints")
    ),
)]
pub struct ApiDoc {}

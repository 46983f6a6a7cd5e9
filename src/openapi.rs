use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::Modify;
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Personal Diary API",
        version = "1.0.0",
        description = "Backend API for a personal diary with optional image attachments"
    ),
    servers(
        (url = "http://localhost:8000", description = "Local development server"),
    ),
    paths(
        // Health
        crate::handlers::health::root,
        crate::handlers::health::health_check,

        // Diary
        crate::handlers::diary_handler::create_entry,
        crate::handlers::diary_handler::list_entries,
        crate::handlers::diary_handler::get_entry,
        crate::handlers::diary_handler::delete_entry,
    ),
    components(
        schemas(
            crate::models::DiaryEntry,
            crate::models::CreateEntryForm,
            crate::models::DiaryMutationResponse,
            crate::error::ErrorBody,
        )
    ),
    tags(
        (name = "health", description = "Service status"),
        (name = "diary", description = "Diary entries of the authenticated user"),
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("Firebase ID token"))
                        .build(),
                ),
            )
        }
    }
}

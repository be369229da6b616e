//! OpenAPI documentation for the doctor management API.

use utoipa::OpenApi;

use crate::api;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Doctor Management API",
        description = "CRUD and search for doctor profiles: create, view, edit, \
                       and delete records, with case-insensitive search over \
                       names, specializations, and hospital affiliations.",
    ),
    paths(
        api::handlers::doctors::list_doctors,
        api::handlers::doctors::new_doctor_form,
        api::handlers::doctors::save_doctor,
        api::handlers::doctors::view_doctor,
        api::handlers::doctors::edit_doctor,
        api::handlers::doctors::delete_doctor,
        api::handlers::doctors::search_doctors,
        api::handlers::health::health,
        api::handlers::health::test_db,
    ),
    tags(
        (name = "doctors", description = "Doctor profile management"),
        (name = "health", description = "Service health and diagnostics"),
    )
)]
pub struct ApiDoc;

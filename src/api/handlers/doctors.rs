//! Doctor CRUD and search handlers.
//!
//! The route layout mirrors a classic web-console resource: `/doctors/list`
//! for the directory, `/doctors/new` and `/doctors/save` for the form
//! lifecycle, and `/doctors/{view,edit,delete}/{id}` for record-level
//! operations. Responses are JSON throughout.

use crate::{
    AppState,
    api::models::doctors::{
        DoctorForm, DoctorListResponse, DoctorResponse, MessageResponse, SaveDoctorResponse,
        SearchParams, SearchType,
    },
    errors::{Error, Result},
    types::DoctorId,
};
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use tracing::{debug, info, instrument};

/// List all doctors, newest first.
#[utoipa::path(
    get,
    path = "/doctors/list",
    tag = "doctors",
    responses(
        (status = 200, description = "All doctors, newest first", body = DoctorListResponse),
        (status = 500, description = "Storage unavailable")
    )
)]
#[instrument(skip(state), err)]
pub async fn list_doctors(State(state): State<AppState>) -> Result<Json<DoctorListResponse>> {
    let doctors = state.doctors.list().await?;
    debug!(count = doctors.len(), "Listed doctors");
    Ok(Json(DoctorListResponse::new(doctors)))
}

/// Blank form for creating a doctor.
#[utoipa::path(
    get,
    path = "/doctors/new",
    tag = "doctors",
    responses(
        (status = 200, description = "Empty doctor form", body = DoctorForm)
    )
)]
#[instrument]
pub async fn new_doctor_form() -> Json<DoctorForm> {
    Json(DoctorForm::default())
}

/// Create or update a doctor, depending on whether the form carries an id.
#[utoipa::path(
    post,
    path = "/doctors/save",
    tag = "doctors",
    request_body = DoctorForm,
    responses(
        (status = 201, description = "Doctor created", body = SaveDoctorResponse),
        (status = 200, description = "Doctor updated", body = SaveDoctorResponse),
        (status = 404, description = "Doctor to update not found"),
        (status = 409, description = "Email already in use"),
        (status = 422, description = "Form failed validation")
    )
)]
#[instrument(skip(state, form), fields(id = ?form.id, email = %form.email), err)]
pub async fn save_doctor(
    State(state): State<AppState>,
    Json(form): Json<DoctorForm>,
) -> Result<impl IntoResponse> {
    match form.id {
        Some(id) => {
            let doctor = state.doctors.update(id, &form).await?;
            info!(id, "Updated doctor");
            let message = format!("Doctor '{}' has been updated successfully!", doctor.full_name());
            Ok((
                StatusCode::OK,
                Json(SaveDoctorResponse {
                    message,
                    doctor: doctor.into(),
                }),
            ))
        }
        None => {
            let doctor = state.doctors.create(&form).await?;
            info!(id = doctor.id, "Created doctor");
            let message = format!("Doctor '{}' has been added successfully!", doctor.full_name());
            Ok((
                StatusCode::CREATED,
                Json(SaveDoctorResponse {
                    message,
                    doctor: doctor.into(),
                }),
            ))
        }
    }
}

/// Fetch a single doctor record.
#[utoipa::path(
    get,
    path = "/doctors/view/{id}",
    tag = "doctors",
    params(("id" = i64, Path, description = "Doctor identifier")),
    responses(
        (status = 200, description = "Doctor record", body = DoctorResponse),
        (status = 404, description = "No doctor with this id")
    )
)]
#[instrument(skip(state), err)]
pub async fn view_doctor(
    State(state): State<AppState>,
    Path(id): Path<DoctorId>,
) -> Result<Json<DoctorResponse>> {
    let doctor = state.doctors.get(id).await?.ok_or_else(|| Error::NotFound {
        resource: "Doctor".to_string(),
        id: id.to_string(),
    })?;
    Ok(Json(doctor.into()))
}

/// Fetch a doctor as a pre-filled edit form.
#[utoipa::path(
    get,
    path = "/doctors/edit/{id}",
    tag = "doctors",
    params(("id" = i64, Path, description = "Doctor identifier")),
    responses(
        (status = 200, description = "Form pre-filled from the record", body = DoctorForm),
        (status = 404, description = "No doctor with this id")
    )
)]
#[instrument(skip(state), err)]
pub async fn edit_doctor(
    State(state): State<AppState>,
    Path(id): Path<DoctorId>,
) -> Result<Json<DoctorForm>> {
    let doctor = state.doctors.get(id).await?.ok_or_else(|| Error::NotFound {
        resource: "Doctor".to_string(),
        id: id.to_string(),
    })?;
    Ok(Json(doctor.into()))
}

/// Delete a doctor record.
#[utoipa::path(
    get,
    path = "/doctors/delete/{id}",
    tag = "doctors",
    params(("id" = i64, Path, description = "Doctor identifier")),
    responses(
        (status = 200, description = "Doctor deleted", body = MessageResponse),
        (status = 404, description = "No doctor with this id")
    )
)]
#[instrument(skip(state), err)]
pub async fn delete_doctor(
    State(state): State<AppState>,
    Path(id): Path<DoctorId>,
) -> Result<Json<MessageResponse>> {
    let doctor = state.doctors.delete(id).await?;
    info!(id, "Deleted doctor");
    Ok(Json(MessageResponse {
        message: format!("Doctor '{}' has been deleted successfully!", doctor.full_name()),
    }))
}

/// Search doctors by name, specialization, or hospital.
///
/// An unknown or missing `type` falls back to a name search; an empty
/// `query` returns the full listing.
#[utoipa::path(
    get,
    path = "/doctors/search",
    tag = "doctors",
    params(SearchParams),
    responses(
        (status = 200, description = "Matching doctors, newest first", body = DoctorListResponse)
    )
)]
#[instrument(skip(state), fields(query = ?params.query, search_type = ?params.search_type), err)]
pub async fn search_doctors(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<DoctorListResponse>> {
    let search_type = SearchType::from_param(params.search_type.as_deref());
    let doctors = state.doctors.search(params.query.as_deref(), search_type).await?;
    debug!(count = doctors.len(), "Search complete");
    Ok(Json(DoctorListResponse::new(doctors).with_search(params.query, search_type)))
}

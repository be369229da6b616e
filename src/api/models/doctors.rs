//! API request/response models for doctors.

use crate::db::models::doctors::DoctorDBResponse;
use crate::errors::FieldError;
use crate::types::DoctorId;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

/// Doctor form payload for `POST /doctors/save`.
///
/// With no `id` this is a create; with an `id` it is an update of that
/// record. `GET /doctors/new` and `GET /doctors/edit/{id}` both return this
/// shape so clients drive one save form for both flows.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct DoctorForm {
    pub id: Option<DoctorId>,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone_number: String,
    #[serde(default)]
    pub specialization: String,
    // Option rather than a defaulted integer: an omitted field must fail
    // validation as missing, not slip through as 0 years.
    pub years_of_experience: Option<i64>,
    #[serde(default)]
    pub hospital_clinic: String,
    pub date_of_birth: Option<NaiveDate>,
    pub address: Option<String>,
}

impl DoctorForm {
    /// Field-level validation of required and well-formedness rules.
    ///
    /// Collects every failure rather than stopping at the first so the whole
    /// form can be annotated in one round trip.
    pub fn validate(&self) -> Result<(), Vec<FieldError>> {
        let mut errors = Vec::new();

        if self.first_name.trim().is_empty() {
            errors.push(FieldError::new("first_name", "First name is required"));
        }
        if self.last_name.trim().is_empty() {
            errors.push(FieldError::new("last_name", "Last name is required"));
        }
        if self.email.trim().is_empty() {
            errors.push(FieldError::new("email", "Email is required"));
        } else if !is_valid_email(&self.email) {
            errors.push(FieldError::new("email", "Email should be valid"));
        }
        if self.phone_number.trim().is_empty() {
            errors.push(FieldError::new("phone_number", "Phone number is required"));
        }
        if self.specialization.trim().is_empty() {
            errors.push(FieldError::new("specialization", "Specialization is required"));
        }
        match self.years_of_experience {
            None => {
                errors.push(FieldError::new("years_of_experience", "Years of experience is required"));
            }
            Some(years) if years < 0 => {
                errors.push(FieldError::new(
                    "years_of_experience",
                    "Years of experience must be non-negative",
                ));
            }
            Some(_) => {}
        }
        if self.hospital_clinic.trim().is_empty() {
            errors.push(FieldError::new("hospital_clinic", "Hospital/Clinic is required"));
        }
        if let Some(dob) = self.date_of_birth
            && dob >= Utc::now().date_naive()
        {
            errors.push(FieldError::new("date_of_birth", "Date of birth must be in the past"));
        }

        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }
}

impl From<DoctorDBResponse> for DoctorForm {
    fn from(db: DoctorDBResponse) -> Self {
        Self {
            id: Some(db.id),
            first_name: db.first_name,
            last_name: db.last_name,
            email: db.email,
            phone_number: db.phone_number,
            specialization: db.specialization,
            years_of_experience: Some(db.years_of_experience),
            hospital_clinic: db.hospital_clinic,
            date_of_birth: db.date_of_birth,
            address: db.address,
        }
    }
}

/// Syntactic email check: one `@`, non-empty local part, domain with a dot
/// that is not at either edge, no whitespace anywhere.
fn is_valid_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
        && domain.len() > 2
}

/// Doctor response model
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DoctorResponse {
    pub id: DoctorId,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone_number: String,
    pub specialization: String,
    pub years_of_experience: i64,
    pub hospital_clinic: String,
    pub date_of_birth: Option<NaiveDate>,
    pub address: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<DoctorDBResponse> for DoctorResponse {
    fn from(db: DoctorDBResponse) -> Self {
        Self {
            id: db.id,
            first_name: db.first_name,
            last_name: db.last_name,
            email: db.email,
            phone_number: db.phone_number,
            specialization: db.specialization,
            years_of_experience: db.years_of_experience,
            hospital_clinic: db.hospital_clinic,
            date_of_birth: db.date_of_birth,
            address: db.address,
            created_at: db.created_at,
            updated_at: db.updated_at,
        }
    }
}

/// Listing response for `/doctors/list` and `/doctors/search`
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DoctorListResponse {
    pub doctors: Vec<DoctorResponse>,
    pub total_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search_query: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search_type: Option<String>,
}

impl DoctorListResponse {
    pub fn new(doctors: Vec<DoctorDBResponse>) -> Self {
        let doctors: Vec<DoctorResponse> = doctors.into_iter().map(Into::into).collect();
        Self {
            total_count: doctors.len(),
            doctors,
            search_query: None,
            search_type: None,
        }
    }

    pub fn with_search(mut self, query: Option<String>, search_type: SearchType) -> Self {
        self.search_query = query;
        self.search_type = Some(search_type.as_str().to_string());
        self
    }
}

/// Response for a successful save, carrying a one-time display message for
/// the client to surface
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SaveDoctorResponse {
    pub message: String,
    pub doctor: DoctorResponse,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

/// Query parameters for `/doctors/search`
#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
pub struct SearchParams {
    /// Search text; empty or missing returns the full listing
    pub query: Option<String>,
    /// One of `name`, `specialization`, `hospital` (default: `name`)
    #[serde(rename = "type")]
    pub search_type: Option<String>,
}

/// Which field a search runs against. Unknown selectors fall back to a
/// name search rather than erroring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchType {
    #[default]
    Name,
    Specialization,
    Hospital,
}

impl SearchType {
    pub fn from_param(param: Option<&str>) -> Self {
        match param {
            Some("specialization") => SearchType::Specialization,
            Some("hospital") => SearchType::Hospital,
            _ => SearchType::Name,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SearchType::Name => "name",
            SearchType::Specialization => "specialization",
            SearchType::Hospital => "hospital",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_form() -> DoctorForm {
        DoctorForm {
            id: None,
            first_name: "Jane".to_string(),
            last_name: "Doe".to_string(),
            email: "jane@example.com".to_string(),
            phone_number: "+1-555-0100".to_string(),
            specialization: "Cardiology".to_string(),
            years_of_experience: Some(7),
            hospital_clinic: "General Hospital".to_string(),
            date_of_birth: Some(NaiveDate::from_ymd_opt(1985, 3, 14).unwrap()),
            address: Some("12 Main St".to_string()),
        }
    }

    #[test]
    fn valid_form_passes() {
        assert!(valid_form().validate().is_ok());
    }

    #[test]
    fn blank_required_fields_are_collected() {
        let form = DoctorForm {
            first_name: "   ".to_string(),
            phone_number: String::new(),
            ..valid_form()
        };
        let errors = form.validate().unwrap_err();
        let fields: Vec<&str> = errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, vec!["first_name", "phone_number"]);
    }

    #[test]
    fn malformed_emails_are_rejected() {
        for bad in ["janeexample.com", "jane@", "@example.com", "jane@nodot", "a b@example.com"] {
            let form = DoctorForm {
                email: bad.to_string(),
                ..valid_form()
            };
            assert!(form.validate().is_err(), "expected {bad:?} to be rejected");
        }
    }

    #[test]
    fn negative_experience_is_rejected() {
        let form = DoctorForm {
            years_of_experience: Some(-1),
            ..valid_form()
        };
        let errors = form.validate().unwrap_err();
        assert_eq!(errors[0].field, "years_of_experience");
    }

    #[test]
    fn missing_experience_is_rejected() {
        let form = DoctorForm {
            years_of_experience: None,
            ..valid_form()
        };
        let errors = form.validate().unwrap_err();
        assert_eq!(errors[0].field, "years_of_experience");
        assert_eq!(errors[0].message, "Years of experience is required");
    }

    #[test]
    fn future_date_of_birth_is_rejected() {
        let form = DoctorForm {
            date_of_birth: Some(Utc::now().date_naive() + chrono::Days::new(1)),
            ..valid_form()
        };
        let errors = form.validate().unwrap_err();
        assert_eq!(errors[0].field, "date_of_birth");
    }

    #[test]
    fn search_type_falls_back_to_name() {
        assert_eq!(SearchType::from_param(None), SearchType::Name);
        assert_eq!(SearchType::from_param(Some("specialization")), SearchType::Specialization);
        assert_eq!(SearchType::from_param(Some("hospital")), SearchType::Hospital);
        assert_eq!(SearchType::from_param(Some("bogus")), SearchType::Name);
    }
}

//! Database models for doctors.

use crate::api::models::doctors::DoctorForm;
use crate::types::DoctorId;
use chrono::{DateTime, NaiveDate, Utc};

/// Database request for creating a new doctor
#[derive(Debug, Clone)]
pub struct DoctorCreateDBRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone_number: String,
    pub specialization: String,
    pub years_of_experience: i64,
    pub hospital_clinic: String,
    pub date_of_birth: Option<NaiveDate>,
    pub address: Option<String>,
}

impl From<DoctorForm> for DoctorCreateDBRequest {
    fn from(form: DoctorForm) -> Self {
        Self {
            first_name: form.first_name,
            last_name: form.last_name,
            email: form.email,
            phone_number: form.phone_number,
            specialization: form.specialization,
            years_of_experience: form.years_of_experience.unwrap_or_default(),
            hospital_clinic: form.hospital_clinic,
            date_of_birth: form.date_of_birth,
            address: form.address,
        }
    }
}

/// Database request for updating a doctor.
///
/// Every mutable field is overwritten on update; only the identifier and
/// created_at are preserved. This matches the save semantics of the edit
/// form, which always submits the full record.
#[derive(Debug, Clone)]
pub struct DoctorUpdateDBRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone_number: String,
    pub specialization: String,
    pub years_of_experience: i64,
    pub hospital_clinic: String,
    pub date_of_birth: Option<NaiveDate>,
    pub address: Option<String>,
}

impl From<DoctorForm> for DoctorUpdateDBRequest {
    fn from(form: DoctorForm) -> Self {
        Self {
            first_name: form.first_name,
            last_name: form.last_name,
            email: form.email,
            phone_number: form.phone_number,
            specialization: form.specialization,
            years_of_experience: form.years_of_experience.unwrap_or_default(),
            hospital_clinic: form.hospital_clinic,
            date_of_birth: form.date_of_birth,
            address: form.address,
        }
    }
}

/// Database response for a doctor
#[derive(Debug, Clone, PartialEq)]
pub struct DoctorDBResponse {
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

impl DoctorDBResponse {
    /// Display name used in success messages ("Doctor 'Jane Doe' ...")
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

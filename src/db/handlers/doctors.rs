//! Database repository for doctors.

use crate::{
    db::{
        errors::{DbError, Result},
        handlers::repository::Repository,
        models::doctors::{DoctorCreateDBRequest, DoctorDBResponse, DoctorUpdateDBRequest},
    },
    types::DoctorId,
};
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::{FromRow, SqliteConnection};
use tracing::instrument;

/// Filter for listing doctors. Currently empty - the listing is always the
/// full table - but kept as the extension point for pagination.
#[derive(Debug, Clone, Default)]
pub struct DoctorFilter {}

// Database entity model
#[derive(Debug, Clone, FromRow)]
struct Doctor {
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

impl From<Doctor> for DoctorDBResponse {
    fn from(doctor: Doctor) -> Self {
        Self {
            id: doctor.id,
            first_name: doctor.first_name,
            last_name: doctor.last_name,
            email: doctor.email,
            phone_number: doctor.phone_number,
            specialization: doctor.specialization,
            years_of_experience: doctor.years_of_experience,
            hospital_clinic: doctor.hospital_clinic,
            date_of_birth: doctor.date_of_birth,
            address: doctor.address,
            created_at: doctor.created_at,
            updated_at: doctor.updated_at,
        }
    }
}

pub struct Doctors<'c> {
    db: &'c mut SqliteConnection,
}

// Listings are newest first; id is the tiebreak so records created in the
// same timestamp tick still come back in insertion-reversed order.
const ORDER_NEWEST_FIRST: &str = "ORDER BY created_at DESC, id DESC";

#[async_trait::async_trait]
impl<'c> Repository for Doctors<'c> {
    type CreateRequest = DoctorCreateDBRequest;
    type UpdateRequest = DoctorUpdateDBRequest;
    type Response = DoctorDBResponse;
    type Id = DoctorId;
    type Filter = DoctorFilter;

    #[instrument(skip(self, request), fields(email = %request.email), err)]
    async fn create(&mut self, request: &Self::CreateRequest) -> Result<Self::Response> {
        // created_at and updated_at are set from the same instant so a fresh
        // record always satisfies created_at == updated_at.
        let now = Utc::now();

        let doctor = sqlx::query_as::<_, Doctor>(
            r#"
            INSERT INTO doctors (first_name, last_name, email, phone_number, specialization,
                                 years_of_experience, hospital_clinic, date_of_birth, address,
                                 created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?10)
            RETURNING *
            "#,
        )
        .bind(&request.first_name)
        .bind(&request.last_name)
        .bind(&request.email)
        .bind(&request.phone_number)
        .bind(&request.specialization)
        .bind(request.years_of_experience)
        .bind(&request.hospital_clinic)
        .bind(request.date_of_birth)
        .bind(&request.address)
        .bind(now)
        .fetch_one(&mut *self.db)
        .await?;

        Ok(doctor.into())
    }

    #[instrument(skip(self), err)]
    async fn get_by_id(&mut self, id: Self::Id) -> Result<Option<Self::Response>> {
        let doctor = sqlx::query_as::<_, Doctor>("SELECT * FROM doctors WHERE id = ?1")
            .bind(id)
            .fetch_optional(&mut *self.db)
            .await?;

        Ok(doctor.map(Into::into))
    }

    #[instrument(skip(self, _filter), err)]
    async fn list(&mut self, _filter: &Self::Filter) -> Result<Vec<Self::Response>> {
        let doctors = sqlx::query_as::<_, Doctor>(&format!(
            "SELECT * FROM doctors {ORDER_NEWEST_FIRST}"
        ))
        .fetch_all(&mut *self.db)
        .await?;

        Ok(doctors.into_iter().map(Into::into).collect())
    }

    #[instrument(skip(self, request), fields(email = %request.email), err)]
    async fn update(&mut self, id: Self::Id, request: &Self::UpdateRequest) -> Result<Self::Response> {
        let now = Utc::now();

        // created_at is deliberately untouched; updated_at is refreshed on
        // every save.
        let doctor = sqlx::query_as::<_, Doctor>(
            r#"
            UPDATE doctors SET
                first_name = ?2,
                last_name = ?3,
                email = ?4,
                phone_number = ?5,
                specialization = ?6,
                years_of_experience = ?7,
                hospital_clinic = ?8,
                date_of_birth = ?9,
                address = ?10,
                updated_at = ?11
            WHERE id = ?1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&request.first_name)
        .bind(&request.last_name)
        .bind(&request.email)
        .bind(&request.phone_number)
        .bind(&request.specialization)
        .bind(request.years_of_experience)
        .bind(&request.hospital_clinic)
        .bind(request.date_of_birth)
        .bind(&request.address)
        .bind(now)
        .fetch_optional(&mut *self.db)
        .await?
        .ok_or(DbError::NotFound)?;

        Ok(doctor.into())
    }

    #[instrument(skip(self), err)]
    async fn delete(&mut self, id: Self::Id) -> Result<bool> {
        let result = sqlx::query("DELETE FROM doctors WHERE id = ?1")
            .bind(id)
            .execute(&mut *self.db)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

impl<'c> Doctors<'c> {
    pub fn new(db: &'c mut SqliteConnection) -> Self {
        Self { db }
    }

    #[instrument(skip(self), err)]
    pub async fn exists_by_id(&mut self, id: DoctorId) -> Result<bool> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM doctors WHERE id = ?1)")
            .bind(id)
            .fetch_one(&mut *self.db)
            .await?;

        Ok(exists)
    }

    #[instrument(skip(self, email), err)]
    pub async fn email_exists(&mut self, email: &str) -> Result<bool> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM doctors WHERE email = ?1)")
            .bind(email)
            .fetch_one(&mut *self.db)
            .await?;

        Ok(exists)
    }

    /// Whether the email is held by a doctor other than `id`. Used on update
    /// so a doctor can keep their own email.
    #[instrument(skip(self, email), err)]
    pub async fn email_taken_by_other(&mut self, email: &str, id: DoctorId) -> Result<bool> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM doctors WHERE email = ?1 AND id != ?2)")
                .bind(email)
                .bind(id)
                .fetch_one(&mut *self.db)
                .await?;

        Ok(exists)
    }

    /// Case-insensitive substring match against first OR last name.
    #[instrument(skip(self, name), err)]
    pub async fn find_by_name(&mut self, name: &str) -> Result<Vec<DoctorDBResponse>> {
        let doctors = sqlx::query_as::<_, Doctor>(&format!(
            r#"
            SELECT * FROM doctors
            WHERE LOWER(first_name) LIKE '%' || LOWER(?1) || '%'
               OR LOWER(last_name) LIKE '%' || LOWER(?1) || '%'
            {ORDER_NEWEST_FIRST}
            "#
        ))
        .bind(name)
        .fetch_all(&mut *self.db)
        .await?;

        Ok(doctors.into_iter().map(Into::into).collect())
    }

    #[instrument(skip(self, specialization), err)]
    pub async fn find_by_specialization(&mut self, specialization: &str) -> Result<Vec<DoctorDBResponse>> {
        self.find_by_field_substring("specialization", specialization).await
    }

    #[instrument(skip(self, hospital_clinic), err)]
    pub async fn find_by_hospital(&mut self, hospital_clinic: &str) -> Result<Vec<DoctorDBResponse>> {
        self.find_by_field_substring("hospital_clinic", hospital_clinic).await
    }

    /// Inclusive range filter on years of experience.
    #[instrument(skip(self), err)]
    pub async fn find_by_experience_range(&mut self, min_years: i64, max_years: i64) -> Result<Vec<DoctorDBResponse>> {
        let doctors = sqlx::query_as::<_, Doctor>(&format!(
            "SELECT * FROM doctors WHERE years_of_experience BETWEEN ?1 AND ?2 {ORDER_NEWEST_FIRST}"
        ))
        .bind(min_years)
        .bind(max_years)
        .fetch_all(&mut *self.db)
        .await?;

        Ok(doctors.into_iter().map(Into::into).collect())
    }

    #[instrument(skip(self), err)]
    pub async fn count(&mut self) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM doctors")
            .fetch_one(&mut *self.db)
            .await?;

        Ok(count)
    }

    // `column` is one of our own column names, never caller input.
    async fn find_by_field_substring(&mut self, column: &str, text: &str) -> Result<Vec<DoctorDBResponse>> {
        let doctors = sqlx::query_as::<_, Doctor>(&format!(
            "SELECT * FROM doctors WHERE LOWER({column}) LIKE '%' || LOWER(?1) || '%' {ORDER_NEWEST_FIRST}"
        ))
        .bind(text)
        .fetch_all(&mut *self.db)
        .await?;

        Ok(doctors.into_iter().map(Into::into).collect())
    }
}

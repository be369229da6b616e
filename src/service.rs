//! Business rules for doctor records.
//!
//! The service layer sits between the HTTP handlers and the repository. It
//! owns the two business rules this system has - email uniqueness on
//! create/update and NotFound on operations against missing identifiers -
//! and dispatches search requests to the matching repository query.
//!
//! The duplicate-email pre-checks here are best-effort, not transactional:
//! the UNIQUE constraint on the email column is the authoritative guard, and
//! a racing writer that slips past the pre-check surfaces as a
//! [`DbError::UniqueViolation`](crate::db::errors::DbError) carrying the same
//! duplicate-email condition to the caller.

use crate::{
    api::models::doctors::{DoctorForm, SearchType},
    db::handlers::{Doctors, Repository, doctors::DoctorFilter},
    db::models::doctors::{DoctorCreateDBRequest, DoctorDBResponse, DoctorUpdateDBRequest},
    errors::{Error, Result},
    types::DoctorId,
};
use sqlx::SqlitePool;
use tracing::instrument;

#[derive(Debug, Clone)]
pub struct DoctorService {
    db: SqlitePool,
}

impl DoctorService {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    /// Create a new doctor record.
    ///
    /// Returns the persisted record with identifier and timestamps
    /// populated; `created_at == updated_at` on the returned record.
    #[instrument(skip(self, form), fields(email = %form.email), err)]
    pub async fn create(&self, form: &DoctorForm) -> Result<DoctorDBResponse> {
        form.validate().map_err(|errors| Error::Validation { errors })?;

        let mut tx = self.db.begin().await?;
        let mut repo = Doctors::new(&mut tx);

        if repo.email_exists(&form.email).await? {
            return Err(Error::DuplicateEmail {
                email: form.email.clone(),
            });
        }

        let created = repo.create(&DoctorCreateDBRequest::from(form.clone())).await?;
        tx.commit().await?;

        Ok(created)
    }

    /// Overwrite the mutable fields of an existing record.
    #[instrument(skip(self, form), fields(email = %form.email), err)]
    pub async fn update(&self, id: DoctorId, form: &DoctorForm) -> Result<DoctorDBResponse> {
        form.validate().map_err(|errors| Error::Validation { errors })?;

        let mut tx = self.db.begin().await?;
        let mut repo = Doctors::new(&mut tx);

        // A doctor keeping their own email is fine; only another record
        // holding it is a conflict.
        if repo.email_taken_by_other(&form.email, id).await? {
            return Err(Error::DuplicateEmail {
                email: form.email.clone(),
            });
        }

        let updated = repo
            .update(id, &DoctorUpdateDBRequest::from(form.clone()))
            .await
            .map_err(|err| not_found_on_missing(err, id))?;
        tx.commit().await?;

        Ok(updated)
    }

    /// Delete a record. Irrecoverable - there is no soft delete.
    #[instrument(skip(self), err)]
    pub async fn delete(&self, id: DoctorId) -> Result<DoctorDBResponse> {
        let mut tx = self.db.begin().await?;
        let mut repo = Doctors::new(&mut tx);

        let doctor = repo.get_by_id(id).await?.ok_or_else(|| Error::NotFound {
            resource: "Doctor".to_string(),
            id: id.to_string(),
        })?;
        repo.delete(id).await?;
        tx.commit().await?;

        Ok(doctor)
    }

    #[instrument(skip(self), err)]
    pub async fn get(&self, id: DoctorId) -> Result<Option<DoctorDBResponse>> {
        let mut tx = self.db.begin().await?;
        let mut repo = Doctors::new(&mut tx);
        let doctor = repo.get_by_id(id).await?;
        tx.commit().await?;
        Ok(doctor)
    }

    /// Full listing, newest first.
    #[instrument(skip(self), err)]
    pub async fn list(&self) -> Result<Vec<DoctorDBResponse>> {
        let mut tx = self.db.begin().await?;
        let mut repo = Doctors::new(&mut tx);
        let doctors = repo.list(&DoctorFilter::default()).await?;
        tx.commit().await?;
        Ok(doctors)
    }

    /// Dispatch a search to the matching repository query. An empty or
    /// missing query string returns the full listing.
    #[instrument(skip(self, query), err)]
    pub async fn search(&self, query: Option<&str>, search_type: SearchType) -> Result<Vec<DoctorDBResponse>> {
        let trimmed = query.map(str::trim).filter(|q| !q.is_empty());
        let Some(text) = trimmed else {
            return self.list().await;
        };

        let mut tx = self.db.begin().await?;
        let mut repo = Doctors::new(&mut tx);
        let doctors = match search_type {
            SearchType::Specialization => repo.find_by_specialization(text).await?,
            SearchType::Hospital => repo.find_by_hospital(text).await?,
            SearchType::Name => repo.find_by_name(text).await?,
        };
        tx.commit().await?;
        Ok(doctors)
    }

    /// Inclusive experience-range lookup.
    #[instrument(skip(self), err)]
    pub async fn find_by_experience_range(&self, min_years: i64, max_years: i64) -> Result<Vec<DoctorDBResponse>> {
        let mut tx = self.db.begin().await?;
        let mut repo = Doctors::new(&mut tx);
        let doctors = repo.find_by_experience_range(min_years, max_years).await?;
        tx.commit().await?;
        Ok(doctors)
    }

    #[instrument(skip(self), err)]
    pub async fn count(&self) -> Result<i64> {
        let mut tx = self.db.begin().await?;
        let mut repo = Doctors::new(&mut tx);
        let count = repo.count().await?;
        tx.commit().await?;
        Ok(count)
    }
}

fn not_found_on_missing(err: crate::db::errors::DbError, id: DoctorId) -> Error {
    match err {
        crate::db::errors::DbError::NotFound => Error::NotFound {
            resource: "Doctor".to_string(),
            id: id.to_string(),
        },
        other => Error::Database(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::models::doctors::DoctorForm;
    use sqlx::SqlitePool;

    fn form(email: &str, specialization: &str) -> DoctorForm {
        DoctorForm {
            id: None,
            first_name: "Jane".to_string(),
            last_name: "Doe".to_string(),
            email: email.to_string(),
            phone_number: "+1-555-0100".to_string(),
            specialization: specialization.to_string(),
            years_of_experience: Some(7),
            hospital_clinic: "General Hospital".to_string(),
            date_of_birth: None,
            address: None,
        }
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_create_with_unique_email_succeeds(pool: SqlitePool) {
        let service = DoctorService::new(pool);

        let created = service.create(&form("jane@example.com", "Cardiology")).await.unwrap();

        assert!(created.id > 0);
        assert_eq!(created.created_at, created.updated_at);
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_create_duplicate_email_is_rejected(pool: SqlitePool) {
        let service = DoctorService::new(pool);

        service.create(&form("jane@example.com", "Cardiology")).await.unwrap();
        let err = service.create(&form("jane@example.com", "Dermatology")).await.unwrap_err();

        assert!(matches!(err, Error::DuplicateEmail { .. }));
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_create_invalid_form_reports_fields(pool: SqlitePool) {
        let service = DoctorService::new(pool);

        let bad = DoctorForm {
            first_name: String::new(),
            ..form("jane@example.com", "Cardiology")
        };
        let err = service.create(&bad).await.unwrap_err();

        match err {
            Error::Validation { errors } => {
                assert_eq!(errors.len(), 1);
                assert_eq!(errors[0].field, "first_name");
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_update_keeps_own_email(pool: SqlitePool) {
        let service = DoctorService::new(pool);

        let created = service.create(&form("jane@example.com", "Cardiology")).await.unwrap();

        let mut update = form("jane@example.com", "Oncology");
        update.id = Some(created.id);
        let updated = service.update(created.id, &update).await.unwrap();

        assert_eq!(updated.specialization, "Oncology");
        assert_eq!(updated.created_at, created.created_at);
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_update_to_anothers_email_is_rejected(pool: SqlitePool) {
        let service = DoctorService::new(pool);

        service.create(&form("jane@example.com", "Cardiology")).await.unwrap();
        let other = service.create(&form("john@example.com", "Dermatology")).await.unwrap();

        let err = service
            .update(other.id, &form("jane@example.com", "Dermatology"))
            .await
            .unwrap_err();

        assert!(matches!(err, Error::DuplicateEmail { .. }));
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_update_and_delete_missing_are_not_found(pool: SqlitePool) {
        let service = DoctorService::new(pool);

        let err = service.update(999, &form("jane@example.com", "Cardiology")).await.unwrap_err();
        assert!(matches!(err, Error::NotFound { .. }));

        let err = service.delete(999).await.unwrap_err();
        assert!(matches!(err, Error::NotFound { .. }));
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_delete_removes_record(pool: SqlitePool) {
        let service = DoctorService::new(pool);

        let created = service.create(&form("jane@example.com", "Cardiology")).await.unwrap();
        let deleted = service.delete(created.id).await.unwrap();
        assert_eq!(deleted.id, created.id);

        assert!(service.get(created.id).await.unwrap().is_none());
        assert_eq!(service.count().await.unwrap(), 0);
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_search_dispatch_and_empty_query(pool: SqlitePool) {
        let service = DoctorService::new(pool);

        let a = service.create(&form("a@x.com", "Cardiology")).await.unwrap();
        let b = service.create(&form("b@x.com", "Dermatology")).await.unwrap();

        // Specialization search finds only the matching record
        let hits = service.search(Some("derma"), SearchType::Specialization).await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, b.id);

        // Empty query returns the full listing, newest first
        let all = service.search(Some("   "), SearchType::Name).await.unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].id, b.id);
        assert_eq!(all[1].id, a.id);

        let all = service.search(None, SearchType::Name).await.unwrap();
        assert_eq!(all.len(), 2);
    }
}

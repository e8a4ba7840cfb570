use crate::models::registration::{
    looks_like_email, BackendStatus, Registration, SubmissionRequest, ValidationError,
};
use crate::repositories::registration_repository::{RegistrationRepository, RepositoryError};
use std::sync::Arc;

#[derive(Debug, thiserror::Error)]
pub enum RegistrationServiceError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("Repository error: {0}")]
    RepositoryError(#[from] RepositoryError),
}

pub struct RegistrationService {
    repository: Arc<dyn RegistrationRepository>,
}

impl RegistrationService {
    pub fn new(repository: Arc<dyn RegistrationRepository>) -> Self {
        Self { repository }
    }

    /// Validate a submission and store it, returning the new row id.
    ///
    /// Nothing is written unless every required field is present and
    /// consent resolves to true.
    pub async fn submit(&self, request: SubmissionRequest) -> Result<i64, RegistrationServiceError> {
        let registration = request.validate()?;

        // The browser enforces the address shape; the server only checks presence.
        if !looks_like_email(&registration.email) {
            tracing::warn!(
                "Storing registration with malformed email address: {:?}",
                registration.email
            );
        }

        let id = self.repository.insert_registration(&registration).await?;
        tracing::info!("Stored registration {}", id);

        Ok(id)
    }

    pub async fn backend_status(&self) -> Result<BackendStatus, RegistrationServiceError> {
        Ok(self.repository.status().await?)
    }

    pub async fn list_registrations(
        &self,
        limit: Option<i64>,
        offset: Option<i64>,
    ) -> Result<Vec<Registration>, RegistrationServiceError> {
        Ok(self.repository.list_registrations(limit, offset).await?)
    }

    pub async fn count_registrations(&self) -> Result<i64, RegistrationServiceError> {
        Ok(self.repository.count_registrations().await?)
    }
}

pub mod registration_repository;

pub use registration_repository::{
    PostgresRegistrationRepository, RegistrationRepository, RepositoryError, RepositoryResult,
    SqliteRegistrationRepository,
};

pub mod diagnostic_handlers;
pub mod registration_handlers;

pub use diagnostic_handlers::test_db;
pub use registration_handlers::{submit_registration, SubmitResponse, SUBMIT_SUCCESS_MESSAGE};

pub mod registration;

pub use registration::{
    looks_like_email, parse_consent, BackendStatus, InvalidConsent, NewRegistration,
    Registration, SubmissionRequest, ValidationError,
};

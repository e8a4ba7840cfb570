use once_cell::sync::Lazy;
use regex::Regex;
use serde::{de, Deserialize, Deserializer, Serialize};
use serde_json::Value as JsonValue;
use sqlx::FromRow;

// Hardcoded regex pattern - guaranteed to be valid at compile time
#[allow(clippy::unwrap_used)]
static EMAIL_SHAPE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap());

/// Same `local@domain.tld` shape the browser form enforces before submitting.
pub fn looks_like_email(email: &str) -> bool {
    EMAIL_SHAPE.is_match(email)
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unrecognised consent value: {0}")]
pub struct InvalidConsent(pub String);

/// Resolve the consent flag to a strict boolean.
///
/// `true`, `"true"`, `1` and `"1"` mean consent was given. `false`, `"false"`,
/// `0`, `"0"`, `null` and an absent field mean it was not. Anything else is
/// rejected as unparseable.
pub fn parse_consent(value: Option<&JsonValue>) -> Result<bool, InvalidConsent> {
    match value {
        None | Some(JsonValue::Null) => Ok(false),
        Some(JsonValue::Bool(flag)) => Ok(*flag),
        Some(JsonValue::String(text)) => match text.as_str() {
            "true" | "1" => Ok(true),
            "false" | "0" | "" => Ok(false),
            other => Err(InvalidConsent(other.to_string())),
        },
        Some(JsonValue::Number(number)) => match number.as_f64() {
            Some(n) if n == 1.0 => Ok(true),
            Some(n) if n == 0.0 => Ok(false),
            _ => Err(InvalidConsent(number.to_string())),
        },
        Some(other) => Err(InvalidConsent(other.to_string())),
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Missing required fields: {}", .0.join(", "))]
    MissingFields(Vec<&'static str>),
    #[error("Consent not given.")]
    ConsentNotGiven,
}

/// Raw `POST /submit` body, before any server-side checks.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionRequest {
    #[serde(default, deserialize_with = "text_field")]
    pub first_name: Option<String>,
    #[serde(default, deserialize_with = "text_field")]
    pub last_name: Option<String>,
    #[serde(default, deserialize_with = "text_field")]
    pub username: Option<String>,
    #[serde(default, deserialize_with = "text_field")]
    pub gender: Option<String>,
    #[serde(default, deserialize_with = "text_field")]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "text_field")]
    pub contact_number: Option<String>,
    #[serde(default, deserialize_with = "text_field")]
    pub description: Option<String>,
    #[serde(default)]
    pub consent: Option<JsonValue>,
}

impl SubmissionRequest {
    /// Check required fields and consent, then trim everything into a row.
    ///
    /// Missing fields are reported before consent so the user sees every
    /// blank field in one pass.
    pub fn validate(&self) -> Result<NewRegistration, ValidationError> {
        let required = [
            ("firstName", &self.first_name),
            ("lastName", &self.last_name),
            ("gender", &self.gender),
            ("email", &self.email),
            ("contactNumber", &self.contact_number),
        ];

        let missing: Vec<&'static str> = required
            .iter()
            .filter(|(_, value)| trimmed(value).is_empty())
            .map(|(name, _)| *name)
            .collect();

        if !missing.is_empty() {
            return Err(ValidationError::MissingFields(missing));
        }

        match parse_consent(self.consent.as_ref()) {
            Ok(true) => {}
            Ok(false) => return Err(ValidationError::ConsentNotGiven),
            Err(e) => {
                tracing::debug!("Rejecting submission: {}", e);
                return Err(ValidationError::ConsentNotGiven);
            }
        }

        Ok(NewRegistration {
            first_name: trimmed(&self.first_name),
            last_name: trimmed(&self.last_name),
            username: trimmed(&self.username),
            gender: trimmed(&self.gender),
            email: trimmed(&self.email),
            contact_number: trimmed(&self.contact_number),
            description: trimmed(&self.description),
            consent: true,
        })
    }
}

fn trimmed(value: &Option<String>) -> String {
    value.as_deref().map(str::trim).unwrap_or_default().to_string()
}

// Browsers and scripts sometimes send phone numbers as JSON numbers
fn text_field<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<JsonValue>::deserialize(deserializer)? {
        None | Some(JsonValue::Null) => Ok(None),
        Some(JsonValue::String(text)) => Ok(Some(text)),
        Some(JsonValue::Number(number)) => Ok(number_text(&number)),
        Some(other) => Err(de::Error::invalid_type(
            de::Unexpected::Other(json_kind(&other)),
            &"a string or number",
        )),
    }
}

// Zero counts as blank; whole numbers render without a fraction ("5551234", not "5551234.0")
fn number_text(number: &serde_json::Number) -> Option<String> {
    if let Some(whole) = number.as_i64() {
        return (whole != 0).then(|| whole.to_string());
    }
    if let Some(whole) = number.as_u64() {
        return Some(whole.to_string());
    }
    let value = number.as_f64()?;
    if value == 0.0 {
        None
    } else if value.fract() == 0.0 && value.abs() < 1e21 {
        Some(format!("{value:.0}"))
    } else {
        Some(value.to_string())
    }
}

fn json_kind(value: &JsonValue) -> &'static str {
    match value {
        JsonValue::Bool(_) => "boolean",
        JsonValue::Array(_) => "array",
        JsonValue::Object(_) => "object",
        _ => "value",
    }
}

/// A trimmed, consented registration ready to be written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewRegistration {
    pub first_name: String,
    pub last_name: String,
    pub username: String,
    pub gender: String,
    pub email: String,
    pub contact_number: String,
    pub description: String,
    pub consent: bool,
}

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Registration {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub username: Option<String>,
    pub gender: String,
    pub email: String,
    pub contact_number: String,
    pub description: Option<String>,
    pub consent: bool,
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BackendStatus {
    pub db: String,
    pub time: String,
}

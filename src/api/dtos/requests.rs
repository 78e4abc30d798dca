use crate::domain::models::tourist::RegistrationProfile;
use crate::error::AppError;
use serde::Deserialize;
use serde_json::{Map, Value};

#[derive(Deserialize)]
pub struct CallbackParams {
    pub code: Option<String>,
    pub state: Option<String>,
    pub error: Option<String>,
}

/// Registration form as submitted. Every field is optional here so a missing
/// one can be reported by name instead of failing extraction.
#[derive(Deserialize, Default)]
pub struct RegistrationForm {
    pub name: Option<String>,
    #[serde(alias = "adhaar")]
    pub national_id: Option<String>,
    pub dob: Option<String>,
    pub gender: Option<String>,
    pub mobile: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
}

fn required(value: Option<String>, field: &str) -> Result<String, AppError> {
    value.ok_or_else(|| AppError::MissingField(format!("Missing field: {}", field)))
}

impl RegistrationForm {
    pub fn into_profile(self) -> Result<RegistrationProfile, AppError> {
        Ok(RegistrationProfile {
            name: required(self.name, "name")?,
            national_id: required(self.national_id, "national_id")?,
            date_of_birth: required(self.dob, "dob")?,
            gender: required(self.gender, "gender")?,
            mobile: required(self.mobile, "mobile")?,
            username: required(self.username, "username")?,
            password: required(self.password, "password")?,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

fn coordinate(body: &Map<String, Value>, key: &str) -> Option<Value> {
    match body.get(key) {
        None | Some(Value::Null) => None,
        Some(v) => Some(v.clone()),
    }
}

impl Coordinates {
    /// Parses a location update body. The content type is not checked.
    pub fn from_body(bytes: &[u8]) -> Result<Self, AppError> {
        let value: Value = serde_json::from_slice(bytes)
            .map_err(|_| AppError::MalformedInput("Invalid JSON".into()))?;
        let body = value.as_object()
            .ok_or_else(|| AppError::MalformedInput("Invalid JSON".into()))?;

        let (lat, lng) = match (coordinate(body, "latitude"), coordinate(body, "longitude")) {
            (Some(lat), Some(lng)) => (lat, lng),
            _ => return Err(AppError::MissingField("Latitude or longitude missing".into())),
        };

        match (lat.as_f64(), lng.as_f64()) {
            (Some(latitude), Some(longitude)) => Ok(Self { latitude, longitude }),
            _ => Err(AppError::MalformedInput("Latitude and longitude must be numbers".into())),
        }
    }
}

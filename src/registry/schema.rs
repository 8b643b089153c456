use std::collections::{BTreeMap, BTreeSet};

use crate::models::*;

pub const REQUIRED: &str = "This field is required.";
pub const NOT_NULL: &str = "May not be null.";

const MIN_SECRET_CHARS: usize = 5;
const PHONE_CHARS: usize = 12;

/// Typed error for payloads that break one or more field constraints.
///
/// Carries every violation found, keyed by field name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub fields: BTreeMap<String, String>,
}

impl ValidationError {
    pub fn new() -> Self {
        Self {
            fields: BTreeMap::new(),
        }
    }

    /// A single-field error, e.g. for body decoding failures
    pub fn field(name: &str, message: impl Into<String>) -> Self {
        let mut err = Self::new();
        err.add(name, message);
        err
    }

    pub fn add(&mut self, name: &str, message: impl Into<String>) {
        self.fields.insert(name.to_string(), message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl Default for ValidationError {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "invalid device")?;
        for (i, (name, message)) in self.fields.iter().enumerate() {
            let sep = if i == 0 { ": " } else { "; " };
            write!(f, "{}{} {}", sep, name, message)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationError {}

/// DeviceSchema holds the field constraints for device payloads.
///
/// The model enumeration is fixed when the schema is built from the seed
/// records and never grows afterwards.
#[derive(Debug, Clone)]
pub struct DeviceSchema {
    models: BTreeSet<String>,
}

impl DeviceSchema {
    pub fn new<I, S>(models: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            models: models.into_iter().map(Into::into).collect(),
        }
    }

    /// Derive the model enumeration from the seeded devices
    pub fn from_devices<'a>(devices: impl IntoIterator<Item = &'a Device>) -> Self {
        Self::new(devices.into_iter().map(|d| d.device_model.clone()))
    }

    pub fn models(&self) -> &BTreeSet<String> {
        &self.models
    }

    /// Check a payload and build the device it describes, applying defaults.
    ///
    /// The returned device carries `id` 0; the registry assigns the real one.
    pub fn validate(&self, payload: DevicePayload) -> Result<Device, ValidationError> {
        let mut errors = ValidationError::new();

        if let Some(id) = payload.id {
            if id < MIN_DEVICE_ID {
                errors.add("id", format!("Must be greater than or equal to {}.", MIN_DEVICE_ID));
            } else if id > MAX_DEVICE_ID {
                errors.add("id", format!("Must be less than or equal to {}.", MAX_DEVICE_ID));
            }
        }

        let device_model = match payload.device_model {
            Some(Some(model)) if self.models.contains(&model) => model,
            Some(Some(_)) => {
                errors.add("device_model", one_of(self.models.iter().map(String::as_str)));
                String::new()
            }
            Some(None) => {
                errors.add("device_model", NOT_NULL);
                String::new()
            }
            None => {
                errors.add("device_model", REQUIRED);
                String::new()
            }
        };

        let ip_address = not_null(&mut errors, "ip_address", payload.ip_address)
            .unwrap_or_else(|| DEFAULT_IP_ADDRESS.to_string());

        let remote_access_type =
            match not_null(&mut errors, "remote_access_type", payload.remote_access_type) {
                None => RemoteAccessType::default(),
                Some(raw) => RemoteAccessType::parse(&raw).unwrap_or_else(|| {
                    errors.add(
                        "remote_access_type",
                        one_of(RemoteAccessType::ALL.iter().map(|t| t.as_str())),
                    );
                    RemoteAccessType::default()
                }),
            };

        let login = not_null(&mut errors, "login", payload.login)
            .unwrap_or_else(|| DEFAULT_LOGIN.to_string());

        let password = not_null(&mut errors, "password", payload.password)
            .unwrap_or_else(|| DEFAULT_PASSWORD.to_string());
        check_min_chars(&mut errors, "password", &password, MIN_SECRET_CHARS);

        let secret = not_null(&mut errors, "secret", payload.secret)
            .unwrap_or_else(|| DEFAULT_SECRET.to_string());
        check_min_chars(&mut errors, "secret", &secret, MIN_SECRET_CHARS);

        let apc = not_null(&mut errors, "apc", payload.apc).unwrap_or(false);
        let free_access_to_site =
            not_null(&mut errors, "free_access_to_site", payload.free_access_to_site).unwrap_or(true);
        let start_date = not_null(&mut errors, "start_date", payload.start_date)
            .unwrap_or_else(default_start_date);

        let phone = match payload.phone {
            Some(Some(phone)) => {
                let chars = phone.chars().count();
                if chars < PHONE_CHARS {
                    errors.add("phone", format!("Must have at least {} characters.", PHONE_CHARS));
                } else if chars > PHONE_CHARS {
                    errors.add("phone", format!("Must have no more than {} characters.", PHONE_CHARS));
                }
                phone
            }
            Some(None) => {
                errors.add("phone", NOT_NULL);
                String::new()
            }
            None => {
                errors.add("phone", REQUIRED);
                String::new()
            }
        };

        if !errors.is_empty() {
            return Err(errors);
        }

        Ok(Device {
            id: 0,
            device_model,
            ip_address,
            remote_access_type,
            login,
            password,
            secret,
            apc,
            free_access_to_site,
            start_date,
            company_name: payload.company_name,
            city: payload.city,
            city_address: payload.city_address,
            owner: payload.owner,
            phone,
            email: payload.email,
        })
    }
}

/// Unwrap a non-nullable field; an explicit `null` is recorded as an error
/// and treated as absent so the remaining checks still run.
fn not_null<T>(errors: &mut ValidationError, field: &str, value: Option<Option<T>>) -> Option<T> {
    match value {
        Some(None) => {
            errors.add(field, NOT_NULL);
            None
        }
        other => other.flatten(),
    }
}

fn check_min_chars(errors: &mut ValidationError, field: &str, value: &str, min: usize) {
    if value.chars().count() < min {
        errors.add(field, format!("Must have at least {} characters.", min));
    }
}

fn one_of<'a>(choices: impl Iterator<Item = &'a str>) -> String {
    format!("Must be one of: {}.", choices.collect::<Vec<_>>().join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn schema() -> DeviceSchema {
        DeviceSchema::new(["Cisco 2960", "Juniper EX4200"])
    }

    fn payload() -> DevicePayload {
        DevicePayload {
            device_model: Some(Some("Cisco 2960".to_string())),
            phone: Some(Some("123456789012".to_string())),
            ..Default::default()
        }
    }

    #[test]
    fn test_minimal_payload_gets_defaults() {
        let device = schema().validate(payload()).unwrap();
        assert_eq!(device.ip_address, "127.0.0.1");
        assert_eq!(device.remote_access_type, RemoteAccessType::Ssh);
        assert_eq!(device.login, "cisco");
        assert_eq!(device.password, "cisco");
        assert_eq!(device.secret, "cisco");
        assert!(!device.apc);
        assert!(device.free_access_to_site);
        assert_eq!(device.start_date, default_start_date());
        assert_eq!(device.company_name, None);
    }

    #[test]
    fn test_unknown_model_rejected() {
        let mut p = payload();
        p.device_model = Some(Some("Brocade 6450".to_string()));
        let err = schema().validate(p).unwrap_err();
        assert_eq!(
            err.fields.get("device_model").map(String::as_str),
            Some("Must be one of: Cisco 2960, Juniper EX4200.")
        );
    }

    #[test]
    fn test_missing_required_fields() {
        let err = schema().validate(DevicePayload::default()).unwrap_err();
        assert_eq!(err.fields.get("device_model").map(String::as_str), Some(REQUIRED));
        assert_eq!(err.fields.get("phone").map(String::as_str), Some(REQUIRED));
    }

    #[test]
    fn test_null_rejected_for_non_nullable_fields() {
        let p: DevicePayload = serde_json::from_value(serde_json::json!({
            "device_model": "Cisco 2960",
            "phone": "123456789012",
            "password": null,
            "login": null,
            "apc": null,
            "remote_access_type": null
        }))
        .unwrap();

        let err = schema().validate(p).unwrap_err();
        for field in ["password", "login", "apc", "remote_access_type"] {
            assert_eq!(err.fields.get(field).map(String::as_str), Some(NOT_NULL), "{}", field);
        }
        assert_eq!(err.fields.len(), 4);
    }

    #[test]
    fn test_null_required_field_is_not_null_error() {
        let mut p = payload();
        p.device_model = Some(None);
        p.phone = Some(None);
        let err = schema().validate(p).unwrap_err();
        assert_eq!(err.fields.get("device_model").map(String::as_str), Some(NOT_NULL));
        assert_eq!(err.fields.get("phone").map(String::as_str), Some(NOT_NULL));
    }

    #[test]
    fn test_null_allowed_for_nullable_fields() {
        let p: DevicePayload = serde_json::from_value(serde_json::json!({
            "device_model": "Cisco 2960",
            "phone": "123456789012",
            "company_name": null,
            "city": null,
            "city_address": null,
            "owner": null,
            "email": null,
            "id": null
        }))
        .unwrap();

        let device = schema().validate(p).unwrap();
        assert_eq!(device.company_name, None);
        assert_eq!(device.email, None);
    }

    #[test]
    fn test_phone_must_be_twelve_chars() {
        for phone in ["12345678901", "1234567890123", ""] {
            let mut p = payload();
            p.phone = Some(Some(phone.to_string()));
            let err = schema().validate(p).unwrap_err();
            assert!(err.fields.contains_key("phone"), "phone {:?} accepted", phone);
        }

        // twelve characters, more than twelve bytes
        let mut p = payload();
        p.phone = Some(Some("+7 ☎ 1234567".to_string()));
        assert_eq!("+7 ☎ 1234567".chars().count(), 12);
        assert!(schema().validate(p).is_ok());
    }

    #[test]
    fn test_short_password_and_secret() {
        let mut p = payload();
        p.password = Some(Some("abcd".to_string()));
        p.secret = Some(Some("xy".to_string()));
        let err = schema().validate(p).unwrap_err();
        assert_eq!(err.fields.len(), 2);
        assert!(err.fields.contains_key("password"));
        assert!(err.fields.contains_key("secret"));
    }

    #[test]
    fn test_remote_access_type_enum() {
        let mut p = payload();
        p.remote_access_type = Some(Some("rdp".to_string()));
        let err = schema().validate(p).unwrap_err();
        assert_eq!(
            err.fields.get("remote_access_type").map(String::as_str),
            Some("Must be one of: ssh, telnet, http, https.")
        );

        let mut p = payload();
        p.remote_access_type = Some(Some("https".to_string()));
        assert_eq!(schema().validate(p).unwrap().remote_access_type, RemoteAccessType::Https);
    }

    #[test]
    fn test_id_range() {
        let mut p = payload();
        p.id = Some(0);
        assert!(schema().validate(p).unwrap_err().fields.contains_key("id"));

        let mut p = payload();
        p.id = Some(1000);
        assert!(schema().validate(p).unwrap_err().fields.contains_key("id"));

        let mut p = payload();
        p.id = Some(999);
        assert!(schema().validate(p).is_ok());
    }

    #[test]
    fn test_display_lists_fields() {
        let err = schema().validate(DevicePayload::default()).unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid device: device_model This field is required.; phone This field is required."
        );
    }
}

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

pub const DEFAULT_IP_ADDRESS: &str = "127.0.0.1";
pub const DEFAULT_LOGIN: &str = "cisco";
pub const DEFAULT_PASSWORD: &str = "cisco";
pub const DEFAULT_SECRET: &str = "cisco";

/// Lowest and highest id a device may carry
pub const MIN_DEVICE_ID: i64 = 1;
pub const MAX_DEVICE_ID: i64 = 999;

/// Start date used when a payload omits one (2010-01-01)
pub fn default_start_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2010, 1, 1).unwrap_or(NaiveDate::MIN)
}

/// How an operator reaches the device's management plane
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RemoteAccessType {
    #[default]
    Ssh,
    Telnet,
    Http,
    Https,
}

impl RemoteAccessType {
    pub const ALL: [RemoteAccessType; 4] = [Self::Ssh, Self::Telnet, Self::Http, Self::Https];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ssh => "ssh",
            Self::Telnet => "telnet",
            Self::Http => "http",
            Self::Https => "https",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.as_str() == value)
    }
}

/// Device represents one record of the in-memory inventory
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Device {
    pub id: i64,
    pub device_model: String,
    pub ip_address: String,
    pub remote_access_type: RemoteAccessType,
    pub login: String,
    pub password: String,
    pub secret: String,
    pub apc: bool,
    pub free_access_to_site: bool,
    pub start_date: NaiveDate,
    pub company_name: Option<String>,
    pub city: Option<String>,
    pub city_address: Option<String>,
    pub owner: Option<String>,
    pub phone: String,
    pub email: Option<String>,
}

/// DevicePayload is the body of a create or update request.
///
/// Fields that may not be null are `Option<Option<T>>`: the outer `None`
/// means the key was absent, `Some(None)` means an explicit `null`.
/// Defaults and constraints are applied by `DeviceSchema::validate`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DevicePayload {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default, deserialize_with = "present")]
    pub device_model: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub ip_address: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub remote_access_type: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub login: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub password: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub secret: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub apc: Option<Option<bool>>,
    #[serde(default, deserialize_with = "present")]
    pub free_access_to_site: Option<Option<bool>>,
    #[serde(default, deserialize_with = "present")]
    pub start_date: Option<Option<NaiveDate>>,
    #[serde(default)]
    pub company_name: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub city_address: Option<String>,
    #[serde(default)]
    pub owner: Option<String>,
    #[serde(default, deserialize_with = "present")]
    pub phone: Option<Option<String>>,
    #[serde(default)]
    pub email: Option<String>,
}

/// Only called for keys present in the body, so `null` lands as `Some(None)`
fn present<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// SeedDevice is a device as stored in the seed dataset, where dates are
/// written as `MM/DD/YYYY`.
#[derive(Debug, Clone, Deserialize)]
pub struct SeedDevice {
    pub id: i64,
    pub device_model: String,
    #[serde(default = "seed_defaults::ip_address")]
    pub ip_address: String,
    #[serde(default)]
    pub remote_access_type: RemoteAccessType,
    #[serde(default = "seed_defaults::login")]
    pub login: String,
    #[serde(default = "seed_defaults::password")]
    pub password: String,
    #[serde(default = "seed_defaults::secret")]
    pub secret: String,
    #[serde(default)]
    pub apc: bool,
    #[serde(default = "seed_defaults::free_access_to_site")]
    pub free_access_to_site: bool,
    #[serde(deserialize_with = "us_date::deserialize", default = "default_start_date")]
    pub start_date: NaiveDate,
    #[serde(default)]
    pub company_name: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub city_address: Option<String>,
    #[serde(default)]
    pub owner: Option<String>,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub email: Option<String>,
}

impl From<SeedDevice> for Device {
    fn from(seed: SeedDevice) -> Self {
        Self {
            id: seed.id,
            device_model: seed.device_model,
            ip_address: seed.ip_address,
            remote_access_type: seed.remote_access_type,
            login: seed.login,
            password: seed.password,
            secret: seed.secret,
            apc: seed.apc,
            free_access_to_site: seed.free_access_to_site,
            start_date: seed.start_date,
            company_name: seed.company_name,
            city: seed.city,
            city_address: seed.city_address,
            owner: seed.owner,
            phone: seed.phone,
            email: seed.email,
        }
    }
}

mod seed_defaults {
    pub fn ip_address() -> String {
        super::DEFAULT_IP_ADDRESS.to_string()
    }

    pub fn login() -> String {
        super::DEFAULT_LOGIN.to_string()
    }

    pub fn password() -> String {
        super::DEFAULT_PASSWORD.to_string()
    }

    pub fn secret() -> String {
        super::DEFAULT_SECRET.to_string()
    }

    pub fn free_access_to_site() -> bool {
        true
    }
}

/// Serde adapter for `MM/DD/YYYY` dates
pub mod us_date {
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer};

    pub const FORMAT: &str = "%m/%d/%Y";

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDate, D::Error> {
        let raw = String::deserialize(deserializer)?;
        NaiveDate::parse_from_str(raw.trim(), FORMAT).map_err(|e| {
            serde::de::Error::custom(format!("invalid date {:?} (expected MM/DD/YYYY): {}", raw, e))
        })
    }
}

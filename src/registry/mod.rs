pub mod schema;
pub mod seeds;

use anyhow::Result;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::models::*;

pub use schema::{DeviceSchema, ValidationError};

/// Typed error for "resource not found" - enables reliable downcast
/// in the API error handler instead of fragile string matching.
#[derive(Debug)]
pub struct NotFoundError {
    pub resource: String,
    pub id: String,
}

impl NotFoundError {
    pub fn new(resource: &str, id: impl ToString) -> Self {
        Self {
            resource: resource.to_string(),
            id: id.to_string(),
        }
    }
}

impl std::fmt::Display for NotFoundError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} not found: {}", self.resource, self.id)
    }
}

impl std::error::Error for NotFoundError {}

/// Typed error raised when no id is left to assign
#[derive(Debug)]
pub struct RegistryFullError {
    pub max_id: i64,
}

impl std::fmt::Display for RegistryFullError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "registry is full: ids are capped at {}", self.max_id)
    }
}

impl std::error::Error for RegistryFullError {}

/// Registry owns the in-memory device collection.
///
/// Cloning yields another handle to the same collection. Every operation
/// takes the single collection lock for its whole duration, so operations
/// are serialized.
#[derive(Clone)]
pub struct Registry {
    devices: Arc<Mutex<BTreeMap<i64, Device>>>,
    schema: Arc<DeviceSchema>,
}

impl Registry {
    /// Create a registry whose model enumeration is derived from `seed`
    pub fn seeded(seed: BTreeMap<i64, Device>) -> Self {
        let schema = DeviceSchema::from_devices(seed.values());
        Self::with_schema(seed, schema)
    }

    pub fn with_schema(devices: BTreeMap<i64, Device>, schema: DeviceSchema) -> Self {
        Self {
            devices: Arc::new(Mutex::new(devices)),
            schema: Arc::new(schema),
        }
    }

    pub fn schema(&self) -> &DeviceSchema {
        &self.schema
    }

    pub async fn count(&self) -> usize {
        self.devices.lock().await.len()
    }

    /// All devices, ascending by id
    pub async fn list(&self) -> Vec<Device> {
        self.devices.lock().await.values().cloned().collect()
    }

    pub async fn get(&self, id: i64) -> Option<Device> {
        self.devices.lock().await.get(&id).cloned()
    }

    /// Validate the payload and insert it under the next free id (`max + 1`)
    pub async fn create(&self, payload: DevicePayload) -> Result<Device> {
        let mut device = self.schema.validate(payload)?;

        let mut devices = self.devices.lock().await;
        let next_id = devices.keys().next_back().map_or(MIN_DEVICE_ID, |max| max + 1);
        if next_id > MAX_DEVICE_ID {
            return Err(RegistryFullError { max_id: MAX_DEVICE_ID }.into());
        }

        device.id = next_id;
        devices.insert(next_id, device.clone());
        tracing::info!("Created device {} ({})", device.id, device.device_model);
        Ok(device)
    }

    /// Replace the device stored under `id` with the validated payload.
    ///
    /// Any id in the payload is ignored; the stored record keeps `id`.
    pub async fn update(&self, id: i64, payload: DevicePayload) -> Result<Device> {
        let mut devices = self.devices.lock().await;
        let slot = devices
            .get_mut(&id)
            .ok_or_else(|| NotFoundError::new("device", id))?;

        let mut device = self.schema.validate(payload)?;
        device.id = id;
        *slot = device.clone();
        tracing::info!("Updated device {}", id);
        Ok(device)
    }

    pub async fn delete(&self, id: i64) -> Result<()> {
        let removed = self.devices.lock().await.remove(&id);
        match removed {
            Some(_) => {
                tracing::info!("Deleted device {}", id);
                Ok(())
            }
            None => Err(NotFoundError::new("device", id).into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio_test::{assert_err, assert_ok};

    fn seed_device(id: i64, model: &str) -> Device {
        Device {
            id,
            device_model: model.to_string(),
            ip_address: "10.0.0.1".to_string(),
            remote_access_type: RemoteAccessType::Telnet,
            login: "admin".to_string(),
            password: "secret1".to_string(),
            secret: "secret2".to_string(),
            apc: true,
            free_access_to_site: false,
            start_date: default_start_date(),
            company_name: Some("Acme".to_string()),
            city: None,
            city_address: None,
            owner: None,
            phone: "123456789012".to_string(),
            email: None,
        }
    }

    fn registry(ids: &[i64]) -> Registry {
        Registry::seeded(ids.iter().map(|&id| (id, seed_device(id, "modelA"))).collect())
    }

    fn payload(model: &str) -> DevicePayload {
        DevicePayload {
            device_model: Some(Some(model.to_string())),
            phone: Some(Some("123456789012".to_string())),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_create_assigns_max_plus_one() {
        let reg = registry(&[1]);
        let device = reg.create(payload("modelA")).await.unwrap();
        assert_eq!(device.id, 2);

        let reg = registry(&[3, 17, 5]);
        let first = reg.create(payload("modelA")).await.unwrap();
        let second = reg.create(payload("modelA")).await.unwrap();
        assert_eq!(first.id, 18);
        assert_eq!(second.id, 19);
    }

    #[tokio::test]
    async fn test_create_ignores_payload_id() {
        let reg = registry(&[1, 2]);
        let mut p = payload("modelA");
        p.id = Some(1);
        let device = reg.create(p).await.unwrap();
        assert_eq!(device.id, 3);
        assert_eq!(reg.get(1).await.unwrap().company_name.as_deref(), Some("Acme"));
    }

    #[tokio::test]
    async fn test_create_then_get_round_trips() {
        let reg = registry(&[1]);
        let mut p = payload("modelA");
        p.city = Some("Oslo".to_string());
        p.remote_access_type = Some(Some("https".to_string()));
        let created = reg.create(p).await.unwrap();
        assert_eq!(reg.get(created.id).await, Some(created));
    }

    #[tokio::test]
    async fn test_create_unknown_model_is_validation_error() {
        let reg = registry(&[1]);
        let err = reg.create(payload("modelB")).await.unwrap_err();
        assert!(err.downcast_ref::<ValidationError>().is_some());
        assert_eq!(reg.count().await, 1);
    }

    #[tokio::test]
    async fn test_create_in_empty_registry_starts_at_one() {
        let reg = Registry::with_schema(BTreeMap::new(), DeviceSchema::new(["modelA"]));
        assert_eq!(reg.create(payload("modelA")).await.unwrap().id, 1);
    }

    #[tokio::test]
    async fn test_create_fails_when_ids_exhausted() {
        let reg = registry(&[MAX_DEVICE_ID]);
        let err = reg.create(payload("modelA")).await.unwrap_err();
        assert!(err.downcast_ref::<RegistryFullError>().is_some());
    }

    #[tokio::test]
    async fn test_list_is_ordered_by_id() {
        let reg = registry(&[9, 2, 5]);
        let ids: Vec<i64> = reg.list().await.iter().map(|d| d.id).collect();
        assert_eq!(ids, vec![2, 5, 9]);
    }

    #[tokio::test]
    async fn test_update_forces_path_id_and_replaces() {
        let reg = registry(&[1, 2]);
        let mut p = payload("modelA");
        p.id = Some(7);
        let updated = reg.update(2, p).await.unwrap();

        assert_eq!(updated.id, 2);
        // full replace: omitted fields fall back to defaults
        assert_eq!(updated.company_name, None);
        assert_eq!(updated.login, DEFAULT_LOGIN);
        assert_eq!(reg.get(2).await, Some(updated));
        assert!(reg.get(7).await.is_none());
    }

    #[tokio::test]
    async fn test_update_missing_is_not_found() {
        let reg = registry(&[1]);
        let err = reg.update(42, payload("modelA")).await.unwrap_err();
        assert!(err.downcast_ref::<NotFoundError>().is_some());
    }

    #[tokio::test]
    async fn test_update_checks_existence_before_payload() {
        let reg = registry(&[1]);
        let err = reg.update(42, DevicePayload::default()).await.unwrap_err();
        assert!(err.downcast_ref::<NotFoundError>().is_some());

        let err = reg.update(1, DevicePayload::default()).await.unwrap_err();
        assert!(err.downcast_ref::<ValidationError>().is_some());
        assert_eq!(reg.get(1).await.unwrap().device_model, "modelA");
    }

    #[tokio::test]
    async fn test_delete_then_get_is_none() {
        let reg = registry(&[1, 2]);
        assert_ok!(reg.delete(2).await);
        assert!(reg.get(2).await.is_none());
        assert_err!(reg.delete(2).await);
        assert_eq!(reg.count().await, 1);
    }

    #[tokio::test]
    async fn test_models_fixed_at_seed_time() {
        let reg = registry(&[1]);
        reg.delete(1).await.unwrap();
        assert!(reg.schema().models().contains("modelA"));
        assert_eq!(reg.create(payload("modelA")).await.unwrap().id, 1);
    }
}

use std::collections::HashMap;
use std::sync::Mutex;

use serde_json::json;

use crate::{ClientError, Record, ResourceClient};

/// In-memory resource client backing demo mode and tests.
///
/// Commands are recorded for inspection; `stop`/`resume` also flip the
/// record's `status` field so a subsequent reload observes the effect the
/// way it would against a real control plane.
#[derive(Debug, Default)]
pub struct MemoryClient {
    collections: Mutex<HashMap<String, Vec<Record>>>,
    invocations: Mutex<Vec<(String, String, String)>>,
}

impl MemoryClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Client pre-seeded with a plausible set of dataflows.
    pub fn sample() -> Self {
        let client = Self::new();
        client.seed(
            "dataflow",
            vec![
                json!({
                    "id": "log-aggregation",
                    "status": "RUNNING",
                    "master": {"numOfInstances": 1},
                    "worker": {"numOfInstances": 4},
                }),
                json!({
                    "id": "web-event-router",
                    "status": "RUNNING",
                    "master": {"numOfInstances": 2},
                    "worker": {"numOfInstances": 8},
                }),
                json!({
                    "id": "ads-clickstream",
                    "status": "STOPPED",
                    "master": {"numOfInstances": 1},
                    "worker": {"numOfInstances": 2},
                }),
            ],
        );
        client.seed(
            "dataflow-history",
            vec![
                json!({
                    "id": "backfill-2026-07",
                    "status": "FINISHED",
                    "master": {"numOfInstances": 1},
                    "worker": {"numOfInstances": 16},
                }),
            ],
        );
        client
    }

    pub fn seed(&self, collection: &str, records: Vec<Record>) {
        self.collections
            .lock()
            .expect("collections lock poisoned")
            .insert(collection.to_string(), records);
    }

    /// Every `(collection, id, command)` triple invoked so far.
    pub fn invocations(&self) -> Vec<(String, String, String)> {
        self.invocations
            .lock()
            .expect("invocations lock poisoned")
            .clone()
    }
}

fn record_id(record: &Record) -> Option<&str> {
    record.get("id").and_then(|value| value.as_str())
}

impl ResourceClient for MemoryClient {
    fn list(&self, collection: &str) -> Result<Vec<Record>, ClientError> {
        Ok(self
            .collections
            .lock()
            .expect("collections lock poisoned")
            .get(collection)
            .cloned()
            .unwrap_or_default())
    }

    fn get(&self, collection: &str, id: &str) -> Result<Record, ClientError> {
        self.collections
            .lock()
            .expect("collections lock poisoned")
            .get(collection)
            .and_then(|records| records.iter().find(|r| record_id(r) == Some(id)))
            .cloned()
            .ok_or_else(|| ClientError::UnknownRecord {
                collection: collection.to_string(),
                id: id.to_string(),
            })
    }

    fn invoke(&self, collection: &str, id: &str, command: &str) -> Result<(), ClientError> {
        self.invocations
            .lock()
            .expect("invocations lock poisoned")
            .push((collection.to_string(), id.to_string(), command.to_string()));

        let new_status = match command {
            "stop" => Some("STOPPED"),
            "resume" => Some("RUNNING"),
            _ => None,
        };
        let mut collections = self.collections.lock().expect("collections lock poisoned");
        let record = collections
            .get_mut(collection)
            .and_then(|records| records.iter_mut().find(|r| record_id(r) == Some(id)))
            .ok_or_else(|| ClientError::UnknownRecord {
                collection: collection.to_string(),
                id: id.to_string(),
            })?;
        if let Some(status) = new_status
            && let Some(object) = record.as_object_mut()
        {
            object.insert("status".to_string(), json!(status));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invocations_are_recorded_in_order() {
        let client = MemoryClient::sample();
        client.invoke("dataflow", "log-aggregation", "stop").unwrap();
        client.invoke("dataflow", "log-aggregation", "resume").unwrap();
        assert_eq!(
            client.invocations(),
            vec![
                (
                    "dataflow".to_string(),
                    "log-aggregation".to_string(),
                    "stop".to_string()
                ),
                (
                    "dataflow".to_string(),
                    "log-aggregation".to_string(),
                    "resume".to_string()
                ),
            ]
        );
    }

    #[test]
    fn stop_flips_status_observed_on_next_list() {
        let client = MemoryClient::sample();
        client.invoke("dataflow", "log-aggregation", "stop").unwrap();
        let records = client.list("dataflow").unwrap();
        let stopped = records
            .iter()
            .find(|r| record_id(r) == Some("log-aggregation"))
            .unwrap();
        assert_eq!(stopped["status"], json!("STOPPED"));
    }

    #[test]
    fn unknown_record_is_an_error() {
        let client = MemoryClient::sample();
        assert!(matches!(
            client.invoke("dataflow", "missing", "stop"),
            Err(ClientError::UnknownRecord { .. })
        ));
        assert!(matches!(
            client.get("dataflow", "missing"),
            Err(ClientError::UnknownRecord { .. })
        ));
    }

    #[test]
    fn listing_unknown_collection_is_empty_not_an_error() {
        let client = MemoryClient::new();
        assert!(client.list("dataflow").unwrap().is_empty());
    }
}

//! In-memory fakes shared by unit tests.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::alerts::{AlertChannel, Notification};
use crate::error::MonitorError;
use crate::source::{resource_file, Access, HealthSource};

/// Health source serving canned payloads.
#[derive(Default)]
pub struct FakeSource {
    payloads: Mutex<HashMap<(Access, String), String>>,
    fetches: Mutex<Vec<(Access, String)>>,
}

impl FakeSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `body` for `resource`. Unknown resources fail with 404.
    pub fn set(&self, access: Access, resource: &str, body: &str) {
        self.payloads
            .lock()
            .insert((access, resource_file(resource)), body.to_string());
    }

    pub fn remove(&self, access: Access, resource: &str) {
        self.payloads.lock().remove(&(access, resource_file(resource)));
    }

    pub fn fetches(&self) -> Vec<(Access, String)> {
        self.fetches.lock().clone()
    }

    pub fn fetch_count(&self) -> usize {
        self.fetches.lock().len()
    }
}

#[async_trait]
impl HealthSource for FakeSource {
    async fn fetch(&self, resource: &str, access: Access) -> Result<String, MonitorError> {
        let resource = resource_file(resource);
        self.fetches.lock().push((access, resource.clone()));
        self.payloads
            .lock()
            .get(&(access, resource.clone()))
            .cloned()
            .ok_or(MonitorError::HttpStatus {
                resource,
                status: 404,
            })
    }
}

/// Channel recording every notification it receives.
#[derive(Clone, Default)]
pub struct RecordingChannel {
    sent: Arc<Mutex<Vec<Notification>>>,
    fail: bool,
}

impl RecordingChannel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            sent: Arc::default(),
            fail: true,
        }
    }

    pub fn sent(&self) -> Vec<Notification> {
        self.sent.lock().clone()
    }
}

#[async_trait]
impl AlertChannel for RecordingChannel {
    fn name(&self) -> &str {
        "recording"
    }

    async fn send(&self, notification: &Notification) -> Result<(), MonitorError> {
        if self.fail {
            return Err(MonitorError::AlertDelivery("recording channel down".to_string()));
        }
        self.sent.lock().push(notification.clone());
        Ok(())
    }
}

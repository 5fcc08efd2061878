//! Test doubles and common utilities for lifecycle contract tests
//!
//! The mock resource keeps its "remote" objects in a shared map and can be
//! told to fail any verb, so tests can observe exactly what the reconciler
//! commits to the store.

#![allow(dead_code)]

use async_trait::async_trait;
use secconf_core::error::{Error, Result};
use secconf_core::schema::{FieldKind, FieldSchema, Schema};
use secconf_core::{OpContext, Resource, ResourceData};
use serde_json::{Value, json};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub const MOCK_TYPE: &str = "mock_resource";

static MOCK_SCHEMA: Schema = Schema::new(&[
    FieldSchema::required("name", FieldKind::String),
    FieldSchema::optional("size", FieldKind::Int),
    FieldSchema::computed("output_text", FieldKind::String),
]);

/// A mock resource backed by an in-process "remote" map
#[derive(Default)]
pub struct MockResource {
    remote: Arc<Mutex<HashMap<String, i64>>>,
    pub fail_create: AtomicBool,
    pub fail_update: AtomicBool,
    pub fail_delete: AtomicBool,
    pub slow_update: AtomicBool,
    create_calls: AtomicUsize,
    read_calls: AtomicUsize,
    update_calls: AtomicUsize,
    delete_calls: AtomicUsize,
}

impl MockResource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn remote_size(&self, name: &str) -> Option<i64> {
        self.remote.lock().unwrap().get(name).copied()
    }

    pub fn create_calls(&self) -> usize {
        self.create_calls.load(Ordering::SeqCst)
    }

    pub fn read_calls(&self) -> usize {
        self.read_calls.load(Ordering::SeqCst)
    }

    pub fn update_calls(&self) -> usize {
        self.update_calls.load(Ordering::SeqCst)
    }

    pub fn delete_calls(&self) -> usize {
        self.delete_calls.load(Ordering::SeqCst)
    }

    fn write(&self, data: &ResourceData) -> Result<String> {
        let name = data.get_string("name").required("name")?;
        let size = data.get_int("size").or_default()?;
        self.remote.lock().unwrap().insert(name.clone(), size);
        Ok(name)
    }
}

#[async_trait]
impl Resource for MockResource {
    fn type_name(&self) -> &'static str {
        MOCK_TYPE
    }

    fn schema(&self) -> &'static Schema {
        &MOCK_SCHEMA
    }

    async fn create(&self, ctx: &OpContext, data: &mut ResourceData) -> Result<()> {
        self.create_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_create.load(Ordering::SeqCst) {
            return Err(Error::remote("CreateMock", Error::http("500 Internal Server Error")));
        }
        let name = self.write(data)?;
        data.set_id(name);
        self.read(ctx, data).await
    }

    async fn read(&self, _ctx: &OpContext, data: &mut ResourceData) -> Result<()> {
        self.read_calls.fetch_add(1, Ordering::SeqCst);
        let name = data
            .id()
            .map(str::to_string)
            .ok_or_else(|| Error::extraction("identifier is not set"))?;
        let size = self
            .remote_size(&name)
            .ok_or_else(|| Error::remote("GetMock", Error::not_found(name.clone())))?;

        data.set("name", &name)?;
        data.set("size", size)?;
        data.set_raw("output_text", Value::String(format!("{}={}", name, size)));
        Ok(())
    }

    async fn update(&self, ctx: &OpContext, data: &mut ResourceData) -> Result<()> {
        self.update_calls.fetch_add(1, Ordering::SeqCst);
        if self.slow_update.load(Ordering::SeqCst) {
            ctx.run("UpdateMock", async {
                tokio::time::sleep(Duration::from_secs(30)).await;
                Ok(())
            })
            .await?;
        }
        if self.fail_update.load(Ordering::SeqCst) {
            return Err(Error::remote("UpdateMock", Error::conflict("version locked")));
        }
        self.write(data)?;
        self.read(ctx, data).await
    }

    async fn delete(&self, _ctx: &OpContext, data: &mut ResourceData) -> Result<()> {
        self.delete_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_delete.load(Ordering::SeqCst) {
            return Err(Error::remote("RemoveMock", Error::http("503 Service Unavailable")));
        }
        if let Some(id) = data.id() {
            self.remote.lock().unwrap().remove(id);
        }
        data.clear_id();
        Ok(())
    }
}

/// Configuration for the mock resource
pub fn mock_config(name: &str, size: i64) -> ResourceData {
    ResourceData::from_attributes([("name", json!(name)), ("size", json!(size))])
}

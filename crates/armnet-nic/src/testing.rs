use armnet_core::query::QueryParams;
use armnet_core::{ArmContext, ResourceTransport, Result};
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;

mockall::mock! {
    pub Transport {}

    #[async_trait]
    impl ResourceTransport for Transport {
        async fn get(&self, path: &str, query: &QueryParams) -> Result<Value>;
        async fn put(&self, path: &str, query: &QueryParams, body: Value) -> Result<Value>;
        async fn delete(&self, path: &str, query: &QueryParams) -> Result<()>;
        async fn list(&self, path: &str, query: &QueryParams) -> Result<Vec<Value>>;
        async fn post(&self, path: &str, query: &QueryParams, body: Option<Value>) -> Result<Value>;
    }
}

pub const SUB: &str = "00000000-0000-0000-0000-000000000001";

pub fn context(transport: MockTransport) -> ArmContext {
    ArmContext::new(Arc::new(transport), SUB)
}

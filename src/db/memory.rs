use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::RwLock;

use super::{json_contains, EmployeeStore, StoreError};
use crate::models::employee::Employee;

/// In-process collection. Keeps insertion order, which is its native result order.
#[derive(Default)]
pub struct MemoryEmployeeStore {
    documents: RwLock<Vec<Employee>>,
}

impl MemoryEmployeeStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl EmployeeStore for MemoryEmployeeStore {
    async fn query(&self, filter: &Value) -> Result<Vec<Employee>, StoreError> {
        let documents = self.documents.read().await;
        let mut results = Vec::new();
        for employee in documents.iter() {
            let doc = serde_json::to_value(employee)
                .map_err(|err| StoreError::Backend(err.to_string()))?;
            if json_contains(&doc, filter) {
                results.push(employee.clone());
            }
        }
        Ok(results)
    }

    async fn read(&self, id: &str) -> Result<Employee, StoreError> {
        self.documents
            .read()
            .await
            .iter()
            .find(|employee| employee.id == id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    async fn create(&self, employee: &Employee) -> Result<(), StoreError> {
        let mut documents = self.documents.write().await;
        if documents.iter().any(|existing| existing.id == employee.id) {
            return Err(StoreError::Conflict(employee.id.clone()));
        }
        documents.push(employee.clone());
        Ok(())
    }

    async fn upsert(&self, employee: &Employee) -> Result<Employee, StoreError> {
        let mut documents = self.documents.write().await;
        match documents.iter_mut().find(|existing| existing.id == employee.id) {
            Some(existing) => *existing = employee.clone(),
            None => documents.push(employee.clone()),
        }
        Ok(employee.clone())
    }

    async fn delete(&self, id: &str) -> Result<(), StoreError> {
        let mut documents = self.documents.write().await;
        let before = documents.len();
        documents.retain(|employee| employee.id != id);
        if documents.len() == before {
            return Err(StoreError::NotFound(id.to_string()));
        }
        Ok(())
    }
}

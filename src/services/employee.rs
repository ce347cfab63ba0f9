use std::sync::Arc;

use log::{error, info};
use uuid::Uuid;

use crate::db::{parse_filter, EmployeeStore, StoreError};
use crate::models::employee::{AddEmployeeCommand, Employee, UpdateEmployeeCommand};

/// Data access for employees. Each operation issues exactly one store call
/// and hands store failures back untranslated.
#[derive(Clone)]
pub struct EmployeeService {
    store: Arc<dyn EmployeeStore>,
}

impl EmployeeService {
    pub fn new(store: Arc<dyn EmployeeStore>) -> Self {
        EmployeeService { store }
    }

    pub async fn list(&self, filter_query: &str) -> Result<Vec<Employee>, StoreError> {
        info!("Listing employees with filter {:?}", filter_query);
        let filter = parse_filter(filter_query)?;
        self.store.query(&filter).await.map_err(|err| {
            error!("Listing employees failed: {}", err);
            err
        })
    }

    pub async fn get(&self, id: &str) -> Result<Employee, StoreError> {
        info!("Reading employee {}", id);
        self.store.read(id).await.map_err(|err| {
            error!("Reading employee {} failed: {}", id, err);
            err
        })
    }

    pub async fn add(&self, command: AddEmployeeCommand) -> Result<String, StoreError> {
        let id = Uuid::new_v4().to_string();
        let employee = Employee::from_add(id.clone(), command);
        info!(
            "Adding employee {} {} as {}",
            employee.first_name, employee.last_name, id
        );

        self.store.create(&employee).await.map_err(|err| {
            error!(
                "Adding employee {} {} failed: {}",
                employee.first_name, employee.last_name, err
            );
            err
        })?;
        Ok(id)
    }

    pub async fn update(&self, command: UpdateEmployeeCommand) -> Result<Employee, StoreError> {
        let employee = Employee::from(command);
        info!("Upserting employee {}", employee.id);
        self.store.upsert(&employee).await.map_err(|err| {
            error!("Upserting employee {} failed: {}", employee.id, err);
            err
        })
    }

    pub async fn delete(&self, id: &str) -> Result<bool, StoreError> {
        info!("Deleting employee {}", id);
        self.store.delete(id).await.map_err(|err| {
            error!("Deleting employee {} failed: {}", id, err);
            err
        })?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MemoryEmployeeStore;

    fn service() -> EmployeeService {
        EmployeeService::new(Arc::new(MemoryEmployeeStore::new()))
    }

    fn add_command(first_name: &str) -> AddEmployeeCommand {
        AddEmployeeCommand {
            first_name: Some(first_name.into()),
            last_name: Some("Hopper".into()),
            age: Some(40),
            email: Some("grace@navy.com".into()),
            phone: Some("555-0101".into()),
            address: Some("1 Harbor Way".into()),
            company: Some("navy".into()),
            about: Some("Compilers".into()),
            eye_color: Some("blue".into()),
        }
    }

    #[tokio::test]
    async fn add_generates_fresh_ids_that_round_trip() {
        let service = service();
        let first = service.add(add_command("Grace")).await.unwrap();
        let second = service.add(add_command("Grace")).await.unwrap();
        assert_ne!(first, second);
        assert!(Uuid::parse_str(&first).is_ok());

        let stored = service.get(&first).await.unwrap();
        assert_eq!(stored, Employee::from_add(first.clone(), add_command("Grace")));
    }

    #[tokio::test]
    async fn update_of_unknown_id_creates_record() {
        let service = service();
        let command = UpdateEmployeeCommand {
            id: Some("fresh-id".into()),
            first_name: Some("Linus".into()),
            ..Default::default()
        };

        let stored = service.update(command).await.unwrap();
        assert_eq!(stored.id, "fresh-id");
        assert_eq!(service.get("fresh-id").await.unwrap().first_name, "Linus");
    }

    #[tokio::test]
    async fn list_rejects_malformed_filter_before_store_access() {
        let err = service().list("SELECT * FROM c").await.unwrap_err();
        assert!(matches!(err, StoreError::Invalid(_)));
    }

    #[tokio::test]
    async fn delete_reports_true_then_not_found() {
        let service = service();
        let id = service.add(add_command("Grace")).await.unwrap();

        assert!(service.delete(&id).await.unwrap());
        assert!(matches!(service.delete(&id).await, Err(StoreError::NotFound(_))));
        assert!(matches!(service.get(&id).await, Err(StoreError::NotFound(_))));
    }
}

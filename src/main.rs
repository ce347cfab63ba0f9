use std::io;
use std::sync::Arc;

use actix_web::{middleware::Logger, web, App, HttpServer};
use dotenv::dotenv;
use log::info;

use employee_records::config::{Settings, StoreBackend};
use employee_records::db::{EmployeeStore, MemoryEmployeeStore, PgEmployeeStore};
use employee_records::services::employee::EmployeeService;

#[actix_web::main]
async fn main() -> io::Result<()> {
    dotenv().ok();
    env_logger::init();

    let settings = Settings::from_env().map_err(io::Error::other)?;
    if settings.telemetry_key.is_some() {
        info!("Telemetry key configured; no exporter is attached");
    }

    let store: Arc<dyn EmployeeStore> = match &settings.backend {
        StoreBackend::Postgres { database_url } => {
            let store = PgEmployeeStore::connect(
                database_url,
                &settings.collection,
                settings.max_connections,
            )
            .await
            .map_err(io::Error::other)?;
            store.ensure_collection().await.map_err(io::Error::other)?;
            info!("Using PostgreSQL collection {}", settings.collection);
            Arc::new(store)
        }
        StoreBackend::Memory => {
            info!("Using in-memory employee store");
            Arc::new(MemoryEmployeeStore::new())
        }
    };
    let service = web::Data::new(EmployeeService::new(store));

    info!("Starting server at {}", settings.bind_address);

    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .app_data(service.clone())
            .configure(employee_records::configure)
    })
    .bind(&settings.bind_address)?
    .run()
    .await
}

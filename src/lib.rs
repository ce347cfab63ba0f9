pub mod config;
pub mod db;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod services;
pub mod utils;

use actix_web::web;

use crate::errors::AppError;

/// Registers the employee routes and the JSON body / query string error handlers.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(|err, _req| {
        AppError::BadRequest(vec![err.to_string()]).into()
    }))
    .app_data(web::QueryConfig::default().error_handler(|err, _req| {
        AppError::BadRequest(vec![err.to_string()]).into()
    }))
    .service(
        web::resource("/api/employee")
            .route(web::get().to(handlers::employee::get_employees))
            .route(web::post().to(handlers::employee::create_employee))
            .route(web::put().to(handlers::employee::update_employee)),
    )
    .service(
        web::resource("/api/employee/{id}")
            .route(web::get().to(handlers::employee::get_employee))
            .route(web::delete().to(handlers::employee::delete_employee)),
    );
}

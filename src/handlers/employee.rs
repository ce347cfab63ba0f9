use actix_web::{web, HttpResponse};
use log::info;

use crate::errors::AppError;
use crate::models::employee::{
    AddEmployeeCommand, AddEmployeeResponse, EmployeeQueryParams, UpdateEmployeeCommand,
};
use crate::services::employee::EmployeeService;
use crate::utils::validation::{check_email_domain, validate_payload};

pub async fn get_employees(
    service: web::Data<EmployeeService>,
    query: web::Query<EmployeeQueryParams>,
) -> Result<HttpResponse, AppError> {
    info!("Retrieving employee list");
    let employees = service.list(&query.to_filter()).await?;
    Ok(HttpResponse::Ok().json(employees))
}

pub async fn get_employee(
    service: web::Data<EmployeeService>,
    id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let id = id.into_inner();
    info!("Retrieving employee {}", id);
    let employee = service.get(&id).await?;
    Ok(HttpResponse::Ok().json(employee))
}

pub async fn create_employee(
    service: web::Data<EmployeeService>,
    command: web::Json<AddEmployeeCommand>,
) -> Result<HttpResponse, AppError> {
    let command = command.into_inner();
    validate_payload(&command)?;
    check_email_domain(command.email.as_deref(), command.company.as_deref())?;

    info!(
        "Creating employee {} {}",
        command.first_name.as_deref().unwrap_or_default(),
        command.last_name.as_deref().unwrap_or_default()
    );
    let id = service.add(command).await?;
    Ok(HttpResponse::Ok().json(AddEmployeeResponse { id }))
}

pub async fn update_employee(
    service: web::Data<EmployeeService>,
    command: web::Json<UpdateEmployeeCommand>,
) -> Result<HttpResponse, AppError> {
    let command = command.into_inner();
    validate_payload(&command)?;
    check_email_domain(command.email.as_deref(), command.company.as_deref())?;

    info!(
        "Updating employee {}",
        command.id.as_deref().unwrap_or_default()
    );
    let employee = service.update(command).await?;
    Ok(HttpResponse::Ok().json(employee))
}

pub async fn delete_employee(
    service: web::Data<EmployeeService>,
    id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let id = id.into_inner();
    info!("Deleting employee {}", id);
    let deleted = service.delete(&id).await?;
    Ok(HttpResponse::Ok().json(deleted))
}

use std::borrow::Cow;

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct Employee {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub age: i32,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub company: String,
    pub about: String,
    pub eye_color: String,
}

/// Body of `POST /api/employee`. Fields are optional at the serde level so
/// that missing ones are reported by the validator instead of the JSON parser.
#[derive(Deserialize, Serialize, Validate, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct AddEmployeeCommand {
    #[validate(
        required(message = "firstName is required"),
        length(min = 1, message = "firstName must not be empty")
    )]
    pub first_name: Option<String>,
    #[validate(
        required(message = "lastName is required"),
        length(min = 1, message = "lastName must not be empty")
    )]
    pub last_name: Option<String>,
    #[validate(
        required(message = "age is required"),
        range(min = 0, max = 150, message = "age must be between 0 and 150")
    )]
    pub age: Option<i32>,
    #[validate(
        required(message = "email is required"),
        email(message = "email must be a valid email address")
    )]
    pub email: Option<String>,
    #[validate(
        required(message = "phone is required"),
        length(min = 1, message = "phone must not be empty")
    )]
    pub phone: Option<String>,
    #[validate(
        required(message = "address is required"),
        length(min = 1, message = "address must not be empty")
    )]
    pub address: Option<String>,
    #[validate(
        required(message = "company is required"),
        length(min = 1, message = "company must not be empty")
    )]
    pub company: Option<String>,
    #[validate(
        required(message = "about is required"),
        length(min = 1, message = "about must not be empty")
    )]
    pub about: Option<String>,
    #[validate(
        required(message = "eyeColor is required"),
        length(min = 1, message = "eyeColor must not be empty")
    )]
    pub eye_color: Option<String>,
}

/// Body of `PUT /api/employee`. A full replacement: omitted fields are stored empty.
#[derive(Deserialize, Serialize, Validate, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct UpdateEmployeeCommand {
    #[validate(
        required(message = "id is required"),
        custom = "validate_id"
    )]
    pub id: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    #[validate(range(min = 0, max = 150, message = "age must be between 0 and 150"))]
    pub age: Option<i32>,
    #[validate(email(message = "email must be a valid email address"))]
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub company: Option<String>,
    pub about: Option<String>,
    pub eye_color: Option<String>,
}

/// Ids are partition keys; whitespace-only ones are rejected.
fn validate_id(id: &str) -> Result<(), ValidationError> {
    if id.trim().is_empty() {
        let mut err = ValidationError::new("blank");
        err.message = Some(Cow::from("id must not be blank"));
        return Err(err);
    }
    Ok(())
}

impl Employee {
    pub fn from_add(id: String, command: AddEmployeeCommand) -> Self {
        Employee {
            id,
            first_name: command.first_name.unwrap_or_default(),
            last_name: command.last_name.unwrap_or_default(),
            age: command.age.unwrap_or_default(),
            email: command.email.unwrap_or_default(),
            phone: command.phone.unwrap_or_default(),
            address: command.address.unwrap_or_default(),
            company: command.company.unwrap_or_default(),
            about: command.about.unwrap_or_default(),
            eye_color: command.eye_color.unwrap_or_default(),
        }
    }
}

impl From<UpdateEmployeeCommand> for Employee {
    fn from(command: UpdateEmployeeCommand) -> Self {
        Employee {
            id: command.id.unwrap_or_default(),
            first_name: command.first_name.unwrap_or_default(),
            last_name: command.last_name.unwrap_or_default(),
            age: command.age.unwrap_or_default(),
            email: command.email.unwrap_or_default(),
            phone: command.phone.unwrap_or_default(),
            address: command.address.unwrap_or_default(),
            company: command.company.unwrap_or_default(),
            about: command.about.unwrap_or_default(),
            eye_color: command.eye_color.unwrap_or_default(),
        }
    }
}

#[derive(Serialize, Deserialize, Debug)]
pub struct AddEmployeeResponse {
    pub id: String,
}

#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeQueryParams {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub company: Option<String>,
    pub eye_color: Option<String>,
}

impl EmployeeQueryParams {
    /// Builds a containment filter from the given parameters; empty when none are set.
    pub fn to_filter(&self) -> String {
        let mut filter = serde_json::Map::new();
        let pairs = [
            ("firstName", &self.first_name),
            ("lastName", &self.last_name),
            ("company", &self.company),
            ("eyeColor", &self.eye_color),
        ];
        for (key, value) in pairs {
            if let Some(value) = value {
                filter.insert(key.to_string(), serde_json::Value::String(value.clone()));
            }
        }

        if filter.is_empty() {
            String::new()
        } else {
            serde_json::Value::Object(filter).to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn update_fills_omitted_fields_with_empty_values() {
        let command: UpdateEmployeeCommand =
            serde_json::from_value(json!({ "id": "e-1", "firstName": "Ada" })).unwrap();
        let employee = Employee::from(command);

        assert_eq!(employee.id, "e-1");
        assert_eq!(employee.first_name, "Ada");
        assert_eq!(employee.last_name, "");
        assert_eq!(employee.age, 0);
        assert_eq!(employee.eye_color, "");
    }

    #[test]
    fn employee_serializes_camel_case() {
        let employee = Employee {
            id: "e-1".into(),
            eye_color: "green".into(),
            ..Default::default()
        };
        let value = serde_json::to_value(&employee).unwrap();
        assert_eq!(value["eyeColor"], "green");
        assert!(value.get("eye_color").is_none());
    }

    #[test]
    fn query_params_build_containment_filter() {
        assert_eq!(EmployeeQueryParams::default().to_filter(), "");

        let params = EmployeeQueryParams {
            company: Some("acme".into()),
            eye_color: Some("blue".into()),
            ..Default::default()
        };
        let filter: serde_json::Value = serde_json::from_str(&params.to_filter()).unwrap();
        assert_eq!(filter, json!({ "company": "acme", "eyeColor": "blue" }));
    }
}

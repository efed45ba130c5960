use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::model::{Car, CarDto};

/// One row of the car list.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct CarsIndexViewModel {
    pub id: Uuid,
    pub name: String,
    pub model: String,
    pub engine: String,
    pub color: String,
    pub tire_count: i32,
}

impl From<&Car> for CarsIndexViewModel {
    fn from(car: &Car) -> Self {
        CarsIndexViewModel {
            id: car.id,
            name: car.name.clone(),
            model: car.model.clone(),
            engine: car.engine.clone(),
            color: car.color.clone(),
            tire_count: car.tire_count,
        }
    }
}

/// Form shared by the create and update screens.
///
/// `Id` and `TireCount` are kept as submitted so a value that does not parse
/// can be shown back to the user. Timestamps are display-only.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize, Validate)]
#[serde(rename_all = "PascalCase")]
pub struct CarsCreateUpdateViewModel {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    #[validate(required, length(min = 1))]
    pub name: Option<String>,
    #[serde(default)]
    #[validate(required, length(min = 1))]
    pub model: Option<String>,
    #[serde(default)]
    #[validate(required, length(min = 1))]
    pub engine: Option<String>,
    #[serde(default)]
    #[validate(required, length(min = 1))]
    pub color: Option<String>,
    #[serde(default)]
    pub tire_count: Option<String>,
    #[serde(default, skip_deserializing)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_deserializing)]
    pub modified_at: Option<DateTime<Utc>>,
}

impl CarsCreateUpdateViewModel {
    /// Shape validation for a create submission, errors in form order.
    pub fn check(&self) -> Vec<FieldError> {
        let mut found: Vec<FieldError> = match self.validate() {
            Ok(()) => Vec::new(),
            Err(errors) => errors
                .field_errors()
                .into_iter()
                .flat_map(|(field, errs)| {
                    let field = snake_case(&field);
                    errs.iter().map(move |err| FieldError {
                        field: field.clone(),
                        message: describe(&err.code).to_string(),
                    })
                })
                .collect(),
        };

        match parse_field::<i32>(&self.tire_count) {
            Ok(None) => found.push(FieldError::new("tire_count", "is required")),
            Ok(Some(count)) if count < 1 => {
                found.push(FieldError::new("tire_count", "must be greater than 0"))
            }
            Ok(Some(_)) => {}
            Err(()) => found.push(FieldError::new("tire_count", "is invalid")),
        }

        sort_in_form_order(&mut found);
        found
    }

    /// Shape validation for an update submission, which also needs an id.
    pub fn check_update(&self) -> Vec<FieldError> {
        let mut found = self.check();
        match parse_field::<Uuid>(&self.id) {
            Ok(Some(_)) => {}
            Ok(None) => found.push(FieldError::new("id", "is required")),
            Err(()) => found.push(FieldError::new("id", "is invalid")),
        }
        sort_in_form_order(&mut found);
        found
    }

    /// Unparseable `Id`/`TireCount` values become `None`; run a check first.
    pub fn to_dto(&self) -> CarDto {
        CarDto {
            id: parse_field(&self.id).ok().flatten(),
            name: self.name.clone(),
            model: self.model.clone(),
            engine: self.engine.clone(),
            color: self.color.clone(),
            tire_count: parse_field(&self.tire_count).ok().flatten(),
            created_at: None,
            modified_at: None,
        }
    }
}

impl From<&Car> for CarsCreateUpdateViewModel {
    fn from(car: &Car) -> Self {
        CarsCreateUpdateViewModel {
            id: Some(car.id.to_string()),
            name: Some(car.name.clone()),
            model: Some(car.model.clone()),
            engine: Some(car.engine.clone()),
            color: Some(car.color.clone()),
            tire_count: Some(car.tire_count.to_string()),
            created_at: Some(car.created_at),
            modified_at: Some(car.modified_at),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct CarsDetailsViewModel {
    pub id: Uuid,
    pub name: String,
    pub model: String,
    pub engine: String,
    pub color: String,
    pub tire_count: i32,
    pub created_at: DateTime<Utc>,
    pub modified_at: DateTime<Utc>,
}

impl From<&Car> for CarsDetailsViewModel {
    fn from(car: &Car) -> Self {
        CarsDetailsViewModel {
            id: car.id,
            name: car.name.clone(),
            model: car.model.clone(),
            engine: car.engine.clone(),
            color: car.color.clone(),
            tire_count: car.tire_count,
            created_at: car.created_at,
            modified_at: car.modified_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct CarsDeleteViewModel {
    pub id: Uuid,
    pub name: String,
    pub model: String,
    pub engine: String,
    pub color: String,
    pub tire_count: i32,
    pub created_at: DateTime<Utc>,
    pub modified_at: DateTime<Utc>,
}

impl From<&Car> for CarsDeleteViewModel {
    fn from(car: &Car) -> Self {
        CarsDeleteViewModel {
            id: car.id,
            name: car.name.clone(),
            model: car.model.clone(),
            engine: car.engine.clone(),
            color: car.color.clone(),
            tire_count: car.tire_count,
            created_at: car.created_at,
            modified_at: car.modified_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: &str, message: &str) -> Self {
        FieldError {
            field: field.to_string(),
            message: message.to_string(),
        }
    }
}

const FORM_FIELDS: [&str; 6] = ["id", "name", "model", "engine", "color", "tire_count"];

fn sort_in_form_order(errors: &mut [FieldError]) {
    errors.sort_by_key(|err| {
        FORM_FIELDS
            .iter()
            .position(|name| *name == err.field)
            .unwrap_or(FORM_FIELDS.len())
    });
}

/// A blank value is missing; anything else must parse.
fn parse_field<T: FromStr>(raw: &Option<String>) -> Result<Option<T>, ()> {
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => value.parse().map(Some).map_err(|_| ()),
    }
}

fn describe(code: &str) -> &'static str {
    match code {
        "required" => "is required",
        "length" => "must not be empty",
        "range" => "must be greater than 0",
        _ => "is invalid",
    }
}

/// `TireCount` and `tire_count` both become `tire_count`.
fn snake_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 2);
    for (i, ch) in name.chars().enumerate() {
        if ch.is_ascii_uppercase() {
            if i > 0 {
                out.push('_');
            }
            out.push(ch.to_ascii_lowercase());
        } else {
            out.push(ch);
        }
    }
    out
}

/// A rendered screen: `{"view": "<name>", "model": ..., "errors": [...]}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "view")]
pub enum CarsView {
    Index {
        model: Vec<CarsIndexViewModel>,
    },
    CreateUpdate {
        model: CarsCreateUpdateViewModel,
        errors: Vec<FieldError>,
    },
    Details {
        model: CarsDetailsViewModel,
    },
    Delete {
        model: CarsDeleteViewModel,
    },
}

impl CarsView {
    pub fn name(&self) -> &'static str {
        match self {
            CarsView::Index { .. } => "Index",
            CarsView::CreateUpdate { .. } => "CreateUpdate",
            CarsView::Details { .. } => "Details",
            CarsView::Delete { .. } => "Delete",
        }
    }
}

#![forbid(unsafe_code)]

//! Step list validation.
//!
//! Validation aggregates every problem instead of stopping at the first, so a
//! caller can fix the whole list in one pass. Messages are ordered by step
//! index, then by field declaration order (`id`, `target`, `title`, `content`,
//! `placement`, flags), with a duplicate-id message last for its step.
//!
//! # Invariants
//!
//! 1. A non-empty list of well-formed steps with unique ids yields no errors.
//! 2. The same input always yields the same messages in the same order.
//! 3. A duplicate id is reported at the index of the repeat, not the original.

use std::collections::HashSet;

use serde_json::{Map, Value};

use crate::error::{Result, TourError};
use crate::step::{Placement, Step};

const REQUIRED_STRING_FIELDS: [&str; 3] = ["id", "target", "title"];
const BOOLEAN_FIELDS: [&str; 2] = ["showBeacon", "blockInteraction"];

/// Outcome of validating a step list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    pub errors: Vec<String>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Convert into `Err(TourError::InvalidSteps)` when any error was found.
    pub fn into_result(self) -> Result<()> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(TourError::invalid_steps(self.errors))
        }
    }
}

/// Validate an already-typed step list.
///
/// Field types are guaranteed by [`Step`]; emptiness and id uniqueness are
/// still checked.
pub fn validate_steps(steps: &[Step]) -> ValidationReport {
    let mut errors = Vec::new();
    if steps.is_empty() {
        errors.push(EMPTY_LIST.to_owned());
        return ValidationReport { errors };
    }

    let mut seen = HashSet::new();
    for (index, step) in steps.iter().enumerate() {
        for (field, value) in [
            ("id", step.id.as_str()),
            ("target", step.target.as_str()),
            ("title", step.title.as_str()),
        ] {
            if value.is_empty() {
                errors.push(required(index, field));
            }
        }
        if step.content.is_empty() {
            errors.push(required(index, "content"));
        }
        if !step.id.is_empty() && !seen.insert(step.id.as_str()) {
            errors.push(duplicate(index, &step.id));
        }
    }
    ValidationReport { errors }
}

/// Validate an untyped step list exactly as a host delivered it.
pub fn validate_steps_json(value: &Value) -> ValidationReport {
    let mut errors = Vec::new();
    let Some(items) = value.as_array() else {
        errors.push(NOT_A_LIST.to_owned());
        return ValidationReport { errors };
    };
    if items.is_empty() {
        errors.push(EMPTY_LIST.to_owned());
        return ValidationReport { errors };
    }

    let mut seen: HashSet<&str> = HashSet::new();
    for (index, item) in items.iter().enumerate() {
        let Some(step) = item.as_object() else {
            errors.push(format!("Step {index}: must be an object"));
            continue;
        };
        check_step_fields(index, step, &mut errors);
        if let Some(id) = step.get("id").and_then(Value::as_str)
            && !id.is_empty()
            && !seen.insert(id)
        {
            errors.push(duplicate(index, id));
        }
    }
    ValidationReport { errors }
}

/// Validate a host payload and decode it into typed steps.
pub fn parse_steps_json(value: &Value) -> Result<Vec<Step>> {
    validate_steps_json(value).into_result()?;
    Ok(serde_json::from_value(value.clone())?)
}

fn check_step_fields(index: usize, step: &Map<String, Value>, errors: &mut Vec<String>) {
    for field in REQUIRED_STRING_FIELDS {
        match step.get(field) {
            None | Some(Value::Null) => errors.push(required(index, field)),
            Some(Value::String(s)) if s.is_empty() => errors.push(required(index, field)),
            Some(Value::String(_)) => {}
            Some(_) => errors.push(format!("Step {index}: '{field}' must be a string")),
        }
    }

    match step.get("content") {
        None | Some(Value::Null) => errors.push(required(index, "content")),
        Some(Value::String(s)) if s.is_empty() => errors.push(required(index, "content")),
        Some(Value::String(_) | Value::Object(_) | Value::Array(_)) => {}
        Some(_) => errors.push(format!(
            "Step {index}: 'content' must be a string or renderable block"
        )),
    }

    if let Some(placement) = step.get("placement")
        && !placement.is_null()
        && placement.as_str().and_then(Placement::parse).is_none()
    {
        errors.push(format!(
            "Step {index}: 'placement' must be one of {}",
            Placement::NAMES.join(", ")
        ));
    }

    for field in BOOLEAN_FIELDS {
        if let Some(v) = step.get(field)
            && !v.is_null()
            && !v.is_boolean()
        {
            errors.push(format!("Step {index}: '{field}' must be a boolean"));
        }
    }

    if let Some(v) = step.get("customClass")
        && !v.is_null()
        && !v.is_string()
    {
        errors.push(format!("Step {index}: 'customClass' must be a string"));
    }
}

const NOT_A_LIST: &str = "Steps must be an array";
const EMPTY_LIST: &str = "At least one step is required";

fn required(index: usize, field: &str) -> String {
    format!("Step {index}: '{field}' is required")
}

fn duplicate(index: usize, id: &str) -> String {
    format!("Step {index}: duplicate id '{id}'")
}

use std::borrow::Cow;
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use url::Url;
use validator::{Validate, ValidationError, ValidationErrors};

pub const MIN_PIXEL_SIZE: u32 = 128;
pub const MAX_PIXEL_SIZE: u32 = 1024;
pub const DEFAULT_PIXEL_SIZE: u32 = 320;

/// Incoming body of a generation request, as sent by the client.
///
/// Both fields are kept as raw JSON values so that wrong types reach
/// validation as field errors instead of failing deserialization. Only JSON
/// objects deserialize into a request.
#[derive(Deserialize, Validate, Debug, Clone)]
#[serde(from = "Map<String, Value>")]
pub struct GenerationRequest {
    #[validate(custom(function = "validate_link"))]
    pub link: Value,
    #[validate(custom(function = "validate_size"))]
    pub size: Option<Value>,
}

impl From<Map<String, Value>> for GenerationRequest {
    fn from(mut body: Map<String, Value>) -> Self {
        Self {
            link: body.remove("link").unwrap_or(Value::Null),
            // null counts as omitted
            size: body.remove("size").filter(|size| !size.is_null()),
        }
    }
}

/// A request that passed validation. Only built by [`GenerationRequest::into_validated`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedRequest {
    text: String,
    pixel_size: u32,
}

impl ValidatedRequest {
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn pixel_size(&self) -> u32 {
        self.pixel_size
    }
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct Issue {
    pub path: String,
    pub message: String,
    pub code: String,
}

/// Every violation found in a request, both as a flat list and keyed by field.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ValidationFailure {
    pub message: String,
    pub issues: Vec<Issue>,
    pub field_errors: BTreeMap<String, Vec<String>>,
}

impl ValidationFailure {
    pub const MESSAGE: &'static str = "Validation error";

    /// Failure for a body that could not be parsed into a request at all.
    pub fn malformed_body(detail: impl Into<String>) -> Self {
        Self {
            message: Self::MESSAGE.to_string(),
            issues: vec![Issue {
                path: String::new(),
                message: detail.into(),
                code: "invalid_type".to_string(),
            }],
            field_errors: BTreeMap::new(),
        }
    }

    #[cfg(test)]
    pub fn has_field(&self, field: &str) -> bool {
        self.field_errors
            .get(field)
            .is_some_and(|messages| !messages.is_empty())
    }
}

impl From<ValidationErrors> for ValidationFailure {
    fn from(errors: ValidationErrors) -> Self {
        let mut issues = Vec::new();
        let mut field_errors: BTreeMap<String, Vec<String>> = BTreeMap::new();

        // BTreeMap keeps the issue order stable across runs
        let by_field: BTreeMap<String, _> = errors
            .field_errors()
            .into_iter()
            .map(|(field, errs)| (field.to_string(), errs))
            .collect();

        for (field, errs) in by_field {
            for err in errs {
                let message = err
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("Invalid value for {}", field));
                field_errors
                    .entry(field.clone())
                    .or_default()
                    .push(message.clone());
                issues.push(Issue {
                    path: field.clone(),
                    message,
                    code: err.code.to_string(),
                });
            }
        }

        Self {
            message: Self::MESSAGE.to_string(),
            issues,
            field_errors,
        }
    }
}

impl GenerationRequest {
    /// Trims the link, checks both fields and returns every violation at once.
    pub fn into_validated(mut self) -> Result<ValidatedRequest, ValidationFailure> {
        if let Value::String(link) = &mut self.link {
            *link = link.trim().to_string();
        }
        self.validate()?;

        let pixel_size = match self.size.as_ref().and_then(coerce_size) {
            Some(size) => size as u32,
            None => DEFAULT_PIXEL_SIZE,
        };

        let text = match self.link {
            Value::String(link) => link,
            _ => String::new(),
        };

        Ok(ValidatedRequest {
            text,
            pixel_size,
        })
    }
}

fn field_error(code: &'static str, message: impl Into<Cow<'static, str>>) -> ValidationError {
    ValidationError::new(code).with_message(message.into())
}

/// Absolute URL with at least a scheme and a host. Expects an already trimmed string.
fn validate_link(link: &Value) -> Result<(), ValidationError> {
    let invalid = || {
        field_error(
            "invalid_string",
            "Please provide a valid URL, such as https://example.com",
        )
    };

    let Some(link) = link.as_str().filter(|l| !l.is_empty()) else {
        return Err(invalid());
    };

    match Url::parse(link) {
        Ok(url) if url.has_host() => Ok(()),
        _ => Err(invalid()),
    }
}

fn validate_size(size: &Value) -> Result<(), ValidationError> {
    let Some(value) = as_number(size) else {
        return Err(field_error("invalid_type", "Size must be a number"));
    };

    if value < MIN_PIXEL_SIZE as f64 {
        return Err(field_error(
            "too_small",
            format!("Minimum size is {}", MIN_PIXEL_SIZE),
        ));
    }
    if value > MAX_PIXEL_SIZE as f64 {
        return Err(field_error(
            "too_big",
            format!("Maximum size is {}", MAX_PIXEL_SIZE),
        ));
    }
    if value.fract() != 0.0 {
        return Err(field_error("invalid_type", "Size must be a whole number"));
    }

    Ok(())
}

/// Numeric view of `size`; numeric strings are coerced.
fn as_number(size: &Value) -> Option<f64> {
    match size {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok().filter(|v| v.is_finite()),
        _ => None,
    }
}

/// Whole, in-range pixel size, if `size` coerces to one.
fn coerce_size(size: &Value) -> Option<f64> {
    as_number(size).filter(|v| {
        v.fract() == 0.0 && *v >= MIN_PIXEL_SIZE as f64 && *v <= MAX_PIXEL_SIZE as f64
    })
}

//! # Request Validation
//!
//! Turns a raw request body into a [`PaymentRequest`] or rejects it.
//!
//! The body is read into wire DTOs whose fields are all optional, so an
//! absent or mistyped field becomes `None` instead of aborting the parse.
//! The `validator` derive then checks every constraint in one pass and the
//! resulting [`ValidationErrors`] tree is flattened into [`Violations`] with
//! document paths (`customerInfo.email`, `items[1].price`). A request is
//! produced only when nothing was reported.

use crate::error::{Constraint, PaymentError, PaymentResult, Violation, Violations};
use crate::method::PaymentMethod;
use crate::request::{CartItem, CustomerInfo, PaymentRequest};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::borrow::Cow;
use validator::{Validate, ValidationError, ValidationErrors, ValidationErrorsKind};

/// Error code for a value outside [`PaymentMethod::codes`]
const CODE_ENUM: &str = "enum";
/// Error code for an optional field present with the wrong type
const CODE_TYPE: &str = "type";
/// Error code for a sequence that is too short
const CODE_MIN_ITEMS: &str = "min_items";

/// Parse and validate a raw body
pub fn validate_request(body: &[u8]) -> PaymentResult<PaymentRequest> {
    let value: Value = serde_json::from_slice(body)
        .map_err(|e| PaymentError::MalformedInput(e.to_string()))?;
    validate_value(&value)
}

/// Validate an already parsed JSON document
pub fn validate_value(value: &Value) -> PaymentResult<PaymentRequest> {
    if !value.is_object() {
        return Err(PaymentError::MalformedInput(format!(
            "expected a JSON object, found {}",
            json_type(value)
        )));
    }

    let wire = PaymentRequestWire::deserialize(value)
        .map_err(|e| PaymentError::MalformedInput(e.to_string()))?;

    if let Err(errors) = wire.validate() {
        return Err(PaymentError::SchemaViolation(violations_from(&errors, value)));
    }

    wire.into_request().ok_or_else(|| {
        PaymentError::MalformedInput("request passed validation but is incomplete".to_string())
    })
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

// Wire DTOs. A `required` message names the JSON type the field must have,
// which is how a present-but-mistyped field is told apart from a missing one.

#[derive(Debug, Deserialize, Validate)]
struct PaymentRequestWire {
    #[serde(default, deserialize_with = "typed")]
    #[validate(required(message = "number"), range(exclusive_min = 0.0))]
    amount: Option<f64>,

    #[serde(rename = "paymentMethod", default, deserialize_with = "typed")]
    #[validate(
        required(message = "string"),
        custom(function = "known_payment_method")
    )]
    payment_method: Option<String>,

    #[serde(rename = "customerInfo", default, deserialize_with = "object")]
    #[validate(required(message = "object"), nested)]
    customer_info: Option<CustomerInfoWire>,

    #[serde(default, deserialize_with = "object_list")]
    #[validate(
        required(message = "array of objects"),
        length(min = 1, code = "min_items"),
        nested
    )]
    items: Option<Vec<CartItemWire>>,
}

#[derive(Debug, Deserialize, Serialize, Validate)]
struct CustomerInfoWire {
    #[serde(rename = "fullName", default, deserialize_with = "typed")]
    #[validate(required(message = "string"), length(min = 1))]
    full_name: Option<String>,

    #[serde(default, deserialize_with = "typed")]
    #[validate(required(message = "string"), length(min = 1))]
    email: Option<String>,

    #[serde(default, deserialize_with = "typed")]
    #[validate(required(message = "string"), length(min = 1))]
    phone: Option<String>,

    #[serde(default, deserialize_with = "typed")]
    #[validate(required(message = "string"), length(min = 1))]
    address: Option<String>,

    #[serde(default, deserialize_with = "typed")]
    #[validate(required(message = "string"), length(min = 1))]
    city: Option<String>,

    /// Absent is fine; anything present, `null` included, must be a string
    #[serde(rename = "postalCode", default, deserialize_with = "present")]
    #[validate(custom(function = "optional_text"))]
    postal_code: Option<Value>,
}

#[derive(Debug, Deserialize, Serialize, Validate)]
struct CartItemWire {
    #[serde(default, deserialize_with = "typed")]
    #[validate(required(message = "integer"))]
    id: Option<i64>,

    #[serde(default, deserialize_with = "typed")]
    #[validate(required(message = "string"), length(min = 1))]
    name: Option<String>,

    #[serde(default, deserialize_with = "typed")]
    #[validate(required(message = "number"), range(exclusive_min = 0.0))]
    price: Option<f64>,

    #[serde(default, deserialize_with = "typed")]
    #[validate(required(message = "integer"), range(exclusive_min = 0))]
    quantity: Option<i64>,

    #[serde(default, deserialize_with = "typed")]
    #[validate(required(message = "string"))]
    image: Option<String>,
}

impl PaymentRequestWire {
    fn into_request(self) -> Option<PaymentRequest> {
        Some(PaymentRequest {
            amount: self.amount?,
            payment_method: self.payment_method?.parse().ok()?,
            customer_info: self.customer_info?.into_customer()?,
            items: self
                .items?
                .into_iter()
                .map(CartItemWire::into_item)
                .collect::<Option<Vec<_>>>()?,
        })
    }
}

impl CustomerInfoWire {
    fn into_customer(self) -> Option<CustomerInfo> {
        let postal_code = match self.postal_code {
            None => String::new(),
            Some(Value::String(code)) => code,
            Some(_) => return None,
        };
        Some(CustomerInfo {
            full_name: self.full_name?,
            email: self.email?,
            phone: self.phone?,
            address: self.address?,
            city: self.city?,
            postal_code,
        })
    }
}

impl CartItemWire {
    fn into_item(self) -> Option<CartItem> {
        Some(CartItem {
            id: self.id?,
            name: self.name?,
            price: self.price?,
            quantity: u64::try_from(self.quantity?).ok()?,
            image: self.image?,
        })
    }
}

/// Keep the value only when it has the JSON type `T` expects
fn typed<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(T::deserialize(value).ok())
}

/// Like [`typed`], but a JSON array is never read as a struct
fn object<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    if !value.is_object() {
        return Ok(None);
    }
    Ok(T::deserialize(value).ok())
}

/// An array whose every entry is an object
fn object_list<'de, D, T>(deserializer: D) -> Result<Option<Vec<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    match Value::deserialize(deserializer)? {
        Value::Array(entries) if entries.iter().all(Value::is_object) => {
            Ok(Vec::<T>::deserialize(Value::Array(entries)).ok())
        }
        _ => Ok(None),
    }
}

/// Distinguishes an explicit `null` from an absent key
fn present<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

fn known_payment_method(code: &str) -> Result<(), ValidationError> {
    if code.parse::<PaymentMethod>().is_ok() {
        return Ok(());
    }
    let mut err = ValidationError::new(CODE_ENUM);
    err.add_param(Cow::Borrowed("value"), &code);
    Err(err)
}

fn optional_text(value: &Value) -> Result<(), ValidationError> {
    if value.is_string() {
        Ok(())
    } else {
        Err(ValidationError::new(CODE_TYPE).with_message(Cow::Borrowed("string")))
    }
}

/// Flatten the validator's error tree into path-addressed violations.
/// `raw` is the document the tree was produced from; it tells a missing
/// key apart from a present one of the wrong type.
fn violations_from(errors: &ValidationErrors, raw: &Value) -> Violations {
    let mut collected = Vec::new();
    collect(errors, raw, "", &mut collected);
    collected.sort_by_cached_key(|violation| document_rank(&violation.field));
    collected.into_iter().collect()
}

fn collect(errors: &ValidationErrors, raw: &Value, prefix: &str, out: &mut Vec<Violation>) {
    for (field, kind) in errors.errors() {
        let field = wire_name(field);
        let path = if prefix.is_empty() {
            field.clone()
        } else {
            format!("{}.{}", prefix, field)
        };
        let present = raw.get(&field).is_some();

        match kind {
            ValidationErrorsKind::Field(failures) => {
                for failure in failures {
                    out.push(Violation::new(path.clone(), constraint_for(failure, present)));
                }
            }
            ValidationErrorsKind::Struct(inner) => {
                collect(inner, &raw[field.as_str()], &path, out);
            }
            ValidationErrorsKind::List(entries) => {
                for (index, inner) in entries {
                    let entry = &raw[field.as_str()][*index];
                    collect(inner, entry, &format!("{}[{}]", path, index), out);
                }
            }
        }
    }
}

/// JSON key for a DTO field (`payment_method` -> `paymentMethod`)
fn wire_name(field: &str) -> String {
    let mut name = String::with_capacity(field.len());
    let mut upper = false;
    for c in field.chars() {
        if c == '_' {
            upper = true;
        } else if upper {
            name.push(c.to_ascii_uppercase());
            upper = false;
        } else {
            name.push(c);
        }
    }
    name
}

fn constraint_for(failure: &ValidationError, present: bool) -> Constraint {
    let expected = || {
        failure
            .message
            .clone()
            .unwrap_or(Cow::Borrowed("value"))
    };

    match failure.code.as_ref() {
        "required" if present => Constraint::WrongType {
            expected: expected(),
        },
        "required" => Constraint::Missing,
        CODE_TYPE => Constraint::WrongType {
            expected: expected(),
        },
        "range" => Constraint::GreaterThan {
            bound: param_i64(failure, "exclusive_min"),
        },
        "length" => Constraint::MinLength {
            min: param_i64(failure, "min").unsigned_abs() as usize,
        },
        CODE_MIN_ITEMS => Constraint::MinItems {
            min: param_i64(failure, "min").unsigned_abs() as usize,
        },
        CODE_ENUM => Constraint::InvalidEnum {
            value: failure
                .params
                .get("value")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string(),
            allowed: PaymentMethod::codes(),
        },
        other => Constraint::WrongType {
            expected: Cow::Owned(other.to_string()),
        },
    }
}

fn param_i64(failure: &ValidationError, name: &str) -> i64 {
    failure
        .params
        .get(name)
        .and_then(Value::as_f64)
        .map_or(0, |n| n as i64)
}

/// Order of appearance in the request schema, used to sort violations
const FIELD_ORDER: &[&str] = &[
    "amount",
    "paymentMethod",
    "customerInfo",
    "items",
    "fullName",
    "email",
    "phone",
    "address",
    "city",
    "postalCode",
    "id",
    "name",
    "price",
    "quantity",
    "image",
];

/// Sort key for a path such as `items[1].price`: schema rank per segment,
/// with list indices kept as-is
fn document_rank(path: &str) -> Vec<usize> {
    let mut rank = Vec::new();
    for segment in path.split('.') {
        let (name, index) = match segment.split_once('[') {
            Some((name, rest)) => (name, rest.trim_end_matches(']').parse::<usize>().ok()),
            None => (segment, None),
        };
        rank.push(
            FIELD_ORDER
                .iter()
                .position(|known| *known == name)
                .unwrap_or(FIELD_ORDER.len()),
        );
        rank.extend(index);
    }
    rank
}

//! Typed filters for the contact listing.
//!
//! A filter is a `(field, op, value)` triple checked against the closed set of
//! contact fields before any query reaches the store. The same filter renders
//! to a MongoDB query document and evaluates in memory, so every backend
//! applies identical semantics.

use mongodb::bson::{Bson, Document, doc};
use serde::Deserialize;
use serde_json::Value;

use crate::errors::FilterError;
use crate::models::contact::Contact;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactField {
    Cin,
    CompanyName,
    State,
    Activity,
    Email,
    EmailSent,
    Doi,
    MailingStage,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FieldKind {
    Text,
    Flag,
    Number,
}

impl ContactField {
    pub fn parse(name: &str) -> Result<Self, FilterError> {
        match name {
            "cin" => Ok(ContactField::Cin),
            "company_name" => Ok(ContactField::CompanyName),
            "state" => Ok(ContactField::State),
            "activity" => Ok(ContactField::Activity),
            "email" => Ok(ContactField::Email),
            "email_sent" => Ok(ContactField::EmailSent),
            "doi" => Ok(ContactField::Doi),
            "mailingStage" => Ok(ContactField::MailingStage),
            other => Err(FilterError::UnknownField(other.to_string())),
        }
    }

    /// Key of the field in stored documents.
    pub fn key(&self) -> &'static str {
        match self {
            ContactField::Cin => "cin",
            ContactField::CompanyName => "company_name",
            ContactField::State => "state",
            ContactField::Activity => "activity",
            ContactField::Email => "email",
            ContactField::EmailSent => "email_sent",
            ContactField::Doi => "doi",
            ContactField::MailingStage => "mailingStage",
        }
    }

    fn kind(&self) -> FieldKind {
        match self {
            ContactField::EmailSent => FieldKind::Flag,
            ContactField::MailingStage => FieldKind::Number,
            _ => FieldKind::Text,
        }
    }

    fn value_of(&self, contact: &Contact) -> Option<FilterValue> {
        let text = |v: &Option<String>| v.clone().map(FilterValue::Text);
        match self {
            ContactField::Cin => text(&contact.cin),
            ContactField::CompanyName => text(&contact.company_name),
            ContactField::State => text(&contact.state),
            ContactField::Activity => text(&contact.activity),
            ContactField::Email => text(&contact.email),
            ContactField::Doi => text(&contact.doi),
            ContactField::EmailSent => contact.email_sent.map(FilterValue::Flag),
            ContactField::MailingStage => contact
                .mailing_stage
                .map(|stage| FilterValue::Number(i64::from(stage))),
        }
    }
}

#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum FilterOp {
    #[default]
    Eq,
    Ne,
    In,
    Contains,
}

#[derive(Debug, Clone, PartialEq)]
pub enum FilterValue {
    Text(String),
    Flag(bool),
    Number(i64),
    List(Vec<FilterValue>),
}

impl FilterValue {
    fn to_bson(&self) -> Bson {
        match self {
            FilterValue::Text(s) => Bson::String(s.clone()),
            FilterValue::Flag(b) => Bson::Boolean(*b),
            FilterValue::Number(n) => Bson::Int64(*n),
            FilterValue::List(items) => Bson::Array(items.iter().map(Self::to_bson).collect()),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ContactFilter {
    pub field: ContactField,
    pub op: FilterOp,
    pub value: FilterValue,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct RawFilter {
    field: String,
    #[serde(default)]
    op: FilterOp,
    value: Value,
}

impl ContactFilter {
    pub fn eq(field: ContactField, value: FilterValue) -> Self {
        Self {
            field,
            op: FilterOp::Eq,
            value,
        }
    }

    fn build(field: &str, op: FilterOp, value: Value) -> Result<Self, FilterError> {
        let field = ContactField::parse(field)?;
        let value = match op {
            FilterOp::In => match value {
                Value::Array(items) => FilterValue::List(
                    items
                        .into_iter()
                        .map(|item| scalar(field, item))
                        .collect::<Result<_, _>>()?,
                ),
                _ => {
                    return Err(FilterError::TypeMismatch {
                        field: field.key(),
                        expected: "an array for `in`",
                    });
                }
            },
            FilterOp::Contains if field.kind() != FieldKind::Text => {
                return Err(FilterError::UnsupportedOperator(field.key()));
            }
            _ => scalar(field, value)?,
        };

        Ok(Self { field, op, value })
    }

    pub fn to_document(&self) -> Document {
        let key = self.field.key();
        let value = self.value.to_bson();
        match self.op {
            FilterOp::Eq => doc! { key: value },
            FilterOp::Ne => doc! { key: { "$ne": value } },
            FilterOp::In => doc! { key: { "$in": value } },
            FilterOp::Contains => {
                let pattern = match &self.value {
                    FilterValue::Text(s) => regex::escape(s),
                    _ => String::new(),
                };
                doc! { key: { "$regex": pattern, "$options": "i" } }
            }
        }
    }

    pub fn matches(&self, contact: &Contact) -> bool {
        let actual = self.field.value_of(contact);
        match self.op {
            FilterOp::Eq => actual.as_ref() == Some(&self.value),
            FilterOp::Ne => actual.as_ref() != Some(&self.value),
            FilterOp::In => match (&self.value, actual) {
                (FilterValue::List(items), Some(actual)) => items.contains(&actual),
                _ => false,
            },
            FilterOp::Contains => match (&self.value, actual) {
                (FilterValue::Text(needle), Some(FilterValue::Text(haystack))) => haystack
                    .to_lowercase()
                    .contains(&needle.to_lowercase()),
                _ => false,
            },
        }
    }
}

fn scalar(field: ContactField, value: Value) -> Result<FilterValue, FilterError> {
    let mismatch = |expected| FilterError::TypeMismatch {
        field: field.key(),
        expected,
    };
    match (field.kind(), value) {
        (FieldKind::Text, Value::String(s)) => Ok(FilterValue::Text(s)),
        (FieldKind::Text, _) => Err(mismatch("a string")),
        (FieldKind::Flag, Value::Bool(b)) => Ok(FilterValue::Flag(b)),
        (FieldKind::Flag, _) => Err(mismatch("a boolean")),
        (FieldKind::Number, Value::Number(n)) => n
            .as_i64()
            .map(FilterValue::Number)
            .ok_or_else(|| mismatch("an integer")),
        (FieldKind::Number, _) => Err(mismatch("an integer")),
    }
}

/// Parses the `filters` query parameter.
///
/// Accepts either an equality object (`{"state":"Active"}`) or an array of
/// `{"field", "op", "value"}` objects where `op` defaults to `eq`.
pub fn parse_filters(raw: &str) -> Result<Vec<ContactFilter>, FilterError> {
    let parsed: Value =
        serde_json::from_str(raw).map_err(|e| FilterError::Malformed(e.to_string()))?;

    match parsed {
        Value::Object(map) => map
            .into_iter()
            .map(|(field, value)| ContactFilter::build(&field, FilterOp::Eq, value))
            .collect(),
        Value::Array(items) => items
            .into_iter()
            .map(|item| {
                let raw: RawFilter = serde_json::from_value(item)
                    .map_err(|e| FilterError::Malformed(e.to_string()))?;
                ContactFilter::build(&raw.field, raw.op, raw.value)
            })
            .collect(),
        _ => Err(FilterError::Malformed(
            "expected an object or an array".to_string(),
        )),
    }
}

/// Combines filters into one query document; all filters must hold.
pub fn filter_document(filters: &[ContactFilter]) -> Document {
    match filters {
        [] => doc! {},
        [single] => single.to_document(),
        many => doc! { "$and": many.iter().map(ContactFilter::to_document).collect::<Vec<_>>() },
    }
}

pub fn matches_all(filters: &[ContactFilter], contact: &Contact) -> bool {
    filters.iter().all(|filter| filter.matches(contact))
}

//! Declarative field rules for each insert shape.
//!
//! A [`Schema`] is pure data: the ordered fields a caller may supply for one
//! entity kind, their types, and the rules each value must satisfy. The
//! [`validate`] pipeline consumes it.

mod entities;
pub mod validate;

pub use entities::{BLOG_POST, CONTACT_MESSAGE, NEWSLETTER, PROGRAM, STAFF, STORY};
pub use validate::{validate, validate_into, FieldError, ValidationErrors};

use crate::services::EntityKind;

/// Value type a field accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    /// JSON string, trimmed before rules run
    Text,
    /// JSON integer that fits in `u32`
    Integer,
    /// RFC 3339 timestamp string
    Timestamp,
}

/// Constraint applied to a present, non-empty value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    /// Minimum length in characters
    MinLength(usize),
    Email,
    /// Absolute http(s) URL or a site-relative path
    Url,
    /// Integer greater than zero
    Positive,
}

#[derive(Debug, Clone, Copy)]
pub struct Field {
    pub name: &'static str,
    pub field_type: FieldType,
    pub required: bool,
    pub rules: &'static [Rule],
}

impl Field {
    pub const fn text(name: &'static str) -> Self {
        Self {
            name,
            field_type: FieldType::Text,
            required: true,
            rules: &[],
        }
    }

    pub const fn integer(name: &'static str) -> Self {
        Self {
            field_type: FieldType::Integer,
            ..Self::text(name)
        }
    }

    pub const fn timestamp(name: &'static str) -> Self {
        Self {
            field_type: FieldType::Timestamp,
            ..Self::text(name)
        }
    }

    pub const fn optional(self) -> Self {
        Self {
            required: false,
            ..self
        }
    }

    pub const fn with(self, rules: &'static [Rule]) -> Self {
        Self { rules, ..self }
    }
}

/// Field set accepted when creating one entity kind
#[derive(Debug, Clone, Copy)]
pub struct Schema {
    pub kind: EntityKind,
    pub fields: &'static [Field],
}

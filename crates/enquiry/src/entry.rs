//! Core record types for enquiry.
//!
//! An [`Entry`] is one row of the submitted-data table. The same type backs
//! the in-progress draft bound to the form inputs.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Column headers for every tabular rendering of entries, in column order.
pub const COLUMN_HEADERS: [&str; 6] = [
    "User Name",
    "Email",
    "Phone Number",
    "Gender",
    "Age",
    "BirthDay",
];

/// One field of the enquiry form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    /// Display name of the person enquiring.
    Username,
    /// Contact email. Not format-checked on submit.
    Email,
    /// Contact phone number.
    PhoneNumber,
    /// Gender, free text.
    Gender,
    /// Age, optional free text.
    Age,
    /// Birthday, optional free text.
    BirthDay,
}

impl Field {
    /// All fields in column order.
    pub const ALL: [Field; 6] = [
        Self::Username,
        Self::Email,
        Self::PhoneNumber,
        Self::Gender,
        Self::Age,
        Self::BirthDay,
    ];

    /// Fields that must be non-empty for a submit to go through.
    pub const REQUIRED: [Field; 4] = [Self::Username, Self::Email, Self::PhoneNumber, Self::Gender];

    /// Whether the field is required on submit.
    #[must_use]
    pub fn is_required(self) -> bool {
        Self::REQUIRED.contains(&self)
    }
}

impl std::fmt::Display for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Username => write!(f, "username"),
            Self::Email => write!(f, "email"),
            Self::PhoneNumber => write!(f, "phoneNumber"),
            Self::Gender => write!(f, "gender"),
            Self::Age => write!(f, "age"),
            Self::BirthDay => write!(f, "birthDay"),
        }
    }
}

impl FromStr for Field {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "username" | "user_name" | "name" => Ok(Self::Username),
            "email" => Ok(Self::Email),
            "phonenumber" | "phone_number" | "phone" => Ok(Self::PhoneNumber),
            "gender" => Ok(Self::Gender),
            "age" => Ok(Self::Age),
            "birthday" | "birth_day" => Ok(Self::BirthDay),
            _ => Err(Error::UnknownField(s.to_string())),
        }
    }
}

/// A submitted (or in-progress) enquiry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Entry {
    /// Display name.
    pub username: String,
    /// Contact email.
    pub email: String,
    /// Contact phone number.
    pub phone_number: String,
    /// Gender.
    pub gender: String,
    /// Age, may be empty.
    pub age: String,
    /// Birthday, may be empty.
    pub birth_day: String,
}

impl Entry {
    /// Read a field.
    #[must_use]
    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::Username => &self.username,
            Field::Email => &self.email,
            Field::PhoneNumber => &self.phone_number,
            Field::Gender => &self.gender,
            Field::Age => &self.age,
            Field::BirthDay => &self.birth_day,
        }
    }

    /// Overwrite a field.
    pub fn set(&mut self, field: Field, value: impl Into<String>) {
        let slot = match field {
            Field::Username => &mut self.username,
            Field::Email => &mut self.email,
            Field::PhoneNumber => &mut self.phone_number,
            Field::Gender => &mut self.gender,
            Field::Age => &mut self.age,
            Field::BirthDay => &mut self.birth_day,
        };
        *slot = value.into();
    }

    /// Required fields that are currently empty.
    ///
    /// Only the empty string counts as missing; whitespace is a value.
    #[must_use]
    pub fn missing_required(&self) -> Vec<Field> {
        Field::REQUIRED
            .into_iter()
            .filter(|f| self.get(*f).is_empty())
            .collect()
    }

    /// Whether every required field has a value.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.missing_required().is_empty()
    }

    /// Whether every field is empty.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        Field::ALL.into_iter().all(|f| self.get(f).is_empty())
    }

    /// The six cell values in column order.
    #[must_use]
    pub fn cells(&self) -> [&str; 6] {
        Field::ALL.map(|f| self.get(f))
    }
}

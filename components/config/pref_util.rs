/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub enum PrefValue {
    Float(f64),
    Int(i64),
    Str(String),
    Bool(bool),
    Array(Vec<PrefValue>),
}

impl PrefValue {
    /// Interpret a command-line value: booleans and numbers are recognised, anything
    /// else is kept as a string.
    pub fn from_booleanish_str(input: &str) -> Self {
        match input {
            "false" => PrefValue::Bool(false),
            "true" => PrefValue::Bool(true),
            _ => input
                .parse::<i64>()
                .map(PrefValue::Int)
                .or_else(|_| input.parse::<f64>().map(PrefValue::Float))
                .unwrap_or_else(|_| PrefValue::Str(String::from(input))),
        }
    }
}

impl fmt::Display for PrefValue {
    fn fmt(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        match self {
            PrefValue::Float(value) => write!(formatter, "{value}"),
            PrefValue::Int(value) => write!(formatter, "{value}"),
            PrefValue::Str(value) => write!(formatter, "{value}"),
            PrefValue::Bool(value) => write!(formatter, "{value}"),
            PrefValue::Array(values) => {
                let values: Vec<String> = values.iter().map(ToString::to_string).collect();
                write!(formatter, "[{}]", values.join(", "))
            },
        }
    }
}

impl From<bool> for PrefValue {
    fn from(value: bool) -> Self {
        PrefValue::Bool(value)
    }
}

impl From<i64> for PrefValue {
    fn from(value: i64) -> Self {
        PrefValue::Int(value)
    }
}

impl From<f64> for PrefValue {
    fn from(value: f64) -> Self {
        PrefValue::Float(value)
    }
}

impl From<String> for PrefValue {
    fn from(value: String) -> Self {
        PrefValue::Str(value)
    }
}

impl From<&str> for PrefValue {
    fn from(value: &str) -> Self {
        PrefValue::Str(value.to_owned())
    }
}

impl TryFrom<PrefValue> for bool {
    type Error = PrefValue;

    fn try_from(value: PrefValue) -> Result<Self, Self::Error> {
        match value {
            PrefValue::Bool(value) => Ok(value),
            other => Err(other),
        }
    }
}

impl TryFrom<PrefValue> for i64 {
    type Error = PrefValue;

    fn try_from(value: PrefValue) -> Result<Self, Self::Error> {
        match value {
            PrefValue::Int(value) => Ok(value),
            other => Err(other),
        }
    }
}

impl TryFrom<PrefValue> for f64 {
    type Error = PrefValue;

    fn try_from(value: PrefValue) -> Result<Self, Self::Error> {
        match value {
            PrefValue::Float(value) => Ok(value),
            PrefValue::Int(value) => Ok(value as f64),
            other => Err(other),
        }
    }
}

impl TryFrom<PrefValue> for String {
    type Error = PrefValue;

    fn try_from(value: PrefValue) -> Result<Self, Self::Error> {
        match value {
            PrefValue::Str(value) => Ok(value),
            other => Err(other),
        }
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum PreferenceError {
    UnknownPreference(String),
    MismatchedType(String),
}

impl fmt::Display for PreferenceError {
    fn fmt(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        match self {
            PreferenceError::UnknownPreference(name) => {
                write!(formatter, "Unknown preference: {name:?}")
            },
            PreferenceError::MismatchedType(name) => {
                write!(formatter, "Mismatched type for preference: {name:?}")
            },
        }
    }
}

impl std::error::Error for PreferenceError {}

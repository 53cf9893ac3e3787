//! Roster records from the personnel directory.
//!
//! The directory uses its own field names; those are accepted as aliases so
//! the service can serialize with its own names.

use serde::{Deserialize, Serialize};

use super::de;

/// Employee as returned by the personnel directory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Employee {
    #[serde(deserialize_with = "de::int")]
    pub id: i32,
    #[serde(alias = "name")]
    pub first_name: String,
    #[serde(default, alias = "segundo_nombre", deserialize_with = "de::opt_string")]
    pub second_name: Option<String>,
    #[serde(alias = "primer_apellido")]
    pub first_surname: String,
    #[serde(default, alias = "segundo_apellido", deserialize_with = "de::opt_string")]
    pub second_surname: Option<String>,
    #[serde(default, alias = "cedula")]
    pub national_id: String,
    #[serde(default, alias = "id_departamento", deserialize_with = "de::opt_int")]
    pub department_id: Option<i32>,
    #[serde(default, alias = "id_cargo", deserialize_with = "de::opt_string")]
    pub position_id: Option<String>,
}

impl Employee {
    /// First name and first surname, the way the dashboard lists people.
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name.trim(), self.first_surname.trim())
    }

    /// All name parts that are present, in order.
    pub fn full_name(&self) -> String {
        [
            Some(self.first_name.as_str()),
            self.second_name.as_deref(),
            Some(self.first_surname.as_str()),
            self.second_surname.as_deref(),
        ]
        .into_iter()
        .flatten()
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
    }
}

/// Department from the directory's catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Department {
    #[serde(deserialize_with = "de::int")]
    pub id: i32,
    #[serde(default, alias = "nombre", alias = "departamento")]
    pub name: String,
}

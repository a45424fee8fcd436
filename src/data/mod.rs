//! Profile records and the static dataset they are loaded from.
//!
//! The dataset is read exactly once at startup. The bundled file is compiled
//! into the binary; a JSON file of the same shape can replace it.
//!
use crate::error::{Context, Result, simple_error};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

/// Dataset shipped with the binary.
pub const BUNDLED_DATASET: &str = include_str!("../../data/celebrities.json");

/// Gender values offered by the editor, in selector order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Gender {
    Male,
    Female,
    Transgender,
    #[serde(rename = "Rather not say")]
    RatherNotSay,
    Other,
}

impl Gender {
    pub const ALL: [Gender; 5] = [
        Gender::Male,
        Gender::Female,
        Gender::Transgender,
        Gender::RatherNotSay,
        Gender::Other,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Gender::Male => "Male",
            Gender::Female => "Female",
            Gender::Transgender => "Transgender",
            Gender::RatherNotSay => "Rather not say",
            Gender::Other => "Other",
        }
    }

    pub fn from_label(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|g| g.label() == s)
    }

    /// Next value in selector order, wrapping around.
    pub fn next(self) -> Self {
        let idx = Self::ALL.iter().position(|g| *g == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }

    /// Previous value in selector order, wrapping around.
    pub fn prev(self) -> Self {
        let idx = Self::ALL.iter().position(|g| *g == self).unwrap_or(0);
        Self::ALL[(idx + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

impl std::fmt::Display for Gender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// One profile in the directory.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: u32,
    pub first: String,
    pub last: String,
    pub picture: String,
    /// ISO `YYYY-MM-DD`.
    pub dob: String,
    pub age: u32,
    pub gender: Gender,
    pub country: String,
    pub description: String,
}

impl User {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first, self.last)
    }
}

/// Parse a dataset from JSON text, rejecting duplicate ids.
pub fn parse_users(json: &str) -> Result<Vec<User>> {
    let users: Vec<User> =
        serde_json::from_str(json).with_ctx(|| "malformed user dataset".to_string())?;
    let mut seen = HashSet::with_capacity(users.len());
    for u in &users {
        if !seen.insert(u.id) {
            return Err(simple_error(format!("duplicate user id {} in dataset", u.id)));
        }
    }
    Ok(users)
}

/// Load the dataset from `path`, or the bundled one when `path` is `None`.
pub fn load_users(path: Option<&Path>) -> Result<Vec<User>> {
    let users = match path {
        Some(p) => {
            let contents = std::fs::read_to_string(p)
                .with_ctx(|| format!("read dataset {}", p.display()))?;
            parse_users(&contents)?
        }
        None => parse_users(BUNDLED_DATASET)?,
    };
    tracing::info!(count = users.len(), source = ?path, "loaded user dataset");
    Ok(users)
}

//! Data models for deptboard.
//!
//! This module contains the core data structures shared by the summary
//! pipeline (user records in, department summaries out) and the column
//! board (food items and the buckets they live in).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt;

/// Hair details of a user record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hair {
    #[serde(default)]
    pub color: Option<String>,
}

/// Address details of a user record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    #[serde(default)]
    pub postal_code: Option<String>,
}

/// Company details of a user record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Company {
    #[serde(default)]
    pub department: String,
}

/// A single user as returned by the remote users endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    pub id: u64,
    pub first_name: String,
    pub last_name: String,
    /// Expected to be "male" or "female", but not constrained.
    pub gender: String,
    pub age: u32,
    #[serde(default)]
    pub hair: Option<Hair>,
    #[serde(default)]
    pub address: Option<Address>,
    #[serde(default)]
    pub company: Company,
}

impl UserRecord {
    /// First and last name concatenated with no separator.
    pub fn full_name(&self) -> String {
        format!("{}{}", self.first_name, self.last_name)
    }

    /// Hair color, if present and non-empty.
    pub fn hair_color(&self) -> Option<&str> {
        self.hair
            .as_ref()
            .and_then(|h| h.color.as_deref())
            .filter(|c| !c.is_empty())
    }

    /// Postal code, if present and non-empty.
    pub fn postal_code(&self) -> Option<&str> {
        self.address
            .as_ref()
            .and_then(|a| a.postal_code.as_deref())
            .filter(|p| !p.is_empty())
    }

    pub fn department(&self) -> &str {
        &self.company.department
    }
}

/// Body of the users endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UsersResponse {
    pub users: Vec<UserRecord>,
}

/// Statistics for one department.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DepartmentSummary {
    /// Number of users whose gender is exactly "male".
    pub male: usize,
    /// Number of users whose gender is exactly "female".
    pub female: usize,
    /// `"min-max"` over ages seen so far, or empty if none.
    pub age_range: String,
    /// Hair color to occurrence count.
    pub hair: HashMap<String, usize>,
    /// Concatenated full name to postal code. Later users with the same
    /// full name overwrite earlier ones.
    pub address_user: HashMap<String, String>,
}

impl DepartmentSummary {
    /// Parse `age_range` back into `(min, max)`.
    ///
    /// Returns `None` for an empty range or one that does not parse.
    pub fn age_bounds(&self) -> Option<(u32, u32)> {
        let (min, max) = self.age_range.split_once('-')?;
        Some((min.parse().ok()?, max.parse().ok()?))
    }
}

/// Department name to summary, ordered by department name.
pub type DepartmentSummaries = BTreeMap<String, DepartmentSummary>;

/// Metadata about a users summary report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportMetadata {
    /// Endpoint the users were fetched from.
    pub source_url: String,
    /// Date and time the report was generated.
    pub generated_at: DateTime<Utc>,
    /// Number of user records received (0 if the fetch failed).
    pub users_fetched: usize,
    /// Duration of fetch plus aggregation in seconds.
    pub duration_seconds: f64,
}

/// The complete users summary report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UsersReport {
    pub metadata: ReportMetadata,
    /// `None` when no data could be fetched.
    pub departments: Option<DepartmentSummaries>,
    /// Departments by record count, largest first.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub largest_departments: Vec<(String, usize)>,
}

impl UsersReport {
    /// Report for a fetch that produced no data.
    pub fn absent(metadata: ReportMetadata) -> Self {
        Self {
            metadata,
            departments: None,
            largest_departments: Vec::new(),
        }
    }

    pub fn has_data(&self) -> bool {
        self.departments.is_some()
    }

    /// Process exit code for `summary`: 0 with data, 2 without.
    pub fn exit_code(&self) -> i32 {
        if self.has_data() {
            0
        } else {
            2
        }
    }
}

/// Category tag of a food item (e.g. "Fruit", "Vegetable").
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Category(pub String);

impl Category {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Column heading for this category ("Fruit" -> "Fruits").
    pub fn column_label(&self) -> String {
        if self.0.ends_with('s') {
            self.0.clone()
        } else {
            format!("{}s", self.0)
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for Category {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// An item on the column board. `name` is unique within the board.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FoodItem {
    pub name: String,
    pub category: Category,
}

impl FoodItem {
    pub fn new(name: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            category: Category(category.into()),
        }
    }
}

/// A holding area on the column board.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Bucket {
    Main,
    Category(Category),
}

impl fmt::Display for Bucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Bucket::Main => write!(f, "Main List"),
            Bucket::Category(c) => write!(f, "{}", c.column_label()),
        }
    }
}

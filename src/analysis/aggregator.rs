//! Department aggregation and statistics.
//!
//! This module groups user records by department and computes the
//! per-department summary shown in the users report.

use crate::models::{DepartmentSummaries, DepartmentSummary, UserRecord};
use std::collections::BTreeMap;
use tracing::debug;

/// Group users by department and compute per-department statistics.
///
/// Records are folded in input order. The result is built fresh on every
/// call and never shares state with a previous one.
pub fn aggregate(users: &[UserRecord]) -> DepartmentSummaries {
    let mut grouped = DepartmentSummaries::new();

    for user in users {
        let summary = grouped.entry(user.department().to_string()).or_default();

        // Only the two exact, case-sensitive values are counted
        match user.gender.as_str() {
            "male" => summary.male += 1,
            "female" => summary.female += 1,
            other => debug!("Ignoring unrecognized gender {:?} for user {}", other, user.id),
        }

        if let Some(color) = user.hair_color() {
            *summary.hair.entry(color.to_string()).or_insert(0) += 1;
        }

        let full_name = user.full_name();
        if let Some(postal_code) = user.postal_code() {
            if !full_name.is_empty() {
                summary
                    .address_user
                    .insert(full_name, postal_code.to_string());
            }
        }

        update_age_range(summary, user.age);
    }

    grouped
}

/// Widen `summary.age_range` to include `age`.
///
/// An empty range stands for "no ages seen yet".
fn update_age_range(summary: &mut DepartmentSummary, age: u32) {
    let (current_min, current_max) = summary
        .age_bounds()
        .map(|(min, max)| (i64::from(min), i64::from(max)))
        .unwrap_or((i64::MAX, i64::MIN));

    let age = i64::from(age);
    summary.age_range = format!("{}-{}", current_min.min(age), current_max.max(age));
}

/// Total of male and female counts across all departments.
#[allow(dead_code)] // Utility for statistics
pub fn total_counted(summaries: &DepartmentSummaries) -> usize {
    summaries.values().map(|s| s.male + s.female).sum()
}

/// Number of records per department.
pub fn department_sizes(users: &[UserRecord]) -> BTreeMap<String, usize> {
    let mut sizes: BTreeMap<String, usize> = BTreeMap::new();

    for user in users {
        *sizes.entry(user.department().to_string()).or_default() += 1;
    }

    sizes
}

/// Departments sorted by record count, largest first.
pub fn largest_departments(users: &[UserRecord], n: usize) -> Vec<(String, usize)> {
    let mut sizes: Vec<_> = department_sizes(users).into_iter().collect();

    sizes.sort_by_key(|(_, count)| std::cmp::Reverse(*count));
    sizes.truncate(n);

    sizes
}

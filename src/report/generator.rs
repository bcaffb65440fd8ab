//! Users summary report generation.
//!
//! This module renders the department summaries as Markdown or JSON.
//! A report without data renders a single error block; a report with an
//! empty department map renders a single "no data" line.

use crate::models::{DepartmentSummaries, DepartmentSummary, ReportMetadata, UsersReport};
use anyhow::Result;
use serde::Serialize;
use std::io::Write;
use std::path::Path;

/// Shown when the users could not be fetched.
pub const FETCH_ERROR_MESSAGE: &str = "There was an issue fetching data or no data available.";

/// Shown when the fetch succeeded but no departments came back.
pub const NO_DATA_MESSAGE: &str = "No department data found.";

/// Generate a complete Markdown report.
pub fn generate_markdown_report(report: &UsersReport) -> String {
    let mut output = String::new();

    output.push_str("# Users Summary\n\n");
    output.push_str(&generate_metadata_section(&report.metadata));
    output.push_str(&generate_departments_section(report.departments.as_ref()));

    if !report.largest_departments.is_empty() {
        output.push_str(&generate_largest_section(&report.largest_departments));
    }

    output.push_str(&generate_footer());

    output
}

/// Generate the metadata section.
fn generate_metadata_section(metadata: &ReportMetadata) -> String {
    let mut section = String::new();

    section.push_str("## Metadata\n\n");
    section.push_str(&format!("- **Source:** {}\n", metadata.source_url));
    section.push_str(&format!(
        "- **Generated:** {}\n",
        metadata.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    section.push_str(&format!("- **Users Fetched:** {}\n", metadata.users_fetched));
    section.push_str(&format!(
        "- **Duration:** {:.1}s\n",
        metadata.duration_seconds
    ));
    section.push('\n');

    section
}

/// Generate the departments section, or the error / no-data state.
pub fn generate_departments_section(departments: Option<&DepartmentSummaries>) -> String {
    let mut section = String::new();

    section.push_str("## Departments\n\n");

    let departments = match departments {
        Some(departments) => departments,
        None => {
            section.push_str(&format!("> **Error:** {}\n\n", FETCH_ERROR_MESSAGE));
            return section;
        }
    };

    if departments.is_empty() {
        section.push_str(&format!("*{}*\n\n", NO_DATA_MESSAGE));
        return section;
    }

    for (name, summary) in departments {
        section.push_str(&generate_department_block(name, summary));
    }

    section
}

/// Generate the block for a single department.
fn generate_department_block(name: &str, summary: &DepartmentSummary) -> String {
    let mut block = String::new();

    block.push_str(&format!("### {}\n\n", name));
    block.push_str(&format!("- **Male Count:** {}\n", summary.male));
    block.push_str(&format!("- **Female Count:** {}\n", summary.female));
    block.push_str(&format!("- **Age Range:** {}\n\n", summary.age_range));

    block.push_str("**Hair Colors:**\n\n");
    let mut colors: Vec<_> = summary.hair.iter().collect();
    colors.sort();
    for (color, count) in colors {
        block.push_str(&format!("- {}: {}\n", color, count));
    }
    block.push('\n');

    block.push_str("**Address Users:**\n\n");
    let mut addresses: Vec<_> = summary.address_user.iter().collect();
    addresses.sort();
    for (full_name, postal_code) in addresses {
        block.push_str(&format!("- {}: {}\n", full_name, postal_code));
    }
    block.push_str("\n---\n\n");

    block
}

/// Generate the largest departments table.
fn generate_largest_section(largest: &[(String, usize)]) -> String {
    let mut section = String::new();

    section.push_str("## Largest Departments\n\n");
    section.push_str("| Department | Users |\n");
    section.push_str("|:---|:---:|\n");
    for (name, count) in largest {
        section.push_str(&format!("| {} | {} |\n", name, count));
    }
    section.push('\n');

    section
}

/// Generate the report footer.
fn generate_footer() -> String {
    "*Report generated by deptboard*\n".to_string()
}

#[derive(Serialize)]
struct JsonReport<'a> {
    status: &'static str,
    #[serde(flatten)]
    report: &'a UsersReport,
}

/// Generate a JSON report.
pub fn generate_json_report(report: &UsersReport) -> Result<String> {
    let status = if report.has_data() { "ok" } else { "error" };
    serde_json::to_string_pretty(&JsonReport { status, report }).map_err(Into::into)
}

/// Write the report to a file.
pub fn write_report(content: &str, path: &Path) -> Result<()> {
    let mut file = std::fs::File::create(path)?;
    file.write_all(content.as_bytes())?;

    Ok(())
}

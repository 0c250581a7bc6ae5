//! Record validation rules.
//!
//! Pure, synchronous rules applied to one record at a time. No rule ever
//! fails: every violation becomes a [`FieldError`](crate::record::FieldError)
//! annotation, and the record always returns to the batch in its original
//! position.
//!
//! # Rules, in order
//!
//! 1. Email format
//! 2. Composite address (conditional required fields + computed `Address`)
//! 3. Date field formats (month/year tokens)
//! 4. Cross-field date ordering
//! 5. Project existence, gated on the "Update Records" namespace
//!
//! The rules are independent; order only affects how findings accumulate.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

use crate::dates::{is_before_or_same, is_valid_date_token};
use crate::record::Record;
use crate::rules::{RuleSet, UPDATE_RECORDS_NAMESPACE};

/// Field keys of the import sheet this validator reads and writes.
///
/// Provisioned upstream; a record missing any of these keys is treated as
/// having empty cells, never as malformed.
pub mod fields {
    pub const EMAIL: &str = "Email";
    pub const ADDRESS: &str = "Address";
    pub const ADDRESS_LINE_1: &str = "Address Line 1";
    pub const CITY: &str = "City";
    pub const STATE: &str = "State";
    pub const ZIP: &str = "Zip";
    pub const PROJECT_NAME: &str = "Project name";
    pub const PROJECT_START: &str = "Project start";
    pub const PROJECT_END: &str = "Project end";
    pub const CONSTRUCTION_START: &str = "Construction start";
    pub const CONSTRUCTION_END: &str = "Construction end";
}

/// Date fields checked for token format.
const DATE_FIELDS: [&str; 4] = [
    fields::PROJECT_START,
    fields::PROJECT_END,
    fields::CONSTRUCTION_START,
    fields::CONSTRUCTION_END,
];

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern"));

/// Batch-scoped context shared by every record of one batch.
#[derive(Debug, Clone)]
pub struct ValidationContext {
    /// Namespace of the import space, resolved once per batch.
    pub namespace: String,
    /// Injected rule configuration.
    pub rules: RuleSet,
}

impl ValidationContext {
    pub fn new(namespace: impl Into<String>, rules: RuleSet) -> Self {
        Self {
            namespace: namespace.into(),
            rules,
        }
    }
}

/// Apply every rule to one record, annotating it in place.
pub fn validate_record(record: &mut Record, ctx: &ValidationContext) {
    check_email(record);
    check_address(record);
    check_date_formats(record);
    check_date_ordering(record);
    check_project_exists(record, ctx);
}

fn check_email(record: &mut Record) {
    let email = record.text(fields::EMAIL);
    if !email.is_empty() && !EMAIL_RE.is_match(&email) {
        record.add_error(fields::EMAIL, "The Email field must be a valid email address.");
    }
}

/// A partially filled address flags the missing parts; a complete one is
/// combined into the read-only `Address` field. Four empty cells are not an
/// address at all and stay silent.
fn check_address(record: &mut Record) {
    let line1 = record.text(fields::ADDRESS_LINE_1);
    let city = record.text(fields::CITY);
    let state = record.text(fields::STATE);
    let zip = record.text(fields::ZIP);

    if line1.is_empty() && city.is_empty() && state.is_empty() && zip.is_empty() {
        return;
    }

    if line1.is_empty() {
        record.add_error(
            fields::ADDRESS_LINE_1,
            "Address Line 1 is required for a full address.",
        );
    }
    if city.is_empty() {
        record.add_error(fields::CITY, "City is required for a full address.");
    }
    if state.is_empty() {
        record.add_error(fields::STATE, "State is required for a full address.");
    }
    if zip.is_empty() {
        record.add_error(fields::ZIP, "Zip is required for a full address.");
    }

    if !line1.is_empty() && !city.is_empty() && !state.is_empty() && !zip.is_empty() {
        let full = format!("{} {}, {} {}", line1, city, state, zip);
        record.set(fields::ADDRESS, Value::String(full.trim().to_string()));
    }
}

fn check_date_formats(record: &mut Record) {
    for field in DATE_FIELDS {
        let value = record.text(field);
        if !value.is_empty() && !is_valid_date_token(&value) {
            record.add_error(field, format!("Invalid date format for {}.", field));
        }
    }
}

/// Ordering checks run only when both sides are present; an absent date is
/// silently skipped, not an error. A token that already failed its format
/// check still reaches these comparisons and fails them, so such a field
/// carries both a format finding and an ordering finding.
fn check_date_ordering(record: &mut Record) {
    let project_start = record.text(fields::PROJECT_START);
    let project_end = record.text(fields::PROJECT_END);
    let construction_start = record.text(fields::CONSTRUCTION_START);
    let construction_end = record.text(fields::CONSTRUCTION_END);

    if !project_start.is_empty()
        && !project_end.is_empty()
        && !is_before_or_same(&project_start, &project_end)
    {
        record.add_error(
            fields::PROJECT_START,
            "Project start date must be before Project end date.",
        );
    }

    if !construction_start.is_empty()
        && !construction_end.is_empty()
        && !is_before_or_same(&construction_start, &construction_end)
    {
        record.add_error(
            fields::CONSTRUCTION_START,
            "Construction start date must be before Construction end date.",
        );
    }

    // Construction must fall within the project window
    if !project_start.is_empty()
        && !construction_start.is_empty()
        && !is_before_or_same(&project_start, &construction_start)
    {
        record.add_error(
            fields::CONSTRUCTION_START,
            "Construction start date cannot be before the Project start date.",
        );
    }

    if !project_end.is_empty()
        && !construction_end.is_empty()
        && !is_before_or_same(&construction_end, &project_end)
    {
        record.add_error(
            fields::CONSTRUCTION_END,
            "Construction end date cannot be after the Project end date.",
        );
    }
}

fn check_project_exists(record: &mut Record, ctx: &ValidationContext) {
    if ctx.namespace != UPDATE_RECORDS_NAMESPACE {
        return;
    }
    let name = record.text(fields::PROJECT_NAME);
    if !ctx.rules.is_known_project(&name) {
        record.add_error(
            fields::PROJECT_NAME,
            "Invalid project name. In order to update a project, the project name must already exist in the system.",
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn ctx(namespace: &str) -> ValidationContext {
        ValidationContext::new(namespace, RuleSet::default())
    }

    fn record_from(value: serde_json::Value) -> Record {
        serde_json::from_value(value).unwrap()
    }

    fn validated(value: serde_json::Value, namespace: &str) -> Record {
        let mut record = record_from(value);
        validate_record(&mut record, &ctx(namespace));
        record
    }

    #[test]
    fn test_valid_email_passes() {
        let record = validated(json!({ "Email": "a@b.co" }), "");
        assert!(!record.has_errors());
    }

    #[test]
    fn test_invalid_email_flagged() {
        let record = validated(json!({ "Email": "bad-email" }), "");
        assert_eq!(record.errors_for(fields::EMAIL).len(), 1);

        let record = validated(json!({ "Email": "a b@c.co" }), "");
        assert_eq!(record.errors_for(fields::EMAIL).len(), 1);
    }

    #[test]
    fn test_empty_email_is_not_checked() {
        let record = validated(json!({ "Email": "" }), "");
        assert!(!record.has_errors());
    }

    #[test]
    fn test_full_address_is_combined() {
        let record = validated(
            json!({
                "Address Line 1": "5 Main St",
                "City": "Springfield",
                "State": "IL",
                "Zip": "62704"
            }),
            "",
        );

        assert_eq!(
            record.get(fields::ADDRESS),
            Some(&json!("5 Main St Springfield, IL 62704"))
        );
        assert!(!record.has_errors());
    }

    #[test]
    fn test_partial_address_flags_missing_parts() {
        let record = validated(json!({ "City": "Springfield" }), "");

        assert_eq!(record.errors_for(fields::ADDRESS_LINE_1).len(), 1);
        assert_eq!(record.errors_for(fields::STATE).len(), 1);
        assert_eq!(record.errors_for(fields::ZIP).len(), 1);
        assert_eq!(record.errors_for(fields::CITY).len(), 0);
        // No computed value from a partial address
        assert!(record.get(fields::ADDRESS).is_none());
    }

    #[test]
    fn test_absent_address_stays_silent() {
        let record = validated(json!({ "Project name": "Project A" }), "");
        assert!(!record.has_errors());
        assert!(record.get(fields::ADDRESS).is_none());
    }

    #[test]
    fn test_date_format_flagged_per_field() {
        // Only unpaired dates populated, so no ordering checks fire
        let record = validated(
            json!({
                "Project end": "2020-06",
                "Construction start": "2021"
            }),
            "",
        );

        assert_eq!(record.errors_for(fields::CONSTRUCTION_START).len(), 0);
        let errors = record.errors_for(fields::PROJECT_END);
        assert_eq!(errors.len(), 1);
        assert!(errors[0].message.contains("Invalid date format"));
    }

    #[test]
    fn test_numeric_date_cell_coerces_before_checking() {
        // A year column often parses as a number upstream
        let record = validated(json!({ "Project start": 2021 }), "");
        assert!(!record.has_errors());
    }

    #[test]
    fn test_project_range_ordering() {
        let record = validated(
            json!({ "Project start": "2021", "Project end": "2020" }),
            "",
        );
        assert_eq!(record.errors_for(fields::PROJECT_START).len(), 1);
        assert_eq!(record.errors_for(fields::PROJECT_END).len(), 0);
    }

    #[test]
    fn test_construction_range_ordering() {
        let record = validated(
            json!({ "Construction start": "05/2021", "Construction end": "04/2021" }),
            "",
        );
        assert_eq!(record.errors_for(fields::CONSTRUCTION_START).len(), 1);
    }

    #[test]
    fn test_construction_must_start_within_project() {
        let record = validated(
            json!({ "Project start": "03/2021", "Construction start": "02/2021" }),
            "",
        );
        assert!(record
            .errors_for(fields::CONSTRUCTION_START)
            .iter()
            .any(|e| e.message.contains("cannot be before the Project start")));
    }

    #[test]
    fn test_construction_must_end_within_project() {
        let record = validated(
            json!({ "Project end": "06/2021", "Construction end": "07/2021" }),
            "",
        );
        assert!(record
            .errors_for(fields::CONSTRUCTION_END)
            .iter()
            .any(|e| e.message.contains("cannot be after the Project end")));
    }

    #[test]
    fn test_missing_dates_skip_ordering() {
        let record = validated(json!({ "Project start": "2021" }), "");
        assert!(!record.has_errors());
    }

    #[test]
    fn test_invalid_token_reports_format_and_ordering() {
        // An unparseable start date fails its own format check AND the
        // range comparison against the valid end date.
        let record = validated(
            json!({ "Construction start": "2020-01", "Construction end": "2020" }),
            "",
        );

        let errors = record.errors_for(fields::CONSTRUCTION_START);
        assert_eq!(errors.len(), 2);
        assert!(errors.iter().any(|e| e.message.contains("Invalid date format")));
        assert!(errors
            .iter()
            .any(|e| e.message.contains("must be before Construction end")));
    }

    #[test]
    fn test_update_namespace_gates_project_check() {
        let row = json!({ "Project name": "Nonexistent Project" });

        let record = validated(row.clone(), UPDATE_RECORDS_NAMESPACE);
        assert_eq!(record.errors_for(fields::PROJECT_NAME).len(), 1);

        // Any other namespace skips the check entirely
        let record = validated(row.clone(), "");
        assert!(!record.has_errors());
        let record = validated(row, "Create Records");
        assert!(!record.has_errors());
    }

    #[test]
    fn test_known_project_passes_update_check() {
        let record = validated(
            json!({ "Project name": "Project A" }),
            UPDATE_RECORDS_NAMESPACE,
        );
        assert!(!record.has_errors());
    }

    #[test]
    fn test_missing_project_name_fails_update_check() {
        // Coerces to the empty string, which is never in the allow-list
        let record = validated(json!({ "Email": "a@b.co" }), UPDATE_RECORDS_NAMESPACE);
        assert_eq!(record.errors_for(fields::PROJECT_NAME).len(), 1);
    }

    #[test]
    fn test_validation_is_idempotent_on_valid_records() {
        let mut record = record_from(json!({
            "Email": "ops@delta.example",
            "Address Line 1": "5 Main St",
            "City": "Springfield",
            "State": "IL",
            "Zip": "62704",
            "Project name": "Project B",
            "Project start": "01/2020",
            "Project end": "2022",
            "Construction start": "03/2020",
            "Construction end": "12/2021"
        }));
        let context = ctx(UPDATE_RECORDS_NAMESPACE);

        validate_record(&mut record, &context);
        let first_address = record.get(fields::ADDRESS).cloned();
        assert!(!record.has_errors());

        validate_record(&mut record, &context);
        assert_eq!(record.get(fields::ADDRESS).cloned(), first_address);
        assert!(!record.has_errors());
    }
}

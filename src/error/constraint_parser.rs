use regex::Regex;
use std::sync::OnceLock;

/// Parses PostgreSQL constraint violation messages into structured pieces.
pub struct ConstraintParser;

struct Patterns {
    key_value: Regex,
    column_name: Regex,
}

static PATTERNS: OnceLock<Patterns> = OnceLock::new();

impl ConstraintParser {
    fn patterns() -> &'static Patterns {
        PATTERNS.get_or_init(|| Patterns {
            // "Key (field)=(value)" in DETAIL lines
            key_value: Regex::new(r"Key \(([^)]+)\)=\(([^)]*)\)").unwrap(),
            // quoted column names in not-null messages
            column_name: Regex::new(r#"column "([^"]+)""#).unwrap(),
        })
    }

    /// Splits a conventional constraint name (`<table>_<field>_key` or
    /// `<table>_<field>_fkey`) into (table, field).
    pub fn parse_constraint_name(constraint: &str) -> Option<(String, String)> {
        let rest = constraint
            .strip_suffix("_key")
            .or_else(|| constraint.strip_suffix("_fkey"))
            .or_else(|| constraint.strip_suffix("_check"))?;
        let (table, field) = rest.split_once('_')?;
        Some((table.to_string(), field.to_string()))
    }

    /// Extracts (field, value) from a `Key (field)=(value)` DETAIL line.
    pub fn extract_key_value(message: &str) -> Option<(String, String)> {
        let captures = Self::patterns().key_value.captures(message)?;
        Some((captures[1].to_string(), captures[2].to_string()))
    }

    /// Extracts the column name from a not-null violation message.
    pub fn extract_column(message: &str) -> Option<String> {
        let captures = Self::patterns().column_name.captures(message)?;
        Some(captures[1].to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_unique_constraint_name() {
        assert_eq!(
            ConstraintParser::parse_constraint_name("users_email_key"),
            Some(("users".to_string(), "email".to_string()))
        );
    }

    #[test]
    fn parses_foreign_key_constraint_name() {
        assert_eq!(
            ConstraintParser::parse_constraint_name("reservations_availability_id_fkey"),
            Some(("reservations".to_string(), "availability_id".to_string()))
        );
    }

    #[test]
    fn rejects_unconventional_names() {
        assert_eq!(ConstraintParser::parse_constraint_name("pkey"), None);
    }

    #[test]
    fn extracts_key_value_from_detail() {
        let message = "duplicate key value violates unique constraint \"users_email_key\"\nDETAIL: Key (email)=(ana@example.com) already exists.";
        assert_eq!(
            ConstraintParser::extract_key_value(message),
            Some(("email".to_string(), "ana@example.com".to_string()))
        );
    }

    #[test]
    fn extracts_column_from_not_null_message() {
        let message = "null value in column \"price\" violates not-null constraint";
        assert_eq!(
            ConstraintParser::extract_column(message),
            Some("price".to_string())
        );
    }
}

use crate::error::{AppError, ConstraintParser};
use diesel::result::{DatabaseErrorKind, Error as DieselError};

/// Converts Diesel errors into structured `AppError` variants, extracting
/// entity/field/value information from constraint violation messages where
/// possible.
pub struct DatabaseErrorConverter;

impl DatabaseErrorConverter {
    pub fn convert_diesel_error(error: DieselError, operation: &str) -> AppError {
        match error {
            DieselError::DatabaseError(kind, info) => {
                Self::convert_database_error(kind, info, operation)
            }
            DieselError::NotFound => AppError::NotFound {
                entity: "resource".to_string(),
                field: "id".to_string(),
                value: "unknown".to_string(),
            },
            other => AppError::Database {
                operation: operation.to_string(),
                source: anyhow::Error::from(other),
            },
        }
    }

    fn convert_database_error(
        kind: DatabaseErrorKind,
        info: Box<dyn diesel::result::DatabaseErrorInformation + Send + Sync>,
        operation: &str,
    ) -> AppError {
        let message = info.message();
        let constraint_name = info.constraint_name();

        match kind {
            DatabaseErrorKind::UniqueViolation => {
                let parsed = constraint_name
                    .and_then(ConstraintParser::parse_constraint_name)
                    .map(|(entity, field)| {
                        let value = ConstraintParser::extract_key_value(message)
                            .map(|(_, value)| value)
                            .unwrap_or_else(|| "duplicate_value".to_string());
                        (entity, field, value)
                    });
                match parsed {
                    Some((entity, field, value)) => AppError::Duplicate {
                        entity,
                        field,
                        value,
                    },
                    None => AppError::Database {
                        operation: operation.to_string(),
                        source: anyhow::Error::msg(format!(
                            "Unique constraint violation: {}",
                            message
                        )),
                    },
                }
            }
            DatabaseErrorKind::NotNullViolation => match ConstraintParser::extract_column(message) {
                Some(field) => AppError::Validation {
                    reason: format!("Field {} is required", field),
                    field,
                },
                None => AppError::Database {
                    operation: operation.to_string(),
                    source: anyhow::Error::msg(format!(
                        "Not null constraint violation: {}",
                        message
                    )),
                },
            },
            DatabaseErrorKind::ForeignKeyViolation => {
                let parsed = constraint_name.and_then(ConstraintParser::parse_constraint_name);
                match parsed {
                    Some((entity, field)) => AppError::Validation {
                        reason: format!("Invalid reference from {}", entity),
                        field,
                    },
                    None => AppError::Database {
                        operation: operation.to_string(),
                        source: anyhow::Error::msg(format!(
                            "Foreign key constraint violation: {}",
                            message
                        )),
                    },
                }
            }
            DatabaseErrorKind::CheckViolation => {
                let parsed = constraint_name.and_then(ConstraintParser::parse_constraint_name);
                match parsed {
                    Some((entity, field)) => AppError::Validation {
                        reason: format!("Check constraint failed for {}", entity),
                        field,
                    },
                    None => AppError::Database {
                        operation: operation.to_string(),
                        source: anyhow::Error::msg(format!(
                            "Check constraint violation: {}",
                            message
                        )),
                    },
                }
            }
            _ => AppError::Database {
                operation: operation.to_string(),
                source: anyhow::Error::msg(format!("Database error: {}", message)),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct MockInfo {
        message: String,
        constraint_name: Option<String>,
    }

    impl diesel::result::DatabaseErrorInformation for MockInfo {
        fn message(&self) -> &str {
            &self.message
        }
        fn details(&self) -> Option<&str> {
            None
        }
        fn hint(&self) -> Option<&str> {
            None
        }
        fn table_name(&self) -> Option<&str> {
            None
        }
        fn column_name(&self) -> Option<&str> {
            None
        }
        fn constraint_name(&self) -> Option<&str> {
            self.constraint_name.as_deref()
        }
        fn statement_position(&self) -> Option<i32> {
            None
        }
    }

    #[test]
    fn not_found_maps_to_not_found() {
        let result =
            DatabaseErrorConverter::convert_diesel_error(DieselError::NotFound, "find reservation");
        assert!(matches!(result, AppError::NotFound { .. }));
    }

    #[test]
    fn unique_violation_maps_to_duplicate_with_value() {
        let info = MockInfo {
            message: "duplicate key value violates unique constraint \"users_email_key\"\nDETAIL: Key (email)=(ana@example.com) already exists.".to_string(),
            constraint_name: Some("users_email_key".to_string()),
        };
        let error = DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, Box::new(info));
        let result = DatabaseErrorConverter::convert_diesel_error(error, "insert user");

        match result {
            AppError::Duplicate {
                entity,
                field,
                value,
            } => {
                assert_eq!(entity, "users");
                assert_eq!(field, "email");
                assert_eq!(value, "ana@example.com");
            }
            other => panic!("Expected Duplicate error, got: {:?}", other),
        }
    }

    #[test]
    fn not_null_violation_maps_to_validation() {
        let info = MockInfo {
            message: "null value in column \"price\" violates not-null constraint".to_string(),
            constraint_name: None,
        };
        let error = DieselError::DatabaseError(DatabaseErrorKind::NotNullViolation, Box::new(info));
        let result = DatabaseErrorConverter::convert_diesel_error(error, "insert reservation");

        match result {
            AppError::Validation { field, reason } => {
                assert_eq!(field, "price");
                assert!(reason.contains("required"));
            }
            other => panic!("Expected Validation error, got: {:?}", other),
        }
    }

    #[test]
    fn foreign_key_violation_maps_to_validation() {
        let info = MockInfo {
            message: "insert or update on table \"reservations\" violates foreign key constraint \"reservations_availability_id_fkey\"".to_string(),
            constraint_name: Some("reservations_availability_id_fkey".to_string()),
        };
        let error =
            DieselError::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, Box::new(info));
        let result = DatabaseErrorConverter::convert_diesel_error(error, "insert reservation");

        match result {
            AppError::Validation { field, .. } => assert_eq!(field, "availability_id"),
            other => panic!("Expected Validation error, got: {:?}", other),
        }
    }
}

//! Parsing of PostgreSQL constraint violation details.
//!
//! Postgres reports constraint failures with a predictable shape: a
//! constraint name following the `{table}_{columns}_{suffix}` convention and
//! a `DETAIL: Key (col)=(value) already exists.` line. This parser pulls the
//! entity, field, and offending value out of both so the API can answer with
//! a structured error instead of a raw database message.

/// Utility for extracting structured information from constraint messages.
pub struct ConstraintParser;

impl ConstraintParser {
    /// Parses a unique violation into `(entity, field, value)`.
    ///
    /// Prefers the `DETAIL` line for field and value since it survives
    /// composite constraints; falls back to the constraint name. For a
    /// composite key the last column is reported (for the
    /// `(user_id, service_name)` constraint that is the service token, which
    /// is the part the caller chose).
    pub fn parse_unique_violation(
        message: &str,
        constraint_name: Option<&str>,
    ) -> Option<(String, String, String)> {
        let entity = constraint_name
            .and_then(Self::parse_constraint_name)
            .map(|(entity, _)| entity)
            .or_else(|| Self::extract_table_from_message(message))?;

        if let Some((field, value)) = Self::extract_key_value_from_message(message) {
            return Some((entity, field, value));
        }

        let (_, field) = constraint_name.and_then(Self::parse_constraint_name)?;
        Some((entity, field, "unknown".to_string()))
    }

    /// Parses a foreign key violation into `(entity, field, referenced_value)`.
    pub fn parse_foreign_key_violation(
        message: &str,
        constraint_name: Option<&str>,
    ) -> Option<(String, String, String)> {
        let (entity, field) = constraint_name.and_then(Self::parse_foreign_key_constraint_name)?;
        let value = Self::extract_key_value_from_message(message)
            .map(|(_, value)| value)
            .unwrap_or_else(|| "unknown".to_string());
        Some((entity, field, value))
    }

    /// Parses a not-null violation into `(entity, field)`.
    pub fn parse_not_null_violation(
        message: &str,
        constraint_name: Option<&str>,
    ) -> Option<(String, String)> {
        let field = Self::extract_column_from_message(message)?;
        let entity = constraint_name
            .and_then(Self::parse_constraint_name)
            .map(|(entity, _)| entity)
            .or_else(|| Self::extract_table_from_message(message))
            .unwrap_or_else(|| "record".to_string());
        Some((entity, field))
    }

    /// Splits `{table}_{columns}_key` style constraint names.
    ///
    /// Table names in this schema carry no underscore, so the first segment
    /// is the table and everything up to the suffix is the column list.
    pub fn parse_constraint_name(constraint_name: &str) -> Option<(String, String)> {
        let stripped = constraint_name
            .strip_suffix("_key")
            .or_else(|| constraint_name.strip_suffix("_idx"))
            .or_else(|| constraint_name.strip_suffix("_fkey"))?;

        let (table, columns) = stripped.split_once('_')?;
        Some((table.to_string(), columns.to_string()))
    }

    /// Splits `{table}_{column}_fkey` constraint names, keeping the full
    /// column name (foreign keys reference a single column here).
    pub fn parse_foreign_key_constraint_name(constraint_name: &str) -> Option<(String, String)> {
        let stripped = constraint_name.strip_suffix("_fkey")?;
        let (table, column) = stripped.split_once('_')?;
        Some((table.to_string(), column.to_string()))
    }

    /// Extracts `(field, value)` from a `DETAIL: Key (col)=(value)` line.
    ///
    /// Composite keys (`Key (a, b)=(x, y)`) report the last pair.
    pub fn extract_key_value_from_message(message: &str) -> Option<(String, String)> {
        let detail_start = message.find("Key (")?;
        let rest = &message[detail_start + "Key (".len()..];
        let fields_end = rest.find(")=(")?;
        let fields = &rest[..fields_end];
        let values_part = &rest[fields_end + ")=(".len()..];
        let values_end = values_part.find(')')?;
        let values = &values_part[..values_end];

        let field = fields.rsplit(", ").next()?.trim();
        let value = values.rsplit(", ").next()?.trim();
        Some((field.to_string(), value.to_string()))
    }

    /// Extracts the column name from a not-null violation message.
    pub fn extract_column_from_message(message: &str) -> Option<String> {
        let start = message.find("column \"")? + "column \"".len();
        let rest = &message[start..];
        let end = rest.find('"')?;
        Some(rest[..end].to_string())
    }

    /// Extracts the table name from a `relation "..."` or `table "..."` clause.
    pub fn extract_table_from_message(message: &str) -> Option<String> {
        let start = message
            .find("relation \"")
            .map(|i| i + "relation \"".len())
            .or_else(|| message.find("table \"").map(|i| i + "table \"".len()))?;
        let rest = &message[start..];
        let end = rest.find('"')?;
        Some(rest[..end].to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_simple_unique_constraint() {
        let message = "duplicate key value violates unique constraint \"users_email_key\"\nDETAIL: Key (email)=(test@example.com) already exists.";
        let result = ConstraintParser::parse_unique_violation(message, Some("users_email_key"));
        assert_eq!(
            result,
            Some((
                "users".to_string(),
                "email".to_string(),
                "test@example.com".to_string()
            ))
        );
    }

    #[test]
    fn parses_composite_unique_constraint_to_last_column() {
        let message = "duplicate key value violates unique constraint \"subscriptions_user_id_service_name_key\"\nDETAIL: Key (user_id, service_name)=(7a6b1c9e-0000-0000-0000-000000000001, YOUTUBE_PREMIUM) already exists.";
        let result = ConstraintParser::parse_unique_violation(
            message,
            Some("subscriptions_user_id_service_name_key"),
        );
        assert_eq!(
            result,
            Some((
                "subscriptions".to_string(),
                "service_name".to_string(),
                "YOUTUBE_PREMIUM".to_string()
            ))
        );
    }

    #[test]
    fn parses_constraint_name() {
        assert_eq!(
            ConstraintParser::parse_constraint_name("users_username_key"),
            Some(("users".to_string(), "username".to_string()))
        );
    }

    #[test]
    fn parses_foreign_key_constraint_name() {
        assert_eq!(
            ConstraintParser::parse_foreign_key_constraint_name("subscriptions_user_id_fkey"),
            Some(("subscriptions".to_string(), "user_id".to_string()))
        );
    }

    #[test]
    fn extracts_key_value_from_detail() {
        let message = "duplicate key value violates unique constraint \"users_email_key\"\nDETAIL: Key (email)=(test@example.com) already exists.";
        assert_eq!(
            ConstraintParser::extract_key_value_from_message(message),
            Some(("email".to_string(), "test@example.com".to_string()))
        );
    }

    #[test]
    fn extracts_column_from_not_null_message() {
        let message = "null value in column \"email\" violates not-null constraint";
        assert_eq!(
            ConstraintParser::extract_column_from_message(message),
            Some("email".to_string())
        );
    }

    #[test]
    fn extracts_table_from_fk_message() {
        let message = "insert or update on table \"subscriptions\" violates foreign key constraint \"subscriptions_user_id_fkey\"";
        assert_eq!(
            ConstraintParser::extract_table_from_message(message),
            Some("subscriptions".to_string())
        );
    }
}

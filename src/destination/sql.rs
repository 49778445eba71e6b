//! T-SQL statement building for the SQL Server destination.

use crate::types::FieldDescriptor;

/// Bracket-quote a SQL Server identifier.
pub fn quote_ident(name: &str) -> String {
    format!("[{}]", name.replace(']', "]]"))
}

/// `DROP TABLE IF EXISTS` for the destination table.
pub fn drop_table(table: &str) -> String {
    format!("DROP TABLE IF EXISTS {}", quote_ident(table))
}

/// `CREATE TABLE` from the inferred fields, in header order.
///
/// Each `type_definition` is a literal clause; duplicate column names are
/// passed through unchanged and left for the server to reject.
pub fn create_table(table: &str, fields: &[FieldDescriptor]) -> String {
    let columns = fields
        .iter()
        .map(|f| format!("{} {}", quote_ident(&f.name), f.type_definition))
        .collect::<Vec<_>>()
        .join(", ");
    format!("CREATE TABLE {} ({})", quote_ident(table), columns)
}

/// `TRUNCATE TABLE` for the destination table.
pub fn truncate_table(table: &str) -> String {
    format!("TRUNCATE TABLE {}", quote_ident(table))
}

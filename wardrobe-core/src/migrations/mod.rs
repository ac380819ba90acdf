//! Document store migrations - embedded SQL files
//!
//! Each migration is a tuple of (name, sql_content), applied in order and
//! recorded in `sys_migrations`.

/// All migrations, embedded at compile time.
///
/// When adding a migration, create `NNN_description.sql` and append it here.
pub const MIGRATIONS: &[(&str, &str)] = &[
    ("000_migrations.sql", include_str!("000_migrations.sql")),
    ("001_documents.sql", include_str!("001_documents.sql")),
];

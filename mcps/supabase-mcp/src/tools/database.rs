//! Database tools backed by the Management API's SQL endpoint

use schemars::JsonSchema;
use serde::Deserialize;

use super::registry::{tool, Access, ToolDescriptor};
use super::ProjectIdParams;
use crate::platform::{ApplyMigrationOptions, ExecuteSqlOptions};
use crate::query::quote_literal;

#[derive(Debug, Deserialize, JsonSchema)]
pub struct ListTablesParams {
    /// Project ref
    pub project_id: String,
    /// Schemas to include
    #[serde(default = "default_schemas")]
    pub schemas: Vec<String>,
}

fn default_schemas() -> Vec<String> {
    vec!["public".to_string()]
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct ApplyMigrationParams {
    /// Project ref
    pub project_id: String,
    /// Migration name in snake_case
    pub name: String,
    /// SQL to apply
    pub query: String,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct ExecuteSqlParams {
    /// Project ref
    pub project_id: String,
    /// SQL to run
    pub query: String,
}

fn list_tables_sql(schemas: &[String]) -> String {
    let schemas = if schemas.is_empty() {
        default_schemas()
    } else {
        schemas.to_vec()
    };
    let list = schemas
        .iter()
        .map(|s| quote_literal(s))
        .collect::<Vec<_>>()
        .join(", ");

    format!(
        "SELECT n.nspname AS schema, c.relname AS name, c.relrowsecurity AS rls_enabled, \
         c.reltuples::bigint AS rows \
         FROM pg_catalog.pg_class c \
         JOIN pg_catalog.pg_namespace n ON n.oid = c.relnamespace \
         WHERE c.relkind IN ('r', 'p') AND n.nspname IN ({}) \
         ORDER BY n.nspname, c.relname",
        list
    )
}

const LIST_EXTENSIONS_SQL: &str = "SELECT name, default_version, installed_version, comment \
     FROM pg_catalog.pg_available_extensions ORDER BY name";

pub fn tools() -> Vec<ToolDescriptor> {
    vec![
        tool(
            "list_tables",
            "Lists all tables in one or more schemas.",
            Access::Read,
            |ctx, p: ListTablesParams| async move {
                let options = ExecuteSqlOptions {
                    query: list_tables_sql(&p.schemas),
                    read_only: true,
                };
                ctx.platform.execute_sql(&p.project_id, options).await
            },
        ),
        tool(
            "list_extensions",
            "Lists all extensions in the database.",
            Access::Read,
            |ctx, p: ProjectIdParams| async move {
                let options = ExecuteSqlOptions {
                    query: LIST_EXTENSIONS_SQL.to_string(),
                    read_only: true,
                };
                ctx.platform.execute_sql(&p.project_id, options).await
            },
        ),
        tool(
            "list_migrations",
            "Lists all migrations in the database.",
            Access::Read,
            |ctx, p: ProjectIdParams| async move { ctx.platform.list_migrations(&p.project_id).await },
        ),
        tool(
            "apply_migration",
            "Applies a migration to the database. Use this for DDL operations.",
            Access::Write,
            |ctx, p: ApplyMigrationParams| async move {
                let options = ApplyMigrationOptions {
                    name: p.name,
                    query: p.query,
                };
                ctx.platform.apply_migration(&p.project_id, options).await
            },
        ),
        tool(
            "execute_project_sql",
            "Executes raw SQL in the Postgres database of a Supabase project. \
             Use apply_migration for DDL operations.",
            Access::Read,
            |ctx, p: ExecuteSqlParams| async move {
                let options = ExecuteSqlOptions {
                    query: p.query,
                    read_only: ctx.read_only,
                };
                ctx.platform.execute_sql(&p.project_id, options).await
            },
        ),
    ]
}

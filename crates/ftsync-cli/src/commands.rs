//! Command handlers.
//!
//! Each handler takes a loaded [`MappingConfig`] and returns the text to
//! print, so `main` stays a thin dispatcher.

use anyhow::{Context, Result, bail};
use ftsync_core::{ClassMetadata, EntityConfig, MappingConfig, MetadataLoader};
use ftsync_pg::{SearchVectorStore, TableName, ddl::schema_statements};

/// Entities selected by an optional `--entity` filter.
pub fn select_entities<'a>(
    config: &'a MappingConfig,
    entity: Option<&str>,
) -> Result<Vec<&'a EntityConfig>> {
    match entity {
        Some(name) => match config.entity(name) {
            Some(found) => Ok(vec![found]),
            None => bail!("entity `{name}` is not declared in the mapping file"),
        },
        None => Ok(config.entities.iter().collect()),
    }
}

fn table_for(config: &MappingConfig, entity: &EntityConfig) -> TableName {
    TableName::in_schema(entity.table_name(), config.database.schema.as_deref())
}

fn load_metadata(entity: &EntityConfig) -> Result<ClassMetadata> {
    MetadataLoader::load(&entity.schema())
        .with_context(|| format!("invalid mapping for entity `{}`", entity.name))
}

/// Validate every entity. Fails listing each broken entity.
pub fn cmd_check(config: &MappingConfig) -> Result<String> {
    let mut report = String::new();
    let mut failures = Vec::new();

    for entity in &config.entities {
        match MetadataLoader::load(&entity.schema()) {
            Ok(metadata) => {
                log::debug!("{} validated", entity.name);
                report.push_str(&format!(
                    "ok    {} ({} search vector(s))\n",
                    entity.name,
                    metadata.mappings.len()
                ));
            }
            Err(e) => failures.push(format!("{}: {e}", entity.name)),
        }
    }

    if !failures.is_empty() {
        bail!(
            "{} of {} entities failed validation:\n  {}",
            failures.len(),
            config.entities.len(),
            failures.join("\n  ")
        );
    }
    report.push_str(&format!("{} entities OK", config.entities.len()));
    Ok(report)
}

/// Resolved mappings of every entity, as pretty JSON.
pub fn cmd_mappings(config: &MappingConfig) -> Result<String> {
    let metadata = config
        .entities
        .iter()
        .map(load_metadata)
        .collect::<Result<Vec<_>>>()?;
    Ok(serde_json::to_string_pretty(&metadata)?)
}

/// DDL for the selected entities, one statement per line.
pub fn cmd_ddl(config: &MappingConfig, entity: Option<&str>) -> Result<String> {
    let mut out = Vec::new();
    for entity in select_entities(config, entity)? {
        let metadata = load_metadata(entity)?;
        if metadata.is_empty() {
            continue;
        }
        out.push(format!("-- {}", entity.name));
        for statement in schema_statements(&table_for(config, entity), &metadata) {
            out.push(format!("{statement};"));
        }
    }
    Ok(out.join("\n"))
}

/// Apply the DDL for the selected entities.
pub async fn cmd_migrate(config: &MappingConfig, entity: Option<&str>) -> Result<String> {
    let entities = select_entities(config, entity)?;
    // Validate everything before touching the database.
    let planned = entities
        .into_iter()
        .map(|e| Ok((e, load_metadata(e)?)))
        .collect::<Result<Vec<_>>>()?;

    let store = SearchVectorStore::connect(&config.database)
        .await
        .context("failed to connect to PostgreSQL")?;

    let mut columns = 0;
    for (entity, metadata) in &planned {
        let table = table_for(config, entity);
        store
            .ensure_schema(&table, metadata)
            .await
            .with_context(|| format!("failed to migrate {table}"))?;
        columns += metadata.mappings.len();
    }
    Ok(format!(
        "Migrated {columns} search vector column(s) across {} entities",
        planned.len()
    ))
}

//! Mapping files resolved through the metadata loader.

use ftsync_core::{Error, MappingConfig, MetadataLoader, Searchable};

use crate::common::{Article, MAPPING_TOML};

#[test]
fn test_config_schema_matches_code_schema() {
    let config = MappingConfig::from_toml_str(MAPPING_TOML).unwrap();
    let from_config = config.entity("Article").unwrap().schema();

    let a = MetadataLoader::load(&from_config).unwrap();
    let b = MetadataLoader::load(&Article::schema()).unwrap();
    assert_eq!(a, b);
}

#[test]
fn test_config_table_names() {
    let config = MappingConfig::from_toml_str(MAPPING_TOML).unwrap();
    assert_eq!(config.entity("Article").unwrap().table_name(), "articles");
    assert_eq!(config.entity("Invoice").unwrap().table_name(), "invoice");
}

#[test]
fn test_config_disallowed_type_fails_on_load() {
    let config = MappingConfig::from_toml_str(MAPPING_TOML).unwrap();
    let invoice = config.entity("Invoice").unwrap().schema();

    let err = MetadataLoader::load(&invoice).unwrap_err();
    assert!(err.is_mapping_error());
    let Error::UnsupportedColumnType { column_type, .. } = err else {
        unreachable!("Expected UnsupportedColumnType");
    };
    assert_eq!(column_type, "decimal");
}

//! File-based loading and schema binding tests.

use std::fs;
use std::sync::Arc;

use tabula_ingest::{
    IngestError, LoadOptions, LoadedTable, SchemaRegistry, read_bound_table, read_table,
    read_tables,
};
use tabula_model::Value;
use tabula_schema::{ColumnOptions, SchemaBuilder, TableSchema};

fn people_schema() -> Arc<TableSchema> {
    let schema = SchemaBuilder::new("people")
        .string("name", ColumnOptions::default())
        .unwrap()
        .integer("age", ColumnOptions::default())
        .unwrap()
        .build()
        .unwrap();
    Arc::new(schema)
}

#[test]
fn read_table_uses_the_file_stem_as_name() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("People.csv");
    fs::write(&path, "Name,Age\nAnna,36\n").unwrap();

    let table = read_table(&path, &LoadOptions::default()).unwrap();
    assert_eq!(table.name(), "People");
    assert_eq!(table.size(), 1);
    assert_eq!(table.cell(1, 1), Some(&Value::from("36")));
}

#[test]
fn missing_file_is_a_typed_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = read_table(&dir.path().join("gone.csv"), &LoadOptions::default()).unwrap_err();
    assert!(matches!(err, IngestError::FileNotFound { .. }));
}

#[test]
fn bound_loading_coerces_rows() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("people.csv");
    fs::write(&path, "Name,Age\nAnna,36\nBert,old\n").unwrap();

    let bound = read_bound_table(&path, people_schema(), &LoadOptions::default()).unwrap();
    assert_eq!(bound.row(1).unwrap().at(1), Some(&Value::Int(36)));
    assert!(bound.row(1).unwrap().is_valid());
    // "old" does not parse but loading keeps going.
    assert!(!bound.row(2).unwrap().is_valid());
    assert_eq!(
        bound.row(2).unwrap().column_errors()["age"][0].code(),
        "not_an_integer"
    );
}

#[test]
fn directory_loading_binds_by_file_stem() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("People.csv"), "Name,Age\nAnna,36\n").unwrap();
    fs::write(dir.path().join("notes.csv"), "Text\nhello\n").unwrap();
    fs::write(dir.path().join("ignore.txt"), "not a table\n").unwrap();

    let mut registry = SchemaRegistry::new();
    registry.register(people_schema());

    let tables = read_tables(dir.path(), &registry, &LoadOptions::default()).unwrap();
    assert_eq!(tables.len(), 2);
    // Matching is case-insensitive on the stem.
    assert!(matches!(tables.get("People"), Some(LoadedTable::Bound(_))));
    assert!(matches!(tables.get("notes"), Some(LoadedTable::Plain(_))));
}

#[test]
fn missing_directory_is_a_typed_error() {
    let registry = SchemaRegistry::new();
    let err = read_tables(
        std::path::Path::new("/nonexistent-tabula-dir"),
        &registry,
        &LoadOptions::default(),
    )
    .unwrap_err();
    assert!(matches!(err, IngestError::DirectoryNotFound { .. }));
}

#[test]
fn registry_lookups_are_case_insensitive() {
    let mut registry = SchemaRegistry::new();
    registry.register(people_schema());
    assert!(registry.get("PEOPLE").is_some());
    assert!(registry.get("nobody").is_none());
    assert_eq!(registry.names(), ["people"]);
}

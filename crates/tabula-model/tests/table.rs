//! Tests for the table data model.

use tabula_model::{
    AccessorSpec, ColumnSpecifier, Table, TableError, TableOptions, TableParts, Value,
};

fn row(cells: &[&str]) -> Vec<Value> {
    cells.iter().map(|c| Value::from(*c)).collect()
}

fn people() -> Vec<Vec<Value>> {
    vec![
        row(&["Name", "Age", "City"]),
        vec![Value::from("Anna"), Value::Int(36), Value::from("Bern")],
        vec![Value::from("Benj"), Value::Int(28), Value::from("Basel")],
        row(&["total", "2", ""]),
    ]
}

#[test]
fn size_accounts_for_headers_and_footer() {
    let data = people();

    let plain = Table::from_rows(
        data.clone(),
        TableOptions {
            has_headers: false,
            ..TableOptions::default()
        },
    )
    .expect("build table");
    assert_eq!(plain.size(), 4);

    let headered = Table::from_rows(data.clone(), TableOptions::default()).expect("build table");
    assert_eq!(headered.size(), 3);

    let footered = Table::from_rows(
        data.clone(),
        TableOptions {
            has_headers: false,
            has_footer: true,
            ..TableOptions::default()
        },
    )
    .expect("build table");
    assert_eq!(footered.size(), 3);

    let both = Table::from_rows(
        data,
        TableOptions {
            has_footer: true,
            ..TableOptions::default()
        },
    )
    .expect("build table");
    assert_eq!(both.size(), 2);
}

#[test]
fn size_never_goes_negative() {
    let one_row = Table::from_rows(
        vec![row(&["only"])],
        TableOptions {
            has_footer: true,
            ..TableOptions::default()
        },
    )
    .expect("build table");
    assert_eq!(one_row.size(), 0);

    let empty = Table::new(TableOptions {
        has_footer: true,
        ..TableOptions::default()
    });
    assert_eq!(empty.size(), 0);
}

#[test]
fn column_count_follows_first_row() {
    let empty = Table::new(TableOptions::default());
    assert_eq!(empty.column_count(), None);

    let zero_width = Table::from_rows(vec![vec![]], TableOptions::default()).expect("build table");
    assert_eq!(zero_width.column_count(), Some(0));

    let three = Table::from_rows(people(), TableOptions::default()).expect("build table");
    assert_eq!(three.column_count(), Some(3));
}

#[test]
fn body_rows_are_offset_by_the_header() {
    let table = Table::from_rows(people(), TableOptions::default()).expect("build table");

    let first_body = table.body_row(0).expect("body row 0");
    assert_eq!(first_body.at(0), Some(&Value::from("Anna")));

    // Absolute indexing still reaches the header.
    let header = table.row(0).expect("row 0");
    assert_eq!(header.at(0), Some(&Value::from("Name")));

    assert_eq!(table.cell(1, 1), Some(&Value::Int(36)));
}

#[test]
fn footer_needs_a_second_row_when_headers_are_on() {
    let single = Table::from_rows(
        vec![row(&["only"])],
        TableOptions {
            has_footer: true,
            ..TableOptions::default()
        },
    )
    .expect("build table");
    assert!(single.footer().is_none());

    let table = Table::from_rows(
        people(),
        TableOptions {
            has_footer: true,
            ..TableOptions::default()
        },
    )
    .expect("build table");
    let footer = table.footer().expect("footer row");
    assert_eq!(footer.at(0), Some(&Value::from("total")));
}

#[test]
fn body_iteration_skips_header_and_footer() {
    let table = Table::from_rows(
        people(),
        TableOptions {
            has_footer: true,
            ..TableOptions::default()
        },
    )
    .expect("build table");

    let names: Vec<&Value> = table.body().filter_map(|r| r.at(0)).collect();
    assert_eq!(names, vec![&Value::from("Anna"), &Value::from("Benj")]);

    assert_eq!(table.rows().count(), 4);
}

#[test]
fn accessor_maps_stay_inverse_with_gaps() {
    let mut table = Table::from_rows(people(), TableOptions::default()).expect("build table");
    table.set_accessors(Some(AccessorSpec::List(vec![
        Some("a".into()),
        None,
        Some("c".into()),
    ])));

    assert_eq!(table.accessor_columns().get("a"), Some(&0));
    assert_eq!(table.accessor_columns().get("c"), Some(&2));
    assert_eq!(table.accessor_columns().len(), 2);
    assert_eq!(table.column_accessors().get(&0).map(String::as_str), Some("a"));
    assert_eq!(table.column_accessors().get(&2).map(String::as_str), Some("c"));
    assert_eq!(table.accessors(), vec![Some("a"), None, Some("c")]);

    table.set_accessors(None);
    assert!(!table.has_accessors());
    assert!(table.accessors().is_empty());
}

#[test]
fn accessors_from_headers_normalizes_names() {
    let mut table = Table::from_rows(
        vec![
            row(&["First Name", "Weird%Chars", ""]),
            row(&["Anna", "x", "y"]),
        ],
        TableOptions::default(),
    )
    .expect("build table");

    table.accessors_from_headers().expect("derive accessors");
    assert_eq!(table.accessors(), vec![Some("first_name"), Some("weird_chars")]);

    let row = table.body_row(0).expect("body row");
    assert_eq!(
        row.get(ColumnSpecifier::Accessor("first_name")),
        Ok(&Value::from("Anna"))
    );
}

#[test]
fn accessors_from_headers_requires_headers() {
    let mut table = Table::from_rows(
        vec![row(&["a", "b"])],
        TableOptions {
            has_headers: false,
            ..TableOptions::default()
        },
    )
    .expect("build table");
    assert_eq!(table.accessors_from_headers(), Err(TableError::NoHeaders));
}

#[test]
fn specifier_failures_are_typed() {
    let table = Table::from_rows(people(), TableOptions::default()).expect("build table");

    assert_eq!(
        table.index_of(ColumnSpecifier::Accessor("nope")),
        Err(TableError::no_such_accessor("nope"))
    );
    assert_eq!(
        table.index_of(ColumnSpecifier::Header("Nope")),
        Err(TableError::no_such_header("Nope"))
    );
    assert_eq!(
        table.index_of(ColumnSpecifier::Index(9)),
        Err(TableError::column_out_of_bounds(9, 3))
    );

    let headerless = Table::from_rows(
        vec![row(&["a"])],
        TableOptions {
            has_headers: false,
            ..TableOptions::default()
        },
    )
    .expect("build table");
    assert_eq!(
        headerless.index_of(ColumnSpecifier::Header("a")),
        Err(TableError::NoHeaders)
    );
}

#[test]
fn parts_construction_matches_data_construction() {
    let from_parts = Table::from_parts(
        TableParts {
            header: Some(row(&["Name", "Age", "City"])),
            body: vec![
                vec![Value::from("Anna"), Value::Int(36), Value::from("Bern")],
                vec![Value::from("Benj"), Value::Int(28), Value::from("Basel")],
            ],
            footer: Some(row(&["total", "2", ""])),
        },
        TableOptions::default(),
    )
    .expect("build from parts");

    let from_rows = Table::from_rows(
        people(),
        TableOptions {
            has_headers: true,
            has_footer: true,
            ..TableOptions::default()
        },
    )
    .expect("build from rows");

    assert_eq!(from_parts, from_rows);
    assert!(from_parts.has_headers());
    assert!(from_parts.has_footer());

    let body_only = Table::from_parts(
        TableParts {
            body: vec![row(&["x"])],
            ..TableParts::default()
        },
        TableOptions::default(),
    )
    .expect("build from body");
    assert!(!body_only.has_headers());
    assert!(!body_only.has_footer());
    assert_eq!(body_only.size(), 1);
}

#[test]
fn parts_rows_must_align_in_width() {
    let err = Table::from_parts(
        TableParts {
            header: Some(row(&["a", "b"])),
            body: vec![row(&["1", "2", "3"])],
            footer: None,
        },
        TableOptions::default(),
    )
    .unwrap_err();
    assert_eq!(err, TableError::invalid_column_count(1, 2, 3));
}

#[test]
fn row_to_map_uses_accessors() {
    let table = Table::from_rows(
        people(),
        TableOptions {
            accessors: Some(AccessorSpec::names(["name", "age", "city"])),
            ..TableOptions::default()
        },
    )
    .expect("build table");

    let map = table.body_row(0).expect("body row").to_map();
    assert_eq!(map.get("name"), Some(&&Value::from("Anna")));
    assert_eq!(map.get("age"), Some(&&Value::Int(36)));
    assert_eq!(map.len(), 3);
}

#[test]
fn column_views_are_body_relative() {
    let table = Table::from_rows(
        people(),
        TableOptions {
            has_footer: true,
            accessors: Some(AccessorSpec::names(["name", "age", "city"])),
            ..TableOptions::default()
        },
    )
    .expect("build table");

    let ages = table
        .column(ColumnSpecifier::Accessor("age"))
        .expect("age column");
    assert_eq!(ages.header(), Some(&Value::from("Age")));
    assert_eq!(ages.accessor(), Some("age"));
    assert_eq!(ages.get(0), Some(&Value::Int(36)));
    assert_eq!(ages.get(1), Some(&Value::Int(28)));

    let body: Vec<&Value> = ages.iter().collect();
    assert_eq!(body, vec![&Value::Int(36), &Value::Int(28)]);

    let everything = ages.to_vec(true, true);
    assert_eq!(everything.len(), 4);
    assert_eq!(everything[0], &Value::from("Age"));
    assert_eq!(everything[3], &Value::from("2"));
}

#[test]
fn row_mutation_keeps_header_lookup_fresh() {
    let mut table = Table::from_rows(people(), TableOptions::default()).expect("build table");
    assert_eq!(table.index_of(ColumnSpecifier::Header("Age")), Ok(1));

    let mut header = table.row_mut(0).expect("header row");
    header
        .set(ColumnSpecifier::Index(1), Value::from("Years"))
        .expect("rename header");

    assert_eq!(table.index_of(ColumnSpecifier::Header("Years")), Ok(1));
    assert_eq!(
        table.index_of(ColumnSpecifier::Header("Age")),
        Err(TableError::no_such_header("Age"))
    );
}

#[test]
fn to_rows_is_a_deep_copy() {
    let table = Table::from_rows(people(), TableOptions::default()).expect("build table");
    let mut copy = table.to_rows();
    copy[1][0] = Value::from("changed");
    assert_eq!(table.cell(1, 0), Some(&Value::from("Anna")));
}

use futures::executor::block_on;
use lineage_core::{
    DataSources, Error, FsFetcher, MemoryFetcher, PersonId, load_tree_data, load_tree_data_sync,
};
use std::path::PathBuf;

fn fixture_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..")
        .join("fixtures")
        .join("family")
}

const DATASET: &str = r#"[
  {"PersonID": "A", "Generation": 1},
  {"PersonID": "B", "Generation": 1},
  {"PersonID": "C", "Generation": 2}
]"#;

#[test]
fn loads_fixture_and_falls_back_to_secondary_order_table() {
    // `manual_order_regrouped.js` is absent from the fixture directory.
    let fetcher = FsFetcher::new(fixture_dir());
    let data = block_on(load_tree_data(&fetcher, &DataSources::default())).expect("load ok");

    assert_eq!(data.persons.len(), 9);
    assert!(data.is_curated());
    let order = data.order.as_ref().unwrap();
    assert_eq!(order.get(3).unwrap().len(), 4);
    let coords = data.coordinates.as_ref().unwrap();
    assert_eq!(coords.extent(), Some((-2.5, 2.0)));
}

#[test]
fn preferred_order_table_wins_when_present() {
    let fetcher = MemoryFetcher::new()
        .with("family_data.json", DATASET)
        .with("manual_order_regrouped.js", r#"const manualOrderFull = {"1": ["B", "A"]};"#)
        .with("manual_order.js", r#"const manualOrderFull = {"1": ["A", "B"]};"#)
        .with("final_x_coordinates.js", r#"{"1": [0, 10]}"#);
    let data = load_tree_data_sync(&fetcher, &DataSources::default()).unwrap();
    let order = data.order.unwrap();
    let first = &order.get(1).unwrap()[0];
    assert_eq!(first, &PersonId::new("B"));
}

#[test]
fn unparsable_preferred_table_falls_through() {
    let fetcher = MemoryFetcher::new()
        .with("family_data.json", DATASET)
        .with("manual_order_regrouped.js", "not a table")
        .with("manual_order.js", r#"{"2": ["C"]}"#);
    let data = load_tree_data_sync(&fetcher, &DataSources::default()).unwrap();
    assert!(data.order.unwrap().contains(2));
    assert!(data.coordinates.is_none());
}

#[test]
fn missing_tables_still_complete() {
    let fetcher = MemoryFetcher::new().with("family_data.json", DATASET);
    let data = load_tree_data_sync(&fetcher, &DataSources::default()).unwrap();
    assert_eq!(data.persons.len(), 3);
    assert!(data.order.is_none());
    assert!(data.coordinates.is_none());
    assert!(!data.is_curated());
}

#[test]
fn missing_dataset_is_an_error() {
    let fetcher = MemoryFetcher::new().with("manual_order.js", r#"{"1": ["A"]}"#);
    let err = load_tree_data_sync(&fetcher, &DataSources::default()).unwrap_err();
    assert!(err.is_not_found());
}

#[test]
fn malformed_dataset_is_an_error() {
    let fetcher = MemoryFetcher::new().with("family_data.json", r#"{"PersonID": 1}"#);
    let err = load_tree_data_sync(&fetcher, &DataSources::default()).unwrap_err();
    assert!(matches!(err, Error::Dataset { .. }));
}

#[test]
fn fs_fetcher_reports_not_found() {
    let tmp = tempfile::tempdir().expect("tempdir");
    std::fs::write(tmp.path().join("family_data.json"), DATASET).expect("write");
    let fetcher = FsFetcher::new(tmp.path());
    let sources = DataSources {
        dataset: "nope.json".to_string(),
        ..DataSources::default()
    };
    let err = load_tree_data_sync(&fetcher, &sources).unwrap_err();
    assert!(matches!(err, Error::ResourceNotFound { .. }));

    let data = load_tree_data_sync(&fetcher, &DataSources::default()).unwrap();
    assert_eq!(data.persons.len(), 3);
}

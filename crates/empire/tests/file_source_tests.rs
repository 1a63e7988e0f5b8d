use std::fs;

use empire::loader::rdf_loader::{load_graph, GraphFormat};
use empire::model::{Graph, Iri, Literal, Triple};
use empire::source::{
    DataSource, DataSourceError, FileDataSource, MutableDataSource, SupportsTransactions,
    TransactionalDataSource,
};

fn mission(n: i64) -> Triple {
    Triple::new(
        Iri::new(format!("http://example.org/mission/{n}")),
        "http://example.org/number",
        Literal::integer(n),
    )
}

fn graph(ns: &[i64]) -> Graph {
    ns.iter().map(|&n| mission(n)).collect()
}

fn connected(path: &std::path::Path, format: GraphFormat) -> FileDataSource {
    let mut source = FileDataSource::new(path, format).unwrap();
    source.connect().unwrap();
    source
}

#[test]
fn missing_file_starts_empty_and_is_created_on_write() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("store.nt");
    let mut source = connected(&path, GraphFormat::NTriples);
    assert!(!path.exists());

    source.add(&graph(&[11])).unwrap();
    assert!(path.exists());
    assert_eq!(load_graph(&path, None).unwrap(), graph(&[11]));
}

#[test]
fn contents_survive_reconnect() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("store.ttl");
    {
        let mut source = connected(&path, GraphFormat::Turtle);
        source.add(&graph(&[11, 12, 13])).unwrap();
        source.remove(&graph(&[12])).unwrap();
    }
    let text = fs::read_to_string(&path).unwrap();
    assert!(text.starts_with("@prefix"));

    let reopened = connected(&path, GraphFormat::Turtle);
    let all = reopened.query_factory().all_triples();
    assert_eq!(reopened.graph_query(&all).unwrap(), graph(&[11, 13]));
}

#[test]
fn reconnect_discards_unsaved_changes() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("store.nt");
    let mut source = connected(&path, GraphFormat::NTriples);
    source.add(&graph(&[1])).unwrap();

    fs::write(&path, format!("{}\n", mission(2))).unwrap();
    source.disconnect();
    source.connect().unwrap();
    assert_eq!(source.describe(&Iri::new("http://example.org/mission/1")).unwrap().num_statements(), 0);
    assert_eq!(source.describe(&Iri::new("http://example.org/mission/2")).unwrap().num_statements(), 1);
}

#[test]
fn malformed_file_fails_to_connect() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.nt");
    fs::write(&path, "this is not n-triples\n").unwrap();
    let mut source = FileDataSource::new(&path, GraphFormat::NTriples).unwrap();
    assert!(source.connect().is_err());
    assert!(!source.is_connected());
}

#[test]
fn write_while_disconnected_fails() {
    let dir = tempfile::tempdir().unwrap();
    let mut source = FileDataSource::new(dir.path().join("s.nt"), GraphFormat::NTriples).unwrap();
    assert!(matches!(
        source.add(&graph(&[1])),
        Err(DataSourceError::NotConnected)
    ));
}

#[test]
fn rollback_rewrites_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("store.nt");
    let mut tx = TransactionalDataSource::new(connected(&path, GraphFormat::NTriples));
    tx.add(&graph(&[1])).unwrap();

    tx.begin().unwrap();
    tx.add(&graph(&[2])).unwrap();
    tx.remove(&graph(&[1])).unwrap();
    assert_eq!(load_graph(&path, None).unwrap(), graph(&[2]));

    tx.rollback().unwrap();
    assert_eq!(load_graph(&path, None).unwrap(), graph(&[1]));
}

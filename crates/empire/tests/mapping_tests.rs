//! Entity mapping tests, using a small space-mission vocabulary.

use empire::mapping::{
    from_graph, subject_for, to_graph, Cardinality, Collection, EntityManager, MappingError,
    Namespaces, RdfEntity, TypeDescriptor,
};
use empire::model::{Graph, Iri, Literal, Resource, Term, Triple};
use empire::source::{
    DataSource, MemoryDataSource, MutableDataSource, SupportsTransactions,
    TransactionalDataSource,
};

const SPACE: &str = "http://purl.org/net/schemas/space/";
const RDF_TYPE: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#type";
const RDF_NIL: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#nil";

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

fn literal_value(values: Vec<Term>) -> Option<String> {
    values
        .into_iter()
        .find_map(|t| t.as_literal().map(|l| l.value().to_string()))
}

fn iri_value(values: Vec<Term>) -> Option<Iri> {
    values.into_iter().find_map(|t| t.as_iri().cloned())
}

#[derive(Debug, Default, Clone, PartialEq)]
struct MissionRole {
    id: Option<Iri>,
    label: Option<String>,
    role: Option<Iri>,
    mission: Option<Iri>,
    subjects: Vec<String>,
}

impl RdfEntity for MissionRole {
    fn descriptor() -> Result<TypeDescriptor, MappingError> {
        TypeDescriptor::builder(Namespaces::new().with_default(SPACE), "MissionRole")
            .id("label")
            .one("label", "rdfs:label")
            .one("role", "role")
            .one("mission", "mission")
            .many("subjects", "dc:subject")
            .build()
    }

    fn rdf_id(&self) -> Option<&Iri> {
        self.id.as_ref()
    }

    fn set_rdf_id(&mut self, id: Iri) {
        self.id = Some(id);
    }

    fn field_values(&self, field: &str) -> Vec<Term> {
        match field {
            "label" => self
                .label
                .iter()
                .map(|l| Term::from(Literal::simple(l.as_str())))
                .collect(),
            "role" => self.role.iter().cloned().map(Term::from).collect(),
            "mission" => self.mission.iter().cloned().map(Term::from).collect(),
            "subjects" => self
                .subjects
                .iter()
                .map(|s| Term::from(Literal::simple(s.as_str())))
                .collect(),
            _ => Vec::new(),
        }
    }

    fn set_field_values(&mut self, field: &str, values: Vec<Term>) {
        match field {
            "label" => self.label = literal_value(values),
            "role" => self.role = iri_value(values),
            "mission" => self.mission = iri_value(values),
            "subjects" => {
                let mut subjects: Vec<String> = values
                    .into_iter()
                    .filter_map(|t| t.as_literal().map(|l| l.value().to_string()))
                    .collect();
                subjects.sort();
                self.subjects = subjects;
            }
            _ => {}
        }
    }
}

#[derive(Debug, Default, Clone, PartialEq)]
struct Image {
    uri: Option<Iri>,
    depicts: Vec<Term>,
    thumbnail: Option<Iri>,
}

impl RdfEntity for Image {
    fn descriptor() -> Result<TypeDescriptor, MappingError> {
        TypeDescriptor::builder(Namespaces::new(), "foaf:Image")
            .id("uri")
            .list("depicts", "foaf:depicts")
            .one("thumbnail", "foaf:thumbnail")
            .build()
    }

    fn rdf_id(&self) -> Option<&Iri> {
        self.uri.as_ref()
    }

    fn set_rdf_id(&mut self, id: Iri) {
        self.uri = Some(id);
    }

    fn field_values(&self, field: &str) -> Vec<Term> {
        match field {
            "depicts" => self.depicts.clone(),
            "thumbnail" => self.thumbnail.iter().cloned().map(Term::from).collect(),
            _ => Vec::new(),
        }
    }

    fn set_field_values(&mut self, field: &str, values: Vec<Term>) {
        match field {
            "depicts" => self.depicts = values,
            "thumbnail" => self.thumbnail = iri_value(values),
            _ => {}
        }
    }
}

fn commander() -> MissionRole {
    MissionRole {
        label: Some("Commander".into()),
        role: Some(Iri::new(format!("{SPACE}roles/commander"))),
        mission: Some(Iri::new("http://nasa.dataincubator.org/mission/apollo-11")),
        subjects: vec!["lunar landing".into(), "apollo".into()],
        ..Default::default()
    }
}

fn image() -> Image {
    Image {
        uri: Some(Iri::new("http://nasa.dataincubator.org/image/as11-40-5903")),
        depicts: vec![
            Term::Iri(Iri::new("http://nasa.dataincubator.org/person/aldrin")),
            Term::Literal(Literal::language_tagged("flag", "en")),
            Term::Iri(Iri::new("http://nasa.dataincubator.org/person/aldrin")),
        ],
        thumbnail: Some(Iri::new("http://example.org/thumb/5903.jpg")),
    }
}

fn manager() -> EntityManager<TransactionalDataSource<MemoryDataSource>> {
    EntityManager::new(TransactionalDataSource::new(
        MemoryDataSource::connected().unwrap(),
    ))
}

// ---------------------------------------------------------------------------
// Descriptors
// ---------------------------------------------------------------------------

#[test]
fn descriptor_expands_names() {
    let d = MissionRole::descriptor().unwrap();
    assert_eq!(d.class.as_str(), "http://purl.org/net/schemas/space/MissionRole");
    assert_eq!(d.class_name(), "MissionRole");
    assert_eq!(d.namespace(), SPACE);
    assert_eq!(d.id_field.as_deref(), Some("label"));

    let label = d.property("label").unwrap();
    assert_eq!(label.predicate.as_str(), "http://www.w3.org/2000/01/rdf-schema#label");
    assert_eq!(label.cardinality, Cardinality::One);

    let subjects = d.property("subjects").unwrap();
    assert_eq!(subjects.predicate.as_str(), "http://purl.org/dc/elements/1.1/subject");
    assert_eq!(subjects.cardinality, Cardinality::Many);
    assert_eq!(subjects.collection, Collection::Repeated);
}

#[test]
fn namespace_expansion() {
    let ns = Namespaces::new().with_prefix("ex", "http://example.org/");
    assert_eq!(ns.expand("ex:a").unwrap().as_str(), "http://example.org/a");
    assert_eq!(
        ns.expand("http://other.example/x").unwrap().as_str(),
        "http://other.example/x"
    );
    assert_eq!(ns.expand("urn:isbn:123").unwrap().as_str(), "urn:isbn:123");
    assert!(matches!(ns.expand("nope:a"), Err(MappingError::UnknownPrefix(_))));
    assert!(matches!(ns.expand("bare"), Err(MappingError::NoDefaultNamespace(_))));
}

#[test]
fn duplicate_field_is_rejected() {
    let err = TypeDescriptor::builder(Namespaces::new(), "foaf:Image")
        .one("a", "foaf:name")
        .many("a", "foaf:nick")
        .build()
        .unwrap_err();
    assert!(matches!(err, MappingError::DuplicateField(ref f) if f == "a"));
}

// ---------------------------------------------------------------------------
// Graph conversion
// ---------------------------------------------------------------------------

#[test]
fn subject_minted_from_identifier_field() {
    let d = MissionRole::descriptor().unwrap();
    assert_eq!(
        subject_for(&commander(), &d).as_str(),
        "http://purl.org/net/schemas/space/MissionRole/Commander"
    );

    let mut pilot = commander();
    pilot.label = Some("Lunar Module Pilot".into());
    assert!(subject_for(&pilot, &d)
        .as_str()
        .ends_with("/MissionRole/Lunar%20Module%20Pilot"));

    let anonymous = MissionRole::default();
    let a = subject_for(&anonymous, &d);
    assert!(a.as_str().starts_with("http://purl.org/net/schemas/space/MissionRole/"));
    assert_ne!(a, subject_for(&anonymous, &d));
}

#[test]
fn existing_id_wins() {
    let d = Image::descriptor().unwrap();
    let img = image();
    assert_eq!(subject_for(&img, &d), img.uri.clone().unwrap());
}

#[test]
fn to_graph_writes_type_and_repeated_values() {
    let d = MissionRole::descriptor().unwrap();
    let role = commander();
    let subject = subject_for(&role, &d);
    let graph = to_graph(&role, &d, &subject);

    assert!(graph.contains(&Triple::new(subject.clone(), RDF_TYPE, d.class.clone())));
    // type + label + role + mission + 2 subjects
    assert_eq!(graph.num_statements(), 6);

    let back: MissionRole = from_graph(&subject, &graph, &d).unwrap();
    assert_eq!(back.id, Some(subject));
    assert_eq!(back.label, role.label);
    assert_eq!(back.subjects, ["apollo", "lunar landing"]);
}

#[test]
fn list_field_preserves_order_and_duplicates() {
    let d = Image::descriptor().unwrap();
    let img = image();
    let subject = subject_for(&img, &d);
    let graph = to_graph(&img, &d, &subject);

    // type + thumbnail + depicts head + 3 cells of 2 triples
    assert_eq!(graph.num_statements(), 9);
    let nil = Term::Iri(Iri::new(RDF_NIL));
    assert_eq!(graph.iter().filter(|t| t.object == nil).count(), 1);

    let back: Image = from_graph(&subject, &graph, &d).unwrap();
    assert_eq!(back, img);
}

#[test]
fn empty_list_writes_nothing() {
    let d = Image::descriptor().unwrap();
    let img = Image {
        depicts: Vec::new(),
        ..image()
    };
    let subject = subject_for(&img, &d);
    let graph = to_graph(&img, &d, &subject);
    assert_eq!(graph.num_statements(), 2);

    let back: Image = from_graph(&subject, &graph, &d).unwrap();
    assert!(back.depicts.is_empty());
}

#[test]
fn broken_list_is_reported() {
    let d = Image::descriptor().unwrap();
    let subject = Iri::new("http://example.org/img");
    let graph: Graph = [
        Triple::new(subject.clone(), "http://xmlns.com/foaf/0.1/depicts", Resource::blank("l0")),
        Triple::new(
            Resource::blank("l0"),
            "http://www.w3.org/1999/02/22-rdf-syntax-ns#first",
            Literal::simple("x"),
        ),
    ]
    .into_iter()
    .collect();
    let err = from_graph::<Image>(&subject, &graph, &d).unwrap_err();
    assert!(matches!(err, MappingError::MalformedList { reason: "missing rdf:rest", .. }));
}

#[test]
fn cyclic_list_is_reported() {
    let d = Image::descriptor().unwrap();
    let subject = Iri::new("http://example.org/img");
    let graph: Graph = [
        Triple::new(subject.clone(), "http://xmlns.com/foaf/0.1/depicts", Resource::blank("l0")),
        Triple::new(
            Resource::blank("l0"),
            "http://www.w3.org/1999/02/22-rdf-syntax-ns#first",
            Literal::simple("x"),
        ),
        Triple::new(
            Resource::blank("l0"),
            "http://www.w3.org/1999/02/22-rdf-syntax-ns#rest",
            Resource::blank("l0"),
        ),
    ]
    .into_iter()
    .collect();
    let err = from_graph::<Image>(&subject, &graph, &d).unwrap_err();
    assert!(matches!(err, MappingError::MalformedList { reason: "cycle", .. }));
}

// ---------------------------------------------------------------------------
// EntityManager
// ---------------------------------------------------------------------------

#[test]
fn persist_then_find() {
    let mut em = manager();
    let mut role = commander();
    let iri = em.persist(&mut role).unwrap();
    assert_eq!(role.id.as_ref(), Some(&iri));
    assert!(em.contains(&iri).unwrap());

    let found: MissionRole = em.find(&iri).unwrap().unwrap();
    assert_eq!(found.label, role.label);
    assert_eq!(found.mission, role.mission);
}

#[test]
fn image_list_round_trips_through_store() {
    let mut em = manager();
    let mut img = image();
    let iri = em.persist(&mut img).unwrap();
    let found: Image = em.find(&iri).unwrap().unwrap();
    assert_eq!(found, img);
}

#[test]
fn find_missing_or_other_type_is_none() {
    let mut em = manager();
    let mut role = commander();
    let iri = em.persist(&mut role).unwrap();
    assert!(em.find::<Image>(&iri).unwrap().is_none());
    assert!(em
        .find::<MissionRole>(&Iri::new("http://example.org/none"))
        .unwrap()
        .is_none());
}

#[test]
fn persist_twice_fails() {
    let mut em = manager();
    em.persist(&mut commander()).unwrap();
    let err = em.persist(&mut commander()).unwrap_err();
    assert!(matches!(err, MappingError::AlreadyPersisted(_)));
}

#[test]
fn merge_replaces_description() {
    let mut em = manager();
    let mut img = image();
    let iri = em.persist(&mut img).unwrap();

    img.depicts = vec![Term::Literal(Literal::simple("moon"))];
    img.thumbnail = None;
    em.merge(&img).unwrap();

    let found: Image = em.find(&iri).unwrap().unwrap();
    assert_eq!(found.depicts, img.depicts);
    assert_eq!(found.thumbnail, None);
    // type + depicts head + 1 cell; the old cells are gone
    assert_eq!(em.source().get_ref().len().unwrap(), 4);
}

#[test]
fn merge_and_remove_need_a_stored_entity() {
    let mut em = manager();
    assert!(matches!(
        em.merge(&MissionRole::default()),
        Err(MappingError::MissingIdentifier)
    ));
    assert!(matches!(em.remove(&image()), Err(MappingError::NotFound(_))));
}

#[test]
fn remove_deletes_everything() {
    let mut em = manager();
    let mut img = image();
    let iri = em.persist(&mut img).unwrap();
    em.remove(&img).unwrap();
    assert!(!em.contains(&iri).unwrap());
    assert!(em.source().get_ref().is_empty().unwrap());
}

// ---------------------------------------------------------------------------
// Transactions
// ---------------------------------------------------------------------------

#[test]
fn failed_transaction_rolls_back() {
    let mut em = manager();
    let result = em.transaction(|em| {
        em.persist(&mut image())?;
        em.persist(&mut commander())?;
        em.persist(&mut commander())
    });
    assert!(matches!(result, Err(MappingError::AlreadyPersisted(_))));
    assert!(!em.source().is_in_transaction());
    assert!(em.source().get_ref().is_empty().unwrap());
}

#[test]
fn successful_transaction_commits() {
    let mut em = manager();
    let iri = em
        .transaction(|em| {
            em.persist(&mut image())?;
            em.persist(&mut commander())
        })
        .unwrap();
    assert!(em.contains(&iri).unwrap());
    assert!(!em.source().is_in_transaction());

    // A committed write is not undone by a later rollback.
    em.source_mut().begin().unwrap();
    em.source_mut().rollback().unwrap();
    assert!(em.contains(&iri).unwrap());
}

#[test]
fn manager_over_plain_store() {
    let mut em = EntityManager::new(MemoryDataSource::connected().unwrap());
    let iri = em.persist(&mut commander()).unwrap();
    let store = em.into_inner();
    assert!(store.is_connected());
    assert!(!store.describe(&iri).unwrap().is_empty());
    let described = store.describe(&iri).unwrap();
    let mut store = store;
    store.remove(&described).unwrap();
    assert!(store.is_empty().unwrap());
}

#[test]
fn rolled_back_merge_restores_entity() {
    let mut em = manager();
    let mut role = commander();
    let iri = em.persist(&mut role).unwrap();
    let before = em.source().get_ref().snapshot().unwrap();

    let mut changed = role.clone();
    changed.mission = Some(Iri::new("http://nasa.dataincubator.org/mission/apollo-12"));
    changed.subjects = vec!["apollo".into()];
    let result: Result<(), MappingError> = em.transaction(|em| {
        em.merge(&changed)?;
        Err(MappingError::NotFound(Iri::new("http://example.org/abort")))
    });
    assert!(matches!(result, Err(MappingError::NotFound(_))));

    assert_eq!(em.source().get_ref().snapshot().unwrap(), before);
    let found: MissionRole = em.find(&iri).unwrap().unwrap();
    assert_eq!(found.mission, role.mission);
}

#[test]
fn merge_records_only_the_change() {
    let mut em = manager();
    let mut role = commander();
    em.persist(&mut role).unwrap();

    let mut changed = role.clone();
    changed.subjects = vec!["apollo".into(), "lunar landing".into(), "eva".into()];
    em.source_mut().begin().unwrap();
    em.merge(&changed).unwrap();
    assert_eq!(em.source().added().num_statements(), 1);
    assert!(em.source().removed().is_empty());
    em.source_mut().commit().unwrap();

    // Merging an unchanged entity writes nothing.
    em.source_mut().begin().unwrap();
    em.merge(&changed).unwrap();
    assert!(em.source().added().is_empty());
    assert!(em.source().removed().is_empty());
    em.source_mut().rollback().unwrap();
    let found: MissionRole = em.find(role.id.as_ref().unwrap()).unwrap().unwrap();
    assert_eq!(found.subjects, ["apollo", "eva", "lunar landing"]);
}

//! Unit tests for ontosearch-core

#[cfg(test)]
mod graph_tests {
    use crate::graph::{AnnotationProperty, AnnotationValue, Entity, EntityKind, Ontology};
    use crate::search::SearchError;
    use std::sync::Arc;

    #[test]
    fn test_closure_is_root_first_depth_first() {
        let leaf = Ontology::builder().iri("http://ex.org/leaf").build();
        let left = Ontology::builder()
            .iri("http://ex.org/left")
            .import(leaf.clone())
            .build();
        let right = Ontology::builder().iri("http://ex.org/right").build();
        let root = Ontology::builder()
            .iri("http://ex.org/root")
            .import(left)
            .import(right)
            .build();

        let iris: Vec<_> = root
            .closure()
            .unwrap()
            .iter()
            .map(|g| g.iri().unwrap().to_string())
            .collect();
        assert_eq!(
            iris,
            vec![
                "http://ex.org/root",
                "http://ex.org/left",
                "http://ex.org/leaf",
                "http://ex.org/right"
            ]
        );
    }

    #[test]
    fn test_shared_import_appears_once() {
        let shared = Ontology::builder().iri("http://ex.org/shared").build();
        let a = Ontology::builder().import(shared.clone()).build();
        let b = Ontology::builder().import(shared.clone()).build();
        let root = Ontology::builder().import(a).import(b).build();

        let closure = root.closure().unwrap();
        assert_eq!(closure.len(), 4);
        let shared_count = closure.iter().filter(|g| Arc::ptr_eq(g, &shared)).count();
        assert_eq!(shared_count, 1);
    }

    #[test]
    fn test_conflicting_ontology_iri() {
        let one = Ontology::builder().iri("http://ex.org/x").build();
        let two = Ontology::builder().iri("http://ex.org/x").build();
        let root = Ontology::builder().import(one).import(two).build();
        assert!(matches!(root.closure(), Err(SearchError::InvalidGraphState(_))));
    }

    #[test]
    fn test_redeclaration_is_ignored() {
        let graph = Ontology::builder()
            .class("http://ex.org/A")
            .class("http://ex.org/A")
            .object_property("http://ex.org/A")
            .build();
        assert_eq!(graph.entities_of_kind(EntityKind::Class).len(), 1);
        assert_eq!(graph.entities_of_kind(EntityKind::ObjectProperty).len(), 1);
        assert_eq!(graph.entity_count(), 2);
    }

    #[test]
    fn test_annotations_filtered_by_property() {
        let graph = Ontology::builder()
            .class("http://ex.org/A")
            .label("http://ex.org/A", AnnotationValue::literal("A"))
            .comment("http://ex.org/A", "first")
            .comment("http://ex.org/A", "second")
            .build();
        let comments: Vec<_> = graph
            .annotations_on("http://ex.org/A", &AnnotationProperty::Comment)
            .filter_map(|a| a.value.as_literal().map(|(text, _)| text.to_string()))
            .collect();
        assert_eq!(comments, vec!["first", "second"]);
        assert_eq!(
            graph
                .annotations_on("http://ex.org/missing", &AnnotationProperty::Label)
                .count(),
            0
        );
    }

    #[test]
    fn test_property_iris() {
        assert_eq!(
            AnnotationProperty::Definition.iri(),
            "http://purl.obolibrary.org/obo/IAO_0000115"
        );
        assert_eq!(
            AnnotationProperty::from_iri("http://www.w3.org/2000/01/rdf-schema#comment"),
            AnnotationProperty::Comment
        );
        assert_eq!(Entity::object_property("x").kind.to_string(), "Object Property");
    }
}

#[cfg(test)]
mod loader_tests {
    use crate::graph::{AnnotationProperty, EntityKind};
    use crate::loader::{DocumentLoader, LoadError, OntologyLoader};
    use crate::search::{HttpConfig, SearchCriteria, SearchStatus, Searcher};
    use std::path::Path;
    use std::sync::Arc;
    use tempfile::TempDir;

    fn write(dir: &Path, name: &str, body: &str) {
        std::fs::write(dir.join(name), body).expect("Failed to write document");
    }

    fn loader() -> DocumentLoader {
        DocumentLoader::new(&HttpConfig::default()).expect("Failed to create loader")
    }

    const ROOT: &str = r#"{
        "iri": "http://ex.org/onto",
        "imports": ["base.json"],
        "classes": [
            { "iri": "http://ex.org/onto#A",
              "annotations": [
                { "property": "label", "value": "Apple" },
                { "property": "definition", "value": "A round fruit." },
                { "property": "http://ex.org/seeAlso", "resource": "http://ex.org/B" }
              ] }
        ],
        "objectProperties": [
            { "iri": "http://ex.org/onto#partOf",
              "annotations": [ { "property": "label", "value": "part of", "lang": "en" } ] }
        ]
    }"#;

    const BASE: &str = r#"{
        "iri": "http://ex.org/base",
        "classes": [
            { "iri": "http://ex.org/base#Fruit",
              "annotations": [ { "property": "label", "value": "Fruit" } ] }
        ]
    }"#;

    #[tokio::test]
    async fn test_load_file_with_imports() {
        let temp = TempDir::new().expect("Failed to create temp dir");
        write(temp.path(), "root.json", ROOT);
        write(temp.path(), "base.json", BASE);

        let graph = loader()
            .load_from_file(&temp.path().join("root.json"))
            .await
            .expect("Failed to load");

        assert_eq!(graph.iri(), Some("http://ex.org/onto"));
        assert_eq!(graph.entities_of_kind(EntityKind::Class).len(), 1);
        assert_eq!(graph.entities_of_kind(EntityKind::ObjectProperty).len(), 1);
        assert_eq!(graph.imports().len(), 1);
        assert_eq!(graph.imports()[0].iri(), Some("http://ex.org/base"));
        assert_eq!(
            graph
                .annotations_on("http://ex.org/onto#A", &AnnotationProperty::Definition)
                .count(),
            1
        );
    }

    #[tokio::test]
    async fn test_diamond_import_is_shared() {
        let temp = TempDir::new().expect("Failed to create temp dir");
        write(temp.path(), "root.json", r#"{ "imports": ["a.json", "b.json"] }"#);
        write(temp.path(), "a.json", r#"{ "imports": ["base.json"] }"#);
        write(temp.path(), "b.json", r#"{ "imports": ["base.json"] }"#);
        write(temp.path(), "base.json", BASE);

        let graph = loader()
            .load_from_file(&temp.path().join("root.json"))
            .await
            .expect("Failed to load");
        let a_base = &graph.imports()[0].imports()[0];
        let b_base = &graph.imports()[1].imports()[0];
        assert!(Arc::ptr_eq(a_base, b_base));
        assert_eq!(graph.closure().unwrap().len(), 4);
    }

    #[tokio::test]
    async fn test_same_file_via_different_paths_is_shared() {
        let temp = TempDir::new().expect("Failed to create temp dir");
        std::fs::create_dir(temp.path().join("sub")).expect("Failed to create sub dir");
        write(
            temp.path(),
            "root.json",
            r#"{ "iri": "http://ex.org/root", "imports": ["base.json", "sub/a.json"] }"#,
        );
        write(
            temp.path(),
            "sub/a.json",
            r#"{ "iri": "http://ex.org/a", "imports": ["../base.json"] }"#,
        );
        write(temp.path(), "base.json", BASE);

        let graph = loader()
            .load_from_file(&temp.path().join("root.json"))
            .await
            .expect("Failed to load");
        let direct = &graph.imports()[0];
        let nested = &graph.imports()[1].imports()[0];
        assert!(Arc::ptr_eq(direct, nested));
        assert_eq!(graph.closure().expect("Failed to build closure").len(), 3);
    }

    #[tokio::test]
    async fn test_same_ontology_iri_is_loaded_once() {
        let temp = TempDir::new().expect("Failed to create temp dir");
        write(
            temp.path(),
            "root.json",
            r#"{ "imports": ["base.json", "mirror.json"] }"#,
        );
        write(temp.path(), "base.json", BASE);
        write(
            temp.path(),
            "mirror.json",
            r#"{ "iri": "http://ex.org/base", "classes": [ { "iri": "http://ex.org/base#Other" } ] }"#,
        );

        let graph = loader()
            .load_from_file(&temp.path().join("root.json"))
            .await
            .expect("Failed to load");
        assert!(Arc::ptr_eq(&graph.imports()[0], &graph.imports()[1]));
        let closure = graph.closure().expect("Failed to build closure");
        assert_eq!(closure.len(), 2);
        assert_eq!(closure[1].entities_of_kind(EntityKind::Class).len(), 1);
    }

    #[tokio::test]
    async fn test_search_across_relative_paths() {
        let temp = TempDir::new().expect("Failed to create temp dir");
        std::fs::create_dir(temp.path().join("sub")).expect("Failed to create sub dir");
        write(temp.path(), "root.json", r#"{ "imports": ["base.json", "sub/a.json"] }"#);
        write(temp.path(), "sub/a.json", r#"{ "imports": ["./../base.json"] }"#);
        write(temp.path(), "base.json", BASE);

        let searcher = Searcher::new(Arc::new(loader()));
        searcher.set_source(None, Some(temp.path().join("root.json")));
        let outcome = searcher.search("fruit").await;
        assert!(matches!(outcome.status, SearchStatus::Ok));
        assert_eq!(outcome.results.len(), 1);
    }

    #[tokio::test]
    async fn test_cyclic_import_is_skipped() {
        let temp = TempDir::new().expect("Failed to create temp dir");
        write(temp.path(), "a.json", r#"{ "iri": "http://ex.org/a", "imports": ["b.json"] }"#);
        write(temp.path(), "b.json", r#"{ "iri": "http://ex.org/b", "imports": ["a.json"] }"#);

        let graph = loader()
            .load_from_file(&temp.path().join("a.json"))
            .await
            .expect("Failed to load");
        assert_eq!(graph.imports().len(), 1);
        assert!(graph.imports()[0].imports().is_empty());
    }

    #[tokio::test]
    async fn test_missing_file_is_io_error() {
        let temp = TempDir::new().expect("Failed to create temp dir");
        let err = loader()
            .load_from_file(&temp.path().join("absent.json"))
            .await
            .unwrap_err();
        assert!(matches!(err, LoadError::Io { .. }));
    }

    #[tokio::test]
    async fn test_missing_import_is_wrapped() {
        let temp = TempDir::new().expect("Failed to create temp dir");
        write(temp.path(), "root.json", r#"{ "imports": ["gone.json"] }"#);
        let err = loader()
            .load_from_file(&temp.path().join("root.json"))
            .await
            .unwrap_err();
        match err {
            LoadError::Import { location, source } => {
                assert!(location.ends_with("gone.json"));
                assert!(matches!(*source, LoadError::Io { .. }));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_malformed_document() {
        let temp = TempDir::new().expect("Failed to create temp dir");
        write(temp.path(), "bad.json", "{ not json");
        write(
            temp.path(),
            "empty-iri.json",
            r#"{ "classes": [ { "iri": " " } ] }"#,
        );
        write(
            temp.path(),
            "no-value.json",
            r#"{ "classes": [ { "iri": "http://ex.org/A", "annotations": [ { "property": "label" } ] } ] }"#,
        );

        let l = loader();
        assert!(matches!(
            l.load_from_file(&temp.path().join("bad.json")).await,
            Err(LoadError::Parse { .. })
        ));
        assert!(matches!(
            l.load_from_file(&temp.path().join("empty-iri.json")).await,
            Err(LoadError::InvalidDocument { .. })
        ));
        assert!(matches!(
            l.load_from_file(&temp.path().join("no-value.json")).await,
            Err(LoadError::InvalidDocument { .. })
        ));
    }

    #[tokio::test]
    async fn test_search_over_loaded_file() {
        let temp = TempDir::new().expect("Failed to create temp dir");
        write(temp.path(), "root.json", ROOT);
        write(temp.path(), "base.json", BASE);

        let searcher = Searcher::new(Arc::new(loader()));
        searcher.set_source(None, Some(temp.path().join("root.json")));
        searcher.configure(SearchCriteria {
            include_object_properties: true,
            ..Default::default()
        });

        let outcome = searcher.search("fruit").await;
        assert!(matches!(outcome.status, SearchStatus::Ok));
        let names: Vec<_> = outcome.results.iter().map(|h| h.name.as_str()).collect();
        assert_eq!(names, vec!["Fruit"]);

        let outcome = searcher.search("part").await;
        assert_eq!(outcome.results.len(), 1);
        assert_eq!(outcome.results[0].kind, EntityKind::ObjectProperty);

        let stats = searcher.load_stats().await.expect("Stats after load");
        assert_eq!(stats.ontologies, 2);
        assert_eq!(stats.entities, 3);
    }
}

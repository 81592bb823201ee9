//! SHACL engine tests against small Brick-like shapes graphs

use brickval_core::{parse, to_jsonld_string, Graph, Literal, RdfFormat, Term};
use brickval_shacl::vocab as sh;
use brickval_shacl::{DefaultShaclEngine, ShaclEngine, ShapesGraph, ValidationConfig, ValidationOutcome, ViolationLevel};

const PREFIXES: &str = r#"
@prefix sh: <http://www.w3.org/ns/shacl#> .
@prefix rdf: <http://www.w3.org/1999/02/22-rdf-syntax-ns#> .
@prefix rdfs: <http://www.w3.org/2000/01/rdf-schema#> .
@prefix owl: <http://www.w3.org/2002/07/owl#> .
@prefix xsd: <http://www.w3.org/2001/XMLSchema#> .
@prefix ex: <http://example.org/> .
"#;

fn shapes(ttl: &str) -> ShapesGraph {
    let text = format!("{}{}", PREFIXES, ttl);
    ShapesGraph::from_graph(parse(&text, RdfFormat::Turtle, None).unwrap()).unwrap()
}

fn data(ttl: &str) -> Graph {
    parse(&format!("{}{}", PREFIXES, ttl), RdfFormat::Turtle, None).unwrap()
}

fn validate(shapes_ttl: &str, data_ttl: &str) -> ValidationOutcome {
    DefaultShaclEngine::new()
        .validate(&data(data_ttl), &shapes(shapes_ttl))
        .unwrap()
}

fn components(outcome: &ValidationOutcome) -> Vec<String> {
    outcome
        .report
        .results
        .iter()
        .map(|r| {
            r.source_constraint_component
                .as_str()
                .trim_start_matches(sh::SH)
                .to_string()
        })
        .collect()
}

#[test]
fn test_conforming_graph() {
    let outcome = validate(
        r#"
        ex:PointShape a sh:NodeShape ;
            sh:targetClass ex:Point ;
            sh:property [ sh:path ex:isPointOf ; sh:minCount 1 ; sh:nodeKind sh:IRI ] .
        "#,
        r#"ex:p1 a ex:Point ; ex:isPointOf ex:ahu1 ."#,
    );
    assert!(outcome.conforms);
    assert!(outcome.report.results.is_empty());
}

#[test]
fn test_target_class_includes_subclasses() {
    let outcome = validate(
        r#"
        ex:TempSensor rdfs:subClassOf ex:Sensor .
        ex:SensorShape a sh:NodeShape ;
            sh:targetClass ex:Sensor ;
            sh:property [ sh:path ex:hasUnit ; sh:minCount 1 ] .
        "#,
        r#"ex:t1 a ex:TempSensor ."#,
    );
    assert!(!outcome.conforms);
    assert_eq!(outcome.report.results[0].focus_node, Term::iri("http://example.org/t1"));
}

#[test]
fn test_implicit_class_target() {
    let outcome = validate(
        r#"
        ex:Equipment a owl:Class, sh:NodeShape ;
            sh:property [ sh:path ex:name ; sh:maxCount 1 ] .
        "#,
        r#"ex:e1 a ex:Equipment ; ex:name "a", "b" ."#,
    );
    assert_eq!(components(&outcome), vec!["MaxCountConstraintComponent"]);
}

#[test]
fn test_class_constraint_uses_inferred_types() {
    let shapes_ttl = r#"
        ex:AHU rdfs:subClassOf ex:Equipment .
        ex:PointShape a sh:NodeShape ;
            sh:targetClass ex:Point ;
            sh:property [ sh:path ex:isPointOf ; sh:class ex:Equipment ] .
        "#;
    let data_ttl = r#"
        ex:p1 a ex:Point ; ex:isPointOf ex:ahu1 .
        ex:ahu1 a ex:AHU .
        ex:p2 a ex:Point ; ex:isPointOf ex:room1 .
        ex:room1 a ex:Room .
        "#;

    let outcome = validate(shapes_ttl, data_ttl);
    assert_eq!(outcome.report.results.len(), 1);
    let result = &outcome.report.results[0];
    assert_eq!(result.focus_node, Term::iri("http://example.org/p2"));
    assert_eq!(result.value, Some(Term::iri("http://example.org/room1")));
    assert_eq!(result.result_path, Some(Term::iri("http://example.org/isPointOf")));
}

#[test]
fn test_value_range_and_datatype() {
    let outcome = validate(
        r#"
        ex:SetpointShape a sh:NodeShape ;
            sh:targetClass ex:Setpoint ;
            sh:property [
                sh:path ex:value ;
                sh:datatype xsd:decimal ;
                sh:minInclusive 0 ;
                sh:maxExclusive 100 ;
            ] .
        "#,
        r#"
        ex:ok a ex:Setpoint ; ex:value 21.5 .
        ex:high a ex:Setpoint ; ex:value 100.0 .
        ex:text a ex:Setpoint ; ex:value "warm" .
        "#,
    );

    let mut failing: Vec<(String, String)> = outcome
        .report
        .results
        .iter()
        .map(|r| (r.focus_node.to_string(), r.source_constraint_component.as_str().to_string()))
        .collect();
    failing.sort();

    assert_eq!(
        failing,
        vec![
            ("<http://example.org/high>".to_string(), sh::component("MaxExclusive")),
            ("<http://example.org/text>".to_string(), sh::component("Datatype")),
            ("<http://example.org/text>".to_string(), sh::component("MaxExclusive")),
            ("<http://example.org/text>".to_string(), sh::component("MinInclusive")),
        ]
    );
}

#[test]
fn test_string_constraints() {
    let outcome = validate(
        r#"
        ex:TagShape a sh:NodeShape ;
            sh:targetSubjectsOf ex:tag ;
            sh:property [
                sh:path ex:tag ;
                sh:pattern "^[a-z]+$" ;
                sh:flags "i" ;
                sh:maxLength 5 ;
            ] .
        "#,
        r#"
        ex:a ex:tag "Temp" .
        ex:b ex:tag "Temperature" .
        ex:c ex:tag "air-1" .
        "#,
    );

    let focus: Vec<String> = outcome.report.results.iter().map(|r| r.focus_node.to_string()).collect();
    assert_eq!(
        focus,
        vec!["<http://example.org/b>".to_string(), "<http://example.org/c>".to_string()]
    );
    assert_eq!(
        components(&outcome),
        vec!["MaxLengthConstraintComponent", "PatternConstraintComponent"]
    );
}

#[test]
fn test_language_constraints() {
    let outcome = validate(
        r#"
        ex:LabelShape a sh:NodeShape ;
            sh:targetNode ex:site ;
            sh:property [
                sh:path rdfs:label ;
                sh:languageIn ( "en" "de" ) ;
                sh:uniqueLang true ;
            ] .
        "#,
        r#"ex:site rdfs:label "Site"@en-GB, "Campus"@en, "Building"@en, "Lieu"@fr ."#,
    );

    let mut found = components(&outcome);
    found.sort();
    assert_eq!(found, vec!["LanguageInConstraintComponent", "UniqueLangConstraintComponent"]);
}

#[test]
fn test_inverse_and_sequence_paths() {
    let shapes_ttl = r#"
        ex:RoomShape a sh:NodeShape ;
            sh:targetClass ex:Room ;
            sh:property [ sh:path [ sh:inversePath ex:feeds ] ; sh:minCount 1 ] ;
            sh:property [ sh:path ( ex:hasPart ex:hasPoint ) ; sh:minCount 1 ] .
        "#;

    let ok = validate(
        shapes_ttl,
        r#"
        ex:vav ex:feeds ex:room .
        ex:room a ex:Room ; ex:hasPart ex:zone .
        ex:zone ex:hasPoint ex:temp .
        "#,
    );
    assert!(ok.conforms);

    let missing = validate(shapes_ttl, r#"ex:room a ex:Room ; ex:hasPart ex:zone ."#);
    assert_eq!(missing.report.results.len(), 2);
}

#[test]
fn test_transitive_path() {
    let outcome = validate(
        r#"
        ex:LocShape a sh:NodeShape ;
            sh:targetClass ex:Room ;
            sh:property [
                sh:path [ sh:oneOrMorePath ex:isPartOf ] ;
                sh:hasValue ex:building ;
            ] .
        "#,
        r#"
        ex:room a ex:Room ; ex:isPartOf ex:floor .
        ex:floor ex:isPartOf ex:building .
        ex:lost a ex:Room .
        "#,
    );

    assert_eq!(outcome.report.results.len(), 1);
    assert_eq!(outcome.report.results[0].focus_node, Term::iri("http://example.org/lost"));
    assert_eq!(components(&outcome), vec!["HasValueConstraintComponent"]);
}

#[test]
fn test_logical_constraints() {
    let outcome = validate(
        r#"
        ex:HasName sh:path ex:name ; sh:minCount 1 .
        ex:HasLabel sh:path rdfs:label ; sh:minCount 1 .
        ex:EitherShape a sh:NodeShape ;
            sh:targetClass ex:Thing ;
            sh:xone ( [ sh:property ex:HasName ] [ sh:property ex:HasLabel ] ) .
        "#,
        r#"
        ex:one a ex:Thing ; ex:name "x" .
        ex:both a ex:Thing ; ex:name "x" ; rdfs:label "x" .
        ex:none a ex:Thing .
        "#,
    );

    let focus: Vec<String> = outcome
        .report
        .results
        .iter()
        .filter(|r| r.source_shape == Term::iri("http://example.org/EitherShape"))
        .map(|r| r.focus_node.to_string())
        .collect();
    assert_eq!(
        focus,
        vec!["<http://example.org/both>".to_string(), "<http://example.org/none>".to_string()]
    );
}

#[test]
fn test_qualified_value_shape() {
    let outcome = validate(
        r#"
        ex:AHUShape a sh:NodeShape ;
            sh:targetClass ex:AHU ;
            sh:property [
                sh:path ex:hasPart ;
                sh:qualifiedValueShape [ sh:class ex:Fan ] ;
                sh:qualifiedMinCount 1 ;
            ] .
        "#,
        r#"
        ex:ahu1 a ex:AHU ; ex:hasPart ex:fan1, ex:damper1 .
        ex:fan1 a ex:Fan .
        ex:damper1 a ex:Damper .
        ex:ahu2 a ex:AHU ; ex:hasPart ex:damper1 .
        "#,
    );

    assert_eq!(outcome.report.results.len(), 1);
    assert_eq!(outcome.report.results[0].focus_node, Term::iri("http://example.org/ahu2"));
    assert_eq!(components(&outcome), vec!["QualifiedMinCountConstraintComponent"]);
}

#[test]
fn test_closed_shape_and_in() {
    let outcome = validate(
        r#"
        ex:UnitShape a sh:NodeShape ;
            sh:targetClass ex:Measured ;
            sh:closed true ;
            sh:ignoredProperties ( rdf:type ) ;
            sh:property [ sh:path ex:unit ; sh:in ( ex:DEG_C ex:DEG_F ) ] .
        "#,
        r#"
        ex:m1 a ex:Measured ; ex:unit ex:DEG_C .
        ex:m2 a ex:Measured ; ex:unit ex:KELVIN ; ex:extra "x" .
        "#,
    );

    let mut found = components(&outcome);
    found.sort();
    assert_eq!(found, vec!["ClosedConstraintComponent", "InConstraintComponent"]);
    let closed = outcome
        .report
        .results
        .iter()
        .find(|r| r.source_constraint_component.as_str() == sh::component("Closed"))
        .unwrap();
    assert_eq!(closed.result_path, Some(Term::iri("http://example.org/extra")));
}

#[test]
fn test_property_pair_constraints() {
    let outcome = validate(
        r#"
        ex:RangeShape a sh:NodeShape ;
            sh:targetClass ex:Range ;
            sh:property [ sh:path ex:min ; sh:lessThan ex:max ] ;
            sh:property [ sh:path ex:label ; sh:disjoint ex:name ] .
        "#,
        r#"
        ex:good a ex:Range ; ex:min 1 ; ex:max 5 ; ex:label "a" ; ex:name "b" .
        ex:bad a ex:Range ; ex:min 7 ; ex:max 5 ; ex:label "a" ; ex:name "a" .
        "#,
    );

    assert!(outcome
        .report
        .results
        .iter()
        .all(|r| r.focus_node == Term::iri("http://example.org/bad")));
    let mut found = components(&outcome);
    found.sort();
    assert_eq!(found, vec!["DisjointConstraintComponent", "LessThanConstraintComponent"]);
}

#[test]
fn test_severity_and_message() {
    let outcome = validate(
        r#"
        ex:NameShape a sh:NodeShape ;
            sh:targetClass ex:Thing ;
            sh:severity sh:Warning ;
            sh:message "Things should be named" ;
            sh:property [ sh:path ex:name ; sh:minCount 1 ; sh:severity sh:Warning ; sh:message "Missing name" ] .
        "#,
        r#"ex:x a ex:Thing ."#,
    );

    assert!(!outcome.conforms);
    let result = &outcome.report.results[0];
    assert_eq!(result.severity, ViolationLevel::Warning);
    assert_eq!(result.messages[0].lexical, "Missing name");
    assert!(outcome.report_text.contains("Validation Warning"));
}

#[test]
fn test_deactivated_shape_is_ignored() {
    let outcome = validate(
        r#"
        ex:Off a sh:NodeShape ;
            sh:targetClass ex:Thing ;
            sh:deactivated true ;
            sh:property [ sh:path ex:name ; sh:minCount 1 ] .
        "#,
        r#"ex:x a ex:Thing ."#,
    );
    assert!(outcome.conforms);
}

#[test]
fn test_invalid_parameter_is_skipped_alone() {
    let shapes_ttl = r#"
        ex:Broken a sh:NodeShape ;
            sh:targetClass ex:Thing ;
            sh:pattern "([unclosed" ;
            sh:nodeKind sh:Literal .
        "#;
    let shapes = shapes(shapes_ttl);
    assert!(shapes.skipped().is_empty());
    assert_eq!(shapes.skipped_parameters().len(), 1);
    assert_eq!(shapes.skipped_parameters()[0].shape, Term::iri("http://example.org/Broken"));
    assert_eq!(shapes.skipped_parameters()[0].parameter.as_str(), sh::PATTERN);

    // the sibling sh:nodeKind still applies
    let outcome = validate(shapes_ttl, r#"ex:t a ex:Thing ."#);
    assert!(!outcome.conforms);
    assert_eq!(components(&outcome), vec!["NodeKindConstraintComponent"]);
}

#[test]
fn test_malformed_count_keeps_sibling_constraints() {
    let shapes_ttl = r#"
        ex:ThingShape a sh:NodeShape ;
            sh:targetClass ex:Thing ;
            sh:property [ sh:path ex:name ; sh:minCount 1 ; sh:maxLength "ten" ] .
        "#;
    assert_eq!(shapes(shapes_ttl).skipped_parameters().len(), 1);

    let outcome = validate(shapes_ttl, r#"ex:t a ex:Thing ."#);
    assert!(!outcome.conforms);
    assert_eq!(components(&outcome), vec!["MinCountConstraintComponent"]);
}

#[test]
fn test_literal_path_skips_whole_shape() {
    let shapes = shapes(
        r#"
        ex:Outer a sh:NodeShape ;
            sh:targetClass ex:Thing ;
            sh:property ex:BadProperty .
        ex:BadProperty sh:path "name" ; sh:minCount 1 .
        "#,
    );
    assert_eq!(shapes.skipped().len(), 1);
    assert_eq!(shapes.skipped()[0].id, Term::iri("http://example.org/BadProperty"));
    assert!(shapes.get_shape(&Term::iri("http://example.org/Outer")).is_some());
}

#[test]
fn test_recursive_shapes_terminate() {
    let outcome = validate(
        r#"
        ex:ChainShape a sh:NodeShape ;
            sh:targetClass ex:Link ;
            sh:property [ sh:path ex:next ; sh:node ex:ChainShape ] .
        "#,
        r#"
        ex:a a ex:Link ; ex:next ex:b .
        ex:b ex:next ex:a .
        "#,
    );
    assert!(outcome.conforms);
}

#[test]
fn test_triple_rule_with_condition() {
    let shapes_ttl = r#"
        ex:TempSensorShape a sh:NodeShape ;
            sh:targetClass ex:Sensor ;
            sh:rule [
                a sh:TripleRule ;
                sh:subject sh:this ;
                sh:predicate rdf:type ;
                sh:object ex:TempSensor ;
                sh:condition [ sh:path ex:measures ; sh:hasValue ex:Temperature ] ;
            ] .
        ex:TempShape a sh:NodeShape ;
            sh:targetClass ex:TempSensor ;
            sh:property [ sh:path ex:hasUnit ; sh:minCount 1 ] .
        "#;
    let data_ttl = r#"
        ex:s1 a ex:Sensor ; ex:measures ex:Temperature .
        ex:s2 a ex:Sensor ; ex:measures ex:Pressure .
        "#;

    let shapes = shapes(shapes_ttl);
    assert_eq!(shapes.rules().len(), 1);

    let engine = DefaultShaclEngine::new();
    let expanded = engine.infer(&data(data_ttl), &shapes).unwrap();
    assert!(expanded.has_type(&Term::iri("http://example.org/s1"), "http://example.org/TempSensor"));
    assert!(!expanded.has_type(&Term::iri("http://example.org/s2"), "http://example.org/TempSensor"));

    // the inferred type brings s1 into the scope of TempShape
    let outcome = engine.validate(&data(data_ttl), &shapes).unwrap();
    assert_eq!(outcome.report.results.len(), 1);
    assert_eq!(outcome.report.results[0].focus_node, Term::iri("http://example.org/s1"));

    let without_inference = DefaultShaclEngine::with_config(ValidationConfig {
        inference: false,
        ..ValidationConfig::default()
    });
    assert!(without_inference.validate(&data(data_ttl), &shapes).unwrap().conforms);
}

const SPARQL_SHAPES: &str = r#"
    ex:prefixes sh:declare [ sh:prefix "ex" ; sh:namespace "http://example.org/"^^xsd:anyURI ] .

    ex:LimitShape a sh:NodeShape ;
        sh:targetClass ex:Sensor ;
        sh:sparql [
            a sh:SPARQLConstraint ;
            sh:message "Sensor {$this} reads {?value} above its limit" ;
            sh:prefixes ex:prefixes ;
            sh:select """
                SELECT $this ?value
                WHERE {
                    $this ex:reading ?value ;
                        ex:limit ?limit .
                    FILTER (?value > ?limit)
                }
                """ ;
        ] .
    "#;

#[test]
fn test_sparql_constraint_violation() {
    let outcome = validate(
        SPARQL_SHAPES,
        r#"
        ex:s1 a ex:Sensor ; ex:reading 30 ; ex:limit 25 .
        ex:s2 a ex:Sensor ; ex:reading 20 ; ex:limit 25 .
        "#,
    );
    assert!(!outcome.conforms);
    assert_eq!(components(&outcome), vec!["SPARQLConstraintComponent"]);

    let result = &outcome.report.results[0];
    assert_eq!(result.focus_node, Term::iri("http://example.org/s1"));
    assert_eq!(result.value, Some(Term::literal(Literal::integer(30))));
    assert_eq!(result.source_shape, Term::iri("http://example.org/LimitShape"));
    assert_eq!(result.messages[0].lexical, "Sensor http://example.org/s1 reads 30 above its limit");
}

#[test]
fn test_sparql_constraint_conforms() {
    let outcome = validate(SPARQL_SHAPES, r#"ex:s2 a ex:Sensor ; ex:reading 20 ; ex:limit 25 ."#);
    assert!(outcome.conforms);
}

#[test]
fn test_sparql_constraint_path_placeholder() {
    let outcome = validate(
        r#"
        ex:ReadingShape a sh:NodeShape ;
            sh:targetClass ex:Sensor ;
            sh:property [
                sh:path ex:reading ;
                sh:sparql [ sh:select "SELECT $this ?value WHERE { $this $PATH ?value . FILTER (?value < 0) }" ] ;
            ] .
        "#,
        r#"
        ex:s1 a ex:Sensor ; ex:reading -3 .
        ex:s2 a ex:Sensor ; ex:reading 4 .
        "#,
    );
    assert_eq!(outcome.report.results.len(), 1);

    let result = &outcome.report.results[0];
    assert_eq!(result.focus_node, Term::iri("http://example.org/s1"));
    assert_eq!(result.value, Some(Term::literal(Literal::integer(-3))));
    assert_eq!(result.result_path, Some(Term::iri("http://example.org/reading")));
}

#[test]
fn test_sparql_constraint_sees_shapes_graph() {
    let shapes = shapes(
        r#"
        ex:TempSensor rdfs:subClassOf ex:Sensor .
        ex:TypedShape a sh:NodeShape ;
            sh:targetSubjectsOf ex:reading ;
            sh:sparql [
                sh:select """
                    SELECT $this WHERE {
                        FILTER NOT EXISTS { $this a/rdfs:subClassOf* <http://example.org/Sensor> }
                    }
                    """ ;
            ] .
        "#,
    );
    let graph = data(
        r#"
        ex:t1 a ex:TempSensor ; ex:reading 1 .
        ex:x ex:reading 2 .
        "#,
    );

    // without inference the subclass axiom is only in the shapes graph
    let engine = DefaultShaclEngine::with_config(ValidationConfig {
        inference: false,
        ..ValidationConfig::default()
    });
    let outcome = engine.validate(&graph, &shapes).unwrap();
    let focus: Vec<&Term> = outcome.report.results.iter().map(|r| &r.focus_node).collect();
    assert_eq!(focus, vec![&Term::iri("http://example.org/x")]);
}

#[test]
fn test_unusable_sparql_constraint_is_skipped() {
    let shapes = shapes(
        r#"
        ex:S a sh:NodeShape ;
            sh:targetClass ex:Thing ;
            sh:minCount 1 ;
            sh:sparql [ sh:select "SELECT ?x WHERE { ?x unknown:p ?y }" ] ;
            sh:sparql [ sh:select "ASK { $this ?p ?o }" ] ;
            sh:sparql [ sh:select "SELECT $this WHERE { }" ; sh:deactivated true ] .
        "#,
    );
    let parameters: Vec<&str> = shapes
        .skipped_parameters()
        .iter()
        .map(|p| p.parameter.as_str())
        .collect();
    assert_eq!(parameters, vec![sh::SPARQL, sh::SPARQL]);

    let shape = shapes.get_shape(&Term::iri("http://example.org/S")).unwrap();
    assert_eq!(shape.constraints.len(), 1);
}

#[test]
fn test_sparql_rule_inference() {
    let shapes = shapes(
        r#"
        ex:SensorShape a sh:NodeShape ;
            sh:targetClass ex:Sensor ;
            sh:rule [
                a sh:SPARQLRule ;
                sh:construct """
                    CONSTRUCT { $this a <http://example.org/TempSensor> }
                    WHERE { $this <http://example.org/measures> <http://example.org/Temperature> }
                    """ ;
            ] ;
            sh:rule [ a sh:SPARQLRule ; sh:construct "SELECT * WHERE { }" ] .
        "#,
    );
    assert_eq!(shapes.rules().len(), 1);
    assert_eq!(shapes.unsupported_count(), 1);

    let expanded = DefaultShaclEngine::new()
        .infer(
            &data(
                r#"
                ex:s1 a ex:Sensor ; ex:measures ex:Temperature .
                ex:s2 a ex:Sensor ; ex:measures ex:Pressure .
                "#,
            ),
            &shapes,
        )
        .unwrap();
    assert!(expanded.has_type(&Term::iri("http://example.org/s1"), "http://example.org/TempSensor"));
    assert!(!expanded.has_type(&Term::iri("http://example.org/s2"), "http://example.org/TempSensor"));
}

#[test]
fn test_out_of_range_lexical_forms() {
    let shapes_ttl = r#"
        ex:ThingShape a sh:NodeShape ;
            sh:targetClass ex:Thing ;
            sh:property [ sh:path ex:count ; sh:datatype xsd:nonNegativeInteger ] ;
            sh:property [ sh:path ex:ratio ; sh:datatype xsd:decimal ] ;
            sh:property [ sh:path ex:small ; sh:datatype xsd:unsignedByte ] .
        "#;

    let outcome = validate(
        shapes_ttl,
        r#"
        ex:t a ex:Thing ;
            ex:count "-5"^^xsd:nonNegativeInteger ;
            ex:ratio "NaN"^^xsd:decimal ;
            ex:small "999"^^xsd:unsignedByte .
        "#,
    );
    assert!(!outcome.conforms);
    assert_eq!(components(&outcome), vec!["DatatypeConstraintComponent"; 3]);

    let outcome = validate(
        shapes_ttl,
        r#"
        ex:t a ex:Thing ;
            ex:count "5"^^xsd:nonNegativeInteger ;
            ex:ratio "0.25"^^xsd:decimal ;
            ex:small "255"^^xsd:unsignedByte .
        "#,
    );
    assert!(outcome.conforms);
}

#[test]
fn test_language_tags_keep_their_case() {
    let outcome = validate(
        r#"
        ex:LabelShape a sh:NodeShape ;
            sh:targetNode ex:site ;
            sh:property [ sh:path rdfs:label ; sh:languageIn ( "de" ) ; sh:uniqueLang true ] .
        "#,
        r#"ex:site rdfs:label "Site"@en-US, "Campus"@EN-us ."#,
    );

    // uniqueLang treats the two tags as the same language
    let mut found = components(&outcome);
    found.sort();
    assert_eq!(
        found,
        vec![
            "LanguageInConstraintComponent",
            "LanguageInConstraintComponent",
            "UniqueLangConstraintComponent",
        ]
    );

    let site = Term::literal(Literal::lang("Site", "en-US"));
    assert!(outcome.report.results.iter().any(|r| r.value.as_ref() == Some(&site)));
    assert!(to_jsonld_string(&outcome.report_graph).unwrap().contains("\"en-US\""));
}

#[test]
fn test_reports_are_deterministic() {
    let shapes = shapes(
        r#"
        ex:S a sh:NodeShape ;
            sh:targetClass ex:Thing ;
            sh:property [ sh:path ex:name ; sh:minCount 1 ] ;
            sh:property [ sh:path [ sh:inversePath ex:has ] ; sh:maxCount 0 ] .
        "#,
    );
    let graph = data(
        r#"
        ex:a a ex:Thing . ex:b a ex:Thing . ex:c a ex:Thing .
        ex:z ex:has ex:a .
        "#,
    );

    let engine = DefaultShaclEngine::new();
    let first = engine.validate(&graph, &shapes).unwrap();
    let second = engine.validate(&graph, &shapes).unwrap();
    assert_eq!(first.report.results.len(), 4);
    assert_eq!(
        to_jsonld_string(&first.report_graph).unwrap(),
        to_jsonld_string(&second.report_graph).unwrap()
    );
    assert_eq!(first.report_text, second.report_text);

    // the inverse path structure is copied into the report graph
    let inverse = first
        .report_graph
        .with_predicate(sh::INVERSE_PATH)
        .into_iter()
        .count();
    assert_eq!(inverse, 1);
}

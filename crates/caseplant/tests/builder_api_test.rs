//! Integration tests for the DiagramBuilder API
//!
//! These tests verify that the public API works end to end.

use caseplant::{
    CaseplantError, DiagramBuilder,
    config::{AppConfig, ContainerKind, RenderConfig},
    export::{Exporter, plantuml::PlantUml},
};

const CLERK_BILLING: &str = r#"
    actor 'Clerk' as C;
    module('Billing') { case 'Pay Invoice' as PI }
    C -> PI
"#;

#[test]
fn test_parse_simple_diagram() {
    let builder = DiagramBuilder::default();
    let result = builder.parse(CLERK_BILLING);
    assert!(
        result.is_ok(),
        "Should parse valid diagram: {:?}",
        result.err()
    );
}

#[test]
fn test_render_clerk_billing() {
    let builder = DiagramBuilder::default();
    let diagram = builder.parse(CLERK_BILLING).expect("Failed to parse diagram");
    let text = builder.render(&diagram);

    assert_eq!(
        text,
        "@startuml\n\
         actor C as \"Clerk\"\n\
         \n\
         package \"Billing\" {\n\
         \x20 usecase \"Pay Invoice\" as PI\n\
         }\n\
         \n\
         C --> PI\n\
         @enduml\n"
    );
}

#[test]
fn test_empty_input_renders_empty_block() {
    let builder = DiagramBuilder::default();
    let parsed = builder.parse_lenient("");
    assert!(parsed.diagnostics().is_empty());
    assert_eq!(builder.render(parsed.diagram()), "@startuml\n@enduml\n");
}

#[test]
fn test_parse_invalid_syntax_returns_error() {
    let invalid_source = "this is not valid caseplant syntax!!!";

    let builder = DiagramBuilder::default();
    match builder.parse(invalid_source) {
        Err(CaseplantError::Parse { err, src }) => {
            assert!(err.errors().count() > 0);
            assert_eq!(src, invalid_source);
        }
        other => panic!("Expected parse error, got {other:?}"),
    }
}

#[test]
fn test_recovery_keeps_surrounding_statements() {
    let source = "actor 'A' as A;\nmodule('M' { case 'x' }\nactor 'B' as B;";

    let builder = DiagramBuilder::default();
    let parsed = builder.parse_lenient(source);
    assert!(parsed.has_errors());

    let text = builder.render(parsed.diagram());
    assert!(text.contains("actor A as \"A\"\n"));
    assert!(text.contains("actor B as \"B\"\n"));
}

#[test]
fn test_label_operands_refer_to_declared_elements() {
    let source = "actor 'Clerk' as C; module('B') { case 'Pay Invoice' as PI }\n\
                  'Clerk' -> 'Pay Invoice'; C -- 'Refund'";

    let builder = DiagramBuilder::default();
    let text = builder.convert(source).expect("Failed to convert");
    assert!(text.contains("C --> PI\n"), "{text}");
    assert!(text.contains("C -- (Refund)\n"), "{text}");
}

#[test]
fn test_last_write_wins_in_render() {
    let source = "module('X') { case 'First' } module('X') { case 'Second' }";

    let builder = DiagramBuilder::default();
    let diagram = builder.parse(source).expect("warnings do not fail");
    let text = builder.render(&diagram);

    assert!(text.contains("usecase \"Second\""));
    assert!(!text.contains("usecase \"First\""));
    assert_eq!(text.matches("package \"X\"").count(), 1);
}

#[test]
fn test_render_is_deterministic() {
    let source = r#"
        actor 'Librarian';
        actor 'Member' as MB;
        module(Lending) { case 'Borrow' as BO, case 'Return' }
        module(Catalogue) { case 'Search' as SE }
        MB -- BO; MB -- 'Return'; 'Librarian' -> SE; BO -i> SE
    "#;

    let builder = DiagramBuilder::default();
    let diagram = builder.parse(source).expect("Failed to parse");
    assert_eq!(builder.render(&diagram), builder.render(&diagram));

    let again = builder.parse(source).expect("Failed to parse");
    assert_eq!(builder.render(&diagram), builder.render(&again));
}

#[test]
fn test_builder_with_config() {
    let config = AppConfig::new(RenderConfig::new(
        ContainerKind::Frame,
        None,
        Some("Billing".to_string()),
    ));

    let builder = DiagramBuilder::new(config);
    let text = builder.convert(CLERK_BILLING).expect("Failed to convert");
    assert!(text.starts_with("@startuml\ntitle Billing\n"));
    assert!(text.contains("frame \"Billing\" {\n"));
}

#[test]
fn test_exporter_matches_builder() {
    let builder = DiagramBuilder::default();
    let diagram = builder.parse(CLERK_BILLING).expect("Failed to parse");

    let exporter = PlantUml::new(RenderConfig::default());
    assert_eq!(exporter.export_diagram(&diagram), builder.render(&diagram));
}

#[test]
fn test_builder_reusability() {
    let builder = DiagramBuilder::default();

    let first = builder.convert("actor 'One' as O;").expect("first");
    let second = builder.convert("actor 'Two' as T;").expect("second");

    assert!(first.contains("actor O as \"One\""));
    assert!(!second.contains("One"));
    assert!(second.contains("actor T as \"Two\""));
}

#[test]
fn test_models_are_independent_across_threads() {
    let handles: Vec<_> = (0..4)
        .map(|i| {
            std::thread::spawn(move || {
                let builder = DiagramBuilder::default();
                builder
                    .convert(&format!("actor 'Actor {i}' as A{i};"))
                    .expect("convert")
            })
        })
        .collect();

    for (i, handle) in handles.into_iter().enumerate() {
        let text = handle.join().expect("thread");
        assert_eq!(text.matches("actor ").count(), 1);
        assert!(text.contains(&format!("actor A{i} as \"Actor {i}\"")));
    }
}

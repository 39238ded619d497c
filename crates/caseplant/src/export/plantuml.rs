//! PlantUML rendering for use-case diagrams.
//!
//! Output is built in a fixed order: header directives, actors, one
//! container block per module, then relations. Every collection is walked in
//! declaration order, so the same model always renders to the same bytes.

use caseplant_core::{
    model::{Actor, Diagram, Module, UseCase},
    relation::{Operand, Relation, RelationOperator},
};

use super::Exporter;
use crate::config::RenderConfig;

const INDENT: &str = "  ";

/// PlantUML exporter configured by a [`RenderConfig`].
#[derive(Debug, Clone, Default)]
pub struct PlantUml {
    config: RenderConfig,
}

impl PlantUml {
    pub fn new(config: RenderConfig) -> Self {
        Self { config }
    }

    fn render_header(&self, out: &mut String) {
        if let Some(title) = self.config.title() {
            out.push_str("title ");
            out.push_str(&escape_text(title));
            out.push('\n');
        }
        if let Some(direction) = self.config.direction() {
            out.push_str(direction.directive());
            out.push('\n');
        }
    }

    fn render_actor(&self, out: &mut String, actor: &Actor) {
        let name = escape_text(actor.display_name());
        let line = match actor.alias() {
            Some(alias) => format!("actor {alias} as \"{name}\""),
            None if is_identifier(actor.display_name()) => format!("actor {name}"),
            None => format!("actor \"{name}\" as {}", synthesize_identifier(&name)),
        };
        out.push_str(&line);
        out.push('\n');
    }

    fn render_module(&self, out: &mut String, module: &Module) {
        out.push_str(&format!(
            "{} \"{}\" {{\n",
            self.config.container(),
            escape_text(module.name())
        ));
        for use_case in module.use_cases() {
            let name = escape_text(use_case.display_name());
            let line = match use_case.alias() {
                Some(alias) => format!("{INDENT}usecase \"{name}\" as {alias}"),
                None => format!("{INDENT}usecase \"{name}\""),
            };
            out.push_str(&line);
            out.push('\n');
        }
        out.push_str("}\n\n");
    }

    fn render_relation(&self, out: &mut String, diagram: &Diagram, relation: &Relation) {
        let left = render_operand(diagram, relation.left());
        let right = render_operand(diagram, relation.right());
        let (arrow, stereotype) = arrow(relation.operator());

        out.push_str(&format!("{left} {arrow} {right}"));
        if let Some(stereotype) = stereotype {
            out.push_str(&format!(" : <<{stereotype}>>"));
        }
        out.push('\n');
    }
}

impl Exporter for PlantUml {
    fn export_diagram(&self, diagram: &Diagram) -> String {
        let mut out = String::from("@startuml\n");
        self.render_header(&mut out);

        let mut has_actors = false;
        for actor in diagram.actors() {
            self.render_actor(&mut out, actor);
            has_actors = true;
        }
        if has_actors {
            out.push('\n');
        }

        for module in diagram.modules() {
            self.render_module(&mut out, module);
        }

        for relation in diagram.relations() {
            self.render_relation(&mut out, diagram, relation);
        }

        out.push_str("@enduml\n");
        out
    }
}

/// Render a diagram to PlantUML source text.
///
/// # Example
///
/// ```
/// # use caseplant::{config::RenderConfig, export::plantuml, model::Diagram};
/// let text = plantuml::render(&Diagram::new(), &RenderConfig::default());
/// assert_eq!(text, "@startuml\n@enduml\n");
/// ```
pub fn render(diagram: &Diagram, config: &RenderConfig) -> String {
    PlantUml::new(config.clone()).export_diagram(diagram)
}

/// The PlantUML connector and optional stereotype for an operator.
fn arrow(operator: RelationOperator) -> (&'static str, Option<&'static str>) {
    match operator {
        RelationOperator::Association => ("--", None),
        RelationOperator::Extend => ("..>", Some("extend")),
        RelationOperator::Include => ("..>", Some("include")),
        RelationOperator::Generalization => ("--|>", None),
        RelationOperator::Directed => ("-->", None),
    }
}

/// Render an operand as the reference PlantUML knows the element by.
///
/// A label is matched against actor names first, then use-case names.
fn render_operand(diagram: &Diagram, operand: &Operand) -> String {
    let text = operand.text();
    if let Operand::Alias(_) = operand {
        return text.to_string();
    }

    if let Some(actor) = diagram.actors().find(|actor| actor.display_name() == text) {
        return actor_identifier(actor);
    }
    let use_case_alias = diagram
        .modules()
        .flat_map(Module::use_cases)
        .find(|use_case| use_case.display_name() == text)
        .and_then(UseCase::alias);
    match use_case_alias {
        Some(alias) => alias.to_string(),
        // Also how PlantUML refers to an alias-less usecase
        None => format!("({})", escape_text(text)),
    }
}

/// The identifier an actor is declared under in the output.
fn actor_identifier(actor: &Actor) -> String {
    match actor.alias() {
        Some(alias) => alias.to_string(),
        None if is_identifier(actor.display_name()) => actor.display_name().to_string(),
        None => synthesize_identifier(&escape_text(actor.display_name())),
    }
}

fn is_identifier(text: &str) -> bool {
    let mut chars = text.chars();
    chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Build a PlantUML identifier from display text.
fn synthesize_identifier(text: &str) -> String {
    let mut id: String = text
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect();
    if id.is_empty() || id.starts_with(|c: char| c.is_ascii_digit()) {
        id.insert(0, '_');
    }
    id
}

/// Make display text safe inside a double-quoted PlantUML string.
fn escape_text(text: &str) -> String {
    text.replace('"', "'").replace('\n', "\\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::config::{ContainerKind, Direction};

    fn alias(s: &str) -> Operand {
        Operand::Alias(s.to_string())
    }

    fn label(s: &str) -> Operand {
        Operand::Label(s.to_string())
    }

    fn clerk_billing() -> Diagram {
        let mut diagram = Diagram::new();
        diagram.add_actor(Actor::new("Clerk", Some("C".to_string())));
        diagram.add_module(Module::new(
            "Billing",
            vec![UseCase::new("Pay Invoice", Some("PI".to_string()))],
        ));
        diagram.add_relation(Relation::new(alias("C"), RelationOperator::Directed, alias("PI")));
        diagram
    }

    #[test]
    fn test_empty_diagram() {
        assert_eq!(render(&Diagram::new(), &RenderConfig::default()), "@startuml\n@enduml\n");
    }

    #[test]
    fn test_clerk_billing() {
        let expected = "@startuml\n\
                        actor C as \"Clerk\"\n\
                        \n\
                        package \"Billing\" {\n\
                        \x20 usecase \"Pay Invoice\" as PI\n\
                        }\n\
                        \n\
                        C --> PI\n\
                        @enduml\n";
        assert_eq!(render(&clerk_billing(), &RenderConfig::default()), expected);
    }

    #[test]
    fn test_header_directives() {
        let config = RenderConfig::new(
            ContainerKind::Rectangle,
            Some(Direction::LeftToRight),
            Some("Front \"desk\"".to_string()),
        );
        let text = render(&clerk_billing(), &config);
        assert!(text.starts_with(
            "@startuml\ntitle Front 'desk'\nleft to right direction\nactor C as \"Clerk\"\n"
        ));
        assert!(text.contains("rectangle \"Billing\" {\n"));
    }

    #[test]
    fn test_operator_table() {
        let mut diagram = Diagram::new();
        for operator in RelationOperator::ALL {
            diagram.add_relation(Relation::new(alias("A"), operator, alias("B")));
        }
        let text = render(&diagram, &RenderConfig::default());
        let relations: Vec<_> = text
            .lines()
            .filter(|line| line.starts_with("A "))
            .collect();
        assert_eq!(
            relations,
            [
                "A --|> B",
                "A ..> B : <<extend>>",
                "A ..> B : <<include>>",
                "A --> B",
                "A -- B",
            ]
        );
    }

    #[test]
    fn test_actor_without_alias() {
        let mut diagram = Diagram::new();
        diagram.add_actor(Actor::new("Clerk", None));
        diagram.add_actor(Actor::new("Facility Manager", None));
        diagram.add_actor(Actor::new("3rd Party", None));
        let text = render(&diagram, &RenderConfig::default());
        assert!(text.contains("actor Clerk\n"));
        assert!(text.contains("actor \"Facility Manager\" as Facility_Manager\n"));
        assert!(text.contains("actor \"3rd Party\" as _3rd_Party\n"));
    }

    #[test]
    fn test_use_case_without_alias() {
        let mut diagram = Diagram::new();
        diagram.add_module(Module::new("M", vec![UseCase::new("Refund", None)]));
        let text = render(&diagram, &RenderConfig::default());
        assert!(text.contains("package \"M\" {\n  usecase \"Refund\"\n}\n"));
    }

    #[test]
    fn test_label_operands() {
        let mut diagram = clerk_billing();
        diagram.add_actor(Actor::new("Front Desk", None));
        diagram.add_module(Module::new("Support", vec![UseCase::new("Refund", None)]));
        for (left, right) in [
            ("Clerk", "Pay Invoice"),
            ("Front Desk", "Refund"),
            ("Visitor", "Check In"),
        ] {
            diagram.add_relation(Relation::new(
                label(left),
                RelationOperator::Association,
                label(right),
            ));
        }

        let text = render(&diagram, &RenderConfig::default());
        assert!(text.contains("C -- PI\n"), "{text}");
        assert!(text.contains("Front_Desk -- (Refund)\n"), "{text}");
        assert!(text.contains("(Visitor) -- (Check In)\n"), "{text}");
    }

    #[test]
    fn test_label_prefers_actor_over_use_case() {
        let mut diagram = Diagram::new();
        diagram.add_actor(Actor::new("Billing", Some("BA".to_string())));
        diagram.add_module(Module::new(
            "M",
            vec![UseCase::new("Billing", Some("BU".to_string()))],
        ));
        diagram.add_relation(Relation::new(
            label("Billing"),
            RelationOperator::Directed,
            alias("X"),
        ));
        let text = render(&diagram, &RenderConfig::default());
        assert!(text.contains("BA --> X\n"), "{text}");
    }

    #[test]
    fn test_quotes_in_names() {
        let mut diagram = Diagram::new();
        diagram.add_actor(Actor::new("The \"Boss\"", Some("B".to_string())));
        let text = render(&diagram, &RenderConfig::default());
        assert!(text.contains("actor B as \"The 'Boss'\"\n"));
    }

    #[test]
    fn test_synthesize_identifier() {
        assert_eq!(synthesize_identifier("a b-c"), "a_b_c");
        assert_eq!(synthesize_identifier("9lives"), "_9lives");
        assert_eq!(synthesize_identifier(""), "_");
        assert!(is_identifier("_x1"));
        assert!(!is_identifier("1x"));
        assert!(!is_identifier("a b"));
    }
}

#[cfg(test)]
mod proptests {
    use super::*;

    use proptest::prelude::*;

    fn name_strategy() -> impl Strategy<Value = String> {
        "[A-Za-z][A-Za-z0-9 ]{0,12}"
    }

    fn diagram_strategy() -> impl Strategy<Value = (Vec<String>, Vec<(String, Vec<String>)>)> {
        (
            prop::collection::vec(name_strategy(), 0..6),
            prop::collection::vec(
                (name_strategy(), prop::collection::vec(name_strategy(), 0..4)),
                0..4,
            ),
        )
    }

    fn build(actors: &[String], modules: &[(String, Vec<String>)]) -> Diagram {
        let mut diagram = Diagram::new();
        for (i, name) in actors.iter().enumerate() {
            diagram.add_actor(Actor::new(name.clone(), Some(format!("A{i}"))));
        }
        for (i, (name, cases)) in modules.iter().enumerate() {
            let use_cases = cases
                .iter()
                .map(|case| UseCase::new(case.clone(), None))
                .collect();
            diagram.add_module(Module::new(format!("{name}{i}"), use_cases));
        }
        diagram
    }

    proptest! {
        #[test]
        fn rendering_is_deterministic((actors, modules) in diagram_strategy()) {
            let diagram = build(&actors, &modules);
            let config = RenderConfig::default();
            prop_assert_eq!(render(&diagram, &config), render(&diagram, &config));
        }

        #[test]
        fn rendering_preserves_declaration_order((actors, modules) in diagram_strategy()) {
            let diagram = build(&actors, &modules);
            let text = render(&diagram, &RenderConfig::default());

            let rendered_actors: Vec<_> = text
                .lines()
                .filter_map(|line| line.strip_prefix("actor "))
                .map(|rest| rest.split(' ').next().unwrap_or_default().to_string())
                .collect();
            let expected_actors: Vec<_> = (0..actors.len()).map(|i| format!("A{i}")).collect();
            prop_assert_eq!(rendered_actors, expected_actors);

            let rendered_cases: Vec<_> = text
                .lines()
                .filter_map(|line| line.strip_prefix("  usecase \""))
                .map(|rest| rest.trim_end_matches('"').to_string())
                .collect();
            let expected_cases: Vec<_> =
                modules.iter().flat_map(|(_, cases)| cases.clone()).collect();
            prop_assert_eq!(rendered_cases, expected_cases);
        }
    }
}

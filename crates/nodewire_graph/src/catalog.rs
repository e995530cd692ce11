// SPDX-License-Identifier: MIT OR Apache-2.0
//! Scripting catalog: the node vocabulary shipped with the demo editor.
//!
//! Everything here is plain data fed into [`TypeRegistry`] and
//! [`TemplateRegistry`]; the core graph never depends on these names.

use crate::connector::ConnectorSpec;
use crate::node::{NodeTemplate, TemplateBody, TemplateRegistry, ACTION_SIZE};
use crate::types::{AcceptedType, TypeId, TypeRegistry};

/// Type handles for the scripting catalog
#[derive(Debug, Clone, Copy)]
pub struct CatalogTypes {
    /// Root of the hierarchy; variable connectors accept this so any
    /// action node can bind them
    pub any: TypeId,
    /// Execution flow edges
    pub signal: TypeId,
    /// Parent of all value types
    pub value: TypeId,
    /// Numeric values
    pub number: TypeId,
    /// Text values
    pub text: TypeId,
    /// Boolean values
    pub boolean: TypeId,
}

/// Register the scripting type hierarchy
pub fn create_type_registry() -> (TypeRegistry, CatalogTypes) {
    let mut types = TypeRegistry::new();

    let any = types.register_with_color("Any", None, [200, 200, 200]);
    let signal = types.register_with_color("Signal", Some(any), [230, 230, 230]);
    let value = types.register_with_color("Value", Some(any), [90, 160, 255]);
    let number = types.register_with_color("Number", Some(value), [120, 220, 120]);
    let text = types.register_with_color("Text", Some(value), [240, 160, 80]);
    let boolean = types.register_with_color("Boolean", Some(value), [220, 90, 90]);

    (
        types,
        CatalogTypes {
            any,
            signal,
            value,
            number,
            text,
            boolean,
        },
    )
}

/// Create the node template registry for the scripting catalog
pub fn create_template_registry(types: &CatalogTypes) -> TemplateRegistry {
    let mut registry = TemplateRegistry::new();

    // Entry point: one outgoing signal, nothing else. Kept first so the
    // orphan scan's skip-first convention treats it as the root.
    registry.register(NodeTemplate {
        id: "start".to_string(),
        name: "Start".to_string(),
        declared_type: types.signal,
        body: TemplateBody::Action {
            size: ACTION_SIZE,
            inputs: vec![],
            modifiers: vec![],
            outputs: vec![ConnectorSpec::unbounded(
                "Next",
                AcceptedType::One(types.signal),
            )],
        },
    });

    registry.register(NodeTemplate {
        id: "branch".to_string(),
        name: "Branch".to_string(),
        declared_type: types.signal,
        body: TemplateBody::Action {
            size: ACTION_SIZE,
            inputs: vec![ConnectorSpec::unbounded(
                "In",
                AcceptedType::One(types.signal),
            )],
            modifiers: vec![ConnectorSpec::new(
                "Condition",
                1,
                AcceptedType::One(types.boolean),
            )],
            outputs: vec![
                ConnectorSpec::unbounded("True", AcceptedType::One(types.signal)),
                ConnectorSpec::unbounded("False", AcceptedType::One(types.signal)),
            ],
        },
    });

    registry.register(NodeTemplate {
        id: "print".to_string(),
        name: "Print".to_string(),
        declared_type: types.signal,
        body: TemplateBody::Action {
            size: ACTION_SIZE,
            inputs: vec![ConnectorSpec::unbounded(
                "In",
                AcceptedType::One(types.signal),
            )],
            // Accepts any value subtype, one binding at a time.
            modifiers: vec![ConnectorSpec::new(
                "Message",
                1,
                AcceptedType::One(types.value),
            )],
            outputs: vec![ConnectorSpec::unbounded(
                "Out",
                AcceptedType::One(types.signal),
            )],
        },
    });

    registry.register(NodeTemplate {
        id: "compare".to_string(),
        name: "Compare".to_string(),
        declared_type: types.signal,
        body: TemplateBody::Action {
            size: ACTION_SIZE,
            inputs: vec![ConnectorSpec::unbounded(
                "In",
                AcceptedType::One(types.signal),
            )],
            modifiers: vec![
                ConnectorSpec::new("Left", 1, AcceptedType::ManyOf(types.value)),
                ConnectorSpec::new("Right", 1, AcceptedType::ManyOf(types.value)),
            ],
            outputs: vec![
                ConnectorSpec::unbounded("Equal", AcceptedType::One(types.signal)),
                ConnectorSpec::unbounded("Different", AcceptedType::One(types.signal)),
            ],
        },
    });

    registry.register(NodeTemplate {
        id: "number".to_string(),
        name: "Number".to_string(),
        declared_type: types.number,
        body: TemplateBody::Variable {
            value: "0".to_string(),
            accepted: AcceptedType::One(types.any),
        },
    });

    registry.register(NodeTemplate {
        id: "text".to_string(),
        name: "Text".to_string(),
        declared_type: types.text,
        body: TemplateBody::Variable {
            value: String::new(),
            accepted: AcceptedType::One(types.any),
        },
    });

    registry.register(NodeTemplate {
        id: "boolean".to_string(),
        name: "Boolean".to_string(),
        declared_type: types.boolean,
        body: TemplateBody::Variable {
            value: "false".to_string(),
            accepted: AcceptedType::One(types.any),
        },
    });

    registry
}

use std::collections::{HashMap, HashSet};

use indexmap::IndexMap;
use schemars::schema::{InstanceType, Schema, SchemaObject, SingleOrVec};
use serde_json::Value;
use tracing::debug;

use super::{
    FormSchema, SchemaError,
    loader::load_root_schema,
    metadata,
    model::{
        ArraySchema, BooleanSchema, NodeKind, NumberSchema, ObjectSchema, SchemaNode,
        StringSchema,
    },
    resolver::SchemaResolver,
};

/// Parse a JSON schema document into an immutable [`FormSchema`].
///
/// Every reachable `$ref` is resolved here; a dangling reference or an
/// object-only reference cycle fails the whole load.
pub fn parse_form_schema(value: &Value) -> Result<FormSchema, SchemaError> {
    let root_schema = load_root_schema(value)?;
    let resolver = SchemaResolver::new(value, &root_schema);
    let mut builder = NodeBuilder {
        resolver: &resolver,
        definitions: IndexMap::new(),
        pending: HashSet::new(),
    };
    let root = builder.build_object(resolver.root_object(), "")?;
    let definitions = builder.definitions;
    check_reference_cycles(&root, &definitions)?;

    debug!(definitions = definitions.len(), "parsed form schema");

    Ok(FormSchema {
        title: root.title.clone(),
        description: root.description.clone(),
        root,
        definitions,
        raw: value.clone(),
    })
}

struct NodeBuilder<'r, 'a> {
    resolver: &'r SchemaResolver<'a>,
    definitions: IndexMap<String, SchemaNode>,
    pending: HashSet<String>,
}

impl NodeBuilder<'_, '_> {
    fn build(&mut self, schema: &Schema, pointer: &str) -> Result<SchemaNode, SchemaError> {
        match schema {
            Schema::Object(object) => self.build_object(object, pointer),
            Schema::Bool(_) => Err(SchemaError::UnsupportedType {
                pointer: pointer.to_string(),
                detail: "boolean schemas cannot be rendered".to_string(),
            }),
        }
    }

    fn build_object(
        &mut self,
        object: &SchemaObject,
        pointer: &str,
    ) -> Result<SchemaNode, SchemaError> {
        let kind = if let Some(reference) = &object.reference {
            self.register_reference(reference)?;
            NodeKind::Ref(reference.clone())
        } else {
            self.detect_kind(object, pointer)?
        };

        Ok(SchemaNode {
            title: metadata::title(object),
            description: metadata::description(object),
            default: metadata::default_value(object),
            ui_hint: metadata::ui_hint(object),
            kind,
        })
    }

    fn register_reference(&mut self, reference: &str) -> Result<(), SchemaError> {
        if self.definitions.contains_key(reference) || self.pending.contains(reference) {
            return Ok(());
        }
        self.pending.insert(reference.to_string());
        let (pointer, target) = self.resolver.follow_reference(reference)?;
        let node = self.build_object(&target, &pointer)?;
        self.pending.remove(reference);
        self.definitions.insert(reference.to_string(), node);
        Ok(())
    }

    fn detect_kind(
        &mut self,
        object: &SchemaObject,
        pointer: &str,
    ) -> Result<NodeKind, SchemaError> {
        let declared = read_type(object).or_else(|| infer_type(object));
        match declared {
            Some(InstanceType::String) => Ok(NodeKind::String(StringSchema {
                enum_values: object.enum_values.clone(),
                one_of: metadata::choice_options(object).filter(|options| !options.is_empty()),
                format: object.format.clone(),
            })),
            Some(InstanceType::Integer) => Ok(NodeKind::Number(NumberSchema { integer: true })),
            Some(InstanceType::Number) => Ok(NodeKind::Number(NumberSchema { integer: false })),
            Some(InstanceType::Boolean) => Ok(NodeKind::Boolean(BooleanSchema {
                one_of: metadata::choice_options(object).filter(|options| !options.is_empty()),
            })),
            Some(InstanceType::Array) => {
                let items = object
                    .array
                    .as_ref()
                    .and_then(|array| array.items.as_ref());
                match items {
                    Some(SingleOrVec::Single(items)) => {
                        let node = self.build(items, &format!("{pointer}/items"))?;
                        Ok(NodeKind::Array(ArraySchema {
                            items: Box::new(node),
                        }))
                    }
                    _ => Err(SchemaError::UnsupportedArray {
                        pointer: pointer.to_string(),
                    }),
                }
            }
            Some(InstanceType::Object) => {
                let mut properties = IndexMap::new();
                let mut required = Vec::new();
                if let Some(validation) = &object.object {
                    for (name, schema) in &validation.properties {
                        let child_pointer =
                            format!("{pointer}/properties/{}", escape_pointer_segment(name));
                        properties.insert(name.clone(), self.build(schema, &child_pointer)?);
                    }
                    required.extend(validation.required.iter().cloned());
                }
                Ok(NodeKind::Object(ObjectSchema {
                    properties,
                    required,
                }))
            }
            Some(InstanceType::Null) | None => Err(SchemaError::UnsupportedType {
                pointer: pointer.to_string(),
                detail: "schema declares no renderable type".to_string(),
            }),
        }
    }
}

fn read_type(object: &SchemaObject) -> Option<InstanceType> {
    match object.instance_type.as_ref()? {
        SingleOrVec::Single(ty) => Some(**ty),
        SingleOrVec::Vec(types) => types
            .iter()
            .copied()
            .find(|ty| *ty != InstanceType::Null),
    }
}

fn infer_type(object: &SchemaObject) -> Option<InstanceType> {
    if object
        .object
        .as_ref()
        .is_some_and(|validation| !validation.properties.is_empty())
    {
        return Some(InstanceType::Object);
    }
    if object
        .array
        .as_ref()
        .is_some_and(|validation| validation.items.is_some())
    {
        return Some(InstanceType::Array);
    }
    if object.enum_values.is_some() {
        return Some(InstanceType::String);
    }
    None
}

pub(crate) fn escape_pointer_segment(segment: &str) -> String {
    segment.replace('~', "~0").replace('/', "~1")
}

/// Rejects reference cycles that never pass through an array. Arrays bound
/// the recursion by the length of the data, objects do not.
fn check_reference_cycles(
    root: &SchemaNode,
    definitions: &IndexMap<String, SchemaNode>,
) -> Result<(), SchemaError> {
    let mut edges: HashMap<&str, Vec<&str>> = HashMap::new();
    for (reference, node) in definitions {
        let mut targets = Vec::new();
        collect_direct_refs(node, &mut targets);
        edges.insert(reference.as_str(), targets);
    }

    let mut finished: HashSet<&str> = HashSet::new();
    let mut roots = Vec::new();
    collect_direct_refs(root, &mut roots);
    roots.extend(definitions.keys().map(String::as_str));

    for start in roots {
        let mut trail = Vec::new();
        visit(start, &edges, &mut trail, &mut finished)?;
    }
    Ok(())
}

fn visit<'a>(
    reference: &'a str,
    edges: &HashMap<&'a str, Vec<&'a str>>,
    trail: &mut Vec<&'a str>,
    finished: &mut HashSet<&'a str>,
) -> Result<(), SchemaError> {
    if finished.contains(reference) {
        return Ok(());
    }
    if trail.contains(&reference) {
        return Err(SchemaError::CyclicReference {
            reference: reference.to_string(),
        });
    }
    trail.push(reference);
    if let Some(targets) = edges.get(reference) {
        for target in targets {
            visit(target, edges, trail, finished)?;
        }
    }
    trail.pop();
    finished.insert(reference);
    Ok(())
}

fn collect_direct_refs<'a>(node: &'a SchemaNode, out: &mut Vec<&'a str>) {
    match &node.kind {
        NodeKind::Ref(reference) => out.push(reference),
        NodeKind::Object(object) => {
            for child in object.properties.values() {
                collect_direct_refs(child, out);
            }
        }
        NodeKind::Array(_)
        | NodeKind::String(_)
        | NodeKind::Number(_)
        | NodeKind::Boolean(_) => {}
    }
}

//! Schema-driven JSON transformer.
//!
//! Validates an arbitrary `serde_json::Value` against a declarative schema
//! and mirrors it into either the typed (model-cased) or the wire
//! (snake_case) representation. One recursive algorithm serves both
//! directions; a [`Direction`] parameter selects which side's key to emit.
//!
//! Validation is fail-fast: the first mismatch aborts with a
//! [`MalformedInput`] error naming the key path, the expected shape, and the
//! actual value.

use std::collections::HashMap;
use std::fmt;

use serde_json::{Map, Value};

use crate::error::MalformedInput;

/// Which representation the transformer should produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Wire JSON in, typed (model-cased) value out.
    IntoTyped,

    /// Typed value in, wire JSON out.
    IntoJson,
}

/// A declarative description of an expected JSON shape.
///
/// Schema nodes form a closed set; [`Schema::Ref`] points into a
/// [`SchemaSet`] so sub-objects can be named and shared.
#[derive(Debug, Clone)]
pub enum Schema {
    /// Value must be a JSON string.
    String,

    /// Value must be a JSON number.
    Number,

    /// Value must be a JSON boolean.
    Boolean,

    /// Value must be a string equal to one of the listed literals.
    Enum(Vec<&'static str>),

    /// Value must be an array; every element validates against the inner
    /// schema.
    Array(Box<Schema>),

    /// Value must validate against at least one branch, tried in order.
    /// The first success wins.
    Union(Vec<Schema>),

    /// Value must be an object. Declared properties are validated and
    /// renamed per direction; undeclared ones go through the catch-all.
    Object(ObjectSchema),

    /// Matches only a missing property; combined with [`Schema::Union`]
    /// this expresses optional properties.
    Absent,

    /// Accepts any present value verbatim (the default catch-all).
    Any,

    /// Indirection to a named node in the enclosing [`SchemaSet`].
    Ref(&'static str),
}

/// A declared object property: its key on each side plus its schema.
#[derive(Debug, Clone)]
pub struct Field {
    /// Key in the wire (snake_case) representation.
    pub wire: &'static str,

    /// Key in the typed (model-cased) representation.
    pub model: &'static str,

    /// Schema the property's value must satisfy.
    pub schema: Schema,
}

impl Field {
    pub fn new(wire: &'static str, model: &'static str, schema: Schema) -> Self {
        Self { wire, model, schema }
    }
}

/// Object node: declared properties plus a catch-all for the rest.
///
/// Key-remap tables are precomputed at construction and reused on every
/// transform.
#[derive(Debug, Clone)]
pub struct ObjectSchema {
    fields: Vec<Field>,
    rest: Box<Schema>,
    by_wire: HashMap<&'static str, usize>,
    by_model: HashMap<&'static str, usize>,
}

impl ObjectSchema {
    /// Build an object schema with the default catch-all ([`Schema::Any`]).
    pub fn new(fields: Vec<Field>) -> Self {
        Self::with_rest(fields, Schema::Any)
    }

    /// Build an object schema with an explicit catch-all for undeclared
    /// properties.
    pub fn with_rest(fields: Vec<Field>, rest: Schema) -> Self {
        let by_wire = fields.iter().enumerate().map(|(i, f)| (f.wire, i)).collect();
        let by_model = fields.iter().enumerate().map(|(i, f)| (f.model, i)).collect();
        Self {
            fields,
            rest: Box::new(rest),
            by_wire,
            by_model,
        }
    }

    fn lookup(&self, dir: Direction) -> &HashMap<&'static str, usize> {
        match dir {
            Direction::IntoTyped => &self.by_wire,
            Direction::IntoJson => &self.by_model,
        }
    }
}

impl Direction {
    /// Key a declared property is read from in this direction.
    fn input_key(self, field: &Field) -> &'static str {
        match self {
            Direction::IntoTyped => field.wire,
            Direction::IntoJson => field.model,
        }
    }

    /// Key a declared property is written to in this direction.
    fn output_key(self, field: &Field) -> &'static str {
        match self {
            Direction::IntoTyped => field.model,
            Direction::IntoJson => field.wire,
        }
    }

    fn reversed(self) -> Self {
        match self {
            Direction::IntoTyped => Direction::IntoJson,
            Direction::IntoJson => Direction::IntoTyped,
        }
    }
}

/// A named collection of schema nodes with a designated root.
///
/// [`Schema::Ref`] nodes resolve against this set, which is what lets the
/// feed schema name its metadata sub-object once and reference it.
#[derive(Debug, Clone)]
pub struct SchemaSet {
    root: &'static str,
    nodes: HashMap<&'static str, Schema>,
}

impl SchemaSet {
    /// Build a set from `(name, node)` pairs; `root` must be one of them.
    pub fn new(root: &'static str, nodes: Vec<(&'static str, Schema)>) -> Self {
        Self {
            root,
            nodes: nodes.into_iter().collect(),
        }
    }

    /// Validate `value` against the root schema and produce the
    /// representation selected by `dir`.
    pub fn transform(&self, value: &Value, dir: Direction) -> Result<Value, MalformedInput> {
        match self.apply(self.node(self.root, "$")?, Some(value), dir, "$")? {
            Some(out) => Ok(out),
            // The root value is always present, so only an `Absent` root
            // schema could land here.
            None => Err(MalformedInput::new("$", "a value", "absent")),
        }
    }

    fn node(&self, name: &'static str, path: &str) -> Result<&Schema, MalformedInput> {
        self.nodes.get(name).ok_or_else(|| {
            MalformedInput::new(path, format!("registered schema `{name}`"), "unregistered reference")
        })
    }

    /// Recursive core. `None` input means the property was missing;
    /// `Ok(None)` output means the property should be omitted.
    fn apply(
        &self,
        schema: &Schema,
        value: Option<&Value>,
        dir: Direction,
        path: &str,
    ) -> Result<Option<Value>, MalformedInput> {
        match schema {
            Schema::Ref(name) => self.apply(self.node(name, path)?, value, dir, path),

            Schema::Absent => match value {
                None => Ok(None),
                Some(v) => Err(mismatch(path, schema, Some(v))),
            },

            Schema::Any => match value {
                Some(v) => Ok(Some(v.clone())),
                None => Err(mismatch(path, schema, None)),
            },

            Schema::String => match value {
                Some(v @ Value::String(_)) => Ok(Some(v.clone())),
                other => Err(mismatch(path, schema, other)),
            },

            Schema::Number => match value {
                Some(v @ Value::Number(_)) => Ok(Some(v.clone())),
                other => Err(mismatch(path, schema, other)),
            },

            Schema::Boolean => match value {
                Some(v @ Value::Bool(_)) => Ok(Some(v.clone())),
                other => Err(mismatch(path, schema, other)),
            },

            Schema::Enum(variants) => match value {
                Some(v @ Value::String(s)) if variants.iter().any(|lit| *lit == s.as_str()) => {
                    Ok(Some(v.clone()))
                }
                other => Err(mismatch(path, schema, other)),
            },

            Schema::Array(elem) => match value {
                Some(Value::Array(items)) => {
                    let mut out = Vec::with_capacity(items.len());
                    for (i, item) in items.iter().enumerate() {
                        let item_path = format!("{path}[{i}]");
                        if let Some(v) = self.apply(elem, Some(item), dir, &item_path)? {
                            out.push(v);
                        }
                    }
                    Ok(Some(Value::Array(out)))
                }
                other => Err(mismatch(path, schema, other)),
            },

            Schema::Union(branches) => {
                for branch in branches {
                    if let Ok(out) = self.apply(branch, value, dir, path) {
                        return Ok(out);
                    }
                }
                Err(mismatch(path, schema, value))
            }

            Schema::Object(obj) => match value {
                Some(Value::Object(map)) => {
                    let mut out = Map::with_capacity(map.len());

                    // Declared properties: absent ones are still processed,
                    // so an `Absent` union branch can accept them.
                    for field in &obj.fields {
                        let key = dir.input_key(field);
                        let field_path = format!("{path}.{key}");
                        let found = map.get(key);
                        if let Some(v) = self.apply(&field.schema, found, dir, &field_path)? {
                            out.insert(dir.output_key(field).to_string(), v);
                        }
                    }

                    // Everything else runs through the catch-all and keeps
                    // its key, so round-trips preserve unknown properties.
                    let declared = obj.lookup(dir);
                    let declared_out = obj.lookup(dir.reversed());
                    for (key, v) in map {
                        if declared.contains_key(key.as_str()) {
                            continue;
                        }
                        let field_path = format!("{path}.{key}");
                        // An undeclared key that matches a declared
                        // output-side key would overwrite the remapped
                        // value, so it is rejected rather than passed
                        // through.
                        if declared_out.contains_key(key.as_str()) {
                            return Err(MalformedInput::new(
                                field_path,
                                format!("no property named `{key}` (it is a declared output key)"),
                                v.to_string(),
                            ));
                        }
                        if let Some(v) = self.apply(&obj.rest, Some(v), dir, &field_path)? {
                            out.insert(key.clone(), v);
                        }
                    }

                    Ok(Some(Value::Object(out)))
                }
                other => Err(mismatch(path, schema, other)),
            },
        }
    }
}

fn mismatch(path: &str, schema: &Schema, actual: Option<&Value>) -> MalformedInput {
    let actual = match actual {
        Some(v) => v.to_string(),
        None => "absent".to_string(),
    };
    MalformedInput::new(path, schema.to_string(), actual)
}

impl fmt::Display for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Schema::String => write!(f, "string"),
            Schema::Number => write!(f, "number"),
            Schema::Boolean => write!(f, "boolean"),
            Schema::Absent => write!(f, "absent"),
            Schema::Any => write!(f, "any value"),
            Schema::Ref(name) => write!(f, "{name}"),
            Schema::Object(_) => write!(f, "object"),
            Schema::Array(elem) => write!(f, "array of {elem}"),
            Schema::Enum(variants) => {
                write!(f, "one of ")?;
                for (i, v) in variants.iter().enumerate() {
                    if i > 0 {
                        write!(f, " | ")?;
                    }
                    write!(f, "\"{v}\"")?;
                }
                Ok(())
            }
            Schema::Union(branches) => {
                for (i, b) in branches.iter().enumerate() {
                    if i > 0 {
                        write!(f, " | ")?;
                    }
                    write!(f, "{b}")?;
                }
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn single_node(schema: Schema) -> SchemaSet {
        SchemaSet::new("root", vec![("root", schema)])
    }

    fn sample_object() -> SchemaSet {
        SchemaSet::new(
            "root",
            vec![(
                "root",
                Schema::Object(ObjectSchema::new(vec![
                    Field::new("ema_price", "emaPrice", Schema::String),
                    Field::new("expo", "expo", Schema::Number),
                    Field::new(
                        "metadata",
                        "metadata",
                        Schema::Union(vec![Schema::Ref("meta"), Schema::Absent]),
                    ),
                ])),
            ), (
                "meta",
                Schema::Object(ObjectSchema::new(vec![Field::new(
                    "sequence_number",
                    "sequenceNumber",
                    Schema::Number,
                )])),
            )],
        )
    }

    #[test]
    fn test_primitive_type_mismatch() {
        let set = single_node(Schema::Number);
        let err = set.transform(&json!("not a number"), Direction::IntoTyped).unwrap_err();
        assert_eq!(err.path, "$");
        assert_eq!(err.expected, "number");
        assert_eq!(err.actual, "\"not a number\"");
    }

    #[test]
    fn test_enum_accepts_only_listed_literals() {
        let set = single_node(Schema::Enum(vec!["Trading", "Halted"]));
        assert!(set.transform(&json!("Trading"), Direction::IntoTyped).is_ok());

        let err = set.transform(&json!("Bogus"), Direction::IntoTyped).unwrap_err();
        assert_eq!(err.expected, "one of \"Trading\" | \"Halted\"");
    }

    #[test]
    fn test_array_error_names_element_index() {
        let set = single_node(Schema::Array(Box::new(Schema::String)));
        let err = set
            .transform(&json!(["ok", "fine", 3]), Direction::IntoTyped)
            .unwrap_err();
        assert_eq!(err.path, "$[2]");
    }

    #[test]
    fn test_union_first_success_wins() {
        let set = single_node(Schema::Union(vec![Schema::String, Schema::Number]));
        assert_eq!(
            set.transform(&json!(5), Direction::IntoTyped).unwrap(),
            json!(5)
        );

        let err = set.transform(&json!(true), Direction::IntoTyped).unwrap_err();
        assert_eq!(err.expected, "string | number");
    }

    #[test]
    fn test_object_remaps_keys_per_direction() {
        let set = sample_object();
        let wire = json!({"ema_price": "3", "expo": -8});

        let typed = set.transform(&wire, Direction::IntoTyped).unwrap();
        assert_eq!(typed, json!({"emaPrice": "3", "expo": -8}));

        let back = set.transform(&typed, Direction::IntoJson).unwrap();
        assert_eq!(back, wire);
    }

    #[test]
    fn test_optional_property_is_omitted_not_nulled() {
        let set = sample_object();
        let typed = set
            .transform(&json!({"ema_price": "3", "expo": 1}), Direction::IntoTyped)
            .unwrap();
        assert!(typed.get("metadata").is_none());
    }

    #[test]
    fn test_nested_ref_validates_and_remaps() {
        let set = sample_object();
        let wire = json!({"ema_price": "3", "expo": 1, "metadata": {"sequence_number": 7}});

        let typed = set.transform(&wire, Direction::IntoTyped).unwrap();
        assert_eq!(typed["metadata"], json!({"sequenceNumber": 7}));

        // A failed union reports the full union at the union's own path.
        let err = set
            .transform(
                &json!({"ema_price": "3", "expo": 1, "metadata": {"sequence_number": "7"}}),
                Direction::IntoTyped,
            )
            .unwrap_err();
        assert_eq!(err.path, "$.metadata");
        assert_eq!(err.expected, "meta | absent");
    }

    #[test]
    fn test_required_nested_object_error_names_inner_path() {
        // Outside a union, a nested mismatch keeps its full path.
        let set = SchemaSet::new(
            "root",
            vec![(
                "root",
                Schema::Object(ObjectSchema::new(vec![Field::new(
                    "metadata",
                    "metadata",
                    Schema::Ref("meta"),
                )])),
            ), (
                "meta",
                Schema::Object(ObjectSchema::new(vec![Field::new(
                    "sequence_number",
                    "sequenceNumber",
                    Schema::Number,
                )])),
            )],
        );

        let err = set
            .transform(
                &json!({"metadata": {"sequence_number": "7"}}),
                Direction::IntoTyped,
            )
            .unwrap_err();
        assert_eq!(err.path, "$.metadata.sequence_number");
        assert_eq!(err.expected, "number");
    }

    #[test]
    fn test_unknown_properties_pass_through_unchanged() {
        let set = sample_object();
        let wire = json!({"ema_price": "3", "expo": 1, "extra_field": [1, null, "x"]});

        let typed = set.transform(&wire, Direction::IntoTyped).unwrap();
        assert_eq!(typed["extra_field"], json!([1, null, "x"]));

        let back = set.transform(&typed, Direction::IntoJson).unwrap();
        assert_eq!(back, wire);
    }

    #[test]
    fn test_undeclared_key_colliding_with_output_key_is_rejected() {
        let set = sample_object();

        // Wire input carrying the typed-side name alongside the wire name
        // would clobber the remapped value; it must fail instead.
        let err = set
            .transform(
                &json!({"ema_price": "3", "expo": 1, "emaPrice": "9"}),
                Direction::IntoTyped,
            )
            .unwrap_err();
        assert_eq!(err.path, "$.emaPrice");

        // Same guard in the other direction.
        let err = set
            .transform(
                &json!({"emaPrice": "3", "expo": 1, "ema_price": "9"}),
                Direction::IntoJson,
            )
            .unwrap_err();
        assert_eq!(err.path, "$.ema_price");
    }

    #[test]
    fn test_missing_required_property_fails() {
        let set = sample_object();
        let err = set
            .transform(&json!({"expo": 1}), Direction::IntoTyped)
            .unwrap_err();
        assert_eq!(err.path, "$.ema_price");
        assert_eq!(err.actual, "absent");
    }
}

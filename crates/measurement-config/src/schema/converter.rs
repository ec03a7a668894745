//! Converts declared field types to JSON Schema.

use serde_json::{json, Map, Value as Json};

use super::generator::{SchemaError, SchemaGenerator};
use super::types::{ModelSchema, TypeSchema};

struct Converter<'g, G: ?Sized> {
    generator: &'g G,
    defs: Map<String, Json>,
}

impl<G: SchemaGenerator + ?Sized> Converter<'_, G> {
    fn model_to_json_schema(&mut self, model: &ModelSchema) -> Result<Json, SchemaError> {
        let mut properties = Map::new();
        let mut required = Vec::new();
        for field in &model.fields {
            let mut schema = self.type_to_json_schema(&field.schema)?;
            // A bare `$ref` takes its title from the referenced definition.
            if let Json::Object(m) = &mut schema {
                if !m.contains_key("$ref") {
                    m.insert("title".into(), json!(title_case(field.name)));
                }
            }
            properties.insert(field.name.to_string(), schema);
            if field.required {
                required.push(field.name);
            }
        }
        let mut m = Map::new();
        m.insert("title".into(), json!(model.name));
        m.insert("type".into(), json!("object"));
        m.insert("properties".into(), Json::Object(properties));
        if !required.is_empty() {
            m.insert("required".into(), json!(required));
        }
        Ok(Json::Object(m))
    }

    fn ref_to_model(&mut self, model: &ModelSchema) -> Result<Json, SchemaError> {
        if !self.defs.contains_key(model.name) {
            // Reserve the slot first so a self-reference terminates.
            self.defs.insert(model.name.to_string(), Json::Null);
            let schema = self.model_to_json_schema(model)?;
            self.defs.insert(model.name.to_string(), schema);
        }
        Ok(json!({"$ref": format!("#/$defs/{}", model.name)}))
    }

    fn type_to_json_schema(&mut self, type_: &TypeSchema) -> Result<Json, SchemaError> {
        Ok(match type_ {
            TypeSchema::Any => json!({}),
            TypeSchema::Bool => json!({"type": "boolean"}),
            TypeSchema::Integer => json!({"type": "integer"}),
            TypeSchema::Number => json!({"type": "number"}),
            TypeSchema::String => json!({"type": "string"}),
            TypeSchema::Enum(values) => json!({"enum": values, "type": "string"}),
            TypeSchema::Array(items) => {
                json!({"type": "array", "items": self.type_to_json_schema(items)?})
            }
            TypeSchema::Map(values) => json!({
                "type": "object",
                "additionalProperties": self.type_to_json_schema(values)?,
            }),
            TypeSchema::Optional(inner) => json!({
                "anyOf": [self.type_to_json_schema(inner)?, {"type": "null"}],
            }),
            TypeSchema::Union(types) => {
                let any_of = types
                    .iter()
                    .map(|t| self.type_to_json_schema(t))
                    .collect::<Result<Vec<_>, _>>()?;
                json!({ "anyOf": any_of })
            }
            TypeSchema::Model(model) => self.ref_to_model(model)?,
            TypeSchema::Opaque { type_name, rich } => {
                self.generator.handle_invalid(type_name, *rich)?
            }
        })
    }
}

fn title_case(name: &str) -> String {
    name.split('_')
        .filter(|w| !w.is_empty())
        .map(|w| {
            let mut chars = w.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Builds a JSON Schema for `type_`, asking `generator` about opaque types.
///
/// A top-level record is described inline; nested records are collected
/// under `$defs` and referenced with `$ref`.
pub fn json_schema_with<G: SchemaGenerator + ?Sized>(
    generator: &G,
    type_: &TypeSchema,
) -> Result<Json, SchemaError> {
    let mut converter = Converter {
        generator,
        defs: Map::new(),
    };
    let mut schema = match type_ {
        TypeSchema::Model(model) => converter.model_to_json_schema(model)?,
        other => converter.type_to_json_schema(other)?,
    };
    if !converter.defs.is_empty() {
        if let Json::Object(m) = &mut schema {
            let mut defs: Vec<(String, Json)> = converter.defs.into_iter().collect();
            defs.sort_by(|a, b| a.0.cmp(&b.0));
            m.insert("$defs".into(), Json::Object(defs.into_iter().collect()));
        }
    }
    Ok(schema)
}

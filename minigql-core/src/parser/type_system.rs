//! Type-language documents: `type` definitions and an optional `schema` block.

use apollo_parser::cst;

use super::Source;
use crate::ast::{FieldDefinition, InputValueDefinition, ObjectTypeDefinition, TypeSystemDocument};
use crate::error::GqlResult;

impl Source<'_> {
    pub(super) fn type_system_document(
        &self,
        document: cst::Document,
    ) -> GqlResult<TypeSystemDocument> {
        let mut out = TypeSystemDocument::default();

        for definition in document.definitions() {
            match definition {
                cst::Definition::ObjectTypeDefinition(def) => out.types.push(self.object_type(def)?),
                cst::Definition::SchemaDefinition(def) => {
                    if out.query_type.is_some() {
                        return Err(self.node_error(&def, "Must provide only one schema definition"));
                    }
                    out.query_type = Some(self.schema_definition(def)?);
                }
                other => {
                    return Err(self.node_error(
                        &other,
                        "Only \"type\" and \"schema\" definitions are supported",
                    ));
                }
            }
        }

        Ok(out)
    }

    fn description(&self, description: Option<cst::Description>) -> Option<String> {
        description
            .and_then(|d| d.string_value())
            .map(String::from)
    }

    /// `schema { query: Name }`; returns the query root type name.
    fn schema_definition(&self, def: cst::SchemaDefinition) -> GqlResult<String> {
        self.reject_directives(def.directives())?;

        let mut query_type = None;
        for root in def.root_operation_type_definitions() {
            let operation = self.required(root.operation_type(), &root, "an operation type")?;
            let named = self.required(root.named_type(), &root, "a root type")?;
            let type_name = self.name(named.name(), &named)?;

            if operation.query_token().is_some() {
                query_type = Some(type_name);
            } else {
                return Err(self.node_error(&root, "Only a query root type is supported"));
            }
        }

        query_type.ok_or_else(|| self.node_error(&def, "Schema definition must name a query type"))
    }

    fn object_type(&self, def: cst::ObjectTypeDefinition) -> GqlResult<ObjectTypeDefinition> {
        let name_node = self.required(def.name(), &def, "Name")?;
        let location = self.node_location(&name_node);
        let name = name_node.text().to_string();

        if def.implements_interfaces().is_some() {
            return Err(self.node_error(&def, "Interfaces are not supported"));
        }
        self.reject_directives(def.directives())?;

        let fields = match def.fields_definition() {
            Some(fields) => fields
                .field_definitions()
                .map(|field| self.field_definition(field))
                .collect::<GqlResult<Vec<_>>>()?,
            None => Vec::new(),
        };

        if fields.is_empty() {
            return Err(self.node_error(
                &def,
                format!("Type \"{}\" must define one or more fields", name),
            ));
        }

        Ok(ObjectTypeDefinition {
            name,
            description: self.description(def.description()),
            fields,
            location,
        })
    }

    fn field_definition(&self, def: cst::FieldDefinition) -> GqlResult<FieldDefinition> {
        let name_node = self.required(def.name(), &def, "Name")?;
        let location = self.node_location(&name_node);
        self.reject_directives(def.directives())?;

        let arguments = match def.arguments_definition() {
            Some(args) => args
                .input_value_definitions()
                .map(|arg| self.input_value_definition(arg))
                .collect::<GqlResult<Vec<_>>>()?,
            None => Vec::new(),
        };

        let ty = self.type_ref(self.required(def.ty(), &def, "a type")?)?;

        Ok(FieldDefinition {
            name: name_node.text().to_string(),
            description: self.description(def.description()),
            arguments,
            ty,
            location,
        })
    }

    // Argument descriptions are accepted and dropped
    fn input_value_definition(
        &self,
        def: cst::InputValueDefinition,
    ) -> GqlResult<InputValueDefinition> {
        self.reject_directives(def.directives())?;
        let name = self.name(def.name(), &def)?;
        let ty = self.type_ref(self.required(def.ty(), &def, "a type")?)?;

        let default_value = match def.default_value().and_then(|d| d.value()) {
            Some(value) => Some(self.const_value(value)?),
            None => None,
        };

        Ok(InputValueDefinition {
            name,
            ty,
            default_value,
        })
    }
}

//! Query documents: operations, variable definitions and selection sets.

use apollo_parser::cst;

use super::Source;
use crate::ast::{Document, Field, OperationDefinition, OperationType, VariableDefinition};
use crate::error::GqlResult;

impl Source<'_> {
    pub(super) fn document(&self, document: cst::Document) -> GqlResult<Document> {
        let mut operations = Vec::new();

        for definition in document.definitions() {
            match definition {
                cst::Definition::OperationDefinition(op) => operations.push(self.operation(op)?),
                cst::Definition::FragmentDefinition(def) => {
                    return Err(self.node_error(&def, "Fragments are not supported"));
                }
                other => {
                    return Err(self.node_error(
                        &other,
                        "Type system definitions are not allowed in a query document",
                    ));
                }
            }
        }

        if operations.is_empty() {
            return Err(self.end_of_input());
        }

        Ok(Document { operations })
    }

    fn operation(&self, op: cst::OperationDefinition) -> GqlResult<OperationDefinition> {
        let location = self.node_location(&op);
        self.reject_directives(op.directives())?;

        // Shorthand `{ ... }` is an anonymous query
        let operation_type = match op.operation_type() {
            Some(ty) if ty.mutation_token().is_some() => OperationType::Mutation,
            Some(ty) if ty.subscription_token().is_some() => OperationType::Subscription,
            _ => OperationType::Query,
        };

        let name = match op.name() {
            Some(name) => Some(name.text().to_string()),
            None => None,
        };

        let variable_definitions = match op.variable_definitions() {
            Some(defs) => defs
                .variable_definitions()
                .map(|def| self.variable_definition(def))
                .collect::<GqlResult<Vec<_>>>()?,
            None => Vec::new(),
        };

        let selection_set = self.required(op.selection_set(), &op, "a selection set")?;

        Ok(OperationDefinition {
            operation_type,
            name,
            variable_definitions,
            selection_set: self.selection_set(selection_set)?,
            location,
        })
    }

    fn variable_definition(&self, def: cst::VariableDefinition) -> GqlResult<VariableDefinition> {
        self.reject_directives(def.directives())?;
        let variable = self.required(def.variable(), &def, "a variable")?;
        let name = self.name(variable.name(), &variable)?;
        let ty = self.type_ref(self.required(def.ty(), &def, "a type")?)?;

        let default_value = match def.default_value().and_then(|d| d.value()) {
            Some(value) => Some(self.const_value(value)?),
            None => None,
        };

        Ok(VariableDefinition {
            name,
            ty,
            default_value,
        })
    }

    fn selection_set(&self, set: cst::SelectionSet) -> GqlResult<Vec<Field>> {
        let mut fields = Vec::new();

        for selection in set.selections() {
            match selection {
                cst::Selection::Field(field) => fields.push(self.field(field)?),
                cst::Selection::FragmentSpread(spread) => {
                    return Err(self.node_error(&spread, "Fragments are not supported"));
                }
                cst::Selection::InlineFragment(fragment) => {
                    return Err(self.node_error(&fragment, "Fragments are not supported"));
                }
            }
        }

        if fields.is_empty() {
            return Err(self.node_error(&set, "Expected Name, found \"}\""));
        }

        Ok(fields)
    }

    fn field(&self, field: cst::Field) -> GqlResult<Field> {
        let location = self.node_location(&field);
        self.reject_directives(field.directives())?;

        let alias = match field.alias() {
            Some(alias) => Some(self.name(alias.name(), &alias)?),
            None => None,
        };
        let name = self.name(field.name(), &field)?;

        let arguments = match field.arguments() {
            Some(args) => args
                .arguments()
                .map(|arg| {
                    let name = self.name(arg.name(), &arg)?;
                    let value = self.required(arg.value(), &arg, "a value")?;
                    Ok((name, self.value(value)?))
                })
                .collect::<GqlResult<Vec<_>>>()?,
            None => Vec::new(),
        };

        let selection_set = match field.selection_set() {
            Some(set) => Some(self.selection_set(set)?),
            None => None,
        };

        Ok(Field {
            alias,
            name,
            arguments,
            selection_set,
            location,
        })
    }
}

//! Host types to schemas.
//!
//! Named types (aliases, interfaces, classes, generic instantiations, type
//! parameters) go through the definitions table and come back as references,
//! so a recursive type is expanded once. Anonymous structural types are
//! converted in place under the `types_handled` guard; a repeat means the
//! type contains itself without a name and yields the recursion sentinel.

use super::SchemaEvaluator;
use crate::algebra;
use crate::context::{DefinitionCell, SchemaContext};
use crate::schema::{
    DefinitionKey, FunctionParameter, IndexKey, SchemaFlags, SchemaKind, SchemaNode, TemplatePart,
};
use indexmap::IndexMap;
use tracing::trace;
use tshape_host::{
    ElementFlags, IntrinsicKind, ObjectShape, SignatureId, SignatureKind, SymbolFlags, SymbolId,
    TemplateSpan, TypeData, TypeId,
};
use tshape_resolver::classify::{array_element_type, is_prototype_symbol, type_identity_symbol};
use tshape_resolver::{RecursionResult, ShapeError};

/// Nominal identity of a named type.
struct NamedType {
    name: String,
    symbol: Option<SymbolId>,
}

impl SchemaEvaluator<'_> {
    /// Schema of a host type.
    pub fn evaluate_type(&self, ty: TypeId, ctx: &SchemaContext) -> Result<SchemaNode, ShapeError> {
        if let Some(cached) = ctx.cached_type(ty) {
            return Ok(cached);
        }

        if let Some(named) = self.named_type(ty) {
            let reference = self.named_type_reference(ty, named, ctx)?;
            ctx.cache_type(ty, &reference);
            return Ok(reference);
        }

        if !self.is_aggregate(ty) {
            let schema = self.structural_type(ty, ctx)?;
            ctx.cache_type(ty, &schema);
            return Ok(schema);
        }

        if ctx.is_exhausted() {
            trace!(parent: ctx.span(), %ty, "anonymous type past the depth budget");
            return Ok(SchemaNode::recursion_limit());
        }
        match ctx.enter_type(ty) {
            RecursionResult::Entered => {}
            RecursionResult::Cycle | RecursionResult::DepthExceeded => {
                trace!(parent: ctx.span(), %ty, "anonymous type contains itself");
                return Ok(SchemaNode::recursion_limit());
            }
        }
        let result = self.structural_type(ty, &ctx.descend(&ty.to_string()));
        ctx.leave_type(ty);

        let schema = result?;
        ctx.cache_type(ty, &schema);
        Ok(schema)
    }

    /// Register (or reuse) the definition of a named type and return the
    /// reference pointing at it.
    fn named_type_reference(
        &self,
        ty: TypeId,
        named: NamedType,
        ctx: &SchemaContext,
    ) -> Result<SchemaNode, ShapeError> {
        let key = DefinitionKey::Type(ty);
        let type_arguments = self.type_arguments_of(ty, ctx)?;
        let reference =
            SchemaNode::reference(named.name.as_str(), key, type_arguments).with_symbol(named.symbol);

        if ctx.has_definition(key) {
            return Ok(reference);
        }
        if ctx.is_exhausted() {
            trace!(parent: ctx.span(), %key, name = %named.name, "deferring definition");
            ctx.set_definition(key, DefinitionCell::NotStarted { ty });
            return Ok(reference);
        }

        ctx.set_definition(key, DefinitionCell::Building);
        match self.structural_type(ty, &ctx.descend(&named.name)) {
            Ok(body) => {
                ctx.set_definition(key, DefinitionCell::Done(body));
                Ok(reference)
            }
            Err(err) => {
                ctx.set_definition(key, DefinitionCell::NotStarted { ty });
                Err(err)
            }
        }
    }

    fn named_type(&self, ty: TypeId) -> Option<NamedType> {
        let data = self.host.type_data(ty)?;
        match data {
            TypeData::Intrinsic(_)
            | TypeData::Literal(_)
            | TypeData::UniqueSymbol(_)
            | TypeData::Array(_)
            | TypeData::Error => return None,
            TypeData::TypeParameter { name, .. } => {
                return Some(NamedType {
                    name: name.clone(),
                    symbol: self.host.type_symbol(ty),
                });
            }
            TypeData::Object(shape) if is_function_shape(shape) => return None,
            TypeData::Reference { .. } if array_element_type(self.host, ty).is_some() => {
                return None;
            }
            _ => {}
        }
        let symbol = type_identity_symbol(self.host, ty)?;
        Some(NamedType {
            name: self.host.symbol_name(symbol).to_string(),
            symbol: Some(symbol),
        })
    }

    /// Types whose conversion descends into member types.
    fn is_aggregate(&self, ty: TypeId) -> bool {
        !matches!(
            self.host.type_data(ty),
            None | Some(
                TypeData::Intrinsic(_)
                    | TypeData::Literal(_)
                    | TypeData::UniqueSymbol(_)
                    | TypeData::Error
            )
        )
    }

    fn type_arguments_of(&self, ty: TypeId, ctx: &SchemaContext) -> Result<Vec<SchemaNode>, ShapeError> {
        let alias_arguments = self.host.alias_type_arguments(ty);
        let arguments: Vec<TypeId> = if !alias_arguments.is_empty() {
            alias_arguments.to_vec()
        } else {
            match self.host.type_data(ty) {
                Some(TypeData::Reference { type_arguments, .. }) => type_arguments.clone(),
                _ => Vec::new(),
            }
        };
        if arguments.is_empty() {
            return Ok(Vec::new());
        }
        let ctx = ctx.descend("type arguments");
        arguments
            .into_iter()
            .map(|argument| self.evaluate_type(argument, &ctx))
            .collect()
    }

    /// Structural schema of a type, never a reference to the type itself.
    pub(crate) fn structural_type(
        &self,
        ty: TypeId,
        ctx: &SchemaContext,
    ) -> Result<SchemaNode, ShapeError> {
        let Some(data) = self.host.type_data(ty) else {
            return Ok(SchemaNode::error(format!("no structure for {ty}")));
        };
        let schema = match data {
            TypeData::Intrinsic(kind) => SchemaNode::primitive(*kind),
            TypeData::Literal(value) => SchemaNode::literal(value.clone()),
            TypeData::UniqueSymbol(_) => SchemaNode::primitive(IntrinsicKind::Symbol),
            TypeData::Union(members) => algebra::union(self.evaluate_types(members, ctx)?),
            TypeData::Intersection(members) => {
                let mut items = Vec::with_capacity(members.len());
                for &member in members {
                    items.push(self.intersection_member(member, ctx)?);
                }
                algebra::intersection(items)
            }
            TypeData::Object(shape) => self.object_type(shape, ctx)?,
            TypeData::Array(element) => SchemaNode::array(self.evaluate_type(*element, ctx)?),
            TypeData::Tuple(elements) => {
                let mut items = Vec::with_capacity(elements.len());
                let mut element_flags = Vec::with_capacity(elements.len());
                for element in elements {
                    let mut item = self.evaluate_type(element.type_id, ctx)?;
                    if element.flags.contains(ElementFlags::OPTIONAL) {
                        item = item.with_flags(SchemaFlags::OPTIONAL);
                    }
                    if element.flags.intersects(ElementFlags::REST | ElementFlags::VARIADIC) {
                        item = item.with_flags(SchemaFlags::REST);
                    }
                    items.push(item);
                    element_flags.push(element.flags);
                }
                SchemaNode::new(SchemaKind::Tuple {
                    items,
                    element_flags,
                })
            }
            TypeData::Reference { target, .. } => {
                if let Some(element) = array_element_type(self.host, ty) {
                    SchemaNode::array(self.evaluate_type(element, ctx)?)
                } else if let Some(resolved) = self.resolved(ty) {
                    self.structural_type(resolved, ctx)?
                } else {
                    self.structural_type(*target, ctx)?
                }
            }
            TypeData::TypeParameter { constraint, .. } => match constraint {
                Some(constraint) => self.evaluate_type(*constraint, ctx)?,
                None => SchemaNode::unknown(),
            },
            TypeData::Index(target) => match self.resolved(ty) {
                Some(resolved) => self.evaluate_type(resolved, ctx)?,
                None => SchemaNode::new(SchemaKind::Index {
                    target: Box::new(self.evaluate_type(*target, ctx)?),
                }),
            },
            TypeData::IndexAccess { object, index } => match self.resolved(ty) {
                Some(resolved) => self.evaluate_type(resolved, ctx)?,
                None => algebra::index_access(
                    self.evaluate_type(*object, ctx)?,
                    self.evaluate_type(*index, ctx)?,
                ),
            },
            TypeData::Conditional { .. } => match self.resolved(ty) {
                Some(resolved) => self.evaluate_type(resolved, ctx)?,
                None => SchemaNode::error("unresolved conditional type"),
            },
            TypeData::Mapped {
                constraint,
                template,
            } => match self.resolved(ty) {
                Some(resolved) => self.evaluate_type(resolved, ctx)?,
                None => SchemaNode::new(SchemaKind::Object {
                    properties: IndexMap::new(),
                    abstract_index_keys: vec![IndexKey {
                        key: self.evaluate_type(*constraint, ctx)?,
                        value: self.evaluate_type(*template, ctx)?,
                    }],
                }),
            },
            TypeData::TemplateLiteral(spans) => {
                let mut parts = Vec::with_capacity(spans.len());
                for span in spans {
                    parts.push(match span {
                        TemplateSpan::Text(text) => TemplatePart::Text(text.clone()),
                        TemplateSpan::Type(ty) => TemplatePart::Schema(self.evaluate_type(*ty, ctx)?),
                    });
                }
                algebra::fold_template(parts, ctx.options().template_expansion_limit)
            }
            TypeData::Error => SchemaNode::error("unresolvable type"),
        };
        Ok(schema)
    }

    fn evaluate_types(&self, types: &[TypeId], ctx: &SchemaContext) -> Result<Vec<SchemaNode>, ShapeError> {
        types.iter().map(|&ty| self.evaluate_type(ty, ctx)).collect()
    }

    /// A member of an intersection. Named object types are expanded in place
    /// so their properties merge with the other members; a type whose
    /// definition is being built further up stays a reference.
    fn intersection_member(
        &self,
        ty: TypeId,
        ctx: &SchemaContext,
    ) -> Result<SchemaNode, ShapeError> {
        let expand = self.named_type(ty).is_some()
            && self.is_object_like(ty)
            && !ctx.is_exhausted()
            && !ctx.is_building(DefinitionKey::Type(ty));
        if !expand {
            return self.evaluate_type(ty, ctx);
        }
        trace!(parent: ctx.span(), %ty, "expanding named intersection member");
        self.structural_type(ty, &ctx.descend(&ty.to_string()))
    }

    fn is_object_like(&self, ty: TypeId) -> bool {
        match self.host.type_data(ty) {
            Some(TypeData::Object(shape)) => !is_function_shape(shape),
            Some(TypeData::Reference { target, .. }) => {
                let next = self.resolved(ty).unwrap_or(*target);
                next != ty
                    && array_element_type(self.host, ty).is_none()
                    && self.is_object_like(next)
            }
            _ => false,
        }
    }

    /// The host's evaluated form of a deferred type, when it differs.
    fn resolved(&self, ty: TypeId) -> Option<TypeId> {
        self.host.resolved_structure(ty).filter(|&resolved| resolved != ty)
    }

    fn object_type(&self, shape: &ObjectShape, ctx: &SchemaContext) -> Result<SchemaNode, ShapeError> {
        if is_function_shape(shape) {
            let signatures = if shape.call_signatures.is_empty() {
                &shape.construct_signatures
            } else {
                &shape.call_signatures
            };
            let mut overloads = Vec::with_capacity(signatures.len());
            for &signature in signatures {
                overloads.push(self.signature_schema(signature, ctx)?);
            }
            return Ok(algebra::union(overloads));
        }

        let mut properties = IndexMap::new();
        self.collect_properties(&shape.properties, &mut properties, ctx)?;

        let mut abstract_index_keys = Vec::with_capacity(shape.index_signatures.len());
        for signature in &shape.index_signatures {
            let mut value = self.evaluate_type(signature.value_type, ctx)?;
            if signature.readonly {
                value = value.with_flags(SchemaFlags::READONLY);
            }
            abstract_index_keys.push(IndexKey {
                key: self.evaluate_type(signature.key_type, ctx)?,
                value,
            });
        }

        Ok(SchemaNode::new(SchemaKind::Object {
            properties,
            abstract_index_keys,
        }))
    }

    /// Add property schemas to `out`. The `prototype` member of a class
    /// constructor contributes its instance members instead of itself.
    fn collect_properties(
        &self,
        symbols: &[SymbolId],
        out: &mut IndexMap<String, SchemaNode>,
        ctx: &SchemaContext,
    ) -> Result<(), ShapeError> {
        for &property in symbols {
            let Some(info) = self.host.symbol_info(property) else {
                continue;
            };
            let ty = self.host.type_of_symbol_at(property, info.primary_declaration());
            if is_prototype_symbol(self.host, property) {
                let members = self.host.properties_of(ty);
                self.collect_properties(&members, out, ctx)?;
                continue;
            }
            if out.contains_key(info.name.as_str()) {
                continue;
            }
            let mut schema = self.evaluate_type(ty, ctx)?.with_symbol(Some(property));
            if info.has(SymbolFlags::OPTIONAL) {
                schema = schema.with_flags(SchemaFlags::OPTIONAL);
            }
            if info.has(SymbolFlags::READONLY) {
                schema = schema.with_flags(SchemaFlags::READONLY);
            }
            out.insert(info.name.clone(), schema);
        }
        Ok(())
    }

    pub(crate) fn signature_schema(
        &self,
        signature: SignatureId,
        ctx: &SchemaContext,
    ) -> Result<SchemaNode, ShapeError> {
        let Some(info) = self.host.signature_info(signature) else {
            return Ok(SchemaNode::error(format!("no signature {}", signature.0)));
        };
        let last = info.parameters.len().saturating_sub(1);
        let mut parameters = Vec::with_capacity(info.parameters.len());
        for (position, &parameter) in info.parameters.iter().enumerate() {
            let declaration = self
                .host
                .symbol_info(parameter)
                .map(|p| p.primary_declaration())
                .unwrap_or_default();
            let mut schema = self.evaluate_type(self.host.type_of_symbol_at(parameter, declaration), ctx)?;
            if position >= info.min_argument_count {
                schema = schema.with_flags(SchemaFlags::OPTIONAL);
            }
            if info.has_rest && position == last {
                schema = schema.with_flags(SchemaFlags::REST);
            }
            parameters.push(FunctionParameter {
                name: self.host.symbol_name(parameter).to_string(),
                schema,
            });
        }
        Ok(SchemaNode::new(SchemaKind::Function {
            parameters,
            return_type: Box::new(self.evaluate_type(info.return_type, ctx)?),
        }))
    }

    /// Return schema of the first call signature of `ty`, if it has one.
    pub(crate) fn call_return_of_type(
        &self,
        ty: TypeId,
        ctx: &SchemaContext,
    ) -> Result<Option<SchemaNode>, ShapeError> {
        match self.host.signatures_of(ty, SignatureKind::Call).first() {
            Some(&signature) => self
                .evaluate_type(self.host.return_type_of(signature), ctx)
                .map(Some),
            None => Ok(None),
        }
    }
}

/// Objects that are only callable: functions, constructors and overload sets.
fn is_function_shape(shape: &ObjectShape) -> bool {
    shape.properties.is_empty()
        && shape.index_signatures.is_empty()
        && !(shape.call_signatures.is_empty() && shape.construct_signatures.is_empty())
}

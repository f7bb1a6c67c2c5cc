//! Type Printer - convert a host `TypeId` to TypeScript-like syntax.
//!
//! Only used for diagnostics and reference names; the schema evaluator never
//! parses these strings back.

use crate::ids::TypeId;
use crate::query::TypeQuery;
use crate::types::{ElementFlags, IntrinsicKind, LiteralValue, TemplateSpan, TypeData};

/// Printing stops descending past this depth and prints `...`.
const MAX_PRINT_DEPTH: u32 = 8;

pub struct TypePrinter<'a> {
    host: &'a dyn TypeQuery,
}

impl<'a> TypePrinter<'a> {
    pub fn new(host: &'a dyn TypeQuery) -> Self {
        TypePrinter { host }
    }

    pub fn print_type(&self, type_id: TypeId) -> String {
        self.print(type_id, 0)
    }

    fn print(&self, type_id: TypeId, depth: u32) -> String {
        if depth > MAX_PRINT_DEPTH {
            return "...".to_string();
        }
        // Named types print by name, with their alias type arguments.
        if let Some(alias) = self.host.alias_symbol(type_id) {
            let name = self.host.symbol_name(alias).to_string();
            let args = self.host.alias_type_arguments(type_id);
            return self.with_arguments(name, args, depth);
        }
        let Some(data) = self.host.type_data(type_id) else {
            return "any".to_string();
        };
        match data {
            TypeData::Intrinsic(kind) => print_intrinsic(*kind).to_string(),
            TypeData::Literal(literal) => print_literal(literal),
            TypeData::UniqueSymbol(_) => "unique symbol".to_string(),
            TypeData::Union(members) => self.join(members, " | ", depth),
            TypeData::Intersection(members) => self.join(members, " & ", depth),
            TypeData::Object(shape) => {
                if let Some(symbol) = self.host.type_symbol(type_id) {
                    let name = self.host.symbol_name(symbol);
                    if !name.is_empty() && !name.starts_with("__") {
                        return name.to_string();
                    }
                }
                let mut parts = Vec::new();
                for &prop in &shape.properties {
                    let prop_type = self.host.type_of_symbol_at(prop, tshape_ast::NodeIndex::NONE);
                    parts.push(format!(
                        "{}: {}",
                        self.host.symbol_name(prop),
                        self.print(prop_type, depth + 1)
                    ));
                }
                for index in &shape.index_signatures {
                    parts.push(format!(
                        "[key: {}]: {}",
                        self.print(index.key_type, depth + 1),
                        self.print(index.value_type, depth + 1)
                    ));
                }
                if parts.is_empty() {
                    "{}".to_string()
                } else {
                    format!("{{ {} }}", parts.join("; "))
                }
            }
            TypeData::Array(element) => format!("{}[]", self.print(*element, depth + 1)),
            TypeData::Tuple(elements) => {
                let parts: Vec<String> = elements
                    .iter()
                    .map(|element| {
                        let printed = self.print(element.type_id, depth + 1);
                        if element.flags.contains(ElementFlags::REST) {
                            format!("...{printed}[]")
                        } else if element.flags.contains(ElementFlags::OPTIONAL) {
                            format!("{printed}?")
                        } else {
                            printed
                        }
                    })
                    .collect();
                format!("[{}]", parts.join(", "))
            }
            TypeData::Reference {
                target,
                type_arguments,
            } => {
                let name = self.print(*target, depth + 1);
                self.with_arguments(name, type_arguments, depth)
            }
            TypeData::TypeParameter { name, .. } => name.clone(),
            TypeData::Index(target) => format!("keyof {}", self.print(*target, depth + 1)),
            TypeData::IndexAccess { object, index } => format!(
                "{}[{}]",
                self.print(*object, depth + 1),
                self.print(*index, depth + 1)
            ),
            TypeData::Conditional {
                check_type,
                extends_type,
            } => format!(
                "{} extends {} ? ... : ...",
                self.print(*check_type, depth + 1),
                self.print(*extends_type, depth + 1)
            ),
            TypeData::Mapped {
                constraint,
                template,
            } => format!(
                "{{ [K in {}]: {} }}",
                self.print(*constraint, depth + 1),
                self.print(*template, depth + 1)
            ),
            TypeData::TemplateLiteral(spans) => {
                let mut out = String::from("`");
                for span in spans {
                    match span {
                        TemplateSpan::Text(text) => out.push_str(text),
                        TemplateSpan::Type(ty) => {
                            out.push_str("${");
                            out.push_str(&self.print(*ty, depth + 1));
                            out.push('}');
                        }
                    }
                }
                out.push('`');
                out
            }
            TypeData::Error => "any".to_string(),
        }
    }

    fn join(&self, members: &[TypeId], separator: &str, depth: u32) -> String {
        members
            .iter()
            .map(|&member| self.print(member, depth + 1))
            .collect::<Vec<_>>()
            .join(separator)
    }

    fn with_arguments(&self, name: String, args: &[TypeId], depth: u32) -> String {
        if args.is_empty() {
            return name;
        }
        format!("{}<{}>", name, self.join(args, ", ", depth))
    }
}

fn print_intrinsic(kind: IntrinsicKind) -> &'static str {
    match kind {
        IntrinsicKind::Any => "any",
        IntrinsicKind::Unknown => "unknown",
        IntrinsicKind::Never => "never",
        IntrinsicKind::Void => "void",
        IntrinsicKind::Undefined => "undefined",
        IntrinsicKind::Null => "null",
        IntrinsicKind::Boolean => "boolean",
        IntrinsicKind::Number => "number",
        IntrinsicKind::String => "string",
        IntrinsicKind::BigInt => "bigint",
        IntrinsicKind::Symbol => "symbol",
        IntrinsicKind::Object => "object",
    }
}

fn print_literal(literal: &LiteralValue) -> String {
    match literal {
        LiteralValue::String(s) => format!("\"{s}\""),
        LiteralValue::Number(n) => n.0.to_string(),
        LiteralValue::BigInt(b) => format!("{b}n"),
        LiteralValue::Boolean(b) => b.to_string(),
    }
}

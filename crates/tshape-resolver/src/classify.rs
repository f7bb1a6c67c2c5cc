//! Node classification utilities.
//!
//! Pure predicates over the syntax tree and the host type surface, shared by
//! the resolver and the schema evaluator.

use tshape_ast::{NodeArena, NodeData, NodeFlags, NodeIndex, SyntaxKind};
use tshape_host::{ElementFlags, SymbolFlags, SymbolId, TypeData, TypeId, TypeQuery};

/// Bound on alias/transient unwrapping.
const MAX_TARGET_HOPS: usize = 32;

/// True when `node` is the `name` slot of its parent declaration.
pub fn is_declaration_name(arena: &NodeArena, node: NodeIndex) -> bool {
    let parent = arena.parent_of(node);
    parent.is_some() && arena.name_of(parent) == node
}

/// True when `node` is the left side of `=` or a compound assignment.
pub fn is_assignment_target(arena: &NodeArena, node: NodeIndex) -> bool {
    let parent = arena.parent_of(node);
    arena
        .get(parent)
        .and_then(|p| arena.get_binary_expr(p))
        .is_some_and(|bin| bin.operator_token.is_assignment() && bin.left == node)
}

/// True for a class or interface with at least one heritage clause.
pub fn is_inheriting_declaration(arena: &NodeArena, decl: NodeIndex) -> bool {
    arena
        .heritage_clauses_of(decl)
        .is_some_and(|clauses| !clauses.is_empty())
}

/// True when `node` is an array literal element or a call/new argument.
pub fn is_argument_position(arena: &NodeArena, node: NodeIndex) -> bool {
    let Some(parent) = arena.get(arena.parent_of(node)) else {
        return false;
    };
    match &parent.data {
        NodeData::LiteralExpr(lit) if parent.kind == SyntaxKind::ArrayLiteralExpression => {
            lit.elements.position(node).is_some()
        }
        NodeData::Call(call) => call
            .arguments
            .as_ref()
            .is_some_and(|args| args.position(node).is_some()),
        _ => false,
    }
}

/// True when `node` is the default binding of an import clause.
pub fn is_default_import_name(arena: &NodeArena, node: NodeIndex) -> bool {
    let parent = arena.parent_of(node);
    arena.is_kind(parent, SyntaxKind::ImportClause) && arena.name_of(parent) == node
}

/// True for members declared directly in a class, interface or type literal.
pub fn is_member_declaration(kind: SyntaxKind) -> bool {
    matches!(
        kind,
        SyntaxKind::PropertySignature
            | SyntaxKind::PropertyDeclaration
            | SyntaxKind::MethodSignature
            | SyntaxKind::MethodDeclaration
            | SyntaxKind::GetAccessor
            | SyntaxKind::SetAccessor
    )
}

/// Class or interface that declares `member`, if any.
pub fn member_owner(arena: &NodeArena, member: NodeIndex) -> Option<NodeIndex> {
    let parent = arena.parent_of(member);
    let kind = arena.kind(parent)?;
    (kind.is_class_like() || kind == SyntaxKind::InterfaceDeclaration).then_some(parent)
}

pub fn enclosing_class(arena: &NodeArena, node: NodeIndex) -> Option<NodeIndex> {
    arena.find_ancestor(node, |n| n.kind.is_class_like())
}

/// Nearest enclosing function-like node with a body.
pub fn enclosing_function(arena: &NodeArena, node: NodeIndex) -> Option<NodeIndex> {
    arena.find_ancestor(node, |n| {
        n.kind.is_function_like() && matches!(&n.data, NodeData::Function(f) if f.body.is_some())
    })
}

/// `Array` and `ReadonlyArray` from the default library.
pub fn is_array_symbol(host: &dyn TypeQuery, symbol: SymbolId) -> bool {
    matches!(host.symbol_name(symbol), "Array" | "ReadonlyArray")
}

/// Element type of an array type or an `Array<T>` instantiation.
pub fn array_element_type(host: &dyn TypeQuery, ty: TypeId) -> Option<TypeId> {
    match host.type_data(ty)? {
        TypeData::Array(element) => Some(*element),
        TypeData::Reference {
            target,
            type_arguments,
        } => {
            let symbol = host.type_symbol(*target)?;
            if is_array_symbol(host, symbol) {
                type_arguments.first().copied()
            } else {
                None
            }
        }
        _ => None,
    }
}

/// Type of the element at `index` of a tuple or array type. Positions past a
/// trailing rest element take the rest element's type.
pub fn indexed_element_type(host: &dyn TypeQuery, ty: TypeId, index: usize) -> Option<TypeId> {
    match host.type_data(ty)? {
        TypeData::Tuple(elements) => {
            if let Some(element) = elements.get(index) {
                if element.flags.intersects(ElementFlags::REST | ElementFlags::VARIADIC) {
                    return array_element_type(host, element.type_id).or(Some(element.type_id));
                }
                return Some(element.type_id);
            }
            let last = elements.last()?;
            if last.flags.intersects(ElementFlags::REST | ElementFlags::VARIADIC) {
                array_element_type(host, last.type_id).or(Some(last.type_id))
            } else {
                None
            }
        }
        TypeData::Reference { .. } => match array_element_type(host, ty) {
            Some(element) => Some(element),
            None => host
                .resolved_structure(ty)
                .filter(|&resolved| resolved != ty)
                .and_then(|resolved| indexed_element_type(host, resolved, index)),
        },
        _ => array_element_type(host, ty),
    }
}

/// `expr as const` or `<const>expr`.
pub fn is_const_assertion(arena: &NodeArena, assertion: NodeIndex) -> bool {
    let Some(node) = arena.get(assertion) else {
        return false;
    };
    if node.flags.contains(NodeFlags::CONST_ASSERTION) {
        return true;
    }
    let Some(data) = arena.get_type_assertion(node) else {
        return false;
    };
    arena
        .get(data.type_node)
        .and_then(|ty| arena.get_type_ref(ty))
        .is_some_and(|type_ref| arena.name_text(type_ref.type_name) == Some("const"))
}

pub fn is_intrinsic_type(host: &dyn TypeQuery, ty: TypeId) -> bool {
    ty.is_intrinsic() || matches!(host.type_data(ty), Some(TypeData::Intrinsic(_)))
}

/// Unwrap alias and transient indirection down to the declaring symbol.
pub fn unwrap_symbol_target(host: &dyn TypeQuery, symbol: SymbolId) -> SymbolId {
    let mut current = symbol;
    for _ in 0..MAX_TARGET_HOPS {
        let Some(info) = host.symbol_info(current) else {
            break;
        };
        let next = if info.has(SymbolFlags::ALIAS) {
            host.alias_target_of(current)
        } else if info.has(SymbolFlags::TRANSIENT) {
            match info.target {
                Some(target) => target,
                None => break,
            }
        } else {
            break;
        };
        if next == current {
            break;
        }
        current = next;
    }
    current
}

/// The symbol has a declaration the resolver can point at.
pub fn is_trackable(host: &dyn TypeQuery, symbol: SymbolId) -> bool {
    host.symbol_info(symbol)
        .is_some_and(|info| info.primary_declaration().is_some())
}

/// Nominal symbol of a type: its alias first, then its own symbol.
pub fn type_identity_symbol(host: &dyn TypeQuery, ty: TypeId) -> Option<SymbolId> {
    if ty.is_any_like() {
        return None;
    }
    host.alias_symbol(ty).or_else(|| host.type_symbol(ty))
}

/// True for the `prototype` member of a class constructor.
pub fn is_prototype_symbol(host: &dyn TypeQuery, symbol: SymbolId) -> bool {
    host.symbol_info(symbol)
        .is_some_and(|info| info.has(SymbolFlags::PROTOTYPE))
}

#[cfg(test)]
#[path = "../tests/classify_tests.rs"]
mod tests;

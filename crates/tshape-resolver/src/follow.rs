//! Alias and target following.
//!
//! A definition reached through an import, a re-export or a transient symbol
//! is replaced by the declaration of the symbol it stands for. A definition
//! that is already a real declaration gets one more resolution hop, which
//! crosses `const b = a` style indirections; the hop is only taken when it
//! lands on a symbol with a useful type.

use crate::classify::unwrap_symbol_target;
use crate::definition::{LazyType, ResolvedDefinition};
use crate::error::ShapeError;
use crate::resolver::DeclarationResolver;
use tracing::trace;

pub fn follow(
    resolver: &DeclarationResolver<'_>,
    definition: ResolvedDefinition,
) -> Result<ResolvedDefinition, ShapeError> {
    if resolver.options().choose_local {
        return Ok(definition);
    }
    let Some(symbol) = definition.symbol else {
        return Ok(definition);
    };
    let host = resolver.host();

    let target = unwrap_symbol_target(host, symbol);
    if target != symbol {
        let declaration = resolver.primary_declaration(target);
        if declaration.is_none() {
            return Err(ShapeError::MissingDeclaration { symbol: target });
        }
        trace!(
            parent: resolver.span(),
            from = %symbol,
            to = %target,
            "followed alias"
        );
        return Ok(ResolvedDefinition::new(
            Some(target),
            declaration,
            LazyType::of_symbol_at(target, declaration),
        ));
    }

    if definition.declaration.is_none() {
        return Ok(definition);
    }
    let next = resolver
        .resolve_inner(definition.declaration)?
        .and_then(|resolution| resolution.into_definition());
    match next {
        Some(next) if next.symbol.is_some() && !next.type_id(host).is_any_like() => {
            if !next.same_target(&definition) {
                trace!(
                    parent: resolver.span(),
                    from = definition.declaration.0,
                    to = next.declaration.0,
                    "followed declaration"
                );
            }
            Ok(next)
        }
        _ => Ok(definition),
    }
}

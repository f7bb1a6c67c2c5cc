//! Schema algebra: union and intersection normalization, template literal
//! folding and constant folding of operators.
//!
//! These functions operate purely on `SchemaNode`s and keep no AST or host
//! dependencies. Anything they cannot decide statically is kept as an open
//! schema (`BinaryExpression`, `TemplateLiteral`, `IndexAccess`) so a later
//! parameter substitution can fold it again.

use crate::schema::{SchemaFlags, SchemaKind, SchemaNode, TemplatePart};
use indexmap::IndexMap;
use tshape_ast::TokenKind;
use tshape_host::{IntrinsicKind, LiteralValue};

/// Maximum number of results produced by distributing an operator over
/// literal unions.
const DISTRIBUTION_LIMIT: usize = 64;

// =============================================================================
// Unions
// =============================================================================

/// Normalized union of `items`.
///
/// - nested unions are flattened and `never` members dropped
/// - `any` dominates, then a plain `unknown`
/// - duplicates are removed keeping first-encounter order
/// - a primitive absorbs its own literals (`"a" | string` is `string`)
/// - `true | false` collapses to `boolean`
///
/// Literal members are never widened on their own, so `1 | 2 | 3` stays a
/// union of three literals.
pub fn union(items: impl IntoIterator<Item = SchemaNode>) -> SchemaNode {
    let mut flat = Vec::new();
    for item in items {
        flatten_union(item, &mut flat);
    }

    if flat.iter().any(|item| item.is_primitive(IntrinsicKind::Any)) {
        return SchemaNode::primitive(IntrinsicKind::Any);
    }
    if flat.iter().any(is_plain_unknown) {
        return SchemaNode::unknown();
    }

    let widened: Vec<IntrinsicKind> = flat
        .iter()
        .filter_map(|item| match &item.kind {
            SchemaKind::Primitive { primitive } if !item.is_unbound() => Some(*primitive),
            _ => None,
        })
        .collect();

    let mut out: Vec<SchemaNode> = Vec::with_capacity(flat.len());
    for item in flat {
        if item.is_primitive(IntrinsicKind::Never) {
            continue;
        }
        if let Some(literal) = item.as_literal()
            && widened.contains(&literal.widened())
        {
            continue;
        }
        if out.iter().any(|existing| same_member(existing, &item)) {
            continue;
        }
        out.push(item);
    }

    let has_true = out
        .iter()
        .any(|item| item.as_literal() == Some(&LiteralValue::Boolean(true)));
    let has_false = out
        .iter()
        .any(|item| item.as_literal() == Some(&LiteralValue::Boolean(false)));
    if has_true && has_false {
        let mut replaced = false;
        out.retain_mut(|item| {
            if !matches!(item.as_literal(), Some(LiteralValue::Boolean(_))) {
                return true;
            }
            if replaced {
                return false;
            }
            replaced = true;
            *item = SchemaNode::primitive(IntrinsicKind::Boolean);
            true
        });
    }

    match out.len() {
        0 => SchemaNode::never(),
        1 => out.pop().unwrap_or_else(SchemaNode::never),
        _ => SchemaNode::new(SchemaKind::Union { items: out }),
    }
}

fn flatten_union(item: SchemaNode, out: &mut Vec<SchemaNode>) {
    match item.kind {
        SchemaKind::Union { items } => {
            for inner in items {
                flatten_union(inner, out);
            }
        }
        _ => out.push(item),
    }
}

fn flatten_intersection(item: SchemaNode, out: &mut Vec<SchemaNode>) {
    match item.kind {
        SchemaKind::Intersection { items } => {
            for inner in items {
                flatten_intersection(inner, out);
            }
        }
        _ => out.push(item),
    }
}

fn is_plain_unknown(item: &SchemaNode) -> bool {
    item.is_primitive(IntrinsicKind::Unknown) && !item.is_unbound()
}

fn same_member(a: &SchemaNode, b: &SchemaNode) -> bool {
    a.kind == b.kind && a.is_unbound() == b.is_unbound() && (!a.is_unbound() || a.node == b.node)
}

// =============================================================================
// Intersections
// =============================================================================

/// Normalized intersection of `items`.
///
/// Object members are merged into one property bag. Conflicting properties
/// meet: `unknown` yields the other side, a literal meets its own primitive as
/// the literal, disjoint primitives or literals produce `never`, and anything
/// else is right-biased. A required property that meets to `never` makes the
/// whole intersection `never`. Scalars intersected with objects (branded
/// primitives) stay an intersection.
pub fn intersection(items: impl IntoIterator<Item = SchemaNode>) -> SchemaNode {
    let mut flat = Vec::new();
    for item in items {
        flatten_intersection(item, &mut flat);
    }

    if flat.iter().any(|item| item.is_primitive(IntrinsicKind::Never)) {
        return SchemaNode::never();
    }
    if flat.iter().any(|item| item.is_primitive(IntrinsicKind::Any)) {
        return SchemaNode::primitive(IntrinsicKind::Any);
    }

    let mut object: Option<SchemaNode> = None;
    let mut others: Vec<SchemaNode> = Vec::new();
    for item in flat {
        if is_plain_unknown(&item) {
            continue;
        }
        if matches!(item.kind, SchemaKind::Object { .. }) {
            object = Some(match object {
                Some(merged) => merge_objects(merged, item),
                None => item,
            });
            continue;
        }
        if let Some(position) = others
            .iter()
            .position(|other| is_scalar(other) && is_scalar(&item))
        {
            let met = meet(others.remove(position), item);
            if met.is_primitive(IntrinsicKind::Never) {
                return met;
            }
            others.insert(position, met);
            continue;
        }
        if !others.iter().any(|other| same_member(other, &item)) {
            others.push(item);
        }
    }

    if let Some(object) = object {
        if object.is_primitive(IntrinsicKind::Never) {
            return object;
        }
        others.push(object);
    }

    match others.len() {
        0 => SchemaNode::unknown(),
        1 => others.pop().unwrap_or_else(SchemaNode::unknown),
        _ => SchemaNode::new(SchemaKind::Intersection { items: others }),
    }
}

fn is_scalar(item: &SchemaNode) -> bool {
    if item.is_unbound() {
        return false;
    }
    match &item.kind {
        SchemaKind::Literal { .. } => true,
        SchemaKind::Primitive { primitive } => !matches!(
            primitive,
            IntrinsicKind::Any | IntrinsicKind::Unknown | IntrinsicKind::Never | IntrinsicKind::Object
        ),
        _ => false,
    }
}

/// Meet of two members of an intersection.
fn meet(left: SchemaNode, right: SchemaNode) -> SchemaNode {
    if left.kind == right.kind {
        return left;
    }
    if is_plain_unknown(&left) {
        return right;
    }
    if is_plain_unknown(&right) {
        return left;
    }
    if left.is_primitive(IntrinsicKind::Any) || right.is_primitive(IntrinsicKind::Any) {
        return SchemaNode::primitive(IntrinsicKind::Any);
    }
    match (&left.kind, &right.kind) {
        (SchemaKind::Literal { value }, SchemaKind::Primitive { primitive })
        | (SchemaKind::Primitive { primitive }, SchemaKind::Literal { value }) => {
            if value.widened() == *primitive {
                SchemaNode::literal(value.clone())
            } else {
                SchemaNode::never()
            }
        }
        (SchemaKind::Literal { .. }, SchemaKind::Literal { .. })
        | (SchemaKind::Primitive { .. }, SchemaKind::Primitive { .. })
            if is_scalar(&left) && is_scalar(&right) =>
        {
            SchemaNode::never()
        }
        (SchemaKind::Object { .. }, SchemaKind::Object { .. }) => merge_objects(left, right),
        _ => right,
    }
}

fn merge_objects(left: SchemaNode, right: SchemaNode) -> SchemaNode {
    let flags = left.flags | right.flags;
    let (
        SchemaKind::Object {
            properties: mut merged,
            abstract_index_keys: mut keys,
        },
        SchemaKind::Object {
            properties,
            abstract_index_keys,
        },
    ) = (left.kind, right.kind)
    else {
        return SchemaNode::never();
    };

    for (name, property) in properties {
        let combined = match merged.shift_remove(&name) {
            Some(existing) => {
                let property_flags = if existing.flags.contains(SchemaFlags::OPTIONAL)
                    && property.flags.contains(SchemaFlags::OPTIONAL)
                {
                    SchemaFlags::OPTIONAL
                } else {
                    SchemaFlags::empty()
                };
                let readonly = (existing.flags | property.flags) & SchemaFlags::READONLY;
                let mut met = meet(existing, property);
                met.flags.remove(SchemaFlags::OPTIONAL);
                met.with_flags(property_flags | readonly)
            }
            None => property,
        };
        if combined.is_primitive(IntrinsicKind::Never)
            && !combined.flags.contains(SchemaFlags::OPTIONAL)
        {
            return SchemaNode::never();
        }
        merged.insert(name, combined);
    }
    keys.extend(abstract_index_keys);

    SchemaNode::new(SchemaKind::Object {
        properties: merged,
        abstract_index_keys: keys,
    })
    .with_flags(flags)
}

// =============================================================================
// Template literals
// =============================================================================

enum Segment {
    Text(String),
    /// Finite set of strings an embedded schema can stringify to, with the
    /// schema itself for when expansion is abandoned.
    Choice(Vec<String>, SchemaNode),
    Opaque(SchemaNode),
}

/// Fold template parts into the most concrete schema.
///
/// Literal parts become text and adjacent text is concatenated. When every
/// embedded part stringifies to a finite set of strings, the cartesian
/// product is expanded into a union of string literals, unless it would
/// produce more than `limit` strings. Otherwise the result stays a template
/// literal with the opaque parts kept as schemas.
pub fn fold_template(parts: Vec<TemplatePart>, limit: usize) -> SchemaNode {
    let mut segments = Vec::with_capacity(parts.len());
    for part in parts {
        push_segment(part, &mut segments);
    }

    let expandable = segments.iter().all(|s| !matches!(s, Segment::Opaque(_)));
    if expandable {
        let mut total = 1usize;
        for segment in &segments {
            if let Segment::Choice(values, _) = segment {
                total = total.saturating_mul(values.len());
            }
        }
        if total <= limit {
            return expand_segments(&segments);
        }
    }

    let mut out: Vec<TemplatePart> = Vec::with_capacity(segments.len());
    for segment in segments {
        let part = match segment {
            Segment::Text(text) => TemplatePart::Text(text),
            Segment::Choice(mut values, schema) => {
                if values.len() == 1 {
                    TemplatePart::Text(values.pop().unwrap_or_default())
                } else {
                    TemplatePart::Schema(schema)
                }
            }
            Segment::Opaque(schema) => TemplatePart::Schema(schema),
        };
        match (out.last_mut(), part) {
            (Some(TemplatePart::Text(previous)), TemplatePart::Text(text)) => {
                previous.push_str(&text);
            }
            (_, part) => out.push(part),
        }
    }
    if let [TemplatePart::Text(text)] = out.as_slice() {
        return SchemaNode::string(text.clone());
    }
    SchemaNode::new(SchemaKind::TemplateLiteral { parts: out })
}

fn push_segment(part: TemplatePart, segments: &mut Vec<Segment>) {
    match part {
        TemplatePart::Text(text) => segments.push(Segment::Text(text)),
        TemplatePart::Schema(schema) => {
            if let SchemaKind::TemplateLiteral { parts } = schema.kind {
                for inner in parts {
                    push_segment(inner, segments);
                }
                return;
            }
            match string_values(&schema) {
                Some(values) => segments.push(Segment::Choice(values, schema)),
                None => segments.push(Segment::Opaque(schema)),
            }
        }
    }
}

/// Strings a schema can stringify to, when the set is finite and known.
fn string_values(schema: &SchemaNode) -> Option<Vec<String>> {
    if schema.is_unbound() {
        return None;
    }
    match &schema.kind {
        SchemaKind::Literal { value } => Some(vec![literal_text(value)]),
        SchemaKind::Primitive { primitive } => match primitive {
            IntrinsicKind::Null => Some(vec!["null".to_string()]),
            IntrinsicKind::Undefined | IntrinsicKind::Void => Some(vec!["undefined".to_string()]),
            IntrinsicKind::Boolean => Some(vec!["true".to_string(), "false".to_string()]),
            _ => None,
        },
        SchemaKind::Union { items } => {
            let mut values = Vec::new();
            for item in items {
                values.extend(string_values(item)?);
            }
            Some(values)
        }
        _ => None,
    }
}

fn expand_segments(segments: &[Segment]) -> SchemaNode {
    let mut combinations: Vec<String> = vec![String::new()];
    for segment in segments {
        match segment {
            Segment::Text(text) => {
                for combination in &mut combinations {
                    combination.push_str(text);
                }
            }
            Segment::Choice(values, _) => {
                let mut next = Vec::with_capacity(combinations.len() * values.len());
                for prefix in &combinations {
                    for value in values {
                        let mut combined = prefix.clone();
                        combined.push_str(value);
                        next.push(combined);
                    }
                }
                combinations = next;
            }
            Segment::Opaque(schema) => return schema.clone(),
        }
    }
    union(combinations.into_iter().map(SchemaNode::string))
}

/// Text of a literal as it appears when interpolated into a string.
pub fn literal_text(value: &LiteralValue) -> String {
    match value {
        LiteralValue::String(s) => s.clone(),
        LiteralValue::Number(n) => format_number(n.0),
        LiteralValue::BigInt(digits) => digits.clone(),
        LiteralValue::Boolean(b) => b.to_string(),
    }
}

/// Number to string the way a JavaScript engine prints it for the common
/// cases: integers without a fraction, `NaN`, `Infinity`, and no `-0`.
pub fn format_number(value: f64) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    if value == 0.0 {
        return "0".to_string();
    }
    if value.fract() == 0.0 && value.abs() < 1e21 {
        return format!("{value:.0}");
    }
    format!("{value}")
}

// =============================================================================
// Operators
// =============================================================================

/// Fold `left <operator> right`.
///
/// # Returns
/// * a literal when both operands are literals the operator can evaluate
/// * the operator's result primitive when both operands are concrete
/// * a `BinaryExpression` schema when either operand is still open
pub fn fold_binary(operator: TokenKind, left: SchemaNode, right: SchemaNode) -> SchemaNode {
    use TokenKind as T;
    match operator {
        T::Comma | T::Equals => return right,
        T::AmpersandAmpersand | T::AmpersandAmpersandEquals => {
            return match left.truthiness() {
                Some(false) => left,
                Some(true) => right,
                None => open_or_union(operator, left, right),
            };
        }
        T::BarBar | T::BarBarEquals => {
            return match left.truthiness() {
                Some(true) => left,
                Some(false) => right,
                None => open_or_union(operator, left, right),
            };
        }
        T::QuestionQuestion | T::QuestionQuestionEquals => {
            if left.is_nullish() {
                return right;
            }
            if is_never_nullish(&left) {
                return left;
            }
            if left.is_concrete() && right.is_concrete() {
                return union([without_nullish(left), right]);
            }
            return open_binary(operator, left, right);
        }
        _ => {}
    }

    let operator = compound_base(operator);
    if !left.is_concrete() || !right.is_concrete() {
        return open_binary(operator, left, right);
    }
    if let Some(distributed) = distribute(operator, &left, &right) {
        return distributed;
    }
    if let (Some(l), Some(r)) = (left.as_literal(), right.as_literal())
        && let Some(folded) = fold_literals(operator, l, r)
    {
        return folded;
    }
    SchemaNode::primitive(result_primitive(operator, &left, &right))
}

fn open_or_union(operator: TokenKind, left: SchemaNode, right: SchemaNode) -> SchemaNode {
    if left.is_concrete() && right.is_concrete() {
        union([left, right])
    } else {
        open_binary(operator, left, right)
    }
}

fn open_binary(operator: TokenKind, left: SchemaNode, right: SchemaNode) -> SchemaNode {
    SchemaNode::new(SchemaKind::BinaryExpression {
        operator,
        left: Box::new(left),
        right: Box::new(right),
    })
}

fn compound_base(operator: TokenKind) -> TokenKind {
    use TokenKind as T;
    match operator {
        T::PlusEquals => T::Plus,
        T::MinusEquals => T::Minus,
        T::AsteriskEquals => T::Asterisk,
        T::SlashEquals => T::Slash,
        T::PercentEquals => T::Percent,
        other => other,
    }
}

fn is_never_nullish(schema: &SchemaNode) -> bool {
    match &schema.kind {
        SchemaKind::Literal { .. }
        | SchemaKind::Object { .. }
        | SchemaKind::Array { .. }
        | SchemaKind::Tuple { .. }
        | SchemaKind::Function { .. }
        | SchemaKind::TemplateLiteral { .. } => true,
        SchemaKind::Primitive { primitive } => !matches!(
            primitive,
            IntrinsicKind::Any
                | IntrinsicKind::Unknown
                | IntrinsicKind::Null
                | IntrinsicKind::Undefined
                | IntrinsicKind::Void
        ) && !schema.is_unbound(),
        SchemaKind::Union { items } => items.iter().all(is_never_nullish),
        _ => false,
    }
}

/// Apply the operator member-wise when either side is a union of literals.
fn distribute(operator: TokenKind, left: &SchemaNode, right: &SchemaNode) -> Option<SchemaNode> {
    let members = |schema: &SchemaNode| -> Vec<SchemaNode> {
        match &schema.kind {
            SchemaKind::Union { items } => items.clone(),
            _ => vec![schema.clone()],
        }
    };
    if !matches!(left.kind, SchemaKind::Union { .. })
        && !matches!(right.kind, SchemaKind::Union { .. })
    {
        return None;
    }
    let lefts = members(left);
    let rights = members(right);
    if lefts.len().saturating_mul(rights.len()) > DISTRIBUTION_LIMIT {
        return None;
    }
    let mut out = Vec::with_capacity(lefts.len() * rights.len());
    for l in &lefts {
        for r in &rights {
            out.push(fold_binary(operator, l.clone(), r.clone()));
        }
    }
    Some(union(out))
}

fn fold_literals(operator: TokenKind, left: &LiteralValue, right: &LiteralValue) -> Option<SchemaNode> {
    use LiteralValue as L;
    use TokenKind as T;

    match operator {
        T::EqualsEqualsEquals => return Some(SchemaNode::boolean(strict_equals(left, right))),
        T::ExclamationEqualsEquals => {
            return Some(SchemaNode::boolean(!strict_equals(left, right)));
        }
        T::EqualsEquals | T::ExclamationEquals => {
            let equal = match (left, right) {
                (L::Number(_), L::Number(_)) | (L::String(_), L::String(_)) => {
                    strict_equals(left, right)
                }
                (L::Boolean(_), L::Boolean(_)) | (L::BigInt(_), L::BigInt(_)) => left == right,
                _ => to_number(left) == to_number(right),
            };
            let negate = operator == T::ExclamationEquals;
            return Some(SchemaNode::boolean(equal != negate));
        }
        T::LessThan | T::LessThanEquals | T::GreaterThan | T::GreaterThanEquals => {
            let ordering = match (left, right) {
                (L::String(a), L::String(b)) => Some(a.cmp(b)),
                _ => to_number(left).partial_cmp(&to_number(right)),
            };
            let result = match ordering {
                None => false,
                Some(ordering) => match operator {
                    T::LessThan => ordering.is_lt(),
                    T::LessThanEquals => ordering.is_le(),
                    T::GreaterThan => ordering.is_gt(),
                    _ => ordering.is_ge(),
                },
            };
            return Some(SchemaNode::boolean(result));
        }
        _ => {}
    }

    if operator == T::Plus
        && (matches!(left, L::String(_)) || matches!(right, L::String(_)))
    {
        let mut text = literal_text(left);
        text.push_str(&literal_text(right));
        return Some(SchemaNode::string(text));
    }

    if let (L::BigInt(a), L::BigInt(b)) = (left, right) {
        let a: i128 = a.parse().ok()?;
        let b: i128 = b.parse().ok()?;
        let value = match operator {
            T::Plus => a.checked_add(b)?,
            T::Minus => a.checked_sub(b)?,
            T::Asterisk => a.checked_mul(b)?,
            T::Slash => a.checked_div(b)?,
            T::Percent => a.checked_rem(b)?,
            _ => return None,
        };
        return Some(SchemaNode::literal(L::BigInt(value.to_string())));
    }
    if matches!(left, L::BigInt(_)) || matches!(right, L::BigInt(_)) {
        return None;
    }

    let (a, b) = (to_number(left), to_number(right));
    let value = match operator {
        T::Plus => a + b,
        T::Minus => a - b,
        T::Asterisk => a * b,
        T::Slash => a / b,
        T::Percent => a % b,
        T::AsteriskAsterisk => a.powf(b),
        T::LessThanLessThan => f64::from(to_int32(a).wrapping_shl(to_uint32(b) & 31)),
        T::GreaterThanGreaterThan => f64::from(to_int32(a).wrapping_shr(to_uint32(b) & 31)),
        T::GreaterThanGreaterThanGreaterThan => {
            f64::from(to_uint32(a).wrapping_shr(to_uint32(b) & 31))
        }
        T::Ampersand => f64::from(to_int32(a) & to_int32(b)),
        T::Bar => f64::from(to_int32(a) | to_int32(b)),
        T::Caret => f64::from(to_int32(a) ^ to_int32(b)),
        _ => return None,
    };
    Some(SchemaNode::number(value))
}

fn strict_equals(left: &LiteralValue, right: &LiteralValue) -> bool {
    match (left, right) {
        // NaN !== NaN, 0 === -0
        (LiteralValue::Number(a), LiteralValue::Number(b)) => a.0 == b.0,
        _ => left == right,
    }
}

fn result_primitive(operator: TokenKind, left: &SchemaNode, right: &SchemaNode) -> IntrinsicKind {
    use TokenKind as T;
    match operator {
        T::Plus => {
            if is_string_like(left) || is_string_like(right) {
                IntrinsicKind::String
            } else if is_bigint_like(left) && is_bigint_like(right) {
                IntrinsicKind::BigInt
            } else {
                IntrinsicKind::Number
            }
        }
        T::LessThan
        | T::LessThanEquals
        | T::GreaterThan
        | T::GreaterThanEquals
        | T::EqualsEquals
        | T::EqualsEqualsEquals
        | T::ExclamationEquals
        | T::ExclamationEqualsEquals
        | T::InKeyword
        | T::InstanceOfKeyword => IntrinsicKind::Boolean,
        T::GreaterThanGreaterThanGreaterThan => IntrinsicKind::Number,
        _ if is_bigint_like(left) && is_bigint_like(right) => IntrinsicKind::BigInt,
        _ => IntrinsicKind::Number,
    }
}

fn is_string_like(schema: &SchemaNode) -> bool {
    match &schema.kind {
        SchemaKind::Literal { value } => matches!(value, LiteralValue::String(_)),
        SchemaKind::Primitive { primitive } => *primitive == IntrinsicKind::String,
        SchemaKind::TemplateLiteral { .. } => true,
        SchemaKind::Union { items } => items.iter().all(is_string_like),
        _ => false,
    }
}

fn is_bigint_like(schema: &SchemaNode) -> bool {
    match &schema.kind {
        SchemaKind::Literal { value } => matches!(value, LiteralValue::BigInt(_)),
        SchemaKind::Primitive { primitive } => *primitive == IntrinsicKind::BigInt,
        SchemaKind::Union { items } => items.iter().all(is_bigint_like),
        _ => false,
    }
}

/// Numeric value of a literal under `Number(..)` conversion.
pub fn to_number(value: &LiteralValue) -> f64 {
    match value {
        LiteralValue::Number(n) => n.0,
        LiteralValue::Boolean(b) => f64::from(u8::from(*b)),
        LiteralValue::BigInt(digits) => digits.parse().unwrap_or(f64::NAN),
        LiteralValue::String(s) => string_to_number(s),
    }
}

fn string_to_number(text: &str) -> f64 {
    let trimmed = text.trim();
    match trimmed {
        "" => return 0.0,
        "Infinity" | "+Infinity" => return f64::INFINITY,
        "-Infinity" => return f64::NEG_INFINITY,
        _ => {}
    }
    let lower = trimmed.to_ascii_lowercase();
    if lower.contains("inf") || lower.contains("nan") || trimmed.contains('_') {
        return f64::NAN;
    }
    if lower.starts_with("0x") || lower.starts_with("0o") || lower.starts_with("0b") {
        return tshape_ast::node_arena::parse_numeric_literal(trimmed).unwrap_or(f64::NAN);
    }
    trimmed.parse().unwrap_or(f64::NAN)
}

fn to_int32(value: f64) -> i32 {
    to_uint32(value) as i32
}

fn to_uint32(value: f64) -> u32 {
    if !value.is_finite() {
        return 0;
    }
    value.trunc().rem_euclid(4_294_967_296.0) as u32
}

/// Fold a prefix unary operator.
pub fn fold_unary(operator: TokenKind, operand: SchemaNode) -> SchemaNode {
    use TokenKind as T;
    match operator {
        T::Exclamation => match operand.truthiness() {
            Some(truthy) => SchemaNode::boolean(!truthy),
            None => SchemaNode::primitive(IntrinsicKind::Boolean),
        },
        T::Minus => match operand.as_literal() {
            Some(LiteralValue::BigInt(digits)) => {
                let negated = match digits.strip_prefix('-') {
                    Some(positive) => positive.to_string(),
                    None => format!("-{digits}"),
                };
                SchemaNode::literal(LiteralValue::BigInt(negated))
            }
            Some(literal) => SchemaNode::number(-to_number(literal)),
            None if !operand.is_concrete() => {
                open_binary(T::Asterisk, SchemaNode::number(-1.0), operand)
            }
            None if is_bigint_like(&operand) => SchemaNode::primitive(IntrinsicKind::BigInt),
            None => SchemaNode::primitive(IntrinsicKind::Number),
        },
        T::Plus => match operand.as_literal() {
            Some(literal) => SchemaNode::number(to_number(literal)),
            None if !operand.is_concrete() => {
                open_binary(T::Asterisk, SchemaNode::number(1.0), operand)
            }
            None => SchemaNode::primitive(IntrinsicKind::Number),
        },
        T::Tilde => match operand.as_literal() {
            Some(LiteralValue::BigInt(_)) => SchemaNode::primitive(IntrinsicKind::BigInt),
            Some(literal) => SchemaNode::number(f64::from(!to_int32(to_number(literal)))),
            None if !operand.is_concrete() => {
                open_binary(T::Caret, operand, SchemaNode::number(-1.0))
            }
            None => SchemaNode::primitive(IntrinsicKind::Number),
        },
        T::PlusPlus | T::MinusMinus => {
            let delta = if operator == T::PlusPlus { 1.0 } else { -1.0 };
            match operand.as_literal() {
                Some(LiteralValue::BigInt(_)) => SchemaNode::primitive(IntrinsicKind::BigInt),
                Some(literal) => SchemaNode::number(to_number(literal) + delta),
                None if !operand.is_concrete() => {
                    open_binary(T::Plus, operand, SchemaNode::number(delta))
                }
                None => SchemaNode::primitive(IntrinsicKind::Number),
            }
        }
        _ => operand,
    }
}

/// Value of a postfix `x++` / `x--`: the operand converted to a number.
pub fn fold_postfix(operand: SchemaNode) -> SchemaNode {
    match operand.as_literal() {
        Some(LiteralValue::BigInt(_)) => operand,
        Some(literal) => SchemaNode::number(to_number(literal)),
        None if !operand.is_concrete() => operand,
        None => SchemaNode::primitive(IntrinsicKind::Number),
    }
}

/// Result of `typeof operand`.
pub fn type_of(operand: &SchemaNode) -> SchemaNode {
    match type_of_text(operand) {
        Some(texts) => union(texts.into_iter().map(SchemaNode::string)),
        None => SchemaNode::primitive(IntrinsicKind::String),
    }
}

fn type_of_text(operand: &SchemaNode) -> Option<Vec<&'static str>> {
    if operand.is_unbound() {
        return None;
    }
    let text = match &operand.kind {
        SchemaKind::Literal { value } => match value {
            LiteralValue::String(_) => "string",
            LiteralValue::Number(_) => "number",
            LiteralValue::BigInt(_) => "bigint",
            LiteralValue::Boolean(_) => "boolean",
        },
        SchemaKind::Primitive { primitive } => match primitive {
            IntrinsicKind::String => "string",
            IntrinsicKind::Number => "number",
            IntrinsicKind::BigInt => "bigint",
            IntrinsicKind::Boolean => "boolean",
            IntrinsicKind::Symbol => "symbol",
            IntrinsicKind::Undefined | IntrinsicKind::Void => "undefined",
            IntrinsicKind::Null | IntrinsicKind::Object => "object",
            IntrinsicKind::Any | IntrinsicKind::Unknown | IntrinsicKind::Never => return None,
        },
        SchemaKind::TemplateLiteral { .. } => "string",
        SchemaKind::Object { .. } | SchemaKind::Array { .. } | SchemaKind::Tuple { .. } => "object",
        SchemaKind::Function { .. } => "function",
        SchemaKind::Union { items } => {
            let mut texts = Vec::new();
            for item in items {
                for text in type_of_text(item)? {
                    if !texts.contains(&text) {
                        texts.push(text);
                    }
                }
            }
            return Some(texts);
        }
        _ => return None,
    };
    Some(vec![text])
}

/// `condition ? when_true : when_false`: one branch when the condition is
/// concrete with a known truthiness, the union of both otherwise.
pub fn conditional(condition: &SchemaNode, when_true: SchemaNode, when_false: SchemaNode) -> SchemaNode {
    if condition.is_concrete()
        && let Some(truthy) = condition.truthiness()
    {
        return if truthy { when_true } else { when_false };
    }
    union([when_true, when_false])
}

// =============================================================================
// Member access
// =============================================================================

/// Fold `object[index]`. Open operands produce an `IndexAccess` schema.
pub fn index_access(object: SchemaNode, index: SchemaNode) -> SchemaNode {
    if !object.is_concrete() || !index.is_concrete() {
        return open_index_access(object, index);
    }
    if let SchemaKind::Union { items } = &index.kind {
        return union(
            items
                .iter()
                .map(|key| index_access(object.clone(), key.clone())),
        );
    }
    if let SchemaKind::Union { items } = &object.kind {
        return union(
            items
                .iter()
                .map(|member| index_access(member.clone(), index.clone())),
        );
    }
    match member_of(&object, &index) {
        Some(member) => member,
        None => open_index_access(object, index),
    }
}

fn open_index_access(object: SchemaNode, index: SchemaNode) -> SchemaNode {
    SchemaNode::new(SchemaKind::IndexAccess {
        object: Box::new(object),
        index: Box::new(index),
    })
}

fn member_of(object: &SchemaNode, index: &SchemaNode) -> Option<SchemaNode> {
    let key = index.as_literal().map(literal_text);
    match &object.kind {
        SchemaKind::Object {
            properties,
            abstract_index_keys,
        } => {
            if let Some(key) = &key
                && let Some(property) = properties.get(key)
            {
                return Some(property_value(property));
            }
            let key_kind = match index.as_literal() {
                Some(literal) => literal.widened(),
                None => match &index.kind {
                    SchemaKind::Primitive { primitive } => *primitive,
                    _ => return None,
                },
            };
            abstract_index_keys
                .iter()
                .find(|entry| {
                    entry.key.is_primitive(key_kind)
                        || (key_kind == IntrinsicKind::Number
                            && entry.key.is_primitive(IntrinsicKind::String))
                })
                .map(|entry| entry.value.clone())
                .or_else(|| key.map(|_| SchemaNode::primitive(IntrinsicKind::Undefined)))
        }
        SchemaKind::Tuple {
            items,
            element_flags,
        } => {
            if key.as_deref() == Some("length") {
                let open = element_flags.iter().any(|f| {
                    f.intersects(tshape_host::ElementFlags::REST | tshape_host::ElementFlags::OPTIONAL)
                });
                return Some(if open {
                    SchemaNode::primitive(IntrinsicKind::Number)
                } else {
                    SchemaNode::number(items.len() as f64)
                });
            }
            let position = match index.as_literal() {
                Some(LiteralValue::Number(n)) if n.0 >= 0.0 && n.0.fract() == 0.0 => n.0 as usize,
                _ => return Some(union(items.iter().map(element_value))),
            };
            match items.get(position) {
                Some(item) if !item.flags.contains(SchemaFlags::REST) => Some(element_value(item)),
                _ => items
                    .iter()
                    .rev()
                    .find(|item| item.flags.contains(SchemaFlags::REST))
                    .map(element_value)
                    .or(Some(SchemaNode::primitive(IntrinsicKind::Undefined))),
            }
        }
        SchemaKind::Array { items } => {
            if key.as_deref() == Some("length") {
                return Some(SchemaNode::primitive(IntrinsicKind::Number));
            }
            Some((**items).clone())
        }
        SchemaKind::Literal {
            value: LiteralValue::String(text),
        } => {
            if key.as_deref() == Some("length") {
                return Some(SchemaNode::number(text.encode_utf16().count() as f64));
            }
            match index.as_literal() {
                // Positions count UTF-16 code units, like `length`.
                Some(LiteralValue::Number(n)) if n.0 >= 0.0 && n.0.fract() == 0.0 => {
                    Some(match text.encode_utf16().nth(n.0 as usize) {
                        Some(unit) => String::from_utf16(&[unit])
                            .map(SchemaNode::string)
                            .unwrap_or_else(|_| SchemaNode::primitive(IntrinsicKind::String)),
                        None => SchemaNode::primitive(IntrinsicKind::Undefined),
                    })
                }
                _ => None,
            }
        }
        _ => None,
    }
}

/// A property as a value: flags describing the slot are dropped.
fn property_value(property: &SchemaNode) -> SchemaNode {
    let mut value = property.clone();
    value.flags.remove(SchemaFlags::OPTIONAL | SchemaFlags::READONLY);
    value
}

/// Tuple element as a value; a rest element yields its element type and an
/// optional element may read as `undefined`.
fn element_value(item: &SchemaNode) -> SchemaNode {
    if item.flags.contains(SchemaFlags::REST)
        && let SchemaKind::Array { items } = &item.kind
    {
        return (**items).clone();
    }
    let optional = item.flags.contains(SchemaFlags::OPTIONAL);
    let mut value = item.clone();
    value.flags.remove(SchemaFlags::REST | SchemaFlags::OPTIONAL | SchemaFlags::READONLY);
    if optional {
        return union([value, SchemaNode::primitive(IntrinsicKind::Undefined)]);
    }
    value
}

// =============================================================================
// Narrowing helpers
// =============================================================================

/// `schema` without `null`, `undefined` and `void` members.
pub fn without_nullish(schema: SchemaNode) -> SchemaNode {
    match schema.kind {
        SchemaKind::Union { items } => union(items.into_iter().filter(|item| !item.is_nullish())),
        _ if schema.is_nullish() => SchemaNode::never(),
        _ => schema,
    }
}

/// Mark an `as const` value readonly, recursively through object properties
/// and tuple elements.
pub fn make_readonly(mut schema: SchemaNode) -> SchemaNode {
    schema.flags |= SchemaFlags::READONLY;
    match &mut schema.kind {
        SchemaKind::Object { properties, .. } => {
            let owned: IndexMap<String, SchemaNode> = std::mem::take(properties);
            *properties = owned
                .into_iter()
                .map(|(name, property)| (name, make_readonly(property)))
                .collect();
        }
        SchemaKind::Tuple { items, .. } => {
            let owned = std::mem::take(items);
            *items = owned.into_iter().map(make_readonly).collect();
        }
        _ => {}
    }
    schema
}

#[cfg(test)]
#[path = "../tests/algebra_tests.rs"]
mod tests;

//! Per-node batch runs over a host program.
//!
//! A failure on one node is rendered with its node context and recorded as
//! `NodeOutcome::Failed`; the remaining nodes are still processed.

use crate::config::AnalysisConfig;
use serde::Serialize;
use tracing::{debug, info_span, warn};
use tshape_ast::NodeIndex;
use tshape_host::TypeQuery;
use tshape_resolver::{DeclarationResolver, Resolution, ResolveOptions, ShapeError};
use tshape_schema::{EvaluatedSchema, SchemaEvaluator, SchemaOptions};

/// The result of analysing one node.
#[derive(Clone, Debug)]
pub enum NodeOutcome<T> {
    Done { node: NodeIndex, value: T },
    /// The node has nothing to report: unresolved, or no value.
    Empty { node: NodeIndex },
    Failed { node: NodeIndex, message: String },
}

impl<T> NodeOutcome<T> {
    pub fn node(&self) -> NodeIndex {
        match self {
            NodeOutcome::Done { node, .. }
            | NodeOutcome::Empty { node }
            | NodeOutcome::Failed { node, .. } => *node,
        }
    }

    pub fn value(&self) -> Option<&T> {
        match self {
            NodeOutcome::Done { value, .. } => Some(value),
            _ => None,
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, NodeOutcome::Failed { .. })
    }

    fn from_result(node: NodeIndex, result: Result<Option<T>, ShapeError>) -> Self {
        match result {
            Ok(Some(value)) => NodeOutcome::Done { node, value },
            Ok(None) => NodeOutcome::Empty { node },
            Err(error) => {
                let message = error.to_string();
                warn!(node = node.0, error = %message, "analysis failed");
                NodeOutcome::Failed { node, message }
            }
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchSummary {
    pub total: usize,
    pub done: usize,
    pub empty: usize,
    pub failed: usize,
}

impl BatchSummary {
    fn record<T>(&mut self, outcome: &NodeOutcome<T>) {
        self.total += 1;
        match outcome {
            NodeOutcome::Done { .. } => self.done += 1,
            NodeOutcome::Empty { .. } => self.empty += 1,
            NodeOutcome::Failed { .. } => self.failed += 1,
        }
    }
}

#[derive(Clone, Debug)]
pub struct BatchReport<T> {
    pub outcomes: Vec<NodeOutcome<T>>,
    pub summary: BatchSummary,
}

impl<T> BatchReport<T> {
    fn collect(outcomes: Vec<NodeOutcome<T>>) -> Self {
        let mut summary = BatchSummary::default();
        for outcome in &outcomes {
            summary.record(outcome);
        }
        debug!(
            total = summary.total,
            failed = summary.failed,
            "batch finished"
        );
        BatchReport { outcomes, summary }
    }

    pub fn failures(&self) -> impl Iterator<Item = &NodeOutcome<T>> {
        self.outcomes.iter().filter(|outcome| outcome.is_failed())
    }
}

/// Resolve the declaration of every node. One resolver is shared by the run.
pub fn resolve_declarations(
    host: &dyn TypeQuery,
    nodes: &[NodeIndex],
    options: ResolveOptions,
) -> BatchReport<Resolution> {
    let _entered = info_span!("resolve_declarations", nodes = nodes.len()).entered();
    let resolver = DeclarationResolver::new(host, options);
    let outcomes = nodes
        .iter()
        .map(|&node| NodeOutcome::from_result(node, resolver.resolve(node)))
        .collect();
    BatchReport::collect(outcomes)
}

/// Evaluate and finalize the schema of every node, each in its own session.
pub fn evaluate_schemas(
    host: &dyn TypeQuery,
    nodes: &[NodeIndex],
    options: SchemaOptions,
) -> BatchReport<EvaluatedSchema> {
    evaluate_schemas_with(host, nodes, &AnalysisConfig {
        schema: options,
        ..AnalysisConfig::default()
    })
}

/// `evaluate_schemas` with the resolver options of `config` as well.
pub fn evaluate_schemas_with(
    host: &dyn TypeQuery,
    nodes: &[NodeIndex],
    config: &AnalysisConfig,
) -> BatchReport<EvaluatedSchema> {
    let _entered = info_span!("evaluate_schemas", nodes = nodes.len()).entered();
    let evaluator = SchemaEvaluator::new(host, config.resolve);
    let outcomes = nodes
        .iter()
        .map(|&node| NodeOutcome::from_result(node, evaluator.evaluate_schema(node, config.schema)))
        .collect();
    BatchReport::collect(outcomes)
}

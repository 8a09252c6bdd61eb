//! Static dependency graph of a question bank.
//!
//! Edges point from what is read to what it gates:
//! - gate-referenced key → gated question or suite
//! - suite → member question
//! - question → fact key one of its options writes
//!
//! Question IDs and fact keys share one namespace (a gate reads either the
//! same way), so a key that names a question resolves to that question's
//! node. Suites live in their own namespace.
//!
//! A question that is shown only until its own answer establishes a key
//! (`none: [k exists]` while one of its options writes `k`) closes a loop
//! through that key, but the loop cannot stall the assessment. Cycle
//! detection skips such self-suppressing gate edges.

use std::collections::HashMap;

use petgraph::algo::tarjan_scc;
use petgraph::stable_graph::{NodeIndex, StableGraph};
use petgraph::visit::EdgeRef;
use petgraph::Directed;
use serde::Serialize;
use vigil_core::content::{Comparator, Gate};
use vigil_core::QuestionBank;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    Question,
    Suite,
    /// A key no question defines: detector output or option-written facts.
    Fact,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DependencyNode {
    pub kind: NodeKind,
    pub id: String,
}

impl DependencyNode {
    /// Display label used in cycle reports: `suite:<id>` for suites, the
    /// bare ID otherwise.
    pub fn label(&self) -> String {
        match self.kind {
            NodeKind::Suite => format!("suite:{}", self.id),
            NodeKind::Question | NodeKind::Fact => self.id.clone(),
        }
    }
}

/// Why one node depends on another.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum EdgeKind {
    /// The target's gate reads the source. `suppressing` when every read
    /// can only hide the target once the key is set.
    Gate { suppressing: bool },
    /// Suite to member question.
    Member,
    /// Question to a fact key one of its options writes.
    Writes,
}

pub type DependencyStableGraph = StableGraph<DependencyNode, EdgeKind, Directed>;

/// Dependency graph with indexed node lookup.
pub struct DependencyGraph {
    pub graph: DependencyStableGraph,
    keys: HashMap<String, NodeIndex>,
    suites: HashMap<String, NodeIndex>,
}

impl DependencyGraph {
    pub fn new() -> Self {
        Self {
            graph: StableGraph::new(),
            keys: HashMap::new(),
            suites: HashMap::new(),
        }
    }

    /// Build the graph for every question and suite in the bank.
    pub fn build(bank: &QuestionBank) -> Self {
        let mut g = Self::new();

        // Questions first so shared keys resolve to question nodes.
        for question in bank.questions() {
            g.ensure_key(&question.id, NodeKind::Question);
        }

        for question in bank.questions() {
            let target = g.ensure_key(&question.id, NodeKind::Question);
            for key in question.conditions.referenced_keys() {
                let source = g.ensure_key(key, NodeKind::Fact);
                let suppressing = only_suppresses(&question.conditions, key);
                g.add_edge(source, target, EdgeKind::Gate { suppressing });
            }
            for key in question.written_fact_keys() {
                let fact = g.ensure_key(key, NodeKind::Fact);
                g.add_edge(target, fact, EdgeKind::Writes);
            }
        }

        for suite in bank.suites() {
            let node = g.ensure_suite(&suite.id);
            for gate in &suite.gates {
                for key in gate.referenced_keys() {
                    let source = g.ensure_key(key, NodeKind::Fact);
                    let suppressing = only_suppresses(gate, key);
                    g.add_edge(source, node, EdgeKind::Gate { suppressing });
                }
            }
            for member in &suite.question_ids {
                let target = g.ensure_key(member, NodeKind::Question);
                g.add_edge(node, target, EdgeKind::Member);
            }
        }

        g
    }

    fn ensure_key(&mut self, key: &str, kind: NodeKind) -> NodeIndex {
        if let Some(&idx) = self.keys.get(key) {
            return idx;
        }
        let idx = self.graph.add_node(DependencyNode {
            kind,
            id: key.to_string(),
        });
        self.keys.insert(key.to_string(), idx);
        idx
    }

    fn ensure_suite(&mut self, id: &str) -> NodeIndex {
        if let Some(&idx) = self.suites.get(id) {
            return idx;
        }
        let idx = self.graph.add_node(DependencyNode {
            kind: NodeKind::Suite,
            id: id.to_string(),
        });
        self.suites.insert(id.to_string(), idx);
        idx
    }

    /// Parallel edges collapse into one. Gate edges merge: the merged edge
    /// is suppressing only if both reads are.
    fn add_edge(&mut self, source: NodeIndex, target: NodeIndex, kind: EdgeKind) {
        let Some(edge) = self.graph.find_edge(source, target) else {
            self.graph.add_edge(source, target, kind);
            return;
        };
        if let (Some(EdgeKind::Gate { suppressing }), EdgeKind::Gate { suppressing: incoming }) =
            (self.graph.edge_weight_mut(edge), kind)
        {
            *suppressing &= incoming;
        }
    }

    /// A gate edge `key → question` that only hides the question, where the
    /// question itself establishes `key` (its own answer, or a fact its
    /// options write).
    fn is_self_suppressing(&self, source: NodeIndex, target: NodeIndex, kind: EdgeKind) -> bool {
        if kind != (EdgeKind::Gate { suppressing: true }) {
            return false;
        }
        if source == target {
            return true;
        }
        self.graph
            .find_edge(target, source)
            .and_then(|back| self.graph.edge_weight(back))
            .is_some_and(|back| *back == EdgeKind::Writes)
    }

    /// Node for a question ID or fact key.
    pub fn key_node(&self, key: &str) -> Option<&DependencyNode> {
        self.keys.get(key).and_then(|&idx| self.graph.node_weight(idx))
    }

    pub fn suite_node(&self, id: &str) -> Option<&DependencyNode> {
        self.suites.get(id).and_then(|&idx| self.graph.node_weight(idx))
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Labels of the nodes a key directly gates or writes.
    pub fn dependents(&self, key: &str) -> Vec<String> {
        let Some(&idx) = self.keys.get(key) else {
            return Vec::new();
        };
        let mut labels: Vec<String> = self
            .graph
            .edges(idx)
            .filter_map(|e| self.graph.node_weight(e.target()))
            .map(DependencyNode::label)
            .collect();
        labels.sort();
        labels
    }

    /// Every dependency cycle, as sorted node labels. Strongly connected
    /// components with more than one node are cycles, and so is any node
    /// with an edge to itself. Self-suppressing gate edges are left out.
    /// Output order is deterministic.
    pub fn find_cycles(&self) -> Vec<Vec<String>> {
        let mut blocking = self.graph.clone();
        blocking.retain_edges(|frozen, edge| {
            match (frozen.edge_endpoints(edge), frozen.edge_weight(edge)) {
                (Some((source, target)), Some(&kind)) => {
                    !self.is_self_suppressing(source, target, kind)
                }
                _ => true,
            }
        });

        let mut cycles: Vec<Vec<String>> = tarjan_scc(&blocking)
            .into_iter()
            .filter(|scc| {
                scc.len() > 1
                    || (scc.len() == 1 && blocking.find_edge(scc[0], scc[0]).is_some())
            })
            .map(|scc| {
                let mut labels: Vec<String> = scc
                    .into_iter()
                    .filter_map(|idx| blocking.node_weight(idx))
                    .map(DependencyNode::label)
                    .collect();
                labels.sort();
                labels
            })
            .collect();
        cycles.sort();
        cycles
    }

    pub fn has_cycles(&self) -> bool {
        !self.find_cycles().is_empty()
    }
}

/// Whether every read of `key` in `gate` can only hide its owner once the
/// key is set: a condition that holds while the key is missing in `all` or
/// `any`, or one that fails while it is missing in `none`.
fn only_suppresses(gate: &Gate, key: &str) -> bool {
    let holds_when_missing = |when: &Comparator| {
        matches!(
            when,
            Comparator::NotExists | Comparator::Falsy | Comparator::NotContains | Comparator::NotIn
        )
    };
    let admitting = [&gate.all, &gate.any]
        .into_iter()
        .flat_map(|clause| clause.iter().flatten())
        .filter(|condition| condition.question_id == key)
        .all(|condition| holds_when_missing(&condition.when));
    let excluding = gate
        .none
        .iter()
        .flatten()
        .filter(|condition| condition.question_id == key)
        .all(|condition| !holds_when_missing(&condition.when));
    admitting && excluding
}

impl Default for DependencyGraph {
    fn default() -> Self {
        Self::new()
    }
}

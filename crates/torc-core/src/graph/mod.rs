//! Core graph data structures: nodes, edges, regions, and the graph container.
//!
//! A Torc program is a directed acyclic graph (DAG) at the expression level,
//! with explicit cycle structures for iteration and recursion. The graph
//! consists of nodes (computation), edges (data dependencies), and regions
//! (scope boundaries).

pub mod constraints;
pub mod edge;
pub mod node;
pub mod port;
pub mod region;

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use std::collections::HashSet;

use self::constraints::{BandwidthConstraint, Lifetime};
use self::edge::{Edge, EdgeId};
use self::node::{Node, NodeId, NodeKind};
use self::region::{Region, RegionId};

use crate::contract::{EffectSet, ObligationKind, ProofObligation, ProofStatus};
use crate::types::check::types_compatible;
use crate::types::{Linearity, Predicate, Type};

/// Errors that can occur during graph construction or validation.
#[derive(Debug, Error)]
pub enum GraphError {
    #[error("node not found: {0}")]
    NodeNotFound(NodeId),

    #[error("edge not found: {0}")]
    EdgeNotFound(EdgeId),

    #[error("region not found: {0}")]
    RegionNotFound(RegionId),

    #[error("dangling edge: source node {src} or target node {dst} not in graph")]
    DanglingEdge { src: NodeId, dst: NodeId },

    #[error("port index {port} out of range for node {node}")]
    PortOutOfRange { node: NodeId, port: usize },

    #[error("duplicate node id: {0}")]
    DuplicateNode(NodeId),

    #[error("duplicate edge id: {0}")]
    DuplicateEdge(EdgeId),

    #[error("cycle detected involving node {0}")]
    CycleDetected(NodeId),

    #[error("node {child} not contained in its declared region {region}")]
    RegionContainment { child: NodeId, region: RegionId },

    #[error("duplicate child node {child} in region {region}")]
    DuplicateRegionChild { child: NodeId, region: RegionId },

    #[error("linearity violation: {kind:?} value at node {node} port {port} has {consumers} consumer(s)")]
    LinearityViolation {
        node: NodeId,
        port: usize,
        kind: crate::types::Linearity,
        consumers: usize,
    },

    #[error("effect violation: node {node} declares {declared} but depends on {required}")]
    EffectViolation {
        node: NodeId,
        declared: String,
        required: String,
    },

    #[error("type mismatch on edge {edge}: expected {expected}, found {found}")]
    TypeMismatch {
        edge: EdgeId,
        expected: String,
        found: String,
    },

    #[error("merge conflict: duplicate {kind} id {id}")]
    MergeConflict { kind: String, id: uuid::Uuid },

    #[error("incomplete port mapping: unmapped boundary port ({node}, {port})")]
    UnmappedBoundaryPort { node: NodeId, port: usize },
}

/// Direction of a boundary edge relative to a module.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoundaryDirection {
    /// Edge flows into the module (external source → internal target).
    In,
    /// Edge flows out of the module (internal source → external target).
    Out,
}

/// A boundary edge that crosses a module boundary.
#[derive(Debug, Clone)]
pub struct BoundaryEdge {
    /// Node inside the module.
    pub internal_node: NodeId,
    /// Port on the internal node.
    pub internal_port: usize,
    /// Node outside the module.
    pub external_node: NodeId,
    /// Port on the external node.
    pub external_port: usize,
    /// Data type flowing on this edge.
    pub data_type: Option<Type>,
    /// Direction relative to the module.
    pub direction: BoundaryDirection,
}

/// A module extracted from a graph, with boundary information.
pub struct ModuleInterface {
    /// The internal subgraph.
    pub graph: Graph,
    /// Edges flowing into the module.
    pub inputs: Vec<BoundaryEdge>,
    /// Edges flowing out of the module.
    pub outputs: Vec<BoundaryEdge>,
}

/// The core graph container for a Torc program.
///
/// Stores nodes, edges, and regions with efficient lookup by ID.
/// Provides topological ordering, subgraph extraction, and validation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Graph {
    nodes: HashMap<NodeId, Node>,
    edges: HashMap<EdgeId, Edge>,
    regions: HashMap<RegionId, Region>,

    /// Index: node -> outgoing edges (edges where this node is the source)
    outgoing: HashMap<NodeId, Vec<EdgeId>>,
    /// Index: node -> incoming edges (edges where this node is the target)
    incoming: HashMap<NodeId, Vec<EdgeId>>,
    /// Index: region -> child nodes
    region_children: HashMap<RegionId, Vec<NodeId>>,
    /// Index: node -> containing region (if any)
    node_region: HashMap<NodeId, RegionId>,
    /// Index: child region -> parent region
    region_parent: HashMap<RegionId, RegionId>,
}

impl Graph {
    /// Create a new empty graph.
    pub fn new() -> Self {
        Self {
            nodes: HashMap::new(),
            edges: HashMap::new(),
            regions: HashMap::new(),
            outgoing: HashMap::new(),
            incoming: HashMap::new(),
            region_children: HashMap::new(),
            node_region: HashMap::new(),
            region_parent: HashMap::new(),
        }
    }

    /// Insert a node into the graph.
    pub fn add_node(&mut self, node: Node) -> Result<NodeId, GraphError> {
        let id = node.id;
        if self.nodes.contains_key(&id) {
            return Err(GraphError::DuplicateNode(id));
        }
        self.outgoing.entry(id).or_default();
        self.incoming.entry(id).or_default();
        self.nodes.insert(id, node);
        Ok(id)
    }

    /// Insert an edge into the graph. Both source and target nodes must exist.
    pub fn add_edge(&mut self, edge: Edge) -> Result<EdgeId, GraphError> {
        let id = edge.id;
        if self.edges.contains_key(&id) {
            return Err(GraphError::DuplicateEdge(id));
        }
        let source_node = edge.source.0;
        let target_node = edge.target.0;
        if !self.nodes.contains_key(&source_node) || !self.nodes.contains_key(&target_node) {
            return Err(GraphError::DanglingEdge {
                src: source_node,
                dst: target_node,
            });
        }
        self.outgoing.entry(source_node).or_default().push(id);
        self.incoming.entry(target_node).or_default().push(id);
        self.edges.insert(id, edge);
        Ok(id)
    }

    /// Insert a region into the graph.
    pub fn add_region(&mut self, region: Region) -> Result<RegionId, GraphError> {
        let id = region.id;
        // Validate that all child nodes exist and are unique
        let mut seen = HashSet::new();
        for child_id in &region.children {
            if !self.nodes.contains_key(child_id) {
                return Err(GraphError::NodeNotFound(*child_id));
            }
            if !seen.insert(*child_id) {
                return Err(GraphError::DuplicateRegionChild {
                    child: *child_id,
                    region: id,
                });
            }
        }
        for child_id in &region.children {
            self.node_region.insert(*child_id, id);
        }
        self.region_children.insert(id, region.children.clone());
        if let Some(parent_id) = region.parent {
            self.region_parent.insert(id, parent_id);
        }
        self.regions.insert(id, region);
        Ok(id)
    }

    /// Look up a node by ID.
    pub fn get_node(&self, id: &NodeId) -> Option<&Node> {
        self.nodes.get(id)
    }

    /// Look up a node by ID (mutable).
    pub fn get_node_mut(&mut self, id: &NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id)
    }

    /// Look up an edge by ID.
    pub fn get_edge(&self, id: &EdgeId) -> Option<&Edge> {
        self.edges.get(id)
    }

    /// Look up a region by ID.
    pub fn get_region(&self, id: &RegionId) -> Option<&Region> {
        self.regions.get(id)
    }

    /// Get all outgoing edges from a node.
    pub fn outgoing_edges(&self, node_id: &NodeId) -> &[EdgeId] {
        self.outgoing
            .get(node_id)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    /// Get all incoming edges to a node.
    pub fn incoming_edges(&self, node_id: &NodeId) -> &[EdgeId] {
        self.incoming
            .get(node_id)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    /// Get the region containing a node, if any.
    pub fn containing_region(&self, node_id: &NodeId) -> Option<&RegionId> {
        self.node_region.get(node_id)
    }

    /// Look up a region by ID (mutable).
    pub fn get_region_mut(&mut self, id: &RegionId) -> Option<&mut Region> {
        self.regions.get_mut(id)
    }

    /// Set the parent of a child region, updating both the Region and the index.
    pub fn set_region_parent(
        &mut self,
        child: RegionId,
        parent: RegionId,
    ) -> Result<(), GraphError> {
        if !self.regions.contains_key(&child) {
            return Err(GraphError::RegionNotFound(child));
        }
        if !self.regions.contains_key(&parent) {
            return Err(GraphError::RegionNotFound(parent));
        }
        self.region_parent.insert(child, parent);
        if let Some(region) = self.regions.get_mut(&child) {
            region.parent = Some(parent);
        }
        Ok(())
    }

    /// Get the parent region of a given region.
    pub fn parent_region(&self, region_id: &RegionId) -> Option<&RegionId> {
        self.region_parent.get(region_id)
    }

    /// Get all child regions of a given region.
    pub fn child_regions(&self, region_id: &RegionId) -> Vec<RegionId> {
        self.region_parent
            .iter()
            .filter(|(_, parent)| *parent == region_id)
            .map(|(child, _)| *child)
            .collect()
    }

    /// Extract a subgraph containing the given nodes, their internal edges,
    /// and any regions fully contained within the node set.
    pub fn extract_subgraph(&self, node_ids: &HashSet<NodeId>) -> Graph {
        let mut sub = Graph::new();

        // Copy selected nodes
        for id in node_ids {
            if let Some(node) = self.nodes.get(id) {
                sub.nodes.insert(*id, node.clone());
                sub.outgoing.entry(*id).or_default();
                sub.incoming.entry(*id).or_default();
            }
        }

        // Copy edges where both endpoints are in the set
        for edge in self.edges.values() {
            if node_ids.contains(&edge.source.0) && node_ids.contains(&edge.target.0) {
                sub.outgoing
                    .entry(edge.source.0)
                    .or_default()
                    .push(edge.id);
                sub.incoming
                    .entry(edge.target.0)
                    .or_default()
                    .push(edge.id);
                sub.edges.insert(edge.id, edge.clone());
            }
        }

        // Identify which regions are fully contained in the node set
        let included_regions: HashSet<RegionId> = self
            .regions
            .values()
            .filter(|r| !r.children.is_empty() && r.children.iter().all(|c| node_ids.contains(c)))
            .map(|r| r.id)
            .collect();

        // Copy included regions, dropping parent references to excluded regions
        for region in self.regions.values() {
            if included_regions.contains(&region.id) {
                let mut cloned = region.clone();
                if let Some(parent_id) = cloned.parent {
                    if !included_regions.contains(&parent_id) {
                        cloned.parent = None;
                    }
                }
                sub.region_children
                    .insert(cloned.id, cloned.children.clone());
                for child_id in &cloned.children {
                    sub.node_region.insert(*child_id, cloned.id);
                }
                if let Some(parent_id) = cloned.parent {
                    sub.region_parent.insert(cloned.id, parent_id);
                }
                sub.regions.insert(cloned.id, cloned);
            }
        }

        sub
    }

    /// Validate that edge port indices are consistent with node type signatures.
    ///
    /// For each edge, checks that:
    /// - The source node's output port index is within its TypeSignature outputs count
    /// - The target node's input port index is within its TypeSignature inputs count
    ///
    /// Nodes without type signatures are skipped.
    pub fn validate_port_types(&self) -> Result<(), Vec<GraphError>> {
        let mut errors = Vec::new();

        for edge in self.edges.values() {
            // Check source port against source node's outputs
            if let Some(source_node) = self.nodes.get(&edge.source.0) {
                if let Some(ref sig) = source_node.type_signature {
                    if edge.source.1 >= sig.outputs.len() {
                        errors.push(GraphError::PortOutOfRange {
                            node: edge.source.0,
                            port: edge.source.1,
                        });
                    }
                }
            }

            // Check target port against target node's inputs
            if let Some(target_node) = self.nodes.get(&edge.target.0) {
                if let Some(ref sig) = target_node.type_signature {
                    if edge.target.1 >= sig.inputs.len() {
                        errors.push(GraphError::PortOutOfRange {
                            node: edge.target.0,
                            port: edge.target.1,
                        });
                    }
                }
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Return the total number of nodes.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Return the total number of edges.
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Return the total number of regions.
    pub fn region_count(&self) -> usize {
        self.regions.len()
    }

    /// Iterate over all nodes.
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    /// Iterate over all edges.
    pub fn edges(&self) -> impl Iterator<Item = &Edge> {
        self.edges.values()
    }

    /// Iterate over all regions.
    pub fn regions(&self) -> impl Iterator<Item = &Region> {
        self.regions.values()
    }

    /// Check if a node kind is allowed to have back-edges (cycles).
    fn is_cycle_exempt(kind: &NodeKind) -> bool {
        matches!(
            kind,
            NodeKind::Iterate | NodeKind::Recurse | NodeKind::Fixpoint
        )
    }

    /// Compute a topological ordering of the nodes.
    ///
    /// Returns an ordered list of node IDs such that for every edge (u, v),
    /// u appears before v in the list. Cycles through Iterate, Recurse, or
    /// Fixpoint nodes are allowed — when the standard algorithm gets stuck
    /// on such a cycle, the exempt node is forced through (treating its
    /// remaining incoming edges as back-edges). Cycles that don't pass
    /// through any exempt node are reported as errors.
    pub fn topological_sort(&self) -> Result<Vec<NodeId>, GraphError> {
        let mut in_degree: HashMap<NodeId, usize> = HashMap::new();
        for id in self.nodes.keys() {
            in_degree.insert(*id, 0);
        }
        for edge in self.edges.values() {
            *in_degree.entry(edge.target.0).or_default() += 1;
        }

        let mut queue: Vec<NodeId> = in_degree
            .iter()
            .filter(|(_, &deg)| deg == 0)
            .map(|(id, _)| *id)
            .collect();
        queue.sort(); // Deterministic ordering

        let mut result = Vec::with_capacity(self.nodes.len());

        loop {
            // Standard Kahn's algorithm pass
            while let Some(node_id) = queue.pop() {
                result.push(node_id);
                for edge_id in self.outgoing_edges(&node_id) {
                    if let Some(edge) = self.edges.get(edge_id) {
                        let target = edge.target.0;
                        if let Some(deg) = in_degree.get_mut(&target) {
                            if *deg > 0 {
                                *deg -= 1;
                                if *deg == 0 {
                                    queue.push(target);
                                }
                            }
                        }
                    }
                }
                queue.sort(); // Keep deterministic
            }

            if result.len() == self.nodes.len() {
                break;
            }

            // Stuck on a cycle. Force one cycle-exempt node through,
            // treating its remaining incoming edges as back-edges.
            let mut exempt_remaining: Vec<NodeId> = in_degree
                .iter()
                .filter(|(_, &deg)| deg > 0)
                .filter(|(id, _)| {
                    self.nodes
                        .get(id)
                        .is_some_and(|n| Self::is_cycle_exempt(&n.kind))
                })
                .map(|(id, _)| *id)
                .collect();
            exempt_remaining.sort(); // Deterministic pick

            if let Some(&exempt_id) = exempt_remaining.first() {
                if let Some(deg) = in_degree.get_mut(&exempt_id) {
                    *deg = 0;
                }
                queue.push(exempt_id);
                queue.sort();
            } else {
                // No exempt node available — genuine cycle error
                let cycle_node = *in_degree
                    .iter()
                    .find(|(_, &deg)| deg > 0)
                    .map(|(id, _)| id)
                    .expect("cycle must involve at least one node");
                return Err(GraphError::CycleDetected(cycle_node));
            }
        }

        Ok(result)
    }

    /// Validate that linear/affine values have the correct number of consumers.
    ///
    /// - `Linear` / `Unique`: exactly 1 consumer
    /// - `Affine`: 0 or 1 consumers
    /// - Others: any count (skip)
    pub fn validate_linearity(&self) -> Result<(), Vec<GraphError>> {
        let mut errors = Vec::new();

        for node in self.nodes.values() {
            let sig = match &node.type_signature {
                Some(s) => s,
                None => continue,
            };

            for (port_idx, output_type) in sig.outputs.iter().enumerate() {
                let lin = match output_type.linearity() {
                    Some(l) => l,
                    None => continue,
                };

                // Count outgoing edges from this (node, port_index) pair
                let consumers = self
                    .outgoing_edges(&node.id)
                    .iter()
                    .filter_map(|eid| self.edges.get(eid))
                    .filter(|e| e.source.0 == node.id && e.source.1 == port_idx)
                    .count();

                match lin {
                    Linearity::Linear | Linearity::Unique => {
                        if consumers != 1 {
                            errors.push(GraphError::LinearityViolation {
                                node: node.id,
                                port: port_idx,
                                kind: lin,
                                consumers,
                            });
                        }
                    }
                    Linearity::Affine => {
                        if consumers > 1 {
                            errors.push(GraphError::LinearityViolation {
                                node: node.id,
                                port: port_idx,
                                kind: lin,
                                consumers,
                            });
                        }
                    }
                    Linearity::Shared | Linearity::Counted | Linearity::Unrestricted => {}
                }
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Validate that each node's declared effects are a superset of its predecessors' effects.
    ///
    /// For each node, gathers effects from all predecessor nodes (via incoming edges).
    /// Verifies that the node's own declared effects are a superset of the union.
    pub fn validate_effects(&self) -> Result<(), Vec<GraphError>> {
        let mut errors = Vec::new();

        for node in self.nodes.values() {
            let node_effects = match &node.contract {
                Some(c) => &c.effects,
                None => continue,
            };

            // Gather effects from all predecessor nodes
            let mut required = EffectSet::empty();
            for edge_id in self.incoming_edges(&node.id) {
                if let Some(edge) = self.edges.get(edge_id) {
                    if let Some(pred_node) = self.nodes.get(&edge.source.0) {
                        if let Some(pred_contract) = &pred_node.contract {
                            required.merge(&pred_contract.effects);
                        }
                    }
                }
            }

            // If required effects are pure, nothing to check
            if required.is_pure() {
                continue;
            }

            // Check that node's declared effects are a superset
            for effect in &required.effects {
                if !node_effects.has_effect(effect) {
                    errors.push(GraphError::EffectViolation {
                        node: node.id,
                        declared: format!("{node_effects}"),
                        required: format!("{required}"),
                    });
                    break; // One error per node is sufficient
                }
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Validate that edge source/target types are compatible.
    ///
    /// Returns any proof obligations generated by refinement subtyping.
    /// Skips edges where either node lacks a TypeSignature.
    pub fn validate_edge_types(&self) -> Result<Vec<ProofObligation>, Vec<GraphError>> {
        let mut errors = Vec::new();
        let mut obligations = Vec::new();

        for edge in self.edges.values() {
            let source_type = self
                .nodes
                .get(&edge.source.0)
                .and_then(|n| n.type_signature.as_ref())
                .and_then(|sig| sig.outputs.get(edge.source.1));

            let target_type = self
                .nodes
                .get(&edge.target.0)
                .and_then(|n| n.type_signature.as_ref())
                .and_then(|sig| sig.inputs.get(edge.target.1));

            let (src_ty, tgt_ty) = match (source_type, target_type) {
                (Some(s), Some(t)) => (s, t),
                _ => continue,
            };

            match types_compatible(src_ty, tgt_ty) {
                Ok(obs) => obligations.extend(obs),
                Err(_) => {
                    errors.push(GraphError::TypeMismatch {
                        edge: edge.id,
                        expected: format!("{tgt_ty}"),
                        found: format!("{src_ty}"),
                    });
                }
            }
        }

        if errors.is_empty() {
            Ok(obligations)
        } else {
            Err(errors)
        }
    }

    /// Validate contracts and generate proof obligations.
    ///
    /// Performs three kinds of obligation generation:
    /// 1. Per-node: calls `contract.generate_obligations()` for each contracted node
    /// 2. Edge-crossing: for edges where both source and target have contracts,
    ///    generates an implication obligation (postcondition => precondition)
    /// 3. Termination: for Iterate/Recurse/Fixpoint nodes, generates a termination obligation
    pub fn validate_contracts(&self) -> Vec<ProofObligation> {
        let mut obligations = Vec::new();

        // A. Per-node obligations
        for node in self.nodes.values() {
            if let Some(ref contract) = node.contract {
                obligations.extend(contract.generate_obligations());
            }
        }

        // B. Edge-crossing obligations
        for edge in self.edges.values() {
            let src_contract = self
                .nodes
                .get(&edge.source.0)
                .and_then(|n| n.contract.as_ref());
            let tgt_contract = self
                .nodes
                .get(&edge.target.0)
                .and_then(|n| n.contract.as_ref());

            if let (Some(src_c), Some(tgt_c)) = (src_contract, tgt_contract) {
                // For each postcondition of source and precondition of target,
                // generate an implication obligation: post => pre
                for post in &src_c.postconditions {
                    for pre in &tgt_c.preconditions {
                        obligations.push(ProofObligation {
                            kind: ObligationKind::Precondition,
                            predicate: Predicate::Implies(
                                Box::new(post.clone()),
                                Box::new(pre.clone()),
                            ),
                            description: "edge-crossing: postcondition of source implies precondition of target".to_string(),
                            status: ProofStatus::Pending,
                            witness: None,
                            waiver: None,
                        });
                    }
                }
            }
        }

        // C. Termination obligations
        for node in self.nodes.values() {
            if matches!(
                node.kind,
                NodeKind::Iterate | NodeKind::Recurse | NodeKind::Fixpoint
            ) {
                obligations.push(ProofObligation {
                    kind: ObligationKind::Termination,
                    predicate: Predicate::BoolLit(true),
                    description: format!("{} node must terminate", node.kind),
                    status: ProofStatus::Pending,
                    witness: None,
                    waiver: None,
                });
            }
        }

        obligations
    }

    /// Run all type-related validation checks.
    ///
    /// Combines consistency (edge type compatibility), linearity validation,
    /// effect propagation checks, and contract validation. Returns proof
    /// obligations from refinement subtyping and contract generation.
    /// Structural validation (`validate()`) should be run separately.
    pub fn validate_types(&self) -> Result<Vec<ProofObligation>, Vec<GraphError>> {
        let mut all_errors = Vec::new();
        let mut all_obligations = Vec::new();

        if let Err(errs) = self.validate_linearity() {
            all_errors.extend(errs);
        }

        if let Err(errs) = self.validate_effects() {
            all_errors.extend(errs);
        }

        match self.validate_edge_types() {
            Ok(obs) => all_obligations.extend(obs),
            Err(errs) => all_errors.extend(errs),
        }

        all_obligations.extend(self.validate_contracts());

        if all_errors.is_empty() {
            Ok(all_obligations)
        } else {
            Err(all_errors)
        }
    }

    /// Merge another graph into this one.
    ///
    /// All node, edge, and region IDs in `other` must be disjoint from `self`.
    /// Returns `MergeConflict` if any ID collides. On success, all nodes, edges,
    /// regions, and indexes from `other` are copied into `self`.
    pub fn merge(&mut self, other: &Graph) -> Result<(), GraphError> {
        // Conflict check — scan all IDs before mutating
        for id in other.nodes.keys() {
            if self.nodes.contains_key(id) {
                return Err(GraphError::MergeConflict {
                    kind: "node".to_string(),
                    id: *id,
                });
            }
        }
        for id in other.edges.keys() {
            if self.edges.contains_key(id) {
                return Err(GraphError::MergeConflict {
                    kind: "edge".to_string(),
                    id: *id,
                });
            }
        }
        for id in other.regions.keys() {
            if self.regions.contains_key(id) {
                return Err(GraphError::MergeConflict {
                    kind: "region".to_string(),
                    id: *id,
                });
            }
        }

        // Copy data
        for (id, node) in &other.nodes {
            self.nodes.insert(*id, node.clone());
        }
        for (id, edge) in &other.edges {
            self.edges.insert(*id, edge.clone());
        }
        for (id, region) in &other.regions {
            self.regions.insert(*id, region.clone());
        }

        // Merge indexes
        for (id, edges) in &other.outgoing {
            self.outgoing.entry(*id).or_default().extend(edges);
        }
        for (id, edges) in &other.incoming {
            self.incoming.entry(*id).or_default().extend(edges);
        }
        for (id, children) in &other.region_children {
            self.region_children.entry(*id).or_default().extend(children);
        }
        for (node_id, region_id) in &other.node_region {
            self.node_region.insert(*node_id, *region_id);
        }
        for (child_id, parent_id) in &other.region_parent {
            self.region_parent.insert(*child_id, *parent_id);
        }

        Ok(())
    }

    /// Remove an edge from the graph.
    ///
    /// Removes the edge from the `edges` map and from the source/target
    /// outgoing/incoming index lists.
    pub fn remove_edge(&mut self, id: EdgeId) -> Result<(), GraphError> {
        let edge = self.edges.remove(&id).ok_or(GraphError::EdgeNotFound(id))?;
        if let Some(list) = self.outgoing.get_mut(&edge.source.0) {
            list.retain(|&eid| eid != id);
        }
        if let Some(list) = self.incoming.get_mut(&edge.target.0) {
            list.retain(|&eid| eid != id);
        }
        Ok(())
    }

    /// Remove a node and all its connected edges from the graph.
    ///
    /// Also removes the node from its containing region if any.
    pub fn remove_node(&mut self, id: NodeId) -> Result<(), GraphError> {
        if !self.nodes.contains_key(&id) {
            return Err(GraphError::NodeNotFound(id));
        }

        // Collect all connected edge IDs
        let out_edges: Vec<EdgeId> = self.outgoing.get(&id).cloned().unwrap_or_default();
        let in_edges: Vec<EdgeId> = self.incoming.get(&id).cloned().unwrap_or_default();

        // Remove each edge (cleans up the other endpoint's index)
        for eid in out_edges {
            // Remove from edges map and target's incoming list
            if let Some(edge) = self.edges.remove(&eid) {
                if let Some(list) = self.incoming.get_mut(&edge.target.0) {
                    list.retain(|&e| e != eid);
                }
            }
        }
        for eid in in_edges {
            if let Some(edge) = self.edges.remove(&eid) {
                if let Some(list) = self.outgoing.get_mut(&edge.source.0) {
                    list.retain(|&e| e != eid);
                }
            }
        }

        // Remove from indexes
        self.outgoing.remove(&id);
        self.incoming.remove(&id);

        // Remove from region membership
        if let Some(region_id) = self.node_region.remove(&id) {
            if let Some(children) = self.region_children.get_mut(&region_id) {
                children.retain(|&nid| nid != id);
            }
            if let Some(region) = self.regions.get_mut(&region_id) {
                region.children.retain(|&nid| nid != id);
            }
        }

        self.nodes.remove(&id);
        Ok(())
    }

    /// Remove a region from the graph.
    ///
    /// Child nodes become regionless. Child sub-regions lose their parent.
    pub fn remove_region(&mut self, id: RegionId) -> Result<(), GraphError> {
        if !self.regions.contains_key(&id) {
            return Err(GraphError::RegionNotFound(id));
        }

        // Clear node_region for child nodes
        if let Some(children) = self.region_children.remove(&id) {
            for child_id in children {
                self.node_region.remove(&child_id);
            }
        }

        // Child sub-regions whose parent is this region: clear parent
        let child_region_ids: Vec<RegionId> = self
            .region_parent
            .iter()
            .filter(|(_, &parent)| parent == id)
            .map(|(&child, _)| child)
            .collect();
        for child_rid in child_region_ids {
            self.region_parent.remove(&child_rid);
            if let Some(region) = self.regions.get_mut(&child_rid) {
                region.parent = None;
            }
        }

        // If this region has a parent, remove from region_parent index
        self.region_parent.remove(&id);

        self.regions.remove(&id);
        Ok(())
    }

    /// Flatten a region into its parent.
    ///
    /// Child nodes and sub-regions are promoted to the parent region (if any),
    /// or become regionless (if the inlined region has no parent).
    /// Edges between inlined nodes are preserved.
    pub fn inline_region(&mut self, id: RegionId) -> Result<(), GraphError> {
        let region = self
            .regions
            .get(&id)
            .ok_or(GraphError::RegionNotFound(id))?;
        let children = region.children.clone();
        let parent = region.parent;

        // Collect child sub-regions whose parent is this region
        let child_sub_regions: Vec<RegionId> = self
            .region_parent
            .iter()
            .filter(|(_, &p)| p == id)
            .map(|(&c, _)| c)
            .collect();

        if let Some(parent_id) = parent {
            // Promote children to parent region
            for &child_id in &children {
                self.node_region.insert(child_id, parent_id);
                if let Some(parent_children) = self.region_children.get_mut(&parent_id) {
                    parent_children.push(child_id);
                }
                if let Some(parent_region) = self.regions.get_mut(&parent_id) {
                    parent_region.children.push(child_id);
                }
            }
            // Reparent child sub-regions to parent
            for child_rid in &child_sub_regions {
                self.region_parent.insert(*child_rid, parent_id);
                if let Some(region) = self.regions.get_mut(child_rid) {
                    region.parent = Some(parent_id);
                }
            }
        } else {
            // No parent: children become regionless
            for &child_id in &children {
                self.node_region.remove(&child_id);
            }
            // Sub-regions lose their parent
            for child_rid in &child_sub_regions {
                self.region_parent.remove(child_rid);
                if let Some(region) = self.regions.get_mut(child_rid) {
                    region.parent = None;
                }
            }
        }

        // Remove the inlined region itself
        self.region_children.remove(&id);
        self.region_parent.remove(&id);
        self.regions.remove(&id);
        Ok(())
    }

    /// Merge another graph into this one and create edges between specified port pairs.
    ///
    /// Each connection specifies `((src_node, src_port), (dst_node, dst_port))`.
    /// The source and target nodes may come from either graph.
    pub fn compose(
        &mut self,
        other: &Graph,
        connections: &[(edge::PortRef, edge::PortRef)],
    ) -> Result<(), GraphError> {
        self.merge(other)?;
        for &((src_node, src_port), (dst_node, dst_port)) in connections {
            let edge = Edge::new((src_node, src_port), (dst_node, dst_port));
            self.add_edge(edge)?;
        }
        Ok(())
    }

    /// Extract a module (subgraph with boundary information) for the given nodes.
    ///
    /// Returns the internal subgraph plus lists of boundary edges
    /// that cross the module boundary.
    pub fn extract_module(&self, node_ids: &HashSet<NodeId>) -> ModuleInterface {
        let graph = self.extract_subgraph(node_ids);

        let mut inputs = Vec::new();
        let mut outputs = Vec::new();

        for edge in self.edges.values() {
            let src_in = node_ids.contains(&edge.source.0);
            let tgt_in = node_ids.contains(&edge.target.0);

            match (src_in, tgt_in) {
                (true, false) => {
                    // Source inside, target outside → output
                    outputs.push(BoundaryEdge {
                        internal_node: edge.source.0,
                        internal_port: edge.source.1,
                        external_node: edge.target.0,
                        external_port: edge.target.1,
                        data_type: edge.data_type.clone(),
                        direction: BoundaryDirection::Out,
                    });
                }
                (false, true) => {
                    // Source outside, target inside → input
                    inputs.push(BoundaryEdge {
                        internal_node: edge.target.0,
                        internal_port: edge.target.1,
                        external_node: edge.source.0,
                        external_port: edge.source.1,
                        data_type: edge.data_type.clone(),
                        direction: BoundaryDirection::In,
                    });
                }
                _ => {} // Both inside or both outside — skip
            }
        }

        ModuleInterface {
            graph,
            inputs,
            outputs,
        }
    }

    /// Replace a set of nodes with a replacement graph, reconnecting boundary edges.
    ///
    /// `port_map` maps `(old_node, port)` → `(new_node, port)` for each boundary
    /// edge endpoint that falls within `old_nodes`.
    pub fn replace_subgraph(
        &mut self,
        old_nodes: &HashSet<NodeId>,
        replacement: &Graph,
        port_map: &HashMap<(NodeId, usize), (NodeId, usize)>,
    ) -> Result<(), GraphError> {
        // 1. Collect boundary edge descriptors before removing anything
        struct BoundaryDescriptor {
            external_endpoint: (NodeId, usize),
            internal_is_source: bool,
            new_endpoint: (NodeId, usize),
            data_type: Option<Type>,
            lifetime: Lifetime,
            bandwidth: Option<BandwidthConstraint>,
        }

        let mut descriptors = Vec::new();

        for edge in self.edges.values() {
            let src_in = old_nodes.contains(&edge.source.0);
            let tgt_in = old_nodes.contains(&edge.target.0);

            match (src_in, tgt_in) {
                (true, false) => {
                    // Source is internal, target is external
                    let new_ep = port_map
                        .get(&(edge.source.0, edge.source.1))
                        .ok_or(GraphError::UnmappedBoundaryPort {
                            node: edge.source.0,
                            port: edge.source.1,
                        })?;
                    descriptors.push(BoundaryDescriptor {
                        external_endpoint: edge.target,
                        internal_is_source: true,
                        new_endpoint: *new_ep,
                        data_type: edge.data_type.clone(),
                        lifetime: edge.lifetime.clone(),
                        bandwidth: edge.bandwidth.clone(),
                    });
                }
                (false, true) => {
                    // Target is internal, source is external
                    let new_ep = port_map
                        .get(&(edge.target.0, edge.target.1))
                        .ok_or(GraphError::UnmappedBoundaryPort {
                            node: edge.target.0,
                            port: edge.target.1,
                        })?;
                    descriptors.push(BoundaryDescriptor {
                        external_endpoint: edge.source,
                        internal_is_source: false,
                        new_endpoint: *new_ep,
                        data_type: edge.data_type.clone(),
                        lifetime: edge.lifetime.clone(),
                        bandwidth: edge.bandwidth.clone(),
                    });
                }
                _ => {} // Both inside or both outside
            }
        }

        // 2. Validate that all mapped endpoints exist in the replacement graph
        for desc in &descriptors {
            if !replacement.nodes.contains_key(&desc.new_endpoint.0) {
                return Err(GraphError::NodeNotFound(desc.new_endpoint.0));
            }
        }

        // 3. Remove old nodes (this removes their edges and region membership)
        let old_node_ids: Vec<NodeId> = old_nodes.iter().copied().collect();
        for id in &old_node_ids {
            self.remove_node(*id)?;
        }

        // 4. Merge replacement
        self.merge(replacement)?;

        // 5. Recreate boundary edges
        for desc in descriptors {
            let mut new_edge = if desc.internal_is_source {
                Edge::new(desc.new_endpoint, desc.external_endpoint)
            } else {
                Edge::new(desc.external_endpoint, desc.new_endpoint)
            };
            new_edge.data_type = desc.data_type;
            new_edge.lifetime = desc.lifetime;
            new_edge.bandwidth = desc.bandwidth;
            self.add_edge(new_edge)?;
        }

        Ok(())
    }

    /// Validate graph well-formedness.
    ///
    /// Checks:
    /// - No dangling edges (source and target nodes exist)
    /// - Region containment consistency
    /// - Port index validity against type signatures
    /// - Parent region existence
    pub fn validate(&self) -> Result<(), Vec<GraphError>> {
        let mut errors = Vec::new();

        // Check for dangling edges
        for edge in self.edges.values() {
            if !self.nodes.contains_key(&edge.source.0) || !self.nodes.contains_key(&edge.target.0)
            {
                errors.push(GraphError::DanglingEdge {
                    src: edge.source.0,
                    dst: edge.target.0,
                });
            }
        }

        // Check region containment consistency
        for region in self.regions.values() {
            for child_id in &region.children {
                if !self.nodes.contains_key(child_id) {
                    errors.push(GraphError::RegionContainment {
                        child: *child_id,
                        region: region.id,
                    });
                }
            }
        }

        // Check port indices against type signatures
        if let Err(port_errors) = self.validate_port_types() {
            errors.extend(port_errors);
        }

        // Check parent region existence
        for region in self.regions.values() {
            if let Some(parent_id) = region.parent {
                if !self.regions.contains_key(&parent_id) {
                    errors.push(GraphError::RegionNotFound(parent_id));
                }
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

impl Default for Graph {
    fn default() -> Self {
        Self::new()
    }
}

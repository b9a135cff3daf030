use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::graph::builder::DependencyGraph;

/// Node-link payload consumed by the prerequisite-tree visualization.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SubgraphPayload {
    pub nodes: Vec<GraphNode>,
    pub links: Vec<GraphLink>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphNode {
    pub id: String,
    pub description: String,
    pub prerequisites: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphLink {
    pub source: String,
    pub target: String,
}

/// Full prerequisite closure of `course_id`: every course transitively
/// required before it. Cycle-safe by the visited check; bad source data can
/// produce cycles and must not hang the traversal. The course itself is not
/// a member unless a cycle leads back to it.
pub fn ancestors(graph: &DependencyGraph, course_id: &str) -> HashSet<String> {
    let mut visited: HashSet<String> = HashSet::new();
    let mut stack: Vec<String> = graph
        .direct_prerequisites(course_id)
        .into_iter()
        .map(str::to_string)
        .collect();

    while let Some(id) = stack.pop() {
        if !visited.insert(id.clone()) {
            continue;
        }
        for parent in graph.direct_prerequisites(&id) {
            if !visited.contains(parent) {
                stack.push(parent.to_string());
            }
        }
    }
    visited
}

/// Rendering subgraph for `course_id`: all edges among its ancestors, edges
/// from ancestors into the course, and the course's direct outgoing edges.
/// One hop forward only; the forward closure is intentionally not computed.
pub fn subgraph(graph: &DependencyGraph, course_id: &str) -> SubgraphPayload {
    if !graph.contains(course_id) {
        warn!(course_id, "subgraph requested for unknown course");
        return SubgraphPayload::default();
    }

    let ancestor_ids = ancestors(graph, course_id);

    let mut links: Vec<GraphLink> = Vec::new();
    for (source, target) in graph.edges() {
        let among_ancestors =
            ancestor_ids.contains(source) && ancestor_ids.contains(target);
        let into_course = ancestor_ids.contains(source) && target == course_id;
        let out_of_course = source == course_id;
        if among_ancestors || into_course || out_of_course {
            links.push(GraphLink {
                source: source.to_string(),
                target: target.to_string(),
            });
        }
    }

    payload_from_links(graph, course_id, links)
}

/// One-hop variant: only edges directly touching `course_id`.
pub fn neighbors(graph: &DependencyGraph, course_id: &str) -> SubgraphPayload {
    if !graph.contains(course_id) {
        warn!(course_id, "neighbors requested for unknown course");
        return SubgraphPayload::default();
    }

    let links: Vec<GraphLink> = graph
        .edges()
        .filter(|(source, target)| *source == course_id || *target == course_id)
        .map(|(source, target)| GraphLink {
            source: source.to_string(),
            target: target.to_string(),
        })
        .collect();

    payload_from_links(graph, course_id, links)
}

fn payload_from_links(
    graph: &DependencyGraph,
    course_id: &str,
    links: Vec<GraphLink>,
) -> SubgraphPayload {
    let mut node_ids: HashSet<&str> = HashSet::new();
    node_ids.insert(course_id);
    for link in &links {
        node_ids.insert(&link.source);
        node_ids.insert(&link.target);
    }

    // Catalog order, so payloads are stable across calls.
    let nodes = graph
        .node_ids()
        .filter(|id| node_ids.contains(id))
        .filter_map(|id| graph.node(id))
        .map(|n| GraphNode {
            id: n.id.clone(),
            description: n.description.clone(),
            prerequisites: n.prerequisites.clone(),
        })
        .collect();

    SubgraphPayload { nodes, links }
}

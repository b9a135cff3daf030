use std::collections::HashMap;

use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::Direction;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::catalog::Catalog;
use crate::graph::parser::prerequisite_edges;

/// Node payload carried into visualization output. For codes referenced by
/// a requirement string but absent from the catalog, description and
/// prerequisites stay empty; the node still exists so traversal never loses
/// an edge endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CourseNode {
    pub id: String,
    pub description: String,
    pub prerequisites: String,
}

/// Directed prerequisite graph: an edge runs from a prerequisite to each
/// course that requires it. Forward and reverse adjacency both come from
/// the underlying petgraph structure in O(degree).
#[derive(Debug, Clone)]
pub struct DependencyGraph {
    graph: DiGraph<CourseNode, ()>,
    index: HashMap<String, NodeIndex>,
}

impl DependencyGraph {
    /// Builds the graph from every catalog course's requirement string.
    /// Courses without edges still become nodes.
    pub fn build(catalog: &Catalog) -> Self {
        let mut builder = Self {
            graph: DiGraph::new(),
            index: HashMap::new(),
        };

        for course in catalog.iter() {
            builder.intern(&course.title, catalog);
        }

        for course in catalog.iter() {
            for (source, target) in prerequisite_edges(&course.prerequisites, &course.title) {
                let s = builder.intern(&source, catalog);
                let t = builder.intern(&target, catalog);
                // A code can appear twice in one requirement string (as an
                // AND clause and again inside an OR group); keep one edge.
                if builder.graph.find_edge(s, t).is_none() {
                    builder.graph.add_edge(s, t, ());
                }
            }
        }

        info!(
            nodes = builder.graph.node_count(),
            edges = builder.graph.edge_count(),
            "built prerequisite graph"
        );
        builder
    }

    fn intern(&mut self, id: &str, catalog: &Catalog) -> NodeIndex {
        if let Some(&idx) = self.index.get(id) {
            return idx;
        }
        let node = match catalog.get(id) {
            Some(course) => CourseNode {
                id: course.title.clone(),
                description: course.description.clone(),
                prerequisites: course.prerequisites.clone(),
            },
            None => CourseNode {
                id: id.to_string(),
                description: String::new(),
                prerequisites: String::new(),
            },
        };
        let idx = self.graph.add_node(node);
        self.index.insert(id.to_string(), idx);
        idx
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    pub fn node(&self, id: &str) -> Option<&CourseNode> {
        self.index.get(id).map(|&idx| &self.graph[idx])
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn node_ids(&self) -> impl Iterator<Item = &str> {
        self.graph.node_weights().map(|n| n.id.as_str())
    }

    /// Direct prerequisites of `id` (reverse adjacency).
    pub fn direct_prerequisites(&self, id: &str) -> Vec<&str> {
        self.adjacent(id, Direction::Incoming)
    }

    /// Courses that list `id` as a prerequisite (forward adjacency).
    pub fn dependents(&self, id: &str) -> Vec<&str> {
        self.adjacent(id, Direction::Outgoing)
    }

    fn adjacent(&self, id: &str, dir: Direction) -> Vec<&str> {
        let Some(&idx) = self.index.get(id) else {
            return Vec::new();
        };
        self.graph
            .neighbors_directed(idx, dir)
            .map(|n| self.graph[n].id.as_str())
            .collect()
    }

    /// All (source, target) pairs in the graph.
    pub fn edges(&self) -> impl Iterator<Item = (&str, &str)> {
        self.graph.edge_indices().filter_map(move |e| {
            let (s, t) = self.graph.edge_endpoints(e)?;
            Some((self.graph[s].id.as_str(), self.graph[t].id.as_str()))
        })
    }
}

pub mod ancestry;
pub mod builder;
pub mod parser;

pub use ancestry::{ancestors, neighbors, subgraph, GraphLink, GraphNode, SubgraphPayload};
pub use builder::{CourseNode, DependencyGraph};
pub use parser::{parse_prerequisites, prerequisite_edges, PrereqClause, COURSE_CODE};

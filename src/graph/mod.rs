//! Core graph data structures

mod edge;
mod node;
mod store;
mod table;


pub use edge::{Direction, Edge, EdgeId};
pub use node::{Node, NodeId, Properties, PropertyValue};
pub use store::{EntityRef, GraphError, GraphResult, GraphStore, StoreMetadata};

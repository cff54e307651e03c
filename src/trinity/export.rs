//! Plain record dump of all three stores

use super::Trinity;
use crate::graph::{Edge, GraphStore, Node};
use serde::Serialize;

/// Every node and edge of one store, in insertion order
#[derive(Debug, Clone, Serialize)]
pub struct StoreDump<'a> {
    pub nodes: Vec<&'a Node>,
    pub edges: Vec<&'a Edge>,
}

impl<'a> StoreDump<'a> {
    pub fn of(store: &'a GraphStore) -> Self {
        Self {
            nodes: store.nodes().collect(),
            edges: store.edges().collect(),
        }
    }
}

/// Dumps grouped by store name
#[derive(Debug, Clone, Serialize)]
pub struct KnowledgeExport<'a> {
    pub ontological: StoreDump<'a>,
    pub instance: StoreDump<'a>,
    pub context: StoreDump<'a>,
}

impl Trinity {
    pub fn export(&self) -> KnowledgeExport<'_> {
        KnowledgeExport {
            ontological: StoreDump::of(self.ontological()),
            instance: StoreDump::of(self.instance()),
            context: StoreDump::of(self.context()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::Properties;
    use serde_json::json;

    #[test]
    fn test_export_groups_records_by_store() {
        let mut trinity = Trinity::new("Library");
        trinity.ontological_mut().add_concept("Person", Properties::new());
        trinity.ontological_mut().add_concept("Author", Properties::new());
        trinity.ontological_mut().define_is_a("Author", "Person");
        trinity.instance_mut().add_entity("hamlet", "Book", Properties::new());
        trinity
            .context_mut()
            .add_spatial_context("europe", "Europe", Properties::new());

        let export = serde_json::to_value(trinity.export()).unwrap();
        assert_eq!(export["ontological"]["nodes"].as_array().unwrap().len(), 2);
        assert_eq!(
            export["ontological"]["edges"][0],
            json!({
                "id": "Author_ISA_Person",
                "source": "Author",
                "target": "Person",
                "type": "IS_A",
                "properties": {}
            })
        );
        assert_eq!(
            export["instance"]["nodes"][0],
            json!({"id": "hamlet", "type": "Entity", "properties": {"conceptId": "Book"}})
        );
        assert!(export["instance"]["edges"].as_array().unwrap().is_empty());
        assert_eq!(export["context"]["nodes"][0]["properties"]["location"], "Europe");
    }
}

//! Index consistency checks

use tkg::index::{build_index, IndexSnapshot};
use tkg::GraphStore;

/// Snapshot the named index would have if rebuilt from the store's
/// current contents
pub fn rebuilt_snapshot(store: &GraphStore, name: &str) -> IndexSnapshot {
    let index = store.index(name).expect("index exists");
    let paths: Vec<String> = index.paths().iter().map(|p| p.to_string()).collect();
    let mut fresh = build_index(index.kind(), paths.as_slice()).expect("paths were valid once");
    store.nodes().for_each(|n| fresh.add_node(n));
    store.edges().for_each(|e| fresh.add_edge(e));
    fresh.snapshot()
}

/// Every index of the store matches a from-scratch rebuild
pub fn assert_indexes_consistent(store: &GraphStore) {
    let names: Vec<String> = store.index_names().map(str::to_string).collect();
    for name in names {
        let live = store.index(&name).expect("listed index exists").snapshot();
        assert_eq!(live, rebuilt_snapshot(store, &name), "index {} drifted", name);
    }
}

//! Secondary indexes for graph stores
//!
//! Stores host any number of named indexes through the `GraphIndex` trait.
//! Two variants ship: `HashIndex` (value buckets) and `OrderedIndex`
//! (buckets plus a sorted key list for range lookups).

mod hash;
mod key;
mod ordered;
mod path;
mod traits;

pub use hash::HashIndex;
pub use key::IndexKey;
pub use ordered::OrderedIndex;
pub use path::{parse_paths, IndexPath, IndexTarget};
pub use traits::{GraphIndex, IndexError, IndexKind, IndexResult, IndexSnapshot};

/// Build an empty index of the given kind over the given paths
pub fn build_index<S: AsRef<str>>(kind: IndexKind, paths: &[S]) -> IndexResult<Box<dyn GraphIndex>> {
    let (target, paths) = parse_paths(paths)?;
    Ok(match kind {
        IndexKind::Hash => Box::new(HashIndex::new(target, paths)),
        IndexKind::Ordered => Box::new(OrderedIndex::new(target, paths)),
    })
}

pub mod ordered;

pub use ordered::OrderedMap;

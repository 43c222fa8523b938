pub mod store;

pub use store::ModelStore;

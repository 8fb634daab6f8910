pub mod collection;
pub mod dao;

pub use collection::{
    Document, DocumentCollection, Keyspace, SharedCollection, StoreError,
};

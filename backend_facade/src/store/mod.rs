mod facade;
mod memory;
mod mongo;
mod types;

pub use facade::StoreFacade;
pub use memory::InMemoryDocumentStore;
pub use mongo::MongoDocumentStore;
pub use types::{Collection, DocumentStore};

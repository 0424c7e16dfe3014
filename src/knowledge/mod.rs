//! Local question/answer service backing the semantic lookup.

pub mod index;
pub mod server;

pub use index::{KnowledgeBase, QaPair, SearchResult};
pub use server::knowledge_routes;

//! CLI command implementations.

mod ask;
mod chat;
mod chunk;
mod config;
mod index;
mod search;
mod serve;

pub use ask::run_ask;
pub use chat::run_chat;
pub use chunk::run_chunk;
pub use config::run_config;
pub use index::run_index;
pub use search::run_search;
pub use serve::run_serve;

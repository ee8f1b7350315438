pub mod archive;
pub mod config;
pub mod enrich;
pub mod registry;
pub mod table;

pub use archive::NetworkYear;
pub use config::Config;
pub use enrich::{enrich, run, EnrichSummary};
pub use registry::{Lookup, RegistryEntry};
pub use table::{DoiTable, OutputRow};

pub mod error;
pub mod provider;
pub mod audit;

pub use error::{CatalogError, CatalogResult};
pub use provider::{find_entry, CatalogProvider, DirectoryCatalog};
pub use audit::{audit, validate, ArmyReport, CatalogIssue};

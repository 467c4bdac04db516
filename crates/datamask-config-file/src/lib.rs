//! Rule catalogs for DataMask
//!
//! This crate implements the `RuleStore` trait twice: once over a YAML or
//! TOML file on disk and once purely in memory.
//!
//! # Features
//! - File-based rule storage, YAML or TOML by extension
//! - Real-time file watching with `notify`
//! - Uniqueness validation of active rules on load and on save
//!
//! # Example
//! ```no_run
//! # use datamask_config_file::FileRuleStore;
//! # use datamask_core::{PiiType, RuleStore};
//! # async fn example() -> datamask_core::Result<()> {
//! let store = FileRuleStore::new("~/.datamask/rules.yaml").await?;
//! let rule = store.find_active_by_pii_type(PiiType::Email).await?;
//! # Ok(())
//! # }
//! ```

mod catalog;
mod file_store;
mod memory_store;

pub use catalog::{CatalogFormat, RuleCatalog};
pub use file_store::FileRuleStore;
pub use memory_store::MemoryRuleStore;

//! Configuration management
//!
//! Two optional layers, both named `addonpack.toml`:
//! - Global: `<config dir>/addonpack/addonpack.toml`
//! - Project: next to the add-on's manifest

pub mod merge;
pub mod parser;
pub mod paths;
pub mod schema;
pub mod store;

pub use merge::merge_configs;
pub use parser::{parse_pack_toml, parse_pack_toml_str, to_toml};
pub use paths::{CONFIG_FILE_NAME, global_config_dir};
pub use schema::{BuildSection, BuildSettings, PackConfig, SyncSection, SyncSettings};
pub use store::ConfigStore;

//! Deterministic obfuscation engine for logs and documents.
//!
//! This crate rewrites personally identifying values (addresses, names,
//! identifiers, dates and numbers) so that logs and diagnostic documents can
//! be shared without exposing the data they describe.
//!
//! # Key Features
//!
//! - **Consistent**: one engine maps the same input to the same substitute
//!   for the whole session, so correlations survive across lines.
//! - **Format-preserving**: an SSN stays `DDD-DD-DDDD`, a MAC keeps its
//!   vendor prefix and separator, a phone keeps its punctuation.
//! - **Deterministic**: substitutes come from hashes of the original value,
//!   never from randomness.
//! - **Exportable**: the mappings can be saved as JSON and restored later.
//!
//! # Example
//!
//! ```no_run
//! use lv_obfuscate::{Obfuscator, ObfuscatorConfig};
//!
//! let mut engine = Obfuscator::new(ObfuscatorConfig::default()).unwrap();
//!
//! let line = engine.obfuscate_string("login from 192.168.1.100 by user@example.com");
//! assert!(!line.contains("user@example.com"));
//! assert_eq!(
//!     engine.obfuscate_string("login from 192.168.1.100 by user@example.com"),
//!     line
//! );
//! ```

pub mod config;
pub mod engine;
pub mod error;
pub mod hash;
pub mod names;
pub mod patterns;
pub mod shared;
pub mod store;
pub mod value;

pub use config::{IpStyle, NameStyle, ObfuscatorConfig};
pub use engine::Obfuscator;
pub use error::{ObfuscateError, Result};
pub use shared::SharedObfuscator;
pub use store::{Category, ConsistencyStore, Mappings, MAPPINGS_SCHEMA_VERSION};
pub use value::{Mapping, Value};

//! Scripting adapter
//!
//! Translates between the host's automation parameter records and
//! [`ExportOptions`](crate::options::ExportOptions).
//!
//! # Example
//!
//! ```ignore
//! use exrport_lib::options::ExportSession;
//! use exrport_lib::scripting::{read_script_params, write_script_params, RecordSuite};
//!
//! let mut suite = RecordSuite::from_bytes(&record_bytes)?;
//! let mut session = ExportSession::default();
//! let show_dialog = read_script_params(&mut suite, &mut session)?;
//! // ... dialog, export ...
//! write_script_params(&mut suite, &session)?;
//! ```

pub mod descriptor;
pub mod error;
mod host;
pub mod keys;
mod params;

pub use descriptor::{ActionDescriptor, DescriptorValue};
pub use error::HostError;
pub use host::{DescriptorReader, DescriptorWriter, RecordSuite, ScriptingSuite};
pub use params::{read_script_params, write_script_params};

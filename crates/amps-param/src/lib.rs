//! amps-param: the `AMPS_PARAM.in` file format.
//!
//! - `render`: configuration -> param file text
//! - `document`: param file text -> ordered sections of key/value entries
//! - `import`: document -> configuration
//! - `manifest`: submission manifest for a rendered file

pub mod document;
pub mod error;
pub mod import;
pub mod manifest;
pub mod render;
pub mod sections;

pub use document::{ParamDocument, ParamEntry, ParamSection};
pub use error::{ParamError, ParamResult};
pub use import::import_config;
pub use manifest::{CheckSummary, SpeciesSummary, SubmissionManifest, build_manifest, param_digest};
pub use render::{PARAM_FILE_NAME, render_param_file};

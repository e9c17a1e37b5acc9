//! Shared application layer for the AMPS parameter wizard.
//!
//! Holds the wizard session reducer and the service functions the CLI
//! calls: snapshot persistence, param file rendering, submission and
//! import.

pub mod error;
pub mod query;
pub mod session;
pub mod session_service;

pub use error::{AppError, AppResult};
pub use query::{
    BoundaryProfile, FieldRow, ShueSource, boundary_profile, field_rows, spectrum_profile,
};
pub use session::{ApplyOutcome, ConstraintNote, Edit, EditStatus, WizardSession};
pub use session_service::{
    MANIFEST_FILE_NAME, Submission, SubmissionFiles, import_param_file, load_session,
    prepare_submission, render, save_session, write_submission,
};

//! Admin form behaviour that accompanies the table synchroniser.
//!
//! Both helpers compute what the page should do; the browser binding applies
//! the result to the DOM.

pub mod permissions;
pub mod upload;

pub use permissions::PermissionFields;
pub use upload::{DroppedFile, UploadEffect, UploadForm};

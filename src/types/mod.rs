// ABOUTME: Validated domain types shared by config, build and deploy.
// ABOUTME: Image references and helm release names.

mod image_ref;
mod release_name;

pub use image_ref::{ImageRef, ParseImageRefError};
pub use release_name::{ReleaseName, ReleaseNameError};

//! Utility modules

pub mod file_validation;

pub use file_validation::{
    filename_for_display, has_document_extension, read_document, validate_file_for_opening,
    FileOpenError, MAX_FILE_SIZE,
};

//! Routing of dropped and selected files into project and batch forms.
//!
//! Batch forms take a CSV file through a regular file input. Project forms
//! take an HTML template whose text is copied into a form field and then
//! validated, with the file name kept in a hidden field.

use crate::sync::Page;

/// File input on the batch form.
pub const CSV_FILE_INPUT: &str = "#id_csv_file";
/// Label showing the chosen CSV file name.
pub const CSV_FILE_LABEL: &str = "#id_csv_file_custom_text";
/// File input for the project's HTML template.
pub const TEMPLATE_FILE_INPUT: &str = "#id_template_file_upload";
/// Label showing the chosen template file name.
pub const TEMPLATE_FILE_LABEL: &str = "#id_template_file_upload_custom_text";
/// Field receiving the template's text.
pub const HTML_TEMPLATE_FIELD: &str = "#id_html_template";
/// Hidden field receiving the template's file name.
pub const FILENAME_FIELD: &str = "#id_filename";

/// Validation triggered once template text has been copied in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TemplateValidation {
    /// Form to validate.
    pub form: &'static str,
    /// Validation group covering the template field.
    pub group: &'static str,
    /// Success class applied while validating, so a passing template is not
    /// highlighted.
    pub success_class: &'static str,
}

/// Validation request for freshly loaded template text.
pub const TEMPLATE_VALIDATION: TemplateValidation = TemplateValidation {
    form: "#project_form",
    group: "html_template",
    success_class: "invisible-success",
};

/// The kind of form a file was dropped on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadForm {
    /// Batch form with a CSV file input.
    Batch,
    /// Project form with an HTML template field.
    Project,
}

impl UploadForm {
    /// Detects the form from the elements present on `page`.
    #[must_use]
    pub fn detect(page: &impl Page) -> Self {
        if page.contains(CSV_FILE_INPUT) {
            Self::Batch
        } else {
            Self::Project
        }
    }
}

/// A file offered by a drop or a file input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DroppedFile {
    name: String,
}

impl DroppedFile {
    /// Describes a file by name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    /// Returns the file name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}

/// What the page should do with an offered file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadEffect {
    /// A CSV file was chosen for a batch.
    CsvSelected {
        /// Name shown in the CSV label.
        label: String,
        /// The dropped files must be assigned to the CSV input.
        assign_files: bool,
    },
    /// A template file must be read as text into the template field.
    ReadTemplate {
        /// Name written to the label and the hidden file-name field.
        file_name: String,
        /// The file input must be cleared so the same file can be chosen
        /// again.
        reset_input: bool,
    },
}

impl UploadEffect {
    /// Returns the label and field writes to apply immediately.
    #[must_use]
    pub fn field_updates(&self) -> Vec<(&'static str, &str)> {
        match self {
            Self::CsvSelected { label, .. } => vec![(CSV_FILE_LABEL, label.as_str())],
            Self::ReadTemplate { file_name, .. } => vec![
                (TEMPLATE_FILE_LABEL, file_name.as_str()),
                (FILENAME_FIELD, file_name.as_str()),
            ],
        }
    }
}

/// Routes files dropped anywhere on the document.
///
/// Only the first file names the upload. An empty drop does nothing.
#[must_use]
pub fn on_drop(form: UploadForm, files: &[DroppedFile]) -> Option<UploadEffect> {
    let first = files.first()?;
    Some(match form {
        UploadForm::Batch => UploadEffect::CsvSelected {
            label: first.name.clone(),
            assign_files: true,
        },
        UploadForm::Project => UploadEffect::ReadTemplate {
            file_name: first.name.clone(),
            reset_input: false,
        },
    })
}

/// Routes a change on the template file input.
#[must_use]
pub fn on_template_selected(files: &[DroppedFile]) -> Option<UploadEffect> {
    files.first().map(|file| UploadEffect::ReadTemplate {
        file_name: file.name.clone(),
        reset_input: true,
    })
}

/// Routes a change on the CSV file input.
#[must_use]
pub fn on_csv_selected(files: &[DroppedFile]) -> Option<UploadEffect> {
    files.first().map(|file| UploadEffect::CsvSelected {
        label: file.name.clone(),
        assign_files: false,
    })
}

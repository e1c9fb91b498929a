//! Visibility of the per-group and per-user permission fields.

/// Checkbox that enables custom permissions on project and batch forms.
pub const CUSTOM_PERMISSIONS_CHECKBOX: &str = "#id_custom_permissions";

/// Field containers shown only while custom permissions are enabled.
pub const PERMISSION_FIELDS: [&str; 2] = [
    "div.field-can_work_on_groups",
    "div.field-can_work_on_users",
];

/// Tracks whether the permission fields are visible.
///
/// Visibility starts from the checkbox state and then flips on every change
/// event without re-reading the checkbox.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PermissionFields {
    visible: bool,
}

impl PermissionFields {
    /// Initial visibility for a form whose checkbox is `checked`.
    #[must_use]
    pub const fn on_load(checked: bool) -> Self {
        Self { visible: checked }
    }

    /// Handles a change event on the checkbox.
    pub const fn toggle(&mut self) {
        self.visible = !self.visible;
    }

    /// Returns true when the fields should be shown.
    #[must_use]
    pub const fn is_visible(self) -> bool {
        self.visible
    }

    /// Returns each field selector with its visibility.
    #[must_use]
    pub fn field_visibility(self) -> [(&'static str, bool); 2] {
        PERMISSION_FIELDS.map(|selector| (selector, self.visible))
    }
}

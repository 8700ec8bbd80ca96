//! Selector tree for the OrangeHRM screens under test.
//!
//! Defaults target the OrangeHRM 5.7 DOM. Form fields are anchored on their
//! visible label, structure on the stable `oxd-*` / `orangehrm-*` classes.
//! Every entry can be overridden from the `selectors:` section of the suite
//! configuration file.

use crate::locator::Selector;
use serde::{Deserialize, Serialize};

/// Input (or textarea) inside the input group labelled `label`.
fn labelled(label: &str, control: &str) -> Selector {
    Selector::xpath(format!(
        "//label[normalize-space()='{label}']/ancestor::div[contains(@class,'oxd-input-group')]//{control}"
    ))
}

/// OrangeHRM custom select trigger labelled `label`.
fn labelled_select(label: &str) -> Selector {
    labelled(label, "div[contains(@class,'oxd-select-text')]")
}

/// Submit button of the form containing a field labelled `label`.
fn form_submit(label: &str) -> Selector {
    Selector::xpath(format!(
        "//form[.//label[normalize-space()='{label}']]//button[@type='submit']"
    ))
}

/// "Add" button next to a section heading.
fn heading_add(heading: &str) -> Selector {
    Selector::xpath(format!(
        "//div[contains(@class,'orangehrm-action-header')][.//h6[normalize-space()='{heading}']]//button"
    ))
}

/// Every selector used by the page objects.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Selectors {
    /// Widgets shared by every screen
    pub common: CommonSelectors,
    /// Login form
    pub login: LoginSelectors,
    /// My Info navigation and personal details
    pub my_info: MyInfoSelectors,
    /// Dependents sub-tab
    pub dependents: DependentSelectors,
    /// Memberships sub-tab
    pub memberships: MembershipSelectors,
    /// Immigration sub-tab
    pub immigration: ImmigrationSelectors,
    /// Attachment panel found at the bottom of every sub-tab
    pub attachments: AttachmentSelectors,
}

/// Toasts, spinners, dialogs and dropdown options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CommonSelectors {
    /// Success toast shown after save/delete
    pub toast_success: Selector,
    /// Loading spinner overlay
    pub loading_spinner: Selector,
    /// "Yes, Delete" button of the confirmation dialog
    pub confirm_delete: Selector,
    /// Options of an open OrangeHRM select (CSS, filtered by text)
    pub dropdown_option: Selector,
}

impl Default for CommonSelectors {
    fn default() -> Self {
        Self {
            toast_success: Selector::css(".oxd-toast--success"),
            loading_spinner: Selector::css(".oxd-loading-spinner"),
            confirm_delete: Selector::css(".orangehrm-modal-footer .oxd-button--label-danger"),
            dropdown_option: Selector::css("div[role='listbox'] div[role='option']"),
        }
    }
}

/// Login screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoginSelectors {
    /// Username input
    pub username: Selector,
    /// Password input
    pub password: Selector,
    /// Login button
    pub submit: Selector,
    /// Element present once the dashboard shell has loaded
    pub landed: Selector,
}

impl Default for LoginSelectors {
    fn default() -> Self {
        Self {
            username: Selector::css("input[name='username']"),
            password: Selector::css("input[name='password']"),
            submit: Selector::css("button[type='submit']"),
            landed: Selector::css(".oxd-userdropdown-name"),
        }
    }
}

/// My Info menu, sub-tabs and the personal details form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MyInfoSelectors {
    /// "My Info" entry of the main menu
    pub menu_item: Selector,
    /// Every sub-tab link
    pub sub_tabs: Selector,
    /// Contact Details sub-tab
    pub contact_details_tab: Selector,
    /// Dependents sub-tab
    pub dependents_tab: Selector,
    /// Immigration sub-tab
    pub immigration_tab: Selector,
    /// Qualifications sub-tab
    pub qualifications_tab: Selector,
    /// Memberships sub-tab
    pub memberships_tab: Selector,
    /// Employee first name input
    pub first_name: Selector,
    /// Validation message below an input
    pub field_error: Selector,
    /// Save button of the personal details form
    pub personal_save: Selector,
    /// Name shown in the header user dropdown
    pub profile_name: Selector,
}

impl Default for MyInfoSelectors {
    fn default() -> Self {
        Self {
            menu_item: Selector::css("a.oxd-main-menu-item[href*='viewMyDetails']"),
            sub_tabs: Selector::css(".orangehrm-tabs a.orangehrm-tabs-item"),
            contact_details_tab: Selector::css(".orangehrm-tabs a[href*='contactDetails']"),
            dependents_tab: Selector::css(".orangehrm-tabs a[href*='viewDependents']"),
            immigration_tab: Selector::css(".orangehrm-tabs a[href*='viewImmigration']"),
            qualifications_tab: Selector::css(".orangehrm-tabs a[href*='viewQualifications']"),
            memberships_tab: Selector::css(".orangehrm-tabs a[href*='viewMemberships']"),
            first_name: Selector::css("input[name='firstName']"),
            field_error: Selector::css(".oxd-input-field-error-message"),
            personal_save: form_submit("Employee Full Name"),
            profile_name: Selector::css(".oxd-userdropdown-name"),
        }
    }
}

/// Shape shared by the dependents, memberships and immigration tables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordTableSelectors {
    /// "Add" button of the section header
    pub add_button: Selector,
    /// Submit button of the add/edit form
    pub save_button: Selector,
    /// Table container holding the records (first match is used)
    pub table: Selector,
    /// Row inside the table
    pub row: Selector,
    /// Cell holding the identifying value, relative to a row
    pub key_cell: Selector,
    /// Edit button, relative to a row
    pub row_edit: Selector,
    /// Delete button, relative to a row
    pub row_delete: Selector,
    /// Selection checkbox, relative to a row
    pub row_checkbox: Selector,
    /// "Delete Selected" bulk action
    pub delete_selected: Selector,
}

impl RecordTableSelectors {
    fn for_section(heading: &str, form_label: &str, key_column: usize) -> Self {
        Self {
            add_button: heading_add(heading),
            save_button: form_submit(form_label),
            table: Selector::css(".orangehrm-container"),
            row: Selector::css(".oxd-table-card"),
            key_cell: Selector::css(format!(".oxd-table-cell:nth-child({key_column})")),
            row_edit: Selector::css("button:has(i.bi-pencil-fill)"),
            row_delete: Selector::css("button:has(i.bi-trash)"),
            row_checkbox: Selector::css(".oxd-checkbox-wrapper"),
            delete_selected: Selector::xpath("//button[normalize-space()='Delete Selected']"),
        }
    }
}

/// Dependents sub-tab.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DependentSelectors {
    /// Dependents table
    pub table: RecordTableSelectors,
    /// Name input
    pub name_input: Selector,
    /// Relationship select
    pub relationship: Selector,
    /// "Please Specify" input shown for relationship Other
    pub specify_input: Selector,
}

impl Default for DependentSelectors {
    fn default() -> Self {
        Self {
            table: RecordTableSelectors::for_section("Assigned Dependents", "Relationship", 2),
            name_input: labelled("Name", "input"),
            relationship: labelled_select("Relationship"),
            specify_input: labelled("Please Specify", "input"),
        }
    }
}

/// Memberships sub-tab.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MembershipSelectors {
    /// Memberships table; the key cell is the amount column
    pub table: RecordTableSelectors,
    /// Membership select
    pub membership: Selector,
    /// Subscription amount input
    pub amount_input: Selector,
}

impl Default for MembershipSelectors {
    fn default() -> Self {
        Self {
            table: RecordTableSelectors::for_section(
                "Assigned Memberships",
                "Subscription Amount",
                4,
            ),
            membership: labelled_select("Membership"),
            amount_input: labelled("Subscription Amount", "input"),
        }
    }
}

/// Immigration sub-tab.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImmigrationSelectors {
    /// Immigration table; the key cell is the document number column
    pub table: RecordTableSelectors,
    /// Document number input
    pub number_input: Selector,
}

impl Default for ImmigrationSelectors {
    fn default() -> Self {
        Self {
            table: RecordTableSelectors::for_section(
                "Assigned Immigration Records",
                "Number",
                3,
            ),
            number_input: labelled("Number", "input"),
        }
    }
}

/// Attachment panel; every selector but `section` is relative to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AttachmentSelectors {
    /// Panel container
    pub section: Selector,
    /// "Add" button
    pub add_button: Selector,
    /// File input
    pub file_input: Selector,
    /// Comment textarea
    pub comment: Selector,
    /// Save button
    pub save_button: Selector,
    /// Attachment row
    pub row: Selector,
    /// Cell holding the comment, relative to a row
    pub comment_cell: Selector,
}

impl Default for AttachmentSelectors {
    fn default() -> Self {
        Self {
            section: Selector::css(".orangehrm-attachment"),
            add_button: Selector::css(".orangehrm-action-header button"),
            file_input: Selector::css("input[type='file']"),
            comment: Selector::css("textarea"),
            save_button: Selector::css("button[type='submit']"),
            row: Selector::css(".oxd-table-card"),
            comment_cell: Selector::css(".oxd-table-cell:nth-child(3)"),
        }
    }
}

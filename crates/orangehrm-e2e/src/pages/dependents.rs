//! My Info > Dependents.

use super::components::{AttachmentPanel, Dropdown, RecordTable};
use super::my_info::MyInfoPage;
use crate::driver::Driver;
use crate::page_object::PageObject;
use crate::result::{E2eError, E2eResult};
use crate::selectors::DependentSelectors;
use crate::session::Session;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::info;

/// Relationship of a dependent to the employee.
///
/// `Other` always carries the text for the "Please Specify" field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Relationship {
    /// Child
    Child,
    /// Other, with the specified relationship
    Other {
        /// Text for "Please Specify"
        specify: String,
    },
}

impl Relationship {
    /// Relationship Other with the given specification
    #[must_use]
    pub fn other(specify: impl Into<String>) -> Self {
        Self::Other {
            specify: specify.into(),
        }
    }

    /// Build from the label shown in the select (case-insensitive)
    pub fn from_label(label: &str, specify: &str) -> E2eResult<Self> {
        let relationship = match label.trim().to_ascii_lowercase().as_str() {
            "child" => Self::Child,
            "other" => Self::other(specify),
            _ => {
                return Err(E2eError::config(format!(
                    "unknown relationship '{label}', expected Child or Other"
                )))
            }
        };
        relationship.validate()?;
        Ok(relationship)
    }

    /// Label of the select option
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Child => "Child",
            Self::Other { .. } => "Other",
        }
    }

    /// Text for "Please Specify", when one is required
    #[must_use]
    pub fn specify(&self) -> Option<&str> {
        match self {
            Self::Child => None,
            Self::Other { specify } => Some(specify),
        }
    }

    /// Whether this relationship reveals the "Please Specify" field
    #[must_use]
    pub const fn is_other(&self) -> bool {
        matches!(self, Self::Other { .. })
    }

    /// Reject an `Other` without specification
    pub fn validate(&self) -> E2eResult<()> {
        match self {
            Self::Other { specify } if specify.trim().is_empty() => Err(
                E2eError::invalid_input("relationship Other requires a non-empty specification"),
            ),
            _ => Ok(()),
        }
    }
}

impl std::fmt::Display for Relationship {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Child => write!(f, "Child"),
            Self::Other { specify } => write!(f, "Other ({specify})"),
        }
    }
}

fn require_name(name: &str) -> E2eResult<()> {
    if name.trim().is_empty() {
        Err(E2eError::invalid_input("dependent name must not be empty"))
    } else {
        Ok(())
    }
}

/// Dependents sub-tab of My Info
#[derive(Debug)]
pub struct DependentsPage<'a, D: Driver> {
    session: &'a Session<D>,
    selectors: &'a DependentSelectors,
}

impl<D: Driver> PageObject for DependentsPage<'_, D> {
    fn url_pattern(&self) -> &str {
        "/**/pim/viewDependents/empNumber/:emp_number"
    }
}

impl<'a, D: Driver> DependentsPage<'a, D> {
    /// Page object over a logged-in session
    #[must_use]
    pub fn new(session: &'a Session<D>) -> Self {
        Self {
            session,
            selectors: &session.selectors().dependents,
        }
    }

    fn table(&self) -> RecordTable<'a, D> {
        RecordTable::new(self.session, &self.selectors.table)
    }

    fn relationship(&self) -> Dropdown<'a, D> {
        Dropdown::new(
            self.session,
            self.session.locator(&self.selectors.relationship),
        )
    }

    /// Navigate My Info > Dependents
    pub async fn open_tab(&self) -> E2eResult<()> {
        MyInfoPage::new(self.session).open().await?;
        self.session
            .click(&self.session.locator(&self.session.selectors().my_info.dependents_tab))
            .await?;
        self.session.wait_for_page(self).await?;
        Ok(())
    }

    /// `href` of every My Info sub-tab, in display order
    pub async fn are_my_info_sub_tab_hrefs_unique(&self) -> E2eResult<Vec<String>> {
        MyInfoPage::new(self.session).open().await?;
        let tabs = self
            .session
            .locator(&self.session.selectors().my_info.sub_tabs);
        self.session.wait_visible(&tabs).await?;
        self.session.attributes(&tabs, "href").await
    }

    /// Add one dependent; for `Other` the specification is filled in too
    pub async fn add_dependent(&self, name: &str, relationship: &Relationship) -> E2eResult<()> {
        require_name(name)?;
        relationship.validate()?;
        info!(name, %relationship, "adding dependent");

        self.open_tab().await?;
        self.table().open_add_form().await?;
        self.fill_form(name, relationship).await?;
        let table = self.table();
        table.save().await?;
        table.keys_with(name).await.map(|_| ())
    }

    async fn fill_form(&self, name: &str, relationship: &Relationship) -> E2eResult<()> {
        self.session
            .fill(&self.session.locator(&self.selectors.name_input), name)
            .await?;
        self.relationship().select(relationship.label()).await?;
        if let Some(specify) = relationship.specify() {
            self.session
                .fill(&self.session.locator(&self.selectors.specify_input), specify)
                .await?;
        }
        Ok(())
    }

    /// Pick Other in a new dependent form and report whether "Please Specify" shows
    pub async fn select_other_and_check_specify_field(&self) -> E2eResult<bool> {
        let specify = self.session.config().test_data.other_specify.clone();
        self.specify_field_visible_for(&Relationship::other(specify))
            .await
    }

    /// Pick `relationship` in a new dependent form and report whether
    /// "Please Specify" shows
    pub async fn specify_field_visible_for(&self, relationship: &Relationship) -> E2eResult<bool> {
        self.open_tab().await?;
        self.table().open_add_form().await?;
        self.relationship().select(relationship.label()).await?;
        let window = Duration::from_millis(self.session.config().timeouts.settle_ms);
        self.session
            .appears_within(&self.session.locator(&self.selectors.specify_input), window)
            .await
    }

    /// Add a dependent, rename it, and return every dependent name
    pub async fn edit_dependent_name_flow(
        &self,
        name: &str,
        relationship: &Relationship,
        new_name: &str,
    ) -> E2eResult<Vec<String>> {
        require_name(new_name)?;
        self.add_dependent(name, relationship).await?;
        info!(name, new_name, "renaming dependent");

        let table = self.table();
        let index = table.row_index_of(name).await?;
        table.edit_row(index).await?;
        self.session
            .fill(&self.session.locator(&self.selectors.name_input), new_name)
            .await?;
        table.save().await?;
        table.keys_with(new_name).await
    }

    /// Add a dependent with the default relationship, delete it, and return
    /// every dependent name
    pub async fn delete_dependent_flow(&self, name: &str) -> E2eResult<Vec<String>> {
        let relationship = self.session.config().test_data.default_relationship()?;
        self.add_dependent(name, &relationship).await?;
        info!(name, "deleting dependent");

        let table = self.table();
        table.delete_by_key(name).await?;
        table.keys_without(name).await
    }

    /// Attach the sample file with `comment` and return every comment listed
    pub async fn upload_attachment(&self, comment: &str) -> E2eResult<Vec<String>> {
        self.open_tab().await?;
        info!(comment, "uploading dependent attachment");
        let upload = self.session.config().test_data.sample_upload.clone();
        AttachmentPanel::new(self.session, &self.session.selectors().attachments)
            .upload(&upload, comment)
            .await
    }

    /// Names listed in the dependents table currently shown
    pub async fn dependent_names(&self) -> E2eResult<Vec<String>> {
        self.table().keys().await
    }
}

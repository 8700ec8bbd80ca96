//! The suite's user stories.
//!
//! Each [`ScenarioId`] runs one story against a session that is already
//! logged in: it generates fresh input values, calls page-object workflows
//! and asserts on what they return.

use crate::assertion::{
    assert_all_unique, assert_comment_exists, assert_contains, assert_contains_substring,
    assert_equals, assert_min_len, assert_not_contains, assert_not_empty,
};
use crate::driver::Driver;
use crate::pages::{DependentsPage, MyInfoPage, Relationship};
use crate::result::E2eResult;
use crate::session::Session;
use crate::unique::{
    listed_amount, membership_amount, test_user_name, timestamped, unique_comment, unique_name,
};
use serde::Serialize;
use tracing::info;

/// Membership amount not listed in `amounts`
fn fresh_amount(amounts: &[String]) -> String {
    std::iter::repeat_with(membership_amount)
        .take(100)
        .find(|amount| !amounts.contains(&listed_amount(amount)))
        .unwrap_or_else(membership_amount)
}

/// One scenario of the suite
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum ScenarioId {
    /// My Info tab loads
    MyInfoTabLoads,
    /// Blank first name shows "Required"
    BlankNameRequired,
    /// First name edit is shown in the header
    NameEdit,
    /// My Info sub-tab links are distinct
    SubTabHrefsUnique,
    /// A dependent can be added
    AddDependent,
    /// "Please Specify" shows for relationship Other
    SpecifyFieldForOther,
    /// A membership can be added
    AddMembership,
    /// A membership can be deleted
    DeleteMembership,
    /// A membership can be edited
    EditMembership,
    /// An attachment can be uploaded on Memberships
    MembershipAttachment,
    /// An immigration record can be added
    AddImmigration,
    /// An immigration record can be edited
    EditImmigration,
    /// An immigration record can be deleted
    DeleteImmigration,
    /// Immigration records can be deleted through "Delete Selected"
    CheckboxDeleteImmigration,
    /// Qualifications tab loads
    QualificationTabLoads,
    /// A dependent can be renamed
    EditDependent,
    /// A dependent can be deleted
    DeleteDependent,
    /// An attachment can be uploaded on Dependents
    DependentAttachment,
    /// An attachment can be uploaded on Contact Details
    ContactAttachment,
}

impl ScenarioId {
    /// Every scenario in declaration order
    pub const ALL: [Self; 19] = [
        Self::MyInfoTabLoads,
        Self::BlankNameRequired,
        Self::NameEdit,
        Self::SubTabHrefsUnique,
        Self::AddDependent,
        Self::SpecifyFieldForOther,
        Self::AddMembership,
        Self::DeleteMembership,
        Self::EditMembership,
        Self::MembershipAttachment,
        Self::AddImmigration,
        Self::EditImmigration,
        Self::DeleteImmigration,
        Self::CheckboxDeleteImmigration,
        Self::QualificationTabLoads,
        Self::EditDependent,
        Self::DeleteDependent,
        Self::DependentAttachment,
        Self::ContactAttachment,
    ];

    /// Every scenario in declaration order
    #[must_use]
    pub fn all() -> Vec<Self> {
        Self::ALL.to_vec()
    }

    /// Short identifier used on the command line
    #[must_use]
    pub const fn id(self) -> &'static str {
        match self {
            Self::MyInfoTabLoads => "TC1",
            Self::BlankNameRequired => "TC2",
            Self::NameEdit => "TC3",
            Self::SubTabHrefsUnique => "TC4",
            Self::AddDependent => "TC5",
            Self::SpecifyFieldForOther => "TC6",
            Self::AddMembership => "TS-7",
            Self::DeleteMembership => "TS-8",
            Self::EditMembership => "TS-9",
            Self::MembershipAttachment => "TS-10",
            Self::AddImmigration => "TS-11",
            Self::EditImmigration => "TS-12",
            Self::DeleteImmigration => "TS-13",
            Self::CheckboxDeleteImmigration => "TS-14",
            Self::QualificationTabLoads => "TC-15",
            Self::EditDependent => "TS-16",
            Self::DeleteDependent => "TS-17",
            Self::DependentAttachment => "TS-18",
            Self::ContactAttachment => "TS-19",
        }
    }

    /// Human-readable title
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::MyInfoTabLoads => "Verify My Info tab loads",
            Self::BlankNameRequired => "Verify required field error on blank name",
            Self::NameEdit => "Verify the name gets edited successfully",
            Self::SubTabHrefsUnique => "Verify all My Info sub-tabs have unique hrefs",
            Self::AddDependent => "Verify a new dependent can be added to the list",
            Self::SpecifyFieldForOther => "Show 'Specify' field only when 'Other' is selected",
            Self::AddMembership => "Verify that a membership can be added from the list",
            Self::DeleteMembership => "Verify that a membership can be deleted from the list",
            Self::EditMembership => "Verify that a membership can be edited from the list",
            Self::MembershipAttachment => {
                "Verify that an attachment can be uploaded in the Memberships subtab"
            }
            Self::AddImmigration => "Verify an immigration record can be added",
            Self::EditImmigration => "Verify an immigration record can be edited",
            Self::DeleteImmigration => "Verify an immigration record can be deleted",
            Self::CheckboxDeleteImmigration => {
                "Verify immigration records can be removed with Delete Selected"
            }
            Self::QualificationTabLoads => "Verify the Qualifications tab loads",
            Self::EditDependent => "Verify a dependent can be renamed",
            Self::DeleteDependent => "Verify a dependent can be deleted",
            Self::DependentAttachment => {
                "Verify that an attachment can be uploaded in the Dependents subtab"
            }
            Self::ContactAttachment => {
                "Verify that an attachment can be uploaded in Contact Details"
            }
        }
    }

    /// Look up a scenario by id, case-insensitively
    #[must_use]
    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|s| s.id().eq_ignore_ascii_case(id.trim()))
    }

    /// Whether the id or title contains `filter`, case-insensitively
    #[must_use]
    pub fn matches(self, filter: &str) -> bool {
        let filter = filter.to_lowercase();
        self.id().to_lowercase().contains(&filter) || self.title().to_lowercase().contains(&filter)
    }

    /// Run the story on a logged-in session
    pub async fn run<D: Driver>(self, session: &Session<D>) -> E2eResult<()> {
        info!(scenario = self.id(), "running");
        let my_info = MyInfoPage::new(session);
        let dependents = DependentsPage::new(session);
        let config = session.config();

        match self {
            Self::MyInfoTabLoads => {
                let url = my_info.click_my_info_tab().await?;
                assert_not_empty(&url, "My Info URL")?;
                assert_contains_substring(
                    &url,
                    &config.url("web/index.php/pim/viewPersonalDetails/empNumber"),
                )
            }
            Self::BlankNameRequired => {
                let message = my_info.clear_and_enter_name().await?;
                assert_not_empty(&message, "validation message")?;
                assert_equals("Required", message.as_str())
            }
            Self::NameEdit => {
                let new_name = test_user_name();
                let shown = my_info.update_unique_name_and_verify(&new_name).await?;
                assert_not_empty(&shown, "profile name")?;
                assert_contains_substring(&shown, &new_name)
            }
            Self::SubTabHrefsUnique => {
                let hrefs = dependents.are_my_info_sub_tab_hrefs_unique().await?;
                assert_all_unique(&hrefs)
            }
            Self::AddDependent => {
                let name = timestamped("Child_");
                let relationship = config.test_data.default_relationship()?;
                dependents.add_dependent(&name, &relationship).await?;
                assert_contains(&dependents.dependent_names().await?, &name)
            }
            Self::SpecifyFieldForOther => {
                let visible = dependents.select_other_and_check_specify_field().await?;
                assert_equals(&true, &visible)
            }
            Self::AddMembership => {
                let amount = membership_amount();
                let amounts = my_info.add_membership(&amount).await?;
                assert_contains(&amounts, &listed_amount(&amount))
            }
            Self::DeleteMembership => {
                let mut before = my_info.membership_amounts().await?;
                if before.is_empty() {
                    before = my_info.add_membership(&membership_amount()).await?;
                }
                let amount = fresh_amount(&before);
                let amounts = my_info.delete_membership(&amount).await?;
                assert_not_contains(&amounts, &listed_amount(&amount))?;
                assert_min_len(&amounts, before.len(), "memberships after the delete")
            }
            Self::EditMembership => {
                if my_info.membership_amounts().await?.is_empty() {
                    my_info.add_membership(&membership_amount()).await?;
                }
                let new_amount = membership_amount();
                let amounts = my_info.edit_membership(&new_amount).await?;
                assert_contains(&amounts, &listed_amount(&new_amount))
            }
            Self::MembershipAttachment => {
                let comment = unique_comment();
                let comments = my_info.add_membership_attachment(&comment).await?;
                assert_comment_exists(&comments, &comment)
            }
            Self::AddImmigration => {
                let number = timestamped("PPN_");
                assert_contains(&my_info.add_immigration(&number).await?, &number)
            }
            Self::EditImmigration => {
                if my_info.immigration_numbers().await?.is_empty() {
                    my_info.add_immigration(&timestamped("PPN_")).await?;
                }
                let number = timestamped("UPPN_");
                assert_contains(&my_info.edit_immigration(&number).await?, &number)
            }
            Self::DeleteImmigration | Self::CheckboxDeleteImmigration => {
                let mut before = my_info.immigration_numbers().await?;
                if before.is_empty() {
                    before = my_info.add_immigration(&timestamped("PPN_")).await?;
                }
                let number = timestamped("PPN_");
                let numbers = if self == Self::DeleteImmigration {
                    my_info.delete_immigration(&number).await?
                } else {
                    my_info.checkbox_delete(&number).await?
                };
                assert_not_contains(&numbers, &number)?;
                assert_min_len(&numbers, before.len(), "immigration records after the delete")
            }
            Self::QualificationTabLoads => {
                let url = my_info.qualification_tab().await?;
                assert_contains_substring(
                    &url,
                    &config.url("web/index.php/pim/viewQualifications/empNumber/"),
                )
            }
            Self::EditDependent => {
                let name = timestamped("Child_");
                let new_name = unique_name();
                let relationship = Relationship::other(config.test_data.other_specify.clone());
                let names = dependents
                    .edit_dependent_name_flow(&name, &relationship, &new_name)
                    .await?;
                assert_contains(&names, &new_name)?;
                assert_not_contains(&names, &name)
            }
            Self::DeleteDependent => {
                dependents.open_tab().await?;
                let mut before = dependents.dependent_names().await?;
                if before.is_empty() {
                    let relationship = config.test_data.default_relationship()?;
                    dependents
                        .add_dependent(&timestamped("Child_"), &relationship)
                        .await?;
                    before = dependents.dependent_names().await?;
                }
                let name = timestamped("Child_");
                let names = dependents.delete_dependent_flow(&name).await?;
                assert_not_contains(&names, &name)?;
                assert_min_len(&names, before.len(), "dependents after the delete")
            }
            Self::DependentAttachment => {
                let comment = unique_comment();
                let comments = dependents.upload_attachment(&comment).await?;
                assert_comment_exists(&comments, &comment)
            }
            Self::ContactAttachment => {
                let comment = unique_comment();
                let comments = my_info.upload_contact_attachment(&comment).await?;
                assert_comment_exists(&comments, &comment)
            }
        }
    }
}

impl std::fmt::Display for ScenarioId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} - {}", self.id(), self.title())
    }
}

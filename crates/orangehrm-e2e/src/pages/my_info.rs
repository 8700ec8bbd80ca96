//! My Info: personal details and the membership, immigration,
//! qualification and contact sub-tabs.

use super::components::{AttachmentPanel, Dropdown, RecordTable};
use crate::driver::Driver;
use crate::locator::Selector;
use crate::page_object::{PageObject, UrlMatcher};
use crate::result::{E2eError, E2eResult};
use crate::selectors::Selectors;
use crate::session::Session;
use crate::unique::listed_amount;
use tracing::info;

const CONTACT_DETAILS: &str = "/**/pim/contactDetails/empNumber/:emp_number";
const MEMBERSHIPS: &str = "/**/pim/viewMemberships/empNumber/:emp_number";
const IMMIGRATION: &str = "/**/pim/viewImmigration/empNumber/:emp_number";
const QUALIFICATIONS: &str = "/**/pim/viewQualifications/empNumber/:emp_number";

fn require(value: &str, what: &str) -> E2eResult<()> {
    if value.trim().is_empty() {
        Err(E2eError::invalid_input(format!("{what} must not be empty")))
    } else {
        Ok(())
    }
}

/// My Info section, landing on Personal Details
#[derive(Debug)]
pub struct MyInfoPage<'a, D: Driver> {
    session: &'a Session<D>,
    selectors: &'a Selectors,
}

impl<D: Driver> PageObject for MyInfoPage<'_, D> {
    fn url_pattern(&self) -> &str {
        "/**/pim/viewPersonalDetails/empNumber/:emp_number"
    }
}

impl<'a, D: Driver> MyInfoPage<'a, D> {
    /// Page object over a logged-in session
    #[must_use]
    pub fn new(session: &'a Session<D>) -> Self {
        Self {
            session,
            selectors: session.selectors(),
        }
    }

    fn loc(&self, selector: &Selector) -> crate::locator::Locator {
        self.session.locator(selector)
    }

    fn memberships(&self) -> RecordTable<'a, D> {
        RecordTable::new(self.session, &self.selectors.memberships.table)
    }

    fn immigration(&self) -> RecordTable<'a, D> {
        RecordTable::new(self.session, &self.selectors.immigration.table)
    }

    fn attachments(&self) -> AttachmentPanel<'a, D> {
        AttachmentPanel::new(self.session, &self.selectors.attachments)
    }

    /// Click My Info in the main menu and wait for Personal Details
    pub async fn open(&self) -> E2eResult<String> {
        self.session
            .click(&self.loc(&self.selectors.my_info.menu_item))
            .await?;
        self.session.wait_for_page(self).await
    }

    async fn open_sub_tab(&self, tab: &Selector, pattern: &str) -> E2eResult<String> {
        self.open().await?;
        self.session.click(&self.loc(tab)).await?;
        self.session.wait_for_url(&UrlMatcher::new(pattern)).await
    }

    /// Open My Info and return the URL it lands on
    pub async fn click_my_info_tab(&self) -> E2eResult<String> {
        let url = self.open().await?;
        info!(url, "my info loaded");
        Ok(url)
    }

    /// Blank the first name, save, and return the validation message
    pub async fn clear_and_enter_name(&self) -> E2eResult<String> {
        self.open().await?;
        let my_info = &self.selectors.my_info;
        self.session.clear(&self.loc(&my_info.first_name)).await?;
        self.session.click(&self.loc(&my_info.personal_save)).await?;
        let message = self.session.text(&self.loc(&my_info.field_error)).await?;
        Ok(message.trim().to_string())
    }

    /// Save `new_name` as first name, reload, and return the name shown in
    /// the header
    pub async fn update_unique_name_and_verify(&self, new_name: &str) -> E2eResult<String> {
        require(new_name, "name")?;
        self.open().await?;
        info!(new_name, "updating first name");
        let my_info = &self.selectors.my_info;
        self.session
            .fill(&self.loc(&my_info.first_name), new_name)
            .await?;
        self.session.submit(&self.loc(&my_info.personal_save)).await?;
        self.session.reload().await?;
        let shown = self.session.text(&self.loc(&my_info.profile_name)).await?;
        Ok(shown.trim().to_string())
    }

    async fn open_memberships(&self) -> E2eResult<String> {
        self.open_sub_tab(&self.selectors.my_info.memberships_tab, MEMBERSHIPS)
            .await
    }

    async fn open_immigration(&self) -> E2eResult<String> {
        self.open_sub_tab(&self.selectors.my_info.immigration_tab, IMMIGRATION)
            .await
    }

    /// Add a membership paying `amount` and return every listed amount
    pub async fn add_membership(&self, amount: &str) -> E2eResult<Vec<String>> {
        require(amount, "membership amount")?;
        self.open_memberships().await?;
        info!(amount, "adding membership");

        let selectors = &self.selectors.memberships;
        let table = self.memberships();
        table.open_add_form().await?;
        Dropdown::new(self.session, self.loc(&selectors.membership))
            .select_index(self.session.config().test_data.membership_option_index)
            .await?;
        self.session
            .fill(&self.loc(&selectors.amount_input), amount)
            .await?;
        table.save().await?;
        table.keys_with(&listed_amount(amount)).await
    }

    /// Add a membership paying `amount`, delete it again, and return every
    /// listed amount
    pub async fn delete_membership(&self, amount: &str) -> E2eResult<Vec<String>> {
        self.add_membership(amount).await?;
        let listed = listed_amount(amount);
        info!(listed, "deleting membership");
        let table = self.memberships();
        table.delete_by_key(&listed).await?;
        table.keys_without(&listed).await
    }

    /// Change the first membership's amount and return every listed amount
    pub async fn edit_membership(&self, new_amount: &str) -> E2eResult<Vec<String>> {
        require(new_amount, "membership amount")?;
        self.open_memberships().await?;
        info!(new_amount, "editing first membership");
        let table = self.memberships();
        table.edit_row(0).await?;
        self.session
            .fill(&self.loc(&self.selectors.memberships.amount_input), new_amount)
            .await?;
        table.save().await?;
        table.keys_with(&listed_amount(new_amount)).await
    }

    /// Amounts listed on the Memberships sub-tab
    pub async fn membership_amounts(&self) -> E2eResult<Vec<String>> {
        self.open_memberships().await?;
        self.memberships().keys().await
    }

    /// Attach the sample file on the Memberships sub-tab and return every comment
    pub async fn add_membership_attachment(&self, comment: &str) -> E2eResult<Vec<String>> {
        self.open_memberships().await?;
        self.upload_sample(comment).await
    }

    /// Attach the sample file on Contact Details and return every comment
    pub async fn upload_contact_attachment(&self, comment: &str) -> E2eResult<Vec<String>> {
        self.open_sub_tab(&self.selectors.my_info.contact_details_tab, CONTACT_DETAILS)
            .await?;
        self.upload_sample(comment).await
    }

    async fn upload_sample(&self, comment: &str) -> E2eResult<Vec<String>> {
        info!(comment, "uploading attachment");
        let file = self.session.config().test_data.sample_upload.clone();
        self.attachments().upload(&file, comment).await
    }

    /// Add an immigration record numbered `passport` and return every number
    pub async fn add_immigration(&self, passport: &str) -> E2eResult<Vec<String>> {
        require(passport, "passport number")?;
        self.open_immigration().await?;
        info!(passport, "adding immigration record");
        let table = self.immigration();
        table.open_add_form().await?;
        self.session
            .fill(&self.loc(&self.selectors.immigration.number_input), passport)
            .await?;
        table.save().await?;
        table.keys_with(passport).await
    }

    /// Renumber the first immigration record and return every number
    pub async fn edit_immigration(&self, new_passport: &str) -> E2eResult<Vec<String>> {
        require(new_passport, "passport number")?;
        self.open_immigration().await?;
        info!(new_passport, "editing first immigration record");
        let table = self.immigration();
        table.edit_row(0).await?;
        self.session
            .fill(&self.loc(&self.selectors.immigration.number_input), new_passport)
            .await?;
        table.save().await?;
        table.keys_with(new_passport).await
    }

    /// Add an immigration record, delete it through its row, and return every number
    pub async fn delete_immigration(&self, passport: &str) -> E2eResult<Vec<String>> {
        self.add_immigration(passport).await?;
        info!(passport, "deleting immigration record");
        let table = self.immigration();
        table.delete_by_key(passport).await?;
        table.keys_without(passport).await
    }

    /// Add an immigration record, tick it, "Delete Selected", and return every number
    pub async fn checkbox_delete(&self, passport: &str) -> E2eResult<Vec<String>> {
        self.add_immigration(passport).await?;
        info!(passport, "deleting immigration record via selection");
        let table = self.immigration();
        let index = table.row_index_of(passport).await?;
        table.select_row(index).await?;
        table.delete_selected().await?;
        table.keys_without(passport).await
    }

    /// Passport numbers listed on the Immigration sub-tab
    pub async fn immigration_numbers(&self) -> E2eResult<Vec<String>> {
        self.open_immigration().await?;
        self.immigration().keys().await
    }

    /// Open the Qualifications sub-tab and return its URL
    pub async fn qualification_tab(&self) -> E2eResult<String> {
        self.open_sub_tab(&self.selectors.my_info.qualifications_tab, QUALIFICATIONS)
            .await
    }
}

//! Widgets shared by several OrangeHRM screens.

use crate::driver::Driver;
use crate::locator::Locator;
use crate::result::{E2eError, E2eResult};
use crate::selectors::{AttachmentSelectors, RecordTableSelectors};
use crate::session::Session;
use crate::wait::{poll_until, WaitOptions};
use std::path::Path;
use std::sync::{Mutex, PoisonError};
use tracing::debug;

/// OrangeHRM custom select: a trigger that opens a listbox of options
#[derive(Debug)]
pub struct Dropdown<'a, D: Driver> {
    session: &'a Session<D>,
    trigger: Locator,
}

impl<'a, D: Driver> Dropdown<'a, D> {
    /// Wrap the select whose trigger is `trigger`
    #[must_use]
    pub const fn new(session: &'a Session<D>, trigger: Locator) -> Self {
        Self { session, trigger }
    }

    fn options(&self) -> Locator {
        self.session
            .locator(&self.session.selectors().common.dropdown_option)
    }

    /// Open the list and pick the option whose text contains `label`
    pub async fn select(&self, label: &str) -> E2eResult<()> {
        self.session.click(&self.trigger).await?;
        self.session.click(&self.options().with_text(label)).await
    }

    /// Open the list and pick the option at `index`
    pub async fn select_index(&self, index: usize) -> E2eResult<()> {
        self.session.click(&self.trigger).await?;
        self.session.click(&self.options().nth(index)).await
    }
}

/// Table of records with an add form, row actions and bulk delete
#[derive(Debug)]
pub struct RecordTable<'a, D: Driver> {
    session: &'a Session<D>,
    selectors: &'a RecordTableSelectors,
}

impl<'a, D: Driver> RecordTable<'a, D> {
    /// Bind a table layout to a session
    #[must_use]
    pub const fn new(session: &'a Session<D>, selectors: &'a RecordTableSelectors) -> Self {
        Self { session, selectors }
    }

    /// Every row of the first matching table
    #[must_use]
    pub fn rows(&self) -> Locator {
        self.session
            .locator(&self.selectors.table)
            .first()
            .child(self.selectors.row.clone())
    }

    /// Key cell of every row
    #[must_use]
    pub fn key_cells(&self) -> Locator {
        self.rows().child(self.selectors.key_cell.clone())
    }

    fn in_row(&self, index: usize, selector: &crate::locator::Selector) -> Locator {
        self.rows().nth(index).child(selector.clone())
    }

    /// Open the add form
    pub async fn open_add_form(&self) -> E2eResult<()> {
        self.session
            .click(&self.session.locator(&self.selectors.add_button))
            .await
    }

    /// Submit the add/edit form and wait for the table to refresh
    pub async fn save(&self) -> E2eResult<()> {
        self.session
            .submit(&self.session.locator(&self.selectors.save_button))
            .await
    }

    /// Key value of every row, in display order
    pub async fn keys(&self) -> E2eResult<Vec<String>> {
        let keys = self.session.texts(&self.key_cells()).await?;
        Ok(keys.into_iter().map(|k| k.trim().to_string()).collect())
    }

    /// Keys once `settled` accepts them, or the last keys read when the
    /// action timeout runs out.
    ///
    /// Right after a save the table can still show the rows from before it.
    pub async fn keys_when<P>(&self, settled: P) -> E2eResult<Vec<String>>
    where
        P: Fn(&[String]) -> bool,
    {
        let store = Mutex::new(Vec::new());
        let (latest, settled) = (&store, &settled);
        let options = WaitOptions::from(self.key_cells().options());
        let waited = poll_until("table to refresh", &options, move || async move {
            let keys = self.keys().await?;
            let done = settled(&keys);
            *latest.lock().unwrap_or_else(PoisonError::into_inner) = keys;
            Ok(done)
        })
        .await;
        match waited {
            Ok(_) | Err(E2eError::Timeout { .. }) => {
                Ok(store.into_inner().unwrap_or_else(PoisonError::into_inner))
            }
            Err(e) => Err(e),
        }
    }

    /// Keys once `key` is listed
    pub async fn keys_with(&self, key: &str) -> E2eResult<Vec<String>> {
        let key = key.trim();
        self.keys_when(|keys| keys.iter().any(|k| k == key)).await
    }

    /// Keys once `key` is no longer listed
    pub async fn keys_without(&self, key: &str) -> E2eResult<Vec<String>> {
        let key = key.trim();
        self.keys_when(|keys| keys.iter().all(|k| k != key)).await
    }

    /// Index of the first row whose key equals `key`
    pub async fn row_index_of(&self, key: &str) -> E2eResult<usize> {
        let keys = self.keys().await?;
        keys.iter()
            .position(|k| k == key.trim())
            .ok_or_else(|| E2eError::ElementNotFound {
                locator: format!("{} with key '{key}'", self.rows()),
            })
    }

    /// Open the edit form of a row
    pub async fn edit_row(&self, index: usize) -> E2eResult<()> {
        debug!(index, "edit row");
        self.session
            .click(&self.in_row(index, &self.selectors.row_edit))
            .await
    }

    /// Delete a row through its trash button and the confirmation dialog
    pub async fn delete_row(&self, index: usize) -> E2eResult<()> {
        debug!(index, "delete row");
        self.session
            .click(&self.in_row(index, &self.selectors.row_delete))
            .await?;
        self.confirm_delete().await
    }

    /// Delete the row whose key equals `key`
    pub async fn delete_by_key(&self, key: &str) -> E2eResult<()> {
        let index = self.row_index_of(key).await?;
        self.delete_row(index).await
    }

    /// Tick a row's checkbox
    pub async fn select_row(&self, index: usize) -> E2eResult<()> {
        self.session
            .click(&self.in_row(index, &self.selectors.row_checkbox))
            .await
    }

    /// Delete every ticked row
    pub async fn delete_selected(&self) -> E2eResult<()> {
        self.session
            .click(&self.session.locator(&self.selectors.delete_selected))
            .await?;
        self.confirm_delete().await
    }

    async fn confirm_delete(&self) -> E2eResult<()> {
        let confirm = &self.session.selectors().common.confirm_delete;
        self.session.submit(&self.session.locator(confirm)).await
    }
}

/// Attachment panel at the bottom of a My Info sub-tab
#[derive(Debug)]
pub struct AttachmentPanel<'a, D: Driver> {
    session: &'a Session<D>,
    selectors: &'a AttachmentSelectors,
}

impl<'a, D: Driver> AttachmentPanel<'a, D> {
    /// Bind the panel layout to a session
    #[must_use]
    pub const fn new(session: &'a Session<D>, selectors: &'a AttachmentSelectors) -> Self {
        Self { session, selectors }
    }

    fn scoped(&self, selector: &crate::locator::Selector) -> Locator {
        self.session
            .locator(&self.selectors.section)
            .first()
            .child(selector.clone())
    }

    /// Comment cell of every attachment row
    #[must_use]
    pub fn comment_cells(&self) -> Locator {
        self.scoped(&self.selectors.row)
            .child(self.selectors.comment_cell.clone())
    }

    /// Attach `file` with `comment`, save, and return every comment listed
    pub async fn upload(&self, file: &Path, comment: &str) -> E2eResult<Vec<String>> {
        self.session
            .click(&self.scoped(&self.selectors.add_button))
            .await?;
        self.session
            .upload(&self.scoped(&self.selectors.file_input), file)
            .await?;
        self.session
            .fill(&self.scoped(&self.selectors.comment), comment)
            .await?;
        self.session
            .submit(&self.scoped(&self.selectors.save_button))
            .await?;
        self.comments().await
    }

    /// Every comment currently listed
    pub async fn comments(&self) -> E2eResult<Vec<String>> {
        let comments = self.session.texts(&self.comment_cells()).await?;
        Ok(comments.into_iter().map(|c| c.trim().to_string()).collect())
    }
}

//! In-memory OrangeHRM for integration tests.
//!
//! [`FakeHrm`] is the "server": it holds the employee's records and is shared
//! by every session it opens, like a real installation shared by parallel
//! workers. Each [`FakeBrowser`] keeps its own page state (current screen,
//! open forms, dropdowns, toasts) and resolves locators against the default
//! selector tree the same way a browser resolves them against the DOM.

#![allow(dead_code, clippy::unwrap_used, clippy::expect_used)]

use async_trait::async_trait;
use orangehrm_e2e::{
    Driver, E2eError, E2eResult, Locator, RecordTableSelectors, Selector, Selectors, Session,
    SessionFactory, SuiteConfig,
};
use std::collections::{BTreeSet, HashMap};
use std::io::Write;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

pub const BASE_URL: &str = "https://hrm.fake/orangehrm-5.7";
pub const EMP_NUMBER: u32 = 7;
pub const LAST_NAME: &str = "Collings";

/// Every My Info sub-tab, by the page segment of its href
pub const SUB_TABS: [&str; 10] = [
    "viewPersonalDetails",
    "contactDetails",
    "viewEmergencyContacts",
    "viewDependents",
    "viewImmigration",
    "viewJobDetails",
    "viewSalaryList",
    "viewReportToDetails",
    "viewQualifications",
    "viewMemberships",
];

const RELATIONSHIP_OPTIONS: [&str; 3] = ["-- Select --", "Child", "Other"];
const MEMBERSHIP_OPTIONS: [&str; 4] = ["-- Select --", "ACCA", "AFP", "British Computer Society"];

/// Misbehaviour the fake can be told to exhibit
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Fault {
    /// Confirmed deletes report success but keep the rows
    DeletesIgnored,
    /// Confirmed deletes empty the whole table
    DeletesEverything,
    /// Saves succeed but never show the success toast
    SilentSaves,
    /// Every login is rejected
    RejectLogin,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Screen {
    Blank,
    Login,
    Dashboard,
    PersonalDetails,
    ContactDetails,
    Dependents,
    Immigration,
    Qualifications,
    Memberships,
}

impl Screen {
    fn segment(self) -> Option<&'static str> {
        match self {
            Self::PersonalDetails => Some("viewPersonalDetails"),
            Self::ContactDetails => Some("contactDetails"),
            Self::Dependents => Some("viewDependents"),
            Self::Immigration => Some("viewImmigration"),
            Self::Qualifications => Some("viewQualifications"),
            Self::Memberships => Some("viewMemberships"),
            Self::Blank | Self::Login | Self::Dashboard => None,
        }
    }

    fn from_segment(segment: &str) -> Option<Self> {
        [
            Self::PersonalDetails,
            Self::ContactDetails,
            Self::Dependents,
            Self::Immigration,
            Self::Qualifications,
            Self::Memberships,
        ]
        .into_iter()
        .find(|s| s.segment() == Some(segment))
    }

    const fn is_my_info(self) -> bool {
        !matches!(self, Self::Blank | Self::Login | Self::Dashboard)
    }

    const fn has_attachments(self) -> bool {
        matches!(
            self,
            Self::ContactDetails | Self::Dependents | Self::Immigration | Self::Memberships
        )
    }

    const fn section(self) -> Option<Section> {
        match self {
            Self::Dependents => Some(Section::Dependents),
            Self::Memberships => Some(Section::Memberships),
            Self::Immigration => Some(Section::Immigration),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Dependents,
    Memberships,
    Immigration,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dependent {
    pub name: String,
    pub relationship: String,
    pub specify: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Membership {
    pub membership: String,
    /// Amount as listed, two decimals
    pub amount: String,
}

#[derive(Debug)]
struct ServerData {
    first_name: String,
    dependents: Vec<Dependent>,
    memberships: Vec<Membership>,
    immigration: Vec<String>,
    attachments: HashMap<Screen, Vec<String>>,
    faults: BTreeSet<Fault>,
    /// Time between a save and the refreshed table (and toast)
    refresh_lag: Duration,
    /// How long the success toast stays up
    toast_ttl: Duration,
    logins: usize,
    closed_sessions: usize,
}

impl Default for ServerData {
    fn default() -> Self {
        Self {
            first_name: "Paul".to_string(),
            dependents: Vec::new(),
            memberships: Vec::new(),
            immigration: Vec::new(),
            attachments: HashMap::new(),
            faults: BTreeSet::new(),
            refresh_lag: Duration::from_millis(10),
            toast_ttl: Duration::from_millis(60),
            logins: 0,
            closed_sessions: 0,
        }
    }
}

impl ServerData {
    fn record_count(&self, section: Section) -> usize {
        match section {
            Section::Dependents => self.dependents.len(),
            Section::Memberships => self.memberships.len(),
            Section::Immigration => self.immigration.len(),
        }
    }

    fn keys(&self, section: Section) -> Vec<String> {
        (0..self.record_count(section))
            .filter_map(|row| self.key(section, row))
            .collect()
    }

    fn key(&self, section: Section, row: usize) -> Option<String> {
        match section {
            Section::Dependents => self.dependents.get(row).map(|d| d.name.clone()),
            Section::Memberships => self.memberships.get(row).map(|m| m.amount.clone()),
            Section::Immigration => self.immigration.get(row).cloned(),
        }
    }

    fn remove_rows(&mut self, section: Section, mut rows: Vec<usize>) {
        rows.sort_unstable();
        rows.dedup();
        for row in rows.into_iter().rev() {
            match section {
                Section::Dependents if row < self.dependents.len() => {
                    let _ = self.dependents.remove(row);
                }
                Section::Memberships if row < self.memberships.len() => {
                    let _ = self.memberships.remove(row);
                }
                Section::Immigration if row < self.immigration.len() => {
                    let _ = self.immigration.remove(row);
                }
                _ => {}
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DropdownKind {
    Relationship,
    Membership,
}

impl DropdownKind {
    const fn options(self) -> &'static [&'static str] {
        match self {
            Self::Relationship => &RELATIONSHIP_OPTIONS,
            Self::Membership => &MEMBERSHIP_OPTIONS,
        }
    }
}

#[derive(Debug, Clone, Default)]
struct RecordForm {
    editing: Option<usize>,
    name: String,
    relationship: Option<String>,
    specify: String,
    membership: Option<String>,
    amount: String,
    number: String,
}

#[derive(Debug, Clone, Default)]
struct AttachmentForm {
    file: Option<PathBuf>,
    comment: String,
}

#[derive(Debug)]
struct PageState {
    url: String,
    screen: Screen,
    logged_in: bool,
    username: String,
    password: String,
    header_name: String,
    first_name_input: String,
    name_error: bool,
    /// Success toast, shown from the first instant until the second
    toast: Option<(Instant, Instant)>,
    /// Rows listed before the last save, shown until the table refreshes
    stale_keys: Option<(Instant, Vec<String>)>,
    form: Option<RecordForm>,
    dropdown: Option<DropdownKind>,
    confirm: Option<Vec<usize>>,
    selected: BTreeSet<usize>,
    attachment_form: Option<AttachmentForm>,
    closed: bool,
}

impl Default for PageState {
    fn default() -> Self {
        Self {
            url: "about:blank".to_string(),
            screen: Screen::Blank,
            logged_in: false,
            username: String::new(),
            password: String::new(),
            header_name: String::new(),
            first_name_input: String::new(),
            name_error: false,
            toast: None,
            stale_keys: None,
            form: None,
            dropdown: None,
            confirm: None,
            selected: BTreeSet::new(),
            attachment_form: None,
            closed: false,
        }
    }
}

/// What a locator resolved to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Node {
    Document,
    Username,
    Password,
    LoginSubmit,
    MenuItem,
    ProfileName,
    Toast,
    ConfirmDelete,
    DropdownOption(usize),
    SubTab(usize),
    FirstName,
    FieldError,
    PersonalSave,
    AddRecord,
    SaveRecord,
    Table,
    Row(usize),
    KeyCell(usize),
    RowEdit(usize),
    RowDelete(usize),
    RowCheckbox(usize),
    DeleteSelected,
    NameInput,
    RelationshipSelect,
    SpecifyInput,
    MembershipSelect,
    AmountInput,
    NumberInput,
    Attachments,
    AttachAdd,
    FileInput,
    Comment,
    AttachSave,
    AttachRow(usize),
    CommentCell(usize),
}

type Guards<'a> = (MutexGuard<'a, PageState>, MutexGuard<'a, ServerData>);

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

fn screen_url(screen: Screen) -> String {
    match screen {
        Screen::Blank => "about:blank".to_string(),
        Screen::Login => format!("{BASE_URL}/web/index.php/auth/login"),
        Screen::Dashboard => format!("{BASE_URL}/web/index.php/dashboard/index"),
        other => tab_url(other.segment().unwrap_or_default()),
    }
}

fn tab_url(segment: &str) -> String {
    format!("{BASE_URL}/web/index.php/pim/{segment}/empNumber/{EMP_NUMBER}")
}

/// Listed form of a subscription amount, or `None` when it is not a number
fn listed(amount: &str) -> Option<String> {
    amount
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite() && *v >= 0.0)
        .map(|v| format!("{v:.2}"))
}

/// One browser tab on the fake installation
#[derive(Debug)]
pub struct FakeBrowser {
    server: Arc<Mutex<ServerData>>,
    page: Mutex<PageState>,
    selectors: Selectors,
}

impl FakeBrowser {
    fn table(&self, section: Section) -> &RecordTableSelectors {
        match section {
            Section::Dependents => &self.selectors.dependents.table,
            Section::Memberships => &self.selectors.memberships.table,
            Section::Immigration => &self.selectors.immigration.table,
        }
    }

    fn resolve(&self, page: &PageState, data: &ServerData, locator: &Locator) -> Vec<Node> {
        let scope = match locator.parent() {
            None => vec![Node::Document],
            Some(parent) => self.resolve(page, data, parent),
        };
        let found: Vec<Node> = scope
            .into_iter()
            .flat_map(|node| self.children(page, data, node, locator.selector()))
            .collect();
        match locator.index() {
            Some(i) => found.into_iter().nth(i).into_iter().collect(),
            None => found,
        }
    }

    fn children(&self, page: &PageState, data: &ServerData, node: Node, sel: &Selector) -> Vec<Node> {
        let section = page.screen.section();
        let attachments = &self.selectors.attachments;
        match node {
            Node::Document => self.top_level(page, data, sel),
            Node::Table => match section {
                Some(section) if *sel == self.table(section).row => {
                    (0..Self::shown_keys(page, data, section).len())
                        .map(Node::Row)
                        .collect()
                }
                _ => Vec::new(),
            },
            Node::Row(i) => match section {
                Some(section) => {
                    let table = self.table(section);
                    if *sel == table.key_cell {
                        vec![Node::KeyCell(i)]
                    } else if *sel == table.row_edit {
                        vec![Node::RowEdit(i)]
                    } else if *sel == table.row_delete {
                        vec![Node::RowDelete(i)]
                    } else if *sel == table.row_checkbox {
                        vec![Node::RowCheckbox(i)]
                    } else {
                        Vec::new()
                    }
                }
                None => Vec::new(),
            },
            Node::Attachments => {
                let form_open = page.attachment_form.is_some();
                if *sel == attachments.add_button {
                    vec![Node::AttachAdd]
                } else if *sel == attachments.file_input && form_open {
                    vec![Node::FileInput]
                } else if *sel == attachments.comment && form_open {
                    vec![Node::Comment]
                } else if *sel == attachments.save_button && form_open {
                    vec![Node::AttachSave]
                } else if *sel == attachments.row {
                    let count = data.attachments.get(&page.screen).map_or(0, Vec::len);
                    (0..count).map(Node::AttachRow).collect()
                } else {
                    Vec::new()
                }
            }
            Node::AttachRow(i) if *sel == attachments.comment_cell => vec![Node::CommentCell(i)],
            _ => Vec::new(),
        }
    }

    fn top_level(&self, page: &PageState, data: &ServerData, sel: &Selector) -> Vec<Node> {
        let s = &self.selectors;
        if page.screen == Screen::Login {
            return if *sel == s.login.username {
                vec![Node::Username]
            } else if *sel == s.login.password {
                vec![Node::Password]
            } else if *sel == s.login.submit {
                vec![Node::LoginSubmit]
            } else {
                Vec::new()
            };
        }
        if !page.logged_in {
            return Vec::new();
        }

        let mut found = Vec::new();
        if *sel == s.my_info.menu_item {
            found.push(Node::MenuItem);
        }
        if *sel == s.my_info.profile_name || *sel == s.login.landed {
            found.push(Node::ProfileName);
        }
        let toast_up = page
            .toast
            .is_some_and(|(from, until)| (from..until).contains(&Instant::now()));
        if toast_up && *sel == s.common.toast_success {
            found.push(Node::Toast);
        }
        if page.confirm.is_some() && *sel == s.common.confirm_delete {
            found.push(Node::ConfirmDelete);
        }
        if let Some(kind) = page.dropdown {
            let options = kind.options();
            if *sel == s.common.dropdown_option {
                found.extend((0..options.len()).map(Node::DropdownOption));
            }
            if let Selector::CssWithText { css, text } = sel {
                if Selector::css(css.clone()) == s.common.dropdown_option {
                    found.extend(
                        options
                            .iter()
                            .enumerate()
                            .filter(|(_, label)| label.contains(text.as_str()))
                            .map(|(i, _)| Node::DropdownOption(i)),
                    );
                }
            }
        }

        if page.screen.is_my_info() {
            if *sel == s.my_info.sub_tabs {
                found.extend((0..SUB_TABS.len()).map(Node::SubTab));
            }
            for (tab, screen) in [
                (&s.my_info.contact_details_tab, Screen::ContactDetails),
                (&s.my_info.dependents_tab, Screen::Dependents),
                (&s.my_info.immigration_tab, Screen::Immigration),
                (&s.my_info.qualifications_tab, Screen::Qualifications),
                (&s.my_info.memberships_tab, Screen::Memberships),
            ] {
                if sel == tab {
                    let index = SUB_TABS
                        .iter()
                        .position(|seg| Some(*seg) == screen.segment())
                        .unwrap_or_default();
                    found.push(Node::SubTab(index));
                }
            }
        }

        if page.screen == Screen::PersonalDetails {
            if *sel == s.my_info.first_name {
                found.push(Node::FirstName);
            }
            if *sel == s.my_info.personal_save {
                found.push(Node::PersonalSave);
            }
            if page.name_error && *sel == s.my_info.field_error {
                found.push(Node::FieldError);
            }
        }

        if let Some(section) = page.screen.section() {
            let table = self.table(section);
            if *sel == table.add_button {
                found.push(Node::AddRecord);
            }
            if *sel == table.table {
                found.push(Node::Table);
            }
            if !page.selected.is_empty() && *sel == table.delete_selected {
                found.push(Node::DeleteSelected);
            }
            if let Some(form) = &page.form {
                if *sel == table.save_button {
                    found.push(Node::SaveRecord);
                }
                match section {
                    Section::Dependents => {
                        let d = &s.dependents;
                        if *sel == d.name_input {
                            found.push(Node::NameInput);
                        }
                        if *sel == d.relationship {
                            found.push(Node::RelationshipSelect);
                        }
                        if *sel == d.specify_input && form.relationship.as_deref() == Some("Other") {
                            found.push(Node::SpecifyInput);
                        }
                    }
                    Section::Memberships => {
                        if *sel == s.memberships.membership {
                            found.push(Node::MembershipSelect);
                        }
                        if *sel == s.memberships.amount_input {
                            found.push(Node::AmountInput);
                        }
                    }
                    Section::Immigration => {
                        if *sel == s.immigration.number_input {
                            found.push(Node::NumberInput);
                        }
                    }
                }
            }
        }

        if page.screen.has_attachments() && *sel == s.attachments.section {
            found.push(Node::Attachments);
        }
        found
    }

    fn first(&self, locator: &Locator) -> E2eResult<(Guards<'_>, Node)> {
        let page = lock(&self.page);
        let data = lock(&self.server);
        if page.closed {
            return Err(E2eError::Script {
                message: "browser has been closed".to_string(),
            });
        }
        let node = self
            .resolve(&page, &data, locator)
            .into_iter()
            .next()
            .ok_or_else(|| E2eError::ElementNotFound {
                locator: locator.to_string(),
            })?;
        Ok(((page, data), node))
    }

    fn navigate(page: &mut PageState, data: &ServerData, screen: Screen) {
        page.screen = screen;
        page.url = screen_url(screen);
        page.form = None;
        page.dropdown = None;
        page.confirm = None;
        page.selected.clear();
        page.attachment_form = None;
        page.name_error = false;
        page.toast = None;
        page.stale_keys = None;
        page.first_name_input = data.first_name.clone();
    }

    fn shown_keys(page: &PageState, data: &ServerData, section: Section) -> Vec<String> {
        match &page.stale_keys {
            Some((until, keys)) if Instant::now() < *until => keys.clone(),
            _ => data.keys(section),
        }
    }

    /// The table keeps `shown` and the toast stays down until the refresh lag
    /// has passed.
    fn saved(page: &mut PageState, data: &ServerData, shown: Vec<String>) {
        let at = Instant::now() + data.refresh_lag;
        page.stale_keys = Some((at, shown));
        page.toast = (!data.faults.contains(&Fault::SilentSaves))
            .then(|| (at, at + data.toast_ttl));
    }

    fn save_record(page: &mut PageState, data: &mut ServerData, shown: Vec<String>) {
        let (Some(form), Some(section)) = (page.form.clone(), page.screen.section()) else {
            return;
        };
        let accepted = match section {
            Section::Dependents => {
                let specify_ok = form.relationship.as_deref() != Some("Other")
                    || !form.specify.trim().is_empty();
                match &form.relationship {
                    Some(relationship) if !form.name.trim().is_empty() && specify_ok => {
                        let dependent = Dependent {
                            name: form.name.trim().to_string(),
                            relationship: relationship.clone(),
                            specify: (relationship == "Other").then(|| form.specify.clone()),
                        };
                        match form.editing {
                            Some(i) => {
                                if let Some(slot) = data.dependents.get_mut(i) {
                                    *slot = dependent;
                                }
                            }
                            None => data.dependents.push(dependent),
                        }
                        true
                    }
                    _ => false,
                }
            }
            Section::Memberships => match (&form.membership, listed(&form.amount)) {
                (Some(membership), Some(amount)) => {
                    let record = Membership {
                        membership: membership.clone(),
                        amount,
                    };
                    match form.editing {
                        Some(i) => {
                            if let Some(slot) = data.memberships.get_mut(i) {
                                *slot = record;
                            }
                        }
                        None => data.memberships.push(record),
                    }
                    true
                }
                _ => false,
            },
            Section::Immigration => {
                let number = form.number.trim().to_string();
                if number.is_empty() {
                    false
                } else {
                    match form.editing {
                        Some(i) => {
                            if let Some(slot) = data.immigration.get_mut(i) {
                                *slot = number;
                            }
                        }
                        None => data.immigration.push(number),
                    }
                    true
                }
            }
        };
        if accepted {
            page.form = None;
            Self::saved(page, data, shown);
        }
    }

    fn edit_form(data: &ServerData, section: Section, row: usize) -> RecordForm {
        let mut form = RecordForm {
            editing: Some(row),
            ..RecordForm::default()
        };
        match section {
            Section::Dependents => {
                if let Some(d) = data.dependents.get(row) {
                    form.name = d.name.clone();
                    form.relationship = Some(d.relationship.clone());
                    form.specify = d.specify.clone().unwrap_or_default();
                }
            }
            Section::Memberships => {
                if let Some(m) = data.memberships.get(row) {
                    form.membership = Some(m.membership.clone());
                    form.amount = m.amount.clone();
                }
            }
            Section::Immigration => {
                form.number = data.immigration.get(row).cloned().unwrap_or_default();
            }
        }
        form
    }

    fn set_value(page: &mut PageState, node: Node, value: &str) -> Result<(), String> {
        let value = value.to_string();
        match node {
            Node::Username => page.username = value,
            Node::Password => page.password = value,
            Node::FirstName => page.first_name_input = value,
            Node::Comment => {
                if let Some(form) = page.attachment_form.as_mut() {
                    form.comment = value;
                }
            }
            Node::NameInput | Node::SpecifyInput | Node::AmountInput | Node::NumberInput => {
                if let Some(form) = page.form.as_mut() {
                    match node {
                        Node::NameInput => form.name = value,
                        Node::SpecifyInput => form.specify = value,
                        Node::AmountInput => form.amount = value,
                        _ => form.number = value,
                    }
                }
            }
            other => return Err(format!("{other:?} is not an input")),
        }
        Ok(())
    }
}

#[async_trait]
impl Driver for FakeBrowser {
    async fn goto(&self, url: &str) -> E2eResult<()> {
        let mut page = lock(&self.page);
        let data = lock(&self.server);
        let target = url.trim_end_matches('/');
        let screen = if target == BASE_URL {
            if page.logged_in {
                Screen::Dashboard
            } else {
                Screen::Login
            }
        } else if let Some(screen) = [
            Screen::Login,
            Screen::Dashboard,
            Screen::PersonalDetails,
            Screen::ContactDetails,
            Screen::Dependents,
            Screen::Immigration,
            Screen::Qualifications,
            Screen::Memberships,
        ]
        .into_iter()
        .find(|s| screen_url(*s) == target)
        {
            if page.logged_in || screen == Screen::Login {
                screen
            } else {
                Screen::Login
            }
        } else {
            return Err(E2eError::Navigation {
                url: url.to_string(),
                message: "404 Not Found".to_string(),
            });
        };
        Self::navigate(&mut page, &data, screen);
        Ok(())
    }

    async fn current_url(&self) -> E2eResult<String> {
        Ok(lock(&self.page).url.clone())
    }

    async fn reload(&self) -> E2eResult<()> {
        let mut page = lock(&self.page);
        let data = lock(&self.server);
        if page.logged_in {
            page.header_name = format!("{} {LAST_NAME}", data.first_name);
        }
        let screen = page.screen;
        Self::navigate(&mut page, &data, screen);
        Ok(())
    }

    async fn click(&self, locator: &Locator) -> E2eResult<()> {
        let ((mut page, mut data), node) = self.first(locator)?;
        let shown = page
            .screen
            .section()
            .map(|section| Self::shown_keys(&page, &data, section))
            .unwrap_or_default();
        match node {
            Node::LoginSubmit => {
                let accepted = page.username == "Admin"
                    && page.password == "admin123"
                    && !data.faults.contains(&Fault::RejectLogin);
                if accepted {
                    data.logins += 1;
                    page.logged_in = true;
                    page.header_name = format!("{} {LAST_NAME}", data.first_name);
                    Self::navigate(&mut page, &data, Screen::Dashboard);
                }
            }
            Node::MenuItem => Self::navigate(&mut page, &data, Screen::PersonalDetails),
            Node::SubTab(i) => {
                if let Some(screen) = Screen::from_segment(SUB_TABS[i]) {
                    Self::navigate(&mut page, &data, screen);
                }
            }
            Node::PersonalSave => {
                if page.first_name_input.trim().is_empty() {
                    page.name_error = true;
                } else {
                    page.name_error = false;
                    data.first_name = page.first_name_input.trim().to_string();
                    Self::saved(&mut page, &data, shown);
                }
            }
            Node::AddRecord => page.form = Some(RecordForm::default()),
            Node::RelationshipSelect => page.dropdown = Some(DropdownKind::Relationship),
            Node::MembershipSelect => page.dropdown = Some(DropdownKind::Membership),
            Node::DropdownOption(i) => {
                if let Some(kind) = page.dropdown.take() {
                    let choice = (i > 0).then(|| kind.options()[i].to_string());
                    if let Some(form) = page.form.as_mut() {
                        match kind {
                            DropdownKind::Relationship => form.relationship = choice,
                            DropdownKind::Membership => form.membership = choice,
                        }
                    }
                }
            }
            Node::SaveRecord => Self::save_record(&mut page, &mut data, shown),
            Node::RowEdit(i) => {
                if let Some(section) = page.screen.section() {
                    page.form = Some(Self::edit_form(&data, section, i));
                }
            }
            Node::RowDelete(i) => page.confirm = Some(vec![i]),
            Node::RowCheckbox(i) => {
                if !page.selected.remove(&i) {
                    let _ = page.selected.insert(i);
                }
            }
            Node::DeleteSelected => {
                let rows: Vec<usize> = page.selected.iter().copied().collect();
                page.confirm = Some(rows);
            }
            Node::ConfirmDelete => {
                if let (Some(rows), Some(section)) = (page.confirm.take(), page.screen.section()) {
                    if data.faults.contains(&Fault::DeletesEverything) {
                        let every = (0..data.record_count(section)).collect();
                        data.remove_rows(section, every);
                    } else if !data.faults.contains(&Fault::DeletesIgnored) {
                        data.remove_rows(section, rows);
                    }
                    page.selected.clear();
                    Self::saved(&mut page, &data, shown);
                }
            }
            Node::AttachAdd => page.attachment_form = Some(AttachmentForm::default()),
            Node::AttachSave => {
                if let Some(form) = page.attachment_form.take() {
                    if form.file.is_some() {
                        let screen = page.screen;
                        data.attachments
                            .entry(screen)
                            .or_default()
                            .push(form.comment.trim().to_string());
                        Self::saved(&mut page, &data, shown);
                    } else {
                        page.attachment_form = Some(form);
                    }
                }
            }
            _ => {}
        }
        Ok(())
    }

    async fn fill(&self, locator: &Locator, value: &str) -> E2eResult<()> {
        let ((mut page, _data), node) = self.first(locator)?;
        Self::set_value(&mut page, node, value).map_err(|message| E2eError::Interaction {
            locator: locator.to_string(),
            message,
        })
    }

    async fn clear(&self, locator: &Locator) -> E2eResult<()> {
        self.fill(locator, "").await
    }

    async fn text_contents(&self, locator: &Locator) -> E2eResult<Vec<String>> {
        let page = lock(&self.page);
        let data = lock(&self.server);
        let section = page.screen.section();
        Ok(self
            .resolve(&page, &data, locator)
            .into_iter()
            .map(|node| match node {
                Node::KeyCell(i) => section
                    .and_then(|s| Self::shown_keys(&page, &data, s).get(i).cloned())
                    .unwrap_or_default(),
                Node::CommentCell(i) => data
                    .attachments
                    .get(&page.screen)
                    .and_then(|c| c.get(i).cloned())
                    .unwrap_or_default(),
                Node::FieldError => "Required".to_string(),
                Node::ProfileName => page.header_name.clone(),
                Node::DropdownOption(i) => page
                    .dropdown
                    .map(|k| k.options()[i].to_string())
                    .unwrap_or_default(),
                Node::SubTab(i) => SUB_TABS[i].to_string(),
                _ => String::new(),
            })
            .collect())
    }

    async fn attribute_values(&self, locator: &Locator, name: &str) -> E2eResult<Vec<String>> {
        let page = lock(&self.page);
        let data = lock(&self.server);
        Ok(self
            .resolve(&page, &data, locator)
            .into_iter()
            .map(|node| match (node, name) {
                (Node::SubTab(i), "href") => tab_url(SUB_TABS[i]),
                _ => String::new(),
            })
            .collect())
    }

    async fn count(&self, locator: &Locator) -> E2eResult<usize> {
        let page = lock(&self.page);
        let data = lock(&self.server);
        Ok(self.resolve(&page, &data, locator).len())
    }

    async fn is_visible(&self, locator: &Locator) -> E2eResult<bool> {
        Ok(self.count(locator).await? > 0)
    }

    async fn set_input_files(&self, locator: &Locator, files: &[PathBuf]) -> E2eResult<()> {
        let ((mut page, _data), node) = self.first(locator)?;
        match (node, page.attachment_form.as_mut()) {
            (Node::FileInput, Some(form)) => {
                form.file = files.first().cloned();
                Ok(())
            }
            _ => Err(E2eError::Interaction {
                locator: locator.to_string(),
                message: "not a file input".to_string(),
            }),
        }
    }

    async fn close(&self) -> E2eResult<()> {
        let mut page = lock(&self.page);
        page.closed = true;
        lock(&self.server).closed_sessions += 1;
        Ok(())
    }
}

/// The fake installation plus a fast suite configuration pointing at it
#[derive(Debug, Clone)]
pub struct FakeHrm {
    server: Arc<Mutex<ServerData>>,
    config: Arc<SuiteConfig>,
    _upload: Arc<tempfile::NamedTempFile>,
}

impl Default for FakeHrm {
    fn default() -> Self {
        Self::new()
    }
}

impl FakeHrm {
    pub fn new() -> Self {
        let mut upload = tempfile::Builder::new()
            .suffix(".pdf")
            .tempfile()
            .expect("temp upload file");
        writeln!(upload, "%PDF-1.4").expect("write upload file");

        let mut config = SuiteConfig::default();
        config.base_url = BASE_URL.to_string();
        config.timeouts.action_ms = 250;
        config.timeouts.poll_ms = 2;
        config.timeouts.navigation_ms = 250;
        config.timeouts.settle_ms = 40;
        config.test_data.sample_upload = upload.path().to_path_buf();

        Self {
            server: Arc::new(Mutex::new(ServerData::default())),
            config: Arc::new(config),
            _upload: Arc::new(upload),
        }
    }

    /// Make the installation misbehave
    pub fn with_fault(self, fault: Fault) -> Self {
        let _ = lock(&self.server).faults.insert(fault);
        self
    }

    /// Delay table refreshes by `refresh_lag` after a save and keep the
    /// success toast up for `toast_ttl`
    pub fn with_timing(self, refresh_lag: Duration, toast_ttl: Duration) -> Self {
        {
            let mut data = lock(&self.server);
            data.refresh_lag = refresh_lag;
            data.toast_ttl = toast_ttl;
        }
        self
    }

    /// Replace the suite configuration (the upload file stays the same)
    pub fn with_config(mut self, edit: impl FnOnce(&mut SuiteConfig)) -> Self {
        let mut config = (*self.config).clone();
        edit(&mut config);
        self.config = Arc::new(config);
        self
    }

    pub fn config(&self) -> Arc<SuiteConfig> {
        Arc::clone(&self.config)
    }

    pub fn browser(&self) -> FakeBrowser {
        FakeBrowser {
            server: Arc::clone(&self.server),
            page: Mutex::new(PageState::default()),
            selectors: self.config.selectors.clone(),
        }
    }

    /// A session that has not logged in yet
    pub fn session(&self) -> Session<FakeBrowser> {
        Session::new(self.browser(), self.config())
    }

    /// A session already past the login screen
    pub async fn logged_in(&self) -> Session<FakeBrowser> {
        let session = self.session();
        orangehrm_e2e::LoginPage::new(&session)
            .perform_login(&self.config.credentials)
            .await
            .expect("login against the fake");
        session
    }

    pub fn first_name(&self) -> String {
        lock(&self.server).first_name.clone()
    }

    pub fn dependents(&self) -> Vec<Dependent> {
        lock(&self.server).dependents.clone()
    }

    pub fn membership_amounts(&self) -> Vec<String> {
        lock(&self.server)
            .memberships
            .iter()
            .map(|m| m.amount.clone())
            .collect()
    }

    pub fn memberships(&self) -> Vec<Membership> {
        lock(&self.server).memberships.clone()
    }

    pub fn immigration(&self) -> Vec<String> {
        lock(&self.server).immigration.clone()
    }

    pub fn attachments(&self, screen: Screen) -> Vec<String> {
        lock(&self.server)
            .attachments
            .get(&screen)
            .cloned()
            .unwrap_or_default()
    }

    pub fn logins(&self) -> usize {
        lock(&self.server).logins
    }

    pub fn closed_sessions(&self) -> usize {
        lock(&self.server).closed_sessions
    }

    pub fn seed_dependent(&self, name: &str) {
        lock(&self.server).dependents.push(Dependent {
            name: name.to_string(),
            relationship: "Child".to_string(),
            specify: None,
        });
    }

    pub fn seed_membership(&self, amount: &str) {
        lock(&self.server).memberships.push(Membership {
            membership: MEMBERSHIP_OPTIONS[1].to_string(),
            amount: listed(amount).expect("numeric amount"),
        });
    }

    pub fn seed_immigration(&self, number: &str) {
        lock(&self.server).immigration.push(number.to_string());
    }
}

#[async_trait]
impl SessionFactory for FakeHrm {
    type Driver = FakeBrowser;

    async fn open(&self) -> E2eResult<Session<FakeBrowser>> {
        Ok(self.session())
    }
}

//! Page objects for the screens the suite drives.
//!
//! Each page object borrows a [`Session`](crate::Session) and exposes one
//! method per user workflow. Methods return what the UI shows afterwards
//! (a list, a URL, a message, a visibility flag) and never assert.

mod components;
mod dependents;
mod login;
mod my_info;

pub use components::{AttachmentPanel, Dropdown, RecordTable};
pub use dependents::{DependentsPage, Relationship};
pub use login::LoginPage;
pub use my_info::MyInfoPage;

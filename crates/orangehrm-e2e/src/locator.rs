//! Locator abstraction for element selection.
//!
//! A [`Locator`] is a description, not a handle: it is resolved inside the page
//! every time an interaction runs, so it survives Vue re-renders of the
//! OrangeHRM tables. Locators compose the way Playwright's do: a child selector
//! matches under every element of its parent, and `nth` narrows afterwards.
//!
//! ```ignore
//! let rows = Locator::new(".orangehrm-container").first().locator(".oxd-table-card");
//! let delete = rows.nth(2).locator("button:has(i.bi-trash)");
//! ```
//!
//! Selectors are written as strings in the suite configuration and parsed with
//! [`Selector::parse`]:
//!
//! | prefix | meaning |
//! |---|---|
//! | `css=` (or none) | CSS selector |
//! | `xpath=` (or leading `/`, `./`, `(`) | XPath; use `.//` to stay inside a parent |
//! | `text=` | innermost elements whose text contains the value |
//! | `testid=` | `data-testid` attribute |
//! | `role=` | ARIA role, optionally `role=button[name="Save"]` |

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Default timeout for auto-waiting (10 seconds)
pub const DEFAULT_TIMEOUT_MS: u64 = 10_000;

/// Default polling interval for auto-waiting (100ms)
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 100;

/// Selector type for locating elements
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Selector {
    /// CSS selector (e.g., "button.primary")
    Css(String),
    /// XPath selector
    XPath(String),
    /// Text content selector
    Text(String),
    /// Test ID selector (data-testid attribute)
    TestId(String),
    /// Combined selector with text filter
    CssWithText {
        /// Base CSS selector
        css: String,
        /// Text content to match
        text: String,
    },
    /// ARIA role with optional accessible name
    Role {
        /// Role name (button, link, textbox, ...)
        role: String,
        /// Accessible name to match exactly (trimmed)
        name: Option<String>,
    },
}

/// Quote a value as a JavaScript string literal.
pub(crate) fn js_str(value: &str) -> String {
    serde_json::Value::String(value.to_owned()).to_string()
}

impl Selector {
    /// Create a CSS selector
    #[must_use]
    pub fn css(selector: impl Into<String>) -> Self {
        Self::Css(selector.into())
    }

    /// Create an XPath selector
    #[must_use]
    pub fn xpath(expr: impl Into<String>) -> Self {
        Self::XPath(expr.into())
    }

    /// Create a test ID selector
    #[must_use]
    pub fn test_id(id: impl Into<String>) -> Self {
        Self::TestId(id.into())
    }

    /// Create a text selector
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(text.into())
    }

    /// Create a role selector
    #[must_use]
    pub fn role(role: impl Into<String>, name: Option<&str>) -> Self {
        Self::Role {
            role: role.into(),
            name: name.map(str::to_owned),
        }
    }

    /// Parse the string form used in configuration files.
    ///
    /// Returns `None` for an empty selector.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        if raw.is_empty() {
            return None;
        }
        let parsed = if let Some(rest) = raw.strip_prefix("css=") {
            if let Some((css, text)) = rest.split_once(" >> text=") {
                Self::CssWithText {
                    css: css.to_owned(),
                    text: text.to_owned(),
                }
            } else {
                Self::Css(rest.to_owned())
            }
        } else if let Some(rest) = raw.strip_prefix("xpath=") {
            Self::XPath(rest.to_owned())
        } else if let Some(rest) = raw.strip_prefix("text=") {
            Self::Text(rest.to_owned())
        } else if let Some(rest) = raw.strip_prefix("testid=") {
            Self::TestId(rest.to_owned())
        } else if let Some(rest) = raw.strip_prefix("role=") {
            parse_role(rest)
        } else if raw.starts_with('/') || raw.starts_with("./") || raw.starts_with('(') {
            Self::XPath(raw.to_owned())
        } else {
            Self::Css(raw.to_owned())
        };
        Some(parsed)
    }

    /// JavaScript expression evaluating to an array of every element under
    /// `root` (a JS expression yielding a Document or Element) that matches.
    #[must_use]
    pub fn to_query_all(&self, root: &str) -> String {
        match self {
            Self::Css(s) => format!("Array.from({root}.querySelectorAll({}))", js_str(s)),
            Self::XPath(s) => format!(
                "(() => {{ const r = document.evaluate({}, {root}, null, XPathResult.ORDERED_NODE_SNAPSHOT_TYPE, null); \
                 const out = []; for (let i = 0; i < r.snapshotLength; i++) out.push(r.snapshotItem(i)); return out; }})()",
                js_str(s)
            ),
            Self::Text(t) => format!(
                "Array.from({root}.querySelectorAll('*')).filter(el => el.textContent.includes({t}) \
                 && !Array.from(el.children).some(c => c.textContent.includes({t})))",
                t = js_str(t)
            ),
            Self::TestId(id) => format!(
                "Array.from({root}.querySelectorAll({}))",
                js_str(&format!("[data-testid=\"{id}\"]"))
            ),
            Self::CssWithText { css, text } => format!(
                "Array.from({root}.querySelectorAll({})).filter(el => el.textContent.includes({}))",
                js_str(css),
                js_str(text)
            ),
            Self::Role { role, name } => {
                let base = format!(
                    "Array.from({root}.querySelectorAll({}))",
                    js_str(&role_css(role))
                );
                match name {
                    Some(n) => format!(
                        "{base}.filter(el => ((el.getAttribute('aria-label') || el.textContent || el.getAttribute('placeholder') || '').trim()) === {})",
                        js_str(n)
                    ),
                    None => base,
                }
            }
        }
    }
}

fn parse_role(rest: &str) -> Selector {
    match rest.split_once('[') {
        Some((role, attrs)) => {
            let name = attrs
                .trim_end_matches(']')
                .strip_prefix("name=")
                .map(|n| n.trim_matches(|c| c == '"' || c == '\'').to_owned());
            Selector::Role {
                role: role.to_owned(),
                name,
            }
        }
        None => Selector::Role {
            role: rest.to_owned(),
            name: None,
        },
    }
}

/// CSS approximation of the elements carrying an implicit or explicit role.
fn role_css(role: &str) -> String {
    match role {
        "button" => "button, [role=\"button\"], input[type=\"submit\"], input[type=\"button\"]".to_owned(),
        "link" => "a[href], [role=\"link\"]".to_owned(),
        "textbox" => "input:not([type]), input[type=\"text\"], input[type=\"password\"], textarea, [role=\"textbox\"]".to_owned(),
        "checkbox" => "input[type=\"checkbox\"], [role=\"checkbox\"]".to_owned(),
        "option" => "option, [role=\"option\"]".to_owned(),
        other => format!("[role=\"{other}\"]"),
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Css(s) => write!(f, "css={s}"),
            Self::XPath(s) => write!(f, "xpath={s}"),
            Self::Text(t) => write!(f, "text={t}"),
            Self::TestId(id) => write!(f, "testid={id}"),
            Self::CssWithText { css, text } => write!(f, "css={css} >> text={text}"),
            Self::Role { role, name: None } => write!(f, "role={role}"),
            Self::Role {
                role,
                name: Some(n),
            } => write!(f, "role={role}[name=\"{n}\"]"),
        }
    }
}

impl TryFrom<String> for Selector {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value).ok_or_else(|| "selector must not be empty".to_owned())
    }
}

impl From<Selector> for String {
    fn from(selector: Selector) -> Self {
        selector.to_string()
    }
}

/// Locator options for customizing auto-wait behavior
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocatorOptions {
    /// Timeout for auto-waiting
    pub timeout: Duration,
    /// Polling interval for auto-waiting
    pub poll_interval: Duration,
}

impl Default for LocatorOptions {
    fn default() -> Self {
        Self {
            timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
            poll_interval: Duration::from_millis(DEFAULT_POLL_INTERVAL_MS),
        }
    }
}

/// A locator for finding elements, optionally scoped to a parent and narrowed
/// to the n-th match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Locator {
    selector: Selector,
    parent: Option<Box<Locator>>,
    index: Option<usize>,
    options: LocatorOptions,
}

impl Locator {
    /// Create a new locator with a CSS selector
    #[must_use]
    pub fn new(selector: impl Into<String>) -> Self {
        Self::from_selector(Selector::Css(selector.into()))
    }

    /// Create a locator from a selector
    #[must_use]
    pub fn from_selector(selector: Selector) -> Self {
        Self {
            selector,
            parent: None,
            index: None,
            options: LocatorOptions::default(),
        }
    }

    /// Filter by text content
    ///
    /// Only CSS selectors can carry a text filter; other selectors are
    /// returned unchanged.
    #[must_use]
    pub fn with_text(self, text: impl Into<String>) -> Self {
        let selector = match self.selector {
            Selector::Css(css) => Selector::CssWithText {
                css,
                text: text.into(),
            },
            other => other,
        };
        Self { selector, ..self }
    }

    /// Narrow to the n-th match (zero based)
    #[must_use]
    pub fn nth(mut self, index: usize) -> Self {
        self.index = Some(index);
        self
    }

    /// Narrow to the first match
    #[must_use]
    pub fn first(self) -> Self {
        self.nth(0)
    }

    /// Locate `child` inside every element this locator resolves to
    #[must_use]
    pub fn locator(&self, child: impl Into<String>) -> Self {
        self.child(Selector::Css(child.into()))
    }

    /// Locate an arbitrary selector inside this locator's elements
    #[must_use]
    pub fn child(&self, selector: Selector) -> Self {
        Self {
            selector,
            parent: Some(Box::new(self.clone())),
            index: None,
            options: self.options.clone(),
        }
    }

    /// Set a custom timeout
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.options.timeout = timeout;
        self
    }

    /// Set a custom polling interval
    #[must_use]
    pub const fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.options.poll_interval = interval;
        self
    }

    /// Get the selector
    #[must_use]
    pub const fn selector(&self) -> &Selector {
        &self.selector
    }

    /// Get the parent locator, if scoped
    #[must_use]
    pub fn parent(&self) -> Option<&Self> {
        self.parent.as_deref()
    }

    /// Get the n-th index, if narrowed
    #[must_use]
    pub const fn index(&self) -> Option<usize> {
        self.index
    }

    /// Get the options
    #[must_use]
    pub const fn options(&self) -> &LocatorOptions {
        &self.options
    }

    /// JavaScript expression evaluating to the array of matched elements.
    #[must_use]
    pub fn to_query_all(&self) -> String {
        let all = match &self.parent {
            None => self.selector.to_query_all("document"),
            Some(parent) => format!(
                "({}).flatMap(root => {})",
                parent.to_query_all(),
                self.selector.to_query_all("root")
            ),
        };
        match self.index {
            Some(i) => format!("(() => {{ const el = ({all})[{i}]; return el ? [el] : []; }})()"),
            None => all,
        }
    }

    /// JavaScript expression evaluating to the target element or `null`.
    #[must_use]
    pub fn to_query(&self) -> String {
        format!("(({})[0] || null)", self.to_query_all())
    }

    /// JavaScript expression evaluating to the number of matched elements.
    #[must_use]
    pub fn to_count_query(&self) -> String {
        format!("({}).length", self.to_query_all())
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(parent) = &self.parent {
            write!(f, "{parent} >> ")?;
        }
        write!(f, "{}", self.selector)?;
        if let Some(i) = self.index {
            write!(f, " >> nth={i}")?;
        }
        Ok(())
    }
}

impl From<Selector> for Locator {
    fn from(selector: Selector) -> Self {
        Self::from_selector(selector)
    }
}

//! Page Object Model support
//!
//! Every screen of the suite is a page object borrowing the session. The
//! trait only carries what the session needs to confirm that a navigation
//! landed on the right screen.

/// Trait for page objects representing a page or component in the UI.
///
/// # Example
///
/// ```ignore
/// impl<D: Driver> PageObject for DependentsPage<'_, D> {
///     fn url_pattern(&self) -> &str {
///         "/**/pim/viewDependents/empNumber/:emp_number"
///     }
/// }
///
/// session.wait_for_page(&dependents).await?;
/// ```
pub trait PageObject {
    /// URL path pattern of this page, see [`UrlMatcher`]
    fn url_pattern(&self) -> &str;

    /// Get the page name for logging/debugging
    fn page_name(&self) -> &str {
        std::any::type_name::<Self>()
    }
}

/// URL pattern matcher for page objects
#[derive(Debug, Clone)]
pub struct UrlMatcher {
    pattern: String,
    segments: Vec<UrlSegment>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum UrlSegment {
    Literal(String),
    Wildcard,
    AnyDepth,
}

/// Path part of a URL, without scheme, host, query or fragment.
fn path_of(url: &str) -> &str {
    let url = url.split(|c| c == '?' || c == '#').next().unwrap_or(url);
    match url.find("://") {
        Some(i) => {
            let rest = &url[i + 3..];
            rest.find('/').map_or("/", |j| &rest[j..])
        }
        None => url,
    }
}

impl UrlMatcher {
    /// Create a new URL matcher from a pattern
    ///
    /// Patterns support:
    /// - Literal segments: `/auth/login`
    /// - Wildcards: `/pim/*` (exactly one segment)
    /// - Any depth: `/**/pim/viewMyDetails` (zero or more segments)
    /// - Named segments: `/empNumber/:emp_number` (one segment, like `*`)
    #[must_use]
    pub fn new(pattern: &str) -> Self {
        let segments = pattern
            .split('/')
            .filter(|s| !s.is_empty())
            .map(|s| match s {
                "*" => UrlSegment::Wildcard,
                "**" => UrlSegment::AnyDepth,
                _ if s.starts_with(':') => UrlSegment::Wildcard,
                _ => UrlSegment::Literal(s.to_string()),
            })
            .collect();

        Self {
            pattern: pattern.to_string(),
            segments,
        }
    }

    /// Check if a URL (full or path only) matches the pattern
    #[must_use]
    pub fn matches(&self, url: &str) -> bool {
        let url_segments: Vec<&str> = path_of(url).split('/').filter(|s| !s.is_empty()).collect();
        match_segments(&self.segments, &url_segments)
    }

    /// Get the pattern string
    #[must_use]
    pub fn pattern(&self) -> &str {
        &self.pattern
    }
}

fn match_segments(pattern: &[UrlSegment], url: &[&str]) -> bool {
    let Some((head, rest)) = pattern.split_first() else {
        return url.is_empty();
    };
    match head {
        UrlSegment::AnyDepth => (0..=url.len()).any(|skip| match_segments(rest, &url[skip..])),
        UrlSegment::Literal(lit) => {
            url.first() == Some(&lit.as_str()) && match_segments(rest, &url[1..])
        }
        UrlSegment::Wildcard => !url.is_empty() && match_segments(rest, &url[1..]),
    }
}

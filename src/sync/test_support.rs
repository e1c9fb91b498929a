//! Test doubles for driving the synchroniser without a browser.

use super::Page;

/// A page described by the selectors it contains.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StaticPage {
    selectors: Vec<String>,
}

impl StaticPage {
    /// Creates a page containing elements for each selector.
    #[must_use]
    pub fn with_elements(selectors: &[&str]) -> Self {
        Self {
            selectors: selectors.iter().map(|&selector| selector.to_owned()).collect(),
        }
    }
}

impl Page for StaticPage {
    fn contains(&self, selector: &str) -> bool {
        self.selectors.iter().any(|existing| existing == selector)
    }
}

//! Page driver capability
//!
//! Field controllers never talk to a browser directly. Every DOM read or
//! write goes through a `PageDriver`, where a selector resolves to zero or
//! more elements and the first match answers single-element queries.

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

use crate::error::{E2eError, E2eResult};

#[async_trait]
pub trait PageDriver: Send + Sync {
    /// Navigate to a URL
    async fn goto(&self, url: &str) -> E2eResult<()>;

    /// Number of elements matching `selector`
    async fn locate_count(&self, selector: &str) -> E2eResult<usize>;

    async fn is_visible(&self, selector: &str) -> E2eResult<bool>;

    async fn is_enabled(&self, selector: &str) -> E2eResult<bool>;

    /// Current value of a form control
    async fn read_value(&self, selector: &str) -> E2eResult<String>;

    /// Option labels of a select element, in DOM order
    async fn read_options(&self, selector: &str) -> E2eResult<Vec<String>>;

    /// Select the option whose value is `value`
    async fn select(&self, selector: &str, value: &str) -> E2eResult<()>;
}

/// Element held by a `MockPage`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MockElement {
    pub count: usize,
    pub visible: bool,
    pub enabled: bool,
    pub value: String,
    pub options: Vec<String>,
}

impl Default for MockElement {
    fn default() -> Self {
        Self {
            count: 1,
            visible: true,
            enabled: true,
            value: String::new(),
            options: Vec::new(),
        }
    }
}

impl MockElement {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn hidden(mut self) -> Self {
        self.visible = false;
        self
    }

    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }

    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = value.into();
        self
    }

    pub fn with_options<I, S>(mut self, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.options = options.into_iter().map(Into::into).collect();
        self
    }
}

#[derive(Debug, Default)]
struct MockInner {
    elements: HashMap<String, MockElement>,
    navigations: Vec<String>,
    selections: Vec<(String, String)>,
}

/// Called after every successful selection with `(page, selector, value)`
pub type SelectReaction = Arc<dyn Fn(&MockPage, &str, &str) + Send + Sync>;

/// In-memory page used by tests and dry runs.
///
/// Unknown selectors resolve to zero elements; single-element queries on
/// them fail the way a real driver times out on a missing locator. A
/// reaction installed with `on_select` plays the application's part when a
/// selection changes other controls.
#[derive(Default)]
pub struct MockPage {
    inner: Mutex<MockInner>,
    reaction: Mutex<Option<SelectReaction>>,
}

impl std::fmt::Debug for MockPage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockPage")
            .field("inner", &*self.inner.lock())
            .field("reaction", &self.reaction.lock().is_some())
            .finish()
    }
}

impl MockPage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Place or replace the element behind `selector`
    pub fn set(&self, selector: &str, element: MockElement) {
        self.inner.lock().elements.insert(selector.to_string(), element);
    }

    pub fn remove(&self, selector: &str) {
        self.inner.lock().elements.remove(selector);
    }

    /// React to selections the way the application would
    pub fn on_select(&self, reaction: impl Fn(&MockPage, &str, &str) + Send + Sync + 'static) {
        *self.reaction.lock() = Some(Arc::new(reaction));
    }

    /// Mutate an existing element in place
    pub fn update(&self, selector: &str, f: impl FnOnce(&mut MockElement)) {
        if let Some(element) = self.inner.lock().elements.get_mut(selector) {
            f(element);
        }
    }

    pub fn element(&self, selector: &str) -> Option<MockElement> {
        self.inner.lock().elements.get(selector).cloned()
    }

    pub fn navigations(&self) -> Vec<String> {
        self.inner.lock().navigations.clone()
    }

    /// `(selector, value)` pairs in the order they were selected
    pub fn selections(&self) -> Vec<(String, String)> {
        self.inner.lock().selections.clone()
    }

    fn with_element<T>(&self, selector: &str, f: impl FnOnce(&MockElement) -> T) -> E2eResult<T> {
        let inner = self.inner.lock();
        match inner.elements.get(selector) {
            Some(element) if element.count > 0 => Ok(f(element)),
            _ => Err(E2eError::Driver(format!("no element matches {}", selector))),
        }
    }
}

#[async_trait]
impl PageDriver for MockPage {
    async fn goto(&self, url: &str) -> E2eResult<()> {
        debug!("mock navigate: {}", url);
        self.inner.lock().navigations.push(url.to_string());
        Ok(())
    }

    async fn locate_count(&self, selector: &str) -> E2eResult<usize> {
        Ok(self
            .inner
            .lock()
            .elements
            .get(selector)
            .map(|element| element.count)
            .unwrap_or(0))
    }

    async fn is_visible(&self, selector: &str) -> E2eResult<bool> {
        Ok(self
            .inner
            .lock()
            .elements
            .get(selector)
            .map(|element| element.count > 0 && element.visible)
            .unwrap_or(false))
    }

    async fn is_enabled(&self, selector: &str) -> E2eResult<bool> {
        self.with_element(selector, |element| element.enabled)
    }

    async fn read_value(&self, selector: &str) -> E2eResult<String> {
        self.with_element(selector, |element| element.value.clone())
    }

    async fn read_options(&self, selector: &str) -> E2eResult<Vec<String>> {
        self.with_element(selector, |element| element.options.clone())
    }

    async fn select(&self, selector: &str, value: &str) -> E2eResult<()> {
        {
            let mut inner = self.inner.lock();
            match inner.elements.get_mut(selector) {
                Some(element) if element.count > 0 && element.enabled => {
                    element.value = value.to_string();
                }
                Some(_) => {
                    return Err(E2eError::Driver(format!(
                        "element {} is not selectable",
                        selector
                    )))
                }
                None => return Err(E2eError::Driver(format!("no element matches {}", selector))),
            }
            inner.selections.push((selector.to_string(), value.to_string()));
        }

        let reaction = self.reaction.lock().clone();
        if let Some(reaction) = reaction {
            reaction(self, selector, value);
        }
        Ok(())
    }
}

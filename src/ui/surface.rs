use crate::core::error::UiError;
use async_trait::async_trait;
use std::fmt;

/// How a scenario addresses an element on the page
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Locator {
    /// Input field by CSS selector
    Css(String),
    /// Button whose text equals the given text
    Button(String),
    /// Element whose whole text equals the given text
    ExactText(String),
    /// Element whose text contains the given text
    WithText(String),
}

impl Locator {
    pub fn css(selector: impl Into<String>) -> Self {
        Locator::Css(selector.into())
    }

    pub fn button(text: impl Into<String>) -> Self {
        Locator::Button(text.into())
    }

    pub fn exact_text(text: impl Into<String>) -> Self {
        Locator::ExactText(text.into())
    }

    pub fn with_text(text: impl Into<String>) -> Self {
        Locator::WithText(text.into())
    }

    /// Whether a rendered element satisfies this locator
    pub fn matches(&self, element: &ElementHandle) -> bool {
        match self {
            Locator::Css(selector) => element.selector.as_deref() == Some(selector.as_str()),
            Locator::Button(text) => element.kind == ElementKind::Button && element.text == *text,
            Locator::ExactText(text) => element.text == *text,
            Locator::WithText(text) => element.text.contains(text.as_str()),
        }
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Locator::Css(selector) => write!(f, "css '{}'", selector),
            Locator::Button(text) => write!(f, "button '{}'", text),
            Locator::ExactText(text) => write!(f, "text '{}'", text),
            Locator::WithText(text) => write!(f, "element containing '{}'", text),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementKind {
    Input,
    Button,
    Text,
}

/// Snapshot of a visible element
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementHandle {
    pub kind: ElementKind,
    /// CSS selector the element answers to, for inputs
    pub selector: Option<String>,
    pub text: String,
}

impl ElementHandle {
    pub fn input(selector: impl Into<String>) -> Self {
        Self {
            kind: ElementKind::Input,
            selector: Some(selector.into()),
            text: String::new(),
        }
    }

    pub fn button(text: impl Into<String>) -> Self {
        Self {
            kind: ElementKind::Button,
            selector: None,
            text: text.into(),
        }
    }

    pub fn text(text: impl Into<String>) -> Self {
        Self {
            kind: ElementKind::Text,
            selector: None,
            text: text.into(),
        }
    }
}

/// The page a scenario drives. Implementations own all DOM and browser concerns.
#[async_trait]
pub trait UiSurface: Send + Sync {
    async fn set_field(&self, locator: &Locator, value: &str) -> Result<(), UiError>;

    /// Activate a control. Returns once the click is dispatched, not once its effects land.
    async fn click(&self, locator: &Locator) -> Result<(), UiError>;

    async fn is_visible(&self, locator: &Locator) -> bool;

    /// First visible element whose text equals `text`
    async fn find_by_text(&self, text: &str) -> Option<ElementHandle>;

    /// Why the last submit never reached the app, if it did not
    async fn last_failure(&self) -> Option<String> {
        None
    }
}

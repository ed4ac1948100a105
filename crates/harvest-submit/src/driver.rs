//! Browser capability surface used by the session controller.

use crate::error::DriverError;

/// Opaque reference to an element on the current page.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ElementHandle(pub String);

impl ElementHandle {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn id(&self) -> &str {
        &self.0
    }
}

/// Keyboard sequences understood by [`FormDriver::type_text`].
///
/// Values follow the WebDriver key codepoints.
pub mod keys {
    /// Ctrl+A, then release Ctrl.
    pub const SELECT_ALL: &str = "\u{E009}a\u{E000}";

    /// A single Delete key press.
    pub const DELETE_KEY: &str = "\u{E017}";
}

/// What the harvester needs from a browser.
///
/// `find` is a single probe: it reports whether the element is present right
/// now. Waiting for elements to appear is the session's job.
pub trait FormDriver {
    /// Navigate to `url`.
    fn open(&mut self, url: &str) -> Result<(), DriverError>;

    /// Look up an element by CSS selector.
    fn find(&mut self, selector: &str) -> Result<Option<ElementHandle>, DriverError>;

    fn click(&mut self, element: &ElementHandle) -> Result<(), DriverError>;

    /// Send keystrokes to an element. May contain [`keys`] sequences.
    fn type_text(&mut self, element: &ElementHandle, text: &str) -> Result<(), DriverError>;

    /// Visible text of an element.
    fn read_text(&mut self, element: &ElementHandle) -> Result<String, DriverError>;

    /// End the browser context.
    fn close(&mut self) -> Result<(), DriverError>;
}

impl<T: FormDriver + ?Sized> FormDriver for &mut T {
    fn open(&mut self, url: &str) -> Result<(), DriverError> {
        (**self).open(url)
    }

    fn find(&mut self, selector: &str) -> Result<Option<ElementHandle>, DriverError> {
        (**self).find(selector)
    }

    fn click(&mut self, element: &ElementHandle) -> Result<(), DriverError> {
        (**self).click(element)
    }

    fn type_text(&mut self, element: &ElementHandle, text: &str) -> Result<(), DriverError> {
        (**self).type_text(element, text)
    }

    fn read_text(&mut self, element: &ElementHandle) -> Result<String, DriverError> {
        (**self).read_text(element)
    }

    fn close(&mut self) -> Result<(), DriverError> {
        (**self).close()
    }
}

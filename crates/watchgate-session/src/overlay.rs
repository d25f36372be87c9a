//! Loading-overlay controller.
//!
//! Long transitions (authentication, profile fetch) want a blocking overlay
//! in the UI. The renderer registers its handler late, so the controller
//! treats show/hide before registration as safe no-ops instead of errors.

use tracing::debug;

/// Rendering side of the overlay.
pub trait OverlayHandler {
    fn show(&self, message: &str);
    fn hide(&self);
}

/// Dispatches overlay requests to the registered handler, if any.
#[derive(Default)]
pub struct OverlayController {
    handler: Option<Box<dyn OverlayHandler>>,
}

impl OverlayController {
    /// Creates a controller with no handler registered.
    pub fn new() -> Self {
        Self { handler: None }
    }

    /// Installs the rendering handler, replacing any previous one.
    pub fn register(&mut self, handler: Box<dyn OverlayHandler>) {
        self.handler = Some(handler);
    }

    /// Removes the handler; subsequent requests become no-ops again.
    pub fn unregister(&mut self) {
        self.handler = None;
    }

    /// Whether a handler is currently registered.
    pub fn is_registered(&self) -> bool {
        self.handler.is_some()
    }

    /// Shows the overlay with a message. No-op before registration.
    pub fn show(&self, message: &str) {
        match &self.handler {
            Some(handler) => handler.show(message),
            None => debug!(message, "overlay show requested before registration"),
        }
    }

    /// Hides the overlay. No-op before registration.
    pub fn hide(&self) {
        match &self.handler {
            Some(handler) => handler.hide(),
            None => debug!("overlay hide requested before registration"),
        }
    }
}

impl std::fmt::Debug for OverlayController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OverlayController")
            .field("registered", &self.handler.is_some())
            .finish()
    }
}

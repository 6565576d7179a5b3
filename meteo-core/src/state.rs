use crate::model::Place;

/// The selected place and the last error, shared by every screen and the search header.
#[derive(Debug, Clone, Default)]
pub struct SearchState {
    location: Option<Place>,
    error_message: Option<&'static str>,
}

impl SearchState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn location(&self) -> Option<&Place> {
        self.location.as_ref()
    }

    /// Replaces the selection wholesale; passing `None` clears it.
    pub fn set_location(&mut self, place: Option<Place>) {
        if let Some(p) = &place {
            tracing::info!(place = %p.label(), "location selected");
        }
        self.location = place;
    }

    pub fn error_message(&self) -> Option<&'static str> {
        self.error_message
    }

    pub fn set_error(&mut self, message: &'static str) {
        self.error_message = Some(message);
    }

    pub fn clear_error(&mut self) {
        self.error_message = None;
    }
}

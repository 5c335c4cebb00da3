use std::sync::Arc;

use crate::preview::PreviewResolver;

/// Shared application state passed to all handlers.
/// The resolver owns the HTTP clients, built once at startup from `Config`.
#[derive(Clone)]
pub struct AppState {
    pub resolver: Arc<PreviewResolver>,
}

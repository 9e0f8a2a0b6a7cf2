use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};

use crate::handlers::page::{OutputBufferFactory, string_buffer};
use crate::handlers::search::{index, query_api, search};
use crate::service::InteractionLoop;

/// Everything a request needs, built once at startup.
#[derive(Clone)]
pub struct SearchState {
    pub interaction: Arc<InteractionLoop>,
    pub page_title: Arc<str>,
    pub output_buffer: OutputBufferFactory,
}

impl SearchState {
    pub fn new(interaction: InteractionLoop, page_title: impl Into<Arc<str>>) -> Self {
        Self {
            interaction: Arc::new(interaction),
            page_title: page_title.into(),
            output_buffer: string_buffer,
        }
    }

    /// Replace the buffer the answer region is rendered into.
    pub fn with_output_buffer(mut self, output_buffer: OutputBufferFactory) -> Self {
        self.output_buffer = output_buffer;
        self
    }
}

pub fn search_router(state: SearchState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/search", post(search))
        .route("/api/query", post(query_api))
        .with_state(state)
}

pub mod fixture;
pub mod rest;
pub mod types;

use async_trait::async_trait;
use thiserror::Error;

use crate::engine::filter::MealFilter;
use types::MealPage;

/// Why a listing fetch produced no page. Clonable so the engine can hand the
/// most recent failure to every snapshot consumer without consuming it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SourceError {
    /// The request never produced an HTTP response (DNS, connect, timeout).
    #[error("transport: {0}")]
    Transport(String),
    /// The service answered with a non-success status.
    #[error("server returned {code}: {body}")]
    Status { code: u16, body: String },
    /// The body arrived but does not describe a listing page.
    #[error("malformed response: {0}")]
    Malformed(String),
}

/// Anything that can serve filtered, paginated meal listings. Pages are
/// 1-based and `page_size` is fixed for the life of a listing, so a source
/// only ever sees `(filter, page, page_size)` triples.
#[async_trait]
pub trait MealSource: Send + Sync {
    async fn fetch_page(
        &self,
        filter: &MealFilter,
        page: u32,
        page_size: u32,
    ) -> Result<MealPage, SourceError>;
}

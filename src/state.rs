use std::sync::Arc;

use sqlx::PgPool;

use crate::media::MediaStore;

/// Shared application context handed to every handler. Created once at
/// startup; everything request-scoped (identity, temp files) stays out.
#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub media: Arc<dyn MediaStore>,
}

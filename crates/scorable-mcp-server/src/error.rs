use scorable_client::ClientError;

use crate::tools::CatalogueError;

/// Startup failures of the tool router.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error(transparent)]
    Catalogue(#[from] CatalogueError),

    #[error("failed to create Scorable API client: {0}")]
    Client(#[from] ClientError),
}

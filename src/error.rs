use reqwest::StatusCode;
use thiserror::Error;

/// Failure taxonomy for the CRM front-end. Nothing here is fatal to the
/// process; every command surfaces the error and hands control back to the
/// operator for a manual retry.
#[derive(Debug, Error)]
pub enum Error {
    /// Local pre-submission validation. No network call was made.
    #[error("{0}")]
    Validation(String),

    /// Transport-level failure (connection refused, timeout, bad JSON).
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Any non-2xx response is a failure regardless of body content.
    #[error("server returned {status} for {url}")]
    Status { status: StatusCode, url: String },

    /// The renewal-advance call did not persist; the stored date is unchanged.
    #[error("renewal update for client {client_id} failed")]
    RenewalUpdate {
        client_id: u64,
        #[source]
        source: Box<Error>,
    },

    /// The client record was created but its detail record was not, and the
    /// compensating delete also failed. The orphaned client must be removed
    /// manually.
    #[error("client {client_id} was created without its detail record and could not be rolled back; delete it manually")]
    PartialCreation { client_id: u64 },

    #[error("could not read upload file: {0}")]
    Upload(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

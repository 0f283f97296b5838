//! Push access pre-check.
//!
//! The workflow reports a 403 on its own, but checking first avoids creating
//! a branch that can never receive files.

use thiserror::Error;
use tracing::{debug, warn};

use crate::github::{BrowseGateway, GitHubError, RepositoryLocator};

/// Reasons the pre-check refused to continue.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AccessCheckError {
    /// The repository is private and the token cannot push to it.
    #[error("you don't have write access to this private repository")]
    NoWriteAccess,

    /// The user or repository could not be read.
    #[error("unable to verify repository permissions, ensure you have write access: {source}")]
    Unverifiable {
        /// Error raised by the lookup.
        #[source]
        source: GitHubError,
    },
}

/// Fails when the token clearly cannot push to the repository.
///
/// Public repositories without a `permissions` block pass; GitHub enforces
/// access on the first write.
///
/// # Errors
///
/// Returns [`AccessCheckError::Unverifiable`] when the user or repository
/// lookup fails and [`AccessCheckError::NoWriteAccess`] for a private
/// repository without push permission.
pub async fn ensure_push_access<G>(
    gateway: &G,
    locator: &RepositoryLocator,
) -> Result<(), AccessCheckError>
where
    G: BrowseGateway + ?Sized,
{
    let user = gateway.current_user().await.map_err(unverifiable)?;
    debug!(login = %user.login, "checking push access");

    let permissions = gateway
        .repository_permissions(locator)
        .await
        .map_err(unverifiable)?;
    if permissions.private && permissions.push != Some(true) {
        return Err(AccessCheckError::NoWriteAccess);
    }
    Ok(())
}

fn unverifiable(source: GitHubError) -> AccessCheckError {
    warn!(error = %source, "permission check failed");
    AccessCheckError::Unverifiable { source }
}

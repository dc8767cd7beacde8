//! Mapping of a validated credentials block to [`Credentials`].

use fga_check_sdk::{ClientCredentials, Credentials};

use crate::domain::validation::{CredentialsBlock, ValidatedCredentials};

/// Resolve the credentials of the declared method.
///
/// The block only carries the fields of its method, so sub-fields configured
/// for another method never reach the result.
#[must_use]
pub fn resolve_credentials(credentials: Option<&ValidatedCredentials>) -> Credentials {
    let Some(ValidatedCredentials(block)) = credentials else {
        return Credentials::None;
    };

    match block {
        CredentialsBlock::None => Credentials::None,
        CredentialsBlock::ApiToken { token } => Credentials::ApiToken {
            token: token.clone(),
        },
        CredentialsBlock::ClientCredentials {
            client_id,
            client_secret,
            api_token_issuer,
            api_audience,
            scopes,
        } => Credentials::ClientCredentials(ClientCredentials {
            client_id: client_id.clone(),
            client_secret: client_secret.clone(),
            api_token_issuer: api_token_issuer.clone(),
            api_audience: api_audience.clone(),
            scopes: scopes.clone(),
        }),
    }
}

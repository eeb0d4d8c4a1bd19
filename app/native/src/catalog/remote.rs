//! HTTP access to the catalog server.

use std::io::Read;
use std::time::Duration;

use super::CatalogError;

/// Network operations the catalog client needs.
pub trait CatalogRemote: Send + Sync {
    /// Fetches the body at `url`.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failures and non-success statuses.
    fn download(&self, url: &str) -> Result<Vec<u8>, CatalogError>;

    /// Returns whether `url` exists on the server.
    fn exists(&self, url: &str) -> bool;
}

/// Blocking HTTP implementation.
#[derive(Debug, Clone)]
pub struct HttpRemote {
    agent: ureq::Agent,
}

impl HttpRemote {
    #[must_use]
    pub fn new(timeout: Duration) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout_connect(timeout)
            .timeout_read(timeout)
            .timeout_write(timeout)
            .build();
        Self { agent }
    }
}

fn classify(url: &str, error: ureq::Error) -> CatalogError {
    match error {
        ureq::Error::Status(code, _) => CatalogError::Status { url: url.to_string(), code },
        ureq::Error::Transport(transport) => CatalogError::Transport(transport.to_string()),
    }
}

impl CatalogRemote for HttpRemote {
    fn download(&self, url: &str) -> Result<Vec<u8>, CatalogError> {
        let response = self.agent.get(url).call().map_err(|err| classify(url, err))?;

        let mut bytes = Vec::new();
        response.into_reader().read_to_end(&mut bytes).map_err(|err| CatalogError::Transport(err.to_string()))?;
        Ok(bytes)
    }

    fn exists(&self, url: &str) -> bool {
        match self.agent.head(url).call() {
            Ok(response) => response.status() == 200,
            Err(err) => {
                tracing::debug!(url, error = %classify(url, err), "catalog: remote probe failed");
                false
            }
        }
    }
}

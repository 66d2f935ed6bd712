//! Client configuration.

use url::Url;

/// Configuration for [`RpcClient`](crate::RpcClient).
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the RPC server; procedure names are joined onto it.
    pub base_url: Url,
    /// Validate inputs against the contract before sending.
    pub validate_input: bool,
    /// Validate successful response bodies against the output schema.
    pub validate_output: bool,
}

impl ClientConfig {
    /// Create a configuration with validation enabled on both sides of
    /// the call. The base URL is normalized to end with a slash so that
    /// procedure names join as path segments.
    pub fn new(base_url: Url) -> Self {
        Self {
            base_url: normalize(base_url),
            validate_input: true,
            validate_output: true,
        }
    }

    pub fn validate_input(mut self, enable: bool) -> Self {
        self.validate_input = enable;
        self
    }

    pub fn validate_output(mut self, enable: bool) -> Self {
        self.validate_output = enable;
        self
    }
}

fn normalize(mut url: Url) -> Url {
    if !url.path().ends_with('/') {
        url.set_path(&format!("{}/", url.path()));
    }
    url
}

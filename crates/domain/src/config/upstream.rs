use crate::upstream::UpstreamAddr;
use crate::DomainError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct UpstreamConfig {
    /// Resolver every sub-query is forwarded to, `HOST:PORT`.
    #[serde(default)]
    pub resolver: Option<String>,
}

impl UpstreamConfig {
    pub fn resolver_addr(&self) -> Option<Result<UpstreamAddr, DomainError>> {
        self.resolver.as_deref().map(str::parse)
    }
}

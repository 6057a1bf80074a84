//! Server information service.

use crate::client::RequestExecutor;
use crate::errors::SmartsheetResult;
use crate::types::ServerInfo;
use std::sync::Arc;

/// Service for server information. The endpoint needs no special access.
pub struct ServerInfoService {
    executor: Arc<RequestExecutor>,
}

impl ServerInfoService {
    /// Creates a new server info service.
    pub(crate) fn new(executor: Arc<RequestExecutor>) -> Self {
        Self { executor }
    }

    /// Gets supported locales and formatting tables.
    pub fn get(&self) -> SmartsheetResult<ServerInfo> {
        self.executor.fetch("serverinfo")
    }
}

use async_trait::async_trait;

use super::model::{SosAlert, SosReceipt};
use crate::api::ApiResult;

/// Effect boundary invoked when an armed countdown fires.
#[async_trait]
pub trait SosDispatcher: Send + Sync {
    /// Submits the alert. Resolves once the call has completed either way.
    async fn send_sos(&self, alert: SosAlert) -> ApiResult<SosReceipt>;
}

//! Implémentation de [`CallbackReceiverExt`](crate::CallbackReceiverExt) pour `dsrserver::Server`

use crate::handler::{ReceiverState, create_router};
use crate::{CallbackReceiverExt, NotificationSink};
use dsrserver::Server;
use std::sync::Arc;
use tracing::info;

impl CallbackReceiverExt for Server {
    async fn register_callback_receiver(
        &mut self,
        sink: Arc<dyn NotificationSink>,
    ) -> anyhow::Result<()> {
        let service = self.info().name;
        let router = create_router(ReceiverState::new(service.clone(), sink));

        self.add_router("/", router).await;
        info!(service = %service, "✅ SOAP callback receiver registered");

        Ok(())
    }
}

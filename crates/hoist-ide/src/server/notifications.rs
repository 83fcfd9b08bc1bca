use anyhow::Result;

use super::{Server, from_json};

pub(crate) struct NotificationDispatcher<'me> {
    notification: Option<lsp_server::Notification>,
    server: &'me mut Server,
}

impl<'me> NotificationDispatcher<'me> {
    pub(crate) fn new(notification: lsp_server::Notification, server: &'me mut Server) -> Self {
        Self { notification: notification.into(), server }
    }

    /// Failures are logged. Notifications have nobody to report them to.
    pub(crate) fn on<N>(mut self, f: fn(&mut Server, N::Params) -> Result<()>) -> Self
    where
        N: lsp_types::notification::Notification,
        N::Params: serde::de::DeserializeOwned,
    {
        let Some(notification) =
            self.notification.take_if(|notification| notification.method == N::METHOD)
        else {
            return self;
        };

        let result =
            from_json(N::METHOD, &notification.params).and_then(|params| f(self.server, params));
        if let Err(error) = result {
            tracing::warn!(method = N::METHOD, %error, "notification failed");
        }
        self
    }

    pub(crate) fn finish(self) {
        if let Some(notification) = self.notification.filter(|it| !it.method.starts_with("$/")) {
            tracing::warn!(method = %notification.method, "unknown notification");
        }
    }
}

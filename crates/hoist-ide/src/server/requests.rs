use anyhow::Result;
use lsp_server::{ErrorCode, Request, Response};

use super::{Server, from_json, result_to_response};

/// Routes one request to the first handler registered for its method. Each
/// request gets exactly one response, including unknown methods.
pub(crate) struct RequestDispatcher<'me> {
    request: Option<Request>,
    server: &'me mut Server,
}

impl<'me> RequestDispatcher<'me> {
    pub(crate) fn new(request: Request, server: &'me mut Server) -> Self {
        Self { request: Some(request), server }
    }

    pub(crate) fn on<R>(mut self, handler: fn(&mut Server, R::Params) -> Result<R::Result>) -> Self
    where
        R: lsp_types::request::Request,
        R::Params: serde::de::DeserializeOwned + std::fmt::Debug,
        R::Result: serde::Serialize,
    {
        let Some(request) = self.request.take_if(|request| request.method == R::METHOD) else {
            return self;
        };

        let params = match from_json::<R::Params>(R::METHOD, &request.params) {
            Ok(params) => params,
            Err(error) => {
                tracing::warn!(method = R::METHOD, %error, "invalid request params");
                self.reply_err(request, ErrorCode::InvalidParams, error.to_string());
                return self;
            }
        };

        tracing::debug!(method = R::METHOD, ?params, "handling request");
        let result = handler(self.server, params);
        if let Err(error) = &result {
            tracing::warn!(method = R::METHOD, %error, "request failed");
        }
        self.server.respond(result_to_response::<R>(request.id, result));
        self
    }

    pub(crate) fn finish(mut self) {
        if let Some(request) = self.request.take() {
            tracing::warn!(method = %request.method, "unknown request");
            self.reply_err(request, ErrorCode::MethodNotFound, "unknown request".to_owned());
        }
    }

    fn reply_err(&mut self, request: Request, code: ErrorCode, message: String) {
        self.server.respond(Response::new_err(request.id, code as i32, message));
    }
}

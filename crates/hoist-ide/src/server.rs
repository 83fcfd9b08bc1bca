mod api;
mod notifications;
mod requests;

use std::collections::HashMap;

use anyhow::{Context as _, Result};
use hoist_inputs::{File, LineIndex, WideEncoding, WideLineCol};
use text_size::{TextRange, TextSize};

use crate::FileRange;
use crate::analysis::Analysis;

pub struct Server {
    connection: lsp_server::Connection,
    io_threads: lsp_server::IoThreads,
    analysis: Analysis,
    files: HashMap<lsp_types::Uri, File>,
}

impl Server {
    fn server_capabilities() -> lsp_types::ServerCapabilities {
        lsp_types::ServerCapabilities {
            diagnostic_provider: Some(lsp_types::DiagnosticServerCapabilities::Options(
                lsp_types::DiagnosticOptions {
                    identifier: Some(env!("CARGO_PKG_NAME").to_string()),
                    ..Default::default()
                },
            )),
            text_document_sync: Some(lsp_types::TextDocumentSyncCapability::Kind(
                lsp_types::TextDocumentSyncKind::FULL,
            )),
            code_action_provider: Some(lsp_types::CodeActionProviderCapability::Options(
                lsp_types::CodeActionOptions {
                    code_action_kinds: Some(vec![lsp_types::CodeActionKind::REFACTOR]),
                    resolve_provider: Some(true),
                    ..Default::default()
                },
            )),
            ..lsp_types::ServerCapabilities::default()
        }
    }

    pub fn new() -> Result<Self> {
        let (connection, io_threads) = lsp_server::Connection::stdio();

        let (initialize_id, _initialize_params) = match connection.initialize_start() {
            Ok(it) => it,
            Err(protocol_error) => {
                if protocol_error.channel_is_disconnected() {
                    io_threads.join()?;
                }
                return Err(protocol_error.into());
            }
        };

        let initialize_data = serde_json::json!({
            "capabilities": Self::server_capabilities(),
            "serverInfo": {
                "name": env!("CARGO_PKG_NAME"),
                "version": env!("CARGO_PKG_VERSION"),
            },
        });

        if let Err(protocol_error) = connection.initialize_finish(initialize_id, initialize_data) {
            if protocol_error.channel_is_disconnected() {
                io_threads.join()?;
            }
            return Err(protocol_error.into());
        }

        tracing::info!("initialized");

        Ok(Self {
            connection,
            io_threads,
            analysis: Analysis::default(),
            files: HashMap::default(),
        })
    }

    fn file(&self, uri: &lsp_types::Uri) -> Result<File> {
        self.files.get(uri).copied().with_context(|| format!("unknown document `{}`", uri.as_str()))
    }

    fn respond(&mut self, response: lsp_server::Response) {
        if let Err(error) = self.connection.sender.send(response.into()) {
            tracing::error!(%error, "failed to send response");
        }
    }

    pub fn run(mut self) -> Result<()> {
        let receiver = self.connection.receiver.clone();
        for message in &receiver {
            match message {
                lsp_server::Message::Request(request) => {
                    if self.connection.handle_shutdown(&request)? {
                        break;
                    }
                    api::request(&mut self, request);
                }
                lsp_server::Message::Response(_response) => {}
                lsp_server::Message::Notification(notification) => {
                    api::notification(&mut self, notification);
                }
            }
        }

        let Self { connection, io_threads, .. } = self;
        drop(connection);
        io_threads.join().map_err(Into::into)
    }
}

fn from_json<T: serde::de::DeserializeOwned>(
    what: &'static str,
    json: &serde_json::Value,
) -> Result<T> {
    serde_json::from_value(json.clone())
        .map_err(|e| anyhow::format_err!("Failed to deserialize {what}: {e}; {json}"))
}

fn result_to_response<R>(
    id: lsp_server::RequestId,
    result: Result<R::Result>,
) -> lsp_server::Response
where
    R: lsp_types::request::Request,
    R::Params: serde::de::DeserializeOwned,
    R::Result: serde::Serialize,
{
    match result {
        Ok(resp) => lsp_server::Response::new_ok(id, &resp),
        Err(error) => lsp_server::Response::new_err(id, -32603, error.to_string()),
    }
}

/// Byte offset of a position whose column counts UTF-16 code units. Columns
/// past the end of the line are clamped to it.
fn offset(line_index: &LineIndex, position: lsp_types::Position) -> Result<TextSize> {
    let line_range = line_index
        .line(position.line)
        .with_context(|| format!("line {} is out of range", position.line))?;
    let wide = WideLineCol { line: position.line, col: position.character };
    let col = line_index
        .to_utf8(WideEncoding::Utf16, wide)
        .map_or(line_range.len(), |line_col| TextSize::from(line_col.col));
    Ok(line_range.start() + col.min(line_range.len()))
}

fn position(line_index: &LineIndex, offset: TextSize) -> lsp_types::Position {
    let line_col = line_index.line_col(offset);
    let col =
        line_index.to_wide(WideEncoding::Utf16, line_col).map_or(line_col.col, |wide| wide.col);
    lsp_types::Position::new(line_col.line, col)
}

fn file_range(
    server: &Server,
    uri: &lsp_types::Uri,
    range: lsp_types::Range,
) -> Result<FileRange> {
    let file = server.file(uri)?;
    let line_index = file.line_index(server.analysis.db());
    let start = offset(line_index, range.start)?;
    let end = offset(line_index, range.end)?.max(start);
    Ok(FileRange { file, range: TextRange::new(start, end) })
}

#[cfg(test)]
mod tests {
    use hoist_inputs::{LineIndex, TextSize};

    use super::{offset, position};

    const TEXT: &str = "s = \"\u{e9}\"; x\n// \u{1d11e} y\n";

    #[test]
    fn columns_count_utf16_units() {
        let line_index = LineIndex::new(TEXT);

        let x = offset(&line_index, lsp_types::Position::new(0, 9)).unwrap();
        assert_eq!(&TEXT[usize::from(x)..usize::from(x) + 1], "x");
        assert_eq!(x, TextSize::new(10));

        let y = offset(&line_index, lsp_types::Position::new(1, 6)).unwrap();
        assert_eq!(&TEXT[usize::from(y)..usize::from(y) + 1], "y");
    }

    #[test]
    fn positions_round_trip() {
        let line_index = LineIndex::new(TEXT);

        for needle in ["x", "y", "//", ";"] {
            let at = TextSize::new(TEXT.find(needle).unwrap() as u32);
            let pos = position(&line_index, at);
            assert_eq!(offset(&line_index, pos).unwrap(), at, "{needle}");
        }
        assert_eq!(position(&line_index, TextSize::new(20)), lsp_types::Position::new(1, 6));
    }

    #[test]
    fn line_out_of_range() {
        let line_index = LineIndex::new(TEXT);
        assert!(offset(&line_index, lsp_types::Position::new(5, 0)).is_err());
    }
}

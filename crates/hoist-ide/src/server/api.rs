use std::collections::HashMap;
use std::collections::hash_map::Entry;

use anyhow::{Context as _, Result};
use hoist_db::Diagnostic;
use hoist_inputs::File;
use salsa::{Database, Setter as _};
use text_size::TextRange;

use super::notifications::NotificationDispatcher;
use super::requests::RequestDispatcher;
use super::{Server, file_range, position};
use crate::{CancellationToken, SourceChange};

pub(crate) fn request(server: &mut Server, request: lsp_server::Request) {
    RequestDispatcher::new(request, server)
        .on::<lsp_types::request::DocumentDiagnosticRequest>(handle_document_diagnostic)
        .on::<lsp_types::request::CodeActionRequest>(handle_code_action)
        .on::<lsp_types::request::CodeActionResolveRequest>(handle_code_action_resolve)
        .finish();
}

#[expect(clippy::needless_pass_by_value)]
fn handle_document_diagnostic(
    server: &mut Server,
    params: lsp_types::DocumentDiagnosticParams,
) -> Result<lsp_types::DocumentDiagnosticReportResult> {
    let file = server.file(&params.text_document.uri)?;
    let db = server.analysis.db();

    let diagnostics = server
        .analysis
        .diagnostics(file)
        .iter()
        .map(|diagnostic| to_diagnostic(db, file, diagnostic))
        .collect::<Vec<_>>();

    Ok(lsp_types::DocumentDiagnosticReportResult::Report(
        lsp_types::DocumentDiagnosticReport::Full(lsp_types::RelatedFullDocumentDiagnosticReport {
            related_documents: None,
            full_document_diagnostic_report: lsp_types::FullDocumentDiagnosticReport {
                result_id: None,
                items: diagnostics,
            },
        }),
    ))
}

fn to_diagnostic(db: &dyn Database, file: File, diagnostic: &Diagnostic) -> lsp_types::Diagnostic {
    let severity = if diagnostic.is_error() {
        lsp_types::DiagnosticSeverity::ERROR
    } else {
        lsp_types::DiagnosticSeverity::WARNING
    };

    lsp_types::Diagnostic::new(
        to_range(db, file, diagnostic.range()),
        severity.into(),
        None,
        Some("hoist".to_string()),
        diagnostic.message().to_owned(),
        None,
        None,
    )
}

/// Offers are listed without an edit. The location travels in `data` so that
/// resolving can recompute the offer.
fn handle_code_action(
    server: &mut Server,
    params: lsp_types::CodeActionParams,
) -> Result<Option<lsp_types::CodeActionResponse>> {
    let uri = params.text_document.uri;
    let frange = file_range(server, &uri, params.range)?;

    let Some(offer) = server.analysis.offer_refactoring(frange) else {
        return Ok(Some(Vec::new()));
    };

    let data = lsp_types::Location { uri, range: params.range };
    let action = lsp_types::CodeAction {
        title: offer.label().to_owned(),
        kind: Some(lsp_types::CodeActionKind::from(offer.kind())),
        data: Some(serde_json::to_value(data)?),
        ..Default::default()
    };

    Ok(Some(vec![lsp_types::CodeActionOrCommand::CodeAction(action)]))
}

fn handle_code_action_resolve(
    server: &mut Server,
    mut action: lsp_types::CodeAction,
) -> Result<lsp_types::CodeAction> {
    let data = action.data.take().context("code action has no data")?;
    let lsp_types::Location { uri, range } = super::from_json("code action data", &data)?;
    let frange = file_range(server, &uri, range)?;

    let offer = server
        .analysis
        .offer_refactoring(frange)
        .context("the refactoring no longer applies")?;
    let change = offer.compute_edit(&CancellationToken::new())?;

    action.edit = Some(to_workspace_edit(server.analysis.db(), uri, &change));
    Ok(action)
}

fn to_workspace_edit(
    db: &dyn Database,
    uri: lsp_types::Uri,
    change: &SourceChange,
) -> lsp_types::WorkspaceEdit {
    let edits = change
        .edit
        .indels()
        .iter()
        .map(|indel| lsp_types::TextEdit {
            range: to_range(db, change.file, indel.delete),
            new_text: indel.insert.clone(),
        })
        .collect();

    lsp_types::WorkspaceEdit { changes: Some(HashMap::from([(uri, edits)])), ..Default::default() }
}

pub(crate) fn notification(server: &mut Server, notification: lsp_server::Notification) {
    NotificationDispatcher::new(notification, server)
        .on::<lsp_types::notification::DidOpenTextDocument>(handle_did_open_text_document)
        .on::<lsp_types::notification::DidChangeTextDocument>(handle_did_change_text_document)
        .on::<lsp_types::notification::DidCloseTextDocument>(handle_did_close_text_document)
        .finish();
}

fn handle_did_open_text_document(
    server: &mut Server,
    params: lsp_types::DidOpenTextDocumentParams,
) -> Result<()> {
    let lsp_types::TextDocumentItem { uri, language_id: _, version: _, text } =
        params.text_document;

    match server.files.entry(uri.clone()) {
        Entry::Occupied(occupied) => {
            let file = *occupied.get();
            file.set_text(server.analysis.db_mut()).to(text);
        }
        Entry::Vacant(vacant) => {
            vacant.insert(File::new(server.analysis.db(), uri.path().as_str().into(), text));
        }
    }

    Ok(())
}

fn handle_did_change_text_document(
    server: &mut Server,
    params: lsp_types::DidChangeTextDocumentParams,
) -> Result<()> {
    let file = server.file(&params.text_document.uri)?;
    let change = params.content_changes.into_iter().last().context("no content changes")?;
    file.set_text(server.analysis.db_mut()).to(change.text);
    Ok(())
}

#[expect(clippy::needless_pass_by_value)]
fn handle_did_close_text_document(
    server: &mut Server,
    params: lsp_types::DidCloseTextDocumentParams,
) -> Result<()> {
    server.files.remove(&params.text_document.uri);
    Ok(())
}

fn to_range(db: &dyn Database, file: File, range: TextRange) -> lsp_types::Range {
    let line_index = file.line_index(db);
    lsp_types::Range {
        start: position(line_index, range.start()),
        end: position(line_index, range.end()),
    }
}

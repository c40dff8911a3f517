//! Action executor
//!
//! Turns [`UpdateAction`]s into spawned retrieval tasks. Each task performs
//! one backend call and posts its completion back onto the update channel;
//! the update loop stays single-logical-threaded. Tasks are never cancelled:
//! completions land in arrival order.

use tokio::sync::mpsc::UnboundedSender;

use flowscope_client::ApiClient;
use flowscope_core::prelude::*;

use crate::handler::UpdateAction;
use crate::message::Message;

/// Spawn the retrieval task for one action.
pub fn handle_action(action: UpdateAction, client: &ApiClient, tx: &UnboundedSender<Message>) {
    let client = client.clone();
    let tx = tx.clone();
    tokio::spawn(async move {
        let message = run_action(action, &client).await;
        if tx.send(message).is_err() {
            debug!("update channel closed, dropping retrieval completion");
        }
    });
}

async fn run_action(action: UpdateAction, client: &ApiClient) -> Message {
    match action {
        UpdateAction::FetchFlows { query, replace } => match client.list_flows(&query).await {
            Ok(response) => Message::FlowsLoaded { replace, response },
            Err(e) => Message::FlowsLoadFailed {
                error: e.to_string(),
            },
        },

        UpdateAction::FetchDetail { flow_id } => match client.get_flow(flow_id).await {
            Ok(Some(detail)) => Message::DetailLoaded {
                flow_id,
                detail: Box::new(detail),
            },
            Ok(None) => Message::DetailNotFound { flow_id },
            Err(e) => Message::DetailLoadFailed {
                flow_id,
                error: e.to_string(),
            },
        },

        UpdateAction::FetchRaw { flow_id } => match client.get_flow_raw(flow_id).await {
            Ok(chunks) => Message::RawLoaded { flow_id, chunks },
            Err(e) => Message::RawLoadFailed {
                flow_id,
                error: e.to_string(),
            },
        },

        UpdateAction::FetchFile {
            flow_id,
            file_index,
            storage_path,
        } => match client.fetch_file(&storage_path).await {
            Ok(bytes) => Message::FileLoaded {
                flow_id,
                file_index,
                bytes,
            },
            Err(e) => Message::FileLoadFailed {
                flow_id,
                file_index,
                error: e.to_string(),
            },
        },
    }
}

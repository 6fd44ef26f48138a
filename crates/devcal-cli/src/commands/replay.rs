//! JSON-lines replay.
//!
//! Reads one call per line and writes one response line per call, in order.
//! Blank lines and lines starting with `#` are skipped.

use std::pin::pin;

use devcal_bridge::{MethodHandler, StaticPermissionHost, protocol_error_response};
use devcal_protocol::{
    MethodResponse, PermissionStatus, ProtocolError, ResponseLine, decode_call_line,
    encode_response_line,
};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{debug, info, warn};

use crate::cli::PromptAnswer;
use crate::error::CliResult;

/// Counts from one replay run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReplaySummary {
    pub calls: usize,
    pub failures: usize,
}

/// Replays every call in `input`, writing responses to `output`.
pub async fn replay<R, W>(
    handler: &MethodHandler,
    host: &StaticPermissionHost,
    answer: PromptAnswer,
    input: R,
    mut output: W,
) -> CliResult<ReplaySummary>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut summary = ReplaySummary::default();
    let mut lines = input.lines();

    while let Some(line) = lines.next_line().await? {
        if line.trim_start().starts_with('#') {
            continue;
        }
        let response = match decode_call_line(&line) {
            Ok(call) => {
                debug!(method = %call.method, "replaying call");
                let response = answering_prompts(
                    handler,
                    host,
                    answer,
                    handler.handle_raw(&call.method, call.arguments),
                )
                .await;
                ResponseLine::new(call.id, response)
            }
            Err(ProtocolError::EmptyLine) => continue,
            Err(err) => {
                warn!(error = %err, "skipping malformed line");
                ResponseLine::new(None, protocol_error_response(&err))
            }
        };

        summary.calls += 1;
        if !response.response.is_success() {
            summary.failures += 1;
        }
        let mut encoded = encode_response_line(&response)?;
        encoded.push('\n');
        output.write_all(encoded.as_bytes()).await?;
    }

    output.flush().await?;
    info!(calls = summary.calls, failures = summary.failures, "replay finished");
    Ok(summary)
}

/// Drives `call` to completion, answering a permission prompt if one opens.
async fn answering_prompts<F>(
    handler: &MethodHandler,
    host: &StaticPermissionHost,
    answer: PromptAnswer,
    call: F,
) -> MethodResponse
where
    F: Future<Output = MethodResponse>,
{
    let mut call = pin!(call);
    loop {
        tokio::select! {
            biased;
            response = &mut call => return response,
            () = tokio::task::yield_now() => {
                if handler.permissions().is_pending() {
                    answer_prompt(handler, host, answer);
                }
            }
        }
    }
}

fn answer_prompt(handler: &MethodHandler, host: &StaticPermissionHost, answer: PromptAnswer) {
    debug!(?answer, "answering permission prompt");
    let broker = handler.permissions();
    match answer {
        PromptAnswer::Grant => {
            host.set_status(PermissionStatus::Granted);
            broker.complete(true);
        }
        PromptAnswer::Deny => {
            host.set_status(PermissionStatus::Denied);
            broker.complete(false);
        }
        PromptAnswer::Dismiss => {
            broker.cancel();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use devcal_backend::{BackendProfile, MemoryBackend};
    use devcal_bridge::BridgeConfig;
    use devcal_protocol::ErrorCode;
    use serde_json::Value;
    use std::sync::Arc;

    fn setup(status: PermissionStatus) -> (Arc<StaticPermissionHost>, MethodHandler) {
        let backend = Arc::new(MemoryBackend::new(BackendProfile::content_provider()));
        let host = Arc::new(StaticPermissionHost::new(status));
        let config = BridgeConfig::default().with_device_time_zone("UTC");
        let handler = MethodHandler::from_config(&config, backend, host.clone()).unwrap();
        (host, handler)
    }

    async fn run(
        status: PermissionStatus,
        answer: PromptAnswer,
        input: &str,
    ) -> (ReplaySummary, Vec<Value>) {
        let (host, handler) = setup(status);
        let mut output = Vec::new();
        let summary = replay(&handler, &host, answer, input.as_bytes(), &mut output)
            .await
            .unwrap();
        let lines = String::from_utf8(output)
            .unwrap()
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect();
        (summary, lines)
    }

    #[tokio::test]
    async fn calendar_then_event() {
        let input = r#"
# create a calendar and put an event in it
{"id":1,"method":"createCalendar","arguments":{"name":"Home"}}
{"id":2,"method":"createEvent","arguments":{"calendarId":"1","title":"Dinner","startDate":0,"endDate":3600000}}
{"id":3,"method":"retrieveEvents","arguments":{"startDate":0,"endDate":86400000}}
"#;
        let (summary, lines) = run(PermissionStatus::Granted, PromptAnswer::Grant, input).await;
        assert_eq!(summary, ReplaySummary { calls: 3, failures: 0 });
        assert_eq!(lines[0]["id"], 1);
        assert_eq!(lines[0]["type"], "calendarId");
        assert_eq!(lines[1]["type"], "eventId");
        assert_eq!(lines[2]["events"][0]["title"], "Dinner");
        assert_eq!(lines[2]["events"][0]["timeZone"], "UTC");
    }

    #[tokio::test]
    async fn malformed_and_unknown_lines_still_answer() {
        let input = "not json\n{\"id\":\"x\",\"method\":\"launchRocket\"}\n";
        let (summary, lines) = run(PermissionStatus::Granted, PromptAnswer::Grant, input).await;
        assert_eq!(summary, ReplaySummary { calls: 2, failures: 2 });
        assert_eq!(lines[0]["code"], ErrorCode::InvalidArguments.as_str());
        assert!(lines[0].get("id").is_none());
        assert_eq!(lines[1]["id"], "x");
        assert_eq!(lines[1]["code"], ErrorCode::NotSupported.as_str());
    }

    #[tokio::test]
    async fn prompt_is_answered() {
        let input = "{\"method\":\"requestPermissions\"}\n{\"method\":\"hasPermissions\"}\n";

        let (_, lines) = run(PermissionStatus::NotDetermined, PromptAnswer::Grant, input).await;
        assert_eq!(lines[0]["status"], "granted");
        assert_eq!(lines[1]["status"], "granted");

        let (_, lines) = run(PermissionStatus::NotDetermined, PromptAnswer::Deny, input).await;
        assert_eq!(lines[0]["status"], "denied");
        assert_eq!(lines[1]["status"], "denied");

        let (summary, lines) =
            run(PermissionStatus::NotDetermined, PromptAnswer::Dismiss, input).await;
        assert_eq!(lines[0]["code"], ErrorCode::UnknownError.as_str());
        assert_eq!(lines[1]["status"], "notDetermined");
        assert_eq!(summary.failures, 1);
    }
}

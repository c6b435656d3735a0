// HTTP route: slash-command webhook.

use crate::application::usecases::relay_command::{RelayCommand, RelayCommandUseCase};
use crate::domain::value_objects::ids::RunId;
use crate::interface::http::dto::command::{CommandAcceptedResponse, CommandRequest};
use crate::interface::http::problem::{RFA_REQUEST_MALFORMED, problem};
use crate::interface::http::state::AppState;
use crate::interface::http::trace::TraceId;
use axum::extract::rejection::FormRejection;
use axum::extract::{Extension, Form, State};
use axum::http::{HeaderName, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use tracing::{Instrument, info, info_span, warn};

const RUN_ID_HEADER: &str = "x-run-id";

/// Builds the slash-command route.
pub fn router() -> Router<AppState> {
    Router::new().route("/newmanRun", post(newman_run))
}

/// Accepts a slash command and runs it in the background.
async fn newman_run(
    State(state): State<AppState>,
    Extension(trace_id): Extension<TraceId>,
    form: Result<Form<CommandRequest>, FormRejection>,
) -> Response {
    let trace_id = Some(trace_id.0);
    let malformed = |detail: &str, trace_id: Option<String>| {
        problem(
            StatusCode::BAD_REQUEST,
            RFA_REQUEST_MALFORMED,
            Some(detail.to_string()),
            Some("/newmanRun".to_string()),
            trace_id,
        )
    };

    // Step 1: Decode the form body.
    let Form(payload) = match form {
        Ok(form) => form,
        Err(rejection) => return malformed(&rejection.body_text(), trace_id),
    };

    // Step 2: Without a usable callback URL there is nowhere to report to.
    let Some(response_url) = payload
        .response_url
        .map(|u| u.trim().to_string())
        .filter(|u| !u.is_empty())
    else {
        return malformed("response_url is required", trace_id);
    };
    if !is_http_url(&response_url) {
        return malformed("response_url must be an http(s) URL", trace_id);
    }

    // Step 3: Hand the pipeline to a background task.
    let run_id = RunId::new();
    let command = RelayCommand {
        text: payload.text.unwrap_or_default(),
        response_url,
    };
    let ctx = state.ctx.clone();
    let span = info_span!("relay", trace_id = trace_id.as_deref().unwrap_or(""));
    tokio::spawn(
        async move {
            if let Err(err) = RelayCommandUseCase::execute(&ctx, run_id, command).await {
                warn!(run_id = %run_id, error = ?err, "relay ended without a summary");
            }
        }
        .instrument(span),
    );
    info!(run_id = %run_id, "command accepted");

    // Step 4: Acknowledge with the run id.
    let mut response = (
        StatusCode::ACCEPTED,
        Json(CommandAcceptedResponse {
            run_id: run_id.to_string(),
        }),
    )
        .into_response();
    if let Ok(value) = HeaderValue::from_str(&run_id.to_string()) {
        response
            .headers_mut()
            .insert(HeaderName::from_static(RUN_ID_HEADER), value);
    }
    response
}

fn is_http_url(raw: &str) -> bool {
    reqwest::Url::parse(raw)
        .map(|url| matches!(url.scheme(), "http" | "https") && url.has_host())
        .unwrap_or(false)
}

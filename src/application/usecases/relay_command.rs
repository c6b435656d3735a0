// Use case: relay_command.
// Acknowledge, resolve, run, summarize and report one slash command.

use crate::application::context::AppContext;
use crate::domain::entities::run_summary::{RunOutcome, RunSummary, summarize};
use crate::domain::services::name_resolver::{ResolveError, ResourceKind};
use crate::domain::services::notification::{
    NotificationBuilder, NotificationPayload, PayloadContext,
};
use crate::domain::services::run_executor::{RunError, RunRequest};
use crate::domain::value_objects::ids::RunId;
use crate::domain::workflows::command_parser::{CommandArgs, CommandError, CommandParser};
use metrics::counter;
use tracing::{info, instrument, warn};

/// An inbound slash command.
#[derive(Debug, Clone)]
pub struct RelayCommand {
    pub text: String,
    pub response_url: String,
}

/// Runs the full command pipeline, delivering every notification to the response URL.
pub struct RelayCommandUseCase;

#[derive(Debug)]
pub enum RelayError {
    Validation(CommandError),
    Resolution(ResolveError),
    Execution(RunError),
}

#[derive(Debug)]
pub struct RelayCommandResult {
    pub summary: RunSummary,
    pub payload: NotificationPayload,
}

impl RelayCommandUseCase {
    /// Execute the pipeline for one command.
    ///
    /// Every failure is reported to the response URL before it is returned; only the
    /// notification deliveries themselves are log-only on failure.
    #[instrument(skip(ctx, command), fields(run_id = %run_id))]
    pub async fn execute(
        ctx: &AppContext,
        run_id: RunId,
        command: RelayCommand,
    ) -> Result<RelayCommandResult, RelayError> {
        let url = command.response_url.as_str();

        // Step 1: Validate the command text; nothing is acknowledged for invalid commands.
        let args = match CommandParser::parse(
            &command.text,
            ctx.settings.runner.convention,
            ctx.settings.runner.default_iterations,
        )
        .and_then(|args| Self::with_default_collection(ctx, args))
        {
            Ok(args) => args,
            Err(err) => {
                let payload = NotificationBuilder::command_error(&err.to_string());
                Self::notify(ctx, url, &payload).await;
                counter!("relay_runs_total", "outcome" => "invalid").increment(1);
                return Err(RelayError::Validation(err));
            }
        };

        // Step 2: Acknowledge that the run is starting.
        Self::notify(ctx, url, &NotificationBuilder::started()).await;

        // Step 3: Resolve collection and environment names to runnable targets.
        let request = match Self::resolve(ctx, &args).await {
            Ok(request) => request,
            Err(err) => {
                let payload = NotificationBuilder::command_error(&err.to_string());
                Self::notify(ctx, url, &payload).await;
                counter!("relay_runs_total", "outcome" => "unresolved").increment(1);
                return Err(RelayError::Resolution(err));
            }
        };

        // Step 4: Run the collection.
        info!(
            collection = %request.collection,
            iterations = request.iterations,
            "newman_run_started"
        );
        let raw = match ctx.executor.run(&request).await {
            Ok(raw) => raw,
            Err(err) => {
                warn!(error = %err, "newman_run_failed");
                let payload = NotificationBuilder::run_error(&err.to_string());
                Self::notify(ctx, url, &payload).await;
                counter!("relay_runs_total", "outcome" => "error").increment(1);
                return Err(RelayError::Execution(err));
            }
        };

        // Step 5: Summarize and render the final notification.
        let summary = summarize(&raw);
        let context = PayloadContext {
            collection_name: raw.collection_name.clone().or(args.collection.clone()),
            environment_name: raw
                .environment_name
                .clone()
                .or(Some(args.environment.clone())),
            report_link_url: request.report_path.as_ref().and(ctx.report_link_url()),
        };
        let payload = NotificationBuilder::summary(&summary, &context);

        // Step 6: Deliver the summary.
        Self::notify(ctx, url, &payload).await;
        let outcome = match summary.outcome {
            RunOutcome::Passed => "passed",
            RunOutcome::Failed => "failed",
        };
        counter!("relay_runs_total", "outcome" => outcome).increment(1);
        info!(
            outcome,
            pass_rate = %summary.pass_rate_label(),
            duration = %summary.duration_humanized,
            "newman_run_complete"
        );

        Ok(RelayCommandResult { summary, payload })
    }

    fn with_default_collection(
        ctx: &AppContext,
        mut args: CommandArgs,
    ) -> Result<CommandArgs, CommandError> {
        if args.collection.is_none() {
            args.collection = Some(
                ctx.settings
                    .runner
                    .default_collection
                    .clone()
                    .ok_or(CommandError::MissingArgument("Collection"))?,
            );
        }
        Ok(args)
    }

    async fn resolve(ctx: &AppContext, args: &CommandArgs) -> Result<RunRequest, ResolveError> {
        let collection_name = args.collection.as_deref().unwrap_or_default();
        let collection = ctx
            .resolver
            .resolve(ResourceKind::Collection, collection_name)
            .await?;
        let environment = ctx
            .resolver
            .resolve(ResourceKind::Environment, &args.environment)
            .await?;
        let report_path = ctx
            .settings
            .runner
            .writes_html_report()
            .then(|| {
                ctx.settings
                    .runner
                    .reports_dir
                    .join(&ctx.settings.runner.report_file)
            });

        Ok(RunRequest {
            collection,
            environment: Some(environment),
            iterations: args.iterations,
            report_path,
        })
    }

    async fn notify(ctx: &AppContext, response_url: &str, payload: &NotificationPayload) {
        match ctx.notifier.deliver(response_url, payload).await {
            Ok(()) => {
                counter!("notifications_sent_total").increment(1);
            }
            Err(err) => {
                counter!("notifications_failed_total").increment(1);
                warn!(error = %err, "notification_delivery_failed");
            }
        }
    }
}

//! CLI command implementation
//!
//! Sequence:
//! 1. Resolve configuration (file, then flags)
//! 2. Open the audit log, if any, before touching a page
//! 3. Open source and destination targets
//! 4. Run the recovery decision
//! 5. Log the trail (verbose), the outcome, and the audit record

use crate::observability::{
    log_decision_trail, log_event_with_fields, AuditLog, AuditRecord, Event, FileAuditLog, Logger,
};
use crate::recovery::{Outcome, RecoveryDecision, RecoveryError, RecoveryRequest};
use crate::target::open_target;

use super::args::Cli;
use super::config::{Config, RunSettings};
use super::errors::{CliError, CliResult};

/// Parse arguments and run. Refusals are returned as errors.
pub fn run() -> CliResult<()> {
    let cli = Cli::parse_args();
    let outcome = execute(&cli)?;

    match outcome.refusal() {
        Some(refusal) => Err(CliError::refused(refusal)),
        None => Ok(()),
    }
}

/// Run one recovery as described by `cli` and return its outcome.
///
/// The run is recorded in the configured audit log file, if any.
pub fn execute(cli: &Cli) -> CliResult<Outcome> {
    let logger = Logger::for_verbosity(cli.verbose);
    let settings = Config::resolve(cli)?;

    match &settings.audit_log {
        Some(path) => {
            let mut audit = FileAuditLog::open(path).map_err(|e| {
                CliError::io_error(format!("Failed to open audit log {}: {}", path.display(), e))
            })?;
            recover(cli, &settings, &logger, Some(&mut audit))
        }
        None => recover(cli, &settings, &logger, None),
    }
}

/// Run one recovery and append its record to `audit`.
///
/// Any audit log path in the configuration is ignored.
pub fn execute_with_audit(cli: &Cli, audit: &mut dyn AuditLog) -> CliResult<Outcome> {
    let logger = Logger::for_verbosity(cli.verbose);
    let settings = Config::resolve(cli)?;
    recover(cli, &settings, &logger, Some(audit))
}

fn recover(
    cli: &Cli,
    settings: &RunSettings,
    logger: &Logger,
    audit: Option<&mut dyn AuditLog>,
) -> CliResult<Outcome> {
    let options = &settings.transport;
    logger.trace(
        Event::ConfigLoaded.as_str(),
        &[
            ("remote_shell", options.remote_shell.to_string()),
            ("sync_writes", options.sync_writes.to_string()),
            ("audit", audit.is_some().to_string()),
        ],
    );

    let request = cli.request();
    let source = open_target(&request.source, options);
    let destination = open_target(&request.destination, options);

    log_event_with_fields(
        logger,
        Event::RunStart,
        &[
            ("page", request.page_number.to_string()),
            ("relation", request.relation.clone()),
            ("source", request.source.to_string()),
            ("destination", request.destination.to_string()),
            ("mode", request.mode.as_str().to_string()),
            ("pretend", request.pretend.to_string()),
        ],
    );

    let mut decision = RecoveryDecision::new(&request, &*source, &*destination);
    let result = decision.evaluate();
    log_decision_trail(logger, decision.events());

    if let Some(log) = audit {
        let record = match &result {
            Ok(outcome) => AuditRecord::completed(&request, outcome),
            Err(e) => AuditRecord::failed(&request, e),
        }
        .with_lsns(
            decision.source_header().map(|h| h.lsn_display()),
            decision.destination_header().map(|h| h.lsn_display()),
        );

        if let Err(e) = log.append(&record) {
            logger.error(
                Event::AuditFailed.as_str(),
                &[("id", record.id.to_string()), ("error", e.to_string())],
            );
        }
    }

    match result {
        Ok(outcome) => {
            report_outcome(logger, &request, &outcome);
            Ok(outcome)
        }
        Err(e) => {
            report_failure(logger, &e);
            Err(e.into())
        }
    }
}

fn report_outcome(logger: &Logger, request: &RecoveryRequest, outcome: &Outcome) {
    let event = match outcome {
        Outcome::Replaced => Event::PageReplaced,
        Outcome::WouldReplace => Event::ReplacePretended,
        Outcome::Dumped => Event::PageDumped,
        Outcome::WouldDump => Event::DumpPretended,
        Outcome::Refused(refusal) => {
            logger.warn(
                Event::ReplaceRefused.as_str(),
                &[
                    ("code", refusal.code().to_string()),
                    ("page", request.page_number.to_string()),
                    ("reason", refusal.describe().to_string()),
                ],
            );
            return;
        }
    };

    log_event_with_fields(
        logger,
        event,
        &[
            ("page", request.page_number.to_string()),
            ("message", outcome.describe()),
        ],
    );
}

fn report_failure(logger: &Logger, error: &RecoveryError) {
    log_event_with_fields(
        logger,
        Event::RunFailed,
        &[
            ("code", error.code().to_string()),
            ("side", error.side().to_string()),
            ("error", error.to_string()),
        ],
    );
}

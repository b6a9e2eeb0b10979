//! Subcommands
//!
//! Every command calls one or two service operations and prints the result as
//! JSON on the given writer. Logs go to stderr, never to the writer.

use anyhow::{bail, Result};
use clap::Subcommand;
use handover_ceremony::{CeremonyService, ConfirmStep};
use handover_core::{CeremonyProgress, Role, RosterStatus, StepId};
use serde::Serialize;
use std::io::Write;
use std::time::Duration;
use tokio::time::MissedTickBehavior;

/// Ceremony operations exposed on the command line
#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// Join the ceremony under a credential code
    Join {
        /// Credential code (case-insensitive)
        code: String,
    },

    /// List joined participants (administrator excluded)
    Participants,

    /// Show every step and the derived ceremony state
    Progress,

    /// Confirm a step
    Confirm {
        /// Step id, 1 to 4
        #[arg(allow_negative_numbers = true)]
        step: String,

        /// Credential code of the confirming participant
        code: String,

        /// Confirm on behalf of this role (administrator or delegated host only)
        #[arg(long = "as", value_name = "ROLE")]
        acting_as: Option<Role>,
    },

    /// Delete all participants and progress
    Reset {
        /// Required; reset cannot be undone
        #[arg(long)]
        yes: bool,
    },

    /// Roster readiness, progress and host delegation in one report
    Status,

    /// Delegate the host role (administrator only)
    Host {
        /// Administrator credential code
        admin_code: String,

        /// Role to designate as host
        role: Role,
    },

    /// Poll progress and print it whenever it changes
    Watch {
        /// Poll interval in milliseconds; defaults to `watch.poll_interval_ms`
        #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
        interval_ms: Option<u64>,

        /// Exit once every step is complete
        #[arg(long)]
        until_complete: bool,
    },
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct StatusReport {
    roster: RosterStatus,
    progress: CeremonyProgress,
    host_role: Option<Role>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct HostReport {
    host_role: Role,
}

#[derive(Debug, Serialize)]
struct ResetReport {
    reset: bool,
}

/// Run one command against the service
pub async fn run<W: Write>(
    command: Command,
    service: &CeremonyService,
    default_interval_ms: u64,
    out: &mut W,
) -> Result<()> {
    match command {
        Command::Join { code } => emit(out, &service.register(&code).await?),
        Command::Participants => emit(out, &service.list_participants().await?),
        Command::Progress => emit(out, &service.get_progress().await?),
        Command::Confirm {
            step,
            code,
            acting_as,
        } => {
            let step_id = StepId::parse(&step, service.catalog().total_steps())?;
            let mut request = ConfirmStep::new(i64::from(step_id.get()), code);
            request.acting_as = acting_as;
            emit(out, &service.complete_step(request).await?)
        }
        Command::Reset { yes } => {
            if !yes {
                bail!("refusing to reset the ceremony without --yes");
            }
            service.reset().await?;
            emit(out, &ResetReport { reset: true })
        }
        Command::Status => {
            let report = StatusReport {
                roster: service.roster_status().await?,
                progress: service.get_progress().await?,
                host_role: service.host_role().await?,
            };
            emit(out, &report)
        }
        Command::Host { admin_code, role } => {
            service.delegate_host(&admin_code, role).await?;
            emit(out, &HostReport { host_role: role })
        }
        Command::Watch {
            interval_ms,
            until_complete,
        } => {
            let interval = Duration::from_millis(interval_ms.unwrap_or(default_interval_ms));
            watch(service, interval, until_complete, out).await
        }
    }
}

/// Poll `get_progress`, printing only when the result changes.
///
/// Stops on Ctrl-C, or after printing a complete ceremony when
/// `until_complete` is set.
async fn watch<W: Write>(
    service: &CeremonyService,
    interval: Duration,
    until_complete: bool,
    out: &mut W,
) -> Result<()> {
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    let mut last: Option<CeremonyProgress> = None;
    loop {
        tokio::select! {
            _ = ticker.tick() => {}
            _ = &mut shutdown => {
                tracing::debug!("Watch interrupted");
                return Ok(());
            }
        }

        let progress = service.get_progress().await?;
        if last.as_ref() != Some(&progress) {
            emit(out, &progress)?;
        }
        if until_complete && progress.state.is_complete {
            return Ok(());
        }
        last = Some(progress);
    }
}

fn emit<W: Write, T: Serialize + ?Sized>(out: &mut W, value: &T) -> Result<()> {
    serde_json::to_writer_pretty(&mut *out, value)?;
    writeln!(out)?;
    out.flush()?;
    Ok(())
}

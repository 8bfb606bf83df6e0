//! chargemon daemon entry point.
//!
//! All monitor work runs on one current-thread runtime: driver callbacks
//! run to completion in turn, and a blocking confirm dialog holds the
//! loop until dismissed.

use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;
use tracing::info;

use chargemon_core::{
    ChargeMonitor, ConfigStore, TracingConfig, TracingOutputFormat, init_tracing,
};

use chargemon_daemon::cli::{Cli, Command, ConfigAction};
use chargemon_daemon::error::{DaemonError, DaemonResult};
use chargemon_daemon::{
    BatteryProbe, DesktopAlerts, FileConfigStore, LoggingIcon, MonitorScheduler, MonitorService,
    PidFile, SchedulerConfig, SignalHandler, default_pid_path,
};

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let mut tracing_config = if cli.debug {
        TracingConfig::debug()
    } else {
        TracingConfig::default()
    };
    if cli.log_json {
        tracing_config = tracing_config.with_format(TracingOutputFormat::Json);
    }
    if let Err(e) = init_tracing(tracing_config) {
        eprintln!("error: {}", e);
        return ExitCode::FAILURE;
    }

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(mut cli: Cli) -> DaemonResult<()> {
    let store = match cli.config {
        Some(ref path) => FileConfigStore::new(path),
        None => FileConfigStore::default(),
    };

    match cli.command.take() {
        Some(Command::Config { action }) => match action {
            ConfigAction::Dump => {
                let config = store.load();
                let text = toml::to_string_pretty(&config)
                    .map_err(|e| DaemonError::config(e.to_string()))?;
                print!("{}", text);
                Ok(())
            }
            ConfigAction::Path => {
                println!("{}", store.path().display());
                Ok(())
            }
        },
        None => run_monitor(cli, store).await,
    }
}

/// Starts the monitor in the foreground.
///
/// Blocks until a shutdown signal is received (SIGTERM/SIGINT).
async fn run_monitor(cli: Cli, store: FileConfigStore) -> DaemonResult<()> {
    // 1. Load config and apply launch-time overrides (not persisted).
    let mut config = store.load();
    if let Some(percent) = cli.plug_percent {
        config
            .set_plug_percent(percent)
            .map_err(|e| DaemonError::config(e.to_string()))?;
    }
    if let Some(percent) = cli.unplug_percent {
        config
            .set_unplug_percent(percent)
            .map_err(|e| DaemonError::config(e.to_string()))?;
    }
    info!(?config, "Starting monitor");

    // 2. PID file (prevents duplicate monitors double-alerting)
    let _pid_file = PidFile::acquire(default_pid_path())?;

    // 3. Signal handler
    let signals = SignalHandler::new();
    signals.spawn_listener();

    // 4. Service wiring
    let service = MonitorService::new(
        ChargeMonitor::new(config),
        Box::new(BatteryProbe::new()),
        Box::new(DesktopAlerts::new()),
        Box::new(LoggingIcon),
        Box::new(store),
    );

    // 5. Scheduler
    let mut scheduler_config = SchedulerConfig::default();
    if let Some(secs) = cli.evaluate_interval {
        scheduler_config = scheduler_config.with_evaluate_interval(Duration::from_secs(secs));
    }
    if let Some(secs) = cli.icon_interval {
        scheduler_config = scheduler_config.with_icon_interval(Duration::from_secs(secs));
    }
    let scheduler = MonitorScheduler::new(scheduler_config);

    // 6. SIGHUP reloads the persisted config
    let mut reload = signals.reload();
    let reload_handle = scheduler.handle();
    tokio::spawn(async move {
        while reload.next().await {
            let _ = reload_handle.reload_config().await;
        }
    });

    // 7. Run until shutdown
    scheduler.run(service, signals.shutdown().wait()).await;

    info!("Monitor stopped");
    Ok(())
}

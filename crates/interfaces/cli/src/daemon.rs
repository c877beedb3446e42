use std::env;
use std::fmt;
use std::fs::OpenOptions;
use std::io;
use std::os::unix::process::CommandExt;
use std::path::Path;
use std::process::{Command, Stdio};
use std::time::Duration;

use anyhow::{Context, Result, bail};
use tokio::signal::unix::{Signal, SignalKind, signal};
use tokio::sync::watch;
use tracing::{info, warn};

use tipline_config::AppConfig;
use tipline_runtime::{CONTEXT_DIR_ENV, CacheStore, RefreshLoop};

/// Marks the re-executed child as the background refresh loop.
pub(crate) const DAEMON_PROCESS_ENV: &str = "TIPLINE_DAEMON_PROCESS";
/// Carries `--config` into the re-executed child.
pub(crate) const CONFIG_ENV: &str = "TIPLINE_CONFIG";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum StartOutcome {
    AlreadyRunning(u32),
    Started(u32),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum StopOutcome {
    NotRunning,
    Stopped(u32),
    /// Alive but owned by another user.
    PermissionDenied(u32),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum DaemonState {
    NotRunning,
    Running(u32),
}

impl fmt::Display for StartOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StartOutcome::AlreadyRunning(pid) => write!(f, "daemon already running with pid {pid}"),
            StartOutcome::Started(pid) => write!(f, "daemon started with pid {pid}"),
        }
    }
}

impl fmt::Display for StopOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StopOutcome::NotRunning => write!(f, "daemon is not running"),
            StopOutcome::Stopped(pid) => write!(f, "stopped daemon with pid {pid}"),
            StopOutcome::PermissionDenied(pid) => write!(
                f,
                "daemon with pid {pid} could not be signalled: permission denied"
            ),
        }
    }
}

impl fmt::Display for DaemonState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DaemonState::NotRunning => write!(f, "daemon status: stopped"),
            DaemonState::Running(pid) => write!(f, "daemon status: running\n- pid: {pid}"),
        }
    }
}

pub(crate) fn store_for(config: &AppConfig) -> CacheStore {
    CacheStore::new(config.cache_dir()).with_default_tip(config.cache.default_tip.clone())
}

/// Live pid recorded in the handle file.  A stale handle is removed.
pub(crate) fn running_pid(store: &CacheStore) -> Result<Option<u32>> {
    let Some(pid) = store.read_handle()? else {
        return Ok(None);
    };

    if is_pid_running(pid) {
        return Ok(Some(pid));
    }

    info!(pid, "removing stale pid file");
    store.clear_handle()?;
    Ok(None)
}

pub(crate) fn daemon_status(store: &CacheStore) -> Result<DaemonState> {
    Ok(match running_pid(store)? {
        Some(pid) => DaemonState::Running(pid),
        None => DaemonState::NotRunning,
    })
}

/// Detach a background copy of this executable running the refresh loop.
pub(crate) fn daemon_start(store: &CacheStore, config_path: &Path) -> Result<StartOutcome> {
    if let Some(pid) = running_pid(store)? {
        return Ok(StartOutcome::AlreadyRunning(pid));
    }

    store.ensure_dir()?;
    let context_dir = env::current_dir().unwrap_or_else(|_| Path::new("/").to_path_buf());
    let log_file = store.log_file();
    let out = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_file)
        .with_context(|| format!("open daemon log {}", log_file.display()))?;
    let err = out.try_clone()?;

    let exe = env::current_exe()?;
    let mut command = Command::new(exe);
    command
        .env(DAEMON_PROCESS_ENV, "1")
        .env(CONFIG_ENV, config_path)
        .env(CONTEXT_DIR_ENV, &context_dir)
        .current_dir("/")
        .stdin(Stdio::null())
        .stdout(Stdio::from(out))
        .stderr(Stdio::from(err));
    // SAFETY: setsid is async-signal-safe and touches no parent state.
    unsafe {
        command.pre_exec(|| {
            if libc::setsid() == -1 {
                return Err(io::Error::last_os_error());
            }
            Ok(())
        });
    }

    let mut child = command.spawn().context("spawn background daemon")?;
    let pid = child.id();
    store.write_handle(pid)?;

    // Catch a child that dies on startup (bad config, unwritable cache).
    for _ in 0..5 {
        if let Some(status) = child.try_wait()? {
            store.clear_handle()?;
            bail!(
                "daemon exited during startup with status {status}; check {}",
                log_file.display()
            );
        }
        std::thread::sleep(Duration::from_millis(50));
    }

    Ok(StartOutcome::Started(pid))
}

/// Signal the recorded daemon and drop the handle.  Delivery is best effort:
/// the handle is removed even when the process is already gone.
pub(crate) fn daemon_stop(store: &CacheStore) -> Result<StopOutcome> {
    let Some(pid) = store.read_handle()? else {
        // drops an unparsable handle too
        store.clear_handle()?;
        return Ok(StopOutcome::NotRunning);
    };

    let outcome = stop_outcome(pid, terminate_pid(pid));
    store.clear_handle()?;
    Ok(outcome)
}

fn stop_outcome(pid: u32, delivery: io::Result<()>) -> StopOutcome {
    match delivery {
        Ok(()) => StopOutcome::Stopped(pid),
        Err(err) if err.raw_os_error() == Some(libc::EPERM) => StopOutcome::PermissionDenied(pid),
        Err(_) => StopOutcome::NotRunning,
    }
}

/// Run the refresh loop in this process until SIGINT or SIGTERM.
pub(crate) async fn run_daemon_process(config: AppConfig, store: CacheStore) -> Result<()> {
    // Registered before the handle exists so no signal can take the default action
    // while `daemon.pid` names us.
    let signals = TerminationSignals::install().context("install signal handlers")?;
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    tokio::spawn(async move {
        signals.recv().await;
        info!("termination signal received");
        let _ = shutdown_tx.send(true);
    });

    run_until_shutdown(config, store, shutdown_rx).await
}

async fn run_until_shutdown(
    config: AppConfig,
    store: CacheStore,
    shutdown: watch::Receiver<bool>,
) -> Result<()> {
    let own_pid = std::process::id();
    if let Some(pid) = running_pid(&store)? {
        if pid != own_pid {
            bail!("daemon already running with pid {pid}");
        }
    }

    store.ensure_dir()?;
    store.write_handle(own_pid)?;
    println!("daemon started with pid {own_pid}");
    println!("cache file: {}", store.cache_file().display());

    let refresh = RefreshLoop::new(config, store.clone());
    let result = refresh.run(shutdown).await;

    // Only remove the handle if it still names us.
    if store.read_handle().ok().flatten() == Some(own_pid) {
        store.clear_handle()?;
    }
    println!("daemon stopping");
    result?;
    Ok(())
}

struct TerminationSignals {
    terminate: Signal,
    interrupt: Signal,
}

impl TerminationSignals {
    fn install() -> io::Result<Self> {
        Ok(Self {
            terminate: signal(SignalKind::terminate())?,
            interrupt: signal(SignalKind::interrupt())?,
        })
    }

    async fn recv(mut self) {
        tokio::select! {
            _ = self.terminate.recv() => {},
            _ = self.interrupt.recv() => {},
        }
    }
}

/// Non-destructive existence probe.  `EPERM` means the process exists but
/// belongs to someone else, which still counts as alive.
pub(crate) fn is_pid_running(pid: u32) -> bool {
    let Some(raw) = raw_pid(pid) else {
        return false;
    };
    // SAFETY: signal 0 performs only the permission and existence checks.
    if unsafe { libc::kill(raw, 0) } == 0 {
        return true;
    }
    io::Error::last_os_error().raw_os_error() == Some(libc::EPERM)
}

/// Send SIGTERM.  A pid that cannot name a single process reads as `ESRCH`.
pub(crate) fn terminate_pid(pid: u32) -> io::Result<()> {
    let Some(raw) = raw_pid(pid) else {
        return Err(io::Error::from_raw_os_error(libc::ESRCH));
    };
    // SAFETY: plain kill(2) on a positive pid.
    if unsafe { libc::kill(raw, libc::SIGTERM) } == 0 {
        return Ok(());
    }
    let err = io::Error::last_os_error();
    warn!(pid, %err, "could not signal daemon");
    Err(err)
}

/// Zero and values past `i32::MAX` would address process groups.
fn raw_pid(pid: u32) -> Option<libc::pid_t> {
    libc::pid_t::try_from(pid).ok().filter(|raw| *raw > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::process::Child;
    use tempfile::TempDir;

    fn spawn_sleeper() -> Child {
        Command::new("sleep").arg("30").spawn().unwrap()
    }

    fn dead_pid() -> u32 {
        let mut child = Command::new("true").spawn().unwrap();
        let pid = child.id();
        child.wait().unwrap();
        pid
    }

    #[test]
    fn own_process_is_alive() {
        assert!(is_pid_running(std::process::id()));
    }

    #[test]
    fn reaped_process_is_dead() {
        assert!(!is_pid_running(dead_pid()));
    }

    #[test]
    fn process_group_pids_are_never_probed() {
        assert!(!is_pid_running(0));
        assert!(!is_pid_running(u32::MAX));
        assert!(terminate_pid(0).is_err());
    }

    #[test]
    fn status_without_handle_is_stopped() {
        let dir = TempDir::new().unwrap();
        let store = CacheStore::new(dir.path());
        assert_eq!(daemon_status(&store).unwrap(), DaemonState::NotRunning);
    }

    #[test]
    fn stale_handle_is_cleaned_on_status() {
        let dir = TempDir::new().unwrap();
        let store = CacheStore::new(dir.path());
        store.write_handle(dead_pid()).unwrap();

        assert_eq!(daemon_status(&store).unwrap(), DaemonState::NotRunning);
        assert!(!store.pid_file().exists());
    }

    #[test]
    fn start_is_a_no_op_while_daemon_is_alive() {
        let dir = TempDir::new().unwrap();
        let store = CacheStore::new(dir.path());
        let mut sleeper = spawn_sleeper();
        store.write_handle(sleeper.id()).unwrap();

        let outcome = daemon_start(&store, Path::new("unused.toml")).unwrap();
        assert_eq!(outcome, StartOutcome::AlreadyRunning(sleeper.id()));
        assert_eq!(store.read_handle().unwrap(), Some(sleeper.id()));
        assert_eq!(daemon_status(&store).unwrap(), DaemonState::Running(sleeper.id()));

        sleeper.kill().unwrap();
        sleeper.wait().unwrap();
    }

    #[test]
    fn stop_signals_and_removes_handle() {
        let dir = TempDir::new().unwrap();
        let store = CacheStore::new(dir.path());
        let mut sleeper = spawn_sleeper();
        let pid = sleeper.id();
        store.write_handle(pid).unwrap();

        assert_eq!(daemon_stop(&store).unwrap(), StopOutcome::Stopped(pid));
        assert!(!store.pid_file().exists());

        let status = sleeper.wait().unwrap();
        assert!(!status.success(), "sleeper should have been terminated");

        // a second stop finds nothing to do
        assert_eq!(daemon_stop(&store).unwrap(), StopOutcome::NotRunning);
    }

    #[test]
    fn stop_without_handle_reports_not_running() {
        let dir = TempDir::new().unwrap();
        let store = CacheStore::new(dir.path());
        assert_eq!(daemon_stop(&store).unwrap(), StopOutcome::NotRunning);
    }

    #[test]
    fn stop_with_dead_pid_clears_handle() {
        let dir = TempDir::new().unwrap();
        let store = CacheStore::new(dir.path());
        store.write_handle(dead_pid()).unwrap();

        assert_eq!(daemon_stop(&store).unwrap(), StopOutcome::NotRunning);
        assert!(!store.pid_file().exists());
    }

    #[test]
    fn outcome_messages() {
        assert_eq!(StartOutcome::AlreadyRunning(7).to_string(), "daemon already running with pid 7");
        assert_eq!(StartOutcome::Started(8).to_string(), "daemon started with pid 8");
        assert_eq!(StopOutcome::NotRunning.to_string(), "daemon is not running");
        assert_eq!(StopOutcome::Stopped(9).to_string(), "stopped daemon with pid 9");
        assert_eq!(DaemonState::NotRunning.to_string(), "daemon status: stopped");
        assert_eq!(
            StopOutcome::PermissionDenied(10).to_string(),
            "daemon with pid 10 could not be signalled: permission denied"
        );
    }

    #[test]
    fn stop_distinguishes_foreign_process_from_gone() {
        assert_eq!(stop_outcome(5, Ok(())), StopOutcome::Stopped(5));
        assert_eq!(
            stop_outcome(5, Err(io::Error::from_raw_os_error(libc::EPERM))),
            StopOutcome::PermissionDenied(5)
        );
        assert_eq!(
            stop_outcome(5, Err(io::Error::from_raw_os_error(libc::ESRCH))),
            StopOutcome::NotRunning
        );
    }

    async fn wait_for_handle(store: &CacheStore, pid: u32) {
        for _ in 0..100 {
            if store.read_handle().unwrap() == Some(pid) && store.cache_file().exists() {
                return;
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
        panic!("daemon never recorded pid {pid}");
    }

    #[tokio::test]
    async fn foreground_daemon_holds_handle_until_shutdown() {
        let dir = TempDir::new().unwrap();
        let store = CacheStore::new(dir.path());
        let own_pid = std::process::id();
        let (tx, rx) = watch::channel(false);

        let task = tokio::spawn(run_until_shutdown(AppConfig::default(), store.clone(), rx));
        wait_for_handle(&store, own_pid).await;
        assert_eq!(daemon_status(&store).unwrap(), DaemonState::Running(own_pid));

        tx.send(true).unwrap();
        tokio::time::timeout(Duration::from_secs(5), task)
            .await
            .expect("daemon did not stop promptly")
            .unwrap()
            .unwrap();
        assert!(!store.pid_file().exists());
        assert_eq!(daemon_status(&store).unwrap(), DaemonState::NotRunning);
    }

    #[tokio::test]
    async fn shutdown_before_first_cycle_still_clears_handle() {
        let dir = TempDir::new().unwrap();
        let store = CacheStore::new(dir.path());
        let (_tx, rx) = watch::channel(true);

        run_until_shutdown(AppConfig::default(), store.clone(), rx)
            .await
            .unwrap();
        assert!(!store.pid_file().exists());
    }

    #[tokio::test]
    async fn second_foreground_daemon_is_refused() {
        let dir = TempDir::new().unwrap();
        let store = CacheStore::new(dir.path());
        let mut sleeper = spawn_sleeper();
        store.write_handle(sleeper.id()).unwrap();
        let (_tx, rx) = watch::channel(false);

        let err = run_until_shutdown(AppConfig::default(), store.clone(), rx)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("already running"), "{err}");
        assert_eq!(store.read_handle().unwrap(), Some(sleeper.id()));

        sleeper.kill().unwrap();
        sleeper.wait().unwrap();
    }

    #[tokio::test]
    async fn shutdown_leaves_a_newer_handle_alone() {
        let dir = TempDir::new().unwrap();
        let store = CacheStore::new(dir.path());
        let (tx, rx) = watch::channel(false);

        let task = tokio::spawn(run_until_shutdown(AppConfig::default(), store.clone(), rx));
        wait_for_handle(&store, std::process::id()).await;

        let mut sleeper = spawn_sleeper();
        store.write_handle(sleeper.id()).unwrap();
        tx.send(true).unwrap();
        task.await.unwrap().unwrap();
        assert_eq!(store.read_handle().unwrap(), Some(sleeper.id()));

        sleeper.kill().unwrap();
        sleeper.wait().unwrap();
    }

    #[tokio::test]
    async fn installed_listeners_absorb_sigterm() {
        let signals = TerminationSignals::install().unwrap();
        let pid = libc::pid_t::try_from(std::process::id()).unwrap();
        // SAFETY: the handler above replaces the default action.
        assert_eq!(unsafe { libc::kill(pid, libc::SIGTERM) }, 0);

        tokio::time::timeout(Duration::from_secs(5), signals.recv())
            .await
            .expect("SIGTERM was not observed");
    }
}

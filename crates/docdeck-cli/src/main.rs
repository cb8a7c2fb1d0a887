//! docdeck - command-line front-end for the document dashboard session.
//!
//! Bootstraps the session from the OS keychain, reports which screens the
//! navigation guard allows, and runs the login / signup / logout flows.

mod app;

use std::io;
use std::path::Path;

use anyhow::Result;
use tracing::{debug, info};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use docdeck_core::{decide, Config, LoginCredentials, NavigationDecision, SignupForm, Transition};

use app::{prompt_name, App, StorageKind};

// ============================================================================
// Constants
// ============================================================================

/// File name prefix for rolling log files
const LOG_FILE_PREFIX: &str = "docdeck.log";

const USAGE: &str = "\
Usage: docdeck [--memory] [COMMAND]

Commands:
  status          Show the current session and reachable screens (default)
  login [EMAIL]   Sign in
  signup          Create an account
  logout          Sign out
  routes          List reachable screens only
  demo            Sign in and out with the demo account, printing each transition

Options:
  --memory        Keep the token in memory instead of the OS keychain
";

#[derive(Debug, Clone, PartialEq, Eq)]
enum Command {
    Status,
    Routes,
    Login(Option<String>),
    Signup,
    Logout,
    Demo,
}

impl Command {
    /// Parse positional arguments; no command means `status`
    fn parse(args: &[String]) -> Result<Self> {
        let command = match args.first().map(String::as_str) {
            None | Some("status") => Command::Status,
            Some("routes") => Command::Routes,
            Some("login") => Command::Login(args.get(1).cloned()),
            Some("signup") => Command::Signup,
            Some("logout") => Command::Logout,
            Some("demo") => Command::Demo,
            Some(other) => anyhow::bail!("Unknown command: {}\n\n{}", other, USAGE),
        };
        Ok(command)
    }
}

/// Initialize the tracing subscriber for logging.
///
/// The returned guard must stay alive for file logging to flush.
fn init_tracing(log_dir: Option<&Path>) -> Option<WorkerGuard> {
    // Use RUST_LOG env var to control log level (e.g., RUST_LOG=debug)
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    let (file_layer, guard) = match log_dir {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, LOG_FILE_PREFIX);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            (Some(fmt::layer().with_writer(writer).with_ansi(false)), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(file_layer)
        .with(filter)
        .init();

    guard
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let mut storage_kind = StorageKind::Keychain;
    let mut positional = Vec::new();
    for arg in std::env::args().skip(1) {
        match arg.as_str() {
            "--memory" => storage_kind = StorageKind::Memory,
            "-h" | "--help" => {
                print!("{}", USAGE);
                return Ok(());
            }
            _ => positional.push(arg),
        }
    }

    let command = Command::parse(&positional)?;

    // Log directory has to be known before the subscriber exists
    let log_dir = Config::default_path()
        .ok()
        .and_then(|path| Config::load_from(&path).ok())
        .and_then(|config| config.log_dir);
    let _guard = init_tracing(log_dir.as_deref());
    info!("docdeck starting");

    let mut app = App::new(storage_kind);
    app.bootstrap().await;
    debug!(decision = ?app.decision(), "Session bootstrapped");

    let result = match command {
        Command::Status => {
            print_status(&app);
            Ok(())
        }
        Command::Routes => {
            print_routes(&app.decision());
            Ok(())
        }
        Command::Login(email) => login(&mut app, email).await,
        Command::Signup => signup(&mut app).await,
        Command::Logout => logout(&mut app).await,
        Command::Demo => demo(&mut app).await,
    };

    info!("docdeck shutting down");
    result
}

async fn login(app: &mut App, email: Option<String>) -> Result<()> {
    if app.store.snapshot().is_authenticated() {
        println!("Already signed in. Run `docdeck logout` first.");
        return Ok(());
    }

    let email = match email.or_else(|| std::env::var("DOCDECK_EMAIL").ok()) {
        Some(email) => email,
        None => app.prompt_email()?,
    };
    let password = match std::env::var("DOCDECK_PASSWORD") {
        Ok(password) => password,
        Err(_) => App::prompt_password("Password: ")?,
    };

    if let Err(e) = app.attempt_login(LoginCredentials::new(email, password)).await {
        return Err(app.failure_report(e));
    }

    println!("Signed in.");
    print_status(app);
    Ok(())
}

async fn signup(app: &mut App) -> Result<()> {
    if app.store.snapshot().is_authenticated() {
        println!("Already signed in. Run `docdeck logout` first.");
        return Ok(());
    }

    let form = SignupForm {
        full_name: prompt_name()?,
        email: app.prompt_email()?,
        password: App::prompt_password("Password: ")?,
        confirm_password: App::prompt_password("Confirm password: ")?,
    };

    if let Err(e) = app.attempt_signup(form).await {
        return Err(app.failure_report(e));
    }

    println!("Account created.");
    print_status(app);
    Ok(())
}

async fn logout(app: &mut App) -> Result<()> {
    if !app.store.snapshot().is_authenticated() {
        println!("Not signed in.");
        return Ok(());
    }

    app.logout().await?;
    println!("Signed out.");
    print_status(app);
    Ok(())
}

/// Drive a full sign-in / sign-out cycle, re-deciding the screens from
/// each change the session store publishes.
async fn demo(app: &mut App) -> Result<()> {
    let mut rx = app.store.subscribe();
    println!("start: {}", describe(&decide(&rx.borrow_and_update())));

    if app.store.snapshot().is_authenticated() {
        app.logout().await?;
        rx.changed().await?;
        println!("signed out: {}", describe(&decide(&rx.borrow_and_update())));
    }

    let email = app.config.demo_email.clone();
    let password = app.config.demo_password.clone();
    app.attempt_login(LoginCredentials::new(email.clone(), password))
        .await?;
    rx.changed().await?;
    println!("signed in as {}: {}", email, describe(&decide(&rx.borrow_and_update())));

    app.logout().await?;
    rx.changed().await?;
    println!("signed out: {}", describe(&decide(&rx.borrow_and_update())));
    Ok(())
}

fn print_status(app: &App) {
    let session = app.store.snapshot();
    let decision = app.decision();
    println!("Session: {}", if session.is_authenticated() { "signed in" } else { "signed out" });
    println!("Screens: {}", describe(&decision));
    print_routes(&decision);
}

fn print_routes(decision: &NavigationDecision) {
    for route in decision.reachable_routes() {
        let marker = if decision.initial_route() == Some(*route) { "*" } else { " " };
        println!(" {} {:?} ({})", marker, route, route.title());
    }
}

fn describe(decision: &NavigationDecision) -> &'static str {
    match decision {
        NavigationDecision::Loading => "loading",
        NavigationDecision::Unauthenticated { transition: Transition::Push } => "login/signup",
        NavigationDecision::Unauthenticated { transition: Transition::Pop } => {
            "login/signup (after sign-out)"
        }
        NavigationDecision::Authenticated => "main/document detail",
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_command_parse_default_is_status() {
        assert_eq!(Command::parse(&[]).unwrap(), Command::Status);
        assert_eq!(Command::parse(&args(&["status"])).unwrap(), Command::Status);
    }

    #[test]
    fn test_command_parse_login_email() {
        assert_eq!(
            Command::parse(&args(&["login", "razin@example.com"])).unwrap(),
            Command::Login(Some("razin@example.com".to_string()))
        );
        assert_eq!(Command::parse(&args(&["login"])).unwrap(), Command::Login(None));
    }

    #[test]
    fn test_command_parse_unknown_is_error() {
        let err = Command::parse(&args(&["frobnicate"])).unwrap_err();
        assert!(err.to_string().starts_with("Unknown command: frobnicate"));
    }
}

//! issuedesk - browse, create and edit issues from the terminal.

use std::io::{self, Stdout};
use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::{error, info};

use issuedesk::api::IssueClient;
use issuedesk::app::App;
use issuedesk::cli::{Cli, Command};
use issuedesk::config::Config;
use issuedesk::error::AppError;
use issuedesk::events::EventHandler;
use issuedesk::logging;
use issuedesk::route::Route;
use issuedesk::tasks::create_task_channel;

type Tui = Terminal<CrosstermBackend<Stdout>>;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = logging::init() {
        eprintln!("Warning: failed to initialize logging: {}", e);
    }

    let result = run(cli).await;
    logging::shutdown();

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "Exiting with error");
            match e.downcast_ref::<AppError>() {
                Some(app_error) => {
                    eprintln!("Error: {}", app_error.user_message());
                    if let Some(action) = app_error.suggested_action() {
                        eprintln!("{}", action);
                    }
                    // Startup errors are explained above; anything else is in the log
                    if !app_error.is_critical() {
                        if let Some(dir) = logging::log_directory() {
                            eprintln!("Details are logged under {}", dir.display());
                        }
                    }
                }
                None => eprintln!("Error: {:#}", e),
            }
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = cli.load_config().map_err(AppError::from)?;

    match cli.command {
        Some(Command::Health) => check_health(&config).await,
        None => {
            let route = match cli.route.as_deref() {
                Some(path) => Route::parse(path).map_err(AppError::from)?,
                None => Route::List,
            };
            run_tui(&config, route).await
        }
    }
}

async fn check_health(config: &Config) -> Result<()> {
    let client = IssueClient::new(&config.server).map_err(AppError::from)?;
    let health = client.health().await.map_err(AppError::from)?;

    println!("{}: {}", client.base_url(), health.status);
    if !health.is_ok() {
        anyhow::bail!("Issue service reported status '{}'", health.status);
    }
    Ok(())
}

async fn run_tui(config: &Config, route: Route) -> Result<()> {
    let client = IssueClient::new(&config.server).map_err(AppError::from)?;
    let (mut rx, spawner) = create_task_channel();
    let events = EventHandler::with_tick_rate(config.settings.tick_rate_ms);

    let mut app = App::new(config);
    app.navigate(route);

    let mut terminal_guard =
        TerminalGuard::init().map_err(|e| AppError::terminal(e.to_string()))?;
    info!(server = %client.base_url(), "Terminal UI started");

    loop {
        for request in app.take_pending_requests() {
            spawner.spawn(&client, request);
        }

        terminal_guard
            .terminal_mut()
            .draw(|frame| app.view(frame))
            .map_err(AppError::from)?;

        // Polling blocks for up to one tick
        let event = tokio::task::block_in_place(|| events.next()).map_err(AppError::from)?;
        app.update(event);

        while let Ok(message) = rx.try_recv() {
            app.handle_api_message(message);
        }

        if app.should_quit() {
            break;
        }
    }

    Ok(())
}

/// Raw mode and the alternate screen, restored on drop.
struct TerminalGuard {
    terminal: Tui,
}

impl TerminalGuard {
    fn init() -> io::Result<Self> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;

        let backend = CrosstermBackend::new(stdout);
        let terminal = Terminal::new(backend)?;

        Ok(Self { terminal })
    }

    fn terminal_mut(&mut self) -> &mut Tui {
        &mut self.terminal
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(self.terminal.backend_mut(), LeaveAlternateScreen);
        let _ = self.terminal.show_cursor();
    }
}

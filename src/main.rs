mod clock;
mod config;
mod data;
mod logging;
mod logos;
mod model;
mod registry;
mod scheduler;
mod ui;

use std::{io, sync::Arc, time::Duration};

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use tokio::sync::{mpsc, watch};
use tracing::{error, info};

use clock::Clock;
use config::Config;
use data::DataClient;
use logos::LogoCache;
use registry::GameViewRegistry;
use scheduler::{spawn_clock_task, spawn_score_task, ScorePoller, UiUpdate};
use ui::ViewModel;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::parse();
    config.validate()?;
    let _log_guard = logging::init_logging(&config.log_file)?;
    info!("Starting ticker: {:?}", config);

    let client = Arc::new(
        DataClient::new(
            &config.scoreboard_url,
            &config.logo_url_template,
            config.http_timeout(),
        )
        .context("Failed to build HTTP client")?,
    );
    let clock = Clock::new(config.zone()?);
    let poller = ScorePoller::new(
        client.clone(),
        LogoCache::new(client),
        GameViewRegistry::new(),
    );

    let (tx, mut rx) = mpsc::channel::<UiUpdate>(100);
    let (stop_tx, stop_rx) = watch::channel(false);
    let score_task = spawn_score_task(poller, config.score_interval(), tx.clone(), stop_rx.clone());
    let clock_task = spawn_clock_task(clock, config.clock_interval(), tx, stop_rx);

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut view = ViewModel {
        clock: clock.format_now(),
        ..Default::default()
    };
    let res = run_app(&mut terminal, &mut view, &mut rx);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    stop_tx.send_replace(true);
    rx.close();
    if let Err(e) = clock_task.await {
        error!("Clock task ended abnormally: {}", e);
    }
    match score_task.await {
        Ok(poller) => log_final_state(&poller),
        Err(e) => error!("Score task ended abnormally: {}", e),
    }

    if let Err(err) = res {
        error!("UI loop failed: {}", err);
        println!("{:?}", err)
    }

    Ok(())
}

fn log_final_state(poller: &ScorePoller<DataClient, LogoCache<DataClient>>) {
    let registry = poller.registry();
    if registry.is_empty() {
        info!("Shut down with no games tracked");
        return;
    }
    let ids: Vec<String> = registry.snapshot().into_iter().map(|game| game.id).collect();
    info!(
        "Shut down with {} game(s) tracked ({}), {} logo(s) cached",
        registry.len(),
        ids.join(", "),
        poller.logos().len()
    );
}

fn run_app<B: Backend>(
    terminal: &mut Terminal<B>,
    view: &mut ViewModel,
    rx: &mut mpsc::Receiver<UiUpdate>,
) -> io::Result<()> {
    loop {
        terminal.draw(|f| ui::draw(f, view))?;

        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    match key.code {
                        KeyCode::Char('q') | KeyCode::Esc => view.should_quit = true,
                        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                            view.should_quit = true
                        }
                        _ => {}
                    }
                }
            }
        }

        while let Ok(update) = rx.try_recv() {
            view.apply(update);
        }

        if view.should_quit {
            return Ok(());
        }
    }
}

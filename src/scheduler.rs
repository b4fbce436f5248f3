//! The two periodic lines of work: score polling and the clock.
//!
//! Each runs as its own task on a `tokio::time::interval` and stops when the
//! shared watch flag flips to `true` or the UI side of the channel goes away.
//! Registry and logo cache live inside the score task, so there is exactly one
//! mutator; the UI only ever sees owned snapshots.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, error, info};

use crate::clock::Clock;
use crate::data::ScoreSource;
use crate::logos::LogoLookup;
use crate::model::Scoreboard;
use crate::registry::{GameView, GameViewRegistry};

/// Messages from the background tasks to the UI loop.
#[derive(Debug, Clone)]
pub enum UiUpdate {
    Clock(String),
    Games {
        games: Vec<GameView>,
        notice: Option<String>,
    },
    FetchFailed(String),
}

pub struct ScorePoller<S, L> {
    source: Arc<S>,
    logos: L,
    registry: GameViewRegistry,
}

impl<S: ScoreSource, L: LogoLookup> ScorePoller<S, L> {
    pub fn new(source: Arc<S>, logos: L, registry: GameViewRegistry) -> Self {
        Self {
            source,
            logos,
            registry,
        }
    }

    pub fn registry(&self) -> &GameViewRegistry {
        &self.registry
    }

    pub fn logos(&self) -> &L {
        &self.logos
    }

    /// One polling cycle. A failed fetch leaves the registry as it was.
    pub async fn poll_once(&mut self) -> UiUpdate {
        let scoreboard = match self.source.fetch_games().await {
            Ok(scoreboard) => scoreboard,
            Err(e) => {
                error!("Scoreboard update failed, keeping last state: {}", e);
                return UiUpdate::FetchFailed(e.to_string());
            }
        };

        self.registry.apply(&scoreboard, &mut self.logos).await;
        let notice = match scoreboard {
            Scoreboard::NoGames => {
                info!("{}", Scoreboard::NO_GAMES_TEXT);
                Some(Scoreboard::NO_GAMES_TEXT.to_string())
            }
            Scoreboard::Games(games) => {
                debug!("Reconciled {} game(s)", games.len());
                None
            }
        };
        UiUpdate::Games {
            games: self.registry.snapshot(),
            notice,
        }
    }
}

/// Polls immediately, then every `period`. Hands the poller back once stopped.
pub fn spawn_score_task<S, L>(
    mut poller: ScorePoller<S, L>,
    period: Duration,
    tx: mpsc::Sender<UiUpdate>,
    mut stop: watch::Receiver<bool>,
) -> JoinHandle<ScorePoller<S, L>>
where
    S: ScoreSource + 'static,
    L: LogoLookup + 'static,
{
    tokio::spawn(async move {
        info!("Score task started (interval={:?})", period);
        let mut ticker = tokio::time::interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    // A cycle can span many slow requests; stopping must not wait for it.
                    let update = tokio::select! {
                        update = poller.poll_once() => update,
                        _ = stop_requested(&mut stop) => break,
                    };
                    if tx.send(update).await.is_err() {
                        debug!("UI channel closed, stopping score task");
                        break;
                    }
                }
                _ = stop_requested(&mut stop) => break,
            }
        }
        info!("Score task stopped");
        poller
    })
}

pub fn spawn_clock_task(
    clock: Clock,
    period: Duration,
    tx: mpsc::Sender<UiUpdate>,
    mut stop: watch::Receiver<bool>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    if tx.send(UiUpdate::Clock(clock.format_now())).await.is_err() {
                        break;
                    }
                }
                _ = stop_requested(&mut stop) => break,
            }
        }
        debug!("Clock task stopped");
    })
}

/// Resolves once the flag reads `true` or its sender is dropped.
async fn stop_requested(stop: &mut watch::Receiver<bool>) {
    loop {
        if *stop.borrow_and_update() {
            return;
        }
        if stop.changed().await.is_err() {
            return;
        }
    }
}

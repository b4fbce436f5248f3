use std::collections::HashMap;

use tracing::{debug, info};

use crate::logos::{Logo, LogoLookup};
use crate::model::{GameRecord, Scoreboard};

pub const SEPARATOR: &str = "vs";

/// Display slots for one game, in their fixed left-to-right order.
#[derive(Debug, Clone, Default)]
pub struct GameViewState {
    pub team1_logo: Option<Logo>,
    pub team1_info: String,
    pub separator: &'static str,
    pub team2_logo: Option<Logo>,
    pub team2_info: String,
    pub status: String,
}

impl GameViewState {
    fn new() -> Self {
        Self {
            separator: SEPARATOR,
            ..Default::default()
        }
    }
}

/// A row as handed to the UI: the game id plus a copy of its slots.
#[derive(Debug, Clone)]
pub struct GameView {
    pub id: String,
    pub slots: GameViewState,
}

/// Persistent view state per game id. Entries are created on first sight and
/// only ever overwritten afterwards.
#[derive(Debug, Default)]
pub struct GameViewRegistry {
    games: HashMap<String, GameViewState>,
    order: Vec<String>,
}

impl GameViewRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.games.len()
    }

    pub fn is_empty(&self) -> bool {
        self.games.is_empty()
    }

    #[cfg(test)]
    pub fn get(&self, id: &str) -> Option<&GameViewState> {
        self.games.get(id)
    }

    pub async fn reconcile<L: LogoLookup>(&mut self, record: &GameRecord, logos: &mut L) {
        let (name1, name2) = &record.teams;
        let (score1, score2) = &record.scores;

        let team1_logo = logos.get_logo(name1).await;
        let team2_logo = logos.get_logo(name2).await;

        if !self.games.contains_key(&record.id) {
            info!("New game {}: {} vs {}", record.id, name1, name2);
            self.order.push(record.id.clone());
        }
        let view = self
            .games
            .entry(record.id.clone())
            .or_insert_with(GameViewState::new);

        view.team1_logo = team1_logo;
        view.team2_logo = team2_logo;
        view.team1_info = record.status.info_text(name1, score1);
        view.team2_info = record.status.info_text(name2, score2);
        view.status = record.status.status_text();
        debug!(
            "Game {}: {} | {} | {}",
            record.id, view.team1_info, view.team2_info, view.status
        );
    }

    /// Folds one poll into the registry. `NoGames` leaves every entry untouched.
    pub async fn apply<L: LogoLookup>(&mut self, scoreboard: &Scoreboard, logos: &mut L) {
        if let Scoreboard::Games(games) = scoreboard {
            for record in games {
                self.reconcile(record, logos).await;
            }
        }
    }

    /// Rows in first-seen order.
    pub fn snapshot(&self) -> Vec<GameView> {
        self.order
            .iter()
            .filter_map(|id| {
                self.games.get(id).map(|slots| GameView {
                    id: id.clone(),
                    slots: slots.clone(),
                })
            })
            .collect()
    }
}

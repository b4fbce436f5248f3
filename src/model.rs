use serde::{Deserialize, Serialize};

#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreboardResponse {
    #[serde(default)]
    pub events: Vec<Event>,
}

#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: String,
    #[serde(default)]
    pub competitions: Vec<Competition>,
}

#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Competition {
    #[serde(default)]
    pub competitors: Vec<Competitor>,
    #[serde(default)]
    pub status: Status,
}

#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Competitor {
    pub team: Team,
    pub score: Option<String>,
}

#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Team {
    pub display_name: String,
}

#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Status {
    #[serde(default)]
    pub period: i32,
    #[serde(default)]
    pub display_clock: String,
    #[serde(rename = "type", default)]
    pub type_field: StatusType,
}

#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusType {
    #[serde(default)]
    pub state: String, // "pre", "in", "post"
    #[serde(default)]
    pub short_detail: String,
}

/// Lifecycle of a game as reported by the scoreboard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameState {
    Pre,
    In,
    Post,
    Other(String),
}

impl GameState {
    pub fn parse(raw: &str) -> Self {
        match raw {
            "pre" => GameState::Pre,
            "in" => GameState::In,
            "post" => GameState::Post,
            other => GameState::Other(other.to_string()),
        }
    }

    pub fn is_pre(&self) -> bool {
        matches!(self, GameState::Pre)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameStatus {
    pub state: GameState,
    pub period: i32,
    pub display_clock: String,
    pub short_detail: String,
}

impl GameStatus {
    /// Text for a team's info slot: bare name before puck drop, name and score after.
    pub fn info_text(&self, name: &str, score: &str) -> String {
        if self.state.is_pre() {
            name.to_string()
        } else {
            format!("{} {}", name, score)
        }
    }

    pub fn status_text(&self) -> String {
        if self.state.is_pre() {
            format!("Starts at {}", self.short_detail)
        } else {
            format!("Period: {}, Time: {}", self.period, self.display_clock)
        }
    }
}

impl From<&Status> for GameStatus {
    fn from(status: &Status) -> Self {
        Self {
            state: GameState::parse(&status.type_field.state),
            period: status.period,
            display_clock: status.display_clock.clone(),
            short_detail: status.type_field.short_detail.clone(),
        }
    }
}

/// One game as seen in a single poll. Discarded once folded into the registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameRecord {
    pub id: String,
    pub teams: (String, String),
    pub scores: (String, String),
    pub status: GameStatus,
}

/// Result of a single scoreboard poll.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Scoreboard {
    NoGames,
    Games(Vec<GameRecord>),
}

impl Scoreboard {
    pub const NO_GAMES_TEXT: &'static str = "Pas de parties NHL aujourd'hui!";
}

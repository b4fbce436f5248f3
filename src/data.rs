use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use thiserror::Error;
use tracing::{debug, warn};

use crate::logos::{LogoError, LogoFetcher};
use crate::model::{GameRecord, GameStatus, Scoreboard, ScoreboardResponse};

pub const NHL_SCOREBOARD_URL: &str =
    "https://site.api.espn.com/apis/site/v2/sports/hockey/nhl/scoreboard";
pub const TSN_LOGO_URL_TEMPLATE: &str =
    "https://tsnimages.tsn.ca/ImageProvider/TeamLogo?seoId={token}&width=40&height=40";

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request to {url} failed: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("{url} returned {status}")]
    Status { url: String, status: StatusCode },
    #[error("malformed scoreboard: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Anything that can produce one poll's worth of games.
#[async_trait]
pub trait ScoreSource: Send + Sync {
    async fn fetch_games(&self) -> Result<Scoreboard, FetchError>;
}

pub struct DataClient {
    client: Client,
    scoreboard_url: String,
    logo_url_template: String,
}

impl DataClient {
    pub fn new(
        scoreboard_url: &str,
        logo_url_template: &str,
        timeout: Duration,
    ) -> reqwest::Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            scoreboard_url: scoreboard_url.to_string(),
            logo_url_template: logo_url_template.to_string(),
        })
    }

    pub fn logo_url(&self, token: &str) -> String {
        self.logo_url_template.replace("{token}", token)
    }

    async fn get_bytes(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        let http = |source| FetchError::Http {
            url: url.to_string(),
            source,
        };
        let resp = self.client.get(url).send().await.map_err(http)?;
        if !resp.status().is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: resp.status(),
            });
        }
        let bytes = resp.bytes().await.map_err(http)?;
        Ok(bytes.to_vec())
    }
}

#[async_trait]
impl ScoreSource for DataClient {
    async fn fetch_games(&self) -> Result<Scoreboard, FetchError> {
        debug!("Fetching scoreboard from {}", self.scoreboard_url);
        let body = self.get_bytes(&self.scoreboard_url).await?;
        parse_scoreboard(&body)
    }
}

#[async_trait]
impl LogoFetcher for DataClient {
    async fn fetch(&self, token: &str) -> Result<Vec<u8>, LogoError> {
        let url = self.logo_url(token);
        debug!("Fetching logo from {}", url);
        self.get_bytes(&url)
            .await
            .map_err(|e| LogoError::Fetch(e.to_string()))
    }
}

pub fn parse_scoreboard(body: &[u8]) -> Result<Scoreboard, FetchError> {
    let data: ScoreboardResponse = serde_json::from_slice(body)?;
    Ok(games_from_response(data))
}

/// Flattens the scoreboard payload into per-game records, keeping competitor order as given.
pub fn games_from_response(data: ScoreboardResponse) -> Scoreboard {
    if data.events.is_empty() {
        return Scoreboard::NoGames;
    }

    let games = data
        .events
        .into_iter()
        .filter_map(|event| {
            let Some(comp) = event.competitions.first() else {
                warn!("Event {} has no competition, skipping", event.id);
                return None;
            };
            let [first, second, ..] = comp.competitors.as_slice() else {
                warn!(
                    "Event {} has {} competitor(s), skipping",
                    event.id,
                    comp.competitors.len()
                );
                return None;
            };
            Some(GameRecord {
                teams: (
                    first.team.display_name.clone(),
                    second.team.display_name.clone(),
                ),
                scores: (
                    first.score.clone().unwrap_or_default(),
                    second.score.clone().unwrap_or_default(),
                ),
                status: GameStatus::from(&comp.status),
                id: event.id,
            })
        })
        .collect();

    Scoreboard::Games(games)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::GameState;
    use std::fs;

    #[test]
    fn test_deserialize_sample() {
        let content = fs::read("nhl_scoreboard.json").expect("Failed to read sample file");
        let Scoreboard::Games(games) = parse_scoreboard(&content).expect("Failed to deserialize")
        else {
            panic!("sample has games");
        };
        assert_eq!(games.len(), 3);
        assert_eq!(games[0].id, "401559501");
        assert_eq!(
            games[0].teams,
            ("Toronto Maple Leafs".to_string(), "Ottawa Senators".to_string())
        );
        assert_eq!(games[0].status.state, GameState::Pre);
        assert_eq!(games[1].scores, ("3".to_string(), "2".to_string()));
        assert_eq!(games[2].status.state, GameState::Post);
    }

    #[test]
    fn empty_event_list_is_no_games() {
        let parsed = parse_scoreboard(br#"{"events": []}"#).unwrap();
        assert_eq!(parsed, Scoreboard::NoGames);
    }

    #[test]
    fn bruins_canadiens_event() {
        let body = br#"{"events":[{"id":"401","competitions":[{"competitors":[
            {"team":{"displayName":"Bruins"},"score":"3"},
            {"team":{"displayName":"Canadiens"},"score":"2"}],
            "status":{"period":3,"displayClock":"05:12","type":{"state":"in","shortDetail":""}}}]}]}"#;
        let Scoreboard::Games(games) = parse_scoreboard(body).unwrap() else {
            panic!("expected games");
        };
        assert_eq!(games.len(), 1);
        let game = &games[0];
        assert_eq!(game.id, "401");
        assert_eq!(game.teams, ("Bruins".into(), "Canadiens".into()));
        assert_eq!(game.scores, ("3".into(), "2".into()));
        assert_eq!(game.status.period, 3);
        assert_eq!(game.status.display_clock, "05:12");
        assert_eq!(game.status.state, GameState::In);
    }

    #[test]
    fn incomplete_events_are_skipped() {
        let body = br#"{"events":[
            {"id":"1","competitions":[]},
            {"id":"2","competitions":[{"competitors":[{"team":{"displayName":"Bruins"}}]}]}]}"#;
        assert_eq!(parse_scoreboard(body).unwrap(), Scoreboard::Games(vec![]));
    }

    #[test]
    fn missing_score_is_empty() {
        let body = br#"{"events":[{"id":"9","competitions":[{"competitors":[
            {"team":{"displayName":"Jets"}},
            {"team":{"displayName":"Wild"}}]}]}]}"#;
        let Scoreboard::Games(games) = parse_scoreboard(body).unwrap() else {
            panic!("expected games");
        };
        assert_eq!(games[0].scores, (String::new(), String::new()));
    }

    #[test]
    fn malformed_json_is_a_decode_error() {
        let err = parse_scoreboard(b"<html>").unwrap_err();
        assert!(matches!(err, FetchError::Decode(_)));
    }

    #[test]
    fn logo_url_substitutes_token() {
        let client =
            DataClient::new(NHL_SCOREBOARD_URL, TSN_LOGO_URL_TEMPLATE, Duration::from_secs(1))
                .unwrap();
        assert_eq!(
            client.logo_url("boston-bruins"),
            "https://tsnimages.tsn.ca/ImageProvider/TeamLogo?seoId=boston-bruins&width=40&height=40"
        );
    }
}

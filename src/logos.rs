//! Team logo cache.
//!
//! Logos are fetched once per team display name and kept for the life of the
//! process. A failed fetch or decode is remembered as an absent logo and is not
//! retried.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use image::DynamicImage;
use thiserror::Error;
use tracing::{info, warn};

/// A decoded, display-ready logo. Shared between the cache and published views.
pub type Logo = Arc<DynamicImage>;

#[derive(Debug, Error)]
pub enum LogoError {
    #[error("fetch failed: {0}")]
    Fetch(String),
    #[error("decode failed: {0}")]
    Decode(#[from] image::ImageError),
}

/// Transport for raw logo bytes, keyed by the URL-safe team token.
#[async_trait]
pub trait LogoFetcher: Send + Sync {
    async fn fetch(&self, token: &str) -> Result<Vec<u8>, LogoError>;
}

/// Resolves a team name to a logo. Implemented by [`LogoCache`].
#[async_trait]
pub trait LogoLookup: Send {
    async fn get_logo(&mut self, team_name: &str) -> Option<Logo>;
}

/// Lowercase the name and replace spaces with hyphens: "Boston Bruins" -> "boston-bruins".
pub fn team_token(team_name: &str) -> String {
    team_name.to_lowercase().replace(' ', "-")
}

pub struct LogoCache<F> {
    fetcher: Arc<F>,
    entries: HashMap<String, Option<Logo>>,
}

impl<F: LogoFetcher> LogoCache<F> {
    pub fn new(fetcher: Arc<F>) -> Self {
        Self {
            fetcher,
            entries: HashMap::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    async fn download(&self, team_name: &str) -> Result<Logo, LogoError> {
        let bytes = self.fetcher.fetch(&team_token(team_name)).await?;
        let img = image::load_from_memory(&bytes)?;
        Ok(Arc::new(img))
    }
}

#[async_trait]
impl<F: LogoFetcher> LogoLookup for LogoCache<F> {
    async fn get_logo(&mut self, team_name: &str) -> Option<Logo> {
        if let Some(entry) = self.entries.get(team_name) {
            return entry.clone();
        }

        let entry = match self.download(team_name).await {
            Ok(logo) => {
                info!("Cached logo for {}", team_name);
                Some(logo)
            }
            Err(e) => {
                warn!("Error downloading logo for {}: {}", team_name, e);
                None
            }
        };
        self.entries.insert(team_name.to_string(), entry.clone());
        entry
    }
}

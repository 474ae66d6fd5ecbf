// Feed refresh policy.
// Serves the cached snapshot when fresh, otherwise fetches and re-caches.

use std::fmt::Display;

use chrono::TimeZone;

use crate::cache::{CacheGate, KeyValueStore};
use crate::diagnostics::Diagnostics;
use crate::error::Result;
use crate::github::{ActivityEvent, GitHubClient};
use crate::render::{Projector, RenderTarget, render_container};

/// Where fresh events come from.
#[allow(async_fn_in_trait)]
pub trait EventSource {
    async fn fetch_events(&mut self) -> Result<Vec<ActivityEvent>>;
}

/// Events endpoint of one GitHub repository.
pub struct RepoEvents {
    client: GitHubClient,
    owner: String,
    repo: String,
    callback: String,
}

impl RepoEvents {
    pub fn new(
        client: GitHubClient,
        owner: impl Into<String>,
        repo: impl Into<String>,
        callback: impl Into<String>,
    ) -> Self {
        Self {
            client,
            owner: owner.into(),
            repo: repo.into(),
            callback: callback.into(),
        }
    }
}

impl EventSource for RepoEvents {
    async fn fetch_events(&mut self) -> Result<Vec<ActivityEvent>> {
        let events = self
            .client
            .get_repo_events(&self.owner, &self.repo, &self.callback)
            .await?;

        let rate = self.client.rate_limit();
        tracing::debug!(
            remaining = rate.remaining,
            limit = rate.limit,
            "GitHub rate limit"
        );
        Ok(events)
    }
}

/// How a refresh was satisfied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// A fresh snapshot was rendered; no request was made.
    Cached,
    /// Events were fetched, rendered, and stored.
    Fetched,
}

/// Ties the cache gate, projector, and render target together.
pub struct App<S, D, Tz: TimeZone> {
    gate: CacheGate<S, D>,
    projector: Projector<Tz>,
}

impl<S, D, Tz> App<S, D, Tz>
where
    S: KeyValueStore,
    D: Diagnostics,
    Tz: TimeZone,
    Tz::Offset: Display,
{
    pub fn new(gate: CacheGate<S, D>, projector: Projector<Tz>) -> Self {
        Self { gate, projector }
    }

    /// Render from cache or network.
    ///
    /// Any readable snapshot is rendered straight away, even a stale one, so
    /// the target is not empty while the request is in flight. Targets that
    /// cannot replace their content skip the stale render and only get the
    /// fetched one. A fetch error is returned without touching the target or
    /// the cache.
    pub async fn refresh<E, T>(&mut self, source: &mut E, target: &mut T) -> Result<Outcome>
    where
        E: EventSource,
        T: RenderTarget,
    {
        match self.gate.try_load_fresh() {
            Some(snapshot) if snapshot.is_fresh => {
                self.render(&snapshot.events, target)?;
                self.gate
                    .diagnostics()
                    .log(&format!("cache hit (age {} ms)", snapshot.age_ms));
                return Ok(Outcome::Cached);
            }
            Some(snapshot) => {
                if target.replaces_content() {
                    self.render(&snapshot.events, target)?;
                }
                self.gate
                    .diagnostics()
                    .log(&format!("cache miss (stale, age {} ms)", snapshot.age_ms));
            }
            None => self.gate.diagnostics().log("cache miss"),
        }

        let events = source.fetch_events().await?;
        self.render(&events, target)?;
        self.gate.store(&events);
        Ok(Outcome::Fetched)
    }

    fn render<T: RenderTarget>(&self, events: &[ActivityEvent], target: &mut T) -> Result<()> {
        let lines = self.projector.project(events);
        target.replace(&render_container(&lines))
    }
}

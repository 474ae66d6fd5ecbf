// Event projection.
// Turns activity events into the `<li>` lines shown in the feed.

use std::fmt::Display;

use chrono::{DateTime, Local, TimeZone};

use crate::github::{ActivityEvent, Commit, CreatePayload, EventKind, PushPayload};

use super::format::{self, RepoLinks};

/// Most lines a feed shows.
pub const MAX_LINES: usize = 5;

/// Commits listed per push before the rest are summarized.
pub const MAX_COMMITS_PER_PUSH: usize = 3;

/// Renders events relative to a fixed "now".
#[derive(Debug, Clone)]
pub struct Projector<Tz: TimeZone> {
    links: RepoLinks,
    now: DateTime<Tz>,
}

impl Projector<Local> {
    /// Projector for the local time zone at the current moment.
    pub fn new(links: RepoLinks) -> Self {
        Self::at(links, Local::now())
    }
}

impl<Tz: TimeZone> Projector<Tz>
where
    Tz::Offset: Display,
{
    pub fn at(links: RepoLinks, now: DateTime<Tz>) -> Self {
        Self { links, now }
    }

    /// Render events in order, stopping once `MAX_LINES` lines exist.
    /// Unknown event types produce nothing.
    pub fn project(&self, events: &[ActivityEvent]) -> Vec<String> {
        let mut lines = Vec::new();

        for event in events {
            self.project_event(event, &mut lines);
            if lines.len() >= MAX_LINES {
                lines.truncate(MAX_LINES);
                break;
            }
        }

        lines
    }

    fn project_event(&self, event: &ActivityEvent, lines: &mut Vec<String>) {
        match &event.kind {
            EventKind::Push(push) => self.project_push(event, push, lines),
            EventKind::Create(create) => lines.push(self.create_line(event, create)),
            EventKind::Other { .. } => {}
        }
    }

    fn project_push(&self, event: &ActivityEvent, push: &PushPayload, lines: &mut Vec<String>) {
        let target = self.links.ref_label(&push.ref_name);
        lines.push(self.summary_line(event, &format!("pushed to {}", target)));

        let total = push.commits.len();
        for (i, commit) in push.commits.iter().enumerate() {
            if i == MAX_COMMITS_PER_PUSH {
                lines.push(format!("and {} more commits", total - i));
                break;
            }
            lines.push(self.commit_line(commit));
        }
    }

    fn create_line(&self, event: &ActivityEvent, create: &CreatePayload) -> String {
        let name = create.ref_name.as_deref().unwrap_or_default();
        let name = if create.is_branch() {
            self.links.branch_link(name)
        } else {
            name.to_string()
        };
        self.summary_line(event, &format!("created {} {}", create.ref_type, name))
    }

    fn summary_line(&self, event: &ActivityEvent, description: &str) -> String {
        let login = &event.actor.login;
        format!(
            "<li><a href=\"{}\">{}</a> {} <span class=\"date\">{}</span></li>",
            self.links.user_url(login),
            login,
            description,
            format::event_date(&event.created_at, &self.now),
        )
    }

    fn commit_line(&self, commit: &Commit) -> String {
        format!(
            "<li class=\"commit\"><a href=\"{}\">{}</a> {}</li>",
            self.links.commit_url(&commit.sha),
            format::short_sha(&commit.sha),
            format::commit_message(&commit.message),
        )
    }
}

/// Join rendered lines into the container's content; empty for no lines.
pub fn render_container(lines: &[String]) -> String {
    lines.join("\n")
}

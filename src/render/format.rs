// Formatting helpers for rendered feed lines.
// Links, ref names, commit messages, and dates.

use std::fmt::Display;

use chrono::{DateTime, TimeZone, Utc};

const GITHUB_WEB_BASE: &str = "https://github.com";
const BRANCH_REF_PREFIX: &str = "refs/heads/";

/// Commit messages are cut to this many characters before escaping.
pub const MESSAGE_MAX_CHARS: usize = 70;
const SHORT_SHA_CHARS: usize = 7;

/// Builds github.com links for one repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoLinks {
    owner: String,
    repo: String,
}

impl RepoLinks {
    pub fn new(owner: impl Into<String>, repo: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            repo: repo.into(),
        }
    }

    pub fn user_url(&self, login: &str) -> String {
        format!("{}/{}", GITHUB_WEB_BASE, login)
    }

    pub fn commit_url(&self, sha: &str) -> String {
        format!("{}/{}/{}/commit/{}", GITHUB_WEB_BASE, self.owner, self.repo, sha)
    }

    pub fn tree_url(&self, branch: &str) -> String {
        format!("{}/{}/{}/tree/{}", GITHUB_WEB_BASE, self.owner, self.repo, branch)
    }

    /// `<a>` element pointing at a branch's tree view.
    pub fn branch_link(&self, branch: &str) -> String {
        format!("<a href=\"{}\">{}</a>", self.tree_url(branch), branch)
    }

    /// Render a pushed ref: `refs/heads/<name>` becomes a branch link,
    /// anything else is returned unchanged.
    pub fn ref_label(&self, ref_name: &str) -> String {
        match ref_name.strip_prefix(BRANCH_REF_PREFIX) {
            Some(branch) => self.branch_link(branch),
            None => ref_name.to_string(),
        }
    }
}

/// Truncate a commit message, then escape `&` and `<`.
pub fn commit_message(message: &str) -> String {
    let truncated: String = message.chars().take(MESSAGE_MAX_CHARS).collect();
    truncated.replace('&', "&amp;").replace('<', "&lt;")
}

pub fn short_sha(sha: &str) -> String {
    sha.chars().take(SHORT_SHA_CHARS).collect()
}

/// `on <time>` for events from today in `now`'s time zone, `on <date>` otherwise.
pub fn event_date<Tz: TimeZone>(at: &DateTime<Utc>, now: &DateTime<Tz>) -> String
where
    Tz::Offset: Display,
{
    let local = at.with_timezone(&now.timezone());
    if local.date_naive() == now.date_naive() {
        format!("on {}", local.format("%H:%M:%S"))
    } else {
        format!("on {}", local.format("%Y-%m-%d"))
    }
}

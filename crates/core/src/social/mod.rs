//! Social-post extraction.
//!
//! A post is looked up through an ordered list of mirror strategies: the
//! structured API first, then the crawler-facing HTML page. The first
//! strategy that finds something wins. When none does, the error depends on
//! how they failed: only transport failures give `FETCH_FAILED`, anything
//! else gives `MIRROR_UNAVAILABLE`.
//!
//! API hits get their conversation context resolved afterwards. A reply to
//! the post's own author is walked back as a thread; a reply to someone else
//! fetches that single parent. Failures in either walk only shorten the
//! context.

mod page;
mod raw;

use tokio_util::sync::CancellationToken;
use url::Url;

use crate::fetch::{HttpFetcher, RequestProfile};
use crate::model::{Extraction, Post, SocialResult};
use crate::{ExtractError, Result};

use raw::{RawEnvelope, RawTweet};

/// Social extraction settings.
#[derive(Debug, Clone)]
pub struct SocialConfig {
    /// Most posts fetched while walking a self-thread backward.
    pub max_thread_hops: usize,
    /// Characters of an embedded article's text used as its excerpt.
    pub excerpt_chars: usize,
}

impl Default for SocialConfig {
    fn default() -> Self {
        Self { max_thread_hops: 25, excerpt_chars: 200 }
    }
}

/// Where a post can be looked up, in the order they are tried.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Strategy {
    MirrorApi,
    MirrorPage,
}

const STRATEGIES: [Strategy; 2] = [Strategy::MirrorApi, Strategy::MirrorPage];

/// How a single lookup ended.
#[derive(Debug)]
enum Attempt<T> {
    Found(T),
    /// The mirror answered, but not with a usable post.
    Unavailable,
    /// The mirror never answered.
    Transport,
}

/// Extracts posts, threads and embedded articles through public mirrors.
#[derive(Debug, Clone)]
pub struct SocialExtractor {
    fetcher: HttpFetcher,
    config: SocialConfig,
}

impl SocialExtractor {
    pub fn new(fetcher: HttpFetcher, config: SocialConfig) -> Self {
        Self { fetcher, config }
    }

    /// Extract the post at `url`.
    ///
    /// # Errors
    ///
    /// - [`ExtractError::InvalidUrl`] if `url` does not parse.
    /// - [`ExtractError::FetchFailed`] if every strategy failed at the transport level.
    /// - [`ExtractError::MirrorUnavailable`] otherwise when nothing was found.
    pub async fn extract(&self, url: &str, cancel: &CancellationToken) -> Result<Extraction> {
        let path = post_path(url)?;
        let mut all_transport = true;

        for strategy in STRATEGIES {
            let attempt = match strategy {
                Strategy::MirrorApi => self.try_api(&path, cancel).await,
                Strategy::MirrorPage => self.try_page(&path, cancel).await,
            };
            match attempt {
                Attempt::Found(extraction) => {
                    tracing::debug!(?strategy, path = %path, "strategy found post");
                    return Ok(extraction);
                }
                Attempt::Unavailable => {
                    tracing::debug!(?strategy, path = %path, "strategy returned nothing usable");
                    all_transport = false;
                }
                Attempt::Transport => tracing::debug!(?strategy, path = %path, "strategy failed to connect"),
            }
        }

        if all_transport {
            Err(ExtractError::FetchFailed(format!("no mirror reachable for {path}")))
        } else {
            Err(ExtractError::MirrorUnavailable)
        }
    }

    async fn try_api(&self, path: &str, cancel: &CancellationToken) -> Attempt<Extraction> {
        let raw = match self.fetch_raw(path, cancel).await {
            Attempt::Found(raw) => raw,
            Attempt::Unavailable => return Attempt::Unavailable,
            Attempt::Transport => return Attempt::Transport,
        };

        if let Some(article) = raw.to_article(self.config.excerpt_chars) {
            return Attempt::Found(Extraction::Article(article));
        }
        if !raw.has_text() {
            return Attempt::Unavailable;
        }

        let post = raw.to_post();
        let result = match raw.reply_target() {
            Some(target) if target.handle.eq_ignore_ascii_case(raw.handle()) => {
                SocialResult::with_thread(post, self.walk_thread(&raw, cancel).await)
            }
            Some(target) => {
                let parent = match target.status_id {
                    Some(id) => self.fetch_post(&format!("/{}/status/{}", target.handle, id), cancel).await,
                    None => None,
                };
                SocialResult::with_parent(post, parent)
            }
            None => SocialResult::single(post),
        };

        Attempt::Found(Extraction::Social(result))
    }

    async fn try_page(&self, path: &str, cancel: &CancellationToken) -> Attempt<Extraction> {
        let url = format!("{}{}", self.fetcher.config().page_base, path);
        match self.fetcher.get(&url, RequestProfile::Crawler, cancel).await {
            Ok(page) => match page::post_from_page(&page.body) {
                Some(post) => Attempt::Found(Extraction::Social(SocialResult::single(post))),
                None => Attempt::Unavailable,
            },
            Err(e) if e.is_transport() => Attempt::Transport,
            Err(_) => Attempt::Unavailable,
        }
    }

    /// Fetch one raw record from the mirror API.
    async fn fetch_raw(&self, path: &str, cancel: &CancellationToken) -> Attempt<RawTweet> {
        let url = format!("{}{}", self.fetcher.config().api_base, path);
        let page = match self.fetcher.get(&url, RequestProfile::Api, cancel).await {
            Ok(page) => page,
            Err(e) if e.is_transport() => return Attempt::Transport,
            Err(_) => return Attempt::Unavailable,
        };

        match serde_json::from_str::<RawEnvelope>(&page.body) {
            Ok(RawEnvelope { tweet: Some(tweet) }) => Attempt::Found(tweet),
            Ok(_) => Attempt::Unavailable,
            Err(e) => {
                tracing::debug!(url = %url, error = %e, "mirror payload did not decode");
                Attempt::Unavailable
            }
        }
    }

    /// A context post: present only if it was fetched and has text.
    async fn fetch_post(&self, path: &str, cancel: &CancellationToken) -> Option<Post> {
        match self.fetch_raw(path, cancel).await {
            Attempt::Found(raw) if raw.has_text() => Some(raw.to_post()),
            _ => {
                tracing::warn!(path, "context post unavailable, continuing without it");
                None
            }
        }
    }

    /// Earlier posts of the thread `head` belongs to, oldest first.
    ///
    /// Follows reply links while they point back at the same author. A post
    /// that cannot be fetched ends the walk, so a deleted post in the middle
    /// truncates the thread at that point.
    async fn walk_thread(&self, head: &RawTweet, cancel: &CancellationToken) -> Vec<Post> {
        let author = head.handle().to_string();
        let mut thread = Vec::new();
        let mut next = head.reply_target().and_then(|target| target.status_id);

        while let Some(status_id) = next.take() {
            if thread.len() >= self.config.max_thread_hops {
                tracing::debug!(hops = thread.len(), "thread walk hit hop limit");
                break;
            }

            let path = format!("/{author}/status/{status_id}");
            let raw = match self.fetch_raw(&path, cancel).await {
                Attempt::Found(raw) if raw.has_text() => raw,
                _ => {
                    tracing::warn!(path = %path, "thread post unavailable, truncating thread");
                    break;
                }
            };

            thread.push(raw.to_post());
            next = match raw.reply_target() {
                Some(target) if target.handle.eq_ignore_ascii_case(&author) => target.status_id,
                Some(_) => {
                    tracing::debug!(path = %path, "thread continues under another author, stopping");
                    None
                }
                None => None,
            };
        }

        thread.reverse();
        thread
    }
}

/// The post path of `url`, with `/article/` rewritten to `/status/`.
pub(crate) fn post_path(url: &str) -> Result<String> {
    let parsed = Url::parse(url).map_err(|e| ExtractError::InvalidUrl(format!("{url}: {e}")))?;
    Ok(parsed.path().replacen("/article/", "/status/", 1))
}

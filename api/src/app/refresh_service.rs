//! Refresh pipeline
//!
//! fetch -> build Originals -> drop already-known ones -> rewrite -> persist.
//! Each Improvement is committed as soon as it is rewritten, so one bad item
//! never costs the rest of the batch.

use std::collections::HashSet;
use std::sync::Arc;

use tokio::sync::Mutex;

use crate::app::RewriteService;
use crate::domain::entities::{sort_newest_first, Improvement, Original, OriginalId};
use crate::domain::ports::{FeedSource, ImprovementRepository, LlmClient};
use crate::error::{AppError, DomainError, FeedError};

/// Keep the Originals whose id is not in `known`, in input order.
///
/// Repeats inside `fresh` collapse to their first occurrence.
pub fn filter_unseen(fresh: Vec<Original>, known: &[Original]) -> Vec<Original> {
    let mut seen: HashSet<OriginalId> = known.iter().map(|o| o.id.clone()).collect();
    fresh
        .into_iter()
        .filter(|o| seen.insert(o.id.clone()))
        .collect()
}

pub struct RefreshService<F, R, L>
where
    F: FeedSource + ?Sized,
    R: ImprovementRepository + ?Sized,
    L: LlmClient + ?Sized,
{
    feed: Arc<F>,
    repo: Arc<R>,
    rewriter: Arc<RewriteService<L>>,
    title_history: usize,
    run_lock: Mutex<()>,
}

impl<F, R, L> RefreshService<F, R, L>
where
    F: FeedSource + ?Sized,
    R: ImprovementRepository + ?Sized,
    L: LlmClient + ?Sized,
{
    pub fn new(
        feed: Arc<F>,
        repo: Arc<R>,
        rewriter: Arc<RewriteService<L>>,
        title_history: usize,
    ) -> Self {
        Self {
            feed,
            repo,
            rewriter,
            title_history,
            run_lock: Mutex::new(()),
        }
    }

    /// Download the feed and normalize every entry
    pub async fn fetch_originals(&self) -> Result<Vec<Original>, FeedError> {
        self.feed
            .fetch_entries()
            .await?
            .into_iter()
            .map(Original::from_entry)
            .collect()
    }

    /// Drop Originals that are already known.
    ///
    /// Without `known`, the Originals of every stored Improvement are used.
    pub async fn dedup(
        &self,
        fresh: Vec<Original>,
        known: Option<&[Original]>,
    ) -> Result<Vec<Original>, DomainError> {
        match known {
            Some(known) => Ok(filter_unseen(fresh, known)),
            None => {
                let stored = self.stored_originals().await?;
                Ok(filter_unseen(fresh, &stored))
            }
        }
    }

    /// Run one full cycle and return the Improvements it created
    pub async fn refresh(&self) -> Result<Vec<Improvement>, AppError> {
        let _running = self.run_lock.lock().await;

        let fresh = self.fetch_originals().await?;
        let mut stored = self.repo.get_all().await?;
        let known: Vec<Original> = stored.iter().map(|i| i.original.clone()).collect();
        let unseen = self.dedup(fresh, Some(known.as_slice())).await?;

        tracing::info!("{} new articles to rewrite", unseen.len());

        sort_newest_first(&mut stored);
        let mut history: Vec<String> = stored
            .into_iter()
            .take(self.title_history)
            .map(|i| i.title)
            .rev()
            .collect();

        let mut created = Vec::new();
        for original in unseen {
            let link = original.link.clone();
            let improvement = match self.rewriter.rewrite(original, &history).await {
                Ok(improvement) => improvement,
                Err(e) => {
                    tracing::warn!("Skipping {}: rewrite failed: {}", link, e);
                    continue;
                }
            };

            if let Err(e) = self.repo.add(&improvement).await {
                tracing::warn!("Skipping {}: could not store improvement: {}", link, e);
                continue;
            }

            if self.title_history > 0 {
                history.push(improvement.title.clone());
                if history.len() > self.title_history {
                    history.remove(0);
                }
            }
            created.push(improvement);
        }

        tracing::info!("Refresh stored {} improvements", created.len());
        Ok(created)
    }

    async fn stored_originals(&self) -> Result<Vec<Original>, DomainError> {
        Ok(self
            .repo
            .get_all()
            .await?
            .into_iter()
            .map(|i| i.original)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LlmError;
    use crate::test_utils::{
        test_entry, test_improvement_dated, test_original, InMemoryImprovementRepository,
        MockLlmClient, StaticFeedSource,
    };

    type TestService = RefreshService<StaticFeedSource, InMemoryImprovementRepository, MockLlmClient>;

    fn create_service(
        feed: StaticFeedSource,
        repo: InMemoryImprovementRepository,
        llm: MockLlmClient,
    ) -> (TestService, Arc<InMemoryImprovementRepository>, Arc<MockLlmClient>) {
        let repo = Arc::new(repo);
        let llm = Arc::new(llm);
        let service = RefreshService::new(
            Arc::new(feed),
            repo.clone(),
            Arc::new(RewriteService::new(llm.clone())),
            5,
        );
        (service, repo, llm)
    }

    #[test]
    fn test_filter_unseen_keeps_order_and_drops_known() {
        let a = test_original("https://example.com/a");
        let b = test_original("https://example.com/b");
        let c = test_original("https://example.com/c");

        let unseen = filter_unseen(vec![c.clone(), a.clone(), b.clone()], &[a.clone()]);

        assert_eq!(unseen, vec![c, b]);
    }

    #[test]
    fn test_filter_unseen_is_idempotent() {
        let a = test_original("https://example.com/a");
        let b = test_original("https://example.com/b");
        let known = vec![b.clone()];

        let once = filter_unseen(vec![a.clone(), b.clone()], &known);
        let twice = filter_unseen(once.clone(), &known);

        assert_eq!(once, twice);
        assert_eq!(filter_unseen(vec![a.clone(), b], &known), once);
    }

    #[test]
    fn test_filter_unseen_collapses_repeats_in_batch() {
        let a = test_original("https://example.com/a");
        let mut edited = a.clone();
        edited.title = "Same link, new title".to_string();

        let unseen = filter_unseen(vec![a.clone(), edited], &[]);

        assert_eq!(unseen, vec![a]);
    }

    #[tokio::test]
    async fn test_dedup_defaults_to_stored_originals() {
        let stored = test_improvement_dated("https://example.com/a", 1);
        let (service, _, _) = create_service(
            StaticFeedSource::default(),
            InMemoryImprovementRepository::new().with_improvement(stored.clone()),
            MockLlmClient::new(),
        );
        let fresh = vec![stored.original.clone(), test_original("https://example.com/b")];

        let from_repo = service.dedup(fresh.clone(), None).await.unwrap();
        let nothing_known: Vec<Original> = Vec::new();
        let explicit = service
            .dedup(fresh.clone(), Some(nothing_known.as_slice()))
            .await
            .unwrap();

        assert_eq!(from_repo.len(), 1);
        assert_eq!(from_repo[0].link, "https://example.com/b");
        assert_eq!(explicit, fresh);
    }

    #[tokio::test]
    async fn test_refresh_stores_new_items_once() {
        let (service, repo, llm) = create_service(
            StaticFeedSource::new(vec![
                test_entry("First", "https://example.com/1"),
                test_entry("Second", "https://example.com/2"),
            ]),
            InMemoryImprovementRepository::new(),
            MockLlmClient::new(),
        );

        let created = service.refresh().await.unwrap();
        assert_eq!(created.len(), 2);
        assert_eq!(created[0].original.title, "First");
        assert_eq!(repo.len(), 2);
        assert_eq!(llm.call_count(), 6);

        let again = service.refresh().await.unwrap();
        assert!(again.is_empty());
        assert_eq!(llm.call_count(), 6);
    }

    #[tokio::test]
    async fn test_refresh_skips_failed_rewrite_and_keeps_the_rest() {
        let (service, repo, _) = create_service(
            StaticFeedSource::new(vec![
                test_entry("One", "https://example.com/1"),
                test_entry("Two", "https://example.com/2"),
                test_entry("Three", "https://example.com/3"),
            ]),
            InMemoryImprovementRepository::new(),
            MockLlmClient::new()
                .with_reply("ideas")
                .with_reply("Title One")
                .with_reply("Summary One")
                .with_error(LlmError::EmptyResponse),
        );

        let created = service.refresh().await.unwrap();

        let links: Vec<_> = created.iter().map(|i| i.original.link.as_str()).collect();
        assert_eq!(links, vec!["https://example.com/1", "https://example.com/3"]);
        assert_eq!(created[0].title, "Title One");
        assert_eq!(repo.len(), 2);
    }

    #[tokio::test]
    async fn test_refresh_survives_storage_failures() {
        let (service, _, _) = create_service(
            StaticFeedSource::new(vec![test_entry("One", "https://example.com/1")]),
            InMemoryImprovementRepository::new().with_failing_writes(),
            MockLlmClient::new(),
        );

        let created = service.refresh().await.unwrap();

        assert!(created.is_empty());
    }

    #[tokio::test]
    async fn test_refresh_aborts_on_feed_error() {
        let (service, repo, llm) = create_service(
            StaticFeedSource::failing(),
            InMemoryImprovementRepository::new(),
            MockLlmClient::new(),
        );

        let result = service.refresh().await;

        assert!(matches!(result, Err(AppError::Feed(FeedError::Status { status: 503 }))));
        assert_eq!(repo.len(), 0);
        assert_eq!(llm.call_count(), 0);
    }

    #[tokio::test]
    async fn test_refresh_aborts_on_malformed_date() {
        let mut entry = test_entry("One", "https://example.com/1");
        entry.published = "yesterday-ish".to_string();
        let (service, _, _) = create_service(
            StaticFeedSource::new(vec![entry]),
            InMemoryImprovementRepository::new(),
            MockLlmClient::new(),
        );

        let result = service.refresh().await;

        assert!(matches!(result, Err(AppError::Feed(FeedError::InvalidDate { .. }))));
    }

    #[tokio::test]
    async fn test_refresh_feeds_recent_titles_to_the_model() {
        let older = test_improvement_dated("https://example.com/old", 1);
        let newer = test_improvement_dated("https://example.com/new", 2);
        let (service, _, llm) = create_service(
            StaticFeedSource::new(vec![
                test_entry("One", "https://example.com/1"),
                test_entry("Two", "https://example.com/2"),
            ]),
            InMemoryImprovementRepository::new()
                .with_improvement(newer.clone())
                .with_improvement(older.clone()),
            MockLlmClient::new()
                .with_reply("ideas")
                .with_reply("Fresh Title"),
        );

        service.refresh().await.unwrap();

        let calls = llm.calls();
        let first_prompt = &calls[0][0].content;
        assert!(first_prompt.contains(&format!("- {}\n- {}", older.title, newer.title)));
        let second_prompt = &calls[3][0].content;
        assert!(second_prompt.ends_with("- Fresh Title"));
    }

    #[tokio::test]
    async fn test_concurrent_refreshes_do_not_duplicate() {
        let (service, repo, _) = create_service(
            StaticFeedSource::new(vec![test_entry("One", "https://example.com/1")]),
            InMemoryImprovementRepository::new(),
            MockLlmClient::new(),
        );

        let (a, b) = tokio::join!(service.refresh(), service.refresh());

        assert_eq!(a.unwrap().len() + b.unwrap().len(), 1);
        assert_eq!(repo.len(), 1);
    }
}

use std::sync::Arc;

use serde_json::json;
use thiserror::Error;
use time::{OffsetDateTime, format_description::well_known::Rfc3339};

use crate::application::repos::{PostsRepo, RepoError};
use crate::config::SiteSettings;
use crate::domain::entities::PostRecord;
use crate::domain::posts;
use crate::presentation::views::{PageContext, PostCard, PostDetailContext};

#[derive(Clone)]
pub struct FeedService {
    posts: Arc<dyn PostsRepo>,
    site: SiteSettings,
}

#[derive(Debug, Error)]
pub enum FeedError {
    #[error(transparent)]
    Repo(#[from] RepoError),
}

impl FeedService {
    pub fn new(posts: Arc<dyn PostsRepo>, site: SiteSettings) -> Self {
        Self { posts, site }
    }

    /// View model for the front page: every visible post, newest first.
    pub async fn front_page(&self) -> Result<PageContext, FeedError> {
        let records = self.posts.list_published().await?;
        let cards: Vec<PostCard> = records.iter().map(record_to_card).collect();
        let posts_ld_json = build_posts_ld_json(&cards, &self.site.base_url, &self.site.title);

        let post_count = cards.len();
        Ok(PageContext {
            posts: cards,
            post_count,
            has_results: post_count > 0,
            posts_ld_json,
        })
    }

    /// Detail view for a slug. Hidden posts resolve to `None`, so a draft
    /// behaves exactly like a missing slug.
    pub async fn post_detail(&self, slug: &str) -> Result<Option<PostDetailContext>, FeedError> {
        let Some(post) = self.posts.find_by_slug(slug).await? else {
            return Ok(None);
        };

        if !post.is_visible() {
            return Ok(None);
        }

        Ok(Some(record_to_detail(post)))
    }
}

fn record_to_card(record: &PostRecord) -> PostCard {
    let shown = posts::display_time(record.published_at, record.created_at);

    PostCard {
        slug: record.slug.clone(),
        title: record.title.clone(),
        excerpt: record.excerpt.clone(),
        iso_date: iso_timestamp(shown),
        published: posts::format_human_date(shown.date()),
    }
}

fn record_to_detail(record: PostRecord) -> PostDetailContext {
    let shown = posts::display_time(record.published_at, record.created_at);

    PostDetailContext {
        slug: record.slug,
        title: record.title,
        published: posts::format_human_date(shown.date()),
        iso_date: iso_timestamp(shown),
        excerpt: record.excerpt,
        body_html: record.body_html,
    }
}

fn iso_timestamp(value: OffsetDateTime) -> String {
    value.format(&Rfc3339).expect("valid timestamp")
}

fn build_posts_ld_json(cards: &[PostCard], public_site_url: &str, blog_name: &str) -> Option<String> {
    if cards.is_empty() {
        return None;
    }

    let site_url = normalize_public_site_url(public_site_url);

    let blog_posts = cards
        .iter()
        .map(|card| {
            json!({
                "@type": "BlogPosting",
                "headline": card.title,
                "description": card.excerpt,
                "datePublished": card.iso_date,
                "url": format!("{site_url}posts/{}", card.slug),
            })
        })
        .collect::<Vec<_>>();

    serde_json::to_string(&json!({
        "@context": "https://schema.org",
        "@type": "Blog",
        "name": blog_name,
        "url": site_url,
        "blogPost": blog_posts,
    }))
    .ok()
}

fn normalize_public_site_url(url: &str) -> String {
    let trimmed = url.trim_end_matches('/');
    format!("{trimmed}/")
}

#[cfg(test)]
mod tests {
    use time::macros::datetime;
    use uuid::Uuid;

    use crate::domain::types::PostStatus;

    use super::*;

    fn sample_record() -> PostRecord {
        PostRecord {
            id: Uuid::new_v4(),
            slug: "hello-world".to_string(),
            title: "Hello World".to_string(),
            excerpt: "First notes.".to_string(),
            body_html: "<p>Hello</p>".to_string(),
            status: PostStatus::Published,
            published_at: Some(datetime!(2026-03-07 09:30 UTC)),
            created_at: datetime!(2026-03-01 08:00 UTC),
            updated_at: datetime!(2026-03-07 09:30 UTC),
        }
    }

    #[test]
    fn card_carries_publication_date_in_both_forms() {
        let card = record_to_card(&sample_record());
        assert_eq!(card.published, "March 7, 2026");
        assert_eq!(card.iso_date, "2026-03-07T09:30:00Z");
        assert_eq!(card.slug, "hello-world");
    }

    #[test]
    fn structured_data_links_each_post_under_the_site_url() {
        let cards = vec![record_to_card(&sample_record())];
        let ld_json =
            build_posts_ld_json(&cards, "http://example.test", "Gazette").expect("ld+json");
        assert!(ld_json.contains("\"http://example.test/posts/hello-world\""));
        assert!(ld_json.contains("\"Blog\""));
    }

    #[test]
    fn structured_data_is_omitted_for_an_empty_feed() {
        assert!(build_posts_ld_json(&[], "http://example.test", "Gazette").is_none());
    }

    #[test]
    fn hidden_records_are_not_visible() {
        let mut record = sample_record();
        record.status = PostStatus::Draft;
        assert!(!record.is_visible());

        let mut record = sample_record();
        record.published_at = None;
        assert!(!record.is_visible());
    }
}

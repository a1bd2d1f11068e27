use askama::{Error as AskamaError, Template};
use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use thiserror::Error;

use crate::application::error::{ErrorReport, HttpError};
use crate::config::SiteSettings;

#[derive(Debug, Error)]
#[error("{public_message}")]
pub struct TemplateRenderError {
    pub(crate) source: &'static str,
    pub(crate) public_message: &'static str,
    #[source]
    pub(crate) error: AskamaError,
}

impl TemplateRenderError {
    pub fn new(source: &'static str, public_message: &'static str, error: AskamaError) -> Self {
        Self {
            source,
            public_message,
            error,
        }
    }
}

impl From<TemplateRenderError> for HttpError {
    fn from(err: TemplateRenderError) -> Self {
        let TemplateRenderError {
            source,
            public_message,
            error,
        } = err;

        HttpError::from_error(
            source,
            StatusCode::INTERNAL_SERVER_ERROR,
            public_message,
            &error,
        )
    }
}

pub fn render_template<T: Template>(template: T) -> Result<Html<String>, HttpError> {
    template.render().map(Html).map_err(|err| {
        TemplateRenderError::new(
            "presentation::views::render_template",
            "Template rendering failed",
            err,
        )
        .into()
    })
}

pub fn render_template_response<T: Template>(template: T, status: StatusCode) -> Response {
    match render_template(template) {
        Ok(html) => (status, html).into_response(),
        Err(err) => err.into_response(),
    }
}

pub fn render_not_found_response(chrome: LayoutChrome) -> Response {
    let content = ErrorPageView::not_found();
    let view = LayoutContext::new(chrome, content);
    let mut response = render_template_response(ErrorTemplate { view }, StatusCode::NOT_FOUND);
    ErrorReport::from_message(
        "presentation::views::render_not_found_response",
        StatusCode::NOT_FOUND,
        "Resource not found",
    )
    .attach(&mut response);
    response
}

#[derive(Clone)]
pub struct BrandView {
    pub title: String,
    pub href: String,
}

#[derive(Clone)]
pub struct FooterView {
    pub copy: String,
}

#[derive(Clone)]
pub struct PageMetaView {
    pub title: String,
    pub description: String,
    pub canonical: String,
}

impl PageMetaView {
    pub fn with_canonical(self, canonical: String) -> Self {
        Self { canonical, ..self }
    }

    pub fn with_content(self, title: String, description: String) -> Self {
        Self {
            title,
            description,
            ..self
        }
    }
}

#[derive(Clone)]
pub struct LayoutChrome {
    pub brand: BrandView,
    pub footer: FooterView,
    pub meta: PageMetaView,
}

impl LayoutChrome {
    pub fn with_canonical(self, canonical: String) -> Self {
        Self {
            meta: self.meta.with_canonical(canonical),
            ..self
        }
    }

    pub fn with_meta(self, meta: PageMetaView) -> Self {
        Self { meta, ..self }
    }
}

/// Layout chrome is fixed deployment configuration; there is no admin surface
/// to edit a stored copy, so it comes straight from `[site]`.
pub fn site_chrome(site: &SiteSettings) -> LayoutChrome {
    LayoutChrome {
        brand: BrandView {
            title: site.title.clone(),
            href: "/".to_string(),
        },
        footer: FooterView {
            copy: site.footer.clone(),
        },
        meta: PageMetaView {
            title: site.title.clone(),
            description: site.tagline.clone(),
            canonical: site.base_url.clone(),
        },
    }
}

#[derive(Clone)]
pub struct LayoutContext<T> {
    pub brand: BrandView,
    pub footer: FooterView,
    pub meta: PageMetaView,
    pub content: T,
}

impl<T> LayoutContext<T> {
    pub fn new(chrome: LayoutChrome, content: T) -> Self {
        Self {
            brand: chrome.brand,
            footer: chrome.footer,
            meta: chrome.meta,
            content,
        }
    }
}

#[derive(Clone)]
pub struct PostCard {
    pub slug: String,
    pub title: String,
    pub excerpt: String,
    pub iso_date: String,
    pub published: String,
}

pub struct PageContext {
    pub posts: Vec<PostCard>,
    pub post_count: usize,
    pub has_results: bool,
    pub posts_ld_json: Option<String>,
}

#[derive(Template)]
#[template(path = "index.html")]
pub struct IndexTemplate {
    pub view: LayoutContext<PageContext>,
}

pub struct PostDetailContext {
    pub slug: String,
    pub title: String,
    pub published: String,
    pub iso_date: String,
    pub excerpt: String,
    pub body_html: String,
}

#[derive(Template)]
#[template(path = "post.html")]
pub struct PostTemplate {
    pub view: LayoutContext<PostDetailContext>,
}

pub struct ErrorPageView {
    pub title: String,
    pub message: String,
    pub primary_action: Option<ErrorAction>,
}

impl ErrorPageView {
    pub fn not_found() -> Self {
        Self {
            title: "Page Not Found".to_string(),
            message: "The page you requested does not exist. Try returning to the homepage to continue exploring.".to_string(),
            primary_action: Some(ErrorAction::home()),
        }
    }
}

pub struct ErrorAction {
    pub href: String,
    pub label: String,
}

impl ErrorAction {
    pub fn home() -> Self {
        Self {
            href: "/".to_string(),
            label: "Back to home".to_string(),
        }
    }
}

#[derive(Template)]
#[template(path = "error.html")]
pub struct ErrorTemplate {
    pub view: LayoutContext<ErrorPageView>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_chrome() -> LayoutChrome {
        site_chrome(&SiteSettings {
            title: "Gazette".to_string(),
            tagline: "Notes from a small press.".to_string(),
            footer: "Published with Gazette.".to_string(),
            base_url: "http://example.test/".to_string(),
        })
    }

    fn sample_card() -> PostCard {
        PostCard {
            slug: "hello-world".to_string(),
            title: "Hello World".to_string(),
            excerpt: "First notes.".to_string(),
            iso_date: "2026-03-07T09:30:00Z".to_string(),
            published: "March 7, 2026".to_string(),
        }
    }

    #[test]
    fn index_template_lists_cards() {
        let view = LayoutContext::new(
            sample_chrome(),
            PageContext {
                posts: vec![sample_card()],
                post_count: 1,
                has_results: true,
                posts_ld_json: None,
            },
        );

        let rendered = IndexTemplate { view }.render().unwrap();
        assert!(rendered.contains("Hello World"));
        assert!(rendered.contains("/posts/hello-world"));
        assert!(rendered.contains("March 7, 2026"));
    }

    #[test]
    fn index_template_escapes_markup_in_titles() {
        let mut card = sample_card();
        card.title = "<script>alert(1)</script>".to_string();
        let view = LayoutContext::new(
            sample_chrome(),
            PageContext {
                posts: vec![card],
                post_count: 1,
                has_results: true,
                posts_ld_json: None,
            },
        );

        let rendered = IndexTemplate { view }.render().unwrap();
        assert!(!rendered.contains("<script>alert(1)</script>"));
        assert!(rendered.contains("&lt;script&gt;"));
    }

    #[test]
    fn index_template_renders_empty_state() {
        let view = LayoutContext::new(
            sample_chrome(),
            PageContext {
                posts: Vec::new(),
                post_count: 0,
                has_results: false,
                posts_ld_json: None,
            },
        );

        let rendered = IndexTemplate { view }.render().unwrap();
        assert!(rendered.contains("Nothing published yet."));
    }

    #[test]
    fn post_template_keeps_body_markup() {
        let view = LayoutContext::new(
            sample_chrome(),
            PostDetailContext {
                slug: "hello-world".to_string(),
                title: "Hello World".to_string(),
                published: "March 7, 2026".to_string(),
                iso_date: "2026-03-07T09:30:00Z".to_string(),
                excerpt: "First notes.".to_string(),
                body_html: "<p>Hello <em>there</em></p>".to_string(),
            },
        );

        let rendered = PostTemplate { view }.render().unwrap();
        assert!(rendered.contains("<p>Hello <em>there</em></p>"));
    }

    #[test]
    fn error_template_offers_a_way_home() {
        let view = LayoutContext::new(sample_chrome(), ErrorPageView::not_found());
        let rendered = ErrorTemplate { view }.render().unwrap();
        assert!(rendered.contains("Page Not Found"));
        assert!(rendered.contains("href=\"/\""));
    }
}

//! README preview: fetch seam, relative URL rewriting and markdown rendering.
//!
//! The HTTP client lives outside this crate; callers plug one in through [`ReadmeFetcher`].

use crate::{Error, Result};
use futures::future::{AbortRegistration, Abortable, BoxFuture};
use pulldown_cmark::{CowStr, Event, Options, Parser, Tag};
use url::Url;

#[derive(Debug, Clone, thiserror::Error)]
pub enum FetchError {
    #[error("unexpected HTTP status {status}")]
    Status { status: u16 },
    #[error("transport error: {0}")]
    Transport(String),
}

/// Fetches a remote text document (an HTTP GET in the site).
pub trait ReadmeFetcher {
    fn fetch_text<'a>(
        &'a self,
        url: &'a str,
    ) -> BoxFuture<'a, std::result::Result<String, FetchError>>;
}

/// Where a README lives and which bases its relative URLs resolve against.
#[derive(Debug, Clone)]
pub struct ReadmeSource {
    pub document_url: String,
    /// Raw-content base, used for images.
    pub raw_base: Url,
    /// Browsable base, used for links.
    pub browse_base: Url,
}

impl ReadmeSource {
    pub fn new(document_url: impl Into<String>, raw_base: &str, browse_base: &str) -> Result<Self> {
        Ok(Self {
            document_url: document_url.into(),
            raw_base: parse_base(raw_base)?,
            browse_base: parse_base(browse_base)?,
        })
    }
}

fn parse_base(raw: &str) -> Result<Url> {
    // `Url::join` drops the last path segment unless the base ends with a slash.
    let normalized = if raw.ends_with('/') {
        raw.to_string()
    } else {
        format!("{raw}/")
    };
    Url::parse(&normalized).map_err(|source| Error::InvalidUrl {
        value: raw.to_string(),
        source,
    })
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadmeOutcome {
    Rendered(String),
    /// User-visible failure message.
    Failed(String),
    /// The fetch was aborted (component teardown); nothing to show.
    Cancelled,
}

pub async fn load_readme(
    fetcher: &dyn ReadmeFetcher,
    source: &ReadmeSource,
    abort: AbortRegistration,
) -> ReadmeOutcome {
    match Abortable::new(fetcher.fetch_text(&source.document_url), abort).await {
        Ok(Ok(markdown)) => ReadmeOutcome::Rendered(render_markdown(
            &markdown,
            &source.raw_base,
            &source.browse_base,
        )),
        Ok(Err(err)) => {
            tracing::warn!(url = %source.document_url, error = %err, "README fetch failed");
            ReadmeOutcome::Failed(format!("Could not load README: {err}"))
        }
        Err(_aborted) => {
            tracing::debug!(url = %source.document_url, "README fetch cancelled");
            ReadmeOutcome::Cancelled
        }
    }
}

/// Resolves a document-relative URL against `base`. Absolute URLs (any scheme, including
/// `mailto:`), protocol-relative URLs and in-page fragments are returned unchanged.
pub fn resolve_relative(dest: &str, base: &Url) -> Option<String> {
    if dest.is_empty() || dest.starts_with('#') || dest.starts_with("//") {
        return None;
    }
    match Url::parse(dest) {
        Ok(_) => None,
        Err(url::ParseError::RelativeUrlWithoutBase) => {
            // A leading slash means the repository root, not the host root.
            let rel = dest.trim_start_matches('/');
            base.join(rel).ok().map(String::from)
        }
        Err(_) => None,
    }
}

fn rewrite<'a>(dest: CowStr<'a>, base: &Url) -> CowStr<'a> {
    match resolve_relative(&dest, base) {
        Some(resolved) => CowStr::from(resolved),
        None => dest,
    }
}

/// Renders markdown to HTML with image URLs resolved against `raw_base` and link URLs against
/// `browse_base`.
pub fn render_markdown(markdown: &str, raw_base: &Url, browse_base: &Url) -> String {
    let parser = Parser::new_ext(
        markdown,
        Options::ENABLE_TABLES | Options::ENABLE_STRIKETHROUGH | Options::ENABLE_TASKLISTS,
    )
    .map(|event| match event {
        Event::Start(Tag::Link {
            link_type,
            dest_url,
            title,
            id,
        }) => Event::Start(Tag::Link {
            link_type,
            dest_url: rewrite(dest_url, browse_base),
            title,
            id,
        }),
        Event::Start(Tag::Image {
            link_type,
            dest_url,
            title,
            id,
        }) => Event::Start(Tag::Image {
            link_type,
            dest_url: rewrite(dest_url, raw_base),
            title,
            id,
        }),
        other => other,
    });

    let mut html_out = String::with_capacity(markdown.len() * 3 / 2);
    pulldown_cmark::html::push_html(&mut html_out, parser);
    html_out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base(s: &str) -> Url {
        parse_base(s).unwrap()
    }

    #[test]
    fn relative_paths_join_against_base_with_or_without_trailing_slash() {
        let b = base("https://raw.example.com/me/repo/main");
        assert_eq!(
            resolve_relative("docs/shot.png", &b).as_deref(),
            Some("https://raw.example.com/me/repo/main/docs/shot.png")
        );
        assert_eq!(
            resolve_relative("/docs/shot.png", &b).as_deref(),
            Some("https://raw.example.com/me/repo/main/docs/shot.png")
        );
        assert_eq!(
            resolve_relative("./a.md", &b).as_deref(),
            Some("https://raw.example.com/me/repo/main/a.md")
        );
    }

    #[test]
    fn absolute_and_fragment_urls_are_untouched() {
        let b = base("https://example.com/repo/");
        assert_eq!(resolve_relative("https://other.org/x", &b), None);
        assert_eq!(resolve_relative("mailto:me@example.com", &b), None);
        assert_eq!(resolve_relative("#install", &b), None);
        assert_eq!(resolve_relative("//cdn.example.com/x.js", &b), None);
    }

    #[test]
    fn render_uses_raw_base_for_images_and_browse_base_for_links() {
        let raw = base("https://raw.example.com/me/repo/main/");
        let browse = base("https://example.com/me/repo/blob/main/");
        let html = render_markdown("![logo](img/logo.png) see [guide](GUIDE.md)", &raw, &browse);
        assert!(
            html.contains(r#"src="https://raw.example.com/me/repo/main/img/logo.png""#),
            "{html}"
        );
        assert!(
            html.contains(r#"href="https://example.com/me/repo/blob/main/GUIDE.md""#),
            "{html}"
        );
    }
}

use folio_core::readme::{FetchError, ReadmeFetcher, ReadmeOutcome, ReadmeSource, load_readme};
use futures::executor::block_on;
use futures::future::{AbortHandle, BoxFuture, FutureExt};

struct StaticFetcher(Result<String, FetchError>);

impl ReadmeFetcher for StaticFetcher {
    fn fetch_text<'a>(&'a self, _url: &'a str) -> BoxFuture<'a, Result<String, FetchError>> {
        futures::future::ready(self.0.clone()).boxed()
    }
}

struct PendingFetcher;

impl ReadmeFetcher for PendingFetcher {
    fn fetch_text<'a>(&'a self, _url: &'a str) -> BoxFuture<'a, Result<String, FetchError>> {
        futures::future::pending().boxed()
    }
}

fn source() -> ReadmeSource {
    ReadmeSource::new(
        "https://raw.example.com/me/project/main/README.md",
        "https://raw.example.com/me/project/main",
        "https://example.com/me/project/blob/main",
    )
    .unwrap()
}

#[test]
fn load_readme_renders_fetched_markdown_with_rewritten_urls() {
    let fetcher = StaticFetcher(Ok("# Project\n\n![demo](docs/demo.gif)\n".to_string()));
    let (_handle, reg) = AbortHandle::new_pair();
    let outcome = block_on(load_readme(&fetcher, &source(), reg));
    let ReadmeOutcome::Rendered(html) = outcome else {
        panic!("expected rendered README, got {outcome:?}");
    };
    assert!(html.contains("<h1>Project</h1>"), "{html}");
    assert!(
        html.contains("https://raw.example.com/me/project/main/docs/demo.gif"),
        "{html}"
    );
}

#[test]
fn load_readme_surfaces_fetch_failures() {
    let fetcher = StaticFetcher(Err(FetchError::Status { status: 404 }));
    let (_handle, reg) = AbortHandle::new_pair();
    let outcome = block_on(load_readme(&fetcher, &source(), reg));
    match outcome {
        ReadmeOutcome::Failed(message) => assert!(message.contains("404"), "{message}"),
        other => panic!("expected failure, got {other:?}"),
    }
}

#[test]
fn aborted_fetch_is_reported_as_cancelled() {
    let (handle, reg) = AbortHandle::new_pair();
    handle.abort();
    let outcome = block_on(load_readme(&PendingFetcher, &source(), reg));
    assert_eq!(outcome, ReadmeOutcome::Cancelled);
}

#[test]
fn invalid_base_urls_are_rejected() {
    let err = ReadmeSource::new("README.md", "not a url", "https://example.com/").unwrap_err();
    assert!(matches!(err, folio_core::Error::InvalidUrl { .. }));
}

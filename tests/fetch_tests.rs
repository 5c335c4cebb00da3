use std::time::Duration;

use url::Url;
use wiremock::matchers::method;
use wiremock::{Mock, MockServer, ResponseTemplate};

use preview_resolver::preview::fetch::{DirectFetcher, HtmlFetcher, MirrorFetcher};

async fn site_serving(body: String) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(&server)
        .await;
    server
}

#[tokio::test]
async fn direct_fetch_stops_reading_at_the_cap() {
    let site = site_serving("x".repeat(10_000)).await;
    let fetcher = DirectFetcher::new(Duration::from_secs(5), "test-agent")
        .unwrap()
        .with_max_bytes(64);

    let url = Url::parse(&format!("{}/big", site.uri())).unwrap();
    let page = fetcher.fetch(&url).await.unwrap();

    assert_eq!(page.html.len(), 64);
    assert_eq!(page.final_url, url.as_str());
}

#[tokio::test]
async fn direct_fetch_returns_small_bodies_whole() {
    let site = site_serving("<html>short</html>".into()).await;
    let fetcher = DirectFetcher::new(Duration::from_secs(5), "test-agent")
        .unwrap()
        .with_max_bytes(64);

    let url = Url::parse(&format!("{}/small", site.uri())).unwrap();
    let page = fetcher.fetch(&url).await.unwrap();

    assert_eq!(page.html, "<html>short</html>");
}

#[tokio::test]
async fn mirror_fetch_stops_reading_at_the_cap() {
    let mirror = site_serving("y".repeat(10_000)).await;
    let fetcher = MirrorFetcher::new(Duration::from_secs(5), format!("{}/", mirror.uri()))
        .unwrap()
        .with_max_bytes(100);

    let url = Url::parse("https://example.com/article").unwrap();
    let page = fetcher.fetch(&url).await.unwrap();

    assert_eq!(page.html.len(), 100);
    assert_eq!(page.final_url, "https://example.com/article");
}

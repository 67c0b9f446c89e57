// Fetch and fan-out behavior against a local mock HTTP server.

use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use wishwatch::config::ScraperConfig;
use wishwatch::pipeline::fetch_all;
use wishwatch::scraper::PageScraper;
use wishwatch::AppError;

fn test_scraper() -> PageScraper {
    PageScraper::new(&ScraperConfig {
        max_concurrent_fetches: 4,
        request_timeout: 5,
        user_agent: "wishwatch-test/1.0".to_string(),
    })
    .unwrap()
}

fn wishlist_page(items: &[(&str, u32, &str)]) -> String {
    let rows: String = items
        .iter()
        .map(|(name, stock, price)| {
            format!(
                "<tr><td>#</td><td><a>{}</a><span>{} in stock</span></td>\
                 <td><ins><span>₹</span>{}</ins></td></tr>",
                name, stock, price
            )
        })
        .collect();
    format!(
        "<html><body><table><tbody>{}</tbody></table></body></html>",
        rows
    )
}

async fn mount_page(server: &MockServer, route: &str, body: String) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(server)
        .await;
}

#[tokio::test]
async fn scrape_extracts_observations_from_served_page() {
    let server = MockServer::start().await;
    mount_page(
        &server,
        "/wishlist",
        wishlist_page(&[("Widget", 5, "1,200"), ("Gadget", 2, "250.50")]),
    )
    .await;

    let scraper = test_scraper();
    let observations = scraper
        .scrape(&format!("{}/wishlist", server.uri()))
        .await
        .unwrap();

    assert_eq!(observations.len(), 2);
    assert_eq!(observations[0].name, "Widget");
    assert_eq!(observations[0].stock, 5);
    assert_eq!(observations[0].price, "1200".parse().unwrap());
    assert_eq!(observations[1].price, "250.50".parse().unwrap());
}

#[tokio::test]
async fn server_error_maps_to_fetch_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/wishlist"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let scraper = test_scraper();
    let err = scraper
        .scrape(&format!("{}/wishlist", server.uri()))
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::Fetch { .. }));
}

#[tokio::test]
async fn unreachable_host_maps_to_fetch_error() {
    let scraper = test_scraper();
    // Nothing listens here; connection is refused immediately.
    let err = scraper
        .scrape("http://127.0.0.1:9/wishlist")
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::Fetch { .. }));
}

#[tokio::test]
async fn failing_url_does_not_abort_the_others() {
    let server = MockServer::start().await;
    mount_page(&server, "/a", wishlist_page(&[("Widget", 5, "100")])).await;
    Mock::given(method("GET"))
        .and(path("/b"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;
    mount_page(&server, "/c", wishlist_page(&[("Gadget", 2, "40")])).await;

    let urls = vec![
        format!("{}/a", server.uri()),
        format!("{}/b", server.uri()),
        format!("{}/c", server.uri()),
    ];

    let scraper = test_scraper();
    let observations = fetch_all(&scraper, &urls, 2).await;

    let mut names: Vec<&str> = observations.iter().map(|o| o.name.as_str()).collect();
    names.sort();
    assert_eq!(names, vec!["Gadget", "Widget"]);
}

#[tokio::test]
async fn page_without_data_table_contributes_nothing() {
    let server = MockServer::start().await;
    mount_page(
        &server,
        "/empty",
        "<html><body><p>maintenance</p></body></html>".to_string(),
    )
    .await;
    mount_page(&server, "/full", wishlist_page(&[("Widget", 5, "100")])).await;

    let urls = vec![
        format!("{}/empty", server.uri()),
        format!("{}/full", server.uri()),
    ];

    let scraper = test_scraper();
    let observations = fetch_all(&scraper, &urls, 2).await;

    assert_eq!(observations.len(), 1);
    assert_eq!(observations[0].name, "Widget");
}

#[tokio::test]
async fn concurrency_cap_of_one_still_covers_every_url() {
    let server = MockServer::start().await;
    mount_page(&server, "/a", wishlist_page(&[("Widget", 5, "100")])).await;
    mount_page(&server, "/b", wishlist_page(&[("Gadget", 2, "40")])).await;

    let urls = vec![format!("{}/a", server.uri()), format!("{}/b", server.uri())];

    let scraper = test_scraper();
    // A zero cap is clamped to one worker.
    let observations = fetch_all(&scraper, &urls, 0).await;

    assert_eq!(observations.len(), 2);
}

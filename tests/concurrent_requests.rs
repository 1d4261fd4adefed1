//! Many simultaneous requests resolving against one shared mapping.

use std::time::Instant;

use reqwest::StatusCode;
use urlshort::config::ServerConfig;

mod common;

#[tokio::test]
async fn test_concurrent_resolution_is_consistent() {
    let server = common::start_server(ServerConfig::demo()).await;
    let client = common::client();

    let concurrency = 20;
    let requests_per_task = 25;
    let start = Instant::now();

    let mut tasks = Vec::new();
    for task in 0..concurrency {
        let client = client.clone();
        let hit = server.url("/urlshort-final");
        let miss = server.url(&format!("/missing-{}", task));

        tasks.push(tokio::spawn(async move {
            for _ in 0..requests_per_task {
                let res = client.get(&hit).send().await.unwrap();
                assert_eq!(res.status(), StatusCode::FOUND);
                assert_eq!(
                    res.headers()["location"],
                    "https://github.com/gophercises/urlshort/tree/solution"
                );

                let res = client.get(&miss).send().await.unwrap();
                assert_eq!(res.status(), StatusCode::OK);
            }
        }));
    }

    for task in tasks {
        task.await.expect("request task panicked");
    }

    println!(
        "{} requests in {:?}",
        concurrency * requests_per_task * 2,
        start.elapsed()
    );

    server.stop().await;
}

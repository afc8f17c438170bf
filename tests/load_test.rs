//! Load testing for the bridge.

use std::time::{Duration, Instant};

mod common;

const DEVICE: &str = "0123456789AB";
const BODY: &str = r#"{"jsonrpc":"2.0","method":"ping"}"#;

/// Sum every sample of the request counter in a Prometheus exposition.
fn total_requests(exposition: &str) -> u64 {
    exposition
        .lines()
        .filter(|line| line.starts_with("http_requests_total"))
        .filter_map(|line| line.rsplit(' ').next())
        .filter_map(|value| value.parse::<f64>().ok())
        .sum::<f64>() as u64
}

async fn scrape(client: &reqwest::Client, gateway: &common::Gateway) -> String {
    client
        .get(gateway.url("/metrics"))
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap()
}

#[tokio::test]
async fn test_load_performance() {
    let backend = common::start_wrp_backend(common::echo).await;
    let mut config = common::gateway_config(&backend.url());
    config.rate_limit.requests_per_second = 100_000.0;
    config.rate_limit.burst_size = 10_000;
    config.observability.metrics_sample_rate = 1.0;
    let gateway = common::start_gateway(config).await;

    let concurrency = 20;
    let requests_per_task = 50;
    let total_requests_sent = concurrency * requests_per_task;

    let client = reqwest::Client::new();
    let start = Instant::now();

    let mut tasks = Vec::new();
    for _ in 0..concurrency {
        let client = client.clone();
        let url = gateway.send_url(DEVICE, "config");
        tasks.push(tokio::spawn(async move {
            let mut latencies = Vec::new();
            for _ in 0..requests_per_task {
                let req_start = Instant::now();
                if let Ok(res) = client.post(&url).body(BODY).send().await {
                    if res.status().is_success() {
                        latencies.push(req_start.elapsed());
                    }
                }
            }
            latencies
        }));
    }

    let mut all_latencies = Vec::new();
    for task in tasks {
        all_latencies.extend(task.await.unwrap());
    }
    let duration = start.elapsed();

    assert_eq!(all_latencies.len(), total_requests_sent, "every request succeeds");
    assert_eq!(backend.request_count(), total_requests_sent);

    all_latencies.sort();
    let p50 = all_latencies[all_latencies.len() / 2];
    let p99 = all_latencies[(all_latencies.len() as f64 * 0.99) as usize];

    println!("\n--- Load Test Results ---");
    println!("Total Requests: {}", total_requests_sent);
    println!("Concurrency:    {}", concurrency);
    println!("Total Duration: {:?}", duration);
    println!("Requests/sec:   {:.2}", total_requests_sent as f64 / duration.as_secs_f64());
    println!("P50 Latency:    {:?}", p50);
    println!("P99 Latency:    {:?}", p99);
    println!("-------------------------\n");

    // Sampling at 1.0 records every send, and nothing else.
    let exposition = scrape(&client, &gateway).await;
    assert_eq!(total_requests(&exposition), total_requests_sent as u64);
    assert!(exposition.contains(r#"handler="send""#));
    assert!(exposition.contains("http_request_duration_seconds"));
}

#[tokio::test]
async fn sampled_counter_converges() {
    let backend = common::start_wrp_backend(common::echo).await;
    let mut config = common::gateway_config(&backend.url());
    config.rate_limit.requests_per_second = 100_000.0;
    config.rate_limit.burst_size = 10_000;
    let gateway = common::start_gateway(config).await;

    let client = reqwest::Client::new();
    let url = gateway.send_url(DEVICE, "config");
    let n = 2_000;

    let mut tasks = Vec::new();
    for _ in 0..20 {
        let client = client.clone();
        let url = url.clone();
        tasks.push(tokio::spawn(async move {
            for _ in 0..n / 20 {
                let res = client.post(&url).body(BODY).send().await.unwrap();
                assert_eq!(res.status(), 200);
            }
        }));
    }
    for task in tasks {
        task.await.unwrap();
    }

    // p = 0.1 over 2000 draws: mean 200, standard deviation about 13.4.
    let recorded = total_requests(&scrape(&client, &gateway).await);
    assert!((130..=270).contains(&recorded), "recorded {recorded}");
}

#[tokio::test]
async fn requests_above_rate_wait_their_turn() {
    let backend = common::start_wrp_backend(common::echo).await;
    let mut config = common::gateway_config(&backend.url());
    config.rate_limit.requests_per_second = 4.0;
    config.rate_limit.burst_size = 2;
    let gateway = common::start_gateway(config).await;

    let client = common::client();
    let url = gateway.send_url(DEVICE, "config");
    let start = Instant::now();

    let mut tasks = Vec::new();
    for _ in 0..4 {
        let client = client.clone();
        let url = url.clone();
        tasks.push(tokio::spawn(async move {
            let res = client.post(&url).body(BODY).send().await.unwrap();
            (res.status(), start.elapsed())
        }));
    }

    let mut finished = Vec::new();
    for task in tasks {
        let (status, elapsed) = task.await.unwrap();
        assert_eq!(status, 200);
        finished.push(elapsed);
    }
    finished.sort();

    // Two from the burst straight away, then one every 250ms.
    assert!(finished[1] < Duration::from_millis(200), "{finished:?}");
    assert!(finished[3] >= Duration::from_millis(450), "{finished:?}");
    assert_eq!(backend.request_count(), 4);
}

#[tokio::test]
async fn abandoned_waiter_gets_nothing_and_returns_its_token() {
    let backend = common::start_wrp_backend(common::echo).await;
    let mut config = common::gateway_config(&backend.url());
    config.rate_limit.requests_per_second = 0.5;
    config.rate_limit.burst_size = 1;
    let gateway = common::start_gateway(config).await;
    let url = gateway.send_url(DEVICE, "config");

    let res = common::client().post(&url).body(BODY).send().await.unwrap();
    assert_eq!(res.status(), 200);

    // Next token matures in two seconds; this caller gives up first.
    let impatient = reqwest::Client::builder()
        .timeout(Duration::from_millis(300))
        .build()
        .unwrap();
    let abandoned = impatient.post(&url).body(BODY).send().await;
    assert!(abandoned.unwrap_err().is_timeout());

    let start = Instant::now();
    let res = common::client().post(&url).body(BODY).send().await.unwrap();
    assert_eq!(res.status(), 200);
    // Without the returned token this would wait for a second refill.
    assert!(start.elapsed() < Duration::from_secs(3), "{:?}", start.elapsed());

    tokio::time::sleep(Duration::from_millis(500)).await;
    assert_eq!(backend.request_count(), 2, "abandoned request reached the backend");
}

#[tokio::test]
async fn wait_beyond_deadline_is_refused() {
    let backend = common::start_wrp_backend(common::echo).await;
    let mut config = common::gateway_config(&backend.url());
    config.rate_limit.requests_per_second = 0.01;
    config.rate_limit.burst_size = 1;
    config.listener.timeout_secs = 1;
    let gateway = common::start_gateway(config).await;
    let client = common::client();
    let url = gateway.send_url(DEVICE, "config");

    let res = client.post(&url).body(BODY).send().await.unwrap();
    assert_eq!(res.status(), 200);

    let start = Instant::now();
    let res = client.post(&url).body(BODY).send().await.unwrap();
    assert_eq!(res.status(), 429);
    assert!(start.elapsed() < Duration::from_millis(500));
}

#[tokio::test]
async fn shutdown_stops_accepting() {
    let backend = common::start_wrp_backend(common::echo).await;
    let gateway = common::start_gateway(common::gateway_config(&backend.url())).await;
    let client = common::client();

    let res = client.get(gateway.url("/health")).send().await.unwrap();
    assert_eq!(res.status(), 200);

    gateway.shutdown();
    tokio::time::sleep(Duration::from_millis(200)).await;
    assert!(client.get(gateway.url("/health")).send().await.is_err());
}

// src/crawl/coordinator.rs
// =============================================================================
// This module runs a crawl: a pool of workers sharing one frontier.
//
// How it works:
// 1. Put the seed URL in the frontier at depth 0
// 2. Spawn `num_threads` workers; each one repeatedly:
//    a. stops if the visit budget (max_urls) is spent
//    b. takes the next task from the frontier (waiting if it's empty)
//    c. counts the visit
//    d. skips pages deeper than max_depth
//    e. fetches the page and checks robots.txt at the same time
//    f. extracts links and classifies each one (new internal / external / dup)
//    g. queues new internal links one level deeper, while budget remains
// 3. When every worker has stopped, return the two link sets as a report
//
// A worker stops when the budget is spent or when the frontier reports that
// it is empty with every worker idle. Failures on one page (network errors,
// robots.txt denials) only mean "no links from this page".
//
// Rust concepts:
// - Arc: Shares one CrawlContext between all worker tasks
// - AtomicUsize: A lock-free visit counter
// - tokio::spawn: Runs workers in parallel on the multi-threaded runtime
// =============================================================================

use futures::future::join_all;
use serde::Serialize;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, error, info, warn};

use super::config::CrawlConfig;
use super::frontier::{CrawlTask, Frontier};
use super::registry::{Classification, DedupRegistry};
use crate::links::extract_links;
use crate::net::{FetchError, Fetcher, RobotsGate};

// What a finished crawl hands to the output code
#[derive(Debug, Clone, Serialize)]
pub struct CrawlReport {
    pub seed_domain: String,
    /// Normalized in-domain links, sorted
    pub internal: Vec<String>,
    /// Normalized third-party links, sorted
    pub external: Vec<String>,
    /// Tasks the workers actually dequeued
    pub visited: usize,
    #[serde(rename = "elapsed_ms", serialize_with = "as_millis")]
    pub elapsed: Duration,
}

impl CrawlReport {
    pub fn total_links(&self) -> usize {
        self.internal.len() + self.external.len()
    }
}

fn as_millis<S: serde::Serializer>(elapsed: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_u64(elapsed.as_millis() as u64)
}

// Everything the workers share, passed to each of them explicitly
struct CrawlContext {
    config: CrawlConfig,
    fetcher: Fetcher,
    robots: RobotsGate,
    frontier: Frontier,
    registry: DedupRegistry,
    visited: AtomicUsize,
}

impl CrawlContext {
    fn budget_reached(&self) -> bool {
        self.visited.load(Ordering::SeqCst) >= self.config.max_urls
    }

    // Fetches one page and returns the new in-domain links found on it
    async fn discover(&self, task: &CrawlTask) -> Vec<String> {
        let mut new_links = Vec::new();

        if task.depth > self.config.max_depth {
            debug!("Depth {} beyond limit, not fetching {}", task.depth, task.url);
            return new_links;
        }

        // The page and its robots.txt are independent requests
        let (page, allowed) = tokio::join!(
            self.fetcher.fetch(&task.url),
            self.robots.allowed(&task.url)
        );

        let body = match page {
            Ok(body) => body,
            Err(e) => {
                log_fetch_failure(&task.url, &e);
                return new_links;
            }
        };

        if !allowed {
            info!("[!] Skipping URL due to robots.txt: {}", task.url);
            return new_links;
        }

        let seed_domain = self.config.seed_domain();
        for link in extract_links(&body, &task.url) {
            match self.registry.classify(&link, seed_domain) {
                Classification::NewInternal(url) => {
                    info!("[*] Internal: {}", url);
                    new_links.push(url);
                }
                Classification::NewExternal(url) => {
                    info!("[!] External: {}", url);
                }
                Classification::Duplicate | Classification::Invalid => {}
            }
        }

        new_links
    }
}

fn log_fetch_failure(url: &str, error: &FetchError) {
    warn!("[!] Failed to retrieve {}: {}", url, error);
}

pub struct Crawler {
    ctx: Arc<CrawlContext>,
}

impl Crawler {
    // Sets up the shared state for one run; nothing is fetched yet
    pub fn new(config: CrawlConfig) -> Result<Self, FetchError> {
        let fetcher = Fetcher::new(&config.user_agent, config.request_timeout)?;
        let robots = RobotsGate::new(fetcher.clone());
        let frontier = Frontier::new(config.worker_count());

        Ok(Self {
            ctx: Arc::new(CrawlContext {
                config,
                fetcher,
                robots,
                frontier,
                registry: DedupRegistry::new(),
                visited: AtomicUsize::new(0),
            }),
        })
    }

    /// Runs the crawl to completion and returns what it found.
    pub async fn crawl(self) -> CrawlReport {
        let ctx = self.ctx;
        let started = Instant::now();
        let workers = ctx.config.worker_count();

        info!(
            "Crawling {} (max urls {}, max depth {}, {} workers)",
            ctx.config.base_url, ctx.config.max_urls, ctx.config.max_depth, workers
        );

        ctx.frontier.push(CrawlTask {
            url: ctx.config.base_url.to_string(),
            depth: 0,
        });

        let handles: Vec<_> = (0..workers)
            .map(|id| tokio::spawn(worker(Arc::clone(&ctx), id)))
            .collect();

        for result in join_all(handles).await {
            if let Err(e) = result {
                error!("Crawl worker failed: {}", e);
            }
        }

        info!(
            "Workers done: {} in-domain and {} third-party links, {} tasks left unvisited",
            ctx.registry.internal_count(),
            ctx.registry.external_count(),
            ctx.frontier.len()
        );

        let (internal, external) = ctx.registry.snapshot();
        let report = CrawlReport {
            seed_domain: ctx.config.seed_domain().to_string(),
            internal,
            external,
            visited: ctx.visited.load(Ordering::SeqCst),
            elapsed: started.elapsed(),
        };

        debug!("Crawl took {:?}", report.elapsed);
        report
    }
}

async fn worker(ctx: Arc<CrawlContext>, id: usize) {
    let _close_on_exit = ctx.frontier.close_on_drop();

    loop {
        if ctx.budget_reached() {
            ctx.frontier.close();
            break;
        }

        let Some(task) = ctx.frontier.pop().await else {
            break;
        };

        let visited = ctx.visited.fetch_add(1, Ordering::SeqCst) + 1;
        info!(worker = id, depth = task.depth, visited, "[*] Crawling: {}", task.url);

        for link in ctx.discover(&task).await {
            if ctx.budget_reached() {
                break;
            }
            ctx.frontier.push(CrawlTask {
                url: link,
                depth: task.depth + 1,
            });
        }
    }

    debug!(worker = id, "Worker stopped");
}

// -----------------------------------------------------------------------------
// NOTES:
//
// 1. Why can visited end up above max_urls?
//    - The budget is checked before a worker takes a task, not atomically
//      with taking it
//    - Workers that passed the check at the same moment all get to finish
//    - So the overshoot is at most the number of workers, never unbounded
//
// 2. Why does a too-deep task still count as visited?
//    - The visit is counted when the task is dequeued, before the depth check
//    - Such tasks cost budget but never trigger a request
//
// 3. Why tokio::join! for the page and robots.txt?
//    - Both requests are independent, so running them together halves the
//      wait on a cold robots cache
//
// 4. Relative links resolve against the URL we asked for
//    - If the server redirected (e.g. /docs -> /docs/), hrefs are still
//      joined with the requested URL, not the final one
//    - So `intro.html` on /docs becomes /intro.html rather than /docs/intro.html
// -----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Matcher, Server, ServerGuard};
    use tokio::time::timeout;

    fn config(server: &ServerGuard, max_urls: usize, max_depth: usize, threads: usize) -> CrawlConfig {
        CrawlConfig {
            max_urls,
            max_depth,
            num_threads: threads,
            request_timeout: Duration::from_secs(5),
            ..CrawlConfig::new(&format!("{}/", server.url())).unwrap()
        }
    }

    async fn run(config: CrawlConfig) -> CrawlReport {
        let crawler = Crawler::new(config).unwrap();
        timeout(Duration::from_secs(20), crawler.crawl())
            .await
            .expect("crawl did not terminate")
    }

    fn page(links: &[&str]) -> String {
        let anchors: String = links
            .iter()
            .map(|href| format!(r#"<a href="{}">link</a>"#, href))
            .collect();
        format!("<html><body>{}</body></html>", anchors)
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_single_page_budget_with_many_workers() {
        let mut server = Server::new_async().await;
        let _root = server
            .mock("GET", "/")
            .with_body(page(&["/a", "/b", "/c"]))
            .create_async()
            .await;

        let report = run(config(&server, 1, 3, 4)).await;

        assert_eq!(report.visited, 1);
        assert_eq!(report.internal.len(), 3);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_exhausted_frontier_terminates() {
        let mut server = Server::new_async().await;
        let _root = server
            .mock("GET", "/")
            .with_body(page(&[]))
            .create_async()
            .await;

        let report = run(config(&server, 100, 3, 4)).await;

        assert_eq!(report.visited, 1);
        assert!(report.internal.is_empty());
        assert!(report.external.is_empty());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_duplicate_forms_collapse_and_external_is_recorded() {
        let mut server = Server::new_async().await;
        let absolute = format!("{}/a", server.url());
        let _root = server
            .mock("GET", "/")
            .with_body(page(&["/a", absolute.as_str(), "http://other.org/x"]))
            .create_async()
            .await;
        let _a = server
            .mock("GET", "/a")
            .with_body(page(&[]))
            .create_async()
            .await;

        let report = run(config(&server, 30, 3, 4)).await;

        assert_eq!(report.internal, vec![absolute]);
        assert_eq!(report.external, vec!["http://other.org/x".to_string()]);
        assert_eq!(report.total_links(), 2);
        assert_eq!(report.visited, 2);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_tasks_beyond_max_depth_are_never_fetched() {
        let mut server = Server::new_async().await;
        let _root = server
            .mock("GET", "/")
            .with_body(page(&["/one"]))
            .create_async()
            .await;
        let one = server
            .mock("GET", "/one")
            .with_body(page(&["/two"]))
            .expect(1)
            .create_async()
            .await;
        let two = server
            .mock("GET", "/two")
            .with_body(page(&["/three"]))
            .expect(0)
            .create_async()
            .await;

        let report = run(config(&server, 30, 1, 2)).await;

        one.assert_async().await;
        two.assert_async().await;
        // /two was discovered at depth 2, dequeued and counted, but not fetched
        assert_eq!(report.visited, 3);
        assert_eq!(report.internal.len(), 2);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_robots_disallowed_page_yields_no_links() {
        let mut server = Server::new_async().await;
        let _robots = server
            .mock("GET", "/robots.txt")
            .with_body("User-agent: *\nDisallow: /private")
            .create_async()
            .await;
        let _root = server
            .mock("GET", "/")
            .with_body(page(&["/private/page"]))
            .create_async()
            .await;
        let _private = server
            .mock("GET", "/private/page")
            .with_body(page(&["/secret"]))
            .create_async()
            .await;

        let report = run(config(&server, 30, 3, 4)).await;

        assert_eq!(report.internal, vec![format!("{}/private/page", server.url())]);
        assert_eq!(report.visited, 2);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_failed_fetch_yields_no_links() {
        let mut server = Server::new_async().await;
        let _root = server
            .mock("GET", "/")
            .with_status(500)
            .with_body(page(&["/a"]))
            .create_async()
            .await;

        let report = run(config(&server, 30, 3, 4)).await;

        assert_eq!(report.visited, 1);
        assert!(report.internal.is_empty());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_visit_overshoot_is_bounded_by_workers() {
        let mut server = Server::new_async().await;
        let links: Vec<String> = (0..20).map(|i| format!("/p{}", i)).collect();
        let hrefs: Vec<&str> = links.iter().map(String::as_str).collect();
        let _pages = server
            .mock("GET", Matcher::Regex(r"^/(p\d+)?$".to_string()))
            .with_body(page(&hrefs))
            .create_async()
            .await;

        let threads = 4;
        let max_urls = 5;
        let report = run(config(&server, max_urls, 3, threads)).await;

        assert!(report.visited >= max_urls);
        assert!(report.visited <= max_urls + threads);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_stalled_seed_host_times_out_and_crawl_finishes() {
        // Accepts connections but never answers
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        std::thread::spawn(move || {
            let mut held = Vec::new();
            for stream in listener.incoming() {
                held.push(stream);
            }
        });

        let config = CrawlConfig {
            max_urls: 30,
            num_threads: 4,
            request_timeout: Duration::from_millis(500),
            ..CrawlConfig::new(&format!("http://{}/", addr)).unwrap()
        };

        let started = Instant::now();
        let report = run(config).await;

        assert_eq!(report.visited, 1);
        assert!(report.internal.is_empty());
        assert!(started.elapsed() < Duration::from_secs(10));
    }

    #[test]
    fn test_report_json_shape() {
        let report = CrawlReport {
            seed_domain: "example.com".to_string(),
            internal: vec!["http://example.com/a".to_string()],
            external: vec![],
            visited: 1,
            elapsed: Duration::from_millis(1500),
        };

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["elapsed_ms"], 1500);
        assert_eq!(json["visited"], 1);
        assert_eq!(json["internal"][0], "http://example.com/a");
    }
}

//! Integration tests for http-walker
//!
//! The pool is driven through a scripted `Connector`, so no network is
//! needed except for the last test, which talks to a local HTTP stub.

use http_walker::config::ScanConfig;
use http_walker::error::{ProbeError, TrustStoreError};
use http_walker::http::{Connector, ProbeOutcome, ProbeResponse, Transport};
use http_walker::output::{MemorySink, ResultRecord, ResultSink};
use http_walker::walker::WalkCoordinator;
use http_walker::wordlist::seed_paths;
use parking_lot::Mutex;
use std::collections::{HashMap, HashSet};
use std::io::{BufRead, BufReader, Write};
use std::net::TcpListener;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

/// Scripted server: known paths answer with their status, all others fail
#[derive(Clone, Default)]
struct ScriptedConnector {
    statuses: Arc<HashMap<String, u16>>,
    probed: Arc<Mutex<Vec<String>>>,
    failed_connects: Arc<AtomicUsize>,
    refuse_first_connect: bool,
    connects: Arc<AtomicUsize>,
}

impl ScriptedConnector {
    fn new(statuses: &[(&str, u16)]) -> Self {
        Self {
            statuses: Arc::new(statuses.iter().map(|&(p, s)| (p.to_string(), s)).collect()),
            ..Self::default()
        }
    }

    fn probed(&self) -> Vec<String> {
        self.probed.lock().clone()
    }
}

struct ScriptedTransport {
    statuses: Arc<HashMap<String, u16>>,
    probed: Arc<Mutex<Vec<String>>>,
}

impl Transport for ScriptedTransport {
    fn probe(&mut self, path: &str) -> ProbeOutcome {
        self.probed.lock().push(path.to_string());
        match self.statuses.get(path) {
            Some(&status) => Ok(ProbeResponse::new(status)),
            None => Err(ProbeError::Transport {
                url: format!("http://example.test{}", path),
                reason: "Connection refused".into(),
            }),
        }
    }
}

impl Connector for ScriptedConnector {
    type Transport = ScriptedTransport;

    fn connect(&self, _config: &ScanConfig) -> Result<ScriptedTransport, TrustStoreError> {
        if self.refuse_first_connect && self.connects.fetch_add(1, Ordering::SeqCst) == 0 {
            self.failed_connects.fetch_add(1, Ordering::SeqCst);
            return Err(TrustStoreError::Empty);
        }
        Ok(ScriptedTransport {
            statuses: Arc::clone(&self.statuses),
            probed: Arc::clone(&self.probed),
        })
    }
}

struct Channels {
    output: Arc<MemorySink>,
    errors: Arc<MemorySink>,
    sink: ResultSink,
}

fn channels() -> Channels {
    let output = Arc::new(MemorySink::new());
    let errors = Arc::new(MemorySink::new());
    Channels {
        sink: ResultSink::new(output.clone(), errors.clone()),
        output,
        errors,
    }
}

fn scenario_config(workers: usize) -> ScanConfig {
    let mut config = ScanConfig::for_target("http://example.test").unwrap();
    config.variations = vec!["_bak".into()];
    config.status_codes = [200].into_iter().collect();
    config.worker_count = workers;
    config
}

fn scenario_connector() -> ScriptedConnector {
    ScriptedConnector::new(&[("/a", 200), ("/b", 404), ("/a_bak", 404)])
}

fn record_set(records: &[ResultRecord]) -> HashSet<String> {
    records.iter().map(|r| r.to_string()).collect()
}

#[test]
fn test_end_to_end_scenario() {
    let connector = scenario_connector();
    let ch = channels();
    let coordinator = WalkCoordinator::with_connector(scenario_config(1), connector.clone(), ch.sink);
    coordinator.seed(vec!["a".into(), "b".into()]);

    let result = coordinator.run().unwrap();

    let output = ch.output.records();
    assert_eq!(output.len(), 1);
    assert_eq!(output[0].status, 200);
    assert_eq!(output[0].path, "/a");
    assert!(ch.errors.is_empty());

    let probed: HashSet<_> = connector.probed().into_iter().collect();
    let expected: HashSet<_> = ["/a", "/b", "/a_bak"].iter().map(|s| s.to_string()).collect();
    assert_eq!(probed, expected);

    assert_eq!(result.probes, 3);
    assert_eq!(result.results, 1);
    assert_eq!(result.expansions, 1);
    assert_eq!(result.queued, 3);
    assert_eq!(result.dequeued, 3);
    assert_eq!(result.pending, 0);
    assert!(result.completed);
}

#[test]
fn test_worker_count_does_not_change_records() {
    let run = |workers: usize| {
        let ch = channels();
        let coordinator = WalkCoordinator::with_connector(scenario_config(workers), scenario_connector(), ch.sink);
        coordinator.seed(vec!["a".into(), "b".into()]);
        coordinator.run().unwrap();
        (record_set(&ch.output.records()), record_set(&ch.errors.records()))
    };

    assert_eq!(run(1), run(8));
}

#[test]
fn test_many_seeds_many_workers_probe_everything() {
    let words: String = (0..200).map(|i| format!("dir{}\n", i)).collect();
    let seeds = seed_paths(words.as_bytes(), &[".old".to_string()]).unwrap();
    assert_eq!(seeds.len(), 400);

    let statuses: Vec<(String, u16)> = seeds.iter().map(|s| (format!("/{}", s), 404)).collect();
    let table: Vec<(&str, u16)> = statuses.iter().map(|(p, s)| (p.as_str(), *s)).collect();
    let connector = ScriptedConnector::new(&table);
    let ch = channels();

    let coordinator = WalkCoordinator::with_connector(scenario_config(16), connector.clone(), ch.sink);
    coordinator.seed(seeds);
    let result = coordinator.run().unwrap();

    // Each seed is dequeued exactly once
    let probed = connector.probed();
    assert_eq!(probed.len(), 400);
    assert_eq!(probed.iter().collect::<HashSet<_>>().len(), 400);
    assert_eq!(result.workers, 16);
    assert!(ch.output.is_empty());
}

#[test]
fn test_leading_slash_is_optional() {
    let connector = ScriptedConnector::new(&[("/admin", 403)]);
    let ch = channels();
    let coordinator =
        WalkCoordinator::with_connector(ScanConfig::for_target("http://example.test").unwrap(), connector.clone(), ch.sink);
    coordinator.seed(vec!["admin".into(), "/admin".into()]);

    coordinator.run().unwrap();

    assert_eq!(connector.probed(), vec!["/admin", "/admin"]);
    let output = ch.output.records();
    assert_eq!(output.len(), 2);
    assert_eq!(output[0], output[1]);
}

#[test]
fn test_failing_path_retried_until_stopped() {
    let connector = ScriptedConnector::new(&[]);
    let ch = channels();
    let coordinator = WalkCoordinator::with_connector(scenario_config(1), connector.clone(), ch.sink);
    coordinator.seed(vec!["down".into()]);

    let shutdown = coordinator.shutdown_flag();
    let errors = Arc::clone(&ch.errors);
    let watcher = thread::spawn(move || {
        let deadline = Instant::now() + Duration::from_secs(10);
        while errors.len() < 5 && Instant::now() < deadline {
            thread::sleep(Duration::from_millis(1));
        }
        shutdown.store(true, Ordering::SeqCst);
    });

    let result = coordinator.run().unwrap();
    watcher.join().unwrap();

    assert!(!result.completed);
    let failures = ch.errors.records();
    assert!(failures.len() >= 5);
    assert!(failures.iter().all(|r| r.to_string() == "-1;\"/down\";;;;Connection refused"));
    assert!(ch.output.is_empty());
}

#[test]
fn test_retry_cap_bounds_attempts() {
    let connector = ScriptedConnector::new(&[]);
    let ch = channels();
    let mut config = scenario_config(4);
    config.max_retries = Some(3);
    let coordinator = WalkCoordinator::with_connector(config, connector.clone(), ch.sink);
    coordinator.seed(vec!["down".into()]);

    let result = coordinator.run().unwrap();

    assert_eq!(connector.probed().len(), 4);
    assert_eq!(ch.errors.len(), 4);
    assert_eq!(result.retries, 3);
    assert_eq!(result.queued, 4);
    assert_eq!(result.abandoned, 1);
    assert!(result.completed);
}

#[test]
fn test_connect_failure_only_stops_one_worker() {
    let mut connector = ScriptedConnector::new(&[("/a", 200), ("/b", 200), ("/c", 200), ("/d", 200)]);
    connector.refuse_first_connect = true;
    let ch = channels();
    let mut config = ScanConfig::for_target("http://example.test").unwrap();
    config.worker_count = 2;
    let coordinator = WalkCoordinator::with_connector(config, connector.clone(), ch.sink);
    coordinator.seed(["a", "b", "c", "d"].iter().map(|s| s.to_string()));

    let result = coordinator.run().unwrap();

    assert_eq!(connector.failed_connects.load(Ordering::SeqCst), 1);
    assert_eq!(result.workers, 2);
    assert_eq!(ch.output.len(), 4);
    assert_eq!(connector.probed().len(), 4);
}

#[test]
fn test_no_seeds_no_probes() {
    let connector = scenario_connector();
    let ch = channels();
    let coordinator = WalkCoordinator::with_connector(scenario_config(8), connector.clone(), ch.sink);
    assert_eq!(coordinator.seed(seed_paths("".as_bytes(), &[".php".to_string()]).unwrap()), 0);

    let result = coordinator.run().unwrap();

    assert_eq!(result.workers, 0);
    assert!(connector.probed().is_empty());
    assert!(ch.output.is_empty());
}

#[test]
fn test_blank_word_list_line_requests_bare_extension() {
    let connector = ScriptedConnector::new(&[("/.php", 404)]);
    let ch = channels();
    let coordinator = WalkCoordinator::with_connector(scenario_config(1), connector.clone(), ch.sink);
    assert_eq!(coordinator.seed(seed_paths("\n".as_bytes(), &[".php".to_string()]).unwrap()), 2);

    let result = coordinator.run().unwrap();

    assert_eq!(connector.probed(), vec!["/.php"]);
    assert_eq!(result.discarded, 1);
    assert_eq!(result.probes, 1);
    assert!(ch.errors.is_empty());
}

/// Minimal HTTP/1.1 server answering each path from a table, one request per connection
fn serve(statuses: &'static [(&'static str, u16, Option<&'static str>)]) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();

    thread::spawn(move || {
        for stream in listener.incoming() {
            let Ok(mut stream) = stream else { break };
            let mut reader = BufReader::new(stream.try_clone().unwrap());

            let mut request_line = String::new();
            reader.read_line(&mut request_line).unwrap();
            loop {
                let mut line = String::new();
                if reader.read_line(&mut line).unwrap() == 0 || line == "\r\n" {
                    break;
                }
            }

            let path = request_line.split_whitespace().nth(1).unwrap_or("/");
            let (status, location) = statuses
                .iter()
                .find(|(p, _, _)| *p == path)
                .map(|&(_, s, l)| (s, l))
                .unwrap_or((404, None));

            let mut response = format!("HTTP/1.1 {} X\r\nContent-Length: 0\r\nConnection: close\r\n", status);
            if let Some(location) = location {
                response.push_str(&format!("Location: {}\r\n", location));
            }
            response.push_str("\r\n");
            let _ = stream.write_all(response.as_bytes());
        }
    });

    format!("http://{}", addr)
}

#[test]
fn test_walk_against_local_server() {
    static ROUTES: &[(&str, u16, Option<&str>)] = &[
        ("/admin", 200, None),
        ("/admin.bak", 200, None),
        ("/old", 301, Some("/new/")),
    ];
    let base = serve(ROUTES);

    let mut config = ScanConfig::for_target(&base).unwrap();
    config.variations = vec![".bak".into()];
    config.worker_count = 2;
    config.timeout = Duration::from_secs(5);

    let ch = channels();
    let coordinator = WalkCoordinator::new(config, ch.sink);
    coordinator.seed(vec!["admin".into(), "old".into(), "missing".into()]);
    let result = coordinator.run().unwrap();

    let lines = record_set(&ch.output.records());
    let expected: HashSet<String> = [
        "200;\"/admin\";\"\";0;\"\";",
        "200;\"/admin.bak\";\"\";0;\"\";",
        "301;\"/old\";\"\";0;\"\";/new/",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect();

    assert_eq!(lines, expected);
    assert!(ch.errors.is_empty(), "unexpected failures: {:?}", ch.errors.records());
    assert_eq!(result.probes, 5);
}

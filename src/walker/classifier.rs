//! Probe outcome classification
//!
//! Decides, for one probed task, which record to write, to which
//! channel, and what the queue should receive next:
//!
//! | Outcome              | Channel                  | Follow-up            |
//! |----------------------|--------------------------|----------------------|
//! | transport failure    | errors (always)          | retry, unless capped |
//! | invalid URL          | errors (always)          | abandon              |
//! | 200                  | results, if accepted     | one task per variation |
//! | 3xx                  | results, if accepted     | none                 |
//! | anything else        | results, if accepted     | none                 |

use crate::config::ScanConfig;
use crate::http::ProbeOutcome;
use crate::output::ResultRecord;
use crate::walker::queue::Task;

/// Where a record is written
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    /// Success channel
    Results,
    /// Error channel
    Errors,
    /// Filtered out by the accepted status codes
    Suppressed,
}

/// What the queue receives after the probe
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FollowUp {
    /// Nothing to add
    Done,
    /// New paths derived from a found path
    Expand(Vec<String>),
    /// The same task again after a transport failure
    Retry(Task),
    /// Failed and will not be retried
    Abandon,
}

/// Classification of one probe
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Verdict {
    pub record: ResultRecord,
    pub channel: Channel,
    pub follow_up: FollowUp,
}

/// Classify the outcome of probing `path` (already normalized) for `task`
pub fn classify(task: &Task, path: &str, outcome: &ProbeOutcome, config: &ScanConfig) -> Verdict {
    let response = match outcome {
        Ok(response) => response,
        Err(error) => {
            let retry_allowed = config.max_retries.map_or(true, |max| task.retries < max);
            let follow_up = if error.is_recoverable() && retry_allowed {
                FollowUp::Retry(Task {
                    path: path.to_string(),
                    retries: task.retries + 1,
                })
            } else {
                FollowUp::Abandon
            };

            return Verdict {
                record: ResultRecord::failure(path, error),
                channel: Channel::Errors,
                follow_up,
            };
        }
    };

    let follow_up = if response.is_found() && !config.variations.is_empty() {
        FollowUp::Expand(
            config
                .variations
                .iter()
                .map(|v| format!("{}{}", path, v))
                .collect(),
        )
    } else {
        FollowUp::Done
    };

    let channel = if config.is_accepted(response.status) {
        Channel::Results
    } else {
        Channel::Suppressed
    };

    Verdict {
        record: ResultRecord::from_response(path, response),
        channel,
        follow_up,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ProbeError;
    use crate::http::ProbeResponse;

    fn config() -> ScanConfig {
        let mut config = ScanConfig::for_target("http://example.test").unwrap();
        config.variations = vec!["_".into(), "_admin".into()];
        config
    }

    fn transport_error() -> ProbeOutcome {
        Err(ProbeError::Transport {
            url: "http://example.test/a".into(),
            reason: "Connection refused".into(),
        })
    }

    #[test]
    fn test_found_expands_with_variations() {
        let verdict = classify(&Task::new("/admin"), "/admin", &Ok(ProbeResponse::new(200)), &config());

        assert_eq!(verdict.channel, Channel::Results);
        assert_eq!(
            verdict.follow_up,
            FollowUp::Expand(vec!["/admin_".into(), "/admin_admin".into()])
        );
    }

    #[test]
    fn test_found_without_variations() {
        let mut config = config();
        config.variations.clear();
        let verdict = classify(&Task::new("/a"), "/a", &Ok(ProbeResponse::new(200)), &config);
        assert_eq!(verdict.follow_up, FollowUp::Done);
    }

    #[test]
    fn test_found_but_filtered_still_expands() {
        let mut config = config();
        config.status_codes = [403].into_iter().collect();
        let verdict = classify(&Task::new("/a"), "/a", &Ok(ProbeResponse::new(200)), &config);

        assert_eq!(verdict.channel, Channel::Suppressed);
        assert!(matches!(verdict.follow_up, FollowUp::Expand(ref paths) if paths.len() == 2));
    }

    #[test]
    fn test_only_exact_200_expands() {
        for status in [201, 204, 301, 403] {
            let verdict = classify(&Task::new("/a"), "/a", &Ok(ProbeResponse::new(status)), &config());
            assert_eq!(verdict.follow_up, FollowUp::Done, "status {}", status);
        }
    }

    #[test]
    fn test_redirect_records_location() {
        let response = ProbeResponse::new(302).with_location("/login");
        let verdict = classify(&Task::new("/admin"), "/admin", &Ok(response), &config());

        assert_eq!(verdict.channel, Channel::Results);
        assert_eq!(verdict.record.detail.as_deref(), Some("/login"));
        assert_eq!(verdict.follow_up, FollowUp::Done);
    }

    #[test]
    fn test_status_filter() {
        let verdict = classify(&Task::new("/a"), "/a", &Ok(ProbeResponse::new(404)), &config());
        assert_eq!(verdict.channel, Channel::Suppressed);

        let verdict = classify(&Task::new("/a"), "/a", &Ok(ProbeResponse::new(401)), &config());
        assert_eq!(verdict.channel, Channel::Results);
    }

    #[test]
    fn test_transport_failure_retries_unbounded_by_default() {
        let task = Task {
            path: "a".into(),
            retries: 1_000,
        };
        let verdict = classify(&task, "/a", &transport_error(), &config());

        assert_eq!(verdict.channel, Channel::Errors);
        assert_eq!(verdict.record.status, -1);
        assert_eq!(
            verdict.follow_up,
            FollowUp::Retry(Task {
                path: "/a".into(),
                retries: 1_001
            })
        );
    }

    #[test]
    fn test_transport_failure_respects_retry_cap() {
        let mut config = config();
        config.max_retries = Some(2);

        let verdict = classify(&Task { path: "/a".into(), retries: 1 }, "/a", &transport_error(), &config);
        assert!(matches!(verdict.follow_up, FollowUp::Retry(_)));

        let verdict = classify(&Task { path: "/a".into(), retries: 2 }, "/a", &transport_error(), &config);
        assert_eq!(verdict.follow_up, FollowUp::Abandon);
        assert_eq!(verdict.channel, Channel::Errors);
    }

    #[test]
    fn test_invalid_url_is_abandoned() {
        let outcome = Err(ProbeError::InvalidUrl {
            url: "http://example.test/%zz".into(),
            reason: "invalid".into(),
        });
        let verdict = classify(&Task::new("/%zz"), "/%zz", &outcome, &config());

        assert_eq!(verdict.channel, Channel::Errors);
        assert_eq!(verdict.follow_up, FollowUp::Abandon);
    }

    #[test]
    fn test_failures_bypass_status_filter() {
        let mut config = config();
        config.status_codes.clear();
        let verdict = classify(&Task::new("/a"), "/a", &transport_error(), &config);
        assert_eq!(verdict.channel, Channel::Errors);
    }
}

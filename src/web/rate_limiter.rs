use crate::config::RateLimitConfig;
use reqwest::Url;
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use std::time::Instant;
use tracing::{debug, warn};

/// Per-domain sliding-window limiter for documentation submissions.
pub struct RateLimiter {
    config: RateLimitConfig,
    requests: Mutex<HashMap<String, VecDeque<Instant>>>,
}

impl RateLimiter {
    pub fn new(config: RateLimitConfig) -> Self {
        Self {
            config,
            requests: Mutex::new(HashMap::new()),
        }
    }

    /// Records a request for the URL's host and reports whether it is allowed.
    /// URLs without a parseable host are always allowed.
    pub fn allow(&self, url: &str) -> bool {
        self.allow_at(url, Instant::now())
    }

    fn allow_at(&self, url: &str, now: Instant) -> bool {
        let Some(domain) = Url::parse(url).ok().and_then(|u| u.host_str().map(str::to_string))
        else {
            return true;
        };

        let Ok(mut requests) = self.requests.lock() else {
            warn!(domain = %domain, "Rate limiter lock poisoned, allowing request");
            return true;
        };

        // expired timestamps are dropped for every domain, empty entries removed
        let period = self.config.window;
        requests.retain(|_, seen| {
            while seen
                .front()
                .is_some_and(|first| now.duration_since(*first) >= period)
            {
                seen.pop_front();
            }
            !seen.is_empty()
        });

        let window = requests.entry(domain.clone()).or_default();
        if window.len() >= self.config.max_requests {
            debug!(domain = %domain, "Rate limit exceeded");
            return false;
        }
        window.push_back(now);
        true
    }
}

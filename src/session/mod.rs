pub mod history;

use std::{
    collections::HashMap,
    sync::{Mutex, MutexGuard},
    time::{Duration, Instant},
};

use log::debug;
use rand::Rng;
use serde::Serialize;

pub use history::History;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Default)]
pub enum Page {
    #[default]
    Welcome,
    App,
}

/// Everything one visitor accumulates between requests.
#[derive(Debug, Clone, Default)]
pub struct Session {
    pub logged_in: bool,
    pub page: Page,
    pub history: History,
    pub dark_mode: bool,
    pub feedback_submitted: bool,
}

impl Session {
    pub fn get_started(&mut self) {
        self.logged_in = true;
        self.page = Page::App;
    }

    pub fn logout(&mut self) {
        self.logged_in = false;
        self.page = Page::Welcome;
    }

    pub fn view(&self) -> SessionView {
        SessionView {
            logged_in: self.logged_in,
            page: self.page,
            dark_mode: self.dark_mode,
            feedback_submitted: self.feedback_submitted,
            predictions: self.history.entries().len(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SessionView {
    pub logged_in: bool,
    pub page: Page,
    pub dark_mode: bool,
    pub feedback_submitted: bool,
    pub predictions: usize,
}

struct Tracked {
    session: Session,
    last_seen: Instant,
}

/// Live sessions by token. A session untouched for longer than the idle
/// timeout is gone: lookups miss it and `create` sweeps it out.
pub struct SessionRegistry {
    sessions: Mutex<HashMap<String, Tracked>>,
    idle_timeout: Duration,
}

impl SessionRegistry {
    pub fn new(idle_timeout: Duration) -> Self {
        SessionRegistry {
            sessions: Mutex::new(HashMap::new()),
            idle_timeout,
        }
    }

    pub fn create(&self) -> String {
        let id = format!("{:032x}", rand::thread_rng().gen::<u128>());
        let now = Instant::now();

        let mut sessions = self.lock();
        let before = sessions.len();
        sessions.retain(|_, tracked| now.duration_since(tracked.last_seen) < self.idle_timeout);
        if sessions.len() < before {
            debug!("evicted {} idle sessions", before - sessions.len());
        }

        sessions.insert(
            id.clone(),
            Tracked {
                session: Session::default(),
                last_seen: now,
            },
        );
        id
    }

    /// Runs `f` against the session, or returns `None` for an unknown or
    /// expired id.
    pub fn with_session<R>(&self, id: &str, f: impl FnOnce(&mut Session) -> R) -> Option<R> {
        let now = Instant::now();
        let mut sessions = self.lock();

        let expired = now.duration_since(sessions.get(id)?.last_seen) >= self.idle_timeout;
        if expired {
            sessions.remove(id);
            return None;
        }

        let tracked = sessions.get_mut(id)?;
        tracked.last_seen = now;
        Some(f(&mut tracked.session))
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.lock().len()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, Tracked>> {
        // Sessions hold plain data, a poisoned map is still consistent
        self.sessions
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

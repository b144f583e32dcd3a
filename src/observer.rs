//! Logging port for the dispatcher. Primitives and the detector never log;
//! the renderer reports what it did through a [`RenderObserver`].

use log::Level;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Detect,
    Render,
    Encode,
    Registry,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Detect => "detect",
            Category::Render => "render",
            Category::Encode => "encode",
            Category::Registry => "registry",
        }
    }

    fn target(&self) -> &'static str {
        match self {
            Category::Detect => "morph::detect",
            Category::Render => "morph::render",
            Category::Encode => "morph::encode",
            Category::Registry => "morph::registry",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub trait RenderObserver: Send + Sync {
    fn record(&self, level: Level, category: Category, message: &str);
}

/// Discards everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl RenderObserver for NoopObserver {
    fn record(&self, _level: Level, _category: Category, _message: &str) {}
}

/// Forwards events to the `log` facade, one target per category.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogObserver;

impl RenderObserver for LogObserver {
    fn record(&self, level: Level, category: Category, message: &str) {
        log::log!(target: category.target(), level, "{}", message);
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use std::sync::Mutex;

    /// Keeps every event so tests can assert on what the renderer reported.
    #[derive(Default)]
    pub struct RecordingObserver {
        pub events: Mutex<Vec<(Level, Category, String)>>,
    }

    impl RecordingObserver {
        pub fn categories(&self) -> Vec<Category> {
            self.events
                .lock()
                .unwrap()
                .iter()
                .map(|(_, c, _)| *c)
                .collect()
        }
    }

    impl RenderObserver for RecordingObserver {
        fn record(&self, level: Level, category: Category, message: &str) {
            self.events
                .lock()
                .unwrap()
                .push((level, category, message.to_string()));
        }
    }
}

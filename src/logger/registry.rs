//! Get-or-create-by-name logger registry, passed around explicitly instead of living
//! in a global so every configuration run (and every test) can own an isolated one.

use super::Logger;
use crate::internal;
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Name of the root logger.
pub const ROOT_LOGGER: &str = "";

/// Dotted names form the hierarchy: `a.b` is a child of `a`, which is a child of the root.
pub struct LoggerRegistry {
    loggers: Mutex<BTreeMap<String, Arc<Logger>>>,
}

impl Default for LoggerRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for LoggerRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoggerRegistry")
            .field("loggers", &self.names())
            .finish()
    }
}

fn parent_name(name: &str) -> Option<&str> {
    if name.is_empty() {
        return None;
    }
    Some(name.rfind('.').map_or(ROOT_LOGGER, |idx| &name[..idx]))
}

impl LoggerRegistry {
    /// Holds only the root logger.
    #[must_use]
    pub fn new() -> Self {
        let mut loggers = BTreeMap::new();
        loggers.insert(
            ROOT_LOGGER.to_string(),
            Arc::new(Logger::new(ROOT_LOGGER, None)),
        );
        Self {
            loggers: Mutex::new(loggers),
        }
    }

    fn lock(&self) -> MutexGuard<'_, BTreeMap<String, Arc<Logger>>> {
        self.loggers.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn get_or_create_locked(map: &mut BTreeMap<String, Arc<Logger>>, name: &str) -> Arc<Logger> {
        if let Some(logger) = map.get(name) {
            return Arc::clone(logger);
        }
        let parent = parent_name(name).map(|parent| Self::get_or_create_locked(map, parent));
        let logger = Arc::new(Logger::new(name, parent));
        map.insert(name.to_string(), Arc::clone(&logger));
        logger
    }

    /// Missing ancestors are created on the way so level inheritance always has a chain to walk.
    pub fn get_or_create(&self, name: &str) -> Arc<Logger> {
        Self::get_or_create_locked(&mut self.lock(), name)
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<Arc<Logger>> {
        self.lock().get(name).cloned()
    }

    #[must_use]
    pub fn root(&self) -> Arc<Logger> {
        self.get_or_create(ROOT_LOGGER)
    }

    /// Sorted, root first.
    #[must_use]
    pub fn names(&self) -> Vec<String> {
        self.lock().keys().cloned().collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Replaces this registry's configuration with `staged`'s. Loggers the staged run
    /// never touched are reset, so a re-run replaces rather than merges.
    pub fn commit(&self, staged: &Self) {
        let staged_loggers: Vec<(String, Arc<Logger>)> = staged
            .lock()
            .iter()
            .map(|(name, logger)| (name.clone(), Arc::clone(logger)))
            .collect();

        let mut map = self.lock();
        for (name, logger) in map.iter() {
            if !staged_loggers.iter().any(|(staged, _)| staged == name) {
                logger.reset();
            }
        }
        for (name, logger) in &staged_loggers {
            Self::get_or_create_locked(&mut map, name).replace_state_from(logger);
        }
        internal::debug(
            "REGISTRY",
            &format!("Committed {} loggers", staged_loggers.len()),
        );
    }
}

//! HTTP request routing.
//!
//! Paths are matched exactly, without the query string.
use super::{Handler, Path};
use crate::colors::MaybeColorize;

use std::collections::HashMap;
use tracing::{info, warn};

#[derive(Default)]
pub struct Router {
    handlers: HashMap<String, Handler>,
}

impl Router {
    /// Build the router. If two handlers share a path, the last one wins.
    pub fn new(handlers: Vec<Handler>) -> Self {
        let mut router = HashMap::new();

        for handler in handlers {
            let path = handler.path().base().to_string();
            if let Some(previous) = router.insert(path.clone(), handler) {
                warn!(
                    "{} was mounted twice, replacing {}",
                    path,
                    previous.controller_name()
                );
            }
        }

        Self { handlers: router }
    }

    pub fn find(&self, path: &Path) -> Option<&Handler> {
        self.handlers.get(path.base())
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    pub fn log_routes(&self) {
        let mut handlers = self.handlers.values().collect::<Vec<_>>();
        handlers.sort_by_key(|handler| handler.path().base());

        for handler in handlers {
            info!(
                ">> {} => {}",
                handler.path().base().purple(),
                handler.controller_name().green()
            );
        }
    }
}

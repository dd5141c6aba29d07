use super::Path;
use crate::controller::Controller;

use std::ops::Deref;

/// Route handler: a controller mounted at a path.
pub struct Handler {
    path: Path,
    controller: Box<dyn Controller>,
}

impl Handler {
    /// Mount the controller at this path. The query string, if any, is ignored.
    pub fn route(path: &str, controller: impl Controller + 'static) -> Self {
        Self {
            path: Path::parse(path).unwrap_or_default(),
            controller: Box::new(controller),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn controller_name(&self) -> &'static str {
        self.controller.controller_name()
    }
}

impl Deref for Handler {
    type Target = Box<dyn Controller>;

    fn deref(&self) -> &Self::Target {
        &self.controller
    }
}

use std::future::Future;
use std::sync::Mutex;

use tokio::task::JoinHandle;
use tracing::debug;

/// Owns the background tasks started for one screen or session.
///
/// `close` aborts everything still running and refuses new work. Effects a
/// task already committed are left in place. Dropping the scope closes it.
pub struct TaskScope {
    name: String,
    tasks: Mutex<Option<Vec<JoinHandle<()>>>>,
}

impl TaskScope {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            tasks: Mutex::new(Some(Vec::new())),
        }
    }

    /// Spawn a task owned by this scope. Returns false (and does not spawn)
    /// once the scope is closed.
    pub fn spawn<F>(&self, fut: F) -> bool
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let mut guard = self.tasks.lock().unwrap_or_else(|e| e.into_inner());
        match guard.as_mut() {
            Some(tasks) => {
                tasks.retain(|t| !t.is_finished());
                tasks.push(tokio::spawn(fut));
                true
            }
            None => false,
        }
    }

    pub fn is_closed(&self) -> bool {
        self.tasks.lock().unwrap_or_else(|e| e.into_inner()).is_none()
    }

    /// Number of tasks still running.
    pub fn active(&self) -> usize {
        self.tasks
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .as_ref()
            .map(|t| t.iter().filter(|h| !h.is_finished()).count())
            .unwrap_or(0)
    }

    pub fn close(&self) {
        let tasks = self.tasks.lock().unwrap_or_else(|e| e.into_inner()).take();
        if let Some(tasks) = tasks {
            debug!(scope = %self.name, count = tasks.len(), "closing task scope");
            for task in tasks {
                task.abort();
            }
        }
    }
}

impl Drop for TaskScope {
    fn drop(&mut self) {
        self.close();
    }
}

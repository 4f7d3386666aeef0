use tokio::sync::watch;

use super::marker::MarkerView;

/// Change notifications published by the marker store
#[derive(Debug, Clone, PartialEq)]
pub enum StoreEvent {
    MarkerCreated(MarkerView),
    /// `remaining` carries the markers with their new display indices
    MarkerRemoved {
        removed: MarkerView,
        remaining: Vec<MarkerView>,
    },
    MarkersCleared,
}

type HandlerType<T> = Box<dyn Fn(&T)>;

/// Observers of store events, called in subscription order
pub struct Handlers<T> {
    handlers: Vec<HandlerType<T>>,
}

impl<T> Default for Handlers<T> {
    fn default() -> Self {
        Self { handlers: vec![] }
    }
}

impl<T> Handlers<T> {
    pub fn subscribe<F>(&mut self, handler: F)
    where
        F: Fn(&T) + 'static,
    {
        self.handlers.push(Box::new(handler));
    }

    pub fn emit(&self, event: &T) {
        for handler in self.handlers.iter() {
            handler(event);
        }
    }
}

/// A value that pushes every change to its watchers
pub struct Field<T> {
    f: T,
    watcher: watch::Sender<T>,
}

impl<T> Field<T>
where
    T: Clone + PartialEq,
{
    pub fn new(value: T) -> Self {
        let (watcher, _) = watch::channel(value.clone());
        Self { f: value, watcher }
    }

    pub fn set(&mut self, value: T) {
        if self.f == value {
            return;
        }
        self.f = value;
        self.watcher.send_replace(self.f.clone());
    }

    pub fn watch(&self) -> watch::Receiver<T> {
        self.watcher.subscribe()
    }
}

use std::sync::Arc;
use parking_lot::Mutex;
use ahash::AHashMap;

/// System-wide event bus
pub struct EventBus {
    handlers: Arc<Mutex<AHashMap<std::any::TypeId, Vec<Box<dyn EventHandler>>>>>,
}

/// Event trait that all events must implement
pub trait Event: Send + Sync + 'static {
    fn as_any(&self) -> &dyn std::any::Any;
}

/// Handler trait for event handlers
pub trait EventHandler: Send + Sync {
    fn handle(&mut self, event: &dyn Event);
}

/// Table events
pub mod events {
    use super::Event;
    use crate::table::RecordId;

    /// Profile and measurement collections loaded
    #[derive(Debug, Clone)]
    pub struct DataSourceLoaded {
        pub source_name: String,
        pub profile_count: usize,
        pub measurement_count: usize,
    }

    /// Loading a data source failed
    #[derive(Debug, Clone)]
    pub struct DataSourceError {
        pub source_name: String,
        pub error: String,
    }

    /// A table rendered a new page
    #[derive(Debug, Clone)]
    pub struct PageRendered {
        pub table: &'static str,
        pub page: usize,
        pub total_pages: usize,
        pub total_count: usize,
    }

    /// Row selection of a table changed
    #[derive(Debug, Clone)]
    pub struct SelectionChanged {
        pub table: &'static str,
        pub selected: Vec<RecordId>,
    }

    /// Selected rows were exported
    #[derive(Debug, Clone)]
    pub struct SelectionExported {
        pub table: &'static str,
        pub row_count: usize,
        pub destination: String,
    }

    macro_rules! impl_event {
        ($($t:ty),*) => {
            $(
                impl Event for $t {
                    fn as_any(&self) -> &dyn std::any::Any {
                        self
                    }
                }
            )*
        }
    }

    impl_event!(
        DataSourceLoaded,
        DataSourceError,
        PageRendered,
        SelectionChanged,
        SelectionExported
    );
}

impl EventBus {
    /// Create a new event bus
    pub fn new() -> Self {
        Self {
            handlers: Arc::new(Mutex::new(AHashMap::new())),
        }
    }

    /// Subscribe to events of a specific type
    pub fn subscribe<E: Event>(&self, handler: Box<dyn EventHandler>) {
        let type_id = std::any::TypeId::of::<E>();
        let mut handlers = self.handlers.lock();
        handlers.entry(type_id).or_insert_with(Vec::new).push(handler);
    }

    /// Publish an event to the handlers subscribed to its type
    pub fn publish<E: Event>(&self, event: E) {
        let type_id = std::any::TypeId::of::<E>();
        let mut handlers = self.handlers.lock();

        if let Some(event_handlers) = handlers.get_mut(&type_id) {
            for handler in event_handlers.iter_mut() {
                handler.handle(&event);
            }
        }
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

/// Event handler backed by a closure
pub struct ClosureEventHandler<F> {
    handler: F,
}

impl<F> EventHandler for ClosureEventHandler<F>
where
    F: FnMut(&dyn Event) + Send + Sync,
{
    fn handle(&mut self, event: &dyn Event) {
        (self.handler)(event);
    }
}

/// Create an event handler from a closure
pub fn handler_from_fn<F>(f: F) -> Box<dyn EventHandler>
where
    F: FnMut(&dyn Event) + Send + Sync + 'static,
{
    Box::new(ClosureEventHandler { handler: f })
}

#[cfg(test)]
mod tests {
    use super::events::{SelectionChanged, SelectionExported};
    use super::*;

    #[test]
    fn test_publish_reaches_matching_subscribers_only() {
        let bus = EventBus::new();
        let seen = Arc::new(Mutex::new(Vec::new()));

        let sink = seen.clone();
        bus.subscribe::<SelectionChanged>(handler_from_fn(move |event| {
            if let Some(changed) = event.as_any().downcast_ref::<SelectionChanged>() {
                sink.lock().push(changed.selected.clone());
            }
        }));

        bus.publish(SelectionChanged {
            table: "profiles",
            selected: vec![1, 3],
        });
        bus.publish(SelectionExported {
            table: "profiles",
            row_count: 2,
            destination: "out.csv".to_string(),
        });

        assert_eq!(*seen.lock(), vec![vec![1, 3]]);
    }
}

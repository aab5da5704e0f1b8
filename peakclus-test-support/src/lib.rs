//! Test utilities shared by the peakclus crates.

pub mod ci;
pub mod graphs;

pub mod tracing {
    //! A [`Layer`] that records closed spans and emitted events so tests can
    //! assert on instrumentation.
    use std::collections::HashMap;
    use std::fmt;
    use std::sync::{Arc, Mutex};

    use tracing::field::{Field, Visit};
    use tracing::span::{Attributes, Id, Record};
    use tracing::{Event, Level, Subscriber};
    use tracing_subscriber::Layer;
    use tracing_subscriber::layer::{Context, SubscriberExt};
    use tracing_subscriber::registry::LookupSpan;

    /// Shared, cloneable recorder. Clones observe the same buffers.
    #[derive(Clone, Default)]
    pub struct RecordingLayer {
        spans: Arc<Mutex<Vec<SpanRecord>>>,
        events: Arc<Mutex<Vec<EventRecord>>>,
    }

    impl RecordingLayer {
        /// Runs `body` with a fresh recorder installed as the thread-default
        /// subscriber and returns its output together with the recorder.
        ///
        /// # Examples
        /// ```
        /// use peakclus_test_support::tracing::RecordingLayer;
        ///
        /// let (value, layer) = RecordingLayer::capture(|| {
        ///     tracing::info!(nodes = 3, "hello");
        ///     7
        /// });
        /// assert_eq!(value, 7);
        /// assert_eq!(layer.events()[0].message(), Some("hello"));
        /// assert_eq!(layer.events()[0].field("nodes"), Some("3"));
        /// ```
        pub fn capture<T>(body: impl FnOnce() -> T) -> (T, Self) {
            let layer = Self::default();
            let subscriber = tracing_subscriber::registry().with(layer.clone());
            let value = tracing::subscriber::with_default(subscriber, body);
            (value, layer)
        }

        /// Closed spans, in closing order.
        #[must_use]
        pub fn spans(&self) -> Vec<SpanRecord> {
            self.spans.lock().expect("span buffer poisoned").clone()
        }

        /// Emitted events, in emission order.
        #[must_use]
        pub fn events(&self) -> Vec<EventRecord> {
            self.events.lock().expect("event buffer poisoned").clone()
        }

        /// First closed span called `name`.
        #[must_use]
        pub fn span(&self, name: &str) -> Option<SpanRecord> {
            self.spans().into_iter().find(|span| span.name == name)
        }

        /// Returns whether an event at `level` carried exactly `message`.
        #[must_use]
        pub fn saw_message(&self, level: Level, message: &str) -> bool {
            self.events()
                .iter()
                .any(|event| event.level == level && event.message() == Some(message))
        }
    }

    /// A closed span with the fields recorded over its lifetime.
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct SpanRecord {
        /// Span name from its metadata.
        pub name: String,
        /// Field values rendered as strings.
        pub fields: HashMap<String, String>,
    }

    impl SpanRecord {
        /// Rendered value of `name`, if recorded.
        #[must_use]
        pub fn field(&self, name: &str) -> Option<&str> {
            self.fields.get(name).map(String::as_str)
        }
    }

    /// An emitted event.
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct EventRecord {
        /// Event level.
        pub level: Level,
        /// Event target, usually the emitting module path.
        pub target: String,
        /// Field values rendered as strings, including `message`.
        pub fields: HashMap<String, String>,
    }

    impl EventRecord {
        /// Rendered value of `name`, if recorded.
        #[must_use]
        pub fn field(&self, name: &str) -> Option<&str> {
            self.fields.get(name).map(String::as_str)
        }

        /// The formatted event message.
        #[must_use]
        pub fn message(&self) -> Option<&str> {
            self.field("message")
        }
    }

    struct OpenSpan(SpanRecord);

    impl<S> Layer<S> for RecordingLayer
    where
        S: Subscriber + for<'span> LookupSpan<'span>,
    {
        fn on_new_span(&self, attrs: &Attributes<'_>, id: &Id, ctx: Context<'_, S>) {
            let Some(span) = ctx.span(id) else {
                return;
            };
            let mut record = SpanRecord {
                name: attrs.metadata().name().to_owned(),
                fields: HashMap::new(),
            };
            attrs.record(&mut Fields(&mut record.fields));
            span.extensions_mut().insert(OpenSpan(record));
        }

        fn on_record(&self, id: &Id, values: &Record<'_>, ctx: Context<'_, S>) {
            let Some(span) = ctx.span(id) else {
                return;
            };
            let mut extensions = span.extensions_mut();
            if let Some(OpenSpan(record)) = extensions.get_mut::<OpenSpan>() {
                values.record(&mut Fields(&mut record.fields));
            }
        }

        fn on_close(&self, id: Id, ctx: Context<'_, S>) {
            let Some(span) = ctx.span(&id) else {
                return;
            };
            if let Some(OpenSpan(record)) = span.extensions_mut().remove::<OpenSpan>() {
                self.spans.lock().expect("span buffer poisoned").push(record);
            }
        }

        fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
            let mut fields = HashMap::new();
            event.record(&mut Fields(&mut fields));
            let metadata = event.metadata();
            self.events
                .lock()
                .expect("event buffer poisoned")
                .push(EventRecord {
                    level: *metadata.level(),
                    target: metadata.target().to_owned(),
                    fields,
                });
        }
    }

    struct Fields<'a>(&'a mut HashMap<String, String>);

    impl Visit for Fields<'_> {
        fn record_str(&mut self, field: &Field, value: &str) {
            self.0.insert(field.name().to_owned(), value.to_owned());
        }

        fn record_error(&mut self, field: &Field, value: &(dyn std::error::Error + 'static)) {
            self.0.insert(field.name().to_owned(), value.to_string());
        }

        fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
            self.0.insert(field.name().to_owned(), format!("{value:?}"));
        }
    }
}

//! Shared test utilities used across cdfplot crates.

pub mod tracing {
    //! A recording layer for asserting on diagnostics in tests.
    //!
    //! Install it with [`tracing::subscriber::with_default`], which is
    //! thread-local: events emitted on other threads (rayon workers, for
    //! instance) are not captured.
    use std::collections::HashMap;
    use std::fmt;
    use std::sync::{Arc, Mutex};

    use tracing::field::{Field, Visit};
    use tracing::{Event, Level, Subscriber};
    use tracing_subscriber::Layer;
    use tracing_subscriber::layer::{Context, SubscriberExt};
    use tracing_subscriber::registry::{LookupSpan, Registry};

    /// Records the names of opened spans and every emitted event.
    ///
    /// # Examples
    /// ```
    /// use cdfplot_test_support::tracing::RecordingLayer;
    /// use tracing::Level;
    ///
    /// let layer = RecordingLayer::default();
    /// tracing::subscriber::with_default(layer.subscriber(), || {
    ///     tracing::warn!(row = 3, "column missing");
    /// });
    /// let warnings = layer.events_at(Level::WARN);
    /// assert_eq!(warnings.len(), 1);
    /// assert_eq!(warnings[0].message, "column missing");
    /// assert_eq!(warnings[0].field("row"), Some("3"));
    /// ```
    #[derive(Clone, Default)]
    pub struct RecordingLayer {
        spans: Arc<Mutex<Vec<String>>>,
        events: Arc<Mutex<Vec<EventRecord>>>,
    }

    impl RecordingLayer {
        /// A registry with this layer attached, ready for `with_default`.
        #[must_use]
        pub fn subscriber(&self) -> impl Subscriber + Send + Sync + 'static {
            Registry::default().with(self.clone())
        }

        /// Names of the spans opened so far, in creation order.
        #[must_use]
        pub fn span_names(&self) -> Vec<String> {
            self.spans.lock().expect("lock poisoned").clone()
        }

        /// Whether a span called `name` was opened.
        #[must_use]
        pub fn saw_span(&self, name: &str) -> bool {
            self.spans
                .lock()
                .expect("lock poisoned")
                .iter()
                .any(|span| span == name)
        }

        /// Recorded events at exactly `level`.
        #[must_use]
        pub fn events_at(&self, level: Level) -> Vec<EventRecord> {
            self.events
                .lock()
                .expect("lock poisoned")
                .iter()
                .filter(|event| event.level == level)
                .cloned()
                .collect()
        }

        /// Messages of the events at `level`.
        #[must_use]
        pub fn messages_at(&self, level: Level) -> Vec<String> {
            self.events_at(level)
                .into_iter()
                .map(|event| event.message)
                .collect()
        }
    }

    /// Snapshot of one event.
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct EventRecord {
        /// Event level.
        pub level: Level,
        /// Event target, usually the emitting module path.
        pub target: String,
        /// The formatted message, empty when the event had none.
        pub message: String,
        /// Structured fields other than the message.
        pub fields: HashMap<String, String>,
    }

    impl EventRecord {
        /// Value of field `name`, rendered as text.
        #[must_use]
        pub fn field(&self, name: &str) -> Option<&str> {
            self.fields.get(name).map(String::as_str)
        }
    }

    impl<S> Layer<S> for RecordingLayer
    where
        S: Subscriber + for<'span> LookupSpan<'span>,
    {
        fn on_new_span(
            &self,
            attrs: &tracing::span::Attributes<'_>,
            _id: &tracing::span::Id,
            _ctx: Context<'_, S>,
        ) {
            self.spans
                .lock()
                .expect("lock poisoned")
                .push(attrs.metadata().name().to_owned());
        }

        fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
            let mut recorder = FieldRecorder::default();
            event.record(&mut recorder);
            self.events
                .lock()
                .expect("lock poisoned")
                .push(EventRecord {
                    level: *event.metadata().level(),
                    target: event.metadata().target().to_owned(),
                    message: recorder.message,
                    fields: recorder.fields,
                });
        }
    }

    #[derive(Default)]
    struct FieldRecorder {
        message: String,
        fields: HashMap<String, String>,
    }

    impl FieldRecorder {
        fn store(&mut self, field: &Field, value: String) {
            if field.name() == "message" {
                self.message = value;
            } else {
                self.fields.insert(field.name().to_owned(), value);
            }
        }
    }

    impl Visit for FieldRecorder {
        fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
            self.store(field, format!("{value:?}"));
        }

        fn record_str(&mut self, field: &Field, value: &str) {
            self.store(field, value.to_owned());
        }

        fn record_error(&mut self, field: &Field, value: &(dyn std::error::Error + 'static)) {
            self.store(field, value.to_string());
        }

        fn record_bool(&mut self, field: &Field, value: bool) {
            self.store(field, value.to_string());
        }

        fn record_i64(&mut self, field: &Field, value: i64) {
            self.store(field, value.to_string());
        }

        fn record_u64(&mut self, field: &Field, value: u64) {
            self.store(field, value.to_string());
        }

        fn record_f64(&mut self, field: &Field, value: f64) {
            self.store(field, value.to_string());
        }
    }
}

pub mod fixtures {
    //! Temporary directories populated with data files.
    use std::fmt::Display;
    use std::fs;
    use std::io;
    use std::path::{Path, PathBuf};

    use tempfile::TempDir;

    /// A temporary directory removed on drop.
    ///
    /// # Examples
    /// ```
    /// use cdfplot_test_support::fixtures::DataDir;
    ///
    /// let dir = DataDir::new()?;
    /// let input = dir.write_rows("a.txt", [3, 1, 2])?;
    /// assert_eq!(std::fs::read_to_string(input)?, "3\n1\n2\n");
    /// # Ok::<(), std::io::Error>(())
    /// ```
    #[derive(Debug)]
    pub struct DataDir {
        dir: TempDir,
    }

    impl DataDir {
        /// Creates an empty directory.
        ///
        /// # Errors
        /// Returns any error raised while creating the directory.
        pub fn new() -> io::Result<Self> {
            Ok(Self {
                dir: tempfile::tempdir()?,
            })
        }

        /// The directory root.
        #[must_use]
        pub fn path(&self) -> &Path {
            self.dir.path()
        }

        /// Joins `name` onto the root without touching the filesystem.
        #[must_use]
        pub fn join(&self, name: &str) -> PathBuf {
            self.dir.path().join(name)
        }

        /// Writes `contents` verbatim to `name`.
        ///
        /// # Errors
        /// Returns any error raised while writing.
        pub fn write(&self, name: &str, contents: &str) -> io::Result<PathBuf> {
            let path = self.join(name);
            fs::write(&path, contents)?;
            Ok(path)
        }

        /// Writes one row per item, each terminated by a newline.
        ///
        /// # Errors
        /// Returns any error raised while writing.
        pub fn write_rows<I>(&self, name: &str, rows: I) -> io::Result<PathBuf>
        where
            I: IntoIterator,
            I::Item: Display,
        {
            let contents: String = rows.into_iter().map(|row| format!("{row}\n")).collect();
            self.write(name, &contents)
        }

        /// Reads `name` back as text.
        ///
        /// # Errors
        /// Returns any error raised while reading.
        pub fn read(&self, name: &str) -> io::Result<String> {
            fs::read_to_string(self.join(name))
        }
    }
}

//! # Lifecycle Logger
//!
//! A developer-facing logger for component-style UI frameworks that:
//!
//! * **Formats inline markup**: `**bold**`, `*italic*` and `` `code` `` in
//!   messages become ANSI escapes on a terminal or `%c` styles on a console
//! * **Keeps values out of band**: structured values travel next to the text
//!   as `%o` arguments instead of being flattened into it
//! * **Logs lifecycle events once**: render, mount and unmount lines are
//!   reported by one call site per component, numbered per live instance
//! * **Highlights changes**: values that changed since the previous render
//!   are marked in the next message
//!
//! ## Main Components
//!
//! * `compiler`: single-pass markup compiler producing a `Record`
//! * `identity_registry`: slot and instance bookkeeping per owner
//! * `lifecycle`: `LifecycleLogger` and its per-call-site `Tracker`
//! * `sink`: destinations for formatted records
//!
//! ## Quick Start
//!
//! ```
//! use std::sync::Arc;
//! use lifecycle_logger::{
//!     message, ActivationContext, Environment, IdentityRegistry, LifecycleLogger, MemorySink,
//!     OwnerId, Value,
//! };
//!
//! let sink = Arc::new(MemorySink::new());
//! let registry = IdentityRegistry::shared();
//! let logger = LifecycleLogger::new(registry, Environment::terminal(), sink.clone());
//!
//! struct Counter;
//! let mut tracker = logger.attach(&ActivationContext::new(OwnerId::of::<Counter>(), "Counter"));
//!
//! // During render
//! let count = tracker.log_message(message!("count is **{}**", 3));
//! assert!(matches!(count, Some(Value::Number(_))));
//!
//! // After render, then after mount
//! tracker.on_update(&Value::rich("props"));
//! tracker.on_mount();
//!
//! assert_eq!(sink.lines()[1], "count is \u{1b}[1m3\u{1b}[22m");
//! ```

pub mod call_site;
pub mod compiler;
pub mod config;
pub mod error;
pub mod identity_registry;
pub mod lifecycle;
pub mod record;
pub mod separator;
pub mod sink;
pub mod template;
pub mod value;

pub use call_site::{CallSite, CallerFrame};
pub use compiler::{compile, ChangeHints, Environment, StylePolicy, Target};
pub use config::Config;
pub use error::{ConfigError, SinkError};
pub use identity_registry::{
    global_registry, IdentityRegistry, InstanceMarker, OwnerId, SharedRegistry,
};
pub use lifecycle::{ActivationContext, LifecycleLogger, Tracker};
pub use record::{Piece, Record, StyleArg};
pub use sink::{LogSink, MemorySink, Sink, StdoutSink, WriterSink};
pub use template::Message;
pub use value::{RichValue, Value};

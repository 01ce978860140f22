//! Core of the lifecycle logger.
//!
//! This module connects the host framework's lifecycle notifications to the
//! identity registry and the markup compiler.

use std::sync::Arc;

use crate::call_site::{CallSite, CallerFrame};
use crate::compiler::{compile, ChangeHints, Environment};
use crate::config::Config;
use crate::identity_registry::{global_registry, InstanceMarker, OwnerId, SharedRegistry};
use crate::record::Record;
use crate::sink::Sink;
use crate::template::Message;
use crate::value::Value;

/// Index of the slot that reports lifecycle events.
pub const PRIMARY_SLOT: usize = 0;

/// What the host knows about the unit that is currently rendering.
#[derive(Debug, Clone)]
pub struct ActivationContext {
    pub owner: OwnerId,
    /// Display name of the unit, if it has one.
    pub name: Option<String>,
    /// Call stack of the logging call, innermost first.
    pub caller_frames: Vec<CallerFrame>,
}

impl ActivationContext {
    pub fn new(owner: OwnerId, name: impl Into<String>) -> Self {
        Self { owner, name: Some(name.into()), caller_frames: Vec::new() }
    }

    pub fn with_frames(mut self, frames: Vec<CallerFrame>) -> Self {
        self.caller_frames = frames;
        self
    }

    fn label(&self) -> String {
        match self.name.as_deref() {
            Some(name) if !name.is_empty() => format!("`<{}/>`", name),
            _ => "Component".to_string(),
        }
    }
}

struct Shared {
    registry: SharedRegistry,
    environment: Environment,
    sink: Arc<dyn Sink>,
}

/// Entry point of the lifecycle logger.
///
/// Cloning is cheap; clones share the registry and the sink. A disabled
/// logger hands out trackers that only pass values through.
///
/// # Examples
///
/// ```
/// # use std::sync::Arc;
/// # use lifecycle_logger::{
/// #     ActivationContext, Environment, IdentityRegistry, LifecycleLogger, MemorySink, OwnerId,
/// #     Value,
/// # };
/// let sink = Arc::new(MemorySink::new());
/// let registry = IdentityRegistry::shared();
/// let logger = LifecycleLogger::new(registry, Environment::terminal(), sink.clone());
///
/// let context = ActivationContext::new(OwnerId::from_token(1), "App");
/// let mut tracker = logger.attach(&context);
///
/// tracker.log_values(Vec::new());
/// tracker.on_update(&Value::rich("no props"));
/// tracker.on_mount();
/// tracker.on_unmount();
/// assert_eq!(sink.len(), 3);
/// ```
#[derive(Clone)]
pub struct LifecycleLogger {
    shared: Option<Arc<Shared>>,
}

impl LifecycleLogger {
    pub fn new(registry: SharedRegistry, environment: Environment, sink: Arc<dyn Sink>) -> Self {
        Self {
            shared: Some(Arc::new(Shared { registry, environment, sink })),
        }
    }

    /// A logger on the process-wide registry, or a disabled one if the
    /// config says so.
    pub fn from_config(config: &Config, sink: Arc<dyn Sink>) -> Self {
        if config.enabled {
            Self::new(global_registry(), config.environment(), sink)
        } else {
            Self::disabled()
        }
    }

    /// A logger that emits nothing and never touches a registry.
    pub fn disabled() -> Self {
        Self { shared: None }
    }

    pub fn is_enabled(&self) -> bool {
        self.shared.is_some()
    }

    /// Creates the tracker for one logging call site of one activation.
    pub fn attach(&self, context: &ActivationContext) -> Tracker {
        let site = if self.is_enabled() {
            CallSite::from_frames(&context.caller_frames)
        } else {
            CallSite::default()
        };
        Tracker {
            logger: self.clone(),
            owner: context.owner,
            label: context.label(),
            site,
            marker: InstanceMarker::fresh(),
            previous_args: None,
            current_args: Vec::new(),
            pending: None,
            mounted_note: None,
        }
    }
}

/// State of one logging call site within one activation.
///
/// The host calls one of [`Tracker::log_values`] or [`Tracker::log_message`]
/// during every render, then delivers [`Tracker::on_update`] after the render,
/// [`Tracker::on_mount`] once the activation is mounted and
/// [`Tracker::on_unmount`] when it goes away. On the first render the update
/// must be delivered before the mount so the props line comes first.
pub struct Tracker {
    logger: LifecycleLogger,
    owner: OwnerId,
    label: String,
    site: CallSite,
    marker: InstanceMarker,
    previous_args: Option<Vec<Value>>,
    current_args: Vec<Value>,
    pending: Option<Message>,
    mounted_note: Option<String>,
}

impl Tracker {
    /// Logs `values` as `a, b, c` after this render and returns the first one.
    pub fn log_values(&mut self, values: Vec<Value>) -> Option<Value> {
        let first = values.first().cloned();
        if self.logger.is_enabled() {
            self.pending = (!values.is_empty()).then(|| Message::from_values(values.clone()));
            self.current_args = values;
        }
        first
    }

    /// Logs a single value after this render and hands it back.
    pub fn log_value<T: Clone + Into<Value>>(&mut self, value: T) -> T {
        self.log_values(vec![value.clone().into()]);
        value
    }

    /// Logs `message` after this render and returns its first value.
    pub fn log_message(&mut self, message: Message) -> Option<Value> {
        let first = message.values.first().cloned();
        if self.logger.is_enabled() {
            self.current_args = message.values.clone();
            self.pending = (!message.is_empty()).then_some(message);
        }
        first
    }

    /// Post-render notification with the unit's current props.
    pub fn on_update(&mut self, props: &Value) {
        let Some(shared) = self.logger.shared.clone() else { return };

        let (slot, instance) = self.resolve(&shared);
        if slot == PRIMARY_SLOT {
            let message = Message::new(
                vec![
                    format!("{}{} rendered with props: `", self.label, instance_note(instance)),
                    "`.".to_string(),
                ],
                vec![props.clone()],
            );
            emit(&shared, compile(&message, &ChangeHints::new(), None, &shared.environment));
        }

        let current = std::mem::take(&mut self.current_args);
        let pending = self.pending.take();
        let hints = diff_args(self.previous_args.as_deref(), &current);
        self.previous_args = Some(current);

        if let (Some(hints), Some(message)) = (hints, pending) {
            let record = compile(&message, &hints, Some(&self.site.trace), &shared.environment);
            emit(&shared, record);
        }
    }

    /// The activation has been mounted.
    pub fn on_mount(&mut self) {
        let Some(shared) = self.logger.shared.clone() else { return };

        let (slot, instance) = self.resolve(&shared);
        if slot != PRIMARY_SLOT {
            return;
        }
        let note = instance_note(instance);
        let message = Message::text(format!("{}{} mounted.", self.label, note));
        emit(&shared, compile(&message, &ChangeHints::new(), None, &shared.environment));
        self.mounted_note = Some(note);
    }

    /// The activation is going away. Only a tracker that reported a mount
    /// releases its registry entries and reports the unmount.
    pub fn on_unmount(&mut self) {
        let Some(shared) = self.logger.shared.clone() else { return };
        let Some(note) = self.mounted_note.take() else { return };

        {
            let mut registry = shared.registry.lock();
            registry.release_instance(self.owner, self.marker);
            registry.release_slot(self.owner, &self.site.path);
        }
        let message = Message::text(format!("{}{} unmounted.", self.label, note));
        emit(&shared, compile(&message, &ChangeHints::new(), None, &shared.environment));
    }

    pub fn call_site(&self) -> &CallSite {
        &self.site
    }

    /// Slot and instance index. Non-primary slots never claim an instance.
    fn resolve(&self, shared: &Shared) -> (usize, usize) {
        let mut registry = shared.registry.lock();
        let slot = registry.resolve_slot(self.owner, &self.site.path);
        if slot != PRIMARY_SLOT {
            return (slot, 0);
        }
        (slot, registry.resolve_instance(self.owner, self.marker))
    }
}

/// Compares the arguments of two consecutive renders.
///
/// Returns `None` if nothing changed. The first render is a change with no
/// hints; a different argument count marks every position.
pub fn diff_args(previous: Option<&[Value]>, current: &[Value]) -> Option<ChangeHints> {
    let Some(previous) = previous else { return Some(ChangeHints::new()) };
    if previous.len() != current.len() {
        return Some((0..current.len()).collect());
    }
    let hints: ChangeHints = previous
        .iter()
        .zip(current)
        .enumerate()
        .filter(|(_, (before, now))| !before.same(now))
        .map(|(i, _)| i)
        .collect();
    (!hints.is_empty()).then_some(hints)
}

/// `" (N)"` with 1-based numbering, empty for the first instance.
fn instance_note(instance: usize) -> String {
    if instance > 0 {
        format!(" ({})", instance + 1)
    } else {
        String::new()
    }
}

fn emit(shared: &Shared, record: Record) {
    if let Err(err) = shared.sink.write(&record) {
        tracing::warn!(%err, "dropping lifecycle record");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_instance_note() {
        assert_eq!(instance_note(0), "");
        assert_eq!(instance_note(1), " (2)");
        assert_eq!(instance_note(4), " (5)");
    }

    #[test]
    fn test_diff_without_previous_is_a_change() {
        assert_eq!(diff_args(None, &[]), Some(ChangeHints::new()));
    }

    #[test]
    fn test_diff_of_equal_args_is_none() {
        let args = vec![Value::from(1), Value::from("a")];
        assert_eq!(diff_args(Some(args.as_slice()), &args), None);
    }

    #[test]
    fn test_diff_with_length_change_marks_every_position() {
        let before = vec![Value::from(1)];
        let after = vec![Value::from(1), Value::from(2)];
        let hints = diff_args(Some(before.as_slice()), &after).unwrap();
        assert_eq!(hints.positions().collect::<Vec<_>>(), vec![0, 1]);

        let shorter = diff_args(Some(after.as_slice()), &before).unwrap();
        assert_eq!(shorter.positions().collect::<Vec<_>>(), vec![0]);
    }

    #[test]
    fn test_anonymous_label() {
        let context = ActivationContext {
            owner: OwnerId::from_token(1),
            name: None,
            caller_frames: Vec::new(),
        };
        assert_eq!(context.label(), "Component");
        assert_eq!(ActivationContext::new(OwnerId::from_token(1), "App").label(), "`<App/>`");
    }
}

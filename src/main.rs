use std::sync::Arc;

use lifecycle_logger::{
    message, ActivationContext, CallerFrame, Config, LifecycleLogger, OwnerId, StdoutSink, Value,
};
use tracing_subscriber::EnvFilter;

struct Counter;

#[derive(Debug)]
#[allow(dead_code)]
struct CounterProps {
    label: &'static str,
    step: u32,
}

fn counter_frames(line: u32) -> Vec<CallerFrame> {
    vec![
        CallerFrame::new("use_lifecycle_log", "src/lib.rs:1"),
        CallerFrame::new("Counter", format!("src/counter.rs:{}", line)),
        CallerFrame::new("render_tree", "src/host.rs:42"),
    ]
}

/// Walks two counters through a few render cycles, the way a host framework
/// would drive the logger.
fn main() {
    let (writer, _guard) = tracing_appender::non_blocking(std::io::stderr());
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(writer)
        .init();

    let config = Config::from_env().unwrap_or_else(|err| {
        tracing::warn!(%err, "ignoring invalid configuration");
        Config::default()
    });
    let logger = LifecycleLogger::from_config(&config, Arc::new(StdoutSink));

    let owner = OwnerId::of::<Counter>();
    let context = ActivationContext::new(owner, "Counter").with_frames(counter_frames(12));
    let mut first = logger.attach(&context);
    let mut second = logger.attach(&context);

    let props = Value::rich(CounterProps { label: "clicks", step: 1 });
    for tracker in [&mut first, &mut second] {
        tracker.log_message(message!("count is **{}**, label `{}`", 0, "clicks"));
        tracker.on_update(&props);
        tracker.on_mount();
    }

    for count in 1..=2 {
        first.log_message(message!("count is **{}**, label `{}`", count, "clicks"));
        first.on_update(&props);
    }

    first.on_unmount();
    second.on_unmount();
}

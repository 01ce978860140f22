use std::sync::Arc;

use lifecycle_logger::sink::LOG_TARGET;
use lifecycle_logger::{
    message, ActivationContext, Environment, IdentityRegistry, LifecycleLogger, LogSink, OwnerId,
    Value,
};
use log::LevelFilter;
use log4rs::{
    append::file::FileAppender,
    config::{Appender, Config, Logger, Root},
    encode::pattern::PatternEncoder,
};

struct Profile;

fn main() {
    // Plain text only: the file should not receive escape sequences.
    let file_appender = FileAppender::builder()
        .encoder(Box::new(PatternEncoder::new("{d(%Y-%m-%d %H:%M:%S)} - {l} - {m}{n}")))
        .append(false)
        .build("lifecycle.log")
        .unwrap();

    let config = Config::builder()
        .appender(Appender::builder().build("file", Box::new(file_appender)))
        .logger(
            Logger::builder()
                .appender("file")
                .additive(false)
                .build(LOG_TARGET, LevelFilter::Info),
        )
        .build(Root::builder().build(LevelFilter::Warn))
        .unwrap();

    log4rs::init_config(config).unwrap();

    let logger = LifecycleLogger::new(
        IdentityRegistry::shared(),
        Environment::console(),
        Arc::new(LogSink),
    );

    let mut tracker = logger.attach(&ActivationContext::new(OwnerId::of::<Profile>(), "Profile"));
    let user = Value::rich(vec![("name", "ada"), ("role", "admin")]);
    for _ in 0..3 {
        tracker.log_message(message!("loaded user {}", user.clone()));
        tracker.on_update(&Value::rich("{}"));
    }
    tracker.on_mount();
    tracker.on_unmount();

    println!("Done. Check the records with: cat lifecycle.log");
}

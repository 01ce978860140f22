/// Function name of the logging entry point, as it appears in caller frames.
pub const ENTRY_POINT: &str = "use_lifecycle_log";

/// One frame of the host-supplied call stack, innermost first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallerFrame {
    pub function: String,
    pub location: String,
}

impl CallerFrame {
    pub fn new(function: impl Into<String>, location: impl Into<String>) -> Self {
        Self { function: function.into(), location: location.into() }
    }
}

/// Where a logging call comes from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CallSite {
    /// Comma-terminated frame locations down to the owning unit. Used as the
    /// slot key, so two calls through different hook chains get different slots.
    pub path: String,
    /// Location shown after the message as `(@ trace)`.
    pub trace: String,
}

impl CallSite {
    /// Derives the call site from frames, innermost first.
    ///
    /// Frames are walked until the first one that is not a hook (a function
    /// whose name neither starts with `use` nor contains `.use`); that frame
    /// is the owning unit and is included. An empty stack yields an empty path.
    ///
    /// # Examples
    ///
    /// ```
    /// # use lifecycle_logger::call_site::{CallSite, CallerFrame};
    /// let frames = vec![
    ///     CallerFrame::new("use_lifecycle_log", "lib.rs:1"),
    ///     CallerFrame::new("use_counter", "hooks.rs:4"),
    ///     CallerFrame::new("Counter", "counter.rs:9"),
    ///     CallerFrame::new("render", "host.rs:100"),
    /// ];
    /// let site = CallSite::from_frames(&frames);
    /// assert_eq!(site.path, "lib.rs:1,hooks.rs:4,counter.rs:9,");
    /// assert_eq!(site.trace, "counter.rs:9");
    /// ```
    pub fn from_frames(frames: &[CallerFrame]) -> Self {
        let mut site = CallSite::default();

        for frame in frames {
            if frame.location.is_empty() {
                continue;
            }
            site.path.push_str(&frame.location);
            site.path.push(',');

            if !frame.function.is_empty() && !frame.function.starts_with(ENTRY_POINT) {
                site.trace.clone_from(&frame.location);
            }
            if !frame.function.is_empty() && !is_hook(&frame.function) {
                break;
            }
        }
        site
    }
}

fn is_hook(function: &str) -> bool {
    function.starts_with("use")
        || function.match_indices(".use").any(|(i, _)| i > 0 && i + 4 < function.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_method_hooks_are_skipped() {
        let frames = vec![
            CallerFrame::new("use_lifecycle_log", "lib.rs:1"),
            CallerFrame::new("Store.use_store", "store.rs:2"),
            CallerFrame::new("App", "app.rs:3"),
        ];
        let site = CallSite::from_frames(&frames);
        assert_eq!(site.path, "lib.rs:1,store.rs:2,app.rs:3,");
        assert_eq!(site.trace, "app.rs:3");
    }

    #[test]
    fn test_hook_names() {
        assert!(is_hook("use_state"));
        assert!(is_hook("Store.use_store"));
        assert!(is_hook("a.useA.useB"));
        assert!(is_hook(".useA.useB"));
        assert!(!is_hook(".use_store"));
        assert!(!is_hook("Store.use"));
        assert!(!is_hook("render"));
    }

    #[test]
    fn test_empty_stack() {
        assert_eq!(CallSite::from_frames(&[]), CallSite::default());
    }

    #[test]
    fn test_anonymous_frames_do_not_stop_the_walk() {
        let frames = vec![CallerFrame::new("", "anon.rs:1"), CallerFrame::new("App", "app.rs:3")];
        let site = CallSite::from_frames(&frames);
        assert_eq!(site.path, "anon.rs:1,app.rs:3,");
        assert_eq!(site.trace, "app.rs:3");
    }
}

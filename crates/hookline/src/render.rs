//! Plain-text renderers for the debug call log and the registry listing.

use std::fmt::Write;

use crate::debug::DebugCall;
use crate::registry::RegistrySnapshot;

/// Renders the call log, one line per call.
///
/// ```text
/// filter 'title' in src/main.rs (42)
/// trigger 'saved' in src/main.rs (57) - not active
/// ```
pub fn render_call_log(calls: &[DebugCall]) -> String {
    let mut output = String::new();
    for call in calls {
        let _ = write!(
            output,
            "{} '{}' in {} ({})",
            call.kind, call.tag, call.file, call.line
        );
        if !call.found {
            output.push_str(" - not active");
        }
        output.push('\n');
    }
    output
}

/// Renders every registration grouped by tag and priority.
///
/// ```text
/// title
///   100
///     FILTER  trim
///     EVENT   Audit->record
/// ```
pub fn render_listing(snapshot: &RegistrySnapshot) -> String {
    let mut output = String::new();
    for (tag, groups) in snapshot {
        let _ = writeln!(output, "{tag}");
        for group in groups {
            let _ = writeln!(output, "  {}", group.priority);
            for entry in &group.entries {
                let kind = if entry.record.is_filter { "FILTER" } else { "EVENT" };
                let _ = writeln!(output, "    {kind:<7} {}", entry.record.callback.label());
            }
        }
    }
    output
}

#[cfg(test)]
mod tests {
    use std::panic::Location;

    use serde_json::json;

    use super::*;
    use crate::callback::Callback;
    use crate::debug::DispatchKind;
    use crate::registry::HookRegistry;

    #[test]
    fn test_render_call_log() {
        let mut found = DebugCall::new(DispatchKind::Filter, "title", true, Location::caller());
        found.file = "src/main.rs".to_string();
        found.line = 42;
        let mut missing = found.clone();
        missing.kind = DispatchKind::Trigger;
        missing.tag = "saved".to_string();
        missing.found = false;
        missing.line = 57;

        assert_eq!(
            render_call_log(&[found, missing]),
            "filter 'title' in src/main.rs (42)\ntrigger 'saved' in src/main.rs (57) - not active\n"
        );
    }

    #[test]
    fn test_render_listing() {
        let registry = HookRegistry::new();
        registry.add_filter("title", "trim", 100);
        registry.add_event("title", "Audit::record", 100);
        registry.add_filter("title", Callback::closure(|_| Ok(json!(null))), -5);

        let listing = render_listing(&registry.snapshot());
        assert_eq!(
            listing,
            "title\n  -5\n    FILTER  CLOSURE\n  100\n    FILTER  trim\n    EVENT   Audit::record\n"
        );
    }

    #[test]
    fn test_render_empty() {
        assert!(render_call_log(&[]).is_empty());
        assert!(render_listing(&RegistrySnapshot::new()).is_empty());
    }
}

use std::ffi::OsStr;

/// Capability for checking whether a named process is alive. The session only
/// ever needs a yes/no answer, so the trait stays this small and the tests
/// can script it.
pub trait ProcessProbe: Send {
    fn exists(&self, process_name: &str) -> bool;
}

/// Probe backed by a fresh snapshot of the OS process table on every call.
/// Processes that exit between the snapshot and the name comparison simply
/// fail the match.
pub struct SystemProcessMonitor;

impl ProcessProbe for SystemProcessMonitor {
    fn exists(&self, process_name: &str) -> bool {
        use sysinfo::System;

        let s = System::new_all();
        any_name_matches(s.processes().values().map(sysinfo::Process::name), process_name)
    }
}

/// Case-sensitive exact match against a stream of process names.
fn any_name_matches<'a>(mut names: impl Iterator<Item = &'a OsStr>, target: &str) -> bool {
    let target = OsStr::new(target);
    names.any(|name| name == target)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_match_among_unrelated_names() {
        let names = ["explorer.exe", "Discord.exe", "Wuthering Waves.exe"];
        assert!(any_name_matches(
            names.iter().map(OsStr::new),
            "Wuthering Waves.exe"
        ));
    }

    #[test]
    fn test_absent_name_does_not_match() {
        let names = ["explorer.exe", "Discord.exe"];
        assert!(!any_name_matches(
            names.iter().map(OsStr::new),
            "Wuthering Waves.exe"
        ));
    }

    #[test]
    fn test_match_is_case_sensitive() {
        let names = ["wuthering waves.exe"];
        assert!(!any_name_matches(
            names.iter().map(OsStr::new),
            "Wuthering Waves.exe"
        ));
    }

    #[test]
    fn test_live_process_table_has_no_match_for_nonsense_name() {
        let monitor = SystemProcessMonitor;
        assert!(!monitor.exists("definitely-not-a-real-process-1f9a.exe"));
    }
}

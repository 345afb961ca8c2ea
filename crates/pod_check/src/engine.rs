//! Check engine that manages rule registration, configuration, and execution.
//!
//! The `CheckEngine` accepts a `CheckConfig` to control which rules are
//! denied or allowed, then runs each enabled rule over the project.

use std::collections::HashSet;

use pod_config::CheckConfig;
use pod_diagnostics::{DiagnosticSink, Severity};
use pod_netlist::Project;

use crate::rules::register_builtin_rules;
use crate::CheckRule;

/// The engine that orchestrates running check rules on a project.
///
/// Rules are registered at construction time. `allow` and `deny` entries
/// match either a rule's name (`overlapping-windows`) or its code (`E202`).
pub struct CheckEngine {
    /// All registered rules.
    rules: Vec<Box<dyn CheckRule>>,
    /// Rule names or codes promoted to error severity.
    denied: HashSet<String>,
    /// Rule names or codes that are not reported.
    allowed: HashSet<String>,
}

impl CheckEngine {
    /// Creates an engine configured by `config`, with every built-in rule.
    pub fn new(config: &CheckConfig) -> Self {
        let denied: HashSet<String> = config.deny.iter().cloned().collect();
        let allowed: HashSet<String> = config.allow.iter().cloned().collect();

        let mut engine = Self {
            rules: Vec::new(),
            denied,
            allowed,
        };

        register_builtin_rules(&mut engine);
        engine
    }

    /// Creates an engine with default configuration (no overrides).
    pub fn with_defaults() -> Self {
        Self::new(&CheckConfig::default())
    }

    /// Registers a rule with the engine.
    pub fn register(&mut self, rule: Box<dyn CheckRule>) {
        self.rules.push(rule);
    }

    /// Returns the number of registered rules.
    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }

    /// Runs all enabled rules on the project.
    ///
    /// Allowed rules are skipped. Diagnostics of denied rules are promoted
    /// to error severity; the rest keep what the rule emitted.
    pub fn run(&self, project: &Project, sink: &DiagnosticSink) {
        for rule in &self.rules {
            if self.matches(&self.allowed, rule.as_ref()) {
                log::debug!("rule {} suppressed", rule.name());
                continue;
            }

            let temp_sink = DiagnosticSink::new();
            rule.check(project, &temp_sink);

            let is_denied = self.matches(&self.denied, rule.as_ref());
            for mut diag in temp_sink.take_all() {
                if is_denied {
                    diag.severity = Severity::Error;
                }
                sink.emit(diag);
            }
        }
    }

    /// Returns the names of all registered rules.
    pub fn rule_names(&self) -> Vec<&str> {
        self.rules.iter().map(|r| r.name()).collect()
    }

    fn matches(&self, set: &HashSet<String>, rule: &dyn CheckRule) -> bool {
        set.contains(rule.name()) || set.contains(&rule.code().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pod_diagnostics::{Category, Diagnostic, DiagnosticCode, Location};

    struct DummyRule;
    impl CheckRule for DummyRule {
        fn code(&self) -> DiagnosticCode {
            DiagnosticCode::new(Category::Warning, 999)
        }
        fn name(&self) -> &str {
            "dummy-rule"
        }
        fn description(&self) -> &str {
            "a test rule"
        }
        fn default_severity(&self) -> Severity {
            Severity::Warning
        }
        fn check(&self, _project: &Project, sink: &DiagnosticSink) {
            sink.emit(Diagnostic::warning(
                self.code(),
                "dummy warning",
                Location::PROJECT,
            ));
        }
    }

    fn config(deny: &[&str], allow: &[&str]) -> CheckConfig {
        CheckConfig {
            deny: deny.iter().map(|s| s.to_string()).collect(),
            allow: allow.iter().map(|s| s.to_string()).collect(),
        }
    }

    fn dummy_diags(engine: &CheckEngine) -> Vec<Diagnostic> {
        let sink = DiagnosticSink::new();
        engine.run(&Project::new("empty"), &sink);
        sink.take_all()
            .into_iter()
            .filter(|d| d.message == "dummy warning")
            .collect()
    }

    #[test]
    fn engine_registers_builtin_rules() {
        let engine = CheckEngine::with_defaults();
        assert_eq!(engine.rule_count(), 12);
    }

    #[test]
    fn engine_custom_rule() {
        let mut engine = CheckEngine::with_defaults();
        let initial_count = engine.rule_count();
        engine.register(Box::new(DummyRule));
        assert_eq!(engine.rule_count(), initial_count + 1);
    }

    #[test]
    fn engine_run_emits_diagnostics() {
        let mut engine = CheckEngine::with_defaults();
        engine.register(Box::new(DummyRule));
        let diags = dummy_diags(&engine);
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].severity, Severity::Warning);
    }

    #[test]
    fn engine_allow_by_name_suppresses_rule() {
        let mut engine = CheckEngine::new(&config(&[], &["dummy-rule"]));
        engine.register(Box::new(DummyRule));
        assert!(dummy_diags(&engine).is_empty());
    }

    #[test]
    fn engine_allow_by_code_suppresses_rule() {
        let mut engine = CheckEngine::new(&config(&[], &["W999"]));
        engine.register(Box::new(DummyRule));
        assert!(dummy_diags(&engine).is_empty());
    }

    #[test]
    fn engine_deny_promotes_severity() {
        let mut engine = CheckEngine::new(&config(&["dummy-rule"], &[]));
        engine.register(Box::new(DummyRule));
        let diags = dummy_diags(&engine);
        assert_eq!(diags[0].severity, Severity::Error);
    }

    #[test]
    fn engine_rule_names() {
        let engine = CheckEngine::with_defaults();
        let names = engine.rule_names();
        assert!(names.contains(&"asymmetric-connection"));
        assert!(names.contains(&"overlapping-windows"));
        assert!(names.contains(&"unbound-slave"));
    }
}

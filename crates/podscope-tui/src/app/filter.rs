use regex::Regex;

use podscope_types::PodSummary;

/// Compiled filter for the pod table
#[derive(Clone, Debug)]
pub struct PodFilter {
    regex: Regex,

    /// Original pattern string
    pattern: String,
}

impl PodFilter {
    /// Compile a case-insensitive filter
    pub fn new(pattern: &str) -> Result<Self, regex::Error> {
        // Prepend (?i) for case insensitive matching
        let regex = Regex::new(&format!("(?i){}", pattern))?;
        Ok(Self {
            regex,
            pattern: pattern.to_string(),
        })
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Match against name, namespace, status and context
    pub fn matches(&self, pod: &PodSummary) -> bool {
        self.regex.is_match(&pod.name)
            || self.regex.is_match(&pod.namespace)
            || self.regex.is_match(&pod.context)
            || pod
                .status
                .as_deref()
                .is_some_and(|s| self.regex.is_match(s))
    }
}

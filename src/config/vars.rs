//! `${NAME}` / `$NAME` expansion in scalar values.

use std::borrow::Cow;

/// Document-defined variables. Lookups fall back to the process environment, and
/// names found in neither place are left as written.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Variables {
    entries: Vec<(String, String)>,
}

impl Variables {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Later definitions override earlier ones. The value itself is expanded against
    /// the variables defined so far.
    pub fn define(&mut self, name: impl Into<String>, value: &str) {
        let name = name.into();
        let value = self.expand(value).into_owned();
        self.entries.retain(|(n, _)| *n != name);
        self.entries.push((name, value));
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    fn lookup(&self, name: &str) -> Option<String> {
        self.get(name)
            .map(ToString::to_string)
            .or_else(|| std::env::var(name).ok())
    }

    #[must_use]
    pub fn expand<'a>(&self, text: &'a str) -> Cow<'a, str> {
        if !text.contains('$') {
            return Cow::Borrowed(text);
        }
        shellexpand::env_with_context_no_errors(text, |name| self.lookup(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_variables_win_over_environment() {
        let mut vars = Variables::new();
        vars.define("PATH", "/var/log");
        assert_eq!(vars.expand("${PATH}/app.log"), "/var/log/app.log");
    }

    #[test]
    fn unknown_names_stay_verbatim() {
        let vars = Variables::new();
        assert_eq!(
            vars.expand("${LOOMLOG_SURELY_UNDEFINED_VAR}/x"),
            "${LOOMLOG_SURELY_UNDEFINED_VAR}/x"
        );
    }

    #[test]
    fn definitions_can_reference_earlier_ones() {
        let mut vars = Variables::new();
        vars.define("BASE", "/srv");
        vars.define("LOGS", "$BASE/logs");
        assert_eq!(vars.get("LOGS"), Some("/srv/logs"));
    }
}

use std::sync::OnceLock;

use regex::{Captures, Regex};

/// Matches `{{ env.VAR }}` and `{{ env.VAR | default("fallback") }}`
fn placeholder() -> &'static Regex {
    static PLACEHOLDER: OnceLock<Regex> = OnceLock::new();
    PLACEHOLDER.get_or_init(|| {
        Regex::new(r#"\{\{\s*([A-Za-z0-9_.]+)\s*(?:\|\s*default\("([^"]*)"\)\s*)?\}\}"#)
            .expect("placeholder pattern must compile")
    })
}

/// Substitute environment placeholders in raw config text
///
/// `{{ env.NAME }}` becomes the variable's value, and
/// `{{ env.NAME | default("value") }}` falls back to `value` when the
/// variable is unset. Comment lines are copied as they are.
pub fn expand_env(raw: &str) -> Result<String, String> {
    let lines = raw
        .split_inclusive('\n')
        .map(|line| {
            if line.trim_start().starts_with('#') {
                Ok(line.to_owned())
            } else {
                expand_line(line)
            }
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(lines.concat())
}

fn expand_line(line: &str) -> Result<String, String> {
    let mut failure = None;

    let expanded = placeholder().replace_all(line, |captures: &Captures<'_>| {
        match resolve(&captures[1], captures.get(2).map(|m| m.as_str())) {
            Ok(value) => value,
            Err(e) => {
                failure.get_or_insert(e);
                String::new()
            }
        }
    });

    match failure {
        Some(e) => Err(e),
        None => Ok(expanded.into_owned()),
    }
}

fn resolve(key: &str, default: Option<&str>) -> Result<String, String> {
    let Some(name) = key.strip_prefix("env.").filter(|name| !name.contains('.')) else {
        return Err(format!("only `env.` placeholders are supported: `{key}`"));
    };

    match (std::env::var(name), default) {
        (Ok(value), _) => Ok(value),
        (Err(_), Some(default)) => Ok(default.to_owned()),
        (Err(_), None) => Err(format!("environment variable not set: `{name}`")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_without_placeholders_is_unchanged() {
        let input = "[telemetry]\nfilter = \"debug\"\n";
        assert_eq!(expand_env(input).unwrap(), input);
    }

    #[test]
    fn substitutes_variables() {
        let vars = [("FERRY_FILTER", Some("warn")), ("FERRY_FORMAT", Some("json"))];
        temp_env::with_vars(vars, || {
            let result = expand_env("filter = \"{{ env.FERRY_FILTER }}\"\nformat = \"{{env.FERRY_FORMAT}}\"").unwrap();
            assert_eq!(result, "filter = \"warn\"\nformat = \"json\"");
        });
    }

    #[test]
    fn unset_variable_fails() {
        temp_env::with_var_unset("FERRY_UNSET", || {
            let err = expand_env("filter = \"{{ env.FERRY_UNSET }}\"").unwrap_err();
            assert!(err.contains("FERRY_UNSET"));
        });
    }

    #[test]
    fn default_applies_only_when_unset() {
        temp_env::with_var_unset("FERRY_HANDLER", || {
            let result = expand_env("handler = \"{{ env.FERRY_HANDLER | default(\"encode\") }}\"").unwrap();
            assert_eq!(result, "handler = \"encode\"");
        });

        temp_env::with_var("FERRY_HANDLER", Some("passthrough"), || {
            let result = expand_env("handler = \"{{ env.FERRY_HANDLER | default(\"encode\") }}\"").unwrap();
            assert_eq!(result, "handler = \"passthrough\"");
        });
    }

    #[test]
    fn non_env_scope_fails() {
        let err = expand_env("filter = \"{{ vault.FILTER }}\"").unwrap_err();
        assert!(err.contains("only `env.` placeholders"));
    }

    #[test]
    fn comments_are_not_expanded() {
        temp_env::with_var_unset("FERRY_UNSET", || {
            let input = "  # filter = \"{{ env.FERRY_UNSET }}\"\n";
            assert_eq!(expand_env(input).unwrap(), input);
        });
    }
}

//! Placeholder substitution for component templates.
//!
//! Only plain `{{ .Dotted.Path }}` lookups against a JSON context are
//! supported. Any other action between `{{` and `}}` (pipelines, functions,
//! `if`/`range`, the `{{-` and `-}}` trim markers) is rejected rather than
//! passed through into the manifest. Paths that do not resolve render as the
//! empty string. Strings render raw, other scalars in their JSON form, and
//! maps or lists as compact JSON.

use std::sync::OnceLock;

use regex::Regex;
use serde_json::Value;

use crate::domain::ComponentId;
use crate::error::TemplateError;

fn action() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?s)\{\{(.*?)\}\}").expect("action pattern is valid"))
}

fn path() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^\s*\.([A-Za-z0-9_][-A-Za-z0-9_.]*)\s*$").expect("path pattern is valid")
    })
}

/// Substitute every placeholder in `source`, the template of `component`,
/// from `context`.
pub fn render_template(
    component: &ComponentId,
    source: &str,
    context: &Value,
) -> Result<String, TemplateError> {
    let unsupported = |action: &str| TemplateError::UnsupportedAction {
        component: component.clone(),
        action: action.trim().to_string(),
    };

    let mut out = String::with_capacity(source.len());
    let mut last = 0;
    for caps in action().captures_iter(source) {
        let whole = caps.get(0).expect("group 0 is the whole match");
        let inner = &caps[1];
        let key = path().captures(inner).ok_or_else(|| unsupported(inner))?;
        out.push_str(&source[last..whole.start()]);
        if let Some(value) = lookup(context, &key[1]) {
            out.push_str(&display(value));
        }
        last = whole.end();
    }

    let tail = &source[last..];
    if let Some(open) = tail.find("{{") {
        return Err(unsupported(&tail[open..]));
    }
    out.push_str(tail);
    Ok(out)
}

fn lookup<'a>(context: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.')
        .filter(|s| !s.is_empty())
        .try_fold(context, |node, segment| match node {
            Value::Object(map) => map.get(segment),
            Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
            _ => None,
        })
}

fn display(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn render(source: &str, ctx: &Value) -> Result<String, TemplateError> {
        render_template(&ComponentId::from("ui"), source, ctx)
    }

    #[test]
    fn substitutes_nested_paths() {
        let ctx = json!({
            "AppName": "demo",
            "Values": {"ui": {"port": 3000, "debug": true}},
            "env": {"vllm-main": {"ACCELERATOR_ADDRESSES": "0000:01:00.0 0000:02:00.0"}}
        });
        let source = "name: {{ .AppName }}-ui\nport: {{.Values.ui.port}}\ndebug: {{ .Values.ui.debug }}\ndevs: \"{{ .env.vllm-main.ACCELERATOR_ADDRESSES }}\"";

        assert_eq!(
            render(source, &ctx).unwrap(),
            "name: demo-ui\nport: 3000\ndebug: true\ndevs: \"0000:01:00.0 0000:02:00.0\""
        );
    }

    #[test]
    fn missing_paths_render_empty() {
        let ctx = json!({"Values": {}});
        assert_eq!(render("a={{ .Values.nope.deeper }};", &ctx).unwrap(), "a=;");
    }

    #[test]
    fn text_without_placeholders_is_unchanged() {
        let ctx = json!({});
        assert_eq!(
            render("plain: {not: a placeholder}", &ctx).unwrap(),
            "plain: {not: a placeholder}"
        );
    }

    #[test]
    fn lists_are_indexable_and_render_as_json() {
        let ctx = json!({"Values": {"hosts": ["a", "b"], "opts": {"k": 1}}});
        assert_eq!(render("{{ .Values.hosts.1 }}", &ctx).unwrap(), "b");
        assert_eq!(render("{{ .Values.opts }}", &ctx).unwrap(), "{\"k\":1}");
    }

    #[test]
    fn substituted_values_are_not_parsed_again() {
        let ctx = json!({"Values": {"raw": "{{ if }}"}});
        assert_eq!(render("x: {{ .Values.raw }}", &ctx).unwrap(), "x: {{ if }}");
    }

    #[test]
    fn actions_other_than_plain_paths_are_rejected() {
        let ctx = json!({"Values": {"debug": true, "name": "a"}});

        for (source, action) in [
            ("{{- .Values.debug -}}", "- .Values.debug -"),
            ("{{ .Values.name | upper }}", ".Values.name | upper"),
            ("{{ if .Values.debug }}x{{ end }}", "if .Values.debug"),
            ("{{ printf \"%s\" .Values.name }}", "printf \"%s\" .Values.name"),
            ("name: {{ .Values.name", "{{ .Values.name"),
        ] {
            let err = render(source, &ctx).unwrap_err();
            assert!(
                matches!(
                    &err,
                    TemplateError::UnsupportedAction { component, action: a }
                        if component.as_str() == "ui" && a == action
                ),
                "{source}: {err}"
            );
        }
    }
}

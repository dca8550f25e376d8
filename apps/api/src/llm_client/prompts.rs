// Shared prompt fragments and template filling.
// Each flow that needs LLM calls defines its own prompts.rs alongside it;
// cross-cutting instructions live here.

/// Appended to every prompt whose reply goes through `JsonExtractor`.
pub const JSON_ONLY_INSTRUCTION: &str = "Provide ONLY the clean JSON object as the output. \
    Do NOT include any text outside the JSON object. \
    Do NOT include explanations or apologies.";

/// Fills `{name}` placeholders in one pass. Substituted values are never
/// rescanned, so resume or JD text containing `{...}` is embedded verbatim.
/// Unknown placeholders are left in place.
pub fn fill_template(template: &str, vars: &[(&str, &str)]) -> String {
    let extra: usize = vars.iter().map(|(_, v)| v.len()).sum();
    let mut out = String::with_capacity(template.len() + extra);
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let candidate = &rest[open..];

        let hit = vars.iter().find_map(|(name, value)| {
            let key_len = name.len() + 2;
            let matches = candidate.len() >= key_len
                && candidate[1..].starts_with(name)
                && candidate[1 + name.len()..].starts_with('}');
            matches.then_some((key_len, *value))
        });

        match hit {
            Some((key_len, value)) => {
                out.push_str(value);
                rest = &candidate[key_len..];
            }
            None => {
                out.push('{');
                rest = &candidate[1..];
            }
        }
    }

    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fill_template_replaces_known_placeholders() {
        let out = fill_template("Hello {name}, score {score}.", &[("name", "Ada"), ("score", "91")]);
        assert_eq!(out, "Hello Ada, score 91.");
    }

    #[test]
    fn test_fill_template_does_not_rescan_values() {
        let out = fill_template("A={a} B={b}", &[("a", "{b}"), ("b", "x")]);
        assert_eq!(out, "A={b} B=x");
    }

    #[test]
    fn test_fill_template_keeps_json_braces_and_unknown_keys() {
        let out = fill_template("{\"k\": 1} {missing} {v}", &[("v", "ok")]);
        assert_eq!(out, "{\"k\": 1} {missing} ok");
    }

    #[test]
    fn test_fill_template_repeated_placeholder() {
        assert_eq!(fill_template("{x}-{x}", &[("x", "1")]), "1-1");
    }
}

//! `requirements.txt` parser and shared Python name normalization

use super::push_dependency;
use regex::Regex;
use std::sync::OnceLock;

fn name_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\s*([A-Za-z0-9_\-]+)").expect("name regex is valid"))
}

/// Reduces a requirement specifier to its lower-cased distribution name.
///
/// `"psycopg2-binary>=2.9.0"` becomes `"psycopg2-binary"`.
pub fn dependency_name(spec: &str) -> Option<String> {
    name_re()
        .captures(spec)
        .map(|caps| caps[1].to_lowercase())
}

pub fn parse(content: &str) -> Vec<String> {
    let mut deps = Vec::new();

    for line in content.lines() {
        let line = match line.find('#') {
            Some(idx) => &line[..idx],
            None => line,
        }
        .trim();

        if line.is_empty() || line.starts_with('-') {
            continue;
        }

        if let Some(name) = dependency_name(line) {
            push_dependency(&mut deps, name);
        }
    }

    deps
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dependency_name() {
        assert_eq!(
            dependency_name("psycopg2-binary>=2.9.0").as_deref(),
            Some("psycopg2-binary")
        );
        assert_eq!(dependency_name("Django==5.0").as_deref(), Some("django"));
        assert_eq!(dependency_name("requests[socks]").as_deref(), Some("requests"));
        assert_eq!(
            dependency_name("prometheus_client ~= 0.19").as_deref(),
            Some("prometheus_client")
        );
        assert_eq!(dependency_name(">=1.0"), None);
    }

    #[test]
    fn test_parse_skips_comments_and_options() {
        let content = r#"
# web
flask==3.0.0  # pinned
-r base.txt
--index-url https://example.com/simple
celery[redis]>=5.3

Flask>=2.0
"#;
        assert_eq!(parse(content), vec!["flask", "celery"]);
    }
}

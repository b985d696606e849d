//! `${VAR_NAME}` expansion for channel settings.

use crate::traits::NotifyError;

/// Resolve `${VAR_NAME}` patterns in a string using `std::env::var`.
///
/// Returns an error if a referenced variable is not set or a reference
/// is left unclosed.
pub(crate) fn resolve_env_vars(input: &str) -> Result<String, NotifyError> {
    let mut result = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch != '$' || chars.peek() != Some(&'{') {
            result.push(ch);
            continue;
        }

        chars.next();
        let mut var_name = String::new();
        let mut closed = false;
        for c in chars.by_ref() {
            if c == '}' {
                closed = true;
                break;
            }
            var_name.push(c);
        }
        if !closed {
            return Err(NotifyError::Config(format!(
                "unclosed env var reference in: {input}"
            )));
        }
        let value = std::env::var(&var_name)
            .map_err(|_| NotifyError::Config(format!("env var not found: {var_name}")))?;
        result.push_str(&value);
    }

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_single_reference() {
        std::env::set_var("KBN_ENV_TOKEN", "abc123");
        assert_eq!(resolve_env_vars("${KBN_ENV_TOKEN}").unwrap(), "abc123");
        std::env::remove_var("KBN_ENV_TOKEN");
    }

    #[test]
    fn resolves_embedded_references() {
        std::env::set_var("KBN_ENV_PROTO", "https");
        std::env::set_var("KBN_ENV_HOST", "hooks.test");
        let result = resolve_env_vars("${KBN_ENV_PROTO}://${KBN_ENV_HOST}/v1").unwrap();
        assert_eq!(result, "https://hooks.test/v1");
        std::env::remove_var("KBN_ENV_PROTO");
        std::env::remove_var("KBN_ENV_HOST");
    }

    #[test]
    fn missing_variable() {
        match resolve_env_vars("${KBN_ENV_ABSOLUTELY_NOT_SET}").unwrap_err() {
            NotifyError::Config(msg) => assert!(msg.contains("KBN_ENV_ABSOLUTELY_NOT_SET")),
            other => panic!("expected Config error, got: {other:?}"),
        }
    }

    #[test]
    fn unclosed_reference() {
        match resolve_env_vars("https://${UNCLOSED/hook").unwrap_err() {
            NotifyError::Config(msg) => assert!(msg.contains("unclosed")),
            other => panic!("expected Config error, got: {other:?}"),
        }
    }

    #[test]
    fn plain_text_and_lone_dollar() {
        assert_eq!(resolve_env_vars("price $5").unwrap(), "price $5");
    }
}

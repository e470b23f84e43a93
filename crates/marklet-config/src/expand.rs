//! `$VAR`, `${VAR}` and `${VAR:-default}` references in string settings.

use crate::ConfigError;

/// Substitute environment variables in the value of `field`.
///
/// A reference to an unset variable without a default is an error naming
/// both the field and the variable. Values without `$` are returned as is.
pub(crate) fn expand_vars(value: &str, field: &str) -> Result<String, ConfigError> {
    if !value.contains('$') {
        return Ok(value.to_owned());
    }

    match shellexpand::env(value) {
        Ok(expanded) => Ok(expanded.into_owned()),
        Err(err) => Err(ConfigError::EnvVar {
            field: field.to_owned(),
            message: format!("${{{}}}: {}", err.var_name, err.cause),
        }),
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn with_var<T>(name: &str, value: Option<&str>, f: impl FnOnce() -> T) -> T {
        // SAFETY: every test uses its own variable name
        unsafe {
            match value {
                Some(value) => std::env::set_var(name, value),
                None => std::env::remove_var(name),
            }
        }
        let result = f();
        unsafe {
            std::env::remove_var(name);
        }
        result
    }

    #[test]
    fn test_braced_reference() {
        let language = with_var("MARKLET_EXPAND_BRACED", Some("rust"), || {
            expand_vars("${MARKLET_EXPAND_BRACED}", "format.language")
        });
        assert_eq!(language.unwrap(), "rust");
    }

    #[test]
    fn test_bare_reference() {
        let language = with_var("MARKLET_EXPAND_BARE", Some("go"), || {
            expand_vars("lang-$MARKLET_EXPAND_BARE", "format.language")
        });
        assert_eq!(language.unwrap(), "lang-go");
    }

    #[test]
    fn test_default_for_unset_variable() {
        let mode = with_var("MARKLET_EXPAND_DEFAULT", None, || {
            expand_vars("${MARKLET_EXPAND_DEFAULT:-markdown}", "format.mode")
        });
        assert_eq!(mode.unwrap(), "markdown");

        let language = with_var("MARKLET_EXPAND_EMPTY", None, || {
            expand_vars("${MARKLET_EXPAND_EMPTY:-}", "format.language")
        });
        assert_eq!(language.unwrap(), "");
    }

    #[test]
    fn test_unset_variable_names_field_and_variable() {
        let err = with_var("MARKLET_EXPAND_MISSING", None, || {
            expand_vars("${MARKLET_EXPAND_MISSING}", "format.language")
        })
        .unwrap_err();

        assert!(matches!(err, ConfigError::EnvVar { .. }));
        let message = err.to_string();
        assert!(message.contains("format.language"));
        assert!(message.contains("MARKLET_EXPAND_MISSING"));
    }

    #[test]
    fn test_plain_value_untouched() {
        assert_eq!(expand_vars("python", "format.language").unwrap(), "python");
    }
}

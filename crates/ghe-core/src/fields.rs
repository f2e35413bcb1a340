//! Accessors for records whose every field is optional.
//!
//! API records model each attribute as `Option<T>` so that a field the caller
//! never set is omitted from the request body, while an explicit `""`, `0` or
//! `false` is still sent. [`optional_fields!`](crate::optional_fields)
//! generates, per field:
//!
//! - a `with_*` builder that marks the field present,
//! - a reader returning the value, or the type's zero value when absent,
//!
//! plus a `Display` impl listing only the present fields. Nested records are
//! shown through their own `Display`.
//!
//! The zero-value readers are a convenience. A reader returning `""` or
//! `false` does not mean the server sent that value; inspect the `Option`
//! field directly when the distinction matters.
//!
//! Field kinds:
//!
//! - `text`: `Option<String>`, read as `&str`, set from `impl Into<String>`
//! - `value`: `Option<T>` with `T: Copy + Default`, read as `T`
//! - `record`: `Option<T>` for nested records, read as `Option<&T>`

/// Generate `with_*` builders, zero-value readers and `Display` for an
/// optional-field record.
///
/// ```
/// use ghe_core::optional_fields;
///
/// #[derive(Debug, Default)]
/// pub struct Team {
///     pub id: Option<i64>,
///     pub name: Option<String>,
/// }
///
/// optional_fields!(Team {
///     id: value i64 => id, with_id;
///     name: text String => name, with_name;
/// });
///
/// let team = Team::default().with_name("ops");
/// assert_eq!(team.name(), "ops");
/// assert_eq!(team.id(), 0);
/// assert!(team.id.is_none());
/// assert_eq!(team.to_string(), r#"Team{name:"ops"}"#);
/// ```
#[macro_export]
macro_rules! optional_fields {
    ($record:ident { $( $field:ident : $kind:ident $inner:ty => $get:ident, $with:ident; )* }) => {
        impl $record {
            $( $crate::optional_fields!(@accessors $kind $field: $inner => $get, $with); )*
        }

        impl ::std::fmt::Display for $record {
            #[allow(unused_assignments, unused_mut)]
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                f.write_str(stringify!($record))?;
                f.write_str("{")?;
                let mut sep = "";
                $(
                    if let Some(value) = &self.$field {
                        write!(f, "{}{}:", sep, stringify!($field))?;
                        $crate::optional_fields!(@show $kind f, value)?;
                        sep = ", ";
                    }
                )*
                f.write_str("}")
            }
        }
    };

    (@show record $f:ident, $value:ident) => {
        ::std::fmt::Display::fmt($value, $f)
    };

    (@show $kind:ident $f:ident, $value:ident) => {
        ::std::fmt::Debug::fmt($value, $f)
    };

    (@accessors text $field:ident : $inner:ty => $get:ident, $with:ident) => {
        #[doc = concat!("Returns `", stringify!($field), "`, or `\"\"` when absent.")]
        #[must_use]
        pub fn $get(&self) -> &str {
            self.$field.as_deref().unwrap_or_default()
        }

        #[doc = concat!("Sets `", stringify!($field), "` as present.")]
        #[must_use]
        pub fn $with(mut self, value: impl Into<String>) -> Self {
            self.$field = Some(value.into());
            self
        }
    };

    (@accessors value $field:ident : $inner:ty => $get:ident, $with:ident) => {
        #[doc = concat!("Returns `", stringify!($field), "`, or the zero value when absent.")]
        #[must_use]
        pub fn $get(&self) -> $inner {
            self.$field.unwrap_or_default()
        }

        #[doc = concat!("Sets `", stringify!($field), "` as present.")]
        #[must_use]
        pub fn $with(mut self, value: $inner) -> Self {
            self.$field = Some(value);
            self
        }
    };

    (@accessors record $field:ident : $inner:ty => $get:ident, $with:ident) => {
        #[doc = concat!("Returns `", stringify!($field), "` when present.")]
        #[must_use]
        pub fn $get(&self) -> Option<&$inner> {
            self.$field.as_ref()
        }

        #[doc = concat!("Sets `", stringify!($field), "` as present.")]
        #[must_use]
        pub fn $with(mut self, value: $inner) -> Self {
            self.$field = Some(value);
            self
        }
    };
}

#[cfg(test)]
mod tests {
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
    struct Quota {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        limit: Option<i64>,
    }

    optional_fields!(Quota {
        limit: value i64 => limit, with_limit;
    });

    #[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
    struct Account {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        login: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        disabled: Option<bool>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        quota: Option<Quota>,
    }

    optional_fields!(Account {
        login: text String => login, with_login;
        disabled: value bool => disabled, with_disabled;
        quota: record Quota => quota, with_quota;
    });

    #[test]
    fn readers_return_zero_values_for_absent_fields() {
        let account = Account::default();
        assert_eq!(account.login(), "");
        assert!(!account.disabled());
        assert!(account.quota().is_none());
    }

    #[test]
    fn builders_mark_fields_present() {
        let account = Account::default()
            .with_login("hubot")
            .with_disabled(false)
            .with_quota(Quota::default().with_limit(5));

        assert_eq!(account.login.as_deref(), Some("hubot"));
        assert_eq!(account.disabled, Some(false));
        assert_eq!(account.quota().map(Quota::limit), Some(5));
    }

    #[test]
    fn zero_value_is_not_absent() {
        let absent = Account::default();
        let explicit = Account::default().with_disabled(false);
        assert_ne!(absent, explicit);
        assert_eq!(absent.disabled(), explicit.disabled());
    }

    #[test]
    fn display_lists_present_fields_only() {
        assert_eq!(Account::default().to_string(), "Account{}");

        let account = Account::default()
            .with_login("hubot")
            .with_quota(Quota::default().with_limit(5));
        assert_eq!(
            account.to_string(),
            r#"Account{login:"hubot", quota:Quota{limit:5}}"#
        );
    }

    #[test]
    fn serialization_skips_absent_fields() {
        let account = Account::default().with_login("").with_disabled(false);
        let json = serde_json::to_value(&account).unwrap();
        assert_eq!(json, serde_json::json!({"login": "", "disabled": false}));

        let decoded: Account = serde_json::from_value(json).unwrap();
        assert_eq!(decoded, account);
    }
}

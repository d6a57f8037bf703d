use crate::error::CoercionError;
use crate::ids::Id;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

type Convert<T> = dyn Fn(Value) -> Result<T, serde_json::Error> + Send + Sync;

/// Describes how the raw `result` of a call becomes a `T`.
///
/// `ReturnType::of()` deserializes straight into `T`. When calls of one batch
/// return different types, give each call a `ReturnType::map` that lifts its
/// own payload type into a shared enum:
///
/// ```
/// use jrpc_core::{Id, ReturnType};
/// use serde_json::json;
///
/// #[derive(Debug, PartialEq)]
/// enum Reply {
///     Count(u32),
///     Name(String),
/// }
///
/// let count: ReturnType<Reply> = ReturnType::map(Reply::Count);
/// let name: ReturnType<Reply> = ReturnType::map(Reply::Name);
/// assert_eq!(count.coerce(&Id::Number(1), json!(3)).unwrap(), Reply::Count(3));
/// assert_eq!(name.coerce(&Id::Number(2), json!("Tampa")).unwrap(), Reply::Name("Tampa".into()));
/// ```
pub struct ReturnType<T> {
    type_name: &'static str,
    convert: Arc<Convert<T>>,
}

impl<T: DeserializeOwned + 'static> ReturnType<T> {
    pub fn of() -> Self {
        ReturnType {
            type_name: std::any::type_name::<T>(),
            convert: Arc::new(|value| serde_json::from_value(value)),
        }
    }
}

impl<T: 'static> ReturnType<T> {
    pub fn map<U, F>(f: F) -> Self
    where
        U: DeserializeOwned,
        F: Fn(U) -> T + Send + Sync + 'static,
    {
        ReturnType {
            type_name: std::any::type_name::<U>(),
            convert: Arc::new(move |value| serde_json::from_value::<U>(value).map(&f)),
        }
    }

    /// Fully custom conversion. `type_name` only shows up in error messages.
    pub fn with<F>(type_name: &'static str, f: F) -> Self
    where
        F: Fn(Value) -> Result<T, serde_json::Error> + Send + Sync + 'static,
    {
        ReturnType {
            type_name,
            convert: Arc::new(f),
        }
    }
}

impl<T> ReturnType<T> {
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    pub fn coerce(&self, id: &Id, value: Value) -> Result<T, CoercionError> {
        (self.convert)(value).map_err(|source| CoercionError {
            id: id.clone(),
            type_name: self.type_name,
            source,
        })
    }
}

impl<T> Clone for ReturnType<T> {
    fn clone(&self) -> Self {
        ReturnType {
            type_name: self.type_name,
            convert: Arc::clone(&self.convert),
        }
    }
}

impl<T> fmt::Debug for ReturnType<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ReturnType").field(&self.type_name).finish()
    }
}

//! # Bridge Adapter
//!
//! The synchronous call/response surface between a host shell and the
//! store. A [`Call`] carries a method name and a JSON object of arguments;
//! [`dispatch`] marshals arguments, invokes [`ItemStore`], and wraps the
//! outcome in a [`Response`].
//!
//! The adapter's only job is argument marshaling — all logic lives in the
//! store. One shared dispatcher serves every host (CLI subcommands, the
//! line-delimited `serve` loop, or an embedding application), replacing
//! per-platform copies of the same handler.
//!
//! ## Error surface
//!
//! Exactly two error shapes cross this boundary:
//! - `INVALID_ARGUMENT`: a required argument is absent or mistyped.
//! - `NOT_IMPLEMENTED`: unknown method name.
//!
//! Storage and parse failures never appear here; the store has already
//! converted them to its null/false/empty sentinels.

use crate::store::{ItemStore, PrefsBackend};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub const INVALID_ARGUMENT: &str = "INVALID_ARGUMENT";
pub const NOT_IMPLEMENTED: &str = "NOT_IMPLEMENTED";

/// One bridge invocation: a method name plus named arguments.
#[derive(Debug, Clone, Deserialize)]
pub struct Call {
    pub method: String,
    #[serde(default)]
    pub arguments: Map<String, Value>,
}

impl Call {
    pub fn new(method: &str) -> Self {
        Self {
            method: method.to_string(),
            arguments: Map::new(),
        }
    }

    pub fn arg(mut self, name: &str, value: Value) -> Self {
        self.arguments.insert(name.to_string(), value);
        self
    }

    fn string_arg(&self, name: &str) -> Option<&str> {
        self.arguments.get(name).and_then(Value::as_str)
    }

    fn int_arg(&self, name: &str) -> Option<i64> {
        self.arguments.get(name).and_then(Value::as_i64)
    }
}

/// Outcome of a bridge invocation.
///
/// Serializes as `{"result": ...}` or
/// `{"error": {"code": ..., "message": ...}}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Response {
    #[serde(rename = "result")]
    Result(Value),
    #[serde(rename = "error")]
    Error { code: String, message: String },
}

impl Response {
    pub fn result(value: Value) -> Self {
        Response::Result(value)
    }

    pub fn error(code: &str, message: &str) -> Self {
        Response::Error {
            code: code.to_string(),
            message: message.to_string(),
        }
    }

    fn invalid_argument(message: &str) -> Self {
        Self::error(INVALID_ARGUMENT, message)
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Response::Error { .. })
    }
}

/// Marshal one call onto the store.
pub fn dispatch<B: PrefsBackend>(store: &ItemStore<B>, call: &Call) -> Response {
    match call.method.as_str() {
        "saveItem" => match call.string_arg("item") {
            Some(item) => Response::result(option_to_value(store.save(item))),
            None => Response::invalid_argument("Item cannot be null"),
        },
        "getItems" => Response::result(Value::String(store.get_all())),
        "getItemById" => match call.string_arg("itemId") {
            Some(id) => Response::result(option_to_value(store.get_by_id(id))),
            None => Response::invalid_argument("ItemId cannot be null"),
        },
        "updateItem" => match call.string_arg("item") {
            Some(item) => Response::result(option_to_value(store.update(item))),
            None => Response::invalid_argument("Item cannot be null"),
        },
        "deleteItem" => match call.string_arg("itemId") {
            Some(id) => Response::result(Value::Bool(store.delete(id))),
            None => Response::invalid_argument("ItemId cannot be null"),
        },
        "clearItems" => Response::result(Value::Bool(store.clear())),
        "isProductSaved" => match call.int_arg("productId") {
            Some(product_id) => Response::result(Value::Bool(store.is_product_saved(product_id))),
            None => Response::invalid_argument("ProductId cannot be null"),
        },
        other => Response::error(NOT_IMPLEMENTED, &format!("Unknown method: {other}")),
    }
}

fn option_to_value(value: Option<String>) -> Value {
    match value {
        Some(s) => Value::String(s),
        None => Value::Null,
    }
}

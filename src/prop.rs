//! Raw field values and template coercion.
//!
//! Authors hand [`Prop`]s to node builders. A `Prop` may embed reactive
//! references anywhere inside lists and maps; [`coerce`] walks the whole
//! value and turns every [`Rx`] into its `{{ ... }}` string, producing a
//! plain `serde_json::Value` that the rest of the pipeline validates.

use serde::{Serialize, Serializer};
use serde_json::{Map, Number, Value};

use crate::rx::Rx;

#[derive(Debug, Clone, PartialEq)]
pub enum Prop {
    Null,
    Bool(bool),
    Number(Number),
    String(String),
    Rx(Rx),
    List(Vec<Prop>),
    Map(Vec<(String, Prop)>),
    /// Already-plain JSON; passes through coercion untouched.
    Json(Value),
}

impl Prop {
    /// Builds a map prop from `(key, value)` pairs, keeping their order.
    pub fn map<K, V, I>(entries: I) -> Prop
    where
        K: Into<String>,
        V: Into<Prop>,
        I: IntoIterator<Item = (K, V)>,
    {
        Prop::Map(
            entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Prop::Null | Prop::Json(Value::Null))
    }

    pub fn to_value(&self) -> Value {
        coerce(self.clone())
    }
}

/// Replaces every embedded reactive reference with its template string.
pub fn coerce(prop: Prop) -> Value {
    match prop {
        Prop::Null => Value::Null,
        Prop::Bool(b) => Value::Bool(b),
        Prop::Number(n) => Value::Number(n),
        Prop::String(s) => Value::String(s),
        Prop::Rx(rx) => {
            tracing::trace!(key = rx.key(), "coercing reactive reference");
            Value::String(rx.to_template())
        }
        Prop::List(items) => Value::Array(items.into_iter().map(coerce).collect()),
        Prop::Map(entries) => {
            let mut map = Map::new();
            for (key, value) in entries {
                map.insert(key, coerce(value));
            }
            Value::Object(map)
        }
        Prop::Json(value) => value,
    }
}

impl Serialize for Prop {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_value().serialize(serializer)
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// CONVERSIONS
// ═══════════════════════════════════════════════════════════════════════════════

impl From<Rx> for Prop {
    fn from(rx: Rx) -> Self {
        Prop::Rx(rx)
    }
}

impl From<&Rx> for Prop {
    fn from(rx: &Rx) -> Self {
        Prop::Rx(rx.clone())
    }
}

impl From<&str> for Prop {
    fn from(s: &str) -> Self {
        Prop::String(s.to_string())
    }
}

impl From<String> for Prop {
    fn from(s: String) -> Self {
        Prop::String(s)
    }
}

impl From<bool> for Prop {
    fn from(b: bool) -> Self {
        Prop::Bool(b)
    }
}

macro_rules! number_prop {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Prop {
                fn from(n: $ty) -> Self {
                    Prop::Number(Number::from(n))
                }
            }
        )*
    };
}

number_prop!(i32, i64, u32, u64, usize);

impl From<f64> for Prop {
    fn from(n: f64) -> Self {
        Number::from_f64(n).map(Prop::Number).unwrap_or(Prop::Null)
    }
}

impl From<Value> for Prop {
    fn from(value: Value) -> Self {
        Prop::Json(value)
    }
}

impl<T: Into<Prop>> From<Option<T>> for Prop {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(Prop::Null)
    }
}

impl<T: Into<Prop>> From<Vec<T>> for Prop {
    fn from(items: Vec<T>) -> Self {
        Prop::List(items.into_iter().map(Into::into).collect())
    }
}

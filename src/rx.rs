//! Reactive references.
//!
//! An [`Rx`] is a deferred expression over client state. It never holds a
//! value; it holds the expression text, and turns into a `{{ ... }}`
//! template string when it lands in a node field.
//!
//! ```ignore
//! let count = Rx::new("count");
//! let label = (count.clone() + 1).gt(10).then("many", "few");
//! assert_eq!(label.to_string(), "{{ ((count + 1) > 10) ? 'many' : 'few' }}");
//! ```

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Serialize, Serializer};
use serde_json::Value;
use std::fmt;
use std::ops::{Add, Div, Mul, Neg, Not, Rem, Sub};

lazy_static! {
    /// `user.address.city`, `items[0].name` and friends: no operator, no
    /// parentheses needed when used as an operand.
    static ref PATH_RE: Regex =
        Regex::new(r"^[a-zA-Z_$][a-zA-Z0-9_$]*(\.[a-zA-Z0-9_$]+|\[\d+\])*$").unwrap();
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Rx {
    key: String,
}

impl Rx {
    pub fn new(key: impl Into<String>) -> Self {
        Rx { key: key.into() }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// `rx.field("name")` is `rx.name` in the expression language.
    pub fn field(&self, name: &str) -> Rx {
        Rx::new(format!("{}.{}", self.operand_text(), name))
    }

    pub fn index(&self, i: usize) -> Rx {
        Rx::new(format!("{}[{}]", self.operand_text(), i))
    }

    pub fn to_template(&self) -> String {
        format!("{{{{ {} }}}}", self.key)
    }

    /// True when the key is a bare state path rather than a compound
    /// expression.
    pub fn is_path(&self) -> bool {
        PATH_RE.is_match(&self.key)
    }

    fn operand_text(&self) -> String {
        if self.is_path() {
            self.key.clone()
        } else {
            format!("({})", self.key)
        }
    }

    fn binary(&self, op: &str, rhs: Operand) -> Rx {
        Rx::new(format!("{} {} {}", self.operand_text(), op, rhs.render()))
    }

    pub fn eq_to(&self, rhs: impl Into<Operand>) -> Rx {
        self.binary("==", rhs.into())
    }

    pub fn ne_to(&self, rhs: impl Into<Operand>) -> Rx {
        self.binary("!=", rhs.into())
    }

    pub fn gt(&self, rhs: impl Into<Operand>) -> Rx {
        self.binary(">", rhs.into())
    }

    pub fn ge(&self, rhs: impl Into<Operand>) -> Rx {
        self.binary(">=", rhs.into())
    }

    pub fn lt(&self, rhs: impl Into<Operand>) -> Rx {
        self.binary("<", rhs.into())
    }

    pub fn le(&self, rhs: impl Into<Operand>) -> Rx {
        self.binary("<=", rhs.into())
    }

    pub fn and(&self, rhs: impl Into<Operand>) -> Rx {
        self.binary("&&", rhs.into())
    }

    pub fn or(&self, rhs: impl Into<Operand>) -> Rx {
        self.binary("||", rhs.into())
    }

    /// Ternary: `cond ? yes : no`.
    pub fn then(&self, yes: impl Into<Operand>, no: impl Into<Operand>) -> Rx {
        Rx::new(format!(
            "{} ? {} : {}",
            self.operand_text(),
            yes.into().render(),
            no.into().render()
        ))
    }

    pub fn pipe(&self, filter: &str) -> Rx {
        Rx::new(format!("{} | {}", self.operand_text(), filter))
    }

    pub fn pipe_with(&self, filter: &str, arg: impl Into<Operand>) -> Rx {
        Rx::new(format!(
            "{} | {}:{}",
            self.operand_text(),
            filter,
            arg.into().render()
        ))
    }

    pub fn length(&self) -> Rx {
        self.pipe("length")
    }

    pub fn upper(&self) -> Rx {
        self.pipe("upper")
    }

    pub fn lower(&self) -> Rx {
        self.pipe("lower")
    }

    pub fn currency(&self) -> Rx {
        self.pipe("currency")
    }

    pub fn percent(&self) -> Rx {
        self.pipe("percent")
    }
}

impl fmt::Display for Rx {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{{{ {} }}}}", self.key)
    }
}

impl Serialize for Rx {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_template())
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// OPERANDS
// ═══════════════════════════════════════════════════════════════════════════════

/// Right-hand side of an expression: another reference or a literal.
#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    Expr(Rx),
    Literal(Value),
}

impl Operand {
    fn render(&self) -> String {
        match self {
            Operand::Expr(rx) => rx.operand_text(),
            Operand::Literal(Value::String(s)) => format!("'{}'", s.replace('\'', "\\'")),
            Operand::Literal(value) => value.to_string(),
        }
    }
}

impl From<Rx> for Operand {
    fn from(rx: Rx) -> Self {
        Operand::Expr(rx)
    }
}

impl From<&Rx> for Operand {
    fn from(rx: &Rx) -> Self {
        Operand::Expr(rx.clone())
    }
}

macro_rules! literal_operand {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Operand {
                fn from(value: $ty) -> Self {
                    Operand::Literal(Value::from(value))
                }
            }
        )*
    };
}

literal_operand!(&str, String, bool, i32, i64, u32, u64, usize, f64);

macro_rules! binary_operator {
    ($($trait:ident :: $method:ident => $op:literal),*) => {
        $(
            impl<T: Into<Operand>> $trait<T> for Rx {
                type Output = Rx;

                fn $method(self, rhs: T) -> Rx {
                    self.binary($op, rhs.into())
                }
            }

            impl<T: Into<Operand>> $trait<T> for &Rx {
                type Output = Rx;

                fn $method(self, rhs: T) -> Rx {
                    self.binary($op, rhs.into())
                }
            }
        )*
    };
}

binary_operator!(
    Add::add => "+",
    Sub::sub => "-",
    Mul::mul => "*",
    Div::div => "/",
    Rem::rem => "%"
);

impl Neg for Rx {
    type Output = Rx;

    fn neg(self) -> Rx {
        Rx::new(format!("-{}", self.operand_text()))
    }
}

impl Not for Rx {
    type Output = Rx;

    fn not(self) -> Rx {
        Rx::new(format!("!{}", self.operand_text()))
    }
}

//! Symbol type for variables in recurrence expressions

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::sync::Arc;

/// The domain variable of every recurrence
pub const DOMAIN_VARIABLE: &str = "n";

/// The characteristic-equation variable
pub const CHARACTERISTIC_VARIABLE: &str = "r";

/// Symbolic variable with cheap cloning via shared name storage
///
/// Distinguished names: `n` (domain variable), `r` (characteristic
/// variable), `p_i_j` (general-solution coefficients), and `q_i_j`
/// (particular-solution coefficients).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Symbol {
    name: Arc<str>,
}

impl Symbol {
    /// Create a new symbol
    ///
    /// # Examples
    ///
    /// ```rust
    /// use recsolve_core::Symbol;
    ///
    /// let n = Symbol::new("n");
    /// assert!(n.is_domain_variable());
    /// ```
    pub fn new<S: AsRef<str>>(name: S) -> Self {
        Self {
            name: Arc::from(name.as_ref()),
        }
    }

    /// The recurrence domain variable `n`
    pub fn n() -> Self {
        Self::new(DOMAIN_VARIABLE)
    }

    /// The characteristic variable `r`
    pub fn r() -> Self {
        Self::new(CHARACTERISTIC_VARIABLE)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_domain_variable(&self) -> bool {
        &*self.name == DOMAIN_VARIABLE
    }
}

impl From<&str> for Symbol {
    fn from(name: &str) -> Self {
        Symbol::new(name)
    }
}

impl From<String> for Symbol {
    fn from(name: String) -> Self {
        Symbol::new(name)
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

impl Serialize for Symbol {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.name)
    }
}

impl<'de> Deserialize<'de> for Symbol {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        Ok(Symbol::new(name))
    }
}

//! The scalar value type settings carry.

use std::fmt;

/// A settings value.
///
/// This is the single value currency of the shell: the settings store maps
/// keys to it, tree nodes hold it, and the model's data interface traffics
/// in it. The variant set is closed; hosts needing richer payloads encode
/// them as strings or lists.
#[derive(Debug, Clone, PartialEq)]
pub enum SettingsValue {
    /// Absent value.
    None,
    /// Boolean value.
    Bool(bool),
    /// Integer value.
    Int(i64),
    /// Floating-point value.
    Float(f64),
    /// String value.
    String(String),
    /// List of values.
    List(Vec<SettingsValue>),
}

impl SettingsValue {
    /// Returns true for [`SettingsValue::None`].
    pub fn is_none(&self) -> bool {
        matches!(self, SettingsValue::None)
    }

    /// Returns the boolean value, if this is a boolean.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            SettingsValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Returns the integer value, if this is an integer.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            SettingsValue::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Returns the float value, converting from an integer if needed.
    pub fn as_float(&self) -> Option<f64> {
        match self {
            SettingsValue::Float(f) => Some(*f),
            SettingsValue::Int(i) => Some(*i as f64),
            _ => None,
        }
    }

    /// Returns the string value, if this is a string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            SettingsValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the list elements, if this is a list.
    pub fn as_list(&self) -> Option<&[SettingsValue]> {
        match self {
            SettingsValue::List(items) => Some(items),
            _ => None,
        }
    }

    /// Renders the value as the string stored in an INI file.
    ///
    /// Lists are comma-joined; `None` renders empty.
    pub fn to_ini_string(&self) -> String {
        match self {
            SettingsValue::None => String::new(),
            SettingsValue::Bool(b) => b.to_string(),
            SettingsValue::Int(i) => i.to_string(),
            SettingsValue::Float(f) => f.to_string(),
            SettingsValue::String(s) => s.clone(),
            SettingsValue::List(items) => items
                .iter()
                .map(SettingsValue::to_ini_string)
                .collect::<Vec<_>>()
                .join(","),
        }
    }

    /// Reconstructs a value from its INI string form.
    ///
    /// Booleans, integers and floats are sniffed in that order; anything
    /// else stays a string. Lists do not round-trip to their element types,
    /// they come back as strings.
    pub fn from_ini_str(raw: &str) -> SettingsValue {
        match raw {
            "" => return SettingsValue::String(String::new()),
            "true" => return SettingsValue::Bool(true),
            "false" => return SettingsValue::Bool(false),
            _ => {}
        }
        if let Ok(i) = raw.parse::<i64>() {
            return SettingsValue::Int(i);
        }
        if let Ok(f) = raw.parse::<f64>() {
            return SettingsValue::Float(f);
        }
        SettingsValue::String(raw.to_string())
    }
}

impl fmt::Display for SettingsValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_ini_string())
    }
}

impl From<bool> for SettingsValue {
    fn from(b: bool) -> Self {
        SettingsValue::Bool(b)
    }
}

impl From<i32> for SettingsValue {
    fn from(i: i32) -> Self {
        SettingsValue::Int(i64::from(i))
    }
}

impl From<i64> for SettingsValue {
    fn from(i: i64) -> Self {
        SettingsValue::Int(i)
    }
}

impl From<f64> for SettingsValue {
    fn from(f: f64) -> Self {
        SettingsValue::Float(f)
    }
}

impl From<&str> for SettingsValue {
    fn from(s: &str) -> Self {
        SettingsValue::String(s.to_string())
    }
}

impl From<String> for SettingsValue {
    fn from(s: String) -> Self {
        SettingsValue::String(s)
    }
}

impl<T: Into<SettingsValue>> From<Vec<T>> for SettingsValue {
    fn from(items: Vec<T>) -> Self {
        SettingsValue::List(items.into_iter().map(Into::into).collect())
    }
}

/// Extracts a typed value out of a [`SettingsValue`].
///
/// Implemented for the scalar types hosts usually read settings as, so the
/// store can offer `get_as::<i64>(..)` style access.
pub trait FromSettingsValue: Sized {
    /// Attempts the extraction; `None` when the variant does not match.
    fn from_settings_value(value: &SettingsValue) -> Option<Self>;
}

impl FromSettingsValue for bool {
    fn from_settings_value(value: &SettingsValue) -> Option<Self> {
        value.as_bool()
    }
}

impl FromSettingsValue for i64 {
    fn from_settings_value(value: &SettingsValue) -> Option<Self> {
        value.as_int()
    }
}

impl FromSettingsValue for f64 {
    fn from_settings_value(value: &SettingsValue) -> Option<Self> {
        value.as_float()
    }
}

impl FromSettingsValue for String {
    fn from_settings_value(value: &SettingsValue) -> Option<Self> {
        value.as_str().map(str::to_string)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ini_round_trip_scalars() {
        for value in [
            SettingsValue::Bool(true),
            SettingsValue::Bool(false),
            SettingsValue::Int(30),
            SettingsValue::Int(-7),
            SettingsValue::Float(2.5),
            SettingsValue::String("dark".to_string()),
        ] {
            let text = value.to_ini_string();
            assert_eq!(SettingsValue::from_ini_str(&text), value);
        }
    }

    #[test]
    fn test_sniffing_order() {
        assert_eq!(SettingsValue::from_ini_str("42"), SettingsValue::Int(42));
        assert_eq!(
            SettingsValue::from_ini_str("42.0"),
            SettingsValue::Float(42.0)
        );
        assert_eq!(
            SettingsValue::from_ini_str("42nd"),
            SettingsValue::String("42nd".to_string())
        );
    }

    #[test]
    fn test_list_renders_comma_joined() {
        let list = SettingsValue::from(vec!["a", "b", "c"]);
        assert_eq!(list.to_ini_string(), "a,b,c");
    }

    #[test]
    fn test_typed_extraction() {
        let v = SettingsValue::Int(9);
        assert_eq!(i64::from_settings_value(&v), Some(9));
        assert_eq!(f64::from_settings_value(&v), Some(9.0));
        assert_eq!(bool::from_settings_value(&v), None);
    }
}

//! Conversion of caller-supplied condition values into their policy string form.
//!
//! IAM accepts booleans and numbers either natively or as strings. Values are stored as
//! strings, which is also how the IAM console renders them.

use chrono::{DateTime, SecondsFormat, Utc};

/// A single value usable in a condition clause.
pub trait ConditionValue {
    fn into_condition_value(self) -> String;
}

/// One or more condition values.
///
/// Implemented for every [`ConditionValue`] and for vectors, arrays and slices of them,
/// so accessors accept `"prod"` as well as `["prod", "staging"]`.
pub trait IntoConditionValues {
    fn into_condition_values(self) -> Vec<String>;
}

macro_rules! display_condition_values {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl ConditionValue for $ty {
                fn into_condition_value(self) -> String {
                    self.to_string()
                }
            }

            impl IntoConditionValues for $ty {
                fn into_condition_values(self) -> Vec<String> {
                    vec![self.into_condition_value()]
                }
            }
        )+
    };
}

display_condition_values!(&str, String, &String, bool, i32, i64, u32, u64, usize, f64);

impl ConditionValue for DateTime<Utc> {
    fn into_condition_value(self) -> String {
        self.to_rfc3339_opts(SecondsFormat::Millis, true)
    }
}

impl IntoConditionValues for DateTime<Utc> {
    fn into_condition_values(self) -> Vec<String> {
        vec![self.into_condition_value()]
    }
}

impl<T: ConditionValue> IntoConditionValues for Vec<T> {
    fn into_condition_values(self) -> Vec<String> {
        self.into_iter().map(ConditionValue::into_condition_value).collect()
    }
}

impl<T: ConditionValue, const N: usize> IntoConditionValues for [T; N] {
    fn into_condition_values(self) -> Vec<String> {
        self.into_iter().map(ConditionValue::into_condition_value).collect()
    }
}

impl<T: ConditionValue + Clone> IntoConditionValues for &[T] {
    fn into_condition_values(self) -> Vec<String> {
        self.iter()
            .cloned()
            .map(ConditionValue::into_condition_value)
            .collect()
    }
}

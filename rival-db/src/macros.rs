/// A macro to create a vector of `Kwargs::Condition` for different comparison operators.
///
/// Conditions feed `r#where` and the `on` clause of joins. A `table.column` on the right-hand
/// side compares against another column instead of binding a value.
///
/// # Example
///
/// ```ignore
/// let by_owner = kwargs!(competitor_id = 1, is_active = true);
/// let recent = kwargs!(updates.id >= 10);
/// let on = kwargs!(sources.competitor_id == competitors.id);
/// ```
#[macro_export]
macro_rules! kwargs {
    ($($field:ident = $value:expr),* $(,)?) => {
        {
            let mut args = Vec::new();
            $(
                args.push($crate::db::query::condition::Kwargs::Condition {
                    field: stringify!($field).to_string(),
                    value: $crate::db::query::condition::Operand::Value(
                        $crate::utils::to_value($value.clone())
                    ),
                    comparison_operator: "=".to_string(),
                });
            )*
            args
        }
    };

    ($table:ident.$column:ident $op:tt $v_table:ident.$v_column:ident) => {
        {
            vec![
                $crate::db::query::condition::Kwargs::Condition {
                    field: format!("{}.{}", stringify!($table), stringify!($column)),
                    value: $crate::db::query::condition::Operand::Column(
                        format!("{}.{}", stringify!($v_table), stringify!($v_column))
                    ),
                    comparison_operator: stringify!($op).to_string(),
                }
            ]
        }
    };

    ($table:ident.$column:ident $op:tt $value:expr) => {
        {
            vec![
                $crate::db::query::condition::Kwargs::Condition {
                    field: format!("{}.{}", stringify!($table), stringify!($column)),
                    value: $crate::db::query::condition::Operand::Value(
                        $crate::utils::to_value($value.clone())
                    ),
                    comparison_operator: stringify!($op).to_string(),
                }
            ]
        }
    };

    ($field:ident $op:tt $value:expr) => {
        {
            vec![
                $crate::db::query::condition::Kwargs::Condition {
                    field: stringify!($field).to_string(),
                    value: $crate::db::query::condition::Operand::Value(
                        $crate::utils::to_value($value.clone())
                    ),
                    comparison_operator: stringify!($op).to_string(),
                }
            ]
        }
    };
}

macro_rules! binds {
    ($args:expr, $stream:expr) => {{
        for arg in $args {
            $stream = match arg {
                serde_json::Value::Null => $stream.bind(Option::<String>::None),
                serde_json::Value::Bool(value) => $stream.bind(i64::from(value)),
                serde_json::Value::Number(number) => match number.as_i64() {
                    Some(value) => $stream.bind(value),
                    None => $stream.bind(number.as_f64().unwrap_or_default()),
                },
                serde_json::Value::String(value) => $stream.bind(value),
                other => $stream.bind(other.to_string()),
            };
        }
    }};
}

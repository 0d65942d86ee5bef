//! Renders query plans to SQL for the real backend.
//!
//! Every selected column is aliased `table__column` so rows can be split back into one
//! record per table after a join.

use serde_json::Value;

use super::condition::{Kwargs, Operand};
use super::{DeletePlan, InsertPlan, Query, SelectPlan, UpdatePlan};
use crate::db::{Projection, Record, Table, PLACEHOLDER};
use crate::Error;

pub fn column_alias(table: Table, column: &str) -> String {
    format!("{}__{}", table.name(), column)
}

fn push_arg(args: &mut Vec<Value>, value: Value) -> String {
    args.push(value);
    format!("{PLACEHOLDER}{}", args.len())
}

fn normalize_operator(operator: &str) -> &str {
    match operator {
        "==" => "=",
        other => other,
    }
}

pub fn to_conditions(kw: &[Kwargs], args: &mut Vec<Value>) -> String {
    let mut placeholders = Vec::new();
    let mut after_condition = false;
    for condition in kw {
        match condition {
            Kwargs::Condition {
                field,
                value,
                comparison_operator,
            } => {
                // Adjacent conditions from one `kwargs!` call are joined with `and`.
                if after_condition {
                    placeholders.push("and".to_string());
                }
                after_condition = true;
                let operator = normalize_operator(comparison_operator);
                match value {
                    Operand::Column(column) => {
                        placeholders.push(format!("{field}{operator}{column}"));
                    }
                    Operand::Value(Value::Null) if operator == "!=" => {
                        placeholders.push(format!("{field} is not null"));
                    }
                    Operand::Value(Value::Null) => {
                        placeholders.push(format!("{field} is null"));
                    }
                    Operand::Value(value) => {
                        let placeholder = push_arg(args, value.clone());
                        placeholders.push(format!("{field}{operator}{placeholder}"));
                    }
                }
            }
            Kwargs::LogicalOperator { operator } => {
                after_condition = false;
                placeholders.push(operator.to_owned());
            }
        }
    }
    placeholders.join(" ")
}

fn select_columns(table: Table) -> impl Iterator<Item = String> {
    table.columns().iter().map(move |column| {
        format!(
            "{table}.{name} AS \"{alias}\"",
            name = column.name,
            alias = column_alias(table, column.name)
        )
    })
}

fn returning_columns(table: Table) -> String {
    table
        .columns()
        .iter()
        .map(|column| {
            format!(
                "{name} AS \"{alias}\"",
                name = column.name,
                alias = column_alias(table, column.name)
            )
        })
        .collect::<Vec<_>>()
        .join(", ")
}

/// Finds a foreign key linking `joined` to a table already in the query.
fn inferred_join_condition(present: &[Table], joined: Table) -> Option<String> {
    for &table in present {
        for column in joined.columns() {
            if let Some((target, target_column)) = column.references {
                if target == table.name() {
                    return Some(format!("{joined}.{} = {table}.{target_column}", column.name));
                }
            }
        }
        for column in table.columns() {
            if let Some((target, target_column)) = column.references {
                if target == joined.name() {
                    return Some(format!("{table}.{} = {joined}.{target_column}", column.name));
                }
            }
        }
    }
    None
}

pub fn to_select_query(plan: &SelectPlan) -> Query {
    let mut args = Vec::new();

    let projection = match plan.projection {
        Projection::Count => "count(*) AS count".to_string(),
        Projection::All => std::iter::once(plan.table)
            .chain(plan.joins.iter().map(|join| join.table))
            .flat_map(select_columns)
            .collect::<Vec<_>>()
            .join(", "),
    };

    let mut sql = format!("SELECT {projection} FROM {}", plan.table);

    let mut present = vec![plan.table];
    for join in &plan.joins {
        let on = if join.on.is_empty() {
            inferred_join_condition(&present, join.table).unwrap_or_else(|| "1 = 1".to_string())
        } else {
            to_conditions(&join.on, &mut args)
        };
        sql.push_str(&format!(" {} JOIN {} ON {on}", join.join_type, join.table));
        present.push(join.table);
    }

    if !plan.conditions.is_empty() {
        let placeholders = to_conditions(&plan.conditions, &mut args);
        sql.push_str(&format!(" WHERE {placeholders}"));
    }

    if !plan.group_by.is_empty() {
        sql.push_str(&format!(" GROUP BY {}", plan.group_by.join(", ")));
    }

    if !plan.order.is_empty() {
        let order = plan
            .order
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ");
        sql.push_str(&format!(" ORDER BY {order}"));
    }

    if let Some(limit) = plan.limit {
        sql.push_str(&format!(" LIMIT {limit}"));
    }

    Query { sql, args }
}

/// `null` or `0`, as serialized by a model built with `Default`.
fn is_unset_key(value: &Value) -> bool {
    value.is_null() || value.as_i64() == Some(0)
}

pub fn to_insert_query(table: Table, record: &Record, returning: bool) -> Result<Query, Error> {
    let mut args = Vec::new();
    let mut fields = Vec::new();
    let mut placeholders = Vec::new();

    for (key, value) in record {
        let column = table.column(key).ok_or_else(|| Error::UnknownField {
            table: table.name(),
            field: key.clone(),
        })?;
        if column.primary_key && column.auto && is_unset_key(value) {
            continue;
        }
        fields.push(column.name);
        placeholders.push(push_arg(&mut args, value.clone()));
    }

    let mut sql = if fields.is_empty() {
        format!("insert into {table} default values")
    } else {
        format!(
            "insert into {table} ({fields}) values ({placeholders})",
            fields = fields.join(", "),
            placeholders = placeholders.join(", "),
        )
    };

    if returning {
        sql.push_str(&format!(" returning {}", returning_columns(table)));
    }

    Ok(Query { sql, args })
}

pub fn to_insert_queries(plan: &InsertPlan) -> Result<Vec<Query>, Error> {
    plan.rows
        .iter()
        .map(|record| to_insert_query(plan.table, record, plan.returning))
        .collect()
}

pub fn to_update_query(plan: &UpdatePlan) -> Result<Query, Error> {
    if plan.patch.is_empty() {
        return Err(Error::InvalidValues("an empty patch".to_string()));
    }

    let mut args = Vec::new();
    let mut placeholders = Vec::new();

    for (key, value) in &plan.patch {
        let column = plan.table.column(key).ok_or_else(|| Error::UnknownField {
            table: plan.table.name(),
            field: key.clone(),
        })?;
        let placeholder = push_arg(&mut args, value.clone());
        placeholders.push(format!("{}={placeholder}", column.name));
    }

    let mut sql = format!(
        "update {table} set {placeholders}",
        table = plan.table,
        placeholders = placeholders.join(", ")
    );

    if !plan.conditions.is_empty() {
        let conditions = to_conditions(&plan.conditions, &mut args);
        sql.push_str(&format!(" where {conditions}"));
    }

    if plan.returning {
        sql.push_str(&format!(" returning {}", returning_columns(plan.table)));
    }

    Ok(Query { sql, args })
}

pub fn to_delete_query(plan: &DeletePlan) -> Query {
    let mut args = Vec::new();
    let mut sql = format!("delete from {}", plan.table);

    if !plan.conditions.is_empty() {
        let conditions = to_conditions(&plan.conditions, &mut args);
        sql.push_str(&format!(" where {conditions}"));
    }

    Query { sql, args }
}

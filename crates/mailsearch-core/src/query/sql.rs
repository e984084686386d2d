//! SQLite rendering of [`Query`] values.
//!
//! All literal values are pushed as bind parameters; only identifiers from
//! [`Column`] and fixed keywords are written into the statement text.

use sqlx::{QueryBuilder, Sqlite};

use super::predicate::{Column, Predicate, Query, Value};

/// Table holding stored messages.
pub const TABLE: &str = "email";

/// Double-quoted, table-qualified column identifier.
fn qualified(column: Column) -> String {
    format!("\"{TABLE}\".\"{}\"", column.name())
}

/// Build a `SELECT` of every record column for `query`.
#[must_use]
pub fn select(query: &Query) -> QueryBuilder<'static, Sqlite> {
    let mut builder = QueryBuilder::new("SELECT ");
    {
        let mut columns = builder.separated(", ");
        for column in Column::ALL {
            columns.push(qualified(column));
        }
    }
    builder.push(format!(" FROM \"{TABLE}\""));

    if !query.filter.is_always() {
        builder.push(" WHERE ");
        push_predicate(&mut builder, &query.filter);
    }

    let (column, direction) = query.order;
    builder
        .push(" ORDER BY ")
        .push(qualified(column))
        .push(" ")
        .push(direction.keyword());

    builder
}

fn push_predicate(builder: &mut QueryBuilder<'static, Sqlite>, predicate: &Predicate) {
    match predicate {
        Predicate::Eq(column, value) => {
            builder.push(qualified(*column)).push(" = ");
            match value {
                Value::Text(text) => builder.push_bind(text.clone()),
                Value::Integer(n) => builder.push_bind(*n),
            };
        }
        Predicate::RecipientContains(field, address) => {
            // The path is resolved against the column itself so non-object
            // entries yield NULL instead of a JSON parse error.
            let column = qualified(field.column());
            builder
                .push("EXISTS (SELECT 1 FROM json_each(")
                .push(&column)
                .push(") AS r WHERE r.type = 'object' AND json_extract(")
                .push(&column)
                .push(", r.fullkey || '.EmailAddress') = ")
                .push_bind(address.clone())
                .push(")");
        }
        Predicate::And(terms) => {
            let terms: Vec<&Predicate> = terms.iter().filter(|t| !t.is_always()).collect();
            if terms.is_empty() {
                builder.push("1 = 1");
                return;
            }
            builder.push("(");
            for (i, term) in terms.into_iter().enumerate() {
                if i > 0 {
                    builder.push(" AND ");
                }
                push_predicate(builder, term);
            }
            builder.push(")");
        }
    }
}

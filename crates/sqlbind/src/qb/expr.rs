//! Expression layer for WHERE clauses.
//!
//! [`Expr`] nodes compose into boolean trees (AND/OR/NOT) and render to SQL
//! with parameter indices computed during the walk, so no string replacement
//! pass runs afterwards. The placeholder style is an argument to the render,
//! which is what lets the same tree serve `?` and `$n` dialects.

use tokio_postgres::types::ToSql;

use crate::param::{Param, ParamList};
use crate::placeholder::Placeholder;

/// Expression node for building WHERE clauses.
#[derive(Clone, Debug)]
pub enum Expr {
    /// AND group: all conditions must be true.
    And(Vec<Expr>),

    /// OR group: at least one condition must be true.
    Or(Vec<Expr>),

    /// NOT: negate the inner expression.
    Not(Box<Expr>),

    /// Simple comparison: `column op <ph>`
    Compare {
        column: String,
        op: &'static str,
        value: Param,
    },

    /// NULL check: `column IS NULL` or `column IS NOT NULL`
    NullCheck { column: String, is_null: bool },

    /// IN list: `column IN (<ph>, ...)` or `column NOT IN (...)`
    InList {
        column: String,
        values: Vec<Param>,
        negated: bool,
    },

    /// BETWEEN: `column BETWEEN <ph> AND <ph>`
    Between {
        column: String,
        from: Param,
        to: Param,
        negated: bool,
    },

    /// Raw SQL fragment without parameters.
    Raw(String),

    /// Always true (used for empty NOT IN lists).
    True,

    /// Always false (used for empty IN lists).
    False,
}

impl Expr {
    /// Create an AND expression from a list of expressions.
    pub fn and(exprs: Vec<Expr>) -> Self {
        Expr::And(exprs)
    }

    /// Create an OR expression from a list of expressions.
    pub fn or(exprs: Vec<Expr>) -> Self {
        Expr::Or(exprs)
    }

    /// Create a NOT expression.
    pub fn not(expr: Expr) -> Self {
        Expr::Not(Box::new(expr))
    }

    /// Create an equality condition: column = value
    pub fn eq<T: ToSql + Send + Sync + 'static>(column: impl Into<String>, value: T) -> Self {
        Expr::Compare {
            column: column.into(),
            op: "=",
            value: Param::new(value),
        }
    }

    /// Create an inequality condition: column != value
    pub fn ne<T: ToSql + Send + Sync + 'static>(column: impl Into<String>, value: T) -> Self {
        Expr::Compare {
            column: column.into(),
            op: "!=",
            value: Param::new(value),
        }
    }

    /// Create a greater-than condition: column > value
    pub fn gt<T: ToSql + Send + Sync + 'static>(column: impl Into<String>, value: T) -> Self {
        Expr::Compare {
            column: column.into(),
            op: ">",
            value: Param::new(value),
        }
    }

    /// Create a greater-than-or-equal condition: column >= value
    pub fn gte<T: ToSql + Send + Sync + 'static>(column: impl Into<String>, value: T) -> Self {
        Expr::Compare {
            column: column.into(),
            op: ">=",
            value: Param::new(value),
        }
    }

    /// Create a less-than condition: column < value
    pub fn lt<T: ToSql + Send + Sync + 'static>(column: impl Into<String>, value: T) -> Self {
        Expr::Compare {
            column: column.into(),
            op: "<",
            value: Param::new(value),
        }
    }

    /// Create a less-than-or-equal condition: column <= value
    pub fn lte<T: ToSql + Send + Sync + 'static>(column: impl Into<String>, value: T) -> Self {
        Expr::Compare {
            column: column.into(),
            op: "<=",
            value: Param::new(value),
        }
    }

    /// Create a LIKE condition: column LIKE pattern
    pub fn like<T: ToSql + Send + Sync + 'static>(column: impl Into<String>, pattern: T) -> Self {
        Expr::Compare {
            column: column.into(),
            op: "LIKE",
            value: Param::new(pattern),
        }
    }

    /// Create an IS NULL condition: column IS NULL
    pub fn is_null(column: impl Into<String>) -> Self {
        Expr::NullCheck {
            column: column.into(),
            is_null: true,
        }
    }

    /// Create an IS NOT NULL condition: column IS NOT NULL
    pub fn is_not_null(column: impl Into<String>) -> Self {
        Expr::NullCheck {
            column: column.into(),
            is_null: false,
        }
    }

    /// Create an IN condition: column IN (values...)
    pub fn in_list<T: ToSql + Send + Sync + 'static>(
        column: impl Into<String>,
        values: Vec<T>,
    ) -> Self {
        if values.is_empty() {
            return Expr::False;
        }
        Expr::InList {
            column: column.into(),
            values: values.into_iter().map(Param::new).collect(),
            negated: false,
        }
    }

    /// Create an IN condition from pre-wrapped params.
    pub fn in_params(column: impl Into<String>, values: Vec<Param>) -> Self {
        if values.is_empty() {
            return Expr::False;
        }
        Expr::InList {
            column: column.into(),
            values,
            negated: false,
        }
    }

    /// Create a NOT IN condition: column NOT IN (values...)
    pub fn not_in<T: ToSql + Send + Sync + 'static>(
        column: impl Into<String>,
        values: Vec<T>,
    ) -> Self {
        if values.is_empty() {
            return Expr::True;
        }
        Expr::InList {
            column: column.into(),
            values: values.into_iter().map(Param::new).collect(),
            negated: true,
        }
    }

    /// Create a BETWEEN condition: column BETWEEN from AND to
    pub fn between<T: ToSql + Send + Sync + 'static>(
        column: impl Into<String>,
        from: T,
        to: T,
    ) -> Self {
        Expr::Between {
            column: column.into(),
            from: Param::new(from),
            to: Param::new(to),
            negated: false,
        }
    }

    /// Create a raw SQL fragment.
    pub fn raw(sql: impl Into<String>) -> Self {
        Expr::Raw(sql.into())
    }

    /// Check if this expression is empty (contains no conditions).
    pub fn is_empty(&self) -> bool {
        match self {
            Expr::And(exprs) | Expr::Or(exprs) => {
                exprs.is_empty() || exprs.iter().all(|e| e.is_empty())
            }
            Expr::Not(inner) => inner.is_empty(),
            _ => false,
        }
    }

    /// Render the SQL fragment, pushing parameters onto `params` and
    /// formatting their indices through `placeholder`.
    pub fn build(&self, params: &mut ParamList, placeholder: Placeholder) -> String {
        match self {
            Expr::And(exprs) => {
                let parts: Vec<String> = exprs
                    .iter()
                    .filter(|e| !e.is_empty())
                    .map(|e| {
                        let sql = e.build(params, placeholder);
                        // Wrap OR groups in parentheses
                        if matches!(e, Expr::Or(_)) && !sql.is_empty() {
                            format!("({})", sql)
                        } else {
                            sql
                        }
                    })
                    .filter(|s| !s.is_empty())
                    .collect();
                parts.join(" AND ")
            }
            Expr::Or(exprs) => {
                let parts: Vec<String> = exprs
                    .iter()
                    .filter(|e| !e.is_empty())
                    .map(|e| {
                        let sql = e.build(params, placeholder);
                        // Wrap AND groups in parentheses
                        if matches!(e, Expr::And(_)) && !sql.is_empty() {
                            format!("({})", sql)
                        } else {
                            sql
                        }
                    })
                    .filter(|s| !s.is_empty())
                    .collect();
                parts.join(" OR ")
            }
            Expr::Not(inner) => {
                let sql = inner.build(params, placeholder);
                if sql.is_empty() {
                    String::new()
                } else {
                    format!("NOT ({})", sql)
                }
            }
            Expr::Compare { column, op, value } => {
                let idx = params.push_param(value.clone());
                format!("{} {} {}", column, op, placeholder.format(idx))
            }
            Expr::NullCheck { column, is_null } => {
                if *is_null {
                    format!("{} IS NULL", column)
                } else {
                    format!("{} IS NOT NULL", column)
                }
            }
            Expr::InList {
                column,
                values,
                negated,
            } => {
                if values.is_empty() {
                    return if *negated {
                        "1=1".to_string()
                    } else {
                        "1=0".to_string()
                    };
                }
                let markers: Vec<String> = values
                    .iter()
                    .map(|v| {
                        let idx = params.push_param(v.clone());
                        placeholder.format(idx)
                    })
                    .collect();
                let op = if *negated { "NOT IN" } else { "IN" };
                format!("{} {} ({})", column, op, markers.join(","))
            }
            Expr::Between {
                column,
                from,
                to,
                negated,
            } => {
                let idx1 = params.push_param(from.clone());
                let marker1 = placeholder.format(idx1);
                let idx2 = params.push_param(to.clone());
                let marker2 = placeholder.format(idx2);
                let op = if *negated { "NOT BETWEEN" } else { "BETWEEN" };
                format!("{} {} {} AND {}", column, op, marker1, marker2)
            }
            Expr::Raw(sql) => sql.clone(),
            Expr::True => "1=1".to_string(),
            Expr::False => "1=0".to_string(),
        }
    }
}

/// A builder for constructing WHERE clauses incrementally.
///
/// Expressions added to the group are ANDed together when rendered.
#[derive(Clone, Debug, Default)]
pub struct ExprGroup {
    exprs: Vec<Expr>,
}

impl ExprGroup {
    /// Create a new empty expression group.
    pub fn new() -> Self {
        Self { exprs: Vec::new() }
    }

    /// Check if the group is empty.
    pub fn is_empty(&self) -> bool {
        self.exprs.is_empty()
    }

    /// Add an expression to be ANDed.
    pub fn and_expr(&mut self, expr: Expr) {
        self.exprs.push(expr);
    }

    /// Add a condition: column = value
    pub fn eq<T: ToSql + Send + Sync + 'static>(&mut self, column: &str, value: T) {
        self.exprs.push(Expr::eq(column, value));
    }

    /// Add a condition: column != value
    pub fn ne<T: ToSql + Send + Sync + 'static>(&mut self, column: &str, value: T) {
        self.exprs.push(Expr::ne(column, value));
    }

    /// Add a condition: column > value
    pub fn gt<T: ToSql + Send + Sync + 'static>(&mut self, column: &str, value: T) {
        self.exprs.push(Expr::gt(column, value));
    }

    /// Add a condition: column >= value
    pub fn gte<T: ToSql + Send + Sync + 'static>(&mut self, column: &str, value: T) {
        self.exprs.push(Expr::gte(column, value));
    }

    /// Add a condition: column < value
    pub fn lt<T: ToSql + Send + Sync + 'static>(&mut self, column: &str, value: T) {
        self.exprs.push(Expr::lt(column, value));
    }

    /// Add a condition: column <= value
    pub fn lte<T: ToSql + Send + Sync + 'static>(&mut self, column: &str, value: T) {
        self.exprs.push(Expr::lte(column, value));
    }

    /// Add a condition: column LIKE pattern
    pub fn like<T: ToSql + Send + Sync + 'static>(&mut self, column: &str, pattern: T) {
        self.exprs.push(Expr::like(column, pattern));
    }

    /// Add a condition: column IS NULL
    pub fn is_null(&mut self, column: &str) {
        self.exprs.push(Expr::is_null(column));
    }

    /// Add a condition: column IS NOT NULL
    pub fn is_not_null(&mut self, column: &str) {
        self.exprs.push(Expr::is_not_null(column));
    }

    /// Add a condition: column IN (values...)
    pub fn in_list<T: ToSql + Send + Sync + 'static>(&mut self, column: &str, values: Vec<T>) {
        self.exprs.push(Expr::in_list(column, values));
    }

    /// Add a condition: column NOT IN (values...)
    pub fn not_in<T: ToSql + Send + Sync + 'static>(&mut self, column: &str, values: Vec<T>) {
        self.exprs.push(Expr::not_in(column, values));
    }

    /// Add a condition: column BETWEEN from AND to
    pub fn between<T: ToSql + Send + Sync + 'static>(&mut self, column: &str, from: T, to: T) {
        self.exprs.push(Expr::between(column, from, to));
    }

    /// Add a raw SQL condition.
    pub fn raw(&mut self, sql: &str) {
        self.exprs.push(Expr::raw(sql));
    }

    /// Add a condition if value is Some: column = value
    pub fn eq_opt<T: ToSql + Send + Sync + 'static>(&mut self, column: &str, value: Option<T>) {
        if let Some(v) = value {
            self.eq(column, v);
        }
    }

    /// Add a condition if value is Some: column LIKE pattern
    pub fn like_opt<T: ToSql + Send + Sync + 'static>(&mut self, column: &str, pattern: Option<T>) {
        if let Some(v) = pattern {
            self.like(column, v);
        }
    }

    /// Add a condition if values is Some and non-empty: column IN (values...)
    pub fn in_opt<T: ToSql + Send + Sync + 'static>(&mut self, column: &str, values: Option<Vec<T>>) {
        if let Some(v) = values {
            if !v.is_empty() {
                self.in_list(column, v);
            }
        }
    }

    /// Render the WHERE clause content (without the `WHERE` keyword) into an
    /// existing parameter list, continuing its numbering.
    pub fn build_into(&self, params: &mut ParamList, placeholder: Placeholder) -> String {
        if self.exprs.is_empty() {
            return String::new();
        }
        Expr::And(self.exprs.clone()).build(params, placeholder)
    }

    /// Render the WHERE clause content with a fresh parameter list.
    pub fn build(&self, placeholder: Placeholder) -> (String, ParamList) {
        let mut params = ParamList::new();
        let sql = self.build_into(&mut params, placeholder);
        (sql, params)
    }
}

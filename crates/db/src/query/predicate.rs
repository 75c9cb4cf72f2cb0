//! Boolean predicate tree rendered into a parameterized WHERE clause.

use musiclib_core::filter::Comparison;

use super::{SqlArgs, SqlValue};

/// A composable SQL condition over trusted column names.
///
/// Build compound predicates through [`Predicate::and`] and [`Predicate::or`];
/// they drop `True` operands and collapse single-element lists, so an
/// `And`/`Or` node always has at least two children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Predicate {
    /// No constraint.
    True,
    Compare {
        column: &'static str,
        op: Comparison,
        value: SqlValue,
    },
    /// Case-insensitive match against a `LIKE` pattern (`\` escapes).
    ILike {
        column: &'static str,
        pattern: String,
    },
    In {
        column: &'static str,
        values: Vec<SqlValue>,
    },
    /// Inclusive on both ends.
    Between {
        column: &'static str,
        low: SqlValue,
        high: SqlValue,
    },
    And(Vec<Predicate>),
    Or(Vec<Predicate>),
}

impl Predicate {
    pub fn and(parts: Vec<Predicate>) -> Predicate {
        let mut flat = Vec::with_capacity(parts.len());
        for part in parts {
            match part {
                Predicate::True => {}
                Predicate::And(inner) => flat.extend(inner),
                other => flat.push(other),
            }
        }
        match flat.len() {
            0 => Predicate::True,
            1 => flat.pop().unwrap_or(Predicate::True),
            _ => Predicate::And(flat),
        }
    }

    /// Disjunction. An empty list yields `True`; any `True` operand makes
    /// the whole disjunction `True`.
    pub fn or(parts: Vec<Predicate>) -> Predicate {
        let mut flat = Vec::with_capacity(parts.len());
        for part in parts {
            match part {
                Predicate::True => return Predicate::True,
                Predicate::Or(inner) => flat.extend(inner),
                other => flat.push(other),
            }
        }
        match flat.len() {
            0 => Predicate::True,
            1 => flat.pop().unwrap_or(Predicate::True),
            _ => Predicate::Or(flat),
        }
    }

    pub fn is_true(&self) -> bool {
        matches!(self, Predicate::True)
    }

    /// Render into SQL, pushing bound values onto `args`.
    ///
    /// Returns `None` for [`Predicate::True`] so callers can omit `WHERE`.
    pub fn render(&self, args: &mut SqlArgs) -> Option<String> {
        match self {
            Predicate::True => None,
            other => Some(other.render_node(args)),
        }
    }

    fn render_node(&self, args: &mut SqlArgs) -> String {
        match self {
            Predicate::True => "TRUE".to_string(),
            Predicate::Compare { column, op, value } => {
                let placeholder = args.push(value.clone());
                format!("{column} {} {placeholder}", op.as_sql())
            }
            Predicate::ILike { column, pattern } => {
                let placeholder = args.push(SqlValue::Text(pattern.clone()));
                format!("{column} ILIKE {placeholder}")
            }
            Predicate::In { column, values } => {
                if values.is_empty() {
                    return "FALSE".to_string();
                }
                let placeholders: Vec<String> =
                    values.iter().map(|v| args.push(v.clone())).collect();
                format!("{column} IN ({})", placeholders.join(", "))
            }
            Predicate::Between { column, low, high } => {
                let low = args.push(low.clone());
                let high = args.push(high.clone());
                format!("{column} BETWEEN {low} AND {high}")
            }
            Predicate::And(parts) => parts
                .iter()
                .map(|p| p.render_operand(args))
                .collect::<Vec<_>>()
                .join(" AND "),
            Predicate::Or(parts) => parts
                .iter()
                .map(|p| p.render_operand(args))
                .collect::<Vec<_>>()
                .join(" OR "),
        }
    }

    /// Compound operands are parenthesised so precedence never depends on
    /// the surrounding operator.
    fn render_operand(&self, args: &mut SqlArgs) -> String {
        match self {
            Predicate::And(_) | Predicate::Or(_) => format!("({})", self.render_node(args)),
            leaf => leaf.render_node(args),
        }
    }
}

use std::collections::HashSet;

use once_cell::sync::Lazy;

use crate::parser::WordComparer;

pub static COMPARERS: Lazy<QueryComparers> = Lazy::new(QueryComparers::new);

/// Words that can never be used as an unquoted identifier or implicit alias.
static RESERVED: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "SELECT", "FROM", "WHERE", "GROUP", "BY", "HAVING", "ORDER", "LIMIT", "OFFSET", "FETCH",
        "UNION", "EXCEPT", "INTERSECT", "ALL", "DISTINCT", "AS", "ON", "JOIN", "INNER", "LEFT",
        "RIGHT", "FULL", "OUTER", "CROSS", "AND", "OR", "NOT", "IS", "NULL", "TRUE", "FALSE",
        "IN", "LIKE", "BETWEEN", "CASE", "WHEN", "THEN", "ELSE", "END", "CAST", "EXISTS", "ASC",
        "DESC", "NULLS",
    ]
    .into_iter()
    .collect()
});

#[derive(Debug)]
pub struct QueryComparers {
    pub select: WordComparer,
    pub distinct: WordComparer,
    pub all: WordComparer,
    pub alias: WordComparer,
    pub from: WordComparer,
    pub join: WordComparer,
    pub inner_join: WordComparer,
    pub left_join: WordComparer,
    pub left_outer_join: WordComparer,
    pub right_join: WordComparer,
    pub right_outer_join: WordComparer,
    pub full_join: WordComparer,
    pub full_outer_join: WordComparer,
    pub cross_join: WordComparer,
    pub on: WordComparer,
    pub r#where: WordComparer,
    pub group_by: WordComparer,
    pub having: WordComparer,
    pub order_by: WordComparer,
    pub asc: WordComparer,
    pub desc: WordComparer,
    pub nulls_first: WordComparer,
    pub nulls_last: WordComparer,
    pub limit: WordComparer,
    pub offset: WordComparer,
    pub fetch: WordComparer,
    pub first: WordComparer,
    pub next: WordComparer,
    pub row: WordComparer,
    pub rows: WordComparer,
    pub only: WordComparer,
    pub union: WordComparer,
    pub except: WordComparer,
    pub intersect: WordComparer,
    pub and: WordComparer,
    pub or: WordComparer,
    pub not: WordComparer,
    pub is_null: WordComparer,
    pub is_not_null: WordComparer,
    pub like: WordComparer,
    pub not_like: WordComparer,
    pub r#in: WordComparer,
    pub not_in: WordComparer,
    pub between: WordComparer,
    pub not_between: WordComparer,
    pub exists: WordComparer,
    pub case: WordComparer,
    pub when: WordComparer,
    pub then: WordComparer,
    pub r#else: WordComparer,
    pub end: WordComparer,
    pub cast: WordComparer,
    pub b_true: WordComparer,
    pub b_false: WordComparer,
    pub null: WordComparer,
}

impl Default for QueryComparers {
    fn default() -> Self {
        Self::new()
    }
}

impl QueryComparers {
    pub fn new() -> Self {
        Self {
            select: WordComparer::new("SELECT"),
            distinct: WordComparer::new("DISTINCT"),
            all: WordComparer::new("ALL"),
            alias: WordComparer::new("AS"),
            from: WordComparer::new("FROM"),
            join: WordComparer::new("JOIN"),
            inner_join: WordComparer::new("INNER JOIN"),
            left_join: WordComparer::new("LEFT JOIN"),
            left_outer_join: WordComparer::new("LEFT OUTER JOIN"),
            right_join: WordComparer::new("RIGHT JOIN"),
            right_outer_join: WordComparer::new("RIGHT OUTER JOIN"),
            full_join: WordComparer::new("FULL JOIN"),
            full_outer_join: WordComparer::new("FULL OUTER JOIN"),
            cross_join: WordComparer::new("CROSS JOIN"),
            on: WordComparer::new("ON"),
            r#where: WordComparer::new("WHERE"),
            group_by: WordComparer::new("GROUP BY"),
            having: WordComparer::new("HAVING"),
            order_by: WordComparer::new("ORDER BY"),
            asc: WordComparer::new("ASC"),
            desc: WordComparer::new("DESC"),
            nulls_first: WordComparer::new("NULLS FIRST"),
            nulls_last: WordComparer::new("NULLS LAST"),
            limit: WordComparer::new("LIMIT"),
            offset: WordComparer::new("OFFSET"),
            fetch: WordComparer::new("FETCH"),
            first: WordComparer::new("FIRST"),
            next: WordComparer::new("NEXT"),
            row: WordComparer::new("ROW"),
            rows: WordComparer::new("ROWS"),
            only: WordComparer::new("ONLY"),
            union: WordComparer::new("UNION"),
            except: WordComparer::new("EXCEPT"),
            intersect: WordComparer::new("INTERSECT"),
            and: WordComparer::new("AND"),
            or: WordComparer::new("OR"),
            not: WordComparer::new("NOT"),
            is_null: WordComparer::new("IS NULL"),
            is_not_null: WordComparer::new("IS NOT NULL"),
            like: WordComparer::new("LIKE"),
            not_like: WordComparer::new("NOT LIKE"),
            r#in: WordComparer::new("IN"),
            not_in: WordComparer::new("NOT IN"),
            between: WordComparer::new("BETWEEN"),
            not_between: WordComparer::new("NOT BETWEEN"),
            exists: WordComparer::new("EXISTS"),
            case: WordComparer::new("CASE"),
            when: WordComparer::new("WHEN"),
            then: WordComparer::new("THEN"),
            r#else: WordComparer::new("ELSE"),
            end: WordComparer::new("END"),
            cast: WordComparer::new("CAST"),
            b_true: WordComparer::new("TRUE"),
            b_false: WordComparer::new("FALSE"),
            null: WordComparer::new("NULL"),
        }
    }

    pub fn is_reserved(word: &str) -> bool {
        RESERVED.contains(word.to_uppercase().as_str())
    }
}

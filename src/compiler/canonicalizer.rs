use tracing::debug;

use crate::parser::{ast::SqlNode, ParseError, ParserConfig};

/// A statement in canonical text together with the tree reparsed from it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Canonical {
    pub sql: String,
    pub node: SqlNode,
}

pub struct Canonicalizer {
    config: ParserConfig,
}

impl Canonicalizer {
    /// `config` is the base parser configuration; the reparse always runs
    /// without legacy syntax.
    pub fn new(config: &ParserConfig) -> Self {
        Self { config: config.clone().with_legacy_syntax(false) }
    }

    /// Writes `node` in the canonical dialect and parses the text back.
    pub fn canonicalize(&self, node: &SqlNode) -> Result<Canonical, ParseError> {
        let sql = node.to_string();
        debug!(sql = %sql, "canonical text");
        let node = SqlNode::parse_statement(&sql, &self.config)?;
        Ok(Canonical { sql, node })
    }
}

impl Default for Canonicalizer {
    fn default() -> Self {
        Self::new(&ParserConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        compiler::Canonicalizer,
        desugar::Desugarer,
        parser::{ast::SqlNode, Casing, ParserConfig},
    };

    fn legacy(sql: &str) -> SqlNode {
        SqlNode::parse_statement(sql, &ParserConfig::legacy()).expect("Failed to parse statement")
    }

    #[test]
    pub fn test_bang_equal_written_as_not_equal() {
        let canonical = Canonicalizer::default()
            .canonicalize(&legacy("select a from t where a != 1"))
            .expect("Failed to canonicalize");

        assert_eq!(canonical.sql, "SELECT \"a\" FROM \"t\" WHERE \"a\" <> 1");
    }

    #[test]
    pub fn test_round_trip_is_identity() {
        let statements = [
            "SELECT a + 1 AS x, x * 2 AS y, count(*) FROM t GROUP BY y",
            "SELECT stddev_samp(a), corr(a, b) FROM t WHERE b BETWEEN 1 AND 10",
            "SELECT a FROM t1 LEFT JOIN t2 ON t1.id = t2.id, t3 ORDER BY 1 DESC NULLS LAST LIMIT 10",
            "SELECT a FROM t UNION ALL (SELECT b FROM u ORDER BY b) EXCEPT SELECT c FROM v",
            "SELECT CASE a WHEN 1 THEN 'one' END, -(-a), a - (b - c) FROM t WHERE NOT (a AND b)",
            "SELECT * FROM (SELECT a AS x FROM t) AS s WHERE x IN (SELECT y FROM u) OFFSET 3 ROWS",
        ];

        for sql in statements {
            let desugared = Desugarer::desugar(legacy(sql), true);
            let canonical = Canonicalizer::default()
                .canonicalize(&desugared)
                .expect("Failed to canonicalize");

            assert_eq!(canonical.node, desugared, "round trip changed {}", sql);
            assert_eq!(Desugarer::desugar(canonical.node.clone(), true), canonical.node, "not idempotent: {}", sql);
        }
    }

    #[test]
    pub fn test_reparse_keeps_quoted_identifiers_exact() {
        let config = ParserConfig::legacy().with_unquoted_casing(Casing::ToUpper);
        let node = SqlNode::parse_statement("select a from t", &config).expect("Failed to parse statement");

        let canonical = Canonicalizer::new(&config).canonicalize(&node).expect("Failed to canonicalize");

        assert_eq!(canonical.sql, "SELECT \"A\" FROM \"T\"");
        assert_eq!(canonical.node, node);
    }
}

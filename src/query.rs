use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;
use tracing::info;

use crate::openai::{ChatMessage, OpenAiClient, OpenAiError};

/// Parameterized best-deal selection: bounded to one row, ordered by
/// discount descending, the segment value always bound, never interpolated.
pub const BEST_DEAL_SQL: &str = "SELECT product_name_de, discount_percentage \
     FROM public.deals WHERE category_level_1 = $1 \
     ORDER BY discount_percentage DESC LIMIT 1";

static SELECT_STATEMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)SELECT\s.+?;").expect("select statement pattern"));

#[derive(Debug, Error)]
pub enum QueryError {
    #[error("no SELECT statement found in model output")]
    NoStatementFound,

    #[error("generated statement rejected: {0}")]
    Rejected(String),

    #[error(transparent)]
    Llm(#[from] OpenAiError),
}

/// How the deal query text is produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum QueryStrategy {
    /// Fixed parameterized statement
    Static,
    /// Ask the LLM for the statement, then extract and validate it
    Generative,
}

impl fmt::Display for QueryStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            QueryStrategy::Static => "static",
            QueryStrategy::Generative => "generative",
        };
        f.write_str(s)
    }
}

impl FromStr for QueryStrategy {
    type Err = UnknownStrategy;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "static" => Ok(QueryStrategy::Static),
            "generative" => Ok(QueryStrategy::Generative),
            _ => Err(UnknownStrategy(s.to_string())),
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown query strategy '{0}', expected 'static' or 'generative'")]
pub struct UnknownStrategy(pub String);

/// A read-only, single-row deal query ready for execution. `bind` carries
/// the segment value for the `$1` placeholder of the static statement;
/// validated generative statements carry the segment inline and have no
/// placeholder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DealQuery {
    pub sql: String,
    pub bind: Option<String>,
}

/// Build the fixed parameterized query for a catalog segment.
pub fn static_query(segment: &str) -> DealQuery {
    DealQuery {
        sql: BEST_DEAL_SQL.to_string(),
        bind: Some(segment.to_string()),
    }
}

/// Ask the text-generation endpoint for the statement, then extract the
/// first `SELECT ... ;` span and gate it through the allow-list validator.
pub async fn generative_query(
    client: &OpenAiClient,
    segment: &str,
) -> Result<DealQuery, QueryError> {
    let prompt = format!(
        "Generate an SQL query to fetch the best deal for the category '{segment}'. \
         The query should select 'product_name_de' and 'discount_percentage' from the \
         'public.deals' table, filter by 'category_level_1', order by \
         'discount_percentage' in descending order, and limit the results to 1. \
         Return only the SQL query as plain text, without any additional explanation \
         or formatting."
    );

    let raw = client
        .send_messages_raw(vec![ChatMessage {
            role: "user".to_string(),
            content: prompt,
        }])
        .await?;
    info!("Generated SQL text: {}", raw);

    let statement = extract_select_statement(&raw)?;
    info!("Extracted SELECT statement: {}", statement);
    validate_statement(&statement, segment)?;

    // Trailing semicolon is part of the extracted span but not wanted by the
    // prepared-statement protocol.
    Ok(DealQuery {
        sql: statement.trim_end_matches(';').trim().to_string(),
        bind: None,
    })
}

/// Scan free-form text for the first case-insensitive `SELECT ... ;`
/// substring, shortest span ending at the first semicolon.
pub fn extract_select_statement(text: &str) -> Result<String, QueryError> {
    SELECT_STATEMENT
        .find(text)
        .map(|m| m.as_str().to_string())
        .ok_or(QueryError::NoStatementFound)
}

/// Allow-list gate for generated statements: a single SELECT against
/// `public.deals` that mentions the expected segment and carries no mutation
/// keywords. Anything else is rejected and never executed.
pub fn validate_statement(statement: &str, segment: &str) -> Result<(), QueryError> {
    let lowered = statement.to_lowercase();
    let trimmed = lowered.trim();

    if !trimmed.starts_with("select") {
        return Err(QueryError::Rejected(
            "statement does not start with SELECT".to_string(),
        ));
    }
    if statement.matches(';').count() > 1 {
        return Err(QueryError::Rejected(
            "more than one statement".to_string(),
        ));
    }
    if !lowered.contains("public.deals") && !lowered.contains("from deals") {
        return Err(QueryError::Rejected(
            "statement does not target the deals table".to_string(),
        ));
    }
    if !lowered.contains(&segment.to_lowercase()) {
        return Err(QueryError::Rejected(format!(
            "statement does not reference segment '{segment}'"
        )));
    }

    const FORBIDDEN: [&str; 10] = [
        "insert", "update", "delete", "drop", "alter", "truncate", "grant", "revoke", "--", "/*",
    ];
    for keyword in FORBIDDEN {
        if lowered.contains(keyword) {
            return Err(QueryError::Rejected(format!(
                "forbidden token '{keyword}'"
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn static_query_binds_exactly_the_segment() {
        let query = static_query("fleischUndGefluegel");
        assert_eq!(query.sql, BEST_DEAL_SQL);
        assert_eq!(query.bind.as_deref(), Some("fleischUndGefluegel"));
        // segment goes through the placeholder, never the statement text
        assert!(query.sql.contains("$1"));
        assert!(!query.sql.contains("fleischUndGefluegel"));
    }

    #[test]
    fn static_query_is_bounded_and_ordered_by_discount() {
        let query = static_query("snacks");
        assert!(query.sql.contains("ORDER BY discount_percentage DESC"));
        assert!(query.sql.contains("LIMIT 1"));
    }

    #[test]
    fn extraction_returns_shortest_span_up_to_first_semicolon() {
        let text = "preamble SELECT a,b FROM t WHERE x=1; trailing";
        let statement = extract_select_statement(text).unwrap();
        assert_eq!(statement, "SELECT a,b FROM t WHERE x=1;");
    }

    #[test]
    fn extraction_is_case_insensitive_and_spans_lines() {
        let text = "```sql\nselect *\nfrom public.deals;\n```";
        let statement = extract_select_statement(text).unwrap();
        assert_eq!(statement, "select *\nfrom public.deals;");
    }

    #[test]
    fn extraction_without_terminated_select_is_no_statement_found() {
        let err = extract_select_statement("here is your query: UPDATE nothing").unwrap_err();
        assert!(matches!(err, QueryError::NoStatementFound));

        // SELECT without a terminating semicolon does not count
        let err = extract_select_statement("SELECT a FROM t").unwrap_err();
        assert!(matches!(err, QueryError::NoStatementFound));
    }

    #[test]
    fn validator_accepts_the_expected_generated_shape() {
        let statement = "SELECT product_name_de, discount_percentage FROM public.deals \
             WHERE category_level_1 = 'snacks' ORDER BY discount_percentage DESC LIMIT 1;";
        assert!(validate_statement(statement, "snacks").is_ok());
    }

    #[test]
    fn validator_rejects_mutation_and_wrong_targets() {
        let err = validate_statement("DROP TABLE public.deals;", "snacks").unwrap_err();
        assert!(matches!(err, QueryError::Rejected(_)));

        let err = validate_statement("SELECT * FROM public.users;", "snacks").unwrap_err();
        assert!(matches!(err, QueryError::Rejected(_)));

        let err = validate_statement(
            "SELECT * FROM public.deals WHERE category_level_1 = 'snacks'; DELETE FROM public.deals;",
            "snacks",
        )
        .unwrap_err();
        assert!(matches!(err, QueryError::Rejected(_)));

        let err = validate_statement(
            "SELECT * FROM public.deals WHERE category_level_1 = 'meat';",
            "snacks",
        )
        .unwrap_err();
        assert!(matches!(err, QueryError::Rejected(_)));
    }

    #[test]
    fn strategy_parses_from_env_style_strings() {
        assert_eq!("static".parse::<QueryStrategy>(), Ok(QueryStrategy::Static));
        assert_eq!(
            "Generative".parse::<QueryStrategy>(),
            Ok(QueryStrategy::Generative)
        );
        assert!("llm".parse::<QueryStrategy>().is_err());
    }
}

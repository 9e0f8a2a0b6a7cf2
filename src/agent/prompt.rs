use crate::db::Dialect;
use crate::schema::SchemaDescriptor;

/// Build the agent's standing instruction, embedding the schema descriptor.
pub fn build_system_prompt(dialect: Dialect, top_k: usize, schema: &SchemaDescriptor) -> String {
    format!(
        r#"You are an agent designed to interact with a {dialect} SQL database.
Given an input question, use the Table_Relationships provided below to create a syntactically correct {dialect} query to run, then look at the results of the query and return the answer.
Unless the user specifies a specific number of rows, always limit your query to at most {top_k} results.
You have access to tools for interacting with the database.
You MUST double check your query before executing it. If you get an error while executing a query, rewrite the query and try again.
You will use only tables provided in Table_Relationships for querying the result.
If the question contains trade then include the trade table in the join.

Table_Relationships
{schema}
When possible try to join tables to extend the retrieved information.
Suppress results if the value is -1.
Use the uppercase function while evaluating client name, research type, region, execution type, country and currency in the query.
If the result contains numbers only, then list the numbers in a tabular format.
If the query returns no rows, then return a message indicating that no results were found."#
    )
}

/// Prompt for the query-checker tool.
pub fn query_checker_prompt(dialect: Dialect, query: &str) -> String {
    format!(
        r#"{query}

Review the {dialect} query above for common mistakes:
- NOT IN against a column that may contain NULL values
- UNION where UNION ALL was intended
- BETWEEN used for an exclusive range
- mismatched data types in predicates
- identifiers that need quoting
- functions called with the wrong number of arguments
- missing or wrong casts
- joins on the wrong columns

If any of these are present, rewrite the query. Otherwise reproduce the original query unchanged.

Respond with the final SQL query only."#
    )
}

//! SQL toolkit: the callable capabilities the model may request.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{Value, json};

use super::ChatModel;
use super::prompt::query_checker_prompt;
use crate::db::{Dialect, SqlDatabase};
use crate::error::SearchError;
use crate::types::{AgentReply, ChatMessage, ToolCall, ToolSchema};

pub const LIST_TABLES: &str = "sql_db_list_tables";
pub const TABLE_SCHEMA: &str = "sql_db_schema";
pub const RUN_QUERY: &str = "sql_db_query";
pub const QUERY_CHECKER: &str = "sql_db_query_checker";

#[async_trait]
pub trait Tool: Send + Sync {
    fn name(&self) -> &str;
    fn description(&self) -> &str;
    fn parameters_schema(&self) -> Value;
    async fn execute(&self, args: Value) -> Result<String, SearchError>;

    fn schema(&self) -> ToolSchema {
        ToolSchema::function(self.name(), self.description(), self.parameters_schema())
    }
}

/// List the tables the database exposes.
pub struct ListTables {
    db: SqlDatabase,
}

#[async_trait]
impl Tool for ListTables {
    fn name(&self) -> &str {
        LIST_TABLES
    }

    fn description(&self) -> &str {
        "Input is an empty object, output is a comma-separated list of tables in the database."
    }

    fn parameters_schema(&self) -> Value {
        json!({ "type": "object", "properties": {} })
    }

    async fn execute(&self, _args: Value) -> Result<String, SearchError> {
        Ok(self.db.usable_table_names().await?.join(", "))
    }
}

/// Column definitions and sample rows for named tables.
pub struct TableSchema {
    db: SqlDatabase,
}

#[async_trait]
impl Tool for TableSchema {
    fn name(&self) -> &str {
        TABLE_SCHEMA
    }

    fn description(&self) -> &str {
        "Input is a comma-separated list of tables, output is the schema and sample rows for those tables. \
         Be sure that the tables actually exist by calling sql_db_list_tables first! \
         Example input: RATES, DEAL"
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "table_names": {
                    "type": "string",
                    "description": "A comma-separated list of the table names for which to return the schema. Example input: 'table1, table2, table3'"
                }
            },
            "required": ["table_names"]
        })
    }

    async fn execute(&self, args: Value) -> Result<String, SearchError> {
        let names = table_names_arg(self.name(), &args)?;
        self.db.table_info(&names).await
    }
}

/// Execute a query and return its rows.
pub struct RunQuery {
    db: SqlDatabase,
}

#[async_trait]
impl Tool for RunQuery {
    fn name(&self) -> &str {
        RUN_QUERY
    }

    fn description(&self) -> &str {
        "Input to this tool is a detailed and correct SQL query, output is a result from the database. \
         If the query is not correct, an error message will be returned. \
         If an error is returned, rewrite the query, check the query, and try again. \
         If you encounter an issue with Unknown column 'xxxx' in 'field list', \
         use sql_db_schema to query the correct table fields."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "query": { "type": "string", "description": "A detailed and correct SQL query." }
            },
            "required": ["query"]
        })
    }

    async fn execute(&self, args: Value) -> Result<String, SearchError> {
        let query = str_arg(self.name(), &args, "query")?;
        self.db.run(query).await
    }
}

/// Ask the model to double check a query before it is run.
pub struct QueryChecker {
    dialect: Dialect,
    model: Arc<dyn ChatModel>,
}

#[async_trait]
impl Tool for QueryChecker {
    fn name(&self) -> &str {
        QUERY_CHECKER
    }

    fn description(&self) -> &str {
        "Use this tool to double check if your query is correct before executing it. \
         Always use this tool before executing a query with sql_db_query!"
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "query": { "type": "string", "description": "A detailed and SQL query to be checked." }
            },
            "required": ["query"]
        })
    }

    async fn execute(&self, args: Value) -> Result<String, SearchError> {
        let query = str_arg(self.name(), &args, "query")?;
        let messages = [ChatMessage::user(query_checker_prompt(self.dialect, query))];
        let reply = self.model.complete(&messages, &[]).await?;
        Ok(AgentReply::from(reply).display_text())
    }
}

/// The set of tools bound to the agent, looked up by name.
#[derive(Clone)]
pub struct Toolkit {
    tools: Vec<Arc<dyn Tool>>,
}

impl Toolkit {
    pub fn new(tools: Vec<Arc<dyn Tool>>) -> Self {
        Self { tools }
    }

    /// The four SQL tools over `db`; the checker reuses `model`.
    pub fn sql(db: SqlDatabase, model: Arc<dyn ChatModel>) -> Self {
        let dialect = db.dialect();
        Self::new(vec![
            Arc::new(RunQuery { db: db.clone() }),
            Arc::new(TableSchema { db: db.clone() }),
            Arc::new(ListTables { db }),
            Arc::new(QueryChecker { dialect, model }),
        ])
    }

    pub fn schemas(&self) -> Vec<ToolSchema> {
        self.tools.iter().map(|t| t.schema()).collect()
    }

    pub fn names(&self) -> Vec<&str> {
        self.tools.iter().map(|t| t.name()).collect()
    }

    /// Run one requested call. Arguments arrive as a JSON-encoded string.
    pub async fn execute(&self, call: &ToolCall) -> Result<String, SearchError> {
        let name = call.function.name.as_str();
        let tool = self
            .tools
            .iter()
            .find(|t| t.name() == name)
            .ok_or_else(|| SearchError::UnknownTool(name.to_string(), self.names().join(", ")))?;

        let raw = call.function.arguments.trim();
        let args: Value = if raw.is_empty() {
            json!({})
        } else {
            serde_json::from_str(raw)
                .map_err(|e| SearchError::ToolArguments(name.to_string(), e.to_string()))?
        };
        tool.execute(args).await
    }
}

fn str_arg<'a>(tool: &str, args: &'a Value, key: &str) -> Result<&'a str, SearchError> {
    args.get(key)
        .and_then(Value::as_str)
        .ok_or_else(|| SearchError::ToolArguments(tool.to_string(), format!("missing `{key}`")))
}

/// `table_names` as a comma-separated string, or as an array of strings.
fn table_names_arg(tool: &str, args: &Value) -> Result<Vec<String>, SearchError> {
    let names: Vec<String> = match args.get("table_names") {
        Some(Value::String(s)) => s.split(',').map(|n| n.trim().to_string()).collect(),
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(Value::as_str)
            .map(|n| n.trim().to_string())
            .collect(),
        _ => Vec::new(),
    };
    let names: Vec<String> = names.into_iter().filter(|n| !n.is_empty()).collect();
    if names.is_empty() {
        return Err(SearchError::ToolArguments(
            tool.to_string(),
            "missing `table_names`".to_string(),
        ));
    }
    Ok(names)
}

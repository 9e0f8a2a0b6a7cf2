use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use ratecard_search::SearchError;
use ratecard_search::agent::tools::{LIST_TABLES, RUN_QUERY, TABLE_SCHEMA};
use ratecard_search::agent::{ChatModel, QueryAgent, SqlAgent};
use ratecard_search::db::{self, Credentials, Dialect, SqlDatabase};
use ratecard_search::schema::rate_card::rate_card;
use ratecard_search::service::InteractionLoop;
use ratecard_search::types::{AgentReply, ChatMessage, Role, ToolSchema};
use serde_json::{Value, json};
use sqlx::any::AnyPoolOptions;

const FIXTURE: &str = r#"
CREATE TABLE CLIENT (CLIENT_ID INTEGER PRIMARY KEY, CLIENT_NAME TEXT NOT NULL);
CREATE TABLE DEAL (DEAL_ID INTEGER PRIMARY KEY, CLIENT_ID INTEGER NOT NULL, STATUS INTEGER);
CREATE TABLE RATES (RATE_ID INTEGER PRIMARY KEY, DEAL_ID INTEGER NOT NULL, CURRENCY TEXT, CMSN_MIN REAL, STATUS INTEGER);
INSERT INTO CLIENT VALUES (1, 'ACME'), (2, 'GLOBEX');
INSERT INTO DEAL VALUES (10, 1, 1), (11, 2, 2);
INSERT INTO RATES VALUES (100, 10, 'USD', 1.5, 1), (101, 10, 'EUR', NULL, 1), (102, 11, 'GBP', -1, 1), (103, 11, 'USD', 2, 2);
"#;

/// One connection so every query sees the same in-memory database.
async fn rate_card_db() -> SqlDatabase {
    sqlx::any::install_default_drivers();
    let pool = AnyPoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await
        .expect("failed to open in-memory sqlite");

    for stmt in FIXTURE.split(';') {
        let stmt = stmt.trim();
        if stmt.is_empty() {
            continue;
        }
        sqlx::query(stmt)
            .execute(&pool)
            .await
            .expect("failed to load fixture");
    }
    SqlDatabase::new(pool, Dialect::Sqlite)
}

/// Replays canned replies in order and records every conversation it is sent.
struct ScriptedModel {
    replies: Mutex<VecDeque<Value>>,
    seen: Mutex<Vec<Vec<ChatMessage>>>,
}

impl ScriptedModel {
    fn new(replies: impl IntoIterator<Item = Value>) -> Arc<Self> {
        Arc::new(Self {
            replies: Mutex::new(replies.into_iter().collect()),
            seen: Mutex::new(Vec::new()),
        })
    }

    fn calls(&self) -> usize {
        self.seen.lock().expect("seen lock poisoned").len()
    }

    fn last_conversation(&self) -> Vec<ChatMessage> {
        self.seen
            .lock()
            .expect("seen lock poisoned")
            .last()
            .cloned()
            .unwrap_or_default()
    }
}

#[async_trait]
impl ChatModel for ScriptedModel {
    async fn complete(
        &self,
        messages: &[ChatMessage],
        _tools: &[ToolSchema],
    ) -> Result<Value, SearchError> {
        self.seen
            .lock()
            .expect("seen lock poisoned")
            .push(messages.to_vec());
        self.replies
            .lock()
            .expect("replies lock poisoned")
            .pop_front()
            .ok_or(SearchError::EmptyCompletion)
    }
}

fn tool_call(id: &str, name: &str, args: Value) -> Value {
    json!({
        "role": "assistant",
        "content": null,
        "tool_calls": [{
            "id": id,
            "type": "function",
            "function": { "name": name, "arguments": args.to_string() }
        }]
    })
}

fn answer(text: &str) -> Value {
    json!({ "role": "assistant", "content": text })
}

fn agent(db: SqlDatabase, model: Arc<ScriptedModel>, max_steps: usize) -> SqlAgent {
    SqlAgent::for_database(db, model, &rate_card(), 5, max_steps)
}

fn tool_outputs(transcript: &[AgentReply]) -> Vec<String> {
    transcript
        .iter()
        .filter_map(AgentReply::as_message)
        .filter(|m| m.role == Role::Tool)
        .filter_map(|m| m.content.clone())
        .collect()
}

#[tokio::test]
async fn lists_user_tables_sorted() {
    let db = rate_card_db().await;
    let tables = db.usable_table_names().await.expect("list tables");
    assert_eq!(tables, ["CLIENT", "DEAL", "RATES"]);
}

#[tokio::test]
async fn table_info_renders_columns_and_sample_rows() {
    let db = rate_card_db().await;
    let info = db
        .table_info(&["rates".to_string()])
        .await
        .expect("describe rates");

    assert!(info.starts_with("CREATE TABLE \"RATES\" ("));
    assert!(info.contains("\t\"DEAL_ID\" INTEGER NOT NULL"));
    assert!(info.contains("3 rows from RATES table:"));
    assert!(info.contains("RATE_ID\tDEAL_ID\tCURRENCY\tCMSN_MIN\tSTATUS"));
    assert!(info.contains("101\t10\tEUR\tNULL\t1"));
    assert!(!info.contains("103\t11"));
}

#[tokio::test]
async fn table_info_rejects_unknown_tables() {
    let db = rate_card_db().await;
    let err = db
        .table_info(&["RATES".to_string(), "TRADE".to_string()])
        .await
        .expect_err("TRADE is not in the fixture");
    assert!(matches!(err, SearchError::UnknownTables(missing) if missing == ["TRADE"]));
}

#[tokio::test]
async fn run_renders_rows_and_reports_sql_errors() {
    let db = rate_card_db().await;
    let out = db
        .run("SELECT COUNT(*) AS active FROM RATES WHERE STATUS = 1")
        .await
        .expect("count query");
    assert_eq!(out, "active\n3");

    let none = db
        .run("SELECT RATE_ID FROM RATES WHERE STATUS = 9")
        .await
        .expect("empty query");
    assert_eq!(none, "No rows returned.");

    let err = db
        .run("SELECT nope FROM RATES")
        .await
        .expect_err("bad column");
    assert!(matches!(err, SearchError::DatabaseError(_)));
}

#[tokio::test]
async fn connect_accepts_sqlite_locator() {
    let creds = Credentials::new("scott", "tiger", "sqlite::memory:");
    let db = db::connect(&creds, 2).await.expect("connect");
    assert_eq!(db.dialect(), Dialect::Sqlite);
    assert!(db.usable_table_names().await.expect("list").is_empty());
}

#[tokio::test]
async fn agent_feeds_tool_results_back_before_answering() {
    let db = rate_card_db().await;
    let model = ScriptedModel::new([
        tool_call("call_1", LIST_TABLES, json!({})),
        tool_call(
            "call_2",
            RUN_QUERY,
            json!({ "query": "SELECT COUNT(*) AS active FROM RATES WHERE STATUS = 1" }),
        ),
        answer("3 rates are active"),
    ]);
    let agent = agent(db, model.clone(), 10);

    let transcript = agent
        .invoke("How many rates are active?")
        .await
        .expect("agent run");

    assert_eq!(model.calls(), 3);
    assert_eq!(
        tool_outputs(&transcript),
        ["CLIENT, DEAL, RATES", "active\n3"]
    );
    let last = transcript.last().expect("final reply");
    assert_eq!(last.display_text(), "3 rates are active");

    let sent = model.last_conversation();
    assert_eq!(sent[0].role, Role::System);
    assert!(sent[0].content.as_deref().unwrap_or_default().contains("table: RATES = "));
    assert_eq!(sent[1].content.as_deref(), Some("How many rates are active?"));
    let fed_back = sent.last().expect("tool result");
    assert_eq!(fed_back.role, Role::Tool);
    assert_eq!(fed_back.tool_call_id.as_deref(), Some("call_2"));
}

#[tokio::test]
async fn tool_errors_are_returned_to_the_model() {
    let db = rate_card_db().await;
    let model = ScriptedModel::new([
        tool_call("call_1", RUN_QUERY, json!({ "query": "SELECT nope FROM RATES" })),
        tool_call("call_2", TABLE_SCHEMA, json!({ "table_names": "TRADE" })),
        tool_call("call_3", "sql_db_drop_everything", json!({})),
        answer("I could not find that."),
    ]);
    let agent = agent(db, model.clone(), 10);

    let transcript = agent.invoke("Which trades failed?").await.expect("agent run");
    let outputs = tool_outputs(&transcript);

    assert_eq!(outputs.len(), 3);
    assert!(outputs.iter().all(|o| o.starts_with("Error: ")));
    assert!(outputs.iter().all(|o| o.ends_with("Please fix your mistakes.")));
    assert!(outputs[1].contains("TRADE"));
    assert!(outputs[2].contains("sql_db_drop_everything is not a valid tool"));
    assert_eq!(
        transcript.last().expect("final reply").display_text(),
        "I could not find that."
    );
}

#[tokio::test]
async fn agent_stops_at_the_step_limit() {
    let db = rate_card_db().await;
    let model = ScriptedModel::new(
        (0..5).map(|i| tool_call(&format!("call_{i}"), LIST_TABLES, json!({}))),
    );
    let agent = agent(db, model.clone(), 3);

    let err = agent
        .invoke("Keep listing tables")
        .await
        .expect_err("never answers");
    assert!(matches!(err, SearchError::StepLimit(3)));
    assert_eq!(model.calls(), 3);
}

#[tokio::test]
async fn interaction_loop_returns_the_final_answer_text() {
    let db = rate_card_db().await;
    let model = ScriptedModel::new([
        tool_call(
            "call_1",
            RUN_QUERY,
            json!({ "query": "SELECT CURRENCY FROM RATES WHERE CMSN_MIN < 0" }),
        ),
        answer("GBP has a negative minimum commission."),
    ]);
    let interaction = InteractionLoop::new(Arc::new(agent(db, model, 10)), 1);

    let text = interaction
        .execute_query("Which rate has a negative minimum commission?")
        .await
        .expect("interaction");
    assert_eq!(text, "GBP has a negative minimum commission.");
}

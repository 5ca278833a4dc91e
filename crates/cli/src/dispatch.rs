use crate::render;
use anime_filters_engine::{FilterEngine, FilterError};
use anime_filters_protocol::{CommandRequest, CommandResponse, FilterCommand};
use serde::Serialize;
use serde_json::{json, Value};

/// Turns [`CommandRequest`]s into chat-ready [`CommandResponse`]s.
///
/// User-facing outcomes (empty list, stopped filters, missing input) are
/// `status: ok` with `data.kind` set to the error code; only storage failures
/// produce an error envelope.
#[derive(Clone)]
pub struct CommandHandler {
    engine: FilterEngine,
    batch_add: bool,
}

impl CommandHandler {
    pub fn new(engine: FilterEngine, batch_add: bool) -> Self {
        Self { engine, batch_add }
    }

    #[must_use]
    pub fn engine(&self) -> &FilterEngine {
        &self.engine
    }

    pub async fn execute(&self, request: CommandRequest) -> CommandResponse {
        log::debug!(
            "command {} chat={} args={:?}",
            request.command.as_str(),
            request.chat_id,
            request.args
        );
        let result = self.run(&request).await;
        match result {
            Ok(response) => response,
            Err(err) => failure_response(&err),
        }
    }

    async fn run(&self, request: &CommandRequest) -> Result<CommandResponse, FilterError> {
        let chat = request.chat_id.as_str();
        let args = request.args.as_str();

        let response = match request.command {
            FilterCommand::Add if self.batch_add => {
                let result = self.engine.add_batch(chat, args).await?;
                CommandResponse::ok(render::batch(&result), to_data(&result))
            }
            FilterCommand::Add | FilterCommand::AddOne => {
                let result = self.engine.add_one(chat, args).await?;
                CommandResponse::ok(render::added(&result), to_data(&result))
            }
            FilterCommand::List => {
                let result = self.engine.list(chat).await?;
                CommandResponse::ok(render::list(&result), to_data(&result))
            }
            FilterCommand::Page => {
                let page = self
                    .engine
                    .list_page(chat, page_index(request.page, args))
                    .await?;
                CommandResponse::ok(render::page(&page), to_data(&page))
            }
            FilterCommand::Search => {
                let matches = self.engine.search(chat, args).await?;
                let query = args.trim();
                CommandResponse::ok(
                    render::search(query, &matches),
                    json!({ "query": query, "matches": matches }),
                )
            }
            FilterCommand::Stop => {
                self.engine.set_active(chat, false).await?;
                CommandResponse::ok(render::STOPPED, json!({ "active": false }))
            }
            FilterCommand::Restart => {
                self.engine.set_active(chat, true).await?;
                CommandResponse::ok(render::RESTARTED, json!({ "active": true }))
            }
            FilterCommand::Count => {
                let count = self.engine.count(chat).await;
                CommandResponse::ok(render::count(count), json!({ "count": count }))
            }
            FilterCommand::Start => CommandResponse::ok(render::WELCOME, Value::Null),
            FilterCommand::Help => CommandResponse::ok(render::HELP, Value::Null),
        };
        Ok(response)
    }
}

/// One-based page number from the request field, else from the text, else 1.
fn page_index(page: Option<i64>, args: &str) -> i64 {
    let number = page
        .or_else(|| args.trim().parse().ok())
        .unwrap_or(1);
    number.saturating_sub(1)
}

fn to_data<T: Serialize>(value: &T) -> Value {
    serde_json::to_value(value).unwrap_or_default()
}

fn failure_response(err: &FilterError) -> CommandResponse {
    match err {
        FilterError::StorageUnavailable(source) => {
            log::error!("storage unavailable: {source}");
            CommandResponse::error(
                err.code(),
                render::error(err),
                err.to_string(),
                Some("Check that the data file or database is writable.".to_string()),
            )
        }
        _ => CommandResponse::ok(render::error(err), json!({ "kind": err.code() })),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anime_filters_engine::EngineConfig;
    use anime_filters_protocol::CommandStatus;
    use anime_filters_store::{open_store, StoreConfig};
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    async fn handler(tmp: &TempDir, batch_add: bool) -> CommandHandler {
        let config = StoreConfig {
            path: Some(tmp.path().join("anime_data.json")),
            ..StoreConfig::default()
        };
        let store = open_store(&config).await.unwrap();
        CommandHandler::new(FilterEngine::new(store, EngineConfig { page_size: 2 }), batch_add)
    }

    fn request(command: FilterCommand, args: &str) -> CommandRequest {
        CommandRequest {
            chat_id: "-100".to_string(),
            command,
            args: args.to_string(),
            page: None,
        }
    }

    #[test]
    fn page_numbers_are_one_based() {
        assert_eq!(page_index(None, ""), 0);
        assert_eq!(page_index(None, " 3 "), 2);
        assert_eq!(page_index(Some(2), "7"), 1);
        assert_eq!(page_index(None, "next"), 0);
        assert_eq!(page_index(Some(0), ""), -1);
    }

    #[tokio::test]
    async fn add_then_list() {
        let tmp = TempDir::new().unwrap();
        let handler = handler(&tmp, true).await;

        let added = handler
            .execute(request(FilterCommand::Add, "Naruto, Bleach"))
            .await;
        assert!(added.is_ok());
        assert_eq!(added.data["added_count"], 2);

        let listed = handler.execute(request(FilterCommand::List, "")).await;
        assert_eq!(listed.data["labels"], json!(["Naruto", "Bleach"]));
        assert!(listed.text.contains("• Bleach"));
    }

    #[tokio::test]
    async fn single_add_mode_keeps_commas() {
        let tmp = TempDir::new().unwrap();
        let handler = handler(&tmp, false).await;

        let added = handler
            .execute(request(FilterCommand::Add, "Love, Chunibyo & Other Delusions"))
            .await;
        assert_eq!(added.data["label"], "Love, Chunibyo & Other Delusions");
        assert_eq!(added.data["current_total"], 1);
    }

    #[tokio::test]
    async fn user_errors_are_ok_with_kind() {
        let tmp = TempDir::new().unwrap();
        let handler = handler(&tmp, true).await;

        let empty = handler.execute(request(FilterCommand::List, "")).await;
        assert_eq!(empty.status, CommandStatus::Ok);
        assert_eq!(empty.data["kind"], "empty");
        assert_eq!(empty.text, render::EMPTY);

        let usage = handler.execute(request(FilterCommand::Add, "  ")).await;
        assert_eq!(usage.data["kind"], "empty_input");

        let no_query = handler.execute(request(FilterCommand::Search, "")).await;
        assert_eq!(no_query.data["kind"], "empty_query");
    }

    #[tokio::test]
    async fn stop_gates_list_and_page_but_not_search() {
        let tmp = TempDir::new().unwrap();
        let handler = handler(&tmp, true).await;
        handler
            .execute(request(FilterCommand::Add, "Naruto, Bleach, Berserk"))
            .await;

        let stopped = handler.execute(request(FilterCommand::Stop, "")).await;
        assert_eq!(stopped.text, render::STOPPED);
        assert_eq!(
            handler.execute(request(FilterCommand::List, "")).await.data["kind"],
            "inactive"
        );
        assert_eq!(
            handler.execute(request(FilterCommand::Page, "1")).await.data["kind"],
            "inactive"
        );
        let found = handler.execute(request(FilterCommand::Search, "Ber")).await;
        assert_eq!(found.data["matches"], json!(["Berserk"]));

        handler.execute(request(FilterCommand::Restart, "")).await;
        let mut page_two = request(FilterCommand::Page, "");
        page_two.page = Some(2);
        let page = handler.execute(page_two).await;
        assert_eq!(page.data["items"], json!(["Berserk"]));
        assert_eq!(page.data["total_pages"], 2);
        assert!(page.text.contains("Page 2 of 2"));
    }

    #[tokio::test]
    async fn count_help_and_welcome() {
        let tmp = TempDir::new().unwrap();
        let handler = handler(&tmp, true).await;
        handler.execute(request(FilterCommand::AddOne, "Monster")).await;

        let count = handler.execute(request(FilterCommand::Count, "")).await;
        assert_eq!(count.data["count"], 1);
        assert_eq!(count.text, "📊 Total anime: 1");

        let help = handler.execute(request(FilterCommand::Help, "")).await;
        assert_eq!(help.text, render::HELP);
        assert_eq!(help.data, Value::Null);

        let welcome = handler.execute(request(FilterCommand::Start, "")).await;
        assert!(welcome.is_ok());
        assert_eq!(welcome.text, render::WELCOME);
    }

    #[tokio::test]
    async fn storage_failures_become_error_envelopes() {
        let tmp = TempDir::new().unwrap();
        let handler = handler(&tmp, true).await;
        // A directory in place of the data file makes every read and write fail.
        std::fs::create_dir(tmp.path().join("anime_data.json")).unwrap();

        let response = handler.execute(request(FilterCommand::Add, "Naruto")).await;
        assert_eq!(response.status, CommandStatus::Error);
        assert_eq!(response.text, render::STORAGE_UNAVAILABLE);
        assert_eq!(response.error.unwrap().code, "storage_unavailable");

        let listed = handler.execute(request(FilterCommand::List, "")).await;
        assert_eq!(listed.data["kind"], "empty");
    }
}

use anime_filters_engine::{EngineConfig, FilterEngine, FilterError};
use anime_filters_store::{open_store, Backend, LabelOrder, Partition, StoreConfig};
use pretty_assertions::assert_eq;
use tempfile::TempDir;

const CHAT: &str = "-1001234567890";

async fn engine_with(
    tmp: &TempDir,
    backend: Backend,
    partition: Partition,
    order: LabelOrder,
) -> FilterEngine {
    let config = StoreConfig {
        backend,
        path: Some(tmp.path().join(backend.default_path())),
        partition,
        order,
    };
    let store = open_store(&config).await.expect("open store");
    FilterEngine::new(store, EngineConfig::default())
}

async fn engines(tmp: &TempDir) -> Vec<FilterEngine> {
    let mut engines = Vec::new();
    for backend in [Backend::Json, Backend::Sqlite] {
        engines.push(engine_with(tmp, backend, Partition::Scoped, LabelOrder::Insertion).await);
    }
    engines
}

#[tokio::test]
async fn add_one_is_idempotent() {
    let tmp = TempDir::new().unwrap();
    for engine in engines(&tmp).await {
        let before = engine.count(CHAT).await;

        let first = engine.add_one(CHAT, "Naruto").await.unwrap();
        let second = engine.add_one(CHAT, "  Naruto ").await.unwrap();

        assert!(first.added);
        assert!(!second.added);
        assert_eq!(second.label, "Naruto");
        assert_eq!(second.current_total, before + 1);
        assert_eq!(engine.count(CHAT).await, before + 1);
    }
}

#[tokio::test]
async fn add_one_rejects_blank_input() {
    let tmp = TempDir::new().unwrap();
    for engine in engines(&tmp).await {
        assert!(matches!(
            engine.add_one(CHAT, "   ").await,
            Err(FilterError::EmptyInput)
        ));
        assert!(matches!(
            engine.add_batch(CHAT, " , ,").await,
            Err(FilterError::EmptyInput)
        ));
        assert_eq!(engine.count(CHAT).await, 0);
    }
}

#[tokio::test]
async fn insertion_order_is_preserved() {
    let tmp = TempDir::new().unwrap();
    for engine in engines(&tmp).await {
        let mut duplicates = Vec::new();
        for label in ["A", "B", "A", "C"] {
            if !engine.add_one(CHAT, label).await.unwrap().added {
                duplicates.push(label);
            }
        }

        let list = engine.list(CHAT).await.unwrap();
        assert_eq!(list.labels, vec!["A", "B", "C"]);
        assert_eq!(list.count, 3);
        assert_eq!(duplicates, vec!["A"]);
    }
}

#[tokio::test]
async fn batch_add_reports_added_and_duplicates() {
    let tmp = TempDir::new().unwrap();
    for engine in engines(&tmp).await {
        let result = engine
            .add_batch(CHAT, "Naruto, One Piece,  , Naruto")
            .await
            .unwrap();

        assert_eq!(result.added_count, 2);
        assert_eq!(result.added, vec!["Naruto", "One Piece"]);
        assert_eq!(result.duplicates, vec!["Naruto"]);
        assert_eq!(result.current_total, 2);

        let again = engine.add_batch(CHAT, "Bleach, One Piece").await.unwrap();
        assert_eq!(again.added_count, 1);
        assert_eq!(again.duplicates, vec!["One Piece"]);
        assert_eq!(again.current_total, 3);
    }
}

#[tokio::test]
async fn batch_without_comma_is_a_single_label() {
    let tmp = TempDir::new().unwrap();
    for engine in engines(&tmp).await {
        let result = engine.add_batch(CHAT, "  Jujutsu Kaisen  ").await.unwrap();
        assert_eq!(result.added, vec!["Jujutsu Kaisen"]);
        assert_eq!(engine.list(CHAT).await.unwrap().labels, vec!["Jujutsu Kaisen"]);
    }
}

#[tokio::test]
async fn pagination_math() {
    let tmp = TempDir::new().unwrap();
    for engine in engines(&tmp).await {
        let names: Vec<String> = (0..120).map(|i| format!("Anime {i:03}")).collect();
        let result = engine.add_batch(CHAT, &names.join(", ")).await.unwrap();
        assert_eq!(result.added_count, 120);

        let first = engine.list_page_sized(CHAT, 0, 50).await.unwrap();
        assert_eq!(first.total_pages, 3);
        assert_eq!(first.total_count, 120);
        assert_eq!(first.items.len(), 50);
        assert_eq!(first.items[0], "Anime 000");

        let last = engine.list_page_sized(CHAT, 2, 50).await.unwrap();
        assert_eq!(last.items.len(), 20);
        assert_eq!(last.items[0], "Anime 100");
        assert_eq!(last.items[19], "Anime 119");
        assert!(!last.has_next());

        let beyond = engine.list_page_sized(CHAT, 5, 50).await.unwrap();
        assert!(beyond.items.is_empty());
        assert_eq!(beyond.total_pages, 3);
        assert_eq!(beyond.page_index, 5);

        let negative = engine.list_page_sized(CHAT, -4, 50).await.unwrap();
        assert_eq!(negative.page_index, 0);
        assert_eq!(negative.items, first.items);

        let default_size = engine.list_page(CHAT, 1).await.unwrap();
        assert_eq!(default_size.page_size, 50);
        assert_eq!(default_size.items[0], "Anime 050");
    }
}

#[tokio::test]
async fn empty_scope_pages_as_one_empty_page() {
    let tmp = TempDir::new().unwrap();
    for engine in engines(&tmp).await {
        let page = engine.list_page(CHAT, 0).await.unwrap();
        assert!(page.items.is_empty());
        assert_eq!(page.total_pages, 1);
        assert_eq!(page.total_count, 0);
    }
}

#[tokio::test]
async fn search_is_case_sensitive_containment_in_scope_order() {
    let tmp = TempDir::new().unwrap();
    for engine in engines(&tmp).await {
        engine
            .add_batch(CHAT, "One Piece, Naruto, Onepunch Man, Bones")
            .await
            .unwrap();

        assert_eq!(engine.search(CHAT, "one").await.unwrap(), vec!["Bones"]);
        assert_eq!(
            engine.search(CHAT, " One ").await.unwrap(),
            vec!["One Piece", "Onepunch Man"]
        );
        assert!(engine.search(CHAT, "Bleach").await.unwrap().is_empty());
        assert!(matches!(
            engine.search(CHAT, "  ").await,
            Err(FilterError::EmptyQuery)
        ));
    }
}

#[tokio::test]
async fn sorted_order_applies_everywhere() {
    let tmp = TempDir::new().unwrap();
    for backend in [Backend::Json, Backend::Sqlite] {
        let engine = engine_with(&tmp, backend, Partition::Scoped, LabelOrder::Sorted).await;
        engine
            .add_batch(CHAT, "Naruto, Bleach, One Piece, Berserk")
            .await
            .unwrap();

        assert_eq!(
            engine.list(CHAT).await.unwrap().labels,
            vec!["Berserk", "Bleach", "Naruto", "One Piece"]
        );
        assert_eq!(
            engine.list_page_sized(CHAT, 1, 2).await.unwrap().items,
            vec!["Naruto", "One Piece"]
        );
        assert_eq!(
            engine.search(CHAT, "e").await.unwrap(),
            vec!["Berserk", "Bleach", "One Piece"]
        );
    }
}

#[tokio::test]
async fn empty_and_inactive_are_distinct() {
    let tmp = TempDir::new().unwrap();
    for engine in engines(&tmp).await {
        assert!(matches!(engine.list(CHAT).await, Err(FilterError::Empty)));

        engine.add_batch(CHAT, "Naruto, Bleach").await.unwrap();
        engine.set_active(CHAT, false).await.unwrap();
        assert!(matches!(engine.list(CHAT).await, Err(FilterError::Inactive)));
        assert!(matches!(
            engine.list_page(CHAT, 0).await,
            Err(FilterError::Inactive)
        ));
        assert_eq!(engine.search(CHAT, "Naruto").await.unwrap(), vec!["Naruto"]);

        engine.set_active(CHAT, true).await.unwrap();
        assert_eq!(
            engine.list(CHAT).await.unwrap().labels,
            vec!["Naruto", "Bleach"]
        );
    }
}

#[tokio::test]
async fn stopping_an_unknown_chat_creates_it_inactive() {
    let tmp = TempDir::new().unwrap();
    for engine in engines(&tmp).await {
        engine.set_active("fresh", false).await.unwrap();
        assert!(!engine.is_active("fresh").await);
        assert_eq!(engine.count("fresh").await, 0);

        // Empty is checked before Inactive.
        assert!(matches!(engine.list("fresh").await, Err(FilterError::Empty)));
        let page = engine.list_page("fresh", 0).await.unwrap();
        assert!(page.items.is_empty());
        assert_eq!(page.total_pages, 1);
    }
}

#[tokio::test]
async fn state_survives_reopen() {
    let tmp = TempDir::new().unwrap();
    for backend in [Backend::Json, Backend::Sqlite] {
        {
            let engine =
                engine_with(&tmp, backend, Partition::Scoped, LabelOrder::Insertion).await;
            engine.add_batch(CHAT, "Naruto, Bleach, Berserk").await.unwrap();
            engine.set_active(CHAT, false).await.unwrap();
            engine.add_one("other", "Monster").await.unwrap();
        }

        let reopened = engine_with(&tmp, backend, Partition::Scoped, LabelOrder::Insertion).await;
        assert!(!reopened.is_active(CHAT).await);
        reopened.set_active(CHAT, true).await.unwrap();
        assert_eq!(
            reopened.list(CHAT).await.unwrap().labels,
            vec!["Naruto", "Bleach", "Berserk"]
        );
        assert_eq!(reopened.list("other").await.unwrap().labels, vec!["Monster"]);
    }
}

#[tokio::test]
async fn global_partition_shares_list_across_chats() {
    let tmp = TempDir::new().unwrap();
    for backend in [Backend::Json, Backend::Sqlite] {
        let engine = engine_with(&tmp, backend, Partition::Global, LabelOrder::Insertion).await;
        engine.add_one("chat-a", "Naruto").await.unwrap();

        let result = engine.add_one("chat-b", "Naruto").await.unwrap();
        assert!(!result.added);
        assert_eq!(engine.list("chat-c").await.unwrap().labels, vec!["Naruto"]);
    }
}

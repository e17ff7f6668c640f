//! PostgreSQL backend tests.
//!
//! Configuration tests run everywhere. Tests that need a running PostgreSQL
//! instance use testcontainers and are behind the `integration` feature.
//!
//! Run with: `cargo test -p pgscout --features integration -- postgres_integration`

#![cfg(feature = "postgres")]

mod common;

use pgscout::backends::postgres::{PostgresConfig, PostgresSslMode};

// ============================================================================
// Configuration Tests (no PostgreSQL instance required)
// ============================================================================

#[test]
fn test_postgres_config_defaults() {
    let config = PostgresConfig::default();
    assert_eq!(config.host, "localhost");
    assert_eq!(config.port, 5432);
    assert_eq!(config.dbname, "postgres");
    assert_eq!(config.user, "postgres");
    assert!(config.password.is_none());
    assert_eq!(config.ssl_mode, PostgresSslMode::Prefer);
    assert_eq!(config.max_connections, 10);
    assert_eq!(config.connect_timeout_secs, 5);
    assert_eq!(config.statement_timeout_ms, 30000);
}

#[test]
fn test_postgres_config_serialization() {
    let config = PostgresConfig {
        host: "db.example.com".to_string(),
        port: 5433,
        password: Some("secret".to_string()),
        ..Default::default()
    };

    let json = serde_json::to_string(&config).unwrap();
    let parsed: PostgresConfig = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed, config);
}

#[test]
fn test_postgres_config_deserialize_with_defaults() {
    let config: PostgresConfig =
        serde_json::from_str(r#"{"host": "pg", "ssl_mode": "require"}"#).unwrap();
    assert_eq!(config.host, "pg");
    assert_eq!(config.port, 5432);
    assert_eq!(config.ssl_mode, PostgresSslMode::Require);
}

// ============================================================================
// Integration Tests (requires Docker for testcontainers)
// ============================================================================

/// Tests against a real PostgreSQL instance started with testcontainers.
///
/// Skip if no Docker:
///   cargo test -p pgscout --features integration -- --skip postgres_integration
#[cfg(feature = "integration")]
mod postgres_integration {
    use super::common::*;

    use pgscout::backends::postgres::{PgSearchConnection, PostgresConfig};
    use pgscout::{
        EngineConfig, PostgresEngine, SearchEngine, SearchIndex, SearchKey, SearchQuery,
        Searchable, Weight,
    };

    use testcontainers::ImageExt;
    use testcontainers::runners::AsyncRunner;
    use testcontainers_modules::postgres::Postgres;
    use tokio::sync::OnceCell;

    /// Shared PostgreSQL container reused across all tests in this module.
    struct SharedPg {
        host: String,
        port: u16,
        /// Kept alive for the duration of the test binary.
        _container: testcontainers::ContainerAsync<Postgres>,
    }

    static SHARED_PG: OnceCell<SharedPg> = OnceCell::const_new();

    async fn shared_pg() -> &'static SharedPg {
        SHARED_PG
            .get_or_init(|| async {
                let run_id = std::env::var("GITHUB_RUN_ID").unwrap_or_default();
                let container = Postgres::default()
                    .with_label("github.run_id", &run_id)
                    .start()
                    .await
                    .expect("Failed to start PostgreSQL container");

                let port = container
                    .get_host_port_ipv4(5432)
                    .await
                    .expect("Failed to get host port");

                let host = container
                    .get_host()
                    .await
                    .expect("Failed to get host")
                    .to_string();

                SharedPg {
                    host,
                    port,
                    _container: container,
                }
            })
            .await
    }

    async fn connect() -> PgSearchConnection {
        let pg = shared_pg().await;
        let config = PostgresConfig {
            host: pg.host.clone(),
            port: pg.port,
            password: Some("postgres".to_string()),
            max_connections: 5,
            ..Default::default()
        };
        PgSearchConnection::connect(config)
            .await
            .expect("Failed to connect to PostgreSQL")
    }

    /// Creates a uniquely named table so tests sharing the database stay
    /// isolated, and returns an index over it.
    async fn create_table(connection: &PgSearchConnection, soft_deletes: bool) -> SearchIndex {
        let table = format!("posts_{}", uuid::Uuid::new_v4().simple());
        let client = connection.pool().get().await.expect("pool");
        client
            .batch_execute(&format!(
                "CREATE TABLE {table} (
                    id BIGINT PRIMARY KEY,
                    text TEXT NOT NULL,
                    nullable TEXT,
                    bar INTEGER NOT NULL DEFAULT 0,
                    deleted_at TIMESTAMPTZ
                )"
            ))
            .await
            .expect("create table");

        let mut index = SearchIndex::new(table)
            .with_primary_field("text", None)
            .with_weighted_field("nullable", Weight::B);
        if soft_deletes {
            index = index.soft_deletes();
        }
        index
    }

    async fn insert(connection: &PgSearchConnection, index: &SearchIndex, row: (i64, &str, i32)) {
        let client = connection.pool().get().await.expect("pool");
        client
            .execute(
                &format!("INSERT INTO {} (id, text, bar) VALUES ($1, $2, $3)", index.table),
                &[&row.0, &row.1, &row.2],
            )
            .await
            .expect("insert");
    }

    /// A record bound to a runtime table name.
    struct Post {
        id: i64,
        text: String,
    }

    impl Post {
        fn fields(&self) -> Vec<pgscout::FieldValue> {
            vec![pgscout::FieldValue::new("text", Some(self.text.as_str()))]
        }
    }

    async fn index_posts(
        engine: &PostgresEngine<PgSearchConnection>,
        index: &SearchIndex,
        posts: &[Post],
    ) {
        use pgscout::sql::TsQueryBuilder;
        use pgscout::SearchConnection;

        for post in posts {
            let expr = TsQueryBuilder::vector_expression(index, engine.config(), &post.fields());
            let vector = engine
                .connection()
                .query_text(&TsQueryBuilder::select_vector(expr))
                .await
                .expect("vectorize")
                .expect("vector");
            engine
                .connection()
                .execute(&TsQueryBuilder::update_vector(
                    index,
                    &SearchKey::Int(post.id),
                    &vector,
                    &[],
                ))
                .await
                .expect("write vector");
        }
    }

    #[tokio::test]
    async fn postgres_integration_connect_error_keeps_sql_state() {
        use pgscout::{BackendError, EngineError};
        use tokio_postgres::error::SqlState;

        let pg = shared_pg().await;
        let config = PostgresConfig {
            host: pg.host.clone(),
            port: pg.port,
            dbname: "missing_db".to_string(),
            password: Some("postgres".to_string()),
            ..Default::default()
        };

        match PgSearchConnection::connect(config).await {
            Err(EngineError::Backend(BackendError::Postgres(e))) => {
                assert_eq!(e.code(), Some(&SqlState::INVALID_CATALOG_NAME));
            }
            other => panic!("expected a driver error, got {:?}", other.map(|_| ())),
        }
    }

    #[tokio::test]
    async fn postgres_integration_update_and_search_fixture_table() {
        let connection = connect().await;
        let engine = PostgresEngine::new(connection.clone());
        let client = connection.pool().get().await.expect("pool");
        client
            .batch_execute(
                r#"CREATE TABLE IF NOT EXISTS "table" (
                    id BIGINT PRIMARY KEY,
                    text TEXT NOT NULL,
                    nullable TEXT,
                    bar INTEGER NOT NULL DEFAULT 0,
                    searchable TSVECTOR
                );
                INSERT INTO "table" (id, text, bar) VALUES (1, 'Foo', 1)
                ON CONFLICT (id) DO NOTHING;"#,
            )
            .await
            .expect("fixture table");

        engine.update(&[TestModel::new(1, "Foo")]).await.unwrap();

        let results = engine
            .search(
                &SearchQuery::for_type::<TestModel>("foo")
                    .where_eq("bar", 1i64)
                    .take(5),
            )
            .await
            .unwrap();

        assert_eq!(engine.map_ids(&results), vec![SearchKey::Int(1)]);
        assert_eq!(engine.get_total_count(&results), 1);
        assert!(results.rows[0].rank > 0.0);

        let source = InMemorySource::new(vec![TestModel::new(1, "Foo")]);
        let records = engine.map(&results, &source).await.unwrap();
        assert_eq!(records, vec![TestModel::new(1, "Foo")]);

        engine.delete(&[TestModel::new(1, "Foo")]).await.unwrap();
        let results = engine
            .search(&SearchQuery::for_type::<TestModel>("foo"))
            .await
            .unwrap();
        assert!(results.is_empty());
        assert_eq!(TestModel::search_index().table, "table");
    }

    #[tokio::test]
    async fn postgres_integration_ranked_search_with_total_count() {
        let connection = connect().await;
        let engine = PostgresEngine::new(connection.clone());
        let index = create_table(&connection, false).await;
        engine.create_index(&index).await.unwrap();

        for (id, text) in [
            (1, "rust rust rust"),
            (2, "rust and postgres"),
            (3, "only postgres"),
        ] {
            insert(&connection, &index, (id, text, 1)).await;
        }
        index_posts(
            &engine,
            &index,
            &[
                Post { id: 1, text: "rust rust rust".to_string() },
                Post { id: 2, text: "rust and postgres".to_string() },
                Post { id: 3, text: "only postgres".to_string() },
            ],
        )
        .await;

        let first_page = engine
            .search(&SearchQuery::new(index.clone(), "rust").take(1))
            .await
            .unwrap();
        assert_eq!(engine.map_ids(&first_page), vec![SearchKey::Int(1)]);
        assert_eq!(engine.get_total_count(&first_page), 2);

        let second_page = engine
            .paginate(&SearchQuery::new(index.clone(), "rust"), 1, 2)
            .await
            .unwrap();
        assert_eq!(engine.map_ids(&second_page), vec![SearchKey::Int(2)]);
        assert_eq!(engine.get_total_count(&second_page), 2);

        let none = engine
            .search(&SearchQuery::new(index.clone(), "missing"))
            .await
            .unwrap();
        assert_eq!(engine.get_total_count(&none), 0);

        let mismatched = engine
            .search(&SearchQuery::new(index, "rust").where_eq("bar", 1.5))
            .await;
        assert!(mismatched.is_err());
    }

    #[tokio::test]
    async fn postgres_integration_soft_deleted_rows_are_excluded() {
        let connection = connect().await;
        let engine = PostgresEngine::new(connection.clone());
        let index = create_table(&connection, true).await;
        engine.create_index(&index).await.unwrap();

        insert(&connection, &index, (1, "hello", 0)).await;
        insert(&connection, &index, (2, "hello again", 0)).await;
        let rebuilt = engine.rebuild(&index).await.unwrap();
        assert_eq!(rebuilt, 2);

        let client = connection.pool().get().await.expect("pool");
        client
            .execute(
                &format!("UPDATE {} SET deleted_at = now() WHERE id = 2", index.table),
                &[],
            )
            .await
            .expect("soft delete");

        let results = engine
            .search(&SearchQuery::new(index.clone(), "hello"))
            .await
            .unwrap();
        assert_eq!(engine.map_ids(&results), vec![SearchKey::Int(1)]);

        let with_trashed = engine
            .search(&SearchQuery::new(index, "hello").with_trashed())
            .await
            .unwrap();
        assert_eq!(engine.get_total_count(&with_trashed), 2);
    }

    #[tokio::test]
    async fn postgres_integration_flush_and_drop_index() {
        let connection = connect().await;
        let engine = PostgresEngine::with_config(
            connection.clone(),
            EngineConfig {
                config: Some("english".to_string()),
                ..Default::default()
            },
        );
        let index = create_table(&connection, false).await;
        engine.create_index(&index).await.unwrap();
        engine.create_index(&index).await.unwrap();

        insert(&connection, &index, (1, "searching engines", 0)).await;
        engine.rebuild(&index).await.unwrap();

        let stemmed = engine
            .search(&SearchQuery::new(index.clone(), "search engine"))
            .await
            .unwrap();
        assert_eq!(engine.map_ids(&stemmed), vec![SearchKey::Int(1)]);

        engine.flush(&index).await.unwrap();
        let flushed = engine
            .search(&SearchQuery::new(index.clone(), "search"))
            .await
            .unwrap();
        assert!(flushed.is_empty());

        engine.delete_index(&index).await.unwrap();
        engine.delete_index(&index).await.unwrap();
    }
}

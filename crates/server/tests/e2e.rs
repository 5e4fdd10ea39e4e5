use std::net::SocketAddr;

use axum::Router;
use configs::{AppConfig, StoreBackend, StoreConfig};
use reqwest::StatusCode as HttpStatusCode;
use serde_json::{json, Value};
use service::records::EntityProfile;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use uuid::Uuid;

use server::routes;

fn cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

fn bundled_seed(file: &str) -> String {
    format!("{}/../../data/{}", env!("CARGO_MANIFEST_DIR"), file)
}

struct TestApp {
    base_url: String,
}

async fn start_server(profile: EntityProfile, cfg: AppConfig) -> anyhow::Result<TestApp> {
    let state = server::init(&cfg, profile).await?;
    let app: Router = routes::build_router(state, cors());
    let listener = TcpListener::bind((std::net::Ipv4Addr::LOCALHOST, 0)).await?;
    let addr: SocketAddr = listener.local_addr()?;
    let base_url = format!("http://{}:{}", addr.ip(), addr.port());

    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            eprintln!("server error: {}", e);
        }
    });

    Ok(TestApp { base_url })
}

fn memory_config(seed: String) -> AppConfig {
    AppConfig {
        store: StoreConfig {
            backend: Some(StoreBackend::Memory),
            seed_path: seed,
            collection: String::new(),
        },
        ..AppConfig::default()
    }
}

async fn pictures() -> anyhow::Result<TestApp> {
    start_server(EntityProfile::picture(), memory_config(bundled_seed("pictures.json"))).await
}

async fn songs() -> anyhow::Result<TestApp> {
    start_server(EntityProfile::song(), memory_config(bundled_seed("songs.json"))).await
}

fn client() -> reqwest::Client {
    reqwest::Client::new()
}

#[tokio::test]
async fn e2e_health_and_count() -> anyhow::Result<()> {
    let app = pictures().await?;
    let c = client();

    let res = c.get(format!("{}/health", app.base_url)).send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    assert_eq!(res.json::<Value>().await?, json!({"status": "OK"}));

    let res = c.get(format!("{}/count", app.base_url)).send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    assert_eq!(res.json::<Value>().await?, json!({"length": 10}));

    let res = c.get(format!("{}/picture", app.base_url)).send().await?;
    let list = res.json::<Value>().await?;
    assert_eq!(list.as_array().map(Vec::len), Some(10));
    assert_eq!(list[0]["id"], 1);
    Ok(())
}

#[tokio::test]
async fn e2e_picture_not_found() -> anyhow::Result<()> {
    let app = pictures().await?;
    let res = client().get(format!("{}/picture/999", app.base_url)).send().await?;
    assert_eq!(res.status(), HttpStatusCode::NOT_FOUND);
    assert_eq!(res.json::<Value>().await?, json!({"message": "picture not found"}));
    Ok(())
}

#[tokio::test]
async fn e2e_non_integer_id_is_not_found() -> anyhow::Result<()> {
    let app = pictures().await?;
    let c = client();

    let res = c.get(format!("{}/picture/abc", app.base_url)).send().await?;
    assert_eq!(res.status(), HttpStatusCode::NOT_FOUND);
    assert_eq!(res.json::<Value>().await?, json!({"message": "picture not found"}));

    let res = c
        .put(format!("{}/picture/1.5", app.base_url))
        .json(&json!({"id": 1}))
        .send()
        .await?;
    assert_eq!(res.status(), HttpStatusCode::NOT_FOUND);

    let res = c.delete(format!("{}/picture/x", app.base_url)).send().await?;
    assert_eq!(res.status(), HttpStatusCode::NOT_FOUND);
    assert_eq!(res.json::<Value>().await?, json!({"message": "picture not found"}));

    let res = c.get(format!("{}/count", app.base_url)).send().await?;
    assert_eq!(res.json::<Value>().await?, json!({"length": 10}));
    Ok(())
}

#[tokio::test]
async fn e2e_picture_create_duplicate_and_get() -> anyhow::Result<()> {
    let app = pictures().await?;
    let c = client();
    let pic = json!({
        "id": 200,
        "pic_url": "http://dummyimage.com/1.png",
        "event_city": "Quito"
    });

    let res = c.post(format!("{}/picture", app.base_url)).json(&pic).send().await?;
    assert_eq!(res.status(), HttpStatusCode::CREATED);
    assert_eq!(res.json::<Value>().await?, pic);

    let res = c.get(format!("{}/picture/200", app.base_url)).send().await?;
    assert_eq!(res.json::<Value>().await?, pic);

    // reqwest follows redirects by default; 302 has no Location so it is returned as-is
    let res = c.post(format!("{}/picture", app.base_url)).json(&pic).send().await?;
    assert_eq!(res.status(), HttpStatusCode::FOUND);
    assert_eq!(
        res.json::<Value>().await?,
        json!({"Message": "picture with id 200 already present"})
    );

    let res = c.get(format!("{}/count", app.base_url)).send().await?;
    assert_eq!(res.json::<Value>().await?, json!({"length": 11}));
    Ok(())
}

#[tokio::test]
async fn e2e_picture_update_overwrites() -> anyhow::Result<()> {
    let app = pictures().await?;
    let c = client();
    let body = json!({"id": 33, "pic_url": "http://new", "event_country": "Chile"});

    let res = c.put(format!("{}/picture/3", app.base_url)).json(&body).send().await?;
    assert_eq!(res.status(), HttpStatusCode::CREATED);
    assert_eq!(res.json::<Value>().await?, body);

    let res = c.get(format!("{}/picture/3", app.base_url)).send().await?;
    assert_eq!(res.json::<Value>().await?, body);

    let res = c.put(format!("{}/picture/999", app.base_url)).json(&body).send().await?;
    assert_eq!(res.status(), HttpStatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn e2e_picture_delete_twice() -> anyhow::Result<()> {
    let app = pictures().await?;
    let c = client();

    let res = c.delete(format!("{}/picture/2", app.base_url)).send().await?;
    assert_eq!(res.status(), HttpStatusCode::NO_CONTENT);
    assert!(res.bytes().await?.is_empty());

    let res = c.delete(format!("{}/picture/2", app.base_url)).send().await?;
    assert_eq!(res.status(), HttpStatusCode::NOT_FOUND);
    assert_eq!(res.json::<Value>().await?, json!({"message": "picture not found"}));
    Ok(())
}

#[tokio::test]
async fn e2e_songs_listing_is_wrapped() -> anyhow::Result<()> {
    let app = songs().await?;
    let c = client();

    let res = c.get(format!("{}/song", app.base_url)).send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    let body = res.json::<Value>().await?;
    assert_eq!(body["songs"].as_array().map(Vec::len), Some(20));
    assert!(body["songs"][0]["_id"].is_string());

    let res = c.get(format!("{}/count", app.base_url)).send().await?;
    assert_eq!(res.json::<Value>().await?, json!({"count": 20}));

    let res = c.get(format!("{}/song/1", app.base_url)).send().await?;
    let song = res.json::<Value>().await?;
    assert_eq!(song["id"], 1);
    assert_eq!(song["title"], "Original Title");
    Ok(())
}

#[tokio::test]
async fn e2e_song_create_and_validation() -> anyhow::Result<()> {
    let app = songs().await?;
    let c = client();
    let song = json!({
        "id": 323,
        "title": "in faucibus orci",
        "lyrics": "Integer tincidunt ante vel ipsum."
    });

    let res = c.post(format!("{}/song", app.base_url)).json(&song).send().await?;
    assert_eq!(res.status(), HttpStatusCode::CREATED);
    let body = res.json::<Value>().await?;
    let inserted = body["inserted id"].as_str().expect("inserted id").to_string();

    let res = c.get(format!("{}/song/323", app.base_url)).send().await?;
    assert_eq!(res.json::<Value>().await?["_id"], json!(inserted));

    let res = c.post(format!("{}/song", app.base_url)).json(&song).send().await?;
    assert_eq!(res.status(), HttpStatusCode::FOUND);
    assert_eq!(res.json::<Value>().await?, json!({"Message": "song with id 323 already present"}));

    let res = c
        .post(format!("{}/song", app.base_url))
        .json(&json!({"id": 324, "title": "X"}))
        .send()
        .await?;
    assert_eq!(res.status(), HttpStatusCode::BAD_REQUEST);
    assert_eq!(
        res.json::<Value>().await?,
        json!({"message": "Missing required fields: title and lyrics are required."})
    );
    Ok(())
}

#[tokio::test]
async fn e2e_song_update_paths() -> anyhow::Result<()> {
    let app = songs().await?;
    let c = client();

    let res = c
        .put(format!("{}/song/1", app.base_url))
        .json(&json!({"title": "Original Title", "lyrics": "Original lyrics"}))
        .send()
        .await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    assert_eq!(res.json::<Value>().await?, json!({"message": "song found, but nothing updated"}));

    let res = c
        .put(format!("{}/song/1", app.base_url))
        .json(&json!({"title": "Updated Song Title", "lyrics": "Updated song lyrics here"}))
        .send()
        .await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    let body = res.json::<Value>().await?;
    assert_eq!(body["id"], 1);
    assert_eq!(body["title"], "Updated Song Title");
    assert_eq!(body["lyrics"], "Updated song lyrics here");

    let res = c
        .put(format!("{}/song/999", app.base_url))
        .json(&json!({"title": "a", "lyrics": "b"}))
        .send()
        .await?;
    assert_eq!(res.status(), HttpStatusCode::NOT_FOUND);
    assert_eq!(res.json::<Value>().await?, json!({"message": "song not found"}));

    let res = c
        .put(format!("{}/song/1", app.base_url))
        .json(&json!({"title": "Song without lyrics"}))
        .send()
        .await?;
    assert_eq!(res.status(), HttpStatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn e2e_invalid_json_is_rejected() -> anyhow::Result<()> {
    let app = songs().await?;
    let c = client();

    let res = c
        .put(format!("{}/song/1", app.base_url))
        .header("content-type", "application/json")
        .body(r#"{"title": "New title", "lyrics": "New lyrics""#)
        .send()
        .await?;
    assert_eq!(res.status(), HttpStatusCode::BAD_REQUEST);
    assert_eq!(res.json::<Value>().await?, json!({"message": "Invalid JSON format"}));

    // no content type at all
    let res = c
        .put(format!("{}/song/1", app.base_url))
        .body(r#"{"title": "New title", "lyrics": "New lyrics"}"#)
        .send()
        .await?;
    assert_eq!(res.status(), HttpStatusCode::BAD_REQUEST);

    let res = c.post(format!("{}/song", app.base_url)).json(&json!([1, 2])).send().await?;
    assert_eq!(res.status(), HttpStatusCode::BAD_REQUEST);
    assert_eq!(res.json::<Value>().await?, json!({"message": "Invalid JSON format"}));
    Ok(())
}

#[tokio::test]
async fn e2e_startup_fails_without_seed() {
    let missing = std::env::temp_dir().join(format!("missing_{}.json", Uuid::new_v4()));
    let cfg = memory_config(missing.display().to_string());
    let res = server::init(&cfg, EntityProfile::picture()).await;
    assert!(matches!(res, Err(server::errors::StartupError::Runtime(_))));
}

#[tokio::test]
async fn e2e_startup_fails_on_malformed_seed() -> anyhow::Result<()> {
    let path = std::env::temp_dir().join(format!("seed_{}.json", Uuid::new_v4()));
    tokio::fs::write(&path, br#"[{"title": "no id"}]"#).await?;
    let res = server::init(&memory_config(path.display().to_string()), EntityProfile::song()).await;
    assert!(matches!(res, Err(server::errors::StartupError::Seed(_))));
    let _ = tokio::fs::remove_file(&path).await;
    Ok(())
}

#[tokio::test]
async fn e2e_document_backend_requires_service() {
    let mut cfg = memory_config(bundled_seed("songs.json"));
    cfg.store.backend = Some(StoreBackend::Document);
    let res = server::init(&cfg, EntityProfile::song()).await;
    assert!(matches!(res, Err(server::errors::StartupError::InvalidConfig(_))));
}

#[tokio::test]
async fn e2e_songs_on_document_store() -> anyhow::Result<()> {
    if std::env::var("SKIP_DB_TESTS").is_ok() {
        return Ok(());
    }
    let mut cfg = memory_config(bundled_seed("songs.json"));
    cfg.store.backend = Some(StoreBackend::Document);
    cfg.store.collection = format!("e2e_{}", Uuid::new_v4().simple());
    cfg.database.normalize_from_env();
    cfg.database.name = std::env::var("DOCSTORE_DATABASE").unwrap_or_else(|_| "songs".into());
    cfg.database.max_connections = 5;
    cfg.database.connect_timeout_secs = 10;
    if cfg.database.service.is_none() {
        eprintln!("DOCSTORE_SERVICE missing; skip document store e2e test.");
        return Ok(());
    }

    let app = start_server(EntityProfile::song(), cfg).await?;
    let c = client();

    let res = c.get(format!("{}/count", app.base_url)).send().await?;
    assert_eq!(res.json::<Value>().await?, json!({"count": 20}));

    let res = c
        .put(format!("{}/song/1", app.base_url))
        .json(&json!({"title": "Original Title", "lyrics": "Original lyrics"}))
        .send()
        .await?;
    assert_eq!(res.json::<Value>().await?, json!({"message": "song found, but nothing updated"}));

    let res = c.delete(format!("{}/song/1", app.base_url)).send().await?;
    assert_eq!(res.status(), HttpStatusCode::NO_CONTENT);
    let res = c.get(format!("{}/song/1", app.base_url)).send().await?;
    assert_eq!(res.status(), HttpStatusCode::NOT_FOUND);
    Ok(())
}

use bloombuhay_backend::storage::DbConnection;
use bloombuhay_backend::{create_router, AppState};
use bloombuhay_client::{ApiClient, ClientError, ListSync, UpdateStrategy};
use shared::{
    CreateHealthMetric, CreateJournalNote, HealthMetric, JournalNote, LoginRequest,
    MetricReading, RegisterRequest, UpdateJournalNote, WeightUnit,
};

/// Serves the real router over an in-memory database on an ephemeral port.
async fn spawn_backend() -> String {
    let db = DbConnection::in_memory().await.unwrap();
    let app = create_router(AppState::new(db), "http://localhost:8080").unwrap();
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

async fn signed_in_client(base_url: &str, email: &str) -> ApiClient {
    let client = ApiClient::with_base_url(base_url).unwrap();
    client
        .register(&RegisterRequest {
            name: "Maria".to_string(),
            email: email.to_string(),
            password: "sampaguita".to_string(),
        })
        .await
        .unwrap();
    client
}

fn note(title: &str) -> CreateJournalNote {
    CreateJournalNote {
        title: title.to_string(),
        content: "Today was a good day".to_string(),
        tags: vec!["Firsts".to_string()],
        mood: None,
        photo_url: None,
    }
}

#[tokio::test]
async fn test_created_record_replaces_placeholder() {
    let base_url = spawn_backend().await;
    let client = signed_in_client(&base_url, "maria@example.com").await;
    let mut notes = ListSync::new(client.resource::<JournalNote>(), UpdateStrategy::Optimistic);

    notes.refresh().await.unwrap();
    notes.create(&note("First smile")).await.unwrap();
    notes.create(&note("First bath")).await.unwrap();

    let server_ids: Vec<String> = client
        .resource::<JournalNote>()
        .list()
        .await
        .unwrap()
        .into_iter()
        .map(|n| n.id)
        .collect();
    assert_eq!(notes.ids(), server_ids);
    assert!(notes.ids().iter().all(|id| !id.starts_with("temp-")));
    assert_eq!(notes.list().items()[0].title, "First bath");
}

#[tokio::test]
async fn test_failed_delete_restores_record() {
    let base_url = spawn_backend().await;
    let client = signed_in_client(&base_url, "maria@example.com").await;
    let mut notes = ListSync::new(client.resource::<JournalNote>(), UpdateStrategy::Optimistic);
    notes.create(&note("Keep me")).await.unwrap();
    notes.create(&note("Stale")).await.unwrap();
    let before = notes.ids();

    // A second session removes the record behind this list's back.
    let other = ApiClient::with_base_url(&base_url).unwrap();
    other
        .login(&LoginRequest {
            email: "maria@example.com".to_string(),
            password: "sampaguita".to_string(),
        })
        .await
        .unwrap();
    let stale_id = before[0].clone();
    other.resource::<JournalNote>().delete(&stale_id).await.unwrap();

    let err = notes.delete(&stale_id).await.unwrap_err();
    assert!(err.is_not_found());
    assert_eq!(notes.ids(), before);
    assert_eq!(notes.list().error(), Some("Journal note not found"));
}

#[tokio::test]
async fn test_deleting_unknown_note_leaves_list_unchanged() {
    let base_url = spawn_backend().await;
    let client = signed_in_client(&base_url, "maria@example.com").await;
    let mut notes = ListSync::new(client.resource::<JournalNote>(), UpdateStrategy::Optimistic);
    notes.create(&note("Only note")).await.unwrap();
    let before = notes.ids();

    let err = notes.delete("does-not-exist").await.unwrap_err();
    assert_eq!(
        err,
        ClientError::Api {
            status: 404,
            message: "Journal note not found".to_string(),
        }
    );
    assert_eq!(notes.ids(), before);
}

#[tokio::test]
async fn test_update_strategies() {
    let base_url = spawn_backend().await;
    let client = signed_in_client(&base_url, "maria@example.com").await;

    let mut notes = ListSync::new(client.resource::<JournalNote>(), UpdateStrategy::Pessimistic);
    let created = notes.create(&note("Draft")).await.unwrap();
    let patch = UpdateJournalNote {
        title: Some("Final".to_string()),
        ..UpdateJournalNote::default()
    };
    let updated = notes.update(&created.id, &patch).await.unwrap();
    assert_eq!(updated.title, "Final");
    assert_eq!(updated.content, "Today was a good day");
    assert_eq!(notes.list().get(&created.id).unwrap().title, "Final");

    // After logout the request never leaves the client; the edit is rolled back.
    let mut optimistic = ListSync::new(client.resource::<JournalNote>(), UpdateStrategy::Optimistic);
    optimistic.refresh().await.unwrap();
    client.logout().await.unwrap();
    let rename = UpdateJournalNote {
        title: Some("Renamed".to_string()),
        ..UpdateJournalNote::default()
    };
    let err = optimistic.update(&created.id, &rename).await.unwrap_err();
    assert_eq!(err, ClientError::NotAuthenticated);
    assert_eq!(optimistic.list().get(&created.id).unwrap().title, "Final");
}

#[tokio::test]
async fn test_add_bmi_metric_through_client() {
    let base_url = spawn_backend().await;
    let client = signed_in_client(&base_url, "maria@example.com").await;
    let mut metrics = ListSync::new(client.resource::<HealthMetric>(), UpdateStrategy::Optimistic);

    let metric = metrics
        .create(&CreateHealthMetric {
            title: None,
            reading: MetricReading::Bmi {
                weight: 62.0,
                height: 165.0,
                weight_unit: WeightUnit::Kg,
                height_unit: Default::default(),
            },
            notes: None,
            recorded_at: None,
        })
        .await
        .unwrap();
    assert_eq!(metric.value, 22.8);
    assert_eq!(metric.category, "Healthy");
    assert_eq!(metrics.list().items()[0].id, metric.id);
}

#[tokio::test]
async fn test_invalid_note_is_never_sent() {
    let base_url = spawn_backend().await;
    let client = signed_in_client(&base_url, "maria@example.com").await;
    let mut notes = ListSync::new(client.resource::<JournalNote>(), UpdateStrategy::Optimistic);

    let err = notes.create(&note(" ")).await.unwrap_err();
    assert!(matches!(err, ClientError::Validation(_)));
    assert!(notes.list().is_empty());
    assert_eq!(notes.list().error(), Some("title is required"));
    assert!(client.resource::<JournalNote>().list().await.unwrap().is_empty());
}

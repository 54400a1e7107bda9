use super::*;
use std::sync::Arc;

use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::json;
use tokio::{net::TcpListener, sync::Mutex};

use crate::{ClientError, SortWorkbench};

#[derive(Debug, Clone, Copy)]
enum Mode {
    Ok,
    Fail(StatusCode),
    Garbage,
}

#[derive(Debug, Clone, PartialEq)]
struct UploadedField {
    name: String,
    file_name: Option<String>,
    contents: Vec<u8>,
}

#[derive(Clone)]
struct ServerState {
    mode: Mode,
    sort_requests: Arc<Mutex<Vec<(String, Vec<i64>)>>>,
    random_requests: Arc<Mutex<Vec<i64>>>,
    uploads: Arc<Mutex<Vec<UploadedField>>>,
}

impl ServerState {
    fn new(mode: Mode) -> Self {
        Self {
            mode,
            sort_requests: Arc::new(Mutex::new(Vec::new())),
            random_requests: Arc::new(Mutex::new(Vec::new())),
            uploads: Arc::new(Mutex::new(Vec::new())),
        }
    }

    fn reply(&self, body: serde_json::Value) -> Response {
        match self.mode {
            Mode::Ok => Json(body).into_response(),
            Mode::Fail(status) => (status, "service failure").into_response(),
            Mode::Garbage => "definitely not json".into_response(),
        }
    }
}

async fn handle_sort(
    State(state): State<ServerState>,
    Path(segment): Path<String>,
    Json(values): Json<Vec<i64>>,
) -> Response {
    state
        .sort_requests
        .lock()
        .await
        .push((segment, values.clone()));
    let mut sorted = values;
    sorted.sort_unstable();
    state.reply(json!({
        "comparacoes": 4,
        "movimentacoes": 3,
        "tempoExecucaoMs": 2,
        "vetorOrdenado": sorted,
    }))
}

async fn handle_generate(State(state): State<ServerState>, Path(count): Path<i64>) -> Response {
    state.random_requests.lock().await.push(count);
    let values: Vec<i64> = (0..count.max(0)).map(|n| (n * 7) % 5).collect();
    state.reply(json!(values))
}

async fn handle_load_file(State(state): State<ServerState>, mut multipart: Multipart) -> Response {
    while let Ok(Some(field)) = multipart.next_field().await {
        let name = field.name().unwrap_or_default().to_string();
        let file_name = field.file_name().map(str::to_string);
        let contents = field.bytes().await.map(|b| b.to_vec()).unwrap_or_default();
        state.uploads.lock().await.push(UploadedField {
            name,
            file_name,
            contents,
        });
    }
    state.reply(json!([8, 6, 7]))
}

async fn spawn_sorting_server(mode: Mode) -> anyhow::Result<(String, ServerState)> {
    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    let state = ServerState::new(mode);
    let app = Router::new()
        .route("/api/sort/load-file", post(handle_load_file))
        .route("/api/sort/generate-random/:count", get(handle_generate))
        .route("/api/sort/:algorithm", post(handle_sort))
        .with_state(state.clone());
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    Ok((format!("http://{addr}"), state))
}

#[tokio::test]
async fn sort_posts_json_array_to_algorithm_route() {
    let (server_url, state) = spawn_sorting_server(Mode::Ok).await.expect("spawn server");
    let service = HttpSortingService::new(server_url);

    let outcome = service
        .sort(SortAlgorithm::DirectInsertion, &[5, 3, 8, 1])
        .await
        .expect("sort");

    assert_eq!(
        *state.sort_requests.lock().await,
        vec![("insersao".to_string(), vec![5, 3, 8, 1])]
    );
    assert_eq!(
        outcome,
        SortOutcome {
            comparisons: 4,
            movements: 3,
            elapsed_millis: 2.0,
            sorted_vector: vec![1, 3, 5, 8],
        }
    );
}

#[tokio::test]
async fn generate_random_requests_count_route() {
    let (server_url, state) = spawn_sorting_server(Mode::Ok).await.expect("spawn server");
    let service = HttpSortingService::new(format!("{server_url}/"));

    let values = service.generate_random(4).await.expect("generate");

    assert_eq!(*state.random_requests.lock().await, vec![4]);
    assert_eq!(values, vec![0, 2, 4, 1]);
}

#[tokio::test]
async fn load_file_uploads_multipart_file_field() {
    let (server_url, state) = spawn_sorting_server(Mode::Ok).await.expect("spawn server");
    let service = HttpSortingService::new(server_url);

    let values = service
        .load_file(VectorFile::new("numbers.txt", b"8 6 7".to_vec()))
        .await
        .expect("load");

    assert_eq!(values, vec![8, 6, 7]);
    assert_eq!(
        *state.uploads.lock().await,
        vec![UploadedField {
            name: "file".to_string(),
            file_name: Some("numbers.txt".to_string()),
            contents: b"8 6 7".to_vec(),
        }]
    );
}

#[tokio::test]
async fn non_success_status_is_reported_with_status_code() {
    let (server_url, _state) = spawn_sorting_server(Mode::Fail(StatusCode::INTERNAL_SERVER_ERROR))
        .await
        .expect("spawn server");
    let service = HttpSortingService::new(server_url);

    let err = service.generate_random(10).await.expect_err("must fail");

    assert_eq!(
        err,
        ServiceError::Status {
            operation: Operation::GenerateRandom,
            status: 500,
        }
    );
    assert!(err.to_string().contains("500"));
}

#[tokio::test]
async fn client_error_status_is_not_treated_as_success() {
    let (server_url, _state) = spawn_sorting_server(Mode::Fail(StatusCode::BAD_REQUEST))
        .await
        .expect("spawn server");
    let service = HttpSortingService::new(server_url);

    let err = service
        .sort(SortAlgorithm::Shell, &[2, 1])
        .await
        .expect_err("must fail");

    assert!(matches!(err, ServiceError::Status { status: 400, .. }));
}

#[tokio::test]
async fn malformed_success_body_is_a_decode_error() {
    let (server_url, _state) = spawn_sorting_server(Mode::Garbage)
        .await
        .expect("spawn server");
    let service = HttpSortingService::new(server_url);

    let err = service
        .sort(SortAlgorithm::Quick, &[2, 1])
        .await
        .expect_err("must fail");

    assert!(matches!(err, ServiceError::Decode { .. }), "unexpected: {err:?}");
}

#[tokio::test]
async fn unreachable_service_is_a_transport_error() {
    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    drop(listener);
    let service = HttpSortingService::new(format!("http://{addr}"));

    let err = service.generate_random(3).await.expect_err("must fail");

    assert!(matches!(
        err,
        ServiceError::Transport {
            operation: Operation::GenerateRandom,
            ..
        }
    ));
}

#[tokio::test]
async fn workbench_sorts_through_http_service() {
    let (server_url, state) = spawn_sorting_server(Mode::Ok).await.expect("spawn server");
    let workbench = SortWorkbench::new(Arc::new(HttpSortingService::new(server_url)));
    workbench.set_vector_text("5, 3, 8, 1").await;

    let result = workbench.sort().await.expect("sort");

    assert_eq!(
        *state.sort_requests.lock().await,
        vec![("quick".to_string(), vec![5, 3, 8, 1])]
    );
    assert_eq!(result.original_vector, vec![5, 3, 8, 1]);
    assert_eq!(result.sorted_vector(), &[1, 3, 5, 8]);
    assert_eq!(workbench.snapshot().await.vector_text, "1, 3, 5, 8");
}

#[tokio::test]
async fn workbench_surfaces_service_failure_status() {
    let (server_url, _state) = spawn_sorting_server(Mode::Fail(StatusCode::INTERNAL_SERVER_ERROR))
        .await
        .expect("spawn server");
    let workbench = SortWorkbench::new(Arc::new(HttpSortingService::new(server_url)));

    let err = workbench.generate_random().await.expect_err("must fail");

    assert_eq!(err.status(), Some(500));
    assert!(matches!(err, ClientError::Service(_)));
    let state = workbench.snapshot().await;
    assert_eq!(state.vector_text, "");
    assert!(state.error_message().contains("500"));
}

//! Test helpers: stub upload endpoint, fixture frames, pipeline assembly.

use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::routing::post;
use axum::Router;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use snaprelay_capture::spool::Spool;
use snaprelay_capture::CaptureSource;
use snaprelay_client::{UploadClient, UploadClientConfig};
use snaprelay_pipeline::CapturePipeline;
use snaprelay_processing::JpegTranscoder;

/// What the stub observed about the last upload request.
#[derive(Default)]
pub struct SeenUpload {
    pub file_name_field: Option<String>,
    pub file_content_type: Option<String>,
    pub file_bytes: Option<Vec<u8>>,
}

pub struct StubState {
    pub hits: AtomicUsize,
    pub status: u16,
    pub body: String,
    pub seen: Mutex<Option<SeenUpload>>,
}

async fn upload_handler(
    State(state): State<Arc<StubState>>,
    mut multipart: Multipart,
) -> (StatusCode, String) {
    state.hits.fetch_add(1, Ordering::SeqCst);

    let mut seen = SeenUpload::default();
    while let Some(field) = multipart.next_field().await.unwrap() {
        match field.name().unwrap_or("") {
            "fileName" => seen.file_name_field = Some(field.text().await.unwrap()),
            "file" => {
                seen.file_content_type = field.content_type().map(String::from);
                seen.file_bytes = Some(field.bytes().await.unwrap().to_vec());
            }
            _ => {
                let _ = field.bytes().await;
            }
        }
    }

    *state.seen.lock().unwrap() = Some(seen);
    (
        StatusCode::from_u16(state.status).unwrap(),
        state.body.clone(),
    )
}

/// Spawn an in-process upload endpoint answering with the given status and
/// body. Returns the endpoint URL and the shared observation state.
pub async fn spawn_stub(status: u16, body: &str) -> (String, Arc<StubState>) {
    let state = Arc::new(StubState {
        hits: AtomicUsize::new(0),
        status,
        body: body.to_string(),
        seen: Mutex::new(None),
    });

    let app = Router::new()
        .route("/upload", post(upload_handler))
        .with_state(state.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (format!("http://{}/upload", addr), state)
}

/// A small decodable PNG frame, stand-in for a device capture.
pub fn create_test_png() -> Vec<u8> {
    use image::{ImageFormat, Rgb, RgbImage};
    use std::io::Cursor;

    let mut img = RgbImage::new(64, 64);
    for y in 0..64 {
        for x in 0..64 {
            img.put_pixel(x, y, Rgb([(x * 4) as u8, (y * 4) as u8, 128]));
        }
    }
    let mut buffer = Vec::new();
    img.write_to(&mut Cursor::new(&mut buffer), ImageFormat::Png)
        .unwrap();
    buffer
}

/// Assemble a pipeline against the stub endpoint with a fast retry policy.
pub async fn make_pipeline(
    endpoint: &str,
    spool_dir: &std::path::Path,
    source: Arc<dyn CaptureSource>,
) -> CapturePipeline {
    snaprelay_core::telemetry::init_telemetry();

    let mut config = UploadClientConfig::new(endpoint, "test-secret");
    config.connect_retries = 1;
    config.retry_delay = Duration::from_millis(10);

    let client = Arc::new(UploadClient::new(config).unwrap());
    let spool = Spool::open(spool_dir).await.unwrap();

    CapturePipeline::new(source, Arc::new(JpegTranscoder), client, spool, 70)
}

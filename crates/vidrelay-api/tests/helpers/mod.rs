//! Test helpers: build the router around in-memory fakes.
//!
//! Run from workspace root: `cargo test -p vidrelay-api`. No network or Docker needed.

pub mod fakes;
pub mod logs;

use axum_test::TestServer;
use fakes::{FakeSink, FakeStore};
use std::sync::Arc;
use vidrelay_api::setup::routes;
use vidrelay_api::state::{AppState, UploadSettings};

pub const TEST_MAX_VIDEO_SIZE_BYTES: usize = 1024 * 1024;

/// Test application: server plus handles on the fakes behind it.
pub struct TestApp {
    pub server: TestServer,
    pub sink: Arc<FakeSink>,
    pub store: Arc<FakeStore>,
}

impl TestApp {
    pub fn client(&self) -> &TestServer {
        &self.server
    }
}

pub fn default_settings() -> UploadSettings {
    UploadSettings {
        max_video_size_bytes: TEST_MAX_VIDEO_SIZE_BYTES,
        orphan_cleanup_enabled: true,
    }
}

pub fn setup_test_app() -> TestApp {
    setup_test_app_with(FakeSink::default(), FakeStore::default(), default_settings())
}

pub fn setup_test_app_with(sink: FakeSink, store: FakeStore, settings: UploadSettings) -> TestApp {
    let sink = Arc::new(sink);
    let store = Arc::new(store);
    let state = Arc::new(AppState::new(sink.clone(), store.clone(), settings));
    let server = TestServer::new(routes::setup_routes(state)).expect("Failed to build test server");

    TestApp {
        server,
        sink,
        store,
    }
}

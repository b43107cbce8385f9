//! Shared fixtures for app integration tests.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, OnceLock};

use async_trait::async_trait;
use design_review_app::PageController;
use design_review_transport::{
    AnalysisClient, AnalysisTransport, TransportError, TransportResponse,
};
use design_review_ui::AnalysisState;
use design_review_upload::{DataUrlEncoder, EncodeError, FileEncoder, UploadedFile};
use tokio::sync::Barrier;
use url::Url;

/// Transport replaying one outcome and recording the analyzing flag it saw.
#[allow(dead_code)]
pub struct MockTransport {
    outcome: Result<TransportResponse, TransportError>,
    observed_state: OnceLock<Arc<Mutex<AnalysisState>>>,
    pub analyzing_during_call: Mutex<Vec<bool>>,
}

#[allow(dead_code)]
impl MockTransport {
    pub fn json(status: u16, body: &str) -> Arc<Self> {
        Self::respond(status, Some("application/json"), body)
    }

    pub fn respond(status: u16, content_type: Option<&str>, body: &str) -> Arc<Self> {
        Self::with_outcome(Ok(TransportResponse {
            status,
            content_type: content_type.map(str::to_string),
            body: body.as_bytes().to_vec(),
        }))
    }

    pub fn unreachable() -> Arc<Self> {
        Self::with_outcome(Err(TransportError::Connect(
            "tcp connect error: Connection refused (os error 111)".to_string(),
        )))
    }

    fn with_outcome(outcome: Result<TransportResponse, TransportError>) -> Arc<Self> {
        Arc::new(Self {
            outcome,
            observed_state: OnceLock::new(),
            analyzing_during_call: Mutex::new(Vec::new()),
        })
    }

    /// Lets the transport inspect controller state while a request is in flight.
    pub fn observe(&self, state: Arc<Mutex<AnalysisState>>) {
        let _ = self.observed_state.set(state);
    }
}

#[async_trait]
impl AnalysisTransport for MockTransport {
    async fn post_json(
        &self,
        _url: &Url,
        _body: Vec<u8>,
    ) -> Result<TransportResponse, TransportError> {
        if let Some(state) = self.observed_state.get() {
            let analyzing = state.lock().expect("state lock").is_analyzing;
            self.analyzing_during_call
                .lock()
                .expect("observation lock")
                .push(analyzing);
        }
        self.outcome.clone()
    }
}

/// Transport answering successive requests with queued JSON responses.
///
/// With a barrier, each request waits until `parties` requests are in flight.
#[allow(dead_code)]
pub struct SequencedTransport {
    responses: Mutex<VecDeque<TransportResponse>>,
    barrier: Option<Barrier>,
}

#[allow(dead_code)]
impl SequencedTransport {
    pub fn json(responses: &[(u16, &str)]) -> Arc<Self> {
        Arc::new(Self {
            responses: Mutex::new(json_responses(responses)),
            barrier: None,
        })
    }

    pub fn json_in_flight_together(responses: &[(u16, &str)]) -> Arc<Self> {
        Arc::new(Self {
            responses: Mutex::new(json_responses(responses)),
            barrier: Some(Barrier::new(responses.len())),
        })
    }
}

fn json_responses(responses: &[(u16, &str)]) -> VecDeque<TransportResponse> {
    responses
        .iter()
        .map(|(status, body)| TransportResponse {
            status: *status,
            content_type: Some("application/json".to_string()),
            body: body.as_bytes().to_vec(),
        })
        .collect()
}

#[async_trait]
impl AnalysisTransport for SequencedTransport {
    async fn post_json(
        &self,
        _url: &Url,
        _body: Vec<u8>,
    ) -> Result<TransportResponse, TransportError> {
        let response = self
            .responses
            .lock()
            .expect("response queue lock")
            .pop_front()
            .expect("a response should be queued for every request");
        if let Some(barrier) = &self.barrier {
            barrier.wait().await;
        }
        Ok(response)
    }
}

/// Builds a controller over any transport.
#[allow(dead_code)]
pub fn controller_over(transport: Arc<dyn AnalysisTransport>) -> PageController {
    let client =
        AnalysisClient::new("http://localhost:3000", transport).expect("client should build");
    PageController::new(client, Arc::new(DataUrlEncoder::new()))
}

/// Encoder whose reads always fail.
#[allow(dead_code)]
pub struct UnreadableEncoder;

#[async_trait]
impl FileEncoder for UnreadableEncoder {
    async fn encode(&self, file: &UploadedFile) -> Result<String, EncodeError> {
        Err(EncodeError::Read {
            name: file.name.clone(),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        })
    }
}

/// Builds a controller whose transport observes its state.
#[allow(dead_code)]
pub fn controller_with(transport: Arc<MockTransport>) -> PageController {
    let client = AnalysisClient::new("http://localhost:3000", transport.clone())
        .expect("client should build");
    let controller = PageController::new(client, Arc::new(DataUrlEncoder::new()));
    transport.observe(controller.state_handle());
    controller
}

/// Small in-memory PNG upload.
#[allow(dead_code)]
pub fn fixture_upload() -> UploadedFile {
    UploadedFile::from_bytes("landing-page.png", "image/png", vec![0x89, b'P', b'N', b'G'])
}

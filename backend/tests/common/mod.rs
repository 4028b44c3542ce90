//! Shared fixtures for the integration tests

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::{to_bytes, Body};
use axum::http::Response;
use serde_json::Value;
use tokio::sync::Notify;
use spatialgpt_backend::{
    config::Config,
    external::{NominatimClient, OpenMeteoClient, OverpassClient},
    services::{
        llm::{LanguageModel, ModelRegistry, ModelRequest, ModelResponse, CHAT_MODEL_SMALL},
        ChatService, LocalBlobStore, PlacesService, VisualizationService,
    },
    tools::{Tool, ToolError, ToolRegistry},
    AppError, AppResult, AppState,
};

/// Language model that replays canned responses and records its requests
#[derive(Default)]
pub struct ScriptedModel {
    responses: Mutex<VecDeque<AppResult<ModelResponse>>>,
    requests: Mutex<Vec<ModelRequest>>,
}

impl ScriptedModel {
    pub fn new(responses: Vec<AppResult<ModelResponse>>) -> Arc<Self> {
        Arc::new(Self {
            responses: Mutex::new(responses.into()),
            requests: Mutex::new(Vec::new()),
        })
    }

    pub fn requests(&self) -> Vec<ModelRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl LanguageModel for ScriptedModel {
    fn model_id(&self) -> &str {
        "scripted"
    }

    async fn generate(&self, request: &ModelRequest) -> AppResult<ModelResponse> {
        self.requests.lock().unwrap().push(request.clone());
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(AppError::LanguageModel("script exhausted".into())))
    }
}

/// Tool returning its arguments under `echo`
pub struct EchoTool;

#[async_trait]
impl Tool for EchoTool {
    fn name(&self) -> &'static str {
        "echo"
    }

    fn description(&self) -> &'static str {
        "Return the arguments"
    }

    fn parameters(&self) -> Value {
        serde_json::json!({"type": "object", "properties": {}})
    }

    async fn execute(&self, args: Value) -> Result<Value, ToolError> {
        if args.get("fail").is_some() {
            return Err(ToolError::Failed("echo refused".into()));
        }
        Ok(serde_json::json!({ "echo": args }))
    }
}

/// Tool that holds its call open until released
#[derive(Clone, Default)]
pub struct GateTool {
    release: Arc<Notify>,
    calls: Arc<AtomicUsize>,
}

impl GateTool {
    pub fn release(&self) {
        self.release.notify_one();
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Tool for GateTool {
    fn name(&self) -> &'static str {
        "gate"
    }

    fn description(&self) -> &'static str {
        "Wait until released"
    }

    fn parameters(&self) -> Value {
        serde_json::json!({"type": "object", "properties": {}})
    }

    async fn execute(&self, _args: Value) -> Result<Value, ToolError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.release.notified().await;
        Ok(serde_json::json!({ "released": true }))
    }
}

pub fn state_with(models: ModelRegistry, tools: ToolRegistry) -> AppState {
    let mut config = Config::defaults().unwrap();
    config.storage.upload_dir = std::env::temp_dir()
        .join(format!("spatialgpt-test-{}", uuid::Uuid::new_v4()))
        .to_string_lossy()
        .into_owned();

    let open_meteo = OpenMeteoClient::new(config.open_meteo.clone());
    let places = PlacesService::new(
        NominatimClient::new(&config.geocoding),
        OverpassClient::new(&config.overpass),
    );

    AppState {
        chat: ChatService::new(models, tools, config.llm.max_steps),
        visualization: VisualizationService::new(open_meteo, &config.cache),
        places,
        blobs: Arc::new(LocalBlobStore::new(&config.storage)),
        config: Arc::new(config),
    }
}

pub fn scripted_state(model: Arc<ScriptedModel>) -> AppState {
    let models = ModelRegistry::new().with(CHAT_MODEL_SMALL, model);
    state_with(models, ToolRegistry::new().with(EchoTool))
}

pub async fn body_text(response: Response<Body>) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

/// Split a data stream body into `(code, payload)` pairs
pub fn stream_parts(body: &str) -> Vec<(char, Value)> {
    body.lines()
        .map(|line| {
            let (code, payload) = line.split_once(':').unwrap();
            (
                code.chars().next().unwrap(),
                serde_json::from_str(payload).unwrap(),
            )
        })
        .collect()
}

use std::{
    sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    },
    time::Duration,
};

use async_trait::async_trait;

use atelier::{
    catalog::PresetDimension,
    engine::{CreativeEngine, EngineSettings, SelectionRequest},
    reasoning::{ReasoningError, ReasoningPort, ReasoningRequest},
    relevance::RelevanceQuery,
    selection::{AssistedContext, AssistedSettings, SelectionSource},
    telemetry::EngineTelemetryEvent,
};

use crate::{capture_hook, uniform_catalog};

struct FailingReasoner {
    calls: AtomicUsize,
}

#[async_trait]
impl ReasoningPort for FailingReasoner {
    async fn complete(&self, _request: ReasoningRequest) -> Result<String, ReasoningError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(ReasoningError::Transient("upstream unavailable".to_string()))
    }
}

struct SlowReasoner;

#[async_trait]
impl ReasoningPort for SlowReasoner {
    async fn complete(&self, _request: ReasoningRequest) -> Result<String, ReasoningError> {
        tokio::time::sleep(Duration::from_millis(500)).await;
        Ok(String::new())
    }
}

struct ScriptedReasoner {
    reply: String,
}

#[async_trait]
impl ReasoningPort for ScriptedReasoner {
    async fn complete(&self, request: ReasoningRequest) -> Result<String, ReasoningError> {
        assert!(request.user_prompt.contains("Brand: Jus d'Orange Co"));
        assert!(request.user_prompt.ends_with("---END---"));
        assert!(request.seed.is_some());
        Ok(self.reply.clone())
    }
}

fn settings(timeout_ms: u64) -> AssistedSettings {
    AssistedSettings {
        timeout: Duration::from_millis(timeout_ms),
        ..AssistedSettings::default()
    }
}

fn engine_with(port: Arc<dyn ReasoningPort>, timeout_ms: u64) -> CreativeEngine<PresetDimension> {
    CreativeEngine::new(uniform_catalog(20), EngineSettings::default())
        .with_reasoner(port, settings(timeout_ms))
}

fn request(post_index: u64) -> SelectionRequest {
    SelectionRequest::new("beverage", &["breakfast"], "cal-1")
        .with_post_index(post_index)
        .with_assisted_context(
            AssistedContext::new("Jus d'Orange Co").with_product("Fresh orange juice"),
        )
}

#[tokio::test]
async fn given_failing_service_when_selecting_hundred_times_then_every_call_falls_back() {
    let port = Arc::new(FailingReasoner {
        calls: AtomicUsize::new(0),
    });
    let (hook, events) = capture_hook();
    let engine = engine_with(port.clone(), 1_000).with_telemetry(hook);

    for post_index in 0..100 {
        let scored = engine
            .select_creative_attributes(request(post_index))
            .await
            .expect("soft failures never escape");
        assert_eq!(scored.selection.source().path(), "deterministic");
    }

    assert_eq!(port.calls.load(Ordering::SeqCst), 100);
    let events = events.lock().expect("events lock");
    let soft_failures = events
        .iter()
        .filter(|event| matches!(
            event,
            EngineTelemetryEvent::AssistedSoftFailure { reason, .. } if reason == "service"
        ))
        .count();
    assert_eq!(soft_failures, 100);
}

#[tokio::test]
async fn given_slow_service_when_timeout_elapses_then_deterministic_result_is_returned() {
    let (hook, events) = capture_hook();
    let engine = engine_with(Arc::new(SlowReasoner), 20).with_telemetry(hook);

    let scored = engine
        .select_creative_attributes(request(0).with_seed(77))
        .await
        .expect("timeout is a soft failure");

    assert_eq!(
        scored.selection.source(),
        &SelectionSource::Deterministic { seed: 77 }
    );
    let events = events.lock().expect("events lock");
    assert!(events.iter().any(|event| matches!(
        event,
        EngineTelemetryEvent::AssistedSoftFailure { reason, .. } if reason == "timeout"
    )));
}

#[tokio::test]
async fn given_valid_block_when_selecting_then_assisted_choices_are_used_and_recorded() {
    let reply = "---SELECTION---\nVersion: 1\nStyle: 3\nPalette: 1\nFramework: [4]\nContext: 0\nLighting: 2\nJustification: Sunny breakfast table.\n---END---";
    let engine = engine_with(
        Arc::new(ScriptedReasoner {
            reply: reply.to_string(),
        }),
        1_000,
    );
    let set = engine.filter(&RelevanceQuery::new("beverage", &["breakfast"]));

    let scored = engine
        .select_creative_attributes(request(0))
        .await
        .expect("assisted selection should succeed");

    assert_eq!(
        scored.selection.source(),
        &SelectionSource::Assisted {
            justification: Some("Sunny breakfast table.".to_string())
        }
    );
    assert_eq!(
        scored.selection.name(PresetDimension::Style),
        set.pool(PresetDimension::Style)[3].name
    );
    assert_eq!(
        scored.selection.name(PresetDimension::Framework),
        set.pool(PresetDimension::Framework)[4].name
    );
    let scope = request(0).scope();
    assert_eq!(
        engine.window(&scope, PresetDimension::Style).await,
        vec![set.pool(PresetDimension::Style)[3].name.clone()]
    );
}

#[tokio::test]
async fn given_out_of_range_index_when_selecting_then_reply_is_rejected() {
    let reply = "---SELECTION---\nStyle: 99\nPalette: 1\nFramework: 4\nContext: 0\nLighting: 2\n---END---";
    let (hook, events) = capture_hook();
    let engine = engine_with(
        Arc::new(ScriptedReasoner {
            reply: reply.to_string(),
        }),
        1_000,
    )
    .with_telemetry(hook);

    let scored = engine
        .select_creative_attributes(request(0))
        .await
        .expect("invalid index is a soft failure");

    assert_eq!(scored.selection.source().path(), "deterministic");
    let events = events.lock().expect("events lock");
    assert!(events.iter().any(|event| matches!(
        event,
        EngineTelemetryEvent::AssistedSoftFailure { reason, .. } if reason == "out_of_range"
    )));
}

#[tokio::test]
async fn given_reply_without_block_when_selecting_then_deterministic_path_is_taken() {
    let engine = engine_with(
        Arc::new(ScriptedReasoner {
            reply: "Style: 1, Palette: 2 and the rest is up to you.".to_string(),
        }),
        1_000,
    );

    let scored = engine
        .select_creative_attributes(request(0))
        .await
        .expect("missing block is a soft failure");

    assert_eq!(scored.selection.source().path(), "deterministic");
}

#[tokio::test]
async fn given_no_assisted_context_then_service_is_never_called() {
    let port = Arc::new(FailingReasoner {
        calls: AtomicUsize::new(0),
    });
    let engine = engine_with(port.clone(), 1_000);

    engine
        .select_creative_attributes(SelectionRequest::new("beverage", &[], "cal-1"))
        .await
        .expect("deterministic selection should succeed");

    assert_eq!(port.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn given_context_without_service_then_disabled_path_emits_no_soft_failure() {
    let (hook, events) = capture_hook();
    let engine =
        CreativeEngine::new(uniform_catalog(20), EngineSettings::default()).with_telemetry(hook);

    let scored = engine
        .select_creative_attributes(request(0))
        .await
        .expect("deterministic selection should succeed");

    assert_eq!(scored.selection.source().path(), "deterministic");
    let events = events.lock().expect("events lock");
    assert!(
        !events
            .iter()
            .any(|event| matches!(event, EngineTelemetryEvent::AssistedSoftFailure { .. }))
    );
}

//! Stubs every mock server carries regardless of its stub source.

use multimock_core::{RequestPattern, ResponseDefinition, StubMapping};
use serde_json::json;

pub const HEALTH_STUB_ID: &str = "multimock-health";
pub const CATCH_ALL_STUB_ID: &str = "multimock-catch-all";

/// Priority of the catch-all stub: the lowest there is, so every file stub
/// runs first. A file stub at this priority ties and loses, since the
/// defaults are installed after the stub source.
pub const CATCH_ALL_PRIORITY: u8 = u8::MAX;

/// `GET /health` answering `{"status":"UP","service":"<service>"}`.
pub fn health_stub(service: &str) -> StubMapping {
    StubMapping::new(
        HEALTH_STUB_ID,
        RequestPattern::get("/health"),
        ResponseDefinition::json(200, json!({"status": "UP", "service": service})),
    )
}

/// Any request, answering 404 `{"error":"Endpoint not found","service":"<service>"}`.
pub fn catch_all_stub(service: &str) -> StubMapping {
    StubMapping::new(
        CATCH_ALL_STUB_ID,
        RequestPattern::any(),
        ResponseDefinition::json(
            404,
            json!({"error": "Endpoint not found", "service": service}),
        ),
    )
    .with_priority(CATCH_ALL_PRIORITY)
}

pub fn default_stubs(service: &str) -> [StubMapping; 2] {
    [health_stub(service), catch_all_stub(service)]
}

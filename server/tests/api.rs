use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;
use uuid::Uuid;

use skypark_server::config::Config;
use skypark_server::routes::create_routes;
use skypark_server::state::AppState;

const NOW: &str = "2025-07-14T09:00:00Z";

fn app() -> Router {
    create_routes(AppState::new(Config::default()))
}

fn booking(status: &str, visit_date: &str) -> Value {
    json!({
        "id": Uuid::new_v4(),
        "booking_number": "SKP-2025-000101",
        "user_id": Uuid::new_v4(),
        "park_id": Uuid::new_v4(),
        "status": status,
        "visit_date": visit_date,
        "visit_time": "12:00",
        "adults_count": 2,
        "children_count": 1,
        "base_price": 1500,
        "total_amount": 1500,
        "contact_name": "Нурлан",
        "contact_phone": "+996700111222",
        "created_at": "2025-07-01T08:00:00Z",
        "updated_at": "2025-07-01T08:00:00Z"
    })
}

fn ticket() -> Value {
    json!({
        "id": Uuid::new_v4(),
        "ticket_number": "skp-2025-000007",
        "booking_id": Uuid::new_v4(),
        "user_id": Uuid::new_v4(),
        "type": "adult",
        "status": "active",
        "holder_name": "Нурлан",
        "price": 1000,
        "valid_from": "2025-07-14T08:00:00Z",
        "valid_to": "2025-07-14T10:00:00Z",
        "qr_code": "qr_b41d",
        "created_at": "2025-07-10T08:00:00Z",
        "updated_at": "2025-07-10T08:00:00Z"
    })
}

async fn post(app: Router, uri: &str, body: Value) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();

    send(app, request).await
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn test_health_check() {
    let request = Request::builder()
        .uri("/health")
        .body(Body::empty())
        .unwrap();
    let response = app().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get("x-content-type-options").unwrap(),
        "nosniff"
    );
    assert!(response.headers().get("strict-transport-security").is_none());
}

#[tokio::test]
async fn test_confirmed_booking_three_hours_out_is_cancellable() {
    let (status, body) = post(
        app(),
        "/api/v1/bookings/eligibility",
        json!({ "booking": booking("confirmed", "2025-07-14T12:00:00Z"), "now": NOW }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["can_cancel"], true);
    assert_eq!(body["data"]["can_check_in"], true);
    assert_eq!(body["data"]["total_guests"], 3);
    assert_eq!(body["data"]["status_color"], "blue");
}

#[tokio::test]
async fn test_confirmed_booking_one_hour_out_is_not_cancellable() {
    let (_, body) = post(
        app(),
        "/api/v1/bookings/eligibility",
        json!({ "booking": booking("confirmed", "2025-07-14T10:00:00Z"), "now": NOW }),
    )
    .await;

    assert_eq!(body["data"]["can_cancel"], false);
}

#[tokio::test]
async fn test_invalid_phone_is_unprocessable() {
    let mut record = booking("pending", "2025-07-20T10:00:00Z");
    record["contact_phone"] = json!("+7 700 111 22 33");

    let (status, body) = post(
        app(),
        "/api/v1/bookings/validate",
        json!({ "booking": record }),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"]["code"], "INVALID_FIELDS");
    assert_eq!(body["error"]["details"][0]["field"], "contact_phone");
}

#[tokio::test]
async fn test_malformed_json_is_bad_request() {
    let request = Request::builder()
        .method("POST")
        .uri("/api/v1/bookings/eligibility")
        .header("content-type", "application/json")
        .body(Body::from("{\"booking\": 42}"))
        .unwrap();
    let (status, body) = send(app(), request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_late_cancellation_conflicts() {
    let (status, body) = post(
        app(),
        "/api/v1/bookings/transition",
        json!({
            "booking": booking("confirmed", "2025-07-14T10:00:00Z"),
            "action": { "type": "cancel", "reason": "Не успеваем" },
            "now": NOW
        }),
    )
    .await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"]["code"], "CANCELLATION_WINDOW_CLOSED");
}

#[tokio::test]
async fn test_check_in_transition() {
    let (status, body) = post(
        app(),
        "/api/v1/bookings/transition",
        json!({
            "booking": booking("confirmed", "2025-07-14T12:00:00Z"),
            "action": { "type": "check_in" },
            "now": NOW
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "checked_in");
    assert_eq!(body["data"]["checked_in_at"], NOW);
}

#[tokio::test]
async fn test_search_paginates() {
    let bookings: Vec<Value> = (0..3)
        .map(|_| booking("pending", "2025-07-20T10:00:00Z"))
        .collect();

    let (status, body) = post(
        app(),
        "/api/v1/bookings/search",
        json!({ "bookings": bookings, "filter": { "limit": 2 } }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["total"], 3);
    assert_eq!(body["data"]["bookings"].as_array().unwrap().len(), 2);
    assert_eq!(body["data"]["has_more"], true);
}

#[tokio::test]
async fn test_time_slots_come_from_config() {
    let request = Request::builder()
        .uri(format!("/api/v1/bookings/parks/{}/time-slots", Uuid::new_v4()))
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(app(), request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["labels"][0], "09:00-12:00");
    assert_eq!(body["data"]["labels"].as_array().unwrap().len(), 4);
}

#[tokio::test]
async fn test_availability_with_explicit_capacity() {
    let park_id = Uuid::new_v4();
    let mut first = booking("confirmed", "2025-07-20T10:00:00Z");
    first["park_id"] = json!(park_id);
    let mut second = booking("pending", "2025-07-20T10:00:00Z");
    second["park_id"] = json!(park_id);

    let (status, body) = post(
        app(),
        &format!("/api/v1/parks/{}/availability", park_id),
        json!({
            "date": "2025-07-20",
            "bookings": [first, second],
            "capacity": {
                "total_capacity": 2,
                "time_slots": [{ "start": "12:00", "end": "15:00", "capacity": 3 }]
            }
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["available_slots"], 0);
    assert_eq!(body["data"]["is_fully_booked"], true);
    assert_eq!(body["data"]["time_slots"][0]["time"], "12:00-15:00");
    assert_eq!(body["data"]["time_slots"][0]["available"], 1);
    assert_eq!(body["data"]["time_slots"][0]["is_available"], true);
}

#[tokio::test]
async fn test_ticket_check_and_qr_payload() {
    let (status, body) = post(
        app(),
        "/api/v1/tickets/check",
        json!({ "ticket": ticket(), "now": NOW }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["can_use"], true);
    assert_eq!(body["data"]["display_number"], "SKP-2025-000007");
    assert_eq!(body["data"]["check"]["verdict"], "usable");

    let (_, body) = post(
        app(),
        "/api/v1/tickets/qr-payload",
        json!({ "ticket": ticket() }),
    )
    .await;

    let encoded: Value =
        serde_json::from_str(body["data"]["encoded"].as_str().unwrap()).unwrap();
    assert_eq!(encoded["qr"], "qr_b41d");
    assert_eq!(encoded["number"], "skp-2025-000007");
    assert_eq!(encoded["type"], "adult");
}

#[tokio::test]
async fn test_redeem_then_rescan() {
    let staff_id = Uuid::new_v4();
    let (status, body) = post(
        app(),
        "/api/v1/tickets/redeem",
        json!({
            "ticket": ticket(),
            "qr_code": "qr_b41d",
            "park_id": Uuid::new_v4(),
            "staff_id": staff_id,
            "now": NOW
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["can_enter"], true);
    assert_eq!(body["data"]["ticket"]["used_by"], json!(staff_id));

    let redeemed = body["data"]["ticket"].clone();
    assert_eq!(redeemed["status"], "used");

    let (status, body) = post(
        app(),
        "/api/v1/tickets/redeem",
        json!({
            "ticket": redeemed,
            "qr_code": "qr_b41d",
            "park_id": Uuid::new_v4(),
            "staff_id": staff_id,
            "now": "2025-07-14T09:20:00Z"
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["valid"], true);
    assert_eq!(body["data"]["can_enter"], false);
    assert_eq!(body["data"]["check"]["verdict"], "already_used");
    assert_eq!(body["data"]["message"], "Билет уже использован");
}

#[tokio::test]
async fn test_unknown_route_is_not_found() {
    let request = Request::builder()
        .uri("/api/v1/parks")
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(app(), request).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"]["code"], "NOT_FOUND");
}

#[tokio::test]
async fn test_guest_total_does_not_overflow() {
    let mut record = booking("pending", "2025-07-20T10:00:00Z");
    record["adults_count"] = json!(u32::MAX);
    record["children_count"] = json!(1);

    let (status, body) = post(
        app(),
        "/api/v1/bookings/eligibility",
        json!({ "booking": record, "now": NOW }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["total_guests"], json!(4_294_967_296u64));
}

#[tokio::test]
async fn test_bare_visit_date_is_accepted() {
    let (status, body) = post(
        app(),
        "/api/v1/bookings/eligibility",
        json!({ "booking": booking("confirmed", "2025-07-15"), "now": NOW }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    // midnight UTC on the 15th is 15h away
    assert_eq!(body["data"]["can_check_in"], true);
    assert_eq!(body["data"]["can_cancel"], true);
}

#[tokio::test]
async fn test_check_in_with_actual_party() {
    let (status, body) = post(
        app(),
        "/api/v1/bookings/transition",
        json!({
            "booking": booking("confirmed", "2025-07-14T12:00:00Z"),
            "action": {
                "type": "check_in",
                "actual_adults": 1,
                "check_in_notes": "Пришел один взрослый"
            },
            "now": NOW
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["adults_count"], 1);
    assert_eq!(body["data"]["children_count"], 1);
    assert_eq!(body["data"]["admin_notes"], "Пришел один взрослый");
}

#[tokio::test]
async fn test_ticket_search() {
    let mut child = ticket();
    child["type"] = json!("child");
    child["ticket_number"] = json!("skp-2025-000008");

    let (status, body) = post(
        app(),
        "/api/v1/tickets/search",
        json!({
            "tickets": [ticket(), child],
            "filter": { "type": "child", "valid_from": "2025-07-14" }
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["total"], 1);
    assert_eq!(body["data"]["tickets"][0]["ticket_number"], "skp-2025-000008");
    assert_eq!(body["data"]["has_more"], false);
}

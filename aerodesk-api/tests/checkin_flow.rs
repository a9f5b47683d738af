use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use chrono::{NaiveDate, TimeZone, Utc};
use serde_json::{json, Value};
use tower::ServiceExt;

use aerodesk_api::{
    app,
    state::{AppState, AuthSettings},
};
use aerodesk_checkin::{CabinSpec, DeskSettings, SeatLayout};
use aerodesk_core::employee::Employee;
use aerodesk_core::flight::Flight;
use aerodesk_core::passenger::Passenger;
use aerodesk_core::repository::{EmployeeRepository, FlightRepository, PassengerRepository};
use aerodesk_shared::pii::Masked;
use aerodesk_store::MemoryStore;

async fn seeded_state() -> AppState {
    let store = Arc::new(MemoryStore::new());

    EmployeeRepository::create(
        &*store,
        &Employee {
            employee_id: 42,
            first_name: "Arda".to_string(),
            last_name: "Yilmaz".to_string(),
            email: "arda@aerodesk.example".to_string(),
            role: "AGENT".to_string(),
            password: Masked("s3cret".to_string()),
        },
    )
    .await
    .unwrap();

    for (id, first, last, phone) in [
        ("P1001", "Nadia", "Okafor", "555-0001"),
        ("P1002", "Jonas", "Berg", "555-0002"),
    ] {
        PassengerRepository::create(
            &*store,
            &Passenger {
                passenger_id: id.to_string(),
                first_name: first.to_string(),
                last_name: last.to_string(),
                gender: "X".to_string(),
                birth_date: NaiveDate::from_ymd_opt(1988, 2, 20).unwrap(),
                phone_number: Masked(phone.to_string()),
            },
        )
        .await
        .unwrap();
    }

    FlightRepository::create(
        &*store,
        &Flight {
            flight_number: "FL200".to_string(),
            departure_location: "IST".to_string(),
            arrival_location: "AMS".to_string(),
            scheduled_departure: Utc.with_ymd_and_hms(2025, 3, 14, 9, 30, 0).unwrap(),
            scheduled_arrival: Utc.with_ymd_and_hms(2025, 3, 14, 13, 5, 0).unwrap(),
            gate: "B12".to_string(),
        },
    )
    .await
    .unwrap();

    let layout = SeatLayout::from_cabins(
        &CabinSpec {
            first_row: 1,
            last_row: 4,
            letters: "ABCD".to_string(),
        },
        &CabinSpec {
            first_row: 5,
            last_row: 30,
            letters: "ABCDEF".to_string(),
        },
    )
    .unwrap();

    AppState {
        passengers: store.clone(),
        flights: store.clone(),
        boardings: store.clone(),
        services: store.clone(),
        employees: store.clone(),
        layout: Arc::new(layout),
        auth: AuthSettings {
            secret: "test-secret".to_string(),
            expiration_seconds: 3600,
        },
        desk_settings: DeskSettings {
            store_timeout: Duration::from_millis(500),
            default_baggage_kg: 20,
        },
    }
}

async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    let request = match body {
        Some(value) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(value.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

async fn login(app: &Router) -> String {
    let (status, body) = send(
        app,
        Method::POST,
        "/v1/auth/login",
        None,
        Some(json!({ "email": "arda@aerodesk.example", "password": "s3cret" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    body["token"].as_str().unwrap().to_string()
}

fn seat_state<'a>(seatmap: &'a Value, label: &str) -> &'a str {
    seatmap["seats"]
        .as_array()
        .unwrap()
        .iter()
        .find(|seat| seat["label"] == label)
        .unwrap()["state"]
        .as_str()
        .unwrap()
}

#[tokio::test]
async fn test_login_and_full_check_in_flow() {
    let app = app(seeded_state().await);
    let token = login(&app).await;

    let (status, passenger) = send(
        &app,
        Method::GET,
        "/v1/passengers/P1001",
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(passenger["first_name"], "Nadia");

    let (status, committed) = send(
        &app,
        Method::POST,
        "/v1/checkins",
        Some(&token),
        Some(json!({
            "passenger_id": "P1001",
            "flight_number": "FL200",
            "seat_label": "12A"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(committed["boarding"]["seat_label"], "12A");
    assert_eq!(committed["passenger_name"], "Nadia Okafor");

    let (status, seatmap) = send(
        &app,
        Method::GET,
        "/v1/flights/FL200/seatmap",
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(seat_state(&seatmap, "12A"), "OCCUPIED");
    assert_eq!(seat_state(&seatmap, "12B"), "FREE");

    // Same seat, different passenger: rejected.
    let (status, body) = send(
        &app,
        Method::POST,
        "/v1/checkins",
        Some(&token),
        Some(json!({
            "passenger_id": "P1002",
            "flight_number": "FL200",
            "seat_label": "12A"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert!(body["error"].as_str().unwrap().contains("12A"));

    // Same passenger, any seat: rejected as a duplicate check-in.
    let (status, body) = send(
        &app,
        Method::POST,
        "/v1/checkins",
        Some(&token),
        Some(json!({
            "passenger_id": "P1001",
            "flight_number": "FL200",
            "seat_label": "14C"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert!(body["error"]
        .as_str()
        .unwrap()
        .contains("already checked in"));
}

#[tokio::test]
async fn test_cancel_check_in_releases_the_seat() {
    let app = app(seeded_state().await);
    let token = login(&app).await;

    let (_, committed) = send(
        &app,
        Method::POST,
        "/v1/checkins",
        Some(&token),
        Some(json!({
            "passenger_id": "P1001",
            "flight_number": "FL200",
            "seat_label": "3B"
        })),
    )
    .await;
    let boarding_id = committed["boarding"]["boarding_id"].as_i64().unwrap();

    let (status, _) = send(
        &app,
        Method::DELETE,
        &format!("/v1/checkins/{}", boarding_id),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, seatmap) = send(
        &app,
        Method::GET,
        "/v1/flights/FL200/seatmap",
        Some(&token),
        None,
    )
    .await;
    assert_eq!(seat_state(&seatmap, "3B"), "FREE");

    // The released seat can be taken again.
    let (status, _) = send(
        &app,
        Method::POST,
        "/v1/checkins",
        Some(&token),
        Some(json!({
            "passenger_id": "P1002",
            "flight_number": "FL200",
            "seat_label": "3B"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
}

#[tokio::test]
async fn test_protected_routes_require_token() {
    let app = app(seeded_state().await);

    let (status, _) = send(&app, Method::GET, "/v1/passengers/P1001", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(
        &app,
        Method::GET,
        "/v1/passengers/P1001",
        Some("not-a-token"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_login_rejects_bad_credentials() {
    let app = app(seeded_state().await);

    let (status, _) = send(
        &app,
        Method::POST,
        "/v1/auth/login",
        None,
        Some(json!({ "email": "arda@aerodesk.example", "password": "wrong" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(
        &app,
        Method::POST,
        "/v1/auth/login",
        None,
        Some(json!({ "email": "", "password": "" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_flight_creation_gate_conflict() {
    let app = app(seeded_state().await);
    let token = login(&app).await;

    // Same gate, same scheduled departure as FL200.
    let (status, body) = send(
        &app,
        Method::POST,
        "/v1/flights",
        Some(&token),
        Some(json!({
            "flight_number": "FL900",
            "departure_location": "IST",
            "arrival_location": "CDG",
            "scheduled_departure": "2025-03-14T09:30:00Z",
            "scheduled_arrival": "2025-03-14T12:00:00Z",
            "gate": "B12"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert!(body["error"].as_str().unwrap().contains("gate"));

    // A different gate is fine.
    let (status, _) = send(
        &app,
        Method::POST,
        "/v1/flights",
        Some(&token),
        Some(json!({
            "flight_number": "FL900",
            "departure_location": "IST",
            "arrival_location": "CDG",
            "scheduled_departure": "2025-03-14T09:30:00Z",
            "scheduled_arrival": "2025-03-14T12:00:00Z",
            "gate": "C3"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
}

#[tokio::test]
async fn test_flight_delete_cascades_boardings() {
    let app = app(seeded_state().await);
    let token = login(&app).await;

    send(
        &app,
        Method::POST,
        "/v1/checkins",
        Some(&token),
        Some(json!({
            "passenger_id": "P1001",
            "flight_number": "FL200",
            "seat_label": "12A"
        })),
    )
    .await;

    let (status, _) = send(&app, Method::DELETE, "/v1/flights/FL200", Some(&token), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, boardings) = send(
        &app,
        Method::GET,
        "/v1/passengers/P1001/boardings",
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(boardings.as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_services_round_trip() {
    let app = app(seeded_state().await);
    let token = login(&app).await;

    let (_, committed) = send(
        &app,
        Method::POST,
        "/v1/checkins",
        Some(&token),
        Some(json!({
            "passenger_id": "P1002",
            "flight_number": "FL200",
            "seat_label": "7F"
        })),
    )
    .await;
    let boarding_id = committed["boarding"]["boarding_id"].as_i64().unwrap();

    // Nothing recorded yet.
    let uri = format!("/v1/boardings/{}/services", boarding_id);
    let (status, _) = send(&app, Method::GET, &uri, Some(&token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(
        &app,
        Method::PUT,
        &uri,
        Some(&token),
        Some(json!({
            "extra_drink": true,
            "extra_meal": false,
            "suit_center": false,
            "extra_luggage": "EXTRA",
            "description": "golf bag"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, record) = send(&app, Method::GET, &uri, Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(record["extra_drink"], true);
    assert_eq!(record["extra_luggage"], "EXTRA");
    assert_eq!(record["description"], "golf bag");

    // Unknown boarding id is a 404, not an empty record.
    let (status, _) = send(
        &app,
        Method::GET,
        "/v1/boardings/99999/services",
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

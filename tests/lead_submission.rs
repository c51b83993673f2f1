use std::io::{BufRead, BufReader, Read, Write};
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::thread;

use axum::{Json, Router, extract::State, http::StatusCode, routing::post};
use chrono::Utc;
use tokio::net::TcpListener;

use advisor_tools::api::lead::{
    ContactHandoff, LeadClient, LeadDraft, LeadError, LeadPayload, PreferredContact,
};
use advisor_tools::core::{MoneyMode, ResilienceInput, ScenarioInput, run_scenario};

type Received = Arc<Mutex<Vec<LeadPayload>>>;

async fn accept_lead(State(received): State<Received>, Json(payload): Json<LeadPayload>) -> StatusCode {
    received.lock().expect("lock poisoned").push(payload);
    StatusCode::CREATED
}

async fn reject_lead() -> (StatusCode, String) {
    (
        StatusCode::UNPROCESSABLE_ENTITY,
        format!("phone rejected: {}", "x".repeat(400)),
    )
}

async fn spawn_receiver() -> (SocketAddr, Received) {
    let received = Received::default();
    let app = Router::new()
        .route("/leads", post(accept_lead))
        .route("/broken", post(reject_lead))
        .with_state(received.clone());

    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind local listener");
    let addr = listener.local_addr().expect("listener address");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("receiver runs");
    });
    (addr, received)
}

fn resilience_draft() -> LeadDraft {
    let input = ScenarioInput::Resilience(ResilienceInput {
        monthly_essentials: 2_000.0,
        liquid_savings: 8_400.0,
        dependents: 1,
        has_life_cover: true,
        has_critical_illness_cover: false,
        has_disability_cover: false,
    });
    let result = run_scenario(&input).expect("essentials are positive");

    LeadDraft {
        name: "Marcus Lim".to_string(),
        phone: "+65 8123 4567".to_string(),
        preferred_contact: PreferredContact::Call,
        message: "Please call after 6pm".to_string(),
        handoff: Some(ContactHandoff::from_result(&result, MoneyMode::Monthly)),
        page_url: "https://advisor.example.sg/contact?tool=resilience".to_string(),
        consent: true,
    }
}

#[tokio::test]
async fn lead_is_posted_as_json_to_the_endpoint() {
    let (addr, received) = spawn_receiver().await;
    let client = LeadClient::new(&format!("http://{addr}/leads")).expect("valid endpoint");

    let payload = resilience_draft()
        .into_payload(Utc::now())
        .expect("valid draft");
    client.submit(&payload).await.expect("endpoint accepts lead");

    let received = received.lock().expect("lock poisoned");
    assert_eq!(received.len(), 1);
    let lead = &received[0];
    assert_eq!(lead, &payload);
    assert_eq!(lead.phone, "+6581234567");
    assert_eq!(lead.preferred_contact, PreferredContact::Call);
    assert!(
        lead.context
            .as_deref()
            .expect("summary carried")
            .starts_with("Resilience Score ")
    );
}

#[tokio::test]
async fn rejected_lead_reports_status_and_truncated_message() {
    let (addr, received) = spawn_receiver().await;
    let client = LeadClient::new(&format!("http://{addr}/broken")).expect("valid endpoint");

    let payload = resilience_draft()
        .into_payload(Utc::now())
        .expect("valid draft");
    let err = client
        .submit(&payload)
        .await
        .expect_err("endpoint rejects lead");

    match err {
        LeadError::Rejected { status, message } => {
            assert_eq!(status, 422);
            assert!(message.starts_with("phone rejected: "));
            assert_eq!(message.chars().count(), 201);
        }
        other => panic!("expected rejection, got {other:?}"),
    }
    assert!(received.lock().expect("lock poisoned").is_empty());
}

#[tokio::test]
async fn unreachable_endpoint_is_a_transport_error() {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind local listener");
    let addr = listener.local_addr().expect("listener address");
    drop(listener);

    let client = LeadClient::new(&format!("http://{addr}/leads")).expect("valid endpoint");
    let payload = resilience_draft()
        .into_payload(Utc::now())
        .expect("valid draft");

    assert!(matches!(
        client.submit(&payload).await,
        Err(LeadError::Transport(_))
    ));
}

/// Answers one request with a 500 whose body is cut short, then hangs up.
fn spawn_truncating_receiver() -> SocketAddr {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind local listener");
    let addr = listener.local_addr().expect("listener address");
    thread::spawn(move || {
        let (stream, _) = listener.accept().expect("accept lead request");
        let mut reader = BufReader::new(stream);
        let mut content_length = 0usize;
        loop {
            let mut line = String::new();
            reader.read_line(&mut line).expect("read request header");
            let line = line.trim_end();
            if line.is_empty() {
                break;
            }
            if let Some((name, value)) = line.split_once(':') {
                if name.eq_ignore_ascii_case("content-length") {
                    content_length = value.trim().parse().expect("numeric content length");
                }
            }
        }
        let mut body = vec![0u8; content_length];
        reader.read_exact(&mut body).expect("read request body");

        let mut stream = reader.into_inner();
        stream
            .write_all(b"HTTP/1.1 500 Internal Server Error\r\nContent-Length: 100\r\n\r\npartial")
            .expect("write truncated response");
    });
    addr
}

#[tokio::test]
async fn unreadable_rejection_body_still_reports_status() {
    let addr = spawn_truncating_receiver();
    let client = LeadClient::new(&format!("http://{addr}/leads")).expect("valid endpoint");
    let payload = resilience_draft()
        .into_payload(Utc::now())
        .expect("valid draft");

    match client.submit(&payload).await {
        Err(LeadError::Rejected { status, message }) => {
            assert_eq!(status, 500);
            assert!(message.is_empty());
        }
        other => panic!("expected rejection, got {other:?}"),
    }
}

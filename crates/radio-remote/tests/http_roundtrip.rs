//! End-to-end tests of the page controllers over real HTTP.
//!
//! A small axum server on a loopback port stands in for the playlist manager,
//! so these exercise the reqwest transport as well as the controllers.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::{Path, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::routing::{get, put};
use axum::{Json, Router};
use radio_proto::protocol::{NewStation, SortOrder, Station, StationId};
use radio_remote::bulk_delete::BulkDeleteOutcome;
use radio_remote::document::{Event, Navigation, NewStationDocument, PLACEHOLDER};
use radio_remote::pages::{DeletePage, IndexPage, NewStationPage};
use radio_remote::request::{Method, RequestClient, TRANSPORT_FAILURE};
use radio_remote::title_poll::DEFAULT_INTERVAL;
use tokio::net::TcpListener;

#[derive(Default)]
struct Radio {
    stations: Vec<Station>,
    current: Option<StationId>,
    last_id: u64,
    content_types: Vec<String>,
}

type MockState = Arc<Mutex<Radio>>;

async fn get_playlist(State(radio): State<MockState>) -> Json<Vec<Station>> {
    Json(radio.lock().unwrap().stations.clone())
}

async fn get_stream(State(radio): State<MockState>) -> Json<Option<Station>> {
    let radio = radio.lock().unwrap();
    let current = radio
        .current
        .as_ref()
        .and_then(|id| radio.stations.iter().find(|s| &s.id == id).cloned());
    Json(current)
}

async fn post_stream(
    State(radio): State<MockState>,
    headers: HeaderMap,
    body: String,
) -> StatusCode {
    let mut radio = radio.lock().unwrap();
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    radio.content_types.push(content_type);

    let Ok(new) = serde_json::from_str::<NewStation>(&body) else {
        return StatusCode::BAD_REQUEST;
    };
    if !(new.url.starts_with("http://") || new.url.starts_with("https://")) {
        return StatusCode::BAD_REQUEST;
    }
    radio.last_id += 1;
    let id = StationId::from(radio.last_id);
    radio.stations.push(Station {
        id,
        name: new.name,
        url: new.url,
    });
    StatusCode::OK
}

async fn put_stream(State(radio): State<MockState>, Path(id): Path<String>) -> StatusCode {
    let mut radio = radio.lock().unwrap();
    let id = StationId::new(id);
    if radio.stations.iter().any(|s| s.id == id) {
        radio.current = Some(id);
        StatusCode::OK
    } else {
        StatusCode::NOT_FOUND
    }
}

async fn delete_stream(State(radio): State<MockState>, Path(id): Path<String>) -> StatusCode {
    let mut radio = radio.lock().unwrap();
    let id = StationId::new(id);
    let before = radio.stations.len();
    radio.stations.retain(|s| s.id != id);
    if radio.stations.len() < before {
        StatusCode::OK
    } else {
        StatusCode::NOT_FOUND
    }
}

async fn get_now_playing() -> Json<&'static str> {
    Json("Khruangbin - Maria También")
}

async fn start_server(stations: &[(u64, &str)]) -> (String, MockState) {
    let radio = Radio {
        stations: stations
            .iter()
            .map(|(id, name)| Station {
                id: StationId::from(*id),
                name: name.to_string(),
                url: format!("http://streams.example/{}", id),
            })
            .collect(),
        last_id: stations.iter().map(|(id, _)| *id).max().unwrap_or(0),
        ..Radio::default()
    };
    let state: MockState = Arc::new(Mutex::new(radio));

    let app = Router::new()
        .route("/playlist", get(get_playlist))
        .route("/stream", get(get_stream).post(post_stream))
        .route("/stream/:id", put(put_stream).delete(delete_stream))
        .route("/now_playing", get(get_now_playing))
        .with_state(state.clone());

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (format!("http://{}", addr), state)
}

#[tokio::test]
async fn index_page_renders_and_switches() {
    let (base_url, radio) = start_server(&[(1, "Radio Nova"), (2, "FIP"), (3, "NTS 1")]).await;
    let page = IndexPage::new(RequestClient::http(base_url), SortOrder::Name, DEFAULT_INTERVAL);

    let tasks = page.ready();
    tasks.playlist.await.unwrap();
    tasks.now_playing.await.unwrap();

    {
        let document = page.document();
        let document = document.lock().await;
        let labels: Vec<&str> = document
            .stream_list
            .entries()
            .map(|l| l.label.as_str())
            .collect();
        assert_eq!(labels, vec!["FIP", "NTS 1", "Radio Nova"]);
        assert_eq!(document.now_playing_text(), PLACEHOLDER);
    }

    let mut event = Event::new();
    assert!(page.click("stream-3", &mut event).await.unwrap());
    assert!(event.default_prevented());
    assert_eq!(radio.lock().unwrap().current, Some(StationId::from(3u64)));
    assert_eq!(page.document().lock().await.now_playing_text(), "NTS 1");

    tasks.title_poll.abort();
}

#[tokio::test]
async fn title_poll_fills_title_once_a_station_plays() {
    let (base_url, _) = start_server(&[(1, "FIP")]).await;
    let page = IndexPage::new(
        RequestClient::http(base_url),
        SortOrder::Server,
        Duration::from_millis(50),
    );

    let tasks = page.ready();
    tasks.playlist.await.unwrap();
    tasks.now_playing.await.unwrap();
    assert!(page.click("stream-1", &mut Event::new()).await.unwrap());

    let document = page.document();
    let mut title = String::new();
    for _ in 0..100 {
        title = document.lock().await.track_title().to_string();
        if !title.is_empty() {
            break;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    assert_eq!(title, "Khruangbin - Maria También");

    tasks.title_poll.abort();
}

#[tokio::test]
async fn new_station_page_posts_json() {
    let (base_url, radio) = start_server(&[(1, "FIP")]).await;
    let page = NewStationPage::new(
        RequestClient::http(base_url),
        NewStationDocument::new("KEXP", "https://kexp.streamguys1.com/kexp160.aac"),
    );

    assert!(page.submit(&mut Event::new()).await);

    let radio = radio.lock().unwrap();
    assert_eq!(radio.content_types, vec!["application/json".to_string()]);
    assert_eq!(radio.stations.last().unwrap().name, "KEXP");
    assert_eq!(radio.stations.last().unwrap().id.as_str(), "2");
    drop(radio);
    assert_eq!(
        page.document().lock().await.navigations,
        vec![Navigation::Location("index.html".to_string())]
    );
}

#[tokio::test]
async fn new_station_page_stays_on_rejection() {
    let (base_url, radio) = start_server(&[]).await;
    let page = NewStationPage::new(
        RequestClient::http(base_url),
        NewStationDocument::new("Bad", "gopher://nope"),
    );

    assert!(!page.submit(&mut Event::new()).await);

    assert!(radio.lock().unwrap().stations.is_empty());
    assert!(page.document().lock().await.navigations.is_empty());
}

#[tokio::test]
async fn delete_page_removes_checked_stations() {
    let (base_url, radio) = start_server(&[(1, "a"), (2, "b"), (3, "c"), (4, "d")]).await;
    let page = DeletePage::new(RequestClient::http(base_url), SortOrder::Server);
    page.ready().await.unwrap();

    {
        let document = page.document();
        let mut document = document.lock().await;
        document.set_checked("station-1", true).unwrap();
        document.set_checked("station-3", true).unwrap();
    }

    let outcome = page.submit(&mut Event::new()).await;

    assert_eq!(outcome, BulkDeleteOutcome::Submitted { deleted: 2 });
    let remaining: Vec<String> = radio
        .lock()
        .unwrap()
        .stations
        .iter()
        .map(|s| s.id.to_string())
        .collect();
    assert_eq!(remaining, vec!["2", "4"]);
    assert_eq!(page.document().lock().await.form_submissions(), 1);
}

#[tokio::test]
async fn delete_page_partial_failure_keeps_applied_deletions() {
    let (base_url, radio) = start_server(&[(1, "a"), (2, "b")]).await;
    let page = DeletePage::new(RequestClient::http(base_url), SortOrder::Server);
    page.ready().await.unwrap();

    {
        let document = page.document();
        let mut document = document.lock().await;
        document.set_checked("station-1", true).unwrap();
        document.set_checked("station-2", true).unwrap();
    }
    // Station 2 disappears server-side before the form is submitted.
    radio
        .lock()
        .unwrap()
        .stations
        .retain(|s| s.id.as_str() != "2");

    let outcome = page.submit(&mut Event::new()).await;

    assert_eq!(
        outcome,
        BulkDeleteOutcome::Aborted {
            station: StationId::from(2u64),
            status: 404
        }
    );
    // Give the DELETE for station 1 time to land if it was still in flight.
    for _ in 0..50 {
        if radio.lock().unwrap().stations.is_empty() {
            break;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    assert!(radio.lock().unwrap().stations.is_empty());
    assert_eq!(page.document().lock().await.form_submissions(), 0);
}

#[tokio::test]
async fn status_codes_pass_through() {
    let (base_url, _) = start_server(&[(1, "FIP")]).await;
    let client = RequestClient::http(base_url);

    let reply = client.request(Method::PUT, "/stream/99").await;
    assert_eq!(reply.status, 404);

    let reply = client.request(Method::GET, "/playlist").await;
    assert!(reply.is_success());
    let stations: Vec<Station> = reply.json("/playlist").unwrap();
    assert_eq!(stations[0].name, "FIP");
}

#[tokio::test]
async fn unreachable_server_is_transport_failure() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = RequestClient::http(format!("http://{}", addr));
    let reply = client.request(Method::GET, "/playlist").await;

    assert_eq!(reply.status, TRANSPORT_FAILURE);
    assert!(!reply.is_success());
}

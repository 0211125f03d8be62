use crate::helpers::wav_bytes;
use coqui_tts_service::domain::tts::{Locale, Speaker, SynthesisError, Voice};
use coqui_tts_service::infrastructure::backends::{CloudBackend, SynthesisBackend};
use mockito::{Matcher, Mock, Server, ServerGuard};
use pretty_assertions::assert_eq;
use serde_json::json;
use std::time::Duration;

const API_KEY: &str = "test-api-key";

fn backend(server: &ServerGuard) -> CloudBackend {
    CloudBackend::new(&server.url(), API_KEY.to_string(), Duration::from_secs(5)).unwrap()
}

fn voice() -> Voice {
    Voice::new(Locale::parse("en"), "Alice", "en", "s1")
}

async fn mock_page(
    server: &mut ServerGuard,
    endpoint: &str,
    page: u32,
    has_next: bool,
    voices: &[(&str, &str)],
) -> Mock {
    let result: Vec<_> = voices
        .iter()
        .map(|(id, name)| json!({ "id": id, "name": name }))
        .collect();

    server
        .mock("GET", endpoint)
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("page".into(), page.to_string()),
            Matcher::UrlEncoded("per_page".into(), "100".into()),
        ]))
        .match_header("authorization", format!("Bearer {}", API_KEY).as_str())
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({ "count": voices.len(), "has_prev": page > 1, "has_next": has_next, "result": result })
                .to_string(),
        )
        .expect(1)
        .create_async()
        .await
}

#[tokio::test]
async fn it_should_list_custom_then_builtin_speakers_across_pages() {
    let mut server = Server::new_async().await;
    let custom = mock_page(&mut server, "/api/v2/voices", 1, true, &[("c1", "Mine")]).await;
    let custom_broken = server
        .mock("GET", "/api/v2/voices")
        .match_query(Matcher::UrlEncoded("page".into(), "2".into()))
        .with_status(500)
        .expect(1)
        .create_async()
        .await;
    let first = mock_page(&mut server, "/api/v2/speakers", 1, true, &[("s1", "Alice")]).await;
    let second = mock_page(&mut server, "/api/v2/speakers", 2, false, &[("s2", "Bob")]).await;

    let speakers = backend(&server).list_speakers().await.unwrap();

    assert_eq!(
        speakers,
        vec![
            Speaker::new("Mine (Custom)", "c1"),
            Speaker::new("Alice", "s1"),
            Speaker::new("Bob", "s2"),
        ]
    );
    custom.assert_async().await;
    custom_broken.assert_async().await;
    first.assert_async().await;
    second.assert_async().await;
}

#[tokio::test]
async fn it_should_stop_paging_after_ten_pages() {
    let mut server = Server::new_async().await;
    let _custom = mock_page(&mut server, "/api/v2/voices", 1, false, &[]).await;
    let endless = server
        .mock("GET", "/api/v2/speakers")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({ "count": 1, "has_prev": true, "has_next": true, "result": [{ "id": "s", "name": "Same" }] })
                .to_string(),
        )
        .expect(10)
        .create_async()
        .await;

    let speakers = backend(&server).list_speakers().await.unwrap();

    assert_eq!(speakers.len(), 10);
    endless.assert_async().await;
}

#[tokio::test]
async fn it_should_keep_custom_voices_when_builtin_listing_fails() {
    let mut server = Server::new_async().await;
    let custom = mock_page(&mut server, "/api/v2/voices", 1, false, &[("c1", "Mine")]).await;
    let builtin = server
        .mock("GET", "/api/v2/speakers")
        .match_query(Matcher::Any)
        .with_status(503)
        .with_body("maintenance")
        .expect(1)
        .create_async()
        .await;

    let speakers = backend(&server).list_speakers().await.unwrap();

    assert_eq!(speakers, vec![Speaker::new("Mine (Custom)", "c1")]);
    custom.assert_async().await;
    builtin.assert_async().await;
}

#[tokio::test]
async fn it_should_list_nothing_when_credentials_are_rejected() {
    let mut server = Server::new_async().await;
    let rejected = server
        .mock("GET", Matcher::Any)
        .match_query(Matcher::Any)
        .with_status(401)
        .with_body(r#"{"detail":"Invalid token"}"#)
        .expect(2)
        .create_async()
        .await;

    let speakers = backend(&server).list_speakers().await.unwrap();

    assert!(speakers.is_empty());
    rejected.assert_async().await;
}

#[tokio::test]
async fn it_should_offer_english_only() {
    let server = Server::new_async().await;
    assert_eq!(backend(&server).list_languages().await.unwrap(), vec!["en"]);
}

#[tokio::test]
async fn it_should_create_sample_then_download_audio() {
    let mut server = Server::new_async().await;
    let audio_url = format!("{}/audio/sample-1.wav", server.url());
    let create = server
        .mock("POST", "/api/v2/samples")
        .match_header("authorization", format!("Bearer {}", API_KEY).as_str())
        .match_body(Matcher::PartialJson(json!({
            "voice_id": "s1",
            "emotion": "Neutral",
            "text": "Hello world.",
            "speed": 1.0
        })))
        .with_status(201)
        .with_header("content-type", "application/json")
        .with_body(
            json!({
                "id": "sample-1",
                "emotion": "Neutral",
                "name": "sample",
                "text": "Hello world.",
                "audio_url": audio_url
            })
            .to_string(),
        )
        .expect(1)
        .create_async()
        .await;
    let download = server
        .mock("GET", "/audio/sample-1.wav")
        .with_status(200)
        .with_header("content-type", "audio/wav")
        .with_body(wav_bytes(44100, &[3, 2, 1, 0]))
        .expect(1)
        .create_async()
        .await;

    let clip = backend(&server)
        .synthesize_chunk("Hello world.", &voice())
        .await
        .unwrap();

    assert_eq!(clip.frames(), 4);
    assert_eq!(clip.format().sample_rate, 44100);
    create.assert_async().await;
    download.assert_async().await;
}

#[tokio::test]
async fn it_should_report_unavailable_backend_on_server_error() {
    let mut server = Server::new_async().await;
    let _create = server
        .mock("POST", "/api/v2/samples")
        .with_status(503)
        .with_body("maintenance")
        .create_async()
        .await;

    let err = backend(&server)
        .synthesize_chunk("Hello.", &voice())
        .await
        .unwrap_err();

    assert!(matches!(err, SynthesisError::BackendUnavailable(_)), "got {:?}", err);
}

#[tokio::test]
async fn it_should_report_protocol_error_on_malformed_sample_response() {
    let mut server = Server::new_async().await;
    let _create = server
        .mock("POST", "/api/v2/samples")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"unexpected": true}"#)
        .create_async()
        .await;

    let err = backend(&server)
        .synthesize_chunk("Hello.", &voice())
        .await
        .unwrap_err();

    assert!(matches!(err, SynthesisError::BackendProtocol(_)), "got {:?}", err);
}

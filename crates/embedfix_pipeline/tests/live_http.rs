//! Prober and restriction-gate tests against a local HTTP listener.

use embedfix_pipeline::{
    HttpProber, ProbeOutcome, RestrictionGate, RestrictionVerdict, TwitterMirrorGate, UrlProber,
};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

/// Spawn a listener answering every request with `respond(method)`.
/// Returns the `host:port` authority of the listener.
async fn spawn_http(respond: Arc<dyn Fn(&str) -> String + Send + Sync>) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let authority = listener.local_addr().unwrap().to_string();
    tokio::spawn(async move {
        while let Ok((mut socket, _)) = listener.accept().await {
            let respond = respond.clone();
            tokio::spawn(async move {
                let mut buf = [0u8; 1024];
                let n = socket.read(&mut buf).await.unwrap_or(0);
                let request = String::from_utf8_lossy(&buf[..n]);
                let method = request.split_whitespace().next().unwrap_or("").to_string();
                let _ = socket.write_all(respond(&method).as_bytes()).await;
            });
        }
    });
    authority
}

fn response(status_line: &str, body: &str) -> String {
    format!(
        "HTTP/1.1 {status_line}\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
        body.len()
    )
}

#[tokio::test]
async fn head_rejection_falls_back_to_get() {
    // Some proxy services reject HEAD; a successful GET must still
    // validate the candidate.
    let authority = spawn_http(Arc::new(|method: &str| {
        if method == "HEAD" {
            response("405 Method Not Allowed", "")
        } else {
            response("200 OK", "ok")
        }
    }))
    .await;

    let prober = HttpProber::new();
    let outcome = prober.probe(&format!("http://{authority}/p/ABC123/")).await;
    assert_eq!(outcome, ProbeOutcome::Reachable);
}

#[tokio::test]
async fn reachable_head_skips_the_get_fallback() {
    let gets = Arc::new(AtomicUsize::new(0));
    let counter = gets.clone();
    let authority = spawn_http(Arc::new(move |method: &str| {
        if method == "GET" {
            counter.fetch_add(1, Ordering::SeqCst);
        }
        response("200 OK", "")
    }))
    .await;

    let prober = HttpProber::new();
    let outcome = prober.probe(&format!("http://{authority}/p/ABC123/")).await;
    assert_eq!(outcome, ProbeOutcome::Reachable);
    assert_eq!(gets.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn rejection_on_both_methods_reports_the_get_status() {
    let authority =
        spawn_http(Arc::new(|_: &str| response("404 Not Found", "gone"))).await;

    let prober = HttpProber::new();
    let outcome = prober.probe(&format!("http://{authority}/p/ABC123/")).await;
    assert_eq!(outcome, ProbeOutcome::Unreachable("HTTP 404".into()));
}

#[tokio::test]
async fn unreachable_host_is_classified_as_client_error() {
    // Bind and immediately drop to get a port that refuses connections.
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let authority = listener.local_addr().unwrap().to_string();
    drop(listener);

    let prober = HttpProber::new();
    match prober.probe(&format!("http://{authority}/p/ABC123/")).await {
        ProbeOutcome::Unreachable(error) => assert!(error.starts_with("Client error")),
        ProbeOutcome::Reachable => panic!("dead port must not validate"),
    }
}

#[tokio::test]
async fn mirror_403_marks_content_restricted() {
    let authority = spawn_http(Arc::new(|_: &str| response("403 Forbidden", ""))).await;
    let gate = TwitterMirrorGate::with_mirrors(vec![authority]);

    let verdict = gate.check("http://twitter.com/user/status/123").await;
    assert_eq!(verdict, RestrictionVerdict::Restricted);
}

#[tokio::test]
async fn mirror_body_marker_marks_content_restricted() {
    let authority = spawn_http(Arc::new(|_: &str| {
        response("200 OK", "<html>This post is age-restricted.</html>")
    }))
    .await;
    let gate = TwitterMirrorGate::with_mirrors(vec![authority]);

    let verdict = gate.check("http://twitter.com/user/status/123").await;
    assert_eq!(verdict, RestrictionVerdict::Restricted);
}

#[tokio::test]
async fn clean_mirror_response_is_open() {
    let authority =
        spawn_http(Arc::new(|_: &str| response("200 OK", "<html>just a tweet</html>"))).await;
    let gate = TwitterMirrorGate::with_mirrors(vec![authority]);

    let verdict = gate.check("http://x.com/user/status/123").await;
    assert_eq!(verdict, RestrictionVerdict::Open);
}

#[tokio::test]
async fn unreachable_mirrors_never_block_validation() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let authority = listener.local_addr().unwrap().to_string();
    drop(listener);
    let gate = TwitterMirrorGate::with_mirrors(vec![authority]);

    let verdict = gate.check("http://twitter.com/user/status/123").await;
    assert_eq!(verdict, RestrictionVerdict::Open);
}

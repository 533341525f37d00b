// tests/server_socket.rs

use std::error::Error;
use std::sync::Arc;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::oneshot;

use scanqueue::engine::{PipelineOptions, ScanPipeline};
use scanqueue::exec::CommandTemplate;
use scanqueue::server::serve;
use scanqueue_test_utils::fake_runner::EchoRunner;
use scanqueue_test_utils::{init_tracing, with_timeout};

type BoxError = Box<dyn Error + Send + Sync>;

#[tokio::test]
async fn serves_run_over_tcp_and_shuts_down_gracefully() -> Result<(), BoxError> {
    init_tracing();

    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;

    let runner = EchoRunner::new();
    let pipeline = Arc::new(ScanPipeline::new(
        CommandTemplate::new("scanner", vec![], Some("--url".to_string()), vec![]),
        1,
        Arc::new(runner.clone()),
        PipelineOptions::default(),
    ));

    let (stop_tx, stop_rx) = oneshot::channel::<()>();
    let server = tokio::spawn(serve(listener, pipeline, async move {
        let _ = stop_rx.await;
    }));

    let body = r#"{"url": "http://example.com"}"#;
    let request = format!(
        "POST /run HTTP/1.1\r\nHost: {addr}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
        body.len()
    );

    let mut stream = TcpStream::connect(addr).await?;
    stream.write_all(request.as_bytes()).await?;
    let mut response = String::new();
    with_timeout(stream.read_to_string(&mut response)).await?;

    assert!(response.starts_with("HTTP/1.1 200"), "{response}");
    assert!(response.contains("Command executed successfully"), "{response}");
    assert_eq!(runner.received().len(), 1);

    let _ = stop_tx.send(());
    with_timeout(server).await??;
    Ok(())
}

//! decexec-client: dispatch one execution request to N servers
//!
//! Connects to `--num` execution servers, sends every one of them the same
//! request (one shared correlation id), and prints each result once all of
//! them have answered. The first failing server aborts the run.
//!
//! ## Architecture
//! ```text
//! decexec-client ──(DecExec gRPC)──► localhost:50050
//!                ──(DecExec gRPC)──► localhost:50051
//!                ──(DecExec gRPC)──► ...
//! ```
//!
//! ## Configuration
//! - `--config <PATH>` / DECEXEC_CONFIG: YAML file (optional)
//! - DECEXEC__PEERS__HOST, DECEXEC__PEERS__BASE_PORT: peer addresses
//! - DECEXEC__DISPATCH__DEADLINE_MS: per-request deadline (unset: wait forever)
//! - DECEXEC_LOG: log filter (default: info)

use std::io::Write;

use clap::{CommandFactory, Parser};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use decexec::config::Config;
use decexec::utils::bootstrap::{cancel_on_ctrl_c, init_tracing};
use decexec::{Dispatcher, PeerRegistry, RequestBuilder};

#[derive(Parser, Debug)]
#[command(name = "decexec-client", version, about)]
struct Args {
    /// Number of servers to connect to
    #[arg(long, default_value_t = 0)]
    num: usize,

    /// Path to a YAML configuration file
    #[arg(long)]
    config: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    init_tracing();

    let stdout = std::io::stdout();
    run(args, &mut stdout.lock()).await
}

/// Connect, dispatch and write one line per result to `out`.
///
/// With `--num 0` only the usage text is written; no configuration is
/// loaded and no server is contacted.
async fn run(args: Args, out: &mut impl Write) -> Result<(), Box<dyn std::error::Error>> {
    if args.num == 0 {
        write!(out, "{}", Args::command().render_help())?;
        return Ok(());
    }

    let config = Config::load(args.config.as_deref())?;
    config.validate()?;

    let registry = PeerRegistry::connect(&config.peers, args.num).await?;
    let request = RequestBuilder::from_config(&config.request).build();

    let deadline = config.dispatch.deadline();
    if deadline.is_none() {
        warn!("No dispatch deadline configured; a silent server blocks the request forever");
    }

    let shutdown = CancellationToken::new();
    cancel_on_ctrl_c(shutdown.clone());

    let dispatcher = Dispatcher::new(registry.into_peers())
        .with_deadline(deadline)
        .with_shutdown(shutdown.clone());

    info!(
        request_id = %request.request_id(),
        peers = dispatcher.len(),
        app = %request.app().app_name,
        "Dispatching request"
    );

    let result = dispatcher.dispatch(&request).await;
    shutdown.cancel();

    for peer_result in result? {
        writeln!(out, "{}", peer_result)?;
    }
    out.flush()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use std::net::SocketAddr;

    use serial_test::serial;
    use tokio::net::TcpListener;
    use tonic::transport::Server;
    use tonic::{Request, Response, Status};

    use decexec::proto::dec_exec_server::{DecExec, DecExecServer};
    use decexec::proto::{App, ExecResult};

    use super::*;

    struct OkServer;

    #[tonic::async_trait]
    impl DecExec for OkServer {
        async fn exec(&self, request: Request<App>) -> Result<Response<ExecResult>, Status> {
            let app = request.into_inner();
            Ok(Response::new(ExecResult {
                payload: format!("ran {}", app.app_name).into_bytes(),
            }))
        }
    }

    async fn start_server() -> SocketAddr {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            Server::builder()
                .add_service(DecExecServer::new(OkServer))
                .serve_with_incoming(tokio_stream::wrappers::TcpListenerStream::new(listener))
                .await
                .unwrap();
        });

        tokio::time::sleep(std::time::Duration::from_millis(50)).await;
        addr
    }

    fn peers_config(port: u16) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        writeln!(file, "peers:\n  host: 127.0.0.1\n  base_port: {}", port).unwrap();
        file
    }

    fn args(num: usize, config: Option<&std::path::Path>) -> Args {
        Args {
            num,
            config: config.map(|p| p.to_string_lossy().into_owned()),
        }
    }

    #[test]
    fn test_num_defaults_to_zero() {
        let args = Args::try_parse_from(["decexec-client"]).unwrap();
        assert_eq!(args.num, 0);
        assert!(args.config.is_none());
    }

    #[test]
    fn test_num_flag_parsed() {
        let args = Args::try_parse_from(["decexec-client", "--num", "3"]).unwrap();
        assert_eq!(args.num, 3);
    }

    #[tokio::test]
    #[serial]
    async fn test_zero_peers_prints_usage_only() {
        // A missing config file would fail loading, so success proves
        // nothing past the usage check ran.
        let missing = std::path::Path::new("/nonexistent/decexec-config.yaml");
        let mut out = Vec::new();

        run(args(0, Some(missing)), &mut out).await.unwrap();

        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("--num"));
        assert!(!text.contains("peer 0"));
    }

    #[tokio::test]
    #[serial]
    async fn test_prints_each_result() {
        let addr = start_server().await;
        let config = peers_config(addr.port());
        let mut out = Vec::new();

        run(args(1, Some(config.path())), &mut out).await.unwrap();

        let text = String::from_utf8(out).unwrap();
        assert_eq!(
            text,
            format!("peer 0 (http://127.0.0.1:{}): ran mpspdz\n", addr.port())
        );
    }

    #[tokio::test]
    #[serial]
    async fn test_unreachable_server_is_error() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);
        let config = peers_config(port);
        let mut out = Vec::new();

        let err = run(args(1, Some(config.path())), &mut out).await.unwrap_err();

        assert!(err.to_string().contains("unreachable"));
        assert!(out.is_empty());
    }
}

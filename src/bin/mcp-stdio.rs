use canlii_mcp::stdio_service;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // stdout is the JSON-RPC channel; logs go to stderr.
    let _ = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();

    // MCP hosts may probe stdio servers with `--version`/`--help` before
    // starting a session; answer and exit instead of opening the transport.
    let args: Vec<String> = std::env::args().collect();
    if args.iter().any(|a| a == "--version" || a == "-V") {
        eprintln!("canlii-mcp {}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }
    if args.iter().any(|a| a == "--help" || a == "-h") {
        eprintln!("canlii-mcp (MCP stdio server); usage: canlii-mcp [--version|--help]");
        eprintln!("config: canlii-mcp.json or CANLII_API, CANLII_API_BASE_URL, CANLII_SESSION_ORIGIN");
        return Ok(());
    }
    stdio_service::run().await
}

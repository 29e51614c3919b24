use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use serde_json::{Value, json};
use std::collections::HashMap;
use std::process;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

mod backend;
mod config;
mod gateway;
mod mcp;
mod tools;

use backend::HttpTransport;
use config::ConfigArgs;
use gateway::{GatewayError, ToolGateway};

#[derive(Parser)]
#[command(name = "latentsense-mcp")]
#[command(
    version,
    about = "MCP server and CLI for the Latentsense document-intelligence API"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
    #[command(flatten)]
    config: ConfigArgs,
    /// Log filter used when RUST_LOG is unset
    #[arg(long, default_value = "info", global = true)]
    log_level: String,
}

#[derive(Args, Clone)]
struct CallArgs {
    /// Tool name, as listed by `list-tools`
    name: String,
    /// Tool arguments as a JSON object
    #[arg(long)]
    arguments: Option<String>,
    /// Output JSON structuredContent
    #[arg(long)]
    json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Start MCP stdio server
    Serve {
        /// Serve MCP over stdio (NDJSON)
        #[arg(long)]
        stdio: bool,
    },
    /// Print the tool catalog with input schemas
    ListTools,
    /// Invoke a single tool and print its result
    Call(CallArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // stdout belongs to the protocol
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cli.log_level));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    match cli.command {
        Commands::Serve { stdio } => {
            if !stdio {
                anyhow::bail!("only --stdio transport is supported");
            }
            let gateway = build_gateway(&cli.config)?;
            info!(
                "starting {} v{} on stdio",
                env!("CARGO_PKG_NAME"),
                env!("CARGO_PKG_VERSION")
            );
            run_stdio_server(Arc::new(gateway)).await
        }
        Commands::ListTools => run_list_tools(),
        Commands::Call(args) => {
            let gateway = build_gateway(&cli.config)?;
            run_call(&gateway, args).await
        }
    }
}

fn build_gateway(config: &ConfigArgs) -> Result<ToolGateway> {
    let config = config.resolve()?;
    let transport = HttpTransport::new(&config).context("failed to build http client")?;
    info!(base_url = %config.base_url, "backend configured");
    let gateway = ToolGateway::with_catalog(Arc::new(transport), tools::catalog())?;
    Ok(gateway)
}

fn run_list_tools() -> Result<()> {
    let definitions = mcp::tool_definitions(&tools::catalog());
    let output = serde_json::to_string_pretty(&definitions)?;
    println!("{output}");
    Ok(())
}

async fn run_call(gateway: &ToolGateway, args: CallArgs) -> Result<()> {
    let arguments = match args.arguments.as_deref() {
        Some(raw) => serde_json::from_str(raw).context("--arguments must be valid JSON")?,
        None => json!({}),
    };
    let result = tools::tool_result(gateway.invoke(&args.name, &arguments).await);
    print_tool_result(result, args.json)
}

fn print_tool_result(result: Value, json_output: bool) -> Result<()> {
    let is_error = result
        .get("isError")
        .and_then(|value| value.as_bool())
        .unwrap_or(false);

    if is_error {
        let message = result
            .get("structuredContent")
            .and_then(|value| value.get("message"))
            .and_then(|value| value.as_str())
            .unwrap_or("tool error");
        eprintln!("{message}");
        process::exit(1);
    }

    if json_output {
        let structured = result
            .get("structuredContent")
            .cloned()
            .unwrap_or_else(|| json!({}));
        let output = serde_json::to_string_pretty(&structured)?;
        println!("{output}");
        return Ok(());
    }

    let text = result
        .get("content")
        .and_then(|value| value.as_array())
        .and_then(|arr| arr.first())
        .and_then(|value| value.get("text"))
        .and_then(|value| value.as_str())
        .unwrap_or("");
    println!("{text}");
    Ok(())
}

/// NDJSON JSON-RPC loop. `tools/call` runs on its own task so slow backend
/// calls don't block the reader; responses go through one writer task.
async fn run_stdio_server(gateway: Arc<ToolGateway>) -> Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let (tx, rx) = mpsc::unbounded_channel::<Value>();
    let writer = tokio::spawn(write_responses(rx));
    let mut in_flight: HashMap<String, JoinHandle<()>> = HashMap::new();

    while let Some(line) = lines.next_line().await.context("failed to read stdin")? {
        if line.trim().is_empty() {
            continue;
        }

        let request: Value = match serde_json::from_str(&line) {
            Ok(value) => value,
            Err(err) => {
                warn!("ignoring unparseable request: {err}");
                continue;
            }
        };

        in_flight.retain(|_, handle| !handle.is_finished());

        let method = request
            .get("method")
            .and_then(|value| value.as_str())
            .map(str::to_string);
        let id = request.get("id").cloned();
        match (method.as_deref(), id) {
            (Some("initialize"), Some(id)) => send(
                &tx,
                json!({
                    "jsonrpc": "2.0",
                    "id": id,
                    "result": {
                        "protocolVersion": mcp::contracts::PROTOCOL_VERSION,
                        "capabilities": {
                            "tools": {}
                        },
                        "serverInfo": {
                            "name": env!("CARGO_PKG_NAME"),
                            "version": env!("CARGO_PKG_VERSION")
                        }
                    }
                }),
            ),
            (Some("ping"), Some(id)) => send(
                &tx,
                json!({
                    "jsonrpc": "2.0",
                    "id": id,
                    "result": {}
                }),
            ),
            (Some("tools/list"), Some(id)) => send(
                &tx,
                json!({
                    "jsonrpc": "2.0",
                    "id": id,
                    "result": {
                        "tools": mcp::tool_definitions(gateway.list_tools())
                    }
                }),
            ),
            (Some("tools/call"), Some(id)) => {
                let key = id.to_string();
                // A reused id would make the earlier call uncancellable.
                if in_flight.contains_key(&key) {
                    warn!(id = %key, "rejecting tools/call with an id already in flight");
                    send(
                        &tx,
                        json!({
                            "jsonrpc": "2.0",
                            "id": id,
                            "error": {
                                "code": mcp::errors::INVALID_REQUEST,
                                "message": format!("request id {key} is already in flight")
                            }
                        }),
                    );
                    continue;
                }
                let gateway = Arc::clone(&gateway);
                let tx = tx.clone();
                let handle = tokio::spawn(async move {
                    let result = handle_tool_call(&gateway, &request).await;
                    send(
                        &tx,
                        json!({
                            "jsonrpc": "2.0",
                            "id": id,
                            "result": result
                        }),
                    );
                });
                in_flight.insert(key, handle);
            }
            (Some("notifications/cancelled"), None) => {
                let target = request
                    .get("params")
                    .and_then(|params| params.get("requestId"))
                    .map(|id| id.to_string());
                if let Some(handle) = target.and_then(|key| in_flight.remove(&key)) {
                    handle.abort();
                    debug!("cancelled in-flight tool call");
                }
            }
            (Some(method), Some(id)) => send(
                &tx,
                json!({
                    "jsonrpc": "2.0",
                    "id": id,
                    "error": {
                        "code": mcp::errors::METHOD_NOT_FOUND,
                        "message": format!("method not found: {method}")
                    }
                }),
            ),
            _ => {}
        }
    }

    debug!(pending = in_flight.len(), "stdin closed, draining tool calls");
    for (_, handle) in in_flight {
        let _ = handle.await;
    }
    drop(tx);
    writer.await.context("response writer panicked")?
}

fn send(tx: &mpsc::UnboundedSender<Value>, response: Value) {
    if tx.send(response).is_err() {
        warn!("response writer closed; dropping response");
    }
}

async fn write_responses(mut rx: mpsc::UnboundedReceiver<Value>) -> Result<()> {
    let mut stdout = tokio::io::stdout();
    while let Some(response) = rx.recv().await {
        let mut serialized =
            serde_json::to_string(&response).context("failed to serialize response")?;
        serialized.push('\n');
        stdout
            .write_all(serialized.as_bytes())
            .await
            .context("failed to write response")?;
        stdout.flush().await.context("failed to flush response")?;
    }
    Ok(())
}

async fn handle_tool_call(gateway: &ToolGateway, request: &Value) -> Value {
    let params = request.get("params");
    let Some(params) = params.and_then(|value| value.as_object()) else {
        return tools::error_result(&GatewayError::invalid("params", "params must be an object"));
    };

    let name = params.get("name").and_then(|value| value.as_str());
    let Some(name) = name else {
        return tools::error_result(&GatewayError::invalid(
            "name",
            "params.name must be a string",
        ));
    };

    let args = params
        .get("arguments")
        .cloned()
        .unwrap_or_else(|| json!({}));

    let outcome = gateway.invoke(name, &args).await;
    if let Err(err) = &outcome {
        debug!(
            tool = name,
            kind = err.kind(),
            field = err.field(),
            "tool call failed: {err}"
        );
    }
    tools::tool_result(outcome)
}

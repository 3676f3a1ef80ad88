use std::process::ExitCode;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;

use serial_loopback_lib::cli::{Cli, Mode, VERSION_BANNER};
use serial_loopback_lib::serial::{self, SerialTransport};
use serial_loopback_lib::{echo, logging, LineConfig};

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = logging::init(logging::level_from_verbosity(cli.verbose, cli.quiet)) {
        eprintln!("Failed to initialise logging: {}", e);
    }

    let result = match cli.mode() {
        Mode::List { json } => list_ports(json),
        Mode::Test(config) => run_test(config, &cli).await,
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn list_ports(json: bool) -> anyhow::Result<()> {
    let ports = serial::available_ports().context("Failed to enumerate serial ports")?;
    if json {
        println!("{}", serde_json::to_string_pretty(&ports)?);
        return Ok(());
    }
    if ports.is_empty() {
        println!("No serial ports found");
    }
    for port in ports {
        match (port.vid, port.pid) {
            (Some(vid), Some(pid)) => println!(
                "{}\t{}\t{:04x}:{:04x}\t{}",
                port.port_name,
                port.port_type,
                vid,
                pid,
                port.product.as_deref().unwrap_or("")
            ),
            _ => println!("{}\t{}", port.port_name, port.port_type),
        }
    }
    Ok(())
}

async fn run_test(config: LineConfig, cli: &Cli) -> anyhow::Result<()> {
    println!("{}", VERSION_BANNER);
    println!(":::::::::::::::::: TEST STARTED  :::::::::::::::::");

    let mut transport: SerialTransport = SerialTransport::new();
    if let Err(e) = transport.open(&config) {
        println!(":: ERROR OPENING SERIAL PORT, UNABLE TO TEST IT ::");
        println!(":::::::::::::::::: TEST ABORTED ::::::::::::::::::");
        return Err(e).with_context(|| format!("Failed to open {}", config));
    }
    log::info!("Opened {}", config);

    let running = Arc::new(AtomicBool::new(true));
    let poll_interval = cli.poll_interval();

    let loop_flag = running.clone();
    let mut echo_task = tokio::task::spawn_blocking(move || {
        let stats = echo::run_echo(
            &mut transport,
            &loop_flag,
            &mut std::io::stdout(),
            poll_interval,
        );
        (transport, stats)
    });

    let joined = tokio::select! {
        res = &mut echo_task => res,
        _ = shutdown_signal() => {
            log::info!("Shutdown requested");
            running.store(false, Ordering::Relaxed);
            echo_task.await
        }
    };
    let (mut transport, stats) = joined.context("Echo loop panicked")?;
    log::debug!("{:?}", stats);

    if let Err(e) = transport.close() {
        log::error!("Error closing serial port: {}", e);
    }

    println!(":::::::::::::::::: TEST FINISHED :::::::::::::::::");
    Ok(())
}

/// Resolves on SIGINT or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            log::warn!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                log::warn!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

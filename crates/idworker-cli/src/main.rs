mod cli;

use std::io::{BufWriter, Write};
use std::thread::scope;

use anyhow::Context;
use clap::Parser;
use cli::config::{CliArgs, Command, GenerateConfig, OutputFormat, WorkerConfig};
use cli::runtime::{Clock, Wait};
use cli::telemetry::init_telemetry;
use idworker::{IdWorker, SnowflakeId};

// Using mimalloc for better performance when many threads push IDs into their
// buffers at once.
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

fn main() -> anyhow::Result<()> {
    // Load from .env
    let _ = dotenvy::dotenv();
    let args = CliArgs::parse();
    init_telemetry()?;
    let config = WorkerConfig::try_from(args)?;

    match &config.command {
        Command::Generate(generate) => run_generate(&config, generate),
        Command::Decode { id } => run_decode(&config, id),
    }
}

fn run_generate(config: &WorkerConfig, generate: &GenerateConfig) -> anyhow::Result<()> {
    let node_id = generate.node_id;
    let worker = IdWorker::with_wait(
        config.epoch,
        node_id,
        Clock::from(generate.clock),
        Wait::from(generate),
    )
    .context("failed to create id worker")?;

    if cfg!(debug_assertions) {
        tracing::info!("Starting id worker with full config: {:#?}", config);
    } else {
        tracing::info!(
            node = %node_id,
            count = generate.count,
            threads = generate.threads,
            "Starting id worker"
        );
    }

    let mut ids = generate_ids(&worker, generate)?;
    ids.sort_unstable();

    let stdout = std::io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    for id in &ids {
        match generate.format {
            OutputFormat::Decimal => writeln!(out, "{id}")?,
            OutputFormat::Padded => writeln!(out, "{}", id.to_padded_string())?,
            OutputFormat::Debug => writeln!(out, "{id:?}")?,
        }
    }
    out.flush()?;

    tracing::info!(issued = ids.len(), "Done");
    Ok(())
}

/// Splits `count` across `threads` callers sharing one worker.
fn generate_ids(
    worker: &IdWorker<Clock, Wait>,
    generate: &GenerateConfig,
) -> anyhow::Result<Vec<SnowflakeId>> {
    let threads = generate.threads;
    let base = generate.count / threads;
    let extra = generate.count % threads;

    scope(|s| -> anyhow::Result<Vec<SnowflakeId>> {
        let handles: Vec<_> = (0..threads)
            .map(|index| {
                let quota = base + usize::from(index < extra);
                s.spawn(move || -> idworker::Result<Vec<SnowflakeId>> {
                    let mut ids = Vec::with_capacity(quota);
                    for _ in 0..quota {
                        ids.push(worker.next_id()?);
                    }
                    Ok(ids)
                })
            })
            .collect();

        let mut all = Vec::with_capacity(generate.count);
        for handle in handles {
            let ids = handle
                .join()
                .map_err(|_| anyhow::anyhow!("generator thread panicked"))??;
            all.extend(ids);
        }
        Ok(all)
    })
}

fn run_decode(config: &WorkerConfig, id: &SnowflakeId) -> anyhow::Result<()> {
    tracing::debug!(%id, epoch = %config.epoch, "Decoding id");

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    writeln!(out, "id:            {id}")?;
    writeln!(out, "timestamp:     {} ms after epoch", id.timestamp())?;
    writeln!(out, "unix millis:   {}", id.to_unix_millis(config.epoch))?;
    writeln!(out, "datacenter id: {}", id.datacenter_id())?;
    writeln!(out, "machine id:    {}", id.machine_id())?;
    writeln!(out, "sequence:      {}", id.sequence())?;
    Ok(())
}

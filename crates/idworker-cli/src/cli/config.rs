use core::time::Duration;

use anyhow::{Context, bail};
use clap::{Args, Parser, Subcommand, ValueEnum};
use idworker::{CUSTOM_EPOCH, Epoch, FallbackNodeId, NodeId, NodeIdProvider, SnowflakeId};

/// Runtime configuration for the `idworker` binary.
///
/// All values are parsed from CLI arguments or environment variables (a
/// `.env` file in the working directory is loaded first).
#[derive(Parser, Debug, Clone)]
#[command(
    name = "idworker",
    version,
    about = "Issue and decode 63-bit Snowflake-style IDs"
)]
pub struct CliArgs {
    /// Reference instant for the timestamp field, in milliseconds since the
    /// Unix epoch. Every worker in a fleet must use the same value.
    ///
    /// Environment variable: `IDWORKER_EPOCH_MS`
    #[arg(long, env = "IDWORKER_EPOCH_MS", default_value_t = CUSTOM_EPOCH.as_millis(), global = true)]
    pub epoch_ms: u64,

    /// Generation options, accepted before or after the `generate`
    /// subcommand.
    #[command(flatten)]
    pub generate: GenerateArgs,

    #[command(subcommand)]
    pub command: Option<CliCommand>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum CliCommand {
    /// Generate IDs (the default when no subcommand is given).
    Generate,
    /// Print the fields packed into an ID.
    Decode {
        /// The ID, as a decimal integer.
        id: SnowflakeId,
    },
}

#[derive(Args, Debug, Clone)]
pub struct GenerateArgs {
    /// Datacenter ID (0-31). Picked at random when unset.
    ///
    /// Environment variable: `IDWORKER_DATACENTER_ID`
    #[arg(long, env = "IDWORKER_DATACENTER_ID", global = true)]
    pub datacenter_id: Option<u8>,

    /// Machine ID within the datacenter (0-31). Picked at random when unset.
    ///
    /// Environment variable: `IDWORKER_MACHINE_ID`
    #[arg(long, env = "IDWORKER_MACHINE_ID", global = true)]
    pub machine_id: Option<u8>,

    /// Number of IDs to print.
    ///
    /// Environment variable: `IDWORKER_COUNT`
    #[arg(short = 'n', long, env = "IDWORKER_COUNT", default_value_t = 1, global = true)]
    pub count: usize,

    /// Number of threads sharing the worker. Capped at `count`.
    ///
    /// Environment variable: `IDWORKER_THREADS`
    #[arg(long, env = "IDWORKER_THREADS", default_value_t = 1, global = true)]
    pub threads: usize,

    /// Time source used for the timestamp field.
    ///
    /// Environment variable: `IDWORKER_CLOCK`
    #[arg(long, env = "IDWORKER_CLOCK", value_enum, default_value_t = ClockKind::System, global = true)]
    pub clock: ClockKind,

    /// How to wait once a millisecond's 4096 sequence values are used up.
    ///
    /// Environment variable: `IDWORKER_WAIT`
    #[arg(long, env = "IDWORKER_WAIT", value_enum, default_value_t = WaitKind::Spin, global = true)]
    pub wait: WaitKind,

    /// Sleep interval between clock polls for `--wait sleep`.
    ///
    /// Environment variable: `IDWORKER_SLEEP_MICROS`
    #[arg(long, env = "IDWORKER_SLEEP_MICROS", default_value_t = 50, global = true)]
    pub sleep_micros: u64,

    /// Output format, one ID per line.
    #[arg(long, value_enum, default_value_t = OutputFormat::Decimal, global = true)]
    pub format: OutputFormat,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClockKind {
    /// Wall clock; backwards jumps are reported as errors.
    System,
    /// Wall clock sampled once, then advanced by a monotonic ticker.
    Monotonic,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitKind {
    Spin,
    Yield,
    Sleep,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Decimal,
    Padded,
    Debug,
}

#[derive(Debug, Clone)]
pub struct WorkerConfig {
    pub epoch: Epoch,
    pub command: Command,
}

#[derive(Debug, Clone)]
pub enum Command {
    Generate(GenerateConfig),
    Decode { id: SnowflakeId },
}

#[derive(Debug, Clone)]
pub struct GenerateConfig {
    pub node_id: NodeId,
    pub count: usize,
    pub threads: usize,
    pub clock: ClockKind,
    pub wait: WaitKind,
    pub sleep: Duration,
    pub format: OutputFormat,
}

impl TryFrom<CliArgs> for WorkerConfig {
    type Error = anyhow::Error;

    fn try_from(args: CliArgs) -> Result<Self, Self::Error> {
        let epoch = Epoch::from_unix_millis(args.epoch_ms);

        let command = match args.command {
            Some(CliCommand::Decode { id }) => Command::Decode { id },
            Some(CliCommand::Generate) | None => {
                Command::Generate(GenerateConfig::try_from(args.generate)?)
            }
        };

        Ok(Self { epoch, command })
    }
}

impl TryFrom<GenerateArgs> for GenerateConfig {
    type Error = anyhow::Error;

    fn try_from(args: GenerateArgs) -> Result<Self, Self::Error> {
        if args.count == 0 {
            bail!("IDWORKER_COUNT must be greater than 0");
        }

        if args.threads == 0 {
            bail!("IDWORKER_THREADS must be greater than 0");
        }

        let node_id = FallbackNodeId::thread_random(args.datacenter_id, args.machine_id)
            .node_id()
            .context("invalid node id")?;

        if args.datacenter_id.is_none() || args.machine_id.is_none() {
            tracing::warn!(
                node = %node_id,
                "Node id not fully configured, filled in at random; ids may collide with other workers"
            );
        }

        Ok(Self {
            node_id,
            count: args.count,
            threads: args.threads.min(args.count),
            clock: args.clock,
            wait: args.wait,
            sleep: Duration::from_micros(args.sleep_micros),
            format: args.format,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(argv: &[&str]) -> anyhow::Result<WorkerConfig> {
        let args = CliArgs::try_parse_from(argv)?;
        WorkerConfig::try_from(args)
    }

    fn generate(config: WorkerConfig) -> GenerateConfig {
        match config.command {
            Command::Generate(generate) => generate,
            other => panic!("expected generate, got {other:?}"),
        }
    }

    #[test]
    fn explicit_node_and_epoch() {
        let config = parse(&[
            "idworker",
            "--epoch-ms",
            "1000",
            "--datacenter-id",
            "10",
            "--machine-id",
            "1",
            "-n",
            "5",
        ])
        .unwrap();

        assert_eq!(config.epoch, Epoch::from_unix_millis(1000));
        let generate = generate(config);
        assert_eq!(generate.node_id, NodeId::new(10, 1).unwrap());
        assert_eq!(generate.count, 5);
        assert_eq!(generate.threads, 1);
        assert_eq!(generate.wait, WaitKind::Spin);
        assert_eq!(generate.clock, ClockKind::System);
    }

    #[test]
    fn out_of_range_node_is_rejected() {
        let err = parse(&["idworker", "--datacenter-id", "32", "--machine-id", "0"]).unwrap_err();
        assert!(format!("{err:#}").contains("datacenter id 32 is out of range"));
    }

    #[test]
    fn missing_node_halves_are_filled() {
        let generate = generate(parse(&["idworker", "--machine-id", "3"]).unwrap());
        assert_eq!(generate.node_id.machine_id(), 3);
        assert!(generate.node_id.datacenter_id() <= NodeId::MAX_DATACENTER_ID);
    }

    #[test]
    fn zero_counts_are_rejected() {
        assert!(parse(&["idworker", "-n", "0"]).is_err());
        assert!(parse(&["idworker", "--threads", "0"]).is_err());
    }

    #[test]
    fn threads_are_capped_at_count() {
        let generate = generate(parse(&["idworker", "-n", "2", "--threads", "8"]).unwrap());
        assert_eq!(generate.threads, 2);
    }

    #[test]
    fn generate_subcommand_accepts_options() {
        let generate = generate(
            parse(&[
                "idworker",
                "generate",
                "-n",
                "5",
                "--datacenter-id",
                "2",
                "--machine-id",
                "7",
                "--wait",
                "sleep",
                "--sleep-micros",
                "200",
            ])
            .unwrap(),
        );
        assert_eq!(generate.count, 5);
        assert_eq!(generate.node_id, NodeId::new(2, 7).unwrap());
        assert_eq!(generate.wait, WaitKind::Sleep);
        assert_eq!(generate.sleep, Duration::from_micros(200));
    }

    #[test]
    fn options_before_generate_subcommand_still_apply() {
        let generate = generate(parse(&["idworker", "-n", "3", "generate"]).unwrap());
        assert_eq!(generate.count, 3);
    }

    #[test]
    fn decode_subcommand_parses_id() {
        let id = SnowflakeId::from_components(6, 10, 1, 0);
        let config = parse(&["idworker", "decode", &id.to_string()]).unwrap();
        match config.command {
            Command::Decode { id: parsed } => assert_eq!(parsed, id),
            other => panic!("expected decode, got {other:?}"),
        }
    }

    #[test]
    fn decode_rejects_garbage() {
        assert!(parse(&["idworker", "decode", "not-an-id"]).is_err());
    }
}

//! Packet transmit/receive simulator.
//!
//! Reads a file, breaks it into numbered packets, delivers them out of order
//! (optionally losing or repeating some) and reassembles the original
//! message on the receiving side.

mod cli;

use std::{
    io::{self, BufRead, Write},
    num::NonZeroUsize,
    path::PathBuf,
    process::ExitCode,
};

use bytes::Bytes;
use clap::Parser;
use packet_reassembly::{
    delivery::{DeliveryError, DeliveryPlan, deliver_concurrently},
    fragment::{
        ConfigError,
        Fragment,
        FragmentIndex,
        FragmentationConfig,
        FragmentationError,
        Fragmenter,
        Reassembler,
        ReassemblyError,
        SharedReassembler,
    },
    metrics::{self, Outcome},
    report::{PacketLine, Verdict, missing_line},
    source::{SourceError, read_source},
};
use thiserror::Error;

#[derive(Debug, Error)]
enum RunError {
    #[error(transparent)]
    Source(#[from] SourceError),
    #[error("console I/O failed: {0}")]
    Console(#[from] io::Error),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Fragmentation(#[from] FragmentationError),
    #[error(transparent)]
    Reassembly(#[from] ReassemblyError),
    #[error(transparent)]
    Delivery(#[from] DeliveryError),
}

impl RunError {
    const fn exit_code(&self) -> u8 {
        match self {
            Self::Reassembly(ReassemblyError::IncompleteReassembly { .. }) => 2,
            _ => 1,
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    // Applications embedding the library should install their own subscriber.
    tracing_subscriber::fmt().with_writer(io::stderr).init();

    let cli = cli::Cli::parse();
    let code = execute(cli, &mut io::stdout(), &mut io::stderr()).await;
    ExitCode::from(code)
}

/// Run the simulator, reporting failures on `err`, and return the exit code.
async fn execute(cli: cli::Cli, out: &mut impl Write, err: &mut impl Write) -> u8 {
    let Err(error) = run(cli, out).await else {
        return 0;
    };
    let written = match &error {
        RunError::Reassembly(ReassemblyError::IncompleteReassembly { missing_indices }) => {
            writeln!(err, "{}", missing_line(missing_indices))
        }
        _ => writeln!(err, "Error: {error}"),
    };
    if let Err(io_error) = written {
        tracing::error!(error = %io_error, "failed to report run error");
    }
    error.exit_code()
}

async fn run(cli: cli::Cli, out: &mut impl Write) -> Result<(), RunError> {
    let mut config = FragmentationConfig::new(cli.chunk_size)?;
    if cli.provisional {
        config = config.provisional();
    }

    writeln!(out, "Packet transmit/receive simulator")?;
    writeln!(
        out,
        "Breaks file into packets of {} bytes, sends {}, then reconstructs.\n",
        config.chunk_size,
        if cli.in_order { "in order" } else { "unordered" }
    )?;

    let Some(path) = resolve_path(cli.path.clone(), out)? else {
        return Ok(());
    };
    let message = Bytes::from(read_source(&path)?);
    if message.is_empty() {
        writeln!(out, "File is empty. Nothing to send.")?;
        return Ok(());
    }

    let set = Fragmenter::from_config(&config).fragment(message.clone())?;
    let session = config.reassembler(set.len())?;

    writeln!(out, "Created {} packets:", set.len())?;
    print_packets(out, "", set.fragments())?;

    let delivery = delivery_plan(&cli).deliver(&set);
    if cli.in_order {
        writeln!(out, "Sending packets in original order:")?;
    } else {
        writeln!(out, "Sending packets in unordered sequence:")?;
    }
    print_packets(out, "Sent ", delivery.sent())?;
    writeln!(out, "Receiving packets (arrival order shown):")?;
    print_packets(out, "Received ", delivery.arrived())?;

    writeln!(out, "Reconstructing message from received packets...")?;
    let result = reassemble(session, delivery.into_arrived(), cli.lanes).await;
    match &result {
        Ok(_) => metrics::inc_outcome(Outcome::Complete),
        Err(RunError::Reassembly(ReassemblyError::IncompleteReassembly { .. })) => {
            metrics::inc_outcome(Outcome::Incomplete);
        }
        Err(_) => {}
    }
    let reconstructed = result?;

    writeln!(out, "\nOriginal message (showing visible whitespace as-is):")?;
    writeln!(out, "{}\n", String::from_utf8_lossy(&message))?;
    writeln!(out, "Reconstructed message:")?;
    writeln!(out, "{}\n", String::from_utf8_lossy(&reconstructed))?;
    writeln!(out, "{}", Verdict::compare(&message, &reconstructed))?;
    Ok(())
}

fn resolve_path(path: Option<PathBuf>, out: &mut impl Write) -> Result<Option<PathBuf>, io::Error> {
    if path.is_some() {
        return Ok(path);
    }
    write!(out, "Enter path to text file to send: ")?;
    out.flush()?;

    let mut line = String::new();
    if io::stdin().lock().read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(PathBuf::from(line.trim_end_matches(['\r', '\n']))))
}

fn delivery_plan(cli: &cli::Cli) -> DeliveryPlan {
    let mut plan = DeliveryPlan::new().shuffled(!cli.in_order);
    if let Some(seed) = cli.seed {
        plan = plan.seed(seed);
    }
    for &index in &cli.drops {
        plan = plan.drop_index(FragmentIndex::new(index));
    }
    for &index in &cli.duplicates {
        plan = plan.duplicate_index(FragmentIndex::new(index));
    }
    plan
}

async fn reassemble(
    mut session: Reassembler,
    arrived: Vec<Fragment>,
    lanes: NonZeroUsize,
) -> Result<Vec<u8>, RunError> {
    if lanes.get() == 1 {
        metrics::inc_delivered(arrived.len() as u64);
        for fragment in arrived {
            session.ingest(fragment);
        }
        return Ok(session.finalize()?);
    }

    let shared = SharedReassembler::new(session);
    deliver_concurrently(arrived, lanes, &shared).await?;
    Ok(shared.finalize()?)
}

fn print_packets(out: &mut impl Write, label: &str, fragments: &[Fragment]) -> io::Result<()> {
    for fragment in fragments {
        writeln!(out, "{}", PacketLine::new(label, fragment))?;
    }
    writeln!(out)
}

#[cfg(test)]
mod tests {
    use std::fs;

    use clap::Parser;
    use rstest::{fixture, rstest};
    use tempfile::TempDir;

    use super::{cli::Cli, execute};

    #[fixture]
    fn workdir() -> TempDir { tempfile::tempdir().expect("create temp dir") }

    fn write_message(dir: &TempDir, contents: &str) -> String {
        let path = dir.path().join("message.txt");
        fs::write(&path, contents).expect("write message");
        path.display().to_string()
    }

    struct RunOutput {
        code: u8,
        stdout: String,
        stderr: String,
    }

    async fn simulate(args: &[&str]) -> RunOutput {
        let cli = Cli::parse_from(std::iter::once("packet-sim").chain(args.iter().copied()));
        let mut stdout = Vec::new();
        let mut stderr = Vec::new();
        let code = execute(cli, &mut stdout, &mut stderr).await;
        RunOutput {
            code,
            stdout: String::from_utf8(stdout).expect("utf-8 stdout"),
            stderr: String::from_utf8(stderr).expect("utf-8 stderr"),
        }
    }

    #[rstest]
    #[case::shuffled(&["--seed", "7"][..])]
    #[case::in_order(&["--in-order"][..])]
    #[case::duplicated(&["--duplicate", "1", "--seed", "3"][..])]
    #[case::lanes(&["--lanes", "3", "--seed", "3"][..])]
    #[case::provisional(&["--provisional", "--seed", "3"][..])]
    #[tokio::test]
    async fn complete_delivery_exits_zero(workdir: TempDir, #[case] extra: &[&str]) {
        let path = write_message(&workdir, "HELLOWORLD!");
        let mut args = vec![path.as_str()];
        args.extend_from_slice(extra);

        let outcome = simulate(&args).await;

        assert_eq!(outcome.code, 0, "stderr: {}", outcome.stderr);
        assert!(outcome.stdout.contains("Created 3 packets:"));
        assert!(outcome.stdout.contains("Success: reconstructed message matches original."));
        assert!(outcome.stderr.is_empty());
    }

    #[rstest]
    #[tokio::test]
    async fn empty_file_has_nothing_to_send(workdir: TempDir) {
        let path = write_message(&workdir, "");

        let outcome = simulate(&[path.as_str()]).await;

        assert_eq!(outcome.code, 0);
        assert!(outcome.stdout.contains("File is empty. Nothing to send."));
        assert!(!outcome.stdout.contains("Created"));
    }

    #[rstest]
    #[tokio::test]
    async fn unreadable_file_exits_one(workdir: TempDir) {
        let missing = workdir.path().join("absent.txt");

        let outcome = simulate(&[missing.to_str().expect("utf-8 path")]).await;

        assert_eq!(outcome.code, 1);
        assert!(outcome.stderr.starts_with("Error:"));
    }

    #[rstest]
    #[tokio::test]
    async fn zero_chunk_size_exits_one_before_banner(workdir: TempDir) {
        let path = write_message(&workdir, "HELLOWORLD!");

        let outcome = simulate(&[path.as_str(), "--chunk-size", "0"]).await;

        assert_eq!(outcome.code, 1);
        assert!(outcome.stdout.is_empty());
        assert!(outcome.stderr.contains("chunk size must be positive"));
    }

    #[rstest]
    #[case(&["--drop", "2"][..], "Missing packet #2 -- message incomplete")]
    #[case(&["--drop", "0", "--drop", "2", "--lanes", "2"][..], "Missing packets #0, #2 -- message incomplete")]
    #[tokio::test]
    async fn lost_packets_exit_two(
        workdir: TempDir,
        #[case] extra: &[&str],
        #[case] report: &str,
    ) {
        let path = write_message(&workdir, "HELLOWORLD!");
        let mut args = vec![path.as_str(), "--seed", "1"];
        args.extend_from_slice(extra);

        let outcome = simulate(&args).await;

        assert_eq!(outcome.code, 2);
        assert_eq!(outcome.stderr.trim_end(), report);
        assert!(!outcome.stdout.contains("Reconstructed message:"));
    }

    #[rstest]
    #[case(&["--in-order"][..], "Sending packets in original order:", "sends in order")]
    #[case(&["--seed", "2"][..], "Sending packets in unordered sequence:", "sends unordered")]
    #[tokio::test]
    async fn headers_follow_delivery_order(
        workdir: TempDir,
        #[case] extra: &[&str],
        #[case] header: &str,
        #[case] banner: &str,
    ) {
        let path = write_message(&workdir, "HELLOWORLD!");
        let mut args = vec![path.as_str()];
        args.extend_from_slice(extra);

        let outcome = simulate(&args).await;

        assert_eq!(outcome.code, 0);
        assert!(outcome.stdout.contains(header));
        assert!(outcome.stdout.contains(banner));
    }
}

use std::path::PathBuf;

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "cmdent", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compile an entity and write its artifacts under an output directory.
    Compile(CompileArgs),
    /// Compile an entity in memory and print the artifact fingerprint.
    Fingerprint(InputArgs),
}

#[derive(Args, Debug)]
struct InputArgs {
    /// Input entity JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Namespace for programs, models, and textures.
    #[arg(long)]
    namespace: Option<String>,

    /// Item worn by part proxies (`namespace:name`).
    #[arg(long)]
    model_item: Option<String>,

    /// First automatically assigned custom id.
    #[arg(long)]
    first_custom_id: Option<u32>,
}

#[derive(Args, Debug)]
struct CompileArgs {
    #[command(flatten)]
    input: InputArgs,

    /// Output pack directory.
    #[arg(long)]
    out: PathBuf,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Compile(args) => cmd_compile(args),
        Command::Fingerprint(args) => cmd_fingerprint(args),
    }
}

fn compile_input(args: &InputArgs) -> anyhow::Result<cmdent::CompiledEntity> {
    let entity = cmdent::Entity::from_path(&args.in_path)
        .with_context(|| format!("load entity '{}'", args.in_path.display()))?;

    let mut opts = cmdent::CompileOpts::default();
    if let Some(ns) = &args.namespace {
        opts.namespace = ns.clone();
    }
    if let Some(item) = &args.model_item {
        opts.model_item = item.clone();
    }
    if let Some(first) = args.first_custom_id {
        opts.first_custom_id = first;
    }

    let mut ctx = cmdent::CompileContext::new(opts)?;
    let compiled = cmdent::compile_entity(&entity, &mut ctx)
        .with_context(|| format!("compile entity '{}'", entity.name()))?;
    Ok(compiled)
}

fn cmd_compile(args: CompileArgs) -> anyhow::Result<()> {
    let compiled = compile_input(&args.input)?;

    let mut sink = cmdent::DirSink::new(&args.out);
    cmdent::emit_artifacts(&compiled.artifacts, &mut sink)
        .with_context(|| format!("write artifacts to '{}'", args.out.display()))?;

    let ticks: usize = compiled.animations.iter().map(|a| a.frames.len()).sum();
    eprintln!(
        "compiled '{}': {} parts, {} animations, {} ticks",
        compiled.name,
        compiled.parts.len(),
        compiled.animations.len(),
        ticks
    );
    eprintln!(
        "wrote {} artifacts to {}",
        sink.written(),
        sink.root().display()
    );
    println!("{}", cmdent::fingerprint_artifacts(&compiled.artifacts));
    Ok(())
}

fn cmd_fingerprint(args: InputArgs) -> anyhow::Result<()> {
    let compiled = compile_input(&args)?;
    println!(
        "{} {}",
        cmdent::fingerprint_artifacts(&compiled.artifacts),
        compiled.artifacts.len()
    );
    Ok(())
}

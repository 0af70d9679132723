use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "basvid", version, about = "Compile a video into a BAS animation script")]
struct Cli {
    /// Input video path.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Extraction frame rate.
    #[arg(long, default_value_t = 10)]
    fps: i32,

    /// Maximum output width in source pixels.
    #[arg(long, default_value_t = 96)]
    width: u32,

    /// Palette size per frame.
    #[arg(long, default_value_t = 4)]
    colors: usize,

    /// Output path prefix; segments are written as `{prefix}_{n}.bas`.
    #[arg(long, default_value = "output")]
    out: String,

    /// Maximum output segment size in bytes.
    #[arg(long = "max-size", default_value_t = 2 * 1024 * 1024)]
    max_size: usize,

    /// Concurrency level for per-frame work.
    #[arg(long, default_value_t = 4)]
    jobs: usize,

    /// Process one frame at a time and release intermediates eagerly.
    #[arg(long, default_value_t = false)]
    low_memory: bool,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    if !basvid::is_ffmpeg_on_path() {
        anyhow::bail!("ffmpeg is required but was not found on PATH");
    }

    let mut cfg = basvid::RunConfig::new(&cli.in_path, &cli.out);
    cfg.fps = cli.fps;
    cfg.max_width = cli.width;
    cfg.colors = cli.colors;
    cfg.max_segment_bytes = cli.max_size;
    cfg.jobs = cli.jobs;
    cfg.low_memory = cli.low_memory;

    let summary = basvid::run(&cfg, &basvid::BorderTracer)?;
    eprintln!(
        "wrote {} segment(s) for {} frame(s) to {}_*.bas",
        summary.segments, summary.frames, cli.out
    );
    Ok(())
}

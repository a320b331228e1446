use std::{
    fs,
    io::{Write, stderr, stdout},
    path::{Path, PathBuf},
    sync::{
        Mutex,
        atomic::{AtomicBool, AtomicU32, AtomicUsize, Ordering},
    },
    time::Instant,
};

use clap::{
    ArgAction, ArgGroup, Args, ColorChoice, CommandFactory, FromArgMatches, Parser, Subcommand,
    builder::styling::{AnsiColor, Color, Style, Styles},
};
use env_logger::Env;
use log::debug;
use rayon::{ThreadPoolBuilder, prelude::*};
use regex::Regex;
use serde::Serialize;

use ab1trace::{EntryData, ParseResult, parse_ab1, read_directory};

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

const VERSION: &str = env!("CARGO_PKG_VERSION");
const INPUT_EXTS: [&str; 2] = ["ab1", "abi"];

const ANSI_RESET: &str = "\x1b[0m";
const ANSI_GREEN: &str = "\x1b[1;32m";
const ANSI_YELLOW: &str = "\x1b[1;33m";
const ANSI_RED: &str = "\x1b[1;31m";

const AFTER_HELP: &str = "
\x1b[1;33mQUICK REFERENCE\x1b[0m (full flags are in `ab1trace convert --help` / `ab1trace parse --help`)

\x1b[1;32mUSAGE:\x1b[0m
  \x1b[96mab1trace parse\x1b[0m PATH [--tsv] [--compact]
  \x1b[96mab1trace tags\x1b[0m PATH
  \x1b[96mab1trace convert\x1b[0m -i, --input-path DIR
                   -o, --output-path DIR

\x1b[1;32mOPTIONS:\x1b[0m
  \x1b[96m-h\x1b[0m, \x1b[96m--help\x1b[0m
  \x1b[96m-v\x1b[0m, \x1b[96m--version\x1b[0m
  \x1b[96m--verbose\x1b[0m       debug logging (RUST_LOG overrides)

\x1b[1;32mEXAMPLES:\x1b[0m
  \x1b[96mab1trace parse\x1b[0m crates/parser/data/ab1/tiny_3730.ab1
  \x1b[96mab1trace parse\x1b[0m --tsv crates/parser/data/ab1/tiny_3730.ab1
  \x1b[96mab1trace convert\x1b[0m -i runs/2024-06 -o json/2024-06 --cores 8
";

fn cli_styles() -> Styles {
    Styles::styled().literal(Style::new().fg_color(Some(Color::Ansi(AnsiColor::Cyan))))
}

#[derive(Parser)]
#[command(
    name = "ab1trace",
    version = VERSION,
    arg_required_else_help = true,
    disable_help_subcommand = true,
    disable_version_flag = true
)]
struct Cli {
    #[arg(short = 'v', long = "version", action = ArgAction::SetTrue, global = true)]
    version: bool,

    #[arg(long = "verbose", action = ArgAction::SetTrue, global = true)]
    verbose: bool,

    #[command(subcommand)]
    cmd: Option<Cmd>,
}

#[derive(Subcommand)]
enum Cmd {
    /// Decode one trace file and print the JSON envelope
    Parse(ParseArgs),
    /// List the container's directory entries
    Tags(TagsArgs),
    /// Decode every .ab1/.abi file under a directory into .json files
    Convert(ConvertArgs),
}

#[derive(Args)]
struct ParseArgs {
    #[arg(value_name = "PATH")]
    file_path: PathBuf,

    /// Print only the base-call table
    #[arg(long = "tsv", action = ArgAction::SetTrue, default_value_t = false)]
    tsv: bool,

    #[arg(long = "compact", action = ArgAction::SetTrue, default_value_t = false)]
    compact: bool,
}

#[derive(Args)]
struct TagsArgs {
    #[arg(value_name = "PATH")]
    file_path: PathBuf,
}

#[derive(Args)]
#[command(group(
    ArgGroup::new("pattern_mode")
        .args(["pattern", "pattern_exact", "regex"])
        .multiple(false)
))]
struct ConvertArgs {
    #[arg(short = 'i', long = "input-path", required = true)]
    input_path: PathBuf,

    #[arg(short = 'o', long = "output-path", required = true)]
    output_path: PathBuf,

    #[arg(long, default_value_t = false, action = ArgAction::SetTrue)]
    overwrite: bool,

    #[arg(long = "pattern")]
    pattern: Option<String>,

    #[arg(long = "pattern-exact")]
    pattern_exact: Option<String>,

    #[arg(long = "regex")]
    regex: Option<String>,

    #[arg(
        long = "cores",
        default_value_t = 1u16,
        value_parser = clap::value_parser!(u16).range(1..=1024)
    )]
    cores: u16,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = Cli::command();
    cmd = cmd
        .styles(cli_styles())
        .color(ColorChoice::Auto)
        .after_help(AFTER_HELP);

    let matches = cmd.get_matches();
    let cli = Cli::from_arg_matches(&matches).unwrap_or_else(|e| e.exit());

    if cli.version {
        println!("{VERSION}");
        return Ok(());
    }

    let default_level = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(Env::default().default_filter_or(default_level)).init();

    match cli.cmd {
        Some(Cmd::Parse(cmd)) => parse(cmd).map_err(|e| e.into()),
        Some(Cmd::Tags(cmd)) => tags(cmd).map_err(|e| e.into()),
        Some(Cmd::Convert(cmd)) => convert(cmd).map_err(|e| e.into()),
        None => Ok(()),
    }
}

fn to_json<T: Serialize>(v: &T, compact: bool) -> Result<String, String> {
    let s = if compact {
        serde_json::to_string(v)
    } else {
        serde_json::to_string_pretty(v)
    };
    s.map_err(|e| format!("json failed: {e}"))
}

fn read_ab1(file_path: &Path) -> Result<ParseResult, String> {
    let bytes = fs::read(file_path).map_err(|e| format!("read failed: {e}"))?;
    let name = basename(file_path);
    parse_ab1(&bytes, Some(name.as_ref())).map_err(|e| format!("parse_ab1 failed: {e}"))
}

fn parse(cmd: ParseArgs) -> Result<(), String> {
    let cwd = std::env::current_dir().map_err(|e| format!("get current dir failed: {e}"))?;
    let file_path = resolve_user_path(&cwd, &cmd.file_path);
    let result = read_ab1(&file_path)?;

    if cmd.tsv {
        println!("{}", result.base_data);
    } else {
        println!("{}", to_json(&result, cmd.compact)?);
    }
    Ok(())
}

fn tags(cmd: TagsArgs) -> Result<(), String> {
    let cwd = std::env::current_dir().map_err(|e| format!("get current dir failed: {e}"))?;
    let file_path = resolve_user_path(&cwd, &cmd.file_path);
    let bytes = fs::read(&file_path).map_err(|e| format!("read failed: {e}"))?;
    let (header, directory) =
        read_directory(&bytes).map_err(|e| format!("read_directory failed: {e}"))?;

    println!(
        "{}: ABIF version {}, {} entries",
        basename(&file_path),
        header.version,
        directory.len()
    );
    println!(
        "{:<10} {:>5} {:>5} {:>8} {:>10}  data",
        "tag", "type", "size", "count", "bytes"
    );
    for e in directory.entries() {
        let data = match e.data {
            EntryData::Offset(off) => format!("@{off}"),
            EntryData::Inline(raw) => format!(
                "inline {:02x} {:02x} {:02x} {:02x}",
                raw[0], raw[1], raw[2], raw[3]
            ),
        };
        println!(
            "{:<10} {:>5} {:>5} {:>8} {:>10}  {data}",
            e.key().to_string(),
            e.element_type,
            e.element_size,
            e.element_count,
            e.data_size
        );
    }
    Ok(())
}

fn file_ext_lower(path: &Path) -> String {
    path.extension()
        .and_then(|s| s.to_str())
        .unwrap_or("")
        .to_ascii_lowercase()
}

fn out_name_for_ab1_file(path: &Path) -> Option<String> {
    let ext = file_ext_lower(path);
    if !INPUT_EXTS.iter().any(|want| ext == *want) {
        return None;
    }
    let stem = path.file_stem()?.to_string_lossy();
    Some(format!("{stem}.json"))
}

fn build_name_filter(
    pattern: Option<&str>,
    pattern_exact: Option<&str>,
    regex: Option<&str>,
) -> Result<Option<Box<dyn Fn(&str) -> bool>>, String> {
    if let Some(p) = pattern {
        let needle = p.to_lowercase();
        return Ok(Some(Box::new(move |name: &str| {
            name.to_lowercase().contains(&needle)
        })));
    }

    if let Some(p) = pattern_exact {
        let needle = p.to_string();
        return Ok(Some(Box::new(move |name: &str| name.contains(&needle))));
    }

    if let Some(r) = regex {
        let re = Regex::new(r).map_err(|e| format!("invalid regex: {e}"))?;
        return Ok(Some(Box::new(move |name: &str| re.is_match(name))));
    }

    Ok(None)
}

fn collect_files_with_exts(
    input_root: &Path,
    exts: &[&str],
    name_filter: Option<&(dyn Fn(&str) -> bool)>,
) -> Result<Vec<PathBuf>, String> {
    let mut out = Vec::new();
    let mut stack = vec![input_root.to_path_buf()];

    while let Some(dir) = stack.pop() {
        let entries = fs::read_dir(&dir).map_err(|e| format!("read dir failed: {e}"))?;
        for entry in entries {
            let entry = entry.map_err(|e| format!("read dir entry failed: {e}"))?;
            let p = entry.path();
            if p.is_dir() {
                stack.push(p);
                continue;
            }
            if !p.is_file() {
                continue;
            }
            let ext = file_ext_lower(&p);
            if !exts.iter().any(|want| ext == *want) {
                continue;
            }
            if let Some(f) = name_filter {
                let name = p.file_name().and_then(|s| s.to_str()).unwrap_or("");
                if !f(name) {
                    continue;
                }
            }
            out.push(p);
        }
    }

    out.sort();
    Ok(out)
}

/// Shared counters and serialized progress lines for a parallel conversion.
struct Progress {
    total: usize,
    print_lock: Mutex<()>,
    done: AtomicUsize,
    ok: AtomicU32,
    failed: AtomicU32,
    skipped: AtomicU32,
    had_failed: AtomicBool,
}

impl Progress {
    fn new(total: usize) -> Self {
        Self {
            total,
            print_lock: Mutex::new(()),
            done: AtomicUsize::new(0),
            ok: AtomicU32::new(0),
            failed: AtomicU32::new(0),
            skipped: AtomicU32::new(0),
            had_failed: AtomicBool::new(false),
        }
    }

    fn error(&self, path: &Path, msg: &str) {
        self.had_failed.store(true, Ordering::Relaxed);
        self.failed.fetch_add(1, Ordering::Relaxed);
        let n = self.done.fetch_add(1, Ordering::Relaxed) + 1;
        let _g = self.print_lock.lock().unwrap_or_else(|e| e.into_inner());
        eprintln!(
            "{ANSI_RED}[error]{ANSI_RESET} [{}/{}] {}: {msg}",
            n,
            self.total,
            basename(path)
        );
        let _ = stderr().flush();
    }

    fn skip(&self, path: &Path) {
        self.skipped.fetch_add(1, Ordering::Relaxed);
        let n = self.done.fetch_add(1, Ordering::Relaxed) + 1;
        let _g = self.print_lock.lock().unwrap_or_else(|e| e.into_inner());
        println!(
            "{ANSI_YELLOW}[skip]{ANSI_RESET} [{}/{}] {}",
            n,
            self.total,
            basename(path)
        );
        let _ = stdout().flush();
    }

    fn success(&self, out_path: &Path, result: &ParseResult, elapsed_s: f64) {
        self.ok.fetch_add(1, Ordering::Relaxed);
        let n = self.done.fetch_add(1, Ordering::Relaxed) + 1;
        let summary = &result.summary[0];
        let _g = self.print_lock.lock().unwrap_or_else(|e| e.into_inner());
        println!(
            "{ANSI_GREEN}[ok]{ANSI_RESET} [{}/{}] output: {}  bases={}, trace_length={}, time={:.3}s",
            n,
            self.total,
            basename(out_path),
            summary.base_count,
            summary.trace_length,
            elapsed_s
        );
        let _ = stdout().flush();
    }
}

fn convert(cmd: ConvertArgs) -> Result<(), String> {
    let cwd = std::env::current_dir().map_err(|e| format!("get current dir failed: {e}"))?;

    let input_root = resolve_user_path(&cwd, &cmd.input_path);
    let output_root = resolve_user_path(&cwd, &cmd.output_path);

    fs::create_dir_all(&output_root).map_err(|e| format!("create output dir failed: {e}"))?;

    let filter = build_name_filter(
        cmd.pattern.as_deref(),
        cmd.pattern_exact.as_deref(),
        cmd.regex.as_deref(),
    )?;

    let pool = ThreadPoolBuilder::new()
        .num_threads(cmd.cores as usize)
        .build()
        .map_err(|e| format!("rayon thread pool init failed: {e}"))?;

    let t_all = Instant::now();

    let files = collect_files_with_exts(&input_root, &INPUT_EXTS, filter.as_deref())?;
    if files.is_empty() {
        return Err(format!(
            "no matching .ab1/.abi files found under {}",
            input_root.display()
        ));
    }
    debug!("convert: {} files on {} threads", files.len(), cmd.cores);

    let progress = Progress::new(files.len());

    pool.install(|| {
        files.par_iter().for_each(|in_path| {
            let Ok(rel) = in_path.strip_prefix(&input_root) else {
                progress.error(in_path, "cannot make relative path");
                return;
            };

            let Some(out_name) = out_name_for_ab1_file(in_path) else {
                progress.skip(in_path);
                return;
            };

            let parent_rel = rel.parent().unwrap_or_else(|| Path::new(""));
            let out_dir = output_root.join(parent_rel);
            let out_path = out_dir.join(out_name);

            if !cmd.overwrite {
                if let Ok(m) = fs::metadata(&out_path) {
                    if m.is_file() && m.len() > 0 {
                        progress.skip(&out_path);
                        return;
                    }
                }
            }

            if let Err(e) = fs::create_dir_all(&out_dir) {
                progress.error(&out_dir, &format!("create output dir failed: {e}"));
                return;
            }

            let t0 = Instant::now();

            let result = match read_ab1(in_path) {
                Ok(v) => v,
                Err(e) => {
                    progress.error(in_path, &e);
                    return;
                }
            };

            let json = match to_json(&result, true) {
                Ok(v) => v,
                Err(e) => {
                    progress.error(in_path, &e);
                    return;
                }
            };

            if let Err(e) = fs::write(&out_path, json.as_bytes()) {
                progress.error(&out_path, &format!("write failed: {e}"));
                return;
            }

            progress.success(&out_path, &result, t0.elapsed().as_secs_f64());
        })
    });

    let ok = progress.ok.load(Ordering::Relaxed);
    let failed = progress.failed.load(Ordering::Relaxed);
    let skipped = progress.skipped.load(Ordering::Relaxed);

    let d = t_all.elapsed();
    let total_secs = d.as_secs();
    let h = total_secs / 3600;
    let m = (total_secs % 3600) / 60;
    let s = total_secs % 60;

    println!(
        "converted_ok={ok} converted_failed={failed} converted_skipped={skipped} total_time={:02}:{:02}:{:02}",
        h, m, s
    );

    if progress.had_failed.load(Ordering::Relaxed) {
        return Err("some files failed".to_string());
    }
    Ok(())
}

fn resolve_user_path(cwd: &Path, p: &Path) -> PathBuf {
    if p.is_absolute() {
        p.to_path_buf()
    } else {
        cwd.join(p)
    }
}

#[inline]
fn basename(p: &Path) -> std::borrow::Cow<'_, str> {
    p.file_name()
        .unwrap_or_else(|| p.as_os_str())
        .to_string_lossy()
}

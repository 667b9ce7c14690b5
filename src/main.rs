use std::path::PathBuf;

use numbadge::config::{load_config, load_config_from};
use numbadge::{BadgeAlignment, BadgeView, Rect, RecordingCanvas, TextMeasurer};

const VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Debug, Default, PartialEq)]
struct Options {
    config: Option<PathBuf>,
    value: u64,
    fit: Option<String>,
    width: Option<f64>,
    height: Option<f64>,
    align: Option<BadgeAlignment>,
    ops: bool,
}

enum Command {
    Help,
    Version,
    Preview(Options),
}

fn print_help() {
    println!(
        "numbadge {}
Lay out a number badge and print its geometry as JSON

USAGE:
    numbadge [OPTIONS]

OPTIONS:
    -c, --config PATH    Badge style file (default ~/.config/numbadge/badge.toml)
    -n, --value N        Value to display (default 0)
    -f, --fit TEXT       Size the frame to fit TEXT, like a fit-to-text badge
    -W, --width W        Frame width (default: fits the badge)
    -H, --height H       Frame height (default: fits the badge)
    -a, --align NAME     center, top_right, top_left, bottom_left,
                         bottom_right, left or right
        --ops            Include the recorded drawing operations
    -h, --help           Print this help message
    -v, --version        Print version information

ENVIRONMENT:
    RUST_LOG             Set log level (error, warn, info, debug, trace)

EXAMPLES:
    numbadge --value 7
    numbadge --fit 888 --value 42 --align top_right --ops",
        VERSION
    );
}

fn parse_args(args: &[String]) -> Result<Command, String> {
    let mut options = Options::default();
    let mut iter = args.iter();

    while let Some(arg) = iter.next() {
        let arg = arg.as_str();
        let mut value_for = |flag: &str| {
            iter.next()
                .cloned()
                .ok_or_else(|| format!("{} needs a value", flag))
        };

        match arg {
            "-h" | "--help" => return Ok(Command::Help),
            "-v" | "--version" => return Ok(Command::Version),
            "-c" | "--config" => options.config = Some(PathBuf::from(value_for(arg)?)),
            "-n" | "--value" => {
                let raw = value_for(arg)?;
                options.value = raw
                    .parse()
                    .map_err(|_| format!("invalid value '{}', expected an unsigned integer", raw))?;
            }
            "-f" | "--fit" => options.fit = Some(value_for(arg)?),
            "-W" | "--width" => options.width = Some(parse_dimension(arg, &value_for(arg)?)?),
            "-H" | "--height" => options.height = Some(parse_dimension(arg, &value_for(arg)?)?),
            "-a" | "--align" => options.align = Some(value_for(arg)?.parse()?),
            "--ops" => options.ops = true,
            other => return Err(format!("Unknown argument: {}", other)),
        }
    }

    Ok(Command::Preview(options))
}

fn parse_dimension(flag: &str, raw: &str) -> Result<f64, String> {
    match raw.parse::<f64>() {
        Ok(n) if n.is_finite() && n > 0.0 => Ok(n),
        _ => Err(format!("{} expects a positive number, got '{}'", flag, raw)),
    }
}

#[cfg(target_os = "macos")]
fn text_measurer() -> Box<dyn TextMeasurer> {
    Box::new(numbadge::render::CoreTextMeasurer::new())
}

#[cfg(not(target_os = "macos"))]
fn text_measurer() -> Box<dyn TextMeasurer> {
    Box::new(numbadge::EstimatedMetrics::default())
}

fn preview(options: &Options, measurer: &dyn TextMeasurer) -> Result<serde_json::Value, String> {
    let style = match &options.config {
        Some(path) => load_config_from(path),
        None => load_config(),
    };

    let mut badge = match &options.fit {
        Some(text) => BadgeView::fitting_text(text, Some(style.font()), measurer)
            .ok_or_else(|| format!("could not build a badge frame for '{}'", text))?,
        None => BadgeView::new(Rect::default()),
    };

    style.apply(&mut badge);
    badge.set_value(options.value);
    if let Some(align) = options.align {
        badge.set_badge_alignment(align);
    }

    let fitted = badge.frame().size;
    let natural = if options.fit.is_some() {
        fitted
    } else {
        badge.badge_size(measurer)
    };
    let width = options.width.unwrap_or(natural.width);
    let height = options.height.unwrap_or(natural.height);
    badge.set_frame(Rect::new(0.0, 0.0, width, height));

    let layout = badge.layout(badge.bounds(), measurer);
    if layout.badge_size.width > width || layout.badge_size.height > height {
        log::warn!(
            "Badge {}x{} does not fit the {}x{} frame",
            layout.badge_size.width,
            layout.badge_size.height,
            width,
            height
        );
    }

    let mut report = serde_json::json!({
        "version": VERSION,
        "value": badge.value(),
        "alignment": badge.badge_alignment(),
        "bounds": badge.bounds(),
        "badge_size": layout.badge_size,
        "hidden": badge.is_hidden(),
        "layout": layout,
    });

    if options.ops {
        let mut canvas = RecordingCanvas::new();
        badge.paint(&mut canvas, badge.bounds(), measurer);
        report["ops"] = serde_json::to_value(canvas.ops()).map_err(|e| e.to_string())?;
    }

    Ok(report)
}

fn main() {
    let args: Vec<String> = std::env::args().skip(1).collect();

    let options = match parse_args(&args) {
        Ok(Command::Help) => {
            print_help();
            return;
        }
        Ok(Command::Version) => {
            println!("numbadge {}", VERSION);
            return;
        }
        Ok(Command::Preview(options)) => options,
        Err(err) => {
            eprintln!("{}", err);
            eprintln!("Try 'numbadge --help' for more information.");
            std::process::exit(1);
        }
    };

    // Logs go to stderr so stdout stays valid JSON.
    let mut logger =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    logger
        .format(|buf, record| {
            use std::io::Write;
            writeln!(
                buf,
                "[{} {:>5} {}] {}",
                chrono::Utc::now().to_rfc3339(),
                record.level(),
                record.target(),
                record.args()
            )
        })
        .init();

    log::debug!("Starting numbadge v{} with {:?}", VERSION, options);

    let measurer = text_measurer();
    match preview(&options, measurer.as_ref()) {
        Ok(report) => match serde_json::to_string_pretty(&report) {
            Ok(json) => println!("{}", json),
            Err(err) => {
                eprintln!("Failed to encode report: {}", err);
                std::process::exit(1);
            }
        },
        Err(err) => {
            eprintln!("{}", err);
            std::process::exit(1);
        }
    }
}

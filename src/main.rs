use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use medview::report::{report_file, ReportOptions};
use medview::{init_logging, Config, Unit, BUILD_DATE, VERSION};

const USAGE: &str = "Usage: medview <annotations.json> [--pixel-size <size>] [--unit <unit>] \
[--image <file>] [--decimals <n>] [--config <file>]";

struct Args {
    annotations: PathBuf,
    config: Option<PathBuf>,
    options: ReportOptions,
}

fn parse_args(mut args: impl Iterator<Item = String>) -> Result<Args> {
    let mut annotations = None;
    let mut config = None;
    let mut options = ReportOptions::default();

    while let Some(arg) = args.next() {
        let mut value = |name: &str| {
            args.next()
                .with_context(|| format!("Missing value for {name}"))
        };
        match arg.as_str() {
            "--pixel-size" => {
                options.pixel_size = value("--pixel-size")?
                    .parse()
                    .context("Invalid pixel size")?;
                if options.unit == Unit::Pixel {
                    options.unit = Unit::Millimeter;
                }
            }
            "--unit" => options.unit = value("--unit")?.parse()?,
            "--image" => options.image = Some(PathBuf::from(value("--image")?)),
            "--decimals" => {
                options.label_decimals = value("--decimals")?
                    .parse()
                    .context("Invalid decimal count")?
            }
            "--config" => config = Some(PathBuf::from(value("--config")?)),
            other if other.starts_with("--") => bail!("Unknown option {other}\n{USAGE}"),
            other => annotations = Some(PathBuf::from(other)),
        }
    }

    Ok(Args {
        annotations: annotations.with_context(|| USAGE.to_string())?,
        config,
        options,
    })
}

fn main() -> Result<()> {
    init_logging()?;
    tracing::debug!("medview {VERSION} built {BUILD_DATE}");

    let args = parse_args(std::env::args().skip(1))?;
    let config = match &args.config {
        Some(path) => Config::load_from_file(path)?,
        None => Config::load_or_default()?,
    };

    let reports = report_file(&args.annotations, &config, &args.options)?;
    for report in &reports {
        print!("{}", report.to_text(args.options.label_decimals));
    }
    Ok(())
}

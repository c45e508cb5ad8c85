extern crate clap;
extern crate env_logger;
extern crate failure;
extern crate log;
extern crate mandelzoom;

use clap::{App, Arg, ArgMatches};
use failure::Error;
use mandelzoom::settings::{ITERATION_LIMITS, PASS_LIMITS, WORKER_LIMITS};
use mandelzoom::{
    Canvas, Explorer, Input, MandelbrotFactory, NavigationState, RenderSettings, ViewportRect,
};
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

fn parse_pair<T>(s: &str, separator: char) -> Option<(T, T)>
where
    T: FromStr,
{
    match s.find(separator) {
        None => None,
        Some(index) => match (T::from_str(&s[..index]), T::from_str(&s[index + 1..])) {
            (Ok(l), Ok(r)) => Some((l, r)),
            _ => None,
        },
    }
}

fn validate_pair<T: FromStr>(s: &str, separator: char, err: &str) -> Result<(), String> {
    match parse_pair::<T>(s, separator) {
        Some(_) => Ok(()),
        None => Err(err.to_string()),
    }
}

fn validate_range<T: FromStr + PartialOrd>(
    s: &str,
    low: T,
    high: T,
    isnotanumber_err: &str,
    isnotinrange_err: &str,
) -> Result<(), String> {
    match T::from_str(s) {
        Ok(i) => {
            if i >= low && i <= high {
                Ok(())
            } else {
                Err(isnotinrange_err.to_string())
            }
        }
        Err(_) => Err(isnotanumber_err.to_string()),
    }
}

const OUTPUT: &str = "output";
const SIZE: &str = "size";
const CENTER: &str = "center";
const ZOOM: &str = "zoom";
const THREADS: &str = "threads";
const ITERATIONS: &str = "iterations";
const PASSES: &str = "passes";
const SCRIPT: &str = "script";
const FRAME: &str = "frame";
const VERBOSE: &str = "verbose";

fn args<'a>() -> ArgMatches<'a> {
    App::new("mandelzoom")
        .version("0.1.0")
        .author("Elf M. Sternberg <elf.sternberg@gmail.com>")
        .about("Progressive Mandelbrot explorer")
        .arg(
            Arg::with_name(OUTPUT)
                .required(true)
                .long(OUTPUT)
                .short("o")
                .takes_value(true)
                .help("Output file (PNG)"),
        )
        .arg(
            Arg::with_name(SIZE)
                .required(false)
                .long(SIZE)
                .short("s")
                .takes_value(true)
                .default_value("800x600")
                .validator(|s| validate_pair::<u16>(&s, 'x', "Could not parse output image size"))
                .help("Size of output image"),
        )
        .arg(
            Arg::with_name(CENTER)
                .required(false)
                .long(CENTER)
                .short("c")
                .takes_value(true)
                .allow_hyphen_values(true)
                .default_value("0,0")
                .validator(|s| validate_pair::<f64>(&s, ',', "Could not parse center point"))
                .help("Center of the view on the complex plane"),
        )
        .arg(
            Arg::with_name(ZOOM)
                .required(false)
                .long(ZOOM)
                .short("z")
                .takes_value(true)
                .default_value("0.5")
                .validator(|s| {
                    validate_range(
                        &s,
                        std::f64::MIN_POSITIVE,
                        std::f64::MAX,
                        "Could not parse zoom",
                        "Zoom must be greater than zero",
                    )
                })
                .help("Magnification; 1.0 shows two units along the shorter side"),
        )
        .arg(
            Arg::with_name(THREADS)
                .required(false)
                .long(THREADS)
                .short("t")
                .takes_value(true)
                .validator(move |s| {
                    validate_range(
                        &s,
                        WORKER_LIMITS.0,
                        WORKER_LIMITS.1,
                        "Could not parse thread count",
                        &format!("Thread count must be between 1 and {}", WORKER_LIMITS.1),
                    )
                })
                .help("Number of render workers (default: one per CPU)"),
        )
        .arg(
            Arg::with_name(ITERATIONS)
                .required(false)
                .long(ITERATIONS)
                .short("i")
                .takes_value(true)
                .default_value("1024")
                .validator(move |s| {
                    validate_range(
                        &s,
                        ITERATION_LIMITS.0,
                        ITERATION_LIMITS.1,
                        "Could not parse iteration count",
                        "Iteration count must be between 1 and 1000000",
                    )
                })
                .help("Maximum iterations per point"),
        )
        .arg(
            Arg::with_name(PASSES)
                .required(false)
                .long(PASSES)
                .short("p")
                .takes_value(true)
                .default_value("7")
                .validator(move |s| {
                    validate_range(
                        &s,
                        PASS_LIMITS.0,
                        PASS_LIMITS.1,
                        "Could not parse pass count",
                        "Pass count must be between 1 and 64",
                    )
                })
                .help("Interlaced passes per frame"),
        )
        .arg(
            Arg::with_name(SCRIPT)
                .required(false)
                .long(SCRIPT)
                .takes_value(true)
                .allow_hyphen_values(true)
                .validator(|s| {
                    s.split_whitespace()
                        .map(|word| Input::from_str(word).map(|_| ()))
                        .collect()
                })
                .help("Inputs to replay, e.g. \"click:400,300 d d w q\""),
        )
        .arg(
            Arg::with_name(FRAME)
                .required(false)
                .long(FRAME)
                .takes_value(true)
                .default_value("16")
                .validator(|s| {
                    validate_range(
                        &s,
                        1u64,
                        1000,
                        "Could not parse frame time",
                        "Frame time must be between 1 and 1000 ms",
                    )
                })
                .help("Milliseconds between display refreshes"),
        )
        .arg(
            Arg::with_name(VERBOSE)
                .long(VERBOSE)
                .short("v")
                .help("Log every generation and dispatch"),
        )
        .get_matches()
}

fn init_logging(verbose: bool) {
    let mut builder = env_logger::Builder::new();
    if verbose {
        builder.filter_level(log::LevelFilter::Debug);
    } else if let Ok(filter) = std::env::var("RUST_LOG") {
        builder.parse_filters(&filter);
    } else {
        builder.filter_level(log::LevelFilter::Warn);
    }
    builder.init();
}

fn run(matches: &ArgMatches) -> Result<(), Error> {
    let size: (usize, usize) =
        parse_pair(matches.value_of(SIZE).unwrap(), 'x').expect("Error parsing image dimensions");
    let center: (f64, f64) =
        parse_pair(matches.value_of(CENTER).unwrap(), ',').expect("Error parsing center point");
    let zoom = f64::from_str(matches.value_of(ZOOM).unwrap()).expect("Error parsing zoom");
    let settings = RenderSettings {
        iterations: u32::from_str(matches.value_of(ITERATIONS).unwrap())?,
        passes: u32::from_str(matches.value_of(PASSES).unwrap())?,
        workers: match matches.value_of(THREADS) {
            Some(threads) => usize::from_str(threads)?,
            None => RenderSettings::default().workers,
        },
    };
    let frame = Duration::from_millis(u64::from_str(matches.value_of(FRAME).unwrap())?);
    let inputs = matches
        .value_of(SCRIPT)
        .unwrap_or("")
        .split_whitespace()
        .map(|word| Input::from_str(word).map_err(failure::err_msg))
        .collect::<Result<Vec<Input>, Error>>()?;

    let mut explorer = Explorer::new(
        Arc::new(MandelbrotFactory),
        Canvas::new(size.0, size.1),
        ViewportRect::sized(size.0, size.1),
        NavigationState::new(center.0, center.1, zoom),
        settings,
    )?;

    let limit = Duration::from_secs(3600);
    explorer.render()?;
    explorer.settle(frame, limit)?;
    for input in inputs {
        explorer.apply(input)?;
        explorer.settle(frame, limit)?;
    }

    eprintln!(
        "Rendered {} in {} generations",
        explorer.state(),
        explorer.scheduler().generation().0
    );
    explorer.sink().save_png(matches.value_of(OUTPUT).unwrap())?;
    Ok(())
}

fn main() {
    let matches = args();
    init_logging(matches.is_present(VERBOSE));

    if let Err(e) = run(&matches) {
        eprintln!("Render failure: {}", e);
        std::process::exit(1);
    }
}

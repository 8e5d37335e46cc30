use std::path::PathBuf;

use clap::Parser;
use log::{error, LevelFilter};
use turnips::{
    visiting_weekday, HalfDay, LoadOptions, Save, SaveSummary, Weekday, HEADER_FILE_NAME,
    MAIN_FILE_NAME,
};

#[derive(Parser, Debug)]
#[command(author, version, about = "Shows turnip prices, visitors and weather from a save")]
struct Args {
    /// Directory holding the save files
    #[arg(value_name = "SAVE_DIR")]
    save_dir: PathBuf,

    /// Name of the header file inside the save directory
    #[arg(long, value_name = "NAME", default_value = HEADER_FILE_NAME)]
    header: PathBuf,

    /// Name of the main data file inside the save directory
    #[arg(long, value_name = "NAME", default_value = MAIN_FILE_NAME)]
    main: PathBuf,

    /// Number of bytes to decrypt, by default picked from the save version
    #[arg(long, value_name = "BYTES", value_parser = parse_size)]
    size: Option<usize>,

    /// Size of each read from the main file
    #[arg(long, value_name = "BYTES", value_parser = parse_size)]
    chunk_size: Option<usize>,

    /// Log every step of loading
    #[arg(short, long)]
    verbose: bool,
}

fn parse_size(value: &str) -> Result<usize, std::num::ParseIntError> {
    match value.strip_prefix("0x").or_else(|| value.strip_prefix("0X")) {
        Some(hex) => usize::from_str_radix(hex, 16),
        None => value.parse(),
    }
}

fn setup_logger(verbose: bool) -> Result<(), fern::InitError> {
    let colors = fern::colors::ColoredLevelConfig::new()
        .info(fern::colors::Color::Green)
        .debug(fern::colors::Color::Blue);

    fern::Dispatch::new()
        .format(move |out, message, record| {
            out.finish(format_args!("[{}] {message}", colors.color(record.level())));
        })
        .level(if verbose {
            LevelFilter::Debug
        } else {
            LevelFilter::Warn
        })
        .chain(std::io::stderr())
        .apply()?;

    Ok(())
}

fn print_turnips(summary: &SaveSummary) {
    let prices = &summary.turnips;
    let pattern = prices
        .pattern()
        .map_or_else(|_| format!("unknown ({})", prices.pattern_type), |p| p.to_string());

    println!("Buy price: {}, Pattern: {pattern}", prices.buy_price);
    println!("{:<10} {:>5} {:>5}", "", "AM", "PM");
    for weekday in Weekday::ALL.into_iter().skip(1) {
        println!(
            "{:<10} {:>5} {:>5}",
            weekday.name(),
            prices.price(weekday, HalfDay::Am),
            prices.price(weekday, HalfDay::Pm)
        );
    }

    let stats = prices.summary();
    println!("Max: {}, Min: {}, Avg: {:.1}", stats.max, stats.min, stats.average);
}

fn print_visitors(summary: &SaveSummary) {
    let schedule = &summary.visitors;
    let today = summary
        .date
        .weekday()
        .and_then(|weekday| visiting_weekday(weekday, summary.date.hour));

    for weekday in Weekday::ALL {
        let name = schedule
            .visitor(weekday)
            .map_or_else(|err| err.to_string(), |v| v.to_string());

        let mut line = format!("{:<10} {name}", weekday.name());
        if schedule.celeste_weekday() == Some(weekday) {
            line.push_str(" + celeste");
        }
        if schedule.wisp_weekday() == Some(weekday) {
            line.push_str(" + wisp");
        }
        if today == Some(weekday) {
            line.push_str(" <");
        }
        println!("{line}");
    }
}

fn print_weather(summary: &SaveSummary) {
    let weather = &summary.weather;
    match weather.hemisphere() {
        Ok(hemisphere) => println!("Hemisphere: {hemisphere}"),
        Err(err) => println!("Hemisphere: {err}"),
    }

    let seed = weather.calculate_weather_seed();
    println!("Weather seed: {seed} ({seed:#010x})");
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    setup_logger(args.verbose)?;

    let mut options = LoadOptions::default()
        .with_header_file(args.header)
        .with_main_file(args.main);
    if let Some(size) = args.size {
        options = options.with_plaintext_size(size);
    }
    if let Some(chunk_size) = args.chunk_size {
        options = options.with_chunk_size(chunk_size);
    }

    let save = Save::open(&args.save_dir, &options).map_err(|err| {
        error!("Failed to load save: {err}");
        err
    })?;
    let summary = save.summary();

    println!("Game version: {}", summary.version);
    match summary.date.to_posix() {
        Ok(timestamp) => println!("Saved at: {} ({timestamp})", summary.date),
        Err(err) => println!("Saved at: {err}"),
    }

    println!();
    print_turnips(&summary);
    println!();
    print_visitors(&summary);
    println!();
    print_weather(&summary);

    Ok(())
}

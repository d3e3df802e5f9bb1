use chrono::Local;
use log::LevelFilter;
use std::path::PathBuf;
use std::sync::Once;

static INIT: Once = Once::new();

pub fn init_logging(app_name: &str) -> Result<(), String> {
    let mut init_result: Result<(), String> = Ok(());
    INIT.call_once(|| {
        if let Err(err) = init_logging_inner(app_name) {
            init_result = Err(err);
        }
    });
    init_result
}

/// `IBAN_LOG_LEVEL` wins over `RUST_LOG`; unknown names fall back to info.
fn parse_level(iban_level: Option<&str>, rust_log: Option<&str>) -> LevelFilter {
    iban_level
        .or(rust_log)
        .and_then(|value| value.trim().parse::<LevelFilter>().ok())
        .unwrap_or(LevelFilter::Info)
}

/// Unset, empty, `off` and `none` all mean stdout only.
fn parse_log_dir(value: Option<&str>) -> Option<PathBuf> {
    match value.map(str::trim) {
        None | Some("") => None,
        Some(dir) if dir.eq_ignore_ascii_case("off") || dir.eq_ignore_ascii_case("none") => None,
        Some(dir) => Some(PathBuf::from(dir)),
    }
}

fn log_file_name(app_name: &str, date: &str) -> String {
    format!("{app_name}-{date}.log")
}

fn init_logging_inner(app_name: &str) -> Result<(), String> {
    let level = parse_level(
        std::env::var("IBAN_LOG_LEVEL").ok().as_deref(),
        std::env::var("RUST_LOG").ok().as_deref(),
    );
    let log_dir = parse_log_dir(std::env::var("IBAN_LOG_DIR").ok().as_deref());

    let mut dispatch = fern::Dispatch::new()
        .level(level)
        .format(|out, message, record| {
            out.finish(format_args!(
                "{} | {:<5} | {} | {}",
                Local::now().format("%Y-%m-%d %H:%M:%S"),
                record.level(),
                record.target(),
                message
            ))
        })
        .chain(std::io::stdout());

    if let Some(dir) = log_dir {
        std::fs::create_dir_all(&dir).map_err(|err| err.to_string())?;
        let date = Local::now().format("%Y_%m_%d").to_string();
        let file_path = dir.join(log_file_name(app_name, &date));
        dispatch = dispatch.chain(fern::log_file(file_path).map_err(|err| err.to_string())?);
    }

    dispatch.apply().map_err(|err| err.to_string())
}

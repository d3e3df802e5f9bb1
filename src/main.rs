mod logging;

use clap::{Parser, Subcommand};
use iban_check::country::{self, CountryLayout, FieldSpan};
use iban_check::fixtures::{load_fixtures_from_path, verify_fixtures};
use iban_check::generator::{generate_records, write_records_csv, GeneratorConfig};
use iban_check::{compute_checksum, is_valid_iban, parse_iban, IbanCheck};
use rand::Rng;
use std::path::PathBuf;
use std::time::Instant;

#[derive(Parser)]
#[command(name = "iban-check")]
#[command(about = "IBAN validation and decomposition", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    Parse(ParseArgs),
    Check(CheckArgs),
    Checksum(ChecksumArgs),
    Countries(CountriesArgs),
    Generate(GenerateArgs),
    Verify(VerifyArgs),
}

#[derive(Parser)]
struct ParseArgs {
    iban: String,
}

#[derive(Parser)]
struct CheckArgs {
    iban: String,
}

#[derive(Parser)]
struct ChecksumArgs {
    iban: String,
}

#[derive(Parser)]
struct CountriesArgs {
    #[arg(long)]
    code: Option<String>,
}

#[derive(Parser)]
struct GenerateArgs {
    /// Country code; repeat for several. Defaults to every supported country.
    #[arg(long = "country")]
    countries: Vec<String>,
    #[arg(long, default_value_t = 100)]
    count: usize,
    #[arg(long)]
    seed: Option<u64>,
    #[arg(long, default_value = "data/synthetic/ibans.csv")]
    output: PathBuf,
}

#[derive(Parser)]
struct VerifyArgs {
    #[arg(long, default_value = "tests/data/ibans.csv")]
    input: PathBuf,
}

fn main() {
    if let Err(err) = run() {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), String> {
    logging::init_logging("iban-check")?;
    let cli = Cli::parse();
    match cli.command {
        Command::Parse(args) => run_parse(args),
        Command::Check(args) => run_check(args),
        Command::Checksum(args) => run_checksum(args),
        Command::Countries(args) => run_countries(args),
        Command::Generate(args) => run_generate(args),
        Command::Verify(args) => run_verify(args),
    }
}

fn run_parse(args: ParseArgs) -> Result<(), String> {
    let iban = parse_iban(&args.iban).map_err(|err| err.to_string())?;
    emit_info_line(&format!("IBAN: {}", iban.formatted()));
    emit_info_line(&format!("Country: {}", iban.country_code()));
    emit_info_line(&format!("Checksum: {}", iban.checksum()));
    emit_info_line(&format!("BBAN: {}", iban.bban()));
    emit_info_line(&format!("Bank code: {}", iban.bank_code()));
    emit_info_line(&format!("Branch code: {}", iban.branch_code()));
    emit_info_line(&format!("Account number: {}", iban.account_number()));
    Ok(())
}

fn run_check(args: CheckArgs) -> Result<(), String> {
    match is_valid_iban(&args.iban).map_err(|err| err.to_string())? {
        IbanCheck::Valid { formatted } => emit_info_line(&format!("valid: {formatted}")),
        IbanCheck::ChecksumMismatch => emit_info_line("invalid: checksum mismatch"),
    }
    Ok(())
}

fn run_checksum(args: ChecksumArgs) -> Result<(), String> {
    let checksum = compute_checksum(&args.iban).map_err(|err| err.to_string())?;
    emit_info_line(&format!("Checksum: {checksum:02}"));
    Ok(())
}

fn run_countries(args: CountriesArgs) -> Result<(), String> {
    match args.code {
        Some(code) => {
            let code = code.trim().to_uppercase();
            let layout = country::lookup(&code)
                .ok_or_else(|| format!("country <{code}> is not in the list"))?;
            emit_layout(layout);
        }
        None => {
            for layout in country::all() {
                emit_layout(layout);
            }
            emit_info_line(&format!("{} countries supported", country::all().len()));
        }
    }
    Ok(())
}

fn emit_layout(layout: &CountryLayout) {
    emit_info_line(&format!(
        "{} | {:<24} | {:>2} | {:<40} | {:<11} | bank={} branch={} account={}",
        layout.code(),
        layout.name(),
        layout.length(),
        layout.template(),
        layout.bban_format(),
        describe_span(layout.bank_code_span()),
        describe_span(layout.branch_code_span()),
        describe_span(layout.account_number_span()),
    ));
}

fn describe_span(span: Option<FieldSpan>) -> String {
    match span {
        Some(span) => format!("{}..={}", span.first, span.last),
        None => "-".to_string(),
    }
}

fn run_generate(args: GenerateArgs) -> Result<(), String> {
    let seed = args.seed.unwrap_or_else(random_seed);
    let config = GeneratorConfig {
        countries: args.countries,
        count: args.count,
    };

    let gen_start = Instant::now();
    let records = generate_records(&config, seed).map_err(|err| err.to_string())?;
    let gen_elapsed = gen_start.elapsed();
    write_records_csv(&args.output, &records)?;

    log::info!(
        "generated {} IBANs, seed {}, output {}",
        records.len(),
        seed,
        args.output.display()
    );
    emit_info_line(&format!("Generation time: {} ms", gen_elapsed.as_millis()));
    Ok(())
}

fn run_verify(args: VerifyArgs) -> Result<(), String> {
    let start = Instant::now();
    let records = load_fixtures_from_path(&args.input)?;
    let report = verify_fixtures(&records);
    let elapsed = start.elapsed();

    emit_info_line(&format!(
        "Verify: input={} total={} passed={} failed={}",
        args.input.display(),
        report.total,
        report.passed,
        report.failed()
    ));
    for failure in &report.failures {
        emit_info_line(&format!(
            "line {}: {} ({}) -> {}",
            failure.line, failure.record.iban, failure.record.code, failure.reason
        ));
    }
    emit_info_line(&format!("Verification time: {} ms", elapsed.as_millis()));

    if !report.is_clean() {
        return Err(format!(
            "verification failed for {} fixture(s)",
            report.failed()
        ));
    }
    Ok(())
}

fn random_seed() -> u64 {
    let mut rng = rand::rngs::OsRng;
    rng.gen()
}

fn emit_info_line(message: &str) {
    if log::log_enabled!(log::Level::Info) {
        log::info!("{}", message);
    } else {
        println!("{message}");
    }
}

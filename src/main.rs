use clap::{Parser, Subcommand, ValueEnum};
use finsched::api::{
    CalculationResponse, QueryParams, evaluate_investment, evaluate_loan, investment_from_params,
    loan_from_params,
};
use finsched::core::{InvestmentResult, LoanResult};
use finsched::format::{compact, inr};
use serde::Serialize;

#[derive(Parser, Debug)]
#[command(
    name = "finsched",
    about = "Investment growth and home-loan EMI schedules"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the HTTP API.
    Serve {
        #[arg(long, default_value_t = 8080)]
        port: u16,
    },
    /// Calculate an investment schedule from a share-link query string.
    Invest {
        #[arg(default_value = "")]
        query: String,
        #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
        format: OutputFormat,
    },
    /// Calculate a loan amortization schedule from a share-link query string.
    Loan {
        #[arg(default_value = "")]
        query: String,
        #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
        format: OutputFormat,
    },
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Json,
    Summary,
}

#[tokio::main]
async fn main() {
    env_logger::init();
    let cli = Cli::parse();

    let outcome = match cli.command {
        Command::Serve { port } => finsched::api::run_http_server(port).await,
        Command::Invest { query, format } => run_invest(&query, format),
        Command::Loan { query, format } => run_loan(&query, format),
    };

    if let Err(e) = outcome {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn run_invest(query: &str, format: OutputFormat) -> finsched::error::Result<()> {
    let params = QueryParams::parse(query)?;
    match evaluate_investment(&investment_from_params(&params)) {
        Ok(response) => match format {
            OutputFormat::Json => print_json(&response),
            OutputFormat::Summary => {
                print_investment_summary(&response);
                Ok(())
            }
        },
        Err(issues) => report_issues(&issues),
    }
}

fn run_loan(query: &str, format: OutputFormat) -> finsched::error::Result<()> {
    let params = QueryParams::parse(query)?;
    match evaluate_loan(&loan_from_params(&params)) {
        Ok(response) => match format {
            OutputFormat::Json => print_json(&response),
            OutputFormat::Summary => {
                print_loan_summary(&response);
                Ok(())
            }
        },
        Err(issues) => report_issues(&issues),
    }
}

fn print_json<T: Serialize>(body: &T) -> finsched::error::Result<()> {
    println!("{}", serde_json::to_string_pretty(body)?);
    Ok(())
}

fn report_issues(issues: &[String]) -> finsched::error::Result<()> {
    for issue in issues {
        eprintln!("- {issue}");
    }
    std::process::exit(2);
}

fn print_investment_summary(response: &CalculationResponse<InvestmentResult>) {
    let result = &response.result;
    println!("{}", result.inputs.mode().label());
    println!("Invested:  {}", inr(result.total_invested));
    println!("Returns:   {}", inr(result.estimated_returns));
    println!(
        "Maturity:  {} ({})",
        inr(result.maturity_value),
        compact(result.maturity_value)
    );
    println!();
    println!(
        "{:>4}  {:>16}  {:>16}  {:>16}",
        "Year", "Invested", "Value", "Gains"
    );
    for row in &result.schedule {
        println!(
            "{:>4}  {:>16}  {:>16}  {:>16}",
            row.year,
            inr(row.invested_total),
            inr(row.end_value),
            inr(row.gains_total)
        );
    }
    println!();
    println!("?{}", response.query);
}

fn print_loan_summary(response: &CalculationResponse<LoanResult>) {
    let result = &response.result;
    println!("{}", result.inputs.mode().label());
    println!("EMI:       {}", inr(result.emi));
    println!(
        "Interest:  {} ({})",
        inr(result.total_interest),
        compact(result.total_interest)
    );
    println!("Total:     {}", inr(result.total_payment));
    if let Some(mf) = &result.neutralizer {
        println!("MF value:  {}", inr(mf.mf_maturity_value));
        println!(
            "SIP to cover interest: {}",
            inr(mf.mf_required_monthly_investment_to_match_interest)
        );
        println!(
            "Left after interest:   {}",
            inr(mf.mf_amount_left_after_interest)
        );
    }
    println!();
    println!(
        "{:>4}  {:>16}  {:>16}  {:>16}",
        "Year", "Principal", "Interest", "Balance"
    );
    for row in &result.schedule {
        println!(
            "{:>4}  {:>16}  {:>16}  {:>16}",
            row.year,
            inr(row.principal_paid_year),
            inr(row.interest_paid_year),
            inr(row.closing_balance)
        );
    }
    println!();
    println!("?{}", response.query);
}

use anyhow::{bail, Context, Result};
use chrono::Local;
use clap::{Parser, Subcommand};
use paygateway_client::models::{CreditCardDetails, PaymentMethod, PaymentRequest};
use paygateway_client::utils::{format_brl, mask_card_number};
use paygateway_client::{FileLogger, GatewayConfig, PaymentGatewayClient, PaymentService};
use rust_decimal::Decimal;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "paygateway", author, version, about = "PayGateway payment submission client")]
struct Cli {
    /// TOML config file. Falls back to PAYGATEWAY_* environment variables.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the demo credit card, PIX and bank slip requests without sending them
    Sample,
    /// Validate a payment request JSON file
    Validate { request: PathBuf },
    /// Validate and submit a payment request JSON file to the gateway
    Submit { request: PathBuf },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => GatewayConfig::from_file(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => GatewayConfig::from_env(),
    };

    let logger = Arc::new(
        FileLogger::new(&config.log_file_path)
            .with_context(|| format!("opening log file {}", config.log_file_path.display()))?,
    );
    logger.log_info("Application started");

    match cli.command {
        Command::Sample => print_samples(&logger)?,
        Command::Validate { request } => {
            let request = load_request(&request)?;
            if let Err(reason) = request.check() {
                bail!("order {} is invalid: {}", request.order_id, reason);
            }
            println!("order {} is valid", request.order_id);
        }
        Command::Submit { request } => {
            config.validate()?;
            let request = load_request(&request)?;
            let service = PaymentGatewayClient::new(&config, Arc::clone(&logger))?;
            info!("Submitting order {} to {}", request.order_id, service.endpoint());

            let response = service.process_payment(&request).await;
            println!("{}", serde_json::to_string_pretty(&response)?);

            if !response.is_success() {
                bail!(
                    "payment not accepted: {}",
                    response.error_code.as_deref().unwrap_or("status unknown")
                );
            }
        }
    }

    Ok(())
}

fn load_request(path: &Path) -> Result<PaymentRequest> {
    let raw = std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("parsing {}", path.display()))
}

fn sample_request(amount: Decimal, name: &str, email: &str, document: &str, method: PaymentMethod) -> PaymentRequest {
    PaymentRequest {
        order_id: format!("ORDER-{}", Local::now().format("%Y%m%d%H%M%S")),
        amount,
        currency: "BRL".to_string(),
        customer_name: name.to_string(),
        customer_email: email.to_string(),
        customer_document: document.to_string(),
        method,
        callback_url: "https://modastyle.example.com/payment/callback".to_string(),
        description: "Compra de roupas - ModaStyle".to_string(),
    }
}

fn print_samples(logger: &FileLogger) -> Result<()> {
    let samples = [
        sample_request(
            Decimal::new(15075, 2),
            "João Silva",
            "joao@example.com",
            "123.456.789-00",
            PaymentMethod::CreditCard(CreditCardDetails {
                card_number: "4111111111111111".to_string(),
                holder_name: "JOAO SILVA".to_string(),
                expiration: "12/30".to_string(),
                cvv: "123".to_string(),
            }),
        ),
        sample_request(
            Decimal::new(8990, 2),
            "Maria Souza",
            "maria@example.com",
            "987.654.321-00",
            PaymentMethod::Pix { key: "maria@example.com".to_string() },
        ),
        sample_request(
            Decimal::new(29999, 2),
            "Pedro Santos",
            "pedro@example.com",
            "111.222.333-44",
            PaymentMethod::BankSlip,
        ),
    ];

    for request in &samples {
        println!("\nPayload for a {} payment:", request.method.kind());
        println!("- Order: {}", request.order_id);
        println!("- Amount: {}", format_brl(request.amount));
        println!("- Customer: {}", request.customer_name);
        match &request.method {
            PaymentMethod::CreditCard(card) => println!("- Card: {}", mask_card_number(&card.card_number)),
            PaymentMethod::Pix { key } => println!("- PIX key: {}", key),
            PaymentMethod::BankSlip => println!("- Document: {}", request.customer_document),
        }
        match request.check() {
            Ok(()) => println!("- Validation: ok"),
            Err(reason) => println!("- Validation: {}", reason),
        }
        println!("{}", serde_json::to_string_pretty(request)?);
    }

    logger.log_info("Payment simulation finished");
    Ok(())
}

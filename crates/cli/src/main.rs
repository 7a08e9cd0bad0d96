//! GreenKart CLI - browse the catalog, log in, and place orders.
//!
//! # Usage
//!
//! ```bash
//! # List the catalog and the delivery slots
//! gk-cli products
//! gk-cli slots
//!
//! # Log in (request an OTP, then verify it to get a token)
//! gk-cli login send -c 9876543210
//! gk-cli login verify -c 9876543210 -o 123456
//!
//! # Authenticated reads
//! gk-cli addresses -t <token>
//! gk-cli orders -t <token>
//!
//! # Place an order: 2x product 3 and 1x product 7, UPI, first available slot
//! gk-cli checkout -t <token> -i 3:2 -i 7 --payment upi
//! ```
//!
//! # Environment Variables
//!
//! - `GREENKART_API_URL` - Base URL of the GreenKart backend
//! - `GREENKART_HTTP_TIMEOUT_SECS` - HTTP timeout (default 30)

#![cfg_attr(not(test), forbid(unsafe_code))]

use chrono::NaiveDate;
use clap::{Parser, Subcommand};

use greenkart_core::PaymentMethod;

mod commands;

use commands::checkout::Overrides;

#[derive(Parser)]
#[command(name = "gk-cli")]
#[command(author, version, about = "GreenKart grocery CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the product catalog
    Products,
    /// List the delivery slots
    Slots,
    /// List saved delivery addresses
    Addresses {
        /// Auth token from `login verify`
        #[arg(short, long)]
        token: String,
    },
    /// List past orders
    Orders {
        /// Auth token from `login verify`
        #[arg(short, long)]
        token: String,
    },
    /// Log in with a one-time password
    Login {
        #[command(subcommand)]
        action: LoginAction,
    },
    /// Build a cart and place an order
    Checkout {
        /// Auth token from `login verify`
        #[arg(short, long)]
        token: String,

        /// Cart item as `<product-id>:<quantity>` (quantity defaults to 1);
        /// repeatable
        #[arg(short, long = "item", required = true)]
        items: Vec<String>,

        /// Address id (defaults to the saved default address)
        #[arg(long)]
        address: Option<i64>,

        /// Slot id (defaults to the first available slot)
        #[arg(long)]
        slot: Option<i64>,

        /// Delivery date, `YYYY-MM-DD` (defaults to the earliest offered)
        #[arg(long)]
        date: Option<NaiveDate>,

        /// Payment method (`cash on delivery`, `upi`, `net banking`,
        /// `credit/debit card`)
        #[arg(long)]
        payment: Option<PaymentMethod>,
    },
}

#[derive(Subcommand)]
enum LoginAction {
    /// Request an OTP for a phone number or email
    Send {
        /// Phone number or email address
        #[arg(short, long)]
        contact: String,
    },
    /// Verify an OTP and print the auth token
    Verify {
        /// Phone number or email address
        #[arg(short, long)]
        contact: String,

        /// The one-time password received
        #[arg(short, long)]
        otp: String,
    },
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Products => commands::browse::products().await?,
        Commands::Slots => commands::browse::slots().await?,
        Commands::Addresses { token } => commands::browse::addresses(token).await?,
        Commands::Orders { token } => commands::browse::orders(token).await?,
        Commands::Login { action } => match action {
            LoginAction::Send { contact } => commands::login::send(&contact).await?,
            LoginAction::Verify { contact, otp } => {
                commands::login::verify(&contact, &otp).await?;
            }
        },
        Commands::Checkout {
            token,
            items,
            address,
            slot,
            date,
            payment,
        } => {
            let overrides = Overrides {
                address,
                slot,
                date,
                payment,
            };
            commands::checkout::place_order(token, &items, &overrides).await?;
        }
    }
    Ok(())
}

use clap::Parser;

/// Sneaker store server.
#[derive(Parser, Debug)]
#[command(version, about)]
pub struct Cli {
    /// Empty the orders read model and replay every order event into it on startup.
    #[arg(long)]
    pub reset_orders_read_model: bool,
}

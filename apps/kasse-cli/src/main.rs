//! # Kasse Entry Point
//!
//! ```text
//! kasse [PRICES] [DISCOUNTS] [RECEIPT] [--config PATH] [--style category|totals]
//! ```
//!
//! Setup and the command loop live in lib.rs so they can be tested.

fn main() -> std::process::ExitCode {
    kasse_cli_lib::run()
}

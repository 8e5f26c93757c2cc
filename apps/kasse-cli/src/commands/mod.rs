//! # Commands Module
//!
//! Parses a typed line into a [`Command`] and runs it against the session.
//!
//! ## Command Organization
//! ```text
//! commands/
//! ├── mod.rs      ◄─── You are here (parsing, dispatch, help)
//! ├── catalog.rs  ◄─── read/add product, read/add discount
//! ├── receipt.rs  ◄─── add/remove receipt, read receipt, close
//! └── print.rs    ◄─── print current/all/json/[file] <file>
//! ```
//!
//! ## Grammar
//! ```text
//! <verb> <kind> <rest of line>
//!
//! The rest of the line is kept whole, so product names may contain spaces:
//!   add product 7,BRØD,RUGBRØD MED KERNER,18,50
//! ```

pub mod catalog;
pub mod print;
pub mod receipt;

use std::path::PathBuf;

use crate::error::CliError;
use crate::state::Session;

/// A parsed command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Help,
    ReadProducts(PathBuf),
    ReadDiscounts(PathBuf),
    ReadReceipt(PathBuf),
    AddProduct(String),
    AddDiscount(String),
    NewBasket,
    AddPurchase(String),
    RemovePurchase(String),
    PrintCurrent,
    PrintAll,
    PrintJson,
    PrintFile(PathBuf),
    Close,
    Quit,
    /// Blank input line.
    Nothing,
}

/// What the loop should do after a command ran.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// Print this text (nothing if empty) and keep reading.
    Text(String),
    /// Stop the loop.
    Quit,
}

impl Reply {
    fn none() -> Self {
        Reply::Text(String::new())
    }
}

/// Parses one input line.
pub fn parse(line: &str) -> Result<Command, CliError> {
    let (verb, rest) = split_word(line.trim());

    let command = match verb {
        "" => Command::Nothing,
        "help" => Command::Help,
        "quit" | "exit" => Command::Quit,
        "close" => Command::Close,
        "read" => {
            let (kind, file) = split_word(rest);
            if file.is_empty() {
                return Err(CliError::unknown_command());
            }
            let file = PathBuf::from(file);
            match kind {
                "product" | "products" | "prices" => Command::ReadProducts(file),
                "discount" | "discounts" => Command::ReadDiscounts(file),
                "receipt" | "receipts" => Command::ReadReceipt(file),
                _ => return Err(CliError::unknown_command()),
            }
        }
        "add" => {
            let (kind, param) = split_word(rest);
            if param.is_empty() {
                return Err(CliError::unknown_command());
            }
            match kind {
                "product" => Command::AddProduct(param.to_string()),
                "discount" => Command::AddDiscount(param.to_string()),
                "receipt" if param == "new" => Command::NewBasket,
                "receipt" => Command::AddPurchase(param.to_string()),
                _ => return Err(CliError::unknown_command()),
            }
        }
        "remove" => match split_word(rest) {
            ("receipt", barcode) if !barcode.is_empty() => {
                Command::RemovePurchase(barcode.to_string())
            }
            _ => return Err(CliError::unknown_command()),
        },
        "print" => match (rest, split_word(rest)) {
            ("", _) => return Err(CliError::unknown_command()),
            (_, ("file", path)) if !path.is_empty() => {
                Command::PrintFile(PathBuf::from(path))
            }
            ("current", _) => Command::PrintCurrent,
            ("all", _) => Command::PrintAll,
            ("json", _) => Command::PrintJson,
            (file, _) => Command::PrintFile(PathBuf::from(file)),
        },
        _ => return Err(CliError::unknown_command()),
    };

    Ok(command)
}

/// Runs a parsed command.
pub fn execute(session: &mut Session, command: Command) -> Result<Reply, CliError> {
    match command {
        Command::Nothing => Ok(Reply::none()),
        Command::Help => Ok(Reply::Text(help_text())),
        Command::Quit => Ok(Reply::Quit),
        Command::ReadProducts(path) => catalog::read_products(session, &path),
        Command::ReadDiscounts(path) => catalog::read_discounts(session, &path),
        Command::AddProduct(line) => catalog::add_product(session, &line),
        Command::AddDiscount(line) => catalog::add_discount(session, &line),
        Command::NewBasket => receipt::new_basket(session),
        Command::AddPurchase(barcode) => receipt::add_purchase(session, &barcode),
        Command::RemovePurchase(barcode) => receipt::remove_purchase(session, &barcode),
        Command::ReadReceipt(path) => receipt::read_receipt(session, &path),
        Command::Close => receipt::close(session),
        Command::PrintCurrent => print::current(session),
        Command::PrintAll => print::all(session),
        Command::PrintJson => print::json(session),
        Command::PrintFile(path) => print::file(session, &path),
    }
}

/// Parses and runs one line.
pub fn handle_line(session: &mut Session, line: &str) -> Result<Reply, CliError> {
    execute(session, parse(line)?)
}

const HELP: &[(&str, &str)] = &[
    ("read prices <file>", "Reads a text file and creates products from it"),
    ("add product <product>", "Creates a product from the line and adds it to the store"),
    ("read discounts <file>", "Reads a text file and creates discounts from it"),
    ("add discount <discount>", "Creates a discount, replacing one with the same limit"),
    ("read receipt <file>", "Starts a receipt and scans every barcode in the file"),
    ("add receipt new", "Starts a new empty receipt"),
    ("add receipt <barcode>", "Adds the product to the current receipt"),
    ("remove receipt <barcode>", "Removes one unit of the product from the current receipt"),
    ("close", "Closes the current receipt and prints it"),
    ("print current", "Prints the current receipt"),
    ("print json", "Prints the current receipt as JSON"),
    ("print all", "Prints the total of all receipts"),
    ("print <file>", "Reads a text file and prints the receipt from it"),
    ("print file <file>", "Same, for files named current, all or json"),
    ("quit", "Exits the program"),
];

fn help_text() -> String {
    let mut text = String::from("Possible commands:");
    for (usage, what) in HELP {
        text.push_str(&format!("\n  {:<28}: {}", usage, what));
    }
    text
}

fn split_word(s: &str) -> (&str, &str) {
    match s.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (s, ""),
    }
}

// shopkeep/src/cli/mod.rs

//! Interactive console. Each menu is a loop that reads a choice, dispatches
//! to an action and prints the outcome; errors are shown and the loop goes on.

mod admin;
mod customer;
pub mod render;

use crate::errors::{AppError, Result};
use crate::models::Money;
use crate::state::AppState;
use std::fmt::Display;
use std::io::{self, BufRead, Write};
use tracing::{debug, warn};

pub struct Console<R, W> {
  state: AppState,
  input: R,
  out: W,
}

impl<R: BufRead, W: Write> Console<R, W> {
  pub fn new(state: AppState, input: R, out: W) -> Self {
    Self { state, input, out }
  }

  pub fn into_output(self) -> W {
    self.out
  }

  /// Runs until the user exits or input ends.
  pub async fn run(&mut self) -> Result<()> {
    match self.main_menu().await {
      Err(e) if is_end_of_input(&e) => {
        debug!("Console input closed.");
        self.say("\nGoodbye.")
      }
      other => other,
    }
  }

  async fn main_menu(&mut self) -> Result<()> {
    self.say("Welcome to the Online Shopping System!")?;
    loop {
      self.say("\nMain Menu:\n1. Customer\n2. Admin\n0. Exit")?;
      match self.prompt("Enter your choice: ")?.as_str() {
        "1" | "customer" => self.customer_entry().await?,
        "2" | "admin" => self.admin_menu().await?,
        "0" | "exit" | "q" => {
          self.say("Thank you for visiting the Online Shopping System.")?;
          return Ok(());
        }
        _ => self.say("Invalid choice. Please try again.")?,
      }
    }
  }

  // --- Output ---

  fn say(&mut self, text: impl Display) -> Result<()> {
    writeln!(self.out, "{}", text)?;
    Ok(())
  }

  /// Prints the success text or the error. Only console I/O errors propagate.
  fn report<T>(&mut self, result: Result<T>, on_ok: impl FnOnce(T) -> String) -> Result<()> {
    match result {
      Ok(value) => self.say(on_ok(value)),
      Err(e) => self.show_error(e),
    }
  }

  fn show_error(&mut self, e: AppError) -> Result<()> {
    if let AppError::Io(_) = e {
      return Err(e);
    }
    if e.is_recoverable() {
      debug!(error = %e, "Operation refused.");
    } else {
      warn!(error = %e, "Operation failed.");
    }
    self.say(format!("Error: {}", e))
  }

  // --- Input ---

  /// Reads one trimmed line. End of input is reported as an `UnexpectedEof` I/O error.
  fn prompt(&mut self, label: &str) -> Result<String> {
    write!(self.out, "{}", label)?;
    self.out.flush()?;
    let mut line = String::new();
    if self.input.read_line(&mut line)? == 0 {
      return Err(AppError::Io(io::Error::new(io::ErrorKind::UnexpectedEof, "end of input")));
    }
    Ok(line.trim().to_string())
  }

  /// Blank answers come back as `None`.
  fn prompt_optional(&mut self, label: &str) -> Result<Option<String>> {
    let answer = self.prompt(label)?;
    Ok((!answer.is_empty()).then_some(answer))
  }

  fn prompt_i64(&mut self, label: &str) -> Result<i64> {
    loop {
      let answer = self.prompt(label)?;
      match answer.parse::<i64>() {
        Ok(value) => return Ok(value),
        Err(_) => self.say(format!("'{}' is not a whole number. Please try again.", answer))?,
      }
    }
  }

  fn prompt_optional_i64(&mut self, label: &str) -> Result<Option<i64>> {
    loop {
      let Some(answer) = self.prompt_optional(label)? else {
        return Ok(None);
      };
      match answer.parse::<i64>() {
        Ok(value) => return Ok(Some(value)),
        Err(_) => self.say(format!("'{}' is not a whole number. Please try again.", answer))?,
      }
    }
  }

  fn prompt_optional_money(&mut self, label: &str) -> Result<Option<Money>> {
    loop {
      let Some(answer) = self.prompt_optional(label)? else {
        return Ok(None);
      };
      match answer.parse::<Money>() {
        Ok(value) => return Ok(Some(value)),
        Err(e) => self.say(e)?,
      }
    }
  }

  fn prompt_money(&mut self, label: &str) -> Result<Money> {
    loop {
      if let Some(value) = self.prompt_optional_money(label)? {
        return Ok(value);
      }
    }
  }
}

fn is_end_of_input(e: &AppError) -> bool {
  matches!(e, AppError::Io(io_err) if io_err.kind() == io::ErrorKind::UnexpectedEof)
}

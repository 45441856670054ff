mod commands;
mod core;
mod release;

use clap::Parser;
use core::error::{ForkError, print_error};

/// Cut a fork release: changelog entry, version bump, commit, annotated tag
#[derive(Debug, Parser)]
#[command(name = "fork-release")]
#[command(version, about, long_about = None)]
#[command(styles = get_styles())]
struct Cli {
  /// Release version, e.g. 0.3.0 or 1.2.3-rc.1 (no tag prefix)
  // The id keeps the positional clear of the auto-generated --version flag
  #[arg(id = "release-version", value_name = "VERSION")]
  version: String,

  /// Push the release commit and tag to the fork remote
  #[arg(long)]
  push: bool,

  /// Print the release plan without modifying anything
  #[arg(long)]
  dry_run: bool,
}

fn get_styles() -> clap::builder::Styles {
  clap::builder::Styles::styled()
    .usage(
      anstyle::Style::new()
        .bold()
        .underline()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Yellow))),
    )
    .header(
      anstyle::Style::new()
        .bold()
        .underline()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Yellow))),
    )
    .literal(anstyle::Style::new().fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Green))))
    .invalid(
      anstyle::Style::new()
        .bold()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Red))),
    )
    .error(
      anstyle::Style::new()
        .bold()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Red))),
    )
    .valid(
      anstyle::Style::new()
        .bold()
        .underline()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Green))),
    )
    .placeholder(anstyle::Style::new().fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::White))))
}

fn main() {
  let cli = Cli::parse();

  if let Err(e) = commands::run_release(&cli.version, cli.push, cli.dry_run) {
    handle_error(e);
  }
}

/// Print an error nicely and exit with its mapped code
fn handle_error(error: ForkError) -> ! {
  print_error(&error);
  std::process::exit(error.exit_code().as_i32());
}

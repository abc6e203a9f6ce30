//! Sable inspector CLI
//!
//! Dumps what the engine sees: the token stream for arbitrary CSS input,
//! and the parsed component structure and specificity for selectors.

use anyhow::{Context, Result};
use clap::{Parser as ClapParser, Subcommand};
use owo_colors::OwoColorize;
use sable_css::{Parser, Token, Tokenizer};
use sable_selectors::{Component, DefaultSelectorContext, SelectorList, ToCss};

/// Sable — inspector for the CSS tokenizer and selector engine
#[derive(ClapParser, Debug)]
#[command(name = "sable")]
#[command(author, version, about, long_about = None)]
#[command(after_help = r#"EXAMPLES:
    # Dump the token stream
    sable tokens 'a[href^="https"] { color: red }'

    # Parse a selector list and show structure and specificity
    sable selector 'div.foo#bar:hover > span::before'

    # Machine-readable output
    sable selector --json 'ul li:nth-child(2n+1)'
"#)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Tokenize CSS input and print every token with its source location
    Tokens {
        /// The CSS text to tokenize
        input: String,
        /// Emit the token stream as JSON
        #[arg(long)]
        json: bool,
    },
    /// Parse a comma-separated selector list
    Selector {
        /// The selector list to parse
        input: String,
        /// Emit the parsed selectors as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::Tokens { input, json } => print_tokens(&input, json),
        Command::Selector { input, json } => print_selectors(&input, json),
    }
}

fn print_tokens(input: &str, json: bool) -> Result<()> {
    let mut tokenizer = Tokenizer::new(input);

    if json {
        let mut tokens = Vec::new();
        while let Some(token) = tokenizer.next_token() {
            tokens.push(token);
        }
        println!(
            "{}",
            serde_json::to_string_pretty(&tokens).context("serializing token stream")?
        );
        return Ok(());
    }

    while let Some(token) = tokenizer.next_token() {
        let location = tokenizer.location();
        println!(
            "{:>4}:{:<3} {}",
            location.line.to_string().dimmed(),
            location.column.to_string().dimmed(),
            format_token(&token),
        );
    }
    Ok(())
}

fn format_token(token: &Token) -> String {
    match token {
        Token::Whitespace => "<whitespace>".dimmed().to_string(),
        Token::Comment(_) => token.to_string().dimmed().to_string(),
        Token::Identifier(_) | Token::Function(_) | Token::AtKeyword(_) => {
            token.to_string().cyan().to_string()
        }
        Token::String(_) | Token::Url(_) => token.to_string().green().to_string(),
        Token::Number(_) | Token::Dimension(..) | Token::Percentage(_) => {
            token.to_string().yellow().to_string()
        }
        Token::BadString(_) | Token::BadUrl(_) => token.to_string().red().to_string(),
        _ => token.to_string(),
    }
}

fn print_selectors(input: &str, json: bool) -> Result<()> {
    let mut parser = Parser::new(input);
    let list = SelectorList::parse(&DefaultSelectorContext, &mut parser)
        .map_err(|error| anyhow::anyhow!("{error}"))
        .context("parsing selector list")?;

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&list).context("serializing selector list")?
        );
        return Ok(());
    }

    for selector in &list.selectors {
        let counts = selector.specificity_counts();
        println!("{}", selector.to_css_string().bold());
        println!(
            "  specificity: {} ({} id, {} class-like, {} element)",
            selector.specificity().yellow(),
            counts.id_selectors,
            counts.class_like_selectors,
            counts.element_selectors,
        );
        for component in selector.components() {
            println!("  {}", describe_component_line(component));
        }
    }
    Ok(())
}

fn describe_component_line(component: &Component) -> String {
    match component {
        Component::Combinator(combinator) => {
            format!("combinator {combinator:?}").magenta().to_string()
        }
        other => other.to_css_string(),
    }
}

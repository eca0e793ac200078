use anyhow::{Result, anyhow};
use async_trait::async_trait;
use std::io::{self, Write};

use super::{Outcome, TierConfigProcessor};
use crate::error::ProcessError;
use crate::models::{Param, TierConfigRequest};

const HELP: &str = "template <id> | tile <markdown> | inquire <param>=<error>;... | fail <reason> | skip [code] | <empty>";

/// An operator at the terminal decides each request.
pub struct ConsoleProcessor;

impl ConsoleProcessor {
    fn read_line(prompt: &str) -> Result<String> {
        print!("{}", prompt);
        io::stdout().flush()?;
        let mut input = String::new();
        io::stdin().read_line(&mut input)?;
        Ok(input.trim().to_string())
    }

    fn print_request(request: &TierConfigRequest) {
        let config = &request.configuration;
        println!("\n{}", "=".repeat(60));
        println!("Request:  {} ({}, {})", request.id, request.request_type, request.status);
        println!("Config:   {}", config.id);
        if let Some(level) = config.tier_level {
            println!("Tier:     {}", level);
        }
        println!(
            "Account:  {} {}",
            config.account.id,
            config.account.name.as_deref().unwrap_or("")
        );
        println!(
            "Product:  {} {}",
            config.product.id,
            config.product.name.as_deref().unwrap_or("")
        );

        if !request.params.is_empty() {
            println!("{}", "-".repeat(60));
            for param in &request.params {
                println!(
                    "  {} = {}",
                    param.id,
                    param.value.as_deref().unwrap_or("<unset>")
                );
            }
        }
        println!("{}", "=".repeat(60));
    }
}

/// Turn one line of operator input into an outcome.
pub fn parse_decision(line: &str) -> Result<Outcome> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(Outcome::NoResult);
    }

    let (verb, rest) = line.split_once(' ').unwrap_or((line, ""));
    let rest = rest.trim();

    match verb {
        "template" if !rest.is_empty() => Ok(Outcome::template(rest)),
        "tile" if !rest.is_empty() => Ok(Outcome::tile(rest)),
        "fail" if !rest.is_empty() => Ok(Outcome::fail(rest)),
        "skip" if rest.is_empty() => Ok(Outcome::skip()),
        "skip" => Ok(Outcome::skip_with(rest)),
        "inquire" => {
            // "email=not a valid address;phone=missing"
            let params: Vec<Param> = rest
                .split(';')
                .filter_map(|pair| {
                    let (id, error) = pair.split_once('=')?;
                    let id = id.trim();
                    (!id.is_empty()).then(|| Param::new(id).with_error(error.trim()))
                })
                .collect();
            if params.is_empty() {
                return Err(anyhow!("inquire needs at least one <param>=<error> pair"));
            }
            Ok(Outcome::inquire(params))
        }
        _ => Err(anyhow!("unrecognized decision '{}' (expected {})", line, HELP)),
    }
}

#[async_trait]
impl TierConfigProcessor for ConsoleProcessor {
    async fn process_request(&self, request: &TierConfigRequest) -> Result<Outcome, ProcessError> {
        Self::print_request(request);
        println!("{}", HELP);
        let line = Self::read_line("Decision: ")?;
        Ok(parse_decision(&line)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ParamUpdate;

    #[test]
    fn empty_line_is_no_result() {
        assert_eq!(parse_decision("   ").unwrap(), Outcome::NoResult);
    }

    #[test]
    fn template_and_tile() {
        assert_eq!(parse_decision("template TL-1").unwrap(), Outcome::template("TL-1"));
        assert_eq!(
            parse_decision("tile # Welcome aboard").unwrap(),
            Outcome::tile("# Welcome aboard")
        );
    }

    #[test]
    fn fail_keeps_full_reason() {
        assert_eq!(
            parse_decision("fail account is blocked").unwrap(),
            Outcome::fail("account is blocked")
        );
    }

    #[test]
    fn skip_with_and_without_code() {
        assert_eq!(parse_decision("skip").unwrap(), Outcome::skip());
        assert_eq!(parse_decision("skip later").unwrap(), Outcome::skip_with("later"));
    }

    #[test]
    fn inquire_builds_param_errors() {
        let outcome = parse_decision("inquire email=invalid address; phone=missing").unwrap();
        match outcome {
            Outcome::Inquire(params) => {
                assert_eq!(params.len(), 2);
                match &params[1] {
                    ParamUpdate::Typed(p) => {
                        assert_eq!(p.id, "phone");
                        assert_eq!(p.value_error.as_deref(), Some("missing"));
                    }
                    other => panic!("expected typed param, got {:?}", other),
                }
            }
            other => panic!("expected Inquire, got {:?}", other),
        }
    }

    #[test]
    fn inquire_without_pairs_fails() {
        assert!(parse_decision("inquire").is_err());
        assert!(parse_decision("inquire nothing-here").is_err());
    }

    #[test]
    fn missing_argument_fails() {
        assert!(parse_decision("template").is_err());
        assert!(parse_decision("fail").is_err());
    }

    #[test]
    fn unknown_verb_fails() {
        let err = parse_decision("approve").unwrap_err();
        assert!(err.to_string().contains("unrecognized decision"));
    }
}

//! Check command - verify backend configuration and connectivity.

use anyhow::Result;
use clap::Args;
use console::Style;

use super::Context;

/// Arguments for the check command.
#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Also send a minimal generation request to verify the API key works
    #[arg(long)]
    pub ping: bool,
}

/// Run the check command.
pub async fn run(args: CheckArgs, ctx: &Context) -> Result<()> {
    let green = Style::new().green();
    let red = Style::new().red();
    let dim = Style::new().dim();

    let openai_configured = std::env::var("OPENAI_API_KEY").is_ok();
    let exa_configured = std::env::var("EXA_API_KEY").is_ok();

    let mut openai_status = if openai_configured {
        "configured"
    } else {
        "not configured (OPENAI_API_KEY not set)"
    };
    let exa_status = if exa_configured {
        "configured"
    } else {
        "not configured (EXA_API_KEY not set)"
    };

    if args.ping && openai_configured {
        let backend =
            taliesin_llm::create_shared_backend(taliesin_llm::OpenAiConfig::openai_from_env()?)?;
        match backend.health_check().await {
            Ok(()) => openai_status = "ok",
            Err(error) => {
                if ctx.verbose {
                    eprintln!("{}", dim.apply_to(format!("Health check error: {error}")));
                }
                openai_status = "unreachable";
            }
        }
    }

    if ctx.json_output {
        println!(
            "{}",
            serde_json::json!({
                "openai": openai_status,
                "exa": exa_status,
            })
        );
        return Ok(());
    }

    let mark = |ok: bool| {
        if ok {
            green.apply_to("✓").to_string()
        } else {
            red.apply_to("✗").to_string()
        }
    };

    println!(
        "{} OpenAI: {}",
        mark(openai_status == "configured" || openai_status == "ok"),
        openai_status
    );
    println!("{} Exa: {}", mark(exa_configured), exa_status);

    if !openai_configured || !exa_configured {
        println!();
        println!(
            "{}",
            dim.apply_to("Set OPENAI_API_KEY and EXA_API_KEY to run research sessions")
        );
    }

    Ok(())
}

//! Agent Relay - interactive terminal client.
//!
//! Prompts for the chat fields (any can be given as flags), then runs the
//! agent in-process or, with `--server`, calls a running relay.

use agent_relay::agent::{AgentService, Provider};
use agent_relay::client::{Backend, ChatForm, Outcome, RemoteClient};
use agent_relay::config::Config;
use anyhow::Result;
use clap::Parser;
use console::style;
use dialoguer::{theme::ColorfulTheme, Confirm, Input, Select};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "agent-relay-client")]
#[command(about = "Ask a hosted LLM agent a question", long_about = None)]
struct Args {
    /// Base URL of a running relay (e.g. http://127.0.0.1:9999). Runs in-process when omitted.
    #[arg(short, long, env = "AGENT_RELAY_URL")]
    server: Option<String>,

    /// Provider: openai or groq
    #[arg(short, long)]
    provider: Option<Provider>,

    /// Model name
    #[arg(short, long)]
    model: Option<String>,

    /// System prompt defining the agent
    #[arg(long)]
    system_prompt: Option<String>,

    /// Allow web search
    #[arg(long)]
    search: bool,

    /// Question to ask; asks once and exits when given
    #[arg(short, long)]
    query: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| "agent_relay=warn".into()),
        )
        .init();

    let args = Args::parse();

    let backend = match &args.server {
        Some(url) => Backend::Remote(RemoteClient::new(url.as_str())),
        None => Backend::InProcess(AgentService::from_config(&Config::from_env()?)),
    };

    println!("{}", style("🤖 AI Chatbot Agents").bold());
    println!("{}\n", style("Create and interact with AI agents.").dim());

    let theme = ColorfulTheme::default();
    let one_shot = args.query.is_some();

    loop {
        let form = collect_form(&args, &theme)?;

        if !form.is_submittable() {
            println!("{}", style("Please enter a query.").yellow());
        } else {
            println!("{}", style("Thinking...").dim());
            render(backend.submit(&form).await);
        }

        if one_shot
            || !Confirm::with_theme(&theme)
                .with_prompt("Ask another question?")
                .default(true)
                .interact()?
        {
            break;
        }
    }

    Ok(())
}

fn collect_form(args: &Args, theme: &ColorfulTheme) -> Result<ChatForm> {
    let system_prompt = match &args.system_prompt {
        Some(prompt) => prompt.clone(),
        None => Input::<String>::with_theme(theme)
            .with_prompt("🧠 Define your AI Agent (system prompt)")
            .allow_empty(true)
            .interact_text()?,
    };

    let provider = match &args.provider {
        Some(provider) => *provider,
        None => {
            let choices = [Provider::Groq, Provider::OpenAi];
            let index = Select::with_theme(theme)
                .with_prompt("Select Provider")
                .items(&choices)
                .default(0)
                .interact()?;
            choices[index]
        }
    };

    let model_name = match &args.model {
        Some(model) => model.clone(),
        None => {
            let models = provider.models();
            let index = Select::with_theme(theme)
                .with_prompt(format!("Select {} Model", provider))
                .items(models)
                .default(0)
                .interact()?;
            models[index].to_string()
        }
    };

    let allow_search = args.search
        || (args.query.is_none()
            && Confirm::with_theme(theme)
                .with_prompt("Allow Web Search?")
                .default(false)
                .interact()?);

    let query = match &args.query {
        Some(query) => query.clone(),
        None => Input::<String>::with_theme(theme)
            .with_prompt("💬 Enter your query")
            .allow_empty(true)
            .interact_text()?,
    };

    Ok(ChatForm {
        system_prompt,
        provider,
        model_name,
        allow_search,
        query,
    })
}

fn render(outcome: Outcome) {
    match outcome {
        Outcome::Reply(text) => {
            println!("\n{}", style("🧩 Agent Response").bold().cyan());
            println!("{}\n", text);
        }
        Outcome::Error(message) => {
            println!("\n{}\n", style(message).red());
        }
    }
}

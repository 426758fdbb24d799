//! Handlers that forward straight to a running gateway.

use std::collections::BTreeMap;

use anyhow::Result;

use crate::bootstrap::CliContext;
use crate::handlers::print_json;
use toolgate_core::ExecRequest;

/// `toolgate status`
pub async fn status(ctx: &CliContext) -> Result<()> {
    let status = ctx.client.status().await?;
    print_json(&status)
}

/// `toolgate exec`
///
/// A rejected or failed command is still a successful call: the response
/// carries `success: false` and is printed as-is.
pub async fn exec(
    ctx: &CliContext,
    command: String,
    args: Vec<String>,
    env: Vec<(String, String)>,
    cwd: Option<String>,
) -> Result<()> {
    let request = build_request(command, args, env, cwd);
    let response = ctx.client.exec(&request).await?;
    print_json(&response)
}

/// `toolgate availability`
///
/// Goes through the store so the refreshed tools replace its cached view.
pub async fn availability(ctx: &CliContext) -> Result<()> {
    ctx.store.initialize().await;
    let tools = ctx.store.check_servers_availabilities().await?;
    print_json(&tools)
}

fn build_request(
    command: String,
    args: Vec<String>,
    env: Vec<(String, String)>,
    cwd: Option<String>,
) -> ExecRequest {
    let mut request = ExecRequest::new(command)
        .with_args(args)
        .with_env(env.into_iter().collect::<BTreeMap<_, _>>());
    if let Some(cwd) = cwd {
        request = request.with_cwd(cwd);
    }
    request
}
